//! Клиентская библиотека для администрирования сайта WordPress через REST API
//! с генерацией статей через Gemini.
//!
//! `WpClient` подключается один раз: проверяет конфигурацию, получает
//! JWT-токен и собирает клиент Gemini. Дальше каждая операция — один
//! независимый запрос без повторов: темы, посты и страницы, медиафайлы,
//! пользователи, заглушка резервной копии, генерация статьи.
#![warn(missing_docs)]

mod backup;
mod config;
mod error;
mod gemini;
mod http_client;
mod models;

pub use config::Config;
pub use error::{WpClientError, WpClientResult};
pub use models::{
    Article, DeletedUser, Media, Menu, MenuItem, Post, Rendered, SiteSettings, Theme, User,
};

use std::path::{Path, PathBuf};

use tracing::{error, info};

use gemini::GeminiClient;
use http_client::HttpClient;

#[derive(Debug, Clone)]
/// Клиент администрирования WordPress с генерацией статей через Gemini.
pub struct WpClient {
    http: HttpClient,
    gemini: GeminiClient,
}

impl WpClient {
    /// Подключается к сайту: проверяет конфигурацию, получает JWT-токен и
    /// готовит клиент Gemini.
    ///
    /// Ни одна из проверок не уходит в сеть, пока конфигурация не прошла
    /// валидацию.
    pub async fn connect(config: &Config) -> WpClientResult<Self> {
        config
            .validate()
            .inspect_err(|err| error!("configuration rejected: {}", err))?;

        let http = HttpClient::connect(config)
            .await
            .inspect_err(|err| error!("authentication at {} failed: {}", config.site_url, err))?;
        let gemini = GeminiClient::connect(&config.gemini_api_key)
            .inspect_err(|err| error!("gemini setup failed: {}", err))?;
        info!("authenticated at {}", config.site_url);

        Ok(Self { http, gemini })
    }

    /// Текущий JWT-токен сессии.
    pub fn token(&self) -> &str {
        self.http.token()
    }

    /// Возвращает список установленных тем.
    pub async fn list_themes(&self) -> WpClientResult<Vec<Theme>> {
        let themes = self
            .http
            .list_themes()
            .await
            .inspect_err(|err| error!("list_themes failed: {}", err))?;
        info!("fetched {} themes", themes.len());
        Ok(themes)
    }

    /// Активирует тему по её slug и возвращает обновлённые настройки сайта.
    pub async fn activate_theme(&self, slug: &str) -> WpClientResult<SiteSettings> {
        let settings = self
            .http
            .activate_theme(slug)
            .await
            .inspect_err(|err| error!("activate_theme '{}' failed: {}", slug, err))?;
        info!("theme '{}' activated", slug);
        Ok(settings)
    }

    /// Заменяет пункты меню с идентификатором `menu_id`.
    pub async fn update_menu(&self, menu_id: i64, items: &[MenuItem]) -> WpClientResult<Menu> {
        let menu = self
            .http
            .update_menu(menu_id, items)
            .await
            .inspect_err(|err| error!("update_menu {} failed: {}", menu_id, err))?;
        info!("menu {} updated with {} items", menu_id, items.len());
        Ok(menu)
    }

    /// Создаёт запись типа `post_type` со статусом `status`.
    ///
    /// Рубрики и обложка опциональны: незаданные поля не попадают в тело
    /// запроса.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        categories: Option<&[i64]>,
        featured_media: Option<i64>,
        status: &str,
        post_type: &str,
    ) -> WpClientResult<Post> {
        let post = self
            .http
            .create_post(title, content, categories, featured_media, status, post_type)
            .await
            .inspect_err(|err| error!("create_post '{}' failed: {}", title, err))?;
        info!("{} {} created with status '{}'", post_type, post.id, post.status);
        Ok(post)
    }

    /// Обновляет запись: в тело запроса попадают только заданные поля.
    pub async fn update_post(
        &self,
        post_id: i64,
        post_type: &str,
        title: Option<&str>,
        content: Option<&str>,
        categories: Option<&[i64]>,
        featured_media: Option<i64>,
    ) -> WpClientResult<Post> {
        let post = self
            .http
            .update_post(post_id, post_type, title, content, categories, featured_media)
            .await
            .inspect_err(|err| error!("update_post {} failed: {}", post_id, err))?;
        info!("{} {} updated", post_type, post_id);
        Ok(post)
    }

    /// Удаляет запись; WordPress возвращает её состояние в корзине.
    pub async fn delete_post(&self, post_id: i64, post_type: &str) -> WpClientResult<Post> {
        let post = self
            .http
            .delete_post(post_id, post_type)
            .await
            .inspect_err(|err| error!("delete_post {} failed: {}", post_id, err))?;
        info!("{} {} deleted", post_type, post_id);
        Ok(post)
    }

    /// Загружает локальный файл в медиабиблиотеку.
    pub async fn upload_media(
        &self,
        file_path: &Path,
        alt_text: &str,
        description: &str,
    ) -> WpClientResult<Media> {
        let media = self
            .http
            .upload_media(file_path, alt_text, description)
            .await
            .inspect_err(|err| {
                error!("upload_media {} failed: {}", file_path.display(), err)
            })?;
        info!("media {} uploaded from {}", media.id, file_path.display());
        Ok(media)
    }

    /// Создаёт пользователя с одной ролью.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> WpClientResult<User> {
        let user = self
            .http
            .create_user(username, email, password, role)
            .await
            .inspect_err(|err| error!("create_user '{}' failed: {}", username, err))?;
        info!("user {} created with role '{}'", user.id, role);
        Ok(user)
    }

    /// Обновляет почту и роль пользователя; незаданные поля не отправляются.
    pub async fn update_user(
        &self,
        user_id: i64,
        email: Option<&str>,
        role: Option<&str>,
    ) -> WpClientResult<User> {
        let user = self
            .http
            .update_user(user_id, email, role)
            .await
            .inspect_err(|err| error!("update_user {} failed: {}", user_id, err))?;
        info!("user {} updated", user_id);
        Ok(user)
    }

    /// Удаляет пользователя.
    ///
    /// `reassign` передаёт его контент другому пользователю; без него
    /// WordPress удалит и контент.
    pub async fn delete_user(
        &self,
        user_id: i64,
        reassign: Option<i64>,
    ) -> WpClientResult<DeletedUser> {
        let deleted = self
            .http
            .delete_user(user_id, reassign)
            .await
            .inspect_err(|err| error!("delete_user {} failed: {}", user_id, err))?;
        info!("user {} deleted", user_id);
        Ok(deleted)
    }

    /// Пишет файл-заглушку резервной копии в `backup_dir` и возвращает его
    /// путь.
    pub async fn backup_site(&self, backup_dir: &Path) -> WpClientResult<PathBuf> {
        let path = backup::write_backup_stub(backup_dir)
            .await
            .inspect_err(|err| {
                error!("backup_site {} failed: {}", backup_dir.display(), err)
            })?;
        info!("backup written to {}", path.display());
        Ok(path)
    }

    /// Генерирует статью на тему `topic` через Gemini.
    ///
    /// `length` принимает `short`, `medium` или `long`; неизвестное значение
    /// трактуется как `medium`.
    pub async fn generate_article(&self, topic: &str, length: &str) -> WpClientResult<Article> {
        let article = self
            .gemini
            .generate_article(topic, length)
            .await
            .inspect_err(|err| error!("generate_article '{}' failed: {}", topic, err))?;
        info!("article '{}' generated", article.title);
        Ok(article)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ошибка Config, а не Auth: до запроса токена дело не дошло
    #[tokio::test]
    async fn connect_rejects_incomplete_config() {
        let config = Config {
            site_url: "https://example.com".to_string(),
            username: "admin".to_string(),
            password: String::new(),
            gemini_api_key: "key".to_string(),
        };

        let err = WpClient::connect(&config).await.expect_err("must fail");
        assert!(matches!(err, WpClientError::Config(_)));
    }
}

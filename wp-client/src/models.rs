use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
/// Поле WordPress с отрендеренным значением (`{"rendered": "..."}`).
pub struct Rendered {
    /// Отрендеренный HTML или текст.
    #[serde(default)]
    pub rendered: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись темы из коллекции `wp/v2/themes`.
pub struct Theme {
    /// Слаг таблицы стилей; идентификатор темы.
    pub stylesheet: String,
    /// Статус темы (`active`/`inactive`).
    #[serde(default)]
    pub status: String,
    /// Название темы.
    #[serde(default)]
    pub name: Rendered,
    /// Версия темы.
    #[serde(default)]
    pub version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись настроек сайта (`wp/v2/settings`).
///
/// WordPress отдаёт больше полей, чем нужно клиенту; лишние игнорируются.
pub struct SiteSettings {
    /// Заголовок сайта.
    #[serde(default)]
    pub title: String,
    /// Короткое описание сайта.
    #[serde(default)]
    pub description: String,
    /// Язык сайта.
    #[serde(default)]
    pub language: String,
    /// Активная тема, если сайт принимает это поле.
    #[serde(default)]
    pub theme: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Пункт меню: подпись и ссылка.
pub struct MenuItem {
    /// Подпись пункта.
    pub title: String,
    /// Адрес ссылки.
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись меню (`wp/v2/menus/{id}`).
pub struct Menu {
    /// Идентификатор меню.
    pub id: i64,
    /// Название меню.
    #[serde(default)]
    pub name: String,
    /// Пункты меню.
    #[serde(default)]
    pub items: Vec<MenuItem>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись поста или страницы.
pub struct Post {
    /// Идентификатор записи.
    pub id: i64,
    /// Дата создания в часовом поясе сайта; у запланированных черновиков
    /// может отсутствовать.
    #[serde(default)]
    pub date: Option<NaiveDateTime>,
    /// Слаг записи.
    #[serde(default)]
    pub slug: String,
    /// Статус записи (`publish`, `draft`, `trash`, ...).
    #[serde(default)]
    pub status: String,
    /// Тип записи (`post` или `page`).
    #[serde(default, rename = "type")]
    pub post_type: String,
    /// Постоянная ссылка.
    #[serde(default)]
    pub link: String,
    /// Заголовок.
    #[serde(default)]
    pub title: Rendered,
    /// Содержимое.
    #[serde(default)]
    pub content: Rendered,
    /// Идентификаторы категорий.
    #[serde(default)]
    pub categories: Vec<i64>,
    /// Идентификатор обложки; `0`, если обложка не задана.
    #[serde(default)]
    pub featured_media: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись медиафайла (`wp/v2/media`).
pub struct Media {
    /// Идентификатор медиафайла.
    pub id: i64,
    /// Прямая ссылка на файл.
    #[serde(default)]
    pub source_url: String,
    /// Альтернативный текст.
    #[serde(default)]
    pub alt_text: String,
    /// MIME-тип файла.
    #[serde(default)]
    pub mime_type: String,
    /// Заголовок медиафайла.
    #[serde(default)]
    pub title: Rendered,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Запись пользователя (`wp/v2/users`).
pub struct User {
    /// Идентификатор пользователя.
    pub id: i64,
    /// Логин; WordPress отдаёт его только в контексте `edit`.
    #[serde(default)]
    pub username: String,
    /// Отображаемое имя.
    #[serde(default)]
    pub name: String,
    /// Email; отдаётся только в контексте `edit`.
    #[serde(default)]
    pub email: String,
    /// Список ролей.
    #[serde(default)]
    pub roles: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Подтверждение удаления пользователя.
pub struct DeletedUser {
    /// Признак удаления.
    pub deleted: bool,
    /// Последнее состояние удалённого пользователя.
    pub previous: User,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// Статья, сгенерированная Gemini; клиент её нигде не сохраняет.
pub struct Article {
    /// Заголовок статьи.
    pub title: String,
    /// Текст статьи.
    pub content: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn post_decodes_wordpress_response() {
        let raw = r#"{
            "id": 42,
            "date": "2026-08-23T10:15:00",
            "slug": "privet-mir",
            "status": "draft",
            "type": "post",
            "link": "https://example.com/?p=42",
            "title": {"rendered": "Привет, мир"},
            "content": {"rendered": "<p>Текст</p>", "protected": false},
            "categories": [1, 5],
            "featured_media": 7,
            "author": 1
        }"#;

        let post: Post = serde_json::from_str(raw).expect("post must decode");
        assert_eq!(post.id, 42);
        assert_eq!(post.status, "draft");
        assert_eq!(post.post_type, "post");
        assert_eq!(post.title.rendered, "Привет, мир");
        assert_eq!(post.categories, vec![1, 5]);
        assert_eq!(post.featured_media, 7);
        assert!(post.date.is_some());
    }

    #[test]
    fn post_tolerates_trimmed_view_context() {
        // в контексте `view` WordPress не отдаёт часть полей
        let raw = r#"{"id": 1, "title": {"rendered": "t"}}"#;

        let post: Post = serde_json::from_str(raw).expect("post must decode");
        assert_eq!(post.id, 1);
        assert_eq!(post.featured_media, 0);
        assert!(post.categories.is_empty());
        assert!(post.date.is_none());
    }

    #[test]
    fn theme_list_decodes() {
        let raw = r#"[
            {"stylesheet": "twentytwentyfive", "status": "active",
             "name": {"rendered": "Twenty Twenty-Five"}, "version": "1.0"},
            {"stylesheet": "twentytwentyfour", "status": "inactive"}
        ]"#;

        let themes: Vec<Theme> = serde_json::from_str(raw).expect("themes must decode");
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].stylesheet, "twentytwentyfive");
        assert_eq!(themes[0].name.rendered, "Twenty Twenty-Five");
        assert_eq!(themes[1].name.rendered, "");
    }

    #[test]
    fn deleted_user_decodes_confirmation() {
        let raw = r#"{
            "deleted": true,
            "previous": {"id": 9, "username": "redaktor", "email": "r@example.com",
                         "name": "Редактор", "roles": ["editor"]}
        }"#;

        let confirmation: DeletedUser =
            serde_json::from_str(raw).expect("confirmation must decode");
        assert!(confirmation.deleted);
        assert_eq!(confirmation.previous.id, 9);
        assert_eq!(confirmation.previous.roles, vec!["editor".to_string()]);
    }
}

use std::path::Path;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{Client, Method, multipart};
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::config::Config;
use crate::error::{WpClientError, WpClientResult};
use crate::models::{DeletedUser, Media, Menu, MenuItem, Post, SiteSettings, Theme, User};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const JSON_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Serialize)]
struct TokenRequestDto<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
struct TokenResponseDto {
    token: String,
}

#[derive(Debug, Serialize)]
struct ActivateThemeDto<'a> {
    theme: &'a str,
}

#[derive(Debug, Serialize)]
struct UpdateMenuDto<'a> {
    items: &'a [MenuItem],
}

#[derive(Debug, Serialize)]
struct CreatePostDto<'a> {
    title: &'a str,
    content: &'a str,
    status: &'a str,
    #[serde(rename = "type")]
    post_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<i64>,
}

#[derive(Debug, Serialize)]
struct UpdatePostDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    title: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    categories: Option<&'a [i64]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    featured_media: Option<i64>,
}

#[derive(Debug, Serialize)]
struct CreateUserDto<'a> {
    username: &'a str,
    email: &'a str,
    password: &'a str,
    roles: [&'a str; 1],
}

#[derive(Debug, Serialize)]
struct UpdateUserDto<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    roles: Option<[&'a str; 1]>,
}

#[derive(Debug, Deserialize)]
struct WpErrorDto {
    message: Option<String>,
}

#[derive(Debug, Clone)]
/// HTTP-клиент REST API WordPress с JWT-авторизацией.
///
/// Набор заголовков вычисляется один раз при подключении и дальше не
/// меняется; каждый метод выполняет ровно один запрос без повторов.
pub struct HttpClient {
    base_url: String,
    client: Client,
    token: String,
    headers: HeaderMap,
}

impl HttpClient {
    /// Собирает HTTP-клиент и получает JWT-токен у сайта.
    pub async fn connect(config: &Config) -> WpClientResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|err| {
                WpClientError::Config(format!("failed to build http client: {err}"))
            })?;

        let base_url = config.site_url.trim_end_matches('/').to_string();
        let token = request_token(&client, &base_url, &config.username, &config.password).await?;
        let headers = build_headers(&token)?;

        Ok(Self {
            base_url,
            client,
            token,
            headers,
        })
    }

    /// Текущий JWT-токен сессии.
    pub fn token(&self) -> &str {
        &self.token
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/wp-json/wp/v2/{}",
            self.base_url,
            path.trim_start_matches('/')
        )
    }

    async fn decode_error(response: reqwest::Response) -> WpClientError {
        let status = response.status();

        let message = match response.json::<WpErrorDto>().await {
            Ok(body) => body.message,
            Err(_) => None,
        };
        WpClientError::remote(status, message)
    }

    /// универсальный helper для запросов с json-телом
    async fn send_json<TReq, TRes>(
        &self,
        method: Method,
        path: &str,
        body: &TReq,
    ) -> WpClientResult<TRes>
    where
        TReq: Serialize,
        TRes: DeserializeOwned,
    {
        let url = self.endpoint(path);

        let response = self
            .client
            .request(method, url)
            .headers(self.headers.clone())
            .timeout(JSON_TIMEOUT)
            .json(body)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json::<TRes>().await?)
    }

    /// Возвращает список установленных тем.
    pub async fn list_themes(&self) -> WpClientResult<Vec<Theme>> {
        let url = self.endpoint("themes");

        let response = self
            .client
            .get(url)
            .headers(self.headers.clone())
            .timeout(JSON_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Активирует тему: отправляет `{"theme": slug}` в настройки сайта.
    pub async fn activate_theme(&self, slug: &str) -> WpClientResult<SiteSettings> {
        let payload = ActivateThemeDto { theme: slug };
        self.send_json(Method::POST, "settings", &payload).await
    }

    /// Заменяет пункты меню с идентификатором `menu_id`.
    pub async fn update_menu(&self, menu_id: i64, items: &[MenuItem]) -> WpClientResult<Menu> {
        // на стоковой установке маршрут меню доступен только с плагином
        let payload = UpdateMenuDto { items };
        self.send_json(Method::POST, &format!("menus/{menu_id}"), &payload)
            .await
    }

    /// Создаёт пост или страницу; опциональные поля не попадают в тело,
    /// если не заданы.
    pub async fn create_post(
        &self,
        title: &str,
        content: &str,
        categories: Option<&[i64]>,
        featured_media: Option<i64>,
        status: &str,
        post_type: &str,
    ) -> WpClientResult<Post> {
        let payload = CreatePostDto {
            title,
            content,
            status,
            post_type,
            categories,
            featured_media,
        };
        self.send_json(Method::POST, &format!("{post_type}s"), &payload)
            .await
    }

    /// Обновляет пост или страницу; в тело попадают только заданные поля.
    pub async fn update_post(
        &self,
        post_id: i64,
        post_type: &str,
        title: Option<&str>,
        content: Option<&str>,
        categories: Option<&[i64]>,
        featured_media: Option<i64>,
    ) -> WpClientResult<Post> {
        let payload = UpdatePostDto {
            title,
            content,
            categories,
            featured_media,
        };
        self.send_json(Method::POST, &format!("{post_type}s/{post_id}"), &payload)
            .await
    }

    /// Удаляет пост или страницу.
    ///
    /// Без `force` WordPress переносит запись в корзину и возвращает её
    /// состояние со статусом `trash`.
    pub async fn delete_post(&self, post_id: i64, post_type: &str) -> WpClientResult<Post> {
        let url = self.endpoint(&format!("{post_type}s/{post_id}"));

        let response = self
            .client
            .delete(url)
            .headers(self.headers.clone())
            .timeout(JSON_TIMEOUT)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Загружает локальный файл в медиабиблиотеку.
    pub async fn upload_media(
        &self,
        file_path: &Path,
        alt_text: &str,
        description: &str,
    ) -> WpClientResult<Media> {
        let bytes = tokio::fs::read(file_path).await?;
        let part = multipart::Part::bytes(bytes).file_name(upload_file_name(file_path));
        let form = multipart::Form::new()
            .part("file", part)
            .text("alt_text", alt_text.to_string())
            .text("description", description.to_string());

        // multipart сам выставляет Content-Type с boundary, поэтому сюда
        // идёт только заголовок авторизации
        let response = self
            .client
            .post(self.endpoint("media"))
            .bearer_auth(&self.token)
            .timeout(UPLOAD_TIMEOUT)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json().await?)
    }

    /// Создаёт пользователя с одной ролью.
    pub async fn create_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> WpClientResult<User> {
        let payload = CreateUserDto {
            username,
            email,
            password,
            roles: [role],
        };
        self.send_json(Method::POST, "users", &payload).await
    }

    /// Обновляет пользователя; в тело попадают только заданные поля,
    /// роль оборачивается в список из одного элемента.
    pub async fn update_user(
        &self,
        user_id: i64,
        email: Option<&str>,
        role: Option<&str>,
    ) -> WpClientResult<User> {
        let payload = UpdateUserDto {
            email,
            roles: role.map(|role| [role]),
        };
        self.send_json(Method::POST, &format!("users/{user_id}"), &payload)
            .await
    }

    fn delete_user_request(&self, user_id: i64, reassign: Option<i64>) -> reqwest::RequestBuilder {
        let url = self.endpoint(&format!("users/{user_id}"));

        let mut request = self
            .client
            .delete(url)
            .headers(self.headers.clone())
            .timeout(JSON_TIMEOUT);
        if let Some(reassign) = reassign {
            request = request.query(&[("reassign", reassign)]);
        }
        request
    }

    /// Удаляет пользователя; `reassign` передаёт его контент другому
    /// пользователю и попадает в строку запроса только когда задан.
    pub async fn delete_user(
        &self,
        user_id: i64,
        reassign: Option<i64>,
    ) -> WpClientResult<DeletedUser> {
        let response = self.delete_user_request(user_id, reassign).send().await?;
        if !response.status().is_success() {
            return Err(Self::decode_error(response).await);
        }

        Ok(response.json().await?)
    }
}

async fn request_token(
    client: &Client,
    base_url: &str,
    username: &str,
    password: &str,
) -> WpClientResult<String> {
    let payload = TokenRequestDto { username, password };

    let response = client
        .post(jwt_endpoint(base_url))
        .timeout(JSON_TIMEOUT)
        .json(&payload)
        .send()
        .await
        .map_err(|err| WpClientError::Auth(format!("token request failed: {err}")))?;

    if !response.status().is_success() {
        return Err(WpClientError::Auth(format!(
            "token endpoint returned {}",
            response.status()
        )));
    }

    let dto: TokenResponseDto = response
        .json()
        .await
        .map_err(|err| WpClientError::Auth(format!("malformed token response: {err}")))?;
    if dto.token.is_empty() {
        return Err(WpClientError::Auth("token response is empty".to_string()));
    }

    Ok(dto.token)
}

fn jwt_endpoint(base_url: &str) -> String {
    format!("{base_url}/wp-json/jwt-auth/v1/token")
}

fn build_headers(token: &str) -> WpClientResult<HeaderMap> {
    let bearer = HeaderValue::from_str(&format!("Bearer {token}"))
        .map_err(|_| WpClientError::Auth("token is not a valid header value".to_string()))?;

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, bearer);
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    Ok(headers)
}

fn upload_file_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "upload.bin".to_string())
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `wp-client`.
pub enum WpClientError {
    /// Отсутствующее или пустое значение конфигурации, либо не удалось
    /// собрать один из HTTP-клиентов.
    #[error("configuration error: {0}")]
    Config(String),

    /// Не удалось получить JWT-токен; клиент непригоден к работе.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// WordPress ответил статусом вне диапазона 2xx.
    #[error("remote request failed ({status}): {message}")]
    Remote {
        /// HTTP-статус ответа.
        status: StatusCode,
        /// Сообщение из тела ошибки WordPress, либо `http status <код>`.
        message: String,
    },

    /// Ошибка вызова Gemini: транспорт, не-2xx или пустой ответ.
    #[error("gemini request failed: {0}")]
    Gemini(String),

    /// Ошибка доступа к локальному файлу (исходник медиа, файл бэкапа).
    #[error("file access error: {0}")]
    File(#[from] std::io::Error),
}

/// Результат операций `wp-client`.
pub type WpClientResult<T> = Result<T, WpClientError>;

impl WpClientError {
    pub(crate) fn remote(status: StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        Self::Remote { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_keeps_server_message() {
        let err = WpClientError::remote(
            StatusCode::FORBIDDEN,
            Some("Извините, вам это не разрешено.".to_string()),
        );
        match err {
            WpClientError::Remote { status, message } => {
                assert_eq!(status, StatusCode::FORBIDDEN);
                assert_eq!(message, "Извините, вам это не разрешено.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn remote_falls_back_to_status_line() {
        let err = WpClientError::remote(StatusCode::NOT_FOUND, None);
        assert_eq!(
            err.to_string(),
            "remote request failed (404 Not Found): http status 404 Not Found"
        );
    }
}

use std::env;

use crate::error::{WpClientError, WpClientResult};

#[derive(Debug, Clone)]
/// Конфигурация клиента: адрес сайта, учётные данные и ключ Gemini.
pub struct Config {
    /// Базовый URL сайта WordPress, например `https://example.com`.
    pub site_url: String,
    /// Логин администратора.
    pub username: String,
    /// Пароль администратора (или application password).
    pub password: String,
    /// API-ключ Gemini.
    pub gemini_api_key: String,
}

impl Config {
    /// Читает конфигурацию из переменных окружения `WORDPRESS_URL`,
    /// `WORDPRESS_USERNAME`, `WORDPRESS_PASSWORD` и `GEMINI_API_KEY`.
    ///
    /// Отсутствующая или пустая переменная — фатальная ошибка конфигурации.
    pub fn from_env() -> WpClientResult<Self> {
        Ok(Self {
            site_url: required_env("WORDPRESS_URL")?,
            username: required_env("WORDPRESS_USERNAME")?,
            password: required_env("WORDPRESS_PASSWORD")?,
            gemini_api_key: required_env("GEMINI_API_KEY")?,
        })
    }

    /// Проверяет, что все четыре значения непустые.
    pub fn validate(&self) -> WpClientResult<()> {
        let required = [
            ("site_url", &self.site_url),
            ("username", &self.username),
            ("password", &self.password),
            ("gemini_api_key", &self.gemini_api_key),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(WpClientError::Config(format!("{name} must not be empty")));
            }
        }
        Ok(())
    }
}

fn required_env(name: &str) -> WpClientResult<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(WpClientError::Config(format!("{name} is not set"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> Config {
        Config {
            site_url: "https://example.com".to_string(),
            username: "admin".to_string(),
            password: "secret".to_string(),
            gemini_api_key: "key".to_string(),
        }
    }

    #[test]
    fn validate_accepts_full_config() {
        assert!(full_config().validate().is_ok());
    }

    #[test]
    fn validate_rejects_empty_password() {
        let mut config = full_config();
        config.password = String::new();

        let err = config.validate().expect_err("must fail");
        match err {
            WpClientError::Config(message) => assert!(message.contains("password")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn validate_rejects_blank_site_url() {
        let mut config = full_config();
        config.site_url = "   ".to_string();

        let err = config.validate().expect_err("must fail");
        assert!(matches!(err, WpClientError::Config(_)));
    }
}

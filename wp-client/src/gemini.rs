use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::{WpClientError, WpClientResult};
use crate::models::Article;

const GEMINI_API_URL: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";
const GEMINI_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Serialize)]
struct GenerateRequestDto<'a> {
    contents: [ContentDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct ContentDto<'a> {
    parts: [PartDto<'a>; 1],
}

#[derive(Debug, Serialize)]
struct PartDto<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateResponseDto {
    #[serde(default)]
    candidates: Vec<CandidateDto>,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateDto {
    #[serde(default)]
    content: CandidateContentDto,
}

#[derive(Debug, Default, Deserialize)]
struct CandidateContentDto {
    #[serde(default)]
    parts: Vec<ResponsePartDto>,
}

#[derive(Debug, Default, Deserialize)]
struct ResponsePartDto {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorDto {
    #[serde(default)]
    error: GeminiErrorBodyDto,
}

#[derive(Debug, Default, Deserialize)]
struct GeminiErrorBodyDto {
    message: Option<String>,
}

#[derive(Debug, Clone)]
/// Клиент генерации текста через Gemini API.
pub struct GeminiClient {
    client: Client,
    api_key: String,
}

impl GeminiClient {
    /// Собирает клиент Gemini с собственным таймаутом на генерацию.
    pub fn connect(api_key: &str) -> WpClientResult<Self> {
        let client = Client::builder()
            .timeout(GEMINI_TIMEOUT)
            .build()
            .map_err(|err| {
                WpClientError::Config(format!("failed to build gemini client: {err}"))
            })?;

        Ok(Self {
            client,
            api_key: api_key.to_string(),
        })
    }

    /// Генерирует статью на тему `topic`.
    ///
    /// `length` задаёт примерный объём: `short`, `medium` или `long`;
    /// неизвестное значение трактуется как `medium`.
    pub async fn generate_article(&self, topic: &str, length: &str) -> WpClientResult<Article> {
        let prompt = build_prompt(topic, word_target(length));
        let text = self.generate_text(&prompt).await?;
        Ok(split_article(&text, topic))
    }

    /// Отправляет prompt и возвращает сырой текст первого кандидата.
    pub async fn generate_text(&self, prompt: &str) -> WpClientResult<String> {
        let request = GenerateRequestDto {
            contents: [ContentDto {
                parts: [PartDto { text: prompt }],
            }],
        };

        let response = self
            .client
            .post(GEMINI_API_URL)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| WpClientError::Gemini(format!("request failed: {err}")))?;

        if !response.status().is_success() {
            let status = response.status();
            let message = match response.json::<GeminiErrorDto>().await {
                Ok(body) => body.error.message,
                Err(_) => None,
            };
            return Err(WpClientError::Gemini(
                message.unwrap_or_else(|| format!("service returned {status}")),
            ));
        }

        let dto: GenerateResponseDto = response
            .json()
            .await
            .map_err(|err| WpClientError::Gemini(format!("malformed response: {err}")))?;

        match first_candidate_text(&dto) {
            Some(text) => Ok(text),
            None => Err(WpClientError::Gemini("empty response".to_string())),
        }
    }
}

fn first_candidate_text(dto: &GenerateResponseDto) -> Option<String> {
    let candidate = dto.candidates.first()?;

    let mut text = String::new();
    for part in &candidate.content.parts {
        text.push_str(&part.text);
    }
    if text.is_empty() { None } else { Some(text) }
}

fn word_target(length: &str) -> u32 {
    match length {
        "short" => 200,
        "medium" => 500,
        "long" => 1000,
        _ => 500,
    }
}

fn build_prompt(topic: &str, words: u32) -> String {
    format!(
        "Напиши статью на русском языке на тему '{topic}' объёмом примерно {words} слов. \
         Пиши информативно и живо, в стиле записи для блога на WordPress. \
         Начни с заголовка, отметив его символом '#', и раздели текст на понятные абзацы."
    )
}

/// Первая строка с маркером заголовка становится названием, остальное
/// содержимым; иначе название получается из темы, а текст идёт целиком.
fn split_article(text: &str, topic: &str) -> Article {
    let (first, rest) = match text.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (text, ""),
    };

    if first.starts_with('#') {
        Article {
            title: first.trim_matches(['#', ' ']).trim().to_string(),
            content: rest.trim().to_string(),
        }
    } else {
        Article {
            title: title_case(topic),
            content: text.to_string(),
        }
    }
}

fn title_case(topic: &str) -> String {
    let mut result = String::with_capacity(topic.len());
    let mut boundary = true;
    for ch in topic.chars() {
        if ch.is_alphabetic() {
            if boundary {
                result.extend(ch.to_uppercase());
            } else {
                result.extend(ch.to_lowercase());
            }
            boundary = false;
        } else {
            result.push(ch);
            boundary = true;
        }
    }
    result
}

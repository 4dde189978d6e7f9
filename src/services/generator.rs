// SPDX-License-Identifier: MIT

//! Chat-completion client for flashcard generation.
//!
//! One synchronous round trip per request against an OpenAI-compatible
//! endpoint; the model is asked for a JSON object and its output is validated
//! against the flashcard schema before anything is returned. No retries, no
//! streaming.

use crate::config::Config;
use crate::error::AppError;
use crate::models::Flashcard;
use serde::Deserialize;

/// Model requested from the completion endpoint.
const MODEL: &str = "openai/gpt-4o-mini";

/// Fixed instruction sent as the system message with every request.
const SYSTEM_PROMPT: &str = r#"
You are a flashcard creator specializing in making effective and engaging study aids. Your task is to generate flashcards that are clear, concise, and tailored to the learning objectives of the user. Each flashcard should consist of a question or prompt on one side and the answer or explanation on the other.

Guidelines for creating flashcards:
1. Clarity: Ensure that each flashcard has a single, well-defined question or prompt. Avoid ambiguity.
2. Brevity: Keep the content short and to the point. The question and answer should be easily digestible.
3. Focus on Key Concepts: Identify and emphasize the most important information that the learner needs to remember.
4. Variety in Question Types: Use a mix of question types, such as definitions, true/false, multiple choice, fill-in-the-blank, and conceptual explanations.
5. Active Recall and Spaced Repetition: Structure the flashcards to encourage active recall, helping users strengthen their memory through repeated exposure.
6. Customization: Tailor the flashcards to the specific needs and learning style of the user. Adjust the difficulty level, language, and examples accordingly.
7. Visual Aids: Incorporate images, diagrams, or charts when necessary to enhance understanding, but ensure they are relevant and not overly complex.
8. Feedback and Explanations: Provide brief explanations or feedback with the answers to reinforce learning and correct misunderstandings.
9. Engagement: Keep the user engaged by using a friendly tone and, where appropriate, include mnemonic devices, humor, or real-world applications.
10. NOTE: Only generate 12 flashcards at a time.
11. NOTE: Keep the text length under 150 characters.

Your goal is to create flashcards that help users retain information effectively, making studying both efficient and enjoyable.

Return in the following JSON format:
{
    "flashcards": [
        {
            "front": str,
            "back": str
        }
    ]
}
"#;

/// Flashcard generation client.
#[derive(Clone)]
pub struct FlashcardGenerator {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

/// Chat-completion response, reduced to the fields we read.
#[derive(Debug, Deserialize)]
struct ChatCompletion {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: String,
}

/// Expected shape of the model's JSON-object output.
#[derive(Debug, Deserialize)]
struct GeneratedCards {
    flashcards: Vec<Flashcard>,
}

impl FlashcardGenerator {
    pub fn new(base_url: String, api_key: Option<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            api_key,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            config.openrouter_endpoint.clone(),
            config.openrouter_api_key.clone(),
        )
    }

    /// Generate flashcards from user-supplied source text.
    ///
    /// Fails with a configuration error before any network call when no API
    /// key is set.
    pub async fn generate(&self, source_text: &str) -> Result<Vec<Flashcard>, AppError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AppError::Config("OPENROUTER_API_KEY is not set".to_string()))?;

        let url = format!("{}/chat/completions", self.base_url);
        let body = serde_json::json!({
            "model": MODEL,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": source_text},
            ],
            "response_format": {"type": "json_object"},
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::LlmApi(e.to_string()))?;

        let completion: ChatCompletion = self.check_response_json(response).await?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| {
                AppError::MalformedUpstream("completion contained no choices".to_string())
            })?;

        parse_flashcards(&content)
    }

    /// Check response status and parse the JSON body.
    async fn check_response_json<T: for<'de> Deserialize<'de>>(
        &self,
        response: reqwest::Response,
    ) -> Result<T, AppError> {
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::LlmApi(format!("HTTP {}: {}", status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::LlmApi(format!("JSON parse error: {}", e)))
    }
}

/// Validate the model's output against the flashcard schema.
///
/// Fails closed: non-JSON content or a missing/ill-typed `flashcards` field
/// is a typed malformed-upstream error, never a panic.
pub fn parse_flashcards(content: &str) -> Result<Vec<Flashcard>, AppError> {
    let parsed: GeneratedCards = serde_json::from_str(content).map_err(|e| {
        AppError::MalformedUpstream(format!("model output did not match flashcard schema: {}", e))
    })?;

    Ok(parsed.flashcards)
}

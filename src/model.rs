//! Request and response models of the video analysis service.
//!
//! Field names follow the server's camelCase JSON.

use serde::{Deserialize, Serialize};

/// Question about a subtitle. Also the payload of the streaming ask.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub subtitle_content: String,
    pub question: String,
}

impl ChatRequest {
    pub fn new(subtitle_content: impl Into<String>, question: impl Into<String>) -> Self {
        Self {
            subtitle_content: subtitle_content.into(),
            question: question.into(),
        }
    }
}

/// Keyword search over a subtitle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SearchRequest {
    pub subtitle_content: String,
    pub keyword: String,
}

impl SearchRequest {
    pub fn new(subtitle_content: impl Into<String>, keyword: impl Into<String>) -> Self {
        Self {
            subtitle_content: subtitle_content.into(),
            keyword: keyword.into(),
        }
    }
}

/// Result of an upload or of loading the sample subtitle.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,

    #[serde(default)]
    pub message: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,

    /// Number of characters in the uploaded subtitle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub char_count: Option<u64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Generic AI response.
///
/// `content` is null when the server reports a failure; `message` then
/// carries the reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct VideoResponse {
    pub success: bool,

    #[serde(default)]
    pub content: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl VideoResponse {
    /// Parse the concept list returned by the extract endpoint.
    ///
    /// Models like to wrap JSON in a markdown code fence, so one is stripped
    /// if present.
    pub fn concepts(&self) -> Result<Vec<Concept>, serde_json::Error> {
        let content = self.content.as_deref().unwrap_or("[]");
        serde_json::from_str(strip_code_fence(content))
    }
}

/// Response of the smart ask endpoint. `intent` and `confidence` are only
/// present in debug mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct SmartAskResponse {
    #[serde(default)]
    pub content: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intent: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl SmartAskResponse {
    /// The classified intent, if the server reported a known one.
    pub fn user_intent(&self) -> Option<UserIntent> {
        self.intent.as_deref().and_then(UserIntent::parse)
    }
}

/// A knowledge point with the time range it covers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Concept {
    pub timestamp_from: String,
    pub timestamp_to: String,
    pub concept: String,
    pub description: String,
}

/// Intent categories used by the server's classifier.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UserIntent {
    Summarize,
    Qa,
    ExtractConcepts,
    ExtractQuotes,
    SearchKeyword,
    /// Chain-of-thought analysis
    DeepQa,
}

impl UserIntent {
    /// Parse the wire name (`"EXTRACT_QUOTES"`), ignoring case and surrounding
    /// whitespace.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "SUMMARIZE" => Some(Self::Summarize),
            "QA" => Some(Self::Qa),
            "EXTRACT_CONCEPTS" => Some(Self::ExtractConcepts),
            "EXTRACT_QUOTES" => Some(Self::ExtractQuotes),
            "SEARCH_KEYWORD" => Some(Self::SearchKeyword),
            "DEEP_QA" => Some(Self::DeepQa),
            _ => None,
        }
    }
}

fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

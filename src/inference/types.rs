//! Wire types for the Gemini `generateContent` endpoint.
//!
//! Only the fields this crate reads are modelled; everything else in the
//! response is ignored by serde.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Part {
    pub text: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RequestContent {
    pub role: String,
    pub parts: Vec<Part>,
}

/// Request body: `{ contents: [{ role: "user", parts: [{ text }] }] }`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    pub contents: Vec<RequestContent>,
}

impl GenerateRequest {
    /// A single user turn carrying `text`.
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user".to_string(),
                parts: vec![Part { text: text.into() }],
            }],
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

/// Response parts may omit `text` (e.g. inline data), so it stays optional here.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ResponsePart {
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<CandidateContent>,
}

/// Response body: `{ candidates: [{ content: { parts: [{ text }] } }] }`.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

impl GenerateResponse {
    /// The first candidate's first text fragment, if it is present and non-empty.
    pub fn first_text(&self) -> Option<&str> {
        self.candidates
            .first()?
            .content
            .as_ref()?
            .parts
            .first()?
            .text
            .as_deref()
            .filter(|text| !text.is_empty())
    }
}

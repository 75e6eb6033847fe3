//! Parsing of loosely formatted model output into fixed shapes.
//!
//! Models wrap answers in prose and markdown fencing no matter how firmly
//! the prompt asks them not to. All tolerance for that lives here, in one
//! shape-tagged abstraction, instead of ad hoc string surgery at each
//! call site.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::GenAiError;

/// Expected shape of a model response, selected per orchestrator.
#[derive(Debug, Clone, Copy)]
pub enum ResponseShape {
    /// The trimmed raw text is the result.
    FreeText,
    /// A comma-separated list of indices into a candidate list of the
    /// given length.
    IndexList { candidates: usize },
    /// A JSON object with `reply` and `sentiment` keys.
    ReplyWithSentiment,
}

/// A successfully extracted response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extracted {
    Text(String),
    Indices(Vec<usize>),
    Reply { reply: String, sentiment: Sentiment },
}

/// Sentiment classification of a user message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl Sentiment {
    pub fn parse(label: &str) -> Result<Self, GenAiError> {
        match label.trim().to_ascii_uppercase().as_str() {
            "POSITIVE" => Ok(Sentiment::Positive),
            "NEGATIVE" => Ok(Sentiment::Negative),
            "NEUTRAL" => Ok(Sentiment::Neutral),
            other => Err(GenAiError::UnrecognizedLabel(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "POSITIVE",
            Sentiment::Negative => "NEGATIVE",
            Sentiment::Neutral => "NEUTRAL",
        }
    }
}

impl ResponseShape {
    pub fn parse(&self, raw: &str) -> Result<Extracted, GenAiError> {
        match *self {
            ResponseShape::FreeText => {
                let text = raw.trim();
                if text.is_empty() {
                    return Err(GenAiError::EmptyText);
                }
                Ok(Extracted::Text(text.to_string()))
            }
            ResponseShape::IndexList { candidates } => {
                Ok(Extracted::Indices(extract_indices(raw, candidates)))
            }
            ResponseShape::ReplyWithSentiment => {
                let body = extract_json_object(raw).ok_or(GenAiError::EmptyText)?;
                let parsed: ModelReply =
                    serde_json::from_str(&body).map_err(|_| GenAiError::EmptyText)?;
                let sentiment = Sentiment::parse(&parsed.sentiment)?;
                Ok(Extracted::Reply {
                    reply: parsed.reply,
                    sentiment,
                })
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct ModelReply {
    reply: String,
    sentiment: String,
}

static FENCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[a-zA-Z]*").expect("invalid fence regex"));

/// Longest comma-separated digit run, e.g. "0, 2, 9" inside surrounding
/// prose. Falls back to a single bare integer.
static INDEX_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d+(?:\s*,\s*\d+)*").expect("invalid index-list regex"));

fn strip_code_fences(raw: &str) -> String {
    FENCE_RE.replace_all(raw, "").trim().to_string()
}

/// Extract indices into a candidate list of length `candidates`.
///
/// Out-of-range indices are dropped. Duplicates keep their first
/// occurrence only, so the result preserves the order the model chose
/// while staying usable as a selection set.
fn extract_indices(raw: &str, candidates: usize) -> Vec<usize> {
    let cleaned = strip_code_fences(raw);

    let list = INDEX_LIST_RE
        .find_iter(&cleaned)
        .max_by_key(|m| m.as_str().len())
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut seen = vec![false; candidates];
    let mut indices = Vec::new();
    for token in list.split(',') {
        let Ok(idx) = token.trim().parse::<usize>() else {
            continue;
        };
        if idx < candidates && !seen[idx] {
            seen[idx] = true;
            indices.push(idx);
        }
    }
    indices
}

/// Pull the first JSON object out of a response that may wrap it in
/// fencing or prose.
fn extract_json_object(raw: &str) -> Option<String> {
    let cleaned = strip_code_fences(raw);
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    if end < start {
        return None;
    }
    Some(cleaned[start..=end].to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn free_text_trims_and_rejects_blank() {
        let parsed = ResponseShape::FreeText.parse("  What caused the war?  \n").unwrap();
        assert_eq!(parsed, Extracted::Text("What caused the war?".to_string()));

        let err = ResponseShape::FreeText.parse("   \n\t").unwrap_err();
        assert!(matches!(err, GenAiError::EmptyText));
    }

    #[test]
    fn index_extraction_drops_out_of_range_and_duplicates() {
        let parsed = ResponseShape::IndexList { candidates: 5 }
            .parse("0, 2, 9, 2")
            .unwrap();
        assert_eq!(parsed, Extracted::Indices(vec![0, 2]));
    }

    #[test]
    fn index_extraction_tolerates_prose_and_fencing() {
        let raw = "Sure! The suitable recipes are:\n```\n1, 3, 4\n```\nEnjoy.";
        let parsed = ResponseShape::IndexList { candidates: 5 }.parse(raw).unwrap();
        assert_eq!(parsed, Extracted::Indices(vec![1, 3, 4]));
    }

    #[test]
    fn index_extraction_handles_single_index_and_none() {
        let parsed = ResponseShape::IndexList { candidates: 3 }.parse("2").unwrap();
        assert_eq!(parsed, Extracted::Indices(vec![2]));

        let parsed = ResponseShape::IndexList { candidates: 3 }
            .parse("None of these are suitable.")
            .unwrap();
        assert_eq!(parsed, Extracted::Indices(vec![]));
    }

    #[test]
    fn reply_with_sentiment_strips_json_fences() {
        let raw = "```json\n{\"reply\": \"Glad to help!\", \"sentiment\": \"POSITIVE\"}\n```";
        let parsed = ResponseShape::ReplyWithSentiment.parse(raw).unwrap();
        assert_eq!(
            parsed,
            Extracted::Reply {
                reply: "Glad to help!".to_string(),
                sentiment: Sentiment::Positive,
            }
        );
    }

    #[test]
    fn unknown_sentiment_label_is_rejected() {
        let raw = "{\"reply\": \"hm\", \"sentiment\": \"ANGRY\"}";
        let err = ResponseShape::ReplyWithSentiment.parse(raw).unwrap_err();
        assert!(matches!(err, GenAiError::UnrecognizedLabel(label) if label == "ANGRY"));
    }

    #[test]
    fn malformed_reply_object_is_empty_text() {
        let err = ResponseShape::ReplyWithSentiment
            .parse("no json here")
            .unwrap_err();
        assert!(matches!(err, GenAiError::EmptyText));
    }

    #[test]
    fn sentiment_labels_round_trip() {
        for label in ["POSITIVE", "NEGATIVE", "NEUTRAL"] {
            assert_eq!(Sentiment::parse(label).unwrap().as_str(), label);
        }
        assert_eq!(Sentiment::parse("negative").unwrap(), Sentiment::Negative);
    }
}

//! Request and response shapes of the `generateContent` endpoint, plus the
//! reply interpretation.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    http::error::{LookupError, TransportKind},
    lyrics::{LyricsResult, Source},
};

const NOT_FOUND_SENTINEL: &str = "not_found";

pub fn build_prompt(query: &str) -> String {
    format!(
        "Find the complete, original lyrics of the song \"{query}\". \
         Reply with a single JSON object and nothing else. \
         If you found the lyrics, reply {{\"lyrics\": \"<the full lyrics, one line per line break>\"}}. \
         If you cannot find them, reply {{\"error\": \"{NOT_FOUND_SENTINEL}\"}}."
    )
}

#[derive(Debug, Serialize)]
pub struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct Tool {
    google_search: GoogleSearch,
}

#[derive(Debug, Serialize)]
struct GoogleSearch {}

impl<'a> GenerateRequest<'a> {
    /// Search grounding is enabled so the reply can carry citations.
    pub fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            tools: vec![Tool {
                google_search: GoogleSearch {},
            }],
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    grounding_metadata: Option<GroundingMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<GroundingChunk>,
}

#[derive(Debug, Deserialize)]
struct GroundingChunk {
    web: Option<WebChunk>,
}

#[derive(Debug, Deserialize)]
struct WebChunk {
    uri: Option<String>,
    title: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
    #[serde(default)]
    details: Vec<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    reason: Option<String>,
}

impl ErrorBody {
    fn has_reason(&self, reason: &str) -> bool {
        self.details
            .iter()
            .any(|d| d.reason.as_deref() == Some(reason))
    }
}

impl GenerateResponse {
    fn reply_text(&self) -> String {
        self.candidates
            .first()
            .and_then(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .unwrap_or_default()
    }

    fn sources(&self) -> Vec<Source> {
        let mut sources: Vec<Source> = Vec::new();
        let chunks = self
            .candidates
            .first()
            .and_then(|c| c.grounding_metadata.as_ref())
            .map(|m| m.grounding_chunks.as_slice())
            .unwrap_or_default();

        for web in chunks.iter().filter_map(|c| c.web.as_ref()) {
            let Some(uri) = web.uri.as_deref().filter(|u| !u.is_empty()) else {
                continue;
            };
            if sources.iter().any(|s| s.uri == uri) {
                continue;
            }
            sources.push(Source {
                uri: uri.to_string(),
                title: web.title.clone(),
            });
        }
        sources
    }
}

/// Removes a surrounding markdown code fence, language tag included.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(start) = trimmed.find("```") else {
        return trimmed;
    };
    let after = &trimmed[start + 3..];
    let body = match after.find('\n') {
        Some(newline) => &after[newline + 1..],
        None => after,
    };
    match body.rfind("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

/// Turns a successful reply into lyrics. Any JSON that does not carry usable
/// lyrics counts as "not found"; text that is not JSON is a parse failure.
pub fn interpret_reply(query: &str, response: GenerateResponse) -> Result<LyricsResult, LookupError> {
    let text = response.reply_text();
    if text.trim().is_empty() {
        return Err(LookupError::NotFound(query.to_string()));
    }

    let value: Value = serde_json::from_str(strip_code_fence(&text))
        .map_err(|e| LookupError::transport(TransportKind::Parse, e.to_string()))?;

    let lyrics = value
        .get("lyrics")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|l| !l.is_empty() && !l.eq_ignore_ascii_case(NOT_FOUND_SENTINEL));

    match lyrics {
        Some(lyrics) => {
            let result = LyricsResult::from_text(lyrics, response.sources());
            if result.is_empty() {
                Err(LookupError::NotFound(query.to_string()))
            } else {
                Ok(result)
            }
        }
        None => Err(LookupError::NotFound(query.to_string())),
    }
}

/// Maps a non-success HTTP reply using the structured error body.
pub fn classify_error(status: u16, body: &str) -> LookupError {
    let Ok(ErrorEnvelope { error }) = serde_json::from_str::<ErrorEnvelope>(body) else {
        return LookupError::transport(TransportKind::Service, format!("HTTP {status}"));
    };

    let kind = if error.has_reason("API_KEY_INVALID") {
        TransportKind::InvalidCredential
    } else if error.has_reason("SERVICE_DISABLED")
        || error.has_reason("ACCESS_TOKEN_SCOPE_INSUFFICIENT")
    {
        TransportKind::ServiceDisabled
    } else {
        TransportKind::Service
    };

    let detail = match (error.status, error.message) {
        (Some(status_name), Some(message)) => format!("HTTP {status} {status_name}: {message}"),
        (None, Some(message)) => format!("HTTP {status}: {message}"),
        (Some(status_name), None) => format!("HTTP {status} {status_name}"),
        (None, None) => format!("HTTP {status}"),
    };

    LookupError::transport(kind, detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> GenerateResponse {
        serde_json::from_value(value).unwrap()
    }

    fn reply(text: &str) -> GenerateResponse {
        response(json!({
            "candidates": [{ "content": { "role": "model", "parts": [{ "text": text }] } }]
        }))
    }

    #[test]
    fn request_enables_search_grounding() {
        let body = serde_json::to_value(GenerateRequest::new("hello")).unwrap();
        assert_eq!(
            body,
            json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hello" }] }],
                "tools": [{ "google_search": {} }]
            })
        );
    }

    #[test]
    fn prompt_mentions_query_and_sentinel() {
        let prompt = build_prompt("Imagine - John Lennon");
        assert!(prompt.contains("\"Imagine - John Lennon\""));
        assert!(prompt.contains(r#"{"error": "not_found"}"#));
    }

    #[test]
    fn strips_fences_with_and_without_language_tag() {
        assert_eq!(strip_code_fence("```json\n{\"a\":1}\n```"), "{\"a\":1}");
        assert_eq!(strip_code_fence("```\n{\"a\":1}```\n"), "{\"a\":1}");
        assert_eq!(strip_code_fence("  {\"a\":1} "), "{\"a\":1}");
        assert_eq!(strip_code_fence("Sure!\n```json\n{}\n```"), "{}");
    }

    #[test]
    fn found_lyrics_are_split_into_lines() {
        let text = "```json\n{\"lyrics\": \"Imagine there's no heaven\\nIt's easy if you try\"}\n```";
        let result = interpret_reply("Imagine", reply(text)).unwrap();
        assert_eq!(
            result.lines,
            vec!["Imagine there's no heaven", "It's easy if you try"]
        );
        assert!(result.sources.is_empty());
    }

    #[test]
    fn text_split_across_parts_is_joined() {
        let value = json!({
            "candidates": [{ "content": { "parts": [
                { "text": "{\"lyrics\": \"la " },
                { "text": "la\"}" }
            ] } }]
        });
        let result = interpret_reply("q", response(value)).unwrap();
        assert_eq!(result.lines, vec!["la la"]);
    }

    #[test]
    fn error_field_and_other_shapes_are_not_found() {
        for text in [
            r#"{"error": "not_found"}"#,
            r#"{"lyrics": "NOT_FOUND"}"#,
            r#"{"lyrics": "   "}"#,
            r#"{"song": "something"}"#,
            r#"[1, 2, 3]"#,
        ] {
            assert_eq!(
                interpret_reply("asdkjhasd", reply(text)),
                Err(LookupError::NotFound("asdkjhasd".into())),
                "{text}"
            );
        }
        assert_eq!(
            interpret_reply("q", GenerateResponse::default()),
            Err(LookupError::NotFound("q".into()))
        );
    }

    #[test]
    fn prose_reply_is_a_parse_failure() {
        let err = interpret_reply("q", reply("I could not find that song, sorry.")).unwrap_err();
        assert!(matches!(
            err,
            LookupError::Transport {
                kind: TransportKind::Parse,
                ..
            }
        ));
    }

    #[test]
    fn grounding_chunks_become_unique_sources() {
        let value = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "{\"lyrics\": \"line\"}" }] },
                "groundingMetadata": { "groundingChunks": [
                    { "web": { "uri": "https://a.example", "title": "A" } },
                    { "web": { "uri": "https://a.example", "title": "A again" } },
                    { "web": { "uri": "https://b.example" } },
                    { "retrievedContext": {} },
                    { "web": { "uri": "" } }
                ] }
            }]
        });
        let result = interpret_reply("q", response(value)).unwrap();
        assert_eq!(
            result.sources,
            vec![
                Source {
                    uri: "https://a.example".into(),
                    title: Some("A".into())
                },
                Source {
                    uri: "https://b.example".into(),
                    title: None
                },
            ]
        );
    }

    #[test]
    fn invalid_key_is_classified_from_details() {
        let body = json!({
            "error": {
                "code": 400,
                "message": "API key not valid. Please pass a valid API key.",
                "status": "INVALID_ARGUMENT",
                "details": [{
                    "@type": "type.googleapis.com/google.rpc.ErrorInfo",
                    "reason": "API_KEY_INVALID",
                    "domain": "googleapis.com"
                }]
            }
        })
        .to_string();

        match classify_error(400, &body) {
            LookupError::Transport { kind, detail } => {
                assert_eq!(kind, TransportKind::InvalidCredential);
                assert!(detail.starts_with("HTTP 400 INVALID_ARGUMENT"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn disabled_service_and_unknown_bodies() {
        let disabled = json!({
            "error": { "code": 403, "status": "PERMISSION_DENIED",
                       "details": [{ "reason": "SERVICE_DISABLED" }] }
        })
        .to_string();
        assert!(matches!(
            classify_error(403, &disabled),
            LookupError::Transport {
                kind: TransportKind::ServiceDisabled,
                ..
            }
        ));

        assert_eq!(
            classify_error(502, "<html>Bad gateway</html>"),
            LookupError::transport(TransportKind::Service, "HTTP 502")
        );
    }
}

pub mod error;
pub mod wire;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::{config::ApiConfig, lyrics::LyricsResult};

use error::{LookupError, TransportKind};
use wire::{GenerateRequest, GenerateResponse};

/// The remote lyrics service, as seen by the controller.
#[async_trait]
pub trait LyricsLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<LyricsResult, LookupError>;
}

pub struct ApiService {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

impl ApiService {
    pub fn new(config: &ApiConfig) -> color_eyre::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
        })
    }

    pub fn has_credential(&self) -> bool {
        self.api_key.is_some()
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LyricsLookup for ApiService {
    async fn lookup(&self, query: &str) -> Result<LyricsResult, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(LookupError::Config);
        };

        let prompt = wire::build_prompt(query);
        info!(model = %self.model, "Requesting lyrics for '{}'", query);

        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", api_key)
            .json(&GenerateRequest::new(&prompt))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = wire::classify_error(status.as_u16(), &body);
            warn!("Lyrics request failed: {}", err);
            return Err(err);
        }

        let parsed: GenerateResponse = serde_json::from_str(&body)
            .map_err(|e| LookupError::transport(TransportKind::Parse, e.to_string()))?;

        let result = wire::interpret_reply(query, parsed);
        match &result {
            Ok(lyrics) => info!(
                "Found {} lines ({} sources) for '{}'",
                lyrics.lines.len(),
                lyrics.sources.len(),
                query
            ),
            Err(e) => info!("No lyrics for '{}': {}", query, e),
        }
        result
    }
}

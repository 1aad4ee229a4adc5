//! Client for the words (normalization) service.
//!
//! Both the update and search services normalize phrases through this
//! client, so it lives here rather than in either service crate.

use async_trait::async_trait;

use crate::rpc::{error_from_response, WordsReply};
use crate::{Error, Result};

/// Turns a free-form phrase into an ordered list of keyword stems.
#[async_trait]
pub trait Normalizer: Send + Sync {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>>;

    async fn ping(&self) -> Result<()>;
}

/// HTTP client for the words service.
pub struct WordsClient {
    http: reqwest::Client,
    base: String,
}

impl WordsClient {
    pub fn new(address: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(|err| Error::Internal(anyhow::anyhow!("failed to build client: {err}")))?;
        Ok(Self {
            http,
            base: base_url(address),
        })
    }
}

/// Accept both `host:port` config values and full URLs.
pub(crate) fn base_url(address: &str) -> String {
    let trimmed = address.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

#[async_trait]
impl Normalizer for WordsClient {
    async fn norm(&self, phrase: &str) -> Result<Vec<String>> {
        let resp = self
            .http
            .get(format!("{}/norm", self.base))
            .query(&[("phrase", phrase)])
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }

        let reply: WordsReply = resp.json().await?;
        Ok(reply.words)
    }

    async fn ping(&self) -> Result<()> {
        let resp = self.http.get(format!("{}/ping", self.base)).send().await?;
        if !resp.status().is_success() {
            return Err(Error::Unavailable(format!(
                "words service replied {}",
                resp.status()
            )));
        }
        Ok(())
    }
}

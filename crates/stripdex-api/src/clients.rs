//! HTTP clients for the update and search services.

use std::time::Duration;

use async_trait::async_trait;

use stripdex_core::rpc::{error_from_response, ComicsReply, StatusReply};
use stripdex_core::{Comic, Error, Result, ServiceStats, UpdateStatus};

use crate::ports::{Pinger, Searcher, Updater};

fn build_http() -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(5))
        .build()
        .map_err(|err| Error::Internal(anyhow::anyhow!("failed to build client: {err}")))
}

fn base_url(address: &str) -> String {
    let trimmed = address.trim_end_matches('/');
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    }
}

async fn ping_base(http: &reqwest::Client, base: &str) -> Result<()> {
    let resp = http.get(format!("{base}/ping")).send().await?;
    if !resp.status().is_success() {
        return Err(Error::Unavailable(format!(
            "backend replied {}",
            resp.status()
        )));
    }
    Ok(())
}

/// Client for the update service.
pub struct UpdateClient {
    http: reqwest::Client,
    base: String,
}

impl UpdateClient {
    pub fn new(address: &str) -> Result<Self> {
        Ok(Self {
            http: build_http()?,
            base: base_url(address),
        })
    }
}

#[async_trait]
impl Pinger for UpdateClient {
    async fn ping(&self) -> Result<()> {
        ping_base(&self.http, &self.base).await
    }
}

#[async_trait]
impl Updater for UpdateClient {
    async fn update(&self) -> Result<()> {
        let resp = self
            .http
            .post(format!("{}/update", self.base))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }

    async fn status(&self) -> Result<UpdateStatus> {
        let resp = self
            .http
            .get(format!("{}/status", self.base))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let reply: StatusReply = resp.json().await?;
        Ok(reply.status)
    }

    async fn stats(&self) -> Result<ServiceStats> {
        let resp = self
            .http
            .get(format!("{}/stats", self.base))
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let stats: ServiceStats = resp.json().await?;
        Ok(stats)
    }

    async fn drop_all(&self) -> Result<()> {
        let resp = self.http.delete(format!("{}/db", self.base)).send().await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        Ok(())
    }
}

/// Client for the search service.
pub struct SearchClient {
    http: reqwest::Client,
    base: String,
}

impl SearchClient {
    pub fn new(address: &str) -> Result<Self> {
        Ok(Self {
            http: build_http()?,
            base: base_url(address),
        })
    }

    async fn call_search(&self, path: &str, phrase: &str, limit: i64) -> Result<Vec<Comic>> {
        let resp = self
            .http
            .get(format!("{}/{path}", self.base))
            .query(&[("phrase", phrase), ("limit", &limit.to_string())])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(error_from_response(resp).await);
        }
        let reply: ComicsReply = resp.json().await?;
        Ok(reply.comics)
    }
}

#[async_trait]
impl Pinger for SearchClient {
    async fn ping(&self) -> Result<()> {
        ping_base(&self.http, &self.base).await
    }
}

#[async_trait]
impl Searcher for SearchClient {
    async fn search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>> {
        self.call_search("search", phrase, limit).await
    }

    async fn index_search(&self, phrase: &str, limit: i64) -> Result<Vec<Comic>> {
        self.call_search("isearch", phrase, limit).await
    }
}

/// The words service only takes part in the gateway's ping fan-out.
pub struct WordsPinger(pub stripdex_core::WordsClient);

#[async_trait]
impl Pinger for WordsPinger {
    async fn ping(&self) -> Result<()> {
        use stripdex_core::Normalizer;
        self.0.ping().await
    }
}

//! HTTP client for the external XKCD-style catalog.
//!
//! The catalog serves `GET <base>/<id>/info.0.json` per strip and the same
//! document without an id for the current issue. A 404 means the id does not
//! exist; gaps in the id space are legal.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;

use stripdex_core::{Error, Result};

use crate::service::Catalog;

/// One catalog strip with its searchable text already assembled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogItem {
    pub id: i64,
    pub url: String,
    pub description: String,
}

/// Client for the catalog's JSON endpoints.
pub struct XkcdClient {
    http: reqwest::Client,
    base: String,
}

#[derive(Debug, Deserialize)]
struct StripInfo {
    num: i64,
    #[serde(default)]
    img: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    safe_title: String,
    #[serde(default)]
    transcript: String,
    #[serde(default)]
    alt: String,
}

impl StripInfo {
    /// The searchable text is everything the strip says about itself.
    fn description(&self) -> String {
        [&self.title, &self.safe_title, &self.transcript, &self.alt]
            .iter()
            .filter(|part| !part.is_empty())
            .map(|part| part.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl XkcdClient {
    pub fn new(url: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| Error::Internal(anyhow::anyhow!("failed to build client: {err}")))?;
        Ok(Self {
            http,
            base: url.trim_end_matches('/').to_string(),
        })
    }

    async fn fetch_info(&self, path: &str) -> Result<StripInfo> {
        let resp = self
            .http
            .get(format!("{}/{path}", self.base))
            .send()
            .await?;

        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(Error::NotFound);
        }
        if !resp.status().is_success() {
            return Err(Error::Unavailable(format!(
                "catalog replied {}",
                resp.status()
            )));
        }

        let info: StripInfo = resp.json().await?;
        Ok(info)
    }
}

#[async_trait]
impl Catalog for XkcdClient {
    async fn get(&self, id: i64) -> Result<CatalogItem> {
        let info = self.fetch_info(&format!("{id}/info.0.json")).await?;
        Ok(CatalogItem {
            id: info.num,
            url: info.img.clone(),
            description: info.description(),
        })
    }

    async fn last_id(&self) -> Result<i64> {
        let info = self.fetch_info("info.0.json").await?;
        Ok(info.num)
    }
}

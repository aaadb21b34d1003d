//! IPFS HTTP-API adapter.
//!
//! Talks to a node's RPC API for writes and maintenance (`/api/v0/add`,
//! `/api/v0/pin/rm`, `/api/v0/block/rm`, `/api/v0/repo/gc`) and to its
//! gateway for reads (`GET /ipfs/{cid}`). All requests carry the client's
//! bounded timeout; transport failures surface as `Unavailable`.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::{BlobStoreError, BlobStoreResult};
use crate::store::BlobStore;

/// Configuration for an [`IpfsBlobStore`].
#[derive(Clone, Debug)]
pub struct IpfsConfig {
    /// RPC API base URL (e.g., "http://127.0.0.1:5001").
    pub api_url: String,

    /// Gateway base URL for content reads (e.g., "http://127.0.0.1:8080").
    pub gateway_url: String,

    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for IpfsConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:5001".to_string(),
            gateway_url: "http://127.0.0.1:8080".to_string(),
            timeout_secs: 30,
        }
    }
}

/// [`BlobStore`] backed by an IPFS node.
pub struct IpfsBlobStore {
    client: Client,
    config: IpfsConfig,
}

#[derive(Deserialize)]
struct AddResponse {
    #[serde(rename = "Hash")]
    hash: String,
}

impl IpfsBlobStore {
    pub fn new(config: IpfsConfig) -> BlobStoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| BlobStoreError::Backend(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { client, config })
    }

    /// Issues an RPC command taking the CID as its `arg` parameter.
    async fn rpc(&self, command: &str, cid: &str) -> BlobStoreResult<()> {
        let url = format!("{}/api/v0/{command}", self.config.api_url);
        let response = self
            .client
            .post(&url)
            .query(&[("arg", cid)])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(BlobStoreError::Backend(format!(
                "{command} failed with {status}: {body}"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl BlobStore for IpfsBlobStore {
    async fn put(&self, bytes: &[u8]) -> BlobStoreResult<String> {
        let url = format!("{}/api/v0/add", self.config.api_url);
        let part = reqwest::multipart::Part::bytes(bytes.to_vec()).file_name("blob");
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self.client.post(&url).multipart(form).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            return Err(BlobStoreError::Backend(format!(
                "add failed with {status}"
            )));
        }

        let added: AddResponse = response.json().await?;
        debug!("added blob to IPFS as {}", added.hash);
        Ok(added.hash)
    }

    async fn get(&self, content_hash: &str) -> BlobStoreResult<Vec<u8>> {
        let url = format!("{}/ipfs/{content_hash}", self.config.gateway_url);
        let response = self.client.get(&url).send().await?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Err(BlobStoreError::NotFound(content_hash.to_string()));
        }
        if !response.status().is_success() {
            let status = response.status();
            return Err(BlobStoreError::Backend(format!(
                "gateway fetch failed with {status}"
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }

    async fn unpin(&self, content_hash: &str) -> BlobStoreResult<()> {
        self.rpc("pin/rm", content_hash).await
    }

    async fn remove_block(&self, content_hash: &str) -> BlobStoreResult<()> {
        self.rpc("block/rm", content_hash).await
    }

    async fn garbage_collect(&self) -> BlobStoreResult<()> {
        let url = format!("{}/api/v0/repo/gc", self.config.api_url);
        let response = self.client.post(&url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            return Err(BlobStoreError::Backend(format!(
                "repo gc failed with {status}"
            )));
        }
        Ok(())
    }
}

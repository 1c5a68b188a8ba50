//! anaconda.org HTTP API client.

use super::HostingApi;
use crate::artifact::ArtifactRecord;
use crate::error::{HostingError, Result};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::Deserialize;

/// Public anaconda.org API
pub const DEFAULT_API_URL: &str = "https://api.anaconda.org";

#[derive(Debug, Deserialize)]
struct ChannelInfo {
    #[serde(default)]
    files: Vec<ChannelFile>,
}

#[derive(Debug, Deserialize)]
struct ChannelFile {
    full_name: String,
}

/// Authenticated API client
#[derive(Debug, Clone)]
pub struct AnacondaClient {
    http: reqwest::Client,
    base_url: String,
}

impl AnacondaClient {
    /// Client for `base_url` authenticating with `token`
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let mut auth = HeaderValue::from_str(&format!("token {}", token)).map_err(|e| {
            HostingError::Request {
                url: base_url.to_string(),
                reason: format!("invalid API key: {}", e),
            }
        })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("condaci/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// URL listing a channel
    pub fn channel_url(&self, user: &str, channel: &str) -> String {
        format!("{}/channels/{}/{}", self.base_url, user, channel)
    }

    /// URL of a single distribution file
    pub fn dist_url(&self, record: &ArtifactRecord) -> String {
        format!(
            "{}/dist/{}/{}/{}/{}",
            self.base_url, record.user, record.name, record.version, record.basename
        )
    }

    async fn check(method: &str, url: &str, response: reqwest::Response) -> Result<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(HostingError::Status {
            method: method.to_string(),
            url: url.to_string(),
            status: status.as_u16(),
            body,
        }
        .into())
    }
}

impl HostingApi for AnacondaClient {
    async fn channel_files(&self, user: &str, channel: &str) -> Result<Vec<String>> {
        let url = self.channel_url(user, channel);
        log::debug!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .send()
            .await
            .map_err(|e| HostingError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        let response = Self::check("GET", &url, response).await?;

        let info: ChannelInfo = response.json().await.map_err(|e| HostingError::Decode {
            url: url.clone(),
            reason: e.to_string(),
        })?;

        Ok(info.files.into_iter().map(|f| f.full_name).collect())
    }

    async fn remove_file(&self, record: &ArtifactRecord) -> Result<()> {
        let url = self.dist_url(record);
        log::debug!("DELETE {}", url);

        let response = self
            .http
            .delete(&url)
            .send()
            .await
            .map_err(|e| HostingError::Request {
                url: url.clone(),
                reason: e.to_string(),
            })?;
        Self::check("DELETE", &url, response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_urls() {
        let client = AnacondaClient::new("https://api.example.org/", "k").unwrap();
        assert_eq!(
            client.channel_url("acme", "master"),
            "https://api.example.org/channels/acme/master"
        );

        let record =
            ArtifactRecord::parse("acme/widget/1.0+1.abc/linux-64/widget-1.0+1.abc-py27.tar.bz2")
                .unwrap();
        assert_eq!(
            client.dist_url(&record),
            "https://api.example.org/dist/acme/widget/1.0+1.abc/linux-64/widget-1.0+1.abc-py27.tar.bz2"
        );
    }

    #[test]
    fn test_channel_listing_shape() {
        let info: ChannelInfo = serde_json::from_str(
            r#"{"files": [{"full_name": "acme/widget/1.0/linux-64/widget-1.0-py27.tar.bz2", "size": 10}]}"#,
        )
        .unwrap();
        assert_eq!(info.files.len(), 1);

        let empty: ChannelInfo = serde_json::from_str("{}").unwrap();
        assert!(empty.files.is_empty());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(AnacondaClient::new(DEFAULT_API_URL, "bad\nkey").is_err());
    }
}

use crate::{
    address::WalletAddress,
    errors::{PortfolioError, ASSETS_FALLBACK_MESSAGE},
    json_client::JsonClient,
};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, error, info};

const UNTITLED_ASSET: &str = "Untitled Asset";

/// One IP asset as the search backend returns it. Fields this crate does
/// not interpret are kept in `extra` and serialized back unchanged.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AssetRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_derivative: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Audio,
    Image,
}

impl AssetRecord {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title)
            .or_else(|| non_empty(&self.name))
            .unwrap_or(UNTITLED_ASSET)
    }

    /// How the media URL should be presented; `None` when there is no media.
    pub fn media_kind(&self) -> Option<MediaKind> {
        non_empty(&self.media_url)?;

        let media_type = self.media_type.as_deref().unwrap_or_default();
        if media_type.starts_with("video") {
            Some(MediaKind::Video)
        } else if media_type.starts_with("audio") {
            Some(MediaKind::Audio)
        } else {
            Some(MediaKind::Image)
        }
    }

    pub fn origin_label(&self) -> &'static str {
        if self.is_derivative.unwrap_or(false) {
            "Remix"
        } else {
            "Original"
        }
    }

    /// Stable key for list rendering: the IP id, or the list position.
    pub fn render_key(&self, index: usize) -> String {
        non_empty(&self.ip_id)
            .map(str::to_string)
            .unwrap_or_else(|| index.to_string())
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|it| !it.is_empty())
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct OwnerQuery<'a> {
    owner_address: &'a str,
}

#[derive(Deserialize)]
struct AssetsResponse {
    #[serde(default)]
    results: Option<Vec<AssetRecord>>,
}

/// Looks up the IP assets owned by a wallet.
#[derive(Clone, Debug)]
pub struct AssetFetcher {
    client: JsonClient,
}

impl AssetFetcher {
    pub fn new(client: JsonClient) -> Self {
        Self { client }
    }

    pub async fn fetch(&self, owner: &WalletAddress) -> Result<Vec<AssetRecord>, PortfolioError> {
        let url = self.client.endpoint();
        debug!(owner = %owner, url = %url, "Requesting owned IP assets");

        let reply = self
            .client
            .post(&OwnerQuery {
                owner_address: owner.as_str(),
            })
            .await
            .map_err(|e| {
                error!(owner = %owner, error = %e, "IP assets request failed");
                PortfolioError::asset_lookup(format!("Network error: {e}"))
            })?;

        if !reply.is_success() {
            let message = reply
                .str_field("message")
                .unwrap_or(ASSETS_FALLBACK_MESSAGE);

            error!(
                owner = %owner,
                status = %reply.status,
                response_body = %reply.text,
                "IP assets lookup responded with an error"
            );

            return Err(PortfolioError::asset_lookup(message));
        }

        let response: AssetsResponse = reply
            .parse(url)
            .map_err(|e| PortfolioError::asset_lookup(format!("Invalid IP assets response: {e}")))?;

        let assets = response.results.unwrap_or_default();
        info!(owner = %owner.abbreviated(), count = assets.len(), "Fetched owned IP assets");

        Ok(assets)
    }
}

use std::sync::{Arc, RwLock};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::types::UiError;

use super::api::{
    ConnectionsResponse, DeviceConfig, FolderConfig, FolderStatusQuery, Gui, Options,
    PingResponse, SyncthingConfig,
};
use super::helpers::{candidate_base_urls, load_api_key};
use super::models::{FolderStatus, SyncthingOverview};
use super::rest_api::RestApi;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(8);

/// REST client for a local Syncthing daemon.
///
/// Clones share the cached configuration snapshot.
#[derive(Clone)]
pub struct SyncthingClient {
    api_key: String,
    http: Client,
    base_url: String,
    cache: Arc<RwLock<Option<CachedConfig>>>,
}

struct CachedConfig {
    config: SyncthingConfig,
    my_id: Option<String>,
}

impl SyncthingClient {
    /// Discover a Syncthing instance using config/env and prepare an HTTP client.
    /// The first candidate URL that answers a ping is kept.
    pub async fn discover(config: &Config) -> Result<Self, UiError> {
        let api_key = load_api_key(config).await?;
        let base_urls = candidate_base_urls(config);

        let mut fallback = None;
        for base_url in base_urls {
            let client = Self::with_base_url(api_key.clone(), base_url)?;
            match client.ping().await {
                Ok(()) => {
                    info!(url = %client.base_url, "Syncthing REST API reachable");
                    return Ok(client);
                }
                Err(err) => {
                    debug!(url = %client.base_url, error = ?err, "Syncthing REST API not reachable");
                    fallback.get_or_insert(client);
                }
            }
        }

        fallback.ok_or_else(|| UiError::Config("No Syncthing API URL candidates".to_string()))
    }

    pub fn with_base_url(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, UiError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .danger_accept_invalid_certs(true)
            .build()?;

        Ok(Self {
            api_key: api_key.into(),
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache: Arc::new(RwLock::new(None)),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub async fn ping(&self) -> Result<(), UiError> {
        let response: PingResponse = self.get_json("/rest/system/ping").await?;
        if response.is_pong() {
            Ok(())
        } else {
            Err(UiError::Syncthing(format!(
                "unexpected ping reply: {}",
                response.ping
            )))
        }
    }

    /// Refreshes the cached configuration snapshot.
    pub async fn load_config(&self) -> Result<(), UiError> {
        let status: Value = self.get_json("/rest/system/status").await?;
        let config: SyncthingConfig = self.get_json("/rest/config").await?;
        let my_id = status
            .get("myID")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string());

        debug!(
            folders = config.folders.len(),
            devices = config.devices.len(),
            "Loaded Syncthing config"
        );
        match self.cache.write() {
            Ok(mut guard) => *guard = Some(CachedConfig { config, my_id }),
            Err(_) => return Err(UiError::Config("config cache poisoned".to_string())),
        }
        Ok(())
    }

    fn with_cache<T>(&self, read: impl FnOnce(&CachedConfig) -> T) -> Option<T> {
        let guard = self.cache.read().ok()?;
        guard.as_ref().map(read)
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_json<T>(&self, path: &str) -> Result<T, UiError>
    where
        T: DeserializeOwned,
    {
        self.get_json_with_query(path, &()).await
    }

    async fn get_json_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, UiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self
            .http
            .get(self.url(path))
            .header("X-API-Key", &self.api_key)
            .query(query)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UiError::Syncthing(format!(
                "{} returned {}",
                path,
                response.status()
            )));
        }

        Ok(response.json::<T>().await?)
    }

    async fn put_json<B>(&self, path: &str, body: &B) -> Result<(), UiError>
    where
        B: Serialize + ?Sized,
    {
        let response = self
            .http
            .put(self.url(path))
            .header("X-API-Key", &self.api_key)
            .json(body)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(UiError::Syncthing(format!(
                "Failed to update {}: {}",
                path,
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl RestApi for SyncthingClient {
    fn is_config_loaded(&self) -> bool {
        self.with_cache(|_| ()).is_some()
    }

    fn folders(&self) -> Option<Vec<FolderConfig>> {
        self.with_cache(|cached| {
            let mut folders = cached.config.folders.clone();
            folders.sort_by_key(|f| f.display_label().to_lowercase());
            folders
        })
    }

    fn devices(&self, include_local: bool) -> Option<Vec<DeviceConfig>> {
        self.with_cache(|cached| {
            let mut devices: Vec<DeviceConfig> = cached
                .config
                .devices
                .iter()
                .filter(|device| !device.device_id.is_empty())
                .filter(|device| {
                    include_local || cached.my_id.as_deref() != Some(device.device_id.as_str())
                })
                .cloned()
                .collect();
            devices.sort_by_key(|d| d.display_name().to_lowercase());
            devices
        })
    }

    fn options(&self) -> Option<Options> {
        self.with_cache(|cached| cached.config.options.clone())
    }

    fn gui(&self) -> Option<Gui> {
        self.with_cache(|cached| cached.config.gui.clone())
    }

    async fn folder_status(&self, folder: &FolderConfig) -> Result<FolderStatus, UiError> {
        let query = FolderStatusQuery {
            folder: folder.id.as_str(),
        };
        let status: Value = self.get_json_with_query("/rest/db/status", &query).await?;
        Ok(FolderStatus::from_value(
            folder.paused.unwrap_or(false),
            &status,
        ))
    }

    async fn connections(&self) -> Result<ConnectionsResponse, UiError> {
        self.get_json("/rest/system/connections").await
    }

    async fn system_status(&self) -> Result<SyncthingOverview, UiError> {
        let status: Value = self.get_json("/rest/system/status").await?;
        let version: Option<Value> = match self.get_json("/rest/system/version").await {
            Ok(value) => Some(value),
            Err(err) => {
                warn!(error = ?err, "Failed to fetch Syncthing version");
                None
            }
        };
        Ok(SyncthingOverview::from_value(&status, version.as_ref()))
    }

    async fn edit_settings(&self, gui: &Gui, options: &Options) -> Result<(), UiError> {
        self.put_json("/rest/config/gui", gui).await?;
        self.put_json("/rest/config/options", options).await?;

        if let Ok(mut guard) = self.cache.write() {
            if let Some(cached) = guard.as_mut() {
                cached.config.gui = gui.clone();
                cached.config.options = options.clone();
            }
        }
        info!(ur_accepted = options.ur_accepted, "Updated Syncthing settings");
        Ok(())
    }

    async fn usage_report(&self) -> Result<String, UiError> {
        let report: Value = self.get_json("/rest/svc/report").await?;
        Ok(serde_json::to_string_pretty(&report)?)
    }
}

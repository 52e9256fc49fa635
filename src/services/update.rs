use reqwest::Url;
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Lifecycle of a new app version
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateStatus {
    #[default]
    NoUpdate,
    /// A new worker is downloading its assets
    UpdateInstalling,
    /// A new version is cached and waiting for the user
    UpdateReady,
    /// The user asked to switch; waiting for the new worker to take control
    Activating,
}

/// Signals from the worker registration and the user
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum UpdateEvent {
    UpdateFound,
    WorkerInstalled { has_controller: bool },
    /// A worker from a previous visit is already waiting
    WaitingWorkerFound,
    ActivateRequested,
    ControllerChanged { has_controller: bool },
}

/// What the page should do in response to an event
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UpdateAction {
    None,
    ShowUpdatePulse,
    /// Post `{"action":"skipWaiting"}` to the waiting worker
    PostSkipWaiting,
    StillDownloading,
    UpToDate,
    Reload,
}

/// Update state machine with a one-shot reload guard
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct UpdateController {
    status: UpdateStatus,
    reload_issued: bool,
}

impl UpdateController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> UpdateStatus {
        self.status
    }

    pub fn handle(&mut self, event: UpdateEvent) -> UpdateAction {
        use UpdateAction as A;
        use UpdateStatus as S;

        let (next, action) = match (self.status, event) {
            (S::Activating, UpdateEvent::UpdateFound) => (S::Activating, A::None),
            (_, UpdateEvent::UpdateFound) => (S::UpdateInstalling, A::None),

            (S::UpdateInstalling, UpdateEvent::WorkerInstalled { has_controller: true }) => {
                (S::UpdateReady, A::ShowUpdatePulse)
            }
            // First install: nothing older to replace
            (S::UpdateInstalling, UpdateEvent::WorkerInstalled { has_controller: false }) => {
                (S::NoUpdate, A::None)
            }
            (status, UpdateEvent::WorkerInstalled { .. }) => (status, A::None),

            (S::NoUpdate | S::UpdateInstalling, UpdateEvent::WaitingWorkerFound) => {
                (S::UpdateReady, A::ShowUpdatePulse)
            }
            (status, UpdateEvent::WaitingWorkerFound) => (status, A::None),

            (S::UpdateReady, UpdateEvent::ActivateRequested) => (S::Activating, A::PostSkipWaiting),
            (S::UpdateInstalling, UpdateEvent::ActivateRequested) => {
                (S::UpdateInstalling, A::StillDownloading)
            }
            (S::NoUpdate, UpdateEvent::ActivateRequested) => (S::NoUpdate, A::UpToDate),
            // Nothing is waiting any more: fall back to a plain reload
            (S::Activating, UpdateEvent::ActivateRequested) => {
                self.reload_issued = true;
                (S::NoUpdate, A::Reload)
            }

            (_, UpdateEvent::ControllerChanged { has_controller }) => {
                if has_controller && !self.reload_issued {
                    self.reload_issued = true;
                    (S::NoUpdate, A::Reload)
                } else {
                    (self.status, A::None)
                }
            }
        };

        if next != self.status {
            tracing::info!(from = ?self.status, to = ?next, event = ?event, "Update status changed");
        }
        self.status = next;
        action
    }

    /// A `skipWaiting` message activates the waiting worker, which then
    /// takes control of the page
    pub fn handle_message(&mut self, message: &WorkerMessage) -> UpdateAction {
        if !message.is_skip_waiting() {
            return UpdateAction::None;
        }

        match self.status {
            UpdateStatus::UpdateReady | UpdateStatus::Activating => {
                self.handle(UpdateEvent::ControllerChanged {
                    has_controller: true,
                })
            }
            UpdateStatus::NoUpdate | UpdateStatus::UpdateInstalling => UpdateAction::None,
        }
    }
}

/// How the offline worker answers a request
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FetchStrategy {
    /// Catalog API calls are never served from cache
    NetworkOnly,
    /// App assets come from the network, falling back to the cache offline
    NetworkFirst,
}

/// Message telling a waiting worker to activate
pub const SKIP_WAITING: &str = "skipWaiting";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WorkerMessage {
    pub action: String,
}

impl WorkerMessage {
    pub fn is_skip_waiting(&self) -> bool {
        self.action == SKIP_WAITING
    }
}

/// Asset-cache policy of the offline worker
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CachePolicy {
    /// Versioned cache name; bumping it invalidates every older cache
    pub cache_name: String,
    /// Assets cached on install
    pub assets: Vec<String>,
    /// Requests whose URL contains this host bypass the cache
    pub api_host: String,
}

impl CachePolicy {
    pub fn new(cache_name: impl Into<String>, api_host: impl Into<String>) -> Self {
        Self {
            cache_name: cache_name.into(),
            assets: ["./", "./index.html", "./style.css", "./app.js", "./manifest.json"]
                .iter()
                .map(|a| a.to_string())
                .collect(),
            api_host: api_host.into(),
        }
    }

    /// Relative or unparsable URLs are app assets
    pub fn strategy_for(&self, url: &str) -> FetchStrategy {
        let is_api = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|host| self.is_api_host(host)))
            .unwrap_or(false);

        if is_api {
            FetchStrategy::NetworkOnly
        } else {
            FetchStrategy::NetworkFirst
        }
    }

    fn is_api_host(&self, host: &str) -> bool {
        !self.api_host.is_empty()
            && (host == self.api_host
                || host
                    .strip_suffix(self.api_host.as_str())
                    .is_some_and(|prefix| prefix.ends_with('.')))
    }

    /// Caches to delete on activation: every one but the current version
    pub fn stale_caches<'a>(&self, existing: &'a [String]) -> Vec<&'a str> {
        existing
            .iter()
            .filter(|name| **name != self.cache_name)
            .map(String::as_str)
            .collect()
    }
}

/// Host of an API base URL without a leading `www.`,
/// e.g. "https://www.omdbapi.com" → "omdbapi.com"
pub fn api_host_of(api_url: &str) -> AppResult<String> {
    let url = Url::parse(api_url)
        .map_err(|e| AppError::InvalidInput(format!("Invalid API URL {}: {}", api_url, e)))?;
    let host = url
        .host_str()
        .ok_or_else(|| AppError::InvalidInput(format!("API URL {} has no host", api_url)))?;

    Ok(host.strip_prefix("www.").unwrap_or(host).to_string())
}

//! Cached Hyperskill session cookie.

use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::core::fetch::HttpClient;

/// Browser-like agent; the profile endpoint only sets a cookie for it.
pub const BROWSER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/134.0.0.0 Safari/537.36";

/// Holds the `sessionid` cookie once obtained. Fetched lazily on first use
/// and reused for the lifetime of the process.
#[derive(Debug, Default)]
pub struct SessionStore {
    session_id: RwLock<Option<String>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached id, if any, without touching the network.
    pub async fn cached(&self) -> Option<String> {
        self.session_id.read().await.clone()
    }

    /// Cached id, or probe `profile_url` for a fresh one.
    pub async fn session_id(&self, http: &HttpClient, profile_url: &str) -> Option<String> {
        if let Some(id) = self.cached().await {
            return Some(id);
        }

        let mut slot = self.session_id.write().await;
        if slot.is_some() {
            return slot.clone();
        }

        let probe = http
            .clone()
            .with_header(reqwest::header::USER_AGENT, BROWSER_AGENT);
        match probe.fetch_cookie(profile_url, "sessionid").await {
            Ok(Some(id)) => {
                info!("Obtained Hyperskill session id");
                *slot = Some(id.clone());
                Some(id)
            }
            Ok(None) => {
                warn!("Hyperskill profile response did not set a session id");
                None
            }
            Err(e) => {
                warn!(error = %e, "Unable to fetch Hyperskill session id");
                None
            }
        }
    }
}

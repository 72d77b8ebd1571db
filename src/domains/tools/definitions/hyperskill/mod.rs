//! Hyperskill topic lookup suite.

mod client;
mod session;
mod topics;

use std::sync::Arc;

use crate::core::config::Config;
use crate::domains::tools::ToolRegistry;

pub use client::HyperskillClient;
pub use session::{BROWSER_AGENT, SessionStore};
pub use topics::{ExplainTopicsTool, FindTopicsTool, TopicsParams};

/// Register the Hyperskill tools around one shared session store.
pub fn register(registry: &mut ToolRegistry, config: &Config) {
    let session = Arc::new(SessionStore::new());
    let client = Arc::new(HyperskillClient::new(
        config.upstreams.hyperskill.clone(),
        session,
    ));
    registry.register(ExplainTopicsTool::new(client.clone()));
    registry.register(FindTopicsTool::new(client));
}

//! Configuration management for the MCP server.
//!
//! Configuration is assembled from defaults, then environment variables
//! (optionally loaded from a `.env` file), then command-line overrides
//! applied by `main`.

use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::{info, warn};

/// Main configuration structure for the MCP server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification and metadata.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Transport configuration.
    pub transport: TransportConfig,

    /// Upstream API credentials.
    pub credentials: CredentialsConfig,

    /// Base URLs of the upstream REST APIs.
    pub upstreams: UpstreamConfig,

    /// Which tool suites are mounted and where their local state lives.
    pub tools: ToolsConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "trace").
    pub level: String,
}

/// Credentials for the upstream APIs that need them.
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    /// thenewsapi.com API token.
    pub news_api_key: Option<String>,

    /// MyLife (Human Remembrance Project) bearer token.
    pub mylife_api_token: Option<String>,

    /// Traction tenant id.
    pub traction_tenant_id: Option<String>,

    /// Traction tenant API key.
    pub traction_api_key: Option<String>,
}

/// Custom Debug implementation to redact secrets from logs.
impl fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("CredentialsConfig")
            .field("news_api_key", &redact(&self.news_api_key))
            .field("mylife_api_token", &redact(&self.mylife_api_token))
            .field("traction_tenant_id", &self.traction_tenant_id)
            .field("traction_api_key", &redact(&self.traction_api_key))
            .finish()
    }
}

/// Base URLs for every upstream. Overridable so tests and self-hosted
/// deployments can point a suite elsewhere.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpstreamConfig {
    pub news: String,
    pub ipwho: String,
    pub open_meteo: String,
    pub worldtime: String,
    pub restcountries: String,
    pub openfoodfacts: String,
    pub anymile: String,
    pub mylife: String,
    pub hyperskill: String,
    pub arxiv: String,
    /// Traction tenant API. There is no public default.
    pub traction: Option<String>,
    /// Base for `?oob=` invitation links; falls back to `traction`.
    pub traction_invitation: Option<String>,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            news: "https://api.thenewsapi.com/v1/news".to_string(),
            ipwho: "https://ipwho.is".to_string(),
            open_meteo: "https://api.open-meteo.com".to_string(),
            worldtime: "http://worldtimeapi.org".to_string(),
            restcountries: "https://restcountries.com".to_string(),
            openfoodfacts: "https://world.openfoodfacts.org".to_string(),
            anymile: "https://api.poc.anymile.io/api/v1/mcp/public".to_string(),
            mylife: "https://humanremembranceproject.org/api/v1".to_string(),
            hyperskill: "https://hyperskill.org".to_string(),
            arxiv: "http://export.arxiv.org/api/query".to_string(),
            traction: None,
            traction_invitation: None,
        }
    }
}

impl UpstreamConfig {
    /// Apply `MCP_<SERVICE>_URL` overrides.
    fn apply_env(&mut self) {
        let overrides: [(&str, &mut String); 10] = [
            ("MCP_NEWS_URL", &mut self.news),
            ("MCP_IPWHO_URL", &mut self.ipwho),
            ("MCP_OPEN_METEO_URL", &mut self.open_meteo),
            ("MCP_WORLDTIME_URL", &mut self.worldtime),
            ("MCP_RESTCOUNTRIES_URL", &mut self.restcountries),
            ("MCP_OPENFOODFACTS_URL", &mut self.openfoodfacts),
            ("MCP_ANYMILE_URL", &mut self.anymile),
            ("MCP_MYLIFE_URL", &mut self.mylife),
            ("MCP_HYPERSKILL_URL", &mut self.hyperskill),
            ("MCP_ARXIV_URL", &mut self.arxiv),
        ];
        for (var, slot) in overrides {
            if let Some(url) = env_non_empty(var) {
                info!("{} overridden to {}", var, url);
                *slot = url;
            }
        }

        self.traction = env_non_empty("MCP_TRACTION_URL").or(self.traction.take());
        self.traction_invitation =
            env_non_empty("MCP_TRACTION_INVITATION_URL").or(self.traction_invitation.take());
    }
}

/// Tool suites that can be mounted on the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Suite {
    News,
    Geo,
    Nutrition,
    Anymile,
    Mylife,
    Hyperskill,
    Arxiv,
    Wallet,
    Inventory,
    Memory,
    Latex,
    Ufmr,
}

impl Suite {
    pub const ALL: [Suite; 12] = [
        Suite::News,
        Suite::Geo,
        Suite::Nutrition,
        Suite::Anymile,
        Suite::Mylife,
        Suite::Hyperskill,
        Suite::Arxiv,
        Suite::Wallet,
        Suite::Inventory,
        Suite::Memory,
        Suite::Latex,
        Suite::Ufmr,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Suite::News => "news",
            Suite::Geo => "geo",
            Suite::Nutrition => "nutrition",
            Suite::Anymile => "anymile",
            Suite::Mylife => "mylife",
            Suite::Hyperskill => "hyperskill",
            Suite::Arxiv => "arxiv",
            Suite::Wallet => "wallet",
            Suite::Inventory => "inventory",
            Suite::Memory => "memory",
            Suite::Latex => "latex",
            Suite::Ufmr => "ufmr",
        }
    }

    /// Parse a comma-separated list. Unknown names are an error; `all`
    /// selects every suite.
    pub fn parse_list(input: &str) -> Result<Vec<Suite>, String> {
        let mut suites = Vec::new();
        for name in input.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            if name.eq_ignore_ascii_case("all") {
                return Ok(Suite::ALL.to_vec());
            }
            let suite = name.parse::<Suite>()?;
            if !suites.contains(&suite) {
                suites.push(suite);
            }
        }
        Ok(suites)
    }
}

impl fmt::Display for Suite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Suite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        Suite::ALL
            .into_iter()
            .find(|suite| suite.as_str() == lower)
            .ok_or_else(|| format!("unknown tool suite '{s}'"))
    }
}

/// Tool-suite selection and local state locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolsConfig {
    /// Suites registered at start-up, in this order.
    pub suites: Vec<Suite>,

    /// Where arXiv papers are downloaded.
    pub papers_dir: PathBuf,

    /// Inventory CSV file.
    pub inventory_path: PathBuf,

    /// Memory store JSON file.
    pub memory_path: PathBuf,

    /// Docker image providing `xelatex`.
    pub latex_image: String,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        let papers_dir = dirs::home_dir()
            .map(|home| home.join("Downloads").join("arxiv_papers"))
            .unwrap_or_else(|| PathBuf::from("arxiv_papers"));
        Self {
            suites: Suite::ALL.to_vec(),
            papers_dir,
            inventory_path: PathBuf::from("inventory.csv"),
            memory_path: PathBuf::from("memory_store.json"),
            latex_image: "danteev/texlive".to_string(),
        }
    }
}

impl ToolsConfig {
    pub fn is_enabled(&self, suite: Suite) -> bool {
        self.suites.contains(&suite)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: "api-toolbox".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
            transport: TransportConfig::default(),
            credentials: CredentialsConfig::default(),
            upstreams: UpstreamConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `MCP_`. A `.env` file in the
    /// working directory is read first if present.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Some(name) = env_non_empty("MCP_SERVER_NAME") {
            config.server.name = name;
        }

        if let Some(level) = env_non_empty("MCP_LOG_LEVEL") {
            config.logging.level = level;
        }

        config.transport = TransportConfig::from_env();
        config.upstreams.apply_env();

        config.credentials.news_api_key = env_non_empty("MCP_NEWS_API_KEY");
        config.credentials.mylife_api_token = env_non_empty("MCP_MYLIFE_API_TOKEN");
        config.credentials.traction_tenant_id = env_non_empty("MCP_TRACTION_TENANT_ID");
        config.credentials.traction_api_key = env_non_empty("MCP_TRACTION_API_KEY");

        if config.credentials.news_api_key.is_none() {
            warn!("MCP_NEWS_API_KEY not set - news requests are sent without an api_token");
        }

        if let Some(suites) = env_non_empty("MCP_SUITES") {
            match Suite::parse_list(&suites) {
                Ok(list) => config.tools.suites = list,
                Err(e) => warn!("Ignoring MCP_SUITES ({}); all suites stay enabled", e),
            }
        }

        if let Some(dir) = env_non_empty("MCP_PAPERS_DIR") {
            config.tools.papers_dir = expand_home(&dir);
        }
        if let Some(path) = env_non_empty("MCP_INVENTORY_CSV") {
            config.tools.inventory_path = expand_home(&path);
        }
        if let Some(path) = env_non_empty("MCP_MEMORY_FILE") {
            config.tools.memory_path = expand_home(&path);
        }
        if let Some(image) = env_non_empty("MCP_LATEX_IMAGE") {
            config.tools.latex_image = image;
        }

        config
    }
}

fn env_non_empty(var: &str) -> Option<String> {
    std::env::var(var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        return dirs::home_dir().unwrap_or_else(|| PathBuf::from(path));
    }
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

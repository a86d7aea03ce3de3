use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

const DEFAULT_CONFIG_FILES: &[&str] = &[
    "eventdesk.toml",
    "config/eventdesk.toml",
    "crates/config/eventdesk.toml",
    "../eventdesk.toml",
    "../config/eventdesk.toml",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    pub address: String,
    pub port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 7070,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://eventdesk.db".to_string(),
            max_connections: 10,
        }
    }
}

/// Bearer tokens accepted by the HTTP API.
///
/// An empty token list leaves the API open, which is only meant for local
/// development.
///
/// ```
/// use eventdesk_config::AuthConfig;
///
/// let auth = AuthConfig::default();
/// assert!(auth.api_tokens.is_empty());
/// assert!(!auth.is_enforced());
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(default)]
    pub api_tokens: Vec<String>,
}

impl AuthConfig {
    pub fn is_enforced(&self) -> bool {
        !self.api_tokens.is_empty()
    }

    pub fn accepts(&self, token: &str) -> bool {
        self.api_tokens.iter().any(|candidate| candidate == token)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    #[serde(default = "CacheConfig::default_view_ttl")]
    pub view_ttl_seconds: u64,
}

impl CacheConfig {
    const fn default_view_ttl() -> u64 {
        60
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            view_ttl_seconds: Self::default_view_ttl(),
        }
    }
}

/// Load the application configuration by combining defaults, files, and environment overrides.
///
/// ```
/// use eventdesk_config::load;
///
/// std::env::remove_var("EVENTDESK_CONFIG");
///
/// let config = load().expect("configuration should load with defaults");
/// assert!(!config.http.address.is_empty());
/// ```
pub fn load() -> anyhow::Result<AppConfig> {
    let defaults = AppConfig::default();

    let view_ttl = i64::try_from(defaults.cache.view_ttl_seconds).unwrap_or(i64::MAX);

    let mut builder = config::Config::builder()
        .set_default("http.address", defaults.http.address.clone())?
        .set_default("http.port", i64::from(defaults.http.port))?
        .set_default("database.url", defaults.database.url.clone())?
        .set_default(
            "database.max_connections",
            i64::from(defaults.database.max_connections),
        )?
        .set_default("auth.api_tokens", Vec::<String>::new())?
        .set_default("cache.view_ttl_seconds", view_ttl)?;

    let environment_overrides = config::Environment::with_prefix("EVENTDESK")
        .separator("__")
        .list_separator(",")
        .with_list_parse_key("auth.api_tokens")
        .try_parsing(true);

    let mut config_file_attached = false;

    if let Ok(path) = std::env::var("EVENTDESK_CONFIG") {
        builder = builder.add_source(config::File::from(PathBuf::from(&path)));
        config_file_attached = true;
        debug!(path, "loading configuration via EVENTDESK_CONFIG");
    } else if let Ok(cwd) = std::env::current_dir() {
        let fallback = DEFAULT_CONFIG_FILES
            .iter()
            .map(|candidate| cwd.join(candidate))
            .find(|path| path.exists());

        if let Some(path) = fallback {
            debug!(path = %path.display(), "loading configuration file");
            builder = builder.add_source(config::File::from(path));
            config_file_attached = true;
        }
    }

    if !config_file_attached {
        debug!("no configuration file found, relying on defaults and environment overrides");
    }

    builder = builder.add_source(environment_overrides);

    let cfg = builder.build().context("unable to build configuration")?;

    let config = cfg
        .try_deserialize::<AppConfig>()
        .context("invalid configuration")?;

    debug!(
        address = %config.http.address,
        port = config.http.port,
        database = %config.database.url,
        auth_enforced = config.auth.is_enforced(),
        "loaded backend configuration"
    );
    Ok(config)
}

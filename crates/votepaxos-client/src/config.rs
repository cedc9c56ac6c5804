use std::env;
use std::time::Duration;

use thiserror::Error;
use url::Url;

pub const DEFAULT_SERVER: &str = "http://127.0.0.1:4000";
pub const DEFAULT_REALTIME_PATH: &str = "/api/realtime";
/// Phoenix channel serializer version spoken on the socket.
pub const PROTOCOL_VSN: &str = "2.0.0";

/// Where the session identity comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum IdentitySource {
    /// Ask the backend via `POST /api/preflight`.
    #[default]
    Preflight,
    /// Use a caller-supplied identity and skip preflight.
    Fixed(String),
    /// Mint a random identity locally and skip preflight.
    Generated,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid server url '{url}': {source}")]
    InvalidServer {
        url: String,
        source: url::ParseError,
    },
    #[error("server url must use http or https, got '{0}'")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base HTTP url of the backend; REST paths are appended under `/api`.
    pub server: Url,
    pub realtime_path: String,
    /// Default timeout for channel pushes.
    pub rpc_timeout: Duration,
    pub join_timeout: Duration,
    pub heartbeat_interval: Duration,
    pub identity: IdentitySource,
}

impl ClientConfig {
    pub fn new(server: &str) -> Result<Self, ConfigError> {
        Ok(Self {
            server: parse_server(server)?,
            ..Self::default()
        })
    }

    /// Load configuration from `VOTEPAXOS_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let server = env::var("VOTEPAXOS_SERVER").unwrap_or_else(|_| DEFAULT_SERVER.to_string());
        let mut config = Self::new(&server)?;

        if let Some(ms) = env_u64("VOTEPAXOS_RPC_TIMEOUT_MS") {
            config.rpc_timeout = Duration::from_millis(ms);
        }
        if let Some(ms) = env_u64("VOTEPAXOS_JOIN_TIMEOUT_MS") {
            config.join_timeout = Duration::from_millis(ms);
        }
        if let Some(secs) = env_u64("VOTEPAXOS_HEARTBEAT_SECS") {
            config.heartbeat_interval = Duration::from_secs(secs);
        }
        if let Ok(path) = env::var("VOTEPAXOS_REALTIME_PATH") {
            config.realtime_path = path;
        }

        let skip_preflight = env::var("VOTEPAXOS_SKIP_PREFLIGHT")
            .map(|value| value == "1" || value.eq_ignore_ascii_case("true"))
            .unwrap_or(false);
        config.identity = match env::var("VOTEPAXOS_IDENTITY") {
            Ok(id) if !id.trim().is_empty() => IdentitySource::Fixed(id),
            _ if skip_preflight => IdentitySource::Generated,
            _ => IdentitySource::Preflight,
        };
        Ok(config)
    }

    pub fn with_identity(mut self, identity: IdentitySource) -> Self {
        self.identity = identity;
        self
    }

    pub fn with_rpc_timeout(mut self, timeout: Duration) -> Self {
        self.rpc_timeout = timeout;
        self
    }

    /// WebSocket url for the realtime endpoint, parameterised by identity:
    /// `ws(s)://host/api/realtime/websocket?id=<identity>&vsn=2.0.0`.
    pub fn realtime_url(&self, identity: &str) -> Url {
        let mut url = self.server.clone();
        let scheme = if url.scheme() == "https" { "wss" } else { "ws" };
        // http -> ws and https -> wss are always permitted by the url crate
        let _ = url.set_scheme(scheme);

        let base_path = url.path().trim_end_matches('/').to_string();
        let realtime = self.realtime_path.trim_matches('/');
        url.set_path(&format!("{base_path}/{realtime}/websocket"));
        url.query_pairs_mut()
            .clear()
            .append_pair("id", identity)
            .append_pair("vsn", PROTOCOL_VSN);
        url
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server: Url::parse(DEFAULT_SERVER).expect("default server url is valid"),
            realtime_path: DEFAULT_REALTIME_PATH.to_string(),
            rpc_timeout: Duration::from_secs(10),
            join_timeout: Duration::from_secs(10),
            heartbeat_interval: Duration::from_secs(30),
            identity: IdentitySource::Preflight,
        }
    }
}

fn parse_server(server: &str) -> Result<Url, ConfigError> {
    // Normalize localhost to IPv4 so a backend bound to 127.0.0.1 is reachable
    let server = server.trim().replacen("://localhost", "://127.0.0.1", 1);
    let url = Url::parse(&server).map_err(|source| ConfigError::InvalidServer {
        url: server.clone(),
        source,
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

fn env_u64(var: &str) -> Option<u64> {
    env::var(var).ok().and_then(|value| value.trim().parse().ok())
}

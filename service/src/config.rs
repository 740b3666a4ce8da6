use clap::builder::TypedValueParser as _;
use clap::Parser;
use dotenvy::dotenv;
use log::LevelFilter;
use sse::SessionConfig;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

const DEFAULT_NATS_URL: &str = "nats://127.0.0.1:4222";

#[derive(Clone, Debug, PartialEq)]
pub enum RustEnv {
    Development,
    Production,
    Staging,
}

#[derive(Debug, PartialEq, Eq)]
pub struct RustEnvParseError;

impl FromStr for RustEnv {
    type Err = RustEnvParseError;
    fn from_str(level: &str) -> Result<RustEnv, Self::Err> {
        match level.to_lowercase().as_str() {
            "development" => Ok(RustEnv::Development),
            "production" => Ok(RustEnv::Production),
            "staging" => Ok(RustEnv::Staging),
            _ => Err(RustEnvParseError),
        }
    }
}

impl fmt::Display for RustEnv {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RustEnv::Development => write!(f, "development"),
            RustEnv::Production => write!(f, "production"),
            RustEnv::Staging => write!(f, "staging"),
        }
    }
}

/// Which backbone implementation the gateway fronts.
#[derive(Clone, Debug, PartialEq)]
pub enum BackboneKind {
    Nats,
    /// In-process broker, for local development.
    Memory,
}

#[derive(Debug, PartialEq, Eq)]
pub struct BackboneKindParseError;

impl FromStr for BackboneKind {
    type Err = BackboneKindParseError;
    fn from_str(kind: &str) -> Result<BackboneKind, Self::Err> {
        match kind.to_lowercase().as_str() {
            "nats" => Ok(BackboneKind::Nats),
            "memory" => Ok(BackboneKind::Memory),
            _ => Err(BackboneKindParseError),
        }
    }
}

impl fmt::Display for BackboneKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BackboneKind::Nats => write!(f, "nats"),
            BackboneKind::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Clone, Debug, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// A list of full CORS origin URLs that allowed to receive server responses.
    #[arg(
        long,
        env,
        value_delimiter = ',',
        use_value_delimiter = true,
        default_value = "http://localhost:3000,https://localhost:3000"
    )]
    pub allowed_origins: Vec<String>,

    /// The messaging backbone to front.
    #[arg(
        long,
        env,
        default_value_t = BackboneKind::Nats,
        value_parser = clap::builder::PossibleValuesParser::new(["nats", "memory", "NATS", "MEMORY"])
            .map(|s| s.parse::<BackboneKind>().unwrap()),
    )]
    pub backbone: BackboneKind,

    /// Sets the NATS server URL to connect to
    #[arg(long, env, default_value = DEFAULT_NATS_URL)]
    nats_url: String,

    /// Key-value buckets to create on start when running the in-memory backbone.
    #[arg(long, env, value_delimiter = ',', use_value_delimiter = true)]
    kv_buckets: Vec<String>,

    /// Subject grants as `credential=pattern` pairs. Patterns may use `*` and `>`.
    /// The credential is the verbatim value of the Authorization request header.
    #[arg(long, env, value_delimiter = ',', use_value_delimiter = true)]
    permissions: Vec<String>,

    /// The host interface to listen for incoming connections
    #[arg(short, long, env, default_value = "127.0.0.1")]
    pub interface: Option<String>,

    /// The host TCP port to listen for incoming connections
    #[arg(short, long, env, default_value_t = 8080)]
    pub port: u16,

    /// Seconds between keepalive pings on an idle stream
    #[arg(long, env, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub keepalive_interval_secs: u64,

    /// Upper bound in seconds of one subscription poll; also bounds stream shutdown latency
    #[arg(long, env, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub poll_timeout_secs: u64,

    /// Seconds to wait for the reply to a request before failing it
    #[arg(long, env, default_value_t = 3, value_parser = clap::value_parser!(u64).range(1..))]
    pub request_timeout_secs: u64,

    /// Capacity of each stream's output channel
    #[arg(long, env, default_value_t = 64)]
    pub stream_channel_capacity: usize,

    /// Set the log level verbosity threshold (level) to control what gets displayed on console output
    #[arg(
        short,
        long,
        env,
        default_value_t = LevelFilter::Info,
        value_parser = clap::builder::PossibleValuesParser::new(["OFF", "ERROR", "WARN", "INFO", "DEBUG", "TRACE"])
            .map(|s| s.parse::<LevelFilter>().unwrap()),
        )]
    pub log_level_filter: LevelFilter,

    /// Set the Rust runtime environment to use.
    #[arg(
    short,
    long,
    env,
    default_value_t = RustEnv::Development,
    value_parser = clap::builder::PossibleValuesParser::new([
        "DEVELOPMENT", "PRODUCTION", "STAGING",
        "development", "production", "staging"
    ])
        .map(|s| s.parse::<RustEnv>().unwrap()),
    )]
    pub runtime_env: RustEnv,
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

impl Config {
    pub fn new() -> Self {
        // Load .env file first
        dotenv().ok();
        // Then parse the command line parameters and flags
        Config::parse()
    }

    pub fn nats_url(&self) -> &str {
        &self.nats_url
    }

    pub fn kv_buckets(&self) -> &[String] {
        &self.kv_buckets
    }

    pub fn permissions(&self) -> &[String] {
        &self.permissions
    }

    pub fn set_permissions(mut self, permissions: Vec<String>) -> Self {
        self.permissions = permissions;
        self
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            keepalive_interval: Duration::from_secs(self.keepalive_interval_secs),
            poll_timeout: Duration::from_secs(self.poll_timeout_secs),
            channel_capacity: self.stream_channel_capacity,
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn runtime_env(&self) -> RustEnv {
        self.runtime_env.clone()
    }
}

use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::network::DEFAULT_MAX_FRAME_SIZE;
use crate::{Error, Result};

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/server.toml";

/// Prefix of environment overrides, e.g. `ZKP_PORT` or `ZKP_SESSION__READ_TIMEOUT_SECS`.
pub const ENV_PREFIX: &str = "ZKP_";

/// Hard ceiling for the configurable frame limit.
const MAX_FRAME_SIZE_CEILING: usize = 16 * 1024 * 1024;

/// Server configuration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Hostname or IP address to bind to.
    pub host: String,
    /// Port number to listen on.
    pub port: u16,
    /// Per-connection settings.
    pub session: SessionSettings,
}

/// Per-connection settings.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Seconds to wait for each client message. `None` waits forever.
    pub read_timeout_secs: Option<u64>,
    /// Largest accepted frame payload in bytes.
    pub max_frame_size: usize,
}

impl SessionSettings {
    /// Read timeout as a [`Duration`].
    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            read_timeout_secs: None,
            max_frame_size: DEFAULT_MAX_FRAME_SIZE,
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 50051,
            session: SessionSettings::default(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration from `config/server.toml` and environment variables.
    ///
    /// Configuration priority: environment variables > TOML file > defaults.
    #[allow(clippy::result_large_err)]
    pub fn from_env() -> figment::error::Result<Self> {
        Self::from_file(DEFAULT_CONFIG_PATH)
    }

    /// Same as [`ServerConfig::from_env`] with an explicit TOML file.
    ///
    /// A missing file is not an error.
    #[allow(clippy::result_large_err)]
    pub fn from_file(path: impl AsRef<Path>) -> figment::error::Result<Self> {
        use figment::providers::{Env, Format, Serialized, Toml};
        use figment::Figment;

        Figment::from(Serialized::defaults(Self::default()))
            .merge(Toml::file(path.as_ref()))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
    }

    /// Converts host and port into a socket address.
    pub fn addr(&self) -> Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| Error::InvalidConfig(format!("invalid listen address: {e}")))
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        self.addr()?;

        if self.session.max_frame_size == 0 {
            return Err(Error::InvalidConfig(
                "max_frame_size must be greater than zero".to_string(),
            ));
        }

        if self.session.max_frame_size > MAX_FRAME_SIZE_CEILING {
            return Err(Error::InvalidConfig(format!(
                "max_frame_size must not exceed {MAX_FRAME_SIZE_CEILING} bytes"
            )));
        }

        if self.session.read_timeout_secs == Some(0) {
            return Err(Error::InvalidConfig(
                "read_timeout_secs must be greater than zero; omit it to disable".to_string(),
            ));
        }

        Ok(())
    }
}

use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use tracing::warn;

const BIND_ADDRESS_VAR: &str = "CAMPAIGN_BIND_ADDRESS";
const DATABASE_PATH_VAR: &str = "CAMPAIGN_DATABASE_PATH";
const MAX_CONNECTIONS_VAR: &str = "CAMPAIGN_MAX_CONNECTIONS";

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub bind_address: String,
    pub database_path: PathBuf,
    pub max_connections: u32,
}

impl Default for ServerConfig {
    fn default() -> ServerConfig {
        ServerConfig {
            bind_address: "127.0.0.1:8000".to_string(),
            database_path: PathBuf::from("database.db"),
            max_connections: 5,
        }
    }
}

impl ServerConfig {
    /// Reads overrides from the environment, keeping the default for any
    /// variable that is unset, fails to parse or is out of range.
    pub fn from_env() -> ServerConfig {
        let defaults = ServerConfig::default();

        ServerConfig {
            bind_address: env::var(BIND_ADDRESS_VAR).unwrap_or(defaults.bind_address),
            database_path: env::var(DATABASE_PATH_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.database_path),
            max_connections: parse_var(MAX_CONNECTIONS_VAR, defaults.max_connections, |&n| n > 0),
        }
    }
}

fn parse_var<T, F>(name: &str, default: T, is_valid: F) -> T
where
    T: FromStr + Copy,
    F: Fn(&T) -> bool,
{
    match env::var(name) {
        Ok(value) => value.parse().ok().filter(is_valid).unwrap_or_else(|| {
            warn!("ignoring invalid value for {}: {:?}", name, value);
            default
        }),
        Err(_) => default,
    }
}

use anyhow::Context;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;

const DEFAULT_RPC_PORT: u16 = 9000;

#[derive(Debug)]
pub struct Config {
    database_url: String,
    amqp_url: String,
    queue_name: String,
    rpc_port: u16,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process environment.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required(&lookup, "DATABASE_URL")?,
            amqp_url: required(&lookup, "AMQP_URL")?,
            queue_name: required(&lookup, "QUEUE_NAME")?,
            rpc_port: optional(&lookup, "RPC_PORT")?.unwrap_or(DEFAULT_RPC_PORT),
        })
    }

    #[must_use]
    pub fn database_url(&self) -> &str {
        &self.database_url
    }

    #[must_use]
    pub fn amqp_url(&self) -> &str {
        &self.amqp_url
    }

    #[must_use]
    pub fn queue_name(&self) -> &str {
        &self.queue_name
    }

    #[must_use]
    pub const fn rpc_port(&self) -> u16 {
        self.rpc_port
    }

    /// Address the RPC server listens on, all interfaces.
    #[must_use]
    pub fn rpc_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::UNSPECIFIED, self.rpc_port))
    }
}

fn required<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    optional(lookup, key)?.with_context(|| format!("Missing environment variable {key}"))
}

fn optional<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> anyhow::Result<Option<T>>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.parse::<T>()
                .with_context(|| format!("Invalid value {raw:?} for environment variable {key}"))
        })
        .transpose()
}

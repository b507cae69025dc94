use error_stack::{Report, Result};
use serde::Deserialize;
use std::net::{IpAddr, Ipv4Addr};

use super::ParseError;
use crate::util::figment::FigmentErrorAttachable;

#[derive(Debug, Deserialize)]
pub struct Server {
    /// Address the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `ROSTER_IP`
    #[serde(default = "Server::default_ip")]
    pub ip: IpAddr,
    /// Port the HTTP server binds to.
    ///
    /// **Environment variables**:
    /// - `ROSTER_PORT`
    #[serde(default = "Server::default_port")]
    pub port: u16,
    /// Amount of HTTP worker threads.
    ///
    /// **Environment variables**:
    /// - `ROSTER_WORKERS`
    #[serde(default = "Server::default_workers")]
    pub workers: usize,
    pub db: super::Database,
    pub auth: super::Auth,
}

impl Server {
    const MIN_JWT_SECRET_LEN: usize = 12;

    pub fn load() -> Result<Self, ParseError> {
        dotenvy::dotenv().ok();

        let config = Self::figment()
            .extract::<Self>()
            .map_err(|e| Report::new(ParseError).attach_figment_error(e))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<(), ParseError> {
        if self.auth.jwt_secret.as_str().len() < Self::MIN_JWT_SECRET_LEN {
            return Err(Report::new(ParseError).attach_printable(format!(
                "auth.jwt_secret must be at least {} characters long",
                Self::MIN_JWT_SECRET_LEN
            )));
        }
        if self.db.primary.url.as_str().is_empty() {
            return Err(Report::new(ParseError).attach_printable("db.primary.url must not be empty"));
        }
        Ok(())
    }
}

impl Server {
    const DEFAULT_CONFIG_FILE: &'static str = "roster.yml";

    fn default_ip() -> IpAddr {
        IpAddr::V4(Ipv4Addr::LOCALHOST)
    }

    const fn default_port() -> u16 {
        3000
    }

    fn default_workers() -> usize {
        std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1)
    }

    /// Creates the default [`figment::Figment`] used to load server
    /// configuration. This function is there for implementing
    /// [`Server::load`] and testing.
    pub(crate) fn figment() -> figment::Figment {
        use figment::providers::{Env, Format, Yaml};
        use figment::Figment;

        Figment::new()
            .merge(Yaml::file(Self::DEFAULT_CONFIG_FILE))
            // The env provider cannot tell which underscores separate
            // segments, so fields with underscores in their own names
            // get spelled out.
            .merge(Env::prefixed("ROSTER_").map(|v| match v.as_str() {
                "DB_PRIMARY_MIN_IDLE" => "db.primary.min_idle".into(),
                "DB_PRIMARY_POOL_SIZE" => "db.primary.pool_size".into(),

                "DB_REPLICA_MIN_IDLE" => "db.replica.min_idle".into(),
                "DB_REPLICA_POOL_SIZE" => "db.replica.pool_size".into(),

                "DB_ENFORCE_TLS" => "db.enforce_tls".into(),
                "DB_TIMEOUT_SECS" => "db.timeout_secs".into(),

                "AUTH_JWT_SECRET" => "auth.jwt_secret".into(),
                "AUTH_TOKEN_EXPIRES" => "auth.token_expires".into(),

                _ => v.as_str().replace('_', ".").into(),
            }))
            // Environment variable aliases
            .merge(Env::raw().map(|v| match v.as_str() {
                "DATABASE_URL" => "db.primary.url".into(),
                "JWT_SECRET" => "auth.jwt_secret".into(),
                "JWT_EXPIRES" => "auth.token_expires".into(),
                _ => v.into(),
            }))
    }
}

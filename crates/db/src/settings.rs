//! Connection settings for the database access layer.
//!
//! Responsibilities:
//! - Hold the username/password/host/port/database tuple used to connect.
//! - Build those settings from secrets (`POSTGRES_USER`, `POSTGRES_PASSWORD`, `POSTGRES_ADDRESS`).
//! - Convert them into sqlx connect options.
//!
//! Invariants:
//! - The password stays wrapped in `SecretString` until handed to sqlx.
//! - Only the PostgreSQL driver is accepted.

use opskit_secrets::{SecretStore, get_secret};
use secrecy::{ExposeSecret, SecretString};
use sqlx::ConnectOptions;
use sqlx::postgres::PgConnectOptions;

use crate::error::{DbError, Result};

pub const SECRET_USER: &str = "POSTGRES_USER";
pub const SECRET_PASSWORD: &str = "POSTGRES_PASSWORD";
/// `host:port` of the server; the port is optional.
pub const SECRET_ADDRESS: &str = "POSTGRES_ADDRESS";

pub const DEFAULT_DRIVER: &str = "postgresql";
pub const DEFAULT_DATABASE: &str = "dvd";

const SUPPORTED_DRIVERS: &[&str] = &["postgresql", "postgres"];

/// Everything needed to open a connection.
#[derive(Debug)]
pub struct DbSettings {
    pub driver: String,
    pub username: String,
    pub password: SecretString,
    pub host: String,
    pub port: Option<u16>,
    pub database: String,
    /// Log every executed statement at debug level.
    pub debug: bool,
}

impl DbSettings {
    /// Reads user, password and address from `store`.
    ///
    /// # Errors
    ///
    /// - `DbError::Secrets` if any of the three secrets is missing or empty.
    /// - `DbError::InvalidAddress` if the address cannot be parsed.
    pub fn from_secrets<S>(store: &S, database: impl Into<String>) -> Result<Self>
    where
        S: SecretStore + ?Sized,
    {
        let username = get_secret(store, SECRET_USER)?.expose_secret().to_string();
        let password = get_secret(store, SECRET_PASSWORD)?;
        let address = get_secret(store, SECRET_ADDRESS)?;
        let (host, port) = parse_address(address.expose_secret())?;

        Ok(Self {
            driver: DEFAULT_DRIVER.to_string(),
            username,
            password,
            host,
            port,
            database: database.into(),
            debug: false,
        })
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn with_driver(mut self, driver: impl Into<String>) -> Self {
        self.driver = driver.into();
        self
    }

    /// Builds sqlx connect options, validating the driver.
    pub fn connect_options(&self) -> Result<PgConnectOptions> {
        if !SUPPORTED_DRIVERS
            .iter()
            .any(|d| d.eq_ignore_ascii_case(&self.driver))
        {
            return Err(DbError::UnsupportedDriver(self.driver.clone()));
        }

        let mut options = PgConnectOptions::new()
            .host(&self.host)
            .username(&self.username)
            .password(self.password.expose_secret())
            .database(&self.database);
        if let Some(port) = self.port {
            options = options.port(port);
        }
        if !self.debug {
            options = options.disable_statement_logging();
        }
        Ok(options)
    }
}

/// Splits `host[:port]`. IPv6 hosts must be bracketed (`[::1]:5432`).
pub fn parse_address(address: &str) -> Result<(String, Option<u16>)> {
    let invalid = |message: &str| DbError::InvalidAddress {
        address: address.to_string(),
        message: message.to_string(),
    };

    let address = address.trim();
    let (host, port) = if let Some(rest) = address.strip_prefix('[') {
        let (host, tail) = rest
            .split_once(']')
            .ok_or_else(|| invalid("unterminated IPv6 bracket"))?;
        match tail {
            "" => (host, None),
            _ => {
                let port = tail
                    .strip_prefix(':')
                    .ok_or_else(|| invalid("expected ':' after IPv6 host"))?;
                (host, Some(port))
            }
        }
    } else {
        match address.split_once(':') {
            Some((host, port)) => (host, Some(port)),
            None => (address, None),
        }
    };

    if host.is_empty() {
        return Err(invalid("host is empty"));
    }
    let port = port
        .map(|p| p.parse::<u16>().map_err(|_| invalid("port must be a number between 0 and 65535")))
        .transpose()?;

    Ok((host.to_string(), port))
}

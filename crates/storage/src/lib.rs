use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use sqlx::{
    sqlite::{SqliteConnectOptions, SqliteConnection},
    AnyConnection, ConnectOptions, Connection,
};
use std::{str::FromStr, time::Duration};
use tracing::debug;
use url::Url;

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

const NETWORK_SCHEMES: [&str; 4] = ["postgres", "postgresql", "mysql", "mariadb"];

/// Everything the user typed at the database prompts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectRequest {
    pub url: String,
    pub username: String,
    pub password: String,
}

impl ConnectRequest {
    pub fn new(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            url: url.into(),
            username: username.into(),
            password: password.into(),
        }
    }
}

/// A single connect attempt. The connection is never kept.
#[async_trait]
pub trait DatabaseProbe: Send + Sync {
    async fn connect(&self, request: &ConnectRequest) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct SqlxProbe {
    connect_timeout: Duration,
}

impl SqlxProbe {
    pub fn new(connect_timeout: Duration) -> Self {
        sqlx::any::install_default_drivers();
        Self { connect_timeout }
    }
}

#[derive(Debug)]
enum Target {
    Sqlite(SqliteConnectOptions),
    Network(Url),
}

#[async_trait]
impl DatabaseProbe for SqlxProbe {
    async fn connect(&self, request: &ConnectRequest) -> Result<()> {
        let target = resolve_target(request)?;

        let attempt = async {
            match target {
                Target::Sqlite(options) => {
                    let connection: SqliteConnection = options.connect().await?;
                    connection.close().await
                }
                Target::Network(url) => {
                    debug!(
                        scheme = url.scheme(),
                        host = url.host_str().unwrap_or_default(),
                        "attempting network database connection"
                    );
                    let connection = AnyConnection::connect(url.as_str()).await?;
                    connection.close().await
                }
            }
        };

        tokio::time::timeout(self.connect_timeout, attempt)
            .await
            .map_err(|_| anyhow!("connect attempt timed out after {:?}", self.connect_timeout))?
            .context("database connect failed")?;
        Ok(())
    }
}

/// Trims the raw input and drops a leading `jdbc:` so JDBC-style URLs work.
pub fn normalize_database_url(raw_database_url: &str) -> String {
    let raw_database_url = raw_database_url.trim();
    raw_database_url
        .strip_prefix("jdbc:")
        .unwrap_or(raw_database_url)
        .to_string()
}

fn resolve_target(request: &ConnectRequest) -> Result<Target> {
    let database_url = normalize_database_url(&request.url);
    if database_url.is_empty() {
        bail!("database url is empty");
    }

    if database_url.starts_with("sqlite:") {
        let options = SqliteConnectOptions::from_str(&database_url)
            .with_context(|| format!("invalid sqlite url '{database_url}'"))?
            .create_if_missing(false);
        return Ok(Target::Sqlite(options));
    }

    let mut url =
        Url::parse(&database_url).with_context(|| format!("invalid database url '{database_url}'"))?;
    if !NETWORK_SCHEMES.contains(&url.scheme()) {
        bail!("unsupported database scheme '{}'", url.scheme());
    }

    if !request.username.is_empty() {
        url.set_username(&request.username)
            .map_err(|()| anyhow!("database url '{database_url}' cannot carry a username"))?;
    }
    if !request.password.is_empty() {
        url.set_password(Some(&request.password))
            .map_err(|()| anyhow!("database url '{database_url}' cannot carry a password"))?;
    }

    Ok(Target::Network(url))
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;

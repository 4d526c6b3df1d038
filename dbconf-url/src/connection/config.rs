//! The normalized configuration record.

use super::{
    ConnectionError, ConnectionResult, DriverFamily, EnvExpander, EnvSource, Normalizer,
};
use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

/// A port as it appeared in the URL.
///
/// Ports decoded from a single-host authority are numeric. Ports from a
/// multi-host authority are kept as their decimal text. A port that does
/// not fit in a `u16` is kept as text rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum Port {
    /// A numeric port.
    Number(u16),
    /// A port carried as text.
    Text(String),
}

impl Port {
    /// Build a numeric port when the text fits in a `u16`, a text port otherwise.
    pub fn parse_lenient(raw: &str) -> Self {
        match raw.parse::<u16>() {
            Ok(n) => Self::Number(n),
            Err(_) => Self::Text(raw.to_string()),
        }
    }

    /// Get the port number, if the port is numeric or numeric text.
    pub fn as_u16(&self) -> Option<u16> {
        match self {
            Self::Number(n) => Some(*n),
            Self::Text(s) => s.parse().ok(),
        }
    }

    /// Convert into the text form.
    pub fn into_text(self) -> Self {
        match self {
            Self::Number(n) => Self::Text(n.to_string()),
            text => text,
        }
    }
}

impl From<u16> for Port {
    fn from(n: u16) -> Self {
        Self::Number(n)
    }
}

impl std::fmt::Display for Port {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// One endpoint of a multi-host URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct HostAddress {
    /// Host name or address.
    pub host: String,
    /// Port, if the entry had one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
}

impl HostAddress {
    /// Create a new host address.
    pub fn new(host: impl Into<String>, port: Option<Port>) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }
}

/// Borrowed view of how a configuration addresses its database.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Addressing<'a> {
    /// A file path.
    File(&'a str),
    /// A list of endpoints.
    Hosts(&'a [HostAddress]),
    /// A single host and optional port.
    Host {
        /// Host name.
        host: &'a str,
        /// Port.
        port: Option<&'a Port>,
    },
    /// The URL carried no address.
    None,
}

/// A database configuration normalized from a connection URL.
///
/// Fields the pipeline computes are typed; any other query parameter is
/// kept verbatim in [`params`](Self::params). Serializing the record gives
/// one flat object with the extra parameters alongside the computed fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DatabaseConfig {
    /// Canonical lowercase driver name.
    pub driver: String,
    /// Username.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Password, only when the URL supplied one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    /// Single host.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Port for `host`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<Port>,
    /// Database name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Filesystem path (file-based drivers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    /// Endpoints (multi-host drivers).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hosts: Option<Vec<HostAddress>>,
    /// Query parameters not mapped to a field above, in order of appearance.
    #[serde(flatten)]
    pub params: IndexMap<String, String>,
}

impl DatabaseConfig {
    /// Normalize a connection URL with the default parsers.
    pub fn from_url(url: &str) -> ConnectionResult<Self> {
        Normalizer::new().normalize(url)
    }

    /// Normalize the URL held in an environment variable.
    ///
    /// `${VAR}` style references inside the value are expanded first.
    pub fn from_env(var: &str) -> ConnectionResult<Self> {
        info!(var, "Loading database configuration from environment");
        let url = std::env::var(var).map_err(|_| ConnectionError::EnvNotFound(var.to_string()))?;
        Normalizer::new().normalize_expanded(&url, &EnvExpander::new())
    }

    /// Normalize the URL held in `DATABASE_URL`.
    pub fn from_database_url() -> ConnectionResult<Self> {
        Self::from_env("DATABASE_URL")
    }

    /// Normalize the URL held in a variable of a custom environment source.
    pub fn from_source<S: EnvSource>(source: S, var: &str) -> ConnectionResult<Self> {
        let url = source
            .get(var)
            .ok_or_else(|| ConnectionError::EnvNotFound(var.to_string()))?;
        Normalizer::new().normalize_expanded(&url, &EnvExpander::with_source(source))
    }

    /// Write one query parameter.
    ///
    /// Keys naming a computed field seed that field; the pipeline
    /// overwrites them later if it computes a value of its own.
    pub fn set_param(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match key.as_str() {
            "driver" => self.driver = value,
            "user" => self.user = Some(value),
            "password" => self.password = Some(value),
            "host" => self.host = Some(value),
            "port" => self.port = Some(Port::parse_lenient(&value)),
            "database" => self.database = Some(value),
            "filename" => self.filename = Some(value),
            _ => {
                self.params.insert(key, value);
            }
        }
    }

    /// Set the endpoint list, dropping any `hosts` query parameter.
    pub(crate) fn set_hosts(&mut self, hosts: Vec<HostAddress>) {
        self.params.shift_remove("hosts");
        self.hosts = Some(hosts);
    }

    /// Get a query parameter.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(|s| s.as_str())
    }

    /// Get all extra query parameters.
    pub fn params(&self) -> &IndexMap<String, String> {
        &self.params
    }

    /// Get the driver family.
    pub fn family(&self) -> DriverFamily {
        DriverFamily::of(&self.driver)
    }

    /// Check whether the driver is file based.
    pub fn is_file_based(&self) -> bool {
        self.family() == DriverFamily::File
    }

    /// Check whether the record lists more than one endpoint.
    pub fn is_multi_host(&self) -> bool {
        self.hosts.as_ref().is_some_and(|h| h.len() > 1)
    }

    /// Get the port as a number, if it is numeric.
    pub fn port_number(&self) -> Option<u16> {
        self.port.as_ref().and_then(Port::as_u16)
    }

    /// Get how the record addresses its database.
    ///
    /// A file path wins over hosts, and a host list of two or more entries
    /// wins over a single host.
    pub fn addressing(&self) -> Addressing<'_> {
        if let Some(ref filename) = self.filename {
            return Addressing::File(filename);
        }
        match (&self.hosts, &self.host) {
            (Some(hosts), _) if hosts.len() > 1 => Addressing::Hosts(hosts),
            (_, Some(host)) => Addressing::Host {
                host,
                port: self.port.as_ref(),
            },
            (Some(hosts), None) if !hosts.is_empty() => Addressing::Hosts(hosts),
            _ => Addressing::None,
        }
    }
}

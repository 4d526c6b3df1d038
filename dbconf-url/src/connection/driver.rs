//! Driver identification.

use tracing::trace;

/// Driver used when a URL carries no scheme.
pub const DEFAULT_DRIVER: &str = "sqlite3";

/// The file-based driver, addressed by a filesystem path.
pub const FILE_DRIVER: &str = "sqlite3";

/// The replica-set driver, addressed by a comma-separated host list.
pub const MULTI_HOST_DRIVER: &str = "mongodb";

/// Scheme aliases rewritten to their canonical driver name.
///
/// `mysql2` is what some hosting platforms hand out for MySQL services.
pub const DRIVER_ALIASES: &[(&str, &str)] = &[("mysql2", "mysql")];

/// How a driver addresses its server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverFamily {
    /// A single file on disk.
    File,
    /// One or more `host:port` pairs in a single authority.
    MultiHost,
    /// Host, port and database name.
    Generic,
}

impl DriverFamily {
    /// Get the family of a canonical driver name.
    pub fn of(driver: &str) -> Self {
        match driver {
            FILE_DRIVER => Self::File,
            MULTI_HOST_DRIVER => Self::MultiHost,
            _ => Self::Generic,
        }
    }

    /// Get the family name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::File => "file",
            Self::MultiHost => "multi_host",
            Self::Generic => "generic",
        }
    }
}

impl std::fmt::Display for DriverFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Derive the canonical driver name from a URL scheme.
///
/// The scheme is lowercased and a trailing `:` is dropped. A missing or
/// empty scheme yields [`DEFAULT_DRIVER`]. Unknown drivers pass through.
///
/// ```rust
/// use dbconf_url::connection::canonical_driver;
///
/// assert_eq!(canonical_driver(Some("Postgres:")), "postgres");
/// assert_eq!(canonical_driver(Some("mysql2")), "mysql");
/// assert_eq!(canonical_driver(None), "sqlite3");
/// ```
pub fn canonical_driver(scheme: Option<&str>) -> String {
    let name = scheme
        .map(|s| s.strip_suffix(':').unwrap_or(s).to_lowercase())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| DEFAULT_DRIVER.to_string());

    match DRIVER_ALIASES.iter().find(|(alias, _)| *alias == name) {
        Some((alias, canonical)) => {
            trace!(alias, canonical, "Driver alias applied");
            (*canonical).to_string()
        }
        None => name,
    }
}

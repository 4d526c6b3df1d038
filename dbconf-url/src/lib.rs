//! # dbconf-url
//!
//! Normalizes database connection URLs into one configuration record.
//!
//! Every driver gets the same [`DatabaseConfig`] shape back:
//! - file based drivers (`sqlite3`) fill `filename`
//! - replica-set drivers (`mongodb`) fill `hosts`, plus `host`/`port` for a single endpoint
//! - everything else fills `host`, `port` and `database`
//!
//! Query parameters that are not one of those fields are kept in
//! [`DatabaseConfig::params`].
//!
//! ```rust
//! use dbconf_url::{HostAddress, Port, normalize};
//!
//! let config = normalize("mongodb://admin:pw@h1:27017,h2:27018/app?replicaSet=rs0").unwrap();
//! assert_eq!(config.driver, "mongodb");
//! assert_eq!(config.user.as_deref(), Some("admin"));
//! assert_eq!(
//!     config.hosts,
//!     Some(vec![
//!         HostAddress::new("h1", Some(Port::Text("27017".into()))),
//!         HostAddress::new("h2", Some(Port::Text("27018".into()))),
//!     ])
//! );
//! assert_eq!(config.database.as_deref(), Some("app"));
//! assert_eq!(config.param("replicaSet"), Some("rs0"));
//! ```
//!
//! ## Configuration from the environment
//!
//! ```rust,no_run
//! use dbconf_url::DatabaseConfig;
//!
//! // DATABASE_URL may reference other variables: postgres://${DB_USER}@db/app
//! let config = DatabaseConfig::from_database_url()?;
//! # Ok::<(), dbconf_url::ConnectionError>(())
//! ```

pub mod connection;
pub mod logging;

pub use connection::{
    Addressing, ConnectionError, ConnectionResult, DatabaseConfig, DriverFamily, HostAddress,
    MongoUriParser, MultiHostParser, MultiHostUrl, Normalizer, PermissiveUriParser, Port,
    UriDecomposer, UrlParts, normalize,
};

pub use logging::{
    get_log_format, get_log_level, init as init_logging, init_debug, init_with_level,
    is_debug_enabled,
};

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::connection::{
        ConnectionError, ConnectionResult, DatabaseConfig, HostAddress, Normalizer, Port,
        normalize,
    };
}

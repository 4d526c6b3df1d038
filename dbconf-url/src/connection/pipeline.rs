//! The normalization pipeline.

use super::{
    ConnectionResult, DatabaseConfig, DriverFamily, EnvExpander, EnvSource, MongoUriParser,
    MultiHostParser, PermissiveUriParser, Port, UriDecomposer, UrlParts, canonical_driver,
};
use tracing::{debug, trace};

/// Turns connection URLs into [`DatabaseConfig`] records.
///
/// Holds no state between calls, so one normalizer can be shared freely.
#[derive(Debug, Clone)]
pub struct Normalizer<D: UriDecomposer = PermissiveUriParser, M: MultiHostParser = MongoUriParser>
{
    decomposer: D,
    multi_host: M,
}

impl Normalizer<PermissiveUriParser, MongoUriParser> {
    /// Create a normalizer with the default parsers.
    pub fn new() -> Self {
        Self {
            decomposer: PermissiveUriParser,
            multi_host: MongoUriParser,
        }
    }
}

impl Default for Normalizer<PermissiveUriParser, MongoUriParser> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: UriDecomposer, M: MultiHostParser> Normalizer<D, M> {
    /// Create a normalizer over custom parsers.
    pub fn with_parsers(decomposer: D, multi_host: M) -> Self {
        Self {
            decomposer,
            multi_host,
        }
    }

    /// Normalize a connection URL.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use dbconf_url::connection::{Normalizer, Port};
    ///
    /// let normalizer = Normalizer::new();
    ///
    /// let config = normalizer.normalize("mysql2://root@127.0.0.1:3306/app").unwrap();
    /// assert_eq!(config.driver, "mysql");
    /// assert_eq!(config.user.as_deref(), Some("root"));
    /// assert_eq!(config.password, None);
    ///
    /// let config = normalizer.normalize("mongodb://h1:27017/app").unwrap();
    /// assert_eq!(config.host.as_deref(), Some("h1"));
    /// assert_eq!(config.port, Some(Port::Text("27017".into())));
    /// ```
    pub fn normalize(&self, url: &str) -> ConnectionResult<DatabaseConfig> {
        debug!(url_len = url.len(), "Normalizer::normalize()");

        let parts = self.decomposer.decompose(url)?;
        let mut config = DatabaseConfig::default();

        if let Some(ref query) = parts.query {
            for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
                config.set_param(key, value);
            }
            trace!(params = config.params.len(), "Query parameters extracted");
        }

        config.driver = canonical_driver(parts.scheme.as_deref());

        if let Some(ref auth) = parts.auth {
            let (user, password) = split_auth(auth);
            config.user = Some(user);
            if password.is_some() {
                config.password = password;
            }
        }

        let family = DriverFamily::of(&config.driver);
        match family {
            DriverFamily::File => resolve_file(&mut config, parts),
            DriverFamily::MultiHost => self.resolve_multi_host(&mut config, url)?,
            DriverFamily::Generic => resolve_generic(&mut config, parts),
        }

        debug!(
            driver = %config.driver,
            family = %family,
            host = ?config.host,
            database = ?config.database,
            "Connection URL normalized"
        );

        Ok(config)
    }

    /// Expand environment references in a URL, then normalize it.
    pub fn normalize_expanded<S: EnvSource>(
        &self,
        url: &str,
        expander: &EnvExpander<S>,
    ) -> ConnectionResult<DatabaseConfig> {
        let url = expander.expand_url(url)?;
        self.normalize(&url)
    }

    /// The generic decomposition is dropped here: its host/port would hold
    /// raw host-list text.
    fn resolve_multi_host(&self, config: &mut DatabaseConfig, url: &str) -> ConnectionResult<()> {
        let parsed = self.multi_host.parse(url)?;

        let hosts: Vec<_> = parsed
            .hosts
            .into_iter()
            .map(|mut h| {
                h.port = h.port.map(Port::into_text);
                h
            })
            .collect();

        if let [only] = hosts.as_slice() {
            if !only.host.is_empty() {
                config.host = Some(only.host.clone());
            }
            if only.port.is_some() {
                config.port = only.port.clone();
            }
        }
        config.set_hosts(hosts);

        if parsed.database.is_some() {
            config.database = parsed.database;
        }

        Ok(())
    }
}

/// Split credentials into user and optional password at the first `:`.
///
/// An empty password counts as none.
///
/// ```rust
/// use dbconf_url::connection::split_auth;
///
/// assert_eq!(split_auth("admin:s3cr:et"), ("admin".to_string(), Some("s3cr:et".to_string())));
/// assert_eq!(split_auth("admin"), ("admin".to_string(), None));
/// ```
pub fn split_auth(auth: &str) -> (String, Option<String>) {
    match auth.split_once(':') {
        Some((user, password)) if !password.is_empty() => {
            (user.to_string(), Some(password.to_string()))
        }
        Some((user, _)) => (user.to_string(), None),
        None => (auth.to_string(), None),
    }
}

fn resolve_file(config: &mut DatabaseConfig, parts: UrlParts) {
    let filename = match (parts.hostname, parts.path) {
        (Some(host), Some(path)) => Some(host + &path),
        (Some(host), None) => Some(host),
        (None, path) => path,
    };
    trace!(filename = ?filename, "File path resolved");
    if filename.is_some() {
        config.filename = filename;
    }
}

fn resolve_generic(config: &mut DatabaseConfig, parts: UrlParts) {
    if let Some(ref path) = parts.path {
        let name = path.strip_prefix('/').unwrap_or(path);
        let name = name.strip_suffix('/').unwrap_or(name);
        if !name.is_empty() {
            config.database = Some(name.to_string());
        }
    }

    if parts.hostname.is_some() {
        config.host = parts.hostname;
    }
    if let Some(ref port) = parts.port {
        config.port = Some(Port::parse_lenient(port));
    }
}

/// Normalize a connection URL with the default parsers.
///
/// ```rust
/// use dbconf_url::connection::normalize;
///
/// let config = normalize("sqlite3:./data.db").unwrap();
/// assert_eq!(config.driver, "sqlite3");
/// assert_eq!(config.filename.as_deref(), Some("./data.db"));
/// ```
pub fn normalize(url: &str) -> ConnectionResult<DatabaseConfig> {
    Normalizer::new().normalize(url)
}

//! Environment variable expansion for connection URLs.

use super::{ConnectionError, ConnectionResult};
use std::collections::HashMap;
use std::iter::Peekable;
use std::str::Chars;

/// Source for environment variables.
pub trait EnvSource: Send + Sync {
    /// Get an environment variable value.
    fn get(&self, name: &str) -> Option<String>;

    /// Check if a variable exists.
    fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdEnvSource;

impl EnvSource for StdEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

/// Environment source backed by a map, mostly for tests.
#[derive(Debug, Clone, Default)]
pub struct MapEnvSource {
    vars: HashMap<String, String>,
}

impl MapEnvSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a variable.
    pub fn set(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.vars.insert(name.into(), value.into());
        self
    }
}

impl EnvSource for MapEnvSource {
    fn get(&self, name: &str) -> Option<String> {
        self.vars.get(name).cloned()
    }
}

/// Expands variable references inside a connection URL.
///
/// - `$VAR` and `${VAR}`: required
/// - `${VAR:-default}`: `default` when unset or empty
/// - `${VAR:?message}`: error with `message` when unset or empty
/// - `${VAR:+alternate}`: `alternate` when set, empty otherwise
///
/// A `$` not followed by a name is kept literally.
#[derive(Debug, Clone)]
pub struct EnvExpander<S: EnvSource = StdEnvSource> {
    source: S,
}

impl EnvExpander<StdEnvSource> {
    /// Create an expander over the process environment.
    pub fn new() -> Self {
        Self {
            source: StdEnvSource,
        }
    }
}

impl Default for EnvExpander<StdEnvSource> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: EnvSource> EnvExpander<S> {
    /// Create an expander with a custom environment source.
    pub fn with_source(source: S) -> Self {
        Self { source }
    }

    /// Expand every reference in a URL.
    ///
    /// ```rust
    /// use dbconf_url::connection::{EnvExpander, MapEnvSource};
    ///
    /// let env = MapEnvSource::new().set("DB_HOST", "db.internal");
    /// let expander = EnvExpander::with_source(env);
    /// assert_eq!(
    ///     expander.expand_url("postgres://${DB_HOST}:${DB_PORT:-5432}/app").unwrap(),
    ///     "postgres://db.internal:5432/app"
    /// );
    /// ```
    pub fn expand_url(&self, url: &str) -> ConnectionResult<String> {
        if !Self::has_variables(url) {
            return Ok(url.to_string());
        }

        let mut result = String::with_capacity(url.len());
        let mut chars = url.chars().peekable();

        while let Some(c) = chars.next() {
            match (c, chars.peek().copied()) {
                ('$', Some('{')) => {
                    chars.next();
                    result.push_str(&self.expand_braced(&mut chars)?);
                }
                ('$', Some(n)) if n.is_ascii_alphabetic() || n == '_' => {
                    let name = take_name(&mut chars);
                    result.push_str(&self.lookup(&name)?);
                }
                _ => result.push(c),
            }
        }

        Ok(result)
    }

    /// Check if a string contains variable references.
    pub fn has_variables(input: &str) -> bool {
        input.contains('$')
    }

    fn lookup(&self, name: &str) -> ConnectionResult<String> {
        self.source
            .get(name)
            .ok_or_else(|| ConnectionError::EnvNotFound(name.to_string()))
    }

    fn expand_braced(&self, chars: &mut Peekable<Chars<'_>>) -> ConnectionResult<String> {
        let mut body = String::new();
        let mut closed = false;
        for c in chars.by_ref() {
            if c == '}' {
                closed = true;
                break;
            }
            body.push(c);
        }

        if !closed {
            return Err(ConnectionError::InvalidEnvValue {
                name: body,
                message: "Unterminated '${' reference".to_string(),
            });
        }

        let (name, modifier) = match body.split_once(':') {
            Some((name, rest)) => {
                let mut rest = rest.chars();
                (name.to_string(), rest.next().map(|m| (m, rest.as_str().to_string())))
            }
            None => (body, None),
        };

        if name.is_empty() {
            return Err(ConnectionError::InvalidEnvValue {
                name,
                message: "Empty variable name".to_string(),
            });
        }

        let value = self.source.get(&name).filter(|v| !v.is_empty());
        match (value, modifier) {
            (Some(_), Some(('+', alternate))) => Ok(alternate),
            (Some(value), _) => Ok(value),
            (None, Some(('-', default))) => Ok(default),
            (None, Some(('+', _))) => Ok(String::new()),
            (None, Some(('?', message))) => Err(ConnectionError::InvalidEnvValue {
                message: if message.is_empty() {
                    format!("Required variable '{}' is not set", name)
                } else {
                    message
                },
                name,
            }),
            (None, _) => Err(ConnectionError::EnvNotFound(name)),
        }
    }
}

fn take_name(chars: &mut Peekable<Chars<'_>>) -> String {
    let mut name = String::new();
    while let Some(&c) = chars.peek() {
        if c.is_ascii_alphanumeric() || c == '_' {
            name.push(c);
            chars.next();
        } else {
            break;
        }
    }
    name
}

/// Expand variable references using the process environment.
pub fn expand_env(input: &str) -> ConnectionResult<String> {
    EnvExpander::new().expand_url(input)
}

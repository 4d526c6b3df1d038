//! Multi-host URL parsing for replica-set style drivers.

use super::{ConnectionError, ConnectionResult, HostAddress, Port};
use indexmap::IndexMap;
use percent_encoding::percent_decode_str;
use tracing::trace;

/// A URL whose authority lists several `host:port` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MultiHostUrl {
    /// Scheme as written, without `://`.
    pub scheme: String,
    /// Username.
    pub username: Option<String>,
    /// Password.
    pub password: Option<String>,
    /// Endpoints in the order they were listed.
    pub hosts: Vec<HostAddress>,
    /// Database name.
    pub database: Option<String>,
    /// Decoded query options.
    pub options: IndexMap<String, String>,
}

/// Parses URLs with a comma-separated host list in one authority.
pub trait MultiHostParser: Send + Sync {
    /// Parse the original, unmodified URL.
    fn parse(&self, url: &str) -> ConnectionResult<MultiHostUrl>;
}

/// Parser for `mongodb://[user[:pass]@]host1[:port1][,hostN[:portN]...][/[db]][?options]`.
///
/// Ports are read from their leading digits and returned numeric when they
/// fit in `u16`; a port with no digits is dropped. The normalizer decides how
/// to present them.
#[derive(Debug, Clone, Copy, Default)]
pub struct MongoUriParser;

impl MultiHostParser for MongoUriParser {
    fn parse(&self, url: &str) -> ConnectionResult<MultiHostUrl> {
        // The URL may hold credentials, so it stays out of the error.
        let (scheme, mut rest) = url.split_once("://").ok_or_else(|| {
            ConnectionError::InvalidUrl("Missing '://' after the scheme".to_string())
        })?;

        let mut parsed = MultiHostUrl {
            scheme: scheme.to_string(),
            ..Default::default()
        };

        // Credentials end at the last '@' of the authority.
        let authority_end = rest.find(['/', '?']).unwrap_or(rest.len());
        if let Some(at) = rest[..authority_end].rfind('@') {
            let (credentials, after) = (&rest[..at], &rest[at + 1..]);
            match credentials.split_once(':') {
                Some((user, pass)) => {
                    parsed.username = Some(decode(user));
                    parsed.password = Some(decode(pass));
                }
                None => parsed.username = Some(decode(credentials)),
            }
            rest = after;
        }

        if let Some((before, query)) = rest.split_once('?') {
            parsed.options = url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect();
            rest = before;
        }

        if let Some((address, database)) = rest.split_once('/') {
            if !database.is_empty() {
                parsed.database = Some(decode(database));
            }
            rest = address;
        }

        parsed.hosts = parse_address(rest)?;

        trace!(
            hosts = parsed.hosts.len(),
            database = ?parsed.database,
            "Multi-host URL parsed"
        );

        Ok(parsed)
    }
}

fn parse_address(address: &str) -> ConnectionResult<Vec<HostAddress>> {
    if address.is_empty() {
        return Err(ConnectionError::MissingField("host".to_string()));
    }

    Ok(address
        .split(',')
        .map(|entry| match entry.split_once(':') {
            Some((host, port)) => HostAddress::new(decode(host), leading_port(port)),
            None => HostAddress::new(decode(entry), None),
        })
        .collect())
}

/// Read the leading digits of a port; text without any yields no port.
fn leading_port(raw: &str) -> Option<Port> {
    let raw = raw.trim_start();
    let end = raw.find(|c: char| !c.is_ascii_digit()).unwrap_or(raw.len());
    let digits = &raw[..end];
    if digits.is_empty() {
        return None;
    }

    Some(match digits.parse::<u16>() {
        Ok(n) => Port::Number(n),
        Err(_) => Port::Text(digits.trim_start_matches('0').to_string()),
    })
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

//! Generic URI decomposition.

use super::ConnectionResult;
use percent_encoding::percent_decode_str;
use tracing::trace;

/// The raw components of a URL.
///
/// Nothing here knows about databases. The query string is kept raw so the
/// caller decides how to decode it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrlParts {
    /// Lowercased scheme without its trailing `:`.
    pub scheme: Option<String>,
    /// Percent-decoded credentials (text before the last `@` of the authority).
    pub auth: Option<String>,
    /// Host name, with IPv6 brackets removed.
    pub hostname: Option<String>,
    /// Port digits as written.
    pub port: Option<String>,
    /// Path, including its leading `/` when there is an authority.
    pub path: Option<String>,
    /// Raw query string without the `?`.
    pub query: Option<String>,
}

/// Splits a URL string into scheme, authority, path and query.
pub trait UriDecomposer: Send + Sync {
    /// Decompose a URL.
    fn decompose(&self, url: &str) -> ConnectionResult<UrlParts>;
}

/// A decomposer that accepts anything.
///
/// After a scheme, the authority may follow `//` or start right after the
/// colon, so `mysql:localhost/app` has host `localhost` and `sqlite3:data.db`
/// has host `data.db`. A scheme followed by a single `/` has a path only.
/// Host text is not validated or lowercased, which lets comma-separated host
/// lists and other unusual authorities through.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissiveUriParser;

impl UriDecomposer for PermissiveUriParser {
    fn decompose(&self, url: &str) -> ConnectionResult<UrlParts> {
        let mut rest = url.trim();
        if let Some(hash) = rest.find('#') {
            rest = &rest[..hash];
        }

        let (scheme, after_scheme) = split_scheme(rest);
        rest = after_scheme;

        let mut parts = UrlParts {
            scheme,
            ..Default::default()
        };

        // `scheme:host/path` has an authority too; only a bare `/path` does not.
        let authority_text = match rest.strip_prefix("//") {
            Some(after_slashes) => Some(after_slashes),
            None if parts.scheme.is_some() && !rest.starts_with('/') => Some(rest),
            None => None,
        };

        if let Some(text) = authority_text {
            let end = text.find(['/', '?']).unwrap_or(text.len());
            let (authority, tail) = text.split_at(end);

            let host_text = match authority.rfind('@') {
                Some(at) => {
                    parts.auth = non_empty(&decode(&authority[..at]));
                    &authority[at + 1..]
                }
                None => authority,
            };

            let (hostname, port) = split_host_port(host_text);
            parts.hostname = hostname;
            parts.port = port;
            rest = tail;
        }

        let (path, query) = match rest.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (rest, None),
        };
        parts.path = non_empty(path);
        parts.query = query.and_then(non_empty);

        trace!(
            scheme = ?parts.scheme,
            has_auth = parts.auth.is_some(),
            hostname = ?parts.hostname,
            port = ?parts.port,
            "URL decomposed"
        );

        Ok(parts)
    }
}

/// Split a leading `scheme:` off the input.
fn split_scheme(input: &str) -> (Option<String>, &str) {
    let Some(colon) = input.find(':') else {
        return (None, input);
    };
    let candidate = &input[..colon];
    let valid = !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '+' | '-'));

    if valid {
        (Some(candidate.to_ascii_lowercase()), &input[colon + 1..])
    } else {
        (None, input)
    }
}

/// Split `host[:digits]`; a trailing colon with no digits is dropped.
fn split_host_port(host: &str) -> (Option<String>, Option<String>) {
    let (host, port) = match host.rfind(':') {
        Some(colon) if host[colon + 1..].bytes().all(|b| b.is_ascii_digit()) => {
            (&host[..colon], non_empty(&host[colon + 1..]))
        }
        _ => (host, None),
    };

    let host = host
        .strip_prefix('[')
        .and_then(|h| h.strip_suffix(']'))
        .unwrap_or(host);

    (non_empty(host), port)
}

fn decode(s: &str) -> String {
    percent_decode_str(s).decode_utf8_lossy().into_owned()
}

fn non_empty(s: &str) -> Option<String> {
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

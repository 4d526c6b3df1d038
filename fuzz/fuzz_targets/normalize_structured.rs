//! Structured fuzz target: builds URLs from fuzzed parts.
//!
//! Run with:
//! ```bash
//! cargo +nightly fuzz run fuzz_normalize_structured
//! ```

#![no_main]

use arbitrary::Arbitrary;
use dbconf_url::normalize;
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Scheme {
    Postgres,
    Mysql2,
    Sqlite3,
    Mongodb,
    Other(String),
    Missing,
}

#[derive(Debug, Arbitrary)]
struct FuzzUrl {
    scheme: Scheme,
    slashes: bool,
    user: Option<String>,
    password: Option<String>,
    hosts: Vec<(String, Option<u32>)>,
    path: Option<String>,
    params: Vec<(String, String)>,
}

impl FuzzUrl {
    fn to_url(&self) -> String {
        let mut url = match &self.scheme {
            Scheme::Postgres => "postgres:".to_string(),
            Scheme::Mysql2 => "mysql2:".to_string(),
            Scheme::Sqlite3 => "sqlite3:".to_string(),
            Scheme::Mongodb => "mongodb:".to_string(),
            Scheme::Other(s) => format!("{}:", s),
            Scheme::Missing => String::new(),
        };

        if self.slashes {
            url.push_str("//");
        }

        if let Some(ref user) = self.user {
            url.push_str(user);
            if let Some(ref password) = self.password {
                url.push(':');
                url.push_str(password);
            }
            url.push('@');
        }

        let hosts: Vec<String> = self
            .hosts
            .iter()
            .take(8)
            .map(|(host, port)| match port {
                Some(port) => format!("{}:{}", host, port),
                None => host.clone(),
            })
            .collect();
        url.push_str(&hosts.join(","));

        if let Some(ref path) = self.path {
            url.push('/');
            url.push_str(path);
        }

        if !self.params.is_empty() {
            let params: Vec<String> = self
                .params
                .iter()
                .take(16)
                .map(|(k, v)| format!("{}={}", k, v))
                .collect();
            url.push('?');
            url.push_str(&params.join("&"));
        }

        url
    }
}

fuzz_target!(|input: FuzzUrl| {
    let url = input.to_url();
    if let Ok(config) = normalize(&url) {
        assert_eq!(config.driver, config.driver.to_lowercase());
        if matches!(input.scheme, Scheme::Mysql2) {
            assert_eq!(config.driver, "mysql");
        }
        if let Some(ref hosts) = config.hosts {
            assert!(!hosts.is_empty());
        }
    }
});

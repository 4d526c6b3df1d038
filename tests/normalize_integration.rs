//! Integration tests for connection URL normalization.
//!
//! These tests cover the record produced for each addressing scheme:
//! - File paths for sqlite3
//! - Host lists for mongodb
//! - Host, port and database for every other driver
//! - Query parameter passthrough and precedence

use dbconf::connection::{Addressing, ConnectionError, HostAddress, Normalizer};
use dbconf::prelude::*;
use pretty_assertions::assert_eq;
use serde_json::json;

fn to_json(url: &str) -> serde_json::Value {
    serde_json::to_value(normalize(url).expect("URL should normalize")).unwrap()
}

/// Test the canonical generic-driver record
#[test]
fn test_postgres_record() {
    assert_eq!(
        to_json("postgres://u:p@h:5432/mydb"),
        json!({
            "driver": "postgres",
            "user": "u",
            "password": "p",
            "host": "h",
            "port": 5432,
            "database": "mydb"
        })
    );
}

/// Test that driver names come out lowercase without separators
#[test]
fn test_driver_always_canonical() {
    let urls = [
        "POSTGRES://h/db",
        "MySQL2://h/db",
        "sqlite3:app.db",
        "app.db",
        "mongodb://h/db",
        "redis://h:6379/0",
    ];

    for url in urls {
        let config = normalize(url).unwrap();
        assert!(!config.driver.is_empty(), "{}", url);
        assert!(!config.driver.ends_with(':'), "{}", url);
        assert_eq!(config.driver, config.driver.to_lowercase(), "{}", url);
    }
}

#[test]
fn test_mysql2_becomes_mysql() {
    for url in ["mysql2://h/db", "mysql2://u:p@h:3306/db?charset=utf8mb4"] {
        assert_eq!(normalize(url).unwrap().driver, "mysql");
    }
}

/// Test sqlite file path resolution
#[test]
fn test_sqlite_filenames() {
    assert_eq!(
        to_json("sqlite3:relative/path.db"),
        json!({ "driver": "sqlite3", "filename": "relative/path.db" })
    );
    assert_eq!(
        to_json("sqlite3:///abs/path.db"),
        json!({ "driver": "sqlite3", "filename": "/abs/path.db" })
    );
    assert_eq!(
        to_json("sqlite3:just-a-name"),
        json!({ "driver": "sqlite3", "filename": "just-a-name" })
    );
}

#[test]
fn test_sqlite_with_options() {
    let config = normalize("sqlite3://./data/app.db?mode=ro&cache=shared").unwrap();
    assert_eq!(config.addressing(), Addressing::File("./data/app.db"));
    assert_eq!(config.param("mode"), Some("ro"));
    assert_eq!(config.param("cache"), Some("shared"));
}

#[test]
fn test_trailing_slash_database() {
    assert_eq!(normalize("postgres://h/mydb/").unwrap().database.as_deref(), Some("mydb"));
}

/// Test the replica-set record shape
#[test]
fn test_mongodb_replica_set_record() {
    assert_eq!(
        to_json("mongodb://h1:27017,h2:27018/mydb"),
        json!({
            "driver": "mongodb",
            "database": "mydb",
            "hosts": [
                { "host": "h1", "port": "27017" },
                { "host": "h2", "port": "27018" }
            ]
        })
    );
}

#[test]
fn test_mongodb_single_host_record() {
    assert_eq!(
        to_json("mongodb://h1:27017/mydb"),
        json!({
            "driver": "mongodb",
            "host": "h1",
            "port": "27017",
            "database": "mydb",
            "hosts": [{ "host": "h1", "port": "27017" }]
        })
    );
}

#[test]
fn test_mongodb_addressing() {
    let config = normalize("mongodb://h1:1,h2:2,h3:3/db").unwrap();
    match config.addressing() {
        Addressing::Hosts(hosts) => {
            let names: Vec<_> = hosts.iter().map(|h| h.host.as_str()).collect();
            assert_eq!(names, vec!["h1", "h2", "h3"]);
        }
        other => panic!("expected host list, got {:?}", other),
    }
    assert!(config.is_multi_host());
}

#[test]
fn test_mongodb_unreadable_port_dropped() {
    assert_eq!(
        to_json("mongodb://h1:27017,h2:port/db"),
        json!({
            "driver": "mongodb",
            "hosts": [
                { "host": "h1", "port": "27017" },
                { "host": "h2" }
            ],
            "database": "db"
        })
    );
}

#[test]
fn test_mongodb_without_host_fails() {
    assert!(matches!(
        normalize("mongodb:///db"),
        Err(ConnectionError::MissingField(_))
    ));
}

/// Test generic URLs that put the authority right after the scheme
#[test]
fn test_authority_without_slashes() {
    assert_eq!(
        to_json("postgres:u:p@h:5432/db"),
        json!({
            "driver": "postgres",
            "user": "u",
            "password": "p",
            "host": "h",
            "port": 5432,
            "database": "db"
        })
    );
    assert_eq!(
        to_json("mysql:localhost/app"),
        json!({ "driver": "mysql", "host": "localhost", "database": "app" })
    );
}

/// Test query parameter passthrough
#[test]
fn test_unknown_query_params_verbatim() {
    assert_eq!(
        to_json("postgres://h/db?ssl=true&application_name=my%20app"),
        json!({
            "driver": "postgres",
            "host": "h",
            "database": "db",
            "ssl": "true",
            "application_name": "my app"
        })
    );
}

#[test]
fn test_query_params_cannot_override_computed_fields() {
    let config = normalize("mongodb://h1:1,h2:2/real?database=fake&hosts=x&user=q").unwrap();
    assert_eq!(config.database.as_deref(), Some("real"));
    assert_eq!(config.param("hosts"), None);
    // No credentials in the authority, so the query value stands.
    assert_eq!(config.user.as_deref(), Some("q"));
}

#[test]
fn test_password_only_when_supplied() {
    assert_eq!(normalize("postgres://u@h/db").unwrap().password, None);
    assert_eq!(
        normalize("postgres://u:p@h/db").unwrap().password.as_deref(),
        Some("p")
    );
}

#[test]
fn test_deterministic() {
    let normalizer = Normalizer::new();
    for url in [
        "postgres://u:p@h:5432/db?a=1&b=2",
        "sqlite3:///tmp/x.db",
        "mongodb://h1:1,h2:2/db?replicaSet=rs",
    ] {
        assert_eq!(normalizer.normalize(url).unwrap(), normalizer.normalize(url).unwrap());
    }
}

#[test]
fn test_concurrent_use() {
    let normalizer = std::sync::Arc::new(Normalizer::new());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let normalizer = normalizer.clone();
            std::thread::spawn(move || {
                normalizer
                    .normalize(&format!("postgres://h:{}/db{}", 5000 + i, i))
                    .unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let config = handle.join().unwrap();
        assert_eq!(config.port, Some(Port::Number(5000 + i as u16)));
        assert_eq!(config.database, Some(format!("db{}", i)));
    }
}

#[test]
fn test_host_address_serialization_without_port() {
    let value = serde_json::to_value(HostAddress::new("h", None)).unwrap();
    assert_eq!(value, json!({ "host": "h" }));
}

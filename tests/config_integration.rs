//! Integration tests for loading configuration from the environment.
//!
//! These tests use custom environment sources so they never touch the
//! process environment.

use dbconf::DatabaseConfig;
use dbconf::connection::{
    ConnectionError, EnvExpander, MapEnvSource, Normalizer, Port, expand_env,
};
use pretty_assertions::assert_eq;

fn source() -> MapEnvSource {
    MapEnvSource::new()
        .set("DATABASE_URL", "postgres://${DB_USER}:${DB_PASS}@${DB_HOST}:${DB_PORT:-5432}/app")
        .set("MONGO_URL", "mongodb://${MONGO_HOSTS}/events")
        .set("DB_USER", "app")
        .set("DB_PASS", "s3cret")
        .set("DB_HOST", "db.internal")
        .set("MONGO_HOSTS", "m1:27017,m2:27017")
}

/// Test a DATABASE_URL with nested references
#[test]
fn test_config_from_source() {
    let config = DatabaseConfig::from_source(source(), "DATABASE_URL").unwrap();

    assert_eq!(config.driver, "postgres");
    assert_eq!(config.user.as_deref(), Some("app"));
    assert_eq!(config.password.as_deref(), Some("s3cret"));
    assert_eq!(config.host.as_deref(), Some("db.internal"));
    assert_eq!(config.port, Some(Port::Number(5432)));
    assert_eq!(config.database.as_deref(), Some("app"));
}

#[test]
fn test_config_from_source_multi_host() {
    let config = DatabaseConfig::from_source(source(), "MONGO_URL").unwrap();
    assert_eq!(config.hosts.as_ref().map(Vec::len), Some(2));
    assert_eq!(config.database.as_deref(), Some("events"));
}

#[test]
fn test_config_missing_variable() {
    let result = DatabaseConfig::from_source(MapEnvSource::new(), "DATABASE_URL");
    assert_eq!(
        result.unwrap_err(),
        ConnectionError::EnvNotFound("DATABASE_URL".to_string())
    );
}

#[test]
fn test_config_missing_reference() {
    let env = MapEnvSource::new().set("DATABASE_URL", "postgres://${DB_HOST:?DB_HOST must be set}/app");
    let err = DatabaseConfig::from_source(env, "DATABASE_URL").unwrap_err();
    assert!(err.to_string().contains("DB_HOST must be set"));
}

#[test]
fn test_normalize_expanded() {
    let expander = EnvExpander::with_source(MapEnvSource::new().set("FILE", "/var/lib/app.db"));
    let config = Normalizer::new()
        .normalize_expanded("sqlite3://${FILE}", &expander)
        .unwrap();
    assert_eq!(config.filename.as_deref(), Some("/var/lib/app.db"));
}

#[test]
fn test_expand_env_without_references() {
    assert_eq!(expand_env("postgres://h/db").unwrap(), "postgres://h/db");
}

//! Process configuration, read once from the environment at startup.

use std::net::SocketAddr;

use anyhow::{Context, Result, bail};
use chrono::Duration;

use warden_auth::AccessRules;

const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub jwt_secret: String,
    pub access_ttl: Duration,
    pub refresh_ttl: Duration,
    /// Only paths under this prefix go through the authorization stage.
    pub gated_prefix: String,
    pub access_rules: AccessRules,
    /// Postgres connection string; the in-memory store is used when unset.
    pub database_url: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 8080)),
            jwt_secret: DEV_SECRET.to_string(),
            access_ttl: Duration::hours(1),
            refresh_ttl: Duration::days(7),
            gated_prefix: "/v1/".to_string(),
            access_rules: AccessRules::defaults(),
            database_url: None,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(bind) = lookup("WARDEN_BIND") {
            config.bind_addr = bind.parse().with_context(|| format!("parse WARDEN_BIND: {bind}"))?;
        }

        match lookup("JWT_SECRET") {
            Some(secret) if !secret.is_empty() => config.jwt_secret = secret,
            _ => tracing::warn!("JWT_SECRET not set; using insecure dev default"),
        }

        if let Some(ttl) = lookup("WARDEN_ACCESS_TTL_SECS") {
            config.access_ttl = parse_ttl("WARDEN_ACCESS_TTL_SECS", &ttl)?;
        }
        if let Some(ttl) = lookup("WARDEN_REFRESH_TTL_SECS") {
            config.refresh_ttl = parse_ttl("WARDEN_REFRESH_TTL_SECS", &ttl)?;
        }

        if let Some(prefix) = lookup("WARDEN_GATED_PREFIX") {
            if !prefix.starts_with('/') {
                bail!("WARDEN_GATED_PREFIX must start with '/': {prefix}");
            }
            config.gated_prefix = prefix;
        }

        if let Some(raw) = lookup("WARDEN_ACCESS_RULES") {
            config.access_rules =
                AccessRules::from_json(&raw).context("parse WARDEN_ACCESS_RULES")?;
        }

        config.database_url = lookup("DATABASE_URL").filter(|url| !url.is_empty());

        Ok(config)
    }
}

fn parse_ttl(key: &str, raw: &str) -> Result<Duration> {
    let secs: i64 = raw.parse().with_context(|| format!("parse {key}: {raw}"))?;
    if secs <= 0 {
        bail!("{key} must be positive, got {secs}");
    }
    Duration::try_seconds(secs).with_context(|| format!("{key} out of range: {secs}"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use warden_auth::Stage;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.jwt_secret, DEV_SECRET);
        assert_eq!(config.gated_prefix, "/v1/");
        assert_eq!(config.access_ttl, Duration::hours(1));
        assert!(config.database_url.is_none());
        assert!(config.access_rules.exempts(Stage::Authentication, "/v1/login"));
    }

    #[test]
    fn reads_every_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            ("WARDEN_BIND", "127.0.0.1:9000"),
            ("JWT_SECRET", "s3cret"),
            ("WARDEN_ACCESS_TTL_SECS", "60"),
            ("WARDEN_REFRESH_TTL_SECS", "120"),
            ("WARDEN_GATED_PREFIX", "/api/"),
            ("WARDEN_ACCESS_RULES", r#"[{"scope":"both","match":"exact","path":"/api/login"}]"#),
            ("DATABASE_URL", "postgres://localhost/warden"),
        ]))
        .unwrap();

        assert_eq!(config.bind_addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.jwt_secret, "s3cret");
        assert_eq!(config.access_ttl, Duration::seconds(60));
        assert_eq!(config.refresh_ttl, Duration::seconds(120));
        assert_eq!(config.gated_prefix, "/api/");
        assert!(config.access_rules.exempts(Stage::Authorization, "/api/login"));
        assert!(!config.access_rules.exempts(Stage::Authorization, "/v1/login"));
        assert_eq!(config.database_url.as_deref(), Some("postgres://localhost/warden"));
    }

    #[test]
    fn rejects_bad_values() {
        assert!(AppConfig::from_lookup(lookup(&[("WARDEN_ACCESS_TTL_SECS", "0")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("WARDEN_REFRESH_TTL_SECS", "soon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("WARDEN_GATED_PREFIX", "v1")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("WARDEN_ACCESS_RULES", "{}")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("WARDEN_BIND", "nowhere")])).is_err());
    }

    #[test]
    fn oversized_ttl_is_a_config_error() {
        let huge = i64::MAX.to_string();
        let err = AppConfig::from_lookup(lookup(&[("WARDEN_ACCESS_TTL_SECS", huge.as_str())])).unwrap_err();
        assert!(err.to_string().contains("out of range"), "{err}");
    }
}

use crate::app_config::{AppConfig, Environment};
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files.
///
/// # Errors
///
/// Returns `ConfigError` if values are invalid.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// Decoupled from the real environment so it can be tested with a `HashMap`
/// lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    use std::net::SocketAddr;

    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    // Empty strings in `.env` files count as unset.
    let optional = |var: &str| -> Option<String> {
        lookup(var)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_usize = |var: &str, default: &str| -> Result<usize, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<usize>()
            .map_err(|e| ConfigError::InvalidEnvVar {
                var: var.to_string(),
                reason: e.to_string(),
            })
    };

    let env = parse_environment(&or_default("SCOUT_ENV", "development"))?;

    let bind_addr = or_default("SCOUT_BIND_ADDR", "0.0.0.0:3000")
        .parse::<SocketAddr>()
        .map_err(|e| ConfigError::InvalidEnvVar {
            var: "SCOUT_BIND_ADDR".to_string(),
            reason: e.to_string(),
        })?;
    let log_level = or_default("SCOUT_LOG_LEVEL", "info");
    let redis_url = or_default("REDIS_URL", "redis://localhost:6379/0");

    let insightiq_api_url = or_default("INSIGHTIQ_API_URL", "https://api.insightiq.ai");
    let insightiq_client_id = optional("INSIGHTIQ_CLIENT_ID");
    let insightiq_secret = optional("INSIGHTIQ_SECRET");

    let hubspot_api_url = or_default("HUBSPOT_API_URL", "https://api.hubapi.com");
    let hubspot_api_key = optional("HUBSPOT_API_KEY");
    let slack_webhook_url = optional("SLACK_WEBHOOK_URL");

    let http_timeout_secs = parse_u64("SCOUT_HTTP_TIMEOUT_SECS", "30")?;
    let worker_concurrency = parse_usize("SCOUT_WORKER_CONCURRENCY", "1")?;
    if worker_concurrency == 0 {
        return Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_WORKER_CONCURRENCY".to_string(),
            reason: "must be at least 1".to_string(),
        });
    }

    Ok(AppConfig {
        env,
        bind_addr,
        log_level,
        redis_url,
        insightiq_api_url,
        insightiq_client_id,
        insightiq_secret,
        hubspot_api_url,
        hubspot_api_key,
        slack_webhook_url,
        http_timeout_secs,
        worker_concurrency,
    })
}

fn parse_environment(s: &str) -> Result<Environment, ConfigError> {
    match s {
        "development" => Ok(Environment::Development),
        "test" => Ok(Environment::Test),
        "production" => Ok(Environment::Production),
        other => Err(ConfigError::InvalidEnvVar {
            var: "SCOUT_ENV".to_string(),
            reason: format!("unknown environment '{other}'"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env::VarError;

    use super::*;

    fn lookup_from_map<'a>(
        map: &'a HashMap<&'a str, &'a str>,
    ) -> impl Fn(&str) -> Result<String, VarError> + 'a {
        move |key| {
            map.get(key)
                .map(|v| (*v).to_string())
                .ok_or(VarError::NotPresent)
        }
    }

    #[test]
    fn parse_environment_known_values() {
        assert_eq!(
            parse_environment("development").unwrap(),
            Environment::Development
        );
        assert_eq!(parse_environment("test").unwrap(), Environment::Test);
        assert_eq!(
            parse_environment("production").unwrap(),
            Environment::Production
        );
    }

    #[test]
    fn parse_environment_unknown_fails() {
        let err = parse_environment("staging").unwrap_err();
        assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "SCOUT_ENV"));
    }

    #[test]
    fn build_app_config_applies_defaults() {
        let map: HashMap<&str, &str> = HashMap::new();
        let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
        assert_eq!(cfg.env, Environment::Development);
        assert_eq!(cfg.bind_addr.to_string(), "0.0.0.0:3000");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.redis_url, "redis://localhost:6379/0");
        assert_eq!(cfg.insightiq_api_url, "https://api.insightiq.ai");
        assert_eq!(cfg.hubspot_api_url, "https://api.hubapi.com");
        assert!(cfg.insightiq_client_id.is_none());
        assert!(cfg.hubspot_api_key.is_none());
        assert!(cfg.slack_webhook_url.is_none());
        assert_eq!(cfg.http_timeout_secs, 30);
        assert_eq!(cfg.worker_concurrency, 1);
    }

    #[test]
    fn build_app_config_reads_credentials() {
        let mut map = HashMap::new();
        map.insert("INSIGHTIQ_CLIENT_ID", "client");
        map.insert("INSIGHTIQ_SECRET", "secret");
        map.insert("HUBSPOT_API_KEY", "pat-123");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        assert_eq!(cfg.insightiq_credentials().unwrap(), ("client", "secret"));
        assert_eq!(cfg.hubspot_key().unwrap(), "pat-123");
    }

    #[test]
    fn blank_credentials_count_as_missing() {
        let mut map = HashMap::new();
        map.insert("INSIGHTIQ_CLIENT_ID", "client");
        map.insert("INSIGHTIQ_SECRET", "  ");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let err = cfg.insightiq_credentials().unwrap_err();
        assert!(matches!(err, ConfigError::MissingEnvVar(ref v) if v == "INSIGHTIQ_SECRET"));
        assert!(matches!(
            cfg.hubspot_key(),
            Err(ConfigError::MissingEnvVar(ref v)) if v == "HUBSPOT_API_KEY"
        ));
    }

    #[test]
    fn build_app_config_fails_with_invalid_bind_addr() {
        let mut map = HashMap::new();
        map.insert("SCOUT_BIND_ADDR", "not-a-socket-addr");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_BIND_ADDR"),
            "expected InvalidEnvVar(SCOUT_BIND_ADDR), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_rejects_zero_workers() {
        let mut map = HashMap::new();
        map.insert("SCOUT_WORKER_CONCURRENCY", "0");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_WORKER_CONCURRENCY"),
            "expected InvalidEnvVar(SCOUT_WORKER_CONCURRENCY), got: {result:?}"
        );
    }

    #[test]
    fn build_app_config_http_timeout_invalid() {
        let mut map = HashMap::new();
        map.insert("SCOUT_HTTP_TIMEOUT_SECS", "soon");
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "SCOUT_HTTP_TIMEOUT_SECS"),
            "expected InvalidEnvVar(SCOUT_HTTP_TIMEOUT_SECS), got: {result:?}"
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut map = HashMap::new();
        map.insert("INSIGHTIQ_SECRET", "super-secret");
        map.insert("HUBSPOT_API_KEY", "pat-secret");
        let cfg = build_app_config(lookup_from_map(&map)).unwrap();
        let rendered = format!("{cfg:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(!rendered.contains("pat-secret"));
    }
}

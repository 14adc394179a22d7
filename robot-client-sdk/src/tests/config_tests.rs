//! Tests for configuration management functionality
//!
//! These tests verify that the configuration providers and the server
//! configuration loading work correctly.

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::env;
    use std::time::Duration;

    use crate::config::{
        CompositeConfigProvider, ConfigProvider, ConfigProviderExt, EnvConfigProvider,
        MemoryConfigProvider, ServerConfig, ServiceConfig,
    };

    #[test]
    fn test_memory_config_provider() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("server_base_url", "http://10.7.5.118:8000");
        provider.set("timeout", "30");
        provider.set("retry_enabled", "true");
        provider.set("poll_interval", "250ms");

        assert_eq!(provider.get_string("server_base_url").unwrap(), "http://10.7.5.118:8000");
        assert_eq!(provider.get_int("timeout").unwrap(), 30);
        assert!(provider.get_bool("retry_enabled").unwrap());
        assert_eq!(provider.get_duration("poll_interval").unwrap(), Duration::from_millis(250));

        // Defaults
        assert_eq!(provider.get_string_or("missing", "default"), "default");
        assert_eq!(provider.get_int_or("missing", 60), 60);
        assert!(!provider.get_bool_or("missing", false));

        // Errors
        assert!(provider.get_string("missing").is_err());
        assert!(provider.get_int("server_base_url").is_err());
    }

    #[test]
    fn test_server_config_from_memory_provider() {
        let mut values = HashMap::new();
        values.insert("server_base_url".to_string(), "http://10.7.5.118:8000".to_string());
        values.insert("server_instructions_path".to_string(), "/instructions".to_string());
        values.insert("server_timeout_seconds".to_string(), "3".to_string());
        values.insert("server_max_retries".to_string(), "2".to_string());
        values.insert("server_poll_interval".to_string(), "5s".to_string());
        values.insert("server_max_poll_attempts".to_string(), "12".to_string());
        let provider = MemoryConfigProvider::with_values(values);

        let config = ServerConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "http://10.7.5.118:8000");
        assert_eq!(config.instructions_path, "/instructions");
        assert_eq!(config.telemetry_path, "/telemetry");
        assert_eq!(config.timeout(), Duration::from_secs(3));
        assert_eq!(config.max_retries, 2);
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.max_poll_attempts, 12);
        assert_eq!(config.service_name(), "robot_server");
    }

    #[test]
    fn test_server_config_defaults_from_empty_provider() {
        let config = ServerConfig::from_provider(&MemoryConfigProvider::new()).unwrap();
        assert_eq!(config, ServerConfig::default());
    }

    #[test]
    fn test_malformed_values_are_errors() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("server_timeout_seconds", "soon");
        assert!(ServerConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set("server_timeout_seconds", "-5");
        assert!(ServerConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set("server_poll_interval", "often");
        assert!(ServerConfig::from_provider(&provider).is_err());

        let mut provider = MemoryConfigProvider::new();
        provider.set("server_poll_interval", "999999999999999999m");
        assert!(ServerConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_out_of_range_counts_are_errors() {
        for key in ["server_max_retries", "server_max_poll_attempts"] {
            let mut provider = MemoryConfigProvider::new();
            provider.set(key, "4294967297");
            let err = ServerConfig::from_provider(&provider).unwrap_err();
            assert!(err.to_string().contains(key), "unexpected error for {}: {}", key, err);
        }

        let mut provider = MemoryConfigProvider::new();
        provider.set("server_max_retries", "4294967295");
        assert_eq!(ServerConfig::from_provider(&provider).unwrap().max_retries, u32::MAX);
    }

    #[test]
    fn test_zero_timeout_is_rejected() {
        let mut provider = MemoryConfigProvider::new();
        provider.set("server_timeout_seconds", "0");
        assert!(ServerConfig::from_provider(&provider).is_err());
    }

    #[test]
    fn test_validation() {
        let invalid = [
            ServerConfig::new(""),
            ServerConfig::new("10.7.5.118:8000"),
            ServerConfig::new("ftp://10.7.5.118"),
            ServerConfig {
                instructions_path: "get_instructions".to_string(),
                ..ServerConfig::default()
            },
            ServerConfig {
                poll_interval: Duration::ZERO,
                ..ServerConfig::default()
            },
            ServerConfig {
                max_poll_attempts: 0,
                ..ServerConfig::default()
            },
            ServerConfig {
                timeout_seconds: 0,
                ..ServerConfig::default()
            },
        ];

        for config in invalid {
            assert!(config.validate().is_err(), "expected {:?} to be rejected", config);
        }

        assert!(ServerConfig::new("https://robots.example.com/api").validate().is_ok());
    }

    #[test]
    fn test_env_config_provider() {
        env::set_var("RCS_TEST_ENV_SERVER_BASE_URL", "http://192.168.1.20:8000");
        env::set_var("RCS_TEST_ENV_SERVER_MAX_POLL_ATTEMPTS", "7");

        let provider = EnvConfigProvider::new()
            .with_prefix("RCS_TEST")
            .with_namespace("ENV");

        assert_eq!(provider.get_string("server_base_url").unwrap(), "http://192.168.1.20:8000");
        assert_eq!(provider.get_int("server-max-poll-attempts").unwrap(), 7);
        assert!(provider.get_string("server_summary_path").is_err());

        let config = ServerConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "http://192.168.1.20:8000");
        assert_eq!(config.max_poll_attempts, 7);

        env::remove_var("RCS_TEST_ENV_SERVER_BASE_URL");
        env::remove_var("RCS_TEST_ENV_SERVER_MAX_POLL_ATTEMPTS");
    }

    #[test]
    fn test_composite_config_provider() {
        let mut overrides = MemoryConfigProvider::new();
        overrides.set("server_base_url", "http://override:8000");

        let mut defaults = MemoryConfigProvider::new();
        defaults.set("server_base_url", "http://default:8000");
        defaults.set("server_summary_path", "/mission/summary");

        let provider = CompositeConfigProvider::new()
            .with_provider(overrides)
            .with_provider(defaults);

        assert_eq!(provider.get_string("server_base_url").unwrap(), "http://override:8000");
        assert_eq!(provider.get_string("server_summary_path").unwrap(), "/mission/summary");
        assert!(provider.get_string("missing").is_err());

        let config = ServerConfig::from_provider(&provider).unwrap();
        assert_eq!(config.base_url, "http://override:8000");
        assert_eq!(config.summary_path, "/mission/summary");
    }
}

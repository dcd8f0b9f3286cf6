//! Integration tests for configuration validation

#![allow(clippy::expect_used)]

use market_feed_protocol::config::{DecoderConfig, FeedConfig, LoggingConfig, MAX_FRAME_SIZE};
use tracing::Level;

#[test]
fn test_default_config_validates() {
    let config = FeedConfig::default();
    let errors = config.validate();
    assert!(
        errors.is_empty(),
        "Default config should be valid, but got errors: {:?}",
        errors
    );
    assert!(config.validate_strict().is_ok());
}

#[test]
fn test_frame_size_too_small() {
    let config = FeedConfig::default_with_overrides(|c| c.decoder.max_frame_size = 64);
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max frame size too small")));
}

#[test]
fn test_frame_size_too_large() {
    let config = FeedConfig::default_with_overrides(|c| c.decoder.max_frame_size = 512 * 1024 * 1024);
    let errors = config.validate();
    assert!(errors.iter().any(|e| e.contains("Max frame size too large")));
}

#[test]
fn test_zero_batch_elements() {
    let decoder = DecoderConfig {
        max_batch_elements: 0,
        ..DecoderConfig::default()
    };
    let errors = decoder.validate();
    assert!(errors
        .iter()
        .any(|e| e.contains("Max batch elements must be greater than 0")));
}

#[test]
fn test_batch_elements_beyond_header_range() {
    let decoder = DecoderConfig {
        max_batch_elements: 70_000,
        ..DecoderConfig::default()
    };
    let errors = decoder.validate();
    assert!(errors.iter().any(|e| e.contains("exceeds what a batch header")));
}

#[test]
fn test_empty_app_name() {
    let logging = LoggingConfig {
        app_name: String::new(),
        ..LoggingConfig::default()
    };
    let errors = logging.validate();
    assert!(errors.iter().any(|e| e.contains("cannot be empty")));
}

#[test]
fn test_long_app_name() {
    let logging = LoggingConfig {
        app_name: "x".repeat(65),
        ..LoggingConfig::default()
    };
    assert!(logging
        .validate()
        .iter()
        .any(|e| e.contains("Application name too long")));
}

#[test]
fn test_multiple_errors_reported_together() {
    let config = FeedConfig::default_with_overrides(|c| {
        c.decoder.max_frame_size = 1;
        c.decoder.max_batch_elements = 0;
        c.logging.app_name = String::new();
    });
    assert_eq!(config.validate().len(), 3);

    let err = config.validate_strict().expect_err("invalid config");
    assert!(err.to_string().contains("Configuration validation failed"));
}

#[test]
fn test_partial_toml_uses_defaults() {
    let config = FeedConfig::from_toml(
        r#"
        [decoder]
        max_batch_elements = 128

        [logging]
        log_level = "debug"
        json_format = true
        "#,
    )
    .expect("partial config parses");

    assert_eq!(config.decoder.max_batch_elements, 128);
    assert_eq!(config.decoder.max_frame_size, MAX_FRAME_SIZE);
    assert!(config.decoder.log_skipped_elements);
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert!(config.logging.json_format);
    assert_eq!(config.logging.app_name, "market-feed-protocol");
}

#[test]
fn test_invalid_log_level_rejected() {
    let result = FeedConfig::from_toml(
        r#"
        [logging]
        log_level = "loud"
        "#,
    );
    assert!(result.is_err());
}

#[test]
fn test_malformed_toml_rejected() {
    let err = FeedConfig::from_toml("[decoder\nmax_frame_size = ").expect_err("bad toml");
    assert!(err.to_string().contains("Failed to parse"));
}

#[test]
fn test_save_and_reload() {
    let path = std::env::temp_dir().join(format!("market-feed-config-{}.toml", std::process::id()));
    let config = FeedConfig::default_with_overrides(|c| {
        c.decoder.max_frame_size = 4096;
        c.logging.log_level = Level::WARN;
    });
    config.save_to_file(&path).expect("write config");

    let loaded = FeedConfig::from_file(&path).expect("read config");
    assert_eq!(loaded.decoder.max_frame_size, 4096);
    assert_eq!(loaded.logging.log_level, Level::WARN);

    let _ = std::fs::remove_file(&path);
}

#[test]
fn test_missing_file_reports_config_error() {
    let err = FeedConfig::from_file("/nonexistent/market-feed.toml").expect_err("no such file");
    assert!(err.to_string().contains("Configuration error"));
}

// Only this test touches the MARKET_FEED_* variables.
#[test]
fn test_env_overrides_defaults() {
    let vars = [
        ("MARKET_FEED_MAX_FRAME_SIZE", "4096"),
        ("MARKET_FEED_MAX_BATCH_ELEMENTS", "lots"),
        ("MARKET_FEED_LOG_LEVEL", "debug"),
        ("MARKET_FEED_LOG_JSON", "yes"),
    ];
    for (name, value) in vars {
        std::env::set_var(name, value);
    }

    let config = FeedConfig::from_env().unwrap();
    let defaults = FeedConfig::default();
    assert_eq!(config.decoder.max_frame_size, 4096);
    // unparseable value leaves the default in place
    assert_eq!(
        config.decoder.max_batch_elements,
        defaults.decoder.max_batch_elements
    );
    assert_eq!(config.logging.log_level, Level::DEBUG);
    assert!(config.logging.json_format);

    std::env::set_var("MARKET_FEED_LOG_JSON", "off");
    assert!(!FeedConfig::from_env().unwrap().logging.json_format);

    for (name, _) in vars {
        std::env::remove_var(name);
    }
    let config = FeedConfig::from_env().unwrap();
    assert_eq!(config.decoder.max_frame_size, defaults.decoder.max_frame_size);
    assert_eq!(config.logging.log_level, defaults.logging.log_level);
}

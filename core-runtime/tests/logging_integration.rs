//! Integration tests for the logging system

use core_runtime::logging::{
    init_logging, redact_if_sensitive, strip_path, LogFormat, LogLevel, LoggingConfig,
};

#[test]
fn test_logging_initializes_once() {
    // One global subscriber per process: the second attempt must fail cleanly.
    let config = LoggingConfig::default()
        .with_format(LogFormat::Compact)
        .with_level(LogLevel::Debug)
        .with_filter("core_runtime=debug");

    assert!(init_logging(config.clone()).is_ok());
    tracing::debug!(image_key = "abc123", "logging ready");

    assert!(init_logging(config).is_err());
}

#[test]
fn test_credentials_never_reach_log_fields() {
    let fields = [
        ("oauth_token", "tok"),
        ("oauth_token_secret", "sec"),
        ("oauth_signature", "sig"),
        ("consumer_key", "key"),
    ];

    for (name, value) in fields {
        assert_eq!(redact_if_sensitive(name, value), "[REDACTED]", "{}", name);
    }
}

#[test]
fn test_path_stripping() {
    assert_eq!(strip_path("Output/Jane/Trips/Paris/abc-X3.jpg"), "abc-X3.jpg");
    assert_eq!(strip_path("folder.json"), "folder.json");
}

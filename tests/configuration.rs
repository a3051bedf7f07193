//! Tests for configuration system

use greenkenya::{Config, config::LogFormat};
use greenkenya_notification::Provider;
use temp_dir::TempDir;

#[test]
fn test_config_loads_from_default_toml() {
    let config = Config::load(None).expect("Failed to load config");

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.port, 3000);
    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.mailbox.recipient, "greenkenyainitiative985@gmail.com");
    assert_eq!(config.timing.success_display_ms, 3000);
    assert_eq!(config.timing.fallback_delay_ms, 2000);
    assert_eq!(config.delivery.provider, Provider::Disabled);
    assert_eq!(config.delivery.timeout_secs, None);
    assert_eq!(config.forms.session_ttl_secs, 1800);
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_loads_from_explicit_path() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("greenkenya.toml");
    std::fs::write(
        &path,
        r#"
[server]
host = "127.0.0.1"
port = 8080

[observability]
format = "json"

[mailbox]
recipient = "membership@greenkenyainitiative.org"

[timing]
fallback_delay_ms = 500

[forms]
session_ttl_secs = 600

[delivery]
provider = "emailjs"
timeout_secs = 10

[delivery.emailjs]
service_id = "service_gki"
template_id = "template_contact"
public_key = "pk_live"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_string_lossy().into_owned()))
        .expect("Failed to load config");

    assert_eq!(config.server.port, 8080);
    assert_eq!(config.observability.format, LogFormat::Json);
    assert_eq!(config.observability.log_level, "info");
    assert_eq!(config.mailbox.recipient, "membership@greenkenyainitiative.org");
    assert_eq!(config.mailbox.chat_sender_label, "Website Visitor");
    assert_eq!(config.timing.fallback_delay_ms, 500);
    assert_eq!(config.timing.success_display_ms, 3000);
    assert_eq!(config.forms.session_ttl(), std::time::Duration::from_secs(600));
    assert_eq!(config.delivery.provider, Provider::EmailJs);
    assert_eq!(config.delivery.timeout_secs, Some(10));
    assert_eq!(config.delivery.emailjs.endpoint, "https://api.emailjs.com");
    assert_eq!(config.delivery.emailjs.private_key, None);
    assert!(config.validate().is_ok());
}

#[test]
fn test_emailjs_without_keys_fails_validation() {
    let dir = TempDir::new().unwrap();
    let path = dir.child("greenkenya.toml");
    std::fs::write(
        &path,
        r#"
[server]
host = "127.0.0.1"
port = 8080

[delivery]
provider = "emailjs"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_string_lossy().into_owned()))
        .expect("Failed to load config");

    assert!(config.validate().is_err());
}

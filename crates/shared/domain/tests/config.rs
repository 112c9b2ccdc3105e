use jtool_domain::config::{
    ExecutorConfig, HttpConfig, LockConfig, MailConfig, SftpConfig, ToolkitConfig,
};
use serde_json::json;

#[test]
fn config_defaults_are_sane() {
    let http = HttpConfig::default();
    assert_eq!(http.max_connections, 500);
    assert_eq!(http.max_per_route, 200);
    assert_eq!(http.connect_timeout_ms, 5_000);
    assert_eq!(http.socket_timeout_ms, 10_000);
    assert!(http.accept_invalid_certs);

    let mail = MailConfig::default();
    assert_eq!(mail.port, 465);
    assert_eq!(mail.protocol, "smtp");
    assert!(mail.ssl);

    assert_eq!(SftpConfig::default().port, 22);

    let lock = LockConfig::default();
    assert_eq!(lock.url, "redis://127.0.0.1:6379");
    assert_eq!(lock.expire_seconds, 30);

    assert_eq!(ExecutorConfig::default().default_name, "jtool-thread");
}

#[test]
fn toolkit_config_deserializes_partial_sections() {
    let raw = json!({
        "http": { "socket_timeout_ms": 2500 },
        "mail": { "host": "smtp.example.com", "ssl": false },
        "lock": { "url": "redis://cache:6379/2" }
    });

    let cfg: ToolkitConfig = serde_json::from_value(raw).expect("config deserialize");
    assert_eq!(cfg.http.socket_timeout_ms, 2500);
    assert_eq!(cfg.http.max_per_route, 200);
    assert_eq!(cfg.mail.host, "smtp.example.com");
    assert!(!cfg.mail.ssl);
    assert_eq!(cfg.mail.port, 465);
    assert_eq!(cfg.lock.expire_seconds, 30);
    assert_eq!(cfg.sftp.port, 22);
}

#[test]
fn toolkit_config_is_copy_on_write() {
    let original = ToolkitConfig::default();
    let mut changed = original.clone();
    changed.sftp.host = "files.internal".to_owned();

    assert_eq!(original.sftp.host, "");
    assert_eq!(changed.sftp.host, "files.internal");
}

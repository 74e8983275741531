use porch::config::{Config, Mode};
use std::path::PathBuf;
use std::sync::Mutex;

// Tests below mutate process-wide environment variables.
static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 6] = ["CONFIG", "LISTEN", "ROOT", "MIME_TYPES", "DEFAULT_MIME_TYPE", "MODE"];

fn clear_env() {
    for var in VARS {
        unsafe {
            std::env::remove_var(var);
        }
    }
}

#[test]
fn test_config_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let cfg = Config::load().unwrap();
    assert_eq!(cfg.listen_addr, "127.0.0.1:9898");
    assert_eq!(cfg.root, PathBuf::from("www"));
    assert_eq!(cfg.mime_types, PathBuf::from("/etc/mime.types"));
    assert_eq!(cfg.default_mime_type, "text/plain");
    assert_eq!(cfg.mode, Mode::Concurrent);
}

#[test]
fn test_config_env_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    unsafe {
        std::env::set_var("LISTEN", "0.0.0.0:3000");
        std::env::set_var("ROOT", "/srv/www");
        std::env::set_var("DEFAULT_MIME_TYPE", "application/octet-stream");
        std::env::set_var("MODE", "single");
    }

    let cfg = Config::load().unwrap();
    clear_env();

    assert_eq!(cfg.listen_addr, "0.0.0.0:3000");
    assert_eq!(cfg.root, PathBuf::from("/srv/www"));
    assert_eq!(cfg.default_mime_type, "application/octet-stream");
    assert_eq!(cfg.mode, Mode::Single);
}

#[test]
fn test_config_unknown_mode_is_rejected() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();
    unsafe {
        std::env::set_var("MODE", "forking");
    }

    let result = Config::load();
    clear_env();

    assert!(result.is_err());
}

#[test]
fn test_mode_parse() {
    assert_eq!("single".parse::<Mode>().unwrap(), Mode::Single);
    assert_eq!("concurrent".parse::<Mode>().unwrap(), Mode::Concurrent);

    let err = "forking".parse::<Mode>().unwrap_err();
    assert!(err.to_string().contains("forking"));
    assert!("Single".parse::<Mode>().is_err());
}

#[test]
fn test_config_file_then_env() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_env();

    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("porch.yaml");
    std::fs::write(
        &file,
        "listen_addr: \"127.0.0.1:8000\"\nroot: /var/www\nmode: single\n",
    )
    .unwrap();

    unsafe {
        std::env::set_var("CONFIG", &file);
        std::env::set_var("ROOT", "/override");
    }
    let cfg = Config::load().unwrap();
    clear_env();

    assert_eq!(cfg.listen_addr, "127.0.0.1:8000");
    assert_eq!(cfg.root, PathBuf::from("/override"));
    assert_eq!(cfg.mode, Mode::Single);
    assert_eq!(cfg.default_mime_type, "text/plain");
}

#[test]
fn test_config_from_yaml_partial() {
    let cfg = Config::from_yaml_str("default_mime_type: text/html\n").unwrap();
    assert_eq!(cfg.default_mime_type, "text/html");
    assert_eq!(cfg.listen_addr, "127.0.0.1:9898");

    let empty = Config::from_yaml_str("").unwrap();
    assert_eq!(empty.mode, Mode::Concurrent);
}

#[test]
fn test_config_from_yaml_invalid_mode() {
    assert!(Config::from_yaml_str("mode: forking\n").is_err());
}

#[test]
fn test_config_port() {
    let cfg = Config {
        listen_addr: "0.0.0.0:5000".to_string(),
        ..Config::default()
    };
    assert_eq!(cfg.port(), "5000");

    let v6 = Config {
        listen_addr: "[::1]:8080".to_string(),
        ..Config::default()
    };
    assert_eq!(v6.port(), "8080");
}

#[test]
fn test_config_canonical_root() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = Config {
        root: dir.path().join("."),
        ..Config::default()
    };

    let cfg = cfg.with_canonical_root().unwrap();
    assert_eq!(cfg.root, dir.path().canonicalize().unwrap());

    let missing = Config {
        root: dir.path().join("missing"),
        ..Config::default()
    };
    assert!(missing.with_canonical_root().is_err());
}

#[test]
fn test_config_clone() {
    let cfg1 = Config::default();
    let cfg2 = cfg1.clone();
    assert_eq!(cfg1.listen_addr, cfg2.listen_addr);
    assert_eq!(cfg1.root, cfg2.root);
}

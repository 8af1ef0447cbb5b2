//! Integration tests for layered configuration loading.
//!
//! Verifies that defaults, configuration files, environment variables, and
//! command-line flags combine in precedence order, and that malformed files
//! are reported instead of silently ignored.

use std::ffi::{OsStr, OsString};
use std::fs;
use std::sync::{Mutex, MutexGuard};

use once_cell::sync::Lazy;
use rstest::rstest;
use tempfile::TempDir;

use loupe_config::{Config, ControlSocket, LogFormat, default_control_socket};
use ortho_config::OrthoConfig;

static ENV_MUTEX: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

struct EnvOverride {
    key: &'static str,
    previous: Option<OsString>,
    guard: Option<MutexGuard<'static, ()>>,
}

impl EnvOverride {
    fn set_var(key: &'static str, value: &OsStr) -> Self {
        let guard = ENV_MUTEX
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        let previous = std::env::var_os(key);
        // Environment mutation is unsafe in edition 2024; the mutex serialises
        // every test touching the environment and `Drop` restores it.
        unsafe { std::env::set_var(key, value) };
        Self {
            key,
            previous,
            guard: Some(guard),
        }
    }
}

impl Drop for EnvOverride {
    fn drop(&mut self) {
        match self.previous.take() {
            Some(value) => unsafe { std::env::set_var(self.key, value) },
            None => unsafe { std::env::remove_var(self.key) },
        }
        drop(self.guard.take());
    }
}

fn env_lock() -> MutexGuard<'static, ()> {
    ENV_MUTEX
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
}

fn args(extra: &[&str]) -> Vec<OsString> {
    std::iter::once("loupe")
        .chain(extra.iter().copied())
        .map(OsString::from)
        .collect()
}

#[test]
fn defaults_apply_without_overrides() {
    let _lock = env_lock();
    let config = Config::load_from_iter(args(&[])).expect("load defaults");
    assert_eq!(config.control_socket(), &default_control_socket());
    assert_eq!(config.max_clients(), 8);
    assert_eq!(config.log_format(), LogFormat::Compact);
}

#[rstest]
#[case::bare_path("/tmp/loupe-cli/.command")]
#[case::unix_url("unix:///tmp/loupe-cli/.command")]
fn cli_flag_sets_control_socket(#[case] value: &str) {
    let _lock = env_lock();
    let config =
        Config::load_from_iter(args(&["--control-socket", value])).expect("load with flag");
    assert_eq!(
        config.control_socket(),
        &ControlSocket::new("/tmp/loupe-cli/.command")
    );
}

#[test]
fn file_then_environment_then_cli_take_precedence() {
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("loupe.toml");
    fs::write(
        &path,
        "control_socket = \"/tmp/loupe-file/.command\"\nmax_clients = 3\nlog_filter = \"warn\"\n",
    )
    .expect("write config file");

    let _env = EnvOverride::set_var("LOUPE_MAX_CLIENTS", OsStr::new("5"));
    let cli_path = path.to_string_lossy().into_owned();
    let config = Config::load_from_iter(args(&[
        "--config-path",
        &cli_path,
        "--log-filter",
        "debug",
    ]))
    .expect("load layered configuration");

    assert_eq!(
        config.control_socket(),
        &ControlSocket::new("/tmp/loupe-file/.command")
    );
    assert_eq!(config.max_clients(), 5, "environment beats file");
    assert_eq!(config.log_filter(), "debug", "cli beats file");
}

#[test]
fn malformed_file_is_reported() {
    let _lock = env_lock();
    let temp_dir = TempDir::new().expect("create temp dir");
    let path = temp_dir.path().join("loupe.toml");
    fs::write(&path, "max_clients = not_a_number\n").expect("write malformed config");

    let cli_path = path.to_string_lossy().into_owned();
    let result = Config::load_from_iter(args(&["--config-path", &cli_path]));
    assert!(result.is_err(), "malformed configuration must fail to load");
}

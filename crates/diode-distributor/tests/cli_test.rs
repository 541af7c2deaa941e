//! Integration tests for the `diode-distributor` binary.
//!
//! Only failure paths and help output: a successful start would block.
#![allow(clippy::unwrap_used)]

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;

// ── Helpers ─────────────────────────────────────────────────────────

/// Build a command with every distributor variable cleared.
fn distributor_cmd() -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("diode-distributor");
    cmd.env_remove("GRPC_PORT")
        .env_remove("DIODE_DISTRIBUTOR_CONFIG")
        .env_remove("DIODE_DISTRIBUTOR_HOST")
        .env_remove("DIODE_DISTRIBUTOR_GRPC_PORT")
        .env_remove("DIODE_DISTRIBUTOR_API_KEYS")
        .env_remove("DIODE_DISTRIBUTOR_TLS_CERT")
        .env_remove("DIODE_DISTRIBUTOR_TLS_KEY")
        .env_remove("DIODE_DISTRIBUTOR_LOG_FORMAT")
        .env("RUST_LOG", "error");
    cmd
}

// ── Invocation ──────────────────────────────────────────────────────

#[test]
fn help_lists_the_listen_options() {
    distributor_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--port"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn unknown_log_format_is_a_usage_error() {
    distributor_cmd()
        .args(["--log-format", "xml"])
        .assert()
        .failure()
        .code(2);
}

// ── Fatal startup errors ────────────────────────────────────────────

#[test]
fn occupied_port_is_a_fatal_bind_error() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port();

    distributor_cmd()
        .env("DIODE_DISTRIBUTOR_HOST", "127.0.0.1")
        .env("DIODE_DISTRIBUTOR_API_KEYS", "k")
        .args(["--port", &port.to_string()])
        .assert()
        .failure()
        .code(4)
        .stderr(predicate::str::contains("Could not listen on"));
}

#[test]
fn hostname_in_listen_host_is_a_config_error() {
    distributor_cmd()
        .env("DIODE_DISTRIBUTOR_HOST", "localhost")
        .args(["--port", "0"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[test]
fn malformed_config_file_is_a_config_error() {
    let dir = std::env::temp_dir().join(format!("diode-cli-{}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("distributor.toml");
    std::fs::write(&path, "grpc_port = \"not a port\"\n").unwrap();

    distributor_cmd()
        .arg("--config")
        .arg(&path)
        .assert()
        .failure()
        .code(3);

    std::fs::remove_dir_all(&dir).unwrap();
}

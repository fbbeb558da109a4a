//! Build script for lambda-deployer
//! Captures build-time metadata for version and environment info

use chrono::Utc;
use std::path::PathBuf;
use std::process::Command;

fn main() {
    // Get git commit hash
    let git_hash = Command::new("git")
        .args(["rev-parse", "--short", "HEAD"])
        .output()
        .ok()
        .and_then(|output| String::from_utf8(output.stdout).ok())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let build_time = Utc::now().format("%Y-%m-%d %H:%M:%S UTC").to_string();
    let target = std::env::var("TARGET").unwrap_or_else(|_| "unknown".to_string());
    let sdk_version = lambda_sdk_version().unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", git_hash);
    println!("cargo:rustc-env=BUILD_TIME={}", build_time);
    println!("cargo:rustc-env=BUILD_TARGET={}", target);
    println!("cargo:rustc-env=AWS_SDK_LAMBDA_VERSION={}", sdk_version);

    println!("cargo:rerun-if-changed=../.git/HEAD");
    println!("cargo:rerun-if-changed=../Cargo.lock");
}

/// Resolved aws-sdk-lambda version, read from the workspace lock file
fn lambda_sdk_version() -> Option<String> {
    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").ok()?);
    let lock = std::fs::read_to_string(manifest_dir.parent()?.join("Cargo.lock")).ok()?;

    lock.split("[[package]]")
        .find(|package| lock_field(package, "name") == Some("aws-sdk-lambda"))
        .and_then(|package| lock_field(package, "version"))
        .map(str::to_string)
}

/// Value of `key = "value"` within one lock file package entry
fn lock_field<'a>(package: &'a str, key: &str) -> Option<&'a str> {
    package.lines().find_map(|line| {
        let (k, v) = line.split_once('=')?;
        if k.trim() != key {
            return None;
        }
        v.trim().strip_prefix('"')?.strip_suffix('"')
    })
}

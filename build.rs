use std::env;
use std::process::Command;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs");

    let git_hash = run("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".to_string());
    let git_status = match run("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let target = env::var("TARGET").unwrap_or_else(|_| "unknown-target".to_string());
    let profile = env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".to_string());
    let rustc = run("rustc", &["--version"]).unwrap_or_else(|| "unknown".to_string());

    for (key, value) in [
        ("HASH", git_hash.as_str()),
        ("STATUS", git_status),
        ("TIMESTAMP", timestamp.as_str()),
        ("TARGET", target.as_str()),
        ("PROFILE", profile.as_str()),
        ("RUSTC", rustc.as_str()),
    ] {
        println!("cargo:rustc-env=FINANCE_CORE_BUILD_{key}={value}");
    }
}

/// Trimmed stdout of a successful command.
fn run(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|stdout| stdout.trim().to_string())
}

// Injects RISKHUB_VERSION for `riskhub --version`
//
// Uses `git describe` when the build runs inside a checkout and falls back to
// the package version otherwise.

use std::process::Command;

fn main() {
    let version = git_version().unwrap_or_else(|| env!("CARGO_PKG_VERSION").to_string());

    println!("cargo:rustc-env=RISKHUB_VERSION={}", version);
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/tags");
}

fn git_version() -> Option<String> {
    let output = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }

    let described = String::from_utf8(output.stdout).ok()?;
    Some(version_from_describe(described.trim()))
}

/// "v0.2.0" and "v0.2.0-4-gabc123" both become "0.2.0"; an untagged
/// "abc123-dirty" becomes "<pkg version>-abc123-dirty"
fn version_from_describe(described: &str) -> String {
    match described.strip_prefix('v') {
        Some(tagged) => tagged.split('-').next().unwrap_or(tagged).to_string(),
        None => format!("{}-{}", env!("CARGO_PKG_VERSION"), described),
    }
}

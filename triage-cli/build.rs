use std::env;
use std::process::Command;

// Packaged sources have no .git; they pass the revision in directly.
const OVERRIDE: &str = "TRIAGE_BUILD_SHA";

fn main() {
    println!("cargo:rerun-if-env-changed={OVERRIDE}");

    let revision = env::var(OVERRIDE)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .or_else(git_revision)
        .unwrap_or_else(|| "unknown".to_string());

    println!("cargo:rustc-env={OVERRIDE}={revision}");
}

/// `git describe` of the workspace, e.g. `3f2c1ab9` or `3f2c1ab9-dirty`.
fn git_revision() -> Option<String> {
    let workspace = env::var("CARGO_MANIFEST_DIR").ok()? + "/..";
    let out = Command::new("git")
        .args(["-C", &workspace, "describe", "--always", "--dirty", "--abbrev=8"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let rev = String::from_utf8_lossy(&out.stdout).trim().to_string();
    (!rev.is_empty()).then_some(rev)
}

//! Stamps the binary with `git describe` so `kbank --version` names the commit.

use std::path::Path;
use std::process::Command;

fn git_describe(repo: &Path) -> Option<String> {
    let out = Command::new("git")
        .arg("-C")
        .arg(repo)
        .args(["describe", "--always", "--dirty", "--tags"])
        .output()
        .ok()?;
    if !out.status.success() {
        return None;
    }
    let described = String::from_utf8(out.stdout).ok()?.trim().to_string();
    (!described.is_empty()).then_some(described)
}

fn main() {
    let manifest_dir = std::env::var("CARGO_MANIFEST_DIR").unwrap_or_else(|_| ".".to_string());
    let repo = Path::new(&manifest_dir).join("..");

    let describe = git_describe(&repo).unwrap_or_else(|| "unreleased".to_string());
    println!("cargo:rustc-env=KBANK_GIT_DESCRIBE={describe}");

    let head = repo.join(".git").join("HEAD");
    if head.exists() {
        println!("cargo:rerun-if-changed={}", head.display());
    }
    println!("cargo:rerun-if-changed=build.rs");
}

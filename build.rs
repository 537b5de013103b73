//! Build script: embeds the version string via `ACTIVELOG_VERSION`.

use std::process::Command;

fn main() {
    // Prefer ACTIVELOG_VERSION env var if set (e.g., by a release workflow),
    // otherwise fall back to git describe for local development builds.
    if let Ok(version) = std::env::var("ACTIVELOG_VERSION") {
        println!("cargo:rustc-env=ACTIVELOG_VERSION={version}");
    } else if let Ok(output) = Command::new("git")
        .args(["describe", "--tags", "--always", "--dirty"])
        .output()
        && output.status.success()
    {
        let version = String::from_utf8_lossy(&output.stdout).trim().to_string();
        println!("cargo:rustc-env=ACTIVELOG_VERSION={version}");
    }

    // Re-run if git HEAD changes or env var changes
    println!("cargo:rerun-if-changed=.git/HEAD");
    println!("cargo:rerun-if-changed=.git/refs/");
    println!("cargo:rerun-if-env-changed=ACTIVELOG_VERSION");
}

use std::env;

const DEFAULT_MAJOR: &str = "1.0";
const DEFAULT_MINOR: &str = "0-dev";

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Packagers stamp the version at build time; local builds get the dev version.
    println!("cargo:rerun-if-env-changed=MIMIC_MAJOR_VERSION");
    println!("cargo:rerun-if-env-changed=MIMIC_MINOR_VERSION");

    let major = normalize(env::var("MIMIC_MAJOR_VERSION").ok()).unwrap_or(DEFAULT_MAJOR.into());
    let minor = normalize(env::var("MIMIC_MINOR_VERSION").ok()).unwrap_or(DEFAULT_MINOR.into());

    println!("cargo:rustc-env=MIMIC_BUILD_MAJOR={major}");
    println!("cargo:rustc-env=MIMIC_BUILD_MINOR={minor}");
}

fn normalize(raw: Option<String>) -> Option<String> {
    let raw = raw?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

//! Build/version metadata shared across mimic frontends.
//!
//! The major and minor components are stamped by the build script from
//! `MIMIC_MAJOR_VERSION` / `MIMIC_MINOR_VERSION`. Unstamped builds report
//! `1.0.0-dev`.

/// Major component, e.g. `1.0`.
pub const MAJOR: &str = env!("MIMIC_BUILD_MAJOR");

/// Minor component, e.g. `0-dev`.
pub const MINOR: &str = env!("MIMIC_BUILD_MINOR");

/// The version string reported by `--version` and `GET /version`.
pub const VERSION: &str = concat!(env!("MIMIC_BUILD_MAJOR"), ".", env!("MIMIC_BUILD_MINOR"));

/// The `SemVer` version of the crate (from Cargo).
pub const SEMVER: &str = env!("CARGO_PKG_VERSION");

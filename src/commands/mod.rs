//! Top-level command orchestration.

pub mod install;

/// Version string baked in at build time, falling back to the crate version.
#[must_use]
pub const fn version() -> &'static str {
    match option_env!("LINKFARM_VERSION") {
        Some(version) => version,
        None => env!("CARGO_PKG_VERSION"),
    }
}

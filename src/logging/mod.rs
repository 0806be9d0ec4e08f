//! Logging infrastructure for console and file output.

mod logger;
mod subscriber;
mod utils;

pub use logger::Logger;
pub use subscriber::init_subscriber;

/// Target of stage headers.
pub const STAGE_TARGET: &str = "linkfarm::stage";

/// Target of actions a dry run would take.
pub const DRY_RUN_TARGET: &str = "linkfarm::dry_run";

/// Create a Logger whose events reach an isolated per-thread file layer.
///
/// Keep the returned guard alive for the whole test; dropping it restores
/// the previous thread-local dispatcher.
#[cfg(test)]
#[allow(clippy::expect_used)]
pub(crate) fn isolated_logger() -> (
    Logger,
    tempfile::TempDir,
    std::path::PathBuf,
    tracing::dispatcher::DefaultGuard,
) {
    use tracing_subscriber::{Layer as _, filter::LevelFilter, layer::SubscriberExt as _};
    let tmp = tempfile::tempdir().expect("failed to create temp dir");
    let path = tmp.path().join("test.log");
    let file_layer = subscriber::FileLayer::new(&path).expect("failed to create file layer");
    let subscriber =
        tracing_subscriber::registry().with(file_layer.with_filter(LevelFilter::DEBUG));
    let guard = tracing::dispatcher::set_default(&tracing::Dispatch::new(subscriber));
    (Logger::new(Some(path.clone())), tmp, path, guard)
}

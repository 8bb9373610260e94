// ABOUTME: Watch module for periodically rebuilding the site
// ABOUTME: Reruns build passes on a fixed interval, one pass at a time

use log::{debug, error, info};
use std::thread;
use std::time::Duration;

use crate::config::Config;
use crate::errors::Result;
use crate::generator::Generator;

/// Configuration for watch mode
#[derive(Debug, Clone)]
pub struct WatchConfig {
    /// Time between the end of one pass and the start of the next
    pub interval: Duration,

    /// Stop after this many passes; `None` runs until the process exits
    pub max_passes: Option<usize>,
}

impl Default for WatchConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(5),
            max_passes: None,
        }
    }
}

impl WatchConfig {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: config.scan_interval(),
            ..Self::default()
        }
    }
}

/// Keep rebuilding the site every `interval`.
///
/// The next sleep only starts once the previous pass has returned, so passes
/// never overlap. A pass that fails is logged and retried on the next tick;
/// fatal errors (broken templates or config) end the loop.
pub fn watch_site(generator: &mut Generator, config: &WatchConfig) -> Result<()> {
    info!(
        "Rescanning {:?} every {:?}",
        generator.config().content_dir,
        config.interval
    );

    let mut passes = 0;
    while config.max_passes.map_or(true, |max| passes < max) {
        thread::sleep(config.interval);
        passes += 1;

        match generator.build() {
            Ok(report) if report.changed() => info!("Site rebuilt: {}", report),
            Ok(_) => debug!("No changes detected"),
            Err(e) if e.is_fatal() => {
                error!("Stopping watch mode: {}", e);
                return Err(e);
            }
            Err(e) => error!("Build pass failed, retrying in {:?}: {}", config.interval, e),
        }
    }

    Ok(())
}

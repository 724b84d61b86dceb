#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Shared CLI utilities for the access calculator tools.
//!
//! [`init_logger`] routes `log` output through `indicatif-log-bridge` so
//! log lines are suspended while progress bars redraw, and
//! [`IndicatifProgress`] puts an `indicatif` bar behind the calculator's
//! [`ProgressCallback`] trait.

use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use seattle_access::progress::ProgressCallback;

pub use indicatif::MultiProgress;

/// An `indicatif` [`ProgressBar`] that implements [`ProgressCallback`].
pub struct IndicatifProgress {
    bar: ProgressBar,
    /// Style to switch to once `set_total()` provides a known length.
    bar_style: ProgressStyle,
}

impl IndicatifProgress {
    /// Creates a bar for a sweep whose length is known up front, e.g. one
    /// step per snapshot year.
    #[must_use]
    pub fn steps_bar(
        multi: &MultiProgress,
        message: &str,
        total: u64,
    ) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new(total));
        let bar_style = ProgressStyle::with_template(
            "{msg} {wide_bar:.green/dim} {pos}/{len} [{elapsed_precise}]",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");
        bar.set_style(bar_style.clone());
        bar.set_message(message.to_string());

        Arc::new(Self { bar, bar_style })
    }

    /// Creates a spinner for work of unknown length. Turns into a bar if
    /// [`ProgressCallback::set_total()`] is called.
    #[must_use]
    pub fn spinner(multi: &MultiProgress, message: &str) -> Arc<dyn ProgressCallback> {
        let bar = multi.add(ProgressBar::new_spinner());
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(message.to_string());

        let bar_style = ProgressStyle::with_template(
            "  {msg} {wide_bar:.cyan/dim} {pos}/{len} {percent}%",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("##-");

        Arc::new(Self { bar, bar_style })
    }
}

impl ProgressCallback for IndicatifProgress {
    fn set_total(&self, total: u64) {
        self.bar.set_length(total);
        self.bar.set_position(0);
        self.bar.set_style(self.bar_style.clone());
    }

    fn inc(&self, delta: u64) {
        self.bar.inc(delta);
    }

    fn set_message(&self, msg: String) {
        self.bar.set_message(msg);
    }

    fn finish(&self, msg: String) {
        self.bar.finish_with_message(msg);
    }
}

/// Initializes the global logger wrapped in `indicatif-log-bridge`.
///
/// Returns the [`MultiProgress`] that all progress bars must be added to.
/// Defaults to `info` when `RUST_LOG` is unset.
#[must_use]
pub fn init_logger() -> MultiProgress {
    let multi = MultiProgress::new();

    let mut builder = pretty_env_logger::formatted_builder();
    builder.filter_level(log::LevelFilter::Info);
    if let Ok(filters) = std::env::var("RUST_LOG") {
        builder.parse_filters(&filters);
    }
    let logger = builder.build();
    let level = logger.filter();

    // Already set when called twice, e.g. from tests.
    indicatif_log_bridge::LogWrapper::new(multi.clone(), logger)
        .try_init()
        .ok();

    log::set_max_level(level);

    multi
}

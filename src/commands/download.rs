//! `relay download`: stream a download and render its progress.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Result, bail};
use futures_util::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use relay_core::{DownloadUpdate, RequestSession};
use tracing::{debug, info};

use super::environment::resolve_environment;
use crate::cli::DownloadArgs;

/// Resolution of the determinate progress bar (per-mille).
const BAR_LENGTH: u64 = 1000;

pub async fn run_download_command(args: &DownloadArgs, quiet: bool) -> Result<()> {
    let environment = resolve_environment(&args.environment)?;
    let session = Arc::new(RequestSession::with_timeout(Duration::from_secs(
        args.timeout,
    )));

    let interrupt = {
        let session = Arc::clone(&session);
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                debug!("interrupt received");
                session.cancel_current_download();
            }
        })
    };

    let mut updates = session.start_download(&args.url, environment.as_ref());
    let mut display = ProgressDisplay::new(quiet);
    let mut failure = None;
    let mut finished = false;

    while let Some(update) = updates.next().await {
        match update {
            DownloadUpdate::Progress { fraction, info } => display.progress(fraction, &info),
            DownloadUpdate::Indeterminate { info } => display.indeterminate(&info),
            DownloadUpdate::Finished => finished = true,
            DownloadUpdate::Error { message } => failure = Some(message),
        }
    }
    interrupt.abort();

    if let Some(message) = failure {
        display.abandon();
        bail!("download failed: {message}");
    }
    if finished {
        display.finish("Download complete");
        info!("download complete");
    } else {
        display.abandon();
        info!("download cancelled");
    }
    Ok(())
}

/// Lazily chooses a bar or a spinner depending on the first update.
struct ProgressDisplay {
    quiet: bool,
    bar: Option<ProgressBar>,
}

impl ProgressDisplay {
    fn new(quiet: bool) -> Self {
        Self { quiet, bar: None }
    }

    fn progress(&mut self, fraction: f64, info: &str) {
        let quiet = self.quiet;
        let bar = self.bar.get_or_insert_with(|| determinate_bar(quiet));
        bar.set_position(per_mille(fraction));
        bar.set_message(info.to_string());
    }

    fn indeterminate(&mut self, info: &str) {
        let quiet = self.quiet;
        let bar = self.bar.get_or_insert_with(|| spinner(quiet));
        bar.set_message(info.to_string());
    }

    fn finish(&self, message: &'static str) {
        if let Some(bar) = &self.bar {
            bar.finish_with_message(message);
        } else if !self.quiet {
            eprintln!("{message}");
        }
    }

    fn abandon(&self) {
        if let Some(bar) = &self.bar {
            bar.abandon();
        }
    }
}

fn determinate_bar(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(BAR_LENGTH);
    bar.set_style(
        ProgressStyle::with_template("{bar:40.cyan/blue} {percent:>3}% {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    bar
}

fn spinner(quiet: bool) -> ProgressBar {
    if quiet {
        return ProgressBar::hidden();
    }
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::with_template("{spinner} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn per_mille(fraction: f64) -> u64 {
    (fraction.clamp(0.0, 1.0) * BAR_LENGTH as f64).round() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_per_mille_clamps_and_rounds() {
        assert_eq!(per_mille(0.0), 0);
        assert_eq!(per_mille(0.4567), 457);
        assert_eq!(per_mille(1.0), BAR_LENGTH);
        assert_eq!(per_mille(1.5), BAR_LENGTH);
        assert_eq!(per_mille(-0.2), 0);
    }

    #[test]
    fn test_quiet_display_uses_hidden_bars() {
        let mut display = ProgressDisplay::new(true);
        display.progress(0.5, "half");
        assert!(display.bar.as_ref().is_some_and(ProgressBar::is_hidden));
    }
}

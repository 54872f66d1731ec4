//! Loading banner: reveal the status element, hide it again after a
//! fixed delay.
//!
//! The delay runs independently of whatever operation the banner announces.
//! The hide is a task on the runtime the banner was created in, or the
//! caller's runtime; with neither, the banner is shown and stays up.

use crate::config::{BannerConfig, HidePolicy};
use crate::page::StatusBanner;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

static GLOBAL_BANNER: OnceLock<LoadingBanner> = OnceLock::new();

pub struct LoadingBanner {
    element: Option<StatusBanner>,
    hide_after: Duration,
    policy: HidePolicy,
    runtime: Option<Handle>,
    pending_hide: Mutex<Option<JoinHandle<()>>>,
}

impl LoadingBanner {
    pub fn new(element: Option<StatusBanner>, config: &BannerConfig) -> Self {
        Self {
            element,
            hide_after: Duration::from_millis(config.hide_after_ms),
            policy: config.policy,
            runtime: Handle::try_current().ok(),
            pending_hide: Mutex::new(None),
        }
    }

    pub fn show(&self) {
        if let Some(element) = &self.element {
            element.show();
        }

        let Some(runtime) = self.runtime.clone().or_else(|| Handle::try_current().ok()) else {
            debug!("No runtime to schedule the banner hide on");
            return;
        };

        let element = self.element.clone();
        // The deadline is read from the runtime's clock.
        let _entered = runtime.enter();
        let deadline = Instant::now() + self.hide_after;
        let hide = runtime.spawn(async move {
            tokio::time::sleep_until(deadline).await;
            if let Some(element) = element {
                element.hide();
            }
        });

        match self.policy {
            HidePolicy::Reschedule => {
                let mut pending = self
                    .pending_hide
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner);
                if let Some(previous) = pending.replace(hide) {
                    previous.abort();
                }
            }
            // Detached: runs to completion on its own.
            HidePolicy::Stack => drop(hide),
        }

        debug!(
            element = self.element.is_some(),
            hide_after_ms = self.hide_after.as_millis() as u64,
            "Loading banner shown"
        );
    }

    pub fn is_visible(&self) -> bool {
        self.element.as_ref().is_some_and(StatusBanner::is_visible)
    }

    /// Makes this banner the target of [`show_loading_message`].
    ///
    /// Only the first installation sticks; returns false if one was already
    /// in place.
    pub fn install(self) -> bool {
        GLOBAL_BANNER.set(self).is_ok()
    }
}

/// Shows the process-wide loading banner, if one is installed.
pub fn show_loading_message() {
    match GLOBAL_BANNER.get() {
        Some(banner) => banner.show(),
        None => debug!("No loading banner installed"),
    }
}

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::view::View;

/// Format whole elapsed seconds as `MM:SS`
///
/// Minutes are not capped; a recording past 99 minutes shows three digits.
pub fn format_elapsed(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

/// Periodic task that writes the elapsed time to the view
pub struct ElapsedTimer {
    handle: Option<JoinHandle<()>>,
}

impl ElapsedTimer {
    /// Start ticking every `period`, first tick one period after `started`
    pub fn spawn(started: Instant, period: Duration, view: Arc<dyn View>) -> Self {
        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(started + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                view.set_timer(&format_elapsed(started.elapsed().as_secs()));
            }
        });

        Self {
            handle: Some(handle),
        }
    }

    /// Stop ticking; no update reaches the view after this returns
    pub async fn cancel(mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            let _ = handle.await;
        }
    }
}

impl Drop for ElapsedTimer {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::format_elapsed;

    #[test]
    fn pads_minutes_and_seconds() {
        assert_eq!(format_elapsed(0), "00:00");
        assert_eq!(format_elapsed(7), "00:07");
        assert_eq!(format_elapsed(60), "01:00");
        assert_eq!(format_elapsed(754), "12:34");
    }

    #[test]
    fn minutes_grow_past_two_digits() {
        assert_eq!(format_elapsed(100 * 60 + 5), "100:05");
    }
}

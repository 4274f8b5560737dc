// SPDX-License-Identifier: MPL-2.0
//! Progress sampler service.
//!
//! Subscribes to the shared playhead of the active player resource and
//! periodically converts raw position/duration into a normalized
//! fraction. Ticks taken while the duration is still unknown are
//! skipped rather than emitted as bogus values.
//!
//! Starting an active sampler replaces the previous subscription without
//! leaking it; the epoch stamp on every tick lets the controller drop
//! samples from a subscription that has since been replaced (after a
//! seek) or stopped.

use super::backend::SharedPlayhead;
use super::controller::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct ProgressSampler {
    events: mpsc::UnboundedSender<SessionEvent>,
    epoch: u64,
    task: Option<JoinHandle<()>>,
}

impl ProgressSampler {
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            events,
            epoch: 0,
            task: None,
        }
    }

    /// Begins periodic sampling of the playhead.
    ///
    /// Idempotent: starting while active aborts the previous sampling
    /// task and advances the epoch, so stale ticks are dropped by the
    /// controller.
    pub fn start(&mut self, playhead: SharedPlayhead, interval: Duration) {
        self.abort_task();
        self.epoch = self.epoch.wrapping_add(1);
        let epoch = self.epoch;
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick completes immediately; skip it so samples
            // start one interval after playback begins.
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(fraction) = playhead.fraction() else {
                    continue;
                };
                if events
                    .send(SessionEvent::Progress { fraction, epoch })
                    .is_err()
                {
                    break;
                }
            }
        }));
    }

    /// Stops sampling. Safe to call when not started.
    pub fn stop(&mut self) {
        self.abort_task();
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Returns true if a delivered tick belongs to the live subscription.
    pub(crate) fn is_current(&self, epoch: u64) -> bool {
        epoch == self.epoch
    }

    /// Returns true while a sampling task is running.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for ProgressSampler {
    fn drop(&mut self) {
        self.abort_task();
    }
}

impl std::fmt::Debug for ProgressSampler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProgressSampler")
            .field("epoch", &self.epoch)
            .field("active", &self.is_active())
            .finish()
    }
}

// SPDX-License-Identifier: MPL-2.0
//! Auto-hide timer service.
//!
//! Schedules the single delayed "hide controls" callback for a session.
//! Scheduling implicitly cancels the previous timer, so at most one is
//! outstanding per session. A generation stamp rides on every firing so
//! the controller can drop a firing that was already queued when the
//! timer was cancelled or rescheduled.

use super::controller::SessionEvent;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

pub struct HideTimer {
    events: mpsc::UnboundedSender<SessionEvent>,
    generation: u64,
    task: Option<JoinHandle<()>>,
}

impl HideTimer {
    #[must_use]
    pub fn new(events: mpsc::UnboundedSender<SessionEvent>) -> Self {
        Self {
            events,
            generation: 0,
            task: None,
        }
    }

    /// Schedules the auto-hide callback, replacing any outstanding timer.
    pub fn schedule(&mut self, delay: Duration) {
        self.abort_task();
        self.generation = self.generation.wrapping_add(1);
        let generation = self.generation;
        let events = self.events.clone();
        self.task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Session may already be gone; a closed channel is fine here.
            let _ = events.send(SessionEvent::ControlsTimedOut { generation });
        }));
    }

    /// Cancels any outstanding timer. Safe to call when none is scheduled.
    ///
    /// The generation advances so that a firing already sitting in the
    /// event queue is recognized as stale.
    pub fn cancel(&mut self) {
        self.abort_task();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Returns true if a delivered firing belongs to the live timer.
    pub(crate) fn is_current(&self, generation: u64) -> bool {
        generation == self.generation
    }

    /// Returns true while a timer is outstanding (scheduled, not yet fired).
    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    fn abort_task(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}

impl Drop for HideTimer {
    fn drop(&mut self) {
        self.abort_task();
    }
}

impl std::fmt::Debug for HideTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HideTimer")
            .field("generation", &self.generation)
            .field("scheduled", &self.is_scheduled())
            .finish()
    }
}

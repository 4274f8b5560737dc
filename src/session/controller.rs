// SPDX-License-Identifier: MPL-2.0
//! Playback session controller.
//!
//! The controller is the single writer of a session's state. Every input
//! (user gestures, backend status events, timer firings, sampler ticks)
//! arrives as a [`SessionEvent`] and is applied by [`SessionController::handle_event`],
//! which returns an [`Effect`] telling the caller whether the observable
//! snapshot changed or the session shut down.
//!
//! Late deliveries are harmless by construction: a `disposed` flag drops
//! everything after close, and generation/epoch stamps drop firings and
//! ticks that belong to a cancelled timer or a replaced sampler
//! subscription.

use super::backend::{BackendEvent, BackendHandle, BackendListener, PlayerBackend};
use super::fraction::Fraction;
use super::sampler::ProgressSampler;
use super::state::{PlaybackSession, SessionState};
use super::timer::HideTimer;
use super::volume::Volume;
use crate::config::{Preferences, DEFAULT_AUTO_HIDE_DELAY_MS, DEFAULT_SAMPLE_INTERVAL_MS};
use crate::error::{LoadError, SeekError};
use crate::source::ContentSource;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::debug;

/// Construction input for one playback session.
#[derive(Debug, Clone)]
pub struct SessionOptions {
    /// What the session mounts, decided by the host before construction.
    pub source: ContentSource,

    /// Entitlement at construction time; never re-checked mid-session.
    pub entitled: bool,

    /// Inactivity delay before on-screen controls hide during playback.
    pub auto_hide_delay: Duration,

    /// Interval between playback progress samples.
    pub sample_interval: Duration,

    /// Whether playback starts as soon as the resource is ready.
    pub autoplay: bool,

    /// Initial audio volume.
    pub volume: Volume,

    /// Initial mute state.
    pub muted: bool,
}

impl SessionOptions {
    /// Creates options with the crate defaults.
    #[must_use]
    pub fn new(source: ContentSource, entitled: bool) -> Self {
        Self {
            source,
            entitled,
            auto_hide_delay: Duration::from_millis(DEFAULT_AUTO_HIDE_DELAY_MS),
            sample_interval: Duration::from_millis(DEFAULT_SAMPLE_INTERVAL_MS),
            autoplay: true,
            volume: Volume::default(),
            muted: false,
        }
    }

    /// Applies persisted viewer preferences on top of the defaults.
    #[must_use]
    pub fn with_preferences(mut self, prefs: &Preferences) -> Self {
        if let Some(volume) = prefs.volume {
            self.volume = Volume::new(volume);
        }
        if let Some(muted) = prefs.muted {
            self.muted = muted;
        }
        if let Some(autoplay) = prefs.autoplay {
            self.autoplay = autoplay;
        }
        self
    }
}

/// Every input a session can receive, in one queue.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Tap on the player surface: show or hide the controls.
    ToggleControls,

    /// Tap on the play/pause button.
    TogglePlayPause,

    /// Scrub gesture started on the seek bar.
    BeginSeek,

    /// Scrub position moved.
    UpdateSeek(Fraction),

    /// Scrub gesture released: commit the pending target.
    CommitSeek,

    /// Volume slider moved.
    SetVolume(Volume),

    /// Mute button tapped.
    ToggleMute,

    /// Popup closed: tear the session down.
    Close,

    /// Status event from the player backend.
    Backend(BackendEvent),

    /// Auto-hide timer fired.
    ControlsTimedOut { generation: u64 },

    /// Periodic progress sample.
    Progress { fraction: Fraction, epoch: u64 },
}

/// What the caller should do after an event was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Nothing observable changed.
    None,

    /// The snapshot changed; publish it to observers.
    Publish,

    /// The session was disposed; publish the final snapshot and stop.
    Shutdown,
}

/// State machine for one playback session.
///
/// Owns the backend handle, the auto-hide timer, and the progress
/// sampler; the three are released together, exactly once, on close (or
/// on drop, for abnormal exits).
pub struct SessionController {
    session: PlaybackSession,
    backend: Box<dyn PlayerBackend>,
    handle: Option<BackendHandle>,
    timer: HideTimer,
    sampler: ProgressSampler,
    auto_hide_delay: Duration,
    sample_interval: Duration,
    autoplay: bool,
    disposed: bool,
}

impl SessionController {
    /// Creates a controller in the `Idle` state.
    ///
    /// `events` is the session's own queue: the timer and sampler feed
    /// their callbacks back through it so every input is serialized.
    #[must_use]
    pub fn new(
        backend: Box<dyn PlayerBackend>,
        options: SessionOptions,
        events: mpsc::UnboundedSender<SessionEvent>,
    ) -> Self {
        let session = PlaybackSession::new(
            options.source,
            options.entitled,
            options.volume,
            options.muted,
        );
        Self {
            session,
            backend,
            handle: None,
            timer: HideTimer::new(events.clone()),
            sampler: ProgressSampler::new(events),
            auto_hide_delay: options.auto_hide_delay,
            sample_interval: options.sample_interval,
            autoplay: options.autoplay,
            disposed: false,
        }
    }

    /// Returns the current observable snapshot.
    #[must_use]
    pub fn session(&self) -> &PlaybackSession {
        &self.session
    }

    /// Issues the backend load. `Idle --> Loading`, or straight to
    /// `Failed` when the resource cannot be created at all.
    pub fn start(&mut self, listener: BackendListener) -> Effect {
        if self.disposed || self.session.state != SessionState::Idle {
            return Effect::None;
        }
        self.session.state = SessionState::Loading;
        match self.backend.load(&self.session.source, listener) {
            Ok(handle) => {
                self.handle = Some(handle);
            }
            Err(error) => {
                self.fail(error.to_string());
            }
        }
        Effect::Publish
    }

    /// Applies one event. Events delivered after dispose are dropped.
    pub fn handle_event(&mut self, event: SessionEvent) -> Effect {
        if self.disposed {
            debug!(?event, "event delivered after dispose; dropped");
            return Effect::None;
        }
        match event {
            SessionEvent::ToggleControls => self.toggle_controls(),
            SessionEvent::TogglePlayPause => self.toggle_play_pause(),
            SessionEvent::BeginSeek => self.begin_seek(),
            SessionEvent::UpdateSeek(target) => self.update_seek(target),
            SessionEvent::CommitSeek => self.commit_seek(),
            SessionEvent::SetVolume(volume) => self.set_volume(volume),
            SessionEvent::ToggleMute => self.toggle_mute(),
            SessionEvent::Close => self.close(),
            SessionEvent::Backend(event) => self.on_backend_event(event),
            SessionEvent::ControlsTimedOut { generation } => self.on_timer_fired(generation),
            SessionEvent::Progress { fraction, epoch } => self.on_progress(fraction, epoch),
        }
    }

    // ─── Gestures ────────────────────────────────────────────────────────

    fn toggle_controls(&mut self) -> Effect {
        self.touch();
        if self.session.controls_visible {
            self.session.controls_visible = false;
            self.timer.cancel();
        } else {
            self.session.controls_visible = true;
            // Auto-hide only runs during playback.
            if self.session.state.is_playing() {
                self.timer.schedule(self.auto_hide_delay);
            }
        }
        Effect::Publish
    }

    fn toggle_play_pause(&mut self) -> Effect {
        match self.session.state {
            SessionState::Ready | SessionState::Paused => self.enter_playing(),
            SessionState::Playing => self.enter_paused(),
            _ => {
                debug!(state = ?self.session.state, "play/pause gesture ignored");
                Effect::None
            }
        }
    }

    fn begin_seek(&mut self) -> Effect {
        let resume = match self.session.state {
            SessionState::Playing => true,
            SessionState::Paused => false,
            _ => {
                debug!(state = ?self.session.state, "seek gesture ignored");
                return Effect::None;
            }
        };
        self.session.state = SessionState::Seeking { resume };
        self.session.pending_seek = Some(self.session.progress);
        self.timer.cancel();
        self.touch();
        Effect::Publish
    }

    fn update_seek(&mut self, target: Fraction) -> Effect {
        if !self.session.state.is_seeking() {
            debug!("seek update outside an active scrub; dropped");
            return Effect::None;
        }
        self.session.pending_seek = Some(target);
        self.touch();
        Effect::Publish
    }

    fn commit_seek(&mut self) -> Effect {
        let Some(resume) = self.session.state.resume_after_seek() else {
            debug!("seek commit outside an active scrub; dropped");
            return Effect::None;
        };
        let target = self
            .session
            .pending_seek
            .take()
            .unwrap_or(self.session.progress);
        if let Some(handle) = &self.handle {
            match self.backend.seek(handle, target) {
                Ok(()) => {
                    self.session.progress = target;
                    // Replace the sampler subscription so ticks taken
                    // before the jump cannot regress progress.
                    self.sampler.start(handle.playhead(), self.sample_interval);
                }
                Err(SeekError::DurationUnknown) => {
                    debug!("seek committed before duration resolved; dropped");
                }
            }
        }
        self.session.state = if resume {
            SessionState::Playing
        } else {
            SessionState::Paused
        };
        self.touch();
        if resume && self.session.controls_visible {
            self.timer.schedule(self.auto_hide_delay);
        }
        Effect::Publish
    }

    fn set_volume(&mut self, volume: Volume) -> Effect {
        self.session.volume = volume;
        if let Some(handle) = &self.handle {
            self.backend.set_volume(handle, volume, self.session.muted);
        }
        self.interaction_keepalive();
        Effect::Publish
    }

    fn toggle_mute(&mut self) -> Effect {
        self.session.muted = !self.session.muted;
        if let Some(handle) = &self.handle {
            self.backend
                .set_volume(handle, self.session.volume, self.session.muted);
        }
        self.interaction_keepalive();
        Effect::Publish
    }

    fn close(&mut self) -> Effect {
        self.release_resources();
        Effect::Shutdown
    }

    // ─── Backend events ──────────────────────────────────────────────────

    fn on_backend_event(&mut self, event: BackendEvent) -> Effect {
        match event {
            BackendEvent::Ready { duration } => self.on_ready(duration),
            BackendEvent::Failed { error } => self.on_failed(error),
            BackendEvent::EndOfMedia => self.on_end_of_media(),
        }
    }

    fn on_ready(&mut self, duration: Duration) -> Effect {
        if self.session.state != SessionState::Loading {
            debug!(state = ?self.session.state, "stale readiness report; dropped");
            return Effect::None;
        }
        self.session.duration = Some(duration);
        self.session.state = SessionState::Ready;
        self.session.controls_visible = true;
        if let Some(handle) = &self.handle {
            self.sampler.start(handle.playhead(), self.sample_interval);
        }
        if self.autoplay {
            return self.enter_playing();
        }
        Effect::Publish
    }

    fn on_failed(&mut self, error: LoadError) -> Effect {
        if self.session.state.is_terminal() {
            debug!("failure reported after terminal state; dropped");
            return Effect::None;
        }
        self.fail(error.to_string());
        Effect::Publish
    }

    fn on_end_of_media(&mut self) -> Effect {
        if !self.session.state.is_interactive() {
            debug!(state = ?self.session.state, "end-of-media outside playback; dropped");
            return Effect::None;
        }
        self.finish()
    }

    // ─── Timer and sampler ───────────────────────────────────────────────

    fn on_timer_fired(&mut self, generation: u64) -> Effect {
        if !self.timer.is_current(generation) {
            debug!(generation, "stale auto-hide firing; dropped");
            return Effect::None;
        }
        self.session.controls_visible = false;
        Effect::Publish
    }

    fn on_progress(&mut self, fraction: Fraction, epoch: u64) -> Effect {
        if !self.sampler.is_current(epoch) {
            debug!(epoch, "stale progress tick; dropped");
            return Effect::None;
        }
        match self.session.state {
            SessionState::Playing => {
                if fraction.is_complete() {
                    return self.finish();
                }
                self.advance_progress(fraction)
            }
            SessionState::Ready | SessionState::Paused => self.advance_progress(fraction),
            // While scrubbing the pending target owns the display.
            SessionState::Seeking { .. } => Effect::None,
            _ => Effect::None,
        }
    }

    fn advance_progress(&mut self, fraction: Fraction) -> Effect {
        // Progress never moves backwards outside an explicit seek.
        if fraction > self.session.progress {
            self.session.progress = fraction;
            Effect::Publish
        } else {
            Effect::None
        }
    }

    // ─── Transitions ─────────────────────────────────────────────────────

    fn enter_playing(&mut self) -> Effect {
        let Some(handle) = &self.handle else {
            return Effect::None;
        };
        self.backend.play(handle);
        self.session.state = SessionState::Playing;
        self.interaction_keepalive();
        Effect::Publish
    }

    fn enter_paused(&mut self) -> Effect {
        let Some(handle) = &self.handle else {
            return Effect::None;
        };
        self.backend.pause(handle);
        self.session.state = SessionState::Paused;
        self.timer.cancel();
        self.touch();
        Effect::Publish
    }

    fn finish(&mut self) -> Effect {
        self.sampler.stop();
        self.timer.cancel();
        self.session.progress = Fraction::ZERO;
        self.session.pending_seek = None;
        self.session.state = SessionState::Ended;
        self.session.controls_visible = true;
        Effect::Publish
    }

    fn fail(&mut self, message: String) {
        self.sampler.stop();
        self.timer.cancel();
        self.session.state = SessionState::Failed { message };
        self.session.controls_visible = true;
    }

    fn touch(&mut self) {
        self.session.last_interaction = Instant::now();
    }

    /// Marks the interaction and keeps the auto-hide timer running while
    /// playback continues with visible controls.
    fn interaction_keepalive(&mut self) {
        self.touch();
        if self.session.state.is_playing() && self.session.controls_visible {
            self.timer.schedule(self.auto_hide_delay);
        }
    }

    /// Releases the owned resource bundle: sampler, timer, backend
    /// handle. Idempotent; also runs from `Drop` so the resources go
    /// away on every exit path.
    fn release_resources(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        self.sampler.stop();
        self.timer.cancel();
        if let Some(handle) = self.handle.take() {
            self.backend.dispose(handle);
        }
    }
}

impl Drop for SessionController {
    fn drop(&mut self) {
        self.release_resources();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::backend::SharedPlayhead;
    use crate::source::{MediaLocator, SubstituteKind};
    use std::sync::{Arc, Mutex};

    const MEDIA_URL: &str = "https://demo.example.com/reel/index.m3u8";

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Call {
        Load,
        Play,
        Pause,
        Seek,
        SetVolume,
        Dispose,
    }

    #[derive(Default)]
    struct Probe {
        calls: Mutex<Vec<Call>>,
        playhead: Mutex<Option<SharedPlayhead>>,
    }

    impl Probe {
        fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        fn count(&self, call: Call) -> usize {
            self.calls().iter().filter(|&&c| c == call).count()
        }

        fn playhead(&self) -> SharedPlayhead {
            self.playhead.lock().unwrap().clone().expect("load not called")
        }
    }

    struct RecordingBackend {
        probe: Arc<Probe>,
        fail_load: bool,
    }

    impl PlayerBackend for RecordingBackend {
        fn load(
            &mut self,
            source: &ContentSource,
            _listener: BackendListener,
        ) -> Result<BackendHandle, LoadError> {
            self.probe.calls.lock().unwrap().push(Call::Load);
            if self.fail_load {
                return Err(LoadError::Backend("init failed".to_string()));
            }
            if let ContentSource::Media(locator) = source {
                locator.resolve()?;
            }
            let handle = BackendHandle::allocate();
            *self.probe.playhead.lock().unwrap() = Some(handle.playhead());
            Ok(handle)
        }

        fn play(&mut self, _handle: &BackendHandle) {
            self.probe.calls.lock().unwrap().push(Call::Play);
        }

        fn pause(&mut self, _handle: &BackendHandle) {
            self.probe.calls.lock().unwrap().push(Call::Pause);
        }

        fn seek(&mut self, handle: &BackendHandle, target: Fraction) -> Result<(), SeekError> {
            self.probe.calls.lock().unwrap().push(Call::Seek);
            let duration = handle
                .playhead()
                .duration()
                .ok_or(SeekError::DurationUnknown)?;
            handle.playhead().set_position(target.to_position(duration));
            Ok(())
        }

        fn set_volume(&mut self, _handle: &BackendHandle, _volume: Volume, _muted: bool) {
            self.probe.calls.lock().unwrap().push(Call::SetVolume);
        }

        fn dispose(&mut self, _handle: BackendHandle) {
            self.probe.calls.lock().unwrap().push(Call::Dispose);
        }
    }

    fn media_options() -> SessionOptions {
        SessionOptions::new(
            ContentSource::Media(MediaLocator::new(MEDIA_URL)),
            true,
        )
    }

    fn controller_with(options: SessionOptions, fail_load: bool) -> (SessionController, Arc<Probe>) {
        let probe = Arc::new(Probe::default());
        let backend = RecordingBackend {
            probe: Arc::clone(&probe),
            fail_load,
        };
        let (events_tx, _events_rx) = mpsc::unbounded_channel();
        (
            SessionController::new(Box::new(backend), options, events_tx),
            probe,
        )
    }

    fn started(options: SessionOptions) -> (SessionController, Arc<Probe>) {
        let (mut ctrl, probe) = controller_with(options, false);
        let (listener, _backend_rx) = mpsc::unbounded_channel();
        ctrl.start(listener);
        probe.playhead().set_duration(Duration::from_secs(120));
        (ctrl, probe)
    }

    fn playing() -> (SessionController, Arc<Probe>) {
        let (mut ctrl, probe) = started(media_options());
        ctrl.handle_event(SessionEvent::Backend(BackendEvent::Ready {
            duration: Duration::from_secs(120),
        }));
        assert!(ctrl.session().state.is_playing());
        (ctrl, probe)
    }

    #[tokio::test]
    async fn start_issues_load_and_enters_loading() {
        let (mut ctrl, probe) = controller_with(media_options(), false);
        let (listener, _rx) = mpsc::unbounded_channel();

        let effect = ctrl.start(listener);

        assert_eq!(effect, Effect::Publish);
        assert_eq!(ctrl.session().state, SessionState::Loading);
        assert_eq!(probe.calls(), vec![Call::Load]);
    }

    #[tokio::test]
    async fn malformed_locator_fails_without_panicking() {
        let options = SessionOptions::new(
            ContentSource::Media(MediaLocator::new("not a url")),
            true,
        );
        let (mut ctrl, _probe) = controller_with(options, false);
        let (listener, _rx) = mpsc::unbounded_channel();

        ctrl.start(listener);

        assert!(matches!(ctrl.session().state, SessionState::Failed { .. }));
    }

    #[tokio::test]
    async fn substitute_source_loads_like_media() {
        let options = SessionOptions::new(
            ContentSource::Substitute(SubstituteKind::Ad),
            false,
        );
        let (mut ctrl, probe) = controller_with(options, false);
        let (listener, _rx) = mpsc::unbounded_channel();

        ctrl.start(listener);

        assert_eq!(ctrl.session().state, SessionState::Loading);
        assert_eq!(probe.count(Call::Load), 1);
    }

    #[tokio::test]
    async fn ready_autoplays_with_controls_and_timer() {
        let (ctrl, probe) = playing();

        assert!(ctrl.session().controls_visible);
        assert_eq!(ctrl.session().duration, Some(Duration::from_secs(120)));
        assert!(ctrl.timer.is_scheduled());
        assert!(ctrl.sampler.is_active());
        assert_eq!(probe.count(Call::Play), 1);
    }

    #[tokio::test]
    async fn ready_without_autoplay_waits_for_gesture() {
        let mut options = media_options();
        options.autoplay = false;
        let (mut ctrl, probe) = started(options);

        ctrl.handle_event(SessionEvent::Backend(BackendEvent::Ready {
            duration: Duration::from_secs(120),
        }));

        assert_eq!(ctrl.session().state, SessionState::Ready);
        assert_eq!(probe.count(Call::Play), 0);
        assert!(!ctrl.timer.is_scheduled());

        ctrl.handle_event(SessionEvent::TogglePlayPause);
        assert!(ctrl.session().state.is_playing());
        assert_eq!(probe.count(Call::Play), 1);
    }

    #[tokio::test]
    async fn duplicate_readiness_is_dropped() {
        let (mut ctrl, probe) = playing();

        let effect = ctrl.handle_event(SessionEvent::Backend(BackendEvent::Ready {
            duration: Duration::from_secs(60),
        }));

        assert_eq!(effect, Effect::None);
        assert_eq!(ctrl.session().duration, Some(Duration::from_secs(120)));
        assert_eq!(probe.count(Call::Play), 1);
    }

    #[tokio::test]
    async fn play_pause_alternates_strictly() {
        let (mut ctrl, probe) = playing();

        for round in 0..3 {
            ctrl.handle_event(SessionEvent::TogglePlayPause);
            assert!(ctrl.session().state.is_paused(), "round {}", round);
            assert!(!ctrl.timer.is_scheduled());

            ctrl.handle_event(SessionEvent::TogglePlayPause);
            assert!(ctrl.session().state.is_playing(), "round {}", round);
            assert!(ctrl.timer.is_scheduled());
        }

        assert_eq!(probe.count(Call::Pause), 3);
        assert_eq!(probe.count(Call::Play), 4); // autoplay + three resumes
    }

    #[tokio::test]
    async fn toggle_controls_hides_and_cancels_timer() {
        let (mut ctrl, _probe) = playing();
        assert!(ctrl.session().controls_visible);

        ctrl.handle_event(SessionEvent::ToggleControls);
        assert!(!ctrl.session().controls_visible);
        assert!(!ctrl.timer.is_scheduled());

        ctrl.handle_event(SessionEvent::ToggleControls);
        assert!(ctrl.session().controls_visible);
        assert!(ctrl.timer.is_scheduled());
    }

    #[tokio::test]
    async fn controls_shown_while_paused_do_not_arm_timer() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::TogglePlayPause);
        ctrl.handle_event(SessionEvent::ToggleControls); // hide
        ctrl.handle_event(SessionEvent::ToggleControls); // show again

        assert!(ctrl.session().controls_visible);
        assert!(!ctrl.timer.is_scheduled());
    }

    #[tokio::test]
    async fn timer_firing_hides_controls() {
        let (mut ctrl, _probe) = playing();
        let generation = 1; // first schedule of this session

        let effect = ctrl.handle_event(SessionEvent::ControlsTimedOut { generation });

        assert_eq!(effect, Effect::Publish);
        assert!(!ctrl.session().controls_visible);
    }

    #[tokio::test]
    async fn stale_timer_firing_is_dropped() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::TogglePlayPause); // pause cancels the timer

        let effect = ctrl.handle_event(SessionEvent::ControlsTimedOut { generation: 1 });

        assert_eq!(effect, Effect::None);
        assert!(ctrl.session().controls_visible);
    }

    #[tokio::test]
    async fn begin_seek_suspends_timer_and_records_resume() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.25),
            epoch: 1,
        });

        ctrl.handle_event(SessionEvent::BeginSeek);

        assert_eq!(ctrl.session().state, SessionState::Seeking { resume: true });
        assert_eq!(ctrl.session().pending_seek, Some(Fraction::new(0.25)));
        assert!(!ctrl.timer.is_scheduled());
    }

    #[tokio::test]
    async fn commit_seek_resumes_playing_and_rearms_timer() {
        let (mut ctrl, probe) = playing();
        ctrl.handle_event(SessionEvent::BeginSeek);
        ctrl.handle_event(SessionEvent::UpdateSeek(Fraction::new(0.5)));

        ctrl.handle_event(SessionEvent::CommitSeek);

        assert!(ctrl.session().state.is_playing());
        assert_eq!(ctrl.session().progress, Fraction::new(0.5));
        assert!(ctrl.session().pending_seek.is_none());
        assert!(ctrl.timer.is_scheduled());
        assert_eq!(probe.count(Call::Seek), 1);
    }

    #[tokio::test]
    async fn commit_seek_from_pause_stays_paused() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::TogglePlayPause);
        ctrl.handle_event(SessionEvent::BeginSeek);
        ctrl.handle_event(SessionEvent::UpdateSeek(Fraction::new(0.75)));

        ctrl.handle_event(SessionEvent::CommitSeek);

        assert!(ctrl.session().state.is_paused());
        assert_eq!(ctrl.session().progress, Fraction::new(0.75));
        assert!(!ctrl.timer.is_scheduled());
    }

    #[tokio::test]
    async fn seek_gestures_before_readiness_are_dropped() {
        let (mut ctrl, probe) = controller_with(media_options(), false);
        let (listener, _rx) = mpsc::unbounded_channel();
        ctrl.start(listener); // Loading; duration still unknown

        assert_eq!(ctrl.handle_event(SessionEvent::BeginSeek), Effect::None);
        assert_eq!(
            ctrl.handle_event(SessionEvent::UpdateSeek(Fraction::new(0.5))),
            Effect::None
        );
        assert_eq!(ctrl.handle_event(SessionEvent::CommitSeek), Effect::None);
        assert_eq!(ctrl.session().state, SessionState::Loading);
        assert_eq!(probe.count(Call::Seek), 0);
    }

    #[tokio::test]
    async fn seek_with_unknown_duration_is_swallowed() {
        let (mut ctrl, probe) = playing();
        // Duration lost on the transport side; the commit must degrade to
        // a no-op seek rather than an error.
        probe.playhead().set_duration(Duration::ZERO);
        ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.25),
            epoch: 1,
        });
        ctrl.handle_event(SessionEvent::BeginSeek);
        ctrl.handle_event(SessionEvent::UpdateSeek(Fraction::new(0.9)));

        ctrl.handle_event(SessionEvent::CommitSeek);

        assert!(ctrl.session().state.is_playing());
        assert_eq!(ctrl.session().progress, Fraction::new(0.25));
    }

    #[tokio::test]
    async fn progress_advances_and_never_regresses() {
        let (mut ctrl, _probe) = playing();

        ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.5),
            epoch: 1,
        });
        assert_eq!(ctrl.session().progress, Fraction::new(0.5));

        let effect = ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.4),
            epoch: 1,
        });
        assert_eq!(effect, Effect::None);
        assert_eq!(ctrl.session().progress, Fraction::new(0.5));
    }

    #[tokio::test]
    async fn stale_epoch_tick_cannot_regress_after_seek() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::BeginSeek);
        ctrl.handle_event(SessionEvent::UpdateSeek(Fraction::new(0.2)));
        ctrl.handle_event(SessionEvent::CommitSeek); // sampler epoch is now 2

        let effect = ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.45),
            epoch: 1,
        });

        assert_eq!(effect, Effect::None);
        assert_eq!(ctrl.session().progress, Fraction::new(0.2));
    }

    #[tokio::test]
    async fn ticks_during_scrub_are_ignored() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::BeginSeek);

        let effect = ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.6),
            epoch: 1,
        });

        assert_eq!(effect, Effect::None);
        assert_eq!(ctrl.session().progress, Fraction::ZERO);
    }

    #[tokio::test]
    async fn completed_progress_ends_session() {
        let (mut ctrl, _probe) = playing();
        ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::new(0.999),
            epoch: 1,
        });

        ctrl.handle_event(SessionEvent::Progress {
            fraction: Fraction::COMPLETE,
            epoch: 1,
        });

        assert_eq!(ctrl.session().state, SessionState::Ended);
        assert_eq!(ctrl.session().progress, Fraction::ZERO);
        assert!(!ctrl.sampler.is_active());
        assert!(!ctrl.timer.is_scheduled());
        assert!(ctrl.session().controls_visible);
    }

    #[tokio::test]
    async fn end_of_media_event_ends_session() {
        let (mut ctrl, _probe) = playing();

        ctrl.handle_event(SessionEvent::Backend(BackendEvent::EndOfMedia));

        assert_eq!(ctrl.session().state, SessionState::Ended);
        assert_eq!(ctrl.session().progress, Fraction::ZERO);
    }

    #[tokio::test]
    async fn gestures_after_ended_are_noops() {
        let (mut ctrl, probe) = playing();
        ctrl.handle_event(SessionEvent::Backend(BackendEvent::EndOfMedia));

        assert_eq!(ctrl.handle_event(SessionEvent::TogglePlayPause), Effect::None);
        assert_eq!(ctrl.session().state, SessionState::Ended);
        assert_eq!(probe.count(Call::Play), 1);
    }

    #[tokio::test]
    async fn failure_during_loading_is_terminal() {
        let (mut ctrl, probe) = started(media_options());

        ctrl.handle_event(SessionEvent::Backend(BackendEvent::Failed {
            error: LoadError::Backend("network".to_string()),
        }));

        let SessionState::Failed { message } = &ctrl.session().state else {
            panic!("expected failed state");
        };
        assert!(message.contains("network"));
        assert!(ctrl.session().controls_visible);

        assert_eq!(ctrl.handle_event(SessionEvent::TogglePlayPause), Effect::None);
        assert_eq!(ctrl.handle_event(SessionEvent::BeginSeek), Effect::None);
        assert_eq!(probe.count(Call::Play), 0);
    }

    #[tokio::test]
    async fn immediate_load_failure_is_terminal() {
        let (mut ctrl, _probe) = controller_with(media_options(), true);
        let (listener, _rx) = mpsc::unbounded_channel();

        ctrl.start(listener);

        let SessionState::Failed { message } = &ctrl.session().state else {
            panic!("expected failed state");
        };
        assert!(message.contains("init failed"));
    }

    #[tokio::test]
    async fn volume_gestures_forward_to_backend() {
        let (mut ctrl, probe) = playing();

        ctrl.handle_event(SessionEvent::SetVolume(Volume::new(0.3)));
        assert_eq!(ctrl.session().volume, Volume::new(0.3));

        ctrl.handle_event(SessionEvent::ToggleMute);
        assert!(ctrl.session().muted);

        ctrl.handle_event(SessionEvent::ToggleMute);
        assert!(!ctrl.session().muted);

        assert_eq!(probe.count(Call::SetVolume), 3);
    }

    #[tokio::test]
    async fn close_releases_resources_exactly_once() {
        let (mut ctrl, probe) = playing();

        assert_eq!(ctrl.handle_event(SessionEvent::Close), Effect::Shutdown);
        assert_eq!(probe.count(Call::Dispose), 1);
        assert!(!ctrl.sampler.is_active());
        assert!(!ctrl.timer.is_scheduled());

        // A second close and any queued late callbacks are all dropped.
        assert_eq!(ctrl.handle_event(SessionEvent::Close), Effect::None);
        assert_eq!(
            ctrl.handle_event(SessionEvent::Backend(BackendEvent::Ready {
                duration: Duration::from_secs(60),
            })),
            Effect::None
        );
        assert_eq!(
            ctrl.handle_event(SessionEvent::Progress {
                fraction: Fraction::new(0.9),
                epoch: 1,
            }),
            Effect::None
        );
        assert_eq!(ctrl.handle_event(SessionEvent::TogglePlayPause), Effect::None);
        assert_eq!(probe.count(Call::Dispose), 1);
        assert!(ctrl.session().state.is_playing(), "state frozen at dispose");
    }

    #[tokio::test]
    async fn drop_releases_resources_without_close() {
        let (ctrl, probe) = playing();

        drop(ctrl);

        assert_eq!(probe.count(Call::Dispose), 1);
    }

    #[tokio::test]
    async fn close_is_safe_mid_loading() {
        let (mut ctrl, probe) = controller_with(media_options(), false);
        let (listener, _rx) = mpsc::unbounded_channel();
        ctrl.start(listener);

        assert_eq!(ctrl.handle_event(SessionEvent::Close), Effect::Shutdown);
        assert_eq!(probe.count(Call::Dispose), 1);
    }
}

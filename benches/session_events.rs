// SPDX-License-Identifier: MPL-2.0
//! Benchmarks for the session event reducer.
//!
//! Measures the hot path of the controller: applying gesture events and
//! progress ticks to an already-playing session.

use criterion::{criterion_group, criterion_main, BatchSize, Criterion};
use paddock_player::error::{LoadError, SeekError};
use paddock_player::session::{
    BackendEvent, BackendHandle, BackendListener, Fraction, PlayerBackend, SessionController,
    SessionEvent, SessionOptions, Volume,
};
use paddock_player::source::{ContentSource, MediaLocator};
use std::hint::black_box;
use std::time::Duration;
use tokio::sync::mpsc;

struct NullBackend;

impl PlayerBackend for NullBackend {
    fn load(
        &mut self,
        _source: &ContentSource,
        _listener: BackendListener,
    ) -> Result<BackendHandle, LoadError> {
        let handle = BackendHandle::allocate();
        handle.playhead().set_duration(Duration::from_secs(120));
        Ok(handle)
    }

    fn play(&mut self, _handle: &BackendHandle) {}
    fn pause(&mut self, _handle: &BackendHandle) {}

    fn seek(&mut self, _handle: &BackendHandle, _target: Fraction) -> Result<(), SeekError> {
        Ok(())
    }

    fn set_volume(&mut self, _handle: &BackendHandle, _volume: Volume, _muted: bool) {}
    fn dispose(&mut self, _handle: BackendHandle) {}
}

/// Builds a controller already in the Playing state.
fn playing_controller() -> SessionController {
    let options = SessionOptions::new(
        ContentSource::Media(MediaLocator::new("https://example.com/reel.m3u8")),
        true,
    );
    let (events_tx, _events_rx) = mpsc::unbounded_channel();
    let mut controller = SessionController::new(Box::new(NullBackend), options, events_tx);
    let (listener, _backend_rx) = mpsc::unbounded_channel();
    controller.start(listener);
    controller.handle_event(SessionEvent::Backend(BackendEvent::Ready {
        duration: Duration::from_secs(120),
    }));
    controller
}

fn bench_toggle_controls(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("session_events");

    group.bench_function("toggle_controls_pair", |b| {
        let mut controller = rt.block_on(async { playing_controller() });
        b.iter(|| {
            rt.block_on(async {
                black_box(controller.handle_event(SessionEvent::ToggleControls));
                black_box(controller.handle_event(SessionEvent::ToggleControls));
            });
        });
    });

    group.finish();
}

fn bench_progress_ticks(c: &mut Criterion) {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .unwrap();
    let mut group = c.benchmark_group("session_events");

    group.bench_function("progress_ticks_100", |b| {
        b.iter_batched(
            || rt.block_on(async { playing_controller() }),
            |mut controller| {
                rt.block_on(async {
                    for i in 1..=100u32 {
                        let fraction = Fraction::new(f64::from(i) / 101.0);
                        black_box(
                            controller.handle_event(SessionEvent::Progress { fraction, epoch: 1 }),
                        );
                    }
                });
            },
            BatchSize::SmallInput,
        );
    });

    group.finish();
}

criterion_group!(benches, bench_toggle_controls, bench_progress_ticks);
criterion_main!(benches);

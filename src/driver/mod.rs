pub mod timer;

pub use timer::TimerHandle;

use crate::playback::{Frame, PlaybackEngine, PlaybackEvent, PlaybackStatus};
use std::ops::ControlFlow;
use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::info;

/// Drives a [`PlaybackEngine`] from real timers
///
/// Owns the playback ticker and the elapsed-time clock. Both run only
/// while the engine is playing and are cancelled before any pause,
/// restart or drop takes effect. Every state change is published as a
/// [`Frame`] on a watch channel.
pub struct PlaybackDriver {
    engine: Arc<Mutex<PlaybackEngine>>,
    frames: Arc<watch::Sender<Frame>>,
    ticker: Option<TimerHandle>,
    clock: Option<TimerHandle>,
}

fn now() -> std::time::Instant {
    tokio::time::Instant::now().into_std()
}

impl PlaybackDriver {
    pub fn new(engine: PlaybackEngine) -> Self {
        let (frames, _) = watch::channel(engine.frame());
        Self {
            engine: Arc::new(Mutex::new(engine)),
            frames: Arc::new(frames),
            ticker: None,
            clock: None,
        }
    }

    /// Receive every frame published from now on
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Shared handle to the engine, for read-only inspection
    pub fn engine(&self) -> Arc<Mutex<PlaybackEngine>> {
        self.engine.clone()
    }

    /// True while the playback ticker is running
    pub fn is_running(&self) -> bool {
        self.ticker.as_ref().is_some_and(TimerHandle::is_active)
    }

    pub async fn play(&mut self) {
        let playing = self.dispatch(PlaybackEvent::Play).await == PlaybackStatus::Playing;
        if playing && !self.is_running() {
            self.start_timers().await;
        }
    }

    pub async fn pause(&mut self) {
        self.stop_timers();
        self.dispatch(PlaybackEvent::Pause).await;
    }

    pub async fn toggle(&mut self) {
        let playing = self.engine.lock().await.is_playing();
        if playing {
            self.pause().await;
        } else {
            self.play().await;
        }
    }

    pub async fn restart(&mut self) {
        self.stop_timers();
        self.dispatch(PlaybackEvent::Restart).await;
    }

    /// Returns false when `value` is not 1, 2 or 4
    pub async fn set_speed_multiplier(&mut self, value: u32) -> bool {
        let mut engine = self.engine.lock().await;
        let accepted = engine.set_speed_multiplier(value);
        if accepted {
            self.frames.send_replace(engine.frame());
        }
        accepted
    }

    /// Cancel both timers. Safe to call when nothing is running.
    pub fn stop_timers(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.cancel();
        }
        if let Some(mut clock) = self.clock.take() {
            clock.cancel();
        }
    }

    async fn dispatch(&self, event: PlaybackEvent) -> PlaybackStatus {
        let mut engine = self.engine.lock().await;
        engine.dispatch_at(event, now());
        self.frames.send_replace(engine.frame());
        engine.status()
    }

    async fn start_timers(&mut self) {
        // Replacing a finished handle drops it, which is a no-op abort
        self.stop_timers();

        let (tick_interval, clock_interval) = {
            let engine = self.engine.lock().await;
            (engine.config().tick_interval, engine.config().clock_interval)
        };

        let engine = self.engine.clone();
        let frames = self.frames.clone();
        self.ticker = Some(TimerHandle::periodic("playback", tick_interval, move || {
            let engine = engine.clone();
            let frames = frames.clone();
            async move {
                let mut engine = engine.lock().await;
                engine.dispatch_at(PlaybackEvent::Tick, now());
                frames.send_replace(engine.frame());
                if engine.is_playing() {
                    ControlFlow::Continue(())
                } else {
                    info!("Playback ticker stopping, engine is {:?}", engine.status());
                    ControlFlow::Break(())
                }
            }
        }));

        let engine = self.engine.clone();
        let frames = self.frames.clone();
        self.clock = Some(TimerHandle::periodic("elapsed", clock_interval, move || {
            let engine = engine.clone();
            let frames = frames.clone();
            async move {
                let mut engine = engine.lock().await;
                if !engine.is_playing() {
                    return ControlFlow::Break(());
                }
                engine.dispatch_at(PlaybackEvent::ClockTick, now());
                frames.send_replace(engine.frame());
                ControlFlow::Continue(())
            }
        }));
    }
}

impl Drop for PlaybackDriver {
    fn drop(&mut self) {
        self.stop_timers();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Route, Waypoint};
    use crate::playback::PlaybackConfig;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};
    use std::time::Duration;
    use tokio::time::sleep;

    fn route(n: usize) -> Route {
        let t0: DateTime<Utc> = "2024-01-15T08:00:00Z".parse().unwrap();
        Route::new(
            (0..n)
                .map(|i| Waypoint::new(0.0, i as f64 * 0.001, t0 + ChronoDuration::seconds(i as i64 * 30)))
                .collect(),
        )
        .unwrap()
    }

    fn driver(n: usize) -> PlaybackDriver {
        PlaybackDriver::new(PlaybackEngine::new(route(n), PlaybackConfig::default()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_finish_and_stops_timers() {
        let mut d = driver(3);
        let frames = d.subscribe();

        d.play().await;
        assert!(d.is_running());
        assert!(frames.borrow().is_playing);

        // Two segments at 2 s each, plus slack for float accumulation
        sleep(Duration::from_millis(4300)).await;

        let frame = frames.borrow().clone();
        assert_eq!(frame.status, PlaybackStatus::Finished);
        assert_eq!(frame.current_index, 2);
        assert_eq!(frame.traveled_path.len(), 3);
        assert!(!d.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_freezes_state() {
        let mut d = driver(5);
        let frames = d.subscribe();

        d.play().await;
        sleep(Duration::from_millis(525)).await;
        d.pause().await;
        assert!(!d.is_running());

        let paused = frames.borrow().clone();
        assert_eq!(paused.status, PlaybackStatus::Stopped);
        assert!(paused.segment_progress > 0.0);

        sleep(Duration::from_secs(3)).await;
        let later = frames.borrow().clone();
        assert_eq!(later.segment_progress, paused.segment_progress);
        assert_eq!(later.current_index, paused.current_index);
    }

    #[tokio::test(start_paused = true)]
    async fn test_elapsed_clock_runs_while_playing() {
        let mut d = driver(10);
        let frames = d.subscribe();

        d.play().await;
        sleep(Duration::from_millis(3500)).await;
        assert_eq!(frames.borrow().readout.elapsed, "00:00:03");

        d.pause().await;
        sleep(Duration::from_secs(5)).await;
        assert_eq!(frames.borrow().readout.elapsed, "00:00:03");
    }

    #[tokio::test(start_paused = true)]
    async fn test_restart_cancels_and_resets() {
        let mut d = driver(5);
        let frames = d.subscribe();

        d.play().await;
        sleep(Duration::from_millis(2500)).await;
        assert!(frames.borrow().current_index >= 1);

        d.restart().await;
        assert!(!d.is_running());
        sleep(Duration::from_secs(1)).await;

        let frame = frames.borrow().clone();
        assert_eq!(frame.status, PlaybackStatus::Stopped);
        assert_eq!(frame.current_index, 0);
        assert_eq!(frame.segment_progress, 0.0);
        assert_eq!(frame.readout.elapsed, "00:00:00");
        assert_eq!(frame.readout.battery_percent, 100);
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_while_playing() {
        let mut d = driver(10);
        let frames = d.subscribe();

        d.play().await;
        assert!(d.set_speed_multiplier(4).await);
        assert!(!d.set_speed_multiplier(3).await);

        // 4x crosses a 2 s segment in 0.5 s
        sleep(Duration::from_millis(1725)).await;
        assert!(frames.borrow().current_index >= 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_cancels_timers() {
        let mut d = driver(5);
        let engine = d.engine();
        d.play().await;
        sleep(Duration::from_millis(300)).await;
        drop(d);

        let progress = engine.lock().await.state().segment_progress;
        sleep(Duration::from_secs(2)).await;
        assert_eq!(engine.lock().await.state().segment_progress, progress);
    }

    #[tokio::test(start_paused = true)]
    async fn test_play_twice_keeps_single_ticker() {
        let mut d = driver(5);
        d.play().await;
        d.play().await;
        sleep(Duration::from_millis(1025)).await;

        // One ticker advances 20 ticks in a second at 1x
        let progress = d.engine().lock().await.state().segment_progress;
        assert!((progress - 0.5).abs() < 1e-9, "progress {}", progress);
    }
}

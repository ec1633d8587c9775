use crate::core::geo::{calculate_speed, interpolate};
use crate::core::Route;
use crate::playback::frame::{progress_percent, Frame, Readout};
use crate::playback::{PlaybackConfig, PlaybackEvent, PlaybackState, PlaybackStatus, SpeedMultiplier};
use std::time::Instant;
use tracing::{debug, info, warn};

/// Apply one event to the playback state in place
///
/// This is the whole state machine. It has no timers and no I/O, so a
/// host only needs to feed it events and read the state back.
pub fn apply(route: &Route, config: &PlaybackConfig, state: &mut PlaybackState, event: PlaybackEvent, now: Instant) {
    match event {
        PlaybackEvent::Play => {
            if !route.is_playable() {
                debug!("Ignoring play, route has {} waypoint(s)", route.len());
                return;
            }
            match state.status {
                PlaybackStatus::Playing => {}
                PlaybackStatus::Finished => {
                    reset(route, state);
                    begin(state, now);
                }
                PlaybackStatus::Stopped => begin(state, now),
            }
        }
        PlaybackEvent::Pause => {
            if state.status == PlaybackStatus::Playing {
                state.status = PlaybackStatus::Stopped;
            }
        }
        PlaybackEvent::Restart => reset(route, state),
        PlaybackEvent::SetSpeed(multiplier) => {
            // Only the increment of future ticks changes
            state.speed_multiplier = multiplier;
        }
        PlaybackEvent::Tick => {
            if state.status == PlaybackStatus::Playing {
                advance(route, config, state);
            }
        }
        PlaybackEvent::ClockTick => {
            if state.status == PlaybackStatus::Playing {
                state.elapsed.refresh(now);
            }
        }
    }
}

/// Pure form of [`apply`]: `(state, event) -> state'`
pub fn reduce(
    route: &Route,
    config: &PlaybackConfig,
    mut state: PlaybackState,
    event: PlaybackEvent,
    now: Instant,
) -> PlaybackState {
    apply(route, config, &mut state, event, now);
    state
}

fn begin(state: &mut PlaybackState, now: Instant) {
    state.status = PlaybackStatus::Playing;
    state.elapsed.start(now);
}

/// Back to the first waypoint. The speed multiplier is left as selected.
fn reset(route: &Route, state: &mut PlaybackState) {
    let start = route.first().coordinate();
    state.current_index = 0;
    state.segment_progress = 0.0;
    state.status = PlaybackStatus::Stopped;
    state.traveled_path.clear();
    state.traveled_path.push(start);
    state.current_position = start;
    state.current_speed_kmh = 0.0;
    state.battery.reset();
    state.elapsed.reset();
}

fn advance(route: &Route, config: &PlaybackConfig, state: &mut PlaybackState) {
    let last = route.last_index();
    if state.current_index >= last {
        state.status = PlaybackStatus::Finished;
        return;
    }

    let progress = state.segment_progress + config.progress_increment(state.speed_multiplier);
    let from = &route.waypoints()[state.current_index];
    let to = &route.waypoints()[state.current_index + 1];

    if progress < 1.0 {
        state.segment_progress = progress;
        state.current_position = interpolate(from.coordinate(), to.coordinate(), progress);
        return;
    }

    let completed = state.current_index;
    state.current_index += 1;
    state.segment_progress = 0.0;
    state.current_position = to.coordinate();
    state.traveled_path.push(to.coordinate());
    state.current_speed_kmh = segment_speed(route, config, completed, state.speed_multiplier);
    state.battery.drain();

    debug!(
        "Reached waypoint {}/{} at {:.1} km/h, battery {:.1}%",
        state.current_index,
        last,
        state.current_speed_kmh,
        state.battery.level()
    );

    if state.current_index == last {
        state.status = PlaybackStatus::Finished;
        info!("Playback finished at waypoint {}", last);
    }
}

/// Simulated speed over segment `index`, scaled by the multiplier and
/// capped at the configured maximum road speed
pub fn segment_speed(route: &Route, config: &PlaybackConfig, index: usize, multiplier: SpeedMultiplier) -> f64 {
    let (Some(distance), Some(seconds)) = (route.segment_distance_km(index), route.segment_time_delta_secs(index)) else {
        return 0.0;
    };
    let speed = calculate_speed(distance, seconds) * multiplier.factor();
    speed.min(config.max_speed_kmh)
}

/// Route playback engine
pub struct PlaybackEngine {
    route: Route,
    config: PlaybackConfig,
    state: PlaybackState,
}

impl PlaybackEngine {
    pub fn new(route: Route, config: PlaybackConfig) -> Self {
        let state = PlaybackState::initial(&route, &config, SpeedMultiplier::default());
        Self { route, config, state }
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn config(&self) -> &PlaybackConfig {
        &self.config
    }

    pub fn state(&self) -> &PlaybackState {
        &self.state
    }

    pub fn status(&self) -> PlaybackStatus {
        self.state.status
    }

    pub fn is_playing(&self) -> bool {
        self.state.is_playing()
    }

    pub fn speed_multiplier(&self) -> SpeedMultiplier {
        self.state.speed_multiplier
    }

    /// Feed an event stamped with the current wall-clock time
    pub fn dispatch(&mut self, event: PlaybackEvent) {
        self.dispatch_at(event, Instant::now());
    }

    pub fn dispatch_at(&mut self, event: PlaybackEvent, now: Instant) {
        let before = self.state.status;
        apply(&self.route, &self.config, &mut self.state, event, now);
        if self.state.status != before {
            info!("Playback {:?} -> {:?} on {:?}", before, self.state.status, event);
        }
    }

    /// Start or resume; restarts first when the route is finished
    pub fn play(&mut self) {
        self.dispatch(PlaybackEvent::Play);
    }

    pub fn pause(&mut self) {
        self.dispatch(PlaybackEvent::Pause);
    }

    /// Play/pause toggle as exposed by a single control button
    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    pub fn restart(&mut self) {
        self.dispatch(PlaybackEvent::Restart);
    }

    /// Change the speed multiplier. Values other than 1, 2 and 4 are ignored.
    pub fn set_speed_multiplier(&mut self, value: u32) -> bool {
        match SpeedMultiplier::try_from(value) {
            Ok(multiplier) => {
                self.dispatch(PlaybackEvent::SetSpeed(multiplier));
                true
            }
            Err(e) => {
                warn!("{}, keeping {}", e, self.state.speed_multiplier);
                false
            }
        }
    }

    pub fn tick(&mut self) {
        self.dispatch(PlaybackEvent::Tick);
    }

    pub fn clock_tick(&mut self) {
        self.dispatch(PlaybackEvent::ClockTick);
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.state.current_index, self.route.len())
    }

    pub fn readout(&self) -> Readout {
        let position = self.state.current_position;
        Readout {
            latitude: position.latitude,
            longitude: position.longitude,
            speed_kmh: self.state.current_speed_kmh,
            elapsed: self.state.elapsed.formatted(),
            battery_percent: self.state.battery.level().round() as u32,
            progress_percent: self.progress_percent().round() as u32,
        }
    }

    pub fn frame(&self) -> Frame {
        Frame {
            status: self.state.status,
            is_playing: self.state.is_playing(),
            speed_multiplier: self.state.speed_multiplier,
            current_index: self.state.current_index,
            segment_progress: self.state.segment_progress,
            position: self.state.current_position,
            traveled_path: self.state.traveled_path.clone(),
            readout: self.readout(),
        }
    }
}

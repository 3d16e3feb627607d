use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info};

use crate::compute::{init_state, tick};
use crate::config::GameConfig;
use crate::entities::{
    GameEvent, Hazard, HazardMessage, Millis, MissionState, Rover, RoverTemplate, ScienceTarget,
    SessionStatus,
};
use crate::input::InputState;

/// Read-only view of one frame, handed to the presentation layer.
#[derive(Clone, Copy, Debug)]
pub struct Snapshot<'a> {
    pub now: Millis,
    pub rover: &'a Rover,
    pub targets: &'a [ScienceTarget],
    pub hazards: &'a [Hazard],
    pub score: u32,
    pub remaining_seconds: f32,
    pub hazard_message: Option<&'a HazardMessage>,
    pub game_over: bool,
    pub playfield_width: f32,
    pub playfield_height: f32,
    pub low_time_warning_seconds: f32,
}

impl Snapshot<'_> {
    /// Message to show this frame, if its expiry has not passed.
    pub fn visible_hazard_message(&self) -> Option<&str> {
        self.hazard_message
            .filter(|m| m.is_visible(self.now))
            .map(|m| m.text.as_str())
    }

    pub fn low_time(&self) -> bool {
        self.remaining_seconds <= self.low_time_warning_seconds
    }
}

/// The single owner of all mission state.  Held by the entry point and
/// driven one frame at a time.
pub struct GameSession {
    config: GameConfig,
    template: RoverTemplate,
    rng: StdRng,
    state: MissionState,
}

impl GameSession {
    /// Start a mission at `now`.  A seed makes every layout reproducible,
    /// including the ones produced by later resets.
    pub fn new(config: GameConfig, template: RoverTemplate, seed: Option<u64>, now: Millis) -> Self {
        let mut rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = init_state(&config, &template, now, &mut rng);
        info!(?seed, targets = state.targets.len(), hazards = state.hazards.len(), "mission started");
        Self {
            config,
            template,
            rng,
            state,
        }
    }

    /// Continue from an existing mission state, e.g. a staged layout.  The
    /// seed only drives later resets.
    pub fn resume(
        config: GameConfig,
        template: RoverTemplate,
        seed: Option<u64>,
        state: MissionState,
    ) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        info!(?seed, score = state.score, status = ?state.status, "mission resumed");
        Self {
            config,
            template,
            rng,
            state,
        }
    }

    /// Throw away the current mission and start a fresh one.  Valid in any
    /// state.
    pub fn reset(&mut self, now: Millis) {
        let previous = self.state.score;
        self.state = init_state(&self.config, &self.template, now, &mut self.rng);
        info!(previous_score = previous, "mission reset");
    }

    /// Advance one frame.  Returns what happened so callers can react.
    pub fn step(&mut self, input: &InputState, now: Millis) -> Vec<GameEvent> {
        let (next, events) = tick(&self.state, input, now, &self.config);
        self.state = next;

        for event in &events {
            match event {
                GameEvent::TargetCollected { type_index, score } => {
                    info!(type_index, score, "science target collected");
                }
                GameEvent::HazardPenalty {
                    score,
                    remaining_seconds,
                } => {
                    info!(score, remaining_seconds, "hazard hit");
                }
                GameEvent::MissionOver { score } => {
                    info!(final_score = score, "mission over");
                }
            }
        }
        if !events.is_empty() {
            debug!(
                remaining = self.state.remaining_seconds,
                targets_left = self.state.targets.len(),
                "frame events"
            );
        }
        events
    }

    pub fn snapshot(&self, now: Millis) -> Snapshot<'_> {
        Snapshot {
            now,
            rover: &self.state.rover,
            targets: &self.state.targets,
            hazards: &self.state.hazards,
            score: self.state.score,
            remaining_seconds: self.state.remaining_seconds,
            hazard_message: self.state.hazard_message.as_ref(),
            game_over: self.is_over(),
            playfield_width: self.config.playfield_width,
            playfield_height: self.config.playfield_height,
            low_time_warning_seconds: self.config.low_time_warning_seconds,
        }
    }

    pub fn state(&self) -> &MissionState {
        &self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn status(&self) -> SessionStatus {
        self.state.status
    }

    pub fn is_over(&self) -> bool {
        self.state.is_over()
    }

    pub fn score(&self) -> u32 {
        self.state.score
    }

    pub fn remaining_seconds(&self) -> f32 {
        self.state.remaining_seconds
    }
}

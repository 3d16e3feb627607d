/// Pure game-logic functions.
///
/// Every public function takes immutable references to the current state
/// (and, where needed, an RNG handle) and returns brand-new values.  Side
/// effects are limited to the injected RNG.

use rand::Rng;

use crate::config::GameConfig;
use crate::entities::{
    Body, Bounds, FallbackShape, GameEvent, Hazard, HazardMessage, Millis, MissionState, Rover,
    RoverTemplate, ScienceTarget, SessionStatus, Vec2, Visual, TARGET_PALETTE_SIZE,
};
use crate::input::InputState;

pub fn hazard_message_text(penalty_score: u32) -> String {
    format!("HAZARD! -{penalty_score} pts")
}

// ── Placement ────────────────────────────────────────────────────────────────

/// Draw points from `sample` until one lies strictly farther than
/// `min_distance` from `center`.  `GameConfig::validate` guarantees the
/// region contains such points.
fn sample_away_from<R: Rng>(
    rng: &mut R,
    center: Vec2,
    min_distance: f32,
    mut sample: impl FnMut(&mut R) -> Vec2,
) -> Vec2 {
    loop {
        let p = sample(rng);
        if p.distance(center) > min_distance {
            return p;
        }
    }
}

fn center_of(config: &GameConfig) -> Vec2 {
    let (cx, cy) = config.center();
    Vec2::new(cx, cy)
}

pub fn spawn_rover(config: &GameConfig, template: &RoverTemplate) -> Rover {
    Rover {
        body: Body {
            position: center_of(config),
            bounds: Bounds::CenteredRect {
                width: template.width,
                height: template.height,
            },
            visual: template.visual,
        },
        facing_degrees: 0.0,
        speed: config.rover_speed,
    }
}

/// Place `target_count` targets inside the margin, away from the start.
pub fn spawn_targets(config: &GameConfig, rng: &mut impl Rng) -> Vec<ScienceTarget> {
    let m = config.target_margin;
    let (w, h) = (config.playfield_width, config.playfield_height);
    (0..config.target_count)
        .map(|i| {
            let position = sample_away_from(
                rng,
                center_of(config),
                config.target_min_center_distance,
                |r| Vec2::new(r.gen_range(m..=w - m), r.gen_range(m..=h - m)),
            );
            ScienceTarget {
                body: Body {
                    position,
                    bounds: Bounds::Circle {
                        radius: config.target_radius,
                    },
                    visual: Visual::Fallback(FallbackShape::Disc),
                },
                type_index: i % TARGET_PALETTE_SIZE,
            }
        })
        .collect()
}

fn place_hazard(
    config: &GameConfig,
    rng: &mut impl Rng,
    width: f32,
    height: f32,
    reserve: f32,
    visible: bool,
) -> Hazard {
    let (w, h) = (config.playfield_width, config.playfield_height);
    let top_left = sample_away_from(
        rng,
        center_of(config),
        config.hazard_min_center_distance,
        |r| Vec2::new(r.gen_range(0.0..=w - reserve), r.gen_range(0.0..=h - reserve)),
    );
    let shape = if visible {
        FallbackShape::HazardPatch
    } else {
        FallbackShape::Nothing
    };
    Hazard {
        body: Body {
            position: top_left,
            bounds: Bounds::AnchoredRect { width, height },
            visual: Visual::Fallback(shape),
        },
        visible,
    }
}

/// Visible hazards (random size) followed by hidden ones (fixed size).
/// The distance rule applies to each hazard's top-left corner.
pub fn spawn_hazards(config: &GameConfig, rng: &mut impl Rng) -> Vec<Hazard> {
    let lo = config.visible_hazard_min_size.round() as i32;
    let hi = config.visible_hazard_max_size.round() as i32;
    let mut hazards = Vec::with_capacity(config.visible_hazard_count + config.hidden_hazard_count);

    for _ in 0..config.visible_hazard_count {
        let hw = rng.gen_range(lo..=hi) as f32;
        let hh = rng.gen_range(lo..=hi) as f32;
        let reserve = config.visible_hazard_max_size;
        hazards.push(place_hazard(config, rng, hw, hh, reserve, true));
    }

    let size = config.hidden_hazard_size;
    for _ in 0..config.hidden_hazard_count {
        hazards.push(place_hazard(config, rng, size, size, size, false));
    }
    hazards
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// Fresh mission: full timer, zero score, newly randomised layout.
pub fn init_state(
    config: &GameConfig,
    template: &RoverTemplate,
    now: Millis,
    rng: &mut impl Rng,
) -> MissionState {
    MissionState {
        rover: spawn_rover(config, template),
        targets: spawn_targets(config, rng),
        hazards: spawn_hazards(config, rng),
        score: 0,
        mission_start: now,
        remaining_seconds: config.mission_duration_seconds,
        status: SessionStatus::Active,
        last_hazard_hit: None,
        hazard_message: None,
    }
}

// ── Rover controller ─────────────────────────────────────────────────────────

/// Screen-relative movement: held directions add up, diagonals are
/// normalised, the rover turns to face its travel direction and stops dead
/// when nothing is held.
pub fn move_rover(rover: &Rover, input: &InputState, config: &GameConfig) -> Rover {
    let (dx, dy) = input.direction();
    let Some(dir) = Vec2::new(dx, dy).normalized() else {
        return rover.clone();
    };

    let moved = rover.body.position + dir.scaled(rover.speed);
    let position = Vec2::new(
        moved.x.clamp(0.0, config.playfield_width),
        moved.y.clamp(0.0, config.playfield_height),
    );

    Rover {
        body: Body {
            position,
            ..rover.body
        },
        facing_degrees: facing_for(dir),
        ..rover.clone()
    }
}

/// Degrees from "up", counter-clockwise positive, for a Y-down vector.
pub fn facing_for(dir: Vec2) -> f32 {
    // `0.0 - y` rather than `-y`: a -0.0 would turn straight left into -270°.
    (0.0 - dir.y).atan2(dir.x).to_degrees() - 90.0
}

// ── Collision tests ──────────────────────────────────────────────────────────

/// Target disc against the rover's rectangle.
pub fn target_overlaps(rover: &Rover, target: &ScienceTarget) -> bool {
    let c = target.body.center();
    let nearest = rover.body.rect().clamp_point(c);
    nearest.distance(c) <= target.radius()
}

/// Both bounding circles shrunk by `ratio` before the overlap test, so a
/// brush against a hazard's corner does not count.
pub fn hazard_overlaps(rover: &Rover, hazard: &Hazard, ratio: f32) -> bool {
    let reach =
        (rover.body.bounds.bounding_radius() + hazard.body.bounds.bounding_radius()) * ratio;
    rover.body.center().distance(hazard.body.center()) <= reach
}

/// Split targets into (still on the field, collected this frame).
pub fn collect_targets(
    rover: &Rover,
    targets: &[ScienceTarget],
) -> (Vec<ScienceTarget>, Vec<ScienceTarget>) {
    targets
        .iter()
        .cloned()
        .partition(|t| !target_overlaps(rover, t))
}

// ── Mission clock ────────────────────────────────────────────────────────────

pub fn remaining_seconds(mission_start: Millis, now: Millis, duration_seconds: f32) -> f32 {
    let elapsed = (now - mission_start) as f32 / 1000.0;
    (duration_seconds - elapsed).clamp(0.0, duration_seconds)
}

pub fn debounce_elapsed(last_hit: Option<Millis>, now: Millis, debounce_ms: i64) -> bool {
    last_hit.map_or(true, |last| now - last > debounce_ms)
}

/// One penalty regardless of how many hazards overlap: score down (floored
/// at zero), countdown start pushed back, message armed.
pub fn apply_hazard_penalty(state: &MissionState, now: Millis, config: &GameConfig) -> MissionState {
    let penalty_ms = (config.hazard_penalty_time_seconds * 1000.0).round() as Millis;
    MissionState {
        score: state.score.saturating_sub(config.hazard_penalty_score),
        mission_start: state.mission_start - penalty_ms,
        last_hazard_hit: Some(now),
        hazard_message: Some(HazardMessage {
            text: hazard_message_text(config.hazard_penalty_score),
            expires_at: now + config.hazard_message_ms,
        }),
        ..state.clone()
    }
}

fn expire_message(message: Option<&HazardMessage>, now: Millis) -> Option<HazardMessage> {
    message.filter(|m| m.is_visible(now)).cloned()
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the mission by one frame at time `now`.  Once the mission is over
/// nothing but the hazard message expiry is evaluated.
pub fn tick(
    state: &MissionState,
    input: &InputState,
    now: Millis,
    config: &GameConfig,
) -> (MissionState, Vec<GameEvent>) {
    let mut events = Vec::new();

    if state.is_over() {
        let next = MissionState {
            hazard_message: expire_message(state.hazard_message.as_ref(), now),
            ..state.clone()
        };
        return (next, events);
    }

    // ── 1. Rover ─────────────────────────────────────────────────────────────
    let rover = move_rover(&state.rover, input, config);

    // ── 2. Targets ───────────────────────────────────────────────────────────
    let (targets, collected) = collect_targets(&rover, &state.targets);
    let mut score = state.score;
    for target in &collected {
        score = score.saturating_add(config.score_per_target);
        events.push(GameEvent::TargetCollected {
            type_index: target.type_index,
            score,
        });
    }

    let mut next = MissionState {
        rover,
        targets,
        score,
        hazard_message: expire_message(state.hazard_message.as_ref(), now),
        ..state.clone()
    };

    // ── 3. Hazards ───────────────────────────────────────────────────────────
    let hit = next
        .hazards
        .iter()
        .any(|h| hazard_overlaps(&next.rover, h, config.hazard_collision_ratio));
    if hit && debounce_elapsed(next.last_hazard_hit, now, config.hazard_debounce_ms) {
        next = apply_hazard_penalty(&next, now, config);
        events.push(GameEvent::HazardPenalty {
            score: next.score,
            remaining_seconds: remaining_seconds(
                next.mission_start,
                now,
                config.mission_duration_seconds,
            ),
        });
    }

    // ── 4. Clock ─────────────────────────────────────────────────────────────
    next.remaining_seconds =
        remaining_seconds(next.mission_start, now, config.mission_duration_seconds);
    if next.remaining_seconds <= 0.0 {
        next.remaining_seconds = 0.0;
        next.status = SessionStatus::Over;
        events.push(GameEvent::MissionOver { score: next.score });
    }

    (next, events)
}

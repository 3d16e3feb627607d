use rover_mission::clock::{Clock, ManualClock};
use rover_mission::config::GameConfig;
use rover_mission::entities::RoverTemplate;
use rover_mission::game_loop::{run, LoopExit, Presenter};
use rover_mission::input::{Action, InputState, ScriptedInput};
use rover_mission::session::{GameSession, Snapshot};

/// What the presenter saw on one frame.
#[derive(Clone, Debug, PartialEq)]
struct Frame {
    now: i64,
    score: u32,
    remaining: f32,
    game_over: bool,
    rover_x: f32,
    targets: usize,
}

#[derive(Default)]
struct RecordingPresenter {
    frames: Vec<Frame>,
}

impl Presenter for RecordingPresenter {
    fn present(&mut self, frame: &Snapshot<'_>) -> std::io::Result<()> {
        self.frames.push(Frame {
            now: frame.now,
            score: frame.score,
            remaining: frame.remaining_seconds,
            game_over: frame.game_over,
            rover_x: frame.rover.body.position.x,
            targets: frame.targets.len(),
        });
        Ok(())
    }
}

/// One-second mission without hazards so an idle rover is never hit.
fn short_session() -> GameSession {
    let config = GameConfig {
        mission_duration_seconds: 1.0,
        visible_hazard_count: 0,
        hidden_hazard_count: 0,
        ..GameConfig::default()
    };
    let template = RoverTemplate::fallback(config.rover_size);
    GameSession::new(config, template, Some(99), 0)
}

fn idle_frames(n: usize) -> Vec<InputState> {
    vec![InputState::default(); n]
}

#[test]
fn stops_at_frame_limit() {
    let mut session = short_session();
    let mut clock = ManualClock::default();
    let mut input = ScriptedInput::new(Vec::new());
    let mut presenter = RecordingPresenter::default();

    let summary = run(&mut session, &mut clock, &mut input, &mut presenter, Some(10)).unwrap();

    assert_eq!(summary.frames, 10);
    assert_eq!(summary.exit, LoopExit::FrameLimit);
    assert_eq!(presenter.frames.len(), 10);
    // 60 fps on the manual clock is 16 ms per frame.
    assert_eq!(presenter.frames[0].now, 16);
    assert_eq!(presenter.frames[9].now, 160);
    assert_eq!(clock.now_ms(), 160);
}

#[test]
fn quit_ends_loop_before_drawing() {
    let mut session = short_session();
    let mut clock = ManualClock::default();
    let mut frames = idle_frames(2);
    frames.push(InputState { quit: true, ..InputState::default() });
    let mut input = ScriptedInput::new(frames);
    let mut presenter = RecordingPresenter::default();

    let summary = run(&mut session, &mut clock, &mut input, &mut presenter, None).unwrap();

    assert_eq!(summary.exit, LoopExit::Quit);
    assert_eq!(summary.frames, 2);
    assert_eq!(presenter.frames.len(), 2);
}

#[test]
fn held_direction_moves_rover_each_frame() {
    let mut session = short_session();
    let mut clock = ManualClock::default();
    let mut input = ScriptedInput::new(vec![InputState::with(&[Action::Right]); 3]);
    let mut presenter = RecordingPresenter::default();

    run(&mut session, &mut clock, &mut input, &mut presenter, Some(4)).unwrap();

    let xs: Vec<f32> = presenter.frames.iter().map(|f| f.rover_x).collect();
    assert_eq!(xs, vec![405.0, 410.0, 415.0, 415.0]);
}

#[test]
fn mission_runs_out_then_restart() {
    let mut session = short_session();
    let mut clock = ManualClock::default();
    let mut frames = idle_frames(69);
    frames.push(InputState::with(&[Action::Restart]));
    let mut input = ScriptedInput::new(frames);
    let mut presenter = RecordingPresenter::default();

    let summary = run(&mut session, &mut clock, &mut input, &mut presenter, Some(75)).unwrap();

    assert_eq!(summary.restarts, 1);
    // Frame 63 is the first at or past 1000 ms.
    let first_over = presenter.frames.iter().position(|f| f.game_over).unwrap();
    assert_eq!(first_over, 62);
    assert_eq!(presenter.frames[first_over].remaining, 0.0);
    assert!(presenter.frames[first_over..69].iter().all(|f| f.game_over));

    let restarted = &presenter.frames[69];
    assert!(!restarted.game_over);
    assert_eq!(restarted.remaining, 1.0);
    assert_eq!(restarted.score, 0);
    assert_eq!(restarted.targets, 5);
    assert!(!session.is_over());
}

#[test]
fn remaining_time_never_increases_without_restart() {
    let mut session = short_session();
    let mut clock = ManualClock::starting_at(0);
    let mut input = ScriptedInput::new(Vec::new());
    let mut presenter = RecordingPresenter::default();

    run(&mut session, &mut clock, &mut input, &mut presenter, Some(80)).unwrap();

    for pair in presenter.frames.windows(2) {
        assert!(pair[1].remaining <= pair[0].remaining);
        assert!((0.0..=1.0).contains(&pair[1].remaining));
    }
}

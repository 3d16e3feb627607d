/// The frame loop: clock tick → input poll → simulate → present → yield.
///
/// Generic over its collaborators so the terminal front end and headless
/// tests drive the exact same sequence.

use tracing::{debug, info};

use crate::clock::Clock;
use crate::input::{InputSource, InputState};
use crate::session::{GameSession, Snapshot};

/// Draws one frame from a read-only snapshot.
pub trait Presenter {
    fn present(&mut self, frame: &Snapshot<'_>) -> std::io::Result<()>;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopExit {
    Quit,
    FrameLimit,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LoopSummary {
    pub frames: u64,
    pub restarts: u32,
    pub exit: LoopExit,
}

/// Run until quit is requested or `max_frames` frames have been presented.
pub fn run<C, I, P>(
    session: &mut GameSession,
    clock: &mut C,
    input: &mut I,
    presenter: &mut P,
    max_frames: Option<u64>,
) -> std::io::Result<LoopSummary>
where
    C: Clock,
    I: InputSource,
    P: Presenter,
{
    let fps = session.config().fps;
    let mut frames = 0u64;
    let mut restarts = 0u32;
    info!(fps, "frame loop started");

    let exit = loop {
        if max_frames.is_some_and(|max| frames >= max) {
            break LoopExit::FrameLimit;
        }

        let dt = clock.tick(fps);
        let now = clock.now_ms();

        input.poll();
        let state = InputState::capture(&*input);
        if state.quit {
            break LoopExit::Quit;
        }
        if state.restart {
            session.reset(now);
            restarts += 1;
        }

        session.step(&state, now);
        presenter.present(&session.snapshot(now))?;
        frames += 1;

        if dt > 2.0 / fps.max(1) as f32 {
            debug!(dt, "slow frame");
        }

        // Single suspension point per frame.
        std::thread::yield_now();
    };

    info!(frames, restarts, ?exit, "frame loop stopped");
    Ok(LoopSummary {
        frames,
        restarts,
        exit,
    })
}

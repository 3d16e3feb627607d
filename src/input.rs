/// Logical input actions and the per-frame input snapshot.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Down,
    Left,
    Right,
    Restart,
}

/// Anything that can answer "is this action held right now?".
pub trait InputSource {
    /// Drain pending device events. Called once per frame before querying.
    fn poll(&mut self);
    fn is_pressed(&self, action: Action) -> bool;
    fn quit_requested(&self) -> bool;
}

/// Input sampled once per frame and handed to the simulation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InputState {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
    pub restart: bool,
    pub quit: bool,
}

impl InputState {
    pub fn capture(source: &dyn InputSource) -> Self {
        Self {
            up: source.is_pressed(Action::Up),
            down: source.is_pressed(Action::Down),
            left: source.is_pressed(Action::Left),
            right: source.is_pressed(Action::Right),
            restart: source.is_pressed(Action::Restart),
            quit: source.quit_requested(),
        }
    }

    pub fn with(actions: &[Action]) -> Self {
        let mut state = Self::default();
        for action in actions {
            match action {
                Action::Up => state.up = true,
                Action::Down => state.down = true,
                Action::Left => state.left = true,
                Action::Right => state.right = true,
                Action::Restart => state.restart = true,
            }
        }
        state
    }

    /// Sum of unit contributions for each held direction (Y down).
    pub fn direction(&self) -> (f32, f32) {
        let mut dx = 0.0;
        let mut dy = 0.0;
        if self.up {
            dy -= 1.0;
        }
        if self.down {
            dy += 1.0;
        }
        if self.left {
            dx -= 1.0;
        }
        if self.right {
            dx += 1.0;
        }
        (dx, dy)
    }
}

/// Replays a fixed list of per-frame inputs; idle once the list runs out.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    frames: Vec<InputState>,
    cursor: usize,
    current: InputState,
}

impl ScriptedInput {
    pub fn new(frames: Vec<InputState>) -> Self {
        Self {
            frames,
            cursor: 0,
            current: InputState::default(),
        }
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) {
        self.current = self.frames.get(self.cursor).copied().unwrap_or_default();
        self.cursor += 1;
    }

    fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::Up => self.current.up,
            Action::Down => self.current.down,
            Action::Left => self.current.left,
            Action::Right => self.current.right,
            Action::Restart => self.current.restart,
        }
    }

    fn quit_requested(&self) -> bool {
        self.current.quit
    }
}

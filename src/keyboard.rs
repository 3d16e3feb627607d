/// Terminal keyboard input.
///
/// Input model: instead of acting on each key event individually, we keep a
/// `key_frame` map recording the frame of the last press/repeat event for
/// every key.  A key counts as held while that frame is within `HOLD_WINDOW`
/// of the current one, so several directions can be held together.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events, keys are dropped on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire after `HOLD_WINDOW` frames of silence,
///   which is shorter than the OS repeat interval.

use std::collections::HashMap;
use std::sync::mpsc;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use rover_mission::input::{Action, InputSource};

/// 8 frames @ 60 FPS ≈ 133 ms, refreshed by any OS key-repeat rate ≥ 8 Hz.
const HOLD_WINDOW: u64 = 8;

pub struct KeyboardInput {
    rx: mpsc::Receiver<Event>,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    restart: bool,
    quit: bool,
}

impl KeyboardInput {
    pub fn new(rx: mpsc::Receiver<Event>) -> Self {
        Self {
            rx,
            key_frame: HashMap::new(),
            frame: 0,
            restart: false,
            quit: false,
        }
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .map(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }
}

impl InputSource for KeyboardInput {
    fn poll(&mut self) {
        self.frame += 1;
        // Restart fires on the press itself, not while held.
        self.restart = false;

        while let Ok(ev) = self.rx.try_recv() {
            let Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) = ev
            else {
                continue;
            };
            match kind {
                KeyEventKind::Press => {
                    self.key_frame.insert(code, self.frame);
                    match code {
                        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                            self.quit = true;
                        }
                        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
                            self.quit = true;
                        }
                        KeyCode::Char('r') | KeyCode::Char('R') => self.restart = true,
                        _ => {}
                    }
                }
                KeyEventKind::Repeat => {
                    self.key_frame.insert(code, self.frame);
                }
                KeyEventKind::Release => {
                    self.key_frame.remove(&code);
                }
            }
        }
    }

    fn is_pressed(&self, action: Action) -> bool {
        match action {
            Action::Up => self.any_held(&[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')]),
            Action::Down => {
                self.any_held(&[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')])
            }
            Action::Left => {
                self.any_held(&[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')])
            }
            Action::Right => {
                self.any_held(&[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')])
            }
            Action::Restart => self.restart,
        }
    }

    fn quit_requested(&self) -> bool {
        self.quit
    }
}

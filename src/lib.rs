pub mod assets;
pub mod clock;
pub mod compute;
pub mod config;
pub mod entities;
pub mod game_loop;
pub mod input;
pub mod session;

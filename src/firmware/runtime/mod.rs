mod bootstrap;
mod button_task;
mod game_task;

pub use bootstrap::run;

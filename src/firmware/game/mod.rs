pub mod board;
mod rng;

pub use board::{Board, BoardEvent, BoardPhase, EventBuffer};
pub use rng::XorShift32;

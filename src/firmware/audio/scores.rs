// Static melody tables compiled from `config/scores.toml` at build time.

#[allow(unused_imports)]
use super::notes::{Score, ScoreNote, SCORE_TERMINATOR};

include!(concat!(env!("OUT_DIR"), "/score_data.rs"));

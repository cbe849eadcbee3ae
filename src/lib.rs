//! Heuristic match predictor: manually entered historical scores in,
//! projected scores, win probabilities and betting edges out.

pub mod features;
pub mod markets;
pub mod parse;
pub mod predict;
pub mod projection;
pub mod sample;
pub mod state;
pub mod win_prob;

pub use predict::{Prediction, PredictError, predict};
pub use state::{Category, MatchStore, MatchupConfig, Sport};

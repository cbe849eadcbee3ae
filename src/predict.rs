use serde::Serialize;
use thiserror::Error;

use crate::features::{self, ConfigError};
use crate::markets::{self, OverUnderRec, SpreadRec};
use crate::projection;
use crate::state::{InputError, MatchStore, MatchupConfig};
use crate::win_prob::{self, WinProbs};

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("{0}")]
    Input(#[from] InputError),
    #[error("{0}")]
    Config(#[from] ConfigError),
}

/// One prediction run's output; built per invocation and never retained by
/// the engine.
#[derive(Debug, Clone, Serialize)]
pub struct Prediction {
    pub team1_score: u32,
    pub team2_score: u32,
    pub probabilities: WinProbs,
    pub projected_total: f64,
    pub projected_margin: f64,
    pub over_under: Option<OverUnderRec>,
    pub spread: Option<SpreadRec>,
}

/// Runs the full pipeline: features, strengths/probabilities, projections,
/// market calls, and the final consistency pass that reconciles the
/// probability triple with the projected margin.
pub fn predict(store: &MatchStore, config: &MatchupConfig) -> Result<Prediction, PredictError> {
    validate(store, config)?;

    let features = features::prepare_features(store, config)?;
    let probabilities = win_prob::calculate_probabilities(&features, config.sport);
    let projected_total = projection::projected_total(&features, config.sport);
    let projected_margin = projection::projected_margin(&features, config.sport);
    let (team1_score, team2_score) = projection::projected_scores(projected_total, projected_margin);

    let probabilities = win_prob::adjust_probabilities(probabilities, projected_margin);

    Ok(Prediction {
        team1_score,
        team2_score,
        probabilities,
        projected_total,
        projected_margin,
        over_under: markets::over_under_recommendation(projected_total, config),
        spread: markets::spread_recommendation(projected_margin, config),
    })
}

fn validate(store: &MatchStore, config: &MatchupConfig) -> Result<(), InputError> {
    if store.is_empty() {
        return Err(InputError::NoMatchData);
    }
    let team1 = config.team1_name.trim();
    let team2 = config.team2_name.trim();
    if team1.is_empty() || team2.is_empty() {
        return Err(InputError::BlankTeamName);
    }
    if team1 == team2 {
        return Err(InputError::SameTeamNames);
    }
    Ok(())
}

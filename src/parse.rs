use crate::state::InputError;

/// Parses a comma-separated score list ("2,1,0"). The whole list is rejected
/// on any blank, non-numeric or negative entry; no partial batch survives.
pub fn parse_score_list(raw: &str) -> Result<Vec<f64>, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::EmptyBatch);
    }
    let mut scores = Vec::new();
    for part in trimmed.split(',') {
        let score: f64 = part
            .trim()
            .parse()
            .map_err(|_| InputError::InvalidScore)?;
        if !score.is_finite() {
            return Err(InputError::InvalidScore);
        }
        if score < 0.0 {
            return Err(InputError::NegativeScore);
        }
        scores.push(score);
    }
    Ok(scores)
}

/// Pairs two score lists up to the shorter length, mirroring how the entry
/// form combines the "own" and "opponent" columns.
pub fn zip_scores(own: &[f64], opponent: &[f64]) -> Vec<(f64, f64)> {
    own.iter()
        .copied()
        .zip(opponent.iter().copied())
        .collect()
}

pub fn parse_f64_or(raw: &str, default: f64) -> f64 {
    raw.trim().parse::<f64>().ok().filter(|v| v.is_finite()).unwrap_or(default)
}

pub fn parse_u32_or(raw: &str, default: u32) -> u32 {
    raw.trim().parse::<u32>().unwrap_or(default)
}

pub fn non_blank_or(raw: &str, default: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        default.to_string()
    } else {
        trimmed.to_string()
    }
}

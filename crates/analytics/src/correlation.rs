use crate::error::AnalyticsError;
use crate::report::TypeStatistics;
use serde::{Deserialize, Serialize};

/// Names of the per-type series, in matrix order.
pub const VARIABLES: [&str; 3] = ["documents", "mean_index_count", "mean_interval_days"];

/// Pearson correlations between the per-type series.
///
/// `coefficients[i][j]` relates `variables[i]` and `variables[j]`; `None` when
/// the pair has fewer than two complete observations or no variance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorrelationMatrix {
    pub variables: Vec<String>,
    pub coefficients: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let i = self.variables.iter().position(|v| v == row)?;
        let j = self.variables.iter().position(|v| v == column)?;
        self.coefficients[i][j]
    }
}

/// Correlates document count, mean index count and mean interval across document types.
pub fn correlation_matrix(per_type: &[TypeStatistics]) -> Result<CorrelationMatrix, AnalyticsError> {
    if per_type.len() < 2 {
        return Err(AnalyticsError::NotEnoughData(format!(
            "correlations need at least two document types, found {}",
            per_type.len()
        )));
    }

    let series: [Vec<Option<f64>>; 3] = [
        per_type.iter().map(|t| Some(t.documents as f64)).collect(),
        per_type.iter().map(|t| t.mean_index_count).collect(),
        per_type.iter().map(|t| t.mean_interval_days).collect(),
    ];

    let coefficients: Vec<Vec<Option<f64>>> = series
        .iter()
        .map(|x| series.iter().map(|y| pearson(x, y)).collect())
        .collect();

    Ok(CorrelationMatrix {
        variables: VARIABLES.iter().map(|v| v.to_string()).collect(),
        coefficients,
    })
}

/// Pearson coefficient over the positions where both series have a value.
fn pearson(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = x
        .iter()
        .zip(y)
        .filter_map(|(a, b)| Some(((*a)?, (*b)?)))
        .collect();
    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|p| p.0).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|p| p.1).sum::<f64>() / n;

    let (mut covariance, mut variance_x, mut variance_y) = (0.0, 0.0, 0.0);
    for (a, b) in &pairs {
        let (dx, dy) = (a - mean_x, b - mean_y);
        covariance += dx * dy;
        variance_x += dx * dx;
        variance_y += dy * dy;
    }

    if variance_x == 0.0 || variance_y == 0.0 {
        return None;
    }
    Some((covariance / (variance_x * variance_y).sqrt()).clamp(-1.0, 1.0))
}

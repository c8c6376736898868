//! Population statistics for cross-hedging.
//!
//! All moments divide by `n`, not `n - 1`.

use crate::domain::error::PayoffError;

fn non_empty(xs: &[f64]) -> Result<(), PayoffError> {
    if xs.is_empty() {
        return Err(PayoffError::Statistics {
            reason: "empty sample".into(),
        });
    }
    Ok(())
}

fn same_length(a: &[f64], b: &[f64]) -> Result<(), PayoffError> {
    if a.len() != b.len() {
        return Err(PayoffError::Statistics {
            reason: format!("sample lengths differ: {} vs {}", a.len(), b.len()),
        });
    }
    non_empty(a)
}

pub fn mean(xs: &[f64]) -> Result<f64, PayoffError> {
    non_empty(xs)?;
    Ok(xs.iter().sum::<f64>() / xs.len() as f64)
}

pub fn stdev(xs: &[f64]) -> Result<f64, PayoffError> {
    let mu = mean(xs)?;
    let variance = xs.iter().map(|x| (x - mu) * (x - mu)).sum::<f64>() / xs.len() as f64;
    Ok(variance.sqrt())
}

/// `E[ab] - E[a]E[b]`.
pub fn covariance(a: &[f64], b: &[f64]) -> Result<f64, PayoffError> {
    same_length(a, b)?;
    let products: Vec<f64> = a.iter().zip(b).map(|(x, y)| x * y).collect();
    Ok(mean(&products)? - mean(a)? * mean(b)?)
}

pub fn correlation(a: &[f64], b: &[f64]) -> Result<f64, PayoffError> {
    let cov = covariance(a, b)?;
    let denominator = stdev(a)? * stdev(b)?;
    if denominator == 0.0 {
        return Err(PayoffError::Statistics {
            reason: "correlation undefined for a constant sample".into(),
        });
    }
    Ok(cov / denominator)
}

/// Minimum-variance hedge ratio `rho * sigma_spot / sigma_futures` from paired
/// spot and futures price changes.
pub fn hedge_ratio(spot_changes: &[f64], futures_changes: &[f64]) -> Result<f64, PayoffError> {
    let rho = correlation(spot_changes, futures_changes)?;
    Ok(rho * stdev(spot_changes)? / stdev(futures_changes)?)
}

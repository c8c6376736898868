//! Payoff report port trait.

use crate::domain::error::PayoffError;
use crate::domain::payoff_curve::PayoffCurve;
use crate::domain::strategy::Strategy;

/// Port for writing an aggregate payoff curve somewhere outside the process.
pub trait ReportPort {
    fn write(
        &self,
        strategy: &Strategy,
        curve: &PayoffCurve,
        output_path: &str,
    ) -> Result<(), PayoffError>;
}

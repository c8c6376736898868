//! CSV export of payoff curves.

use crate::domain::error::PayoffError;
use crate::domain::payoff_curve::PayoffCurve;
use crate::domain::strategy::Strategy;
use crate::ports::report_port::ReportPort;
use std::io::Write;

/// Writes `price,value` rows, one per breakpoint.
pub struct CsvReportAdapter;

impl CsvReportAdapter {
    pub fn write_to<W: Write>(curve: &PayoffCurve, writer: W) -> Result<(), PayoffError> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(["price", "value"])?;
        for point in curve.breakpoints() {
            wtr.write_record([point.price.to_string(), point.value.to_string()])?;
        }
        wtr.flush()?;
        Ok(())
    }
}

impl ReportPort for CsvReportAdapter {
    fn write(
        &self,
        _strategy: &Strategy,
        curve: &PayoffCurve,
        output_path: &str,
    ) -> Result<(), PayoffError> {
        let file = std::fs::File::create(output_path)?;
        Self::write_to(curve, file)
    }
}

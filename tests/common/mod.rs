#![allow(dead_code)]

use payoffkit::domain::error::PayoffError;
use payoffkit::domain::option_contract::{ExerciseStyle, OptionContract, OptionType, PositionSide};
use payoffkit::domain::payoff_curve::PayoffCurve;
use payoffkit::domain::strategy::Strategy;
use payoffkit::ports::report_port::ReportPort;
use std::cell::RefCell;
use std::io::Write;

pub const CEILING: f64 = 10_000.0;

pub fn long_call(strike: f64) -> OptionContract {
    contract(OptionType::Call, PositionSide::Long, strike)
}

pub fn short_call(strike: f64) -> OptionContract {
    contract(OptionType::Call, PositionSide::Short, strike)
}

pub fn long_put(strike: f64) -> OptionContract {
    contract(OptionType::Put, PositionSide::Long, strike)
}

pub fn short_put(strike: f64) -> OptionContract {
    contract(OptionType::Put, PositionSide::Short, strike)
}

pub fn contract(option_type: OptionType, side: PositionSide, strike: f64) -> OptionContract {
    OptionContract::new(option_type, side, ExerciseStyle::European, 90, strike).unwrap()
}

pub fn curve_of(contract: &OptionContract) -> PayoffCurve {
    contract.payoff_curve().unwrap()
}

/// Records what a report port was asked to write.
pub struct RecordingReportPort {
    pub written: RefCell<Vec<(String, Vec<(f64, f64)>, String)>>,
}

impl RecordingReportPort {
    pub fn new() -> Self {
        Self {
            written: RefCell::new(Vec::new()),
        }
    }
}

impl ReportPort for RecordingReportPort {
    fn write(
        &self,
        strategy: &Strategy,
        curve: &PayoffCurve,
        output_path: &str,
    ) -> Result<(), PayoffError> {
        self.written.borrow_mut().push((
            strategy.name.clone(),
            curve.to_points(),
            output_path.to_string(),
        ));
        Ok(())
    }
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

pub const BULL_SPREAD_INI: &str = r#"
[strategy]
name = Bull Spread
description = Long 30 call, short 35 call
ceiling = 10000

[leg.1]
type = call
side = long
style = european
strike = 30
days = 90
spot = 32
rate = 0.05

[leg.2]
type = call
side = short
style = european
strike = 35
days = 90
spot = 32
rate = 0.05
"#;

pub const BUTTERFLY_INI: &str = r#"
[strategy]
name = Butterfly
valuation_date = 2024-01-01

[leg.low]
type = call
side = long
strike = 55
expiry = 2024-03-31

[leg.mid]
type = call
side = short
strike = 60
expiry = 2024-03-31
quantity = 2

[leg.high]
type = call
side = long
strike = 65
expiry = 2024-03-31
"#;

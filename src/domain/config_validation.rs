//! Strategy file validation.
//!
//! A strategy file has a `[strategy]` section and one section per leg whose
//! name starts with `leg` (for example `[leg.short_call]`).

use crate::domain::error::PayoffError;
use crate::domain::option_contract::{
    DEFAULT_PAYOFF_CEILING, ExerciseStyle, OptionContract, OptionType, PositionSide,
    days_between,
};
use crate::domain::strategy::Leg;
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::str::FromStr;

pub const STRATEGY_SECTION: &str = "strategy";
pub const LEG_PREFIX: &str = "leg";

pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), PayoffError> {
    let ceiling = parse_ceiling(config)?;
    let valuation = parse_valuation_date(config)?;
    let sections = leg_sections(config);
    if sections.is_empty() {
        return Err(PayoffError::ConfigMissing {
            section: format!("{LEG_PREFIX}.*"),
            key: "type".into(),
        });
    }
    for section in &sections {
        let leg = parse_leg(config, section, valuation)?;
        validate_strike_below_ceiling(section, &leg, ceiling)?;
    }
    Ok(())
}

/// Sections describing legs (`[leg]` or `[leg.<name>]`), sorted by name.
pub fn leg_sections(config: &dyn ConfigPort) -> Vec<String> {
    config
        .sections()
        .into_iter()
        .filter(|s| is_leg_section(s))
        .collect()
}

fn is_leg_section(section: &str) -> bool {
    section
        .strip_prefix(LEG_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
}

pub fn parse_ceiling(config: &dyn ConfigPort) -> Result<f64, PayoffError> {
    match config.get_string(STRATEGY_SECTION, "ceiling") {
        None => Ok(DEFAULT_PAYOFF_CEILING),
        Some(raw) => {
            let value = parse_number::<f64>(STRATEGY_SECTION, "ceiling", &raw)?;
            if !value.is_finite() || value <= 0.0 {
                return Err(invalid(STRATEGY_SECTION, "ceiling", "ceiling must be positive"));
            }
            Ok(value)
        }
    }
}

pub fn parse_valuation_date(config: &dyn ConfigPort) -> Result<Option<NaiveDate>, PayoffError> {
    config
        .get_string(STRATEGY_SECTION, "valuation_date")
        .map(|raw| parse_date(STRATEGY_SECTION, "valuation_date", &raw))
        .transpose()
}

/// Read one leg section into a contract and quantity.
pub fn parse_leg(
    config: &dyn ConfigPort,
    section: &str,
    valuation: Option<NaiveDate>,
) -> Result<Leg, PayoffError> {
    let option_type: OptionType = parse_enum(config, section, "type")?;
    let side: PositionSide = parse_enum(config, section, "side")?;
    let style = match config.get_string(section, "style") {
        Some(raw) => ExerciseStyle::from_str(&raw).map_err(|e| invalid(section, "style", &e))?,
        None => ExerciseStyle::European,
    };

    let strike = parse_number::<f64>(section, "strike", &require(config, section, "strike")?)?;
    if !strike.is_finite() || strike <= 0.0 {
        return Err(invalid(section, "strike", "strike must be positive"));
    }

    let days = parse_days(config, section, valuation)?;

    let quantity = match config.get_string(section, "quantity") {
        Some(raw) => {
            let q = parse_number::<u32>(section, "quantity", &raw)?;
            if q == 0 {
                return Err(invalid(section, "quantity", "quantity must be at least 1"));
            }
            q
        }
        None => 1,
    };

    let mut contract = OptionContract::new(option_type, side, style, days, strike)?;
    if let Some(raw) = config.get_string(section, "spot") {
        contract = contract.with_spot_price(parse_number(section, "spot", &raw)?);
    }
    if let Some(raw) = config.get_string(section, "rate") {
        contract = contract.with_risk_free_rate(parse_number(section, "rate", &raw)?);
    }

    Ok(Leg { contract, quantity })
}

fn parse_days(
    config: &dyn ConfigPort,
    section: &str,
    valuation: Option<NaiveDate>,
) -> Result<u32, PayoffError> {
    match (
        config.get_string(section, "days"),
        config.get_string(section, "expiry"),
    ) {
        (Some(_), Some(_)) => Err(invalid(
            section,
            "expiry",
            "set either days or expiry, not both",
        )),
        (Some(raw), None) => parse_number::<u32>(section, "days", &raw),
        (None, Some(raw)) => {
            let expiry = parse_date(section, "expiry", &raw)?;
            let valuation = valuation.ok_or_else(|| PayoffError::ConfigMissing {
                section: STRATEGY_SECTION.into(),
                key: "valuation_date".into(),
            })?;
            days_between(valuation, expiry)
                .map_err(|e| invalid(section, "expiry", &e.to_string()))
        }
        (None, None) => Err(PayoffError::ConfigMissing {
            section: section.into(),
            key: "days".into(),
        }),
    }
}

fn validate_strike_below_ceiling(
    section: &str,
    leg: &Leg,
    ceiling: f64,
) -> Result<(), PayoffError> {
    if leg.contract.strike_price() >= ceiling {
        return Err(invalid(
            section,
            "strike",
            &format!("strike must be below the payoff ceiling {ceiling}"),
        ));
    }
    Ok(())
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, PayoffError> {
    config
        .get_string(section, key)
        .filter(|s| !s.trim().is_empty())
        .ok_or_else(|| PayoffError::ConfigMissing {
            section: section.into(),
            key: key.into(),
        })
}

fn parse_enum<T>(config: &dyn ConfigPort, section: &str, key: &str) -> Result<T, PayoffError>
where
    T: FromStr<Err = String>,
{
    let raw = require(config, section, key)?;
    T::from_str(&raw).map_err(|e| invalid(section, key, &e))
}

fn parse_number<T: FromStr>(section: &str, key: &str, raw: &str) -> Result<T, PayoffError> {
    raw.trim()
        .parse()
        .map_err(|_| invalid(section, key, &format!("'{}' is not a valid number", raw.trim())))
}

fn parse_date(section: &str, key: &str, raw: &str) -> Result<NaiveDate, PayoffError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| invalid(section, key, &format!("invalid {key} format, expected YYYY-MM-DD")))
}

fn invalid(section: &str, key: &str, reason: &str) -> PayoffError {
    PayoffError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.to_string(),
    }
}

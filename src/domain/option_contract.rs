//! Vanilla option contracts: intrinsic value, no-arbitrage bounds and the
//! terminal payoff curve.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;

use crate::domain::error::PayoffError;
use crate::domain::payoff_curve::PayoffCurve;

/// Right end of the payoff domain used by [`OptionContract::payoff_curve`].
pub const DEFAULT_PAYOFF_CEILING: f64 = 10_000.0;

/// Days per year used when discounting the strike.
pub const DAY_COUNT_BASIS: f64 = 360.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum OptionType {
    Call,
    Put,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PositionSide {
    Long,
    Short,
}

impl PositionSide {
    /// +1 for long, -1 for short.
    pub fn sign(&self) -> f64 {
        match self {
            PositionSide::Long => 1.0,
            PositionSide::Short => -1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExerciseStyle {
    American,
    European,
}

impl FromStr for OptionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "call" | "c" => Ok(OptionType::Call),
            "put" | "p" => Ok(OptionType::Put),
            other => Err(format!("unknown option type '{other}' (expected call or put)")),
        }
    }
}

impl FromStr for PositionSide {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "long" | "buy" => Ok(PositionSide::Long),
            "short" | "sell" => Ok(PositionSide::Short),
            other => Err(format!("unknown side '{other}' (expected long or short)")),
        }
    }
}

impl FromStr for ExerciseStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "american" => Ok(ExerciseStyle::American),
            "european" => Ok(ExerciseStyle::European),
            other => Err(format!(
                "unknown exercise style '{other}' (expected american or european)"
            )),
        }
    }
}

impl fmt::Display for OptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionType::Call => write!(f, "call"),
            OptionType::Put => write!(f, "put"),
        }
    }
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PositionSide::Long => write!(f, "long"),
            PositionSide::Short => write!(f, "short"),
        }
    }
}

impl fmt::Display for ExerciseStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExerciseStyle::American => write!(f, "american"),
            ExerciseStyle::European => write!(f, "european"),
        }
    }
}

/// A single option position.
///
/// Spot price and risk-free rate are optional: they are only needed for the
/// price bounds, not for the payoff shape.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptionContract {
    option_type: OptionType,
    side: PositionSide,
    style: ExerciseStyle,
    days_to_expiry: u32,
    strike_price: f64,
    spot_price: Option<f64>,
    risk_free_rate: Option<f64>,
}

impl OptionContract {
    pub fn new(
        option_type: OptionType,
        side: PositionSide,
        style: ExerciseStyle,
        days_to_expiry: u32,
        strike_price: f64,
    ) -> Result<Self, PayoffError> {
        if !strike_price.is_finite() || strike_price <= 0.0 {
            return Err(PayoffError::InvalidContract {
                reason: format!("strike price must be positive, got {strike_price}"),
            });
        }
        Ok(Self {
            option_type,
            side,
            style,
            days_to_expiry,
            strike_price,
            spot_price: None,
            risk_free_rate: None,
        })
    }

    pub fn with_spot_price(mut self, spot_price: f64) -> Self {
        self.spot_price = Some(spot_price);
        self
    }

    /// Annualised, continuously compounded, as a fraction (0.05 = 5%).
    pub fn with_risk_free_rate(mut self, rate: f64) -> Self {
        self.risk_free_rate = Some(rate);
        self
    }

    pub fn option_type(&self) -> OptionType {
        self.option_type
    }

    pub fn side(&self) -> PositionSide {
        self.side
    }

    pub fn style(&self) -> ExerciseStyle {
        self.style
    }

    pub fn days_to_expiry(&self) -> u32 {
        self.days_to_expiry
    }

    pub fn strike_price(&self) -> f64 {
        self.strike_price
    }

    pub fn spot_price(&self) -> Option<f64> {
        self.spot_price
    }

    pub fn risk_free_rate(&self) -> Option<f64> {
        self.risk_free_rate
    }

    /// Time to expiry in years on a 360-day basis.
    pub fn year_fraction(&self) -> f64 {
        self.days_to_expiry as f64 / DAY_COUNT_BASIS
    }

    fn require_spot(&self) -> Result<f64, PayoffError> {
        self.spot_price.ok_or_else(|| PayoffError::missing("spot_price"))
    }

    /// Present value of the strike, `K * exp(-r * days / 360)`.
    pub fn discounted_strike(&self) -> Result<f64, PayoffError> {
        let rate = self
            .risk_free_rate
            .ok_or_else(|| PayoffError::missing("risk_free_rate"))?;
        Ok(self.strike_price * (-rate * self.year_fraction()).exp())
    }

    /// Payoff of exercising now at `current_price`, signed by position side.
    pub fn intrinsic_value(&self, current_price: f64) -> f64 {
        let moneyness = match self.option_type {
            OptionType::Call => current_price - self.strike_price,
            OptionType::Put => self.strike_price - current_price,
        };
        match self.side {
            PositionSide::Long => moneyness.max(0.0),
            PositionSide::Short => -moneyness.max(0.0),
        }
    }

    /// No-arbitrage upper bound on the premium.
    pub fn price_upper_bound(&self) -> Result<f64, PayoffError> {
        let spot = self.require_spot()?;
        match (self.option_type, self.style) {
            (OptionType::Call, _) => Ok(spot),
            (OptionType::Put, ExerciseStyle::American) => Ok(spot.min(self.strike_price)),
            (OptionType::Put, ExerciseStyle::European) => {
                Ok(spot.min(self.discounted_strike()?))
            }
        }
    }

    /// No-arbitrage lower bound on the premium.
    pub fn price_lower_bound(&self) -> Result<f64, PayoffError> {
        let spot = self.require_spot()?;
        match (self.option_type, self.style) {
            (OptionType::Call, _) => Ok((spot - self.discounted_strike()?).max(0.0)),
            (OptionType::Put, ExerciseStyle::American) => {
                Ok((self.strike_price - spot).max(0.0))
            }
            (OptionType::Put, ExerciseStyle::European) => {
                Ok((self.discounted_strike()? - spot).max(0.0))
            }
        }
    }

    /// Terminal payoff over `[0, DEFAULT_PAYOFF_CEILING]`.
    pub fn payoff_curve(&self) -> Result<PayoffCurve, PayoffError> {
        self.payoff_curve_with_ceiling(DEFAULT_PAYOFF_CEILING)
    }

    /// Terminal payoff over `[0, ceiling]`. Curves meant to be added together
    /// must use the same ceiling.
    pub fn payoff_curve_with_ceiling(&self, ceiling: f64) -> Result<PayoffCurve, PayoffError> {
        let k = self.strike_price;
        let points = match (self.option_type, self.side) {
            (OptionType::Call, PositionSide::Long) => {
                vec![(0.0, 0.0), (k, 0.0), (ceiling, ceiling - k)]
            }
            (OptionType::Call, PositionSide::Short) => {
                vec![(0.0, 0.0), (k, 0.0), (ceiling, -(ceiling - k))]
            }
            (OptionType::Put, PositionSide::Long) => vec![(0.0, k), (k, 0.0), (ceiling, 0.0)],
            (OptionType::Put, PositionSide::Short) => vec![(0.0, -k), (k, 0.0), (ceiling, 0.0)],
        };
        PayoffCurve::new(points)
    }
}

/// Calendar days from `valuation` to `expiry`.
pub fn days_between(valuation: NaiveDate, expiry: NaiveDate) -> Result<u32, PayoffError> {
    let days = (expiry - valuation).num_days();
    u32::try_from(days).map_err(|_| PayoffError::InvalidContract {
        reason: format!("expiry {expiry} is before valuation date {valuation}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn contract(
        t: OptionType,
        s: PositionSide,
        e: ExerciseStyle,
        days: u32,
        k: f64,
    ) -> OptionContract {
        OptionContract::new(t, s, e, days, k).unwrap()
    }

    #[test]
    fn rejects_non_positive_strike() {
        for k in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let err = OptionContract::new(
                OptionType::Call,
                PositionSide::Long,
                ExerciseStyle::European,
                30,
                k,
            )
            .unwrap_err();
            assert!(matches!(err, PayoffError::InvalidContract { .. }));
        }
    }

    #[test]
    fn strike_price_is_unchanged() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::American, 30, 18.0);
        assert_eq!(c.strike_price(), 18.0);
    }

    #[test]
    fn intrinsic_value_long_call() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::American, 30, 18.0);
        assert_eq!(c.intrinsic_value(11.0), 0.0);
        assert_eq!(c.intrinsic_value(21.0), 3.0);
    }

    #[test]
    fn intrinsic_value_all_combinations() {
        let k = 50.0;
        let cases = [
            (OptionType::Call, PositionSide::Long, 60.0, 10.0),
            (OptionType::Call, PositionSide::Short, 60.0, -10.0),
            (OptionType::Put, PositionSide::Long, 40.0, 10.0),
            (OptionType::Put, PositionSide::Short, 40.0, -10.0),
            (OptionType::Call, PositionSide::Long, 40.0, 0.0),
            (OptionType::Put, PositionSide::Long, 60.0, 0.0),
        ];
        for (t, s, price, expected) in cases {
            let c = contract(t, s, ExerciseStyle::European, 0, k);
            assert_eq!(c.intrinsic_value(price), expected, "{t} {s} at {price}");
        }
    }

    #[test]
    fn intrinsic_value_at_strike_is_zero() {
        for t in [OptionType::Call, OptionType::Put] {
            for s in [PositionSide::Long, PositionSide::Short] {
                let c = contract(t, s, ExerciseStyle::European, 10, 42.0);
                assert_eq!(c.intrinsic_value(42.0).abs(), 0.0);
            }
        }
    }

    #[test]
    fn upper_bound_american_put() {
        let c = contract(OptionType::Put, PositionSide::Long, ExerciseStyle::American, 30, 18.0)
            .with_spot_price(20.0)
            .with_risk_free_rate(0.10);
        assert_eq!(c.price_upper_bound().unwrap(), 18.0);
    }

    #[test]
    fn upper_bound_call_is_spot() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::European, 30, 18.0)
            .with_spot_price(20.0);
        assert_eq!(c.price_upper_bound().unwrap(), 20.0);
    }

    #[test]
    fn upper_bound_european_put_discounts_strike() {
        let c = contract(OptionType::Put, PositionSide::Long, ExerciseStyle::European, 180, 40.0)
            .with_spot_price(45.0)
            .with_risk_free_rate(0.05);
        let expected = 40.0 * (-0.05_f64 * 0.5).exp();
        assert_abs_diff_eq!(c.price_upper_bound().unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn lower_bound_european_call() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::European, 360, 18.0)
            .with_spot_price(20.0)
            .with_risk_free_rate(0.10);
        let expected = 20.0 - 18.0 * (-0.10_f64).exp();
        assert_abs_diff_eq!(c.price_lower_bound().unwrap(), expected, epsilon = 1e-12);
        assert_abs_diff_eq!(c.price_lower_bound().unwrap(), 3.7129, epsilon = 1e-4);
    }

    #[test]
    fn lower_bound_european_put() {
        let c = contract(OptionType::Put, PositionSide::Long, ExerciseStyle::European, 180, 40.0)
            .with_spot_price(37.0)
            .with_risk_free_rate(0.05);
        assert_abs_diff_eq!(c.price_lower_bound().unwrap(), 2.0124, epsilon = 1e-4);
    }

    #[test]
    fn lower_bound_american_put_ignores_rate() {
        let c = contract(OptionType::Put, PositionSide::Long, ExerciseStyle::American, 90, 40.0)
            .with_spot_price(37.0);
        assert_eq!(c.price_lower_bound().unwrap(), 3.0);
    }

    #[test]
    fn lower_bound_floors_at_zero() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::American, 90, 100.0)
            .with_spot_price(50.0)
            .with_risk_free_rate(0.05);
        assert_eq!(c.price_lower_bound().unwrap(), 0.0);
    }

    #[test]
    fn bounds_require_spot() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::European, 90, 30.0)
            .with_risk_free_rate(0.05);
        assert!(matches!(
            c.price_upper_bound(),
            Err(PayoffError::MissingParameter { ref name }) if name == "spot_price"
        ));
        assert!(matches!(
            c.price_lower_bound(),
            Err(PayoffError::MissingParameter { ref name }) if name == "spot_price"
        ));
    }

    #[test]
    fn discounting_requires_rate() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::European, 90, 30.0)
            .with_spot_price(32.0);
        assert!(matches!(
            c.price_lower_bound(),
            Err(PayoffError::MissingParameter { ref name }) if name == "risk_free_rate"
        ));
        assert!(c.discounted_strike().is_err());
    }

    #[test]
    fn payoff_curve_shapes() {
        let k = 30.0;
        let cases = [
            (
                OptionType::Call,
                PositionSide::Long,
                vec![(0.0, 0.0), (30.0, 0.0), (10000.0, 9970.0)],
            ),
            (
                OptionType::Call,
                PositionSide::Short,
                vec![(0.0, 0.0), (30.0, 0.0), (10000.0, -9970.0)],
            ),
            (
                OptionType::Put,
                PositionSide::Long,
                vec![(0.0, 30.0), (30.0, 0.0), (10000.0, 0.0)],
            ),
            (
                OptionType::Put,
                PositionSide::Short,
                vec![(0.0, -30.0), (30.0, 0.0), (10000.0, 0.0)],
            ),
        ];
        for (t, s, expected) in cases {
            let c = contract(t, s, ExerciseStyle::European, 90, k);
            assert_eq!(c.payoff_curve().unwrap().to_points(), expected);
        }
    }

    #[test]
    fn payoff_curve_matches_intrinsic_value() {
        let c = contract(OptionType::Put, PositionSide::Short, ExerciseStyle::American, 90, 55.0);
        let curve = c.payoff_curve().unwrap();
        for price in [0.0, 12.5, 55.0, 70.0, 9999.0] {
            assert_abs_diff_eq!(
                curve.evaluate(price).unwrap(),
                c.intrinsic_value(price),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn payoff_curve_ceiling_must_exceed_strike() {
        let c = contract(OptionType::Call, PositionSide::Long, ExerciseStyle::European, 90, 500.0);
        assert!(matches!(
            c.payoff_curve_with_ceiling(500.0),
            Err(PayoffError::InvalidBreakpoints { .. })
        ));
        assert_eq!(c.payoff_curve_with_ceiling(1000.0).unwrap().domain(), (0.0, 1000.0));
    }

    #[test]
    fn parses_enums_case_insensitively() {
        assert_eq!("CALL".parse::<OptionType>().unwrap(), OptionType::Call);
        assert_eq!(" put ".parse::<OptionType>().unwrap(), OptionType::Put);
        assert_eq!("Short".parse::<PositionSide>().unwrap(), PositionSide::Short);
        assert_eq!("buy".parse::<PositionSide>().unwrap(), PositionSide::Long);
        assert_eq!(
            "American".parse::<ExerciseStyle>().unwrap(),
            ExerciseStyle::American
        );
        assert!("straddle".parse::<OptionType>().is_err());
        assert!("bermudan".parse::<ExerciseStyle>().is_err());
    }

    #[test]
    fn side_sign() {
        assert_eq!(PositionSide::Long.sign(), 1.0);
        assert_eq!(PositionSide::Short.sign(), -1.0);
    }

    #[test]
    fn days_between_dates() {
        let valuation = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let expiry = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert_eq!(days_between(valuation, expiry).unwrap(), 90);
        assert_eq!(days_between(valuation, valuation).unwrap(), 0);
        assert!(days_between(expiry, valuation).is_err());
    }
}

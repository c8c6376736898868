//! Multi-leg option strategies and their aggregate payoff.

use crate::domain::error::PayoffError;
use crate::domain::option_contract::{
    DEFAULT_PAYOFF_CEILING, ExerciseStyle, OptionContract, OptionType, PositionSide,
};
use crate::domain::payoff_curve::PayoffCurve;

/// One contract held `quantity` times.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Leg {
    pub contract: OptionContract,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Strategy {
    pub name: String,
    pub description: String,
    /// Shared right end of every leg's payoff domain.
    pub ceiling: f64,
    pub legs: Vec<Leg>,
}

impl Strategy {
    pub fn new(name: impl Into<String>, ceiling: f64) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            ceiling,
            legs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_leg(mut self, contract: OptionContract, quantity: u32) -> Self {
        self.legs.push(Leg { contract, quantity });
        self
    }

    fn validate(&self) -> Result<(), PayoffError> {
        if self.legs.is_empty() {
            return Err(PayoffError::InvalidStrategy {
                reason: format!("strategy '{}' has no legs", self.name),
            });
        }
        if let Some(pos) = self.legs.iter().position(|l| l.quantity == 0) {
            return Err(PayoffError::InvalidStrategy {
                reason: format!("leg {} of '{}' has zero quantity", pos + 1, self.name),
            });
        }
        Ok(())
    }

    /// Aggregate terminal payoff over `[0, ceiling]`.
    pub fn payoff_curve(&self) -> Result<PayoffCurve, PayoffError> {
        self.validate()?;
        let curves = self
            .legs
            .iter()
            .map(|leg| {
                let curve = leg.contract.payoff_curve_with_ceiling(self.ceiling)?;
                if leg.quantity == 1 {
                    Ok(curve)
                } else {
                    curve.scale(f64::from(leg.quantity))
                }
            })
            .collect::<Result<Vec<_>, PayoffError>>()?;
        PayoffCurve::sum(&curves)
    }

    /// Quantity-weighted sum of leg intrinsic values.
    pub fn intrinsic_value(&self, current_price: f64) -> f64 {
        self.legs
            .iter()
            .map(|l| l.quantity as f64 * l.contract.intrinsic_value(current_price))
            .sum()
    }

    /// Long call at `low`, short call at `high`.
    pub fn bull_call_spread(low: f64, high: f64, days: u32) -> Result<Self, PayoffError> {
        ordered("bull call spread", &[low, high])?;
        Ok(Self::new("Bull Call Spread", DEFAULT_PAYOFF_CEILING)
            .with_leg(european(OptionType::Call, PositionSide::Long, days, low)?, 1)
            .with_leg(european(OptionType::Call, PositionSide::Short, days, high)?, 1))
    }

    /// Long put at `high`, short put at `low`.
    pub fn bear_put_spread(high: f64, low: f64, days: u32) -> Result<Self, PayoffError> {
        ordered("bear put spread", &[low, high])?;
        Ok(Self::new("Bear Put Spread", DEFAULT_PAYOFF_CEILING)
            .with_leg(european(OptionType::Put, PositionSide::Long, days, high)?, 1)
            .with_leg(european(OptionType::Put, PositionSide::Short, days, low)?, 1))
    }

    /// Long call and long put at the same strike.
    pub fn long_straddle(strike: f64, days: u32) -> Result<Self, PayoffError> {
        Ok(Self::new("Long Straddle", DEFAULT_PAYOFF_CEILING)
            .with_leg(european(OptionType::Call, PositionSide::Long, days, strike)?, 1)
            .with_leg(european(OptionType::Put, PositionSide::Long, days, strike)?, 1))
    }

    /// Long calls at `low` and `high`, two short calls at `mid`.
    pub fn call_butterfly(low: f64, mid: f64, high: f64, days: u32) -> Result<Self, PayoffError> {
        ordered("call butterfly", &[low, mid, high])?;
        Ok(Self::new("Call Butterfly", DEFAULT_PAYOFF_CEILING)
            .with_leg(european(OptionType::Call, PositionSide::Long, days, low)?, 1)
            .with_leg(european(OptionType::Call, PositionSide::Long, days, high)?, 1)
            .with_leg(european(OptionType::Call, PositionSide::Short, days, mid)?, 2))
    }
}

fn european(
    option_type: OptionType,
    side: PositionSide,
    days: u32,
    strike: f64,
) -> Result<OptionContract, PayoffError> {
    OptionContract::new(option_type, side, ExerciseStyle::European, days, strike)
}

fn ordered(what: &str, strikes: &[f64]) -> Result<(), PayoffError> {
    if strikes.windows(2).any(|w| w[0] >= w[1]) {
        return Err(PayoffError::InvalidStrategy {
            reason: format!("{what} strikes must be strictly increasing, got {strikes:?}"),
        });
    }
    Ok(())
}

//! Interest-rate analytics: rate conversions, forward prices and bond
//! yield/duration/convexity under continuous compounding.
//!
//! Every function here is independent of the payoff machinery.

use crate::domain::error::PayoffError;
use crate::domain::root_finder::{NewtonRaphson, SolverConfig};

/// A single bond payment of `amount` at `term` years.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CashFlow {
    pub amount: f64,
    pub term: f64,
}

impl CashFlow {
    pub fn new(amount: f64, term: f64) -> Self {
        Self { amount, term }
    }
}

fn check_frequency(frequency: u32) -> Result<f64, PayoffError> {
    if frequency == 0 {
        return Err(PayoffError::InvalidInput {
            reason: "compounding frequency must be at least 1".into(),
        });
    }
    Ok(frequency as f64)
}

/// Continuously compounded equivalent of a rate compounded `frequency` times
/// a year: `m * ln(1 + R/m)`.
pub fn continuous_from_compound(rate: f64, frequency: u32) -> Result<f64, PayoffError> {
    let m = check_frequency(frequency)?;
    Ok(m * (1.0 + rate / m).ln())
}

/// Rate compounded `frequency` times a year equivalent to a continuously
/// compounded `rate`: `m * (exp(R/m) - 1)`.
pub fn compound_from_continuous(rate: f64, frequency: u32) -> Result<f64, PayoffError> {
    let m = check_frequency(frequency)?;
    Ok(m * ((rate / m).exp() - 1.0))
}

/// Forward price of a non-income asset: `S * exp(r * T)`.
pub fn forward_price(spot: f64, rate: f64, term: f64) -> f64 {
    spot * (rate * term).exp()
}

/// FX forward via interest parity: `S * exp((r_domestic - r_foreign) * T)`.
pub fn fx_forward_price(spot: f64, foreign_rate: f64, domestic_rate: f64, term: f64) -> f64 {
    spot * ((domestic_rate - foreign_rate) * term).exp()
}

/// Number of interest-rate futures contracts needed to hedge a bond
/// portfolio: `P * D_P / (F * D_F)`.
pub fn duration_hedge_ratio(
    futures_price: f64,
    futures_duration: f64,
    portfolio_value: f64,
    portfolio_duration: f64,
) -> Result<f64, PayoffError> {
    let denominator = futures_price * futures_duration;
    if denominator == 0.0 {
        return Err(PayoffError::InvalidInput {
            reason: "futures price and duration must be non-zero".into(),
        });
    }
    Ok(portfolio_value * portfolio_duration / denominator)
}

/// Present value of `cash_flows` discounted at the continuously compounded
/// `bond_yield`.
pub fn bond_price(cash_flows: &[CashFlow], bond_yield: f64) -> f64 {
    cash_flows
        .iter()
        .map(|cf| cf.amount * (-bond_yield * cf.term).exp())
        .sum()
}

fn price_derivative(cash_flows: &[CashFlow], bond_yield: f64) -> f64 {
    cash_flows
        .iter()
        .map(|cf| -cf.amount * cf.term * (-bond_yield * cf.term).exp())
        .sum()
}

/// Yield that reprices `cash_flows` to `price`, using the default solver
/// settings (start at 10%, stop when the price residual is within 1e-5).
pub fn bond_yield(cash_flows: &[CashFlow], price: f64) -> Result<f64, PayoffError> {
    bond_yield_with(cash_flows, price, &SolverConfig::default())
}

pub fn bond_yield_with(
    cash_flows: &[CashFlow],
    price: f64,
    config: &SolverConfig,
) -> Result<f64, PayoffError> {
    if cash_flows.is_empty() {
        return Err(PayoffError::InvalidInput {
            reason: "bond yield needs at least one cash flow".into(),
        });
    }
    NewtonRaphson::new(*config).find_root(
        |y| bond_price(cash_flows, y) - price,
        |y| price_derivative(cash_flows, y),
    )
}

fn weighted_by_term(
    cash_flows: &[CashFlow],
    bond_yield: f64,
    price: f64,
    power: i32,
) -> Result<f64, PayoffError> {
    if price == 0.0 {
        return Err(PayoffError::InvalidInput {
            reason: "bond price must be non-zero".into(),
        });
    }
    let sum: f64 = cash_flows
        .iter()
        .map(|cf| cf.amount * cf.term.powi(power) * (-bond_yield * cf.term).exp())
        .sum();
    Ok(sum / price)
}

/// Macaulay duration under continuous compounding.
pub fn bond_duration(
    cash_flows: &[CashFlow],
    bond_yield: f64,
    price: f64,
) -> Result<f64, PayoffError> {
    weighted_by_term(cash_flows, bond_yield, price, 1)
}

/// Convexity under continuous compounding.
pub fn bond_convexity(
    cash_flows: &[CashFlow],
    bond_yield: f64,
    price: f64,
) -> Result<f64, PayoffError> {
    weighted_by_term(cash_flows, bond_yield, price, 2)
}

//! Core domain types and logic.

pub mod payoff_curve;
pub mod option_contract;
pub mod strategy;
pub mod rates;
pub mod statistics;
pub mod root_finder;
pub mod config_validation;
pub mod error;

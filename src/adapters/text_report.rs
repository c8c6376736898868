//! Plain-text rendering of curves and per-leg price bounds.

use crate::domain::error::PayoffError;
use crate::domain::payoff_curve::PayoffCurve;
use crate::domain::strategy::Strategy;

/// `"value@price value@price ..."`, one entry per breakpoint.
pub fn format_points(curve: &PayoffCurve) -> String {
    curve
        .to_points()
        .iter()
        .map(|(price, value)| format!("{value}@{price}"))
        .collect::<Vec<_>>()
        .join(" ")
}

fn format_optional(value: Result<f64, PayoffError>) -> String {
    match value {
        Ok(v) => format!("{v:.4}"),
        Err(PayoffError::MissingParameter { name }) => format!("n/a ({name})"),
        Err(e) => format!("error: {e}"),
    }
}

/// One line per leg: strike, intrinsic value at spot, lower and upper bound.
pub fn format_bounds_table(strategy: &Strategy) -> String {
    let mut out = String::new();
    out.push_str("leg  type  side   style     strike      qty  intrinsic   lower       upper\n");
    for (i, leg) in strategy.legs.iter().enumerate() {
        let c = &leg.contract;
        let intrinsic = match c.spot_price() {
            Some(spot) => format!("{:.4}", c.intrinsic_value(spot)),
            None => "n/a".to_string(),
        };
        out.push_str(&format!(
            "{:<4} {:<5} {:<6} {:<9} {:<11.4} {:<4} {:<11} {:<11} {}\n",
            i + 1,
            c.option_type().to_string(),
            c.side().to_string(),
            c.style().to_string(),
            c.strike_price(),
            leg.quantity,
            intrinsic,
            format_optional(c.price_lower_bound()),
            format_optional(c.price_upper_bound()),
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::option_contract::{
        ExerciseStyle, OptionContract, OptionType, PositionSide,
    };

    #[test]
    fn format_points_matches_display_convention() {
        let curve = PayoffCurve::new(vec![(0.0, 0.0), (30.0, 0.0), (35.0, 5.0), (10000.0, 5.0)])
            .unwrap();
        assert_eq!(format_points(&curve), "0@0 0@30 5@35 5@10000");
    }

    #[test]
    fn format_points_keeps_fractions() {
        let curve = PayoffCurve::new(vec![(0.5, -1.25), (2.0, 3.0)]).unwrap();
        assert_eq!(format_points(&curve), "-1.25@0.5 3@2");
    }

    #[test]
    fn bounds_table_lists_every_leg() {
        let priced = OptionContract::new(
            OptionType::Put,
            PositionSide::Long,
            ExerciseStyle::American,
            30,
            18.0,
        )
        .unwrap()
        .with_spot_price(20.0);
        let bare = OptionContract::new(
            OptionType::Call,
            PositionSide::Short,
            ExerciseStyle::European,
            30,
            25.0,
        )
        .unwrap();
        let strategy = Strategy::new("Mixed", 1000.0)
            .with_leg(priced, 1)
            .with_leg(bare, 3);

        let table = format_bounds_table(&strategy);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("1    put   long   american  18.0000"));
        assert!(lines[1].contains(" 0.0000 "));
        assert!(lines[1].ends_with("18.0000"));
        assert!(lines[2].contains("n/a (spot_price)"));
        assert!(lines[2].contains(" 3 "));
    }
}

//! Piecewise-linear payoff curves over the underlying price.
//!
//! A curve is a sorted list of breakpoints with affine interpolation between
//! neighbours. Curves sharing the same domain can be added to superpose the
//! payoffs of several option legs.

use crate::domain::error::PayoffError;

/// A point where the payoff changes slope.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Breakpoint {
    pub price: f64,
    pub value: f64,
}

/// Immutable piecewise-linear function of the underlying price.
///
/// Invariants: at least two breakpoints, prices strictly increasing, all
/// coordinates finite. The function is only defined on
/// `[first.price, last.price]`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct PayoffCurve {
    points: Vec<Breakpoint>,
}

impl PayoffCurve {
    /// Build a curve from `(price, value)` pairs, validating the invariants.
    pub fn new(points: Vec<(f64, f64)>) -> Result<Self, PayoffError> {
        if points.len() < 2 {
            return Err(PayoffError::InvalidBreakpoints {
                reason: format!("need at least 2 breakpoints, got {}", points.len()),
            });
        }
        if let Some(&(price, value)) = points
            .iter()
            .find(|(p, v)| !p.is_finite() || !v.is_finite())
        {
            return Err(PayoffError::InvalidBreakpoints {
                reason: format!("non-finite breakpoint ({price}, {value})"),
            });
        }
        if let Some(w) = points.windows(2).find(|w| w[0].0 >= w[1].0) {
            return Err(PayoffError::InvalidBreakpoints {
                reason: format!(
                    "prices must be strictly increasing: {} followed by {}",
                    w[0].0, w[1].0
                ),
            });
        }

        Ok(Self::from_sorted(
            points
                .into_iter()
                .map(|(price, value)| Breakpoint { price, value })
                .collect(),
        ))
    }

    /// Caller guarantees the invariants.
    fn from_sorted(points: Vec<Breakpoint>) -> Self {
        debug_assert!(points.len() >= 2);
        debug_assert!(points.windows(2).all(|w| w[0].price < w[1].price));
        Self { points }
    }

    pub fn breakpoints(&self) -> &[Breakpoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false for a constructed curve.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Closed domain `(first.price, last.price)`.
    pub fn domain(&self) -> (f64, f64) {
        (self.first().price, self.last().price)
    }

    fn first(&self) -> &Breakpoint {
        &self.points[0]
    }

    fn last(&self) -> &Breakpoint {
        &self.points[self.points.len() - 1]
    }

    /// Payoff at `price`.
    ///
    /// Returns the stored value exactly when `price` is a breakpoint, otherwise
    /// interpolates linearly between the bracketing pair.
    pub fn evaluate(&self, price: f64) -> Result<f64, PayoffError> {
        let (low, high) = self.domain();
        // Negated comparison so that NaN is rejected as well.
        if !(price >= low && price <= high) {
            return Err(PayoffError::OutOfDomain { price, low, high });
        }

        // First index whose price is >= the query.
        let idx = self.points.partition_point(|p| p.price < price);
        let upper = self.points[idx];
        if upper.price == price {
            return Ok(upper.value);
        }

        Ok(lerp(self.points[idx - 1], upper, price))
    }

    /// Superpose two curves sharing the same domain bounds.
    ///
    /// Walks both breakpoint lists in ascending price order. Where only one
    /// curve has a breakpoint, the other is interpolated at that price.
    pub fn add(&self, other: &PayoffCurve) -> Result<PayoffCurve, PayoffError> {
        if self.domain() != other.domain() {
            return Err(PayoffError::DomainMismatch {
                left: self.domain(),
                right: other.domain(),
            });
        }

        let lhs = &self.points;
        let rhs = &other.points;
        let mut merged = Vec::with_capacity(lhs.len() + rhs.len());
        let (mut i, mut j) = (0, 0);

        while i < lhs.len() && j < rhs.len() {
            let (a, b) = (lhs[i], rhs[j]);
            if a.price == b.price {
                merged.push(Breakpoint {
                    price: a.price,
                    value: a.value + b.value,
                });
                i += 1;
                j += 1;
            } else if a.price < b.price {
                // The shared first price was consumed by both cursors, so
                // rhs[j - 1] and rhs[j] bracket a.price.
                merged.push(Breakpoint {
                    price: a.price,
                    value: a.value + lerp(rhs[j - 1], b, a.price),
                });
                i += 1;
            } else {
                merged.push(Breakpoint {
                    price: b.price,
                    value: b.value + lerp(lhs[i - 1], a, b.price),
                });
                j += 1;
            }
        }

        // Shared last price: both cursors finish on the same step.
        debug_assert!(i == lhs.len() && j == rhs.len());

        Ok(Self::from_sorted(merged))
    }

    /// Multiply every value by `factor`, keeping the breakpoint prices.
    ///
    /// Fails with `InvalidBreakpoints` when `factor` or any scaled value is
    /// not finite.
    pub fn scale(&self, factor: f64) -> Result<PayoffCurve, PayoffError> {
        if !factor.is_finite() {
            return Err(PayoffError::InvalidBreakpoints {
                reason: format!("scale factor must be finite, got {factor}"),
            });
        }
        let points = self
            .points
            .iter()
            .map(|p| {
                let value = p.value * factor;
                if value.is_finite() {
                    Ok(Breakpoint {
                        price: p.price,
                        value,
                    })
                } else {
                    Err(PayoffError::InvalidBreakpoints {
                        reason: format!("scaling {} by {factor} overflows", p.value),
                    })
                }
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::from_sorted(points))
    }

    /// Left fold of [`PayoffCurve::add`] over `curves`.
    pub fn sum<'a, I>(curves: I) -> Result<PayoffCurve, PayoffError>
    where
        I: IntoIterator<Item = &'a PayoffCurve>,
    {
        let mut iter = curves.into_iter();
        let first = iter.next().ok_or_else(|| PayoffError::InvalidBreakpoints {
            reason: "cannot sum an empty set of curves".into(),
        })?;
        iter.try_fold(first.clone(), |acc, curve| acc.add(curve))
    }

    pub fn to_points(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.price, p.value)).collect()
    }
}

/// Value at `price` on the segment from `lower` to `upper`.
fn lerp(lower: Breakpoint, upper: Breakpoint, price: f64) -> f64 {
    lower.value + (upper.value - lower.value) * (price - lower.price) / (upper.price - lower.price)
}

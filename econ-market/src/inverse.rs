//! Inversion of curves into price as a function of quantity.

use econ_compute::{numerical::roots::real_roots, primitive::rational_from_f64};
use crate::{curve::Curve, error::Error, options::SolverOptions};
use tracing::{debug, warn};

/// The inverse of a [`Curve`]: price as a function of quantity.
///
/// The inverse is never built symbolically. To evaluate `P(q)`, the equation `f(P) = q` is solved
/// for `P` directly, and the branch is chosen by taking the first non-negative real root in
/// ascending order, or the first real root if every root is negative. Curves that are not
/// monotonic on the quantities of interest have several branches; only the chosen one is used.
#[derive(Debug, Clone, Copy)]
pub struct InverseCurve<'a> {
    curve: &'a Curve,
    options: SolverOptions,
}

impl<'a> InverseCurve<'a> {
    /// Creates the inverse of the given curve.
    pub fn new(curve: &'a Curve, options: SolverOptions) -> Self {
        Self { curve, options }
    }

    /// Returns the prices at which the curve reaches the given quantity, in ascending order.
    fn preimages(&self, quantity: f64) -> Result<Vec<f64>, Error> {
        let func = self.curve.function();
        let q = rational_from_f64(quantity).ok_or(Error::Inversion {
            side: self.curve.side(),
            quantity,
        })?;

        // num(P) / den(P) = q  <=>  num(P) - q den(P) = 0, away from the poles of the curve
        let equation = func.numerator() - &func.denominator().scale(&q);
        if equation.is_zero() {
            return Err(Error::Inversion { side: self.curve.side(), quantity });
        }

        Ok(real_roots(&equation, self.options.tolerance)
            .into_iter()
            .filter(|&p| func.denominator().eval_f64(p) != 0.0)
            .collect())
    }

    /// Evaluates the price at which the curve reaches the given quantity.
    pub fn eval(&self, quantity: f64) -> Result<f64, Error> {
        let prices = self.preimages(quantity)?;
        if let Some(&price) = prices.iter().find(|&&p| p >= 0.0) {
            return Ok(price);
        }

        match prices.as_slice() {
            [] => Err(Error::Inversion { side: self.curve.side(), quantity }),
            [only] => {
                debug!(side = %self.curve.side(), quantity, price = only, "inverse is negative");
                Ok(*only)
            },
            [first, ..] => {
                warn!(
                    side = %self.curve.side(),
                    quantity,
                    ?prices,
                    "no non-negative inverse branch; using the first real root",
                );
                Ok(*first)
            },
        }
    }

    /// Evaluates `∫₀^q P(x) dx`, the area under the inverse curve from zero to `quantity`.
    ///
    /// The integral is computed by parts, which only needs the original curve `f`:
    ///
    /// `∫₀^q P(x) dx = P(q)·q − ∫_{P(0)}^{P(q)} f(p) dp`
    ///
    /// The right-hand integral is exact for polynomial curves.
    pub fn integral(&self, quantity: f64) -> Result<f64, Error> {
        let upper = self.eval(quantity)?;
        let lower = self.eval(0.0)?;
        let area = self.curve
            .function()
            .integral_f64(lower, upper)
            .ok_or(Error::Inversion { side: self.curve.side(), quantity })?;
        Ok(upper * quantity - area)
    }
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::curve::Side;
    use super::*;

    fn inverse_of(side: Side, source: &str) -> Curve {
        Curve::parse(side, source).unwrap()
    }

    #[test]
    fn linear_demand() {
        let demand = inverse_of(Side::Demand, "Q = 9400 - 1000P");
        let inverse = demand.inverse(&SolverOptions::default());
        assert_float_absolute_eq!(inverse.eval(2900.0).unwrap(), 6.5, 1e-12);
        assert_float_absolute_eq!(inverse.eval(0.0).unwrap(), 9.4, 1e-12);
    }

    #[test]
    fn negative_intercept_is_kept() {
        // supply reaches zero quantity at a negative price
        let supply = inverse_of(Side::Supply, "Q = 1.8 + 9P");
        let inverse = supply.inverse(&SolverOptions::default());
        assert_float_absolute_eq!(inverse.eval(0.0).unwrap(), -0.2, 1e-12);
    }

    #[test]
    fn quadratic_branch() {
        // Q = P^2 has branches ±sqrt(Q); the non-negative one is chosen
        let supply = inverse_of(Side::Supply, "Q = P^2");
        let inverse = supply.inverse(&SolverOptions::default());
        assert_float_absolute_eq!(inverse.eval(16.0).unwrap(), 4.0, 1e-9);
    }

    #[test]
    fn round_trip() {
        let demand = inverse_of(Side::Demand, "Q = 3040 - 25P");
        let inverse = demand.inverse(&SolverOptions::default());
        for price in [0.0, 12.5, 60.0, 121.6] {
            let quantity = demand.eval(price).unwrap();
            assert_float_absolute_eq!(inverse.eval(quantity).unwrap(), price, 1e-9);
        }
    }

    #[test]
    fn integral_of_linear_inverse() {
        // P(q) = 9.4 - q/1000, so the area from 0 to 2900 is 9.4 * 2900 - 2900^2 / 2000
        let demand = inverse_of(Side::Demand, "Q = 9400 - 1000P");
        let inverse = demand.inverse(&SolverOptions::default());
        assert_float_absolute_eq!(inverse.integral(2900.0).unwrap(), 23055.0, 1e-6);
    }

    #[test]
    fn integral_of_rational_inverse() {
        // Q = 100 / P, so P(q) = 100 / q is not integrable from 0
        let demand = inverse_of(Side::Demand, "Q = 100 / P");
        let inverse = demand.inverse(&SolverOptions::default());
        assert_float_absolute_eq!(inverse.eval(4.0).unwrap(), 25.0, 1e-9);
        assert!(inverse.integral(4.0).is_err());
    }

    #[test]
    fn constant_curve_cannot_be_inverted() {
        let supply = inverse_of(Side::Supply, "Q = 50");
        let inverse = supply.inverse(&SolverOptions::default());
        assert!(matches!(inverse.eval(50.0), Err(Error::Inversion { side: Side::Supply, .. })));
        assert!(matches!(inverse.eval(10.0), Err(Error::Inversion { .. })));
    }
}

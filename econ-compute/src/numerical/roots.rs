//! Real root isolation.
//!
//! Roots of polynomials of degree one and two are computed in closed form from the exact
//! coefficients. Higher degree polynomials are first reduced to their square-free part, so every
//! remaining root is simple. Those roots are isolated between consecutive critical points (the
//! roots of the derivative, found recursively) inside the Cauchy bound; each interval contains at
//! most one root, which is found by bisection and then polished with Newton's method.

use crate::{
    primitive::{is_zero, rational_from_f64},
    symbolic::Polynomial,
};
use rug::Rational;
use std::cmp::Ordering;
use tracing::trace;

/// The maximum number of bisection steps taken when refining a root.
const MAX_BISECTIONS: usize = 200;

/// The number of Newton steps used to polish a bracketed root.
const NEWTON_STEPS: usize = 4;

/// Returns the real roots of the polynomial in ascending order, without duplicates. The zero
/// polynomial and nonzero constants have no roots.
pub fn real_roots(poly: &Polynomial, tolerance: f64) -> Vec<f64> {
    let mut roots = match poly.degree() {
        None | Some(0) => Vec::new(),
        Some(1) => linear_root(poly),
        Some(2) => quadratic_roots(poly),
        Some(_) => {
            let reduced = square_free(poly);
            if reduced.degree() < poly.degree() {
                real_roots(&reduced, tolerance)
            } else {
                isolate_roots(poly, tolerance)
            }
        },
    };

    roots.sort_by(f64::total_cmp);
    dedup_close(&mut roots, tolerance);
    trace!(degree = ?poly.degree(), ?roots, "isolated real roots");
    roots
}

/// Returns `p / gcd(p, p')`, which has the same roots as `p`, each with multiplicity one.
fn square_free(poly: &Polynomial) -> Polynomial {
    let common = poly.gcd(&poly.derivative());
    match common.degree() {
        None | Some(0) => poly.clone(),
        Some(_) => poly
            .div_rem(&common)
            .map_or_else(|| poly.clone(), |(quotient, _)| quotient),
    }
}

/// Solves `c0 + c1 x = 0` exactly.
fn linear_root(poly: &Polynomial) -> Vec<f64> {
    let root = Rational::from(-poly.coeff(0) / poly.coeff(1));
    vec![root.to_f64()]
}

/// Solves `c + b x + a x^2 = 0`. The sign of the discriminant is decided exactly; the roots use
/// the form of the quadratic formula that avoids cancellation.
fn quadratic_roots(poly: &Polynomial) -> Vec<f64> {
    let (c, b, a) = (poly.coeff(0), poly.coeff(1), poly.coeff(2));
    let disc = Rational::from(&b * &b) - Rational::from(&a * &c) * 4u32;

    if disc.cmp0().is_lt() {
        Vec::new()
    } else if is_zero(&disc) {
        let root = Rational::from(-b / (a * 2u32));
        vec![root.to_f64()]
    } else {
        let (a, b, c) = (a.to_f64(), b.to_f64(), c.to_f64());
        let sqrt_disc = disc.to_f64().sqrt();
        let q = -0.5 * (b + b.signum() * sqrt_disc);
        vec![q / a, c / q]
    }
}

/// Returns an upper bound on the magnitude of every root of the polynomial.
fn cauchy_bound(coeffs: &[f64]) -> f64 {
    let Some((lead, rest)) = coeffs.split_last() else {
        return 0.0;
    };
    1.0 + rest.iter().map(|c| (c / lead).abs()).fold(0.0, f64::max)
}

/// Evaluates the polynomial exactly at the given point, so the sign of the result is never the
/// product of rounding error.
fn exact_eval(poly: &Polynomial, x: f64) -> Option<Rational> {
    rational_from_f64(x).map(|x| poly.eval(&x))
}

/// Isolates the roots of a square-free polynomial of degree three or more.
fn isolate_roots(poly: &Polynomial, tolerance: f64) -> Vec<f64> {
    let bound = cauchy_bound(&poly.to_f64_coeffs());
    let derivative = poly.derivative();
    let critical = real_roots(&derivative, tolerance);

    let mut points = vec![-bound];
    points.extend(critical.iter().copied().filter(|x| x.abs() < bound));
    points.push(bound);

    let sign = |x: f64| exact_eval(poly, x).map(|value| value.cmp0());
    let value = |x: f64| exact_eval(poly, x).map_or(f64::NAN, |value| value.to_f64());

    let mut roots = Vec::new();
    for pair in points.windows(2) {
        let (lo, hi) = (pair[0], pair[1]);
        match (sign(lo), sign(hi)) {
            (Some(Ordering::Equal), _) => roots.push(lo),
            (Some(a), Some(b)) if a != b && b != Ordering::Equal => {
                if let Some(root) = bisect(&value, lo, hi, tolerance) {
                    roots.push(newton_polish(poly, &derivative, root, lo, hi));
                }
            },
            _ => {},
        }
    }

    roots
}

/// Improves a bracketed root with a few Newton steps, never leaving the bracket.
fn newton_polish(poly: &Polynomial, derivative: &Polynomial, mut x: f64, lo: f64, hi: f64) -> f64 {
    for _ in 0..NEWTON_STEPS {
        let slope = derivative.eval_f64(x);
        if slope == 0.0 {
            break;
        }
        let next = x - poly.eval_f64(x) / slope;
        if !(lo..=hi).contains(&next) {
            break;
        }
        x = next;
    }
    x
}

/// Removes roots that are within the tolerance of the previous root. The input must be sorted.
fn dedup_close(roots: &mut Vec<f64>, tolerance: f64) {
    let threshold = tolerance.sqrt();
    roots.dedup_by(|b, a| (*b - *a).abs() <= threshold * a.abs().max(1.0));
}

/// Finds a root of `f` in `[lo, hi]` by bisection. Returns [`None`] if `f` does not change sign
/// on the interval.
pub fn bisect<F>(f: F, mut lo: f64, mut hi: f64, tolerance: f64) -> Option<f64>
where
    F: Fn(f64) -> f64,
{
    let mut f_lo = f(lo);
    let f_hi = f(hi);
    if f_lo == 0.0 {
        return Some(lo);
    }
    if f_hi == 0.0 {
        return Some(hi);
    }
    if f_lo.signum() == f_hi.signum() || f_lo.is_nan() || f_hi.is_nan() {
        return None;
    }

    for _ in 0..MAX_BISECTIONS {
        let mid = 0.5 * (lo + hi);
        if hi - lo <= tolerance * mid.abs().max(1.0) {
            break;
        }

        let f_mid = f(mid);
        if f_mid == 0.0 {
            return Some(mid);
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    Some(0.5 * (lo + hi))
}

/// Samples `f` at `steps + 1` evenly spaced points on `[lo, hi]` and refines every sign change
/// by bisection. Points where `f` is undefined break the scan into separate pieces.
///
/// The roots are returned in ascending order.
pub fn scan_roots<F>(f: F, lo: f64, hi: f64, steps: usize, tolerance: f64) -> Vec<f64>
where
    F: Fn(f64) -> Option<f64>,
{
    let steps = steps.max(1);
    let width = (hi - lo) / steps as f64;
    let mut roots: Vec<f64> = Vec::new();
    let mut prev: Option<(f64, f64)> = None;

    for i in 0..=steps {
        let x = lo + i as f64 * width;
        let Some(y) = f(x).filter(|y| y.is_finite()) else {
            prev = None;
            continue;
        };

        if y == 0.0 {
            roots.push(x);
        } else if let Some((px, py)) = prev {
            if py != 0.0 && py.signum() != y.signum() {
                let g = |x: f64| f(x).unwrap_or(f64::NAN);
                if let Some(root) = bisect(g, px, x, tolerance) {
                    roots.push(root);
                }
            }
        }
        prev = Some((x, y));
    }

    dedup_close(&mut roots, tolerance);
    roots
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use pretty_assertions::assert_eq;
    use crate::primitive::rational;
    use super::*;

    fn poly(coeffs: &[i64]) -> Polynomial {
        Polynomial::new(coeffs.iter().map(|&c| rational(c)).collect())
    }

    fn assert_roots(actual: Vec<f64>, expected: &[f64]) {
        assert_eq!(actual.len(), expected.len(), "roots: {:?}", actual);
        for (a, e) in actual.iter().zip(expected) {
            assert_float_absolute_eq!(*a, *e, 1e-7);
        }
    }

    #[test]
    fn linear_is_exact() {
        // 13000 - 2000P = 0
        assert_eq!(real_roots(&poly(&[13000, -2000]), 1e-9), vec![6.5]);
    }

    #[test]
    fn quadratic() {
        // -1000r^2 - 5800r + 99750 = 0 has roots -13.3 and 7.5
        assert_roots(real_roots(&poly(&[99750, -5800, -1000]), 1e-9), &[-13.3, 7.5]);
    }

    #[test]
    fn quadratic_without_real_roots() {
        assert!(real_roots(&poly(&[1, 0, 1]), 1e-9).is_empty());
    }

    #[test]
    fn double_root() {
        assert_eq!(real_roots(&poly(&[4, -4, 1]), 1e-9), vec![2.0]);
    }

    #[test]
    fn cubic() {
        // (x - 1)(x - 2)(x + 3) = x^3 - 7x + 6
        assert_roots(real_roots(&poly(&[6, -7, 0, 1]), 1e-9), &[-3.0, 1.0, 2.0]);
    }

    #[test]
    fn cubic_with_one_real_root() {
        // x^3 + x + 1
        assert_roots(real_roots(&poly(&[1, 1, 0, 1]), 1e-9), &[-0.6823278038280193]);
    }

    #[test]
    fn quartic_with_double_root() {
        // (x - 1)^2 (x + 2)(x - 4) = x^4 - 4x^3 - 3x^2 + 14x - 8
        assert_roots(real_roots(&poly(&[-8, 14, -3, -4, 1]), 1e-9), &[-2.0, 1.0, 4.0]);
    }

    #[test]
    fn quartic_at_price_scale() {
        // (x - 100)(x - 200)(x - 300)(x - 400)
        let roots = real_roots(&poly(&[2_400_000_000, -50_000_000, 350_000, -1000, 1]), 1e-9);
        assert_eq!(roots.len(), 4, "roots: {:?}", roots);
        for (a, e) in roots.iter().zip([100.0, 200.0, 300.0, 400.0]) {
            assert_float_absolute_eq!(*a, e, 1e-6);
        }
    }

    #[test]
    fn cubic_at_price_scale() {
        // (x - 1000)(x - 2000)(x - 3000)
        let roots = real_roots(&poly(&[-6_000_000_000, 11_000_000, -6000, 1]), 1e-9);
        assert_eq!(roots.len(), 3, "roots: {:?}", roots);
        for (a, e) in roots.iter().zip([1000.0, 2000.0, 3000.0]) {
            assert_float_absolute_eq!(*a, e, 1e-6);
        }
    }

    #[test]
    fn repeated_root_at_price_scale() {
        // (x - 100)^2 (x - 300)
        let roots = real_roots(&poly(&[-3_000_000, 70_000, -500, 1]), 1e-9);
        assert_roots(roots, &[100.0, 300.0]);
    }

    #[test]
    fn scaled_cubic() {
        // 100(x - 2)(x - 5)(x - 9)
        assert_roots(real_roots(&poly(&[-9000, 7300, -1600, 100]), 1e-9), &[2.0, 5.0, 9.0]);
    }

    #[test]
    fn constants_have_no_roots() {
        assert!(real_roots(&poly(&[5]), 1e-9).is_empty());
        assert!(real_roots(&Polynomial::zero(), 1e-9).is_empty());
    }

    #[test]
    fn bisection() {
        let root = bisect(|x| x * x - 2.0, 0.0, 2.0, 1e-12).unwrap();
        assert_float_absolute_eq!(root, std::f64::consts::SQRT_2, 1e-10);
        assert!(bisect(|x| x * x + 1.0, -1.0, 1.0, 1e-12).is_none());
    }

    #[test]
    fn scan() {
        let roots = scan_roots(|x| Some((x - 0.3) * (x + 4.1)), -10.0, 10.0, 1000, 1e-12);
        assert_roots(roots, &[-4.1, 0.3]);
    }

    #[test]
    fn scan_skips_poles() {
        // 1/x changes sign across its pole but has no root
        let roots = scan_roots(|x| (x != 0.0).then(|| 1.0 / x), -1.0, 1.0, 10, 1e-12);
        assert!(roots.is_empty());
    }
}

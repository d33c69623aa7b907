//! Numerical integration.

/// Integrates `f` from `a` to `b` with the composite Simpson rule over `n` subintervals. `n` is
/// rounded up to the next even number.
///
/// If `b < a`, the result is the negated integral from `b` to `a`.
pub fn simpson<F>(f: F, a: f64, b: f64, n: usize) -> f64
where
    F: Fn(f64) -> f64,
{
    if a == b {
        return 0.0;
    }

    let n = (n.max(2) + 1) & !1;
    let h = (b - a) / n as f64;
    let interior: f64 = (1..n)
        .map(|i| {
            let weight = if i % 2 == 1 { 4.0 } else { 2.0 };
            weight * f(a + i as f64 * h)
        })
        .sum();

    (f(a) + interior + f(b)) * h / 3.0
}

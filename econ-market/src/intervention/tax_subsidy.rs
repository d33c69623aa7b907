use crate::{
    equilibrium::Market,
    error::Error,
    surplus::{baseline_surplus, deadweight_loss, surplus_at},
};
use super::{
    GovernmentTransfer,
    Imbalance,
    Incidence,
    Intervention,
    InterventionOutcome,
    PolicyKind,
};
use tracing::debug;

/// Returns the offsets `(u, v)` such that buyers pay `x + u` and sellers receive `x + v`, where
/// `x` is the price solved for.
///
/// The solved price is always the one faced by the side that is not taxed or subsidized:
///
/// | policy            | equation              | buyers pay | sellers receive |
/// | ----------------- | --------------------- | ---------- | --------------- |
/// | tax on producers  | `D(x) = S(x − t)`     | `x`        | `x − t`         |
/// | tax on consumers  | `D(x + t) = S(x)`     | `x + t`    | `x`             |
/// | subsidy, consumer | `D(x − s) = S(x)`     | `x − s`    | `x`             |
/// | subsidy, producer | `D(x) = S(x + s)`     | `x`        | `x + s`         |
pub(crate) fn wedge_offsets(kind: PolicyKind, rate: f64, incidence: Incidence) -> (f64, f64) {
    match (kind, incidence) {
        (PolicyKind::Tax, Incidence::Producer) => (0.0, -rate),
        (PolicyKind::Tax, Incidence::Consumer) => (rate, 0.0),
        (PolicyKind::Subsidy, Incidence::Consumer) => (-rate, 0.0),
        (PolicyKind::Subsidy, Incidence::Producer) => (0.0, rate),
    }
}

pub(super) fn apply(
    market: &Market,
    kind: PolicyKind,
    rate: f64,
    incidence: Incidence,
) -> Result<InterventionOutcome, Error> {
    let (demand_offset, supply_offset) = wedge_offsets(kind, rate, incidence);
    let wedge = market.solve_wedge(demand_offset, supply_offset)?;
    let buyer_price = wedge.price + demand_offset;
    let seller_price = wedge.price + supply_offset;
    let quantity = wedge.quantity;
    debug!(%kind, rate, %incidence, buyer_price, seller_price, quantity, "applied per-unit policy");

    let (intervention, transfer) = match kind {
        PolicyKind::Tax => (
            Intervention::Tax { rate, on: incidence },
            GovernmentTransfer::Revenue(rate * quantity),
        ),
        PolicyKind::Subsidy => (
            Intervention::Subsidy { rate, to: incidence },
            GovernmentTransfer::Expense(rate * quantity),
        ),
    };

    let baseline = market.equilibrium();
    let surplus_before = baseline_surplus(market)?;
    let surplus_after = surplus_at(market, quantity, buyer_price, seller_price)?;
    Ok(InterventionOutcome {
        intervention,
        baseline,
        buyer_price,
        seller_price,
        quantity,
        buyer_price_change: buyer_price - baseline.price,
        seller_price_change: seller_price - baseline.price,
        transfer,
        imbalance: Imbalance::Balanced,
        surplus_before,
        surplus_after,
        deadweight_loss: deadweight_loss(&surplus_before, &surplus_after, &transfer),
    })
}

#[cfg(test)]
mod tests {
    use assert_float_eq::assert_float_absolute_eq;
    use crate::options::SolverOptions;
    use super::*;

    fn market() -> Market {
        Market::parse("Q = 9400 - 1000P", "Q = 1000P - 3600", SolverOptions::default()).unwrap()
    }

    #[test]
    fn tax_on_producers() {
        let outcome = market().apply(Intervention::tax(2.0)).unwrap();
        assert_float_absolute_eq!(outcome.buyer_price, 7.5, 1e-9);
        assert_float_absolute_eq!(outcome.seller_price, 5.5, 1e-9);
        assert_float_absolute_eq!(outcome.quantity, 1900.0, 1e-6);
        assert_float_absolute_eq!(outcome.buyer_price_change, 1.0, 1e-9);
        assert_float_absolute_eq!(outcome.seller_price_change, -1.0, 1e-9);
        assert_float_absolute_eq!(outcome.transfer.net(), 3800.0, 1e-6);
        assert_float_absolute_eq!(outcome.deadweight_loss, 1000.0, 1e-6);
        assert!(outcome.is_binding());
    }

    #[test]
    fn incidence_does_not_change_the_wedge() {
        let market = market();
        let on_producers = market.apply(Intervention::Tax { rate: 2.0, on: Incidence::Producer }).unwrap();
        let on_consumers = market.apply(Intervention::Tax { rate: 2.0, on: Incidence::Consumer }).unwrap();
        assert_float_absolute_eq!(on_producers.buyer_price, on_consumers.buyer_price, 1e-9);
        assert_float_absolute_eq!(on_producers.seller_price, on_consumers.seller_price, 1e-9);
        assert_float_absolute_eq!(on_producers.quantity, on_consumers.quantity, 1e-6);
    }

    #[test]
    fn subsidy_to_consumers() {
        // D(x - 1) = S(x)  =>  10400 - 1000x = 1000x - 3600  =>  x = 7
        let outcome = market().apply(Intervention::subsidy(1.0)).unwrap();
        assert_float_absolute_eq!(outcome.seller_price, 7.0, 1e-9);
        assert_float_absolute_eq!(outcome.buyer_price, 6.0, 1e-9);
        assert_float_absolute_eq!(outcome.quantity, 3400.0, 1e-6);
        assert_float_absolute_eq!(outcome.transfer.net(), -3400.0, 1e-6);

        // the triangle between the curves: 0.5 * 500 * 1
        assert_float_absolute_eq!(outcome.deadweight_loss, 250.0, 1e-6);
    }

    #[test]
    fn subsidy_to_producers() {
        let outcome = market().apply(Intervention::Subsidy { rate: 1.0, to: Incidence::Producer }).unwrap();
        assert_float_absolute_eq!(outcome.buyer_price, 6.0, 1e-9);
        assert_float_absolute_eq!(outcome.seller_price, 7.0, 1e-9);
    }

    #[test]
    fn zero_rate() {
        let outcome = market().apply(Intervention::tax(0.0)).unwrap();
        assert_float_absolute_eq!(outcome.buyer_price, 6.5, 1e-12);
        assert_float_absolute_eq!(outcome.deadweight_loss, 0.0, 1e-6);
    }
}

use assert_float_eq::assert_float_absolute_eq;
use econ_market::{
    policy::{solve_subsidy, solve_tax},
    report::{self, FormatOptions},
    FailureReason,
    GovernmentTransfer,
    Incidence,
    Intervention,
    Market,
    PolicyTarget,
    PolicyTargets,
    SolverOptions,
    SolverResult,
};
use pretty_assertions::assert_eq;

fn market(demand: &str, supply: &str) -> Market {
    Market::parse(demand, supply, SolverOptions::default()).unwrap()
}

#[test]
fn linear_closed_form() {
    let cases = [
        (9400.0, 1000.0, -3600.0, 1000.0),
        (3040.0, 25.0, 1.8, 9.0),
        (120.0, 2.0, 10.0, 0.5),
        (75.5, 0.25, 3.0, 3.75),
    ];

    for (a, b, c, d) in cases {
        let market = market(&format!("Q = {a} - {b}P"), &format!("Q = {c} + {d}P"));
        let expected = (a - c) / (b + d);
        assert_float_absolute_eq!(market.equilibrium().price, expected, 1e-9);
        assert_float_absolute_eq!(market.equilibrium().quantity, a - b * expected, 1e-6);
    }
}

#[test]
fn tax_wedge_matches_rate() {
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P");
    for rate in [0.5, 3.0, 17.25] {
        for on in [Incidence::Consumer, Incidence::Producer] {
            let outcome = market.apply(Intervention::Tax { rate, on }).unwrap();
            assert_float_absolute_eq!(outcome.buyer_price - outcome.seller_price, rate, 1e-9);
        }
    }
}

#[test]
fn subsidy_wedge_matches_rate() {
    let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
    for rate in [0.25, 1.0, 4.0] {
        for to in [Incidence::Consumer, Incidence::Producer] {
            let outcome = market.apply(Intervention::Subsidy { rate, to }).unwrap();
            assert_float_absolute_eq!(outcome.seller_price - outcome.buyer_price, rate, 1e-9);
        }
    }
}

#[test]
fn deadweight_loss_sign() {
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P");
    for rate in [0.1, 1.0, 10.0, 40.0] {
        let tax = market.apply(Intervention::tax(rate)).unwrap();
        let subsidy = market.apply(Intervention::subsidy(rate)).unwrap();
        assert!(tax.deadweight_loss > 0.0, "tax of {rate}: {}", tax.deadweight_loss);
        assert!(subsidy.deadweight_loss > 0.0, "subsidy of {rate}: {}", subsidy.deadweight_loss);
    }

    let untaxed = market.apply(Intervention::tax(0.0)).unwrap();
    assert_float_absolute_eq!(untaxed.deadweight_loss, 0.0, 1e-6);
    let unsubsidized = market.apply(Intervention::subsidy(0.0)).unwrap();
    assert_float_absolute_eq!(unsubsidized.deadweight_loss, 0.0, 1e-6);
}

#[test]
fn linear_deadweight_loss_is_a_triangle() {
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P");
    let baseline = market.equilibrium().quantity;
    let outcome = market.apply(Intervention::tax(4.0)).unwrap();
    assert_float_absolute_eq!(outcome.deadweight_loss, 0.5 * (baseline - outcome.quantity) * 4.0, 1e-6);
}

#[test]
fn government_transfer() {
    let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");

    let tax = market.apply(Intervention::tax(1.5)).unwrap();
    assert!(matches!(tax.transfer, GovernmentTransfer::Revenue(_)));
    assert_float_absolute_eq!(tax.transfer.amount(), 1.5 * tax.quantity, 1e-9);

    let subsidy = market.apply(Intervention::subsidy(1.5)).unwrap();
    assert!(matches!(subsidy.transfer, GovernmentTransfer::Expense(_)));
    assert_float_absolute_eq!(subsidy.transfer.amount(), 1.5 * subsidy.quantity, 1e-9);

    // S(9) - D(9) = 5400 - 400
    let guarantee = market.apply(Intervention::PriceGuarantee { price: 9.0, storage_cost: 1.0 }).unwrap();
    assert_float_absolute_eq!(guarantee.transfer.amount(), 5000.0 * 10.0, 1e-6);

    let below = market.apply(Intervention::PriceGuarantee { price: 6.0, storage_cost: 1.0 }).unwrap();
    assert_eq!(below.transfer, GovernmentTransfer::None);
}

#[test]
fn inverse_round_trip() {
    let options = SolverOptions::default();
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P");
    let demand = market.demand().inverse(&options);
    let supply = market.supply().inverse(&options);
    for price in [1.0, 20.0, 89.0, 120.0] {
        let q = market.demand().eval(price).unwrap();
        assert_float_absolute_eq!(demand.eval(q).unwrap(), price, 1e-9);
        let q = market.supply().eval(price).unwrap();
        assert_float_absolute_eq!(supply.eval(q).unwrap(), price, 1e-9);
    }
}

#[test]
fn subsidy_budget_scenario() {
    let market = market("Q = 9400 - 1000P", "Q = 1000P - 3600");
    assert_eq!(
        report::equilibrium(&market.equilibrium(), FormatOptions::default()),
        "Market equilibrium price: 6.50, Quantity: 2900.00",
    );

    let targets = PolicyTargets { budget: Some(49875.0), ..Default::default() };
    let results = solve_subsidy(&market, &targets);
    let SolverResult::Success(rate) = results[0].1 else {
        panic!("expected a subsidy rate, got {:?}", results[0].1);
    };
    assert_float_absolute_eq!(rate, 7.5, 1e-9);

    let outcome = market.apply(Intervention::subsidy(rate)).unwrap();
    assert_float_absolute_eq!(rate * outcome.quantity, 49875.0, 1e-6);
}

#[test]
fn producer_tax_scenario() {
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P");
    let baseline = market.equilibrium().price;
    let outcome = market.apply(Intervention::Tax { rate: 6.8, on: Incidence::Producer }).unwrap();

    assert!(outcome.buyer_price > baseline);
    assert!(outcome.seller_price < baseline);
    let increase = outcome.buyer_price - baseline;
    let decrease = baseline - outcome.seller_price;
    assert_float_absolute_eq!(increase + decrease, 6.8, 1e-9);

    // supply responds less to price than demand does, so sellers bear more of the tax
    assert!(decrease > increase);
}

#[test]
fn nonlinear_dwl_target() {
    let market = market("Q = 3040 - 25P", "Q = 1.8 + 9P^2");
    let targets = PolicyTargets { quantity_change: Some(10.0), max_dwl: Some(100.0), budget: Some(500.0) };
    let results = solve_tax(&market, &targets);

    assert_eq!(results.len(), 3);
    assert_eq!(results[1], (PolicyTarget::DeadweightLoss(100.0), SolverResult::Failure(FailureReason::NonLinearMarket)));
    assert!(matches!(results[0].1, SolverResult::Success(rate) if rate > 0.0));
    assert!(matches!(results[2].1, SolverResult::Success(rate) if rate > 0.0));

    let text = report::policy(econ_market::PolicyKind::Tax, &market.equilibrium(), &results, FormatOptions::default());
    assert!(text.contains("Tax to maximize DWL: Not applicable for non-linear market"));
}

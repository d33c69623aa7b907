use crate::{
    equilibrium::Market,
    error::Error,
    surplus::{baseline_surplus, consumer_surplus, deadweight_loss, producer_surplus, Surplus},
};
use super::{quantities_at, unchanged, GovernmentTransfer, Imbalance, Intervention, InterventionOutcome};
use tracing::debug;

/// The government promises to buy, at `price`, whatever consumers do not. Producers sell the
/// quantity supplied at that price and consumers buy the quantity demanded.
///
/// A guarantee at or below the equilibrium price is not binding and leaves the market unchanged.
pub(super) fn apply(market: &Market, price: f64, storage_cost: f64) -> Result<InterventionOutcome, Error> {
    let intervention = Intervention::PriceGuarantee { price, storage_cost };
    let baseline = market.equilibrium();
    if price <= baseline.price {
        debug!(price, equilibrium = baseline.price, "price guarantee is not binding");
        return unchanged(market, intervention);
    }

    // above the demand choke price, consumers buy nothing
    let (demanded, supplied) = quantities_at(market, price)?;
    let demanded = demanded.max(0.0);
    let government_purchase = (supplied - demanded).max(0.0);
    let transfer = GovernmentTransfer::Expense(government_purchase * (price + storage_cost));
    debug!(price, demanded, supplied, government_purchase, "applied price guarantee");

    let surplus_before = baseline_surplus(market)?;
    let surplus_after = Surplus {
        consumer: consumer_surplus(market, demanded, price)?,
        producer: producer_surplus(market, supplied, price)?,
    };
    Ok(InterventionOutcome {
        intervention,
        baseline,
        buyer_price: price,
        seller_price: price,
        quantity: supplied,
        buyer_price_change: price - baseline.price,
        seller_price_change: price - baseline.price,
        transfer,
        imbalance: Imbalance::Excess { demanded, supplied, government_purchase },
        surplus_before,
        surplus_after,
        deadweight_loss: deadweight_loss(&surplus_before, &surplus_after, &transfer),
    })
}

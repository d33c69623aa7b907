use crate::{
    equilibrium::Market,
    error::Error,
    surplus::{baseline_surplus, deadweight_loss, surplus_at},
};
use super::{quantities_at, unchanged, GovernmentTransfer, Imbalance, Intervention, InterventionOutcome};
use tracing::debug;

/// Applies a price ceiling or floor. Both sides trade at the controlled price, and the quantity
/// traded is the smaller of the quantities demanded and supplied.
pub(super) fn apply(market: &Market, intervention: Intervention, price: f64) -> Result<InterventionOutcome, Error> {
    let baseline = market.equilibrium();
    let binding = match intervention {
        Intervention::PriceCeiling { .. } => price < baseline.price,
        Intervention::PriceFloor { .. } => price > baseline.price,
        _ => return Err(Error::Unsupported("not a price control")),
    };
    if !binding {
        debug!(price, equilibrium = baseline.price, "price control is not binding");
        return unchanged(market, intervention);
    }

    let (demanded, supplied) = quantities_at(market, price)?;
    let quantity = demanded.min(supplied).max(0.0);
    let imbalance = if demanded > supplied {
        Imbalance::Shortage { demanded, supplied }
    } else {
        Imbalance::Excess { demanded, supplied, government_purchase: 0.0 }
    };
    debug!(price, demanded, supplied, "applied price control");

    let surplus_before = baseline_surplus(market)?;
    let surplus_after = surplus_at(market, quantity, price, price)?;
    let transfer = GovernmentTransfer::None;
    Ok(InterventionOutcome {
        intervention,
        baseline,
        buyer_price: price,
        seller_price: price,
        quantity,
        buyer_price_change: price - baseline.price,
        seller_price_change: price - baseline.price,
        transfer,
        imbalance,
        surplus_before,
        surplus_after,
        deadweight_loss: deadweight_loss(&surplus_before, &surplus_after, &transfer),
    })
}

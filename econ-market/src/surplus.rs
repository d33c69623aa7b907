//! Consumer surplus, producer surplus and deadweight loss.

use crate::{equilibrium::Market, error::Error, intervention::GovernmentTransfer};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The surplus of each side of a market at some transaction.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Surplus {
    /// The area between the inverse demand curve and the price paid by buyers.
    pub consumer: f64,

    /// The area between the price received by sellers and the inverse supply curve.
    pub producer: f64,
}

impl Surplus {
    /// Returns the sum of consumer and producer surplus.
    pub fn total(&self) -> f64 {
        self.consumer + self.producer
    }
}

/// Computes the surplus when `quantity` units trade, buyers pay `buyer_price` and sellers receive
/// `seller_price`:
///
/// - consumer surplus is `∫₀^Q D⁻¹(q) dq − buyer_price · Q`
/// - producer surplus is `seller_price · Q − ∫₀^Q S⁻¹(q) dq`
pub fn surplus_at(
    market: &Market,
    quantity: f64,
    buyer_price: f64,
    seller_price: f64,
) -> Result<Surplus, Error> {
    Ok(Surplus {
        consumer: consumer_surplus(market, quantity, buyer_price)?,
        producer: producer_surplus(market, quantity, seller_price)?,
    })
}

/// Computes the consumer surplus when buyers purchase `quantity` units at `price`.
pub fn consumer_surplus(market: &Market, quantity: f64, price: f64) -> Result<f64, Error> {
    let under_demand = market.demand().inverse(market.options()).integral(quantity)?;
    Ok(under_demand - price * quantity)
}

/// Computes the producer surplus when sellers sell `quantity` units at `price`.
pub fn producer_surplus(market: &Market, quantity: f64, price: f64) -> Result<f64, Error> {
    let under_supply = market.supply().inverse(market.options()).integral(quantity)?;
    Ok(price * quantity - under_supply)
}

/// Computes the surplus at the undistorted equilibrium of the market.
pub fn baseline_surplus(market: &Market) -> Result<Surplus, Error> {
    let point = market.equilibrium();
    surplus_at(market, point.quantity, point.price, point.price)
}

/// Computes the deadweight loss of an intervention: the undistorted total surplus, less the
/// distorted total surplus and the net transfer to the government.
pub fn deadweight_loss(before: &Surplus, after: &Surplus, transfer: &GovernmentTransfer) -> f64 {
    before.total() - (after.total() + transfer.net())
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
    fn baseline() {
        let surplus = baseline_surplus(&market()).unwrap();
        assert_float_absolute_eq!(surplus.consumer, 4205.0, 1e-6);
        assert_float_absolute_eq!(surplus.producer, 4205.0, 1e-6);
        assert_float_absolute_eq!(surplus.total(), 8410.0, 1e-6);
    }

    #[test]
    fn taxed_transaction() {
        // a tax of 2 on producers: buyers pay 7.5, sellers receive 5.5, 1900 units trade
        let market = market();
        let before = baseline_surplus(&market).unwrap();
        let after = surplus_at(&market, 1900.0, 7.5, 5.5).unwrap();
        assert_float_absolute_eq!(after.consumer, 1805.0, 1e-6);
        assert_float_absolute_eq!(after.producer, 1805.0, 1e-6);

        let dwl = deadweight_loss(&before, &after, &GovernmentTransfer::Revenue(3800.0));
        assert_float_absolute_eq!(dwl, 1000.0, 1e-6);
    }

    #[test]
    fn expense_counts_against_surplus() {
        let before = Surplus { consumer: 10.0, producer: 10.0 };
        let after = Surplus { consumer: 15.0, producer: 15.0 };
        assert_eq!(deadweight_loss(&before, &after, &GovernmentTransfer::Expense(12.0)), 2.0);
        assert_eq!(deadweight_loss(&before, &before, &GovernmentTransfer::None), 0.0);
    }
}

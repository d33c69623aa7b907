//! Policy interventions with a known parameter: taxes, subsidies, price guarantees and price
//! controls.

mod control;
mod guarantee;
mod tax_subsidy;

use crate::{
    equilibrium::{EquilibriumPoint, Market},
    error::Error,
    surplus::Surplus,
};
use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub(crate) use tax_subsidy::wedge_offsets;

/// Which side of the market statutorily pays a tax or receives a subsidy.
///
/// Incidence decides which curve is shifted, but not the final split of the burden, which
/// depends only on the slopes of the curves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Incidence {
    Consumer,
    Producer,
}

/// Error returned when parsing an [`Incidence`] from anything but `C` or `P`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown incidence `{0}`, expected `C` (consumer) or `P` (producer)")]
pub struct ParseIncidenceError(String);

impl FromStr for Incidence {
    type Err = ParseIncidenceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "C" | "c" => Ok(Incidence::Consumer),
            "P" | "p" => Ok(Incidence::Producer),
            other => Err(ParseIncidenceError(other.to_string())),
        }
    }
}

impl fmt::Display for Incidence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Incidence::Consumer => write!(f, "consumers"),
            Incidence::Producer => write!(f, "producers"),
        }
    }
}

/// A per-unit wedge between the price paid by buyers and the price received by sellers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum PolicyKind {
    Tax,
    Subsidy,
}

impl PolicyKind {
    /// Returns the side that pays a tax or receives a subsidy when none is given: producers pay
    /// taxes and consumers receive subsidies.
    pub fn default_incidence(self) -> Incidence {
        match self {
            PolicyKind::Tax => Incidence::Producer,
            PolicyKind::Subsidy => Incidence::Consumer,
        }
    }
}

impl fmt::Display for PolicyKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PolicyKind::Tax => write!(f, "tax"),
            PolicyKind::Subsidy => write!(f, "subsidy"),
        }
    }
}

/// An intervention in a market.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Intervention {
    /// A per-unit tax paid by one side of the market.
    Tax { rate: f64, on: Incidence },

    /// A per-unit subsidy paid to one side of the market.
    Subsidy { rate: f64, to: Incidence },

    /// The government buys any excess supply at the guaranteed price, and pays `storage_cost`
    /// for each unit it buys.
    PriceGuarantee { price: f64, storage_cost: f64 },

    /// A legal maximum price.
    PriceCeiling { price: f64 },

    /// A legal minimum price, without government purchases.
    PriceFloor { price: f64 },
}

impl Intervention {
    /// A tax paid by producers.
    pub fn tax(rate: f64) -> Self {
        Intervention::Tax { rate, on: PolicyKind::Tax.default_incidence() }
    }

    /// A subsidy paid to consumers.
    pub fn subsidy(rate: f64) -> Self {
        Intervention::Subsidy { rate, to: PolicyKind::Subsidy.default_incidence() }
    }

    /// A price guarantee without storage costs.
    pub fn guarantee(price: f64) -> Self {
        Intervention::PriceGuarantee { price, storage_cost: 0.0 }
    }
}

/// Money flowing to or from the government as a result of an intervention.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum GovernmentTransfer {
    /// The government collects this amount, such as tax revenue.
    Revenue(f64),

    /// The government spends this amount, such as the cost of a subsidy.
    Expense(f64),

    #[default]
    None,
}

impl GovernmentTransfer {
    /// Returns the signed amount: positive for revenue and negative for expense.
    pub fn net(&self) -> f64 {
        match self {
            GovernmentTransfer::Revenue(amount) => *amount,
            GovernmentTransfer::Expense(amount) => -amount,
            GovernmentTransfer::None => 0.0,
        }
    }

    /// Returns the unsigned amount.
    pub fn amount(&self) -> f64 {
        self.net().abs()
    }
}

/// Whether the quantities demanded and supplied at the transaction price agree.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Imbalance {
    #[default]
    Balanced,

    /// More is demanded than supplied, as under a binding price ceiling.
    Shortage { demanded: f64, supplied: f64 },

    /// More is supplied than demanded, as under a binding price floor. `government_purchase` is
    /// the part of the excess bought by the government.
    Excess { demanded: f64, supplied: f64, government_purchase: f64 },
}

/// The state of a market after an intervention.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct InterventionOutcome {
    /// The intervention that was applied.
    pub intervention: Intervention,

    /// The undistorted equilibrium.
    pub baseline: EquilibriumPoint,

    /// The price paid by buyers.
    pub buyer_price: f64,

    /// The price received by sellers.
    pub seller_price: f64,

    /// The quantity sold by producers.
    pub quantity: f64,

    /// `buyer_price` less the baseline price.
    pub buyer_price_change: f64,

    /// `seller_price` less the baseline price.
    pub seller_price_change: f64,

    pub transfer: GovernmentTransfer,
    pub imbalance: Imbalance,

    /// The surplus at the undistorted equilibrium.
    pub surplus_before: Surplus,

    /// The surplus after the intervention.
    pub surplus_after: Surplus,

    pub deadweight_loss: f64,
}

impl InterventionOutcome {
    /// Returns true if the intervention changed the market at all.
    pub fn is_binding(&self) -> bool {
        self.buyer_price != self.baseline.price
            || self.seller_price != self.baseline.price
            || self.transfer != GovernmentTransfer::None
    }
}

impl Market {
    /// Applies an intervention to the market and reports the resulting prices, quantities,
    /// transfers and surpluses.
    pub fn apply(&self, intervention: Intervention) -> Result<InterventionOutcome, Error> {
        match intervention {
            Intervention::Tax { rate, on } => tax_subsidy::apply(self, PolicyKind::Tax, rate, on),
            Intervention::Subsidy { rate, to } => tax_subsidy::apply(self, PolicyKind::Subsidy, rate, to),
            Intervention::PriceGuarantee { price, storage_cost } => guarantee::apply(self, price, storage_cost),
            Intervention::PriceCeiling { price } => control::apply(self, intervention, price),
            Intervention::PriceFloor { price } => control::apply(self, intervention, price),
        }
    }
}

/// Returns the quantities demanded and supplied at the given price.
fn quantities_at(market: &Market, price: f64) -> Result<(f64, f64), Error> {
    match (market.demand().eval(price), market.supply().eval(price)) {
        (Some(demanded), Some(supplied)) => Ok((demanded, supplied)),
        _ => Err(Error::Unsupported("a curve is undefined at the controlled price")),
    }
}

/// Builds the outcome of an intervention that leaves the market at its baseline.
fn unchanged(market: &Market, intervention: Intervention) -> Result<InterventionOutcome, Error> {
    let baseline = market.equilibrium();
    let surplus = crate::surplus::baseline_surplus(market)?;
    Ok(InterventionOutcome {
        intervention,
        baseline,
        buyer_price: baseline.price,
        seller_price: baseline.price,
        quantity: baseline.quantity,
        buyer_price_change: 0.0,
        seller_price_change: 0.0,
        transfer: GovernmentTransfer::None,
        imbalance: Imbalance::Balanced,
        surplus_before: surplus,
        surplus_after: surplus,
        deadweight_loss: 0.0,
    })
}

//! Player-side money: the single-pool ledger and the restaurant income
//! source that feeds it.

pub mod income;
pub mod ledger;

pub use income::{IncomeSource, IncomeTable};
pub use ledger::{CashFlowTag, Ledger};

use crate::error::Result;
use rust_decimal::Decimal;

/// Funding seam for lot purchases.
///
/// The market debits whoever is buying through this trait, so it never
/// has to know whether the money comes from the player [`Ledger`] or the
/// rival's private treasury.
pub trait Purse {
    /// Funds currently available to spend.
    fn available(&self) -> Decimal;

    /// Remove `amount` from the purse. All-or-nothing.
    fn withdraw(&mut self, amount: Decimal, tag: CashFlowTag) -> Result<()>;
}

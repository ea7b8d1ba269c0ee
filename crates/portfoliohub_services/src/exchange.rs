//! Points-to-credits exchange.

use crate::Ledger;
use portfoliohub_core::{Account, AccountId, BalanceDelta, CreditPackage, credit_catalog};
use portfoliohub_error::{HubResult, LedgerError, LedgerErrorKind, ValidationError, ValidationErrorKind};
use tracing::{debug, info, instrument};

/// A completed package purchase.
#[derive(Debug, Clone, PartialEq)]
pub struct Purchase {
    /// Package bought
    pub package: CreditPackage,
    /// Buyer after the exchange
    pub account: Account,
}

/// Sells credit packages for points.
#[derive(Debug, Clone)]
pub struct ExchangeService {
    ledger: Ledger,
    catalog: Vec<CreditPackage>,
}

impl ExchangeService {
    /// Service selling the standard catalog.
    pub fn new(ledger: Ledger) -> Self {
        Self::with_catalog(ledger, credit_catalog())
    }

    /// Service selling a custom catalog.
    pub fn with_catalog(ledger: Ledger, catalog: Vec<CreditPackage>) -> Self {
        Self { ledger, catalog }
    }

    /// Packages on sale.
    pub fn catalog(&self) -> &[CreditPackage] {
        &self.catalog
    }

    /// Exchange points for a package's credits in one guarded update.
    ///
    /// # Errors
    ///
    /// `UnknownPackage`, `AccountNotFound`, and `InsufficientPoints` when the
    /// balance is below the price (nothing is written).
    #[instrument(skip(self), fields(account_id = %buyer))]
    pub async fn purchase_package(&self, buyer: &AccountId, package_id: &str) -> HubResult<Purchase> {
        let package = self
            .catalog
            .iter()
            .find(|package| package.id() == package_id)
            .cloned()
            .ok_or_else(|| {
                ValidationError::new(ValidationErrorKind::UnknownPackage(package_id.to_string()))
            })?;

        let account = self.ledger.account(buyer).await?;
        let cost = *package.points_cost();
        if account.points < cost {
            debug!(points = account.points, cost, "Not enough points");
            return Err(LedgerError::new(LedgerErrorKind::InsufficientPoints {
                required: cost,
                available: account.points,
            })
            .into());
        }

        let delta = BalanceDelta::points(-cost).and_credits(package.total_credits());
        let account = self.ledger.spend(buyer, delta).await?;
        info!(
            package = %package.id(),
            points = account.points,
            credits = account.credits,
            "Package purchased"
        );
        Ok(Purchase { package, account })
    }
}

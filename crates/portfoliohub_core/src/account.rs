//! Accounts and balance arithmetic.

use crate::{AccountId, Role};
use chrono::{DateTime, Utc};
use portfoliohub_error::{LedgerError, LedgerErrorKind};
use serde::{Deserialize, Serialize};

/// A registered member with a role and two balances.
///
/// Stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Identity provider id
    pub id: AccountId,
    /// Current role
    pub role: Role,
    /// Earned currency
    pub points: i64,
    /// Spendable currency (1 credit = 1 hour of listing visibility)
    pub credits: i64,
    /// Public name
    pub display_name: String,
    /// Optional profile description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Account creation time
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Create a fresh member account holding the signup bonus.
    ///
    /// # Examples
    ///
    /// ```
    /// use portfoliohub_core::{Account, AccountId, Role};
    ///
    /// let account = Account::new_member(AccountId::from("a"), "Ada", None, 25, chrono::Utc::now());
    /// assert_eq!(account.role, Role::Member);
    /// assert_eq!(account.points, 25);
    /// assert_eq!(account.credits, 0);
    /// ```
    pub fn new_member(
        id: AccountId,
        display_name: impl Into<String>,
        description: Option<String>,
        signup_bonus: i64,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            role: Role::Member,
            points: signup_bonus,
            credits: 0,
            display_name: display_name.into(),
            description,
            created_at: now,
        }
    }

    /// Current balances.
    pub fn balances(&self) -> Balances {
        Balances {
            points: self.points,
            credits: self.credits,
        }
    }

    /// Read one balance.
    pub fn balance(&self, field: BalanceField) -> i64 {
        match field {
            BalanceField::Points => self.points,
            BalanceField::Credits => self.credits,
        }
    }

    /// Apply a delta without a negative-balance guard.
    ///
    /// Both counters change or neither does.
    ///
    /// # Errors
    ///
    /// `BalanceOverflow` when either counter would leave the `i64` range.
    pub fn apply(&mut self, delta: &BalanceDelta) -> Result<(), LedgerError> {
        let points = checked_balance(BalanceField::Points, self.points, delta.points)?;
        let credits = checked_balance(BalanceField::Credits, self.credits, delta.credits)?;
        self.points = points;
        self.credits = credits;
        Ok(())
    }

    /// Apply a field-wise update, leaving unset fields untouched.
    pub fn apply_update(&mut self, update: &AccountUpdate) {
        if let Some(role) = update.role {
            self.role = role;
        }
        if let Some(points) = update.points {
            self.points = points;
        }
        if let Some(credits) = update.credits {
            self.credits = credits;
        }
        if let Some(name) = &update.display_name {
            self.display_name = name.clone();
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
    }
}

fn checked_balance(field: BalanceField, current: i64, delta: i64) -> Result<i64, LedgerError> {
    current.checked_add(delta).ok_or_else(|| {
        LedgerError::new(LedgerErrorKind::BalanceOverflow {
            field: field.to_string(),
            current,
            delta,
        })
    })
}

/// The two counters on an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Balances {
    /// Points balance
    pub points: i64,
    /// Credits balance
    pub credits: i64,
}

/// Names one balance counter.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BalanceField {
    /// Earned currency
    Points,
    /// Spendable currency
    Credits,
}

/// Signed change to both counters, applied as one atomic increment.
///
/// # Examples
///
/// ```
/// use portfoliohub_core::{BalanceDelta, BalanceField};
///
/// let purchase = BalanceDelta::points(-20).and_credits(6);
/// assert_eq!(purchase.get(BalanceField::Points), -20);
/// assert_eq!(purchase.get(BalanceField::Credits), 6);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BalanceDelta {
    /// Change to points
    pub points: i64,
    /// Change to credits
    pub credits: i64,
}

impl BalanceDelta {
    /// Delta touching only one field.
    pub fn of(field: BalanceField, amount: i64) -> Self {
        match field {
            BalanceField::Points => Self::points(amount),
            BalanceField::Credits => Self::credits(amount),
        }
    }

    /// Points-only delta.
    pub fn points(amount: i64) -> Self {
        Self {
            points: amount,
            credits: 0,
        }
    }

    /// Credits-only delta.
    pub fn credits(amount: i64) -> Self {
        Self {
            points: 0,
            credits: amount,
        }
    }

    /// Add a credits component.
    pub fn and_credits(mut self, amount: i64) -> Self {
        self.credits += amount;
        self
    }

    /// Component for one field.
    pub fn get(&self, field: BalanceField) -> i64 {
        match field {
            BalanceField::Points => self.points,
            BalanceField::Credits => self.credits,
        }
    }

    /// True when the delta changes nothing.
    pub fn is_zero(&self) -> bool {
        self.points == 0 && self.credits == 0
    }
}

/// Direct overwrite of account fields (admin override path).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountUpdate {
    /// New role
    pub role: Option<Role>,
    /// New points balance
    pub points: Option<i64>,
    /// New credits balance
    pub credits: Option<i64>,
    /// New display name
    pub display_name: Option<String>,
    /// New description
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder(points: i64, credits: i64) -> Account {
        let mut account = Account::new_member(AccountId::from("a"), "A", None, points, Utc::now());
        account.credits = credits;
        account
    }

    #[test]
    fn test_apply_moves_both_counters() {
        let mut account = holder(25, 0);
        account.apply(&BalanceDelta::points(-5).and_credits(1)).unwrap();
        assert_eq!(account.balances(), Balances { points: 20, credits: 1 });
    }

    #[test]
    fn test_apply_rejects_overflow_without_partial_write() {
        let mut account = holder(10, i64::MAX);
        let err = account
            .apply(&BalanceDelta::points(5).and_credits(1))
            .unwrap_err();
        assert_eq!(
            err.kind,
            LedgerErrorKind::BalanceOverflow {
                field: "credits".to_string(),
                current: i64::MAX,
                delta: 1,
            }
        );
        assert_eq!(account.balances(), Balances { points: 10, credits: i64::MAX });
    }

    #[test]
    fn test_apply_rejects_underflow() {
        let mut account = holder(i64::MIN, 0);
        assert!(account.apply(&BalanceDelta::points(-1)).is_err());
        assert_eq!(account.points, i64::MIN);
    }
}

//! Bank account and manual wallet models
//!
//! Bank accounts are synced from the bank by the backend; the only field the
//! client may change is the inclusion flag. Manual wallets hold cash tracked
//! by hand.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, WalletId};
use super::money::Money;

/// A bank-synced account
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Bank-issued identifier
    pub id: AccountId,

    /// Display name (e.g. "Black card")
    pub name: String,

    /// Current balance as reported by the bank
    pub balance: Money,

    /// Whether the balance counts toward the bank and total capital figures
    pub is_included_in_total: bool,
}

impl Account {
    pub fn new(id: impl Into<AccountId>, name: impl Into<String>, balance: Money) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            balance,
            is_included_in_total: true,
        }
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Sum the balances of the accounts flagged for inclusion
///
/// `None` when the total does not fit in minor units.
pub fn included_balance<'a>(accounts: impl IntoIterator<Item = &'a Account>) -> Option<Money> {
    Money::checked_sum(
        accounts
            .into_iter()
            .filter(|a| a.is_included_in_total)
            .map(|a| a.balance),
    )
}

/// A manually tracked cash wallet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManualWallet {
    pub id: WalletId,
    pub name: String,
    pub balance: Money,
}

impl fmt::Display for ManualWallet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_wire_account() {
        let json = r#"{"id": "u7Tq", "name": "Black", "balance": -15.25, "isIncludedInTotal": false}"#;
        let account: Account = serde_json::from_str(json).unwrap();

        assert_eq!(account.id.as_str(), "u7Tq");
        assert_eq!(account.balance, Money::from_minor(-1525));
        assert!(!account.is_included_in_total);
    }

    #[test]
    fn test_included_balance_skips_excluded_accounts() {
        let mut savings = Account::new("b", "Savings", Money::from_minor(50_000));
        savings.is_included_in_total = false;
        let accounts = vec![
            Account::new("a", "Card", Money::from_minor(12_345)),
            savings,
            Account::new("c", "Credit", Money::from_minor(-2_345)),
        ];

        assert_eq!(included_balance(&accounts), Some(Money::from_minor(10_000)));
    }

    #[test]
    fn test_included_balance_of_nothing_is_zero() {
        assert_eq!(included_balance(&Vec::<Account>::new()), Some(Money::zero()));
    }

    #[test]
    fn test_included_balance_overflow_is_none() {
        let mut excluded = Account::new("c", "Ignored", Money::from_minor(i64::MIN));
        excluded.is_included_in_total = false;
        let accounts = vec![
            Account::new("a", "Huge", Money::from_minor(i64::MAX)),
            Account::new("b", "Also huge", Money::from_minor(i64::MAX)),
            excluded,
        ];
        assert_eq!(included_balance(&accounts), None);
        assert_eq!(included_balance(&accounts[..1]), Some(Money::from_minor(i64::MAX)));
    }

    #[test]
    fn test_decode_wallet() {
        let json = r#"{"id": 2, "name": "Cash", "balance": 300}"#;
        let wallet: ManualWallet = serde_json::from_str(json).unwrap();
        assert_eq!(wallet.id, WalletId::new(2));
        assert_eq!(wallet.balance, Money::from_minor(30_000));
    }
}

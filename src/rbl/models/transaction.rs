use crate::ids::PlayerId;
use crate::Money;

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
#[error("Unknown transaction type: {0:?}")]
pub struct UnknownTransactionType(pub String);

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Salary,
    Property,
    House,
    Hotel,
    TaxIncome,
    TaxLuxury,
    Fine,
    BankError,
    Rent,
    OtherIncome,
    OtherExpense,
    #[serde(rename = "bank-transfer")]
    BankTransfer,
}

impl TransactionType {
    pub const ALL: [TransactionType; 12] = [
        Self::Salary,
        Self::Property,
        Self::House,
        Self::Hotel,
        Self::TaxIncome,
        Self::TaxLuxury,
        Self::Fine,
        Self::BankError,
        Self::Rent,
        Self::OtherIncome,
        Self::OtherExpense,
        Self::BankTransfer,
    ];

    /// Name stored in transaction records, matches the serde representation
    pub fn wire_name(&self) -> &'static str {
        match self {
            Self::Salary => "salary",
            Self::Property => "property",
            Self::House => "house",
            Self::Hotel => "hotel",
            Self::TaxIncome => "tax_income",
            Self::TaxLuxury => "tax_luxury",
            Self::Fine => "fine",
            Self::BankError => "bank_error",
            Self::Rent => "rent",
            Self::OtherIncome => "other_income",
            Self::OtherExpense => "other_expense",
            Self::BankTransfer => "bank-transfer",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Salary => "Collect Salary",
            Self::Property => "Property Purchase",
            Self::House => "House Purchase",
            Self::Hotel => "Hotel Purchase",
            Self::TaxIncome => "Income Tax",
            Self::TaxLuxury => "Luxury Tax",
            Self::Fine => "Fine",
            Self::BankError => "Bank Error",
            Self::Rent => "Rent",
            Self::OtherIncome => "Other Income",
            Self::OtherExpense => "Other Expense",
            Self::BankTransfer => "Bank Transfer",
        }
    }
}

impl FromStr for TransactionType {
    type Err = UnknownTransactionType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();

        Self::ALL
            .into_iter()
            .find(|typ| typ.wire_name() == needle)
            .ok_or_else(|| UnknownTransactionType(s.to_string()))
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        return write!(f, "{}", self.display_name());
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Completed,
}

/// Immutable history record; names are captured at application time so the
/// entry still reads correctly after a player leaves
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub from: PlayerId,
    pub from_name: String,
    pub to: PlayerId,
    pub to_name: String,
    pub amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    pub timestamp: u64,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn involves(&self, player_id: &PlayerId) -> bool {
        &self.from == player_id || &self.to == player_id
    }
}

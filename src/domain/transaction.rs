//! Transaction kind

use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Kind of a financial transaction.
///
/// Stored as text in the `transactions.kind` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "INCOME" => Ok(Self::Income),
            "EXPENSE" => Ok(Self::Expense),
            other => Err(AppError::Internal(format!(
                "Unknown transaction kind in storage: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_storage_form() {
        assert_eq!(
            TransactionKind::parse(TransactionKind::Income.as_str()).unwrap(),
            TransactionKind::Income
        );
        assert_eq!(
            TransactionKind::parse(TransactionKind::Expense.as_str()).unwrap(),
            TransactionKind::Expense
        );
        assert!(TransactionKind::parse("TRANSFER").is_err());
    }

    #[test]
    fn serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&TransactionKind::Income).unwrap(),
            "\"INCOME\""
        );
    }
}

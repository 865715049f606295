//! Status and method enumerations shared by the list views

use serde::{Deserialize, Serialize};

/// Subscription status of a user account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubscriptionStatus {
    Active,
    Inactive,
}

impl Default for SubscriptionStatus {
    fn default() -> Self {
        SubscriptionStatus::Active
    }
}

impl std::str::FromStr for SubscriptionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(SubscriptionStatus::Active),
            "inactive" => Ok(SubscriptionStatus::Inactive),
            _ => Err(format!("Invalid subscription status: {}", s)),
        }
    }
}

impl std::fmt::Display for SubscriptionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SubscriptionStatus::Active => write!(f, "Active"),
            SubscriptionStatus::Inactive => write!(f, "Inactive"),
        }
    }
}

/// How a transaction was paid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaymentMethod {
    Stripe,
    #[serde(rename = "Bank Transfer")]
    BankTransfer,
}

impl std::str::FromStr for PaymentMethod {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace(['_', '-'], " ").as_str() {
            "stripe" => Ok(PaymentMethod::Stripe),
            "bank transfer" | "bank" => Ok(PaymentMethod::BankTransfer),
            _ => Err(format!("Invalid payment method: {}", s)),
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Stripe => write!(f, "Stripe"),
            PaymentMethod::BankTransfer => write!(f, "Bank Transfer"),
        }
    }
}

/// Settlement status of a transaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionStatus {
    Paid,
    Pending,
    Failed,
}

impl Default for TransactionStatus {
    fn default() -> Self {
        TransactionStatus::Pending
    }
}

impl std::str::FromStr for TransactionStatus {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "paid" => Ok(TransactionStatus::Paid),
            "pending" => Ok(TransactionStatus::Pending),
            "failed" => Ok(TransactionStatus::Failed),
            _ => Err(format!("Invalid transaction status: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TransactionStatus::Paid => write!(f, "Paid"),
            TransactionStatus::Pending => write!(f, "Pending"),
            TransactionStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_payment_method_round_trips_label() {
        let method: PaymentMethod = "bank_transfer".parse().unwrap();
        assert_eq!(method, PaymentMethod::BankTransfer);
        assert_eq!(method.to_string(), "Bank Transfer");
        assert_eq!(serde_json::to_string(&method).unwrap(), "\"Bank Transfer\"");
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("PAID".parse::<TransactionStatus>().unwrap(), TransactionStatus::Paid);
        assert_eq!("inactive".parse::<SubscriptionStatus>().unwrap(), SubscriptionStatus::Inactive);
        assert!("refunded".parse::<TransactionStatus>().is_err());
    }
}

//! Records listed by the user-management and transaction-ledger views

use crate::types::{PaymentMethod, SubscriptionStatus, TransactionStatus};
use crate::ListItem;
use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display format of list timestamps, e.g. "08 Aug, 10:30"
pub const LIST_DATE_FORMAT: &str = "%d %b, %H:%M";

/// A registered user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Avatar image URL
    #[serde(default)]
    pub avatar: String,
    pub signup_date: NaiveDateTime,
    pub subscription_status: SubscriptionStatus,
}

impl User {
    /// Signup timestamp as shown in the list
    pub fn signup_display(&self) -> String {
        self.signup_date.format(LIST_DATE_FORMAT).to_string()
    }

    pub fn is_active(&self) -> bool {
        self.subscription_status == SubscriptionStatus::Active
    }
}

impl ListItem for User {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle) || self.email.to_lowercase().contains(needle)
    }
}

/// A ledger transaction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Transaction reference, e.g. "TXN-1001"
    pub id: String,
    pub date: NaiveDateTime,
    pub user_name: String,
    pub payment_method: PaymentMethod,
    pub amount: Decimal,
    /// ISO currency code
    pub currency: String,
    pub status: TransactionStatus,
}

impl Transaction {
    pub fn date_display(&self) -> String {
        self.date.format(LIST_DATE_FORMAT).to_string()
    }

    /// Amount with two decimals followed by the currency code
    pub fn amount_display(&self) -> String {
        format!("{:.2} {}", self.amount.round_dp(2), self.currency)
    }
}

impl ListItem for Transaction {
    fn id(&self) -> &str {
        &self.id
    }

    fn matches(&self, needle: &str) -> bool {
        self.user_name.to_lowercase().contains(needle)
            || self.id.to_lowercase().contains(needle)
            || self.payment_method.to_string().to_lowercase().contains(needle)
    }
}

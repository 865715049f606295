//! Demo records for the user-management and transaction views

use chrono::{NaiveDate, NaiveDateTime};
use dashweb_core::{PaymentMethod, SubscriptionStatus, Transaction, TransactionStatus, User};
use rust_decimal::Decimal;

const PLACEHOLDER_AVATAR: &str = "/placeholder.svg?height=40&width=40";
const SEED_YEAR: i32 = 2025;

fn at(month: u32, day: u32, hour: u32, minute: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(SEED_YEAR, month, day)
        .and_then(|date| date.and_hms_opt(hour, minute, 0))
        .unwrap_or_default()
}

fn user(
    id: &str,
    name: &str,
    email: &str,
    signup_date: NaiveDateTime,
    subscription_status: SubscriptionStatus,
) -> User {
    User {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        avatar: PLACEHOLDER_AVATAR.to_string(),
        signup_date,
        subscription_status,
    }
}

fn transaction(
    id: &str,
    date: NaiveDateTime,
    user_name: &str,
    payment_method: PaymentMethod,
    amount: i64,
    status: TransactionStatus,
) -> Transaction {
    Transaction {
        id: id.to_string(),
        date,
        user_name: user_name.to_string(),
        payment_method,
        amount: Decimal::new(amount, 0),
        currency: "USD".to_string(),
        status,
    }
}

/// Ten registered users, newest signup first
pub fn users() -> Vec<User> {
    use SubscriptionStatus::{Active, Inactive};

    vec![
        user("1", "Ricardo Mathew", "ricardomathew@gmail.com", at(8, 8, 10, 30), Active),
        user("2", "Ricardo Mathew", "ricardomathew@gmail.com", at(8, 7, 10, 30), Active),
        user("3", "Ricardo Mathew", "ricardomathew@gmail.com", at(8, 6, 10, 30), Active),
        user("4", "John Smith", "smithjohn@gmail.com", at(8, 5, 10, 30), Active),
        user("5", "John Smith", "smithjohn@gmail.com", at(8, 4, 10, 30), Active),
        user("6", "Dyne Orwell", "dyneorwell@hotmail.com", at(8, 1, 10, 30), Active),
        user("7", "Dyne Orwell", "dyneorwell@hotmail.com", at(8, 1, 10, 30), Inactive),
        user("8", "Sarah Johnson", "sarah.johnson@gmail.com", at(7, 31, 15, 45), Active),
        user("9", "Mike Wilson", "mike.wilson@yahoo.com", at(7, 30, 9, 20), Inactive),
        user("10", "Emma Davis", "emma.davis@outlook.com", at(7, 29, 14, 10), Active),
    ]
}

/// Ten ledger transactions, newest first
pub fn transactions() -> Vec<Transaction> {
    use PaymentMethod::{BankTransfer, Stripe};
    use TransactionStatus::{Failed, Paid, Pending};

    vec![
        transaction("TXN-1001", at(8, 8, 10, 30), "Ricardo Mathew", Stripe, 500, Paid),
        transaction("TXN-1002", at(8, 7, 10, 30), "John Smith", Stripe, 1200, Paid),
        transaction("TXN-1003", at(8, 6, 10, 30), "Ricardo Mathew", Stripe, 1200, Paid),
        transaction("TXN-1004", at(8, 5, 10, 30), "John Smith", Stripe, 1200, Pending),
        transaction("TXN-1005", at(8, 4, 10, 30), "Ricardo Mathew", BankTransfer, 500, Pending),
        transaction("TXN-1006", at(8, 1, 10, 30), "John Smith", Stripe, 500, Pending),
        transaction("TXN-1007", at(8, 1, 10, 30), "Ricardo Mathew", BankTransfer, 500, Failed),
        transaction("TXN-1008", at(7, 31, 10, 30), "Sarah Wilson", Stripe, 750, Paid),
        transaction("TXN-1009", at(7, 30, 10, 30), "Mike Johnson", BankTransfer, 300, Failed),
        transaction("TXN-1010", at(7, 29, 10, 30), "Emma Davis", Stripe, 900, Paid),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashweb_core::ListItem;
    use std::collections::HashSet;

    #[test]
    fn test_seed_ids_are_unique() {
        let ids: HashSet<String> = users().iter().map(|u| u.id().to_string()).collect();
        assert_eq!(ids.len(), 10);
        let ids: HashSet<String> = transactions().iter().map(|t| t.id().to_string()).collect();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn test_seed_dates_are_real() {
        assert_eq!(users()[0].signup_display(), "08 Aug, 10:30");
        assert_eq!(users()[9].signup_display(), "29 Jul, 14:10");
        assert_eq!(transactions()[7].date_display(), "31 Jul, 10:30");
    }

    #[test]
    fn test_inactive_users() {
        let inactive: Vec<String> = users()
            .into_iter()
            .filter(|u| !u.is_active())
            .map(|u| u.id)
            .collect();
        assert_eq!(inactive, vec!["7".to_string(), "9".to_string()]);
    }

    #[test]
    fn test_transaction_amounts() {
        let amounts: Vec<String> = transactions().iter().map(|t| t.amount_display()).collect();
        assert_eq!(amounts[1], "1200.00 USD");
        assert_eq!(amounts[8], "300.00 USD");
    }
}

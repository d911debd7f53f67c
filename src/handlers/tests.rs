//! Unit tests for commands and the history bookkeeping they drive.
//!
//! Database round trips live in `tests/integration_history.rs`.

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::{Amount, Currency, HistoryDelta, HistoryKey, TransactionType};
use crate::handlers::{
    CreateCategoryCommand, CreateTransactionCommand, DeleteCategoryCommand,
    DeleteTransactionCommand, UpdateCurrencyCommand,
};

fn amount(cents: i64) -> Amount {
    Amount::new(Decimal::new(cents, 2)).unwrap()
}

// =========================================================================
// Commands
// =========================================================================

#[test]
fn test_create_category_command_defaults() {
    let cmd = CreateCategoryCommand::new("Groceries".to_string(), TransactionType::Expense);
    assert_eq!(cmd.name, "Groceries");
    assert!(cmd.icon.is_empty());

    let cmd = cmd.with_icon("🛒".to_string());
    assert_eq!(cmd.icon, "🛒");
}

#[test]
fn test_delete_category_command_from_composite_id() {
    let cmd = DeleteCategoryCommand::new("Rent|expense".parse().unwrap());
    assert_eq!(cmd.id.name, "Rent");
    assert_eq!(cmd.id.kind, TransactionType::Expense);
}

#[test]
fn test_create_transaction_command_with_description() {
    let date = Utc.with_ymd_and_hms(2024, 2, 29, 12, 0, 0).unwrap();
    let cmd = CreateTransactionCommand::new(
        amount(4200),
        date,
        TransactionType::Income,
        "Salary".to_string(),
    );
    assert!(cmd.description.is_empty());

    let cmd = cmd.with_description("February".to_string());
    assert_eq!(cmd.description, "February");
    assert_eq!(cmd.amount.value(), Decimal::new(4200, 2));
}

#[test]
fn test_delete_transaction_and_currency_commands() {
    let id = Uuid::new_v4();
    assert_eq!(DeleteTransactionCommand::new(id).transaction_id, id);

    let cmd = UpdateCurrencyCommand::new("GBP".parse::<Currency>().unwrap());
    assert_eq!(cmd.currency.code(), "GBP");
}

#[test]
fn test_update_currency_command_from_json() {
    let cmd: UpdateCurrencyCommand = serde_json::from_str(r#"{"currency":"EUR"}"#).unwrap();
    assert_eq!(cmd.currency.code(), "EUR");
    assert_eq!(cmd.currency.locale(), "de-DE");

    assert!(serde_json::from_str::<UpdateCurrencyCommand>(r#"{"currency":"DOGE"}"#).is_err());
}

// =========================================================================
// History bookkeeping
// =========================================================================

/// In-memory model of the two history tables, updated the same way the
/// projection updates them.
#[derive(Default)]
struct HistoryModel {
    month: HashMap<(i32, i32, i32), HistoryDelta>,
    year: HashMap<(i32, i32), HistoryDelta>,
}

impl HistoryModel {
    fn apply(&mut self, key: HistoryKey, delta: HistoryDelta) {
        let day = self.month.entry((key.year, key.month, key.day)).or_default();
        day.income += delta.income;
        day.expense += delta.expense;

        let month = self.year.entry((key.year, key.month)).or_default();
        month.income += delta.income;
        month.expense += delta.expense;
    }
}

#[test]
fn test_history_matches_transactions_after_create_and_delete() {
    let jan_31 = Utc.with_ymd_and_hms(2024, 1, 31, 22, 0, 0).unwrap();
    let feb_1 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();

    let recorded = vec![
        (jan_31, TransactionType::Income, amount(100_000)),
        (jan_31, TransactionType::Expense, amount(2_550)),
        (feb_1, TransactionType::Expense, amount(1_000)),
    ];

    let mut model = HistoryModel::default();
    for (date, kind, value) in &recorded {
        model.apply(HistoryKey::from_date(*date), HistoryDelta::record(*kind, value));
    }

    let jan = model.year[&(2024, 1)];
    assert_eq!(jan.income, Decimal::new(100_000, 2));
    assert_eq!(jan.expense, Decimal::new(2_550, 2));
    assert_eq!(model.month[&(2024, 2, 1)].expense, Decimal::new(1_000, 2));

    // Delete the January expense
    let (date, kind, value) = &recorded[1];
    model.apply(HistoryKey::from_date(*date), HistoryDelta::reverse(*kind, value));

    let jan = model.year[&(2024, 1)];
    assert_eq!(jan.income, Decimal::new(100_000, 2));
    assert_eq!(jan.expense, Decimal::ZERO);
    assert_eq!(model.month[&(2024, 1, 31)].expense, Decimal::ZERO);
    assert_eq!(model.year[&(2024, 2)].expense, Decimal::new(1_000, 2));
}

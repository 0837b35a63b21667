use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use chrono::NaiveDate;

use crate::{
    ledger::{month_bounds, parse_date, Ledger, TransactionFilter},
    registry::UserRegistry,
    storage::{storage_key, LedgerStorage},
    CoreError,
};
use mtrack_domain::{Transaction, TransactionType, DEFAULT_CATEGORY};

#[derive(Default)]
struct MemoryStorage {
    records: Mutex<HashMap<String, Vec<Transaction>>>,
    saves: Mutex<usize>,
}

impl MemoryStorage {
    fn with_record(user: &str, transactions: Vec<Transaction>) -> Self {
        let storage = Self::default();
        storage
            .records
            .lock()
            .unwrap()
            .insert(storage_key(user), transactions);
        storage
    }

    fn stored(&self, user: &str) -> Option<Vec<Transaction>> {
        self.records.lock().unwrap().get(&storage_key(user)).cloned()
    }

    fn save_count(&self) -> usize {
        *self.saves.lock().unwrap()
    }
}

impl LedgerStorage for MemoryStorage {
    fn save(&self, user: &str, transactions: &[Transaction]) -> Result<(), CoreError> {
        *self.saves.lock().unwrap() += 1;
        self.records
            .lock()
            .unwrap()
            .insert(storage_key(user), transactions.to_vec());
        Ok(())
    }

    fn load(&self, user: &str) -> Result<Vec<Transaction>, CoreError> {
        Ok(self.stored(user).unwrap_or_default())
    }
}

struct BrokenStorage;

impl LedgerStorage for BrokenStorage {
    fn save(&self, _user: &str, _transactions: &[Transaction]) -> Result<(), CoreError> {
        Err(CoreError::persistence("disk full"))
    }

    fn load(&self, _user: &str) -> Result<Vec<Transaction>, CoreError> {
        Err(CoreError::persistence("record is malformed"))
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn memory_ledger(user: &str) -> (Ledger, Arc<MemoryStorage>) {
    let storage = Arc::new(MemoryStorage::default());
    let ledger = Ledger::open(user, storage.clone());
    (ledger, storage)
}

#[test]
fn add_negates_positive_expenses() {
    let (mut ledger, _storage) = memory_ledger("Self");
    ledger
        .add(date(2024, 1, 15), "Groceries", 50.0, TransactionType::Expense, Some("Food"))
        .expect("add expense");
    assert_eq!(ledger.transactions()[0].amount(), -50.0);
}

#[test]
fn add_makes_negative_income_positive() {
    let (mut ledger, _storage) = memory_ledger("Self");
    ledger
        .add(date(2024, 1, 20), "Refund", -12.5, TransactionType::Income, None)
        .expect("add income");
    let stored = &ledger.transactions()[0];
    assert_eq!(stored.amount(), 12.5);
    assert_eq!(stored.category(), DEFAULT_CATEGORY);
}

#[test]
fn add_writes_full_sequence_through() {
    let (mut ledger, storage) = memory_ledger("Father");
    ledger
        .add(date(2024, 1, 1), "Rent", 900.0, TransactionType::Expense, Some("Rent"))
        .unwrap();
    ledger
        .add(date(2024, 1, 2), "Salary", 3000.0, TransactionType::Income, None)
        .unwrap();

    assert_eq!(storage.save_count(), 2);
    assert_eq!(storage.stored("Father").unwrap(), ledger.transactions().to_vec());
}

#[test]
fn add_rejects_invalid_input_without_state_change() {
    let (mut ledger, storage) = memory_ledger("Self");

    let blank = ledger.add(date(2024, 1, 1), "   ", 5.0, TransactionType::Expense, None);
    assert!(matches!(blank, Err(CoreError::Validation(_))));

    let nan = ledger.add(date(2024, 1, 1), "Coffee", f64::NAN, TransactionType::Expense, None);
    assert!(matches!(nan, Err(CoreError::Validation(_))));

    let empty_category =
        ledger.add(date(2024, 1, 1), "Coffee", 3.0, TransactionType::Expense, Some(" "));
    assert!(matches!(empty_category, Err(CoreError::Validation(_))));

    let bad_date =
        ledger.add_parsed("2024-13-01", "Coffee", 3.0, TransactionType::Expense, None);
    assert!(matches!(bad_date, Err(CoreError::Validation(_))));

    assert!(ledger.is_empty());
    assert_eq!(storage.save_count(), 0);
}

#[test]
fn failed_save_keeps_in_memory_append() {
    let mut ledger = Ledger::open("Self", Arc::new(BrokenStorage));
    let result = ledger.add(date(2024, 2, 1), "Lunch", 9.0, TransactionType::Expense, Some("Food"));

    assert!(matches!(result, Err(CoreError::Persistence(_))));
    assert_eq!(ledger.len(), 1);
    assert_eq!(ledger.transactions()[0].amount(), -9.0);
}

#[test]
fn failed_load_starts_empty_with_warning() {
    let ledger = Ledger::open("Self", Arc::new(BrokenStorage));
    assert!(ledger.is_empty());
    assert_eq!(ledger.warnings().len(), 1);
    assert!(ledger.warnings()[0].contains("malformed"));
}

#[test]
fn open_loads_existing_record_and_flags_inconsistencies() {
    let records = vec![
        Transaction::new(date(2024, 3, 1), "Paycheck", 100.0, TransactionType::Income, "General"),
        Transaction::new(date(2024, 3, 2), "Odd", 7.0, TransactionType::Expense, "Food"),
    ];
    let storage = Arc::new(MemoryStorage::with_record("Mary Ann", records.clone()));
    let ledger = Ledger::open("Mary Ann", storage);

    assert_eq!(ledger.transactions(), records.as_slice());
    assert_eq!(ledger.warnings().len(), 1);
}

#[test]
fn scenario_balance_summary() {
    let (mut ledger, _storage) = memory_ledger("Self");
    ledger
        .add_parsed("2024-01-15", "Groceries", 50.00, TransactionType::Expense, Some("Food"))
        .unwrap();
    ledger
        .add_parsed("2024-01-20", "Salary", 2000.00, TransactionType::Income, Some("General"))
        .unwrap();

    let summary = ledger.balance_summary();
    assert_eq!(summary.total_income, 2000.0);
    assert_eq!(summary.total_expenses, 50.0);
    assert_eq!(summary.current_balance, 1950.0);
    assert_eq!(summary.count, 2);
}

#[test]
fn balance_is_income_minus_expenses() {
    let (mut ledger, _storage) = memory_ledger("Self");
    let entries = [
        (12.75, TransactionType::Expense),
        (-40.0, TransactionType::Income),
        (0.0, TransactionType::Expense),
        (-3.25, TransactionType::Expense),
        (1000.0, TransactionType::Income),
    ];
    for (index, (amount, kind)) in entries.into_iter().enumerate() {
        ledger
            .add(date(2024, 4, 1 + index as u32), "entry", amount, kind, None)
            .unwrap();
    }

    let summary = ledger.balance_summary();
    assert!(summary.total_income >= 0.0);
    assert!(summary.total_expenses >= 0.0);
    assert_eq!(summary.total_income, 1040.0);
    assert_eq!(summary.total_expenses, 16.0);
    assert_eq!(
        summary.current_balance,
        summary.total_income - summary.total_expenses
    );
    assert_eq!(summary.count, 5);
}

fn seeded_ledger() -> Ledger {
    let (mut ledger, _storage) = memory_ledger("Self");
    let rows = [
        ("2024-01-10", "Bus pass", 60.0, TransactionType::Expense, "Transportation"),
        ("2024-03-05", "Salary", 2500.0, TransactionType::Income, "General"),
        ("2024-02-14", "Dinner", 80.0, TransactionType::Expense, "Food"),
        ("2024-03-05", "Groceries", 45.0, TransactionType::Expense, "Food"),
        ("2024-02-01", "Bonus", 300.0, TransactionType::Income, "General"),
    ];
    for (day, description, amount, kind, category) in rows {
        ledger
            .add_parsed(day, description, amount, kind, Some(category))
            .unwrap();
    }
    ledger
}

#[test]
fn query_without_filters_sorts_newest_first() {
    let ledger = seeded_ledger();
    let results = ledger.query(&TransactionFilter::new());
    assert_eq!(results.len(), 5);
    assert!(results.windows(2).all(|pair| pair[0].date() >= pair[1].date()));
    // same-date entries keep insertion order
    assert_eq!(results[0].description(), "Salary");
    assert_eq!(results[1].description(), "Groceries");
}

#[test]
fn query_date_bounds_are_inclusive() {
    let ledger = seeded_ledger();
    let start = date(2024, 2, 14);
    let from = ledger.query(&TransactionFilter::new().from_date(start));
    assert!(from.iter().all(|txn| txn.date() >= start));
    assert_eq!(from.len(), 3);

    let end = date(2024, 2, 1);
    let to = ledger.query(&TransactionFilter::new().to_date(end));
    assert!(to.iter().all(|txn| txn.date() <= end));
    assert_eq!(to.len(), 2);
}

#[test]
fn query_filters_by_type() {
    let ledger = seeded_ledger();
    let kind: TransactionType = "INCOME".parse().unwrap();
    let income = ledger.query(&TransactionFilter::new().of_type(kind));
    assert_eq!(income.len(), 2);
    assert!(income.iter().all(|txn| txn.amount() > 0.0));

    let none = ledger.query(
        &TransactionFilter::new()
            .from_date(date(2025, 1, 1))
            .of_type(TransactionType::Expense),
    );
    assert!(none.is_empty());
}

#[test]
fn category_summary_is_idempotent() {
    let ledger = seeded_ledger();
    let first = ledger.category_summary();
    let second = ledger.category_summary();
    assert_eq!(first, second);

    let food = first["Food"];
    assert_eq!(food.expenses, 125.0);
    assert_eq!(food.count, 2);
    assert_eq!(first["General"].income, 2800.0);
    assert!(!first.contains_key("Rent"));
}

#[test]
fn monthly_summary_covers_one_calendar_month() {
    let (mut ledger, _storage) = memory_ledger("Self");
    ledger
        .add_parsed("2024-01-31", "Late January", 10.0, TransactionType::Expense, None)
        .unwrap();
    ledger
        .add_parsed("2024-02-01", "Rent", 700.0, TransactionType::Expense, Some("Rent"))
        .unwrap();
    ledger
        .add_parsed("2024-02-29", "Salary", 2000.0, TransactionType::Income, None)
        .unwrap();
    ledger
        .add_parsed("2024-03-01", "Next month", 5.0, TransactionType::Expense, None)
        .unwrap();

    let february = ledger.monthly_summary(2024, 2).unwrap();
    assert_eq!(february.count, 2);
    assert_eq!(february.income, 2000.0);
    assert_eq!(february.expenses, 700.0);
    assert_eq!(february.net, 1300.0);
    assert_eq!(february.label(), "2024-02");
}

#[test]
fn month_bounds_handle_december_and_invalid_months() {
    assert_eq!(
        month_bounds(2023, 12).unwrap(),
        (date(2023, 12, 1), date(2023, 12, 31))
    );
    assert!(matches!(month_bounds(2024, 13), Err(CoreError::Validation(_))));
    assert!(matches!(month_bounds(2024, 0), Err(CoreError::Validation(_))));
}

#[test]
fn parse_date_accepts_iso_only() {
    assert_eq!(parse_date(" 2024-01-15 ").unwrap(), date(2024, 1, 15));
    assert!(parse_date("15/01/2024").is_err());
    assert!(parse_date("2023-02-29").is_err());
}

#[test]
fn registry_returns_same_ledger_instance() {
    let mut registry = UserRegistry::new(Arc::new(MemoryStorage::default()));
    let first: *const Ledger = registry.select_or_create("Alice");
    let second: *const Ledger = registry.select_or_create("Alice");
    assert!(std::ptr::eq(first, second));
    assert_eq!(registry.len(), 1);
}

#[test]
fn registry_names_are_case_sensitive() {
    let mut registry = UserRegistry::new(Arc::new(MemoryStorage::default()));
    registry.select_or_create("alice");
    registry.select_or_create("Alice");
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["alice", "Alice"]);
}

#[test]
fn registry_seeds_defaults_and_loads_records() {
    let records = vec![Transaction::normalized(
        date(2024, 1, 1),
        "Pension",
        1200.0,
        TransactionType::Income,
        DEFAULT_CATEGORY,
    )];
    let storage = Arc::new(MemoryStorage::with_record("Father", records));
    let registry = UserRegistry::with_users(storage, ["Father", "Self", "", "Father"]);

    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["Father", "Self"]);
    assert_eq!(registry.get("Father").map(Ledger::len), Some(1));
    assert_eq!(registry.get("Self").map(Ledger::len), Some(0));
}

#[test]
fn register_rejects_empty_and_duplicate_names() {
    let mut registry = UserRegistry::with_users(Arc::new(MemoryStorage::default()), ["Self"]);

    assert!(matches!(registry.register("  "), Err(CoreError::Validation(_))));
    assert!(matches!(registry.register("Self"), Err(CoreError::Validation(_))));
    assert_eq!(registry.len(), 1);

    let ledger = registry.register(" Bob ").expect("register new user");
    assert_eq!(ledger.user(), "Bob");
    assert_eq!(registry.len(), 2);
}

#[test]
fn select_tracks_active_user() {
    let mut registry =
        UserRegistry::with_users(Arc::new(MemoryStorage::default()), ["Father", "Self"]);
    assert!(matches!(registry.active_mut(), Err(CoreError::NoActiveUser)));
    assert!(matches!(registry.select("Nobody"), Err(CoreError::UnknownUser(_))));

    registry.select("Self").expect("select user");
    registry
        .active_mut()
        .unwrap()
        .add(date(2024, 6, 1), "Book", 20.0, TransactionType::Expense, Some("Education"))
        .unwrap();

    assert_eq!(registry.active().map(Ledger::user), Some("Self"));
    assert_eq!(registry.get("Self").map(Ledger::len), Some(1));
    assert_eq!(registry.get("Father").map(Ledger::len), Some(0));
}

#[test]
fn register_rejects_names_sharing_a_record() {
    let storage = Arc::new(MemoryStorage::default());
    let mut registry = UserRegistry::with_users(storage.clone(), ["Father", "Self"]);
    registry
        .select("Self")
        .unwrap()
        .add(date(2024, 1, 20), "Salary", 2000.0, TransactionType::Income, None)
        .unwrap();

    assert!(matches!(registry.register("self"), Err(CoreError::Validation(_))));
    assert!(matches!(registry.register("SELF"), Err(CoreError::Validation(_))));
    assert_eq!(registry.len(), 2);

    let on_disk = storage.stored("Self").expect("stored record");
    assert_eq!(registry.get("Self").map(Ledger::transactions), Some(&on_disk[..]));
}

#[test]
fn register_rejects_names_that_cannot_be_stored() {
    let storage = Arc::new(MemoryStorage::default());
    let mut registry = UserRegistry::new(storage.clone());

    for name in ["../x", "a/b", "..", "."] {
        assert!(
            matches!(registry.register(name), Err(CoreError::Validation(_))),
            "{name} should be rejected"
        );
    }
    assert!(registry.is_empty());
    assert_eq!(storage.save_count(), 0);
    assert!(storage.records.lock().unwrap().is_empty());
}

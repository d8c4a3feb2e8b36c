//! Record store for the household ledger: owns the in-memory [`Document`],
//! loads it once at startup, and rewrites the whole JSON file after every
//! mutation. Frontends call the CRUD operations here and re-render from
//! memory; nothing else touches the file.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use models::{Account, AccountType, Bill, Category, CreditCard, Document, Property, Todo, TodoStatus};

pub mod dates;
pub mod error;
pub mod money;
pub mod summary;

pub use crate::dates::{is_overdue, normalize_due_date};
pub use crate::error::{Result, StoreError};
pub use crate::money::{credit_usage, format_currency, parse_amount};
pub use crate::summary::{AccountSummary, BillsSummary, CreditSummary, PropertySummary};

/// Owns the document and its backing file. All collections are addressed
/// positionally (0-based, insertion order); callers are expected to supply
/// indices from the most recent load, and an out-of-range index on
/// update/delete/toggle is a programming error that panics.
pub struct RecordStore {
    path: PathBuf,
    doc: Document,
}

impl RecordStore {
    /// Loads the document from `path`, or seeds a fresh one (four default
    /// categories, empty collections) and writes it when the file does not
    /// exist yet. Derived fields are recomputed on load so the formula
    /// invariants hold regardless of what was on disk.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        if !path.exists() {
            let store = RecordStore {
                path,
                doc: Document::seeded(),
            };
            store.persist()?;
            debug!(path = %store.path.display(), "seeded new data file");
            return Ok(store);
        }

        let raw = fs::read_to_string(&path)?;
        let mut doc: Document = serde_json::from_str(&raw)?;
        doc.recompute_derived();
        debug!(
            path = %path.display(),
            todos = doc.todos.len(),
            bills = doc.bills.len(),
            "loaded data file"
        );
        Ok(RecordStore { path, doc })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Rewrites the whole document to disk. On failure the in-memory state
    /// keeps the pending mutation; the caller surfaces the error.
    fn persist(&self) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.doc)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), "persisted document");
        Ok(())
    }

    // ---- Todos ----

    pub fn add_todo(
        &mut self,
        task: &str,
        category: &str,
        status: TodoStatus,
        due_date: &str,
    ) -> Result<usize> {
        let task = required("task", task)?;
        self.doc.todos.push(Todo {
            task: task.to_string(),
            category: category.to_string(),
            status,
            due_date: normalize_due_date(due_date),
            completed: false,
        });
        self.persist()?;
        Ok(self.doc.todos.len() - 1)
    }

    /// Replaces the todo at `index`, preserving its `completed` flag.
    pub fn update_todo(
        &mut self,
        index: usize,
        task: &str,
        category: &str,
        status: TodoStatus,
        due_date: &str,
    ) -> Result<()> {
        let task = required("task", task)?;
        let completed = self.doc.todos[index].completed;
        self.doc.todos[index] = Todo {
            task: task.to_string(),
            category: category.to_string(),
            status,
            due_date: normalize_due_date(due_date),
            completed,
        };
        self.persist()
    }

    pub fn delete_todo(&mut self, index: usize) -> Result<()> {
        self.doc.todos.remove(index);
        self.persist()
    }

    /// Flips the `completed` flag and returns the new value.
    pub fn toggle_todo(&mut self, index: usize) -> Result<bool> {
        self.doc.todos[index].completed = !self.doc.todos[index].completed;
        self.persist()?;
        Ok(self.doc.todos[index].completed)
    }

    // ---- Categories ----

    /// Appends a category unless the name is empty or already present
    /// case-insensitively; duplicates are silently ignored. Returns whether
    /// anything was added.
    pub fn add_category(&mut self, name: &str, color: &str) -> Result<bool> {
        if name.is_empty() || self.doc.has_category(name) {
            return Ok(false);
        }
        self.doc.categories.push(Category {
            name: name.to_string(),
            color: color.to_string(),
        });
        self.persist()?;
        Ok(true)
    }

    // ---- Credit cards ----

    pub fn add_card(
        &mut self,
        owner: &str,
        card_name: &str,
        limit: &str,
        balance: &str,
        payment: &str,
        due_date: &str,
    ) -> Result<usize> {
        let limit = numeric("limit", limit)?;
        let balance = numeric("balance", balance)?;
        let payment = numeric("payment", payment)?;
        let owner = required("owner", owner)?;
        let card_name = required("card name", card_name)?;

        let mut card = CreditCard {
            owner: owner.to_string(),
            card_name: card_name.to_string(),
            limit,
            available: 0.0,
            balance,
            payment,
            // Card due dates are free text ("15th of the month"), not
            // calendar dates, so no normalization here.
            due_date: due_date.to_string(),
        };
        card.recompute_derived();
        self.doc.credit_cards.push(card);
        self.persist()?;
        Ok(self.doc.credit_cards.len() - 1)
    }

    pub fn update_card(
        &mut self,
        index: usize,
        owner: &str,
        card_name: &str,
        limit: &str,
        balance: &str,
        payment: &str,
        due_date: &str,
    ) -> Result<()> {
        let limit = numeric("limit", limit)?;
        let balance = numeric("balance", balance)?;
        let payment = numeric("payment", payment)?;
        let owner = required("owner", owner)?;
        let card_name = required("card name", card_name)?;

        let mut card = CreditCard {
            owner: owner.to_string(),
            card_name: card_name.to_string(),
            limit,
            available: 0.0,
            balance,
            payment,
            due_date: due_date.to_string(),
        };
        card.recompute_derived();
        self.doc.credit_cards[index] = card;
        self.persist()
    }

    pub fn delete_card(&mut self, index: usize) -> Result<()> {
        self.doc.credit_cards.remove(index);
        self.persist()
    }

    // ---- Properties ----

    pub fn add_property(&mut self, address: &str, value: &str, loan: &str) -> Result<usize> {
        let value = numeric("value", value)?;
        let loan = numeric("loan", loan)?;
        let address = required("address", address)?;

        let mut prop = Property {
            address: address.to_string(),
            value,
            loan,
            equity: 0.0,
            equity_pct: 0.0,
        };
        prop.recompute_derived();
        self.doc.properties.push(prop);
        self.persist()?;
        Ok(self.doc.properties.len() - 1)
    }

    pub fn update_property(
        &mut self,
        index: usize,
        address: &str,
        value: &str,
        loan: &str,
    ) -> Result<()> {
        let value = numeric("value", value)?;
        let loan = numeric("loan", loan)?;
        let address = required("address", address)?;

        let mut prop = Property {
            address: address.to_string(),
            value,
            loan,
            equity: 0.0,
            equity_pct: 0.0,
        };
        prop.recompute_derived();
        self.doc.properties[index] = prop;
        self.persist()
    }

    pub fn delete_property(&mut self, index: usize) -> Result<()> {
        self.doc.properties.remove(index);
        self.persist()
    }

    // ---- Accounts ----

    pub fn add_account(
        &mut self,
        name: &str,
        kind: AccountType,
        institution: &str,
        balance: &str,
    ) -> Result<usize> {
        let balance = numeric("balance", balance)?;
        let name = required("account name", name)?;

        self.doc.accounts.push(Account {
            name: name.to_string(),
            kind,
            institution: institution.to_string(),
            balance,
        });
        self.persist()?;
        Ok(self.doc.accounts.len() - 1)
    }

    pub fn update_account(
        &mut self,
        index: usize,
        name: &str,
        kind: AccountType,
        institution: &str,
        balance: &str,
    ) -> Result<()> {
        let balance = numeric("balance", balance)?;
        let name = required("account name", name)?;

        self.doc.accounts[index] = Account {
            name: name.to_string(),
            kind,
            institution: institution.to_string(),
            balance,
        };
        self.persist()
    }

    pub fn delete_account(&mut self, index: usize) -> Result<()> {
        self.doc.accounts.remove(index);
        self.persist()
    }

    // ---- Bills ----

    pub fn add_bill(&mut self, name: &str, amount: &str, due_date: &str) -> Result<usize> {
        let amount = numeric("amount", amount)?;
        let name = required("bill name", name)?;

        self.doc.bills.push(Bill {
            name: name.to_string(),
            amount,
            due_date: normalize_due_date(due_date),
            paid: false,
        });
        self.persist()?;
        Ok(self.doc.bills.len() - 1)
    }

    /// Replaces the bill at `index`, preserving its `paid` flag.
    pub fn update_bill(
        &mut self,
        index: usize,
        name: &str,
        amount: &str,
        due_date: &str,
    ) -> Result<()> {
        let amount = numeric("amount", amount)?;
        let name = required("bill name", name)?;

        let paid = self.doc.bills[index].paid;
        self.doc.bills[index] = Bill {
            name: name.to_string(),
            amount,
            due_date: normalize_due_date(due_date),
            paid,
        };
        self.persist()
    }

    pub fn delete_bill(&mut self, index: usize) -> Result<()> {
        self.doc.bills.remove(index);
        self.persist()
    }

    /// Flips the `paid` flag and returns the new value.
    pub fn toggle_bill(&mut self, index: usize) -> Result<bool> {
        self.doc.bills[index].paid = !self.doc.bills[index].paid;
        self.persist()?;
        Ok(self.doc.bills[index].paid)
    }

    // ---- Summaries ----

    pub fn credit_summary(&self) -> CreditSummary {
        summary::credit_summary(&self.doc.credit_cards)
    }

    pub fn property_summary(&self) -> PropertySummary {
        summary::property_summary(&self.doc.properties)
    }

    pub fn account_summary(&self) -> AccountSummary {
        summary::account_summary(&self.doc.accounts)
    }

    pub fn bills_summary(&self) -> BillsSummary {
        summary::bills_summary(&self.doc.bills)
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    if value.is_empty() {
        Err(StoreError::MissingField(field))
    } else {
        Ok(value)
    }
}

fn numeric(field: &'static str, value: &str) -> Result<f64> {
    parse_amount(Some(value)).ok_or_else(|| StoreError::InvalidNumber {
        field,
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn open_temp() -> (tempfile::TempDir, RecordStore) {
        let dir = tempdir().unwrap();
        let store = RecordStore::open(dir.path().join("data.json")).unwrap();
        (dir, store)
    }

    #[test]
    fn test_open_seeds_default_categories_and_writes_file() {
        let (dir, store) = open_temp();
        assert_eq!(store.document().categories.len(), 4);
        assert!(store.document().has_category("Personal"));
        assert!(dir.path().join("data.json").exists());

        // A second open must read back the same document
        let reopened = RecordStore::open(dir.path().join("data.json")).unwrap();
        assert_eq!(reopened.document(), store.document());
    }

    #[test]
    fn test_round_trip_after_mutations() {
        let (dir, mut store) = open_temp();
        store
            .add_todo("mow lawn", "Home", TodoStatus::NotStarted, "2030-05-01")
            .unwrap();
        store
            .add_card("Ann", "Visa", "5000", "1200", "50", "15th")
            .unwrap();
        store.add_property("12 Elm St", "400000", "300000").unwrap();
        store
            .add_account("Everyday", AccountType::Checking, "Big Bank", "1200")
            .unwrap();
        store.add_bill("Internet", "60", "2030-01-01").unwrap();

        let reopened = RecordStore::open(dir.path().join("data.json")).unwrap();
        assert_eq!(reopened.document(), store.document());
    }

    #[test]
    fn test_add_todo_requires_task() {
        let (dir, mut store) = open_temp();
        let err = store
            .add_todo("", "Home", TodoStatus::NotStarted, "")
            .unwrap_err();
        assert!(err.is_validation());
        assert!(store.document().todos.is_empty());

        // No mutation means no write either
        let reopened = RecordStore::open(dir.path().join("data.json")).unwrap();
        assert!(reopened.document().todos.is_empty());
    }

    #[test]
    fn test_add_todo_coerces_bad_due_date() {
        let (_dir, mut store) = open_temp();
        let idx = store
            .add_todo("call plumber", "Home", TodoStatus::InProgress, "next tuesday")
            .unwrap();
        assert_eq!(store.document().todos[idx].due_date, "");
    }

    #[test]
    fn test_update_todo_preserves_completed() {
        let (_dir, mut store) = open_temp();
        let idx = store
            .add_todo("mow lawn", "Home", TodoStatus::NotStarted, "")
            .unwrap();
        assert!(store.toggle_todo(idx).unwrap());

        store
            .update_todo(idx, "mow lawn weekly", "Home", TodoStatus::OnHold, "")
            .unwrap();
        let todo = &store.document().todos[idx];
        assert_eq!(todo.task, "mow lawn weekly");
        assert_eq!(todo.status, TodoStatus::OnHold);
        assert!(todo.completed);
    }

    #[test]
    fn test_category_dedup_is_case_insensitive() {
        let (_dir, mut store) = open_temp();
        assert!(store.add_category("Chores", "#ABCDEF").unwrap());
        let before = store.document().categories.clone();

        assert!(!store.add_category("chores", "#123456").unwrap());
        assert!(!store.add_category("CHORES", "#123456").unwrap());
        assert!(!store.add_category("", "#123456").unwrap());
        assert_eq!(store.document().categories, before);
    }

    #[test]
    fn test_card_available_invariant_on_add_and_update() {
        let (_dir, mut store) = open_temp();
        let idx = store
            .add_card("Ann", "Visa", "5000", "1200", "50", "")
            .unwrap();
        assert_eq!(store.document().credit_cards[idx].available, 3800.0);

        store
            .update_card(idx, "Ann", "Visa", "6000", "1500", "75", "")
            .unwrap();
        assert_eq!(store.document().credit_cards[idx].available, 4500.0);
    }

    #[test]
    fn test_card_rejects_non_numeric_limit() {
        let (_dir, mut store) = open_temp();
        let err = store
            .add_card("Ann", "Visa", "lots", "1200", "50", "")
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidNumber { field: "limit", .. }));
        assert!(store.document().credit_cards.is_empty());
    }

    #[test]
    fn test_property_equity_invariant_on_add_and_update() {
        let (_dir, mut store) = open_temp();
        let idx = store.add_property("12 Elm St", "400000", "300000").unwrap();
        let prop = &store.document().properties[idx];
        assert_eq!(prop.equity, 100_000.0);
        assert_eq!(prop.equity_pct, 25.0);

        store.update_property(idx, "12 Elm St", "0", "300000").unwrap();
        let prop = &store.document().properties[idx];
        assert_eq!(prop.equity, -300_000.0);
        assert_eq!(prop.equity_pct, 0.0);
    }

    #[test]
    fn test_update_bill_preserves_paid() {
        let (_dir, mut store) = open_temp();
        let idx = store.add_bill("Internet", "60", "").unwrap();
        assert!(store.toggle_bill(idx).unwrap());

        store.update_bill(idx, "Internet", "65", "").unwrap();
        let bill = &store.document().bills[idx];
        assert_eq!(bill.amount, 65.0);
        assert!(bill.paid);
    }

    #[test]
    fn test_overdue_bill_end_to_end() {
        let (_dir, mut store) = open_temp();
        let today = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        let idx = store.add_bill("Internet", "60.00", "2023-01-01").unwrap();
        let bill = &store.document().bills[idx];
        assert!(is_overdue(&bill.due_date, bill.paid, today));
        assert_eq!(store.bills_summary().monthly_total, 60.0);

        assert!(store.toggle_bill(idx).unwrap());
        let bill = &store.document().bills[idx];
        assert!(!is_overdue(&bill.due_date, bill.paid, today));
        assert_eq!(store.bills_summary().monthly_total, 0.0);
    }

    #[test]
    fn test_delete_shifts_positions() {
        let (_dir, mut store) = open_temp();
        store.add_bill("Internet", "60", "").unwrap();
        store.add_bill("Water", "40", "").unwrap();
        store.add_bill("Power", "90", "").unwrap();

        store.delete_bill(1).unwrap();
        let names: Vec<&str> = store.document().bills.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Internet", "Power"]);
    }

    #[test]
    fn test_open_recomputes_stale_derived_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        // A file written by hand, with available out of sync
        std::fs::write(
            &path,
            r#"{
                "todos": [],
                "credit_cards": [{
                    "owner": "Ann", "card_name": "Visa",
                    "limit": 5000.0, "available": 9999.0,
                    "balance": 1200.0, "payment": 50.0, "due_date": ""
                }],
                "categories": [], "properties": [], "accounts": [], "bills": []
            }"#,
        )
        .unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.document().credit_cards[0].available, 3800.0);
    }

    #[test]
    fn test_open_propagates_corrupt_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(RecordStore::open(&path), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_legacy_bare_string_categories_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r##"{"categories": ["Chores", {"name": "Home", "color": "#33FF57"}]}"##)
            .unwrap();

        let store = RecordStore::open(&path).unwrap();
        assert_eq!(store.document().categories[0].color, models::LEGACY_CATEGORY_COLOR);
        assert!(store.document().has_category("chores"));
    }
}

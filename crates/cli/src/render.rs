//! Table and summary output for the list commands. Mirrors what the record
//! store exposes; no computation happens here beyond formatting.

use chrono::NaiveDate;
use models::Document;
use store::{format_currency, is_overdue};

/// Marker appended to a due date that is strictly in the past while the
/// record is still open.
const OVERDUE: &str = " (OVERDUE)";

fn due_cell(due_date: &str, settled: bool, today: NaiveDate) -> String {
    if due_date.is_empty() {
        return "no due date".to_string();
    }
    if is_overdue(due_date, settled, today) {
        format!("{}{}", due_date, OVERDUE)
    } else {
        due_date.to_string()
    }
}

pub fn list_todos(doc: &Document, today: NaiveDate) {
    if doc.todos.is_empty() {
        println!("No tasks yet.");
        return;
    }
    for (i, todo) in doc.todos.iter().enumerate() {
        let done = if todo.completed { "x" } else { " " };
        let tint = doc
            .category_color(&todo.category)
            .map(|c| format!(" {}", c))
            .unwrap_or_default();
        println!(
            "{:>3} [{}] {:<12} {:<40} {}{}  due: {}",
            i,
            done,
            todo.status.to_string(),
            todo.task,
            todo.category,
            tint,
            due_cell(&todo.due_date, todo.completed, today),
        );
    }
}

pub fn list_categories(doc: &Document) {
    if doc.categories.is_empty() {
        println!("No categories yet.");
        return;
    }
    for (i, cat) in doc.categories.iter().enumerate() {
        println!("{:>3} {:<20} {}", i, cat.name, cat.color);
    }
}

pub fn list_cards(doc: &Document) {
    for (i, card) in doc.credit_cards.iter().enumerate() {
        println!(
            "{:>3} {:<12} {:<20} balance: {:>12}  limit: {:>12}  available: {:>12}  payment: {:>10}  due: {}",
            i,
            card.owner,
            card.card_name,
            format_currency(card.balance),
            format_currency(card.limit),
            format_currency(card.available),
            format_currency(card.payment),
            if card.due_date.is_empty() { "-" } else { card.due_date.as_str() },
        );
    }

    let summary = store::summary::credit_summary(&doc.credit_cards);
    println!();
    println!("Credit Card Summary:");
    println!("  Total Credit Limit: {}", format_currency(summary.total_limit));
    println!("  Total Used: {}", format_currency(summary.total_balance));
    println!("  Total Usage: {:.2}%", summary.usage_pct);
    println!("  Total Credit Card Debt: {}", format_currency(summary.total_debt));
    for (owner, debt) in &summary.owner_debts {
        println!("  {}'s Debt: {}", owner, format_currency(*debt));
    }
}

pub fn list_properties(doc: &Document) {
    if doc.properties.is_empty() {
        println!("No properties added yet.");
        return;
    }
    for (i, prop) in doc.properties.iter().enumerate() {
        println!(
            "{:>3} {:<30} value: {:>14}  loan: {:>14}  equity: {:>14} ({:.2}%)",
            i,
            prop.address,
            format_currency(prop.value),
            format_currency(prop.loan),
            format_currency(prop.equity),
            prop.equity_pct,
        );
    }

    let summary = store::summary::property_summary(&doc.properties);
    println!();
    println!("Property Summary:");
    println!("  Total Properties: {}", summary.count);
    println!("  Total Estimated Value: {}", format_currency(summary.total_value));
    println!("  Total Equity: {}", format_currency(summary.total_equity));
    println!("  Total Equity Percentage: {:.2}%", summary.equity_pct);
}

pub fn list_accounts(doc: &Document) {
    if doc.accounts.is_empty() {
        println!("No accounts added yet.");
        return;
    }
    for (i, acc) in doc.accounts.iter().enumerate() {
        println!(
            "{:>3} {:<24} {:<12} {:<24} {:>12}",
            i,
            acc.name,
            acc.kind.to_string(),
            acc.institution,
            format_currency(acc.balance),
        );
    }

    let summary = store::summary::account_summary(&doc.accounts);
    println!();
    println!("Account Summary:");
    println!("  Total Accounts: {}", summary.count);
    println!("  Total Balance: {}", format_currency(summary.total_balance));
}

pub fn list_bills(doc: &Document, today: NaiveDate) {
    for (i, bill) in doc.bills.iter().enumerate() {
        let paid = if bill.paid { "x" } else { " " };
        println!(
            "{:>3} [{}] {:<24} {:>12}  due: {}",
            i,
            paid,
            bill.name,
            format_currency(bill.amount),
            due_cell(&bill.due_date, bill.paid, today),
        );
    }

    let summary = store::summary::bills_summary(&doc.bills);
    println!();
    println!("Monthly Total: {}", format_currency(summary.monthly_total));
}

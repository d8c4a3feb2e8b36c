use anyhow::{bail, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use regex::Regex;
use std::io::{self, Write};
use std::path::PathBuf;

use models::{AccountType, TodoStatus};
use store::{RecordStore, StoreError};

mod render;

#[derive(Parser, Debug)]
#[command(
    name = "homeledger",
    about = "Track household tasks, credit cards, properties, accounts and bills in one JSON file."
)]
struct Args {
    /// Path to the data file
    #[arg(long, global = true, default_value = "data.json")]
    data: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Household tasks
    #[command(subcommand)]
    Todo(TodoCmd),
    /// Display categories for tasks
    #[command(subcommand)]
    Category(CategoryCmd),
    /// Credit cards
    #[command(subcommand)]
    Card(CardCmd),
    /// Property equity
    #[command(subcommand)]
    Property(PropertyCmd),
    /// Liquid accounts
    #[command(subcommand)]
    Account(AccountCmd),
    /// Recurring bills
    #[command(subcommand)]
    Bill(BillCmd),
}

#[derive(Subcommand, Debug)]
enum TodoCmd {
    /// List all tasks
    List,
    /// Add a task
    Add {
        task: String,
        #[arg(long, default_value = "Personal")]
        category: String,
        /// Not Started, In Progress, On Hold or Completed
        #[arg(long, default_value = "Not Started")]
        status: String,
        /// Due date as YYYY-MM-DD; anything unparsable is dropped
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Edit a task; omitted fields keep their stored value
    Edit {
        index: usize,
        #[arg(long)]
        task: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        status: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Flip the completed flag
    Toggle { index: usize },
    /// Delete a task
    Delete {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum CategoryCmd {
    /// List all categories
    List,
    /// Add a category; duplicate names (ignoring case) are left alone
    Add {
        name: String,
        /// Display tint as #RRGGBB
        #[arg(long, default_value = "#FFFFFF")]
        color: String,
    },
}

#[derive(Subcommand, Debug)]
enum CardCmd {
    /// List all cards plus the credit summary
    List,
    /// Add a credit card
    Add {
        owner: String,
        name: String,
        #[arg(long)]
        limit: String,
        #[arg(long)]
        balance: String,
        #[arg(long, default_value = "0")]
        payment: String,
        /// Free text, e.g. "15th of the month"
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Edit a card; omitted fields keep their stored value
    Edit {
        index: usize,
        #[arg(long)]
        owner: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        limit: Option<String>,
        #[arg(long)]
        balance: Option<String>,
        #[arg(long)]
        payment: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Delete a card
    Delete {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum PropertyCmd {
    /// List all properties plus the equity summary
    List,
    /// Add a property
    Add {
        address: String,
        #[arg(long)]
        value: String,
        #[arg(long)]
        loan: String,
    },
    /// Edit a property; omitted fields keep their stored value
    Edit {
        index: usize,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        value: Option<String>,
        #[arg(long)]
        loan: Option<String>,
    },
    /// Delete a property
    Delete {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum AccountCmd {
    /// List all accounts plus the balance summary
    List,
    /// Add an account
    Add {
        name: String,
        /// Checking, Savings, Retirement, Investment or Business
        #[arg(long, default_value = "Checking")]
        kind: String,
        #[arg(long, default_value = "")]
        institution: String,
        #[arg(long)]
        balance: String,
    },
    /// Edit an account; omitted fields keep their stored value
    Edit {
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        institution: Option<String>,
        #[arg(long)]
        balance: Option<String>,
    },
    /// Delete an account
    Delete {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Subcommand, Debug)]
enum BillCmd {
    /// List all bills plus the unpaid monthly total
    List,
    /// Add a bill
    Add {
        name: String,
        #[arg(long)]
        amount: String,
        /// Due date as YYYY-MM-DD; anything unparsable is dropped
        #[arg(long, default_value = "")]
        due: String,
    },
    /// Edit a bill; omitted fields keep their stored value
    Edit {
        index: usize,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        due: Option<String>,
    },
    /// Flip the paid flag
    Toggle { index: usize },
    /// Delete a bill
    Delete {
        index: usize,
        #[arg(short, long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    if let Err(err) = run() {
        // Validation problems are plain user-input mistakes, not failures
        let is_validation = err
            .downcast_ref::<StoreError>()
            .is_some_and(StoreError::is_validation);
        if is_validation {
            eprintln!("{}", err);
            std::process::exit(2);
        }
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = Args::parse();
    let mut store = RecordStore::open(&args.data)?;
    let today = Local::now().date_naive();

    match args.command {
        Command::Todo(cmd) => match cmd {
            TodoCmd::List => render::list_todos(store.document(), today),
            TodoCmd::Add {
                task,
                category,
                status,
                due,
            } => {
                let status: TodoStatus = status.parse().map_err(anyhow::Error::msg)?;
                let idx = store.add_todo(&task, &category, status, &due)?;
                println!("Added task at index {}.", idx);
            }
            TodoCmd::Edit {
                index,
                task,
                category,
                status,
                due,
            } => {
                check_index(store.document().todos.len(), index, "task")?;
                let current = store.document().todos[index].clone();
                let status = match status {
                    Some(s) => s.parse().map_err(anyhow::Error::msg)?,
                    None => current.status,
                };
                store.update_todo(
                    index,
                    task.as_deref().unwrap_or(&current.task),
                    category.as_deref().unwrap_or(&current.category),
                    status,
                    due.as_deref().unwrap_or(&current.due_date),
                )?;
                println!("Updated task {}.", index);
            }
            TodoCmd::Toggle { index } => {
                check_index(store.document().todos.len(), index, "task")?;
                let completed = store.toggle_todo(index)?;
                println!(
                    "Task {} is now {}.",
                    index,
                    if completed { "completed" } else { "open" }
                );
            }
            TodoCmd::Delete { index, yes } => {
                check_index(store.document().todos.len(), index, "task")?;
                if yes || confirm(&format!("Delete task '{}'?", store.document().todos[index].task))? {
                    store.delete_todo(index)?;
                    println!("Deleted task {}.", index);
                }
            }
        },

        Command::Category(cmd) => match cmd {
            CategoryCmd::List => render::list_categories(store.document()),
            CategoryCmd::Add { name, color } => {
                let hex = Regex::new(r"^#[0-9a-fA-F]{6}$").unwrap();
                if !hex.is_match(&color) {
                    bail!("invalid color '{}', expected #RRGGBB", color);
                }
                if store.add_category(&name, &color)? {
                    println!("Added category '{}'.", name);
                } else {
                    println!("Category '{}' already exists; nothing to do.", name);
                }
            }
        },

        Command::Card(cmd) => match cmd {
            CardCmd::List => render::list_cards(store.document()),
            CardCmd::Add {
                owner,
                name,
                limit,
                balance,
                payment,
                due,
            } => {
                let idx = store.add_card(&owner, &name, &limit, &balance, &payment, &due)?;
                println!("Added credit card at index {}.", idx);
            }
            CardCmd::Edit {
                index,
                owner,
                name,
                limit,
                balance,
                payment,
                due,
            } => {
                check_index(store.document().credit_cards.len(), index, "credit card")?;
                let current = store.document().credit_cards[index].clone();
                store.update_card(
                    index,
                    owner.as_deref().unwrap_or(&current.owner),
                    name.as_deref().unwrap_or(&current.card_name),
                    &limit.unwrap_or_else(|| current.limit.to_string()),
                    &balance.unwrap_or_else(|| current.balance.to_string()),
                    &payment.unwrap_or_else(|| current.payment.to_string()),
                    due.as_deref().unwrap_or(&current.due_date),
                )?;
                println!("Updated credit card {}.", index);
            }
            CardCmd::Delete { index, yes } => {
                check_index(store.document().credit_cards.len(), index, "credit card")?;
                let label = store.document().credit_cards[index].card_name.clone();
                if yes || confirm(&format!("Delete credit card '{}'?", label))? {
                    store.delete_card(index)?;
                    println!("Deleted credit card {}.", index);
                }
            }
        },

        Command::Property(cmd) => match cmd {
            PropertyCmd::List => render::list_properties(store.document()),
            PropertyCmd::Add {
                address,
                value,
                loan,
            } => {
                let idx = store.add_property(&address, &value, &loan)?;
                println!("Added property at index {}.", idx);
            }
            PropertyCmd::Edit {
                index,
                address,
                value,
                loan,
            } => {
                check_index(store.document().properties.len(), index, "property")?;
                let current = store.document().properties[index].clone();
                store.update_property(
                    index,
                    address.as_deref().unwrap_or(&current.address),
                    &value.unwrap_or_else(|| current.value.to_string()),
                    &loan.unwrap_or_else(|| current.loan.to_string()),
                )?;
                println!("Updated property {}.", index);
            }
            PropertyCmd::Delete { index, yes } => {
                check_index(store.document().properties.len(), index, "property")?;
                let label = store.document().properties[index].address.clone();
                if yes || confirm(&format!("Delete property '{}'?", label))? {
                    store.delete_property(index)?;
                    println!("Deleted property {}.", index);
                }
            }
        },

        Command::Account(cmd) => match cmd {
            AccountCmd::List => render::list_accounts(store.document()),
            AccountCmd::Add {
                name,
                kind,
                institution,
                balance,
            } => {
                let kind: AccountType = kind.parse().map_err(anyhow::Error::msg)?;
                let idx = store.add_account(&name, kind, &institution, &balance)?;
                println!("Added account at index {}.", idx);
            }
            AccountCmd::Edit {
                index,
                name,
                kind,
                institution,
                balance,
            } => {
                check_index(store.document().accounts.len(), index, "account")?;
                let current = store.document().accounts[index].clone();
                let kind = match kind {
                    Some(k) => k.parse().map_err(anyhow::Error::msg)?,
                    None => current.kind,
                };
                store.update_account(
                    index,
                    name.as_deref().unwrap_or(&current.name),
                    kind,
                    institution.as_deref().unwrap_or(&current.institution),
                    &balance.unwrap_or_else(|| current.balance.to_string()),
                )?;
                println!("Updated account {}.", index);
            }
            AccountCmd::Delete { index, yes } => {
                check_index(store.document().accounts.len(), index, "account")?;
                let label = store.document().accounts[index].name.clone();
                if yes || confirm(&format!("Delete account '{}'?", label))? {
                    store.delete_account(index)?;
                    println!("Deleted account {}.", index);
                }
            }
        },

        Command::Bill(cmd) => match cmd {
            BillCmd::List => render::list_bills(store.document(), today),
            BillCmd::Add { name, amount, due } => {
                let idx = store.add_bill(&name, &amount, &due)?;
                println!("Added bill at index {}.", idx);
            }
            BillCmd::Edit {
                index,
                name,
                amount,
                due,
            } => {
                check_index(store.document().bills.len(), index, "bill")?;
                let current = store.document().bills[index].clone();
                store.update_bill(
                    index,
                    name.as_deref().unwrap_or(&current.name),
                    &amount.unwrap_or_else(|| current.amount.to_string()),
                    due.as_deref().unwrap_or(&current.due_date),
                )?;
                println!("Updated bill {}.", index);
            }
            BillCmd::Toggle { index } => {
                check_index(store.document().bills.len(), index, "bill")?;
                let paid = store.toggle_bill(index)?;
                println!(
                    "Bill {} is now {}.",
                    index,
                    if paid { "paid" } else { "unpaid" }
                );
            }
            BillCmd::Delete { index, yes } => {
                check_index(store.document().bills.len(), index, "bill")?;
                let label = store.document().bills[index].name.clone();
                if yes || confirm(&format!("Delete bill '{}'?", label))? {
                    store.delete_bill(index)?;
                    println!("Deleted bill {}.", index);
                }
            }
        },
    }

    Ok(())
}

/// The store treats out-of-range indices as a programming error, so the
/// frontend checks user-supplied indices before calling in.
fn check_index(len: usize, index: usize, what: &str) -> Result<()> {
    if index >= len {
        bail!("no {} at index {} ({} on record)", what, index, len);
    }
    Ok(())
}

fn confirm(prompt: &str) -> Result<bool> {
    print!("{} [y/N] ", prompt);
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().read_line(&mut line)?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes" | "Yes"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_index_bounds() {
        assert!(check_index(3, 0, "task").is_ok());
        assert!(check_index(3, 2, "task").is_ok());
        assert!(check_index(3, 3, "task").is_err());
        assert!(check_index(0, 0, "task").is_err());
    }
}

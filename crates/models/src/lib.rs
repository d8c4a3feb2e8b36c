use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color assigned to categories that were stored as bare strings by older
/// versions of the data file.
pub const LEGACY_CATEGORY_COLOR: &str = "#000000";

/// Progress state of a todo. Serialized with the human-readable labels the
/// data file has always used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TodoStatus {
    #[default]
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "On Hold")]
    OnHold,
    Completed,
}

impl TodoStatus {
    pub const ALL: [TodoStatus; 4] = [
        TodoStatus::NotStarted,
        TodoStatus::InProgress,
        TodoStatus::OnHold,
        TodoStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TodoStatus::NotStarted => "Not Started",
            TodoStatus::InProgress => "In Progress",
            TodoStatus::OnHold => "On Hold",
            TodoStatus::Completed => "Completed",
        }
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TodoStatus {
    type Err = String;

    /// Accepts the display label, case-insensitively, with spaces, hyphens
    /// or underscores between words ("In Progress", "in-progress", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "notstarted" => Ok(TodoStatus::NotStarted),
            "inprogress" => Ok(TodoStatus::InProgress),
            "onhold" => Ok(TodoStatus::OnHold),
            "completed" => Ok(TodoStatus::Completed),
            _ => Err(format!(
                "unknown status '{}', expected one of: Not Started, In Progress, On Hold, Completed",
                s
            )),
        }
    }
}

/// Kind of liquid account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccountType {
    Checking,
    Savings,
    Retirement,
    Investment,
    Business,
}

impl AccountType {
    pub const ALL: [AccountType; 5] = [
        AccountType::Checking,
        AccountType::Savings,
        AccountType::Retirement,
        AccountType::Investment,
        AccountType::Business,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AccountType::Checking => "Checking",
            AccountType::Savings => "Savings",
            AccountType::Retirement => "Retirement",
            AccountType::Investment => "Investment",
            AccountType::Business => "Business",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "checking" => Ok(AccountType::Checking),
            "savings" => Ok(AccountType::Savings),
            "retirement" => Ok(AccountType::Retirement),
            "investment" => Ok(AccountType::Investment),
            "business" => Ok(AccountType::Business),
            _ => Err(format!(
                "unknown account type '{}', expected one of: Checking, Savings, Retirement, Investment, Business",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Todo {
    pub task: String,
    pub category: String,
    #[serde(default)]
    pub status: TodoStatus,
    #[serde(default)]
    pub due_date: String,
    pub completed: bool,
}

/// Display category for todos. Older data files stored these as bare name
/// strings; those are normalized at load into the object shape with a black
/// tint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub name: String,
    pub color: String,
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Named {
                name: String,
                #[serde(default = "legacy_color")]
                color: String,
            },
            Bare(String),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Named { name, color } => Ok(Category { name, color }),
            Raw::Bare(name) => Ok(Category {
                name,
                color: legacy_color(),
            }),
        }
    }
}

fn legacy_color() -> String {
    LEGACY_CATEGORY_COLOR.to_string()
}

/// Credit card record. `available` is derived (`limit - balance`) and is
/// recomputed by the store on every write; it is persisted only so the file
/// stays shape-compatible with existing data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreditCard {
    pub owner: String,
    pub card_name: String,
    pub limit: f64,
    pub available: f64,
    pub balance: f64,
    pub payment: f64,
    pub due_date: String,
}

impl CreditCard {
    /// Re-establishes `available = limit - balance`.
    pub fn recompute_derived(&mut self) {
        self.available = self.limit - self.balance;
    }
}

/// Property record. `equity` and `equity_pct` are derived and recomputed on
/// every write, same as [`CreditCard::available`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub address: String,
    pub value: f64,
    pub loan: f64,
    pub equity: f64,
    pub equity_pct: f64,
}

impl Property {
    /// Re-establishes `equity = value - loan` and the equity percentage
    /// (0 when the value is 0, avoiding division by zero).
    pub fn recompute_derived(&mut self) {
        self.equity = self.value - self.loan;
        self.equity_pct = if self.value != 0.0 {
            self.equity / self.value * 100.0
        } else {
            0.0
        };
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Account {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: AccountType,
    pub institution: String,
    pub balance: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub name: String,
    pub amount: f64,
    #[serde(default)]
    pub due_date: String,
    pub paid: bool,
}

/// The whole persisted document: six independent, positionally indexed
/// collections. Insertion order is display order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default)]
    pub todos: Vec<Todo>,
    #[serde(default)]
    pub credit_cards: Vec<CreditCard>,
    #[serde(default)]
    pub categories: Vec<Category>,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub accounts: Vec<Account>,
    #[serde(default)]
    pub bills: Vec<Bill>,
}

impl Document {
    /// Fresh document with the four seed categories, used when no data file
    /// exists yet.
    pub fn seeded() -> Self {
        let categories = [
            ("Personal", "#FF5733"),
            ("Home", "#33FF57"),
            ("Education", "#3357FF"),
            ("Business", "#F033FF"),
        ]
        .into_iter()
        .map(|(name, color)| Category {
            name: name.to_string(),
            color: color.to_string(),
        })
        .collect();

        Document {
            categories,
            ..Document::default()
        }
    }

    /// Case-insensitive membership test, used for duplicate suppression.
    pub fn has_category(&self, name: &str) -> bool {
        self.categories
            .iter()
            .any(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Exact-name color lookup for display tinting. Returns `None` for
    /// unknown names; the caller decides the fallback.
    pub fn category_color(&self, name: &str) -> Option<&str> {
        self.categories
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.color.as_str())
    }

    /// Recomputes every derived field so the formula invariants hold
    /// regardless of what was read from disk.
    pub fn recompute_derived(&mut self) {
        for card in &mut self.credit_cards {
            card.recompute_derived();
        }
        for prop in &mut self.properties {
            prop.recompute_derived();
        }
    }
}

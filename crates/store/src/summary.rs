use models::{Account, Bill, CreditCard, Property};

use crate::money::credit_usage;

/// Aggregate view over all credit cards.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditSummary {
    pub total_limit: f64,
    pub total_balance: f64,
    /// Aggregate usage percentage, 0.0 when the total limit is 0.
    pub usage_pct: f64,
    pub total_debt: f64,
    /// Balance totals grouped by owner, in first-seen owner order.
    pub owner_debts: Vec<(String, f64)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PropertySummary {
    pub count: usize,
    pub total_value: f64,
    pub total_equity: f64,
    /// Aggregate equity percentage, 0.0 when the total value is 0.
    pub equity_pct: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AccountSummary {
    pub count: usize,
    pub total_balance: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BillsSummary {
    /// Sum of amounts over unpaid bills.
    pub monthly_total: f64,
}

pub fn credit_summary(cards: &[CreditCard]) -> CreditSummary {
    let mut total_limit = 0.0;
    let mut total_balance = 0.0;
    let mut owner_debts: Vec<(String, f64)> = Vec::new();

    for card in cards {
        total_limit += card.limit;
        total_balance += card.balance;
        match owner_debts.iter_mut().find(|(owner, _)| *owner == card.owner) {
            Some((_, debt)) => *debt += card.balance,
            None => owner_debts.push((card.owner.clone(), card.balance)),
        }
    }

    let total_debt = owner_debts.iter().map(|(_, debt)| debt).sum();

    CreditSummary {
        total_limit,
        total_balance,
        usage_pct: credit_usage(total_balance, total_limit),
        total_debt,
        owner_debts,
    }
}

pub fn property_summary(properties: &[Property]) -> PropertySummary {
    let total_value: f64 = properties.iter().map(|p| p.value).sum();
    let total_equity: f64 = properties.iter().map(|p| p.equity).sum();
    let equity_pct = if total_value != 0.0 {
        total_equity / total_value * 100.0
    } else {
        0.0
    };

    PropertySummary {
        count: properties.len(),
        total_value,
        total_equity,
        equity_pct,
    }
}

pub fn account_summary(accounts: &[Account]) -> AccountSummary {
    AccountSummary {
        count: accounts.len(),
        total_balance: accounts.iter().map(|a| a.balance).sum(),
    }
}

pub fn bills_summary(bills: &[Bill]) -> BillsSummary {
    BillsSummary {
        monthly_total: bills.iter().filter(|b| !b.paid).map(|b| b.amount).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use models::AccountType;

    fn card(owner: &str, limit: f64, balance: f64) -> CreditCard {
        CreditCard {
            owner: owner.to_string(),
            card_name: format!("{}'s card", owner),
            limit,
            available: limit - balance,
            balance,
            payment: 25.0,
            due_date: String::new(),
        }
    }

    #[test]
    fn test_credit_summary_totals_and_owner_grouping() {
        let cards = vec![
            card("Ann", 5000.0, 1000.0),
            card("Bob", 3000.0, 500.0),
            card("Ann", 2000.0, 500.0),
        ];
        let summary = credit_summary(&cards);

        assert_eq!(summary.total_limit, 10_000.0);
        assert_eq!(summary.total_balance, 2000.0);
        assert_eq!(summary.usage_pct, 20.0);
        assert_eq!(summary.total_debt, 2000.0);
        // First-seen owner order, balances merged per owner
        assert_eq!(
            summary.owner_debts,
            vec![("Ann".to_string(), 1500.0), ("Bob".to_string(), 500.0)]
        );
    }

    #[test]
    fn test_credit_summary_empty_has_zero_usage() {
        let summary = credit_summary(&[]);
        assert_eq!(summary.usage_pct, 0.0);
        assert_eq!(summary.total_debt, 0.0);
        assert!(summary.owner_debts.is_empty());
    }

    #[test]
    fn test_property_summary_aggregate_equity() {
        let mut a = Property {
            address: "12 Elm St".to_string(),
            value: 400_000.0,
            loan: 300_000.0,
            equity: 0.0,
            equity_pct: 0.0,
        };
        a.recompute_derived();
        let mut b = Property {
            address: "9 Oak Ave".to_string(),
            value: 100_000.0,
            loan: 25_000.0,
            equity: 0.0,
            equity_pct: 0.0,
        };
        b.recompute_derived();

        let summary = property_summary(&[a, b]);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_value, 500_000.0);
        assert_eq!(summary.total_equity, 175_000.0);
        assert_eq!(summary.equity_pct, 35.0);
    }

    #[test]
    fn test_property_summary_empty() {
        let summary = property_summary(&[]);
        assert_eq!(summary.count, 0);
        assert_eq!(summary.equity_pct, 0.0);
    }

    #[test]
    fn test_account_summary() {
        let accounts = vec![
            Account {
                name: "Everyday".to_string(),
                kind: AccountType::Checking,
                institution: "Big Bank".to_string(),
                balance: 1200.0,
            },
            Account {
                name: "Rainy Day".to_string(),
                kind: AccountType::Savings,
                institution: "Big Bank".to_string(),
                balance: 800.0,
            },
        ];
        let summary = account_summary(&accounts);
        assert_eq!(summary.count, 2);
        assert_eq!(summary.total_balance, 2000.0);
    }

    #[test]
    fn test_bills_summary_counts_only_unpaid() {
        let bills = vec![
            Bill {
                name: "Internet".to_string(),
                amount: 60.0,
                due_date: "2023-01-01".to_string(),
                paid: false,
            },
            Bill {
                name: "Water".to_string(),
                amount: 40.0,
                due_date: String::new(),
                paid: true,
            },
        ];
        assert_eq!(bills_summary(&bills).monthly_total, 60.0);
    }
}

// 📒 Ledger Aggregator - Account statement from reporting-ready records
// Walks the debit/credit entries of reporting-ready transactions for one
// chart-of-accounts account and produces signed contributions with a
// running balance.

use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

use crate::model::Transaction;
use crate::status::is_reporting_ready;

// ============================================================================
// ACCOUNT TYPE
// ============================================================================

/// Chart-of-accounts account classes with distinct sign conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerAccountType {
    Expense,
    Asset,
    Income,
    Liability,
    Equity,
}

impl LedgerAccountType {
    /// Parses the backend's account-type string, case-insensitively.
    ///
    /// Returns `None` for anything unrecognized; callers log a warning and
    /// skip the account rather than failing the whole ledger view.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "expense" => Some(LedgerAccountType::Expense),
            "asset" => Some(LedgerAccountType::Asset),
            "income" => Some(LedgerAccountType::Income),
            "liability" => Some(LedgerAccountType::Liability),
            "equity" => Some(LedgerAccountType::Equity),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LedgerAccountType::Expense => "expense",
            LedgerAccountType::Asset => "asset",
            LedgerAccountType::Income => "income",
            LedgerAccountType::Liability => "liability",
            LedgerAccountType::Equity => "equity",
        }
    }
}

// ============================================================================
// DATE RANGE
// ============================================================================

/// Inclusive date range, normalized to local midnight at the start and
/// 23:59:59.999 at the end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LedgerDateRange {
    start_millis: i64,
    end_millis: i64,
}

impl LedgerDateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        let start_naive = start.and_hms_opt(0, 0, 0).unwrap_or_default();
        let end_naive = end.and_hms_milli_opt(23, 59, 59, 999).unwrap_or_default();

        LedgerDateRange {
            start_millis: local_millis(start_naive),
            end_millis: local_millis(end_naive),
        }
    }

    pub fn contains(&self, epoch_millis: i64) -> bool {
        epoch_millis >= self.start_millis && epoch_millis <= self.end_millis
    }
}

/// Epoch millis of a wall-clock time in the local timezone. Falls back to
/// UTC when the local time does not exist (DST gap).
fn local_millis(naive: NaiveDateTime) -> i64 {
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| naive.and_utc().timestamp_millis())
}

// ============================================================================
// LEDGER ROWS
// ============================================================================

/// One contribution of a transaction to the account's ledger. A transaction
/// with several entries against the account contributes several rows.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    pub transaction: Transaction,
    /// Signed per the account class convention, minor units.
    pub signed_amount: i64,
    /// The transaction's date, epoch millis.
    pub date_millis: i64,
    /// Cumulative sum up to and including this row, oldest-first.
    pub running_balance: i64,
}

/// Builds the ledger for one account.
///
/// Only reporting-ready transactions contribute; an optional date range
/// restricts by transaction date. Rows come back oldest first, the inverse
/// of pipeline-column order, because a statement reads top-down.
///
/// Sign conventions:
/// - expense: debits increase the balance
/// - asset: debits increase, credits decrease
/// - income, liability, equity: credits increase, debits are not considered
pub fn build_ledger(
    transactions: &[Transaction],
    account_name: &str,
    account_type: LedgerAccountType,
    range: Option<LedgerDateRange>,
) -> Vec<LedgerRow> {
    let mut rows: Vec<LedgerRow> = Vec::new();

    for tx in transactions {
        if !is_reporting_ready(tx) {
            continue;
        }
        if let Some(range) = range {
            if !range.contains(tx.summary.transaction_date) {
                continue;
            }
        }

        for amount in signed_contributions(tx, account_name, account_type) {
            rows.push(LedgerRow {
                transaction: tx.clone(),
                signed_amount: amount,
                date_millis: tx.summary.transaction_date,
                running_balance: 0,
            });
        }
    }

    // Oldest first; the sort is stable so same-day rows keep entry order.
    rows.sort_by_key(|row| row.date_millis);

    let mut balance = 0i64;
    for row in &mut rows {
        balance += row.signed_amount;
        row.running_balance = balance;
    }

    rows
}

/// Signed amounts of all entries matching the account, in entry order
/// (debits before credits where both sides apply).
fn signed_contributions(
    tx: &Transaction,
    account_name: &str,
    account_type: LedgerAccountType,
) -> Vec<i64> {
    let debits = tx
        .accounting
        .debits
        .iter()
        .filter(|e| e.chart_name == account_name);
    let credits = tx
        .accounting
        .credits
        .iter()
        .filter(|e| e.chart_name == account_name);

    let mut amounts = Vec::new();
    match account_type {
        LedgerAccountType::Expense => {
            amounts.extend(debits.map(|e| entry_magnitude(tx, e.amount)));
        }
        LedgerAccountType::Asset => {
            amounts.extend(debits.map(|e| entry_magnitude(tx, e.amount)));
            amounts.extend(credits.map(|e| -entry_magnitude(tx, e.amount)));
        }
        LedgerAccountType::Income | LedgerAccountType::Liability | LedgerAccountType::Equity => {
            amounts.extend(credits.map(|e| entry_magnitude(tx, e.amount)));
        }
    }

    amounts
}

/// Entry amounts are magnitudes; a negative one violates the ingestion
/// invariant, so it is flattened and flagged instead of flipping the row's
/// direction.
fn entry_magnitude(tx: &Transaction, amount: i64) -> i64 {
    if amount < 0 {
        tracing::warn!(id = %tx.id, amount, "negative accounting entry amount");
    }
    amount.abs()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccountingEntry, ReconciliationStatus, Summary, Transaction, VerificationStatus,
    };

    /// Midday local time on the given date, as epoch millis, so fixtures
    /// land inside the same local day the range is built from.
    fn midday_millis(year: i32, month: u32, day: u32) -> i64 {
        let date = NaiveDate::from_ymd_opt(year, month, day).unwrap();
        local_millis(date.and_hms_opt(12, 0, 0).unwrap())
    }

    fn debit_entry(chart_name: &str, amount: i64) -> AccountingEntry {
        AccountingEntry {
            chart_name: chart_name.to_string(),
            amount,
            ..Default::default()
        }
    }

    fn reporting_ready_tx(id: &str, date_millis: i64) -> Transaction {
        let mut tx = Transaction {
            id: id.to_string(),
            summary: Summary {
                third_party_name: "Supplier".to_string(),
                description: "Fixture".to_string(),
                total_amount: 0,
                currency: "GBP".to_string(),
                transaction_date: date_millis,
            },
            metadata: Default::default(),
            accounting: Default::default(),
            details: Default::default(),
        };
        tx.metadata.verification.status = VerificationStatus::Verified;
        tx.metadata.reconciliation.status = ReconciliationStatus::Reconciled;
        tx
    }

    #[test]
    fn test_running_balance_on_expense_account() {
        let mut t1 = reporting_ready_tx("t1", midday_millis(2025, 3, 1));
        t1.accounting.debits = vec![debit_entry("Office costs", 1_000)];
        let mut t2 = reporting_ready_tx("t2", midday_millis(2025, 3, 2));
        t2.accounting.debits = vec![debit_entry("Office costs", 2_500)];
        let mut t3 = reporting_ready_tx("t3", midday_millis(2025, 3, 3));
        t3.accounting.debits = vec![debit_entry("Office costs", 500)];
        // Outside the range below.
        let mut t4 = reporting_ready_tx("t4", midday_millis(2025, 4, 15));
        t4.accounting.debits = vec![debit_entry("Office costs", 9_900)];

        let range = LedgerDateRange::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 31).unwrap(),
        );

        // Fetch order is newest-first; the ledger re-sorts oldest-first.
        let rows = build_ledger(
            &[t4, t3, t2, t1],
            "Office costs",
            LedgerAccountType::Expense,
            Some(range),
        );

        let balances: Vec<i64> = rows.iter().map(|r| r.running_balance).collect();
        assert_eq!(balances, vec![1_000, 3_500, 4_000]);
        assert_eq!(rows[0].transaction.id, "t1");
        assert_eq!(rows[2].transaction.id, "t3");
    }

    #[test]
    fn test_asset_account_signs() {
        let mut tx = reporting_ready_tx("t1", midday_millis(2025, 3, 1));
        tx.accounting.debits = vec![debit_entry("Bank", 5_000)];
        tx.accounting.credits = vec![debit_entry("Bank", 2_000)];

        let rows = build_ledger(&[tx], "Bank", LedgerAccountType::Asset, None);

        let amounts: Vec<i64> = rows.iter().map(|r| r.signed_amount).collect();
        assert_eq!(amounts, vec![5_000, -2_000]);
        assert_eq!(rows[1].running_balance, 3_000);
    }

    #[test]
    fn test_income_account_ignores_debits() {
        let mut tx = reporting_ready_tx("t1", midday_millis(2025, 3, 1));
        tx.accounting.debits = vec![debit_entry("Sales", 9_999)];
        tx.accounting.credits = vec![debit_entry("Sales", 4_000)];

        let rows = build_ledger(&[tx], "Sales", LedgerAccountType::Income, None);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].signed_amount, 4_000);
    }

    #[test]
    fn test_multiple_matching_entries_give_multiple_rows() {
        let mut tx = reporting_ready_tx("t1", midday_millis(2025, 3, 1));
        tx.accounting.debits = vec![
            debit_entry("Travel", 1_500),
            debit_entry("Travel", 700),
            debit_entry("Meals", 300),
        ];

        let rows = build_ledger(&[tx], "Travel", LedgerAccountType::Expense, None);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].running_balance, 2_200);
    }

    #[test]
    fn test_only_reporting_ready_transactions_contribute() {
        let mut ready = reporting_ready_tx("t1", midday_millis(2025, 3, 1));
        ready.accounting.debits = vec![debit_entry("Office costs", 1_000)];

        let mut unverified = reporting_ready_tx("t2", midday_millis(2025, 3, 2));
        unverified.metadata.verification.status = VerificationStatus::Unverified;
        unverified.accounting.debits = vec![debit_entry("Office costs", 9_000)];

        let rows = build_ledger(
            &[ready, unverified],
            "Office costs",
            LedgerAccountType::Expense,
            None,
        );

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].transaction.id, "t1");
    }

    #[test]
    fn test_range_bounds_are_inclusive() {
        let range = LedgerDateRange::new(
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
            NaiveDate::from_ymd_opt(2025, 3, 1).unwrap(),
        );

        assert!(range.contains(midday_millis(2025, 3, 1)));
        assert!(!range.contains(midday_millis(2025, 2, 28)));
        assert!(!range.contains(midday_millis(2025, 3, 2)));
    }

    #[test]
    fn test_account_type_parse() {
        assert_eq!(
            LedgerAccountType::parse(" Expense "),
            Some(LedgerAccountType::Expense)
        );
        assert_eq!(
            LedgerAccountType::parse("LIABILITY"),
            Some(LedgerAccountType::Liability)
        );
        assert_eq!(LedgerAccountType::parse("revenue"), None);
        assert_eq!(LedgerAccountType::parse(""), None);
    }
}

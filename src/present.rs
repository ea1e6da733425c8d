// 🪞 Presentation Adapter - Display stubs for transaction lists
// Maps classified transactions onto the minimal read-only projection the
// list screens render. Stubs are rebuilt on every classification pass and
// never persisted.

use crate::classify::is_credit_to_account;
use crate::model::Transaction;
use crate::status::{is_audit_ready, is_reporting_ready, is_unreconciled};

/// Stub titles are ellipsized beyond this many characters.
pub const MAX_TITLE_CHARS: usize = 24;

// ============================================================================
// AMOUNT FORMATTING
// ============================================================================

/// Currency formatting collaborator.
///
/// The real product formats amounts in the UI layer with full locale rules;
/// the classifiers only need *some* implementation to build stubs with, so
/// the boundary is a trait and [`PlainFormatter`] is the built-in one.
pub trait AmountFormatter {
    /// `amount_minor` is signed minor units; `use_symbol` asks for "£12.34"
    /// over "12.34 GBP" where the currency has a symbol.
    fn format_amount(&self, amount_minor: i64, currency: &str, use_symbol: bool) -> String;
}

/// Minimal formatter: two decimal places, symbol for the majors, code
/// suffix otherwise.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainFormatter;

impl AmountFormatter for PlainFormatter {
    // TODO: minor-unit exponents for zero-decimal currencies (JPY, KRW).
    fn format_amount(&self, amount_minor: i64, currency: &str, use_symbol: bool) -> String {
        let sign = if amount_minor < 0 { "-" } else { "" };
        let abs = amount_minor.unsigned_abs();
        let major = abs / 100;
        let cents = abs % 100;

        if use_symbol {
            if let Some(symbol) = currency_symbol(currency) {
                return format!("{sign}{symbol}{major}.{cents:02}");
            }
        }

        format!("{sign}{major}.{cents:02} {currency}")
    }
}

fn currency_symbol(code: &str) -> Option<&'static str> {
    match code {
        "GBP" => Some("£"),
        "USD" => Some("$"),
        "EUR" => Some("€"),
        _ => None,
    }
}

// ============================================================================
// TRANSACTION STUB
// ============================================================================

/// Read-only projection of one transaction for a list row.
#[derive(Debug, Clone)]
pub struct TransactionStub {
    pub id: String,
    /// Counterparty name (description as fallback), at most
    /// [`MAX_TITLE_CHARS`] characters, ellipsized.
    pub title: String,
    /// Pre-formatted display amount.
    pub amount: String,
    /// Money flowing into the business.
    pub is_credit: bool,
    pub is_reporting_ready: bool,
    /// The record the stub was derived from, for detail screens.
    pub original: Transaction,
}

/// Builds one stub. Title preference: third-party name, then description.
pub fn stub_for(tx: &Transaction, formatter: &dyn AmountFormatter) -> TransactionStub {
    let raw_title = if tx.summary.third_party_name.is_empty() {
        &tx.summary.description
    } else {
        &tx.summary.third_party_name
    };

    TransactionStub {
        id: tx.id.clone(),
        title: truncate_title(raw_title),
        amount: formatter.format_amount(
            tx.summary.total_amount,
            &tx.summary.currency,
            true,
        ),
        is_credit: is_credit_to_account(tx),
        is_reporting_ready: is_reporting_ready(tx),
        original: tx.clone(),
    }
}

/// Builds stubs for a whole list, deduplicating by identifier first
/// (first-seen wins, matching the partition-merge contract).
pub fn stubs_for(transactions: &[Transaction], formatter: &dyn AmountFormatter) -> Vec<TransactionStub> {
    let mut seen = std::collections::HashSet::new();
    transactions
        .iter()
        .filter(|tx| seen.insert(tx.id.clone()))
        .map(|tx| stub_for(tx, formatter))
        .collect()
}

/// Ellipsizes a title to [`MAX_TITLE_CHARS`] characters. Counts characters,
/// not bytes, so multibyte names truncate cleanly.
fn truncate_title(title: &str) -> String {
    if title.chars().count() <= MAX_TITLE_CHARS {
        return title.to_string();
    }

    let mut out: String = title.chars().take(MAX_TITLE_CHARS - 1).collect();
    out.push('…');
    out
}

// ============================================================================
// STATUS BADGE
// ============================================================================

/// Which lifecycle icon a list row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusBadge {
    AuditReady,
    Unreconciled,
    InProgress,
}

/// Chooses the row badge. Audit-ready is checked before unreconciled, so if
/// upstream data ever carried both signals the stronger one would win.
pub fn status_badge(tx: &Transaction) -> StatusBadge {
    if is_audit_ready(tx) {
        StatusBadge::AuditReady
    } else if is_unreconciled(tx) {
        StatusBadge::Unreconciled
    } else {
        StatusBadge::InProgress
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        ReconciliationStatus, Summary, Transaction, TransactionKind, VerificationStatus,
    };

    fn tx(id: &str, name: &str, amount: i64) -> Transaction {
        Transaction {
            id: id.to_string(),
            summary: Summary {
                third_party_name: name.to_string(),
                description: "Fallback description".to_string(),
                total_amount: amount,
                currency: "GBP".to_string(),
                transaction_date: 0,
            },
            metadata: Default::default(),
            accounting: Default::default(),
            details: Default::default(),
        }
    }

    #[test]
    fn test_plain_formatter() {
        let f = PlainFormatter;
        assert_eq!(f.format_amount(123_456, "GBP", true), "£1234.56");
        assert_eq!(f.format_amount(-50, "USD", true), "-$0.50");
        assert_eq!(f.format_amount(1_000, "CHF", true), "10.00 CHF");
        assert_eq!(f.format_amount(1_000, "GBP", false), "10.00 GBP");
    }

    #[test]
    fn test_title_truncation() {
        let short = tx("t1", "Corner Bakery", 100);
        let stub = stub_for(&short, &PlainFormatter);
        assert_eq!(stub.title, "Corner Bakery");

        let long = tx(
            "t2",
            "The Extremely Long Trading Name Of A Supplier Ltd",
            100,
        );
        let stub = stub_for(&long, &PlainFormatter);
        assert_eq!(stub.title.chars().count(), MAX_TITLE_CHARS);
        assert!(stub.title.ends_with('…'));
    }

    #[test]
    fn test_title_falls_back_to_description() {
        let mut t = tx("t1", "", 100);
        t.summary.description = "Sunday market takings".to_string();
        let stub = stub_for(&t, &PlainFormatter);
        assert_eq!(stub.title, "Sunday market takings");
    }

    #[test]
    fn test_stub_flags() {
        let mut t = tx("t1", "Customer", 5_000);
        t.metadata.classification.kind = Some(TransactionKind::Sale);
        t.metadata.verification.status = VerificationStatus::Verified;
        t.metadata.reconciliation.status = ReconciliationStatus::Reconciled;

        let stub = stub_for(&t, &PlainFormatter);
        assert!(stub.is_credit);
        assert!(stub.is_reporting_ready);
        assert_eq!(stub.original.id, "t1");
    }

    #[test]
    fn test_stubs_dedupe_by_id_first_seen() {
        let a = tx("t1", "First occurrence", 100);
        let b = tx("t1", "Second occurrence", 200);
        let c = tx("t2", "Other", 300);

        let stubs = stubs_for(&[a, b, c], &PlainFormatter);
        assert_eq!(stubs.len(), 2);
        assert_eq!(stubs[0].title, "First occurrence");
        assert_eq!(stubs[1].id, "t2");
    }

    #[test]
    fn test_status_badge_order() {
        let mut t = tx("t1", "X", 100);

        t.metadata.reconciliation.status = ReconciliationStatus::Unreconciled;
        assert_eq!(status_badge(&t), StatusBadge::Unreconciled);

        t.metadata.reconciliation.status = ReconciliationStatus::PendingBankMatch;
        assert_eq!(status_badge(&t), StatusBadge::InProgress);

        t.metadata.reconciliation.status = ReconciliationStatus::NotRequired;
        assert_eq!(status_badge(&t), StatusBadge::AuditReady);
    }
}

// 💳 Payment-Method Extractor - One answer from three legacy locations
// The payment breakdown has moved twice as the schema evolved; this module
// owns the precedence between the old and new homes.

use crate::model::{PaymentEntry, Transaction};

// ============================================================================
// PAYMENT METHOD
// ============================================================================

/// A normalized payment method: lower-cased, trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    pub method: String,
}

impl PaymentMethod {
    /// Canonical form for matching: alphanumerics only.
    ///
    /// Collapses the textual variants seen in the wild
    /// ("accounts_payable", "Accounts Payable", "accountspayable")
    /// onto a single key.
    pub fn canonical(&self) -> String {
        self.method
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect()
    }

    pub fn is_accounts_receivable(&self) -> bool {
        self.canonical() == "accountsreceivable"
    }

    pub fn is_accounts_payable(&self) -> bool {
        self.canonical() == "accountspayable"
    }

    pub fn is_cash(&self) -> bool {
        self.canonical() == "cash"
    }
}

// ============================================================================
// EXTRACTION STRATEGIES (fixed precedence, first non-empty wins)
// ============================================================================

type ExtractionStrategy = fn(&Transaction) -> &[PaymentEntry];

fn from_accounting_breakdown(tx: &Transaction) -> &[PaymentEntry] {
    &tx.accounting.payment_breakdown
}

fn from_legacy_payment_type(tx: &Transaction) -> &[PaymentEntry] {
    &tx.details.payment_type
}

fn from_legacy_breakdown(tx: &Transaction) -> &[PaymentEntry] {
    &tx.details.payment_breakdown
}

/// Locations are tried in this order and never merged. Adding or retiring a
/// legacy location is an edit to this list only.
const STRATEGIES: &[ExtractionStrategy] = &[
    from_accounting_breakdown,
    from_legacy_payment_type,
    from_legacy_breakdown,
];

/// Extracts the set of payment methods used by a transaction.
///
/// Checks each known field location in strict precedence order and uses the
/// first non-empty one. A transaction with no payment information anywhere
/// yields an empty list; callers must treat empty as "predicate is false",
/// never as an error.
pub fn extract_payment_methods(tx: &Transaction) -> Vec<PaymentMethod> {
    for strategy in STRATEGIES {
        let entries = strategy(tx);
        if !entries.is_empty() {
            return entries.iter().filter_map(normalize_entry).collect();
        }
    }
    Vec::new()
}

/// Normalizes one entry: `type` first, `paymentType` as fallback, then
/// lower-case and trim. Entries with neither field are skipped.
fn normalize_entry(entry: &PaymentEntry) -> Option<PaymentMethod> {
    let raw = entry
        .kind
        .as_deref()
        .or(entry.payment_type.as_deref())?;

    let method = raw.trim().to_lowercase();
    if method.is_empty() {
        return None;
    }

    Some(PaymentMethod { method })
}

// ============================================================================
// TESTS
// ============================================================================

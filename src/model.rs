// 📋 Transaction Model - Typed wire records
// One discriminated record type for everything the backend returns,
// validated once at the fetch boundary so the classifiers downstream
// can assume well-typed input.

use serde::{Deserialize, Serialize};

// ============================================================================
// CAPTURE SOURCES
// ============================================================================

/// Known `capture.source` provenance tags.
///
/// The set is open: the backend adds new sources without a client release,
/// so this stays a plain string on the record and these constants cover the
/// tags the classifiers branch on.
pub mod capture_sources {
    pub const PURCHASE_INVOICE_OCR: &str = "purchase_invoice_ocr";
    pub const MANUAL_ENTRY: &str = "manual_entry";
    pub const BANK_STATEMENT_UPLOAD: &str = "bank_statement_upload";
    /// Deprecated alias for [`BANK_STATEMENT_UPLOAD`], still present on older
    /// records. Accepted indefinitely.
    pub const BANK_STATEMENT_OCR: &str = "bank_statement_ocr";
    pub const CREDIT_CARD_STATEMENT_UPLOAD: &str = "credit_card_statement_upload";
    pub const POS_ONE_OFF_ITEM: &str = "pos_one_off_item";
}

/// Known `capture.mechanism` tags.
pub mod capture_mechanisms {
    pub const OCR: &str = "ocr";
    pub const MANUAL: &str = "manual";
}

// ============================================================================
// STATUS ENUMS (string literals are part of the backend contract)
// ============================================================================

/// Explicit classification assigned by the backend, when it has one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Sale,
    Purchase,
}

/// Verification state of a transaction.
///
/// `Exception` means a bookkeeper verified the record but flagged it; for
/// most pipeline rules it counts alongside `Verified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerificationStatus {
    #[default]
    Unverified,
    Verified,
    Exception,
}

/// Reconciliation state against an external bank/card statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationStatus {
    #[default]
    Unreconciled,
    PendingBankMatch,
    /// Legacy value still emitted for records reconciled before the status
    /// model was reworked. Treated the same as `Reconciled`.
    Matched,
    Reconciled,
    Exception,
    NotRequired,
}

/// Which external statement a purchase must reconcile against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconciliationType {
    BankTransfer,
    Card,
}

// ============================================================================
// TRANSACTION RECORD
// ============================================================================

/// A transaction as fetched from the backend. Append-only from this crate's
/// point of view: classification never mutates it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Opaque unique identifier.
    pub id: String,

    pub summary: Summary,

    #[serde(default)]
    pub metadata: Metadata,

    #[serde(default)]
    pub accounting: Accounting,

    /// Legacy detail payload. Older records keep payment information here
    /// instead of under `accounting`.
    #[serde(default)]
    pub details: Details,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    #[serde(default)]
    pub third_party_name: String,

    #[serde(default)]
    pub description: String,

    /// Signed amount in minor units (cents). Integer, never a float.
    pub total_amount: i64,

    /// ISO 4217 currency code.
    #[serde(default)]
    pub currency: String,

    /// Epoch milliseconds.
    pub transaction_date: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Metadata {
    #[serde(default)]
    pub classification: Classification,

    #[serde(default)]
    pub capture: Capture,

    #[serde(default)]
    pub verification: Verification,

    #[serde(default)]
    pub reconciliation: Reconciliation,

    #[serde(default)]
    pub statement_context: StatementContext,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    /// Absent when the backend could not classify the record; the resolver
    /// in `classify` falls back to weaker signals.
    #[serde(default)]
    pub kind: Option<TransactionKind>,
}

/// Provenance: where the record entered the system and how.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Capture {
    #[serde(default)]
    pub source: String,

    #[serde(default)]
    pub mechanism: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verification {
    #[serde(default)]
    pub status: VerificationStatus,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation {
    #[serde(default)]
    pub status: ReconciliationStatus,

    /// Only set on purchases; sales and statement entries carry `None`.
    #[serde(default, rename = "type")]
    pub kind: Option<ReconciliationType>,
}

/// Flags written by statement ingestion. `is_credit` is authoritative for
/// the money-in/money-out question when present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementContext {
    #[serde(default)]
    pub is_credit: Option<bool>,
}

// ============================================================================
// ACCOUNTING PAYLOAD
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accounting {
    #[serde(default)]
    pub debits: Vec<AccountingEntry>,

    #[serde(default)]
    pub credits: Vec<AccountingEntry>,

    /// Current home of the payment breakdown. Legacy locations live under
    /// `details`; see `payment::extract_payment_methods` for precedence.
    #[serde(default)]
    pub payment_breakdown: Vec<PaymentEntry>,
}

/// One debit or credit line against a chart-of-accounts account.
///
/// `amount` is a non-negative magnitude in minor units. Direction is carried
/// by which side (debits/credits) the entry sits on plus the account flags,
/// never by the sign of the amount.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountingEntry {
    #[serde(default)]
    pub chart_name: String,

    pub amount: i64,

    #[serde(default)]
    pub is_asset: Option<bool>,

    #[serde(default)]
    pub is_liability: Option<bool>,

    #[serde(default)]
    pub is_income: Option<bool>,

    #[serde(default)]
    pub payment_method: Option<String>,
}

/// Legacy detail payload kept for records written before the accounting
/// payload absorbed payment data.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    #[serde(default)]
    pub payment_type: Vec<PaymentEntry>,

    #[serde(default)]
    pub payment_breakdown: Vec<PaymentEntry>,
}

/// One payment-method entry. Newer records use `type`, older ones
/// `paymentType`; either may be missing on malformed rows.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentEntry {
    #[serde(default, rename = "type")]
    pub kind: Option<String>,

    #[serde(default)]
    pub payment_type: Option<String>,
}

// ============================================================================
// PARTITIONS & MERGE
// ============================================================================

/// The two server-side partitions most list endpoints return:
/// `pending` holds unverified records, `source_of_truth` verified ones.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionPartitions {
    #[serde(default)]
    pub pending: Vec<Transaction>,

    #[serde(default)]
    pub source_of_truth: Vec<Transaction>,
}

impl TransactionPartitions {
    /// All transactions across both partitions, deduplicated by identifier.
    pub fn merged(&self) -> Vec<Transaction> {
        merge_partitions([self.pending.clone(), self.source_of_truth.clone()])
    }
}

/// Merges transaction collections fetched from multiple paginated sources
/// into one list, deduplicating by identifier.
///
/// First-seen wins: when the same id appears in several partitions (a record
/// caught mid-move between pending and source-of-truth), the earliest
/// occurrence is kept. The classifiers assume one logical transaction is
/// represented once.
pub fn merge_partitions<I>(partitions: I) -> Vec<Transaction>
where
    I: IntoIterator<Item = Vec<Transaction>>,
{
    let mut merged = Vec::new();
    for partition in partitions {
        merged.extend(partition);
    }
    dedupe_by_id(merged)
}

/// Deduplicates a transaction list by identifier, keeping the first
/// occurrence of each id in input order.
pub fn dedupe_by_id(transactions: Vec<Transaction>) -> Vec<Transaction> {
    let mut seen = std::collections::HashSet::new();
    let mut out = Vec::with_capacity(transactions.len());

    for tx in transactions {
        if seen.insert(tx.id.clone()) {
            out.push(tx);
        } else {
            tracing::debug!(id = %tx.id, "dropping duplicate transaction");
        }
    }

    out
}

// ============================================================================
// TESTS
// ============================================================================

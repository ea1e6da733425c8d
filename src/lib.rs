// Bookkeeping Core - Transaction lifecycle classification
// Exposes all modules for use in the CLI and tests

pub mod model;      // Typed wire records, partitions, dedup-by-id
pub mod payment;    // Payment-method extraction with legacy-field precedence
pub mod classify;   // Classification predicates + kind resolution
pub mod status;     // Verification / reconciliation predicates
pub mod pipeline;   // Column membership for the three pipelines
pub mod present;    // Display stubs, amount formatting, badges
pub mod ledger;     // Per-account ledger aggregation
pub mod business;   // Active business context selection

// Re-export commonly used types
pub use model::{
    capture_mechanisms, capture_sources,
    Accounting, AccountingEntry, Capture, Classification, Details, Metadata, PaymentEntry,
    Reconciliation, ReconciliationStatus, ReconciliationType, StatementContext, Summary,
    Transaction, TransactionKind, TransactionPartitions, Verification, VerificationStatus,
    dedupe_by_id, merge_partitions,
};
pub use payment::{extract_payment_methods, PaymentMethod};
pub use classify::{
    has_accounting_entries, has_accounts_payable_payment, has_accounts_receivable_payment,
    is_bank_transaction, is_cash_only_transaction, is_credit_card_transaction,
    is_credit_to_account, is_pos_sale_transaction, is_receipt_transaction, is_sale_transaction,
    resolve_kind, ResolvedKind,
};
pub use status::{
    is_audit_ready, is_reporting_ready, is_unreconciled, is_verified, is_verified_or_exception,
};
pub use pipeline::{
    ColumnAction, DisplayMode, PipelineClassifier, PipelineColumn, StatementKind,
    SUMMARY_DISPLAY_CAP,
};
pub use present::{
    status_badge, stub_for, stubs_for, AmountFormatter, PlainFormatter, StatusBadge,
    TransactionStub, MAX_TITLE_CHARS,
};
pub use ledger::{build_ledger, LedgerAccountType, LedgerDateRange, LedgerRow};
pub use business::{select_active_business, BusinessContext, Membership};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

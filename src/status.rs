// ✅ Status Predicates - Where is this transaction in its lifecycle?
// Verification and reconciliation metadata condensed into the handful of
// yes/no questions the pipelines and the ledger ask.

use crate::classify::has_accounting_entries;
use crate::model::{ReconciliationStatus, Transaction, VerificationStatus};

/// True when a bookkeeper has verified the record without reservations.
pub fn is_verified(tx: &Transaction) -> bool {
    tx.metadata.verification.status == VerificationStatus::Verified
}

/// True when the record is verified, with or without a flagged exception.
/// Most pipeline rules treat the two the same.
pub fn is_verified_or_exception(tx: &Transaction) -> bool {
    matches!(
        tx.metadata.verification.status,
        VerificationStatus::Verified | VerificationStatus::Exception
    )
}

/// True when reconciliation has reached a terminal state.
///
/// `matched` is the legacy spelling of `reconciled`; `exception` is terminal
/// because a human already looked at it; `not_required` never needed
/// matching in the first place.
pub fn is_audit_ready(tx: &Transaction) -> bool {
    matches!(
        tx.metadata.reconciliation.status,
        ReconciliationStatus::Matched
            | ReconciliationStatus::Reconciled
            | ReconciliationStatus::Exception
            | ReconciliationStatus::NotRequired
    )
}

/// True when reconciliation has not started.
///
/// A record can never be audit-ready and unreconciled at once; the status
/// is a single enum, so the conflict cannot be represented. Renderers that
/// pick an icon check [`is_audit_ready`] first.
pub fn is_unreconciled(tx: &Transaction) -> bool {
    tx.metadata.reconciliation.status == ReconciliationStatus::Unreconciled
}

/// True when the record can appear in financial reports: verified, and
/// either settled against a statement (or exempt) or already carrying
/// accounting entries.
pub fn is_reporting_ready(tx: &Transaction) -> bool {
    let settled = matches!(
        tx.metadata.reconciliation.status,
        ReconciliationStatus::Matched
            | ReconciliationStatus::Reconciled
            | ReconciliationStatus::NotRequired
    );

    is_verified(tx) && (settled || has_accounting_entries(tx))
}

// ============================================================================
// TESTS
// ============================================================================

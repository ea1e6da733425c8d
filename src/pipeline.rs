// 🚦 Pipeline Classifier - Column membership for the three pipelines
// Partitions fetched transaction collections into the named columns of the
// Sales, Purchases and Statements pipelines. Columns are filtered views:
// a transaction may appear in several columns or in none, and appearing in
// none is a valid outcome, not an error.

use std::cmp::Reverse;

use crate::classify::{
    has_accounting_entries, has_accounts_payable_payment, has_accounts_receivable_payment,
    is_bank_transaction, is_cash_only_transaction, is_credit_card_transaction,
    is_pos_sale_transaction, is_sale_transaction,
};
use crate::model::{
    ReconciliationStatus, ReconciliationType, Transaction, TransactionKind,
    TransactionPartitions, VerificationStatus,
};
use crate::status::{is_audit_ready, is_unreconciled, is_verified, is_verified_or_exception};

// ============================================================================
// DISPLAY MODE
// ============================================================================

/// How many transactions each column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DisplayMode {
    /// Dashboard summary: newest three per column.
    #[default]
    Summary,
    /// "View all" screen: no cap.
    All,
}

/// Per-column cap in summary view.
pub const SUMMARY_DISPLAY_CAP: usize = 3;

impl DisplayMode {
    fn cap(self) -> Option<usize> {
        match self {
            DisplayMode::Summary => Some(SUMMARY_DISPLAY_CAP),
            DisplayMode::All => None,
        }
    }
}

// ============================================================================
// COLUMN ACTIONS
// ============================================================================

/// Actions the UI offers on the transactions of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAction {
    Review,
    Match,
    RecordPayment,
    ViewDetails,
}

impl ColumnAction {
    pub fn label(&self) -> &'static str {
        match self {
            ColumnAction::Review => "Review",
            ColumnAction::Match => "Match",
            ColumnAction::RecordPayment => "Record payment",
            ColumnAction::ViewDetails => "View details",
        }
    }
}

// ============================================================================
// PIPELINE COLUMN
// ============================================================================

/// One named column of a pipeline for a single render pass.
#[derive(Debug, Clone)]
pub struct PipelineColumn {
    pub title: &'static str,
    pub actions: &'static [ColumnAction],
    /// Members, newest first, capped per display mode.
    pub transactions: Vec<Transaction>,
}

impl PipelineColumn {
    pub fn ids(&self) -> Vec<&str> {
        self.transactions.iter().map(|tx| tx.id.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

// ============================================================================
// STATEMENT KIND
// ============================================================================

/// Which external statement the Statements pipeline is showing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    Bank,
    Card,
}

impl StatementKind {
    pub fn title(&self) -> &'static str {
        match self {
            StatementKind::Bank => "Bank statements",
            StatementKind::Card => "Card statements",
        }
    }

    fn matches(&self, tx: &Transaction) -> bool {
        match self {
            StatementKind::Bank => is_bank_transaction(tx),
            StatementKind::Card => is_credit_card_transaction(tx),
        }
    }
}

// ============================================================================
// PIPELINE CLASSIFIER
// ============================================================================

/// Builds pipeline columns out of already-fetched transaction collections.
///
/// Pure: input collections are not mutated, and the same input always
/// produces the same columns in the same order. Callers merging several
/// paginated sources must dedupe by identifier first
/// (see `model::merge_partitions`).
#[derive(Debug, Clone, Copy, Default)]
pub struct PipelineClassifier {
    pub display_mode: DisplayMode,
}

impl PipelineClassifier {
    /// Summary view, newest three per column.
    pub fn summary() -> Self {
        PipelineClassifier {
            display_mode: DisplayMode::Summary,
        }
    }

    /// Uncapped view-all.
    pub fn view_all() -> Self {
        PipelineClassifier {
            display_mode: DisplayMode::All,
        }
    }

    /// Sales pipeline columns.
    ///
    /// Purchase-kind records are excluded from every column up front; the
    /// per-column rules only ever see sale candidates.
    pub fn sales_columns(&self, transactions: &[Transaction]) -> Vec<PipelineColumn> {
        let candidates: Vec<&Transaction> = transactions
            .iter()
            .filter(|tx| tx.metadata.classification.kind != Some(TransactionKind::Purchase))
            .collect();

        vec![
            self.build_column(
                "Unpaid invoices",
                &[ColumnAction::RecordPayment, ColumnAction::ViewDetails],
                &candidates,
                |tx| {
                    is_sale_transaction(tx)
                        && !is_pos_sale_transaction(tx)
                        && has_accounts_receivable_payment(tx)
                },
            ),
            self.build_column(
                "Awaiting bank match",
                &[ColumnAction::Match, ColumnAction::ViewDetails],
                &candidates,
                |tx| {
                    is_sale_transaction(tx)
                        && !is_pos_sale_transaction(tx)
                        && is_verified_or_exception(tx)
                        && !is_cash_only_transaction(tx)
                        && tx.metadata.reconciliation.status
                            == ReconciliationStatus::PendingBankMatch
                },
            ),
            self.build_column(
                "POS sales",
                &[ColumnAction::ViewDetails],
                &candidates,
                |tx| is_pos_sale_transaction(tx) && is_verified_or_exception(tx),
            ),
            self.build_column(
                "Sales invoices",
                &[ColumnAction::ViewDetails],
                &candidates,
                |tx| {
                    is_sale_transaction(tx)
                        && !is_pos_sale_transaction(tx)
                        && matches!(
                            tx.metadata.reconciliation.status,
                            ReconciliationStatus::Matched
                                | ReconciliationStatus::Reconciled
                                | ReconciliationStatus::Exception
                        )
                },
            ),
        ]
    }

    /// Purchases pipeline columns.
    ///
    /// Reads the server-side partitions directly: "Needs verification" comes
    /// from the pending partition, everything else from source-of-truth.
    pub fn purchase_columns(&self, partitions: &TransactionPartitions) -> Vec<PipelineColumn> {
        let pending: Vec<&Transaction> = partitions.pending.iter().collect();
        let verified: Vec<&Transaction> = partitions.source_of_truth.iter().collect();

        vec![
            self.build_column(
                "Needs verification",
                &[ColumnAction::Review],
                &pending,
                |tx| tx.metadata.verification.status == VerificationStatus::Unverified,
            ),
            self.build_column(
                "Unpaid purchases",
                &[ColumnAction::RecordPayment, ColumnAction::ViewDetails],
                &verified,
                |tx| {
                    is_verified(tx)
                        && has_accounts_payable_payment(tx)
                        && !matches!(
                            tx.metadata.reconciliation.status,
                            ReconciliationStatus::Matched
                                | ReconciliationStatus::Reconciled
                                | ReconciliationStatus::Exception
                        )
                        && !is_cash_only_transaction(tx)
                },
            ),
            self.build_column(
                "Awaiting bank match",
                &[ColumnAction::Match, ColumnAction::ViewDetails],
                &verified,
                |tx| {
                    is_verified(tx)
                        && tx.metadata.reconciliation.status
                            == ReconciliationStatus::PendingBankMatch
                        && tx.metadata.reconciliation.kind
                            == Some(ReconciliationType::BankTransfer)
                },
            ),
            self.build_column(
                "Awaiting card match",
                &[ColumnAction::Match, ColumnAction::ViewDetails],
                &verified,
                |tx| {
                    is_verified(tx)
                        && tx.metadata.reconciliation.status
                            == ReconciliationStatus::PendingBankMatch
                        && tx.metadata.reconciliation.kind == Some(ReconciliationType::Card)
                },
            ),
            self.build_column(
                "All done",
                &[ColumnAction::ViewDetails],
                &verified,
                |tx| {
                    is_verified(tx)
                        && matches!(
                            tx.metadata.reconciliation.status,
                            ReconciliationStatus::Reconciled | ReconciliationStatus::NotRequired
                        )
                },
            ),
        ]
    }

    /// Statements pipeline columns, parameterized by bank vs card.
    ///
    /// The statement-kind filter is applied to both partitions rather than
    /// trusting the fetch queries to have been scoped, so a mixed collection
    /// still classifies correctly.
    pub fn statement_columns(
        &self,
        kind: StatementKind,
        partitions: &TransactionPartitions,
    ) -> Vec<PipelineColumn> {
        let pending: Vec<&Transaction> = partitions
            .pending
            .iter()
            .filter(|tx| kind.matches(tx))
            .collect();
        let verified: Vec<&Transaction> = partitions
            .source_of_truth
            .iter()
            .filter(|tx| kind.matches(tx))
            .collect();

        vec![
            self.build_column(
                "Needs verification",
                &[ColumnAction::Review],
                &pending,
                has_accounting_entries,
            ),
            self.build_column(
                "Needs matching",
                &[ColumnAction::Match, ColumnAction::ViewDetails],
                &pending,
                |tx| !has_accounting_entries(tx),
            ),
            self.build_column(
                "Couldn't be matched",
                &[ColumnAction::Match, ColumnAction::ViewDetails],
                &verified,
                |tx| is_verified(tx) && is_unreconciled(tx),
            ),
            self.build_column(
                "All done",
                &[ColumnAction::ViewDetails],
                &verified,
                |tx| {
                    is_verified(tx)
                        && !is_unreconciled(tx)
                        && (is_audit_ready(tx) || has_accounting_entries(tx))
                },
            ),
        ]
    }

    /// Filter, sort newest-first, cap. The sort is stable, so records
    /// sharing a timestamp keep their fetch order.
    fn build_column(
        &self,
        title: &'static str,
        actions: &'static [ColumnAction],
        candidates: &[&Transaction],
        predicate: impl Fn(&Transaction) -> bool,
    ) -> PipelineColumn {
        let mut transactions: Vec<Transaction> = candidates
            .iter()
            .filter(|tx| predicate(tx))
            .map(|tx| (*tx).clone())
            .collect();

        transactions.sort_by_key(|tx| Reverse(tx.summary.transaction_date));

        if let Some(cap) = self.display_mode.cap() {
            transactions.truncate(cap);
        }

        PipelineColumn {
            title,
            actions,
            transactions,
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================

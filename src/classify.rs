// 🏷️ Classification Predicates - What kind of transaction is this?
// Pure boolean predicates over a transaction record. Every function here is
// total over possibly-absent fields: missing metadata means "condition not
// met", never a panic or an error.

use crate::model::{capture_mechanisms, capture_sources, Transaction, TransactionKind};
use crate::payment::extract_payment_methods;

// ============================================================================
// CHART ACCOUNT NAMES
// ============================================================================

/// Chart-of-accounts name the ingestion pipeline uses for the bank asset.
pub const BANK_CHART_NAME: &str = "Bank";

/// Chart-of-accounts name used for the credit-card liability.
pub const CARD_CHART_NAME: &str = "Card";

// ============================================================================
// PROVENANCE PREDICATES
// ============================================================================

/// True when the transaction came in through a bank statement upload.
///
/// `bank_statement_ocr` is a deprecated alias for the same ingestion path
/// and must keep working for records written before the rename.
pub fn is_bank_transaction(tx: &Transaction) -> bool {
    matches!(
        tx.metadata.capture.source.as_str(),
        capture_sources::BANK_STATEMENT_UPLOAD | capture_sources::BANK_STATEMENT_OCR
    )
}

/// True when the transaction came in through a credit-card statement upload.
pub fn is_credit_card_transaction(tx: &Transaction) -> bool {
    tx.metadata.capture.source == capture_sources::CREDIT_CARD_STATEMENT_UPLOAD
}

/// True for a point-of-sale one-off sale.
///
/// Both conditions are required: a one-off POS item without the `sale`
/// classification is not a POS sale.
pub fn is_pos_sale_transaction(tx: &Transaction) -> bool {
    tx.metadata.capture.source == capture_sources::POS_ONE_OFF_ITEM
        && tx.metadata.classification.kind == Some(TransactionKind::Sale)
}

/// Purchase-capture heuristic: did this record arrive the way receipts do?
pub fn is_receipt_transaction(tx: &Transaction) -> bool {
    let source = tx.metadata.capture.source.as_str();
    let mechanism = tx.metadata.capture.mechanism.as_str();

    matches!(
        source,
        capture_sources::PURCHASE_INVOICE_OCR | capture_sources::MANUAL_ENTRY
    ) || matches!(mechanism, capture_mechanisms::OCR | capture_mechanisms::MANUAL)
        || source.contains("purchase")
}

// ============================================================================
// KIND RESOLUTION (sale / purchase / unknown)
// ============================================================================

/// Classification outcome once every signal has been consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedKind {
    Sale,
    Purchase,
    Unknown,
}

/// Resolves the transaction kind with explicit precedence:
///
/// 1. the structural classification field set by the backend,
/// 2. accounting evidence (a credit entry flagged as income means a sale),
/// 3. the capture-source heuristic, weakest of the three.
///
/// The heuristic tier lives in [`kind_from_capture_source`] so it can be
/// tightened or removed without touching the stronger tiers.
pub fn resolve_kind(tx: &Transaction) -> ResolvedKind {
    if let Some(kind) = tx.metadata.classification.kind {
        return match kind {
            TransactionKind::Sale => ResolvedKind::Sale,
            TransactionKind::Purchase => ResolvedKind::Purchase,
        };
    }

    if tx
        .accounting
        .credits
        .iter()
        .any(|entry| entry.is_income == Some(true))
    {
        return ResolvedKind::Sale;
    }

    kind_from_capture_source(&tx.metadata.capture.source)
}

/// Heuristic tier of [`resolve_kind`]: guesses a kind from the capture
/// source alone.
///
/// Case-insensitive. A source containing "sale" or "invoice", or equal to
/// exactly "manual", reads as a sale; a receipt-shaped source reads as a
/// purchase. Known fuzziness: a manual purchase entry can land on the sale
/// side here, which is why this tier only runs when the stronger signals
/// are absent.
pub fn kind_from_capture_source(source: &str) -> ResolvedKind {
    let source = source.to_lowercase();

    if source.contains("sale") || source.contains("invoice") || source == "manual" {
        return ResolvedKind::Sale;
    }

    if source == capture_sources::MANUAL_ENTRY || source.contains("purchase") {
        return ResolvedKind::Purchase;
    }

    ResolvedKind::Unknown
}

/// True when the transaction resolves to a sale.
pub fn is_sale_transaction(tx: &Transaction) -> bool {
    resolve_kind(tx) == ResolvedKind::Sale
}

// ============================================================================
// PAYMENT PREDICATES
// ============================================================================

/// True when any payment method is accounts receivable (the customer owes).
pub fn has_accounts_receivable_payment(tx: &Transaction) -> bool {
    extract_payment_methods(tx)
        .iter()
        .any(|m| m.is_accounts_receivable())
}

/// True when any payment method is accounts payable (the business owes).
pub fn has_accounts_payable_payment(tx: &Transaction) -> bool {
    extract_payment_methods(tx)
        .iter()
        .any(|m| m.is_accounts_payable())
}

/// True when the payment list is non-empty and every entry is cash.
///
/// An empty list is NOT cash-only: a transaction with no payment
/// information must not be vacuously true here.
pub fn is_cash_only_transaction(tx: &Transaction) -> bool {
    let methods = extract_payment_methods(tx);
    !methods.is_empty() && methods.iter().all(|m| m.is_cash())
}

/// True when at least one debit or credit entry exists.
pub fn has_accounting_entries(tx: &Transaction) -> bool {
    !tx.accounting.debits.is_empty() || !tx.accounting.credits.is_empty()
}

// ============================================================================
// MONEY DIRECTION
// ============================================================================

/// Does this transaction represent money flowing INTO the business?
///
/// Signals are consulted strongest-first:
///
/// 1. Bank statement entries: the explicit `statementContext.isCredit` flag
///    when present; otherwise a debit against the bank asset account
///    (bank asset increasing means money in).
/// 2. Card statement entries: the explicit flag when present; otherwise a
///    debit against the card liability (liability decreasing means a
///    payment was made onto the card).
/// 3. An explicit `sale` classification.
/// 4. Any credit entry flagged as income.
///
/// The classification/income signals only apply to non-statement
/// transactions; a statement entry that fails its own branch is not a
/// credit.
pub fn is_credit_to_account(tx: &Transaction) -> bool {
    if is_bank_transaction(tx) {
        return match tx.metadata.statement_context.is_credit {
            Some(flag) => flag,
            None => tx
                .accounting
                .debits
                .iter()
                .any(|e| e.chart_name == BANK_CHART_NAME && e.is_asset == Some(true)),
        };
    }

    if is_credit_card_transaction(tx) {
        return match tx.metadata.statement_context.is_credit {
            Some(flag) => flag,
            None => tx
                .accounting
                .debits
                .iter()
                .any(|e| e.chart_name == CARD_CHART_NAME && e.is_liability == Some(true)),
        };
    }

    if tx.metadata.classification.kind == Some(TransactionKind::Sale) {
        return true;
    }

    tx.accounting
        .credits
        .iter()
        .any(|entry| entry.is_income == Some(true))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{
        AccountingEntry, PaymentEntry, Summary, Transaction, TransactionKind,
    };

    fn tx_with_source(source: &str) -> Transaction {
        let mut tx = bare_tx();
        tx.metadata.capture.source = source.to_string();
        tx
    }

    fn bare_tx() -> Transaction {
        Transaction {
            id: "tx_1".to_string(),
            summary: Summary::default(),
            metadata: Default::default(),
            accounting: Default::default(),
            details: Default::default(),
        }
    }

    fn payment(kind: &str) -> PaymentEntry {
        PaymentEntry {
            kind: Some(kind.to_string()),
            payment_type: None,
        }
    }

    fn chart_entry(chart_name: &str) -> AccountingEntry {
        AccountingEntry {
            chart_name: chart_name.to_string(),
            amount: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn test_bank_transaction_accepts_legacy_alias() {
        assert!(is_bank_transaction(&tx_with_source("bank_statement_upload")));
        assert!(is_bank_transaction(&tx_with_source("bank_statement_ocr")));
        assert!(!is_bank_transaction(&tx_with_source(
            "credit_card_statement_upload"
        )));
        assert!(!is_bank_transaction(&tx_with_source("manual_entry")));
        assert!(!is_bank_transaction(&bare_tx()));
    }

    #[test]
    fn test_pos_sale_requires_source_and_kind() {
        let mut tx = tx_with_source("pos_one_off_item");
        assert!(!is_pos_sale_transaction(&tx), "kind missing");

        tx.metadata.classification.kind = Some(TransactionKind::Purchase);
        assert!(!is_pos_sale_transaction(&tx), "wrong kind");

        tx.metadata.classification.kind = Some(TransactionKind::Sale);
        assert!(is_pos_sale_transaction(&tx));

        let mut other = tx_with_source("manual_entry");
        other.metadata.classification.kind = Some(TransactionKind::Sale);
        assert!(!is_pos_sale_transaction(&other), "wrong source");
    }

    #[test]
    fn test_receipt_heuristic() {
        assert!(is_receipt_transaction(&tx_with_source("purchase_invoice_ocr")));
        assert!(is_receipt_transaction(&tx_with_source("manual_entry")));
        assert!(is_receipt_transaction(&tx_with_source(
            "bulk_purchase_import"
        )));

        let mut tx = tx_with_source("some_new_source");
        tx.metadata.capture.mechanism = "ocr".to_string();
        assert!(is_receipt_transaction(&tx));

        assert!(!is_receipt_transaction(&tx_with_source(
            "bank_statement_upload"
        )));
    }

    #[test]
    fn test_resolve_kind_explicit_classification_wins() {
        // A source that screams "sale" loses to an explicit purchase kind.
        let mut tx = tx_with_source("sales_invoice_upload");
        tx.metadata.classification.kind = Some(TransactionKind::Purchase);
        assert_eq!(resolve_kind(&tx), ResolvedKind::Purchase);
        assert!(!is_sale_transaction(&tx));
    }

    #[test]
    fn test_resolve_kind_accounting_evidence_beats_heuristic() {
        let mut tx = tx_with_source("bulk_purchase_import");
        tx.accounting.credits = vec![AccountingEntry {
            is_income: Some(true),
            ..chart_entry("Sales")
        }];
        assert_eq!(resolve_kind(&tx), ResolvedKind::Sale);
    }

    #[test]
    fn test_kind_heuristic_tier() {
        assert_eq!(kind_from_capture_source("pos_sale_import"), ResolvedKind::Sale);
        assert_eq!(kind_from_capture_source("INVOICE_UPLOAD"), ResolvedKind::Sale);
        assert_eq!(kind_from_capture_source("manual"), ResolvedKind::Sale);
        assert_eq!(
            kind_from_capture_source("manual_entry"),
            ResolvedKind::Purchase
        );
        assert_eq!(
            kind_from_capture_source("bulk_purchase_import"),
            ResolvedKind::Purchase
        );
        assert_eq!(kind_from_capture_source(""), ResolvedKind::Unknown);
        assert_eq!(
            kind_from_capture_source("bank_statement_upload"),
            ResolvedKind::Unknown
        );
    }

    #[test]
    fn test_accounts_receivable_and_payable_variants() {
        let mut tx = bare_tx();
        tx.accounting.payment_breakdown = vec![payment("Accounts Receivable")];
        assert!(has_accounts_receivable_payment(&tx));
        assert!(!has_accounts_payable_payment(&tx));

        tx.accounting.payment_breakdown = vec![payment("accounts_payable")];
        assert!(has_accounts_payable_payment(&tx));

        // Malformed input is false, never an error.
        tx.accounting.payment_breakdown = vec![PaymentEntry::default()];
        assert!(!has_accounts_payable_payment(&tx));
    }

    #[test]
    fn test_cash_only_requires_non_empty_and_uniform() {
        let mut tx = bare_tx();
        assert!(!is_cash_only_transaction(&tx), "empty list is not cash-only");

        tx.accounting.payment_breakdown = vec![payment("cash"), payment("CASH ")];
        assert!(is_cash_only_transaction(&tx));

        tx.accounting.payment_breakdown = vec![payment("cash"), payment("card")];
        assert!(!is_cash_only_transaction(&tx));
    }

    #[test]
    fn test_has_accounting_entries() {
        let mut tx = bare_tx();
        assert!(!has_accounting_entries(&tx));

        tx.accounting.credits = vec![chart_entry("Sales")];
        assert!(has_accounting_entries(&tx));
    }

    #[test]
    fn test_credit_to_account_explicit_flag_is_authoritative() {
        let mut tx = tx_with_source("bank_statement_upload");
        tx.accounting.debits = vec![AccountingEntry {
            is_asset: Some(true),
            ..chart_entry("Bank")
        }];

        // Flag absent: the structural entry decides.
        assert!(is_credit_to_account(&tx));

        // Conflicting explicit flag wins in both directions.
        tx.metadata.statement_context.is_credit = Some(false);
        assert!(!is_credit_to_account(&tx));

        tx.accounting.debits.clear();
        tx.metadata.statement_context.is_credit = Some(true);
        assert!(is_credit_to_account(&tx));
    }

    #[test]
    fn test_credit_to_account_card_branch() {
        let mut tx = tx_with_source("credit_card_statement_upload");
        tx.accounting.debits = vec![AccountingEntry {
            is_liability: Some(true),
            ..chart_entry("Card")
        }];
        assert!(is_credit_to_account(&tx));

        // A card liability debit on a record without the liability flag is
        // not enough.
        tx.accounting.debits[0].is_liability = None;
        assert!(!is_credit_to_account(&tx));
    }

    #[test]
    fn test_credit_to_account_statement_branches_are_terminal() {
        // A bank entry classified as a sale still answers through the bank
        // branch, not the classification fallback.
        let mut tx = tx_with_source("bank_statement_upload");
        tx.metadata.classification.kind = Some(TransactionKind::Sale);
        assert!(!is_credit_to_account(&tx));
    }

    #[test]
    fn test_credit_to_account_non_statement_fallbacks() {
        let mut tx = tx_with_source("manual_entry");
        tx.metadata.classification.kind = Some(TransactionKind::Sale);
        assert!(is_credit_to_account(&tx));

        let mut tx = tx_with_source("manual_entry");
        tx.accounting.credits = vec![AccountingEntry {
            is_income: Some(true),
            ..chart_entry("Sales")
        }];
        assert!(is_credit_to_account(&tx));

        assert!(!is_credit_to_account(&bare_tx()));
    }
}

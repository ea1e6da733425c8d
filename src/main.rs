// Bookkeeping Core CLI - Drive the classifiers over a JSON export
// Loads a transaction export (the same shape the mobile app fetches),
// classifies it into pipeline columns, and prints or exports ledgers.

use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use bookkeeping_core::{
    build_ledger, capture_sources, merge_partitions, select_active_business, status_badge,
    AmountFormatter,
    stubs_for, AccountingEntry, LedgerAccountType, LedgerDateRange, Membership, PaymentEntry,
    PipelineClassifier, PipelineColumn, PlainFormatter, ReconciliationStatus, ReconciliationType,
    StatementKind, StatusBadge, Summary, Transaction, TransactionKind, TransactionPartitions,
    VerificationStatus,
};

// ============================================================================
// EXPORT FILE SHAPE
// ============================================================================

/// The on-disk export: memberships plus per-business transaction
/// collections, mirroring what the fetch layer hands the classifiers.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ExportFile {
    #[serde(default)]
    memberships: BTreeMap<String, Membership>,

    #[serde(default)]
    businesses: BTreeMap<String, BusinessExport>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BusinessExport {
    #[serde(default)]
    sales: Vec<Transaction>,

    #[serde(default)]
    purchases: TransactionPartitions,

    #[serde(default)]
    bank_statements: TransactionPartitions,

    #[serde(default)]
    card_statements: TransactionPartitions,
}

impl BusinessExport {
    /// Everything the business has, deduplicated by identifier.
    fn all_transactions(&self) -> Vec<Transaction> {
        merge_partitions([
            self.sales.clone(),
            self.purchases.pending.clone(),
            self.purchases.source_of_truth.clone(),
            self.bank_statements.pending.clone(),
            self.bank_statements.source_of_truth.clone(),
            self.card_statements.pending.clone(),
            self.card_statements.source_of_truth.clone(),
        ])
    }
}

// ============================================================================
// ENTRY POINT
// ============================================================================

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = env::args().collect();

    match args.get(1).map(String::as_str) {
        Some("sample") => run_sample(&args[2..]),
        Some("inspect") => run_inspect(&args[2..]),
        Some("ledger") => run_ledger(&args[2..]),
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn print_usage() {
    println!("bookkeeping-core {}", bookkeeping_core::VERSION);
    println!();
    println!("USAGE:");
    println!("  bookkeeping-core sample <out.json>");
    println!("  bookkeeping-core inspect <export.json> [--all]");
    println!("  bookkeeping-core ledger <export.json> <account> <type>");
    println!("      [--from YYYY-MM-DD] [--to YYYY-MM-DD] [--csv <out.csv>]");
    println!();
    println!("  <type> is one of: expense, asset, income, liability, equity");
}

fn load_export(path: &str) -> Result<ExportFile> {
    let content = fs::read_to_string(Path::new(path))
        .with_context(|| format!("Failed to read export file: {path}"))?;
    serde_json::from_str(&content).context("Failed to parse export JSON")
}

/// Picks the active business from the export, matching how the app resolves
/// its ambient business context once per session.
fn active_business(export: &ExportFile) -> Result<(String, &BusinessExport)> {
    let context = select_active_business(&export.memberships)
        .context("No non-personal business in memberships")?;
    let business = export
        .businesses
        .get(&context.business_id)
        .with_context(|| format!("No transactions for business {}", context.business_id))?;
    Ok((context.business_name, business))
}

// ============================================================================
// INSPECT
// ============================================================================

fn run_inspect(args: &[String]) -> Result<()> {
    let path = args.first().context("Missing export file argument")?;
    let view_all = args.iter().any(|a| a == "--all");

    let export = load_export(path)?;
    let (business_name, business) = active_business(&export)?;

    let classifier = if view_all {
        PipelineClassifier::view_all()
    } else {
        PipelineClassifier::summary()
    };

    println!("📊 {business_name}");

    println!("\n💰 Sales");
    print_columns(&classifier.sales_columns(&business.sales));

    println!("\n🧾 Purchases");
    print_columns(&classifier.purchase_columns(&business.purchases));

    for (kind, partitions) in [
        (StatementKind::Bank, &business.bank_statements),
        (StatementKind::Card, &business.card_statements),
    ] {
        println!("\n🏦 {}", kind.title());
        print_columns(&classifier.statement_columns(kind, partitions));
    }

    Ok(())
}

fn print_columns(columns: &[PipelineColumn]) {
    let formatter = PlainFormatter;

    for column in columns {
        let actions: Vec<&str> = column.actions.iter().map(|a| a.label()).collect();
        println!("  {} [{}]", column.title, actions.join(", "));

        if column.is_empty() {
            println!("    (none)");
            continue;
        }

        for stub in stubs_for(&column.transactions, &formatter) {
            let badge = match status_badge(&stub.original) {
                StatusBadge::AuditReady => "✓",
                StatusBadge::Unreconciled => "⚠",
                StatusBadge::InProgress => "•",
            };
            let direction = if stub.is_credit { "in" } else { "out" };
            println!("    {badge} {:<24} {:>12} ({direction})", stub.title, stub.amount);
        }
    }
}

// ============================================================================
// LEDGER
// ============================================================================

fn run_ledger(args: &[String]) -> Result<()> {
    let path = args.first().context("Missing export file argument")?;
    let account = args.get(1).context("Missing account name argument")?;
    let type_raw = args.get(2).context("Missing account type argument")?;

    let mut from: Option<NaiveDate> = None;
    let mut to: Option<NaiveDate> = None;
    let mut csv_out: Option<String> = None;

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--from" => {
                from = Some(parse_date(args.get(i + 1))?);
                i += 2;
            }
            "--to" => {
                to = Some(parse_date(args.get(i + 1))?);
                i += 2;
            }
            "--csv" => {
                csv_out = args.get(i + 1).cloned();
                if csv_out.is_none() {
                    bail!("--csv requires a path");
                }
                i += 2;
            }
            other => bail!("Unknown argument: {other}"),
        }
    }

    // An unrecognized account type skips the view with a warning instead of
    // failing it; one bad account must not break the screen.
    let Some(account_type) = LedgerAccountType::parse(type_raw) else {
        tracing::warn!(account_type = %type_raw, "unrecognized account type, nothing to show");
        println!("(no rows)");
        return Ok(());
    };

    let range = match (from, to) {
        (Some(start), Some(end)) => Some(LedgerDateRange::new(start, end)),
        (None, None) => None,
        _ => bail!("--from and --to must be given together"),
    };

    let export = load_export(path)?;
    let (business_name, business) = active_business(&export)?;
    let transactions = business.all_transactions();

    let rows = build_ledger(&transactions, account, account_type, range);

    println!(
        "📒 {business_name} | {account} ({}) | {} rows",
        account_type.as_str(),
        rows.len()
    );

    let formatter = PlainFormatter;
    for row in &rows {
        println!(
            "  {}  {:<24} {:>12} {:>12}",
            format_date(row.date_millis),
            row.transaction.summary.third_party_name,
            formatter.format_amount(row.signed_amount, &row.transaction.summary.currency, true),
            formatter.format_amount(row.running_balance, &row.transaction.summary.currency, true),
        );
    }

    if let Some(out) = csv_out {
        write_ledger_csv(&out, &rows)?;
        println!("✓ Wrote {} rows to {out}", rows.len());
    }

    Ok(())
}

fn parse_date(raw: Option<&String>) -> Result<NaiveDate> {
    let raw = raw.context("Missing date value")?;
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid date (expected YYYY-MM-DD): {raw}"))
}

fn format_date(epoch_millis: i64) -> String {
    match Local.timestamp_millis_opt(epoch_millis).single() {
        Some(dt) => dt.format("%Y-%m-%d").to_string(),
        None => "????-??-??".to_string(),
    }
}

fn write_ledger_csv(path: &str, rows: &[bookkeeping_core::LedgerRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file: {path}"))?;

    writer.write_record([
        "date",
        "counterparty",
        "description",
        "amount_minor",
        "running_balance_minor",
    ])?;

    for row in rows {
        writer.write_record([
            format_date(row.date_millis),
            row.transaction.summary.third_party_name.clone(),
            row.transaction.summary.description.clone(),
            row.signed_amount.to_string(),
            row.running_balance.to_string(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

// ============================================================================
// SAMPLE DATA
// ============================================================================

fn run_sample(args: &[String]) -> Result<()> {
    let path = args.first().context("Missing output file argument")?;

    let export = sample_export();
    let json = serde_json::to_string_pretty(&export)?;
    fs::write(path, json).with_context(|| format!("Failed to write {path}"))?;

    println!("✓ Wrote sample export to {path}");
    Ok(())
}

/// A small dataset touching every pipeline column at least once.
fn sample_export() -> ExportFile {
    let mut memberships = BTreeMap::new();
    memberships.insert(
        "biz_bakery".to_string(),
        Membership {
            business_name: "Corner Bakery".to_string(),
            personal: false,
        },
    );
    memberships.insert(
        "personal".to_string(),
        Membership {
            business_name: "Personal".to_string(),
            personal: true,
        },
    );

    // Sales
    let mut invoice = demo_tx("Cafe Miro", "Wholesale order #118", 48_000, 12);
    invoice.metadata.classification.kind = Some(TransactionKind::Sale);
    invoice.accounting.payment_breakdown = vec![payment("accounts_receivable")];

    let mut awaiting = demo_tx("Hotel Lane", "Catering deposit", 125_000, 6);
    awaiting.metadata.classification.kind = Some(TransactionKind::Sale);
    awaiting.metadata.verification.status = VerificationStatus::Verified;
    awaiting.metadata.reconciliation.status = ReconciliationStatus::PendingBankMatch;

    let mut pos = demo_tx("Walk-in", "Counter sale", 1_250, 1);
    pos.metadata.classification.kind = Some(TransactionKind::Sale);
    pos.metadata.capture.source = capture_sources::POS_ONE_OFF_ITEM.to_string();
    pos.metadata.verification.status = VerificationStatus::Verified;

    let mut settled = demo_tx("Cafe Miro", "Wholesale order #112", 45_500, 30);
    settled.metadata.classification.kind = Some(TransactionKind::Sale);
    settled.metadata.verification.status = VerificationStatus::Verified;
    settled.metadata.reconciliation.status = ReconciliationStatus::Reconciled;
    settled.accounting.credits = vec![income_entry("Sales", 45_500)];

    // Purchases
    let mut unverified = demo_tx("Mill Flour Co", "Flour delivery", -23_000, 2);
    unverified.metadata.classification.kind = Some(TransactionKind::Purchase);
    unverified.metadata.capture.source = capture_sources::PURCHASE_INVOICE_OCR.to_string();

    let mut unpaid = demo_tx("Dairy Direct", "Butter and cream", -9_800, 5);
    unpaid.metadata.classification.kind = Some(TransactionKind::Purchase);
    unpaid.metadata.verification.status = VerificationStatus::Verified;
    unpaid.accounting.payment_breakdown = vec![payment("accounts_payable")];

    let mut await_bank = demo_tx("City Energy", "Electricity", -14_200, 9);
    await_bank.metadata.classification.kind = Some(TransactionKind::Purchase);
    await_bank.metadata.verification.status = VerificationStatus::Verified;
    await_bank.metadata.reconciliation.status = ReconciliationStatus::PendingBankMatch;
    await_bank.metadata.reconciliation.kind = Some(ReconciliationType::BankTransfer);

    let mut await_card = demo_tx("Packaging Plus", "Boxes", -6_400, 4);
    await_card.metadata.classification.kind = Some(TransactionKind::Purchase);
    await_card.metadata.verification.status = VerificationStatus::Verified;
    await_card.metadata.reconciliation.status = ReconciliationStatus::PendingBankMatch;
    await_card.metadata.reconciliation.kind = Some(ReconciliationType::Card);

    let mut done = demo_tx("Mill Flour Co", "Flour delivery", -21_000, 33);
    done.metadata.classification.kind = Some(TransactionKind::Purchase);
    done.metadata.verification.status = VerificationStatus::Verified;
    done.metadata.reconciliation.status = ReconciliationStatus::Reconciled;
    done.accounting.debits = vec![expense_entry("Ingredients", 21_000)];

    // Bank statements
    let mut coded = demo_tx("CITY ENERGY LTD", "DD CITY ENERGY", -14_200, 3);
    coded.metadata.capture.source = capture_sources::BANK_STATEMENT_UPLOAD.to_string();
    coded.accounting.debits = vec![expense_entry("Utilities", 14_200)];

    let mut uncoded = demo_tx("TFR 88219", "TFR 88219", 125_000, 2);
    uncoded.metadata.capture.source = capture_sources::BANK_STATEMENT_OCR.to_string();
    uncoded.metadata.statement_context.is_credit = Some(true);

    let mut unmatched = demo_tx("CHQ 000312", "CHQ 000312", -5_000, 20);
    unmatched.metadata.capture.source = capture_sources::BANK_STATEMENT_UPLOAD.to_string();
    unmatched.metadata.verification.status = VerificationStatus::Verified;
    unmatched.metadata.reconciliation.status = ReconciliationStatus::Unreconciled;

    let mut bank_done = demo_tx("CAFE MIRO", "BACS CAFE MIRO", 45_500, 28);
    bank_done.metadata.capture.source = capture_sources::BANK_STATEMENT_UPLOAD.to_string();
    bank_done.metadata.verification.status = VerificationStatus::Verified;
    bank_done.metadata.reconciliation.status = ReconciliationStatus::Reconciled;
    bank_done.metadata.statement_context.is_credit = Some(true);
    bank_done.accounting.debits = vec![asset_entry("Bank", 45_500)];

    // Card statements
    let mut card_pending = demo_tx("PACKAGING PLUS", "CARD 8812", -6_400, 3);
    card_pending.metadata.capture.source =
        capture_sources::CREDIT_CARD_STATEMENT_UPLOAD.to_string();

    let mut card_done = demo_tx("FUEL STOP", "CARD 8812", -4_100, 15);
    card_done.metadata.capture.source = capture_sources::CREDIT_CARD_STATEMENT_UPLOAD.to_string();
    card_done.metadata.verification.status = VerificationStatus::Verified;
    card_done.metadata.reconciliation.status = ReconciliationStatus::Matched;
    card_done.accounting.debits = vec![expense_entry("Vehicle costs", 4_100)];

    let mut businesses = BTreeMap::new();
    businesses.insert(
        "biz_bakery".to_string(),
        BusinessExport {
            sales: vec![invoice, awaiting, pos, settled],
            purchases: TransactionPartitions {
                pending: vec![unverified],
                source_of_truth: vec![unpaid, await_bank, await_card, done],
            },
            bank_statements: TransactionPartitions {
                pending: vec![coded, uncoded],
                source_of_truth: vec![unmatched, bank_done],
            },
            card_statements: TransactionPartitions {
                pending: vec![card_pending],
                source_of_truth: vec![card_done],
            },
        },
    );

    ExportFile {
        memberships,
        businesses,
    }
}

fn demo_tx(name: &str, description: &str, amount_minor: i64, days_ago: i64) -> Transaction {
    Transaction {
        id: uuid::Uuid::new_v4().to_string(),
        summary: Summary {
            third_party_name: name.to_string(),
            description: description.to_string(),
            total_amount: amount_minor,
            currency: "GBP".to_string(),
            transaction_date: Utc::now().timestamp_millis() - days_ago * 86_400_000,
        },
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

fn expense_entry(chart_name: &str, amount: i64) -> AccountingEntry {
    AccountingEntry {
        chart_name: chart_name.to_string(),
        amount,
        ..Default::default()
    }
}

fn asset_entry(chart_name: &str, amount: i64) -> AccountingEntry {
    AccountingEntry {
        is_asset: Some(true),
        ..expense_entry(chart_name, amount)
    }
}

fn income_entry(chart_name: &str, amount: i64) -> AccountingEntry {
    AccountingEntry {
        is_income: Some(true),
        ..expense_entry(chart_name, amount)
    }
}

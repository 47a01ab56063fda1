//! Plain-text / JSON / CSV printing of engine results.

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::Serialize;
use spendlens_core::Decimal;
use spendlens_finance::{
    AggregateMap, Aggregation, CategoryView, DerivedMetrics, SavingsTrend, SummaryTotals,
};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Format {
    Text,
    Json,
    Csv,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SummaryJson<'a> {
    currency: &'a str,
    months: &'a [String],
    totals: &'a SummaryTotals,
    metrics: DerivedMetrics,
    map: &'a AggregateMap,
    diagnostics: Vec<String>,
}

pub fn write_summary(
    out: &mut impl Write,
    agg: &Aggregation,
    currency: &str,
    months: &[String],
    format: Format,
) -> Result<()> {
    if format == Format::Csv {
        bail!("csv output is only available for category tables; use text or json");
    }

    let metrics = agg.metrics();

    if format == Format::Json {
        let doc = SummaryJson {
            currency,
            months,
            totals: &agg.totals,
            metrics,
            map: &agg.map,
            diagnostics: agg.diagnostics.iter().map(|d| d.to_string()).collect(),
        };
        serde_json::to_writer_pretty(&mut *out, &doc).context("serialize summary")?;
        writeln!(out)?;
        return Ok(());
    }

    let t = &agg.totals;
    if !months.is_empty() {
        writeln!(out, "Months: {}\n", months.join(", "))?;
    }
    writeln!(out, "Total credited:             {:.2} {currency}", t.total_credited)?;
    writeln!(out, "Total non-investment debit: {:.2} {currency}", t.total_debited)?;
    writeln!(out, "Total investment:           {:.2} {currency}", t.total_invested)?;

    let trend = match metrics.savings_trend() {
        SavingsTrend::Surplus => "surplus",
        SavingsTrend::Deficit => "deficit",
    };
    writeln!(out, "\nSavings: {} {currency} ({trend})", money(metrics.savings))?;
    writeln!(out, "{}", metrics.threshold_summary())?;
    writeln!(out, "{}", metrics.advice())?;

    writeln!(out, "\nExpected allocations:")?;
    writeln!(out, "  50% essentials   : {:.2}", metrics.essentials)?;
    writeln!(out, "  30% lifestyle    : {:.2}", metrics.lifestyle)?;
    writeln!(out, "  50% + 30%        : {:.2}", metrics.essentials_plus_lifestyle)?;
    writeln!(out, "  20% investments  : {:.2}", metrics.investment_target)?;
    writeln!(out, "  50% + 30% + 20%  : {:.2}", metrics.total_credited)?;

    writeln!(out, "\nCategories:")?;
    for (category, table) in agg.map.iter() {
        writeln!(
            out,
            "  {:<12} entries={:<4} txns={:<4} total={}",
            category.label(),
            table.len(),
            table.total_count(),
            money(table.total_amount())
        )?;
    }

    if !agg.diagnostics.is_empty() {
        writeln!(out, "\nDiagnostics ({}):", agg.diagnostics.len())?;
        for d in &agg.diagnostics {
            writeln!(out, "  {d}")?;
        }
    }
    Ok(())
}

/// Two-place amount, or a marker for a sum outside the decimal range
fn money(amount: Option<Decimal>) -> String {
    match amount {
        Some(amount) => format!("{amount:.2}"),
        None => "out of range".to_string(),
    }
}

pub fn write_view(
    out: &mut impl Write,
    view: &CategoryView<'_>,
    currency: &str,
    format: Format,
) -> Result<()> {
    match format {
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, view).context("serialize view")?;
            writeln!(out)?;
        }
        Format::Csv => {
            let mut w = csv::Writer::from_writer(&mut *out);
            w.write_record(["description", "count", "total_amount", "invalid_amounts"])?;
            for row in &view.rows {
                w.write_record([
                    row.description.to_string(),
                    row.entry.count.to_string(),
                    row.entry.total_amount.to_string(),
                    row.entry.invalid_amounts.to_string(),
                ])?;
            }
            w.flush()?;
        }
        Format::Text => {
            if view.is_empty() {
                writeln!(out, "No transactions in {}", view.category)?;
                return Ok(());
            }
            writeln!(out, "{:<40} {:>6} {:>16}", "Description", "Count", "Total Amount")?;
            for row in &view.rows {
                let flag = if row.entry.invalid_amounts > 0 { " *" } else { "" };
                writeln!(
                    out,
                    "{:<40} {:>6} {:>12.2} {currency}{flag}",
                    row.description, row.entry.count, row.entry.total_amount
                )?;
            }
            writeln!(
                out,
                "{:<40} {:>6} {:>12} {currency}",
                "Total",
                "",
                money(view.per_category_total)
            )?;
            if view.rows.iter().any(|r| r.entry.invalid_amounts > 0) {
                writeln!(out, "\n* includes amounts counted but not summed")?;
            }
        }
    }
    Ok(())
}

//! Aggregator: folds a transaction batch into per-category description tables
//! and the run-level summary totals.
//!
//! Every call builds a brand-new [`Aggregation`]; nothing is shared between
//! runs, so a host can swap the previous result for the new one in one move.

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use spendlens_core::{AggregateEntry, Category, CategorySet, EngineError, Transaction, TxnType};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::category_rules::{Classification, Classifier, KeywordRules};
use crate::metrics::DerivedMetrics;
use crate::normalize::normalize;
use crate::view::{CategoryView, SortKey, SortOrder, sorted_view};

/// Insertion-ordered description -> entry table for one category.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CategoryTable {
    entries: Vec<(String, AggregateEntry)>,
    // description -> position in `entries`
    idx: HashMap<String, usize>,
}

impl CategoryTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn upsert(&mut self, key: &str, amount: Option<Decimal>) {
        match self.idx.get(key) {
            Some(&pos) => self.entries[pos].1.add(amount),
            None => {
                self.idx.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), AggregateEntry::first(amount)));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&AggregateEntry> {
        self.idx.get(key).map(|&pos| &self.entries[pos].1)
    }

    /// Entries in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AggregateEntry)> {
        self.entries.iter().map(|(k, e)| (k.as_str(), e))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn total_count(&self) -> u64 {
        self.entries.iter().map(|(_, e)| u64::from(e.count)).sum()
    }

    /// Sum of every entry; `None` if it leaves the decimal range
    pub fn total_amount(&self) -> Option<Decimal> {
        self.entries
            .iter()
            .try_fold(Decimal::ZERO, |acc, (_, e)| acc.checked_add(e.total_amount))
    }
}

impl Serialize for CategoryTable {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.entries.iter().map(|(k, e)| (k, e)))
    }
}

/// Category -> description table, one table per configured category, in
/// configured order.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateMap {
    tables: Vec<(Category, CategoryTable)>,
}

impl AggregateMap {
    pub fn empty(categories: &CategorySet) -> Self {
        Self {
            tables: categories
                .iter()
                .map(|c| (c.clone(), CategoryTable::new()))
                .collect(),
        }
    }

    fn table_mut(&mut self, category: &Category) -> Option<&mut CategoryTable> {
        self.tables
            .iter_mut()
            .find(|(c, _)| c == category)
            .map(|(_, t)| t)
    }

    pub fn get(&self, category: &Category) -> Option<&CategoryTable> {
        self.tables
            .iter()
            .find(|(c, _)| c == category)
            .map(|(_, t)| t)
    }

    pub fn entry(&self, category: &Category, key: &str) -> Option<&AggregateEntry> {
        self.get(category)?.get(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Category, &CategoryTable)> {
        self.tables.iter().map(|(c, t)| (c, t))
    }

    /// True when no category holds any entry
    pub fn is_empty(&self) -> bool {
        self.tables.iter().all(|(_, t)| t.is_empty())
    }

    /// Number of transactions recorded across every category
    pub fn total_count(&self) -> u64 {
        self.tables.iter().map(|(_, t)| t.total_count()).sum()
    }
}

impl Serialize for AggregateMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.tables.iter().map(|(c, t)| (c, t)))
    }
}

/// Run-level sums. Each valid transaction lands in exactly one of the three.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryTotals {
    pub total_credited: Decimal,
    pub total_debited: Decimal,
    pub total_invested: Decimal,
}

impl SummaryTotals {
    pub fn new(total_credited: Decimal, total_debited: Decimal, total_invested: Decimal) -> Self {
        Self {
            total_credited,
            total_debited,
            total_invested,
        }
    }

    /// Totals with one more amount recorded, or `None` on overflow.
    ///
    /// Investment keyword hits only count as invested when money left the
    /// account; an investment credit (redemption, dividend) is income.
    fn checked_record(
        &self,
        investment_match: bool,
        txn_type: TxnType,
        amount: Decimal,
    ) -> Option<Self> {
        let mut next = *self;
        let slot = match (investment_match, txn_type) {
            (true, TxnType::Debit) => &mut next.total_invested,
            (_, TxnType::Credit) => &mut next.total_credited,
            (false, TxnType::Debit) => &mut next.total_debited,
        };
        *slot = slot.checked_add(amount)?;
        Some(next)
    }

    pub fn metrics(&self) -> DerivedMetrics {
        DerivedMetrics::from_totals(self)
    }
}

/// A non-fatal problem met while aggregating
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// Position of the transaction in the input
    pub index: usize,
    pub description: String,
    pub error: EngineError,
}

impl Diagnostic {
    /// Whether the transaction was left out of the map entirely
    pub fn skipped(&self) -> bool {
        matches!(self.error, EngineError::UnknownCategory { .. })
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {:?}: {}", self.index, self.description, self.error)
    }
}

/// Immutable snapshot of one aggregation pass
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregation {
    pub map: AggregateMap,
    pub totals: SummaryTotals,
    pub diagnostics: Vec<Diagnostic>,
}

impl Aggregation {
    pub fn metrics(&self) -> DerivedMetrics {
        self.totals.metrics()
    }

    /// Sorted rows for one category; `None` if the category is not in the map
    pub fn view(
        &self,
        category: &Category,
        key: SortKey,
        order: SortOrder,
    ) -> Option<CategoryView<'_>> {
        self.map
            .get(category)
            .map(|table| sorted_view(category, table, key, order))
    }

    pub fn skipped_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.skipped()).count()
    }
}

/// Accumulator threaded through the fold
struct Pass<'a> {
    classifier: &'a Classifier,
    categories: &'a CategorySet,
    map: AggregateMap,
    totals: SummaryTotals,
    diagnostics: Vec<Diagnostic>,
}

impl Pass<'_> {
    fn diagnose(&mut self, index: usize, txn: &Transaction, error: EngineError) {
        self.diagnostics.push(Diagnostic {
            index,
            description: txn.description.clone(),
            error,
        });
    }

    fn step(mut self, index: usize, txn: &Transaction) -> Self {
        let declared = match txn.declared_table().map(|label| self.categories.resolve(label)) {
            None => None,
            Some(Ok(category)) => Some(category),
            Some(Err(error)) => {
                warn!(index, description = %txn.description, %error, "skipping transaction");
                self.diagnose(index, txn, error);
                return self;
            }
        };

        let key = normalize(&txn.description);
        let class = self.classifier.classify(key, txn.txn_type, declared.as_ref());

        let amount = match txn.parsed_amount() {
            Ok(amount) => self.admit(index, txn, &class, key, amount),
            Err(error) => {
                warn!(index, description = %txn.description, %error, "amount counted as zero");
                self.diagnose(index, txn, error);
                None
            }
        };

        // every category a classification can yield has a table
        match self.map.table_mut(&class.category) {
            Some(table) => table.upsert(key, amount),
            None => debug_assert!(false, "no table for {}", class.category),
        }
        self
    }

    /// Record a parsed amount in the totals if it also fits the entry's
    /// running total. Otherwise it is counted like an unparseable amount.
    fn admit(
        &mut self,
        index: usize,
        txn: &Transaction,
        class: &Classification,
        key: &str,
        amount: Decimal,
    ) -> Option<Decimal> {
        let fits_entry = self
            .map
            .entry(&class.category, key)
            .is_none_or(|entry| entry.fits(amount));
        let totals = self
            .totals
            .checked_record(class.investment_match, txn.txn_type, amount)
            .filter(|_| fits_entry);

        match totals {
            Some(totals) => {
                self.totals = totals;
                Some(amount)
            }
            None => {
                let error = EngineError::AmountOverflow { raw: txn.amount.clone() };
                warn!(index, description = %txn.description, %error, "amount counted as zero");
                self.diagnose(index, txn, error);
                None
            }
        }
    }
}

/// Aggregate a full transaction batch from scratch.
pub fn aggregate(
    transactions: &[Transaction],
    classifier: &Classifier,
    categories: &CategorySet,
) -> Aggregation {
    let pass = Pass {
        classifier,
        categories,
        map: AggregateMap::empty(categories),
        totals: SummaryTotals::default(),
        diagnostics: Vec::new(),
    };

    if transactions.is_empty() {
        debug!("no transactions to aggregate");
        return Aggregation {
            map: pass.map,
            totals: pass.totals,
            diagnostics: pass.diagnostics,
        };
    }

    let pass = transactions
        .iter()
        .enumerate()
        .fold(pass, |pass, (index, txn)| pass.step(index, txn));

    debug!(
        transactions = transactions.len(),
        recorded = pass.map.total_count(),
        diagnostics = pass.diagnostics.len(),
        "aggregation pass complete"
    );

    Aggregation {
        map: pass.map,
        totals: pass.totals,
        diagnostics: pass.diagnostics,
    }
}

/// Keyword rules and category set bundled for repeated runs
#[derive(Debug, Clone, Default)]
pub struct Engine {
    classifier: Classifier,
    categories: CategorySet,
}

impl Engine {
    pub fn new(rules: &KeywordRules, categories: CategorySet) -> Self {
        Self {
            classifier: Classifier::new(rules),
            categories,
        }
    }

    pub fn categories(&self) -> &CategorySet {
        &self.categories
    }

    /// Recompute everything for the current input
    pub fn run(&self, transactions: &[Transaction]) -> Aggregation {
        aggregate(transactions, &self.classifier, &self.categories)
    }
}

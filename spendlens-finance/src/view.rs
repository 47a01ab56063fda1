//! Sorted, read-only views over one category table, plus the host's view
//! selection ("details" summary vs a category table).

use rust_decimal::Decimal;
use serde::Serialize;
use spendlens_core::{AggregateEntry, Category, CategorySet, EngineError};
use std::cmp::Ordering;
use std::str::FromStr;

use crate::aggregator::CategoryTable;

/// Sentinel label that selects the summary view
pub const DETAILS_VIEW: &str = "details";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Count,
    #[default]
    Amount,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "count" => Ok(SortKey::Count),
            "amount" => Ok(SortKey::Amount),
            other => Err(format!("unknown sort key {other:?} (expected count|amount)")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            other => Err(format!("unknown sort order {other:?} (expected asc|desc)")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewRow<'a> {
    pub description: &'a str,
    #[serde(flatten)]
    pub entry: AggregateEntry,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView<'a> {
    pub category: Category,
    pub rows: Vec<ViewRow<'a>>,
    /// `None` when the sum leaves the decimal range
    pub per_category_total: Option<Decimal>,
}

impl CategoryView<'_> {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Order a category table by count or amount. Ties keep first-seen order in
/// both directions.
pub fn sorted_view<'a>(
    category: &Category,
    table: &'a CategoryTable,
    key: SortKey,
    order: SortOrder,
) -> CategoryView<'a> {
    let mut rows: Vec<ViewRow<'a>> = table
        .iter()
        .map(|(description, entry)| ViewRow {
            description,
            entry: *entry,
        })
        .collect();

    // sort_by is stable; flip the arguments rather than reversing the output
    match order {
        SortOrder::Asc => rows.sort_by(|a, b| compare(key, a, b)),
        SortOrder::Desc => rows.sort_by(|a, b| compare(key, b, a)),
    }

    CategoryView {
        category: category.clone(),
        rows,
        per_category_total: table.total_amount(),
    }
}

fn compare(key: SortKey, a: &ViewRow<'_>, b: &ViewRow<'_>) -> Ordering {
    match key {
        SortKey::Count => a.entry.count.cmp(&b.entry.count),
        SortKey::Amount => a.entry.total_amount.cmp(&b.entry.total_amount),
    }
}

/// What the host wants to show
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewSelection {
    #[default]
    Details,
    Category(Category),
}

impl ViewSelection {
    pub fn parse(label: &str, categories: &CategorySet) -> Result<Self, EngineError> {
        if label.trim().eq_ignore_ascii_case(DETAILS_VIEW) {
            return Ok(ViewSelection::Details);
        }
        categories.resolve(label).map(ViewSelection::Category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregator::Engine;
    use crate::category_rules::KeywordRules;
    use spendlens_core::{Transaction, TxnType};

    fn table_of(rows: &[(&str, &str)]) -> CategoryTable {
        let txns: Vec<_> = rows
            .iter()
            .map(|(desc, amount)| Transaction::new(*desc, *amount, TxnType::Debit))
            .collect();
        let engine = Engine::new(&KeywordRules::default(), CategorySet::default());
        engine.run(&txns).map.get(&Category::Debit).unwrap().clone()
    }

    fn descriptions<'a>(view: &'a CategoryView<'_>) -> Vec<&'a str> {
        view.rows.iter().map(|r| r.description).collect()
    }

    #[test]
    fn test_amount_sort_is_stable() {
        let table = table_of(&[("A", "100"), ("B", "50"), ("C", "100"), ("D", "100")]);
        let desc = sorted_view(&Category::Debit, &table, SortKey::Amount, SortOrder::Desc);
        assert_eq!(descriptions(&desc), ["A", "C", "D", "B"]);
        let asc = sorted_view(&Category::Debit, &table, SortKey::Amount, SortOrder::Asc);
        assert_eq!(descriptions(&asc), ["B", "A", "C", "D"]);
    }

    #[test]
    fn test_count_sort() {
        let table = table_of(&[
            ("A", "1"),
            ("B", "1"),
            ("B", "1"),
            ("C", "1"),
            ("B", "1"),
            ("C", "1"),
        ]);
        let view = sorted_view(&Category::Debit, &table, SortKey::Count, SortOrder::Desc);
        assert_eq!(descriptions(&view), ["B", "C", "A"]);
        assert_eq!(view.rows[0].entry.count, 3);
    }

    #[test]
    fn test_per_category_total() {
        let table = table_of(&[("A", "10.50"), ("B", "4.25"), ("A", "5")]);
        let view = sorted_view(&Category::Debit, &table, SortKey::Amount, SortOrder::Asc);
        assert_eq!(view.per_category_total, Some(Decimal::from_str("19.75").unwrap()));
        // the table itself is untouched
        assert_eq!(table.iter().next().unwrap().0, "A");
    }

    #[test]
    fn test_empty_table_view() {
        let table = CategoryTable::new();
        let view = sorted_view(&Category::Food, &table, SortKey::Count, SortOrder::Asc);
        assert!(view.is_empty());
        assert_eq!(view.per_category_total, Some(Decimal::ZERO));
    }

    #[test]
    fn test_parse_sort_options() {
        assert_eq!("COUNT".parse::<SortKey>().unwrap(), SortKey::Count);
        assert_eq!("desc".parse::<SortOrder>().unwrap(), SortOrder::Desc);
        assert!("size".parse::<SortKey>().is_err());
        assert!("up".parse::<SortOrder>().is_err());
    }

    #[test]
    fn test_view_selection() {
        let set = CategorySet::new(["rent"]).unwrap();
        assert_eq!(ViewSelection::parse("details", &set).unwrap(), ViewSelection::Details);
        assert_eq!(
            ViewSelection::parse("rent", &set).unwrap(),
            ViewSelection::Category(Category::Named("rent".into()))
        );
        assert_eq!(
            ViewSelection::parse("Food", &set).unwrap(),
            ViewSelection::Category(Category::Food)
        );
        assert!(ViewSelection::parse("movies", &set).is_err());
    }

    #[test]
    fn test_row_serializes_flat() {
        let table = table_of(&[("ATM", "500")]);
        let view = sorted_view(&Category::Debit, &table, SortKey::Amount, SortOrder::Desc);
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["category"], "debit");
        assert_eq!(json["rows"][0]["description"], "ATM");
        assert_eq!(json["rows"][0]["count"], 1);
    }
}

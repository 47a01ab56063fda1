//! spendlens-finance: description normalizer, keyword classifier, aggregator,
//! budget metrics and sorted views

pub mod aggregator;
pub mod category_rules;
pub mod metrics;
pub mod normalize;
pub mod view;

pub use aggregator::{
    AggregateMap, Aggregation, CategoryTable, Diagnostic, Engine, SummaryTotals, aggregate,
};
pub use category_rules::{Classification, Classifier, KeywordRules};
pub use metrics::{DerivedMetrics, SavingsTrend, ThresholdStatus};
pub use normalize::normalize;
pub use view::{
    CategoryView, DETAILS_VIEW, SortKey, SortOrder, ViewRow, ViewSelection, sorted_view,
};

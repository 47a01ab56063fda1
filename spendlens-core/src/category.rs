//! Category labels and the closed set a run is allowed to use.

use serde::{Serialize, Serializer};
use std::fmt;

use crate::error::{EngineError, Result};

/// Classification bucket for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Category {
    Credit,
    Debit,
    Investment,
    Food,
    Bill,
    /// Host-declared bucket, only obtainable through [`CategorySet::resolve`]
    Named(String),
}

impl Category {
    /// Built-in buckets, in display order
    pub const BUILTIN: [Category; 5] = [
        Category::Credit,
        Category::Debit,
        Category::Investment,
        Category::Food,
        Category::Bill,
    ];

    pub fn label(&self) -> &str {
        match self {
            Category::Credit => "credit",
            Category::Debit => "debit",
            Category::Investment => "investment",
            Category::Food => "food",
            Category::Bill => "bill",
            Category::Named(label) => label,
        }
    }

    pub fn is_builtin(&self) -> bool {
        !matches!(self, Category::Named(_))
    }

    fn builtin_from_label(label: &str) -> Option<Category> {
        Category::BUILTIN
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// The closed per-run set of categories: the five built-ins followed by any
/// extra labels the host declares.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategorySet {
    categories: Vec<Category>,
}

impl Default for CategorySet {
    fn default() -> Self {
        Self {
            categories: Category::BUILTIN.to_vec(),
        }
    }
}

impl CategorySet {
    /// Build a set from extra labels. Blank labels, labels that shadow a
    /// built-in and duplicates are rejected.
    pub fn new<I, S>(extra: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for raw in extra {
            let label = raw.as_ref().trim();
            if label.is_empty() {
                return Err(EngineError::InvalidConfig("blank category label".into()));
            }
            if Category::builtin_from_label(label).is_some() {
                return Err(EngineError::InvalidConfig(format!(
                    "category {label:?} is built in"
                )));
            }
            if label.eq_ignore_ascii_case("details") {
                return Err(EngineError::InvalidConfig(
                    "\"details\" is reserved for the summary view".into(),
                ));
            }
            let named = Category::Named(label.to_string());
            if set.categories.contains(&named) {
                return Err(EngineError::InvalidConfig(format!(
                    "category {label:?} declared twice"
                )));
            }
            set.categories.push(named);
        }
        Ok(set)
    }

    /// Map a host label onto a member of this set.
    /// Built-ins match case-insensitively, named labels exactly (after trim).
    pub fn resolve(&self, label: &str) -> Result<Category> {
        let label = label.trim();
        if let Some(builtin) = Category::builtin_from_label(label) {
            return Ok(builtin);
        }
        self.categories
            .iter()
            .find(|c| matches!(c, Category::Named(n) if n == label))
            .cloned()
            .ok_or_else(|| EngineError::UnknownCategory {
                label: label.to_string(),
            })
    }

    pub fn contains(&self, category: &Category) -> bool {
        self.categories.contains(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}

//! Deterministic keyword rules mapping normalized descriptions to buckets.
//!
//! Priority: bill keywords > food keywords > investment keywords > declared
//! source table > transaction type.

use serde::{Deserialize, Serialize};
use spendlens_core::{Category, TxnType};

/// Keyword sets as configured by the host. Matching is case-insensitive
/// substring containment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeywordRules {
    pub bill: Vec<String>,
    pub food: Vec<String>,
    pub investment: Vec<String>,
}

impl Default for KeywordRules {
    fn default() -> Self {
        fn owned(words: &[&str]) -> Vec<String> {
            words.iter().map(|w| w.to_string()).collect()
        }

        Self {
            bill: owned(&[
                "AIRTEL", "JIO", "VODAFONE", "BSNL", "ELECTRICITY", "BESCOM", "TATA POWER",
                "BROADBAND", "RECHARGE", "BILLDESK",
            ]),
            food: owned(&[
                "SWIGGY", "ZOMATO", "DOMINOS", "MCDONALDS", "KFC", "STARBUCKS", "BLINKIT",
                "ZEPTO", "BIGBASKET", "RESTAURANT", "CAFE",
            ]),
            investment: owned(&[
                "ZERODHA", "GROWW", "UPSTOX", "KUVERA", "INDMONEY", "MUTUAL", "ICCL", "NPS TRUST",
            ]),
        }
    }
}

/// Result of classifying one transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub category: Category,
    /// Investment keyword hit, independent of which bucket won
    pub investment_match: bool,
}

/// Keyword rules prepared for matching: upper-cased, blanks dropped.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    bill: Vec<String>,
    food: Vec<String>,
    investment: Vec<String>,
}

impl Classifier {
    pub fn new(rules: &KeywordRules) -> Self {
        fn prepare(words: &[String]) -> Vec<String> {
            words
                .iter()
                .map(|w| w.trim().to_uppercase())
                .filter(|w| !w.is_empty())
                .collect()
        }

        Self {
            bill: prepare(&rules.bill),
            food: prepare(&rules.food),
            investment: prepare(&rules.investment),
        }
    }

    /// Classify a normalized description. `declared` is the already-resolved
    /// source table, used only when no keyword matches.
    pub fn classify(
        &self,
        key: &str,
        txn_type: TxnType,
        declared: Option<&Category>,
    ) -> Classification {
        let desc = key.to_uppercase();
        let investment_match = any_hit(&desc, &self.investment);

        let category = if any_hit(&desc, &self.bill) {
            Category::Bill
        } else if any_hit(&desc, &self.food) {
            Category::Food
        } else if investment_match {
            Category::Investment
        } else if let Some(declared) = declared {
            declared.clone()
        } else {
            match txn_type {
                TxnType::Credit => Category::Credit,
                TxnType::Debit => Category::Debit,
            }
        };

        Classification {
            category,
            investment_match,
        }
    }
}

fn any_hit(desc: &str, words: &[String]) -> bool {
    words.iter().any(|w| desc.contains(w.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules() -> KeywordRules {
        KeywordRules {
            bill: vec!["airtel".into(), "FOOD BILL".into()],
            food: vec!["SWIGGY".into(), "FOOD".into()],
            investment: vec!["ZERODHA".into(), "  ".into()],
        }
    }

    #[test]
    fn test_bill_beats_food() {
        let c = Classifier::new(&rules());
        let result = c.classify("Monthly FOOD BILL", TxnType::Debit, None);
        assert_eq!(result.category, Category::Bill);
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let c = Classifier::new(&rules());
        assert_eq!(c.classify("Airtel Prepaid", TxnType::Debit, None).category, Category::Bill);
        assert_eq!(c.classify("swiggy", TxnType::Debit, None).category, Category::Food);
    }

    #[test]
    fn test_food_beats_investment() {
        let c = Classifier::new(&rules());
        let result = c.classify("SWIGGY ZERODHA", TxnType::Debit, None);
        assert_eq!(result.category, Category::Food);
        assert!(result.investment_match);
    }

    #[test]
    fn test_investment_bucket_ignores_type() {
        let c = Classifier::new(&rules());
        let debit = c.classify("ZERODHA BROKING", TxnType::Debit, None);
        let credit = c.classify("ZERODHA BROKING", TxnType::Credit, None);
        assert_eq!(debit.category, Category::Investment);
        assert_eq!(credit.category, Category::Investment);
        assert!(credit.investment_match);
    }

    #[test]
    fn test_fallback_to_type() {
        let c = Classifier::new(&rules());
        assert_eq!(c.classify("ACME PAYROLL", TxnType::Credit, None).category, Category::Credit);
        assert_eq!(c.classify("ATM", TxnType::Debit, None).category, Category::Debit);
    }

    #[test]
    fn test_declared_table_beats_type_but_not_keywords() {
        let c = Classifier::new(&rules());
        let rent = Category::Named("rent".into());
        assert_eq!(c.classify("LANDLORD", TxnType::Debit, Some(&rent)).category, rent);
        assert_eq!(c.classify("SWIGGY", TxnType::Debit, Some(&rent)).category, Category::Food);
    }

    #[test]
    fn test_blank_keyword_matches_nothing() {
        let c = Classifier::new(&rules());
        let result = c.classify("ANYTHING", TxnType::Debit, None);
        assert!(!result.investment_match);
        assert_eq!(result.category, Category::Debit);
    }
}

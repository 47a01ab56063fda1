//! Derived budget metrics (savings, debit ratio, 50/30/20 allocation).
//!
//! All values are pure functions of [`SummaryTotals`] and are recomputed on
//! demand. Ratios are `None` when nothing was credited, and any figure that
//! would leave the decimal range is `None` as well.

use rust_decimal::Decimal;
use serde::Serialize;
use spendlens_core::{EngineError, Result};

use crate::aggregator::SummaryTotals;

/// Share of credited funds non-investment spending should stay under
pub const SPEND_THRESHOLD_PCT: i64 = 80;

fn pct(n: i64) -> Decimal {
    Decimal::new(n, 2)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SavingsTrend {
    Surplus,
    Deficit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdStatus {
    Above,
    Within,
    NotApplicable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedMetrics {
    /// Credited minus debited; `None` if out of range
    pub savings: Option<Decimal>,
    /// Debited as a percentage of credited, 2 dp
    pub debit_ratio_pct: Option<Decimal>,
    /// Ratio minus the 80% threshold; positive means over budget
    pub over_budget_pct: Option<Decimal>,
    pub essentials: Decimal,
    pub lifestyle: Decimal,
    pub investment_target: Decimal,
    pub essentials_plus_lifestyle: Decimal,
    /// Non-investment spending ceiling (80% of credited)
    pub spend_ceiling: Decimal,
    pub total_credited: Decimal,
    pub total_debited: Decimal,
}

impl DerivedMetrics {
    pub fn from_totals(totals: &SummaryTotals) -> Self {
        let credited = totals.total_credited;
        let debit_ratio_pct = debit_ratio_pct(totals);
        let essentials = credited * pct(50);
        let lifestyle = credited * pct(30);

        Self {
            savings: credited.checked_sub(totals.total_debited),
            debit_ratio_pct,
            over_budget_pct: debit_ratio_pct
                .and_then(|r| r.checked_sub(Decimal::from(SPEND_THRESHOLD_PCT))),
            essentials,
            lifestyle,
            investment_target: credited * pct(20),
            essentials_plus_lifestyle: essentials + lifestyle,
            spend_ceiling: credited * pct(SPEND_THRESHOLD_PCT),
            total_credited: credited,
            total_debited: totals.total_debited,
        }
    }

    pub fn savings_trend(&self) -> SavingsTrend {
        if self.total_credited > self.total_debited {
            SavingsTrend::Surplus
        } else {
            SavingsTrend::Deficit
        }
    }

    pub fn threshold_status(&self) -> ThresholdStatus {
        match self.debit_ratio_pct {
            None => ThresholdStatus::NotApplicable,
            Some(r) if r > Decimal::from(SPEND_THRESHOLD_PCT) => ThresholdStatus::Above,
            Some(_) => ThresholdStatus::Within,
        }
    }

    /// 50/30/20 guidance sentence for the summary view
    pub fn advice(&self) -> String {
        match (self.savings_trend(), self.over_budget_pct) {
            (SavingsTrend::Surplus, Some(over)) => format!(
                "To meet the 50/30/20 rule: reduce non-investment debits to less than \
                 {:.2} (reduce by {:.2}%).",
                self.spend_ceiling,
                over.abs()
            ),
            (SavingsTrend::Surplus, None) => format!(
                "To meet the 50/30/20 rule: keep non-investment debits below {:.2}.",
                self.spend_ceiling
            ),
            (SavingsTrend::Deficit, _) => format!(
                "You have overspent, and your non-investment debits exceed the credited amount. \
                 Consider reducing your expenses to less than {:.2}.",
                self.spend_ceiling
            ),
        }
    }

    /// Sentence describing where the debit ratio sits against the threshold
    pub fn threshold_summary(&self) -> String {
        match (self.debit_ratio_pct, self.threshold_status()) {
            (Some(r), ThresholdStatus::Above) => format!(
                "The debit amount (excluding investment) is {r:.2}% of the total credited amount, \
                 which is higher than the {SPEND_THRESHOLD_PCT}% threshold."
            ),
            (Some(r), _) => format!(
                "The debit amount (excluding investment) is {r:.2}% of the total credited amount, \
                 which is within the acceptable threshold."
            ),
            (None, _) if self.total_credited.is_zero() => {
                "Nothing was credited, so the debit ratio is not applicable.".to_string()
            }
            (None, _) => "The debit ratio is out of range for these amounts.".to_string(),
        }
    }
}

/// `debited / credited * 100`, rounded to 2 dp; `None` without credits or
/// when the ratio overflows
pub fn debit_ratio_pct(totals: &SummaryTotals) -> Option<Decimal> {
    let r = totals.total_debited.checked_div(totals.total_credited)?;
    let mut ratio = r.checked_mul(Decimal::ONE_HUNDRED)?.round_dp(2);
    ratio.rescale(2);
    Some(ratio)
}

/// Same as [`debit_ratio_pct`] for hosts that want an error value
pub fn debit_ratio_pct_or_err(totals: &SummaryTotals) -> Result<Decimal> {
    if totals.total_credited.is_zero() {
        return Err(EngineError::DivisionByZero);
    }
    debit_ratio_pct(totals).ok_or(EngineError::RatioOutOfRange)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn totals(credited: &str, debited: &str) -> SummaryTotals {
        SummaryTotals::new(d(credited), d(debited), Decimal::ZERO)
    }

    #[test]
    fn test_budget_scenario() {
        let m = DerivedMetrics::from_totals(&totals("1000", "850"));
        assert_eq!(m.savings, Some(d("150")));
        assert_eq!(m.debit_ratio_pct, Some(d("85.00")));
        assert_eq!(m.over_budget_pct, Some(d("5.00")));
        assert_eq!(format!("{:.2}", m.debit_ratio_pct.unwrap()), "85.00");
        assert_eq!(m.threshold_status(), ThresholdStatus::Above);
        assert_eq!(m.savings_trend(), SavingsTrend::Surplus);
    }

    #[test]
    fn test_allocations() {
        let m = DerivedMetrics::from_totals(&totals("1000", "0"));
        assert_eq!(m.essentials, d("500"));
        assert_eq!(m.lifestyle, d("300"));
        assert_eq!(m.investment_target, d("200"));
        assert_eq!(m.essentials_plus_lifestyle, d("800"));
        assert_eq!(m.spend_ceiling, d("800"));
        assert_eq!(m.essentials + m.lifestyle + m.investment_target, m.total_credited);
    }

    #[test]
    fn test_zero_credit_is_not_applicable() {
        let t = totals("0", "300");
        let m = DerivedMetrics::from_totals(&t);
        assert_eq!(m.debit_ratio_pct, None);
        assert_eq!(m.over_budget_pct, None);
        assert_eq!(m.savings, Some(d("-300")));
        assert_eq!(m.savings_trend(), SavingsTrend::Deficit);
        assert_eq!(m.threshold_status(), ThresholdStatus::NotApplicable);
        assert_eq!(debit_ratio_pct_or_err(&t), Err(EngineError::DivisionByZero));
    }

    #[test]
    fn test_ratio_rounds_to_two_places() {
        let m = DerivedMetrics::from_totals(&totals("3", "1"));
        assert_eq!(m.debit_ratio_pct, Some(d("33.33")));
        assert_eq!(m.threshold_status(), ThresholdStatus::Within);
    }

    #[test]
    fn test_advice_messages() {
        let surplus = DerivedMetrics::from_totals(&totals("1000", "850"));
        assert_eq!(
            surplus.advice(),
            "To meet the 50/30/20 rule: reduce non-investment debits to less than \
             800.00 (reduce by 5.00%)."
        );
        assert!(surplus.threshold_summary().contains("higher than the 80% threshold"));

        let deficit = DerivedMetrics::from_totals(&totals("1000", "1200"));
        assert_eq!(deficit.savings_trend(), SavingsTrend::Deficit);
        assert!(deficit.advice().starts_with("You have overspent"));
        assert!(deficit.advice().ends_with("less than 800.00."));
    }

    #[test]
    fn test_huge_debit_ratio_out_of_range() {
        let t = totals("1", "1000000000000000000000000000");
        let m = DerivedMetrics::from_totals(&t);
        assert_eq!(m.debit_ratio_pct, None);
        assert_eq!(m.over_budget_pct, None);
        assert_eq!(m.threshold_status(), ThresholdStatus::NotApplicable);
        assert_eq!(m.savings_trend(), SavingsTrend::Deficit);
        assert_eq!(
            m.threshold_summary(),
            "The debit ratio is out of range for these amounts."
        );
        assert_eq!(debit_ratio_pct_or_err(&t), Err(EngineError::RatioOutOfRange));
    }

    #[test]
    fn test_savings_out_of_range() {
        let t = SummaryTotals::new(Decimal::MAX, Decimal::NEGATIVE_ONE, Decimal::ZERO);
        let m = DerivedMetrics::from_totals(&t);
        assert_eq!(m.savings, None);
        assert_eq!(m.savings_trend(), SavingsTrend::Surplus);
        assert!(m.spend_ceiling < m.total_credited);
    }

    #[test]
    fn test_within_threshold_summary() {
        let m = DerivedMetrics::from_totals(&totals("1000", "500"));
        assert_eq!(
            m.threshold_summary(),
            "The debit amount (excluding investment) is 50.00% of the total credited amount, \
             which is within the acceptable threshold."
        );
    }
}

//! Read-only views over ledger records used for tables and charts.
//!
//! All grouped results are ordered maps, so the same records always produce the
//! same output regardless of insertion or call order.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use super::{category::Category, record::ExpenseRecord};

/// Grouping key for monthly category totals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MonthCategory {
    pub month: String,
    pub category: Category,
}

impl MonthCategory {
    pub fn new(month: impl Into<String>, category: impl Into<Category>) -> Self {
        Self {
            month: month.into(),
            category: category.into(),
        }
    }
}

/// Records belonging to `user` (exact match). An empty `user` keeps everything.
pub fn filter_by_user(records: &[ExpenseRecord], user: &str) -> Vec<ExpenseRecord> {
    if user.is_empty() {
        return records.to_vec();
    }
    records
        .iter()
        .filter(|record| record.user == user)
        .cloned()
        .collect()
}

/// `YYYY-MM` for the record's date.
pub fn derive_month(record: &ExpenseRecord) -> String {
    record.month()
}

/// Sums amounts per `(month, category)`.
pub fn aggregate_by_month_category(records: &[ExpenseRecord]) -> BTreeMap<MonthCategory, f64> {
    let mut totals = BTreeMap::new();
    for record in records {
        let key = MonthCategory::new(derive_month(record), record.category.clone());
        *totals.entry(key).or_insert(0.0) += record.amount;
    }
    totals
}

/// Distinct receipt paths referenced by `records`.
pub fn list_receipts(records: &[ExpenseRecord]) -> BTreeSet<String> {
    records
        .iter()
        .filter_map(|record| record.receipt_path.as_deref())
        .filter(|path| !path.trim().is_empty())
        .map(str::to_string)
        .collect()
}

/// Distinct months in the order they first appear.
pub fn months(records: &[ExpenseRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    records
        .iter()
        .map(derive_month)
        .filter(|month| seen.insert(month.clone()))
        .collect()
}

pub fn records_in_month(records: &[ExpenseRecord], month: &str) -> Vec<ExpenseRecord> {
    records
        .iter()
        .filter(|record| derive_month(record) == month)
        .cloned()
        .collect()
}

/// Number of entries per category within `month`.
pub fn category_counts(records: &[ExpenseRecord], month: &str) -> BTreeMap<Category, usize> {
    let mut counts = BTreeMap::new();
    for record in records.iter().filter(|r| derive_month(r) == month) {
        *counts.entry(record.category.clone()).or_insert(0) += 1;
    }
    counts
}

/// Total amount per category within `month`.
pub fn category_totals(records: &[ExpenseRecord], month: &str) -> BTreeMap<Category, f64> {
    let mut totals = BTreeMap::new();
    for record in records.iter().filter(|r| derive_month(r) == month) {
        *totals.entry(record.category.clone()).or_insert(0.0) += record.amount;
    }
    totals
}

/// Per category, the `(month, total)` points in chronological order.
pub fn monthly_trend(records: &[ExpenseRecord]) -> BTreeMap<Category, Vec<(String, f64)>> {
    let mut series: BTreeMap<Category, Vec<(String, f64)>> = BTreeMap::new();
    for (key, total) in aggregate_by_month_category(records) {
        series
            .entry(key.category)
            .or_default()
            .push((key.month, total));
    }
    for points in series.values_mut() {
        points.sort_by(|a, b| a.0.cmp(&b.0));
    }
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::currency::Currency;
    use crate::ledger::KnownCategory;
    use chrono::NaiveDate;

    fn at(user: &str, y: i32, m: u32, d: u32, category: Category, amount: f64) -> ExpenseRecord {
        ExpenseRecord::new(
            user,
            NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            "item",
            amount,
            Currency::Usd,
            category,
        )
    }

    fn food() -> Category {
        KnownCategory::Food.into()
    }

    fn travel() -> Category {
        KnownCategory::Travel.into()
    }

    #[test]
    fn aggregates_by_month_and_category() {
        let records = vec![
            at("a", 2024, 1, 3, food(), 10.0),
            at("a", 2024, 1, 9, food(), 5.0),
            at("a", 2024, 2, 1, food(), 3.0),
        ];
        let totals = aggregate_by_month_category(&records);
        assert_eq!(totals.len(), 2);
        assert_eq!(totals[&MonthCategory::new("2024-01", food())], 15.0);
        assert_eq!(totals[&MonthCategory::new("2024-02", food())], 3.0);
    }

    #[test]
    fn aggregation_ignores_input_order() {
        let mut records = vec![
            at("a", 2024, 2, 1, travel(), 7.0),
            at("a", 2024, 1, 3, food(), 10.0),
            at("b", 2024, 1, 4, Category::Custom("Pets".into()), 2.0),
        ];
        let forward = aggregate_by_month_category(&records);
        records.reverse();
        let backward = aggregate_by_month_category(&records);
        assert_eq!(forward, backward);
        let keys: Vec<_> = forward.keys().map(|k| k.month.as_str()).collect();
        assert_eq!(keys, vec!["2024-01", "2024-01", "2024-02"]);
    }

    #[test]
    fn filter_by_user_is_exact_and_empty_keeps_all() {
        let records = vec![
            at("alice", 2024, 1, 1, food(), 1.0),
            at("bob", 2024, 1, 2, food(), 2.0),
            at("Alice", 2024, 1, 3, food(), 3.0),
            at("alice", 2024, 1, 4, food(), 4.0),
        ];
        let alice = filter_by_user(&records, "alice");
        assert_eq!(alice.len(), 2);
        assert!(alice.iter().all(|r| r.user == "alice"));
        assert_eq!(filter_by_user(&records, ""), records);
    }

    #[test]
    fn derive_month_pads_month() {
        let record = at("a", 2024, 3, 15, food(), 1.0);
        assert_eq!(derive_month(&record), "2024-03");
    }

    #[test]
    fn receipts_are_distinct_and_skip_blanks() {
        let records = vec![
            at("a", 2024, 1, 1, food(), 1.0).with_receipt("r/a.png"),
            at("a", 2024, 1, 2, food(), 1.0).with_receipt("r/a.png"),
            at("a", 2024, 1, 3, food(), 1.0),
            at("a", 2024, 1, 4, food(), 1.0).with_receipt("r/b.jpg"),
        ];
        let receipts = list_receipts(&records);
        assert_eq!(receipts.len(), 2);
        assert!(receipts.contains("r/a.png"));
        assert!(receipts.contains("r/b.jpg"));
    }

    #[test]
    fn months_keep_first_appearance_order() {
        let records = vec![
            at("a", 2024, 3, 1, food(), 1.0),
            at("a", 2024, 1, 1, food(), 1.0),
            at("a", 2024, 3, 9, food(), 1.0),
        ];
        assert_eq!(months(&records), vec!["2024-03", "2024-01"]);
        assert_eq!(records_in_month(&records, "2024-03").len(), 2);
    }

    #[test]
    fn monthly_breakdowns_count_and_sum() {
        let records = vec![
            at("a", 2024, 1, 1, food(), 4.0),
            at("a", 2024, 1, 2, food(), 6.0),
            at("a", 2024, 1, 3, travel(), 100.0),
            at("a", 2024, 2, 3, travel(), 50.0),
        ];
        let counts = category_counts(&records, "2024-01");
        assert_eq!(counts[&food()], 2);
        assert_eq!(counts[&travel()], 1);
        let totals = category_totals(&records, "2024-01");
        assert_eq!(totals[&food()], 10.0);
        assert_eq!(totals[&travel()], 100.0);
    }

    #[test]
    fn trend_lists_points_per_category() {
        let records = vec![
            at("a", 2024, 2, 1, travel(), 50.0),
            at("a", 2024, 1, 1, travel(), 20.0),
            at("a", 2024, 1, 5, food(), 3.0),
        ];
        let trend = monthly_trend(&records);
        assert_eq!(
            trend[&travel()],
            vec![("2024-01".to_string(), 20.0), ("2024-02".to_string(), 50.0)]
        );
        assert_eq!(trend[&food()], vec![("2024-01".to_string(), 3.0)]);
    }
}

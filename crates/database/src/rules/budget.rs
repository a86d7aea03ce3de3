//! Budget aggregation for a single event.

use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{BudgetCategory, BudgetItem, BudgetItemStatus};

pub const UNCATEGORISED: &str = "Uncategorised";

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct CategorySummary {
    /// `None` for the bucket holding items without a known category
    pub category_id: Option<String>,
    pub name: String,
    pub allocated_cents: i64,
    pub planned_cents: i64,
    pub actual_cents: i64,
    pub remaining_cents: i64,
    pub item_count: i64,
    pub over_budget: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct BudgetSummary {
    pub budget_cents: i64,
    pub planned_cents: i64,
    pub actual_cents: i64,
    pub committed_cents: i64,
    pub paid_cents: i64,
    pub spent_cents: i64,
    pub remaining_cents: i64,
    pub variance_cents: i64,
    pub utilisation_percent: f64,
    pub over_budget: bool,
    pub categories: Vec<CategorySummary>,
}

#[derive(Default)]
struct Bucket {
    planned: i64,
    actual: i64,
    count: i64,
}

impl Bucket {
    fn add(&mut self, item: &BudgetItem) {
        self.planned = self.planned.saturating_add(item.planned_cents);
        self.actual = self.actual.saturating_add(item.actual_cents);
        self.count += 1;
    }
}

/// Committed items count at their actual cost once known, otherwise at the
/// planned cost.
fn committed_amount(item: &BudgetItem) -> i64 {
    if item.actual_cents > 0 {
        item.actual_cents
    } else {
        item.planned_cents
    }
}

pub fn summarize(
    budget_cents: i64,
    categories: &[BudgetCategory],
    items: &[BudgetItem],
) -> BudgetSummary {
    let mut buckets: Vec<Bucket> = categories.iter().map(|_| Bucket::default()).collect();
    let mut uncategorised = Bucket::default();

    let mut planned: i64 = 0;
    let mut actual: i64 = 0;
    let mut committed: i64 = 0;
    let mut paid: i64 = 0;

    for item in items {
        match item.status {
            BudgetItemStatus::Cancelled => continue,
            BudgetItemStatus::Committed => {
                committed = committed.saturating_add(committed_amount(item))
            }
            BudgetItemStatus::Paid => paid = paid.saturating_add(item.actual_cents),
            BudgetItemStatus::Planned => {}
        }
        planned = planned.saturating_add(item.planned_cents);
        actual = actual.saturating_add(item.actual_cents);

        let slot = item
            .category_id
            .as_deref()
            .and_then(|id| categories.iter().position(|c| c.id == id));
        match slot {
            Some(index) => buckets[index].add(item),
            None => uncategorised.add(item),
        }
    }

    let mut category_summaries: Vec<CategorySummary> = categories
        .iter()
        .zip(buckets)
        .map(|(category, bucket)| CategorySummary {
            category_id: Some(category.id.clone()),
            name: category.name.clone(),
            allocated_cents: category.allocated_cents,
            planned_cents: bucket.planned,
            actual_cents: bucket.actual,
            remaining_cents: category.allocated_cents.saturating_sub(bucket.actual),
            item_count: bucket.count,
            over_budget: category.allocated_cents > 0 && bucket.actual > category.allocated_cents,
        })
        .collect();

    if uncategorised.count > 0 {
        category_summaries.push(CategorySummary {
            category_id: None,
            name: UNCATEGORISED.to_string(),
            allocated_cents: 0,
            planned_cents: uncategorised.planned,
            actual_cents: uncategorised.actual,
            remaining_cents: 0i64.saturating_sub(uncategorised.actual),
            item_count: uncategorised.count,
            over_budget: false,
        });
    }

    let spent = committed.saturating_add(paid);
    let remaining = budget_cents.saturating_sub(spent);

    BudgetSummary {
        budget_cents,
        planned_cents: planned,
        actual_cents: actual,
        committed_cents: committed,
        paid_cents: paid,
        spent_cents: spent,
        remaining_cents: remaining,
        variance_cents: planned.saturating_sub(actual),
        utilisation_percent: utilisation(spent, budget_cents),
        over_budget: remaining < 0,
        categories: category_summaries,
    }
}

fn utilisation(spent: i64, budget: i64) -> f64 {
    if budget <= 0 {
        return 0.0;
    }
    (spent as f64 * 1000.0 / budget as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{CreateBudgetCategoryRequest, CreateBudgetItemRequest};

    fn category(id: &str, name: &str, allocated: i64) -> BudgetCategory {
        BudgetCategory::from_request(
            id.into(),
            "evt",
            CreateBudgetCategoryRequest {
                name: name.into(),
                allocated_cents: allocated,
                color: None,
            },
            "now",
        )
    }

    fn item(
        category: Option<&str>,
        planned: i64,
        actual: i64,
        status: BudgetItemStatus,
    ) -> BudgetItem {
        BudgetItem::from_request(
            "i".into(),
            "evt",
            CreateBudgetItemRequest {
                category_id: category.map(str::to_string),
                description: "line".into(),
                vendor: None,
                planned_cents: planned,
                actual_cents: actual,
                status: Some(status),
                due_date: None,
                notes: None,
            },
            "now",
        )
    }

    #[test]
    fn totals_skip_cancelled_items() {
        let categories = [category("venue", "Venue", 50_000), category("food", "Food", 20_000)];
        let items = [
            item(Some("venue"), 40_000, 42_000, BudgetItemStatus::Paid),
            item(Some("food"), 15_000, 0, BudgetItemStatus::Committed),
            item(Some("food"), 10_000, 12_000, BudgetItemStatus::Committed),
            item(Some("food"), 3_000, 0, BudgetItemStatus::Planned),
            item(Some("venue"), 99_000, 99_000, BudgetItemStatus::Cancelled),
        ];

        let summary = summarize(100_000, &categories, &items);

        assert_eq!(summary.planned_cents, 68_000);
        assert_eq!(summary.actual_cents, 54_000);
        assert_eq!(summary.committed_cents, 27_000);
        assert_eq!(summary.paid_cents, 42_000);
        assert_eq!(summary.spent_cents, 69_000);
        assert_eq!(summary.remaining_cents, 31_000);
        assert_eq!(summary.variance_cents, 14_000);
        assert_eq!(summary.utilisation_percent, 69.0);
        assert!(!summary.over_budget);

        let venue = &summary.categories[0];
        assert_eq!(venue.item_count, 1);
        assert_eq!(venue.remaining_cents, 8_000);
        assert!(!venue.over_budget);

        let food = &summary.categories[1];
        assert_eq!(food.item_count, 3);
        assert_eq!(food.planned_cents, 28_000);
        assert_eq!(food.actual_cents, 12_000);
        assert!(!food.over_budget);
        assert_eq!(summary.categories.len(), 2);
    }

    #[test]
    fn unknown_and_missing_categories_fall_into_uncategorised() {
        let categories = [category("av", "AV", 0)];
        let items = [
            item(None, 1_000, 1_000, BudgetItemStatus::Paid),
            item(Some("deleted"), 500, 0, BudgetItemStatus::Planned),
            item(Some("av"), 2_000, 2_500, BudgetItemStatus::Paid),
        ];

        let summary = summarize(0, &categories, &items);
        assert_eq!(summary.categories.len(), 2);

        let av = &summary.categories[0];
        assert!(!av.over_budget, "zero allocation is never over budget");
        assert_eq!(av.remaining_cents, -2_500);

        let bucket = &summary.categories[1];
        assert_eq!(bucket.category_id, None);
        assert_eq!(bucket.name, UNCATEGORISED);
        assert_eq!(bucket.item_count, 2);
        assert_eq!(bucket.planned_cents, 1_500);

        assert_eq!(summary.utilisation_percent, 0.0);
        assert!(summary.over_budget);
    }

    #[test]
    fn category_over_allocation_is_flagged() {
        let categories = [category("swag", "Swag", 1_000)];
        let items = [item(Some("swag"), 900, 1_001, BudgetItemStatus::Paid)];
        let summary = summarize(3_000, &categories, &items);
        assert!(summary.categories[0].over_budget);
        assert_eq!(summary.utilisation_percent, 33.4);
    }

    #[test]
    fn huge_totals_saturate_instead_of_overflowing() {
        let items = [
            item(None, i64::MAX, 0, BudgetItemStatus::Planned),
            item(None, i64::MAX, i64::MAX, BudgetItemStatus::Paid),
            item(None, 10, i64::MAX, BudgetItemStatus::Committed),
        ];

        let summary = summarize(0, &[], &items);
        assert_eq!(summary.planned_cents, i64::MAX);
        assert_eq!(summary.spent_cents, i64::MAX);
        assert_eq!(summary.remaining_cents, -i64::MAX);
        assert!(summary.over_budget);
        assert_eq!(summary.categories[0].remaining_cents, -i64::MAX);
    }

    #[test]
    fn amounts_above_the_cap_are_rejected() {
        let oversized = item(None, i64::MAX, 0, BudgetItemStatus::Planned);
        assert!(oversized.validate().is_err());
        let capped = item(
            None,
            crate::validation::MAX_AMOUNT_CENTS,
            crate::validation::MAX_AMOUNT_CENTS,
            BudgetItemStatus::Paid,
        );
        assert!(capped.validate().is_ok());
        assert!(category("c", "Cap", i64::MAX).validate().is_err());
    }

    #[test]
    fn empty_budget_summary() {
        let summary = summarize(10_000, &[], &[]);
        assert_eq!(summary.spent_cents, 0);
        assert_eq!(summary.remaining_cents, 10_000);
        assert!(summary.categories.is_empty());
    }
}

//! Grouped aggregation over a filtered view.
//!
//! One pass over the rows accumulates every product the report needs: the
//! headline KPIs, profit grouped by region and by sub-category (ascending, so
//! the worst performer is first), sales by category (largest first), the
//! category/sub-category rollup, and the state-by-region profit pivot. All
//! sums are plain f64 accumulation in row order.
//!
//! Callers are expected to check for an empty view before aggregating; the
//! computations stay total anyway (zero denominators yield zero).

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::filter::FilteredView;

/// Pivot rows rendered by default. The tail of a fifty-state table adds
/// little once the loss-makers are visible at the top.
pub const DEFAULT_PIVOT_STATES: usize = 25;

#[derive(Debug, Clone, Serialize)]
pub struct Kpis {
    pub orders: usize,
    pub total_sales: f64,
    pub total_profit: f64,
    pub avg_discount: f64,
    /// Profit over sales; zero when sales are zero.
    pub margin: f64,
}

/// One group key and its accumulated measure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupTotal {
    pub key: String,
    pub value: f64,
}

/// Per-category totals for the leading sales ranking. Profit rides along so
/// the presentation can color high-sales categories by what they earn.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTotals {
    pub category: String,
    pub sales: f64,
    pub profit: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubCategoryRollup {
    pub category: String,
    pub sub_category: String,
    pub sales: f64,
    pub profit: f64,
    pub avg_discount: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PivotRow {
    pub state: String,
    /// Profit per region, aligned with [`StateRegionPivot::regions`] and
    /// zero-filled where a state never sold in a region.
    pub by_region: Vec<f64>,
    pub total: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct StateRegionPivot {
    pub regions: Vec<String>,
    /// States observed before truncation.
    pub state_count: usize,
    /// Worst totals first, truncated to the requested row limit.
    pub rows: Vec<PivotRow>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Aggregates {
    pub kpis: Kpis,
    /// Symmetric bound for profit color scales: the largest absolute row
    /// profit in the view, or 1.0 when every profit is zero so the scale
    /// never collapses.
    pub profit_color_bound: f64,
    pub profit_by_region: Vec<GroupTotal>,
    pub profit_by_sub_category: Vec<GroupTotal>,
    pub sales_by_category: Vec<CategoryTotals>,
    pub category_rollup: Vec<SubCategoryRollup>,
    pub state_region_pivot: StateRegionPivot,
}

#[derive(Debug, Default)]
struct RollupAcc {
    sales: f64,
    profit: f64,
    discount_sum: f64,
    count: usize,
}

impl Aggregates {
    pub fn compute(view: &FilteredView<'_>, pivot_limit: usize) -> Self {
        debug_assert!(!view.is_empty(), "aggregation expects a non-empty view");

        let mut total_sales = 0.0;
        let mut total_profit = 0.0;
        let mut discount_sum = 0.0;
        let mut max_abs_profit = 0.0_f64;
        let mut by_region: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_sub_category: BTreeMap<String, f64> = BTreeMap::new();
        let mut by_category: BTreeMap<String, (f64, f64)> = BTreeMap::new();
        let mut rollup: BTreeMap<(String, String), RollupAcc> = BTreeMap::new();
        let mut pivot_regions: BTreeSet<String> = BTreeSet::new();
        let mut pivot_cells: BTreeMap<String, BTreeMap<String, f64>> = BTreeMap::new();

        for order in view.iter() {
            total_sales += order.sales;
            total_profit += order.profit;
            discount_sum += order.discount;
            max_abs_profit = max_abs_profit.max(order.profit.abs());
            *by_region.entry(order.region.clone()).or_insert(0.0) += order.profit;
            *by_sub_category
                .entry(order.sub_category.clone())
                .or_insert(0.0) += order.profit;
            let category = by_category
                .entry(order.category.clone())
                .or_insert((0.0, 0.0));
            category.0 += order.sales;
            category.1 += order.profit;

            let acc = rollup
                .entry((order.category.clone(), order.sub_category.clone()))
                .or_default();
            acc.sales += order.sales;
            acc.profit += order.profit;
            acc.discount_sum += order.discount;
            acc.count += 1;

            pivot_regions.insert(order.region.clone());
            *pivot_cells
                .entry(order.state.clone())
                .or_default()
                .entry(order.region.clone())
                .or_insert(0.0) += order.profit;
        }

        let orders = view.len();
        let avg_discount = if orders == 0 {
            0.0
        } else {
            discount_sum / orders as f64
        };
        let margin = if total_sales == 0.0 {
            0.0
        } else {
            total_profit / total_sales
        };

        let profit_color_bound = symmetric_bound(max_abs_profit);

        Self {
            kpis: Kpis {
                orders,
                total_sales,
                total_profit,
                avg_discount,
                margin,
            },
            profit_color_bound,
            profit_by_region: sorted_ascending(by_region),
            profit_by_sub_category: sorted_ascending(by_sub_category),
            sales_by_category: category_totals_by_sales(by_category),
            category_rollup: rollup
                .into_iter()
                .map(|((category, sub_category), acc)| SubCategoryRollup {
                    category,
                    sub_category,
                    sales: acc.sales,
                    profit: acc.profit,
                    avg_discount: if acc.count == 0 {
                        0.0
                    } else {
                        acc.discount_sum / acc.count as f64
                    },
                })
                .collect(),
            state_region_pivot: build_pivot(pivot_regions, pivot_cells, pivot_limit),
        }
    }

    /// Lowest-profit region, if any rows were aggregated.
    pub fn worst_region(&self) -> Option<&GroupTotal> {
        self.profit_by_region.first()
    }

    pub fn worst_sub_category(&self) -> Option<&GroupTotal> {
        self.profit_by_sub_category.first()
    }
}

fn sorted_ascending(map: BTreeMap<String, f64>) -> Vec<GroupTotal> {
    let mut rows: Vec<GroupTotal> = map
        .into_iter()
        .map(|(key, value)| GroupTotal { key, value })
        .collect();
    rows.sort_by(|a, b| {
        a.value
            .partial_cmp(&b.value)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.key.cmp(&b.key))
    });
    rows
}

fn category_totals_by_sales(map: BTreeMap<String, (f64, f64)>) -> Vec<CategoryTotals> {
    let mut rows: Vec<CategoryTotals> = map
        .into_iter()
        .map(|(category, (sales, profit))| CategoryTotals {
            category,
            sales,
            profit,
        })
        .collect();
    rows.sort_by(|a, b| {
        b.sales
            .partial_cmp(&a.sales)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.category.cmp(&b.category))
    });
    rows
}

/// 1.0 keeps the color scale usable when every profit in the view is zero.
fn symmetric_bound(max_abs_profit: f64) -> f64 {
    if max_abs_profit == 0.0 {
        1.0
    } else {
        max_abs_profit
    }
}

fn build_pivot(
    regions: BTreeSet<String>,
    cells: BTreeMap<String, BTreeMap<String, f64>>,
    limit: usize,
) -> StateRegionPivot {
    let regions: Vec<String> = regions.into_iter().collect();
    let mut rows: Vec<PivotRow> = cells
        .into_iter()
        .map(|(state, by_region_map)| {
            let by_region: Vec<f64> = regions
                .iter()
                .map(|region| by_region_map.get(region).copied().unwrap_or(0.0))
                .collect();
            let total = by_region.iter().sum();
            PivotRow {
                state,
                by_region,
                total,
            }
        })
        .collect();
    rows.sort_by(|a, b| {
        a.total
            .partial_cmp(&b.total)
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.state.cmp(&b.state))
    });
    let state_count = rows.len();
    rows.truncate(limit);
    StateRegionPivot {
        regions,
        state_count,
        rows,
    }
}

mod common;

use std::path::PathBuf;

use profitlens::aggregate::{Aggregates, DEFAULT_PIVOT_STATES};
use profitlens::dataset::{Dataset, LoadOptions, Order};
use profitlens::filter::{FilterDomains, Selection};
use proptest::prelude::*;

use common::{TestWorkspace, sample_orders_csv};

fn load_sample() -> Dataset {
    let ws = TestWorkspace::new();
    let path = ws.write("superstore.csv", &sample_orders_csv());
    Dataset::load(&path, &LoadOptions::default()).expect("load sample")
}

#[test]
fn full_selection_keeps_the_whole_dataset() {
    let dataset = load_sample();
    let domains = FilterDomains::scan(&dataset.orders);
    let selection = Selection::full(&domains);
    let view = selection.apply(&dataset);
    assert_eq!(view.len(), dataset.row_count());
}

#[test]
fn two_row_scenario_through_the_whole_pipeline() {
    let ws = TestWorkspace::new();
    let path = ws.write(
        "superstore.csv",
        "Order Date,Sales,Profit,Discount,Quantity,Region,State,City,Category,Sub-Category,Segment,Customer ID\n\
         2016-11-08,100,20,0.2,1,East,New York,New York City,Furniture,Chairs,Consumer,C-1\n\
         2016-11-09,200,-50,0.4,1,West,California,Los Angeles,Technology,Phones,Corporate,C-2\n",
    );
    let dataset = Dataset::load(&path, &LoadOptions::default()).expect("load pair");

    let domains = FilterDomains::scan(&dataset.orders);
    let view = Selection::full(&domains).apply(&dataset);
    let agg = Aggregates::compute(&view, DEFAULT_PIVOT_STATES);

    assert!((agg.kpis.total_sales - 300.0).abs() < 1e-9);
    assert!((agg.kpis.total_profit + 30.0).abs() < 1e-9);
    assert!((agg.kpis.avg_discount - 0.3).abs() < 1e-9);
    assert!((agg.kpis.margin + 0.1).abs() < 1e-9);
    assert!((agg.profit_color_bound - 50.0).abs() < 1e-9);
    assert_eq!(agg.worst_region().map(|g| g.key.as_str()), Some("West"));

    // Capping the discount at 0.2 leaves only the East row.
    let mut narrowed = Selection::full(&domains);
    narrowed.discount_max = 0.2;
    let narrowed_view = narrowed.apply(&dataset);
    assert_eq!(narrowed_view.len(), 1);
    let narrowed_agg = Aggregates::compute(&narrowed_view, DEFAULT_PIVOT_STATES);
    assert!((narrowed_agg.kpis.total_profit - 20.0).abs() < 1e-9);
    assert_eq!(
        narrowed_agg.worst_region().map(|g| g.key.as_str()),
        Some("East")
    );
}

#[test]
fn narrowing_the_discount_shrinks_the_view() {
    let dataset = load_sample();
    let domains = FilterDomains::scan(&dataset.orders);
    let mut selection = Selection::full(&domains);
    selection.discount_max = 0.1;

    let view = selection.apply(&dataset);
    assert_eq!(view.len(), 2);
    assert!(view.iter().all(|order| order.discount <= 0.1));
}

#[test]
fn disjoint_axes_produce_an_empty_view() {
    let dataset = load_sample();
    let domains = FilterDomains::scan(&dataset.orders);
    let mut selection = Selection::full(&domains);
    selection.regions = ["South".to_string()].into();
    selection.categories = ["Technology".to_string()].into();

    let view = selection.apply(&dataset);
    assert!(view.is_empty());
}

const REGIONS: [&str; 3] = ["East", "South", "West"];
const CATEGORIES: [&str; 3] = ["Furniture", "Office Supplies", "Technology"];

fn synthetic_order(region: usize, category: usize, discount: f64, profit: f64) -> Order {
    Order {
        order_date: None,
        sales: profit.abs() * 4.0,
        profit,
        discount,
        quantity: 1,
        region: REGIONS[region % REGIONS.len()].to_string(),
        state: format!("State-{}", region % REGIONS.len()),
        city: "City".to_string(),
        category: CATEGORIES[category % CATEGORIES.len()].to_string(),
        sub_category: format!("Sub-{}", category % CATEGORIES.len()),
        segment: "Consumer".to_string(),
        customer_id: "C-1".to_string(),
    }
}

proptest! {
    #[test]
    fn views_contain_exactly_the_matching_orders(
        seeds in proptest::collection::vec((0usize..3, 0usize..3, 0.0f64..=0.8, -500.0f64..=500.0), 1..40),
        lo in 0.0f64..=0.4,
        span in 0.0f64..=0.4,
        keep_regions in proptest::collection::vec(any::<bool>(), 3)
    ) {
        let orders: Vec<Order> = seeds
            .iter()
            .map(|&(region, category, discount, profit)| {
                synthetic_order(region, category, discount, profit)
            })
            .collect();
        let dataset = Dataset {
            path: PathBuf::from("synthetic.csv"),
            orders,
            columns: Vec::new(),
            duplicates_removed: 0,
        };

        let domains = FilterDomains::scan(&dataset.orders);
        let mut selection = Selection::full(&domains);
        selection.regions = REGIONS
            .iter()
            .zip(&keep_regions)
            .filter(|(_, keep)| **keep)
            .map(|(region, _)| region.to_string())
            .collect();
        selection.discount_min = lo;
        selection.discount_max = lo + span;

        let view = selection.apply(&dataset);
        prop_assert!(view.len() <= dataset.row_count());
        prop_assert!(view.iter().all(|order| selection.matches(order)));
        let expected = dataset
            .orders
            .iter()
            .filter(|order| selection.matches(order))
            .count();
        prop_assert_eq!(view.len(), expected);

        if !view.is_empty() {
            let agg = Aggregates::compute(&view, DEFAULT_PIVOT_STATES);
            let profit: f64 = view.iter().map(|order| order.profit).sum();
            prop_assert!((agg.kpis.total_profit - profit).abs() < 1e-6);
            prop_assert!(
                view.iter()
                    .all(|order| agg.profit_color_bound >= order.profit.abs())
            );
            let regional: f64 = agg.profit_by_region.iter().map(|group| group.value).sum();
            prop_assert!((regional - profit).abs() < 1e-6);
            let pivot_total: f64 = agg
                .state_region_pivot
                .rows
                .iter()
                .map(|row| row.total)
                .sum();
            // At most three synthetic states, so the pivot is never truncated.
            prop_assert!((pivot_total - profit).abs() < 1e-6);
        }
    }
}

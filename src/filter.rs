//! Order filtering.
//!
//! A [`Selection`] narrows the dataset along four axes: region, category and
//! sub-category membership plus an inclusive discount range. Membership is
//! literal set membership, so an empty set selects nothing rather than
//! everything; [`Selection::full`] is the explicit way to select the whole
//! domain. Filtering borrows rows from the dataset instead of copying them.

use std::collections::{BTreeMap, BTreeSet};

use anyhow::{Result, anyhow};
use itertools::Itertools;
use log::debug;
use serde::Serialize;

use crate::dataset::{Dataset, Order};

/// Distinct values (with row counts) and discount bounds observed in a
/// dataset. This is what interactive callers present as filter controls.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FilterDomains {
    pub regions: BTreeMap<String, usize>,
    pub categories: BTreeMap<String, usize>,
    pub sub_categories: BTreeMap<String, usize>,
    pub discount_min: f64,
    pub discount_max: f64,
}

impl FilterDomains {
    pub fn scan(orders: &[Order]) -> Self {
        let mut domains = Self::default();
        let mut bounds: Option<(f64, f64)> = None;
        for order in orders {
            *domains.regions.entry(order.region.clone()).or_insert(0) += 1;
            *domains
                .categories
                .entry(order.category.clone())
                .or_insert(0) += 1;
            *domains
                .sub_categories
                .entry(order.sub_category.clone())
                .or_insert(0) += 1;
            bounds = Some(match bounds {
                Some((lo, hi)) => (lo.min(order.discount), hi.max(order.discount)),
                None => (order.discount, order.discount),
            });
        }
        if let Some((lo, hi)) = bounds {
            domains.discount_min = lo;
            domains.discount_max = hi;
        }
        domains
    }

    /// Rejects selections naming values the dataset never contains. Catches
    /// typos before they silently filter everything away.
    pub fn validate(&self, selection: &Selection) -> Result<()> {
        ensure_known(&selection.regions, &self.regions, "region")?;
        ensure_known(&selection.categories, &self.categories, "category")?;
        ensure_known(
            &selection.sub_categories,
            &self.sub_categories,
            "sub-category",
        )?;
        Ok(())
    }
}

fn ensure_known(
    chosen: &BTreeSet<String>,
    domain: &BTreeMap<String, usize>,
    label: &str,
) -> Result<()> {
    for value in chosen {
        if !domain.contains_key(value) {
            return Err(anyhow!(
                "Unknown {label} '{value}'; available: {}",
                domain.keys().join(", ")
            ));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    pub regions: BTreeSet<String>,
    pub categories: BTreeSet<String>,
    pub sub_categories: BTreeSet<String>,
    pub discount_min: f64,
    pub discount_max: f64,
}

impl Selection {
    /// Everything the dataset offers: all domain values selected and the
    /// discount range at its observed bounds.
    pub fn full(domains: &FilterDomains) -> Self {
        Self {
            regions: domains.regions.keys().cloned().collect(),
            categories: domains.categories.keys().cloned().collect(),
            sub_categories: domains.sub_categories.keys().cloned().collect(),
            discount_min: domains.discount_min,
            discount_max: domains.discount_max,
        }
    }

    pub fn matches(&self, order: &Order) -> bool {
        self.regions.contains(&order.region)
            && self.categories.contains(&order.category)
            && self.sub_categories.contains(&order.sub_category)
            && order.discount >= self.discount_min
            && order.discount <= self.discount_max
    }

    pub fn apply<'a>(&self, dataset: &'a Dataset) -> FilteredView<'a> {
        let orders: Vec<&Order> = dataset
            .orders
            .iter()
            .filter(|order| self.matches(order))
            .collect();
        debug!(
            "Selection kept {} of {} orders",
            orders.len(),
            dataset.orders.len()
        );
        FilteredView { orders }
    }
}

/// The filtered slice of a dataset, borrowing its rows.
#[derive(Debug)]
pub struct FilteredView<'a> {
    pub orders: Vec<&'a Order>,
}

impl<'a> FilteredView<'a> {
    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Order> + '_ {
        self.orders.iter().copied()
    }
}

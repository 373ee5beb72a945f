//! Most popular products in the purchase log, by units sold and by distinct
//! buyers.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::analytics::max_tracker::{Leaders, MaxTracker};
use crate::models::PurchaseEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPopularity {
    pub by_quantity: Leaders<String>,
    pub by_buyers: Leaders<String>,
}

pub fn product_popularity(purchases: &[PurchaseEvent]) -> ProductPopularity {
    let mut quantities: HashMap<&str, u64> = HashMap::new();
    let mut buyers: HashSet<(&str, &str)> = HashSet::new();
    let mut buyer_counts: HashMap<&str, u64> = HashMap::new();
    let mut by_quantity = MaxTracker::new();
    let mut by_buyers = MaxTracker::new();

    for purchase in purchases {
        let product = purchase.product_id.as_str();

        // A zero-quantity line leaves the total unchanged.
        if purchase.quantity > 0 {
            let total = quantities.entry(product).or_insert(0);
            *total += u64::from(purchase.quantity);
            by_quantity.observe(product, *total);
        }

        if buyers.insert((product, purchase.user_id.as_str())) {
            let count = buyer_counts.entry(product).or_insert(0);
            *count += 1;
            by_buyers.observe(product, *count);
        }
    }

    debug!(
        products = buyer_counts.len(),
        max_quantity = by_quantity.max(),
        quantity_leaders = ?by_quantity.keys(),
        max_buyers = by_buyers.max(),
        buyer_leaders = ?by_buyers.keys(),
        "Computed product popularity"
    );

    ProductPopularity {
        by_quantity: by_quantity.into_leaders().map_keys(str::to_owned),
        by_buyers: by_buyers.into_leaders().map_keys(str::to_owned),
    }
}

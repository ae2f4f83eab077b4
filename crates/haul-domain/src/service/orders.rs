//! Order-number choices for a selected unloading site

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::dates::date_part;
use crate::model::Release;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderOption {
    pub order_no: String,
    /// Sum of every release for this site and order
    pub total_quantity: f64,
    pub latest_date: String,
}

pub fn order_options(site: &str, releases: &[Release]) -> Vec<OrderOption> {
    let site = site.trim();
    if site.is_empty() {
        return Vec::new();
    }

    let mut grouped: BTreeMap<&str, OrderOption> = BTreeMap::new();
    for release in releases.iter().filter(|r| r.site_name.trim() == site) {
        let order_no = release.order_no.trim();
        let day = date_part(&release.date);
        let option = grouped.entry(order_no).or_insert_with(|| OrderOption {
            order_no: order_no.to_string(),
            total_quantity: 0.0,
            latest_date: day.to_string(),
        });
        option.total_quantity += release.total_quantity;
        if day > option.latest_date.as_str() {
            option.latest_date = day.to_string();
        }
    }
    grouped.into_values().collect()
}

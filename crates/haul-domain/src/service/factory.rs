//! Factory stock view
//!
//! Per site, for one commodity: release totals next to a manually kept
//! opening balance and consumption figure.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{Commodity, FactoryBalance, OperationStatus, Release, TransportRecord};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FactoryBalanceRow {
    pub site: String,
    pub commodity: Commodity,
    pub opening: f64,
    pub manual_consumption: f64,
    pub total_released: f64,
    pub executed: f64,
    pub in_transit: f64,
    pub stopped: f64,
    /// Port-side figure, floored at zero
    pub release_remaining: f64,
    /// `opening + executed - manual_consumption`; may go negative
    pub factory_stock: f64,
}

impl FactoryBalanceRow {
    fn has_activity(&self) -> bool {
        self.total_released > 0.0 || self.opening > 0.0 || self.executed > 0.0 || self.in_transit > 0.0
    }
}

/// One row per site that has releases, trips or an opening balance
pub fn factory_balances(
    releases: &[Release],
    records: &[TransportRecord],
    overrides: &[FactoryBalance],
    commodity: Commodity,
) -> Vec<FactoryBalanceRow> {
    let releases: Vec<&Release> = releases
        .iter()
        .filter(|r| commodity.matches(&r.goods_type))
        .collect();
    let records: Vec<&TransportRecord> = records
        .iter()
        .filter(|r| commodity.matches(&r.goods_type))
        .collect();

    let sites: BTreeSet<&str> = releases
        .iter()
        .map(|r| r.site_name.trim())
        .chain(records.iter().map(|r| r.unloading_site.trim()))
        .chain(
            overrides
                .iter()
                .filter(|fb| commodity.matches(&fb.goods_type))
                .map(|fb| fb.site_name.trim()),
        )
        .filter(|s| !s.is_empty())
        .collect();

    sites
        .into_iter()
        .filter_map(|site| {
            let manual = overrides
                .iter()
                .find(|fb| fb.site_name.trim() == site && commodity.matches(&fb.goods_type));
            let opening = manual.map(|m| m.opening_balance).unwrap_or(0.0);
            let manual_consumption = manual.map(|m| m.manual_consumption).unwrap_or(0.0);

            let total_released: f64 = releases
                .iter()
                .filter(|r| r.site_name.trim() == site)
                .map(|r| r.total_quantity)
                .sum();

            let site_weight = |status: OperationStatus| -> f64 {
                records
                    .iter()
                    .filter(|r| r.unloading_site.trim() == site && r.status == status)
                    .map(|r| r.weight)
                    .sum()
            };
            let executed = site_weight(OperationStatus::Done);
            let in_transit = site_weight(OperationStatus::InProgress);
            let stopped = site_weight(OperationStatus::Stopped);

            let row = FactoryBalanceRow {
                site: site.to_string(),
                commodity,
                opening,
                manual_consumption,
                total_released,
                executed,
                in_transit,
                stopped,
                release_remaining: (total_released - executed - in_transit - stopped).max(0.0),
                factory_stock: opening + executed - manual_consumption,
            };
            row.has_activity().then_some(row)
        })
        .collect()
}

//! Release balance roll-ups
//!
//! Releases open a (site, order) key; trips only count against keys a
//! release opened. Trips for keys without a release are left out of this
//! view entirely.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::dates::date_part;
use crate::model::{OperationStatus, Release, SiteOrderKey, TransportRecord};

/// Balance of one (site, order) key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReleaseBalance {
    pub key: SiteOrderKey,
    /// Goods type of the first release seen for the key
    pub goods_type: String,
    /// Latest release date for the key (calendar part only)
    pub date: String,
    pub total_released: f64,
    pub executed: f64,
    pub in_transit: f64,
    pub stopped: f64,
}

impl ReleaseBalance {
    fn open(release: &Release) -> Self {
        Self {
            key: release.key(),
            goods_type: release.goods_type.clone(),
            date: date_part(&release.date).to_string(),
            total_released: 0.0,
            executed: 0.0,
            in_transit: 0.0,
            stopped: 0.0,
        }
    }

    /// Executed + in transit + stopped; may exceed the released total
    pub fn consumed(&self) -> f64 {
        self.executed + self.in_transit + self.stopped
    }

    /// Never negative; over-delivery clamps to zero
    pub fn remaining(&self) -> f64 {
        (self.total_released - self.consumed()).max(0.0)
    }

    /// Consumed share of the release, 0 when nothing was released
    pub fn completion_percent(&self) -> f64 {
        if self.total_released > 0.0 {
            (self.consumed() / self.total_released) * 100.0
        } else {
            0.0
        }
    }

    pub fn is_open(&self) -> bool {
        self.remaining() > 0.0
    }
}

/// Roll-up of every key that shares a site
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteBalance {
    pub site: String,
    pub order_count: usize,
    pub total_released: f64,
    pub executed: f64,
    pub in_transit: f64,
    pub stopped: f64,
    /// Sum of the per-key remaining figures
    pub remaining: f64,
}

impl SiteBalance {
    pub fn completion_percent(&self) -> f64 {
        if self.total_released > 0.0 {
            ((self.executed + self.in_transit + self.stopped) / self.total_released) * 100.0
        } else {
            0.0
        }
    }
}

/// Headline figures across all keys
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BalanceTotals {
    pub total_released: f64,
    pub executed: f64,
    pub in_transit: f64,
    pub stopped: f64,
    pub remaining: f64,
}

/// Per-(site, order) balances, ordered by key
pub fn release_balances(releases: &[Release], records: &[TransportRecord]) -> Vec<ReleaseBalance> {
    let mut balances: BTreeMap<SiteOrderKey, ReleaseBalance> = BTreeMap::new();

    for release in releases {
        let entry = balances
            .entry(release.key())
            .or_insert_with(|| ReleaseBalance::open(release));
        entry.total_released += release.total_quantity;
        let day = date_part(&release.date);
        if day > entry.date.as_str() {
            entry.date = day.to_string();
        }
    }

    for record in records {
        let Some(entry) = balances.get_mut(&record.key()) else {
            continue;
        };
        match record.status {
            OperationStatus::Done => entry.executed += record.weight,
            OperationStatus::InProgress => entry.in_transit += record.weight,
            OperationStatus::Stopped => entry.stopped += record.weight,
            OperationStatus::Other(_) => {}
        }
    }

    balances.into_values().collect()
}

/// Group key balances by site
pub fn site_summaries(balances: &[ReleaseBalance]) -> Vec<SiteBalance> {
    let mut sites: BTreeMap<&str, SiteBalance> = BTreeMap::new();
    for balance in balances {
        let site = sites
            .entry(balance.key.site.as_str())
            .or_insert_with(|| SiteBalance {
                site: balance.key.site.clone(),
                ..Default::default()
            });
        site.order_count += 1;
        site.total_released += balance.total_released;
        site.executed += balance.executed;
        site.in_transit += balance.in_transit;
        site.stopped += balance.stopped;
        site.remaining += balance.remaining();
    }
    sites.into_values().collect()
}

pub fn balance_totals(balances: &[ReleaseBalance]) -> BalanceTotals {
    balances.iter().fold(BalanceTotals::default(), |mut acc, b| {
        acc.total_released += b.total_released;
        acc.executed += b.executed;
        acc.in_transit += b.in_transit;
        acc.stopped += b.stopped;
        acc.remaining += b.remaining();
        acc
    })
}

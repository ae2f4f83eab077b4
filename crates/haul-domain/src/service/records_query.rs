//! Search and headline figures for the trip list

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::{OperationStatus, TransportRecord};

/// Filters applied to the trip list
#[derive(Debug, Clone, Default)]
pub struct RecordQuery {
    /// Substring of car number, driver, order number or waybill
    pub search: Option<String>,
    pub status: Option<OperationStatus>,
    pub site: Option<String>,
}

impl RecordQuery {
    fn matches(&self, record: &TransportRecord) -> bool {
        let matches_search = match self.search.as_deref().map(str::trim) {
            None | Some("") => true,
            Some(term) => {
                record.car_number.contains(term)
                    || record.driver_name.contains(term)
                    || record.order_no.contains(term)
                    || record.waybill_no.contains(term)
            }
        };
        let matches_status = self.status.as_ref().map_or(true, |s| &record.status == s);
        let matches_site = self
            .site
            .as_deref()
            .map_or(true, |s| record.unloading_site.trim() == s.trim());
        matches_search && matches_status && matches_site
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RecordStats {
    /// Tons of executed trips only
    pub executed_weight: f64,
    pub trips: usize,
    pub in_progress: usize,
    pub stopped: usize,
}

/// Matching trips, newest first; undated trips sort last
pub fn query_records<'a>(records: &'a [TransportRecord], query: &RecordQuery) -> Vec<&'a TransportRecord> {
    let mut matched: Vec<&TransportRecord> = records.iter().filter(|r| query.matches(r)).collect();
    matched.sort_by(|a, b| b.parsed_date().cmp(&a.parsed_date()));
    matched
}

pub fn record_stats(records: &[&TransportRecord]) -> RecordStats {
    records.iter().fold(RecordStats::default(), |mut stats, r| {
        stats.trips += 1;
        match r.status {
            OperationStatus::Done => stats.executed_weight += r.weight,
            OperationStatus::InProgress => stats.in_progress += 1,
            OperationStatus::Stopped => stats.stopped += 1,
            OperationStatus::Other(_) => {}
        }
        stats
    })
}

/// Distinct non-blank unloading sites, sorted
pub fn unique_sites(records: &[TransportRecord]) -> Vec<String> {
    records
        .iter()
        .map(|r| r.unloading_site.trim())
        .filter(|s| !s.is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip(id: &str, date: &str, car: &str, site: &str, weight: f64, status: OperationStatus) -> TransportRecord {
        TransportRecord {
            auto_id: id.to_string(),
            date: date.to_string(),
            car_number: car.to_string(),
            driver_name: "Hassan".to_string(),
            unloading_site: site.to_string(),
            order_no: "500".to_string(),
            waybill_no: format!("WB-{}", id),
            weight,
            status,
            ..Default::default()
        }
    }

    fn sample() -> Vec<TransportRecord> {
        vec![
            trip("1", "2024-05-01", "ق ر 11", "SiteA", 30.0, OperationStatus::Done),
            trip("2", "2024-05-03", "ق ر 22", "SiteB", 25.0, OperationStatus::InProgress),
            trip("3", "", "م ن 33", "SiteA", 28.0, OperationStatus::Stopped),
            trip("4", "2024-05-02", "م ن 44", " SiteA ", 31.0, OperationStatus::Done),
        ]
    }

    #[test]
    fn test_sorted_newest_first_undated_last() {
        let records = sample();
        let ids: Vec<&str> = query_records(&records, &RecordQuery::default())
            .iter()
            .map(|r| r.auto_id.as_str())
            .collect();
        assert_eq!(ids, vec!["2", "4", "1", "3"]);
    }

    #[test]
    fn test_search_status_and_site_filters() {
        let records = sample();
        let query = RecordQuery {
            search: Some("م ن".to_string()),
            status: Some(OperationStatus::Done),
            site: Some("SiteA".to_string()),
        };
        let found = query_records(&records, &query);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].auto_id, "4");

        let by_waybill = RecordQuery {
            search: Some("WB-2".to_string()),
            ..Default::default()
        };
        assert_eq!(query_records(&records, &by_waybill)[0].auto_id, "2");
    }

    #[test]
    fn test_stats() {
        let records = sample();
        let all = query_records(&records, &RecordQuery::default());
        let stats = record_stats(&all);
        assert_eq!(stats.trips, 4);
        assert_eq!(stats.executed_weight, 61.0);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.stopped, 1);
    }

    #[test]
    fn test_unique_sites() {
        assert_eq!(unique_sites(&sample()), vec!["SiteA".to_string(), "SiteB".to_string()]);
    }

    #[test]
    fn test_empty_list_is_not_an_error() {
        let stats = record_stats(&query_records(&[], &RecordQuery::default()));
        assert_eq!(stats, RecordStats::default());
    }
}

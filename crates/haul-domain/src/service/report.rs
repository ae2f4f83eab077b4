//! Periodic movement report

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use haul_types::ValidationError;

use crate::model::{OperationStatus, Release, TransportRecord};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SiteReportRow {
    pub site: String,
    pub released: f64,
    /// Executed tons
    pub added: f64,
    pub stopped: f64,
    pub trips: usize,
}

impl SiteReportRow {
    pub fn completion_percent(&self) -> f64 {
        if self.released > 0.0 {
            (self.added / self.released) * 100.0
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub total_released: f64,
    pub total_added: f64,
    pub total_stopped: f64,
    pub total_trips: usize,
    pub sites: Vec<SiteReportRow>,
}

/// Totals for releases and trips dated within `from..=to`
///
/// Rows whose date cannot be parsed fall outside every period.
pub fn period_report(
    releases: &[Release],
    records: &[TransportRecord],
    from: NaiveDate,
    to: NaiveDate,
) -> Result<PeriodReport, ValidationError> {
    if from > to {
        return Err(ValidationError::ReversedRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    let in_period = |date: Option<NaiveDate>| date.is_some_and(|d| d >= from && d <= to);

    let mut sites: BTreeMap<String, SiteReportRow> = BTreeMap::new();

    let mut report = PeriodReport {
        from,
        to,
        total_released: 0.0,
        total_added: 0.0,
        total_stopped: 0.0,
        total_trips: 0,
        sites: Vec::new(),
    };

    for release in releases.iter().filter(|r| in_period(r.parsed_date())) {
        report.total_released += release.total_quantity;
        row_for(&mut sites, &release.site_name).released += release.total_quantity;
    }

    for record in records.iter().filter(|r| in_period(r.parsed_date())) {
        report.total_trips += 1;
        let row = row_for(&mut sites, &record.unloading_site);
        row.trips += 1;
        match record.status {
            OperationStatus::Done => {
                report.total_added += record.weight;
                row.added += record.weight;
            }
            OperationStatus::Stopped => {
                report.total_stopped += record.weight;
                row.stopped += record.weight;
            }
            _ => {}
        }
    }

    report.sites = sites.into_values().collect();
    Ok(report)
}

fn row_for<'m>(sites: &'m mut BTreeMap<String, SiteReportRow>, site: &str) -> &'m mut SiteReportRow {
    let site = site.trim().to_string();
    sites.entry(site.clone()).or_insert_with(|| SiteReportRow {
        site,
        ..Default::default()
    })
}

/// Plain-text rendering for terminals and log attachments
pub fn render_period_report(report: &PeriodReport) -> String {
    let mut out = String::new();
    out.push_str("==================================================\n");
    out.push_str("              Periodic Movement Report             \n");
    out.push_str("==================================================\n\n");
    out.push_str(&format!("  Period:           {} .. {}\n", report.from, report.to));
    out.push_str(&format!("  Released:         {:.2} t\n", report.total_released));
    out.push_str(&format!("  Executed:         {:.2} t\n", report.total_added));
    out.push_str(&format!("  Stopped:          {:.2} t\n", report.total_stopped));
    out.push_str(&format!("  Trips:            {}\n\n", report.total_trips));

    if report.sites.is_empty() {
        out.push_str("  No movement in this period.\n\n");
    } else {
        out.push_str(&format!(
            "{:<20} {:>11} {:>11} {:>11} {:>6} {:>8}\n",
            "Site", "Released", "Executed", "Stopped", "Trips", "Done %"
        ));
        out.push_str("-".repeat(72).as_str());
        out.push('\n');
        for row in &report.sites {
            out.push_str(&format!(
                "{:<20} {:>10.2}t {:>10.2}t {:>10.2}t {:>6} {:>7.1}%\n",
                truncate_str(&row.site, 19),
                row.released,
                row.added,
                row.stopped,
                row.trips,
                row.completion_percent()
            ));
        }
        out.push('\n');
    }
    out.push_str("==================================================\n");
    out
}

fn truncate_str(s: &str, max_len: usize) -> String {
    if s.chars().count() > max_len {
        let truncated: String = s.chars().take(max_len.saturating_sub(2)).collect();
        format!("{}..", truncated)
    } else {
        s.to_string()
    }
}

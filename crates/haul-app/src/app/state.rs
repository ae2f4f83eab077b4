use chrono::{DateTime, Local};

use haul_domain::model::{AppUser, Commodity, Dataset, FactoryBalance, Release, TransportRecord};
use haul_infra::ConnectionStatus;
use haul_types::{Error, Result};

use super::notice::Notice;

/// Everything the dashboard renders from
///
/// The server snapshot is authoritative: each successful refresh replaces
/// the dataset wholesale, including any optimistic edits made since.
#[derive(Debug, Clone, Default)]
pub struct AppState {
    pub dataset: Dataset,
    pub user: Option<AppUser>,
    pub commodity: Option<Commodity>,
    pub connection: ConnectionStatus,
    pub last_sync: Option<DateTime<Local>>,
    pub notices: Vec<Notice>,
}

impl AppState {
    pub fn require_user(&self) -> Result<&AppUser> {
        self.user.as_ref().ok_or(Error::NoSession)
    }

    pub fn require_commodity(&self) -> Result<Commodity> {
        self.commodity.ok_or(Error::NoCommodity)
    }

    /// Trips of the selected commodity; empty until one is selected
    pub fn records(&self) -> Vec<TransportRecord> {
        self.commodity
            .map(|c| self.dataset.records_for(c))
            .unwrap_or_default()
    }

    /// Releases of the selected commodity; empty until one is selected
    pub fn releases(&self) -> Vec<Release> {
        self.commodity
            .map(|c| self.dataset.releases_for(c))
            .unwrap_or_default()
    }

    pub fn find_record(&self, auto_id: &str) -> Option<&TransportRecord> {
        self.dataset.records.iter().find(|r| r.auto_id == auto_id)
    }

    pub fn find_release(&self, handle: &str) -> Option<&Release> {
        self.dataset.releases.iter().find(|r| r.handle() == handle)
    }

    pub(crate) fn apply_snapshot(&mut self, dataset: Dataset, status: ConnectionStatus) {
        self.dataset = dataset;
        self.connection = status;
        self.last_sync = Some(Local::now());
    }

    /// Newest first, like the trip list
    pub(crate) fn insert_record(&mut self, record: TransportRecord) {
        self.dataset.records.insert(0, record);
    }

    pub(crate) fn replace_record(&mut self, record: TransportRecord) -> bool {
        match self
            .dataset
            .records
            .iter_mut()
            .find(|r| r.auto_id == record.auto_id)
        {
            Some(slot) => {
                *slot = record;
                true
            }
            None => false,
        }
    }

    pub(crate) fn remove_record(&mut self, auto_id: &str) -> Option<TransportRecord> {
        let index = self.dataset.records.iter().position(|r| r.auto_id == auto_id)?;
        Some(self.dataset.records.remove(index))
    }

    pub(crate) fn upsert_factory_balance(&mut self, balance: FactoryBalance) {
        let existing = self.dataset.factory_balances.iter_mut().find(|fb| {
            fb.site_name.trim() == balance.site_name.trim() && fb.goods_type == balance.goods_type
        });
        match existing {
            Some(slot) => *slot = balance,
            None => self.dataset.factory_balances.push(balance),
        }
    }

    pub(crate) fn notify(&mut self, notice: Notice) {
        self.notices.push(notice);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str, goods: &str) -> TransportRecord {
        TransportRecord {
            auto_id: id.to_string(),
            goods_type: goods.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_views_empty_without_commodity() {
        let mut state = AppState::default();
        state.dataset.records = vec![record("1", "صويا"), record("2", "ذرة صفراء")];
        assert!(state.records().is_empty());

        state.commodity = Some(Commodity::Maize);
        let ids: Vec<String> = state.records().into_iter().map(|r| r.auto_id).collect();
        assert_eq!(ids, vec!["2".to_string()]);
    }

    #[test]
    fn test_optimistic_record_edits() {
        let mut state = AppState::default();
        state.insert_record(record("1", "صويا"));
        state.insert_record(record("2", "صويا"));
        assert_eq!(state.dataset.records[0].auto_id, "2");

        let mut edited = record("1", "صويا");
        edited.weight = 9.0;
        assert!(state.replace_record(edited));
        assert_eq!(state.find_record("1").map(|r| r.weight), Some(9.0));
        assert!(!state.replace_record(record("missing", "صويا")));

        assert!(state.remove_record("2").is_some());
        assert!(state.remove_record("2").is_none());
    }

    #[test]
    fn test_snapshot_overwrites_optimistic_state() {
        let mut state = AppState::default();
        state.insert_record(record("local", "صويا"));
        state.apply_snapshot(Dataset::default(), ConnectionStatus::Online);
        assert!(state.dataset.records.is_empty());
        assert_eq!(state.connection, ConnectionStatus::Online);
        assert!(state.last_sync.is_some());
    }
}

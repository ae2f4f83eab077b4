use serde::{Deserialize, Serialize};

use super::commodity::Commodity;
use super::factory_balance::FactoryBalance;
use super::lenient;
use super::master_data::MasterData;
use super::record::TransportRecord;
use super::release::Release;

/// Everything the endpoint returns for `getAllData`
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(default, rename = "transports", deserialize_with = "lenient::or_default")]
    pub records: Vec<TransportRecord>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub releases: Vec<Release>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub factory_balances: Vec<FactoryBalance>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub master_data: MasterData,
}

impl Dataset {
    /// Trips whose goods type contains the commodity keyword
    pub fn records_for(&self, commodity: Commodity) -> Vec<TransportRecord> {
        self.records
            .iter()
            .filter(|r| commodity.matches(&r.goods_type))
            .cloned()
            .collect()
    }

    /// Releases whose goods type contains the commodity keyword
    pub fn releases_for(&self, commodity: Commodity) -> Vec<Release> {
        self.releases
            .iter()
            .filter(|r| commodity.matches(&r.goods_type))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_buckets_become_empty() {
        let json = r#"{"transports": null, "releases": [], "masterData": null}"#;
        let data: Dataset = serde_json::from_str(json).unwrap();
        assert!(data.records.is_empty());
        assert!(data.factory_balances.is_empty());
        assert_eq!(data.master_data, MasterData::default());
    }

    #[test]
    fn test_commodity_filter() {
        let json = r#"{"transports": [
            {"autoId": "1", "goodsType": "ذرة صفراء"},
            {"autoId": "2", "goodsType": "صويا"}
        ]}"#;
        let data: Dataset = serde_json::from_str(json).unwrap();
        let maize = data.records_for(Commodity::Maize);
        assert_eq!(maize.len(), 1);
        assert_eq!(maize[0].auto_id, "1");
        assert_eq!(data.records_for(Commodity::Soy)[0].auto_id, "2");
    }
}

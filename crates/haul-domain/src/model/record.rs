use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::dates::parse_date;
use super::key::SiteOrderKey;
use super::lenient;
use super::status::OperationStatus;

/// One logged truck trip
///
/// Columns the dashboard never reads (customer codes, shift, ship name, ...)
/// are carried in `extra` so that an `updateRecord` sends the row back intact.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransportRecord {
    #[serde(default, deserialize_with = "lenient::text")]
    pub auto_id: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub departure_time: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub car_number: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub driver_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub driver_phone: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub goods_type: String,
    /// Net weight in tons
    #[serde(default, deserialize_with = "lenient::number")]
    pub weight: f64,
    #[serde(default)]
    pub status: OperationStatus,
    #[serde(default, deserialize_with = "lenient::text")]
    pub order_no: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub unloading_site: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub loading_site: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub contractor_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub waybill_no: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TransportRecord {
    pub fn key(&self) -> SiteOrderKey {
        SiteOrderKey::new(&self.unloading_site, &self.order_no)
    }

    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.date)
    }

    /// Copy of this record with a different status
    pub fn with_status(&self, status: OperationStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

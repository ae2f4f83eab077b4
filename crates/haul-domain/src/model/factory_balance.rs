use serde::{Deserialize, Serialize};

use super::lenient;

/// Manual stock figures kept per site and goods type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FactoryBalance {
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub site_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub goods_type: String,
    #[serde(default, deserialize_with = "lenient::number")]
    pub opening_balance: f64,
    #[serde(default, deserialize_with = "lenient::number")]
    pub manual_consumption: f64,
}

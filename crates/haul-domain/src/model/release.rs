use serde::{Deserialize, Serialize};

use super::dates::parse_date;
use super::key::SiteOrderKey;
use super::lenient;

/// Quota allowing a quantity of goods to be hauled to a site for an order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Release {
    #[serde(default, deserialize_with = "lenient::optional_text", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::text")]
    pub release_no: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub order_no: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub date: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub site_name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub goods_type: String,
    /// Released quantity in tons
    #[serde(default, deserialize_with = "lenient::number")]
    pub total_quantity: f64,
    #[serde(default, deserialize_with = "lenient::text")]
    pub notes: String,
}

impl Release {
    pub fn key(&self) -> SiteOrderKey {
        SiteOrderKey::new(&self.site_name, &self.order_no)
    }

    pub fn parsed_date(&self) -> Option<chrono::NaiveDate> {
        parse_date(&self.date)
    }

    /// Identifier the endpoint uses for update/delete (id, else release number)
    pub fn handle(&self) -> &str {
        self.id.as_deref().unwrap_or(&self.release_no)
    }
}

/// Shared part of a release form
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReleaseHeader {
    pub release_no: String,
    pub order_no: String,
    pub date: String,
    pub goods_type: String,
    pub notes: String,
}

/// One site's share of a release
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Distribution {
    pub site_name: String,
    pub quantity: f64,
}

/// Release form contents: one header split over one or more sites
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReleaseDraft {
    pub header: ReleaseHeader,
    pub distributions: Vec<Distribution>,
}

impl ReleaseDraft {
    /// Expand into one release row per distribution, as the endpoint stores them
    pub fn to_releases(&self) -> Vec<Release> {
        self.distributions
            .iter()
            .map(|d| Release {
                id: None,
                release_no: self.header.release_no.clone(),
                order_no: self.header.order_no.clone(),
                date: self.header.date.clone(),
                site_name: d.site_name.clone(),
                goods_type: self.header.goods_type.clone(),
                total_quantity: d.quantity,
                notes: self.header.notes.clone(),
            })
            .collect()
    }

    /// Pre-fill a single-distribution draft from an existing release for editing
    pub fn from_release(release: &Release) -> Self {
        Self {
            header: ReleaseHeader {
                release_no: release.release_no.clone(),
                order_no: release.order_no.clone(),
                date: super::dates::date_part(&release.date).to_string(),
                goods_type: release.goods_type.clone(),
                notes: release.notes.clone(),
            },
            distributions: vec![Distribution {
                site_name: release.site_name.clone(),
                quantity: release.total_quantity,
            }],
        }
    }
}

use serde::{Deserialize, Serialize};

/// Compound key attributing trips to releases
///
/// Both parts are whitespace-trimmed and compared case-sensitively.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SiteOrderKey {
    pub site: String,
    pub order_no: String,
}

impl SiteOrderKey {
    pub fn new(site: &str, order_no: &str) -> Self {
        Self {
            site: site.trim().to_string(),
            order_no: order_no.trim().to_string(),
        }
    }

    /// True when either half is blank after trimming
    pub fn is_incomplete(&self) -> bool {
        self.site.is_empty() || self.order_no.is_empty()
    }
}

impl std::fmt::Display for SiteOrderKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.site, self.order_no)
    }
}

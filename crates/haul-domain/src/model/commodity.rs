use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Commodity section of the dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Commodity {
    Soy,
    Maize,
}

/// Per-commodity behaviour of the trip entry form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FormProfile {
    /// Prefix of generated record ids
    pub id_prefix: &'static str,
    /// Tons a trip may exceed the available balance by (float rounding)
    pub tolerance: f64,
    /// Block submission when the (site, order) pair has no release at all
    pub require_release: bool,
}

impl Commodity {
    pub const SOY_KEYWORD: &'static str = "صويا";
    pub const MAIZE_KEYWORD: &'static str = "ذرة";

    /// Substring every goods type of this commodity contains
    pub fn keyword(&self) -> &'static str {
        match self {
            Commodity::Soy => Self::SOY_KEYWORD,
            Commodity::Maize => Self::MAIZE_KEYWORD,
        }
    }

    /// Goods type pre-filled in new trip and release forms
    pub fn default_goods_type(&self) -> &'static str {
        match self {
            Commodity::Soy => "صويا",
            Commodity::Maize => "ذرة صفراء",
        }
    }

    pub fn label_en(&self) -> &'static str {
        match self {
            Commodity::Soy => "soy",
            Commodity::Maize => "maize",
        }
    }

    /// Substring match, so "ذرة صفراء" belongs to maize
    pub fn matches(&self, goods_type: &str) -> bool {
        goods_type.contains(self.keyword())
    }

    pub fn form_profile(&self) -> FormProfile {
        match self {
            Commodity::Soy => FormProfile {
                id_prefix: "SOY",
                tolerance: 0.1,
                require_release: false,
            },
            Commodity::Maize => FormProfile {
                id_prefix: "TR",
                tolerance: 0.0,
                require_release: true,
            },
        }
    }
}

impl std::fmt::Display for Commodity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label_en())
    }
}

impl FromStr for Commodity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "soy" | "soya" | "soybean" | Self::SOY_KEYWORD => Ok(Commodity::Soy),
            "maize" | "corn" | Self::MAIZE_KEYWORD => Ok(Commodity::Maize),
            other => Err(format!("unknown commodity '{}' (expected soy or maize)", other)),
        }
    }
}

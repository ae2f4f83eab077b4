use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::lenient;
use super::user::AppUser;

/// Reference lists and the user directory
///
/// Every list defaults to empty so a partial payload still loads.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MasterData {
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub drivers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub cars: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub loading_sites: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub unloading_sites: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub goods_types: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub order_numbers: Vec<String>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub contractors: Vec<String>,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub users: Vec<AppUser>,
    #[serde(default, deserialize_with = "lenient::text_list")]
    pub items: Vec<String>,
}

/// Names of the editable reference lists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterList {
    Drivers,
    Cars,
    LoadingSites,
    UnloadingSites,
    GoodsTypes,
    OrderNumbers,
    Contractors,
    Items,
}

impl FromStr for MasterList {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "drivers" => Ok(MasterList::Drivers),
            "cars" => Ok(MasterList::Cars),
            "loading-sites" => Ok(MasterList::LoadingSites),
            "unloading-sites" => Ok(MasterList::UnloadingSites),
            "goods-types" => Ok(MasterList::GoodsTypes),
            "order-numbers" => Ok(MasterList::OrderNumbers),
            "contractors" => Ok(MasterList::Contractors),
            "items" => Ok(MasterList::Items),
            other => Err(format!("unknown master data list '{}'", other)),
        }
    }
}

impl MasterData {
    pub fn list(&self, list: MasterList) -> &[String] {
        match list {
            MasterList::Drivers => &self.drivers,
            MasterList::Cars => &self.cars,
            MasterList::LoadingSites => &self.loading_sites,
            MasterList::UnloadingSites => &self.unloading_sites,
            MasterList::GoodsTypes => &self.goods_types,
            MasterList::OrderNumbers => &self.order_numbers,
            MasterList::Contractors => &self.contractors,
            MasterList::Items => &self.items,
        }
    }

    fn list_mut(&mut self, list: MasterList) -> &mut Vec<String> {
        match list {
            MasterList::Drivers => &mut self.drivers,
            MasterList::Cars => &mut self.cars,
            MasterList::LoadingSites => &mut self.loading_sites,
            MasterList::UnloadingSites => &mut self.unloading_sites,
            MasterList::GoodsTypes => &mut self.goods_types,
            MasterList::OrderNumbers => &mut self.order_numbers,
            MasterList::Contractors => &mut self.contractors,
            MasterList::Items => &mut self.items,
        }
    }

    /// Append a trimmed value unless it is blank or already present
    pub fn add_value(&mut self, list: MasterList, value: &str) -> bool {
        let value = value.trim();
        let entries = self.list_mut(list);
        if value.is_empty() || entries.iter().any(|e| e == value) {
            return false;
        }
        entries.push(value.to_string());
        true
    }

    /// Add a directory entry; a user with the same PIN is replaced
    pub fn upsert_user(&mut self, user: AppUser) {
        let pin = user.pin.trim().to_string();
        self.users.retain(|u| u.pin.trim() != pin);
        self.users.push(user);
    }

    pub fn find_user_by_pin(&self, pin: &str) -> Option<&AppUser> {
        self.users.iter().find(|u| u.pin_matches(pin))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UserRole;

    #[test]
    fn test_partial_payload_defaults() {
        let data: MasterData = serde_json::from_str(r#"{"drivers": ["Omar"]}"#).unwrap();
        assert_eq!(data.drivers, vec!["Omar".to_string()]);
        assert!(data.users.is_empty());
        assert!(data.items.is_empty());
    }

    #[test]
    fn test_add_value_dedupes() {
        let mut data = MasterData::default();
        assert!(data.add_value(MasterList::Cars, " ق ر 91 "));
        assert!(!data.add_value(MasterList::Cars, "ق ر 91"));
        assert!(!data.add_value(MasterList::Cars, "   "));
        assert_eq!(data.list(MasterList::Cars).len(), 1);
    }

    #[test]
    fn test_upsert_user_replaces_same_pin() {
        let mut data = MasterData::default();
        data.upsert_user(AppUser {
            name: "A".to_string(),
            pin: "11".to_string(),
            role: UserRole::Viewer,
            allowed_materials: "الكل".to_string(),
        });
        data.upsert_user(AppUser {
            name: "B".to_string(),
            pin: "11".to_string(),
            role: UserRole::Admin,
            allowed_materials: "الكل".to_string(),
        });
        assert_eq!(data.users.len(), 1);
        assert_eq!(data.find_user_by_pin("11").map(|u| u.name.as_str()), Some("B"));
    }

    #[test]
    fn test_list_names_parse() {
        assert_eq!("unloading_sites".parse::<MasterList>().unwrap(), MasterList::UnloadingSites);
        assert!("trucks".parse::<MasterList>().is_err());
    }
}

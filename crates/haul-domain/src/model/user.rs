use serde::{Deserialize, Deserializer, Serialize};

use super::commodity::Commodity;
use super::lenient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Admin,
    Editor,
    #[default]
    Viewer,
}

impl UserRole {
    /// Add, edit, delete and re-status trips
    pub fn can_edit_records(&self) -> bool {
        !matches!(self, UserRole::Viewer)
    }

    /// Maintain releases and factory balances
    pub fn can_manage_releases(&self) -> bool {
        matches!(self, UserRole::Admin | UserRole::Editor)
    }

    /// Maintain reference lists and the user directory
    pub fn can_manage_master_data(&self) -> bool {
        matches!(self, UserRole::Admin)
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::Editor => write!(f, "editor"),
            UserRole::Viewer => write!(f, "viewer"),
        }
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(UserRole::Admin),
            "editor" => Ok(UserRole::Editor),
            "viewer" => Ok(UserRole::Viewer),
            other => Err(format!("unknown role '{}'", other)),
        }
    }
}

impl<'de> Deserialize<'de> for UserRole {
    /// Unknown roles fall back to the least privileged one
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = lenient::text(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Which commodity sections a user may open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaterialScope {
    All,
    Only(Commodity),
    /// Scope text the dashboard does not recognise grants nothing
    Unrecognized,
}

impl MaterialScope {
    pub const ALL_LABEL: &'static str = "الكل";

    pub fn allows(&self, commodity: Commodity) -> bool {
        match self {
            MaterialScope::All => true,
            MaterialScope::Only(c) => *c == commodity,
            MaterialScope::Unrecognized => false,
        }
    }

    /// The commodity to open straight after login, if the scope has only one
    pub fn sole_commodity(&self) -> Option<Commodity> {
        match self {
            MaterialScope::Only(c) => Some(*c),
            _ => None,
        }
    }
}

/// Directory entry from the master data sheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppUser {
    #[serde(default, deserialize_with = "lenient::text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::text")]
    pub pin: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default = "default_allowed_materials", deserialize_with = "lenient::text")]
    pub allowed_materials: String,
}

fn default_allowed_materials() -> String {
    MaterialScope::ALL_LABEL.to_string()
}

impl AppUser {
    pub fn scope(&self) -> MaterialScope {
        match self.allowed_materials.trim() {
            MaterialScope::ALL_LABEL => MaterialScope::All,
            Commodity::SOY_KEYWORD => MaterialScope::Only(Commodity::Soy),
            Commodity::MAIZE_KEYWORD => MaterialScope::Only(Commodity::Maize),
            _ => MaterialScope::Unrecognized,
        }
    }

    /// Trimmed comparison; numeric PIN cells arrive as text already
    pub fn pin_matches(&self, pin: &str) -> bool {
        let pin = pin.trim();
        !pin.is_empty() && self.pin.trim() == pin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numeric_pin_and_unknown_role() {
        let json = r#"{"name": "Mona", "pin": 4321, "role": "Supervisor"}"#;
        let user: AppUser = serde_json::from_str(json).unwrap();
        assert!(user.pin_matches(" 4321 "));
        assert_eq!(user.role, UserRole::Viewer);
        assert_eq!(user.scope(), MaterialScope::All);
    }

    #[test]
    fn test_scope_from_allowed_materials() {
        let user = AppUser {
            name: "Ali".to_string(),
            pin: "1".to_string(),
            role: UserRole::Editor,
            allowed_materials: "ذرة".to_string(),
        };
        assert_eq!(user.scope().sole_commodity(), Some(Commodity::Maize));
        assert!(!user.scope().allows(Commodity::Soy));
    }

    #[test]
    fn test_role_permissions() {
        assert!(!UserRole::Viewer.can_edit_records());
        assert!(UserRole::Editor.can_manage_releases());
        assert!(!UserRole::Editor.can_manage_master_data());
        assert!(UserRole::Admin.can_manage_master_data());
    }

    #[test]
    fn test_empty_pin_never_matches() {
        let user = AppUser {
            name: "Ghost".to_string(),
            pin: String::new(),
            role: UserRole::Admin,
            allowed_materials: "الكل".to_string(),
        };
        assert!(!user.pin_matches(""));
    }
}

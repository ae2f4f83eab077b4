use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// Lifecycle of a single truck trip
///
/// The wire format carries the Arabic label. Labels the dashboard does not
/// know are kept verbatim in `Other` so an edited record round-trips.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum OperationStatus {
    /// تمت
    Done,
    /// جاري التنفيذ
    #[default]
    InProgress,
    /// متوقفة
    Stopped,
    Other(String),
}

impl OperationStatus {
    pub const DONE_LABEL: &'static str = "تمت";
    pub const IN_PROGRESS_LABEL: &'static str = "جاري التنفيذ";
    pub const STOPPED_LABEL: &'static str = "متوقفة";

    pub fn from_label(label: &str) -> Self {
        match label.trim() {
            Self::DONE_LABEL => OperationStatus::Done,
            Self::IN_PROGRESS_LABEL => OperationStatus::InProgress,
            Self::STOPPED_LABEL => OperationStatus::Stopped,
            other => OperationStatus::Other(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            OperationStatus::Done => Self::DONE_LABEL,
            OperationStatus::InProgress => Self::IN_PROGRESS_LABEL,
            OperationStatus::Stopped => Self::STOPPED_LABEL,
            OperationStatus::Other(label) => label,
        }
    }

    /// English label for logs and table headers
    pub fn label_en(&self) -> &str {
        match self {
            OperationStatus::Done => "done",
            OperationStatus::InProgress => "in-progress",
            OperationStatus::Stopped => "stopped",
            OperationStatus::Other(label) => label,
        }
    }
}

impl std::fmt::Display for OperationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for OperationStatus {
    type Err = String;

    /// Accepts the English CLI names as well as the Arabic labels
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "done" | "executed" => Ok(OperationStatus::Done),
            "in-progress" | "in_progress" | "transit" => Ok(OperationStatus::InProgress),
            "stopped" => Ok(OperationStatus::Stopped),
            _ => match OperationStatus::from_label(s) {
                OperationStatus::Other(label) => Err(format!(
                    "unknown status '{}' (expected done, in-progress or stopped)",
                    label
                )),
                known => Ok(known),
            },
        }
    }
}

impl Serialize for OperationStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for OperationStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = super::lenient::text(deserializer)?;
        Ok(OperationStatus::from_label(&label))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_round_trip_through_json() {
        let json = serde_json::to_string(&OperationStatus::Stopped).unwrap();
        assert_eq!(json, "\"متوقفة\"");
        let back: OperationStatus = serde_json::from_str(&json).unwrap();
        assert_eq!(back, OperationStatus::Stopped);
    }

    #[test]
    fn test_unknown_label_is_preserved() {
        let status: OperationStatus = serde_json::from_str("\"ملغاة\"").unwrap();
        assert_eq!(status, OperationStatus::Other("ملغاة".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"ملغاة\"");
    }

    #[test]
    fn test_parse_cli_names() {
        assert_eq!("done".parse::<OperationStatus>().unwrap(), OperationStatus::Done);
        assert_eq!(
            "In-Progress".parse::<OperationStatus>().unwrap(),
            OperationStatus::InProgress
        );
        assert_eq!("تمت".parse::<OperationStatus>().unwrap(), OperationStatus::Done);
        assert!("lost".parse::<OperationStatus>().is_err());
    }
}

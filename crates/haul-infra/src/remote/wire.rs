//! Request bodies understood by the endpoint

use serde::Serialize;

use haul_domain::model::{Distribution, FactoryBalance, MasterData, Release, ReleaseHeader, TransportRecord};

/// `action` value of the snapshot GET
pub const FETCH_ACTION: &str = "getAllData";

/// A write sent as `{"action": ..., ...payload}`
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Mutation {
    AddRecord {
        record: TransportRecord,
    },
    UpdateRecord {
        record: TransportRecord,
    },
    #[serde(rename_all = "camelCase")]
    DeleteRecord {
        auto_id: String,
        goods_type: String,
    },
    SaveMasterData {
        data: MasterData,
    },
    AddReleasesBulk {
        header: ReleaseHeader,
        distributions: Vec<Distribution>,
    },
    UpdateRelease {
        release: Release,
    },
    #[serde(rename_all = "camelCase")]
    DeleteRelease {
        id: String,
        goods_type: String,
    },
    UpdateFactoryBalance {
        balance: FactoryBalance,
    },
}

impl Mutation {
    pub fn action(&self) -> &'static str {
        match self {
            Mutation::AddRecord { .. } => "addRecord",
            Mutation::UpdateRecord { .. } => "updateRecord",
            Mutation::DeleteRecord { .. } => "deleteRecord",
            Mutation::SaveMasterData { .. } => "saveMasterData",
            Mutation::AddReleasesBulk { .. } => "addReleasesBulk",
            Mutation::UpdateRelease { .. } => "updateRelease",
            Mutation::DeleteRelease { .. } => "deleteRelease",
            Mutation::UpdateFactoryBalance { .. } => "updateFactoryBalance",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_delete_record_body() {
        let body = serde_json::to_value(Mutation::DeleteRecord {
            auto_id: "TR-1234-0042".to_string(),
            goods_type: "ذرة صفراء".to_string(),
        })
        .unwrap();
        assert_eq!(
            body,
            json!({"action": "deleteRecord", "autoId": "TR-1234-0042", "goodsType": "ذرة صفراء"})
        );
    }

    #[test]
    fn test_bulk_release_body() {
        let mutation = Mutation::AddReleasesBulk {
            header: ReleaseHeader {
                release_no: "R-3".to_string(),
                order_no: "88".to_string(),
                ..Default::default()
            },
            distributions: vec![Distribution {
                site_name: "SiteA".to_string(),
                quantity: 250.0,
            }],
        };
        let body = serde_json::to_value(&mutation).unwrap();
        assert_eq!(body["action"], mutation.action());
        assert_eq!(body["header"]["releaseNo"], "R-3");
        assert_eq!(body["distributions"][0]["siteName"], "SiteA");
        assert_eq!(body["distributions"][0]["quantity"], 250.0);
    }

    #[test]
    fn test_record_fields_are_inlined_under_record() {
        let record = TransportRecord {
            auto_id: "SOY-1000-0001".to_string(),
            weight: 12.5,
            ..Default::default()
        };
        let body = serde_json::to_value(Mutation::UpdateRecord { record }).unwrap();
        assert_eq!(body["action"], "updateRecord");
        assert_eq!(body["record"]["autoId"], "SOY-1000-0001");
        assert_eq!(body["record"]["status"], "جاري التنفيذ");
    }
}

use chrono::Local;
use tracing::info;

use haul_domain::model::{OperationStatus, TransportRecord, UserRole};
use haul_domain::service::{format_car_plate, new_record_id, validate_record};
use haul_infra::Mutation;
use haul_types::{Error, Result};

use super::notice::{Notice, NoticeLevel};
use super::{permit, App};

pub(crate) fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

impl App {
    /// Log a new trip for the selected commodity
    ///
    /// Blank goods type and date are filled from the commodity and today;
    /// the id is generated with the commodity's prefix.
    pub async fn add_record(&self, mut draft: TransportRecord) -> Result<TransportRecord> {
        {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_edit_records, "add trips")?;
            let commodity = state.require_commodity()?;
            let profile = commodity.form_profile();

            if draft.goods_type.trim().is_empty() {
                draft.goods_type = commodity.default_goods_type().to_string();
            }
            if draft.date.trim().is_empty() {
                draft.date = today();
            }
            draft.car_number = format_car_plate(&draft.car_number);
            draft.unloading_site = draft.unloading_site.trim().to_string();
            draft.order_no = draft.order_no.trim().to_string();

            validate_record(&draft, &profile, &state.releases(), &state.records(), None)?;

            if draft.auto_id.trim().is_empty() {
                draft.auto_id = new_record_id(profile.id_prefix);
            }
            state.insert_record(draft.clone());
            state.notify(Notice::new(NoticeLevel::Success, format!("Trip {} recorded", draft.auto_id)));
            info!(id = %draft.auto_id, weight = draft.weight, "Trip added");
        }

        self.send(
            Mutation::AddRecord {
                record: draft.clone(),
            },
            "Trip not delivered to the server and will not be retried",
        )
        .await;
        Ok(draft)
    }

    /// Replace an existing trip, re-checking the balance without its old weight
    pub async fn edit_record(&self, mut record: TransportRecord) -> Result<TransportRecord> {
        {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_edit_records, "edit trips")?;
            let commodity = state.require_commodity()?;
            if state.find_record(&record.auto_id).is_none() {
                return Err(Error::NotFound(format!("trip {}", record.auto_id)));
            }

            record.car_number = format_car_plate(&record.car_number);
            record.unloading_site = record.unloading_site.trim().to_string();
            record.order_no = record.order_no.trim().to_string();
            validate_record(
                &record,
                &commodity.form_profile(),
                &state.releases(),
                &state.records(),
                Some(record.auto_id.as_str()),
            )?;
            state.replace_record(record.clone());
            state.notify(Notice::new(NoticeLevel::Success, format!("Trip {} updated", record.auto_id)));
        }

        self.send(
            Mutation::UpdateRecord {
                record: record.clone(),
            },
            "Server update failed",
        )
        .await;
        Ok(record)
    }

    /// Move a trip to another status; no balance check applies
    pub async fn set_record_status(&self, auto_id: &str, status: OperationStatus) -> Result<TransportRecord> {
        let updated = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_edit_records, "change trip status")?;
            let updated = state
                .find_record(auto_id)
                .map(|r| r.with_status(status.clone()))
                .ok_or_else(|| Error::NotFound(format!("trip {}", auto_id)))?;
            state.replace_record(updated.clone());
            state.notify(Notice::new(
                NoticeLevel::Info,
                format!("Status changed to {}", status.label_en()),
            ));
            updated
        };

        self.send(
            Mutation::UpdateRecord {
                record: updated.clone(),
            },
            "Status change did not reach the server",
        )
        .await;
        Ok(updated)
    }

    pub async fn delete_record(&self, auto_id: &str) -> Result<TransportRecord> {
        let removed = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_edit_records, "delete trips")?;
            let removed = state
                .remove_record(auto_id)
                .ok_or_else(|| Error::NotFound(format!("trip {}", auto_id)))?;
            state.notify(Notice::new(NoticeLevel::Success, format!("Trip {} deleted", auto_id)));
            removed
        };
        info!(id = %auto_id, "Trip deleted");

        self.send(
            Mutation::DeleteRecord {
                auto_id: removed.auto_id.clone(),
                goods_type: removed.goods_type.clone(),
            },
            "Delete did not reach the server",
        )
        .await;
        Ok(removed)
    }
}

use haul_domain::model::{AppUser, MasterList, UserRole};
use haul_infra::Mutation;
use haul_types::{Result, ValidationError};

use super::notice::{Notice, NoticeLevel};
use super::{permit, App};

impl App {
    /// Append a value to a reference list and save the lists
    ///
    /// Returns `false`, sending nothing, when the value is blank or present.
    pub async fn add_master_value(&self, list: MasterList, value: &str) -> Result<bool> {
        let data = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_manage_master_data, "edit master data")?;
            if !state.dataset.master_data.add_value(list, value) {
                return Ok(false);
            }
            state.notify(Notice::new(NoticeLevel::Success, format!("Added '{}'", value.trim())));
            state.dataset.master_data.clone()
        };

        self.send(Mutation::SaveMasterData { data }, "Master data not saved on the server")
            .await;
        self.refresh().await;
        Ok(true)
    }

    /// Add a user to the directory; an entry with the same PIN is replaced
    pub async fn add_user(&self, user: AppUser) -> Result<()> {
        if user.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name").into());
        }
        if user.pin.trim().is_empty() {
            return Err(ValidationError::MissingField("PIN").into());
        }

        let data = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_manage_master_data, "manage users")?;
            let name = user.name.clone();
            state.dataset.master_data.upsert_user(AppUser {
                pin: user.pin.trim().to_string(),
                ..user
            });
            state.notify(Notice::new(NoticeLevel::Success, format!("User {} saved", name)));
            state.dataset.master_data.clone()
        };

        self.send(Mutation::SaveMasterData { data }, "Master data not saved on the server")
            .await;
        self.refresh().await;
        Ok(())
    }
}

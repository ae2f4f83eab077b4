use tracing::info;

use haul_domain::model::{AppUser, Commodity};
use haul_types::{Error, Result};

use super::notice::{Notice, NoticeLevel};
use super::App;

impl App {
    /// Sign in with a PIN from the master data user directory
    ///
    /// A user scoped to a single commodity lands straight in that section.
    pub async fn login(&self, pin: &str) -> Result<AppUser> {
        let mut state = self.state.write().await;
        let user = state
            .dataset
            .master_data
            .find_user_by_pin(pin)
            .cloned()
            .ok_or_else(|| Error::NotFound("no user with that PIN".to_string()))?;

        self.session.save_user(Some(&user))?;
        let commodity = user.scope().sole_commodity();
        self.session.save_commodity(commodity)?;

        state.user = Some(user.clone());
        state.commodity = commodity;
        state.notify(Notice::new(NoticeLevel::Success, format!("Welcome {}", user.name)));
        info!(user = %user.name, role = %user.role, "Signed in");
        Ok(user)
    }

    /// Clear the session; a running poller stops on its next tick
    pub async fn logout(&self) -> Result<()> {
        let mut state = self.state.write().await;
        self.session.save_user(None)?;
        self.session.save_commodity(None)?;
        if let Some(user) = state.user.take() {
            info!(user = %user.name, "Signed out");
        }
        state.commodity = None;
        Ok(())
    }

    /// Open a commodity section the session user is scoped to
    pub async fn select_commodity(&self, commodity: Commodity) -> Result<()> {
        let mut state = self.state.write().await;
        let user = state.require_user()?;
        if !user.scope().allows(commodity) {
            return Err(Error::Forbidden(format!(
                "'{}' is not allowed to open the {} section",
                user.name, commodity
            )));
        }
        self.session.save_commodity(Some(commodity))?;
        state.commodity = Some(commodity);
        Ok(())
    }
}

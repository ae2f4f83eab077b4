use tracing::info;

use haul_domain::model::{FactoryBalance, Release, ReleaseDraft, UserRole};
use haul_domain::service::validate_release;
use haul_infra::Mutation;
use haul_types::{Error, Result, ValidationError};

use super::notice::{Notice, NoticeLevel};
use super::records::today;
use super::{permit, App};

impl App {
    /// Register a release split over one or more sites, then refresh
    pub async fn add_release(&self, mut draft: ReleaseDraft) -> Result<Vec<Release>> {
        let rows = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_manage_releases, "add releases")?;
            let commodity = state.require_commodity()?;
            validate_release(&draft, false)?;

            if draft.header.goods_type.trim().is_empty() {
                draft.header.goods_type = commodity.default_goods_type().to_string();
            }
            if draft.header.date.trim().is_empty() {
                draft.header.date = today();
            }
            let rows = draft.to_releases();
            state.dataset.releases.extend(rows.iter().cloned());
            state.notify(Notice::new(
                NoticeLevel::Success,
                format!("Release {} added for {} site(s)", draft.header.release_no, rows.len()),
            ));
            rows
        };
        info!(release_no = %draft.header.release_no, sites = rows.len(), "Release added");

        self.send(
            Mutation::AddReleasesBulk {
                header: draft.header,
                distributions: draft.distributions,
            },
            "Release not saved on the server",
        )
        .await;
        self.refresh().await;
        Ok(rows)
    }

    /// Rewrite one release row from a single-distribution draft, then refresh
    pub async fn edit_release(&self, handle: &str, draft: ReleaseDraft) -> Result<Release> {
        let updated = {
            let state = self.state.read().await;
            permit(&state, UserRole::can_manage_releases, "edit releases")?;
            validate_release(&draft, true)?;
            let existing = state
                .find_release(handle)
                .ok_or_else(|| Error::NotFound(format!("release {}", handle)))?;

            let mut updated = draft
                .to_releases()
                .into_iter()
                .next()
                .ok_or(ValidationError::NoDistributions)?;
            updated.id = Some(existing.handle().to_string());
            updated
        };

        self.send(
            Mutation::UpdateRelease {
                release: updated.clone(),
            },
            "Release change not saved on the server",
        )
        .await;
        self.state
            .write()
            .await
            .notify(Notice::new(NoticeLevel::Success, "Release updated"));
        self.refresh().await;
        Ok(updated)
    }

    pub async fn delete_release(&self, handle: &str) -> Result<Release> {
        let removed = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_manage_releases, "delete releases")?;
            let index = state
                .dataset
                .releases
                .iter()
                .position(|r| r.handle() == handle)
                .ok_or_else(|| Error::NotFound(format!("release {}", handle)))?;
            let removed = state.dataset.releases.remove(index);
            state.notify(Notice::new(NoticeLevel::Info, format!("Release {} deleted", handle)));
            removed
        };

        self.send(
            Mutation::DeleteRelease {
                id: removed.handle().to_string(),
                goods_type: removed.goods_type.clone(),
            },
            "Delete did not reach the server",
        )
        .await;
        self.refresh().await;
        Ok(removed)
    }

    /// Set the manual opening balance and consumption of a site
    pub async fn set_factory_balance(&self, site: &str, opening: f64, manual_consumption: f64) -> Result<FactoryBalance> {
        let balance = {
            let mut state = self.state.write().await;
            permit(&state, UserRole::can_manage_releases, "edit factory balances")?;
            let commodity = state.require_commodity()?;
            let site = site.trim();
            if site.is_empty() {
                return Err(ValidationError::MissingSite.into());
            }
            for value in [opening, manual_consumption] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ValidationError::InvalidWeight(value).into());
                }
            }

            // An existing row keeps its id and goods type spelling
            let existing = state
                .dataset
                .factory_balances
                .iter()
                .find(|fb| fb.site_name.trim() == site && commodity.matches(&fb.goods_type))
                .cloned();
            let balance = FactoryBalance {
                id: existing.as_ref().and_then(|fb| fb.id.clone()),
                site_name: site.to_string(),
                goods_type: existing
                    .map(|fb| fb.goods_type)
                    .unwrap_or_else(|| commodity.default_goods_type().to_string()),
                opening_balance: opening,
                manual_consumption,
            };
            state.upsert_factory_balance(balance.clone());
            state.notify(Notice::new(NoticeLevel::Success, format!("Balance for {} updated", site)));
            balance
        };

        self.send(
            Mutation::UpdateFactoryBalance {
                balance: balance.clone(),
            },
            "Balance change not saved on the server",
        )
        .await;
        self.refresh().await;
        Ok(balance)
    }
}

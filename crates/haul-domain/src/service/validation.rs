//! Form checks run before anything is sent to the endpoint

use haul_types::ValidationError;

use crate::model::{FormProfile, Release, ReleaseDraft, SiteOrderKey, TransportRecord};

/// Tons still available for a (site, order) pair
///
/// `None` while either half of the key is blank; `Some(0.0)` when no release
/// matches. Every matching trip counts regardless of status, except the one
/// being edited.
pub fn available_balance(
    key: &SiteOrderKey,
    releases: &[Release],
    records: &[TransportRecord],
    editing_id: Option<&str>,
) -> Option<f64> {
    if key.is_incomplete() {
        return None;
    }

    let mut matching = releases.iter().filter(|r| &r.key() == key).peekable();
    if matching.peek().is_none() {
        return Some(0.0);
    }
    let released: f64 = matching.map(|r| r.total_quantity).sum();

    let consumed: f64 = records
        .iter()
        .filter(|r| &r.key() == key)
        .filter(|r| editing_id.map_or(true, |id| r.auto_id != id))
        .map(|r| r.weight)
        .sum();

    Some((released - consumed).max(0.0))
}

/// Check a trip draft against the current balance
pub fn validate_record(
    draft: &TransportRecord,
    profile: &FormProfile,
    releases: &[Release],
    records: &[TransportRecord],
    editing_id: Option<&str>,
) -> Result<(), ValidationError> {
    let key = draft.key();
    if key.site.is_empty() {
        return Err(ValidationError::MissingSite);
    }
    if key.order_no.is_empty() {
        return Err(ValidationError::MissingOrder);
    }
    if !draft.weight.is_finite() || draft.weight < 0.0 {
        return Err(ValidationError::InvalidWeight(draft.weight));
    }

    let has_release = releases.iter().any(|r| r.key() == key);
    if !has_release && profile.require_release {
        return Err(ValidationError::NoReleaseFound {
            site: key.site,
            order_no: key.order_no,
        });
    }

    let available = available_balance(&key, releases, records, editing_id).unwrap_or(0.0);
    if draft.weight > 0.0 && draft.weight > available + profile.tolerance {
        return Err(ValidationError::InsufficientBalance {
            requested: draft.weight,
            available,
        });
    }
    Ok(())
}

/// Every distribution needs a site and a positive quantity; edits take one
pub fn validate_release(draft: &ReleaseDraft, editing: bool) -> Result<(), ValidationError> {
    if draft.distributions.is_empty() {
        return Err(ValidationError::NoDistributions);
    }
    if editing && draft.distributions.len() != 1 {
        return Err(ValidationError::EditNeedsSingleDistribution(
            draft.distributions.len(),
        ));
    }
    if let Some(index) = draft
        .distributions
        .iter()
        .position(|d| d.site_name.trim().is_empty() || !(d.quantity.is_finite() && d.quantity > 0.0))
    {
        return Err(ValidationError::InvalidDistribution { index });
    }
    if draft.header.order_no.trim().is_empty() {
        return Err(ValidationError::MissingOrder);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Commodity, Distribution, OperationStatus, ReleaseHeader};

    fn releases() -> Vec<Release> {
        vec![Release {
            order_no: "77".to_string(),
            site_name: "SiteA".to_string(),
            goods_type: "ذرة صفراء".to_string(),
            total_quantity: 100.0,
            ..Default::default()
        }]
    }

    fn trip(id: &str, site: &str, order: &str, weight: f64) -> TransportRecord {
        TransportRecord {
            auto_id: id.to_string(),
            unloading_site: site.to_string(),
            order_no: order.to_string(),
            weight,
            status: OperationStatus::Stopped,
            ..Default::default()
        }
    }

    #[test]
    fn test_available_balance_counts_every_status() {
        let records = vec![trip("a", "SiteA", "77", 30.0), trip("b", "SiteA", "77", 25.0)];
        let key = SiteOrderKey::new("SiteA", "77");
        assert_eq!(available_balance(&key, &releases(), &records, None), Some(45.0));
    }

    #[test]
    fn test_available_balance_excludes_edited_record() {
        let records = vec![trip("a", "SiteA", "77", 30.0), trip("b", "SiteA", "77", 25.0)];
        let key = SiteOrderKey::new("SiteA", "77");
        assert_eq!(available_balance(&key, &releases(), &records, Some("a")), Some(75.0));
    }

    #[test]
    fn test_available_balance_blank_and_missing() {
        assert_eq!(
            available_balance(&SiteOrderKey::new("SiteA", " "), &releases(), &[], None),
            None
        );
        assert_eq!(
            available_balance(&SiteOrderKey::new("SiteA", "78"), &releases(), &[], None),
            Some(0.0)
        );
    }

    #[test]
    fn test_overweight_trip_is_blocked() {
        let draft = trip("", "SiteA", "77", 100.5);
        let err = validate_record(&draft, &Commodity::Maize.form_profile(), &releases(), &[], None)
            .unwrap_err();
        assert_eq!(
            err,
            ValidationError::InsufficientBalance {
                requested: 100.5,
                available: 100.0
            }
        );
    }

    #[test]
    fn test_soy_tolerance_allows_rounding() {
        let draft = trip("", "SiteA", "77", 100.05);
        assert!(validate_record(&draft, &Commodity::Soy.form_profile(), &releases(), &[], None).is_ok());
        let draft = trip("", "SiteA", "77", 100.2);
        assert!(validate_record(&draft, &Commodity::Soy.form_profile(), &releases(), &[], None).is_err());
    }

    #[test]
    fn test_missing_release_blocks_maize_form() {
        let draft = trip("", "SiteZ", "1", 5.0);
        let err = validate_record(&draft, &Commodity::Maize.form_profile(), &releases(), &[], None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::NoReleaseFound { .. }));
    }

    #[test]
    fn test_missing_release_on_soy_form_is_a_balance_error() {
        let draft = trip("", "SiteZ", "1", 5.0);
        let err = validate_record(&draft, &Commodity::Soy.form_profile(), &releases(), &[], None)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InsufficientBalance { .. }));
    }

    #[test]
    fn test_required_fields() {
        let profile = Commodity::Maize.form_profile();
        assert_eq!(
            validate_record(&trip("", "", "77", 1.0), &profile, &releases(), &[], None),
            Err(ValidationError::MissingSite)
        );
        assert_eq!(
            validate_record(&trip("", "SiteA", "", 1.0), &profile, &releases(), &[], None),
            Err(ValidationError::MissingOrder)
        );
        assert_eq!(
            validate_record(&trip("", "SiteA", "77", -1.0), &profile, &releases(), &[], None),
            Err(ValidationError::InvalidWeight(-1.0))
        );
    }

    #[test]
    fn test_editing_own_weight_is_not_double_counted() {
        let records = vec![trip("a", "SiteA", "77", 90.0)];
        let mut edited = records[0].clone();
        edited.weight = 95.0;
        let profile = Commodity::Maize.form_profile();
        assert!(validate_record(&edited, &profile, &releases(), &records, Some("a")).is_ok());
        assert!(validate_record(&edited, &profile, &releases(), &records, None).is_err());
    }

    fn draft(distributions: Vec<Distribution>) -> ReleaseDraft {
        ReleaseDraft {
            header: ReleaseHeader {
                release_no: "R-1".to_string(),
                order_no: "77".to_string(),
                date: "2024-06-01".to_string(),
                goods_type: "صويا".to_string(),
                notes: String::new(),
            },
            distributions,
        }
    }

    #[test]
    fn test_release_rows_need_site_and_quantity() {
        let ok = draft(vec![Distribution { site_name: "SiteA".to_string(), quantity: 10.0 }]);
        assert!(validate_release(&ok, false).is_ok());

        let bad = draft(vec![
            Distribution { site_name: "SiteA".to_string(), quantity: 10.0 },
            Distribution { site_name: "SiteB".to_string(), quantity: 0.0 },
        ]);
        assert_eq!(
            validate_release(&bad, false),
            Err(ValidationError::InvalidDistribution { index: 1 })
        );
        assert_eq!(validate_release(&draft(vec![]), false), Err(ValidationError::NoDistributions));
    }

    #[test]
    fn test_release_edit_takes_single_row() {
        let two = draft(vec![
            Distribution { site_name: "SiteA".to_string(), quantity: 10.0 },
            Distribution { site_name: "SiteB".to_string(), quantity: 5.0 },
        ]);
        assert_eq!(
            validate_release(&two, true),
            Err(ValidationError::EditNeedsSingleDistribution(2))
        );
    }
}

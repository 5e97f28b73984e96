//! Form state for one reading request and its pre-submit validation.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::dob::DobSelector;
use crate::fortune::DivinationTarget;
use crate::profile::{AnimalSign, BloodType, PartnerRef, Profile, Relationship, Zodiac};

/// First unmet submission condition. Checked in declaration order.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum FormError {
    #[error("Please fill in all of your details.")]
    IncompleteProfile,
    #[error("Please enter your partner's name.")]
    MissingPartnerName,
    #[error("Please choose your current relationship.")]
    MissingRelationship,
}

/// Saved copy of the self profile, kept while "keep fixed" is on.
///
/// Fields may be partially filled: the snapshot follows the form as it is
/// edited, not only once it is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FixedProfile {
    pub is_fixed: bool,
    pub blood_type: Option<BloodType>,
    pub zodiac: Option<Zodiac>,
    pub animal_sign: Option<AnimalSign>,
    pub dob: Option<NaiveDate>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    pub blood_type: Option<BloodType>,
    pub zodiac: Option<Zodiac>,
    pub animal_sign: Option<AnimalSign>,
    pub dob: DobSelector,
    pub partner_name: String,
    pub relationship: Option<Relationship>,
    pub target: DivinationTarget,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restore self-profile fields from a saved snapshot. Partner fields are untouched.
    pub fn apply_fixed(&mut self, fixed: &FixedProfile) {
        self.blood_type = fixed.blood_type;
        self.zodiac = fixed.zodiac;
        self.animal_sign = fixed.animal_sign;
        self.dob = fixed.dob.map(DobSelector::from_date).unwrap_or_default();
    }

    pub fn fixed_snapshot(&self) -> FixedProfile {
        FixedProfile {
            is_fixed: true,
            blood_type: self.blood_type,
            zodiac: self.zodiac,
            animal_sign: self.animal_sign,
            dob: self.dob.value(),
        }
    }

    /// The complete self profile, if every field is set.
    pub fn profile(&self) -> Option<Profile> {
        Some(Profile {
            blood_type: self.blood_type?,
            zodiac: self.zodiac?,
            animal_sign: self.animal_sign?,
            dob: self.dob.value()?,
        })
    }

    pub fn has_partner_name(&self) -> bool {
        !self.partner_name.trim().is_empty()
    }

    /// Validate in fixed order: self profile, partner name, relationship.
    pub fn validate(&self) -> Result<(Profile, PartnerRef), FormError> {
        let profile = self.profile().ok_or(FormError::IncompleteProfile)?;
        if !self.has_partner_name() {
            return Err(FormError::MissingPartnerName);
        }
        let relationship = self.relationship.ok_or(FormError::MissingRelationship)?;
        Ok((
            profile,
            PartnerRef {
                name: self.partner_name.trim().to_string(),
                relationship,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete_profile(form: &mut FormState) {
        form.blood_type = Some(BloodType::O);
        form.zodiac = Some(Zodiac::Leo);
        form.animal_sign = Some(AnimalSign::Dragon);
        form.dob = DobSelector::parse("1990-05-10").unwrap();
    }

    #[test]
    fn empty_form_reports_profile_first() {
        let mut form = FormState::new();
        form.partner_name = "Aoi".into();
        form.relationship = Some(Relationship::Friend);
        assert_eq!(form.validate(), Err(FormError::IncompleteProfile));
    }

    #[test]
    fn any_missing_profile_field_is_rejected() {
        let mut form = FormState::new();
        complete_profile(&mut form);
        form.partner_name = "Aoi".into();
        form.relationship = Some(Relationship::Friend);

        let mut no_dob = form.clone();
        no_dob.dob.set_day(None).unwrap();
        assert_eq!(no_dob.validate(), Err(FormError::IncompleteProfile));

        let mut no_sign = form.clone();
        no_sign.animal_sign = None;
        assert_eq!(no_sign.validate(), Err(FormError::IncompleteProfile));
    }

    #[test]
    fn blank_partner_name_before_relationship() {
        let mut form = FormState::new();
        complete_profile(&mut form);
        form.partner_name = "   ".into();
        assert_eq!(form.validate(), Err(FormError::MissingPartnerName));
        form.partner_name = "Aoi".into();
        assert_eq!(form.validate(), Err(FormError::MissingRelationship));
    }

    #[test]
    fn valid_form_trims_partner_name() {
        let mut form = FormState::new();
        complete_profile(&mut form);
        form.partner_name = " Aoi ".into();
        form.relationship = Some(Relationship::Friend);
        let (profile, partner) = form.validate().unwrap();
        assert_eq!(profile.zodiac, Zodiac::Leo);
        assert_eq!(partner.name, "Aoi");
        assert_eq!(partner.relationship, Relationship::Friend);
    }

    #[test]
    fn error_messages() {
        assert_eq!(
            FormError::IncompleteProfile.to_string(),
            "Please fill in all of your details."
        );
        assert_eq!(
            FormError::MissingRelationship.to_string(),
            "Please choose your current relationship."
        );
    }

    #[test]
    fn fixed_snapshot_restores_profile() {
        let mut form = FormState::new();
        complete_profile(&mut form);
        let snapshot = form.fixed_snapshot();
        assert!(snapshot.is_fixed);

        let mut restored = FormState::new();
        restored.apply_fixed(&snapshot);
        assert_eq!(restored.profile(), form.profile());
    }
}

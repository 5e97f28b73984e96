pub mod dob;
pub mod form;
pub mod fortune;
pub mod profile;

pub use dob::{DobError, DobSelector, days_in_month};
pub use form::{FixedProfile, FormError, FormState};
pub use fortune::{
    DisplayNames, DisplayedResult, DivinationTarget, FortuneResult, format_reading_date,
};
pub use profile::{AnimalSign, BloodType, ParseError, PartnerRef, Profile, Relationship, Zodiac};

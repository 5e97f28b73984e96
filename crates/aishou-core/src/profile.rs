//! Personal attributes collected by the form: the self profile and the partner.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("unknown {kind}: {value:?} (expected one of: {expected})")]
    Unknown {
        kind: &'static str,
        value: String,
        expected: String,
    },
}

/// Declares a closed set of choices with a stable storage key and a display label.
///
/// The key is what gets persisted and typed on the command line; parsing also
/// accepts the label so that values copied from rendered output round-trip.
macro_rules! choice_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $kind:literal {
            $($variant:ident => $key:literal, $label:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $(
                #[serde(rename = $key)]
                $variant,
            )+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn key(&self) -> &'static str {
                match self {
                    $($name::$variant => $key,)+
                }
            }

            pub fn label(&self) -> &'static str {
                match self {
                    $($name::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = ParseError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.key().eq_ignore_ascii_case(needle) || v.label() == needle)
                    .ok_or_else(|| ParseError::Unknown {
                        kind: $kind,
                        value: s.to_string(),
                        expected: Self::ALL
                            .iter()
                            .map(|v| v.key())
                            .collect::<Vec<_>>()
                            .join(", "),
                    })
            }
        }
    };
}

choice_enum! {
    /// ABO blood group.
    BloodType, "blood type" {
        A => "A", "Type A";
        B => "B", "Type B";
        O => "O", "Type O";
        AB => "AB", "Type AB";
    }
}

choice_enum! {
    /// Western zodiac sign, in calendar order starting from Aries.
    Zodiac, "zodiac sign" {
        Aries => "aries", "Aries";
        Taurus => "taurus", "Taurus";
        Gemini => "gemini", "Gemini";
        Cancer => "cancer", "Cancer";
        Leo => "leo", "Leo";
        Virgo => "virgo", "Virgo";
        Libra => "libra", "Libra";
        Scorpio => "scorpio", "Scorpio";
        Sagittarius => "sagittarius", "Sagittarius";
        Capricorn => "capricorn", "Capricorn";
        Aquarius => "aquarius", "Aquarius";
        Pisces => "pisces", "Pisces";
    }
}

choice_enum! {
    /// Birth-year animal of the twelve-branch (eto) cycle.
    AnimalSign, "animal sign" {
        Rat => "rat", "Rat (ne)";
        Ox => "ox", "Ox (ushi)";
        Tiger => "tiger", "Tiger (tora)";
        Rabbit => "rabbit", "Rabbit (u)";
        Dragon => "dragon", "Dragon (tatsu)";
        Snake => "snake", "Snake (mi)";
        Horse => "horse", "Horse (uma)";
        Goat => "goat", "Goat (hitsuji)";
        Monkey => "monkey", "Monkey (saru)";
        Rooster => "rooster", "Rooster (tori)";
        Dog => "dog", "Dog (inu)";
        Boar => "boar", "Boar (i)";
    }
}

choice_enum! {
    /// How the user currently relates to the partner.
    Relationship, "relationship" {
        Lover => "lover", "Lover";
        Crush => "crush", "One-sided crush";
        Spouse => "spouse", "Spouse";
        Friend => "friend", "Friend";
        Coworker => "coworker", "Coworker";
        BusinessContact => "business", "Business contact";
    }
}

/// The user's own attributes. Every field is required before a reading can be requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub blood_type: BloodType,
    pub zodiac: Zodiac,
    pub animal_sign: AnimalSign,
    pub dob: NaiveDate,
}

/// The person the reading is about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartnerRef {
    pub name: String,
    pub relationship: Relationship,
}

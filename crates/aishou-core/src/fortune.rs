//! Reading targets and the fortune result bundle that is displayed and persisted.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Label used for the user in rendered readings.
pub const SELF_LABEL: &str = "You";
/// Fallback label when the partner name is blank.
pub const PARTNER_FALLBACK: &str = "Partner";

/// Which day the reading is for. Resolved to a concrete date at request time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DivinationTarget {
    #[default]
    Today,
    Tomorrow,
}

impl DivinationTarget {
    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Today => today,
            Self::Tomorrow => today.checked_add_days(Days::new(1)).unwrap_or(today),
        }
    }

    /// Button-style label, e.g. `Tomorrow (10/20)`.
    pub fn label(self, today: NaiveDate) -> String {
        let name = match self {
            Self::Today => "Today",
            Self::Tomorrow => "Tomorrow",
        };
        format!("{name} ({})", self.resolve(today).format("%-m/%-d"))
    }
}

/// Human-readable form of a resolved reading date, stored alongside the result.
pub fn format_reading_date(date: NaiveDate) -> String {
    date.format("%B %-d, %Y").to_string()
}

/// Compatibility reading returned by the language model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FortuneResult {
    /// Compatibility score, 0-100.
    pub score: u8,
    pub summary: String,
    pub advice: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayNames {
    pub name1: String,
    pub name2: String,
}

impl DisplayNames {
    pub fn for_partner(partner_name: &str) -> Self {
        let trimmed = partner_name.trim();
        Self {
            name1: SELF_LABEL.to_string(),
            name2: if trimmed.is_empty() {
                PARTNER_FALLBACK.to_string()
            } else {
                trimmed.to_string()
            },
        }
    }
}

/// The "latest result" bundle: what was shown, for whom, and for which day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayedResult {
    pub result: FortuneResult,
    pub names: DisplayNames,
    pub date_str: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn tomorrow_crosses_year_end() {
        assert_eq!(
            DivinationTarget::Tomorrow.resolve(day(2025, 12, 31)),
            day(2026, 1, 1)
        );
        assert_eq!(DivinationTarget::Today.resolve(day(2025, 12, 31)), day(2025, 12, 31));
    }

    #[test]
    fn target_labels() {
        let today = day(2026, 10, 19);
        assert_eq!(DivinationTarget::Today.label(today), "Today (10/19)");
        assert_eq!(DivinationTarget::Tomorrow.label(today), "Tomorrow (10/20)");
    }

    #[test]
    fn reading_date_format() {
        assert_eq!(format_reading_date(day(2026, 3, 7)), "March 7, 2026");
    }

    #[test]
    fn blank_partner_falls_back() {
        assert_eq!(DisplayNames::for_partner("  ").name2, PARTNER_FALLBACK);
        assert_eq!(DisplayNames::for_partner(" Aoi ").name2, "Aoi");
    }

    #[test]
    fn displayed_result_uses_camel_case_keys() {
        let bundle = DisplayedResult {
            result: FortuneResult {
                score: 88,
                summary: "Bright".into(),
                advice: "Talk more".into(),
            },
            names: DisplayNames::for_partner("Aoi"),
            date_str: "October 19, 2026".into(),
        };
        let value = serde_json::to_value(&bundle).unwrap();
        assert_eq!(value["dateStr"], "October 19, 2026");
        assert_eq!(value["names"]["name1"], SELF_LABEL);
        assert_eq!(value["result"]["score"], 88);
    }

    #[test]
    fn result_rejects_extra_fields() {
        let json = r#"{"score": 50, "summary": "s", "advice": "a", "title": "t"}"#;
        assert!(serde_json::from_str::<FortuneResult>(json).is_err());
    }
}

//! Prompt text and requested output shape for a compatibility reading.

use serde_json::{Value, json};

use crate::oracle::FortuneRequest;

// ── Prompt templates ──

pub const SYSTEM_PROMPT: &str = "\
You are a warm, insightful fortune teller who writes compatibility readings \
by combining blood-type personality lore, western astrology, the twelve-animal \
zodiac, and numerology from birth dates.

Respond ONLY with a JSON object. No markdown fences, no explanation, just raw JSON:
{
  \"score\": an integer from 0 to 100 rating the pair's compatibility on the given day,
  \"summary\": \"one short sentence capturing the reading\",
  \"advice\": \"two to four sentences of concrete, kind advice for the user\"
}

Address the user as \"you\" and the partner by name. Keep the tone encouraging \
even when the score is low.";

pub fn build_user_prompt(req: &FortuneRequest) -> String {
    format!(
        "Create a compatibility reading.\n\
         \n\
         You:\n\
         Blood type: {blood}\n\
         Zodiac sign: {zodiac}\n\
         Animal sign: {animal}\n\
         Date of birth: {dob}\n\
         \n\
         Partner:\n\
         Name: {name}\n\
         \n\
         Relationship: {relationship}\n\
         Reading for: {date}",
        blood = req.profile.blood_type,
        zodiac = req.profile.zodiac,
        animal = req.profile.animal_sign,
        dob = req.profile.dob.format("%Y-%m-%d"),
        name = req.partner.name,
        relationship = req.partner.relationship,
        date = req.date.format("%Y-%m-%d (%A)"),
    )
}

/// Structured-output schema in Gemini's OpenAPI subset.
pub fn response_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "score": { "type": "INTEGER", "minimum": 0, "maximum": 100 },
            "summary": { "type": "STRING" },
            "advice": { "type": "STRING" }
        },
        "required": ["score", "summary", "advice"],
        "propertyOrdering": ["score", "summary", "advice"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use aishou_core::{AnimalSign, BloodType, PartnerRef, Profile, Relationship, Zodiac};
    use chrono::NaiveDate;

    fn request() -> FortuneRequest {
        FortuneRequest {
            profile: Profile {
                blood_type: BloodType::O,
                zodiac: Zodiac::Leo,
                animal_sign: AnimalSign::Dragon,
                dob: NaiveDate::from_ymd_opt(1990, 5, 10).unwrap(),
            },
            partner: PartnerRef {
                name: "Aoi".into(),
                relationship: Relationship::Friend,
            },
            date: NaiveDate::from_ymd_opt(2026, 10, 19).unwrap(),
        }
    }

    #[test]
    fn user_prompt_describes_both_parties() {
        let prompt = build_user_prompt(&request());
        assert!(prompt.contains("Blood type: Type O"));
        assert!(prompt.contains("Zodiac sign: Leo"));
        assert!(prompt.contains("Animal sign: Dragon (tatsu)"));
        assert!(prompt.contains("Date of birth: 1990-05-10"));
        assert!(prompt.contains("Name: Aoi"));
        assert!(prompt.contains("Relationship: Friend"));
        assert!(prompt.contains("Reading for: 2026-10-19 (Monday)"));
    }

    #[test]
    fn schema_requires_every_result_field() {
        let schema = response_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap())
            .collect();
        assert_eq!(required, ["score", "summary", "advice"]);
        assert_eq!(schema["properties"]["score"]["type"], "INTEGER");
    }
}

//! Terminal rendering for readings, usage, history, and the usage guide.
//!
//! Every function here is a pure `… -> String` so output can be asserted in
//! tests; `main` decides where it is printed.

use std::fmt::Write;

use aishou_core::{DisplayedResult, DivinationTarget, FormState};
use aishou_store::NameHistory;
use chrono::NaiveDate;

const GAUGE_CELLS: usize = 20;

pub const QUOTA_NOTICE: &str =
    "You have reached today's reading limit. Please come back tomorrow.";

pub const MANUAL: &str = "\
Usage guide

1. Enter your details
   Choose your blood type, zodiac sign, animal sign, and date of birth.
   Run `aishou profile fix` to remember them for next time.

2. Enter your partner
   Give your partner's name (a nickname is fine) and your current
   relationship. Recent names are kept in `aishou history list`.

3. Get your reading
   Run `aishou tell` and the stars will read your compatibility.
   Up to 5 free readings per day.";

/// Horizontal score gauge, e.g. `[##############------] 72%`.
pub fn score_gauge(score: u8) -> String {
    let score = score.min(100) as usize;
    let filled = (score * GAUGE_CELLS + 50) / 100;
    format!(
        "[{}{}] {score}%",
        "#".repeat(filled),
        "-".repeat(GAUGE_CELLS - filled)
    )
}

pub fn render_result(shown: &DisplayedResult) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "=== {} & {} ===", shown.names.name1, shown.names.name2);
    let _ = writeln!(out, "Fortune for {}", shown.date_str);
    let _ = writeln!(out);
    let _ = writeln!(out, "  {}", score_gauge(shown.result.score));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", shown.result.summary);
    let _ = writeln!(out);
    let _ = write!(out, "{}", shown.result.advice);
    out
}

pub fn render_usage(remaining: u32, quota: u32, today: NaiveDate) -> String {
    let mut out = format!("Remaining today: {remaining}/{quota}");
    for target in [DivinationTarget::Today, DivinationTarget::Tomorrow] {
        let _ = write!(out, "\n  {}", target.label(today));
    }
    if remaining == 0 {
        let _ = write!(out, "\n{QUOTA_NOTICE}");
    }
    out
}

pub fn render_history(history: &NameHistory) -> String {
    if history.is_empty() {
        return "No past names.".to_string();
    }
    history
        .names()
        .iter()
        .enumerate()
        .map(|(i, name)| format!("{:>2}. {name}", i + 1))
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn render_profile(form: &FormState, keep_fixed: bool) -> String {
    fn or_unset(v: Option<String>) -> String {
        v.unwrap_or_else(|| "(not set)".to_string())
    }

    let mut out = String::new();
    let _ = writeln!(out, "Your details{}", if keep_fixed { " (fixed)" } else { "" });
    let rows = [
        ("blood type", or_unset(form.blood_type.map(|v| v.to_string()))),
        ("zodiac sign", or_unset(form.zodiac.map(|v| v.to_string()))),
        ("animal sign", or_unset(form.animal_sign.map(|v| v.to_string()))),
        (
            "date of birth",
            or_unset(form.dob.value().map(|d| d.format("%Y-%m-%d").to_string())),
        ),
    ];
    let lines: Vec<String> = rows
        .iter()
        .map(|(label, value)| format!("  {label:<14} {value}"))
        .collect();
    out.push_str(&lines.join("\n"));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use aishou_core::{BloodType, DisplayNames, DobSelector, FortuneResult};

    #[test]
    fn gauge_bounds() {
        assert_eq!(score_gauge(0), format!("[{}] 0%", "-".repeat(20)));
        assert_eq!(score_gauge(100), format!("[{}] 100%", "#".repeat(20)));
        assert_eq!(score_gauge(72), "[##############------] 72%");
    }

    #[test]
    fn result_card_layout() {
        let shown = DisplayedResult {
            result: FortuneResult {
                score: 50,
                summary: "Balanced".into(),
                advice: "Meet halfway".into(),
            },
            names: DisplayNames::for_partner("Aoi"),
            date_str: "October 19, 2026".into(),
        };
        let card = render_result(&shown);
        let lines: Vec<&str> = card.lines().collect();
        assert_eq!(lines[0], "=== You & Aoi ===");
        assert_eq!(lines[1], "Fortune for October 19, 2026");
        assert!(lines[3].contains("50%"));
        assert_eq!(lines[5], "Balanced");
        assert_eq!(lines[7], "Meet halfway");
    }

    #[test]
    fn usage_shows_notice_when_exhausted() {
        let today = NaiveDate::from_ymd_opt(2026, 10, 19).unwrap();
        let text = render_usage(0, 5, today);
        assert!(text.starts_with("Remaining today: 0/5"));
        assert!(text.contains("Tomorrow (10/20)"));
        assert!(text.ends_with(QUOTA_NOTICE));
        assert!(!render_usage(3, 5, today).contains(QUOTA_NOTICE));
    }

    #[test]
    fn history_is_numbered() {
        let mut h = NameHistory::new();
        h.push("Aoi");
        h.push("Ren");
        assert_eq!(render_history(&h), " 1. Ren\n 2. Aoi");
        assert_eq!(render_history(&NameHistory::new()), "No past names.");
    }

    #[test]
    fn profile_marks_unset_fields() {
        let mut form = FormState::new();
        form.blood_type = Some(BloodType::B);
        form.dob = DobSelector::parse("2000-02-29").unwrap();
        let text = render_profile(&form, true);
        assert!(text.starts_with("Your details (fixed)"));
        assert!(text.contains("Type B"));
        assert!(text.contains("2000-02-29"));
        assert!(text.contains("(not set)"));
    }
}

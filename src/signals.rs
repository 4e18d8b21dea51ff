//! Contradiction signal extraction.
//!
//! Scans one `WeeklyContext` (plus journal themes supplied by the theme
//! extractor) for concrete mismatches between stated values and observed
//! behavior. Pure functions of their inputs: no side effects, identical
//! inputs always yield identical output.

use crate::types::{AppUsage, WeeklyContext};
use crate::util::parse_duration_min;

/// Ordered `theme name → description` pairs. Order matters: rules stop
/// after the first qualifying theme, and the missing-highlight signal
/// names the first two.
pub type ThemeMap = Vec<(String, String)>;

/// Meeting count at which a week reads as overloaded. The original
/// heuristics disagreed between 12 and 11; unified here.
pub const MEETING_OVERLOAD_THRESHOLD: u32 = 12;

/// Synthetic aggregate rows that must never rank as a "top app".
const AGGREGATE_APP_LABELS: &[&str] = &["All Usage"];

/// Theme keywords that contradict heavy app usage.
const INWARD_THEME_WORDS: &[&str] = &["solitude", "presence", "authenticity", "focus", "peace"];

/// Theme keywords that contradict meeting overload.
const STILLNESS_THEME_WORDS: &[&str] = &["stillness", "depth", "clarity", "focus"];

fn theme_matches(theme: &str, words: &[&str]) -> bool {
    let lowered = theme.to_lowercase();
    words.iter().any(|w| lowered.contains(w))
}

/// The highest-duration app, ranked under the duration grammar.
/// Unparseable durations are unrankable and excluded, never fatal.
fn top_app(screen_time: &[AppUsage]) -> Option<&AppUsage> {
    screen_time
        .iter()
        .filter_map(|usage| parse_duration_min(&usage.time).map(|min| (min, usage)))
        .max_by_key(|(min, _)| *min)
        .map(|(_, usage)| usage)
}

/// Extract concrete behavioral contradictions for one week.
///
/// Rules are applied in order and are independently optional: any subset
/// of the three may fire. Possibly empty.
pub fn extract_contradictions(context: &WeeklyContext, themes: &ThemeMap) -> Vec<String> {
    let mut contradictions = Vec::new();

    // 1. Top app usage vs inward-facing themes
    if let Some(top) = top_app(&context.screen_time) {
        if !AGGREGATE_APP_LABELS.contains(&top.app_name.as_str()) {
            if let Some((theme, _)) = themes
                .iter()
                .find(|(name, _)| theme_matches(name, INWARD_THEME_WORDS))
            {
                contradictions.push(format!(
                    "Theme: {theme} \u{2192} App Usage: {} ({})",
                    top.app_name, top.time
                ));
            }
        }
    }

    // 2. Calendar overload vs stillness themes
    if let Some(summary) = context.calendar_summary.scheduled() {
        if summary.total_events >= MEETING_OVERLOAD_THRESHOLD {
            if let Some((theme, _)) = themes
                .iter()
                .find(|(name, _)| theme_matches(name, STILLNESS_THEME_WORDS))
            {
                contradictions.push(format!(
                    "Theme: {theme} \u{2192} Meetings: {} events, {} min",
                    summary.total_events, summary.total_minutes
                ));
            }
        }
    }

    // 3. No life highlight despite expressive themes
    if context.life_highlights.trim().is_empty() && !themes.is_empty() {
        let named: Vec<&str> = themes.iter().take(2).map(|(name, _)| name.as_str()).collect();
        contradictions.push(format!(
            "No life highlight recorded, yet journal themes include: {}",
            named.join(", ")
        ));
    }

    contradictions
}

/// Extract concrete screen/calendar clues to ground the reflection
/// prompt, independent of any theme map.
pub fn behavioral_clues(context: &WeeklyContext) -> Vec<String> {
    let mut clues = Vec::new();

    if let Some(top) = top_app(&context.screen_time) {
        if !AGGREGATE_APP_LABELS.contains(&top.app_name.as_str()) {
            clues.push(format!("Top used app: {} ({})", top.app_name, top.time));
        }
    }

    if let Some(summary) = context.calendar_summary.scheduled() {
        if summary.total_events >= MEETING_OVERLOAD_THRESHOLD {
            clues.push(format!(
                "High meeting load: {} events, total {} minutes",
                summary.total_events, summary.total_minutes
            ));
        }
    }

    if context.life_highlights.trim().is_empty() {
        clues.push("No life highlight recorded this week".to_string());
    }

    clues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CalendarSummary, WeekCalendarSummary};
    use std::collections::BTreeMap;

    fn usage(app: &str, time: &str) -> AppUsage {
        AppUsage {
            app_name: app.to_string(),
            time: time.to_string(),
        }
    }

    fn context(
        life_highlights: &str,
        screen_time: Vec<AppUsage>,
        total_events: u32,
        total_minutes: u32,
    ) -> WeeklyContext {
        let calendar_summary = if total_events == 0 {
            CalendarSummary::no_events()
        } else {
            CalendarSummary::Scheduled(WeekCalendarSummary {
                total_events,
                total_minutes,
                time_of_day_breakdown: BTreeMap::new(),
                meeting_type_distribution: BTreeMap::new(),
            })
        };
        WeeklyContext {
            week: "Jun 23\u{2013}29".to_string(),
            work_highlights: "shipped v2".to_string(),
            life_highlights: life_highlights.to_string(),
            raw_notes: "...".to_string(),
            screen_time,
            calendar_summary,
        }
    }

    fn themes(names: &[&str]) -> ThemeMap {
        names
            .iter()
            .map(|n| (n.to_string(), "...".to_string()))
            .collect()
    }

    #[test]
    fn test_empty_inputs_yield_empty_list() {
        let ctx = context("hiking", vec![], 0, 0);
        assert!(extract_contradictions(&ctx, &ThemeMap::new()).is_empty());
    }

    #[test]
    fn test_end_to_end_scenario() {
        // Weekly-notes row with no life highlight, Instagram on top,
        // 14 events / 600 minutes, a Solitude theme.
        let ctx = context(
            "",
            vec![usage("Instagram", "2h 15m"), usage("Safari", "1h 5m")],
            14,
            600,
        );
        let found = extract_contradictions(&ctx, &themes(&["Solitude"]));
        assert_eq!(found.len(), 2);
        assert!(found[0].contains("Solitude"));
        assert!(found[0].contains("Instagram (2h 15m)"));
        assert!(found[1].contains("journal themes include: Solitude"));
    }

    #[test]
    fn test_first_qualifying_theme_wins() {
        let ctx = context("hiking", vec![usage("Instagram", "2h")], 0, 0);
        let found = extract_contradictions(&ctx, &themes(&["Restlessness", "Presence", "Peace"]));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("Presence"));
        assert!(!found[0].contains("Peace"));
    }

    #[test]
    fn test_aggregate_label_never_ranks() {
        let ctx = context("hiking", vec![usage("All Usage", "30h"), usage("Maps", "1h")], 0, 0);
        let found = extract_contradictions(&ctx, &themes(&["Solitude"]));
        // "All Usage" wins the ranking, so rule 1 stays silent
        assert!(found.is_empty());
    }

    #[test]
    fn test_unparseable_durations_excluded_from_ranking() {
        let ctx = context(
            "hiking",
            vec![usage("Mystery", "lots"), usage("Maps", "45m")],
            0,
            0,
        );
        let found = extract_contradictions(&ctx, &themes(&["Focus"]));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("Maps (45m)"));
    }

    #[test]
    fn test_meeting_overload_threshold_boundary() {
        let below = context("hiking", vec![], 11, 500);
        assert!(extract_contradictions(&below, &themes(&["Stillness"])).is_empty());

        let at = context("hiking", vec![], 12, 540);
        let found = extract_contradictions(&at, &themes(&["Stillness"]));
        assert_eq!(found.len(), 1);
        assert!(found[0].contains("12 events, 540 min"));
    }

    #[test]
    fn test_missing_life_highlight_names_first_two_themes() {
        let ctx = context("   ", vec![], 0, 0);
        let found = extract_contradictions(&ctx, &themes(&["Restlessness", "Creative Urge", "Awe"]));
        assert_eq!(found.len(), 1);
        assert!(found[0].ends_with("Restlessness, Creative Urge"));
    }

    #[test]
    fn test_purity() {
        let ctx = context("", vec![usage("Instagram", "2h 15m")], 14, 600);
        let theme_map = themes(&["Solitude"]);
        assert_eq!(
            extract_contradictions(&ctx, &theme_map),
            extract_contradictions(&ctx, &theme_map)
        );
    }

    #[test]
    fn test_behavioral_clues() {
        let ctx = context("", vec![usage("Instagram", "2h 15m")], 14, 600);
        let clues = behavioral_clues(&ctx);
        assert_eq!(clues.len(), 3);
        assert_eq!(clues[0], "Top used app: Instagram (2h 15m)");
        assert_eq!(clues[1], "High meeting load: 14 events, total 600 minutes");
        assert_eq!(clues[2], "No life highlight recorded this week");
    }
}

//! Prompt construction for the completion and vision collaborators.
//!
//! Every prompt the crate sends lives here: the Socratic reflection, the
//! weekly interpretation, journal theme extraction, and the three vision
//! transcription prompts. Templates are const strings with a small
//! builder function each, so the call sites stay mechanical.

use crate::signals::behavioral_clues;
use crate::types::WeeklyContext;

// =============================================================================
// System instructions
// =============================================================================

pub const SOCRATIC_SYSTEM: &str = "You are a Socratic reflection engine.";

pub const INTERPRETATION_SYSTEM: &str =
    "You are a perceptive and thoughtful reflection assistant.";

pub const THEMES_SYSTEM: &str =
    "You extract the psychological and philosophical structure behind journals.";

// =============================================================================
// Reflection (Socratic observation)
// =============================================================================

const SOCRATIC_TEMPLATE: &str = r#"You are a Socratic reflection engine that speaks with depth, irony, and clarity.

Your tone is poetic but grounded. You help the person see what they might be avoiding in themselves.
Your gift is to reflect their behavior, words, and inner contradictions with elegance and precision.

You are given:

- A journal (with metaphysical reflections, emotions, ambitions, hesitations)
- A weekly data record (work/life highlights, app usage, meetings, notes)
- Concrete behavioral clues extracted from the weekly data

Your task is:

1. Identify 2 inner polarities (e.g. "Aspiration vs. Hesitation", "Solitude vs. Distraction").
2. For each, write one paragraph of 1-2 sentences of grounded observation, mentioning concrete examples from the journal or data.
3. Then ask 2-3 Socratic questions that are concise, direct, and poetic.
4. Use second person ("you") and short lines.

Be bold. Be kind. Be disorienting. Make them stop and look inward.

---

JOURNAL:
{journal_text}

WEEKLY SNAPSHOT:
{weekly_perception_text}

BEHAVIORAL CLUES:
{clues}

---

Now generate your grounded reflection and Socratic questions.
"#;

/// Build the reflection prompt from the journal, the rendered weekly
/// snapshot, and clues derived from the perception (when present).
pub fn socratic_prompt(
    journal_text: &str,
    weekly_perception_text: &str,
    perception: Option<&WeeklyContext>,
) -> String {
    let clues = perception
        .map(|context| behavioral_clues(context).join("\n"))
        .filter(|c| !c.is_empty())
        .unwrap_or_else(|| "None detected".to_string());

    SOCRATIC_TEMPLATE
        .replace("{journal_text}", journal_text)
        .replace("{weekly_perception_text}", weekly_perception_text)
        .replace("{clues}", &clues)
}

// =============================================================================
// Weekly interpretation
// =============================================================================

const INTERPRETATION_TEMPLATE: &str = r#"You are a reflective AI assistant that analyzes weekly patterns in work and life.

You will receive:
- A set of weekly notes with highlights
- A summary of screen time
- A summary of calendar events
- An optional sample from a personal journal (long-term memory)

Your task is to identify:
1. Frictions or tensions in the person's behavior
2. Contradictions between intention and action
3. Latent patterns (e.g. pushing creativity late, always on-call, recurring emotions)
4. Insights from screen time - what is capturing attention, and is it aligned?

Be thoughtful, not judgmental. Use simple, reflective language.

---------------------
WEEKLY INPUT:

{weekly_snapshot}

Optional journal memory (background themes):
{journal_sample}

---------------------
Output:
Write a 3-6 sentence paragraph that reflects meaningful insights about this week. Focus on helping the person notice what they may be missing.
"#;

pub fn interpretation_prompt(weekly_snapshot: &str, journal_sample: &str) -> String {
    INTERPRETATION_TEMPLATE
        .replace("{weekly_snapshot}", weekly_snapshot)
        .replace("{journal_sample}", journal_sample)
}

// =============================================================================
// Journal theme extraction
// =============================================================================

const THEMES_TEMPLATE: &str = r#"You are a philosophical AI trained to extract latent soul patterns from a personal journal.

Given the journal below, identify 3-7 inner themes that emerge across the entries.

Each theme should:
- Be named in a word or short phrase (e.g. "Restlessness", "Desire for Meaning", "Creative Urge")
- Include a short description (1-2 sentences) that reflects the essence of that theme as it shows up in this person

Avoid clinical or diagnostic labels. Use poetic, precise, human language.

Journal:
"""{journal_text}"""

Return your answer in JSON format, like:
{
  "Theme Name 1": "Description...",
  "Theme Name 2": "Description..."
}
"#;

pub fn themes_prompt(journal_text: &str) -> String {
    THEMES_TEMPLATE.replace("{journal_text}", journal_text)
}

// =============================================================================
// Vision transcription prompts
// =============================================================================

/// Journal page → plain text with `=== date ===` section headers.
pub const JOURNAL_TRANSCRIPTION_PROMPT: &str = r#"You are transcribing a handwritten Greek personal journal.
Extract everything you can read, even if handwriting is messy.

If you find a date (like '27 Ιουλίου', '2025-07-27', or similar), use it as a section header:
=== 27 Ιουλίου 2025 ===

Then write the full content below.
Preserve line breaks if meaningful. Do not add any explanation.
"#;

/// Screen-time screenshot → `week, app_name, time` CSV rows.
pub const SCREEN_TIME_TRANSCRIPTION_PROMPT: &str = r#"You are a data extractor for a digital wellness agent.
The user has uploaded a screenshot of their iPhone Screen Time weekly report.

Extract the following structured CSV data from the image:

Format:
week, app_name, time

Rules:
- Use the week shown at the top of the image (e.g. 'Jun 23-30') as the 'week' for all rows.
- For each app listed under 'Show Apps', extract its name and time.
- Ignore usage categories like 'Productivity & Finance' or 'Social'.
- Output the CSV data as plain text only - no Markdown, no backticks, no formatting, no explanations.
"#;

/// Weekly reflection page → structured JSON.
pub const WEEKLY_REFLECTION_TRANSCRIPTION_PROMPT: &str = r#"You are reading a handwritten weekly reflection journal (in Greek and English).
Extract structured content in the following JSON format:

{
    "work_highlights": "...",
    "life_highlights": "...",
    "raw_notes": "..."
}

- "work_highlights": summary of achievements or reflections about work.
- "life_highlights": reflections about personal or emotional life.
- "raw_notes": full cleaned transcript of the handwritten note.
- The journal may contain Greek and English mixed, often in the same sentence.
  Greek is used for emotional or personal reflection, English for technical or
  work-related terms (e.g. "demo", "stream", "company triathlon").
  Do not translate - keep the original expression.

Return only valid JSON without markdown or commentary.
"#;

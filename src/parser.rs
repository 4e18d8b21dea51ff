//! Low-level text parsing shared by the normalizers.
//!
//! The calendar export and the screen-time transcriptions both arrive as
//! CSV-ish plain text. Fields can be double-quoted (Outlook quotes any
//! description containing commas or line breaks), so splitting is done
//! with a small quote-aware scanner rather than a naive `split(',')`.

/// Split one CSV line into trimmed fields, honoring double quotes and
/// `""` escapes inside quoted fields.
pub fn split_csv_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes => {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            }
            '"' => in_quotes = true,
            ',' if !in_quotes => {
                fields.push(current.trim().to_string());
                current.clear();
            }
            _ => current.push(c),
        }
    }
    fields.push(current.trim().to_string());
    fields
}

/// Split CSV text into records. Newlines inside quoted fields belong to
/// the field, not the record boundary (Outlook descriptions span lines).
fn split_csv_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut in_quotes = false;
    let mut record_start = 0;

    for (i, c) in text.char_indices() {
        match c {
            '"' => in_quotes = !in_quotes,
            '\n' if !in_quotes => {
                records.push(&text[record_start..i]);
                record_start = i + 1;
            }
            _ => {}
        }
    }
    records.push(&text[record_start..]);
    records
        .into_iter()
        .map(|r| r.strip_suffix('\r').unwrap_or(r))
        .filter(|r| !r.trim().is_empty())
        .collect()
}

/// Parse CSV text into a header row plus data rows. Blank records are
/// skipped. Returns `None` when there is no header at all.
pub fn parse_csv(text: &str) -> Option<(Vec<String>, Vec<Vec<String>>)> {
    let mut records = split_csv_records(text).into_iter();
    let header = split_csv_line(records.next()?);
    let rows = records.map(split_csv_line).collect();
    Some((header, rows))
}

/// Strip leading/trailing Markdown code fences from collaborator output.
///
/// The vision collaborator is told to return bare JSON/CSV but sometimes
/// wraps it in ``` or ```json anyway; tolerate both.
pub fn strip_code_fences(raw: &str) -> String {
    raw.lines()
        .filter(|line| !line.trim_start().starts_with("```"))
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

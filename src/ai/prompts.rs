//! Prompt templates and the journal context fed to the prompt generator.

use crate::journal::types::LogEntry;

/// Upper bound on reflection questions handed back to callers.
pub const MAX_PROMPTS: usize = 5;

/// Separator between log entries in the prompt context.
pub const CONTEXT_SEPARATOR: &str = "\n---\n";

pub const CATEGORIZE_INSTRUCTIONS: &str = "You are an assistant that categorizes daily log entries. \
Given a log entry, choose the single most appropriate category from: \
Work, Personal, Health, Social, Travel, Learning, Errands, Philosophy, Other. \
If the category is Learning, also give a short subcategory naming the subject. \
Give a confidence score between 0 and 1. \
Reply with JSON: {\"category\": string, \"subcategory\": string or null, \"confidence\": number}.";

pub const REFLECTION_INSTRUCTIONS: &str = "You are a personal assistant that helps users recall their daily activities. \
Based on any previous logs provided, write 3 to 5 open-ended questions that prompt the user \
to write about their day. Cover different aspects of a typical day such as work, personal life, \
health and social interactions. \
Reply with JSON: {\"promptQuestions\": [string]}.";

/// Render one entry as `[Category - Subcategory] text`.
pub fn context_line(entry: &LogEntry) -> String {
    match (&entry.category, &entry.subcategory) {
        (Some(category), Some(sub)) => format!("[{category} - {sub}] {}", entry.text),
        (Some(category), None) => format!("[{category}] {}", entry.text),
        (None, _) => entry.text.clone(),
    }
}

/// Build prompt-generator context from the first `limit` entries of `logs`
/// (callers pass them newest first). Returns `None` when there is nothing to show.
pub fn build_context(logs: &[LogEntry], limit: usize) -> Option<String> {
    let lines: Vec<String> = logs.iter().take(limit).map(context_line).collect();
    if lines.is_empty() {
        None
    } else {
        Some(lines.join(CONTEXT_SEPARATOR))
    }
}

/// User message for a reflection request.
pub fn reflection_request(context: Option<&str>) -> String {
    match context {
        Some(ctx) if !ctx.trim().is_empty() => format!("Previous logs:\n{ctx}"),
        _ => "Previous logs: (none yet)".to_string(),
    }
}

/// Trim questions, drop blanks, cap at [`MAX_PROMPTS`].
pub fn normalize_questions(questions: Vec<String>) -> Vec<String> {
    questions
        .into_iter()
        .map(|q| q.trim().to_string())
        .filter(|q| !q.is_empty())
        .take(MAX_PROMPTS)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::types::Category;
    use chrono::Utc;

    fn entry(text: &str, category: Option<Category>, sub: Option<&str>) -> LogEntry {
        LogEntry {
            id: uuid::Uuid::now_v7().to_string(),
            timestamp: Utc::now(),
            text: text.into(),
            category,
            subcategory: sub.map(String::from),
            confidence: category.map(|_| 0.9),
        }
    }

    #[test]
    fn context_line_formats_prefix() {
        let e = entry("Read chapter 5", Some(Category::Learning), Some("Anatomy"));
        assert_eq!(context_line(&e), "[Learning - Anatomy] Read chapter 5");

        let e = entry("Team sync", Some(Category::Work), None);
        assert_eq!(context_line(&e), "[Work] Team sync");

        let e = entry("Untagged", None, None);
        assert_eq!(context_line(&e), "Untagged");
    }

    #[test]
    fn build_context_takes_first_entries() {
        let logs = vec![
            entry("four", Some(Category::Other), None),
            entry("three", Some(Category::Other), None),
            entry("two", Some(Category::Other), None),
            entry("one", Some(Category::Other), None),
        ];
        let ctx = build_context(&logs, 3).unwrap();
        assert_eq!(ctx, "[Other] four\n---\n[Other] three\n---\n[Other] two");
    }

    #[test]
    fn build_context_empty_is_none() {
        assert_eq!(build_context(&[], 3), None);
    }

    #[test]
    fn normalize_caps_and_trims() {
        let qs = (1..=7).map(|i| format!(" Q{i}? ")).chain([" ".to_string()]);
        let out = normalize_questions(qs.collect());
        assert_eq!(out.len(), MAX_PROMPTS);
        assert_eq!(out[0], "Q1?");
    }

    #[test]
    fn reflection_request_without_context() {
        assert_eq!(reflection_request(None), "Previous logs: (none yet)");
        assert_eq!(reflection_request(Some("  ")), "Previous logs: (none yet)");
        assert!(reflection_request(Some("[Work] x")).ends_with("[Work] x"));
    }
}

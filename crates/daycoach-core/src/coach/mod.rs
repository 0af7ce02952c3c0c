//! Coaching text: per-task nudge lines and reflection digests.

mod generator;

pub use generator::{OpenAi, RuleBased, TextGenerator};

use serde::{Deserialize, Serialize};

use crate::task::Reflection;

const SYSTEM_COACH: &str =
    "You are an excellent personal productivity coach. Speak briefly and concretely.";
const SYSTEM_SUMMARY: &str = "You are a concise, practical review editor. Summaries are bullet \
points; improvements start with a verb.";

const FALLBACK_NUDGE: &str = "Spend two minutes writing just the first heading.";
const FALLBACK_SUMMARY: &str = "Start small and keep moving; size work into 30-minute chunks.";
const FALLBACK_IMPROVEMENTS: [&str; 3] = [
    "Start with 5 minutes in the morning",
    "Split work into 30-minute chunks",
    "Pull deadlines earlier",
];

/// Digest of a window of reflections: a short summary plus up to three
/// improvement lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReflectionDigest {
    pub summary: String,
    pub improvements: Vec<String>,
}

/// One short, actionable nudge for a task. Always returns a line.
pub async fn coach_line_for_task(
    generator: &TextGenerator,
    title: &str,
    effort_min: i64,
) -> String {
    let user = format!(
        "Task: {title}\nEstimated time: {effort_min} minutes\nOutput: one line, at most 12 words, \
         that makes starting right now easy."
    );
    let text = generator.generate(SYSTEM_COACH, &user, 50).await;
    let line = text.trim();
    if line.is_empty() {
        FALLBACK_NUDGE.to_string()
    } else {
        line.to_string()
    }
}

/// Summarize a window of reflections into a digest.
///
/// The model output is parsed line by line: lines before an "improve"/"next"
/// marker feed the summary (max 2), lines after it feed the improvements
/// (max 3). Anything unusable falls back to canned defaults, so the digest
/// is never empty.
pub async fn summarize_reflections(
    generator: &TextGenerator,
    notes: &[Reflection],
    days: i64,
) -> ReflectionDigest {
    let joined: String = notes
        .iter()
        .map(|r| format!("- {} (mood={}) {}\n", r.date, r.mood, truncate(&r.text, 240)))
        .collect();
    let user = format!(
        "Notes from the last {days} days:\n{joined}\n\
         Output: 1) a summary (at most 2 bullet points) 2) 3 improvements (short, verb-first), \
         introduced by the word 'Improvements'."
    );
    let raw = generator.generate(SYSTEM_SUMMARY, &user, 180).await;

    let mut summary: Vec<String> = Vec::new();
    let mut improvements: Vec<String> = Vec::new();
    let mut in_improvements = false;
    for line in raw.lines() {
        let line = line.trim_matches(|c: char| c.is_whitespace() || "-*•".contains(c));
        if line.is_empty() {
            continue;
        }
        let lower = line.to_lowercase();
        if lower.starts_with("improve") || lower.starts_with("next") {
            in_improvements = true;
            // Marker lines like "Improvements:" carry no content of their own.
            let rest = line.splitn(2, ':').nth(1).unwrap_or("").trim();
            if !rest.is_empty() {
                improvements.push(rest.to_string());
            }
            continue;
        }
        if in_improvements {
            improvements.push(line.to_string());
        } else {
            summary.push(line.to_string());
        }
    }

    summary.truncate(2);
    improvements.truncate(3);
    ReflectionDigest {
        summary: if summary.is_empty() {
            FALLBACK_SUMMARY.to_string()
        } else {
            summary.join(" / ")
        },
        improvements: if improvements.is_empty() {
            FALLBACK_IMPROVEMENTS.iter().map(|s| s.to_string()).collect()
        } else {
            improvements
        },
    }
}

fn truncate(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};

    fn note(day: u32, text: &str, mood: i64) -> Reflection {
        Reflection {
            id: day as i64,
            date: NaiveDate::from_ymd_opt(2025, 9, day).unwrap(),
            text: text.to_string(),
            mood,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn coach_line_is_never_empty() {
        let g = TextGenerator::rule_based();
        let line = coach_line_for_task(&g, "Write the report", 45).await;
        assert!(!line.trim().is_empty());
    }

    #[tokio::test]
    async fn digest_has_defaults_when_output_is_unusable() {
        let g = TextGenerator::rule_based();
        let digest = summarize_reflections(&g, &[note(10, "slow day", 2)], 7).await;
        assert!(!digest.summary.is_empty());
        assert!(!digest.improvements.is_empty());
        assert!(digest.improvements.len() <= 3);
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        assert_eq!(truncate("hello", 10), "hello");
        assert_eq!(truncate("hello", 3), "hel");
        // Multi-byte characters must not be split.
        assert_eq!(truncate("日本語テキスト", 3), "日本語");
    }
}

//! Deterministic reflection generation.
//!
//! This strategy is a total function over non-empty text: any length, any
//! Unicode content, with or without sentence punctuation. Identical input
//! always yields byte-identical output, which is what makes the fallback
//! path testable by exact comparison.

use async_trait::async_trait;

use super::{ReflectionResult, Tone};
use crate::providers::ReflectionStrategy;

/// How many leading sentences the summary keeps.
const SUMMARY_SENTENCE_CAP: usize = 3;

/// Positive tone markers. Matched as substrings of the lowercased content,
/// so "energ" covers "energized" and "energy".
const POSITIVE_MARKERS: [&str; 5] = ["grateful", "excited", "optimistic", "energ", "progress"];

/// Negative tone markers.
const NEGATIVE_MARKERS: [&str; 6] = [
    "tired",
    "worried",
    "anxious",
    "overwhelmed",
    "stressed",
    "frustrated",
];

/// Collapse all whitespace runs (including newlines) to single spaces and
/// trim the ends.
fn normalize(content: &str) -> String {
    content.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Split normalized text into sentences. A boundary is terminal punctuation
/// followed by whitespace; the punctuation stays with its sentence.
fn split_sentences(normalized: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = normalized.char_indices().peekable();

    while let Some((_, ch)) = chars.next() {
        if matches!(ch, '.' | '!' | '?') {
            if let Some(&(next_idx, next_ch)) = chars.peek() {
                if next_ch.is_whitespace() {
                    let fragment = normalized[start..next_idx].trim();
                    if !fragment.is_empty() {
                        sentences.push(fragment);
                    }
                    start = next_idx;
                }
            }
        }
    }

    let tail = normalized[start..].trim();
    if !tail.is_empty() {
        sentences.push(tail);
    }
    sentences
}

/// First three sentences of the content, joined with single spaces. Content
/// with no sentence boundary at all comes back whole (normalized).
pub fn summarize(content: &str) -> String {
    let normalized = normalize(content);
    let sentences = split_sentences(&normalized);
    if sentences.is_empty() {
        return normalized;
    }
    sentences[..sentences.len().min(SUMMARY_SENTENCE_CAP)].join(" ")
}

fn distinct_marker_count(lowered: &str, markers: &[&str]) -> usize {
    // Each marker contributes at most 1 no matter how often it appears.
    markers
        .iter()
        .filter(|marker| lowered.contains(**marker))
        .count()
}

/// Classify content tone from marker presence. Both comparisons are
/// strictly greater-than: ties at any count, including zero-zero, are
/// `steady`. That tie-break is load-bearing; do not relax it to `>=`.
pub fn derive_tone(content: &str) -> Tone {
    let lowered = content.to_lowercase();
    let positive = distinct_marker_count(&lowered, &POSITIVE_MARKERS);
    let negative = distinct_marker_count(&lowered, &NEGATIVE_MARKERS);

    if positive > negative && positive > 0 {
        Tone::Upbeat
    } else if negative > positive && negative > 0 {
        Tone::Stressed
    } else {
        Tone::Steady
    }
}

fn compose_reflection(goal: &str, summary: &str, tone: Tone) -> String {
    let mut reflection = format!("You captured: {summary}");
    if !goal.is_empty() {
        reflection.push_str(&format!(
            "\n\nYou set the goal \"{goal}\". Take a moment to notice how what you wrote relates to it."
        ));
    }
    reflection.push_str(&format!("\n\nOverall the tone feels {tone}."));
    reflection.trim_end().to_string()
}

fn build_action(goal: &str, tone: Tone) -> String {
    if !goal.is_empty() {
        return "Choose one concrete step toward the goal and take it within the next 24 hours."
            .to_string();
    }
    match tone {
        Tone::Upbeat => {
            "Capture what energized you today and schedule more of it this week.".to_string()
        }
        Tone::Stressed => {
            "Try one small restorative action, like a short walk, a real break, or a conversation with someone supportive."
                .to_string()
        }
        Tone::Steady => {
            "Note one takeaway from today and plan a follow-up before your next session."
                .to_string()
        }
    }
}

/// Generate the reflection/action pair. Pure; `goal` is expected trimmed
/// and `content` non-empty after trimming (enforced upstream).
pub fn generate(goal: &str, content: &str) -> ReflectionResult {
    let summary = summarize(content);
    let tone = derive_tone(content);
    ReflectionResult {
        reflection: compose_reflection(goal, &summary, tone),
        action: Some(build_action(goal, tone)),
    }
}

/// The dependency-free fallback strategy. Always yields a result.
pub struct HeuristicStrategy;

#[async_trait]
impl ReflectionStrategy for HeuristicStrategy {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    async fn try_generate(&self, goal: &str, content: &str) -> Option<ReflectionResult> {
        Some(generate(goal, content))
    }
}

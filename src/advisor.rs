use crate::pipeline::Analysis;

const IMPROVE_KEYWORDS: &[&str] = &["naik", "meningkat", "cara", "improve", "raise"];
const HONORS_KEYWORDS: &[&str] = &["cumlaude", "target"];
const STRATEGY_KEYWORDS: &[&str] = &["strategi", "semester depan", "strategy", "next semester"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Topic {
    Empty,
    Improve,
    Honors,
    Strategy,
    Unknown,
}

pub fn classify_question(question: &str) -> Topic {
    let question = question.trim().to_lowercase();
    let mentions = |keywords: &[&str]| keywords.iter().any(|keyword| question.contains(keyword));

    if question.is_empty() {
        Topic::Empty
    } else if mentions(IMPROVE_KEYWORDS) {
        Topic::Improve
    } else if mentions(HONORS_KEYWORDS) {
        Topic::Honors
    } else if mentions(STRATEGY_KEYWORDS) {
        Topic::Strategy
    } else {
        Topic::Unknown
    }
}

/// Canned, rule-based answer to a free-text question about the history.
pub fn answer(question: &str, analysis: &Analysis) -> String {
    match classify_question(question) {
        Topic::Empty => "Write a question first.".to_string(),
        Topic::Improve => format!(
            "General advice:\n\
             - Review the material that keeps showing up in exams first.\n\
             - Focus on high-SKS courses; a small gain there moves the IPK the most.\n\
             - With a recent average IPS of {:.2}, a realistic gain is about 0.10-0.25 per semester.\n\
             - Study actively: weekly summaries, ask the teaching assistants, keep a study group schedule.",
            analysis.recent_average
        ),
        Topic::Honors => match analysis.outcome.required.value() {
            Some(required) if !analysis.outcome.required.exceeds_max() => format!(
                "For Cumlaude (target {:.2}) you need an average IPS of about {:.2} over the {} remaining semesters. If that is above 3.8, focus on high-SKS courses and stay consistent.",
                analysis.classification.target,
                required,
                analysis.remaining_semesters
            ),
            _ => format!(
                "With {} semesters left, Cumlaude is not realistic (it needs an IPS above 4.00). Consider extending your studies so the credit load per semester drops.",
                analysis.remaining_semesters
            ),
        },
        Topic::Strategy => "Strategy for next semester:\n\
             - Pick a realistic SKS combination; do not overload.\n\
             - Prioritize A/B+ grades in high-credit courses.\n\
             - Split the week evenly between assignments and review.\n\
             - Use active notes (flashcards) and practice on past exams."
            .to_string(),
        Topic::Unknown => "Sorry, I did not understand. Try asking: \"how to raise my IPS\", \"strategy for next semester\" or \"what IPS do I need for cumlaude\".".to_string(),
    }
}

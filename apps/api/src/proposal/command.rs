//! `/proposal` slash-command text parsing.
//!
//! Grammar: `name [technology] tone job description...`. The second token is taken
//! as the technology only when it is a known category; otherwise the technology is
//! left for the analyzer to infer and the second token is the tone.

use crate::proposal::pipeline::GenerationRequest;
use crate::proposal::technology::TechnologyCategory;

pub const USAGE: &str = "invalid format use /proposal name [tech] tone job";

/// Parses command text into a request, or `None` when required parts are missing.
///
/// Everything after the tone is the job description, kept as typed apart from
/// surrounding whitespace so line breaks and lists reach the analyzer.
pub fn parse_command(text: &str) -> Option<GenerationRequest> {
    let (name, rest) = next_token(text)?;
    let (second, rest) = next_token(rest)?;

    let (technology, tone, rest) = match TechnologyCategory::parse(second) {
        Some(_) => {
            let (tone, rest) = next_token(rest)?;
            (Some(second), tone, rest)
        }
        None => (None, second, rest),
    };

    let job_description = rest.trim();
    if job_description.is_empty() {
        return None;
    }

    Some(GenerationRequest::new(
        name,
        technology,
        tone,
        job_description,
        None,
    ))
}

/// Splits off the first whitespace-delimited token, returning it and the untouched rest.
fn next_token(text: &str) -> Option<(&str, &str)> {
    let text = text.trim_start();
    if text.is_empty() {
        return None;
    }
    let end = text.find(char::is_whitespace).unwrap_or(text.len());
    Some(text.split_at(end))
}

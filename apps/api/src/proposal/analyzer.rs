//! Job Analyzer: asks the model for a structured reading of the job post and
//! parses the reply defensively.
//!
//! Parsing has exactly two paths: strict JSON decode, else a keyword scan over the
//! raw reply. A malformed reply degrades the analysis; it never fails the request.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::llm_client::{strip_json_fences, GenerationParams, LlmError, TextGenerator};
use crate::proposal::prompts::{ANALYSIS_PROMPT_TEMPLATE, ANALYSIS_SYSTEM};
use crate::proposal::technology::TechnologyCategory;

pub const ANALYSIS_PARAMS: GenerationParams = GenerationParams {
    max_output_tokens: 400,
    temperature: 0.3,
    json_output: true,
    system: Some(ANALYSIS_SYSTEM),
};

/// Structured reading of a job description.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobAnalysis {
    pub summary: String,
    pub detected_technology: Option<TechnologyCategory>,
    /// Deduplicated case-insensitively; first spelling and order are kept.
    pub tech_stack: Vec<String>,
}

/// Result of parsing the model's reply.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    /// The reply was a JSON object.
    Parsed(JobAnalysis),
    /// The reply was not JSON; fields come from a keyword scan.
    Degraded(JobAnalysis),
}

impl AnalysisOutcome {
    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisOutcome::Degraded(_))
    }

    pub fn analysis(&self) -> &JobAnalysis {
        match self {
            AnalysisOutcome::Parsed(a) | AnalysisOutcome::Degraded(a) => a,
        }
    }

    pub fn into_analysis(self) -> JobAnalysis {
        match self {
            AnalysisOutcome::Parsed(a) | AnalysisOutcome::Degraded(a) => a,
        }
    }
}

/// Sends the job description to the backend and parses the reply.
/// Only a backend failure is an error.
pub async fn analyze(
    job_description: &str,
    generator: &dyn TextGenerator,
) -> Result<AnalysisOutcome, LlmError> {
    let prompt = ANALYSIS_PROMPT_TEMPLATE.replace("{job_description}", job_description);
    let reply = generator.generate(&prompt, &ANALYSIS_PARAMS).await?;

    let outcome = parse_analysis(&reply);
    let analysis = outcome.analysis();
    if outcome.is_degraded() {
        warn!(
            detected = ?analysis.detected_technology,
            "job analysis reply was not JSON, fell back to keyword scan"
        );
    } else {
        info!(
            detected = ?analysis.detected_technology,
            stack_len = analysis.tech_stack.len(),
            "job analysis parsed"
        );
    }
    Ok(outcome)
}

/// Parses a raw model reply into an `AnalysisOutcome`.
pub fn parse_analysis(raw: &str) -> AnalysisOutcome {
    let body = strip_json_fences(raw);
    match serde_json::from_str::<Map<String, Value>>(body) {
        Ok(object) => AnalysisOutcome::Parsed(from_json_object(&object, raw)),
        Err(_) => AnalysisOutcome::Degraded(JobAnalysis {
            summary: raw.trim().to_string(),
            detected_technology: scan_keywords(raw),
            tech_stack: Vec::new(),
        }),
    }
}

fn from_json_object(object: &Map<String, Value>, raw: &str) -> JobAnalysis {
    let summary = object
        .get("analysis")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| raw.trim().to_string());

    let detected_technology = object
        .get("detectedTechnology")
        .and_then(Value::as_str)
        .and_then(TechnologyCategory::parse);

    let tech_stack = object
        .get("techStack")
        .and_then(Value::as_array)
        .map(|items| dedup_stack(items.iter().filter_map(Value::as_str)))
        .unwrap_or_default();

    JobAnalysis {
        summary,
        detected_technology,
        tech_stack,
    }
}

/// Trims, drops empties and removes case-insensitive repeats, keeping first order.
pub fn dedup_stack<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut stack: Vec<String> = Vec::new();
    for item in items.into_iter().map(str::trim).filter(|s| !s.is_empty()) {
        if !stack.iter().any(|seen| seen.eq_ignore_ascii_case(item)) {
            stack.push(item.to_string());
        }
    }
    stack
}

fn word_pattern(alternatives: &str) -> Regex {
    Regex::new(&format!(r"\b(?:{alternatives})\b")).expect("keyword pattern is valid")
}

static AI_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    word_pattern(
        r"ai|artificial intelligence|ml|machine learning|deep learning|llms?|gpt(?:-?\d+)?|chatgpt|openai|langchain|nlp|chatbots?|rag",
    )
});
static PYTHON_TERMS: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(r"python|django|flask|fastapi|pandas"));
static REACT_TERMS: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(r"react|reactjs|react\.js|next\.js|nextjs"));
static VUE_TERMS: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(r"vue|vuejs|vue\.js|nuxt|nuxtjs|nuxt\.js"));
static SHOPIFY_TERMS: LazyLock<Regex> = LazyLock::new(|| word_pattern(r"shopify"));
static FRONTEND_TERMS: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(r"frontend|front-end|front end"));
static BACKEND_TERMS: LazyLock<Regex> =
    LazyLock::new(|| word_pattern(r"backend|back-end|back end"));
static DEVOPS_TERMS: LazyLock<Regex> = LazyLock::new(|| {
    word_pattern(r"devops|dev ops|kubernetes|k8s|docker|terraform|ci/cd|ansible|aws|azure|gcp")
});

/// Fixed-priority keyword scan; first match wins.
pub fn scan_keywords(text: &str) -> Option<TechnologyCategory> {
    let text = text.to_lowercase();
    let frontend = FRONTEND_TERMS.is_match(&text);
    let backend = BACKEND_TERMS.is_match(&text);

    if AI_TERMS.is_match(&text) {
        Some(TechnologyCategory::Ai)
    } else if PYTHON_TERMS.is_match(&text) {
        Some(TechnologyCategory::Python)
    } else if REACT_TERMS.is_match(&text) {
        Some(TechnologyCategory::React)
    } else if VUE_TERMS.is_match(&text) {
        Some(TechnologyCategory::Vue)
    } else if SHOPIFY_TERMS.is_match(&text) {
        Some(TechnologyCategory::Shopify)
    } else if frontend && backend {
        Some(TechnologyCategory::Fullstack)
    } else if frontend {
        Some(TechnologyCategory::Frontend)
    } else if backend {
        Some(TechnologyCategory::Backend)
    } else if DEVOPS_TERMS.is_match(&text) {
        Some(TechnologyCategory::Devops)
    } else {
        None
    }
}

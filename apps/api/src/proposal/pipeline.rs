//! Proposal pipeline: runs once per caller request.
//!
//! Flow: normalize → analyze job → resolve technology → look up assets → compose.
//!
//! The two backend calls are strictly sequential. A backend failure in either one
//! fails the whole run; there is no partially composed result.

use tracing::info;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::proposal::analyzer::analyze;
use crate::proposal::assets::AssetCatalog;
use crate::proposal::composer::compose;
use crate::proposal::normalize::{normalize_name, normalize_technology, normalize_tone};
use crate::proposal::technology::{resolve, TechnologyCategory, TechnologySource};

/// Normalized caller input. Built once, consumed by one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub person_name: String,
    pub requested_technology: Option<String>,
    pub tone: String,
    pub job_description: String,
    pub client_name: Option<String>,
}

impl GenerationRequest {
    /// Normalizes raw caller input. Front ends reject blank required fields
    /// before getting here.
    pub fn new(
        person_name: &str,
        requested_technology: Option<&str>,
        tone: &str,
        job_description: &str,
        client_name: Option<&str>,
    ) -> Self {
        Self {
            person_name: normalize_name(Some(person_name)).unwrap_or_default(),
            requested_technology: normalize_technology(requested_technology),
            tone: normalize_tone(Some(tone)).unwrap_or_default(),
            job_description: job_description.trim().to_string(),
            client_name: client_name
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(str::to_string),
        }
    }
}

/// Everything one pipeline run produced.
#[derive(Debug, Clone)]
pub struct Proposal {
    pub text: String,
    pub technology: TechnologyCategory,
    pub technology_source: TechnologySource,
    pub tech_stack: Vec<String>,
    pub analysis_summary: String,
    pub analysis_degraded: bool,
}

/// Runs the full pipeline for one request.
pub async fn generate_proposal(
    generator: &dyn TextGenerator,
    catalog: &AssetCatalog,
    request: GenerationRequest,
) -> Result<Proposal, AppError> {
    info!(
        "Analyzing job for {} (requested technology: {:?})",
        request.person_name, request.requested_technology
    );
    let outcome = analyze(&request.job_description, generator)
        .await
        .map_err(|e| AppError::Llm(format!("Job analysis failed: {e}")))?;
    let analysis_degraded = outcome.is_degraded();
    let analysis = outcome.into_analysis();

    let (technology, technology_source) = resolve(
        request.requested_technology.as_deref(),
        analysis.detected_technology,
    );

    let assets = catalog.lookup(technology, &request.person_name);

    let text = compose(&request, technology, &analysis, &assets, generator)
        .await
        .map_err(|e| AppError::Llm(format!("Proposal generation failed: {e}")))?;

    info!(
        "Generated {} proposal for {} ({} chars, technology from {:?})",
        technology,
        request.person_name,
        text.len(),
        technology_source
    );

    Ok(Proposal {
        text,
        technology,
        technology_source,
        tech_stack: analysis.tech_stack,
        analysis_summary: analysis.summary,
        analysis_degraded,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::proposal::analyzer::ANALYSIS_PARAMS;
    use crate::proposal::assets::NO_PORTFOLIO;
    use crate::proposal::composer::PROPOSAL_PARAMS;

    fn catalog() -> AssetCatalog {
        AssetCatalog::load(None).unwrap()
    }

    #[test]
    fn test_request_normalizes_fields() {
        let request = GenerationRequest::new(
            "  mARIA ",
            Some("DEVOPS"),
            "Friendly",
            "  Need CI  ",
            Some("   "),
        );
        assert_eq!(request.person_name, "Maria");
        assert_eq!(request.requested_technology.as_deref(), Some("Devops"));
        assert_eq!(request.tone, "friendly");
        assert_eq!(request.job_description, "Need CI");
        assert_eq!(request.client_name, None);
    }

    #[tokio::test]
    async fn test_explicit_react_request_end_to_end() {
        let generator = ScriptedGenerator::new()
            .reply(r#"{"analysis":"dashboard with charts","detectedTechnology":"React","techStack":["React","Chart.js"]}"#)
            .reply("hey there\n\ni am Maria and i build react dashboards\n\nbest regards\nMaria");

        let request = GenerationRequest::new(
            "maria",
            Some("react"),
            "friendly",
            "Need a React dashboard with charts",
            None,
        );
        let proposal = generate_proposal(&generator, &catalog(), request)
            .await
            .unwrap();

        assert_eq!(proposal.technology, TechnologyCategory::React);
        assert_eq!(proposal.technology_source, TechnologySource::User);
        assert!(!proposal.text.is_empty());
        assert!(proposal.text.contains("Maria"));
        assert_eq!(proposal.tech_stack, vec!["React", "Chart.js"]);

        let calls = generator.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].1, ANALYSIS_PARAMS);
        assert_eq!(calls[1].1, PROPOSAL_PARAMS);

        let compose_prompt = &calls[1].0;
        assert!(compose_prompt.contains("greeting line: hey there"));
        assert!(compose_prompt.contains("https://github.com/maria-dev/fleet-dashboard"));
        assert!(!compose_prompt.contains(NO_PORTFOLIO));
    }

    #[tokio::test]
    async fn test_absent_technology_is_inferred_from_the_job() {
        let generator = ScriptedGenerator::new()
            .reply(r#"{"analysis":"train and serve a churn model","detectedTechnology":"AI","techStack":["Python","PyTorch","LLM"]}"#)
            .reply("hey there\n\nbest regards\nDaniel");

        let request = GenerationRequest::new(
            "daniel",
            None,
            "confident",
            "Python ML engineer needed to fine-tune an LLM and build a churn prediction model",
            None,
        );
        let proposal = generate_proposal(&generator, &catalog(), request)
            .await
            .unwrap();

        assert_eq!(proposal.technology, TechnologyCategory::Ai);
        assert_eq!(proposal.technology_source, TechnologySource::Detected);
        assert!(generator.calls()[1].0.contains("focused on AI"));
    }

    #[tokio::test]
    async fn test_malformed_analysis_still_produces_a_proposal() {
        let generator = ScriptedGenerator::new()
            .reply("this one is mostly a shopify theme job with some liquid edits")
            .reply("hey there\n\nbest regards\nDaniel");

        let request = GenerationRequest::new("daniel", None, "casual", "Shopify theme tweaks", None);
        let proposal = generate_proposal(&generator, &catalog(), request)
            .await
            .unwrap();

        assert!(proposal.analysis_degraded);
        assert_eq!(proposal.technology, TechnologyCategory::Shopify);
        assert!(proposal.tech_stack.is_empty());
    }

    #[tokio::test]
    async fn test_no_signal_falls_back_to_fullstack() {
        let generator = ScriptedGenerator::new()
            .reply(r#"{"analysis":"vague request","detectedTechnology":null,"techStack":[]}"#)
            .reply("hey there");

        let request = GenerationRequest::new("unknown", Some("cobol"), "plain", "help me", None);
        let proposal = generate_proposal(&generator, &catalog(), request)
            .await
            .unwrap();

        assert_eq!(proposal.technology, TechnologyCategory::Fullstack);
        assert_eq!(proposal.technology_source, TechnologySource::Fallback);
        // Unknown person: both assets fall back
        assert!(generator.calls()[1].0.contains(NO_PORTFOLIO));
    }

    #[tokio::test]
    async fn test_analysis_failure_fails_the_pipeline() {
        let generator = ScriptedGenerator::new()
            .fail(503)
            .reply("never used");

        let request = GenerationRequest::new("maria", Some("react"), "friendly", "anything", None);
        let result = generate_proposal(&generator, &catalog(), request).await;

        assert!(matches!(result, Err(AppError::Llm(_))));
        assert_eq!(generator.calls().len(), 1, "composer must not run");
    }

    #[tokio::test]
    async fn test_composition_failure_fails_the_pipeline() {
        let generator = ScriptedGenerator::new()
            .reply(r#"{"analysis":"a","detectedTechnology":"Vue","techStack":[]}"#)
            .fail(500);

        let request = GenerationRequest::new("maria", None, "friendly", "Vue app", None);
        let result = generate_proposal(&generator, &catalog(), request).await;

        assert!(matches!(result, Err(AppError::Llm(_))));
        assert_eq!(generator.calls().len(), 2);
    }
}

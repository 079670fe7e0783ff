//! Proposal Composer: fills the proposal template with every resolved field and
//! makes the single writing call. The model's reply is returned verbatim.

use crate::llm_client::prompts::render;
use crate::llm_client::{GenerationParams, LlmError, TextGenerator};
use crate::proposal::analyzer::{dedup_stack, JobAnalysis};
use crate::proposal::assets::{extract_link, AssetBundle};
use crate::proposal::pipeline::GenerationRequest;
use crate::proposal::prompts::{PROPOSAL_PROMPT_TEMPLATE, PROPOSAL_SYSTEM};
use crate::proposal::technology::TechnologyCategory;

pub const PROPOSAL_PARAMS: GenerationParams = GenerationParams {
    max_output_tokens: 600,
    temperature: 0.8,
    json_output: false,
    system: Some(PROPOSAL_SYSTEM),
};

/// Separator for the tech-stack list. The proposal must not contain commas.
const STACK_SEPARATOR: &str = " / ";

/// `"hey {client}"` when a non-blank client name is known, else `"hey there"`.
pub fn greeting(client_name: Option<&str>) -> String {
    match client_name.map(str::trim).filter(|c| !c.is_empty()) {
        Some(client) => format!("hey {client}"),
        None => "hey there".to_string(),
    }
}

/// Builds the fully resolved proposal prompt.
pub fn build_proposal_prompt(
    request: &GenerationRequest,
    technology: TechnologyCategory,
    analysis: &JobAnalysis,
    assets: &AssetBundle,
) -> String {
    let stack = dedup_stack(analysis.tech_stack.iter().map(String::as_str));
    let tech_stack = if stack.is_empty() {
        technology.as_str().to_string()
    } else {
        stack.join(STACK_SEPARATOR)
    };

    let client_greeting = greeting(request.client_name.as_deref());
    let portfolio_link = extract_link(&assets.portfolio_text);

    render(
        PROPOSAL_PROMPT_TEMPLATE,
        &[
            ("name", request.person_name.as_str()),
            ("technology", technology.as_str()),
            ("tech_stack", tech_stack.as_str()),
            ("tone", request.tone.as_str()),
            ("job_description", request.job_description.as_str()),
            ("analysis", analysis.summary.as_str()),
            ("greeting", client_greeting.as_str()),
            ("reference_link", assets.reference_link.as_str()),
            ("portfolio_text", assets.portfolio_text.as_str()),
            ("portfolio_link", portfolio_link.as_str()),
        ],
    )
}

/// Composes the prompt and asks the backend for the proposal text.
pub async fn compose(
    request: &GenerationRequest,
    technology: TechnologyCategory,
    analysis: &JobAnalysis,
    assets: &AssetBundle,
    generator: &dyn TextGenerator,
) -> Result<String, LlmError> {
    let prompt = build_proposal_prompt(request, technology, analysis, assets);
    generator.generate(&prompt, &PROPOSAL_PARAMS).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::testing::ScriptedGenerator;
    use crate::proposal::assets::{NO_PORTFOLIO, PLACEHOLDER_LINK};

    fn request(client_name: Option<&str>) -> GenerationRequest {
        GenerationRequest::new(
            "maria",
            Some("react"),
            "Friendly",
            "Need a React dashboard with charts",
            client_name,
        )
    }

    fn analysis() -> JobAnalysis {
        JobAnalysis {
            summary: "client needs live charts for fleet data".to_string(),
            detected_technology: Some(TechnologyCategory::React),
            tech_stack: vec!["React".to_string(), "Recharts".to_string(), "react".to_string()],
        }
    }

    fn assets() -> AssetBundle {
        AssetBundle {
            portfolio_text: "fleet dashboard https://maria.dev/fleet".to_string(),
            reference_link: "https://github.com/maria/fleet".to_string(),
        }
    }

    #[test]
    fn test_greeting_uses_trimmed_client_name() {
        assert_eq!(greeting(Some("  Acme Co ")), "hey Acme Co");
        assert_eq!(greeting(Some("   ")), "hey there");
        assert_eq!(greeting(None), "hey there");
    }

    #[test]
    fn test_prompt_contains_every_resolved_field() {
        let prompt = build_proposal_prompt(
            &request(None),
            TechnologyCategory::React,
            &analysis(),
            &assets(),
        );

        assert!(prompt.contains("as Maria, a developer focused on React"));
        assert!(prompt.contains("keep Maria exactly as written"));
        assert!(prompt.contains("best regards\nMaria"));
        assert!(prompt.contains("TONE: friendly"));
        assert!(prompt.contains("client needs live charts for fleet data"));
        assert!(prompt.contains("Need a React dashboard with charts"));
        assert!(prompt.contains("greeting line: hey there"));
        assert!(prompt.contains("https://github.com/maria/fleet"));
        assert!(prompt.contains("fleet dashboard https://maria.dev/fleet"));
        assert!(prompt.contains("you can check my portfolio here https://maria.dev/fleet"));
        assert!(!prompt.contains('{'), "unfilled placeholder left in prompt");
    }

    #[test]
    fn test_tech_stack_is_deduplicated_without_commas() {
        let prompt = build_proposal_prompt(
            &request(None),
            TechnologyCategory::React,
            &analysis(),
            &assets(),
        );
        assert!(prompt.contains("TECH STACK FROM THE JOB: React / Recharts\n"));
    }

    #[test]
    fn test_empty_stack_falls_back_to_technology_label() {
        let mut analysis = analysis();
        analysis.tech_stack.clear();
        let prompt = build_proposal_prompt(
            &request(None),
            TechnologyCategory::Vue,
            &analysis,
            &assets(),
        );
        assert!(prompt.contains("TECH STACK FROM THE JOB: Vue\n"));
    }

    #[test]
    fn test_client_name_changes_greeting() {
        let prompt = build_proposal_prompt(
            &request(Some("Jordan")),
            TechnologyCategory::React,
            &analysis(),
            &assets(),
        );
        assert!(prompt.contains("greeting line: hey Jordan"));
    }

    #[test]
    fn test_braces_in_job_text_are_not_substituted() {
        let request = GenerationRequest::new(
            "maria",
            None,
            "direct",
            "template engine that renders {name} and {tone}",
            None,
        );
        let prompt = build_proposal_prompt(
            &request,
            TechnologyCategory::Backend,
            &analysis(),
            &assets(),
        );
        assert!(prompt.contains("template engine that renders {name} and {tone}"));
    }

    #[test]
    fn test_missing_assets_use_fallbacks() {
        let missing = AssetBundle {
            portfolio_text: NO_PORTFOLIO.to_string(),
            reference_link: NO_PORTFOLIO.to_string(),
        };
        let prompt = build_proposal_prompt(
            &request(None),
            TechnologyCategory::React,
            &analysis(),
            &missing,
        );
        assert!(prompt.contains(&format!("portfolio here {PLACEHOLDER_LINK}")));
        assert!(prompt.contains(&format!(
            "reference this link exactly once (skip the link if the text says no portfolio is available): {NO_PORTFOLIO}"
        )));
    }

    #[tokio::test]
    async fn test_compose_returns_reply_verbatim() {
        let reply = "hey there\n\ni am Maria...\n\nbest regards\nMaria";
        let generator = ScriptedGenerator::new().reply(reply);

        let text = compose(
            &request(None),
            TechnologyCategory::React,
            &analysis(),
            &assets(),
            &generator,
        )
        .await
        .unwrap();

        assert_eq!(text, reply);
        let calls = generator.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, PROPOSAL_PARAMS);
        assert!(!calls[0].1.json_output);
    }
}

//! Axum route handlers for the proposal API and the Slack slash command.

use std::future::Future;

use axum::{extract::State, Form, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::proposal::analyzer::{analyze, JobAnalysis};
use crate::proposal::command::{parse_command, USAGE};
use crate::proposal::pipeline::{generate_proposal, GenerationRequest, Proposal};
use crate::proposal::technology::{TechnologyCategory, TechnologySource};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Every field is optional here so that missing fields become a 400 with a
/// readable message instead of a JSON rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalRequest {
    pub name: Option<String>,
    pub technology: Option<String>,
    pub tone: Option<String>,
    pub job_description: Option<String>,
    pub client_name: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalResponse {
    pub success: bool,
    pub request_id: Uuid,
    pub proposal: String,
    pub technology: TechnologyCategory,
    pub technology_source: TechnologySource,
    pub tech_stack: Vec<String>,
    pub analysis_summary: String,
    pub analysis_degraded: bool,
    pub generated_at: DateTime<Utc>,
}

impl ProposalResponse {
    fn new(request_id: Uuid, proposal: Proposal) -> Self {
        Self {
            success: true,
            request_id,
            proposal: proposal.text,
            technology: proposal.technology,
            technology_source: proposal.technology_source,
            tech_stack: proposal.tech_stack,
            analysis_summary: proposal.analysis_summary,
            analysis_degraded: proposal.analysis_degraded,
            generated_at: Utc::now(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub job_description: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub success: bool,
    pub analysis: JobAnalysis,
    pub degraded: bool,
}

/// Slack slash-command payload (form encoded). Only the fields we use.
#[derive(Debug, Deserialize)]
pub struct SlashCommand {
    #[serde(default)]
    pub command: String,
    #[serde(default)]
    pub text: String,
    pub user_name: Option<String>,
    /// Where the deferred reply is posted once the pipeline finishes.
    pub response_url: Option<String>,
}

/// Sent as the immediate acknowledgement; the proposal follows via `response_url`.
pub const SLASH_ACK: &str = "working on your proposal";

/// Sent instead of a proposal when the pipeline fails or times out.
pub const SLASH_FAILURE: &str = "something went wrong";

#[derive(Debug, Serialize)]
pub struct SlackReply {
    pub response_type: &'static str,
    pub text: String,
}

impl SlackReply {
    fn ephemeral(text: impl Into<String>) -> Self {
        Self {
            response_type: "ephemeral",
            text: text.into(),
        }
    }

    fn in_channel(text: String) -> Self {
        Self {
            response_type: "in_channel",
            text,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/proposals (alias: POST /api/proposal)
///
/// Runs the full pipeline: analyze → resolve technology → assets → compose.
pub async fn handle_generate_proposal(
    State(state): State<AppState>,
    Json(body): Json<ProposalRequest>,
) -> Result<Json<ProposalResponse>, AppError> {
    let name = required(body.name.as_deref(), "name")?;
    let technology = required(body.technology.as_deref(), "technology")?;
    let tone = required(body.tone.as_deref(), "tone")?;
    let job_description = required(body.job_description.as_deref(), "jobDescription")?;

    let request = GenerationRequest::new(
        name,
        Some(technology),
        tone,
        job_description,
        body.client_name.as_deref(),
    );

    let request_id = Uuid::new_v4();
    info!(%request_id, "proposal requested over HTTP");

    let proposal = with_timeout(
        &state,
        generate_proposal(state.generator.as_ref(), &state.catalog, request),
    )
    .await?;

    Ok(Json(ProposalResponse::new(request_id, proposal)))
}

/// POST /api/v1/proposals/analyze
///
/// Runs only the job analyzer. Useful for previewing what technology will be inferred.
pub async fn handle_analyze_job(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let job_description = required(body.job_description.as_deref(), "jobDescription")?;

    let outcome = with_timeout(&state, async {
        analyze(job_description, state.generator.as_ref())
            .await
            .map_err(|e| AppError::Llm(format!("Job analysis failed: {e}")))
    })
    .await?;

    Ok(Json(AnalyzeResponse {
        success: true,
        degraded: outcome.is_degraded(),
        analysis: outcome.into_analysis(),
    }))
}

/// POST /slack/commands
///
/// Slack gives a slash command three seconds to answer, so this only parses the
/// text and acknowledges. The pipeline runs on a spawned task and its outcome is
/// posted to the command's `response_url`.
pub async fn handle_slash_command(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> Json<SlackReply> {
    let Some(request) = parse_command(&command.text) else {
        return Json(SlackReply::ephemeral(USAGE));
    };

    let Some(response_url) = command.response_url.filter(|url| !url.trim().is_empty()) else {
        warn!(command = %command.command, "slash command arrived without a response_url");
        return Json(SlackReply::ephemeral(SLASH_FAILURE));
    };

    info!(
        command = %command.command,
        user = command.user_name.as_deref().unwrap_or("unknown"),
        "proposal requested over slash command"
    );

    tokio::spawn(run_slash_command(state, request, response_url));

    Json(SlackReply::ephemeral(SLASH_ACK))
}

/// Runs the pipeline for a slash command and delivers the deferred reply.
async fn run_slash_command(state: AppState, request: GenerationRequest, response_url: String) {
    let result = with_timeout(
        &state,
        generate_proposal(state.generator.as_ref(), &state.catalog, request),
    )
    .await;

    let reply = match result {
        Ok(proposal) => SlackReply::in_channel(proposal.text),
        Err(e) => {
            error!("Slash command failed: {e}");
            SlackReply::ephemeral(SLASH_FAILURE)
        }
    };

    if let Err(e) = post_reply(&state.http, &response_url, &reply).await {
        error!("Failed to deliver slash command reply: {e}");
    }
}

async fn post_reply(
    client: &reqwest::Client,
    response_url: &str,
    reply: &SlackReply,
) -> Result<(), reqwest::Error> {
    client
        .post(response_url)
        .json(reply)
        .send()
        .await?
        .error_for_status()?;
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, AppError> {
    value
        .filter(|v| !v.trim().is_empty())
        .ok_or_else(|| AppError::Validation(format!("{field} is required")))
}

/// Bounds a whole pipeline run by the configured timeout.
async fn with_timeout<T>(
    state: &AppState,
    run: impl Future<Output = Result<T, AppError>>,
) -> Result<T, AppError> {
    let limit = state.config.pipeline_timeout;
    tokio::time::timeout(limit, run)
        .await
        .map_err(|_| AppError::Timeout(limit.as_secs()))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_rejects_missing_and_blank() {
        assert!(matches!(
            required(None, "name"),
            Err(AppError::Validation(msg)) if msg == "name is required"
        ));
        assert!(required(Some("  "), "tone").is_err());
        assert_eq!(required(Some("maria"), "name").unwrap(), "maria");
    }

    #[test]
    fn test_proposal_request_accepts_camel_case() {
        let body: ProposalRequest = serde_json::from_value(serde_json::json!({
            "name": "maria",
            "technology": "react",
            "tone": "friendly",
            "jobDescription": "Need a dashboard",
            "clientName": "Jordan"
        }))
        .unwrap();
        assert_eq!(body.job_description.as_deref(), Some("Need a dashboard"));
        assert_eq!(body.client_name.as_deref(), Some("Jordan"));
    }

    #[test]
    fn test_slack_reply_shapes() {
        let reply = serde_json::to_value(SlackReply::ephemeral(USAGE)).unwrap();
        assert_eq!(reply["response_type"], "ephemeral");
        assert_eq!(reply["text"], USAGE);
    }
}

//! Two-stage analysis pipeline: verify the report, then answer the query.
//!
//! The sequencing contract: Analysis runs only after Verification succeeds,
//! the verification summary is passed verbatim into the analysis prompt,
//! and any collaborator failure aborts the run at its step boundary —
//! no retries, no downgrades to warnings.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;

use super::agents::{DOCTOR, VERIFIER};
use super::enrichment::advisory_sections;
use super::prompt::{build_analysis_prompt, build_verification_prompt};
use crate::document::ReportExtractor;
use crate::llm::ReasoningService;

/// One inbound analysis request. Immutable once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    query: String,
    document: PathBuf,
}

impl AnalysisRequest {
    /// Build a request, substituting `default_query` when the caller's
    /// query is empty or whitespace-only.
    pub fn new(query: &str, document: PathBuf, default_query: &str) -> Self {
        let trimmed = query.trim();
        let query = if trimmed.is_empty() { default_query } else { trimmed };
        Self {
            query: query.to_string(),
            document,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn document(&self) -> &Path {
        &self.document
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StepName {
    Verification,
    Analysis,
}

impl StepName {
    pub fn as_str(self) -> &'static str {
        match self {
            StepName::Verification => "verification",
            StepName::Analysis => "analysis",
        }
    }
}

impl std::fmt::Display for StepName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Output record of one pipeline stage. Constructed once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    pub step: StepName,
    pub output_text: String,
    pub succeeded: bool,
    pub error_detail: Option<String>,
}

impl StepResult {
    fn completed(step: StepName, output_text: String) -> Self {
        Self {
            step,
            output_text,
            succeeded: true,
            error_detail: None,
        }
    }
}

/// The only externally observable result of a pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineOutcome {
    pub succeeded: bool,
    pub final_text: Option<String>,
    pub failed_step: Option<StepName>,
    pub error_detail: Option<String>,
}

impl PipelineOutcome {
    fn completed(analysis: StepResult) -> Self {
        Self {
            succeeded: true,
            final_text: Some(analysis.output_text),
            failed_step: None,
            error_detail: None,
        }
    }

    fn step_failed(step: StepName, detail: impl std::fmt::Display) -> Self {
        let detail = detail.to_string();
        tracing::warn!(step = step.as_str(), error = %detail, "pipeline step failed");
        Self {
            succeeded: false,
            final_text: None,
            failed_step: Some(step),
            error_detail: Some(detail),
        }
    }
}

/// Strict two-stage executor. One in-flight collaborator call at a time;
/// concurrent runs share nothing mutable.
pub struct AnalysisPipeline {
    reasoner: Arc<dyn ReasoningService>,
    extractor: Arc<dyn ReportExtractor>,
}

impl AnalysisPipeline {
    pub fn new(reasoner: Arc<dyn ReasoningService>, extractor: Arc<dyn ReportExtractor>) -> Self {
        Self { reasoner, extractor }
    }

    pub async fn run(&self, request: &AnalysisRequest) -> PipelineOutcome {
        tracing::info!(
            document = %request.document().display(),
            query = request.query(),
            "pipeline run started"
        );

        // Step 1 — verification. The document is resolved exactly once per
        // run; any failure here means the analysis step never executes.
        let report_text = match self.extractor.extract_text(request.document()) {
            Ok(text) => text,
            Err(e) => return PipelineOutcome::step_failed(StepName::Verification, e),
        };

        let verification = match self
            .reasoner
            .invoke(&VERIFIER, &build_verification_prompt(&report_text))
            .await
        {
            Ok(summary) => StepResult::completed(StepName::Verification, summary),
            Err(e) => return PipelineOutcome::step_failed(StepName::Verification, e),
        };
        tracing::debug!(
            step = verification.step.as_str(),
            chars = verification.output_text.len(),
            "step completed"
        );

        // Step 2 — analysis, grounded on the verification summary.
        let prompt =
            build_analysis_prompt(request.query(), &report_text, &verification.output_text);
        let analysis = match self.reasoner.invoke(&DOCTOR, &prompt).await {
            Ok(text) => {
                let advisory = advisory_sections(&report_text);
                let output = if advisory.is_empty() {
                    text
                } else {
                    format!("{text}{advisory}")
                };
                StepResult::completed(StepName::Analysis, output)
            }
            Err(e) => return PipelineOutcome::step_failed(StepName::Analysis, e),
        };

        tracing::info!(chars = analysis.output_text.len(), "pipeline run completed");
        PipelineOutcome::completed(analysis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_ANALYZE_QUERY;
    use crate::document::DocumentError;
    use crate::llm::{LlmError, ScriptedReasoner};

    /// Extractor that returns a fixed report text for any path.
    struct FixedExtractor(&'static str);

    impl ReportExtractor for FixedExtractor {
        fn extract_text(&self, _path: &Path) -> Result<String, DocumentError> {
            Ok(self.0.to_string())
        }
    }

    /// Extractor whose documents never resolve.
    struct MissingExtractor;

    impl ReportExtractor for MissingExtractor {
        fn extract_text(&self, path: &Path) -> Result<String, DocumentError> {
            Err(DocumentError::NotFound(path.to_path_buf()))
        }
    }

    const REPORT: &str = "Total Cholesterol 240 mg/dL (ref < 200)\nHDL 38 mg/dL";

    fn request(query: &str) -> AnalysisRequest {
        AnalysisRequest::new(query, PathBuf::from("/reports/r.pdf"), DEFAULT_ANALYZE_QUERY)
    }

    fn pipeline(
        reasoner: Arc<ScriptedReasoner>,
        extractor: Arc<dyn ReportExtractor>,
    ) -> AnalysisPipeline {
        AnalysisPipeline::new(reasoner, extractor)
    }

    #[tokio::test]
    async fn valid_document_produces_final_text() {
        // Scenario: cholesterol query against a resolvable report.
        let reasoner = Arc::new(ScriptedReasoner::with_responses(&[
            "Valid blood test report. Lipid panel present.",
            "Your total cholesterol of 240 mg/dL is above the reference range.",
        ]));
        let p = pipeline(reasoner.clone(), Arc::new(FixedExtractor(REPORT)));

        let outcome = p.run(&request("What does my cholesterol mean?")).await;

        assert!(outcome.succeeded);
        assert!(outcome.failed_step.is_none());
        let text = outcome.final_text.unwrap();
        assert!(text.contains("240 mg/dL is above"));
        assert_eq!(reasoner.call_count(), 2);
    }

    #[tokio::test]
    async fn verification_failure_skips_analysis() {
        let reasoner = Arc::new(ScriptedReasoner::new());
        reasoner.push_failure(LlmError::Api {
            status: 500,
            body: "model crashed".into(),
        });
        let p = pipeline(reasoner.clone(), Arc::new(FixedExtractor(REPORT)));

        let outcome = p.run(&request("anything")).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.failed_step, Some(StepName::Verification));
        assert_eq!(
            reasoner.call_count(),
            1,
            "analysis must never be invoked after verification fails"
        );
    }

    #[tokio::test]
    async fn unresolvable_document_fails_verification_without_any_reasoning_call() {
        let reasoner = Arc::new(ScriptedReasoner::new());
        let p = pipeline(reasoner.clone(), Arc::new(MissingExtractor));

        let outcome = p.run(&request("anything")).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.failed_step, Some(StepName::Verification));
        assert!(outcome.error_detail.unwrap().contains("document not found"));
        assert_eq!(reasoner.call_count(), 0);
    }

    #[tokio::test]
    async fn analysis_prompt_contains_verification_summary_verbatim() {
        let summary = "SUMMARY-7f3a: lipid panel confirmed, no quality issues";
        let reasoner = Arc::new(ScriptedReasoner::with_responses(&[summary, "analysis text"]));
        let p = pipeline(reasoner.clone(), Arc::new(FixedExtractor(REPORT)));

        p.run(&request("What does my cholesterol mean?")).await;

        let calls = reasoner.invocations();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[0].agent, "verifier");
        assert_eq!(calls[1].agent, "doctor");
        assert!(calls[1].prompt.contains(summary));
    }

    #[tokio::test]
    async fn quota_failure_on_analysis_discards_verification_output() {
        // Scenario: the reasoning service hits its quota on step 2.
        let reasoner = Arc::new(ScriptedReasoner::with_responses(&["verified fine"]));
        reasoner.push_failure(LlmError::Quota("monthly limit reached".into()));
        let p = pipeline(reasoner.clone(), Arc::new(FixedExtractor(REPORT)));

        let outcome = p.run(&request("anything")).await;

        assert!(!outcome.succeeded);
        assert_eq!(outcome.failed_step, Some(StepName::Analysis));
        assert!(
            outcome.final_text.is_none(),
            "step 1 output must not leak into a failed outcome"
        );
        assert!(outcome.error_detail.unwrap().contains("quota"));
    }

    #[tokio::test]
    async fn identical_requests_yield_identical_outcomes() {
        let script: &[&str] = &["verified", "analysis of your results"];
        let req = request("What does my cholesterol mean?");

        let first = pipeline(
            Arc::new(ScriptedReasoner::with_responses(script)),
            Arc::new(FixedExtractor(REPORT)),
        )
        .run(&req)
        .await;
        let second = pipeline(
            Arc::new(ScriptedReasoner::with_responses(script)),
            Arc::new(FixedExtractor(REPORT)),
        )
        .run(&req)
        .await;

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn empty_query_is_normalized_before_step_one() {
        let reasoner = Arc::new(ScriptedReasoner::with_responses(&["verified", "analysis"]));
        let p = pipeline(reasoner.clone(), Arc::new(FixedExtractor(REPORT)));

        let req = request("   \t  ");
        assert_eq!(req.query(), DEFAULT_ANALYZE_QUERY);

        p.run(&req).await;
        let calls = reasoner.invocations();
        assert!(calls[1].prompt.contains(DEFAULT_ANALYZE_QUERY));
    }

    #[tokio::test]
    async fn advisory_sections_are_appended_for_matching_reports() {
        let reasoner = Arc::new(ScriptedReasoner::with_responses(&["verified", "analysis body"]));
        let p = pipeline(reasoner, Arc::new(FixedExtractor(REPORT)));

        let outcome = p.run(&request("cholesterol?")).await;

        let text = outcome.final_text.unwrap();
        assert!(text.starts_with("analysis body"));
        assert!(text.contains("Heart health"));
    }

    #[test]
    fn step_names_render_for_error_payloads() {
        assert_eq!(StepName::Verification.to_string(), "verification");
        assert_eq!(StepName::Analysis.as_str(), "analysis");
    }
}

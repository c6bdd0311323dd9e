//! Generation Session: drives one user-triggered operation end to end.
//! Validation and prompt rendering happen before any model call; the
//! multi-variant loop issues isolated sequential calls and aggregates the
//! results; only fully successful outcomes reach the history ledger.

use std::sync::{Mutex, PoisonError};
use std::time::Instant;

use crate::error::AppError;
use crate::history::{HistoryEntry, HistoryLedger};
use crate::llm::{CompletionRequest, LlmClient};
use crate::telemetry::metrics::{COPY_GENERATION_DURATION, COPY_VARIANTS_PER_REQUEST};

use super::prompt::{self, PromptDocument};
use super::validate;
use super::{GenerateRequest, ImproveRequest, OperationKind, SeoRequest, TranslateRequest};

/// SEO analysis returns a structured keyword report and gets more room.
const SEO_MAX_TOKENS: u32 = 1500;

const IMPROVE_SUBJECT: &str = "Improvement";

/// Typed result of a session run. The legacy front-end renders warnings and
/// errors with text markers; that happens at the boundary, never here.
#[derive(Debug, Clone)]
pub enum SessionOutcome {
    Success {
        text: String,
    },
    Failure {
        error: AppError,
        /// Inline per-variant aggregate when some of a multi-variant batch
        /// still produced text.
        partial: Option<String>,
    },
}

impl SessionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, SessionOutcome::Success { .. })
    }
}

#[tracing::instrument(
    name = "session generate",
    skip(llm, history, req),
    fields(
        copy.operation = "generate",
        copy.variants = req.num_variants,
        copy.duration_ms,
    )
)]
pub async fn run_generate(
    llm: &LlmClient,
    history: &Mutex<HistoryLedger>,
    req: &GenerateRequest,
) -> SessionOutcome {
    if let Err(error) = validate::validate_generate(req) {
        return SessionOutcome::Failure {
            error,
            partial: None,
        };
    }

    let start = Instant::now();
    let multi = req.num_variants > 1;
    let mut sections: Vec<String> = Vec::with_capacity(req.num_variants as usize);
    let mut first_error: Option<AppError> = None;

    // Each variant call is isolated: a failure neither cancels nor alters
    // the remaining calls.
    for i in 1..=req.num_variants {
        let doc = prompt::generate_prompt(req, multi.then_some(i));
        match complete(llm, &doc, llm.default_max_tokens, "generate").await {
            Ok(text) => sections.push(text),
            Err(error) => {
                sections.push(format!("Generation failed: {error}"));
                first_error.get_or_insert(error);
            }
        }
    }

    let display = if multi {
        sections
            .iter()
            .enumerate()
            .map(|(idx, text)| format!("=== VARIANT {} ===\n\n{}", idx + 1, text))
            .collect::<Vec<_>>()
            .join("\n\n")
    } else {
        sections.pop().unwrap_or_default()
    };

    let duration = start.elapsed();
    COPY_GENERATION_DURATION.record(duration.as_secs_f64(), &[]);
    COPY_VARIANTS_PER_REQUEST.record(f64::from(req.num_variants), &[]);
    tracing::Span::current().record("copy.duration_ms", duration.as_millis() as u64);

    match first_error {
        None => {
            record_success(history, OperationKind::Generate, &req.product_name, &display);
            SessionOutcome::Success { text: display }
        }
        Some(error) => SessionOutcome::Failure {
            error,
            partial: multi.then_some(display),
        },
    }
}

#[tracing::instrument(
    name = "session improve",
    skip(llm, history, req),
    fields(copy.operation = "improve")
)]
pub async fn run_improve(
    llm: &LlmClient,
    history: &Mutex<HistoryLedger>,
    req: &ImproveRequest,
) -> SessionOutcome {
    if let Err(error) = validate::validate_improve(req) {
        return SessionOutcome::Failure {
            error,
            partial: None,
        };
    }

    let doc = prompt::improve_prompt(req);
    match complete(llm, &doc, llm.default_max_tokens, "improve").await {
        Ok(text) => {
            record_success(history, OperationKind::Improve, IMPROVE_SUBJECT, &text);
            SessionOutcome::Success { text }
        }
        Err(error) => SessionOutcome::Failure {
            error,
            partial: None,
        },
    }
}

#[tracing::instrument(
    name = "session seo",
    skip(llm, req),
    fields(copy.operation = "seo")
)]
pub async fn run_seo(llm: &LlmClient, req: &SeoRequest) -> SessionOutcome {
    if let Err(error) = validate::validate_seo(req) {
        return SessionOutcome::Failure {
            error,
            partial: None,
        };
    }

    let doc = prompt::seo_prompt(req);
    match complete(llm, &doc, SEO_MAX_TOKENS, "seo").await {
        Ok(text) => SessionOutcome::Success { text },
        Err(error) => SessionOutcome::Failure {
            error,
            partial: None,
        },
    }
}

#[tracing::instrument(
    name = "session translate",
    skip(llm, req),
    fields(copy.operation = "translate")
)]
pub async fn run_translate(llm: &LlmClient, req: &TranslateRequest) -> SessionOutcome {
    if let Err(error) = validate::validate_translate(req) {
        return SessionOutcome::Failure {
            error,
            partial: None,
        };
    }

    let doc = prompt::translate_prompt(req);
    match complete(llm, &doc, llm.default_max_tokens, "translate").await {
        Ok(text) => SessionOutcome::Success { text },
        Err(error) => SessionOutcome::Failure {
            error,
            partial: None,
        },
    }
}

async fn complete(
    llm: &LlmClient,
    doc: &PromptDocument,
    max_tokens: u32,
    operation: &str,
) -> Result<String, AppError> {
    let resp = llm
        .complete(&CompletionRequest {
            model: llm.model.clone(),
            prompt: doc.as_str().to_string(),
            temperature: llm.default_temperature,
            max_tokens,
            operation: operation.to_string(),
        })
        .await?;
    Ok(resp.content)
}

fn record_success(
    history: &Mutex<HistoryLedger>,
    operation: OperationKind,
    subject: &str,
    content: &str,
) {
    let mut ledger = history.lock().unwrap_or_else(PoisonError::into_inner);
    ledger.record(HistoryEntry::new(operation, subject, content));
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::llm::{CompletionResponse, Provider};

    use super::*;

    /// Test double: records every request and fails the scripted 1-based
    /// call indexes.
    struct ScriptedProvider {
        calls: AtomicUsize,
        requests: Mutex<Vec<CompletionRequest>>,
        failing_calls: Vec<usize>,
    }

    impl ScriptedProvider {
        fn new(failing_calls: Vec<usize>) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                requests: Mutex::new(Vec::new()),
                failing_calls,
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }

        fn recorded_requests(&self) -> Vec<CompletionRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait::async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(&self, req: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            self.requests.lock().unwrap().push(req.clone());
            if self.failing_calls.contains(&call) {
                anyhow::bail!("500 internal server error");
            }
            Ok(CompletionResponse {
                content: format!("generated text {call}"),
                model: req.model.clone(),
                input_tokens: 10,
                output_tokens: 20,
                finish_reason: "stop".to_string(),
            })
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    fn gateway(provider: Arc<ScriptedProvider>) -> LlmClient {
        LlmClient {
            provider_name: "scripted".to_string(),
            provider,
            model: "test-model".to_string(),
            configured: true,
            default_temperature: 0.7,
            default_max_tokens: 1024,
        }
    }

    fn generate_request(name: &str, variants: u8) -> GenerateRequest {
        let mut req: GenerateRequest = serde_json::from_str("{}").unwrap();
        req.product_name = name.to_string();
        req.num_variants = variants;
        req
    }

    #[tokio::test]
    async fn test_blank_product_name_skips_gateway_and_ledger() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let outcome = run_generate(&llm, &history, &generate_request("   ", 1)).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failure {
                error: AppError::Validation(_),
                partial: None,
            }
        ));
        assert_eq!(provider.call_count(), 0);
        assert!(history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_single_variant_end_to_end() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let mut req = generate_request("Casque Bluetooth Premium XSound", 1);
        req.category = "Électronique".to_string();
        req.tone = "Professionnel".to_string();
        req.language = "Français".to_string();
        req.length = "Moyenne (100-200 mots)".to_string();

        let outcome = run_generate(&llm, &history, &req).await;

        assert!(outcome.is_success());
        assert_eq!(provider.call_count(), 1);

        let sent = provider.recorded_requests();
        assert!(sent[0].prompt.contains("100 to 200 words"));
        assert!(sent[0].prompt.contains("Write the description in French"));
        assert!(!sent[0].prompt.contains("VARIANT"));

        let ledger = history.lock().unwrap();
        assert_eq!(ledger.len(), 1);
        let entry = ledger.entries().next().unwrap();
        assert_eq!(entry.subject, "Casque Bluetooth Premium XSound");
        assert_eq!(entry.operation, OperationKind::Generate);
    }

    #[tokio::test]
    async fn test_generate_three_variants_three_calls_three_sections() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let outcome = run_generate(&llm, &history, &generate_request("Casque", 3)).await;

        assert_eq!(provider.call_count(), 3);
        let SessionOutcome::Success { text } = outcome else {
            panic!("expected success");
        };

        let first = text.find("=== VARIANT 1 ===").unwrap();
        let second = text.find("=== VARIANT 2 ===").unwrap();
        let third = text.find("=== VARIANT 3 ===").unwrap();
        assert!(first < second && second < third);

        // Each prompt carried its own 1-based index and divergence demand.
        let sent = provider.recorded_requests();
        assert!(sent[0].prompt.contains("(Variant 1)"));
        assert!(sent[2].prompt.contains("(Variant 3)"));
        assert!(sent[1].prompt.contains("unique and different from others"));

        assert_eq!(history.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_partial_variant_failure_is_inline_and_unrecorded() {
        let provider = Arc::new(ScriptedProvider::new(vec![2]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let outcome = run_generate(&llm, &history, &generate_request("Casque", 3)).await;

        // Failure of the second call does not cancel the third.
        assert_eq!(provider.call_count(), 3);

        let SessionOutcome::Failure { error, partial } = outcome else {
            panic!("expected failure");
        };
        assert!(matches!(error, AppError::Service(_)));

        let inline = partial.unwrap();
        assert!(inline.contains("=== VARIANT 1 ===\n\ngenerated text 1"));
        assert!(inline.contains("=== VARIANT 2 ===\n\nGeneration failed:"));
        assert!(inline.contains("=== VARIANT 3 ===\n\ngenerated text 3"));

        assert!(history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_improve_records_fixed_subject() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let mut req: ImproveRequest = serde_json::from_str("{}").unwrap();
        req.original_description = "Un casque correct.".to_string();

        let outcome = run_improve(&llm, &history, &req).await;

        assert!(outcome.is_success());
        assert_eq!(provider.call_count(), 1);

        let ledger = history.lock().unwrap();
        let entry = ledger.entries().next().unwrap();
        assert_eq!(entry.subject, "Improvement");
        assert_eq!(entry.operation, OperationKind::Improve);
    }

    #[tokio::test]
    async fn test_improve_failure_leaves_ledger_unchanged() {
        let provider = Arc::new(ScriptedProvider::new(vec![1]));
        let llm = gateway(provider.clone());
        let history = Mutex::new(HistoryLedger::new());

        let mut req: ImproveRequest = serde_json::from_str("{}").unwrap();
        req.original_description = "Un casque correct.".to_string();

        let outcome = run_improve(&llm, &history, &req).await;

        assert!(!outcome.is_success());
        assert!(history.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_seo_blank_subjects_warns_without_calls() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());

        let req: SeoRequest = serde_json::from_str("{}").unwrap();
        let outcome = run_seo(&llm, &req).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failure {
                error: AppError::Validation(_),
                ..
            }
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_seo_uses_larger_token_budget() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());

        let mut req: SeoRequest = serde_json::from_str("{}").unwrap();
        req.product_name = "Montre connectée".to_string();

        let outcome = run_seo(&llm, &req).await;

        assert!(outcome.is_success());
        let sent = provider.recorded_requests();
        assert_eq!(sent[0].max_tokens, 1500);
    }

    #[tokio::test]
    async fn test_translate_identical_languages_skips_gateway() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());

        let mut req: TranslateRequest = serde_json::from_str("{}").unwrap();
        req.description = "Un produit.".to_string();
        req.source_language = "English".to_string();
        req.target_language = "English".to_string();

        let outcome = run_translate(&llm, &req).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failure {
                error: AppError::IdenticalLanguages,
                ..
            }
        ));
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_translate_success_is_not_recorded() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = gateway(provider.clone());

        let mut req: TranslateRequest = serde_json::from_str("{}").unwrap();
        req.description = "Un produit.".to_string();

        let outcome = run_translate(&llm, &req).await;
        assert!(outcome.is_success());
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_configuration_warning_before_any_call() {
        let provider = Arc::new(ScriptedProvider::new(vec![]));
        let llm = LlmClient {
            provider_name: "scripted".to_string(),
            provider: provider.clone(),
            model: "test-model".to_string(),
            configured: false,
            default_temperature: 0.7,
            default_max_tokens: 1024,
        };
        let history = Mutex::new(HistoryLedger::new());

        let outcome = run_generate(&llm, &history, &generate_request("Casque", 1)).await;

        assert!(matches!(
            outcome,
            SessionOutcome::Failure {
                error: AppError::Configuration(_),
                ..
            }
        ));
        assert_eq!(provider.call_count(), 0);
        assert!(history.lock().unwrap().is_empty());
    }
}

use std::sync::Arc;
use std::time::Instant;

use opentelemetry::KeyValue;
use tracing::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::telemetry::metrics::{
    GEN_AI_ERROR_COUNT, GEN_AI_OPERATION_DURATION, GEN_AI_TOKEN_USAGE,
};

use super::openai::OpenAIProvider;
use super::{CompletionRequest, CompletionResponse, Provider};

/// The sole integration point with the external completion capability.
/// One request, one response; failures surface as `AppError` and are never
/// retried here.
pub struct LlmClient {
    pub provider: Arc<dyn Provider>,
    pub provider_name: String,
    pub model: String,
    pub configured: bool,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
}

impl LlmClient {
    pub fn from_config(config: &Config) -> Self {
        let token = config.hf_api_token.clone().unwrap_or_default();
        let provider = Arc::new(OpenAIProvider::new_huggingface(
            &token,
            &config.inference_base_url,
        ));
        Self {
            provider_name: provider.name().to_string(),
            provider,
            model: config.model_id.clone(),
            configured: config.api_configured(),
            default_temperature: config.default_temperature,
            default_max_tokens: config.default_max_tokens,
        }
    }

    pub async fn complete(&self, req: &CompletionRequest) -> AppResult<CompletionResponse> {
        // Credential check happens before any network activity.
        if !self.configured {
            return Err(AppError::Configuration(
                "Hugging Face API token not configured, set HF_API_TOKEN in your environment"
                    .to_string(),
            ));
        }

        let span_display_name = format!("gen_ai.chat {}", req.model);
        let start = Instant::now();

        let span = tracing::info_span!(
            "gen_ai.chat",
            otel.name = %span_display_name,
            gen_ai.operation.name = "chat",
            gen_ai.provider.name = %self.provider_name,
            gen_ai.request.model = %req.model,
            gen_ai.request.temperature = req.temperature,
            gen_ai.request.max_tokens = req.max_tokens as i64,
            gen_ai.response.model = tracing::field::Empty,
            gen_ai.usage.input_tokens = tracing::field::Empty,
            gen_ai.usage.output_tokens = tracing::field::Empty,
            gen_ai.response.finish_reasons = tracing::field::Empty,
            copy.operation = %req.operation,
            otel.status_code = tracing::field::Empty,
            error.type = tracing::field::Empty,
        );

        span.add_event(
            "gen_ai.user.message",
            vec![KeyValue::new("gen_ai.prompt", truncate(&req.prompt, 1000))],
        );

        let result = self.provider.complete(req).instrument(span.clone()).await;

        let duration = start.elapsed().as_secs_f64();
        let op_kv = KeyValue::new("gen_ai.operation.name", "chat");
        let provider_kv = KeyValue::new("gen_ai.provider.name", self.provider_name.clone());
        let model_kv = KeyValue::new("gen_ai.request.model", req.model.clone());

        match result {
            Ok(resp) => {
                span.record("gen_ai.response.model", resp.model.as_str());
                span.record("gen_ai.usage.input_tokens", resp.input_tokens as i64);
                span.record("gen_ai.usage.output_tokens", resp.output_tokens as i64);
                if !resp.finish_reason.is_empty() {
                    span.record(
                        "gen_ai.response.finish_reasons",
                        resp.finish_reason.as_str(),
                    );
                }

                span.add_event(
                    "gen_ai.assistant.message",
                    vec![KeyValue::new(
                        "gen_ai.completion",
                        truncate(&resp.content, 2000),
                    )],
                );

                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.input_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "input"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_TOKEN_USAGE.record(
                    f64::from(resp.output_tokens),
                    &[
                        KeyValue::new("gen_ai.token.type", "output"),
                        op_kv.clone(),
                        provider_kv.clone(),
                        model_kv.clone(),
                    ],
                );
                GEN_AI_OPERATION_DURATION.record(duration, &[op_kv, provider_kv, model_kv]);

                Ok(resp)
            }
            Err(err) => {
                span.record("otel.status_code", "ERROR");
                span.record("error.type", classify_error(&err));

                GEN_AI_ERROR_COUNT.add(1, &[provider_kv, model_kv]);

                tracing::error!(
                    provider = %self.provider_name,
                    model = %req.model,
                    operation = %req.operation,
                    error = %err,
                    "LLM call failed"
                );

                Err(AppError::Service(err.to_string()))
            }
        }
    }
}

fn classify_error(err: &anyhow::Error) -> &'static str {
    let msg = err.to_string().to_lowercase();
    if msg.contains("rate limit") || msg.contains("429") {
        "rate_limit"
    } else if msg.contains("timeout") || msg.contains("timed out") || msg.contains("deadline") {
        "timeout"
    } else if msg.contains("401")
        || msg.contains("403")
        || msg.contains("auth")
        || msg.contains("api key")
    {
        "auth_error"
    } else if msg.contains("400") || msg.contains("422") || msg.contains("invalid") {
        "invalid_request"
    } else if msg.contains("500")
        || msg.contains("502")
        || msg.contains("503")
        || msg.contains("server")
    {
        "server_error"
    } else if msg.contains("connect")
        || msg.contains("dns")
        || msg.contains("network")
        || msg.contains("reset")
    {
        "network_error"
    } else {
        "unknown_error"
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        s.char_indices()
            .take_while(|&(i, _)| i < max)
            .map(|(_, c)| c)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    struct CountingProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl CountingProvider {
        fn new(fail: bool) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait::async_trait]
    impl Provider for CountingProvider {
        async fn complete(&self, req: &CompletionRequest) -> anyhow::Result<CompletionResponse> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                anyhow::bail!("503 service unavailable");
            }
            Ok(CompletionResponse {
                content: "generated copy".to_string(),
                model: req.model.clone(),
                input_tokens: 100,
                output_tokens: 50,
                finish_reason: "stop".to_string(),
            })
        }

        fn name(&self) -> &str {
            "counting"
        }
    }

    fn request() -> CompletionRequest {
        CompletionRequest {
            model: "test-model".to_string(),
            prompt: "write something".to_string(),
            temperature: 0.7,
            max_tokens: 1024,
            operation: "generate".to_string(),
        }
    }

    fn client(provider: Arc<CountingProvider>, configured: bool) -> LlmClient {
        LlmClient {
            provider_name: "counting".to_string(),
            provider,
            model: "test-model".to_string(),
            configured,
            default_temperature: 0.7,
            default_max_tokens: 1024,
        }
    }

    #[tokio::test]
    async fn test_missing_credential_short_circuits() {
        let provider = Arc::new(CountingProvider::new(false));
        let gateway = client(provider.clone(), false);

        let err = gateway.complete(&request()).await.unwrap_err();
        assert!(matches!(err, AppError::Configuration(_)));
        assert!(err.is_warning());
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_successful_completion() {
        let provider = Arc::new(CountingProvider::new(false));
        let gateway = client(provider.clone(), true);

        let resp = gateway.complete(&request()).await.unwrap();
        assert_eq!(resp.content, "generated copy");
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_failure_maps_to_service_error() {
        let provider = Arc::new(CountingProvider::new(true));
        let gateway = client(provider.clone(), true);

        let err = gateway.complete(&request()).await.unwrap_err();
        match err {
            AppError::Service(msg) => assert!(msg.contains("503")),
            other => panic!("expected service error, got {other:?}"),
        }
        // Exactly one upstream attempt, no retries.
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_classify_error_categories() {
        let cases = vec![
            ("rate limit exceeded", "rate_limit"),
            ("status 429: too many requests", "rate_limit"),
            ("request timed out", "timeout"),
            ("401 unauthorized", "auth_error"),
            ("invalid api key", "auth_error"),
            ("400 bad request", "invalid_request"),
            ("503 service unavailable", "server_error"),
            ("connection refused", "network_error"),
            ("something unexpected", "unknown_error"),
        ];

        for (msg, expected) in cases {
            let err = anyhow::anyhow!("{}", msg);
            assert_eq!(
                classify_error(&err),
                expected,
                "classify_error({msg:?}) should be {expected:?}"
            );
        }
    }

    #[test]
    fn test_truncate_short() {
        assert_eq!(truncate("hello", 10), "hello");
    }

    #[test]
    fn test_truncate_long() {
        assert_eq!(truncate("hello world", 5), "hello");
    }

    #[test]
    fn test_truncate_multibyte_safe() {
        let result = truncate("hé世界!", 3);
        assert!(result.len() <= 3);
        assert!(result.is_char_boundary(result.len()));
    }
}

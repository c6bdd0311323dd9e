use std::env;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub environment: String,
    pub hf_api_token: Option<String>,
    pub model_id: String,
    pub inference_base_url: String,
    pub default_temperature: f32,
    pub default_max_tokens: u32,
    pub otel_service_name: String,
    pub otel_exporter_endpoint: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            port: env::var("APP_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .expect("APP_PORT must be a number"),
            environment: env::var("APP_ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            // Absent token degrades every operation to a warning; it is
            // never a startup failure.
            hf_api_token: env::var("HF_API_TOKEN").ok().filter(|t| !t.is_empty()),
            model_id: env::var("LLM_MODEL_ID")
                .unwrap_or_else(|_| "Qwen/Qwen2.5-7B-Instruct".to_string()),
            inference_base_url: env::var("LLM_BASE_URL")
                .unwrap_or_else(|_| "https://router.huggingface.co/v1".to_string()),
            default_temperature: env::var("DEFAULT_TEMPERATURE")
                .unwrap_or_else(|_| "0.7".to_string())
                .parse()
                .expect("DEFAULT_TEMPERATURE must be a number"),
            default_max_tokens: env::var("DEFAULT_MAX_TOKENS")
                .unwrap_or_else(|_| "1024".to_string())
                .parse()
                .expect("DEFAULT_MAX_TOKENS must be a number"),
            otel_service_name: env::var("OTEL_SERVICE_NAME")
                .unwrap_or_else(|_| "product-copy-generator".to_string()),
            otel_exporter_endpoint: env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .unwrap_or_else(|_| "http://localhost:4317".to_string()),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn api_configured(&self) -> bool {
        self.hf_api_token.is_some()
    }
}

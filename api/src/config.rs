use std::env;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    /// Base URL for the API (used in links embedded in responses)
    pub api_base_url: String,
    /// Webhook endpoint for governance event notifications (None = disabled)
    pub notify_webhook_url: Option<String>,
    /// Keywords flagged by the age-appropriateness evaluator.
    /// Injected here so the policy can change without touching the evaluator.
    pub content_keyword_denylist: Vec<String>,
}

const DEFAULT_KEYWORD_DENYLIST: &str = "violence,explicit,adult";

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            database_url: env::var("DATABASE_URL").expect("DATABASE_URL must be set"),
            api_base_url: env::var("API_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            notify_webhook_url: env::var("NOTIFY_WEBHOOK_URL").ok(),
            content_keyword_denylist: parse_denylist(
                &env::var("CONTENT_KEYWORD_DENYLIST")
                    .unwrap_or_else(|_| DEFAULT_KEYWORD_DENYLIST.to_string()),
            ),
        }
    }

    /// Check if governance notifications are configured
    pub fn notifications_enabled(&self) -> bool {
        self.notify_webhook_url.is_some()
    }
}

fn parse_denylist(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

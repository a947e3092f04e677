use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    // Required
    pub database_url: String,
    pub invocation_secret: String,
    pub confluence_base_url: String,
    pub confluence_app_email: String,
    pub confluence_app_token: String,

    // Video vendor
    #[serde(default = "default_video_api_url")]
    pub video_api_url: String,
    #[serde(default)]
    pub video_api_key: Option<String>,

    // Text generation
    #[serde(default = "default_text_api_url")]
    pub text_api_url: String,
    #[serde(default)]
    pub text_api_key: Option<String>,
    #[serde(default = "default_text_model")]
    pub text_model: String,

    #[serde(default = "default_voice")]
    pub default_voice: String,

    // Background polling
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    // Server
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_video_api_url() -> String {
    "https://api.video-vendor.example/v1".to_string()
}

fn default_text_api_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_text_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_voice() -> String {
    "alloy".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

impl AppConfig {
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(config::Environment::default().try_parsing(true))
            .build()?;

        config.try_deserialize()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database_url.is_empty() {
            return Err("DATABASE_URL is required".to_string());
        }
        if self.invocation_secret.is_empty() {
            return Err("INVOCATION_SECRET is required".to_string());
        }
        if !self.confluence_base_url.starts_with("http://")
            && !self.confluence_base_url.starts_with("https://")
        {
            return Err("CONFLUENCE_BASE_URL must start with http:// or https://".to_string());
        }
        if self.confluence_app_email.is_empty() || self.confluence_app_token.is_empty() {
            return Err("CONFLUENCE_APP_EMAIL and CONFLUENCE_APP_TOKEN are required".to_string());
        }
        if self.poll_interval_secs == 0 {
            return Err("POLL_INTERVAL_SECS must be greater than zero".to_string());
        }

        if is_blank(&self.video_api_key) {
            tracing::warn!("VIDEO_API_KEY not set - video submissions will be rejected");
        }
        if is_blank(&self.text_api_key) {
            tracing::warn!(
                "TEXT_API_KEY not set - scripts will fall back to the raw page text"
            );
        }

        Ok(())
    }
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map(str::trim).unwrap_or("").is_empty()
}

use std::env;

/// Process-wide configuration, read once at boot. Grounded on the teacher's
/// `RateLimitConfig::from_env()` (env var -> parse -> fall back to default) and on
/// `lib.rs`'s direct `env::var(...)` reads for paths; `SESSION_SECRET` has no teacher
/// analogue in kind (the teacher has no auth layer) so it follows the same shape but is
/// fatal rather than defaulted, since an unset signing secret would silently accept
/// forged session cookies.
pub struct Config {
    pub database_path: String,
    pub session_secret: String,
    pub mock_mode: bool,
    pub transcribe_api_key: Option<String>,
    pub transcription_api_url: Option<String>,
    pub extract_api_key: Option<String>,
    pub extraction_api_url: Option<String>,
    pub zoom_client_id: Option<String>,
    pub zoom_client_secret: Option<String>,
    pub admin_email: Option<String>,
    pub app_url: String,
    pub static_dir: String,
}

impl Config {
    pub fn from_env() -> Self {
        let session_secret = env::var("SESSION_SECRET").unwrap_or_else(|_| {
            eprintln!("❌ SESSION_SECRET is not set; refusing to start with an unsigned session cookie");
            std::process::exit(1);
        });

        let mock_mode = env::var("MOCK_MODE")
            .map(|v| v != "0" && v.to_lowercase() != "false")
            .unwrap_or(false);

        Config {
            database_path: env::var("DATABASE_PATH").unwrap_or_else(|_| "data/scribe.db".to_string()),
            session_secret,
            mock_mode,
            transcribe_api_key: env::var("TRANSCRIBE_API_KEY").ok(),
            transcription_api_url: env::var("TRANSCRIPTION_API_URL").ok(),
            extract_api_key: env::var("EXTRACT_API_KEY").ok(),
            extraction_api_url: env::var("EXTRACTION_API_URL").ok(),
            zoom_client_id: env::var("ZOOM_CLIENT_ID").ok(),
            zoom_client_secret: env::var("ZOOM_CLIENT_SECRET").ok(),
            admin_email: env::var("ADMIN_EMAIL").ok(),
            app_url: env::var("APP_URL").unwrap_or_else(|_| "http://localhost:8000".to_string()),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "frontend/dist".to_string()),
        }
    }
}

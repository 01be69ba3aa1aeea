pub mod config;
pub mod db;
pub mod decode;
pub mod errors;
pub mod events;
pub mod ingest;
pub mod insights;
pub mod keywords;
pub mod live_session;
pub mod models;
pub mod providers;
pub mod rate_limit;
pub mod routes;
pub mod usage;

use config::Config;
use db::Db;
use events::EventBus;
use live_session::MockChunkCounters;
use rate_limit::RateLimiter;
use rocket_cors::CorsOptions;

pub fn rocket() -> rocket::Rocket<rocket::Build> {
    let config = Config::from_env();
    let rate_limit_config = rate_limit::RateLimitConfig::from_env();
    build_rocket(config, rate_limit_config)
}

/// Test-harness entry point: overrides `database_path` so each test gets its own file,
/// everything else still comes from the environment. Grounded on the teacher's
/// `rocket_with_db`.
pub fn rocket_with_db(db_path: &str) -> rocket::Rocket<rocket::Build> {
    let mut config = Config::from_env();
    config.database_path = db_path.to_string();
    let rate_limit_config = rate_limit::RateLimitConfig::from_env();
    build_rocket(config, rate_limit_config)
}

/// Test-harness entry point for rate-limit-config tests, avoiding env var races between
/// parallel tests. Grounded on the teacher's `rocket_with_db_and_config`.
pub fn rocket_with_db_and_config(
    db_path: &str,
    rate_config: rate_limit::RateLimitConfig,
) -> rocket::Rocket<rocket::Build> {
    let mut config = Config::from_env();
    config.database_path = db_path.to_string();
    build_rocket(config, rate_config)
}

fn build_rocket(
    config: Config,
    rate_limit_config: rate_limit::RateLimitConfig,
) -> rocket::Rocket<rocket::Build> {
    if let Some(parent) = std::path::Path::new(&config.database_path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let db = Db::new(&config.database_path);
    let events = EventBus::new();
    let rate_limiter = RateLimiter::new();
    let chunk_counters = MockChunkCounters::new();

    let cors = CorsOptions::default()
        .to_cors()
        .expect("Failed to create CORS");

    // Raised from Rocket's tiny defaults: multipart audio chunks and uploads carry raw
    // bytes, and JSON bodies carry base64'd audio for the cloud-import path's temp blobs.
    let figment = rocket::Config::figment()
        .merge(("limits.json", 10 * 1024 * 1024))
        .merge(("limits.file", 100 * 1024 * 1024))
        .merge(("limits.data-form", 100 * 1024 * 1024));

    rocket::custom(figment)
        .manage(config)
        .manage(db)
        .manage(events)
        .manage(rate_limit_config)
        .manage(rate_limiter)
        .manage(chunk_counters)
        .attach(cors)
        .register(
            "/",
            rocket::catchers![routes::too_many_requests, routes::not_found],
        )
        .mount(
            "/",
            rocket::routes![
                routes::health,
                routes::live_start,
                routes::live_stream,
                routes::live_chunk,
                routes::live_stop,
                routes::live_status,
                routes::live_memory_hints,
                routes::upload_meeting,
                routes::extract_notes,
                routes::create_meeting,
                routes::list_meetings,
                routes::get_meeting,
                routes::update_meeting_transcript,
                routes::update_meeting_extraction,
                routes::delete_meeting,
                routes::get_meeting_insights,
                routes::get_meeting_whatchanged,
                routes::zoom_import,
                routes::list_tracked_issues,
                routes::resolve_tracked_issue,
            ],
        )
}

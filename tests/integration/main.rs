// Integration test suite for the meeting-intelligence server.
//
// Organized by feature area, sharing common::TestClient for DB/session lifecycle.


mod health;
mod live_sessions;
mod meetings;
mod insights;
mod tracked_issues;
mod usage_limits;
mod ownership;
mod rate_limit_config;

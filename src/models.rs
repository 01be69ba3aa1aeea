use serde::{Deserialize, Serialize};

// --- Users ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct User {
    pub id: String,
    pub email: String,
    pub plan: String,
    pub is_lifetime: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cloud_token_expires_at: Option<String>,
    pub created_at: String,
}

// --- Meetings ---

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct ExtractionRecord {
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub follow_up_email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default)]
    pub open_questions: Vec<String>,
    #[serde(default)]
    pub proposed_solutions: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ActionItem {
    pub task: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub deadline: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Meeting {
    pub id: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub raw_notes: String,
    pub action_items: ExtractionRecord,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateMeeting {
    pub raw_notes: String,
    #[serde(default)]
    pub action_items: ExtractionRecord,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTranscript {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateExtraction {
    #[serde(default)]
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub follow_up_email: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub open_questions: Vec<String>,
    #[serde(default)]
    pub proposed_solutions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtractRequest {
    pub notes: String,
}

// --- Live sessions ---

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
    Failed,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::Failed => "failed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            "failed" => Some(SessionStatus::Failed),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LiveSession {
    pub id: String,
    pub owner: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub participants: Option<String>,
    pub status: String,
    pub started_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ended_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meeting_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StartLiveSession {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub participants: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranscriptSegment {
    pub session_id: String,
    pub segment_index: i64,
    pub text: String,
    pub timestamp_ms: i64,
    pub speaker: String,
    pub is_final: bool,
}

pub const SPEAKER_PLACEHOLDER: &str = "Speaker";

// --- Usage ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsageCounter {
    pub user_id: String,
    pub month: String,
    pub extracts: i64,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UsageStatus {
    pub allowed: bool,
    pub used: i64,
    pub max: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

// --- Tracked issues ---

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrackedIssue {
    pub id: String,
    pub owner: String,
    pub issue_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_meeting_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_meeting_title: Option<String>,
    pub resolved: bool,
    pub created_at: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resolved_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResolveTrackedIssue {
    pub resolved: bool,
}

// --- Insights ---

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "kind")]
pub enum InsightCard {
    #[serde(rename = "recurring_topics")]
    RecurringTopics {
        shared_keywords: Vec<String>,
        meetings: Vec<RecurringTopicMeeting>,
    },
    #[serde(rename = "unresolved_items")]
    UnresolvedItems { items: Vec<UnresolvedItem> },
    #[serde(rename = "follow_up_signals")]
    FollowUpSignals { phrases: Vec<String> },
    #[serde(rename = "recurring_participants")]
    RecurringParticipants { participants: Vec<RecurringParticipant> },
    #[serde(rename = "new_topics")]
    NewTopics { topics: Vec<String> },
    #[serde(rename = "recurring_solutions")]
    RecurringSolutions { solutions: Vec<RecurringSolution> },
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecurringTopicMeeting {
    pub meeting_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub shared: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UnresolvedItem {
    pub task: String,
    pub source_meeting_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_meeting_title: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecurringParticipant {
    pub name: String,
    pub meeting_count: usize,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RecurringSolution {
    pub current: String,
    pub prior: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InsightsResponse {
    pub meeting_id: String,
    pub insights: Vec<InsightCard>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Default)]
pub struct WhatChanged {
    pub has_prior: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prior_meeting_id: Option<String>,
    #[serde(default)]
    pub new_action_items: Vec<String>,
    #[serde(default)]
    pub resolved_since_last: Vec<String>,
    #[serde(default)]
    pub new_solutions: Vec<String>,
    #[serde(default)]
    pub dropped_solutions: Vec<String>,
    #[serde(default)]
    pub new_open_questions: Vec<String>,
    #[serde(default)]
    pub resolved_open_questions: Vec<String>,
    #[serde(default)]
    pub new_topics: Vec<String>,
    #[serde(default)]
    pub dropped_topics: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryHint {
    pub meeting_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub date: String,
    pub shared_topics: Vec<String>,
    pub snippet: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MemoryHintsResponse {
    pub hints: Vec<MemoryHint>,
}

// --- Cloud (Zoom-style) import ---

#[derive(Debug, Deserialize)]
pub struct ZoomImportRequest {
    pub meeting_id: String,
    pub recording_id: String,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
}

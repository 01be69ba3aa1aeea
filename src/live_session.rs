//! Live session state machine: start, chunk ingestion, stop, status and memory hints.
//! Grounded on the teacher's room/message lifecycle in `routes/mod.rs` and `routes/stream.rs`
//! -- a transaction-guarded single-writer store plus a broadcast channel for live push --
//! generalized from per-room chat history to a per-user single active recording session.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::db::Db;
use crate::decode;
use crate::errors::AppError;
use crate::events::{EventBus, LiveEvent};
use crate::keywords::keyword_set;
use crate::models::{
    ExtractionRecord, LiveSession, Meeting, MemoryHint, MemoryHintsResponse, SessionStatus,
    TranscriptSegment,
};
use crate::providers::{ExtractorProvider, TranscriptionProvider};

/// Per-session chunk counter so the mock transcription provider cycles deterministically
/// even though chunks for different sessions arrive interleaved. Entries are never
/// removed; an abandoned session just leaves a small dead counter behind.
#[derive(Default)]
pub struct MockChunkCounters {
    inner: Mutex<HashMap<String, AtomicUsize>>,
}

impl MockChunkCounters {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&self, session_id: &str) -> usize {
        let mut inner = self.inner.lock().unwrap();
        let counter = inner
            .entry(session_id.to_string())
            .or_insert_with(|| AtomicUsize::new(0));
        counter.fetch_add(1, Ordering::SeqCst)
    }

    fn reset(&self, session_id: &str) {
        let mut inner = self.inner.lock().unwrap();
        inner.insert(session_id.to_string(), AtomicUsize::new(0));
    }
}

/// Starts a new live session for `owner`, unless one is already active -- the single
/// active session invariant is enforced inside `Db::create_live_session`'s transaction.
pub fn start(
    db: &Db,
    counters: &MockChunkCounters,
    owner: &str,
    title: Option<&str>,
    participants: Option<&str>,
) -> Result<LiveSession, AppError> {
    let result = db
        .create_live_session(owner, title, participants)
        .map_err(AppError::from)?;

    match result {
        Ok(session) => {
            counters.reset(&session.id);
            Ok(session)
        }
        Err(existing) => Err(AppError::SessionActive(existing.id)),
    }
}

/// Ingests one audio chunk: transcribes it (mock or real provider), allocates the next
/// segment index under the store's write lock, persists the segment, then publishes it
/// to any live subscriber. A transcription failure or an empty/silent result is not an
/// error -- it simply produces no segment, per the provider's silent-chunk contract.
pub async fn ingest_chunk(
    db: &Db,
    events: &EventBus,
    counters: &MockChunkCounters,
    provider: &dyn TranscriptionProvider,
    session: &LiveSession,
    audio_bytes: &[u8],
    format_hint: &str,
) -> Result<Option<TranscriptSegment>, AppError> {
    let mock_index = counters.next(&session.id);
    let text = provider
        .transcribe(audio_bytes, format_hint, mock_index)
        .await
        .map_err(|e| AppError::Upstream(e.to_string()))?;

    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let timestamp_ms = chrono::Utc::now().timestamp_millis();
    let segment = db
        .insert_next_segment(&session.id, trimmed, timestamp_ms)
        .map_err(AppError::from)?;

    events.publish(LiveEvent::Segment {
        live_session_id: session.id.clone(),
        segment: segment.clone(),
    });

    Ok(Some(segment))
}

pub fn status(db: &Db, id: &str, owner: &str) -> Result<LiveSession, AppError> {
    db.get_live_session_owned(id, owner)
        .ok_or_else(|| AppError::NotFound("live session not found".to_string()))
}

/// Outcome of stopping a session: either a completed meeting, or a failed session with
/// no transcript captured (zero segments).
pub enum StopOutcome {
    Completed(Meeting),
    Failed,
}

/// Concatenates segments in order, runs the extractor, decodes its output tolerantly,
/// and persists the result as a new meeting. Extraction failure never blocks finishing
/// the session -- it is swallowed to an empty `ExtractionRecord` per the propagation
/// policy for untrusted downstream output. A session with zero segments transitions to
/// `failed` instead, with no meeting created.
pub async fn stop(
    db: &Db,
    events: &EventBus,
    extractor: &dyn ExtractorProvider,
    session: &LiveSession,
) -> Result<StopOutcome, AppError> {
    let segments = db.list_segments_ordered(&session.id);

    if segments.is_empty() {
        db.finalize_live_session(&session.id, SessionStatus::Failed, None);
        events.publish(LiveEvent::StatusChanged {
            live_session_id: session.id.clone(),
            status: SessionStatus::Failed,
        });
        return Ok(StopOutcome::Failed);
    }

    let transcript = segments
        .iter()
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n");

    let extraction = match extractor.extract(&transcript).await {
        Ok(raw) => decode::decode(&raw)
            .ok()
            .and_then(|v| serde_json::from_value::<ExtractionRecord>(v).ok())
            .unwrap_or_default(),
        Err(_) => ExtractionRecord::default(),
    };

    let meeting = db
        .create_meeting(&session.owner, session.title.as_deref(), &transcript, &extraction)
        .map_err(AppError::from)?;

    db.finalize_live_session(&session.id, SessionStatus::Completed, Some(&meeting.id));
    events.publish(LiveEvent::StatusChanged {
        live_session_id: session.id.clone(),
        status: SessionStatus::Completed,
    });

    Ok(StopOutcome::Completed(meeting))
}

/// Read-only: surfaces up to three prior meetings that share keywords with the last
/// 24 segments of the in-progress session. Never mutates state.
pub fn memory_hints(db: &Db, session: &LiveSession) -> MemoryHintsResponse {
    let segments = db.list_segments_ordered(&session.id);
    let recent_text = segments
        .iter()
        .rev()
        .take(24)
        .map(|s| s.text.as_str())
        .collect::<Vec<_>>()
        .join(" ");

    if recent_text.trim().is_empty() {
        return MemoryHintsResponse { hints: vec![] };
    }

    let live_keywords = keyword_set(&recent_text);
    let candidates = db.list_meetings_owned(&session.owner);

    let mut hints = Vec::new();
    for meeting in candidates.into_iter().take(20) {
        let shared: Vec<String> = live_keywords
            .intersection(&keyword_set(&meeting.raw_notes))
            .cloned()
            .collect();
        if shared.len() < 2 {
            continue;
        }

        let snippet = first_sentence_snippet(&meeting.raw_notes, &shared);
        hints.push(MemoryHint {
            meeting_id: meeting.id,
            title: meeting.title,
            date: meeting.created_at,
            shared_topics: shared,
            snippet,
        });

        if hints.len() >= 3 {
            break;
        }
    }

    MemoryHintsResponse { hints }
}

/// First sentence of `text` containing any of `shared_keywords`, falling back to the
/// first non-empty sentence if none mentions a shared keyword.
fn first_sentence_snippet(text: &str, shared_keywords: &[String]) -> String {
    let mut sentences = text.split(['.', '\n']).map(str::trim).filter(|s| !s.is_empty());

    let hit = sentences
        .clone()
        .find(|s| {
            let lower = s.to_lowercase();
            shared_keywords.iter().any(|kw| lower.contains(kw.as_str()))
        })
        .or_else(|| sentences.next())
        .unwrap_or("");

    if hit.chars().count() > 150 {
        let truncated: String = hit.chars().take(150).collect();
        format!("{truncated}...")
    } else {
        hit.to_string()
    }
}

use rusqlite::{Connection, OptionalExtension, params};
use std::sync::Mutex;

use crate::models::{
    ExtractionRecord, LiveSession, Meeting, SessionStatus, TrackedIssue, TranscriptSegment, User,
    SPEAKER_PLACEHOLDER,
};

pub struct Db {
    pub conn: Mutex<Connection>,
}

pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

impl Db {
    pub fn new(path: &str) -> Self {
        let conn = Connection::open(path).expect("Failed to open database");
        conn.execute_batch("PRAGMA journal_mode=WAL; PRAGMA foreign_keys=ON;")
            .expect("Failed to set pragmas");
        let db = Db {
            conn: Mutex::new(conn),
        };
        db.migrate();
        db
    }

    fn migrate(&self) {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS users (
                id TEXT PRIMARY KEY,
                email TEXT NOT NULL UNIQUE,
                plan TEXT NOT NULL DEFAULT 'free',
                is_lifetime INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS meetings (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT,
                raw_notes TEXT NOT NULL DEFAULT '',
                action_items TEXT NOT NULL DEFAULT '{}',
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_meetings_owner_created ON meetings(owner, created_at);

            CREATE TABLE IF NOT EXISTS live_sessions (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                title TEXT,
                participants TEXT,
                status TEXT NOT NULL DEFAULT 'active',
                started_at TEXT NOT NULL,
                ended_at TEXT,
                meeting_id TEXT REFERENCES meetings(id) ON DELETE SET NULL
            );
            CREATE INDEX IF NOT EXISTS idx_live_sessions_owner_status ON live_sessions(owner, status);

            CREATE TABLE IF NOT EXISTS transcript_segments (
                live_session TEXT NOT NULL REFERENCES live_sessions(id) ON DELETE CASCADE,
                segment_index INTEGER NOT NULL,
                text TEXT NOT NULL,
                timestamp_ms INTEGER NOT NULL,
                speaker TEXT NOT NULL DEFAULT 'Speaker',
                is_final INTEGER NOT NULL DEFAULT 1,
                PRIMARY KEY (live_session, segment_index)
            );

            CREATE TABLE IF NOT EXISTS usage (
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                month TEXT NOT NULL,
                extracts INTEGER NOT NULL DEFAULT 0,
                PRIMARY KEY (user_id, month)
            );

            CREATE TABLE IF NOT EXISTS tracked_issues (
                id TEXT PRIMARY KEY,
                owner TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                issue_text TEXT NOT NULL,
                notes TEXT,
                source_meeting_id TEXT,
                source_meeting_title TEXT,
                resolved INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                resolved_at TEXT
            );
            CREATE INDEX IF NOT EXISTS idx_tracked_issues_owner ON tracked_issues(owner);

            -- Boundary tables: row shape only, their owning flows are out of scope.
            CREATE TABLE IF NOT EXISTS user_identities (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                provider TEXT NOT NULL,
                provider_user_id TEXT NOT NULL,
                UNIQUE(provider, provider_user_id)
            );

            CREATE TABLE IF NOT EXISTS feedback (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                body TEXT NOT NULL,
                created_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS sessions (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
                expires_at TEXT NOT NULL
            );",
        )
        .expect("Failed to run migrations");

        conn.execute_batch("ALTER TABLE users ADD COLUMN cloud_access_token TEXT;")
            .ok();
        conn.execute_batch("ALTER TABLE users ADD COLUMN cloud_refresh_token TEXT;")
            .ok();
        conn.execute_batch("ALTER TABLE users ADD COLUMN cloud_token_expires_at TEXT;")
            .ok();

        install_lifetime_guard(&conn);
    }
}

/// BEFORE UPDATE trigger that aborts any attempt to clear `is_lifetime` once set.
/// Administrative override is `drop_lifetime_guard` -> the update -> this, run inside
/// one transaction (see `admin_override_lifetime`).
fn install_lifetime_guard(conn: &Connection) {
    conn.execute_batch(
        "CREATE TRIGGER IF NOT EXISTS guard_lifetime_flag
         BEFORE UPDATE OF is_lifetime ON users
         WHEN OLD.is_lifetime = 1 AND NEW.is_lifetime = 0
         BEGIN
             SELECT RAISE(ABORT, 'is_lifetime cannot be cleared without admin override');
         END;",
    )
    .expect("Failed to install lifetime guard trigger");
}

fn drop_lifetime_guard(conn: &Connection) {
    conn.execute_batch("DROP TRIGGER IF EXISTS guard_lifetime_flag;")
        .expect("Failed to drop lifetime guard trigger");
}

const USER_COLUMNS: &str = "id, email, plan, is_lifetime, cloud_access_token, cloud_refresh_token, cloud_token_expires_at, created_at";

fn row_to_user(row: &rusqlite::Row) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        email: row.get(1)?,
        plan: row.get(2)?,
        is_lifetime: row.get::<_, i64>(3)? != 0,
        cloud_access_token: row.get(4)?,
        cloud_refresh_token: row.get(5)?,
        cloud_token_expires_at: row.get(6)?,
        created_at: row.get(7)?,
    })
}

const MEETING_COLUMNS: &str = "id, owner, title, raw_notes, action_items, created_at, updated_at";

fn row_to_meeting(row: &rusqlite::Row) -> rusqlite::Result<Meeting> {
    let action_items_str: String = row.get(4)?;
    let action_items: ExtractionRecord =
        serde_json::from_str(&action_items_str).unwrap_or_default();
    Ok(Meeting {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        raw_notes: row.get(3)?,
        action_items,
        created_at: row.get(5)?,
        updated_at: row.get(6)?,
    })
}

const SESSION_COLUMNS: &str = "id, owner, title, participants, status, started_at, ended_at, meeting_id";

fn row_to_session(row: &rusqlite::Row) -> rusqlite::Result<LiveSession> {
    Ok(LiveSession {
        id: row.get(0)?,
        owner: row.get(1)?,
        title: row.get(2)?,
        participants: row.get(3)?,
        status: row.get(4)?,
        started_at: row.get(5)?,
        ended_at: row.get(6)?,
        meeting_id: row.get(7)?,
    })
}

fn row_to_segment(row: &rusqlite::Row) -> rusqlite::Result<TranscriptSegment> {
    Ok(TranscriptSegment {
        session_id: row.get(0)?,
        segment_index: row.get(1)?,
        text: row.get(2)?,
        timestamp_ms: row.get(3)?,
        speaker: row.get(4)?,
        is_final: row.get::<_, i64>(5)? != 0,
    })
}

fn row_to_tracked_issue(row: &rusqlite::Row) -> rusqlite::Result<TrackedIssue> {
    Ok(TrackedIssue {
        id: row.get(0)?,
        owner: row.get(1)?,
        issue_text: row.get(2)?,
        notes: row.get(3)?,
        source_meeting_id: row.get(4)?,
        source_meeting_title: row.get(5)?,
        resolved: row.get::<_, i64>(6)? != 0,
        created_at: row.get(7)?,
        resolved_at: row.get(8)?,
    })
}

impl Db {
    // --- Users ---

    pub fn find_user_by_id(&self, user_id: &str) -> Option<User> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![user_id],
            row_to_user,
        )
        .optional()
        .unwrap_or(None)
    }

    pub fn find_user_by_email(&self, email: &str) -> Option<User> {
        let normalized = email.trim().to_lowercase();
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?1"),
            params![normalized],
            row_to_user,
        )
        .optional()
        .unwrap_or(None)
    }

    pub fn create_user(&self, email: &str) -> rusqlite::Result<User> {
        let id = new_id();
        let now = chrono::Utc::now().to_rfc3339();
        let normalized = email.trim().to_lowercase();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO users (id, email, plan, is_lifetime, created_at) VALUES (?1, ?2, 'free', 0, ?3)",
            params![&id, &normalized, &now],
        )?;
        Ok(User {
            id,
            email: normalized,
            plan: "free".to_string(),
            is_lifetime: false,
            cloud_access_token: None,
            cloud_refresh_token: None,
            cloud_token_expires_at: None,
            created_at: now,
        })
    }

    /// Resolves a session cookie to its owning user, rejecting expired rows. Session
    /// creation itself is out of scope -- an external auth flow populates this table; this
    /// is the minimal read side the `AuthUser` request guard needs.
    pub fn find_user_by_session(&self, session_id: &str) -> Option<User> {
        let conn = self.conn.lock().unwrap();
        let now = chrono::Utc::now().to_rfc3339();
        let user_id: Option<String> = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE id = ?1 AND expires_at > ?2",
                params![session_id, &now],
                |r| r.get(0),
            )
            .optional()
            .unwrap_or(None);
        drop(conn);
        user_id.and_then(|uid| self.find_user_by_id(&uid))
    }

    /// Creates a session row for `user_id`, expiring after `ttl_days`. Exposed for test
    /// harnesses and the (out-of-scope) external auth flow to populate the boundary table.
    pub fn create_session(&self, user_id: &str, ttl_days: i64) -> rusqlite::Result<String> {
        let id = new_id();
        let expires_at = (chrono::Utc::now() + chrono::Duration::days(ttl_days)).to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO sessions (id, user_id, expires_at) VALUES (?1, ?2, ?3)",
            params![&id, user_id, &expires_at],
        )?;
        Ok(id)
    }

    /// Drops the lifetime guard, flips the flag, reinstalls the guard -- all inside one
    /// transaction, the only sanctioned way to clear `is_lifetime` once set.
    pub fn admin_override_lifetime(&self, user_id: &str, is_lifetime: bool) -> rusqlite::Result<()> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        drop_lifetime_guard(&tx);
        tx.execute(
            "UPDATE users SET is_lifetime = ?1 WHERE id = ?2",
            params![is_lifetime as i64, user_id],
        )?;
        install_lifetime_guard(&tx);
        tx.commit()
    }

    // --- Meetings ---

    pub fn create_meeting(
        &self,
        owner: &str,
        title: Option<&str>,
        raw_notes: &str,
        action_items: &ExtractionRecord,
    ) -> rusqlite::Result<Meeting> {
        let id = new_id();
        let now = chrono::Utc::now().to_rfc3339();
        let blob = serde_json::to_string(action_items).unwrap_or_else(|_| "{}".to_string());
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO meetings (id, owner, title, raw_notes, action_items, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![&id, owner, title, raw_notes, &blob, &now, &now],
        )?;
        Ok(Meeting {
            id,
            owner: owner.to_string(),
            title: title.map(String::from),
            raw_notes: raw_notes.to_string(),
            action_items: action_items.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    pub fn get_meeting_owned(&self, id: &str, owner: &str) -> Option<Meeting> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {MEETING_COLUMNS} FROM meetings WHERE id = ?1 AND owner = ?2"),
            params![id, owner],
            row_to_meeting,
        )
        .optional()
        .unwrap_or(None)
    }

    pub fn list_meetings_owned(&self, owner: &str) -> Vec<Meeting> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {MEETING_COLUMNS} FROM meetings WHERE owner = ?1 ORDER BY created_at DESC"
            ))
            .unwrap();
        stmt.query_map(params![owner], row_to_meeting)
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    /// Meetings owned by `owner` created strictly before `created_at`, descending -- used
    /// to find the single most recent predecessor of a focal meeting for insight diffing.
    pub fn list_meetings_before_owned(&self, owner: &str, created_at: &str) -> Vec<Meeting> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(&format!(
                "SELECT {MEETING_COLUMNS} FROM meetings WHERE owner = ?1 AND created_at < ?2 ORDER BY created_at DESC"
            ))
            .unwrap();
        stmt.query_map(params![owner, created_at], row_to_meeting)
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    pub fn count_meetings_owned(&self, owner: &str) -> i64 {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COUNT(*) FROM meetings WHERE owner = ?1",
            params![owner],
            |r| r.get(0),
        )
        .unwrap_or(0)
    }

    pub fn update_meeting_transcript(&self, id: &str, owner: &str, transcript: &str) -> bool {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE meetings SET raw_notes = ?1, updated_at = ?2 WHERE id = ?3 AND owner = ?4",
                params![transcript, &now, id, owner],
            )
            .unwrap_or(0);
        changed > 0
    }

    pub fn update_meeting_extraction(
        &self,
        id: &str,
        owner: &str,
        extraction: &ExtractionRecord,
    ) -> bool {
        let now = chrono::Utc::now().to_rfc3339();
        let blob = serde_json::to_string(extraction).unwrap_or_else(|_| "{}".to_string());
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE meetings SET action_items = ?1, updated_at = ?2 WHERE id = ?3 AND owner = ?4",
                params![&blob, &now, id, owner],
            )
            .unwrap_or(0);
        changed > 0
    }

    pub fn delete_meeting_owned(&self, id: &str, owner: &str) -> bool {
        let conn = self.conn.lock().unwrap();
        let deleted = conn
            .execute(
                "DELETE FROM meetings WHERE id = ?1 AND owner = ?2",
                params![id, owner],
            )
            .unwrap_or(0);
        deleted > 0
    }

    // --- Live sessions ---

    /// Starts a session for `owner` unless one is already active. The check and the
    /// insert share a transaction so the single-active-session invariant holds under
    /// concurrent start calls.
    pub fn create_live_session(
        &self,
        owner: &str,
        title: Option<&str>,
        participants: Option<&str>,
    ) -> rusqlite::Result<Result<LiveSession, LiveSession>> {
        let mut conn = self.conn.lock().unwrap();
        let tx = conn.transaction()?;
        let existing: Option<LiveSession> = tx
            .query_row(
                &format!(
                    "SELECT {SESSION_COLUMNS} FROM live_sessions WHERE owner = ?1 AND status = 'active'"
                ),
                params![owner],
                row_to_session,
            )
            .optional()?;

        if let Some(existing) = existing {
            tx.commit()?;
            return Ok(Err(existing));
        }

        let id = new_id();
        let now = chrono::Utc::now().to_rfc3339();
        tx.execute(
            "INSERT INTO live_sessions (id, owner, title, participants, status, started_at)
             VALUES (?1, ?2, ?3, ?4, 'active', ?5)",
            params![&id, owner, title, participants, &now],
        )?;
        tx.commit()?;

        Ok(Ok(LiveSession {
            id,
            owner: owner.to_string(),
            title: title.map(String::from),
            participants: participants.map(String::from),
            status: SessionStatus::Active.as_str().to_string(),
            started_at: now,
            ended_at: None,
            meeting_id: None,
        }))
    }

    pub fn find_active_live_session_by_user(&self, owner: &str) -> Option<LiveSession> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!(
                "SELECT {SESSION_COLUMNS} FROM live_sessions WHERE owner = ?1 AND status = 'active'"
            ),
            params![owner],
            row_to_session,
        )
        .optional()
        .unwrap_or(None)
    }

    pub fn get_live_session_owned(&self, id: &str, owner: &str) -> Option<LiveSession> {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            &format!("SELECT {SESSION_COLUMNS} FROM live_sessions WHERE id = ?1 AND owner = ?2"),
            params![id, owner],
            row_to_session,
        )
        .optional()
        .unwrap_or(None)
    }

    pub fn finalize_live_session(
        &self,
        id: &str,
        status: SessionStatus,
        meeting_id: Option<&str>,
    ) -> bool {
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE live_sessions SET status = ?1, ended_at = ?2, meeting_id = ?3 WHERE id = ?4",
                params![status.as_str(), &now, meeting_id, id],
            )
            .unwrap_or(0);
        changed > 0
    }

    // --- Transcript segments ---

    fn next_segment_index_for_session(&self, conn: &Connection, session_id: &str) -> i64 {
        let max: Option<i64> = conn
            .query_row(
                "SELECT MAX(segment_index) FROM transcript_segments WHERE live_session = ?1",
                params![session_id],
                |r| r.get(0),
            )
            .unwrap_or(None);
        max.map(|m| m + 1).unwrap_or(0)
    }

    /// Allocates the next segment index and inserts the row while holding the single
    /// store-wide write lock, so concurrent chunk arrivals for the same session cannot
    /// race onto the same index.
    pub fn insert_next_segment(
        &self,
        session_id: &str,
        text: &str,
        timestamp_ms: i64,
    ) -> rusqlite::Result<TranscriptSegment> {
        let conn = self.conn.lock().unwrap();
        let index = self.next_segment_index_for_session(&conn, session_id);
        conn.execute(
            "INSERT INTO transcript_segments (live_session, segment_index, text, timestamp_ms, speaker, is_final)
             VALUES (?1, ?2, ?3, ?4, ?5, 1)",
            params![session_id, index, text, timestamp_ms, SPEAKER_PLACEHOLDER],
        )?;
        Ok(TranscriptSegment {
            session_id: session_id.to_string(),
            segment_index: index,
            text: text.to_string(),
            timestamp_ms,
            speaker: SPEAKER_PLACEHOLDER.to_string(),
            is_final: true,
        })
    }

    pub fn list_segments_ordered(&self, session_id: &str) -> Vec<TranscriptSegment> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT live_session, segment_index, text, timestamp_ms, speaker, is_final
                 FROM transcript_segments WHERE live_session = ?1 ORDER BY segment_index ASC",
            )
            .unwrap();
        stmt.query_map(params![session_id], row_to_segment)
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    // --- Usage ---

    pub fn ensure_usage_row(&self, user_id: &str, month: &str) {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO usage (user_id, month, extracts) VALUES (?1, ?2, 0)
             ON CONFLICT(user_id, month) DO NOTHING",
            params![user_id, month],
        )
        .ok();
    }

    pub fn get_usage(&self, user_id: &str, month: &str) -> i64 {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT extracts FROM usage WHERE user_id = ?1 AND month = ?2",
            params![user_id, month],
            |r| r.get(0),
        )
        .unwrap_or(0)
    }

    /// Atomic upsert-with-increment so parallel consumes on the same (user, month) can't
    /// under-count.
    pub fn increment_usage(&self, user_id: &str, month: &str) {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO usage (user_id, month, extracts) VALUES (?1, ?2, 1)
             ON CONFLICT(user_id, month) DO UPDATE SET extracts = extracts + 1",
            params![user_id, month],
        )
        .ok();
    }

    pub fn sum_usage_all_time_for_user(&self, user_id: &str) -> i64 {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT COALESCE(SUM(extracts), 0) FROM usage WHERE user_id = ?1",
            params![user_id],
            |r| r.get(0),
        )
        .unwrap_or(0)
    }

    // --- Tracked issues ---

    pub fn create_tracked_issue(
        &self,
        owner: &str,
        issue_text: &str,
        source_meeting_id: Option<&str>,
        source_meeting_title: Option<&str>,
    ) -> TrackedIssue {
        let id = new_id();
        let now = chrono::Utc::now().to_rfc3339();
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO tracked_issues (id, owner, issue_text, source_meeting_id, source_meeting_title, resolved, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, 0, ?6)",
            params![&id, owner, issue_text, source_meeting_id, source_meeting_title, &now],
        )
        .ok();
        TrackedIssue {
            id,
            owner: owner.to_string(),
            issue_text: issue_text.to_string(),
            notes: None,
            source_meeting_id: source_meeting_id.map(String::from),
            source_meeting_title: source_meeting_title.map(String::from),
            resolved: false,
            created_at: now,
            resolved_at: None,
        }
    }

    /// Case-insensitive, trimmed match so re-surfacing the same unresolved item on a
    /// later insights fetch doesn't pile up duplicate rows.
    pub fn tracked_issue_exists_owned(&self, owner: &str, normalized_text: &str) -> bool {
        let conn = self.conn.lock().unwrap();
        conn.query_row(
            "SELECT 1 FROM tracked_issues WHERE owner = ?1 AND lower(trim(issue_text)) = ?2 LIMIT 1",
            params![owner, normalized_text],
            |_| Ok(()),
        )
        .optional()
        .unwrap_or(None)
        .is_some()
    }

    pub fn list_tracked_issues_owned(&self, owner: &str) -> Vec<TrackedIssue> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn
            .prepare(
                "SELECT id, owner, issue_text, notes, source_meeting_id, source_meeting_title, resolved, created_at, resolved_at
                 FROM tracked_issues WHERE owner = ?1 ORDER BY created_at DESC",
            )
            .unwrap();
        stmt.query_map(params![owner], row_to_tracked_issue)
            .unwrap()
            .filter_map(|r| r.ok())
            .collect()
    }

    pub fn toggle_tracked_issue_resolved_owned(&self, id: &str, owner: &str, resolved: bool) -> bool {
        let resolved_at = if resolved {
            Some(chrono::Utc::now().to_rfc3339())
        } else {
            None
        };
        let conn = self.conn.lock().unwrap();
        let changed = conn
            .execute(
                "UPDATE tracked_issues SET resolved = ?1, resolved_at = ?2 WHERE id = ?3 AND owner = ?4",
                params![resolved as i64, resolved_at, id, owner],
            )
            .unwrap_or(0);
        changed > 0
    }
}

//! Plan-based extract quota. Grounded on the teacher's upsert-counter idiom in `db.rs`
//! (read, decide, upsert against the same `Mutex<Connection>`) applied to a billing-style
//! counter instead of a sequence backfill.

use crate::db::Db;
use crate::models::UsageStatus;

const FREE_LIFETIME_CAP: i64 = 5;

fn monthly_cap(plan: &str) -> Option<i64> {
    match plan {
        "ltd" => Some(50),
        "fltd" => Some(100),
        "sub_basic" => Some(50),
        "sub_pro" => Some(100),
        _ => None,
    }
}

pub fn current_month() -> String {
    chrono::Utc::now().format("%Y-%m").to_string()
}

/// Checks whether `user_id` on `plan` may perform one more extraction this month
/// (or ever, for `free`), without consuming anything.
pub fn check(db: &Db, user_id: &str, plan: &str) -> UsageStatus {
    if plan == "free" {
        let used = db.sum_usage_all_time_for_user(user_id);
        let allowed = used < FREE_LIFETIME_CAP;
        return UsageStatus {
            allowed,
            used,
            max: Some(FREE_LIFETIME_CAP),
            message: if allowed {
                None
            } else {
                Some(format!(
                    "Free plan limit reached ({FREE_LIFETIME_CAP} extracts). Upgrade to continue."
                ))
            },
        };
    }

    let month = current_month();
    db.ensure_usage_row(user_id, &month);
    let used = db.get_usage(user_id, &month);
    let max = monthly_cap(plan);
    let allowed = max.map(|m| used < m).unwrap_or(true);

    UsageStatus {
        allowed,
        used,
        max,
        message: if allowed {
            None
        } else {
            Some(format!(
                "Monthly limit reached ({} extracts this month).",
                max.unwrap_or_default()
            ))
        },
    }
}

/// Records one successful extraction. Must be called only after the extraction itself
/// succeeded — a failed extraction must never consume quota.
pub fn consume(db: &Db, user_id: &str) {
    let month = current_month();
    db.increment_usage(user_id, &month);
}

/// Free-plan meeting storage cap, independent of the extract quota above.
pub fn meeting_quota_ok(db: &Db, user_id: &str, plan: &str) -> bool {
    if plan != "free" {
        return true;
    }
    db.count_meetings_owned(user_id) < 3
}

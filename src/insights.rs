//! Cross-meeting intelligence: six insight cards plus a pairwise what-changed diff.
//! Grounded on `keywords.rs` composed the way the teacher composes small derived-data
//! queries (SQL aggregation plus a thin in-Rust post-processing pass).

use std::collections::{HashMap, HashSet};

use crate::db::Db;
use crate::keywords::{keyword_set, keywords, people, titlecase};
use crate::models::{
    InsightCard, Meeting, RecurringParticipant, RecurringSolution, RecurringTopicMeeting,
    UnresolvedItem, WhatChanged,
};

const FOLLOW_UP_PHRASES: &[&str] = &[
    "follow up",
    "following up",
    "last time",
    "previously",
    "as discussed",
    "we agreed",
    "circling back",
    "checking in on",
    "update on",
];

fn normalize_task(task: &str) -> String {
    task.trim().to_lowercase()
}

/// Computes the insight cards for `focal` against `prior` (must already exclude `focal`).
pub fn compute_cards(focal: &Meeting, prior: &[Meeting]) -> Vec<InsightCard> {
    let mut cards = Vec::new();

    if let Some(card) = recurring_topics(focal, prior) {
        cards.push(card);
    }
    if let Some(card) = unresolved_items(focal, prior) {
        cards.push(card);
    }
    if let Some(card) = follow_up_signals(focal) {
        cards.push(card);
    }
    if let Some(card) = recurring_participants(focal, prior) {
        cards.push(card);
    }
    if let Some(card) = new_topics(focal, prior) {
        cards.push(card);
    }
    if let Some(card) = recurring_solutions(focal, prior) {
        cards.push(card);
    }

    cards
}

fn recurring_topics(focal: &Meeting, prior: &[Meeting]) -> Option<InsightCard> {
    let focal_kw = keyword_set(&focal.raw_notes);
    let mut shared_all: HashSet<String> = HashSet::new();
    let mut meetings = Vec::new();

    for m in prior {
        let prior_kw = keyword_set(&m.raw_notes);
        let shared: Vec<String> = focal_kw.intersection(&prior_kw).cloned().collect();
        if shared.len() >= 2 {
            shared_all.extend(shared.iter().cloned());
            meetings.push(RecurringTopicMeeting {
                meeting_id: m.id.clone(),
                title: m.title.clone(),
                shared,
            });
            if meetings.len() >= 5 {
                break;
            }
        }
    }

    if meetings.is_empty() {
        return None;
    }

    let mut shared_keywords: Vec<String> = shared_all.into_iter().collect();
    shared_keywords.sort();
    shared_keywords.truncate(6);

    Some(InsightCard::RecurringTopics {
        shared_keywords,
        meetings,
    })
}

fn unresolved_items(focal: &Meeting, prior: &[Meeting]) -> Option<InsightCard> {
    let focal_text = focal.raw_notes.to_lowercase();
    let mut seen_tasks = HashSet::new();
    let mut items = Vec::new();

    'outer: for m in prior {
        for item in &m.action_items.action_items {
            let normalized = normalize_task(&item.task);
            if normalized.is_empty() || seen_tasks.contains(&normalized) {
                continue;
            }
            let item_keywords = keywords(&item.task);
            let hit = item_keywords.iter().any(|kw| focal_text.contains(kw.as_str()));
            if hit {
                seen_tasks.insert(normalized);
                items.push(UnresolvedItem {
                    task: item.task.clone(),
                    source_meeting_id: m.id.clone(),
                    source_meeting_title: m.title.clone(),
                });
                if items.len() >= 5 {
                    break 'outer;
                }
            }
        }
    }

    if items.is_empty() {
        None
    } else {
        Some(InsightCard::UnresolvedItems { items })
    }
}

fn follow_up_signals(focal: &Meeting) -> Option<InsightCard> {
    let text = focal.raw_notes.to_lowercase();
    let phrases: Vec<String> = FOLLOW_UP_PHRASES
        .iter()
        .filter(|p| text.contains(*p))
        .map(|p| p.to_string())
        .collect();

    if phrases.is_empty() {
        None
    } else {
        Some(InsightCard::FollowUpSignals { phrases })
    }
}

fn recurring_participants(focal: &Meeting, prior: &[Meeting]) -> Option<InsightCard> {
    let focal_people: HashSet<String> = people(&focal.raw_notes).into_iter().collect();
    if focal_people.is_empty() {
        return None;
    }

    let mut counts: HashMap<String, usize> = HashMap::new();
    for m in prior {
        let prior_people: HashSet<String> = people(&m.raw_notes).into_iter().collect();
        for name in focal_people.intersection(&prior_people) {
            *counts.entry(name.clone()).or_insert(0) += 1;
        }
    }

    if counts.is_empty() {
        return None;
    }

    let mut ranked: Vec<(String, usize)> = counts.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

    let participants = ranked
        .into_iter()
        .take(5)
        .map(|(name, count)| RecurringParticipant {
            name: titlecase(&name),
            meeting_count: count + 1,
        })
        .collect();

    Some(InsightCard::RecurringParticipants { participants })
}

fn new_topics(focal: &Meeting, prior: &[Meeting]) -> Option<InsightCard> {
    let focal_kw = keywords(&focal.raw_notes);
    let prior_kw: HashSet<String> = prior
        .iter()
        .flat_map(|m| keyword_set(&m.raw_notes))
        .collect();

    let topics: Vec<String> = focal_kw
        .into_iter()
        .filter(|kw| !prior_kw.contains(kw))
        .take(8)
        .collect();

    if topics.is_empty() {
        None
    } else {
        Some(InsightCard::NewTopics { topics })
    }
}

fn recurring_solutions(focal: &Meeting, prior: &[Meeting]) -> Option<InsightCard> {
    let mut seen = HashSet::new();
    let mut solutions = Vec::new();

    'outer: for current in &focal.action_items.proposed_solutions {
        let current_kw = keyword_set(current);
        let mut matches = Vec::new();
        for m in prior {
            for prior_solution in &m.action_items.proposed_solutions {
                let overlap = current_kw.intersection(&keyword_set(prior_solution)).count();
                if overlap >= 2 {
                    matches.push(prior_solution.clone());
                }
            }
        }
        if !matches.is_empty() {
            let key = current.trim().to_lowercase();
            if seen.insert(key) {
                solutions.push(RecurringSolution {
                    current: current.clone(),
                    prior: matches,
                });
                if solutions.len() >= 5 {
                    break 'outer;
                }
            }
        }
    }

    if solutions.is_empty() {
        None
    } else {
        Some(InsightCard::RecurringSolutions { solutions })
    }
}

/// Auto-creates a `TrackedIssue` for every item the `unresolved_items` card surfaced,
/// skipping any the owner already has on file (by normalized task text) so re-fetching
/// insights doesn't pile up duplicates.
pub fn sync_tracked_issues(db: &Db, owner: &str, cards: &[InsightCard]) {
    for card in cards {
        let InsightCard::UnresolvedItems { items } = card else {
            continue;
        };
        for item in items {
            let normalized = normalize_task(&item.task);
            if normalized.is_empty() || db.tracked_issue_exists_owned(owner, &normalized) {
                continue;
            }
            db.create_tracked_issue(
                owner,
                &item.task,
                Some(&item.source_meeting_id),
                item.source_meeting_title.as_deref(),
            );
        }
    }
}

/// Finds the single most recent predecessor already excluded from `focal` and diffs
/// action items, proposed solutions, open questions, and transcript keyword sets.
pub fn what_changed(db: &Db, focal: &Meeting) -> WhatChanged {
    let candidates = db.list_meetings_before_owned(&focal.owner, &focal.created_at);
    let Some(prior) = candidates.first() else {
        return WhatChanged::default();
    };

    let focal_tasks: HashSet<String> = focal
        .action_items
        .action_items
        .iter()
        .map(|i| normalize_task(&i.task))
        .collect();
    let prior_tasks: HashSet<String> = prior
        .action_items
        .action_items
        .iter()
        .map(|i| normalize_task(&i.task))
        .collect();

    let focal_solutions: HashSet<String> = focal
        .action_items
        .proposed_solutions
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();
    let prior_solutions: HashSet<String> = prior
        .action_items
        .proposed_solutions
        .iter()
        .map(|s| s.trim().to_lowercase())
        .collect();

    let focal_questions: HashSet<String> = focal
        .action_items
        .open_questions
        .iter()
        .map(|q| q.trim().to_lowercase())
        .collect();
    let prior_questions: HashSet<String> = prior
        .action_items
        .open_questions
        .iter()
        .map(|q| q.trim().to_lowercase())
        .collect();

    let focal_topics = keyword_set(&focal.raw_notes);
    let prior_topics = keyword_set(&prior.raw_notes);

    WhatChanged {
        has_prior: true,
        prior_meeting_id: Some(prior.id.clone()),
        new_action_items: focal_tasks.difference(&prior_tasks).cloned().collect(),
        resolved_since_last: prior_tasks.difference(&focal_tasks).cloned().collect(),
        new_solutions: focal_solutions.difference(&prior_solutions).cloned().collect(),
        dropped_solutions: prior_solutions.difference(&focal_solutions).cloned().collect(),
        new_open_questions: focal_questions.difference(&prior_questions).cloned().collect(),
        resolved_open_questions: prior_questions.difference(&focal_questions).cloned().collect(),
        new_topics: focal_topics.difference(&prior_topics).cloned().collect(),
        dropped_topics: prior_topics.difference(&focal_topics).cloned().collect(),
    }
}

//! Replay of event logs into a repository.
//!
//! Users never share state, so each user's events are folded on their own
//! rayon task. Order is preserved within a user; order across users does
//! not matter.

use crate::error::Result;
use crate::event_log::LoggedEvent;
use crate::repository::{PendingSave, TasteRepository, Versioned};
use rayon::prelude::*;
use std::collections::BTreeMap;
use taste_model::{TasteEvent, UserId, UserTaste};
use tracing::{info, instrument};

/// What a replay touched
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplaySummary {
    pub events: usize,
    pub users: usize,
}

/// Group events by user, keeping each user's events in log order
pub fn group_by_user(events: &[LoggedEvent]) -> BTreeMap<UserId, Vec<&TasteEvent>> {
    let mut grouped: BTreeMap<UserId, Vec<&TasteEvent>> = BTreeMap::new();
    for logged in events {
        grouped.entry(logged.user_id).or_default().push(&logged.event);
    }
    grouped
}

/// Fold `events` on top of the given starting aggregates, in parallel per
/// user. Users without a starting aggregate begin fresh.
pub fn fold_events(
    mut start: BTreeMap<UserId, UserTaste>,
    events: &[LoggedEvent],
) -> BTreeMap<UserId, UserTaste> {
    let grouped = group_by_user(events);

    let jobs: Vec<(UserTaste, Vec<&TasteEvent>)> = grouped
        .into_iter()
        .map(|(user_id, user_events)| {
            let taste = start
                .remove(&user_id)
                .unwrap_or_else(|| UserTaste::new(user_id));
            (taste, user_events)
        })
        .collect();

    let folded: Vec<UserTaste> = jobs
        .into_par_iter()
        .map(|(taste, user_events)| taste.apply_all(user_events))
        .collect();

    start.extend(folded.into_iter().map(|taste| (taste.user_id, taste)));
    start
}

/// Replay `events` into `repo`, saving every touched user once.
///
/// Each user is loaded, folded and saved with its loaded version, so a
/// concurrent writer surfaces as a version conflict instead of being
/// overwritten. All users go through one batch save: on error nothing is
/// stored and the same log can be replayed again.
#[instrument(skip(repo, events), fields(events = events.len()))]
pub fn replay_events<R>(repo: &R, events: &[LoggedEvent]) -> Result<ReplaySummary>
where
    R: TasteRepository + ?Sized,
{
    let grouped = group_by_user(events);

    let mut loaded: Vec<(Versioned<UserTaste>, Vec<&TasteEvent>)> = Vec::with_capacity(grouped.len());
    for (user_id, user_events) in grouped {
        loaded.push((repo.load(user_id)?, user_events));
    }

    let batch: Vec<PendingSave> = loaded
        .into_par_iter()
        .map(|(current, user_events)| {
            let taste = current.value.apply_all(user_events);
            (taste.user_id, current.version, taste)
        })
        .collect();

    let users = batch.len();
    repo.save_all(batch)?;

    info!(events = events.len(), users, "replayed event log");
    Ok(ReplaySummary {
        events: events.len(),
        users,
    })
}

//! Per-participant availability — the single source of mutable truth.
//!
//! The store owns each participant's raw wall-clock intervals and chosen
//! timezone. Everything else (aggregation, projection) is a read-only
//! derivation over the store's current contents; no other component mutates
//! participant records.
//!
//! Writes auto-coalesce: after any successful [`AvailabilityStore::add_interval`],
//! a participant's list contains no two intervals that touch or overlap.
//! Edits via [`AvailabilityStore::update_interval`] deliberately do NOT
//! recoalesce — an overlap introduced by an edit stays visible until the next
//! add reruns coalescing over the whole list.
//!
//! Observers registered with [`AvailabilityStore::subscribe`] are invoked
//! synchronously after each successful mutation, within the same turn.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::algebra::MAX_COALESCE_PASSES;
use crate::error::{EngineError, Result};
use crate::interval::LocalInterval;
use crate::timezone;

/// Opaque participant key. Issued from a monotonic counter; never reused
/// within a store's lifetime.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct ParticipantId(pub u32);

/// Opaque key for one selected interval. Issued from a monotonic counter
/// shared across all participants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct IntervalId(pub u64);

/// One selected interval, in the owning participant's wall-clock time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectedInterval {
    pub id: IntervalId,
    pub span: LocalInterval,
}

/// A participant's record: chosen timezone (unset until selected) and raw
/// selected intervals, always in the participant's own local time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: ParticipantId,
    pub timezone: Option<Tz>,
    pub intervals: Vec<SelectedInterval>,
}

/// Partial edit applied by [`AvailabilityStore::update_interval`].
#[derive(Debug, Clone, Copy, Default)]
pub struct IntervalPatch {
    pub start: Option<NaiveDateTime>,
    pub end: Option<NaiveDateTime>,
}

/// Notification fired synchronously after each successful mutation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreChange {
    ParticipantAdded(ParticipantId),
    ParticipantRemoved(ParticipantId),
    TimezoneChanged(ParticipantId),
    IntervalsChanged(ParticipantId),
    /// The whole store was replaced from a snapshot (remote update).
    SnapshotRestored,
}

/// Handle returned by [`AvailabilityStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

type Observer = Box<dyn FnMut(StoreChange)>;

/// Serializable image of the store's persistent state. Observers are not
/// part of a snapshot. The id counters travel with the data so a restored
/// store never reissues an id that is live in the snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub participants: Vec<ParticipantRecord>,
    pub next_participant: u32,
    pub next_interval: u64,
}

#[derive(Default)]
pub struct AvailabilityStore {
    // BTreeMap keeps participant iteration order stable across mutations.
    participants: BTreeMap<ParticipantId, ParticipantRecord>,
    next_participant: u32,
    next_interval: u64,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl AvailabilityStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a participant with an empty interval list and unset timezone.
    pub fn add_participant(&mut self) -> ParticipantId {
        let id = ParticipantId(self.next_participant);
        self.next_participant += 1;
        self.participants.insert(
            id,
            ParticipantRecord {
                id,
                timezone: None,
                intervals: Vec::new(),
            },
        );
        self.notify(StoreChange::ParticipantAdded(id));
        id
    }

    /// Remove a participant's record and timezone entry together.
    /// No-op if the participant is absent.
    pub fn remove_participant(&mut self, id: ParticipantId) {
        if self.participants.remove(&id).is_some() {
            self.notify(StoreChange::ParticipantRemoved(id));
        }
    }

    /// Assign a participant's timezone from an IANA identifier.
    pub fn set_timezone(&mut self, id: ParticipantId, tz_id: &str) -> Result<()> {
        let tz = timezone::resolve(tz_id)?;
        let record = self.record_mut(id)?;
        record.timezone = Some(tz);
        self.notify(StoreChange::TimezoneChanged(id));
        Ok(())
    }

    /// Append a selected interval, then recoalesce the participant's list.
    ///
    /// Returns the id of the surviving interval that covers the added span —
    /// when the new span touches an existing selection, the existing
    /// interval widens and keeps its id.
    pub fn add_interval(&mut self, id: ParticipantId, span: LocalInterval) -> Result<IntervalId> {
        if span.start > span.end {
            return Err(EngineError::InvalidInterval {
                start: span.start.to_string(),
                end: span.end.to_string(),
            });
        }
        // Existence check before touching the counter: a failed mutation
        // must leave the store exactly as it was.
        if !self.participants.contains_key(&id) {
            return Err(EngineError::UnknownParticipant(id.0));
        }
        let new_id = IntervalId(self.next_interval);
        self.next_interval += 1;

        let record = self.record_mut(id)?;
        record.intervals.push(SelectedInterval { id: new_id, span });
        record.intervals = coalesce(std::mem::take(&mut record.intervals));

        let survivor = record
            .intervals
            .iter()
            .find(|iv| iv.span.start <= span.start && span.start <= iv.span.end)
            .map(|iv| iv.id)
            .unwrap_or(new_id);

        self.notify(StoreChange::IntervalsChanged(id));
        Ok(survivor)
    }

    /// Apply a partial start/end edit to one interval.
    ///
    /// The edited list is NOT recoalesced; see the module docs.
    pub fn update_interval(
        &mut self,
        id: ParticipantId,
        interval_id: IntervalId,
        patch: IntervalPatch,
    ) -> Result<()> {
        let record = self.record_mut(id)?;
        let iv = record
            .intervals
            .iter_mut()
            .find(|iv| iv.id == interval_id)
            .ok_or(EngineError::UnknownInterval(interval_id.0))?;

        let start = patch.start.unwrap_or(iv.span.start);
        let end = patch.end.unwrap_or(iv.span.end);
        iv.span = LocalInterval::new(start, end)?;

        self.notify(StoreChange::IntervalsChanged(id));
        Ok(())
    }

    /// Delete one interval from a participant's list.
    pub fn delete_interval(&mut self, id: ParticipantId, interval_id: IntervalId) -> Result<()> {
        let record = self.record_mut(id)?;
        let before = record.intervals.len();
        record.intervals.retain(|iv| iv.id != interval_id);
        if record.intervals.len() == before {
            return Err(EngineError::UnknownInterval(interval_id.0));
        }
        self.notify(StoreChange::IntervalsChanged(id));
        Ok(())
    }

    /// All participant records, in stable id order.
    pub fn participants(&self) -> impl Iterator<Item = &ParticipantRecord> {
        self.participants.values()
    }

    pub fn participant(&self, id: ParticipantId) -> Option<&ParticipantRecord> {
        self.participants.get(&id)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Register a change observer. Observers run synchronously, in
    /// registration order, after each successful mutation.
    pub fn subscribe(&mut self, observer: impl FnMut(StoreChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Drop an observer. No-op for an unknown handle.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.observers.retain(|(sub, _)| *sub != id);
    }

    /// Serializable image of the current state.
    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            participants: self.participants.values().cloned().collect(),
            next_participant: self.next_participant,
            next_interval: self.next_interval,
        }
    }

    /// Replace the store's contents from a snapshot (remote update path).
    /// Registered observers survive and are notified once.
    pub fn restore(&mut self, snapshot: StoreSnapshot) {
        self.participants = snapshot
            .participants
            .into_iter()
            .map(|record| (record.id, record))
            .collect();

        // The sync document gives no transactional guarantees, so a stale
        // counter must never reissue an id that is live in the data.
        let max_participant = self
            .participants
            .keys()
            .map(|id| id.0 + 1)
            .max()
            .unwrap_or(0);
        let max_interval = self
            .participants
            .values()
            .flat_map(|record| record.intervals.iter())
            .map(|iv| iv.id.0 + 1)
            .max()
            .unwrap_or(0);
        self.next_participant = snapshot.next_participant.max(max_participant);
        self.next_interval = snapshot.next_interval.max(max_interval);

        self.notify(StoreChange::SnapshotRestored);
    }

    fn record_mut(&mut self, id: ParticipantId) -> Result<&mut ParticipantRecord> {
        self.participants
            .get_mut(&id)
            .ok_or(EngineError::UnknownParticipant(id.0))
    }

    fn notify(&mut self, change: StoreChange) {
        for (_, observer) in self.observers.iter_mut() {
            observer(change);
        }
    }
}

/// Fixed-point coalescing over selected intervals. The representative of each
/// merged group is the earliest-inserted member; it keeps its id and widens.
fn coalesce(mut intervals: Vec<SelectedInterval>) -> Vec<SelectedInterval> {
    for _ in 0..MAX_COALESCE_PASSES {
        let before = intervals.len();
        intervals = coalesce_pass(intervals);
        if intervals.len() == before {
            break;
        }
    }
    intervals
}

fn coalesce_pass(intervals: Vec<SelectedInterval>) -> Vec<SelectedInterval> {
    let mut out: Vec<SelectedInterval> = Vec::new();
    for iv in intervals {
        match out
            .iter_mut()
            .find(|acc| acc.span.touches_or_overlaps(&iv.span))
        {
            Some(acc) => acc.span.absorb(&iv.span),
            None => out.push(iv),
        }
    }
    out
}

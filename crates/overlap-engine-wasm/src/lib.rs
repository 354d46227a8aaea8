//! WASM bindings for overlap-engine.
//!
//! Exposes the participant store, cross-participant intersection, and
//! per-participant projection to JavaScript via `wasm-bindgen`. All complex
//! types are passed as JSON strings.
//!
//! Wall-clock datetimes cross the boundary as `%Y-%m-%dT%H:%M:%S` strings
//! (the calendar widget's local-time format); canonical UTC instants as
//! RFC 3339.
//!
//! ## Build process
//!
//! ```sh
//! cargo build -p overlap-engine-wasm --target wasm32-unknown-unknown --release
//! wasm-bindgen --target web --out-dir packages/overlap-engine-js/wasm/ \
//!   target/wasm32-unknown-unknown/release/overlap_engine_wasm.wasm
//! ```

use chrono::NaiveDateTime;
use overlap_engine::store::{IntervalId, IntervalPatch, ParticipantId};
use overlap_engine::{
    aggregator, algebra, sync, AvailabilityStore, Category, LocalInterval, UtcInterval,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

// ---------------------------------------------------------------------------
// Serde-friendly DTOs for crossing the WASM boundary as JSON
// ---------------------------------------------------------------------------

/// A computed common-availability block, in either scale depending on the
/// query (canonical RFC 3339 or projected wall-clock).
#[derive(Serialize)]
struct SlotDto {
    start: String,
    end: String,
    category: Category,
}

/// One of a participant's own selections, tagged with its id so the calendar
/// widget can address edits and deletes.
#[derive(Serialize)]
struct SelectionDto {
    id: u64,
    start: String,
    end: String,
    category: Category,
}

/// Interval shape for stateless helpers; doubles as input and output.
#[derive(Serialize, Deserialize)]
struct IntervalInput {
    start: String,
    end: String,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Parse a wall-clock datetime string (e.g., "2026-03-16T09:00:00").
fn parse_local(s: &str) -> Result<NaiveDateTime, JsValue> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S")
        .map_err(|e| JsValue::from_str(&format!("Invalid datetime '{}': {}", s, e)))
}

fn format_local(dt: NaiveDateTime) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S").to_string()
}

fn parse_span(start: &str, end: &str) -> Result<LocalInterval, JsValue> {
    LocalInterval::new(parse_local(start)?, parse_local(end)?).map_err(to_js)
}

fn to_js(e: overlap_engine::EngineError) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn to_json<T: Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {}", e)))
}

// ---------------------------------------------------------------------------
// Stateful scheduler wrapper
// ---------------------------------------------------------------------------

/// A scheduling session: one availability store plus the queries the UI
/// renders from. Mutations are synchronous and side-effect-complete on
/// return; the UI re-queries after each one.
#[wasm_bindgen]
#[derive(Default)]
pub struct Scheduler {
    store: AvailabilityStore,
}

#[wasm_bindgen]
impl Scheduler {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Scheduler {
        Scheduler::default()
    }

    /// Create a participant; returns its id.
    #[wasm_bindgen(js_name = "addParticipant")]
    pub fn add_participant(&mut self) -> u32 {
        self.store.add_participant().0
    }

    /// Remove a participant and their timezone entry. No-op if absent.
    #[wasm_bindgen(js_name = "removeParticipant")]
    pub fn remove_participant(&mut self, participant: u32) {
        self.store.remove_participant(ParticipantId(participant));
    }

    /// Assign a participant's IANA timezone (e.g., "Europe/Berlin").
    #[wasm_bindgen(js_name = "setTimezone")]
    pub fn set_timezone(&mut self, participant: u32, timezone: &str) -> Result<(), JsValue> {
        self.store
            .set_timezone(ParticipantId(participant), timezone)
            .map_err(to_js)
    }

    /// Add a selected interval in the participant's local time. Returns the
    /// id of the surviving interval after coalescing.
    #[wasm_bindgen(js_name = "addInterval")]
    pub fn add_interval(
        &mut self,
        participant: u32,
        start: &str,
        end: &str,
    ) -> Result<u64, JsValue> {
        let span = parse_span(start, end)?;
        self.store
            .add_interval(ParticipantId(participant), span)
            .map(|id| id.0)
            .map_err(to_js)
    }

    /// Patch an interval's start and/or end (pass `null` to leave a bound
    /// unchanged).
    #[wasm_bindgen(js_name = "updateInterval")]
    pub fn update_interval(
        &mut self,
        participant: u32,
        interval: u64,
        start: Option<String>,
        end: Option<String>,
    ) -> Result<(), JsValue> {
        let patch = IntervalPatch {
            start: start.as_deref().map(parse_local).transpose()?,
            end: end.as_deref().map(parse_local).transpose()?,
        };
        self.store
            .update_interval(ParticipantId(participant), IntervalId(interval), patch)
            .map_err(to_js)
    }

    /// Delete one of a participant's intervals.
    #[wasm_bindgen(js_name = "deleteInterval")]
    pub fn delete_interval(&mut self, participant: u32, interval: u64) -> Result<(), JsValue> {
        self.store
            .delete_interval(ParticipantId(participant), IntervalId(interval))
            .map_err(to_js)
    }

    /// A participant's own selections as a JSON array of
    /// `{id, start, end, category}` objects in local wall-clock time.
    #[wasm_bindgen(js_name = "selectionsForParticipant")]
    pub fn selections_for_participant(&self, participant: u32) -> Result<String, JsValue> {
        let record = self
            .store
            .participant(ParticipantId(participant))
            .ok_or_else(|| JsValue::from_str(&format!("unknown participant: {}", participant)))?;

        let dtos: Vec<SelectionDto> = record
            .intervals
            .iter()
            .map(|iv| SelectionDto {
                id: iv.id.0,
                start: format_local(iv.span.start),
                end: format_local(iv.span.end),
                category: Category::Selection,
            })
            .collect();
        to_json(&dtos)
    }

    /// The common availability across all participants, on the canonical UTC
    /// scale, as a JSON array of `{start, end, category}` objects with
    /// RFC 3339 datetimes.
    #[wasm_bindgen(js_name = "computeIntersection")]
    pub fn compute_intersection(&self) -> Result<String, JsValue> {
        let slots = aggregator::compute_intersection(&self.store).map_err(to_js)?;

        let dtos: Vec<SlotDto> = slots
            .iter()
            .map(|iv: &UtcInterval| SlotDto {
                start: iv.start.to_rfc3339(),
                end: iv.end.to_rfc3339(),
                category: Category::Intersection,
            })
            .collect();
        to_json(&dtos)
    }

    /// The common availability shifted into one participant's wall clock.
    /// Returns `null` when the participant has not chosen a timezone yet —
    /// the UI shows its "select a timezone first" state instead.
    #[wasm_bindgen(js_name = "projectForParticipant")]
    pub fn project_for_participant(&self, participant: u32) -> Result<Option<String>, JsValue> {
        let projected = aggregator::project_for_participant(&self.store, ParticipantId(participant))
            .map_err(to_js)?;

        let Some(slots) = projected else {
            return Ok(None);
        };
        let dtos: Vec<SlotDto> = slots
            .iter()
            .map(|iv| SlotDto {
                start: format_local(iv.start),
                end: format_local(iv.end),
                category: Category::Intersection,
            })
            .collect();
        to_json(&dtos).map(Some)
    }

    /// Serialize the session state for the external sync document.
    #[wasm_bindgen(js_name = "snapshot")]
    pub fn snapshot(&self) -> Result<String, JsValue> {
        sync::encode_snapshot(&self.store.snapshot()).map_err(to_js)
    }

    /// Replace the session state from a serialized snapshot (the sync
    /// document's remote-update callback delivers these).
    #[wasm_bindgen(js_name = "restore")]
    pub fn restore(&mut self, state: &str) -> Result<(), JsValue> {
        sync::apply_remote(&mut self.store, state).map_err(to_js)
    }
}

// ---------------------------------------------------------------------------
// Stateless helpers
// ---------------------------------------------------------------------------

/// Coalesce a JSON array of `{start, end}` wall-clock intervals into a
/// minimal non-overlapping set, preserving first-absorbed order.
#[wasm_bindgen(js_name = "mergeOverlapping")]
pub fn merge_overlapping(intervals_json: &str) -> Result<String, JsValue> {
    let inputs: Vec<IntervalInput> = serde_json::from_str(intervals_json)
        .map_err(|e| JsValue::from_str(&format!("Invalid intervals JSON: {}", e)))?;

    let intervals: Vec<LocalInterval> = inputs
        .iter()
        .map(|input| parse_span(&input.start, &input.end))
        .collect::<Result<_, _>>()?;

    let merged = algebra::merge_overlapping(&intervals);

    let outputs: Vec<IntervalInput> = merged
        .iter()
        .map(|iv| IntervalInput {
            start: format_local(iv.start),
            end: format_local(iv.end),
        })
        .collect();
    to_json(&outputs)
}

//! Event catalog.
//!
//! The catalog is the built-in sample events followed by whatever events have
//! been saved under the [`EVENTS_KEY`] storage key. Saved records are loosely
//! shaped JSON; they are normalized into [`Event`] once, on load, so the rest
//! of the crate only ever sees complete records.

use std::fmt;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::storage::LocalStorage;

/// Storage key holding the JSON array of saved events.
pub const EVENTS_KEY: &str = "events";

/// Display format for [`Event::date`], e.g. `Dec 15, 2024`.
pub const DATE_FORMAT: &str = "%b %-d, %Y";

/// Identifier of an event. Sample events use numbers; saved events may use
/// either form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    /// Numeric identifier.
    Number(i64),
    /// Free-form identifier.
    Text(String),
}

impl EventId {
    /// Whether this id refers to the event named by `raw`, ignoring whether
    /// either side was stored as a number or a string.
    #[must_use]
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Number(n) => raw.trim().parse::<i64>().is_ok_and(|r| r == *n),
            Self::Text(s) => s == raw,
        }
    }

    fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Number(n) => n.as_i64().map(Self::Number),
            Value::String(s) if !s.is_empty() => Some(Self::Text(s.clone())),
            _ => None,
        }
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

/// A schedulable activity with its attendance and certificate counters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Event identifier.
    pub id: EventId,
    /// Display name.
    pub name: String,
    /// Human-readable date, e.g. `Dec 15, 2024`.
    pub date: String,
    /// Registered participants.
    pub participants: u64,
    /// Participants who attended.
    pub attended: u64,
    /// Participants who submitted an evaluation.
    pub evaluated: u64,
    /// Certificates issued.
    pub certificates: u64,
    /// Cover image as a data URI or URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cover_image: Option<String>,
    /// Start time as entered, e.g. `09:00`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_time: Option<String>,
    /// End time as entered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    /// Venue name.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub venue: Option<String>,
}

impl Event {
    /// Case-insensitive substring match on the event name.
    #[must_use]
    pub fn name_matches(&self, term: &str) -> bool {
        self.name.to_lowercase().contains(&term.to_lowercase())
    }

    /// `start - end` when both times are set.
    #[must_use]
    pub fn time_range(&self) -> Option<String> {
        match (&self.start_time, &self.end_time) {
            (Some(start), Some(end)) => Some(format!("{start} - {end}")),
            _ => None,
        }
    }

    /// Build an event from one loosely-shaped saved record.
    ///
    /// Missing counters become 0 and missing or empty optional text fields
    /// become `None`. Returns `None` only when the record has no usable id.
    #[must_use]
    pub fn normalize(record: &Map<String, Value>) -> Option<Self> {
        let id = record.get("id").and_then(EventId::from_value)?;
        Some(Self {
            id,
            name: text(record, "name").unwrap_or_default(),
            date: text(record, "date").unwrap_or_default(),
            participants: counter(record, "participants"),
            attended: counter(record, "attended"),
            evaluated: counter(record, "evaluated"),
            certificates: counter(record, "certificates"),
            cover_image: text(record, "coverImage"),
            start_time: text(record, "startTime"),
            end_time: text(record, "endTime"),
            venue: text(record, "venue"),
        })
    }
}

fn text(record: &Map<String, Value>, field: &str) -> Option<String> {
    match record.get(field) {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    }
}

fn counter(record: &Map<String, Value>, field: &str) -> u64 {
    match record.get(field) {
        Some(Value::Number(n)) => n.as_u64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Fields supplied when creating an event.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewEvent {
    /// Display name.
    pub name: String,
    /// Calendar date; stored in [`DATE_FORMAT`].
    pub date: Option<NaiveDate>,
    /// Expected participants.
    pub participants: u64,
    /// Cover image as a data URI or URL.
    pub cover_image: Option<String>,
    /// Start time as entered.
    pub start_time: Option<String>,
    /// End time as entered.
    pub end_time: Option<String>,
    /// Venue name.
    pub venue: Option<String>,
}

/// The events shipped with the portal.
#[must_use]
pub fn sample_events() -> Vec<Event> {
    vec![
        Event {
            id: EventId::Number(1),
            name: "Python Workshop".to_string(),
            date: "Dec 15, 2024".to_string(),
            participants: 32,
            attended: 28,
            evaluated: 25,
            certificates: 25,
            cover_image: None,
            start_time: None,
            end_time: None,
            venue: None,
        },
        Event {
            id: EventId::Number(2),
            name: "Leadership Seminar".to_string(),
            date: "Dec 18, 2024".to_string(),
            participants: 50,
            attended: 48,
            evaluated: 45,
            certificates: 45,
            cover_image: None,
            start_time: None,
            end_time: None,
            venue: None,
        },
    ]
}

/// Sample events plus saved events, backed by a [`LocalStorage`].
#[derive(Debug, Clone)]
pub struct EventCatalog<S> {
    storage: S,
    include_samples: bool,
}

impl<S: LocalStorage> EventCatalog<S> {
    /// Catalog that lists the sample events ahead of saved ones.
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            include_samples: true,
        }
    }

    /// Show or hide the built-in sample events.
    #[must_use]
    pub fn with_samples(mut self, include_samples: bool) -> Self {
        self.include_samples = include_samples;
        self
    }

    /// Saved events, normalized. Unreadable storage yields an empty list.
    pub fn saved_events(&self) -> Vec<Event> {
        let raw = match self.storage.get(EVENTS_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(err) => {
                warn!(error = %err, "failed to read saved events");
                return Vec::new();
            }
        };

        let records = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => records,
            Ok(_) => {
                warn!("saved events are not a JSON array, ignoring them");
                return Vec::new();
            }
            Err(err) => {
                warn!(error = %err, "ignoring malformed saved events");
                return Vec::new();
            }
        };

        records
            .iter()
            .filter_map(|record| {
                let event = record.as_object().and_then(Event::normalize);
                if event.is_none() {
                    warn!(%record, "dropping saved event without a usable id");
                }
                event
            })
            .collect()
    }

    /// Every event, samples first.
    pub fn list(&self) -> Vec<Event> {
        let mut events = if self.include_samples {
            sample_events()
        } else {
            Vec::new()
        };
        events.extend(self.saved_events());
        events
    }

    /// Events whose name contains `term`, ignoring case. An empty term
    /// matches everything.
    pub fn search(&self, term: &str) -> Vec<Event> {
        self.list()
            .into_iter()
            .filter(|event| event.name_matches(term))
            .collect()
    }

    /// Look up one event.
    ///
    /// # Errors
    ///
    /// Returns [`Error::EventNotFound`] if no listed event has this id.
    pub fn get(&self, id: &str) -> Result<Event> {
        self.list()
            .into_iter()
            .find(|event| event.id.matches(id))
            .ok_or_else(|| Error::event_not_found(id))
    }

    /// Save a new event and return it with its assigned id.
    ///
    /// The new record is appended to the stored list as is; existing records,
    /// including ones the read path cannot normalize, are written back
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableEvents`] rather than overwriting stored
    /// content that is not a JSON array, or an error if storage fails.
    pub fn create(&self, new: NewEvent) -> Result<Event> {
        let mut records = self.stored_records()?;

        let mut next_id = Utc::now().timestamp_millis();
        while records
            .iter()
            .any(|record| record_id(record) == Some(EventId::Number(next_id)))
        {
            next_id += 1;
        }

        let event = Event {
            id: EventId::Number(next_id),
            name: new.name,
            date: new
                .date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
            participants: new.participants,
            attended: 0,
            evaluated: 0,
            certificates: 0,
            cover_image: new.cover_image.filter(|s| !s.is_empty()),
            start_time: new.start_time.filter(|s| !s.is_empty()),
            end_time: new.end_time.filter(|s| !s.is_empty()),
            venue: new.venue.filter(|s| !s.is_empty()),
        };

        records.push(serde_json::to_value(&event)?);
        self.write_records(&records)?;
        info!(id = %event.id, name = %event.name, "event created");
        Ok(event)
    }

    /// Delete a saved event. Returns `false` if no saved event has this id;
    /// sample events are built in and are never removed.
    ///
    /// Only records whose id matches are removed; every other stored record
    /// is written back exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnreadableEvents`] if the stored list is not a JSON
    /// array, or an error if storage fails.
    pub fn delete(&self, id: &str) -> Result<bool> {
        let records = self.stored_records()?;
        let before = records.len();
        let remaining: Vec<Value> = records
            .into_iter()
            .filter(|record| !record_id(record).is_some_and(|rid| rid.matches(id)))
            .collect();

        if remaining.len() == before {
            debug!(id, "no saved event to delete");
            return Ok(false);
        }

        self.write_records(&remaining)?;
        info!(id, "event deleted");
        Ok(true)
    }

    /// The stored records exactly as saved. A missing key is an empty list.
    fn stored_records(&self) -> Result<Vec<Value>> {
        let Some(raw) = self.storage.get(EVENTS_KEY)? else {
            return Ok(Vec::new());
        };

        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Array(records)) => Ok(records),
            Ok(_) => {
                warn!("refusing to overwrite saved events that are not a JSON array");
                Err(Error::unreadable_events("stored value is not a JSON array"))
            }
            Err(err) => {
                warn!(error = %err, "refusing to overwrite malformed saved events");
                Err(Error::unreadable_events(err.to_string()))
            }
        }
    }

    fn write_records(&self, records: &[Value]) -> Result<()> {
        let json = serde_json::to_string(records)?;
        self.storage.set(EVENTS_KEY, &json)
    }
}

fn record_id(record: &Value) -> Option<EventId> {
    record.get("id").and_then(EventId::from_value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn catalog_with(raw: &str) -> EventCatalog<MemoryStorage> {
        EventCatalog::new(MemoryStorage::with_entries([(EVENTS_KEY, raw)]))
    }

    fn new_event(name: &str) -> NewEvent {
        NewEvent {
            name: name.to_string(),
            date: NaiveDate::from_ymd_opt(2025, 3, 7),
            ..NewEvent::default()
        }
    }

    #[test]
    fn test_empty_storage_lists_samples() {
        let catalog = EventCatalog::new(MemoryStorage::new());
        let names: Vec<_> = catalog.list().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Python Workshop", "Leadership Seminar"]);
        assert!(catalog.saved_events().is_empty());
    }

    #[test]
    fn test_without_samples() {
        let catalog = EventCatalog::new(MemoryStorage::new()).with_samples(false);
        assert!(catalog.list().is_empty());
    }

    #[test]
    fn test_saved_events_follow_samples() {
        let catalog = catalog_with(r#"[{"id": "abc", "name": "Robotics Expo", "date": "Jan 5, 2025"}]"#);
        let events = catalog.list();
        assert_eq!(events.len(), 3);
        assert_eq!(events[2].id, EventId::Text("abc".to_string()));
        assert_eq!(events[2].name, "Robotics Expo");
    }

    #[test]
    fn test_normalize_fills_defaults() {
        let catalog = catalog_with(r#"[{"id": 7, "name": "Hackathon", "participants": null, "venue": ""}]"#);
        let event = &catalog.saved_events()[0];
        assert_eq!(event.id, EventId::Number(7));
        assert_eq!(event.date, "");
        assert_eq!(event.participants, 0);
        assert_eq!(event.attended, 0);
        assert_eq!(event.evaluated, 0);
        assert_eq!(event.certificates, 0);
        assert_eq!(event.venue, None);
        assert_eq!(event.cover_image, None);
    }

    #[test]
    fn test_normalize_accepts_numeric_strings() {
        let catalog = catalog_with(r#"[{"id": 3, "name": "Tour", "participants": "12", "attended": -4}]"#);
        let event = &catalog.saved_events()[0];
        assert_eq!(event.participants, 12);
        assert_eq!(event.attended, 0);
    }

    #[test]
    fn test_records_without_id_are_dropped() {
        crate::logging::init_test_logging();
        let catalog = catalog_with(r#"[{"name": "No id"}, 5, {"id": 9, "name": "Kept"}]"#);
        let saved = catalog.saved_events();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].name, "Kept");
    }

    #[test]
    fn test_malformed_storage_fails_open() {
        for raw in ["not json", "{\"id\": 1}", "null", ""] {
            let catalog = catalog_with(raw);
            assert!(catalog.saved_events().is_empty(), "raw value {raw:?}");
            assert_eq!(catalog.list().len(), 2);
        }
    }

    #[test]
    fn test_search_is_case_insensitive() {
        let catalog = EventCatalog::new(MemoryStorage::new());
        let found = catalog.search("WORKSHOP");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Python Workshop");

        assert_eq!(catalog.search("").len(), 2);
        assert!(catalog.search("gala").is_empty());
    }

    #[test]
    fn test_get_matches_number_or_string_form() {
        let catalog = catalog_with(r#"[{"id": "evt-x", "name": "X"}]"#);
        assert_eq!(catalog.get("1").unwrap().name, "Python Workshop");
        assert_eq!(catalog.get("evt-x").unwrap().name, "X");
        assert!(catalog.get("404").unwrap_err().is_not_found());
    }

    #[test]
    fn test_create_persists_and_formats_date() {
        let catalog = EventCatalog::new(MemoryStorage::new());
        let mut new = new_event("Career Fair");
        new.venue = Some("Main Hall".to_string());
        new.start_time = Some("09:00".to_string());
        new.end_time = Some(String::new());

        let created = catalog.create(new).unwrap();
        assert_eq!(created.date, "Mar 7, 2025");
        assert_eq!(created.venue.as_deref(), Some("Main Hall"));
        assert_eq!(created.end_time, None);
        assert_eq!(created.time_range(), None);

        let saved = catalog.saved_events();
        assert_eq!(saved, vec![created.clone()]);
        assert_eq!(catalog.get(&created.id.to_string()).unwrap(), created);
    }

    #[test]
    fn test_create_assigns_distinct_ids() {
        let catalog = EventCatalog::new(MemoryStorage::new());
        let a = catalog.create(new_event("A")).unwrap();
        let b = catalog.create(new_event("B")).unwrap();
        assert_ne!(a.id, b.id);
        assert_eq!(catalog.saved_events().len(), 2);
    }

    #[test]
    fn test_saved_json_uses_camel_case() {
        let storage = MemoryStorage::new();
        let catalog = EventCatalog::new(&storage);
        let mut new = new_event("Gala");
        new.start_time = Some("18:00".to_string());
        catalog.create(new).unwrap();

        let raw = storage.get(EVENTS_KEY).unwrap().unwrap();
        assert!(raw.contains("\"startTime\":\"18:00\""));
        assert!(!raw.contains("endTime"));
    }

    #[test]
    fn test_delete_removes_only_matching_saved_event() {
        let catalog = catalog_with(r#"[{"id": 10, "name": "Keep"}, {"id": "11", "name": "Drop"}]"#);
        assert!(catalog.delete("11").unwrap());
        let names: Vec<_> = catalog.saved_events().into_iter().map(|e| e.name).collect();
        assert_eq!(names, vec!["Keep"]);

        assert!(!catalog.delete("11").unwrap());
    }

    #[test]
    fn test_delete_leaves_other_records_untouched() {
        let storage = MemoryStorage::with_entries([(
            EVENTS_KEY,
            r#"[{"id":1.5,"name":"Float id"},{"name":"No id"},{"id":10,"name":"Keep","organizer":"CS Dept"},{"id":11,"name":"Drop"}]"#,
        )]);
        let catalog = EventCatalog::new(&storage);

        assert!(catalog.delete("11").unwrap());
        assert_eq!(
            storage.get(EVENTS_KEY).unwrap().as_deref(),
            Some(r#"[{"id":1.5,"name":"Float id"},{"name":"No id"},{"id":10,"name":"Keep","organizer":"CS Dept"}]"#)
        );
    }

    #[test]
    fn test_create_keeps_existing_records_verbatim() {
        let storage = MemoryStorage::with_entries([(
            EVENTS_KEY,
            r#"[{"name":"No id"},{"id":"x","name":"Extra","organizer":"CS Dept"}]"#,
        )]);
        let catalog = EventCatalog::new(&storage);
        let created = catalog.create(new_event("Fresh")).unwrap();

        let raw = storage.get(EVENTS_KEY).unwrap().unwrap();
        let records: Vec<Value> = serde_json::from_str(&raw).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0], serde_json::json!({"name": "No id"}));
        assert_eq!(records[1]["organizer"], "CS Dept");
        assert_eq!(record_id(&records[2]), Some(created.id));
    }

    #[test]
    fn test_writes_refuse_unreadable_content() {
        crate::logging::init_test_logging();
        for raw in ["not json", "{\"id\": 1}"] {
            let storage = MemoryStorage::with_entries([(EVENTS_KEY, raw)]);
            let catalog = EventCatalog::new(&storage);

            let err = catalog.create(new_event("Fresh")).unwrap_err();
            assert!(matches!(err, Error::UnreadableEvents { .. }), "raw value {raw:?}");
            assert!(catalog.delete("1").is_err());
            assert_eq!(storage.get(EVENTS_KEY).unwrap().as_deref(), Some(raw));
        }
    }

    #[test]
    fn test_delete_sample_is_a_no_op() {
        let catalog = EventCatalog::new(MemoryStorage::new());
        assert!(!catalog.delete("1").unwrap());
        assert_eq!(catalog.list().len(), 2);
    }

    #[test]
    fn test_event_id_matching() {
        assert!(EventId::Number(42).matches("42"));
        assert!(EventId::Number(42).matches(" 42 "));
        assert!(!EventId::Number(42).matches("042x"));
        assert!(EventId::Text("42".to_string()).matches("42"));
        assert!(!EventId::Text("a".to_string()).matches("A"));
    }

    #[test]
    fn test_time_range() {
        let mut event = sample_events().remove(0);
        event.start_time = Some("13:00".to_string());
        event.end_time = Some("15:00".to_string());
        assert_eq!(event.time_range().as_deref(), Some("13:00 - 15:00"));
    }
}

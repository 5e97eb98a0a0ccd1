//! Form controller that sits between raw keystrokes and the record store.
//!
//! The workflow owns the four pending inputs and the "saved" broadcast. It
//! never talks to the terminal; the UI layer calls the setters per keystroke
//! and [`EntryWorkflow::submit`] on Enter.

use std::sync::mpsc::{self, Receiver, SyncSender, TrySendError};

use log::{debug, info};

use crate::db::{DbResult, RecordStore};
use crate::models::{Field, Record};

/// One-shot acknowledgement that a record was written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SaveEvent;

/// Outcome of [`EntryWorkflow::submit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The record was stored and the form cleared.
    Saved(Record),
    /// Nothing was written; these fields are still empty.
    Incomplete(Vec<Field>),
}

/// Hot broadcast for [`SaveEvent`]s. Each listener gets a single-slot channel:
/// an event that finds the slot occupied is dropped for that listener, and a
/// listener that subscribes after an emission never sees it.
#[derive(Default)]
pub struct SavedSignal {
    listeners: Vec<SyncSender<SaveEvent>>,
}

impl SavedSignal {
    pub fn subscribe(&mut self) -> Receiver<SaveEvent> {
        let (tx, rx) = mpsc::sync_channel(1);
        self.listeners.push(tx);
        rx
    }

    /// Deliver one event to every current listener. Returns how many
    /// listeners actually received it.
    pub fn emit(&mut self) -> usize {
        let mut delivered = 0;
        self.listeners
            .retain(|listener| match listener.try_send(SaveEvent) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                Err(TrySendError::Full(_)) => true,
                Err(TrySendError::Disconnected(_)) => false,
            });
        delivered
    }
}

/// Pending input plus the saved broadcast for one form session.
#[derive(Default)]
pub struct EntryWorkflow {
    pending: Record,
    saved: SavedSignal,
}

impl EntryWorkflow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrite one pending field. No validation happens here.
    pub fn set_field(&mut self, field: Field, value: impl Into<String>) {
        let value = value.into();
        match field {
            Field::FirstName => self.pending.first_name = value,
            Field::LastName => self.pending.last_name = value,
            Field::Age => self.pending.age = value,
            Field::PhoneNumber => self.pending.phone_number = value,
        }
    }

    pub fn field(&self, field: Field) -> &str {
        self.pending.value(field)
    }

    /// True iff every field holds at least one character. Whitespace counts.
    pub fn validate(&self) -> bool {
        Field::ALL
            .iter()
            .all(|field| !self.pending.value(*field).is_empty())
    }

    /// Fields that would make [`validate`](Self::validate) fail, in focus order.
    pub fn missing_fields(&self) -> Vec<Field> {
        Field::ALL
            .into_iter()
            .filter(|field| self.pending.value(*field).is_empty())
            .collect()
    }

    /// Store the pending values as a new record and clear the form.
    ///
    /// This does not re-check [`validate`](Self::validate); empty fields are
    /// stored as empty strings. On a storage error the pending values are
    /// kept so nothing typed is lost.
    pub fn save(&mut self, store: &mut RecordStore) -> DbResult<Record> {
        let mut record = Record {
            id: None,
            ..self.pending.clone()
        };
        let id = store.insert(&record)?;
        record.id = Some(id);
        self.clear();
        Ok(record)
    }

    /// Tell current listeners that a save completed.
    pub fn notify_saved(&mut self) {
        let delivered = self.saved.emit();
        debug!("event=save_notify module=workflow status=ok listeners={delivered}");
    }

    pub fn subscribe_saved(&mut self) -> Receiver<SaveEvent> {
        self.saved.subscribe()
    }

    /// Clear the form without writing anything.
    pub fn reset(&mut self) {
        self.clear();
        info!("event=form_reset module=workflow status=ok");
    }

    /// Validate, save and notify in one step. Incomplete forms are left
    /// untouched.
    pub fn submit(&mut self, store: &mut RecordStore) -> DbResult<Submission> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            let names: Vec<&str> = missing.iter().map(|field| field.column()).collect();
            info!(
                "event=form_submit module=workflow status=incomplete missing={}",
                names.join(",")
            );
            return Ok(Submission::Incomplete(missing));
        }

        let record = self.save(store)?;
        self.notify_saved();
        info!(
            "event=form_submit module=workflow status=ok id={}",
            record.id.unwrap_or_default()
        );
        Ok(Submission::Saved(record))
    }

    fn clear(&mut self) {
        self.pending = Record::default();
    }
}

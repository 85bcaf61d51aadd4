//! Items page view model
//!
//! The single-page UI: a pending-input buffer, the item list, and three
//! actions (add, save, reset). Actions never propagate faults; each one
//! clears the previous error and records a new one on failure, so the
//! rendered page always shows the outcome of the last action.

use crate::session::{InitOutcome, LocalStoreSession};
use crate::storage::KeyValueStore;
use localstore_core::errors::ExError;
use localstore_core::model::Item;

const TITLE: &str = "Local items (embedded SQLite)";

pub struct ItemsPage<S: KeyValueStore> {
    session: LocalStoreSession<S>,
    input: String,
    last_error: Option<ExError>,
}

impl<S: KeyValueStore> ItemsPage<S> {
    pub fn new(session: LocalStoreSession<S>) -> Self {
        Self {
            session,
            input: String::new(),
            last_error: None,
        }
    }

    /// Initialize the underlying session
    ///
    /// A recovered start still mounts the page; its cause becomes the
    /// visible error.
    pub fn mount(&mut self) -> bool {
        let result = self.session.initialize();
        self.settle_init(result)
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    /// Insert the pending input; the buffer is cleared once a row is added
    pub fn add(&mut self) -> bool {
        self.last_error = None;
        match self.session.insert(&self.input) {
            Ok(Some(_)) => {
                self.input.clear();
                true
            }
            Ok(None) => false,
            Err(e) => {
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn save(&mut self) -> bool {
        self.last_error = None;
        match self.session.persist() {
            Ok(()) => true,
            Err(e) => {
                self.last_error = Some(e);
                false
            }
        }
    }

    pub fn reset(&mut self) -> bool {
        self.last_error = None;
        let result = self.session.reset();
        self.settle_init(result)
    }

    pub fn items(&self) -> &[Item] {
        self.session.items()
    }

    pub fn last_error(&self) -> Option<&ExError> {
        self.last_error.as_ref()
    }

    pub fn session(&self) -> &LocalStoreSession<S> {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut LocalStoreSession<S> {
        &mut self.session
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(TITLE);
        out.push('\n');

        if self.items().is_empty() {
            out.push_str("  (no items)\n");
        }
        for item in self.items() {
            out.push_str(&format!("  {}\n", item));
        }
        if let Some(err) = &self.last_error {
            out.push_str(&format!("error: {}\n", err));
        }
        out
    }

    fn settle_init(&mut self, result: crate::Result<InitOutcome>) -> bool {
        match result {
            Ok(InitOutcome::Recovered { cause }) => {
                self.last_error = Some(cause);
                true
            }
            Ok(_) => true,
            Err(e) => {
                self.last_error = Some(e);
                false
            }
        }
    }
}

//! Client-side cache of patients and diagnoses.
//!
//! State only changes through [`reduce`]. [`Store`] pairs the state with the
//! fetch fences so responses from remote reads are applied in issue order.

mod fencing;
mod reducer;

pub use fencing::*;
pub use reducer::*;

use crate::models::Patient;

/// State plus fetch fences.
#[derive(Debug, Default)]
pub struct Store {
    state: State,
    fences: FetchFences,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> &State {
        &self.state
    }

    /// Apply an action unconditionally.
    pub fn dispatch(&mut self, action: Action) {
        let state = std::mem::take(&mut self.state);
        self.state = reduce(state, action);
    }

    /// Issue a ticket for a read or submission about to start.
    pub fn begin_fetch(&mut self, key: FetchKey) -> FetchTicket {
        self.fences.issue(key)
    }

    /// Apply the result of a read if its ticket is still current.
    ///
    /// Returns `false` when the response was stale and dropped.
    pub fn apply_fetched(&mut self, ticket: &FetchTicket, action: Action) -> bool {
        if !self.fences.is_current(ticket) {
            return false;
        }
        self.dispatch(action);
        self.fences.record(ticket);
        true
    }

    /// Apply the patient record returned by an entry submission.
    ///
    /// The ticket is taken before the request is sent, on the patient's key,
    /// so submissions and detail reads for one patient land in issue order:
    /// reads and submissions issued earlier are dropped once this applies,
    /// and this is dropped if a later one already landed.
    pub fn apply_mutation(&mut self, ticket: &FetchTicket, patient: Patient) -> bool {
        self.apply_fetched(ticket, Action::UpdatePatientInfo(patient))
    }
}

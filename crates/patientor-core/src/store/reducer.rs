//! Pure state transitions for the patient/diagnosis cache.

use std::collections::BTreeMap;

use crate::models::{Diagnosis, Patient};

/// Cached client state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct State {
    /// Patients keyed by id
    pub patients: BTreeMap<String, Patient>,
    /// Diagnosis reference list, in server order
    pub diagnosis: Vec<Diagnosis>,
}

/// The only ways the state may change.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Merge a patient list; cached records win on id collision.
    SetPatientList(Vec<Patient>),
    /// Replace the diagnosis list.
    SetDiagnosisList(Vec<Diagnosis>),
    /// Insert or overwrite one patient.
    AddPatient(Patient),
    /// Overwrite one patient with an authoritative record.
    UpdatePatientInfo(Patient),
}

impl Action {
    /// Short name for logging.
    pub fn name(&self) -> &'static str {
        match self {
            Action::SetPatientList(_) => "set_patient_list",
            Action::SetDiagnosisList(_) => "set_diagnosis_list",
            Action::AddPatient(_) => "add_patient",
            Action::UpdatePatientInfo(_) => "update_patient_info",
        }
    }
}

/// Apply an action to a state, producing the next state.
pub fn reduce(mut state: State, action: Action) -> State {
    match action {
        Action::SetPatientList(list) => {
            // Within one list the last record for an id wins, like a keyed fold.
            let incoming: BTreeMap<String, Patient> =
                list.into_iter().map(|p| (p.id.clone(), p)).collect();
            for (id, patient) in incoming {
                state.patients.entry(id).or_insert(patient);
            }
        }
        Action::SetDiagnosisList(list) => {
            state.diagnosis = list;
        }
        Action::AddPatient(patient) | Action::UpdatePatientInfo(patient) => {
            state.patients.insert(patient.id.clone(), patient);
        }
    }
    state
}

impl State {
    pub fn patient(&self, id: &str) -> Option<&Patient> {
        self.patients.get(id)
    }

    /// Patients ordered by id.
    pub fn patient_list(&self) -> Vec<&Patient> {
        self.patients.values().collect()
    }

    pub fn diagnoses(&self) -> &[Diagnosis] {
        &self.diagnosis
    }

    /// True when the patient is not cached or only a summary is cached.
    pub fn needs_detail(&self, id: &str) -> bool {
        self.patients.get(id).map_or(true, |p| !p.has_details())
    }
}

//! HR module: an in-memory employee roster and the draft that feeds it.
//!
//! The roster is an ordered sequence. Records are only created from a draft
//! and only removed by id; there is no edit-in-place.

mod employee;
mod roster;

use thiserror::Error;
use tracing::{debug, info};

pub use employee::{coerce_number, Employee, EmployeeDraft, DESIGNATION_NOT_SET};
pub use roster::Roster;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HrError {
    #[error("Please enter a name.")]
    MissingName,
    #[error("employee id space exhausted")]
    IdsExhausted,
}

pub type HrResult<T> = Result<T, HrError>;

/// One view session's worth of HR state: the roster plus the pending draft.
#[derive(Clone, Debug, Default)]
pub struct HrModule {
    roster: Roster,
    draft: EmployeeDraft,
}

impl HrModule {
    /// Starts with the three demo employees shown on a fresh page.
    pub fn with_sample_roster() -> Self {
        Self {
            roster: Roster::sample(),
            draft: EmployeeDraft::default(),
        }
    }

    pub fn employees(&self) -> &[Employee] {
        self.roster.employees()
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn draft(&self) -> &EmployeeDraft {
        &self.draft
    }

    pub fn replace_draft(&mut self, draft: EmployeeDraft) {
        self.draft = draft;
    }

    /// Commits the draft to the roster. The draft is only cleared on success.
    pub fn submit(&mut self) -> HrResult<&Employee> {
        match self.roster.add(&self.draft) {
            Ok(employee) => {
                self.draft.clear();
                info!(employee_id = employee.id, name = %employee.name, "employee added");
                Ok(employee)
            }
            Err(err) => {
                debug!(error = %err, "rejected employee draft");
                Err(err)
            }
        }
    }

    /// Removes by id; returns the removed record, `None` when nothing matched.
    pub fn delete(&mut self, id: u64) -> Option<Employee> {
        let removed = self.roster.remove(id);
        match &removed {
            Some(_) => info!(employee_id = id, total = self.roster.len(), "employee removed"),
            None => debug!(employee_id = id, "delete ignored for unknown employee"),
        }
        removed
    }

    pub fn clear_draft(&mut self) {
        self.draft.clear();
    }
}

use serde::Serialize;

use crate::{
    employee::{coerce_number, Employee, EmployeeDraft},
    HrError, HrResult,
};

/// Ordered employee records. Insertion order is display order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    pub fn sample() -> Self {
        Self {
            employees: vec![
                Employee::new(1, "Ravi Kumar", 28, 45000, "Developer"),
                Employee::new(2, "Sana Patel", 25, 38000, "QA Engineer"),
                Employee::new(3, "Amit Sharma", 32, 60000, "Team Lead"),
            ],
        }
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    /// Id for the next record: one past the largest id currently held.
    ///
    /// Derived from the live records, so removing the maximum frees its id
    /// for reuse.
    pub fn next_id(&self) -> HrResult<u64> {
        self.employees
            .iter()
            .map(|employee| employee.id)
            .max()
            .unwrap_or(0)
            .checked_add(1)
            .ok_or(HrError::IdsExhausted)
    }

    pub fn add(&mut self, draft: &EmployeeDraft) -> HrResult<&Employee> {
        let name = draft.normalized_name().ok_or(HrError::MissingName)?;
        let employee = Employee {
            id: self.next_id()?,
            name: name.to_string(),
            age: coerce_number(&draft.age),
            salary: coerce_number(&draft.salary),
            designation: draft.normalized_designation().to_string(),
        };
        self.employees.push(employee);
        Ok(&self.employees[self.employees.len() - 1])
    }

    pub fn remove(&mut self, id: u64) -> Option<Employee> {
        let index = self.employees.iter().position(|employee| employee.id == id)?;
        Some(self.employees.remove(index))
    }
}

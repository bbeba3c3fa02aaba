use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::types::EmployeeChanges;

/// Database model for the employees table
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, PartialEq)]
pub struct EmployeeModel {
    pub id: i64,
    pub name: String,
    pub email: String, // Unique across employees
    pub department: String,
    pub phone: String, // Exactly 10 digits
}

impl EmployeeModel {
    /// Overwrites every field present in `changes`, leaving the rest untouched
    pub fn apply(&mut self, changes: &EmployeeChanges) {
        if let Some(name) = &changes.name {
            self.name.clone_from(name);
        }
        if let Some(email) = &changes.email {
            self.email.clone_from(email);
        }
        if let Some(department) = &changes.department {
            self.department.clone_from(department);
        }
        if let Some(phone) = &changes.phone {
            self.phone.clone_from(phone);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmployeeModel {
        EmployeeModel {
            id: 1,
            name: "Alice Smith".to_string(),
            email: "alice@example.com".to_string(),
            department: "HR".to_string(),
            phone: "1234567890".to_string(),
        }
    }

    #[test]
    fn test_apply_changes_only_present_fields() {
        let mut employee = sample();

        employee.apply(&EmployeeChanges {
            department: Some("Finance".to_string()),
            ..EmployeeChanges::default()
        });

        assert_eq!(employee.department, "Finance");
        assert_eq!(employee.name, "Alice Smith");
        assert_eq!(employee.email, "alice@example.com");
        assert_eq!(employee.phone, "1234567890");
    }

    #[test]
    fn test_apply_empty_changes_is_noop() {
        let mut employee = sample();
        employee.apply(&EmployeeChanges::default());
        assert_eq!(employee, sample());
    }
}

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::models::EmployeeModel;
use crate::validation::{PayloadReader, ValidationErrors, DEPARTMENT_MAX_LENGTH, NAME_MAX_LENGTH};

/// Validated payload for creating an employee
#[derive(Debug, Clone, PartialEq)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub department: String,
    pub phone: String,
}

impl NewEmployee {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let name = reader.required_text("name", NAME_MAX_LENGTH);
        let email = reader.required_email("email");
        let department = reader.required_text("department", DEPARTMENT_MAX_LENGTH);
        let phone = reader.required_phone("phone");

        reader.finish(|| {
            Some(Self {
                name: name?,
                email: email?,
                department: department?,
                phone: phone?,
            })
        })
    }
}

/// Validated partial update; `None` fields are left untouched
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EmployeeChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub department: Option<String>,
    pub phone: Option<String>,
}

impl EmployeeChanges {
    pub fn from_json(payload: &Value) -> Result<Self, ValidationErrors> {
        let mut reader = PayloadReader::new(payload)?;

        let changes = Self {
            name: reader.optional_text("name", NAME_MAX_LENGTH),
            email: reader.optional_email("email"),
            department: reader.optional_text("department", DEPARTMENT_MAX_LENGTH),
            phone: reader.optional_phone("phone"),
        };

        reader.finish(|| Some(changes))
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.department.is_none()
            && self.phone.is_none()
    }
}

/// Response for employee lookups
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EmployeeResponse {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub department: String,
    pub phone: String,
}

impl From<EmployeeModel> for EmployeeResponse {
    fn from(model: EmployeeModel) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
            department: model.department,
            phone: model.phone,
        }
    }
}

/// Response for employee creation
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct EmployeeCreatedResponse {
    pub message: String,
    pub id: i64,
}

use serde::Serialize;
use serde_json::{Map, Value};
use std::fmt;
use validator::ValidateEmail;

pub const PASSWORD_MIN_LENGTH: usize = 6;
pub const PHONE_LENGTH: usize = 10;
pub const NAME_MAX_LENGTH: usize = 100;
pub const EMAIL_MAX_LENGTH: usize = 120;
pub const DEPARTMENT_MAX_LENGTH: usize = 50;

/// A single failed constraint on an incoming payload field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: String,
    pub message: String,
}

impl Violation {
    pub fn new(field: &str, message: impl Into<String>) -> Self {
        Self {
            field: field.to_string(),
            message: message.into(),
        }
    }
}

/// Every violation found while validating one payload
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<Violation>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn single(field: &str, message: impl Into<String>) -> Self {
        Self(vec![Violation::new(field, message)])
    }

    pub fn push(&mut self, violation: Violation) {
        self.0.push(violation);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn violations(&self) -> &[Violation] {
        &self.0
    }

    pub fn has_field(&self, field: &str) -> bool {
        self.0.iter().any(|v| v.field == field)
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|v| v.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Walks the fields of a JSON object, collecting violations as it goes.
///
/// Each accessor returns `None` when the field failed its rule, so callers
/// can keep reading the remaining fields and report everything at once via
/// [`PayloadReader::finish`].
pub struct PayloadReader<'a> {
    object: &'a Map<String, Value>,
    errors: ValidationErrors,
}

impl<'a> PayloadReader<'a> {
    pub fn new(payload: &'a Value) -> Result<Self, ValidationErrors> {
        match payload.as_object() {
            Some(object) => Ok(Self {
                object,
                errors: ValidationErrors::new(),
            }),
            None => Err(ValidationErrors::single(
                "body",
                "Request body must be a JSON object",
            )),
        }
    }

    /// Raw string lookup. Absent and `null` both read as `Ok(None)`.
    fn raw_str(&mut self, field: &str) -> Result<Option<&'a str>, ()> {
        match self.object.get(field) {
            None | Some(Value::Null) => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => {
                self.errors
                    .push(Violation::new(field, format!("{field} must be a string")));
                Err(())
            }
        }
    }

    fn missing(&mut self, field: &str) {
        self.errors
            .push(Violation::new(field, format!("{field} is required")));
    }

    pub fn required_text(&mut self, field: &str, max_length: usize) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_text(field, raw, max_length),
            Ok(None) => {
                self.missing(field);
                None
            }
            Err(()) => None,
        }
    }

    pub fn optional_text(&mut self, field: &str, max_length: usize) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_text(field, raw, max_length),
            _ => None,
        }
    }

    pub fn required_email(&mut self, field: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_email(field, raw),
            Ok(None) => {
                self.missing(field);
                None
            }
            Err(()) => None,
        }
    }

    pub fn optional_email(&mut self, field: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_email(field, raw),
            _ => None,
        }
    }

    pub fn required_phone(&mut self, field: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_phone(field, raw),
            Ok(None) => {
                self.missing(field);
                None
            }
            Err(()) => None,
        }
    }

    pub fn optional_phone(&mut self, field: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_phone(field, raw),
            _ => None,
        }
    }

    pub fn required_password(&mut self, field: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) => self.check_password(field, raw),
            Ok(None) => {
                self.missing(field);
                None
            }
            Err(()) => None,
        }
    }

    /// Present, non-blank string without further rules. Reports `message`
    /// instead of the generic "is required" text when missing.
    pub fn present_text(&mut self, field: &str, message: &str) -> Option<String> {
        match self.raw_str(field) {
            Ok(Some(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
            Ok(_) => {
                self.errors.push(Violation::new(field, message));
                None
            }
            Err(()) => None,
        }
    }

    /// Builds the typed record if no violations were recorded.
    ///
    /// `build` only runs once every accessor has succeeded, so it can combine
    /// their `Option` results with `?`.
    pub fn finish<T>(self, build: impl FnOnce() -> Option<T>) -> Result<T, ValidationErrors> {
        if !self.errors.is_empty() {
            return Err(self.errors);
        }
        build().ok_or(self.errors)
    }

    fn check_text(&mut self, field: &str, raw: &str, max_length: usize) -> Option<String> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            self.errors
                .push(Violation::new(field, format!("{field} must not be empty")));
            return None;
        }
        if trimmed.chars().count() > max_length {
            self.errors.push(Violation::new(
                field,
                format!("{field} must be at most {max_length} characters"),
            ));
            return None;
        }
        Some(trimmed.to_string())
    }

    fn check_email(&mut self, field: &str, raw: &str) -> Option<String> {
        let email = raw.trim();
        if email.chars().count() > EMAIL_MAX_LENGTH || !is_valid_email(email) {
            self.errors.push(Violation::new(
                field,
                format!("{field} must be a valid email address"),
            ));
            return None;
        }
        Some(email.to_string())
    }

    fn check_phone(&mut self, field: &str, raw: &str) -> Option<String> {
        let phone = raw.trim();
        if !is_valid_phone(phone) {
            self.errors.push(Violation::new(
                field,
                format!("{field} must be exactly {PHONE_LENGTH} digits"),
            ));
            return None;
        }
        Some(phone.to_string())
    }

    fn check_password(&mut self, field: &str, raw: &str) -> Option<String> {
        let password = raw.trim();
        if password.chars().count() < PASSWORD_MIN_LENGTH {
            self.errors.push(Violation::new(
                field,
                format!("{field} must be at least {PASSWORD_MIN_LENGTH} characters"),
            ));
            return None;
        }
        Some(password.to_string())
    }
}

pub fn is_valid_email(candidate: &str) -> bool {
    candidate.to_string().validate_email()
}

pub fn is_valid_phone(candidate: &str) -> bool {
    candidate.len() == PHONE_LENGTH && candidate.chars().all(|c| c.is_ascii_digit())
}

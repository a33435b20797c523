// ── Form validation ──
//
// Runs before any request is issued. The first failing field wins.

use propdesk_api::models::{
    Priority, PropertyForm, Registration, RoomForm, ServiceRequestForm, TaskForm, TicketForm,
    UserForm,
};

use crate::error::CoreError;

pub const MIN_CAPACITY: i64 = 1;
pub const MAX_CAPACITY: i64 = 20;

/// Client-side checks for a create / update body.
pub trait Validate {
    fn validate(&self) -> Result<(), CoreError>;
}

fn required(field: &str, value: &str) -> Result<(), CoreError> {
    if value.trim().is_empty() {
        return Err(CoreError::validation(field, "is required"));
    }
    Ok(())
}

/// Reject values outside the known set. `Other` is what lenient parsing
/// produces for unrecognised input.
fn known<T>(
    field: &str,
    value: Option<&T>,
    is_known: impl Fn(&T) -> bool,
    raw: impl Fn(&T) -> String,
) -> Result<(), CoreError> {
    match value {
        Some(v) if !is_known(v) => Err(CoreError::validation(
            field,
            format!("'{}' is not a recognised value", raw(v)),
        )),
        _ => Ok(()),
    }
}

fn known_priority(value: Option<&Priority>) -> Result<(), CoreError> {
    known("priority", value, Priority::is_known, ToString::to_string)
}

fn email(value: &str) -> Result<(), CoreError> {
    let trimmed = value.trim();
    match trimmed.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(()),
        _ => Err(CoreError::validation("email", "must be a valid email address")),
    }
}

impl Validate for PropertyForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("name", &self.name)?;
        known("status", self.status.as_ref(), |s| s.is_known(), ToString::to_string)
    }
}

impl Validate for RoomForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("name", &self.name)?;
        if let Some(floor) = self.floor {
            if floor < 0 {
                return Err(CoreError::validation("floor", "must be 0 or greater"));
            }
        }
        if let Some(capacity) = self.capacity {
            if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
                return Err(CoreError::validation(
                    "capacity",
                    format!("must be between {MIN_CAPACITY} and {MAX_CAPACITY}"),
                ));
            }
        }
        known("status", self.status.as_ref(), |s| s.is_known(), ToString::to_string)
    }
}

impl Validate for TicketForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("title", &self.title)?;
        known_priority(self.priority.as_ref())?;
        known("status", self.status.as_ref(), |s| s.is_known(), ToString::to_string)
    }
}

impl Validate for TaskForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("title", &self.title)?;
        known_priority(self.priority.as_ref())?;
        known("status", self.status.as_ref(), |s| s.is_known(), ToString::to_string)
    }
}

impl Validate for ServiceRequestForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("request_group", &self.request_group)?;
        required("request_type", &self.request_type)?;
        known_priority(self.priority.as_ref())?;
        known("status", self.status.as_ref(), |s| s.is_known(), ToString::to_string)
    }
}

impl Validate for UserForm {
    fn validate(&self) -> Result<(), CoreError> {
        required("username", &self.username)?;
        if let Some(address) = &self.email {
            email(address)?;
        }
        known("role", self.role.as_ref(), |r| r.is_known(), ToString::to_string)
    }
}

impl Validate for Registration {
    fn validate(&self) -> Result<(), CoreError> {
        required("username", &self.username)?;
        required("email", &self.email)?;
        email(&self.email)?;
        required("password", &self.password)
    }
}

#[cfg(test)]
mod tests {
    use propdesk_api::models::{RoomStatus, TaskStatus};

    use super::*;

    fn field_of(result: Result<(), CoreError>) -> String {
        match result {
            Err(CoreError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn blank_title_is_rejected() {
        let form = TicketForm {
            title: "   ".into(),
            ..TicketForm::default()
        };
        assert_eq!(field_of(form.validate()), "title");
    }

    #[test]
    fn room_ranges_are_enforced() {
        let mut form = RoomForm {
            name: "101".into(),
            floor: Some(-1),
            ..RoomForm::default()
        };
        assert_eq!(field_of(form.validate()), "floor");

        form.floor = Some(0);
        form.capacity = Some(21);
        assert_eq!(field_of(form.validate()), "capacity");

        form.capacity = Some(0);
        assert_eq!(field_of(form.validate()), "capacity");

        form.capacity = Some(20);
        form.status = Some(RoomStatus::Cleaning);
        assert!(form.validate().is_ok());
    }

    #[test]
    fn unknown_enum_values_are_rejected() {
        let form = TaskForm {
            title: "Paint".into(),
            status: Some(TaskStatus::parse("someday")),
            ..TaskForm::default()
        };
        assert_eq!(field_of(form.validate()), "status");
    }

    #[test]
    fn registration_checks_email_shape() {
        let reg = Registration {
            username: "maria".into(),
            email: "not-an-email".into(),
            password: "secret".into(),
        };
        assert_eq!(field_of(reg.validate()), "email");
    }

    #[test]
    fn service_request_needs_group_and_type() {
        let form = ServiceRequestForm {
            request_group: "Housekeeping".into(),
            ..ServiceRequestForm::default()
        };
        assert_eq!(field_of(form.validate()), "request_type");
    }
}

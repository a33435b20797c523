// ── Wire types ──
//
// Records as the REST API returns them, plus the JSON bodies sent on
// create / update. Unknown fields are ignored; unknown enum strings land
// in an `Other` variant and re-serialize verbatim. Known values, aliases
// and case variants included, normalize to the canonical spelling so a
// record written back always carries a value the server defines.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// Wire identifier. Every entity uses integer ids.
pub type Id = i64;

/// Define a string-backed enum that tolerates values it doesn't know.
///
/// Parsing is exact first, then ASCII case-insensitive against the
/// canonical spelling and any listed aliases. Serializing a known
/// variant emits the canonical spelling, not the alias it was read from.
macro_rules! lenient_enum {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $wire:literal $(| $alias:literal)*),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash)]
        pub enum $name {
            $($variant,)+
            Other(String),
        }

        impl $name {
            /// Every known variant, in declaration order.
            pub const KNOWN: &'static [$name] = &[$($name::$variant),+];

            /// The wire spelling.
            pub fn as_str(&self) -> &str {
                match self {
                    $(Self::$variant => $wire,)+
                    Self::Other(s) => s,
                }
            }

            /// Parse leniently; never fails.
            pub fn parse(raw: &str) -> Self {
                $(
                    if raw == $wire {
                        return Self::$variant;
                    }
                )+
                $(
                    if raw.eq_ignore_ascii_case($wire) $(|| raw.eq_ignore_ascii_case($alias))* {
                        return Self::$variant;
                    }
                )+
                Self::Other(raw.to_owned())
            }

            /// `true` unless this is an `Other` value.
            pub fn is_known(&self) -> bool {
                !matches!(self, Self::Other(_))
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = Infallible;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self::parse(s))
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Ok(Self::parse(&raw))
            }
        }
    };
}

lenient_enum! {
    /// Property lifecycle status.
    PropertyStatus {
        Active => "active",
        Inactive => "inactive",
        Maintenance => "maintenance",
    }
}

lenient_enum! {
    /// Room occupancy status.
    RoomStatus {
        Available => "Available",
        Occupied => "Occupied",
        Maintenance => "Maintenance",
        Cleaning => "Cleaning",
    }
}

lenient_enum! {
    /// Priority shared by tickets, tasks, and service requests.
    Priority {
        Low => "Low",
        Medium => "Medium",
        High => "High",
        Critical => "Critical",
    }
}

lenient_enum! {
    /// Ticket workflow status.
    TicketStatus {
        Open => "open",
        InProgress => "in progress" | "in_progress" | "in-progress",
        Resolved => "resolved",
        Closed => "closed",
    }
}

lenient_enum! {
    /// Task workflow status. The board shows one column per known value.
    TaskStatus {
        Pending => "pending",
        InProgress => "in progress" | "in_progress" | "in-progress",
        Completed => "completed" | "done",
    }
}

lenient_enum! {
    /// Service request workflow status.
    RequestStatus {
        Pending => "pending",
        InProgress => "in progress" | "in_progress" | "in-progress",
        Completed => "completed",
        Cancelled => "cancelled" | "canceled",
    }
}

lenient_enum! {
    /// User role, lowest to highest privilege.
    Role {
        User => "user",
        Manager => "manager",
        GeneralManager => "general_manager",
        SuperAdmin => "super_admin",
    }
}

impl Role {
    /// Managers and above may edit and delete board cards.
    pub fn can_edit(&self) -> bool {
        matches!(self, Self::Manager | Self::GeneralManager | Self::SuperAdmin)
    }
}

/// Accept `"alice"` or `42` for fields the server fills inconsistently.
fn string_or_number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

// ── Records ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub id: Id,
    pub name: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(rename = "type", default)]
    pub property_type: Option<String>,
    #[serde(default)]
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    pub name: String,
    /// Room-type code, e.g. `"KNG"`; see the lookup tables for labels.
    #[serde(rename = "type", default)]
    pub room_type: Option<String>,
    #[serde(default)]
    pub floor: Option<i64>,
    #[serde(default)]
    pub status: Option<RoomStatus>,
    #[serde(default)]
    pub capacity: Option<i64>,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub last_cleaned: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    #[serde(default)]
    pub room_id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub status: Option<TicketStatus>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub created_by: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assigned_to_id: Option<Id>,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub ticket_id: Option<Id>,
    #[serde(default)]
    pub room_id: Option<Id>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequest {
    pub id: Id,
    #[serde(default)]
    pub property_id: Option<Id>,
    #[serde(default)]
    pub room_id: Option<Id>,
    #[serde(default)]
    pub request_group: Option<String>,
    #[serde(default)]
    pub request_type: Option<String>,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub status: Option<RequestStatus>,
    #[serde(default)]
    pub guest_name: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Id,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub group: Option<String>,
    #[serde(default)]
    pub assigned_properties: Vec<Id>,
}

/// Audit trail entry from `GET /history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Id,
    #[serde(default)]
    pub entity_type: Option<String>,
    #[serde(default)]
    pub entity_id: Option<Id>,
    #[serde(default)]
    pub action: Option<String>,
    #[serde(default, deserialize_with = "string_or_number")]
    pub changed_by: Option<String>,
    #[serde(default)]
    pub changed_at: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

// ── Auth payloads ───────────────────────────────────────────────────

/// The user block returned alongside a token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    #[serde(default)]
    pub id: Option<Id>,
    pub username: String,
    #[serde(default)]
    pub role: Option<Role>,
}

/// Response to `POST /login` and `POST /register`.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user: Option<AuthUser>,
    #[serde(default, alias = "message")]
    pub msg: Option<String>,
}

/// Response to `GET /check-first-user`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct FirstUserStatus {
    #[serde(alias = "isFirstUser", alias = "first_user", default)]
    pub is_first_user: bool,
}

/// Body of `POST /register`.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub password: String,
}

// ── Forms (create / update bodies) ──────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PropertyForm {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub property_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PropertyStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoomForm {
    pub name: String,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub room_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub floor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RoomStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub capacity: Option<i64>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub amenities: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TicketForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Id>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaskForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Id>,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TaskStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticket_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Id>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServiceRequestForm {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property_id: Option<Id>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Id>,
    pub request_group: String,
    pub request_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<RequestStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserForm {
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Required on create, optional on update.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub assigned_properties: Vec<Id>,
}

/// Body of the status-only task patch sent by the board.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskStatusPatch {
    pub status: TaskStatus,
}

// ── Query filters ───────────────────────────────────────────────────

/// Query parameters shared by the ticket / task / request listings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub property_id: Option<Id>,
    /// `YYYY-MM-DD`
    pub date: Option<String>,
    pub room_id: Option<Id>,
    /// Honoured by `/tasks` only.
    pub assigned_to_id: Option<Id>,
}

impl ListFilter {
    pub fn for_property(property_id: Id) -> Self {
        Self {
            property_id: Some(property_id),
            ..Self::default()
        }
    }

    pub(crate) fn to_query(&self, include_assignee: bool) -> Vec<(&'static str, String)> {
        let mut query = Vec::new();
        if let Some(id) = self.property_id {
            query.push(("property_id", id.to_string()));
        }
        if let Some(date) = &self.date {
            query.push(("date", date.clone()));
        }
        if let Some(id) = self.room_id {
            query.push(("room_id", id.to_string()));
        }
        if include_assignee {
            if let Some(id) = self.assigned_to_id {
                query.push(("assigned_to_id", id.to_string()));
            }
        }
        query
    }
}

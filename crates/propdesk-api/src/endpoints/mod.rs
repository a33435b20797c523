// Endpoint modules. Each adds inherent methods to `ApiClient`.

mod auth;
mod properties;
mod reports;
mod rooms;
mod service_requests;
mod settings;
mod tasks;
mod tickets;
mod users;

pub use settings::SettingsSection;

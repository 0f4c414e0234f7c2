//! Employee self-service client for the HR portal API: login, attendance
//! with geolocation, half-day permissions and leave workflows.

pub mod api;
pub mod attendance;
pub mod auth;
pub mod config;
pub mod console;
pub mod error;
pub mod geo;
pub mod model;
pub mod models;
pub mod utils;

pub use api::ApiClient;
pub use attendance::{ActionOutcome, AttendanceController, DerivedStatus};
pub use auth::session::Session;
pub use config::Config;
pub use error::{PortalError, PortalResult};

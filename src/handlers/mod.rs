//! HTTP handlers, one module per domain

pub mod admin;
pub mod announcement;
pub mod auth;
pub mod feedback;
pub mod profile;
pub mod search;
pub mod swap;

pub use admin::*;
pub use announcement::*;
pub use auth::*;
pub use feedback::*;
pub use profile::*;
pub use search::*;
pub use swap::*;

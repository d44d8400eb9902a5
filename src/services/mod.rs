//! Service layer: one service per domain, all wired against the store
//! traits so they run unchanged on PostgreSQL or the in-memory store.

pub mod admin;
pub mod feedback;
pub mod profile;
pub mod search;
pub mod swap;

pub use admin::AdminService;
pub use feedback::FeedbackService;
pub use profile::ProfileService;
pub use search::SearchService;
pub use swap::SwapService;

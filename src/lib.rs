//! SkillSwap Backend Library
//!
//! Backend for a peer-to-peer skill swap marketplace: profiles, search,
//! swap request lifecycle, feedback and admin moderation.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
pub mod store;

//! API endpoint handlers.
//!
//! Each module corresponds to one screen or feature of the practice app.
//! Handlers reuse the domain modules; no business logic lives here.

pub mod admin;
pub mod appointments;
pub mod chat;
pub mod clients;
pub mod dashboard;
pub mod events;
pub mod finance;
pub mod health;

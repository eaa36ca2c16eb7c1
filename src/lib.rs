//! Booking wizard for a home-cleaning service: live pricing, step
//! validation, submission by email and the collaborators around it.

pub mod address;
pub mod analytics;
pub mod config;
pub mod models;
pub mod notify;
pub mod pricing;
pub mod replay;
pub mod schedule;
pub mod wizard;

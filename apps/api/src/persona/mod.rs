// Persona: one merged view over a user's stored assessment results.

pub mod aggregator;
pub mod cache;
pub mod handlers;
pub mod models;

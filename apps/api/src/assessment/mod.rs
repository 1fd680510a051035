// Assessments: static question tables, trait scoring, classification with a
// deterministic fallback, and the per-user result store.

pub mod classifier;
pub mod definitions;
pub mod handlers;
pub mod models;
pub mod profile;
pub mod prompts;
pub mod scoring;
pub mod store;
pub mod submit;

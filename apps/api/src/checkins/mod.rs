// Check-in submission and retrieval.
// Validation runs before any database call; the repository owns all SQL.

pub mod handlers;
pub mod repository;
pub mod validation;

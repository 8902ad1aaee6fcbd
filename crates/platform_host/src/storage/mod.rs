//! Storage contracts for session-scoped host persistence.

pub mod prefs;

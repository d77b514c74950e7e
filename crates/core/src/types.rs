/// All database primary keys are SQLite INTEGER rowids.
pub type DbId = i64;

/// Server-side instants (`created_at`) are stored in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Wall-clock date and time in the civil zone (see [`crate::clock`]).
pub type CivilDateTime = chrono::NaiveDateTime;

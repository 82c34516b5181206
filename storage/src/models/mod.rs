//! Persistence and aggregate models.

mod message_record;
mod stats_snapshot;
mod user_activity;

pub use message_record::MessageRecord;
pub use stats_snapshot::StatsSnapshot;
pub use user_activity::UserActivity;

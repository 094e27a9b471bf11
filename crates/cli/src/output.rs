//! Table rendering for messages and stats

use chrono::{DateTime, Utc};
use dbq_core::domain::{Message, QueueStats};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct MessageRow {
    id: i64,
    status: String,
    created: String,
    updated: String,
    content: String,
}

#[derive(Tabled)]
struct StatsRow {
    queue: String,
    pending: i64,
    processing: i64,
    total: i64,
}

pub fn format_timestamp(millis: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(millis)
        .map(|t| t.format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

pub fn messages_table(messages: &[Message]) -> String {
    let rows = messages.iter().map(|m| MessageRow {
        id: m.id,
        status: m.status.to_string(),
        created: format_timestamp(m.creation_time),
        updated: format_timestamp(m.update_time),
        content: m.content.to_string(),
    });

    Table::new(rows).to_string()
}

pub fn stats_table(queue: &str, stats: &QueueStats) -> String {
    Table::new(vec![StatsRow {
        queue: queue.to_string(),
        pending: stats.pending,
        processing: stats.processing,
        total: stats.total(),
    }])
    .to_string()
}

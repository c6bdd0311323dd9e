use std::collections::VecDeque;

use chrono::{DateTime, Local};

use crate::session::OperationKind;

pub const HISTORY_CAPACITY: usize = 10;

const PREVIEW_CHARS: usize = 100;

/// One successful generation, owned exclusively by the ledger.
#[derive(Debug, Clone)]
pub struct HistoryEntry {
    pub timestamp: DateTime<Local>,
    pub operation: OperationKind,
    pub subject: String,
    pub content: String,
}

impl HistoryEntry {
    pub fn new(
        operation: OperationKind,
        subject: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            operation,
            subject: subject.into(),
            content: content.into(),
        }
    }
}

/// Bounded, newest-first record of recent successful generations. Lives for
/// the process lifetime only; eviction drops the oldest entry past capacity.
#[derive(Debug, Default)]
pub struct HistoryLedger {
    entries: VecDeque<HistoryEntry>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self {
            entries: VecDeque::with_capacity(HISTORY_CAPACITY + 1),
        }
    }

    pub fn record(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(HISTORY_CAPACITY);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    /// Fixed-format listing, newest first, with a flattened 100-character
    /// content preview per entry.
    pub fn render(&self) -> String {
        if self.entries.is_empty() {
            return "No recent generations".to_string();
        }

        let mut out = format!("Recent generations (last {HISTORY_CAPACITY})\n");
        for entry in &self.entries {
            out.push_str(&format!(
                "\n[{}] {} - {}\n  {}\n",
                entry.timestamp.format("%H:%M:%S"),
                entry.operation,
                entry.subject,
                preview(&entry.content),
            ));
        }
        out
    }
}

fn preview(content: &str) -> String {
    let flat: String = content
        .chars()
        .take(PREVIEW_CHARS)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect();
    format!("{flat}...")
}

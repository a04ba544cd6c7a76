use crate::node::EnvEntry;

/// A Markdown table as plain cell text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub columns: usize,
    pub head: Vec<Vec<String>>,
    pub body: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: usize) -> Self {
        Table {
            columns,
            head: Vec::new(),
            body: Vec::new(),
        }
    }

    /// Environment entries for a `key | value` table.
    ///
    /// Only a table with exactly one header row whose first two cells are
    /// `key` and `value` (case-sensitive) and at least one body row
    /// qualifies. Extra columns are ignored.
    pub fn env_entries(&self) -> Option<Vec<EnvEntry>> {
        let [header] = self.head.as_slice() else {
            return None;
        };
        if self.body.is_empty() {
            return None;
        }
        if header.first().map(String::as_str) != Some("key")
            || header.get(1).map(String::as_str) != Some("value")
        {
            return None;
        }

        let entries = self
            .body
            .iter()
            .map(|row| {
                let key = row.first().cloned().unwrap_or_default();
                let value = row.get(1).cloned().unwrap_or_default();
                EnvEntry::set(key, value)
            })
            .collect();
        Some(entries)
    }
}

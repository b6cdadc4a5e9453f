use serde::{Deserialize, Serialize};

/// Which side of the simulated terminal produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Stdout,
    Stdin,
}

/// A single chunk of simulated terminal activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptEntry {
    pub kind: EntryKind,
    pub content: String,
}

impl TranscriptEntry {
    pub fn stdout(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Stdout,
            content: content.into(),
        }
    }

    pub fn stdin(content: impl Into<String>) -> Self {
        Self {
            kind: EntryKind::Stdin,
            content: content.into(),
        }
    }
}

/// Ordered record of a simulated terminal session.
///
/// Append-only while a run is in progress; insertion order is chronological
/// order. Only the orchestrator clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    /// Entries appended after the first `seen` ones.
    ///
    /// Front ends use this to print incrementally. If the transcript was
    /// cleared in between, everything is returned.
    pub fn since(&self, seen: usize) -> &[TranscriptEntry] {
        self.entries.get(seen..).unwrap_or(&self.entries)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn last(&self) -> Option<&TranscriptEntry> {
        self.entries.last()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    pub(crate) fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }
}

impl From<Vec<TranscriptEntry>> for Transcript {
    fn from(entries: Vec<TranscriptEntry>) -> Self {
        Self { entries }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_since_returns_new_entries() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::stdout("Hello"));
        transcript.push(TranscriptEntry::stdin("42"));
        transcript.push(TranscriptEntry::stdout("Result: 42"));

        assert_eq!(transcript.since(1).len(), 2);
        assert_eq!(transcript.since(1)[0], TranscriptEntry::stdin("42"));
        assert!(transcript.since(3).is_empty());
    }

    #[test]
    fn test_since_after_clear_returns_everything() {
        let mut transcript = Transcript::new();
        transcript.push(TranscriptEntry::stdout("fresh"));
        assert_eq!(transcript.since(5), transcript.entries());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let transcript = Transcript::from(vec![TranscriptEntry::stdout("Hello")]);
        let json = serde_json::to_string(&transcript).unwrap();
        assert_eq!(json, r#"[{"kind":"stdout","content":"Hello"}]"#);
    }
}

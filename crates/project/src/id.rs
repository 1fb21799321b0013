use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a tree node or open tab. Either an integer or a string.
/// 節點或分頁的識別碼，可為整數或字串。
///
/// `Number(1)` and `Text("1")` are different ids.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum NodeId {
    Number(i64),
    Text(String),
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeId::Number(value) => write!(f, "{value}"),
            NodeId::Text(value) => f.write_str(value),
        }
    }
}

impl From<i64> for NodeId {
    fn from(value: i64) -> Self {
        NodeId::Number(value)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        NodeId::Text(value.to_string())
    }
}

impl From<String> for NodeId {
    fn from(value: String) -> Self {
        NodeId::Text(value)
    }
}

impl From<Uuid> for NodeId {
    fn from(value: Uuid) -> Self {
        NodeId::Text(value.to_string())
    }
}

/// Source of globally unique node identifiers.
/// 產生全域唯一節點識別碼的來源。
pub trait IdSource: Send {
    fn next_id(&mut self) -> NodeId;
}

/// Mints random v4 UUIDs rendered as strings.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&mut self) -> NodeId {
        NodeId::from(Uuid::new_v4())
    }
}

/// Mints increasing integers, starting at the given value.
/// 由指定起始值遞增產生整數識別碼，適合測試與可重現的種子資料。
#[derive(Debug, Clone)]
pub struct SequentialIdSource {
    next: i64,
}

impl SequentialIdSource {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: i64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIdSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdSource for SequentialIdSource {
    fn next_id(&mut self) -> NodeId {
        let id = self.next;
        self.next = self.next.wrapping_add(1);
        NodeId::Number(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_source_counts_up() {
        let mut ids = SequentialIdSource::starting_at(7);
        assert_eq!(ids.next_id(), NodeId::Number(7));
        assert_eq!(ids.next_id(), NodeId::Number(8));
    }

    #[test]
    fn uuid_source_never_repeats() {
        let mut ids = UuidIdSource;
        let first = ids.next_id();
        let second = ids.next_id();
        assert_ne!(first, second);
        assert!(matches!(first, NodeId::Text(ref text) if text.len() == 36));
    }

    #[test]
    fn numeric_and_textual_ids_serialize_untagged() {
        assert_eq!(serde_json::to_string(&NodeId::Number(3)).unwrap(), "3");
        assert_eq!(
            serde_json::to_string(&NodeId::from("abc")).unwrap(),
            "\"abc\""
        );
        let parsed: NodeId = serde_json::from_str("\"3\"").unwrap();
        assert_eq!(parsed, NodeId::Text("3".into()));
        assert_ne!(parsed, NodeId::Number(3));
    }

    #[test]
    fn negative_ids_parse_as_numbers() {
        let parsed: NodeId = serde_json::from_str("-1").unwrap();
        assert_eq!(parsed, NodeId::Number(-1));
        assert_eq!(parsed.to_string(), "-1");
        assert_eq!(serde_json::to_string(&parsed).unwrap(), "-1");
    }

    #[test]
    fn sequential_source_accepts_negative_start() {
        let mut ids = SequentialIdSource::starting_at(-1);
        assert_eq!(ids.next_id(), NodeId::Number(-1));
        assert_eq!(ids.next_id(), NodeId::Number(0));
    }
}

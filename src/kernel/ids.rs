use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Stable identifier of a document inside one collection.
///
/// Stored on disk as a decimal string; older files used millisecond
/// timestamps as ids, which still parse.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(u64);

impl DocumentId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for DocumentId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = DocumentId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a document id as a digit string or unsigned integer")
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<DocumentId, E> {
                Ok(DocumentId(value))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<DocumentId, E> {
                u64::try_from(value)
                    .map(DocumentId)
                    .map_err(|_| E::custom(format!("negative document id: {value}")))
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<DocumentId, E> {
                value
                    .trim()
                    .parse::<u64>()
                    .map(DocumentId)
                    .map_err(|_| E::custom(format!("invalid document id: {value:?}")))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Monotonic id source owned by a collection. Never hands out an id twice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    pub const fn starting_at(next: u64) -> Self {
        Self { next }
    }

    pub fn next_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next);
        self.next = self.next.saturating_add(1);
        id
    }

    pub fn peek(&self) -> u64 {
        self.next
    }

    /// Raise the counter past `id` so that loaded ids are never re-issued.
    pub fn observe(&mut self, id: DocumentId) {
        if id.0 >= self.next {
            self.next = id.0.saturating_add(1);
        }
    }
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self::starting_at(1)
    }
}

//! Storage entity traits

use std::fmt::Debug;
use std::hash::Hash;

use serde::{Serialize, de::DeserializeOwned};

/// Key of a stored entity
pub trait StorageKey: Clone + Debug + Send + Sync + Eq + Hash {
    /// String form used by map-backed stores
    fn as_str(&self) -> &str;
}

/// An entity that can be kept in a [`Storage`](super::Storage)
pub trait StorageEntity: Clone + Debug + Send + Sync + Serialize + DeserializeOwned {
    type Key: StorageKey;

    fn key(&self) -> &Self::Key;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::FlowId;

    #[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
    struct Note {
        id: FlowId,
        body: String,
    }

    impl StorageEntity for Note {
        type Key = FlowId;

        fn key(&self) -> &Self::Key {
            &self.id
        }
    }

    #[test]
    fn test_entity_key_as_str() {
        let note = Note {
            id: FlowId::new("flow-1").unwrap(),
            body: "hello".to_string(),
        };
        assert_eq!(StorageKey::as_str(note.key()), "flow-1");
        assert_eq!(note.body, "hello");
    }
}

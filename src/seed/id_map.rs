use std::collections::HashMap;
use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemapError {
    #[error("duplicate original {kind} id {original}")]
    Duplicate { kind: &'static str, original: i64 },

    #[error("{kind} original id {original} does not resolve to a seeded row")]
    Unresolved { kind: &'static str, original: i64 },
}

/// Maps the ad hoc numeric ids used in fixtures to the ids rows actually got
#[derive(Debug, Clone)]
pub struct IdRemap {
    kind: &'static str,
    ids: HashMap<i64, Uuid>,
}

impl IdRemap {
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            ids: HashMap::new(),
        }
    }

    pub fn insert(&mut self, original: i64, id: Uuid) -> Result<(), RemapError> {
        if self.ids.contains_key(&original) {
            return Err(RemapError::Duplicate {
                kind: self.kind,
                original,
            });
        }
        self.ids.insert(original, id);
        Ok(())
    }

    pub fn resolve(&self, original: i64) -> Result<Uuid, RemapError> {
        self.ids
            .get(&original)
            .copied()
            .ok_or(RemapError::Unresolved {
                kind: self.kind,
                original,
            })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

//! Client-side record cache.
//!
//! # Invariants
//! - Contents are only ever replaced wholesale, never patched.
//! - Order is the order returned by the server.

use crate::model::persona::{PersonaId, PersonaRecord};

/// Owned cache of the last successful list fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersonaStore {
    records: Vec<PersonaRecord>,
    generation: u64,
}

impl PersonaStore {
    /// Empty cache at generation 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces all records and bumps the generation counter.
    pub fn replace(&mut self, records: Vec<PersonaRecord>) {
        self.records = records;
        self.generation += 1;
    }

    /// Cached records in server order.
    pub fn records(&self) -> &[PersonaRecord] {
        &self.records
    }

    /// First record with `id`.
    pub fn find(&self, id: PersonaId) -> Option<&PersonaRecord> {
        self.records.iter().find(|record| record.id == id)
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of successful replacements since creation.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::PersonaStore;
    use crate::model::persona::PersonaRecord;

    #[test]
    fn replace_swaps_contents_and_counts_generations() {
        let mut store = PersonaStore::new();
        assert!(store.is_empty());
        assert_eq!(store.generation(), 0);

        store.replace(vec![
            PersonaRecord::new(1, "A", "B"),
            PersonaRecord::new(2, "C", "D"),
        ]);
        assert_eq!(store.len(), 2);
        assert_eq!(store.find(2).map(|r| r.nombre.as_str()), Some("C"));

        store.replace(vec![PersonaRecord::new(3, "E", "F")]);
        assert_eq!(store.len(), 1);
        assert!(store.find(1).is_none());
        assert_eq!(store.generation(), 2);
    }
}

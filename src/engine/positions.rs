// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use std::collections::HashMap;

use crate::model::NoteId;

/// Session-scoped manual node-position overrides.
///
/// Written on drag release, read by every recompute. An override pins its
/// node as a fixed input to the layout simulator until overwritten. Never
/// persisted beyond the session.
#[derive(Debug, Clone, Default)]
pub struct PositionStore {
    overrides: HashMap<NoteId, (f32, f32)>,
}

impl PositionStore {
    pub fn get(&self, id: &NoteId) -> Option<(f32, f32)> {
        self.overrides.get(id).copied()
    }

    pub fn set(&mut self, id: NoteId, position: (f32, f32)) {
        self.overrides.insert(id, position);
    }

    pub fn remove(&mut self, id: &NoteId) -> Option<(f32, f32)> {
        self.overrides.remove(id)
    }

    pub fn clear(&mut self) {
        self.overrides.clear();
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::PositionStore;
    use crate::model::NoteId;

    #[test]
    fn set_overwrites_and_get_reads_back() {
        let id = NoteId::new("a").expect("id");
        let mut store = PositionStore::default();
        assert_eq!(store.get(&id), None);

        store.set(id.clone(), (1.0, 2.0));
        assert_eq!(store.get(&id), Some((1.0, 2.0)));

        store.set(id.clone(), (3.0, 4.0));
        assert_eq!(store.get(&id), Some((3.0, 4.0)));
        assert_eq!(store.len(), 1);
    }
}

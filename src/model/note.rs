// SPDX-FileCopyrightText: 2026 the notemap authors
// SPDX-License-Identifier: MIT

use serde::{Deserialize, Serialize};

use super::ids::NoteId;

/// A note record as supplied by the external note store.
///
/// The wire field names (`createdAt`/`updatedAt` etc.) are the
/// interoperability contract with the note store and must not change.
/// Timestamps are unix seconds. Notes are read-only inside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Note {
    pub fn new(
        id: NoteId,
        title: impl Into<String>,
        body: impl Into<String>,
        tags: impl IntoIterator<Item = impl Into<String>>,
        created_at: i64,
        updated_at: i64,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            body: body.into(),
            tags: tags.into_iter().map(Into::into).collect(),
            created_at,
            updated_at,
        }
    }
}

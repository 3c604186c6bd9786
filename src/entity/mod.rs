mod note;

pub use note::{validation, Note, NoteDraft};

use std::fmt;
use std::str::FromStr;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::NotesError;

/// Identifier of a stored note.
///
/// Wraps the document store's native ObjectId. The only way to build one from
/// outside input is `FromStr`, which accepts exactly 24 hexadecimal characters,
/// so a malformed id is rejected before any store round-trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NoteId(ObjectId);

impl NoteId {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for NoteId {
    fn from(oid: ObjectId) -> Self {
        NoteId(oid)
    }
}

impl FromStr for NoteId {
    type Err = NotesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s)
            .map(NoteId)
            .map_err(|_| NotesError::InvalidIdentifier(s.to_string()))
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_hex())
    }
}

impl Serialize for NoteId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NoteId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{EntityId, EntityKind, Record};
use crate::error::Error;

/// Progress of a travel document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    /// Not started.
    #[default]
    Pending,
    /// Being arranged.
    InProgress,
    /// Ready.
    Done,
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Done => write!(f, "done"),
        }
    }
}

impl FromStr for DocumentStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "in_progress" | "in-progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            other => Err(Error::invalid_input(
                "status",
                format!("unknown document status `{other}`; expected pending|in_progress|done"),
            )),
        }
    }
}

/// A travel document such as a passport, visa or insurance policy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Identifier assigned on creation.
    pub id: EntityId,
    /// Document type; serialized as `type`.
    #[serde(rename = "type")]
    pub kind: String,
    /// Current progress.
    #[serde(default)]
    pub status: DocumentStatus,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
    /// Creation time in Unix milliseconds.
    pub created: i64,
}

/// Input for creating a [`Document`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    /// Document type.
    pub kind: String,
    /// Initial status; pending when omitted.
    pub status: Option<DocumentStatus>,
    /// Free-form notes.
    pub notes: String,
}

/// Partial update for a [`Document`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentPatch {
    /// New document type.
    pub kind: Option<String>,
    /// New status.
    pub status: Option<DocumentStatus>,
    /// New notes.
    pub notes: Option<String>,
}

impl Record for Document {
    type Draft = NewDocument;
    type Patch = DocumentPatch;

    const KIND: EntityKind = EntityKind::Documents;

    fn id(&self) -> &str {
        &self.id
    }

    fn from_draft(id: EntityId, created: i64, draft: NewDocument) -> Self {
        Self {
            id,
            kind: draft.kind,
            status: draft.status.unwrap_or_default(),
            notes: draft.notes,
            created,
        }
    }

    fn apply_patch(&mut self, patch: DocumentPatch) {
        if let Some(kind) = patch.kind {
            self.kind = kind;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(notes) = patch.notes {
            self.notes = notes;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_defaults_to_pending() {
        let doc = Document::from_draft(
            "d1".to_string(),
            1,
            NewDocument {
                kind: "Passport".to_string(),
                status: None,
                notes: String::new(),
            },
        );
        assert_eq!(doc.status, DocumentStatus::Pending);
    }

    #[test]
    fn test_status_parse_and_display() {
        assert_eq!(
            "in-progress".parse::<DocumentStatus>().unwrap(),
            DocumentStatus::InProgress
        );
        assert_eq!(" DONE ".parse::<DocumentStatus>().unwrap(), DocumentStatus::Done);
        assert_eq!(DocumentStatus::InProgress.to_string(), "in_progress");
        assert!("lost".parse::<DocumentStatus>().is_err());
    }

    #[test]
    fn test_serialized_as_type() {
        let doc = Document {
            id: "d1".to_string(),
            kind: "Visa".to_string(),
            status: DocumentStatus::InProgress,
            notes: String::new(),
            created: 1,
        };
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["type"], "Visa");
        assert_eq!(json["status"], "in_progress");
    }
}

use crate::error::CoreError;
use crate::structs::Submission;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A categorical column of a submission that reports can group by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Dimension {
    DocumentType,
    Project,
    Emitter,
    Lot,
    Indice,
    Label,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::DocumentType,
        Dimension::Project,
        Dimension::Emitter,
        Dimension::Lot,
        Dimension::Indice,
        Dimension::Label,
    ];

    /// Returns the value of this column for a submission, if present.
    pub fn value<'a>(&self, submission: &'a Submission) -> Option<&'a str> {
        let field = match self {
            Dimension::DocumentType => &submission.document_type,
            Dimension::Project => &submission.project,
            Dimension::Emitter => &submission.emitter,
            Dimension::Lot => &submission.lot,
            Dimension::Indice => &submission.indice,
            Dimension::Label => &submission.label,
        };
        field.as_deref()
    }

    /// Human-readable column title used in rendered tables.
    pub fn title(&self) -> &'static str {
        match self {
            Dimension::DocumentType => "Document type",
            Dimension::Project => "Project",
            Dimension::Emitter => "Emitter",
            Dimension::Lot => "Lot",
            Dimension::Indice => "Indice",
            Dimension::Label => "Document label",
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Dimension::DocumentType => "document-type",
            Dimension::Project => "project",
            Dimension::Emitter => "emitter",
            Dimension::Lot => "lot",
            Dimension::Indice => "indice",
            Dimension::Label => "label",
        };
        f.write_str(name)
    }
}

impl FromStr for Dimension {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "document-type" | "type" | "doc-type" => Ok(Dimension::DocumentType),
            "project" | "projet" => Ok(Dimension::Project),
            "emitter" | "issuer" | "emet" => Ok(Dimension::Emitter),
            "lot" => Ok(Dimension::Lot),
            "indice" | "index" => Ok(Dimension::Indice),
            "label" | "document" => Ok(Dimension::Label),
            other => Err(CoreError::InvalidInput(
                "dimension".to_string(),
                format!(
                    "'{other}' (expected one of: {})",
                    Dimension::ALL.map(|d| d.to_string()).join(", ")
                ),
            )),
        }
    }
}

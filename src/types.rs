use serde::{Deserialize, Serialize};

use crate::error::{GenResult, GenerateError};

//==============================================================================
// Competition Model
//==============================================================================

/// A scored competition: the template it is generated from, the jury that
/// scores it and the contestants being scored.
///
/// Juror and contestant identity is positional: the order of the two vectors
/// is the order every generated sheet and row follows. The pipeline takes an
/// owned snapshot at run start, so the order can never change mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Competition {
    pub name: String,
    pub source_sheet_id: String,
    pub jury: Vec<Juror>,
    pub contestants: Vec<Contestant>,
}

/// A juror with a scoring influence weight in percent (0-100).
///
/// `weight / 100` is written into the overview as the juror's multiplier.
/// Weights are independent fractions; they are not required to sum to 100.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Juror {
    pub name: String,
    pub weight: u8,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Contestant {
    pub name: String,
}

impl Juror {
    pub fn new(name: impl Into<String>, weight: u8) -> Self {
        Self {
            name: name.into(),
            weight,
        }
    }

    /// The weight as the fraction written into the weight column.
    pub fn weight_fraction(&self) -> f64 {
        f64::from(self.weight) / 100.0
    }
}

impl Contestant {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Competition {
    pub fn new(name: impl Into<String>, source_sheet_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source_sheet_id: source_sheet_id.into(),
            jury: Vec::new(),
            contestants: Vec::new(),
        }
    }

    /// Check the invariants a competition must hold before generation:
    /// non-empty name and template id, at least one juror and one contestant,
    /// no blank names, juror weights within 0-100.
    pub fn validate(&self) -> GenResult<()> {
        if self.name.trim().is_empty() {
            return Err(GenerateError::Validation(
                "competition name cannot be empty".to_string(),
            ));
        }

        if self.jury.is_empty() {
            return Err(GenerateError::Validation(
                "there must be at least one juror".to_string(),
            ));
        }
        for (i, juror) in self.jury.iter().enumerate() {
            if juror.name.trim().is_empty() {
                return Err(GenerateError::Validation(format!(
                    "juror #{} has an empty name",
                    i + 1
                )));
            }
            if juror.weight > 100 {
                return Err(GenerateError::Validation(format!(
                    "juror #{} has an invalid weight ({}). Must be between 0 and 100",
                    i + 1,
                    juror.weight
                )));
            }
        }

        if self.contestants.is_empty() {
            return Err(GenerateError::Validation(
                "there must be at least one contestant".to_string(),
            ));
        }
        for (i, contestant) in self.contestants.iter().enumerate() {
            if contestant.name.trim().is_empty() {
                return Err(GenerateError::Validation(format!(
                    "contestant #{} has an empty name",
                    i + 1
                )));
            }
        }

        if self.source_sheet_id.trim().is_empty() {
            return Err(GenerateError::Validation(
                "a template sheet must be defined".to_string(),
            ));
        }

        Ok(())
    }
}

//==============================================================================
// Generation Result
//==============================================================================

/// Everything a finished generation run produced on the remote store.
///
/// `sheet_names` is ordered the way the replicator emitted it: index 0 holds
/// the highest-numbered name, which belongs to the first contestant.
/// `juror_document_ids` is index-aligned with the competition's jury.
#[derive(Debug, Clone)]
pub struct GeneratedDocumentSet {
    pub folder_id: String,
    pub overview_id: String,
    pub sheet_names: Vec<String>,
    pub juror_document_ids: Vec<String>,
}

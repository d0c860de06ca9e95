//! Census records handed over by the data-entry wizard.
//!
//! These are plain, immutable inputs: the layout engine renders them as-is and the
//! ledger flattens them. Consistency checks live in [`validate_submission`] and are
//! applied at the HTTP edge only.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ────────────────────────────────────────────────────────────────────────────
// Industry categories
// ────────────────────────────────────────────────────────────────────────────

/// The seven fixed micro/small/medium industry classifications (codes 3.1–3.7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum IndustryCategory {
    #[serde(rename = "3.1")]
    Food,
    #[serde(rename = "3.2")]
    HouseholdTools,
    #[serde(rename = "3.3")]
    BuildingMaterials,
    #[serde(rename = "3.4")]
    FarmTools,
    #[serde(rename = "3.5")]
    NonMetalCrafts,
    #[serde(rename = "3.6")]
    Metal,
    #[serde(rename = "3.7")]
    Other,
}

impl IndustryCategory {
    /// All categories in code order. Column order in every table follows this.
    pub const ALL: [IndustryCategory; 7] = [
        IndustryCategory::Food,
        IndustryCategory::HouseholdTools,
        IndustryCategory::BuildingMaterials,
        IndustryCategory::FarmTools,
        IndustryCategory::NonMetalCrafts,
        IndustryCategory::Metal,
        IndustryCategory::Other,
    ];

    /// Zero-based column index (3.1 → 0, 3.7 → 6).
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn code(self) -> &'static str {
        match self {
            IndustryCategory::Food => "3.1",
            IndustryCategory::HouseholdTools => "3.2",
            IndustryCategory::BuildingMaterials => "3.3",
            IndustryCategory::FarmTools => "3.4",
            IndustryCategory::NonMetalCrafts => "3.5",
            IndustryCategory::Metal => "3.6",
            IndustryCategory::Other => "3.7",
        }
    }

    /// Label printed in the recap block.
    pub fn label(self) -> &'static str {
        match self {
            IndustryCategory::Food => "Industri Makanan",
            IndustryCategory::HouseholdTools => "Industri Alat Rumah Tangga",
            IndustryCategory::BuildingMaterials => "Industri Material Bahan Bangunan",
            IndustryCategory::FarmTools => "Industri Alat Pertanian",
            IndustryCategory::NonMetalCrafts => "Industri Kerajinan selain logam",
            IndustryCategory::Metal => "Industri Logam",
            IndustryCategory::Other => "Industri Lainnya",
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Records
// ────────────────────────────────────────────────────────────────────────────

/// Location and enumeration metadata (Blocks I and II).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub province: String,
    pub regency: String,
    pub district: String,
    pub village: String,
    pub rt: String,
    pub rw: String,
    pub enumerator_name: String,
    pub checker_name: String,
    pub date: NaiveDate,
}

impl LocationRecord {
    /// Neighbourhood unit as printed and stored: `RT 03 RW 05`.
    pub fn rt_rw(&self) -> String {
        format!("RT {} RW {}", self.rt, self.rw)
    }

    /// Survey date in `YYYY-MM-DD` form.
    pub fn date_str(&self) -> String {
        self.date.format("%Y-%m-%d").to_string()
    }
}

/// Per-category business counts entered in the recap block (Block III).
///
/// Missing categories count as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SummaryCounts {
    counts: BTreeMap<IndustryCategory, u32>,
}

impl SummaryCounts {
    #[cfg(test)]
    pub fn new(counts: [u32; 7]) -> Self {
        Self {
            counts: IndustryCategory::ALL.into_iter().zip(counts).collect(),
        }
    }

    pub fn get(&self, category: IndustryCategory) -> u32 {
        self.counts.get(&category).copied().unwrap_or(0)
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }
}

/// One business row of Block IV.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessRecord {
    pub business_name: String,
    pub owner_name: String,
    pub category_codes: BTreeSet<IndustryCategory>,
    pub worker_count: u32,
}

impl BusinessRecord {
    pub fn has_category(&self, category: IndustryCategory) -> bool {
        self.category_codes.contains(&category)
    }
}

/// Everything the wizard collects for one report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub location: LocationRecord,
    pub summary: SummaryCounts,
    #[serde(default)]
    pub businesses: Vec<BusinessRecord>,
}

impl Submission {
    /// `Pendataan_Industri_{village}_{yyyymmdd}.pdf`
    pub fn report_file_name(&self) -> String {
        format!(
            "Pendataan_Industri_{}_{}.pdf",
            self.location.village,
            self.location.date.format("%Y%m%d")
        )
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Validation
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, PartialEq)]
pub enum SubmissionError {
    #[error("summary counts total {expected} businesses but {actual} were supplied")]
    CountMismatch { expected: u64, actual: usize },

    #[error("business {ordinal} has no industry category")]
    NoCategory { ordinal: usize },

    #[error("business {ordinal} must have at least one worker")]
    NoWorkers { ordinal: usize },

    #[error("{field} must be at most 2 characters")]
    FieldTooLong { field: &'static str },
}

/// Checks the cross-record invariants the wizard is expected to guarantee.
///
/// Returns the first violation found; ordinals are 1-based.
pub fn validate_submission(submission: &Submission) -> Result<(), SubmissionError> {
    let location = &submission.location;
    if location.rt.chars().count() > 2 {
        return Err(SubmissionError::FieldTooLong { field: "rt" });
    }
    if location.rw.chars().count() > 2 {
        return Err(SubmissionError::FieldTooLong { field: "rw" });
    }

    let expected = submission.summary.total();
    if expected != submission.businesses.len() as u64 {
        return Err(SubmissionError::CountMismatch {
            expected,
            actual: submission.businesses.len(),
        });
    }

    for (i, business) in submission.businesses.iter().enumerate() {
        if business.category_codes.is_empty() {
            return Err(SubmissionError::NoCategory { ordinal: i + 1 });
        }
        if business.worker_count == 0 {
            return Err(SubmissionError::NoWorkers { ordinal: i + 1 });
        }
    }

    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

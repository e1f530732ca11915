use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;
use shared::{
    domain::{Beneficiary, Outcome},
    protocol::{TaxonomyCategory, TaxonomyReason},
};
use thiserror::Error;

const EMBEDDED_TAXONOMY: &str = include_str!("../taxonomy.toml");

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionRule {
    pub beneficiary: Beneficiary,
    pub outcome: Outcome,
}

#[derive(Debug, Error)]
pub enum TaxonomyError {
    #[error("failed to read taxonomy file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid taxonomy toml: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("taxonomy has no categories")]
    Empty,
    #[error("taxonomy category or reason name cannot be empty")]
    EmptyName,
    #[error("category '{0}' has no reasons")]
    EmptyCategory(String),
    #[error("duplicate category '{0}'")]
    DuplicateCategory(String),
    #[error("duplicate reason '{reason}' in category '{category}'")]
    DuplicateReason { category: String, reason: String },
    #[error("rule '{category}/{reason}' pairs {outcome:?} with {beneficiary:?}")]
    InconsistentRule {
        category: String,
        reason: String,
        beneficiary: Beneficiary,
        outcome: Outcome,
    },
}

#[derive(Debug, Deserialize)]
struct TaxonomyFile {
    #[serde(rename = "category", default)]
    categories: Vec<CategoryFile>,
}

#[derive(Debug, Deserialize)]
struct CategoryFile {
    name: String,
    #[serde(rename = "reason", default)]
    reasons: Vec<ReasonFile>,
}

#[derive(Debug, Deserialize)]
struct ReasonFile {
    name: String,
    beneficiary: Beneficiary,
    outcome: Outcome,
}

#[derive(Debug, Clone)]
pub struct ActionCategory {
    pub name: String,
    pub reasons: Vec<(String, ActionRule)>,
}

/// Ordered (category, reason) → rule table, loaded once at startup.
#[derive(Debug, Clone)]
pub struct ActionTaxonomy {
    categories: Vec<ActionCategory>,
}

impl ActionTaxonomy {
    /// The table compiled into the binary.
    pub fn embedded() -> Result<Self, TaxonomyError> {
        Self::from_toml_str(EMBEDDED_TAXONOMY)
    }

    pub fn load(path: &Path) -> Result<Self, TaxonomyError> {
        let raw = fs::read_to_string(path).map_err(|source| TaxonomyError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&raw)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, TaxonomyError> {
        let file: TaxonomyFile = toml::from_str(raw)?;
        if file.categories.is_empty() {
            return Err(TaxonomyError::Empty);
        }

        let mut seen_categories = HashSet::new();
        let mut categories = Vec::with_capacity(file.categories.len());
        for category in file.categories {
            let category_name = category.name.trim().to_string();
            if category_name.is_empty() {
                return Err(TaxonomyError::EmptyName);
            }
            if !seen_categories.insert(category_name.clone()) {
                return Err(TaxonomyError::DuplicateCategory(category_name));
            }
            if category.reasons.is_empty() {
                return Err(TaxonomyError::EmptyCategory(category_name));
            }

            let mut seen_reasons = HashSet::new();
            let mut reasons = Vec::with_capacity(category.reasons.len());
            for reason in category.reasons {
                let reason_name = reason.name.trim().to_string();
                if reason_name.is_empty() {
                    return Err(TaxonomyError::EmptyName);
                }
                if !seen_reasons.insert(reason_name.clone()) {
                    return Err(TaxonomyError::DuplicateReason {
                        category: category_name,
                        reason: reason_name,
                    });
                }
                // Undo derives the scoring side from the outcome alone.
                if reason.outcome.beneficiary() != reason.beneficiary {
                    return Err(TaxonomyError::InconsistentRule {
                        category: category_name,
                        reason: reason_name,
                        beneficiary: reason.beneficiary,
                        outcome: reason.outcome,
                    });
                }
                reasons.push((
                    reason_name,
                    ActionRule {
                        beneficiary: reason.beneficiary,
                        outcome: reason.outcome,
                    },
                ));
            }

            categories.push(ActionCategory {
                name: category_name,
                reasons,
            });
        }

        Ok(Self { categories })
    }

    pub fn lookup(&self, category: &str, reason: &str) -> Option<ActionRule> {
        self.categories
            .iter()
            .find(|c| c.name == category)?
            .reasons
            .iter()
            .find(|(name, _)| name == reason)
            .map(|(_, rule)| *rule)
    }

    pub fn categories(&self) -> &[ActionCategory] {
        &self.categories
    }

    pub fn listing(&self) -> Vec<TaxonomyCategory> {
        self.categories
            .iter()
            .map(|category| TaxonomyCategory {
                name: category.name.clone(),
                reasons: category
                    .reasons
                    .iter()
                    .map(|(name, rule)| TaxonomyReason {
                        name: name.clone(),
                        beneficiary: rule.beneficiary,
                        outcome: rule.outcome,
                    })
                    .collect(),
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "tests/taxonomy_tests.rs"]
mod tests;

// SPDX-FileCopyrightText: 2026 Regidesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Read-only FAQ and department catalogs.
//!
//! Catalogs are loaded once at process start from versioned TOML files and
//! injected into the router as a plain value -- there is no module-level
//! singleton. A configured file that is missing on disk yields an empty
//! catalog with a warning; an unset path falls back to the catalogs compiled
//! into the binary.

use std::path::Path;

use serde::Deserialize;
use tracing::{info, warn};

use regidesk_config::model::CatalogConfig;
use regidesk_core::RegideskError;

const DEFAULT_FAQ_TOML: &str = include_str!("../data/faq.toml");
const DEFAULT_DEPARTMENTS_TOML: &str = include_str!("../data/departments.toml");

/// One frequently-asked question with its match keywords and canned answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FaqEntry {
    pub question: String,
    pub keywords: Vec<String>,
    pub answer: String,
}

/// One department with the services it offers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DepartmentEntry {
    pub name: String,
    pub location: String,
    pub hours: String,
    #[serde(default)]
    pub contact: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    pub services: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct FaqFile {
    #[serde(default)]
    faq: Vec<FaqEntry>,
}

#[derive(Debug, Deserialize)]
struct DepartmentFile {
    #[serde(default)]
    department: Vec<DepartmentEntry>,
}

/// The read-only catalog pair handed to the intent router at construction.
///
/// Entry order is preserved from the source files; the router's first-match
/// scans depend on it.
#[derive(Debug, Clone, Default)]
pub struct Catalogs {
    pub faqs: Vec<FaqEntry>,
    pub departments: Vec<DepartmentEntry>,
}

impl Catalogs {
    /// Catalogs with no entries. The router still works; stages 3 and 4
    /// simply never match.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The catalogs compiled into the binary.
    pub fn builtin() -> Self {
        // The embedded files are validated by tests, so parse failure here
        // is a build defect.
        Self {
            faqs: parse_faq(DEFAULT_FAQ_TOML).expect("embedded FAQ catalog is valid"),
            departments: parse_departments(DEFAULT_DEPARTMENTS_TOML)
                .expect("embedded department catalog is valid"),
        }
    }

    /// Load catalogs according to configuration.
    ///
    /// For each catalog: an unset path uses the embedded default; a set path
    /// that does not exist yields an empty catalog (non-fatal, warned); a
    /// file that exists but fails to parse is a hard error.
    pub fn load(config: &CatalogConfig) -> Result<Self, RegideskError> {
        let builtin = Self::builtin();

        let faqs = match &config.faq_path {
            None => builtin.faqs,
            Some(path) => load_catalog_file(path, "faq", parse_faq)?,
        };

        let departments = match &config.departments_path {
            None => builtin.departments,
            Some(path) => load_catalog_file(path, "department", parse_departments)?,
        };

        info!(
            faqs = faqs.len(),
            departments = departments.len(),
            "catalogs loaded"
        );
        Ok(Self { faqs, departments })
    }
}

fn load_catalog_file<T>(
    path: &str,
    kind: &str,
    parse: impl Fn(&str) -> Result<Vec<T>, RegideskError>,
) -> Result<Vec<T>, RegideskError> {
    if !Path::new(path).exists() {
        warn!(path, kind, "catalog file not found, using empty catalog");
        return Ok(Vec::new());
    }
    let content = std::fs::read_to_string(path)
        .map_err(|e| RegideskError::Catalog(format!("cannot read {kind} catalog {path}: {e}")))?;
    parse(&content)
}

fn parse_faq(content: &str) -> Result<Vec<FaqEntry>, RegideskError> {
    let file: FaqFile = toml::from_str(content)
        .map_err(|e| RegideskError::Catalog(format!("malformed FAQ catalog: {e}")))?;
    Ok(file.faq)
}

fn parse_departments(content: &str) -> Result<Vec<DepartmentEntry>, RegideskError> {
    let file: DepartmentFile = toml::from_str(content)
        .map_err(|e| RegideskError::Catalog(format!("malformed department catalog: {e}")))?;
    Ok(file.department)
}

// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV preview and import for bulk member onboarding.
//!
//! Clubs hand over member lists as CSV. Preview validates every row
//! without touching the database; import creates an account per valid
//! row and reports per-row outcomes. Invalid rows never abort the whole
//! file.

use csv::StringRecord;
use std::collections::HashSet;

use courtkeep_domain::{validate_display_name, validate_email};
use courtkeep_persistence::Persistence;

use crate::auth::{AuthenticatedActor, AuthorizationService, Role};
use crate::error::ApiError;

/// A single row result from CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvRowResult {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The normalized email (if valid).
    pub email: Option<String>,
    /// The parsed display name (if valid).
    pub display_name: Option<String>,
    /// The row status.
    pub status: CsvRowStatus,
    /// Zero or more validation errors.
    pub errors: Vec<String>,
}

/// Status of a CSV row validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvRowStatus {
    /// Row is valid and can be imported.
    Valid,
    /// Row has validation errors and cannot be imported.
    Invalid,
}

/// Result of CSV preview validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvPreviewResult {
    /// Per-row validation results.
    pub rows: Vec<CsvRowResult>,
    /// Total number of rows.
    pub total_rows: usize,
    /// Number of valid rows.
    pub valid_count: usize,
    /// Number of invalid rows.
    pub invalid_count: usize,
}

/// Per-row outcome of an import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImportRowResult {
    /// The row number (1-based, excluding header).
    pub row_number: usize,
    /// The normalized email (if the row got that far).
    pub email: Option<String>,
    /// The created account ID on success.
    pub account_id: Option<i64>,
    /// Errors that prevented the row from importing.
    pub errors: Vec<String>,
}

/// Result of a CSV import run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvImportResult {
    /// Per-row outcomes.
    pub rows: Vec<CsvImportRowResult>,
    /// Number of accounts created.
    pub imported_count: usize,
    /// Number of rows skipped.
    pub skipped_count: usize,
}

/// Required CSV column headers (case-insensitive, normalized).
const REQUIRED_HEADERS: &[&str] = &["email", "display_name", "initial_password"];

/// Normalizes a CSV header for case-insensitive, whitespace-tolerant
/// matching.
fn normalize_header(header: &str) -> String {
    header.trim().to_lowercase().replace(' ', "_")
}

/// Locates the required columns in the header record.
///
/// Returns `(email, display_name, initial_password)` column indexes.
fn locate_columns(headers: &StringRecord) -> Result<(usize, usize, usize), ApiError> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();
    let mut indexes: [Option<usize>; 3] = [None; 3];
    for (position, name) in normalized.iter().enumerate() {
        for (slot, required) in REQUIRED_HEADERS.iter().enumerate() {
            if name == required {
                indexes[slot] = Some(position);
            }
        }
    }

    match indexes {
        [Some(email), Some(display_name), Some(password)] => Ok((email, display_name, password)),
        _ => {
            let missing: Vec<&str> = REQUIRED_HEADERS
                .iter()
                .enumerate()
                .filter(|(slot, _)| indexes[*slot].is_none())
                .map(|(_, name)| *name)
                .collect();
            Err(ApiError::InvalidInput {
                field: String::from("csv"),
                message: format!("Missing required CSV columns: {}", missing.join(", ")),
            })
        }
    }
}

/// Validates one CSV record, tracking duplicate emails within the file.
fn validate_record(
    row_number: usize,
    record: &StringRecord,
    columns: (usize, usize, usize),
    seen_emails: &mut HashSet<String>,
) -> CsvRowResult {
    let (email_col, name_col, password_col) = columns;
    let mut errors: Vec<String> = Vec::new();

    let email: Option<String> = match record.get(email_col).map(validate_email) {
        Some(Ok(normalized)) => {
            if seen_emails.insert(normalized.clone()) {
                Some(normalized)
            } else {
                errors.push(format!("Duplicate email '{normalized}' in file"));
                None
            }
        }
        Some(Err(e)) => {
            errors.push(e.to_string());
            None
        }
        None => {
            errors.push(String::from("Missing email column value"));
            None
        }
    };

    let display_name: Option<String> = match record.get(name_col) {
        Some(name) => match validate_display_name(name) {
            Ok(()) => Some(name.trim().to_string()),
            Err(e) => {
                errors.push(e.to_string());
                None
            }
        },
        None => {
            errors.push(String::from("Missing display_name column value"));
            None
        }
    };

    // Imported members get a provisional password; only emptiness is
    // rejected here, the full policy applies when they change it.
    if record
        .get(password_col)
        .is_none_or(|p| p.trim().is_empty())
    {
        errors.push(String::from("Missing initial_password column value"));
    }

    let status: CsvRowStatus = if errors.is_empty() {
        CsvRowStatus::Valid
    } else {
        CsvRowStatus::Invalid
    };

    CsvRowResult {
        row_number,
        email,
        display_name,
        status,
        errors,
    }
}

/// Parses and validates member CSV content without persisting anything.
///
/// # Arguments
///
/// * `actor` - The authenticated actor (Admin required)
/// * `csv_content` - The raw CSV text, including a header row
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the CSV is
/// structurally unreadable, or required columns are missing. Row-level
/// problems are reported per row, not as errors.
pub fn preview_members_csv(
    actor: &AuthenticatedActor,
    csv_content: &str,
) -> Result<CsvPreviewResult, ApiError> {
    AuthorizationService::authorize_manage_accounts(actor)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());

    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!("Failed to read CSV header: {e}"),
        })?
        .clone();
    let columns: (usize, usize, usize) = locate_columns(&headers)?;

    let mut seen_emails: HashSet<String> = HashSet::new();
    let mut rows: Vec<CsvRowResult> = Vec::new();

    for (index, record) in reader.records().enumerate() {
        let row_number: usize = index + 1;
        match record {
            Ok(record) => {
                rows.push(validate_record(row_number, &record, columns, &mut seen_emails));
            }
            Err(e) => rows.push(CsvRowResult {
                row_number,
                email: None,
                display_name: None,
                status: CsvRowStatus::Invalid,
                errors: vec![format!("Unreadable CSV row: {e}")],
            }),
        }
    }

    let valid_count: usize = rows
        .iter()
        .filter(|r| r.status == CsvRowStatus::Valid)
        .count();
    let invalid_count: usize = rows.len() - valid_count;

    Ok(CsvPreviewResult {
        total_rows: rows.len(),
        valid_count,
        invalid_count,
        rows,
    })
}

/// Imports member accounts from CSV content.
///
/// Runs the same validation as preview, then creates a Member account
/// per valid row. Rows whose email is already registered are skipped and
/// reported; they do not abort the run.
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the CSV is
/// structurally unreadable.
pub fn import_members_csv(
    persistence: &mut Persistence,
    actor: &AuthenticatedActor,
    csv_content: &str,
) -> Result<CsvImportResult, ApiError> {
    let preview: CsvPreviewResult = preview_members_csv(actor, csv_content)?;

    // Re-read the file for the password column; preview deliberately
    // drops password values from its result.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_content.as_bytes());
    let headers: StringRecord = reader
        .headers()
        .map_err(|e| ApiError::InvalidInput {
            field: String::from("csv"),
            message: format!("Failed to read CSV header: {e}"),
        })?
        .clone();
    let (_, _, password_col) = locate_columns(&headers)?;
    let passwords: Vec<Option<String>> = reader
        .records()
        .map(|r| {
            r.ok()
                .and_then(|record| record.get(password_col).map(str::to_string))
        })
        .collect();

    let mut rows: Vec<CsvImportRowResult> = Vec::new();
    let mut imported_count: usize = 0;

    for row in preview.rows {
        if row.status == CsvRowStatus::Invalid {
            rows.push(CsvImportRowResult {
                row_number: row.row_number,
                email: row.email,
                account_id: None,
                errors: row.errors,
            });
            continue;
        }

        // Valid rows always carry both fields
        let Some((email, display_name)) = row.email.clone().zip(row.display_name.clone()) else {
            continue;
        };

        let already_registered: bool = persistence
            .get_account_by_email(&email)
            .map_err(|e| ApiError::Internal {
                message: format!("Persistence error: {e}"),
            })?
            .is_some();
        if already_registered {
            rows.push(CsvImportRowResult {
                row_number: row.row_number,
                email: Some(email),
                account_id: None,
                errors: vec![String::from("Email is already registered")],
            });
            continue;
        }

        let Some(password) = passwords
            .get(row.row_number - 1)
            .cloned()
            .flatten()
            .filter(|p| !p.is_empty())
        else {
            rows.push(CsvImportRowResult {
                row_number: row.row_number,
                email: Some(email),
                account_id: None,
                errors: vec![String::from("Missing initial_password column value")],
            });
            continue;
        };

        match persistence.create_account(&email, &display_name, &password, Role::Member.as_str())
        {
            Ok(account_id) => {
                imported_count += 1;
                rows.push(CsvImportRowResult {
                    row_number: row.row_number,
                    email: Some(email),
                    account_id: Some(account_id),
                    errors: Vec::new(),
                });
            }
            Err(e) => rows.push(CsvImportRowResult {
                row_number: row.row_number,
                email: Some(email),
                account_id: None,
                errors: vec![format!("Failed to create account: {e}")],
            }),
        }
    }

    let skipped_count: usize = rows.len() - imported_count;

    Ok(CsvImportResult {
        rows,
        imported_count,
        skipped_count,
    })
}

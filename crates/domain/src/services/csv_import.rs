//! CSV lead import: header synonym mapping and best-effort row parsing.
//!
//! The first row is the header row. Each canonical field is located by a
//! case-insensitive search through a fixed synonym list; `client_name` must
//! map or the whole import aborts. Blank rows are skipped, invalid rows are
//! recorded and skipped, and the rest import. Row numbers in errors are
//! 1-based file row numbers, so the first data row is row 2.

use thiserror::Error;

use crate::models::csv_import::ImportRowError;
use shared::validation::{normalize_website, validate_email_field};

/// Accepted header synonyms per canonical field, matched case-insensitively.
const CLIENT_NAME_HEADERS: &[&str] = &[
    "client_name",
    "client name",
    "name",
    "client",
    "company",
    "company name",
    "full name",
];
const EMAIL_HEADERS: &[&str] = &["email", "email address", "e-mail", "mail"];
const PHONE_HEADERS: &[&str] = &["phone", "phone number", "mobile", "contact", "contact number"];
const WEBSITE_HEADERS: &[&str] = &["website", "web site", "url", "site"];
const REQUIRED_SERVICES_HEADERS: &[&str] =
    &["required_services", "required services", "services", "service"];
const INDUSTRY_HEADERS: &[&str] = &["industry", "sector", "category"];
const NOTES_HEADERS: &[&str] = &["notes", "note", "comments", "remarks"];
const CALL_ENQUIRY_HEADERS: &[&str] = &[
    "call_enquiry",
    "call enquiry",
    "call inquiry",
    "enquiry",
    "inquiry",
];

/// File-level failure; nothing was imported.
#[derive(Debug, Error)]
pub enum ImportFileError {
    #[error("CSV file is empty")]
    Empty,

    #[error("Missing required columns: client_name")]
    MissingRequiredColumns,

    #[error("Could not read CSV file: {0}")]
    Unreadable(String),
}

/// A successfully parsed data row, ready for insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportedRow {
    /// 1-based file row number (header row is 1).
    pub row: usize,
    pub client_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub required_services: Option<String>,
    pub industry: Option<String>,
    pub notes: Option<String>,
    pub call_enquiry: Option<String>,
}

/// Outcome of parsing a whole file.
#[derive(Debug, Clone)]
pub struct ParsedImport {
    pub rows: Vec<ImportedRow>,
    /// Data rows in the file (header excluded).
    pub total_rows: usize,
    /// Blank rows skipped.
    pub skipped: usize,
    pub errors: Vec<ImportRowError>,
}

/// Column indices resolved from the header row.
#[derive(Debug, Default)]
struct ColumnMap {
    client_name: Option<usize>,
    email: Option<usize>,
    phone: Option<usize>,
    website: Option<usize>,
    required_services: Option<usize>,
    industry: Option<usize>,
    notes: Option<usize>,
    call_enquiry: Option<usize>,
}

fn find_column(headers: &csv::StringRecord, synonyms: &[&str]) -> Option<usize> {
    headers.iter().position(|h| {
        let h = h.trim_start_matches('\u{FEFF}').trim().to_lowercase();
        synonyms.contains(&h.as_str())
    })
}

fn map_columns(headers: &csv::StringRecord) -> ColumnMap {
    ColumnMap {
        client_name: find_column(headers, CLIENT_NAME_HEADERS),
        email: find_column(headers, EMAIL_HEADERS),
        phone: find_column(headers, PHONE_HEADERS),
        website: find_column(headers, WEBSITE_HEADERS),
        required_services: find_column(headers, REQUIRED_SERVICES_HEADERS),
        industry: find_column(headers, INDUSTRY_HEADERS),
        notes: find_column(headers, NOTES_HEADERS),
        call_enquiry: find_column(headers, CALL_ENQUIRY_HEADERS),
    }
}

fn cell(record: &csv::StringRecord, index: Option<usize>) -> Option<String> {
    index
        .and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Parses an uploaded CSV file into importable rows and row-level errors.
pub fn parse_leads_csv(data: &[u8]) -> Result<ParsedImport, ImportFileError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(data);

    let mut records = reader.records();

    let headers = match records.next() {
        Some(Ok(headers)) => headers,
        Some(Err(e)) => return Err(ImportFileError::Unreadable(e.to_string())),
        None => return Err(ImportFileError::Empty),
    };

    let columns = map_columns(&headers);
    if columns.client_name.is_none() {
        return Err(ImportFileError::MissingRequiredColumns);
    }

    let mut parsed = ParsedImport {
        rows: Vec::new(),
        total_rows: 0,
        skipped: 0,
        errors: Vec::new(),
    };

    for (index, record) in records.enumerate() {
        // Header is file row 1; first data row is file row 2.
        let row_number = index + 2;
        parsed.total_rows += 1;

        let record = match record {
            Ok(record) => record,
            Err(e) => {
                parsed
                    .errors
                    .push(ImportRowError::new(row_number, format!("Unreadable row: {}", e)));
                continue;
            }
        };

        if record.iter().all(|c| c.trim().is_empty()) {
            parsed.skipped += 1;
            continue;
        }

        let client_name = match cell(&record, columns.client_name) {
            Some(name) => name,
            None => {
                parsed
                    .errors
                    .push(ImportRowError::new(row_number, "Client name is required"));
                continue;
            }
        };

        let email = cell(&record, columns.email);
        if let Some(ref email) = email {
            if validate_email_field(email).is_err() {
                parsed.errors.push(ImportRowError::new(
                    row_number,
                    format!("Invalid email address: {}", email),
                ));
                continue;
            }
        }

        let website = match cell(&record, columns.website) {
            Some(raw) => match normalize_website(&raw) {
                Ok(fixed) => Some(fixed),
                Err(_) => {
                    parsed.errors.push(ImportRowError::new(
                        row_number,
                        format!("Invalid website URL: {}", raw),
                    ));
                    continue;
                }
            },
            None => None,
        };

        parsed.rows.push(ImportedRow {
            row: row_number,
            client_name,
            email,
            phone: cell(&record, columns.phone),
            website,
            required_services: cell(&record, columns.required_services),
            industry: cell(&record, columns.industry),
            notes: cell(&record, columns.notes),
            call_enquiry: cell(&record, columns.call_enquiry),
        });
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_synonym_mapping() {
        let data = b"Name,E-Mail,Mobile,URL\nAcme,acme@example.com,+1 555 123 4567,acme.com\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        let row = &parsed.rows[0];
        assert_eq!(row.client_name, "Acme");
        assert_eq!(row.email.as_deref(), Some("acme@example.com"));
        assert_eq!(row.phone.as_deref(), Some("+1 555 123 4567"));
        // Scheme auto-fixed during import
        assert_eq!(row.website.as_deref(), Some("http://acme.com"));
    }

    #[test]
    fn test_missing_client_name_column_aborts() {
        let data = b"email,phone\nacme@example.com,555\n";
        assert!(matches!(
            parse_leads_csv(data),
            Err(ImportFileError::MissingRequiredColumns)
        ));
    }

    #[test]
    fn test_empty_file() {
        assert!(matches!(parse_leads_csv(b""), Err(ImportFileError::Empty)));
    }

    #[test]
    fn test_name_synonym_header_and_missing_value_row() {
        // Headers use the "name" synonym; second data row is missing the name.
        let data = b"name,email\nAcme,acme@example.com\n,orphan@example.com\nBeta,beta@example.com\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.total_rows, 3);
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.errors.len(), 1);
        // Header is row 1, so the offending second data row is file row 3.
        assert_eq!(parsed.errors[0].row, 3);
        assert_eq!(parsed.errors[0].message, "Client name is required");
    }

    #[test]
    fn test_blank_rows_skipped_not_errored() {
        let data = b"name,email\nAcme,acme@example.com\n,\n ,  \nBeta,\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert_eq!(parsed.skipped, 2);
        assert!(parsed.errors.is_empty());
    }

    #[test]
    fn test_invalid_email_rejects_row_continues_batch() {
        let data = b"name,email\nAcme,not-an-email\nBeta,beta@example.com\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.rows.len(), 1);
        assert_eq!(parsed.rows[0].client_name, "Beta");
        assert_eq!(parsed.errors.len(), 1);
        assert_eq!(parsed.errors[0].row, 2);
        assert!(parsed.errors[0].message.contains("email"));
    }

    #[test]
    fn test_unfixable_website_rejects_row() {
        let data = b"name,website\nAcme,not a website at all\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert!(parsed.rows.is_empty());
        assert_eq!(parsed.errors.len(), 1);
        assert!(parsed.errors[0].message.contains("website URL"));
    }

    #[test]
    fn test_bom_in_first_header() {
        let data = "\u{FEFF}client_name,email\nAcme,acme@example.com\n".as_bytes();
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.rows.len(), 1);
    }

    #[test]
    fn test_ragged_rows_tolerated() {
        let data = b"name,email,phone\nAcme,acme@example.com\nBeta,beta@example.com,555 123 4567,extra\n";
        let parsed = parse_leads_csv(data).unwrap();
        assert_eq!(parsed.rows.len(), 2);
        assert!(parsed.rows[0].phone.is_none());
    }
}

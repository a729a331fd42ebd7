//! Corpus Builder: loads the internship catalog and normalizes each row.
//!
//! Header matching ignores case, whitespace and punctuation so legacy headers
//! like `Education _Level` and `Stipend (INR)` resolve to the right column.

use std::io::Read;
use std::path::Path;

use tracing::info;

use crate::errors::MatchError;
use crate::models::internship::{CatalogSchema, InternshipPosting};

/// The loaded catalog: postings in file order plus the column schema.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    postings: Vec<InternshipPosting>,
    schema: CatalogSchema,
}

impl Catalog {
    /// Builds a catalog from in-memory rows. Indices are reassigned to match
    /// the row order.
    #[cfg(test)]
    pub fn from_postings(mut postings: Vec<InternshipPosting>, schema: CatalogSchema) -> Self {
        for (i, posting) in postings.iter_mut().enumerate() {
            posting.index = i;
        }
        Self { postings, schema }
    }

    pub fn postings(&self) -> &[InternshipPosting] {
        &self.postings
    }

    pub fn schema(&self) -> CatalogSchema {
        self.schema
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }

    /// Composite text of every posting, in catalog order.
    pub fn corpus(&self) -> Vec<String> {
        self.postings.iter().map(|p| p.composite_text()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Column {
    Title,
    SkillsRequired,
    InterestArea,
    Location,
    EducationLevel,
    Duration,
    Stipend,
}

/// Title-bearing columns in priority order.
const TITLE_HEADERS: &[&str] = &["title", "internshiptitle", "internship", "role", "company"];

fn header_key(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn classify_header(raw: &str) -> Option<Column> {
    match header_key(raw).as_str() {
        "skillsrequired" | "skills" => Some(Column::SkillsRequired),
        "interestarea" => Some(Column::InterestArea),
        "location" => Some(Column::Location),
        "educationlevel" => Some(Column::EducationLevel),
        "durationmonths" | "duration" => Some(Column::Duration),
        "stipendinr" | "stipend" => Some(Column::Stipend),
        k if TITLE_HEADERS.contains(&k) => Some(Column::Title),
        _ => None,
    }
}

/// Parses a numeric cell, stripping whitespace and thousands separators.
pub fn parse_number(cell: &str) -> Option<f64> {
    let cleaned: String = cell.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Loads the catalog from a CSV file.
pub fn load_catalog(path: &Path) -> Result<Catalog, MatchError> {
    let file = std::fs::File::open(path).map_err(|e| {
        MatchError::DataUnavailable(format!("cannot open {}: {e}", path.display()))
    })?;
    let catalog = load_catalog_from_reader(file)?;
    info!(
        "Loaded {} internship postings from {}",
        catalog.len(),
        path.display()
    );
    Ok(catalog)
}

/// Loads the catalog from any CSV source. The first record is the header.
pub fn load_catalog_from_reader<R: Read>(reader: R) -> Result<Catalog, MatchError> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| MatchError::DataUnavailable(format!("cannot read catalog header: {e}")))?
        .clone();

    // Column index per recognized field; the first title-like column by
    // priority wins.
    let mut columns: Vec<(Column, usize)> = Vec::new();
    let mut title_col: Option<(usize, usize)> = None; // (priority, index)
    for (idx, header) in headers.iter().enumerate() {
        match classify_header(header) {
            Some(Column::Title) => {
                let key = header_key(header);
                let priority = TITLE_HEADERS
                    .iter()
                    .position(|h| *h == key)
                    .unwrap_or(usize::MAX);
                if title_col.map_or(true, |(p, _)| priority < p) {
                    title_col = Some((priority, idx));
                }
            }
            Some(col) if !columns.iter().any(|(c, _)| *c == col) => columns.push((col, idx)),
            _ => {}
        }
    }

    let col_index = |col: Column| columns.iter().find(|(c, _)| *c == col).map(|(_, i)| *i);
    let schema = CatalogSchema {
        has_duration: col_index(Column::Duration).is_some(),
        has_stipend: col_index(Column::Stipend).is_some(),
        has_location: col_index(Column::Location).is_some(),
    };

    // Everything not mapped to a dedicated field is passed through. A title
    // sourced from a column other than `Title` (e.g. `Company`) is kept under
    // its own header as well.
    let is_extra_column = |idx: usize, header: &str| -> bool {
        if columns.iter().any(|(_, i)| *i == idx) {
            return false;
        }
        match title_col {
            Some((_, t)) if t == idx => header_key(header) != "title",
            _ => true,
        }
    };

    let mut postings = Vec::new();
    for (row, record) in rdr.records().enumerate() {
        let record = record.map_err(|e| {
            MatchError::DataUnavailable(format!("malformed catalog row {}: {e}", row + 1))
        })?;
        let extra = headers
            .iter()
            .enumerate()
            .filter(|(idx, header)| is_extra_column(*idx, *header))
            .map(|(idx, header)| {
                (
                    header.to_string(),
                    record.get(idx).unwrap_or_default().to_string(),
                )
            })
            .collect();
        let text = |col: Column| -> String {
            col_index(col)
                .and_then(|i| record.get(i))
                .unwrap_or_default()
                .to_string()
        };

        postings.push(InternshipPosting {
            index: row,
            title: title_col
                .and_then(|(_, i)| record.get(i))
                .filter(|t| !t.is_empty())
                .map(str::to_string),
            skills_required: text(Column::SkillsRequired),
            interest_area: text(Column::InterestArea),
            location: text(Column::Location),
            education_level: text(Column::EducationLevel),
            duration_months: col_index(Column::Duration)
                .and_then(|i| record.get(i))
                .and_then(parse_number),
            // Non-numeric stipends are coerced to 0 rather than dropped.
            stipend_inr: col_index(Column::Stipend)
                .map(|i| record.get(i).and_then(parse_number).unwrap_or(0.0)),
            extra,
        });
    }

    Ok(Catalog { postings, schema })
}

mod row_splitter;
mod sample;

pub use row_splitter::split_csv_row;
pub use sample::{sample_csv, SAMPLE_FILE_NAME};

use shared_types::{ContactRecord, DecodeResult, ImportError};

pub const DEFAULT_REQUIRED_COLUMNS: &[&str] = &["phone"];

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Decodes contact CSV text with the default column requirements.
pub fn decode(text: &str) -> DecodeResult {
    ContactCsvDecoder::new().decode(text)
}

/// Contact list CSV decoder.
///
/// Structural problems (empty input, no data rows, missing required column)
/// fail the whole decode. Row-level problems only drop that row.
#[derive(Debug, Clone)]
pub struct ContactCsvDecoder {
    required_columns: Vec<String>,
}

impl ContactCsvDecoder {
    pub fn new() -> Self {
        Self {
            required_columns: DEFAULT_REQUIRED_COLUMNS
                .iter()
                .map(|column| column.to_string())
                .collect(),
        }
    }

    /// Adds a header column that must be present for the file to decode.
    pub fn require_column(mut self, column: &str) -> Self {
        let column = column.trim().to_lowercase();
        if !column.is_empty() && !self.required_columns.contains(&column) {
            self.required_columns.push(column);
        }
        self
    }

    pub fn required_columns(&self) -> &[String] {
        &self.required_columns
    }

    pub fn decode(&self, text: &str) -> DecodeResult {
        let lines = source_lines(text);
        if lines.is_empty() {
            return Err(ImportError::EmptyInput);
        }
        if lines.len() < 2 {
            return Err(ImportError::MissingDataRows);
        }

        let header = Header::parse(lines[0].1);
        for column in &self.required_columns {
            if header.index_of(column).is_none() {
                return Err(ImportError::MissingRequiredColumn(column.clone()));
            }
        }

        let mut contacts = Vec::with_capacity(lines.len() - 1);
        for &(line_number, line) in &lines[1..] {
            let cells = split_csv_row(line);
            if cells.is_empty() {
                tracing::debug!(line = line_number, "Skipping CSV row with no cells");
                continue;
            }

            match header.record(&cells) {
                Some(contact) => contacts.push(contact),
                None => tracing::debug!(line = line_number, "Skipping CSV row without phone"),
            }
        }

        tracing::debug!(
            rows = lines.len() - 1,
            contacts = contacts.len(),
            "Decoded contact CSV"
        );

        Ok(contacts)
    }
}

/// Non-empty lines of the trimmed input, each with its 1-based line number in
/// the original text.
fn source_lines(text: &str) -> Vec<(usize, &str)> {
    let without_bom = text.trim_start_matches(BYTE_ORDER_MARK);
    let content = without_bom.trim_start();
    let skipped_lines = without_bom[..without_bom.len() - content.len()]
        .matches('\n')
        .count();

    content
        .trim_end()
        .split('\n')
        .enumerate()
        .map(|(index, line)| (skipped_lines + index + 1, line.strip_suffix('\r').unwrap_or(line)))
        .filter(|(_, line)| !line.is_empty())
        .collect()
}

impl Default for ContactCsvDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Column positions resolved from the header row. The first occurrence of a
/// repeated column name wins.
struct Header {
    columns: Vec<String>,
    phone: Option<usize>,
    name: Option<usize>,
    email: Option<usize>,
    tags: Option<usize>,
}

impl Header {
    fn parse(line: &str) -> Self {
        let columns: Vec<String> = split_csv_row(line)
            .iter()
            .map(|cell| cell.trim().to_lowercase())
            .collect();

        let position = |name: &str| columns.iter().position(|column| column == name);
        let (phone, name, email, tags) = (
            position("phone"),
            position("name"),
            position("email"),
            position("tags"),
        );

        Self {
            columns,
            phone,
            name,
            email,
            tags,
        }
    }

    fn index_of(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    fn record(&self, cells: &[String]) -> Option<ContactRecord> {
        let cell = |index: Option<usize>| index.and_then(|i| cells.get(i)).map(|c| c.trim());

        let phone = cell(self.phone).unwrap_or_default();
        if phone.is_empty() {
            return None;
        }

        let tags = cell(self.tags)
            .map(|raw| {
                raw.split([',', ';'])
                    .map(str::trim)
                    .filter(|tag| !tag.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        Some(ContactRecord {
            phone: phone.to_string(),
            name: cell(self.name).map(str::to_string),
            email: cell(self.email).map(str::to_string),
            tags,
        })
    }
}

//! CSV loading into a [`Sheet`].
//!
//! The first line of the input is row 0; there is no header handling, since
//! header cells are addressed by field descriptions like any other cell.
use crate::spreadsheet::Sheet;
use crate::spreadsheet::SpreadsheetError;
use encoding_rs::Encoding;
use encoding_rs::UTF_8;
use std::fs;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;

/// Options for reading CSV input.
#[derive(Clone, Debug)]
pub struct CsvOptions {
    /// Field delimiter (default: `,`)
    pub delimiter: u8,
    /// Encoding of the input bytes; a byte order mark overrides it (default: UTF-8)
    pub encoding: &'static Encoding,
    /// Trim surrounding whitespace from every field (default: false)
    pub trim: bool,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            delimiter: b',',
            encoding: UTF_8,
            trim: false,
        }
    }
}

impl CsvOptions {
    /// Selects the input encoding by its WHATWG label (e.g. "utf-8", "windows-1252").
    pub fn with_encoding_label(mut self, label: &str) -> Result<Self, SpreadsheetError> {
        self.encoding = Encoding::for_label(label.as_bytes()).ok_or_else(|| SpreadsheetError::UnknownEncoding {
            label: label.to_owned(),
        })?;
        Ok(self)
    }
}

impl Sheet {
    /// Parses CSV text into a sheet.
    pub fn from_csv_str(name: &str, text: &str, options: &CsvOptions) -> Result<Self, SpreadsheetError> {
        let trim = if options.trim { ::csv::Trim::All } else { ::csv::Trim::None };
        let mut reader = ::csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .has_headers(false)
            // Rows may have differing numbers of cells.
            .flexible(true)
            .trim(trim)
            .from_reader(text.as_bytes());

        let mut sheet = Sheet::new(name);
        for (row, record) in reader.records().enumerate() {
            let record = record?;
            for (col, value) in record.iter().enumerate() {
                sheet.push(row, col, value);
            }
        }
        log::debug!(
            "Read csv '{}': {} cells, last row {:?}, last column {:?}",
            name,
            sheet.len(),
            sheet.row_upper_bound,
            sheet.col_upper_bound
        );
        Ok(sheet)
    }

    /// Decodes CSV bytes with the configured encoding and parses them.
    pub fn from_csv_bytes(name: &str, bytes: &[u8], options: &CsvOptions) -> Result<Self, SpreadsheetError> {
        let (text, encoding, had_errors) = options.encoding.decode(bytes);
        if had_errors {
            return Err(SpreadsheetError::MalformedText {
                name: name.to_owned(),
                encoding: encoding.name(),
            });
        }
        Self::from_csv_str(name, &text, options)
    }

    /// Reads CSV from any reader.
    pub fn from_csv_reader<R: Read>(name: &str, mut reader: R, options: &CsvOptions) -> Result<Self, SpreadsheetError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        Self::from_csv_bytes(name, &bytes, options)
    }

    /// Reads a CSV file; the sheet is named after the file stem.
    pub fn from_csv_path(path: impl AsRef<Path>, options: &CsvOptions) -> Result<Self, SpreadsheetError> {
        let path = path.as_ref();
        let name = path
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default();
        let bytes = fs::read(path)?;
        Self::from_csv_bytes(&name, &bytes, options)
    }
}

impl FromStr for Sheet {
    type Err = SpreadsheetError;

    /// Parses comma-separated UTF-8 text with default options.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        Self::from_csv_str("", text, &CsvOptions::default())
    }
}

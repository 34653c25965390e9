//! Create and manipulate the row-based [Table] used for delimited text files.

#[cfg(test)]
mod tests;

use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display};
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// A row-based table of generic data.
///
/// # Examples
///
/// ```
/// use barcodeforge::Table;
///
/// let mut table = Table::new();
/// table.headers = vec!["clade", "from_tree_root"];
/// table.add_row(vec!["A", ">T123C>G456A"])?;
///
/// println!("{}", table.to_markdown());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
///
/// | clade | from_tree_root |
/// |-------|----------------|
/// |   A   |  >T123C>G456A  |
///
#[derive(Clone, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub struct Table<T> {
    /// Names of the table columns.
    pub headers: Vec<T>,
    /// Rows of table values.
    pub rows: Vec<Vec<T>>,
    /// Optional file path for where the table was read from.
    pub path: Option<PathBuf>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Table<T> {
    /// Create a new table with empty headers and rows.
    pub fn new() -> Self {
        Table { headers: Vec::new(), rows: Vec::new(), path: None }
    }
}

impl<T> Table<T>
where
    T: AsRef<str> + Display,
{
    /// Add a new row to the table.
    ///
    /// Returns an error if the table has headers and the row is a different length.
    pub fn add_row(&mut self, row: Vec<T>) -> Result<(), Report> {
        let ex = self.headers.len();
        let new = row.len();
        if ex != 0 && ex != new {
            return Err(eyre!("New row size ({new}) does not match existing table ({ex})."));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Get the column index (0-based) correponding to the header.
    ///
    /// # Examples
    ///
    /// ```
    /// use barcodeforge::Table;
    ///
    /// let mut table = Table::new();
    /// table.headers = vec!["position", "ref", "root"];
    ///
    /// assert_eq!(table.get_header_index("root")?, 2);
    /// assert!(table.get_header_index("alt").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn get_header_index(&self, header: &str) -> Result<usize, Report> {
        self.headers
            .iter()
            .position(|h| h.as_ref() == header)
            .ok_or_else(|| eyre!("Column '{header}' was not found in table: {:?}.", self.path))
    }

    /// Return the value of a column in a row, or [`None`] if the row is too short.
    ///
    /// Delimited files frequently omit trailing empty fields, so a short row is not an error.
    pub fn get(&self, header: &str, row: usize) -> Result<Option<&T>, Report> {
        let header_i = self.get_header_index(header)?;
        let row = self.rows.get(row).ok_or_else(|| eyre!("Row ({row}) does not exist in the table."))?;
        Ok(row.get(header_i))
    }

    /// Write table to file.
    ///
    /// ## Arguments
    ///
    /// * `path` - Output file path. Parent directories are created.
    /// * `delim` - Optional delimiter. Otherwise, will be identified based on path suffix (.tsv or .csv).
    pub fn write<P>(&self, path: &P, delim: Option<char>) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug,
    {
        let delim = delimiter_byte(path, delim)?;

        utils::create_parent_dir(path)?;
        let file =
            File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;

        // fields holding the delimiter, quotes, or newlines are quoted
        let mut writer = csv::WriterBuilder::new()
            .delimiter(delim)
            .flexible(true)
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(BufWriter::new(file));

        // write headers
        if !self.headers.is_empty() {
            writer
                .write_record(self.headers.iter().map(|h| h.as_ref()))
                .wrap_err_with(|| format!("Unable to write table headers: {path:?}"))?;
        }

        // write regular rows
        for (i, row) in self.rows.iter().enumerate() {
            writer
                .write_record(row.iter().map(|cell| cell.as_ref()))
                .wrap_err_with(|| format!("Unable to write table row {i}: {path:?}"))?;
        }

        writer.flush().wrap_err_with(|| format!("Unable to write table: {path:?}"))?;

        Ok(())
    }

    /// Convert table to markdown format.
    pub fn to_markdown(&self) -> String {
        // get the maximum width of each column, +2 to add space on either side
        let col_widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(col_i, header)| {
                let header_width = header.as_ref().len();
                self.rows
                    .iter()
                    .filter_map(|row| row.get(col_i))
                    .map(|cell| cell.as_ref().len())
                    .chain([header_width])
                    .max()
                    .unwrap_or(header_width)
                    + 2
            })
            .collect_vec();

        let mut markdown = String::from("|");
        // frame in between headers and rows
        let mut header_frame = String::from("|");

        // Create the header line
        for (header, col_width) in self.headers.iter().zip(col_widths.iter()) {
            markdown.push_str(&format!("{:^width$}|", header.as_ref(), width = col_width));
            header_frame.push_str(&format!("{}|", "-".repeat(*col_width)));
        }
        markdown.push('\n');
        markdown.push_str(&header_frame);
        markdown.push('\n');

        // Create the row lines
        for row in &self.rows {
            markdown.push('|');
            for (col_i, col_width) in col_widths.iter().enumerate() {
                let cell = row.get(col_i).map(|c| c.as_ref()).unwrap_or_default();
                markdown.push_str(&format!("{:^width$}|", cell, width = col_width));
            }
            markdown.push('\n');
        }

        markdown
    }
}

impl Table<String> {
    /// Read a TSV or CSV file into a Table.
    ///
    /// ## Arguments
    ///
    /// * `path` - File path.
    /// * `delim` - Optional delimiter. Otherwise, will be identified based on path suffix (.tsv or .csv).
    /// * `has_headers` - True if the first line holds column names.
    ///
    /// # Examples
    ///
    /// ```
    /// use barcodeforge::Table;
    /// use std::io::Write;
    ///
    /// let mut file = tempfile::NamedTempFile::new()?;
    /// writeln!(file, "clade\tfrom_tree_root\nA\t>T123C")?;
    /// let table = Table::read(&file.path(), Some('\t'), true)?;
    /// assert_eq!(table.headers, ["clade", "from_tree_root"]);
    /// assert_eq!(table.rows, [["A", ">T123C"]]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P, delim: Option<char>, has_headers: bool) -> Result<Table<String>, Report>
    where
        P: AsRef<Path> + Debug,
    {
        let mut table = Table::new();
        let delim = delimiter_byte(path, delim)?;

        // quoted fields may hold the delimiter, short rows are allowed
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delim)
            .has_headers(false)
            .flexible(true)
            .from_reader(utils::open(path)?);

        // read and parse records, blank lines are skipped
        for (i, record) in reader.records().enumerate() {
            let record =
                record.wrap_err_with(|| format!("Failed to read record {i} of: {path:?}"))?;
            let row = record.iter().map(String::from).collect_vec();
            // if headers are empty, this is the first line, write headers
            if has_headers && table.headers.is_empty() {
                table.headers = row;
            }
            // otherwise regular row
            else {
                table.rows.push(row);
            }
        }

        table.path = Some(path.as_ref().to_path_buf());

        Ok(table)
    }
}

/// Returns the delimiter as a byte. If not provided, it is looked up from the file extension.
fn delimiter_byte<P>(path: &P, delim: Option<char>) -> Result<u8, Report>
where
    P: AsRef<Path> + Debug,
{
    let delim = match delim {
        Some(c) => c,
        None => utils::get_delimiter(path)?,
    };
    u8::try_from(delim).map_err(|_| eyre!("Delimiter must be a single-byte character: {delim:?}"))
}

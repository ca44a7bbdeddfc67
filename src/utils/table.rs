use crate::utils;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use itertools::Itertools;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Table
// ----------------------------------------------------------------------------

/// A row-based table of delimited text data.
///
/// All values are kept as strings; typed parsing happens at the call sites
/// that know what a column holds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Table {
    /// Names of the table columns.
    pub headers: Vec<String>,
    /// Rows of table values.
    pub rows: Vec<Vec<String>>,
    /// Optional file path for where the table was read from.
    pub path: Option<PathBuf>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Read a delimited text file into a table.
    ///
    /// The first line is the header row; the delimiter is looked up from the
    /// file extension (`.tsv`/`.txt` = tab, `.csv` = comma).
    pub fn read(path: &Path) -> Result<Table, Report> {
        let delim = utils::get_delimiter(&path)?;
        let file = File::open(path).wrap_err_with(|| eyre!("Failed to read file: {path:?}"))?;

        let mut table = Table::new();
        for line in BufReader::new(file).lines().flatten() {
            if line.is_empty() {
                continue;
            }
            let row = line.split(delim).map(String::from).collect_vec();
            // if headers are empty, this is the first line, write headers
            if table.headers.is_empty() {
                table.headers = row;
            }
            // otherwise regular row
            else {
                table.rows.push(row);
            }
        }
        table.path = Some(path.to_path_buf());

        Ok(table)
    }

    /// Returns the column index (0-based) of a header.
    pub fn header_position(&self, header: &str) -> Result<usize, Report> {
        let pos =
            self.headers.iter().position(|h| h == header).ok_or_else(|| {
                eyre!("Column {header:?} was not found in table: {:?}.", self.path)
            })?;

        Ok(pos)
    }

    /// Returns the value under a header at a row index.
    pub fn get(&self, header: &str, row: usize) -> Result<&str, Report> {
        let header_i = self.header_position(header)?;
        let row = self
            .rows
            .get(row)
            .ok_or_else(|| eyre!("Row ({row}) does not exist in table: {:?}.", self.path))?;
        row.get(header_i)
            .map(|value| value.as_str())
            .ok_or_else(|| eyre!("Row is missing column {header:?} in table: {:?}.", self.path))
    }

    /// Returns all values under a header.
    pub fn column(&self, header: &str) -> Result<Vec<&str>, Report> {
        let header_i = self.header_position(header)?;
        let column = self.rows.iter().map(|row| row[header_i].as_str()).collect_vec();
        Ok(column)
    }

    /// Add a new row to the table.
    pub fn add_row<I, S>(&mut self, row: I) -> Result<(), Report>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let row = row.into_iter().map(|value| value.into()).collect_vec();
        if row.len() != self.headers.len() {
            return Err(eyre!(
                "New row size ({}) does not match the table headers ({}).",
                row.len(),
                self.headers.len()
            ));
        }
        self.rows.push(row);
        Ok(())
    }

    /// Write the table to a file, delimiter from the path extension.
    pub fn write(&self, path: &Path) -> Result<(), Report> {
        let mut file =
            File::create(path).wrap_err_with(|| format!("Unable to create file: {path:?}"))?;

        // Parse line delimiter from file extension
        let delim = utils::get_delimiter(&path)?.to_string();

        // write headers
        let line = format!("{}\n", self.headers.iter().join(&delim));
        file.write_all(line.as_bytes())
            .wrap_err_with(|| format!("Unable to write table headers: {line}"))?;

        // write regular rows
        for row in &self.rows {
            let line = format!("{}\n", row.iter().join(&delim));
            file.write_all(line.as_bytes())
                .wrap_err_with(|| format!("Unable to write table rows: {line}"))?;
        }

        Ok(())
    }

    /// Convert the table to markdown format, for console previews.
    pub fn to_markdown(&self) -> Result<String, Report> {
        // pad every column to its widest cell, +2 for space on either side
        let widths = self
            .headers
            .iter()
            .enumerate()
            .map(|(col_i, header)| {
                let widest = self.rows.iter().map(|row| row[col_i].len()).max().unwrap_or(0);
                widest.max(header.len()) + 2
            })
            .collect_vec();

        let row_line = |row: &[String]| {
            let cells = row
                .iter()
                .zip(widths.iter())
                .map(|(cell, &width)| format!("{cell:^width$}"))
                .join("|");
            format!("|{cells}|\n")
        };

        // header line, then the frame, then the regular rows
        let mut markdown = row_line(&self.headers);
        let frame = widths.iter().map(|width| "-".repeat(*width)).join("|");
        markdown.push_str(&format!("|{frame}|\n"));
        self.rows.iter().for_each(|row| markdown.push_str(&row_line(row)));

        Ok(markdown)
    }
}

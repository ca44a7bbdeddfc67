pub mod table;
pub mod verbosity;


use color_eyre::eyre::{eyre, ContextCompat, Report, Result, WrapErr};
use color_eyre::Help;
use std::fmt::Debug;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Get delimiter based on file extension.
///
/// ## Examples
///
/// - `.tsv` => `\t`
/// - `.txt` => `\t`
/// - `.csv` => `,`
///
/// Note that `.txt` is assumed to be tab-delimited!
///
/// ```rust
/// use cyanobgc::utils::get_delimiter;
///
/// assert_eq!(get_delimiter(&"file.tsv")?, '\t');
/// assert_eq!(get_delimiter(&"file.csv")?, ',');
/// assert_eq!(get_delimiter(&"file.txt")?, '\t');
/// assert!(get_delimiter(&"file").is_err());
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn get_delimiter<P>(path: &P) -> Result<char, Report>
where
    P: AsRef<Path> + Debug,
{
    let ext = path
        .as_ref()
        .extension()
        .wrap_err_with(|| format!("Failed to get file extension: {path:?}"))?
        .to_str()
        .wrap_err_with(|| format!("Failed to convert file extension to str: {path:?}"))?;
    // convert extension to the expected delimiter
    match ext {
        "tsv" | "txt" => Ok('\t'),
        "csv" => Ok(','),
        _ext => Err(eyre!("Unknown file extension: {_ext:?}").suggestion("Use one of: tsv, csv, txt")),
    }
}

/// Read a plain list file into one value per non-empty line.
pub fn read_lines<P>(path: &P) -> Result<Vec<String>, Report>
where
    P: AsRef<Path> + Debug,
{
    let file =
        File::open(path.as_ref()).wrap_err_with(|| eyre!("Failed to read file: {path:?}"))?;
    let lines = BufReader::new(file)
        .lines()
        .flatten()
        .map(|line| line.trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();
    Ok(lines)
}

/// Parse a boolean table cell.
///
/// Tables exported from upstream annotation tools vary in their boolean
/// spelling, so `True/False`, `true/false` and `1/0` are all accepted.
pub fn parse_bool(value: &str) -> Result<bool, Report> {
    match value {
        "true" | "True" | "TRUE" | "1" => Ok(true),
        "false" | "False" | "FALSE" | "0" => Ok(false),
        _ => Err(eyre!("Invalid boolean value: {value:?}"))
            .suggestion("Expected one of: True, False, true, false, 1, 0"),
    }
}

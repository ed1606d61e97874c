// CSV ingestion for the Book-Crossing style dumps.
//
// The files are `;`-separated and latin-1 encoded, and a fair number of lines
// have stray separators inside unquoted fields. Lines with more fields than
// the header are skipped and counted rather than failing the whole load.
// Short lines are kept and read as missing trailing values. Only I/O errors
// and a missing required column are fatal.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use tracing::{debug, info, warn};

use crate::catalog::models::Rating;
use crate::catalog::table::{cell, Table, RATING_COLUMNS};
use crate::error::BuildError;

/// A table plus how many input lines were dropped on the way in.
#[derive(Debug, Clone)]
pub struct LoadedTable {
    pub table: Table,
    pub skipped: usize,
}

/// Ratings plus how many rows were dropped on the way in (malformed lines
/// and unparseable ratings together).
#[derive(Debug, Clone)]
pub struct LoadedRatings {
    pub ratings: Vec<Rating>,
    pub skipped: usize,
}

/// Open and read a books file. Column validation happens later, in
/// `Table::books`.
pub fn load_books(path: &Path) -> Result<LoadedTable, BuildError> {
    let file = File::open(path)?;
    let loaded = read_table(BufReader::new(file))?;
    info!(
        path = %path.display(),
        rows = loaded.table.len(),
        skipped = loaded.skipped,
        "Loaded books table"
    );
    Ok(loaded)
}

/// Open and read a ratings file.
pub fn load_ratings(path: &Path) -> Result<LoadedRatings, BuildError> {
    let file = File::open(path)?;
    let loaded = read_ratings(BufReader::new(file))?;
    info!(
        path = %path.display(),
        ratings = loaded.ratings.len(),
        skipped = loaded.skipped,
        "Loaded ratings table"
    );
    Ok(loaded)
}

/// Read a `;`-separated, latin-1 table with a header row.
///
/// Lines with more fields than the header are skipped. Shorter lines are
/// kept, their trailing columns reading as missing. Empty cells become `None`.
pub fn read_table<R: Read>(reader: R) -> Result<LoadedTable, BuildError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b';')
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = rdr
        .byte_headers()?
        .iter()
        .map(|h| decode_latin1(h).trim().to_string())
        .collect();

    let mut rows = Vec::new();
    let mut skipped = 0usize;

    for (n, record) in rdr.byte_records().enumerate() {
        match record {
            Ok(rec) if rec.len() <= headers.len() => {
                rows.push(rec.iter().map(to_cell).collect());
            }
            Ok(rec) => {
                skipped += 1;
                debug!(
                    record = n + 1,
                    fields = rec.len(),
                    expected = headers.len(),
                    "Skipping line with extra fields"
                );
            }
            Err(e) if e.is_io_error() => return Err(e.into()),
            Err(e) => {
                skipped += 1;
                debug!(record = n + 1, error = %e, "Skipping unparseable line");
            }
        }
    }

    if skipped > 0 {
        warn!(skipped, kept = rows.len(), "Skipped malformed lines");
    }

    Ok(LoadedTable {
        table: Table::new(headers, rows),
        skipped,
    })
}

/// Read a ratings table (`User-ID;ISBN;Book-Rating`).
///
/// Rows with a missing user or ISBN, or a rating that isn't an integer in
/// 0..=10, are skipped.
pub fn read_ratings<R: Read>(reader: R) -> Result<LoadedRatings, BuildError> {
    let LoadedTable { table, mut skipped } = read_table(reader)?;
    let cols = table.require(&RATING_COLUMNS)?;
    let (user, isbn, rating) = (cols[0], cols[1], cols[2]);

    let mut ratings = Vec::with_capacity(table.len());
    let mut bad_values = 0usize;
    for row in table.rows() {
        let parsed = match (cell(row, user), cell(row, isbn), cell(row, rating)) {
            (Some(u), Some(i), Some(r)) => parse_rating(r).map(|rating| Rating {
                user_id: u.to_string(),
                isbn: i.to_string(),
                rating,
            }),
            _ => None,
        };
        match parsed {
            Some(r) => ratings.push(r),
            None => bad_values += 1,
        }
    }

    if bad_values > 0 {
        warn!(bad_values, "Skipped ratings with missing or invalid values");
    }
    skipped += bad_values;

    Ok(LoadedRatings { ratings, skipped })
}

fn parse_rating(raw: &str) -> Option<u8> {
    raw.trim().parse::<u8>().ok().filter(|r| *r <= 10)
}

fn to_cell(field: &[u8]) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(decode_latin1(field))
    }
}

/// Latin-1 maps every byte to the code point of the same value.
pub fn decode_latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| char::from(b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_latin1_accents() {
        // "Café" in latin-1
        assert_eq!(decode_latin1(&[0x43, 0x61, 0x66, 0xE9]), "Café");
    }

    #[test]
    fn test_parse_rating_bounds() {
        assert_eq!(parse_rating("0"), Some(0));
        assert_eq!(parse_rating(" 10 "), Some(10));
        assert_eq!(parse_rating("11"), None);
        assert_eq!(parse_rating("-1"), None);
        assert_eq!(parse_rating("eight"), None);
    }

    #[test]
    fn test_empty_fields_become_none() {
        let data = b"a;b;c\n1;;3\n";
        let loaded = read_table(&data[..]).unwrap();
        assert_eq!(
            loaded.table.rows()[0],
            vec![Some("1".to_string()), None, Some("3".to_string())]
        );
    }

    #[test]
    fn test_headers_are_trimmed_and_unquoted() {
        let data = b"\"ISBN\"; Book-Title \n1;Dune\n";
        let loaded = read_table(&data[..]).unwrap();
        assert_eq!(loaded.table.headers(), ["ISBN", "Book-Title"]);
    }

    #[test]
    fn test_short_rows_are_kept() {
        let data = b"a;b;c\n1;2\n1;2;3;4\n";
        let loaded = read_table(&data[..]).unwrap();
        assert_eq!(loaded.skipped, 1);
        assert_eq!(loaded.table.len(), 1);
        assert_eq!(cell(&loaded.table.rows()[0], 2), None);
    }
}

//! CSV extract reading
//!
//! CNES extracts are `;`-delimited with `"` quoting and a header row. Older
//! extracts are Latin-1, newer ones UTF-8, sometimes with a BOM.

use std::path::{Path, PathBuf};

use csv::{ReaderBuilder, Trim};
use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid CSV header in {path}: {source}")]
    Header { path: PathBuf, source: csv::Error },
}

/// Decode as UTF-8 (dropping a BOM), falling back to ISO-8859-1
pub fn decode(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => match text.strip_prefix('\u{feff}') {
            Some(stripped) => stripped.to_string(),
            None => text,
        },
        // Every byte is a valid Latin-1 code point
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Deserialize every data row; rows that fail to map are logged and skipped
pub fn parse_rows<T: DeserializeOwned>(text: &str, source: &Path) -> Result<Vec<T>, ReadError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b';')
        .quote(b'"')
        .trim(Trim::All)
        .flexible(true)
        .from_reader(text.as_bytes());

    reader.headers().map_err(|source_err| ReadError::Header {
        path: source.to_path_buf(),
        source: source_err,
    })?;

    let mut rows = Vec::new();
    for (index, result) in reader.deserialize::<T>().enumerate() {
        match result {
            Ok(row) => rows.push(row),
            // +2: header line, 1-based numbering
            Err(e) => tracing::warn!(
                "Skipping line {} of {}: {}",
                index + 2,
                source.display(),
                e
            ),
        }
    }
    Ok(rows)
}

/// Read and parse one extract file
pub fn read_rows<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, ReadError> {
    let bytes = std::fs::read(path).map_err(|source| ReadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = parse_rows(&decode(bytes), path)?;
    tracing::info!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use std::io::Write;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Row {
        #[serde(rename = "CO_UNIDADE")]
        codigo: String,
        #[serde(rename = "NO_BAIRRO")]
        bairro: Option<String>,
    }

    #[test]
    fn decodes_utf8_and_strips_bom() {
        let bytes = "\u{feff}São Paulo".as_bytes().to_vec();
        assert_eq!(decode(bytes), "São Paulo");
    }

    #[test]
    fn falls_back_to_latin1() {
        // "Ceará" in ISO-8859-1
        let bytes = vec![0x43, 0x65, 0x61, 0x72, 0xE1];
        assert_eq!(decode(bytes), "Ceará");
    }

    #[test]
    fn maps_by_header_and_ignores_extra_columns() {
        let text = "\"CO_UNIDADE\";\"NO_EXTRA\";\"NO_BAIRRO\"\n\
                    \"2304402000001\";\"x\";\" Papicu \"\n\
                    \"2304402000002\";\"y\";\"  \"\n";

        let rows: Vec<Row> = parse_rows(text, Path::new("test.csv")).unwrap();

        assert_eq!(
            rows,
            vec![
                Row {
                    codigo: "2304402000001".to_string(),
                    bairro: Some("Papicu".to_string()),
                },
                Row {
                    codigo: "2304402000002".to_string(),
                    bairro: None,
                },
            ]
        );
    }

    #[test]
    fn missing_optional_column_is_absent() {
        let text = "CO_UNIDADE\n2304402000001\n";

        let rows: Vec<Row> = parse_rows(text, Path::new("test.csv")).unwrap();

        assert_eq!(rows[0].bairro, None);
    }

    #[test]
    fn reads_latin1_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"CO_UNIDADE;NO_BAIRRO\n2304402000001;Jos\xE9 Bonif\xE1cio\n")
            .unwrap();

        let rows: Vec<Row> = read_rows(file.path()).unwrap();

        assert_eq!(rows[0].bairro.as_deref(), Some("José Bonifácio"));
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let result: Result<Vec<Row>, _> = read_rows(&dir.path().join("tbProf.csv"));
        assert!(matches!(result, Err(ReadError::Io { .. })));
    }
}

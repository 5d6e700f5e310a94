//! CSV Data Loader Module
//! Reads the review CSV into a Polars DataFrame, every column kept as text.

use polars::prelude::*;
use serde::Deserialize;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse CSV: {0}")]
    CsvError(#[from] PolarsError),
}

/// Byte decoding applied before the CSV parser sees the file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Encoding {
    /// Every byte is one code point; never fails.
    #[default]
    Latin1,
    /// Invalid UTF-8 sequences become U+FFFD.
    Utf8Lossy,
}

impl Encoding {
    pub fn decode(self, bytes: &[u8]) -> String {
        match self {
            Encoding::Latin1 => encoding_rs::mem::decode_latin1(bytes).into_owned(),
            Encoding::Utf8Lossy => {
                let (text, had_errors) = encoding_rs::UTF_8.decode_without_bom_handling(bytes);
                if had_errors {
                    tracing::warn!("invalid UTF-8 replaced with U+FFFD");
                }
                text.into_owned()
            }
        }
    }
}

/// Handles the one-shot dataset read.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file, decoding it with `encoding` first.
    pub fn load_csv(
        &mut self,
        file_path: impl AsRef<Path>,
        encoding: Encoding,
    ) -> Result<&DataFrame, LoaderError> {
        let path = file_path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| LoaderError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let df = Self::parse_csv(encoding.decode(&bytes))?;
        tracing::info!(
            path = %path.display(),
            rows = df.height(),
            columns = df.width(),
            ?encoding,
            "loaded review dataset"
        );

        self.file_path = Some(path.to_path_buf());
        Ok(&*self.df.insert(df))
    }

    /// Parse already-decoded CSV text. Schema inference is disabled so that
    /// mixed cells like "4 stars" survive as strings for the normalizer.
    pub fn parse_csv(text: String) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(text.into_bytes()))
            .finish()?;
        Ok(df)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    /// Get file path.
    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn latin1_maps_every_byte() {
        let decoded = Encoding::Latin1.decode(b"caf\xe9 \xff");
        assert_eq!(decoded, "caf\u{e9} \u{ff}");
    }

    #[test]
    fn lossy_utf8_replaces_invalid_bytes() {
        let decoded = Encoding::Utf8Lossy.decode(b"ok\xff");
        assert_eq!(decoded, "ok\u{fffd}");
    }

    #[test]
    fn latin1_upper_half_is_iso_8859_1_not_windows_1252() {
        // 0x80..0x9f stay C1 controls rather than becoming curly quotes or the euro sign.
        let decoded = Encoding::Latin1.decode(b"\x80\x93\x9f");
        assert_eq!(decoded, "\u{80}\u{93}\u{9f}");
    }

    #[test]
    fn lossy_utf8_keeps_a_leading_bom() {
        let decoded = Encoding::Utf8Lossy.decode(b"\xef\xbb\xbfa");
        assert_eq!(decoded, "\u{feff}a");
    }

    #[test]
    fn parse_keeps_every_column_as_text() {
        let df = DataLoader::parse_csv("rating,latitude\n4 stars,40.1\n1 star,x\n".to_string())
            .unwrap();
        assert_eq!(df.height(), 2);
        assert_eq!(df.column("rating").unwrap().dtype(), &DataType::String);
        assert_eq!(df.column("latitude").unwrap().dtype(), &DataType::String);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv("/definitely/not/here.csv", Encoding::Latin1)
            .unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
        assert_eq!(loader.get_row_count(), 0);
        assert!(loader.get_file_path().is_none());
    }
}

//! Record sets persisted as semicolon delimited, ISO-8859-1 encoded text
//!
//! The header is `imagen;descripcion;generated_description;fecha`. Unknown columns are ignored
//! on load and missing ones read as empty. Every save rewrites the whole file.
use std::path::{Path, PathBuf};

use anyhow::{Context as _, Result};
use async_trait::async_trait;
use derive_builder::Builder;
use retablo_core::{
    COLUMNS, DESCRIPTION_COLUMN, LoadedRecords, Record, RecordStore, errors::StoreError,
};

mod latin1;

/// A [`RecordStore`] backed by a single delimited file
///
/// # Example
///
/// ```no_run
/// # use retablo_integrations::csv::CsvStore;
/// let store = CsvStore::new("imagenes/nuevas_descripciones.csv");
/// ```
#[derive(Debug, Clone, Builder)]
#[builder(setter(into))]
pub struct CsvStore {
    path: PathBuf,

    /// Field delimiter, `;` by default
    #[builder(default = "b';'")]
    delimiter: u8,
}

impl CsvStore {
    pub fn builder() -> CsvStoreBuilder {
        CsvStoreBuilder::default()
    }

    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            delimiter: b';',
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl RecordStore for CsvStore {
    /// A missing file is an empty record set. Anything that does not parse is an error.
    #[tracing::instrument(skip_all, fields(path = %self.path.display()), err)]
    async fn load(&self) -> Result<LoadedRecords, StoreError> {
        let bytes = match fs_err::tokio::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!("No record set yet, starting empty");
                return Ok(LoadedRecords::default());
            }
            Err(err) => return Err(StoreError::read(self.location(), err)),
        };

        let loaded = parse_records(&latin1::decode(&bytes), self.delimiter)
            .map_err(|err| StoreError::parse(self.location(), err))?;

        tracing::info!(records = loaded.records.len(), "Loaded record set");

        Ok(loaded)
    }

    #[tracing::instrument(skip_all, fields(path = %self.path.display(), records = records.len()), err)]
    async fn save(&self, records: &[Record]) -> Result<(), StoreError> {
        let text = serialize_records(records, self.delimiter)
            .map_err(|err| StoreError::write(self.location(), err))?;

        let (bytes, replaced) = latin1::encode(&text);
        if replaced > 0 {
            tracing::warn!(
                replaced,
                "Replaced characters that cannot be encoded as ISO-8859-1"
            );
        }

        if let Some(parent) = self
            .path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
        {
            fs_err::tokio::create_dir_all(parent)
                .await
                .map_err(|err| StoreError::write(self.location(), err))?;
        }

        fs_err::tokio::write(&self.path, bytes)
            .await
            .map_err(|err| StoreError::write(self.location(), err))?;

        tracing::debug!("Saved record set");

        Ok(())
    }
}

fn parse_records(text: &str, delimiter: u8) -> Result<LoadedRecords> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers().context("Could not read header")?.clone();
    if headers.iter().all(str::is_empty) {
        anyhow::bail!("Missing header");
    }
    let has_descriptions = headers.iter().any(|h| h.trim() == DESCRIPTION_COLUMN);

    // Short rows read their missing trailing fields as empty, long rows are rejected
    let records = reader
        .records()
        .enumerate()
        .map(|(i, row)| {
            let row = row.with_context(|| format!("Invalid record {}", i + 1))?;
            anyhow::ensure!(
                row.len() <= headers.len(),
                "Record {} has {} fields, the header has {}",
                i + 1,
                row.len(),
                headers.len()
            );

            row.deserialize::<Record>(Some(&headers))
                .with_context(|| format!("Invalid record {}", i + 1))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(LoadedRecords {
        records,
        has_descriptions,
    })
}

fn serialize_records(records: &[Record], delimiter: u8) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(COLUMNS)?;
    for record in records {
        writer.serialize(record)?;
    }

    let bytes = writer.into_inner().context("Failed to flush records")?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;
    use pretty_assertions::assert_eq;
    use temp_dir::TempDir;

    fn record(title: &str, description: &str) -> Record {
        Record::builder()
            .image(format!("https://example.com/{title}.jpg"))
            .title(title)
            .description(description)
            .timestamp("2024-07-16 10:00:00")
            .build()
            .unwrap()
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.child("nuevas_descripciones.csv"));

        let loaded = store.load().await.unwrap();

        assert!(loaded.records.is_empty());
        assert!(loaded.has_descriptions);
    }

    #[test_log::test(tokio::test)]
    async fn test_save_then_load_preserves_order() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.child("imagenes/nuevas_descripciones.csv"));
        let records = vec![
            record("Qhapaq Negro", "Danzantes con máscaras negras"),
            record("Saqras", "Diablos; con cuernos\ny colas"),
            record("Qhapaq Negro", "Otra vez, la misma danza"),
        ];

        store.save(&records).await.unwrap();
        let loaded = store.load().await.unwrap();

        assert_eq!(loaded.records, records);
    }

    #[test_log::test(tokio::test)]
    async fn test_writes_header_and_latin1() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        let store = CsvStore::new(&path);

        store
            .save(&[record("Procesión", "La Mamacha sale")])
            .await
            .unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let expected = b"imagen;descripcion;generated_description;fecha\n\
            https://example.com/Procesi\xf3n.jpg;Procesi\xf3n;La Mamacha sale;2024-07-16 10:00:00\n";
        assert_eq!(bytes, expected.to_vec());
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_set_writes_header_only() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        let store = CsvStore::new(&path);

        store.save(&[]).await.unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "imagen;descripcion;generated_description;fecha\n"
        );
        assert!(store.load().await.unwrap().records.is_empty());
    }

    #[test_log::test(tokio::test)]
    async fn test_unmappable_characters_are_replaced() {
        let dir = TempDir::new().unwrap();
        let store = CsvStore::new(dir.child("history.csv"));

        store
            .save(&[record("Saqras", "Diablos — “danzantes”")])
            .await
            .unwrap();

        let loaded = store.load().await.unwrap();
        assert_eq!(loaded.records[0].description, "Diablos ? ?danzantes?");
    }

    #[test_log::test(tokio::test)]
    async fn test_missing_and_unknown_columns() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        std::fs::write(
            &path,
            indoc! {"
                Unnamed: 0;imagen;descripcion
                0;foto.png;Contradanza
            "},
        )
        .unwrap();

        let loaded = CsvStore::new(&path).load().await.unwrap();

        assert!(!loaded.has_descriptions);
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].image, "foto.png");
        assert_eq!(loaded.records[0].title, "Contradanza");
        assert_eq!(loaded.records[0].description, "");
    }

    #[test_log::test(tokio::test)]
    async fn test_malformed_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        std::fs::write(
            &path,
            indoc! {"
                imagen;descripcion;generated_description;fecha
                a.png;Título;Descripción;2024-01-01;extra
            "},
        )
        .unwrap();

        let err = CsvStore::new(&path).load().await.unwrap_err();

        assert!(err.is_parse_error());
    }

    #[test_log::test(tokio::test)]
    async fn test_short_rows_read_missing_fields_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        std::fs::write(
            &path,
            indoc! {"
                imagen;descripcion;generated_description;fecha
                a.png;Qollas;Pastores
                b.png
                c.png;Saqras;Diablos;2024-07-16 10:00:00
            "},
        )
        .unwrap();

        let loaded = CsvStore::new(&path).load().await.unwrap();

        assert!(loaded.has_descriptions);
        assert_eq!(loaded.records.len(), 3);
        assert_eq!(loaded.records[0].title, "Qollas");
        assert_eq!(loaded.records[0].description, "Pastores");
        assert_eq!(loaded.records[0].timestamp, "");
        assert_eq!(loaded.records[1].image, "b.png");
        assert_eq!(loaded.records[1].title, "");
        assert_eq!(loaded.records[2].timestamp, "2024-07-16 10:00:00");
    }

    #[test_log::test(tokio::test)]
    async fn test_empty_file_is_a_parse_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("history.csv");
        std::fs::write(&path, "").unwrap();

        let err = CsvStore::new(&path).load().await.unwrap_err();

        assert!(err.is_parse_error());
    }

    #[test]
    fn test_builder_custom_delimiter() {
        let store = CsvStore::builder()
            .path("history.tsv")
            .delimiter(b'\t')
            .build()
            .unwrap();

        assert_eq!(store.delimiter, b'\t');
        assert_eq!(store.path(), Path::new("history.tsv"));
    }
}

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

/// Column headers of a persisted record set, in order
pub const COLUMNS: [&str; 4] = ["imagen", "descripcion", "generated_description", "fecha"];

/// The column that holds generated descriptions
pub const DESCRIPTION_COLUMN: &str = "generated_description";

/// A single saved generation: the image it was for, the title the user gave, the description the
/// model returned and when it happened.
///
/// Records are never mutated once stored. Any field may be empty when read back from an older
/// or hand edited record set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Record {
    /// Reference to the image, a url or a local path
    #[serde(rename = "imagen", default)]
    #[builder(default)]
    pub image: String,

    #[serde(rename = "descripcion", default)]
    pub title: String,

    #[serde(rename = "generated_description", default)]
    pub description: String,

    /// Local time, formatted as `%Y-%m-%d %H:%M:%S`
    #[serde(rename = "fecha", default)]
    #[builder(default)]
    pub timestamp: String,
}

impl Record {
    pub fn builder() -> RecordBuilder {
        RecordBuilder::default()
    }

    /// Only records with both a title and a description serve as prompt examples
    pub fn is_example(&self) -> bool {
        !self.title.trim().is_empty() && !self.description.trim().is_empty()
    }
}

/// The result of loading a record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedRecords {
    pub records: Vec<Record>,
    /// False when the persisted set predates generated descriptions and has no such column
    pub has_descriptions: bool,
}

impl Default for LoadedRecords {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            has_descriptions: true,
        }
    }
}

impl From<Vec<Record>> for LoadedRecords {
    fn from(records: Vec<Record>) -> Self {
        Self {
            records,
            has_descriptions: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case("Danza Qhapaq Negro", "Bailarines con máscaras", true ; "complete")]
    #[test_case("", "Bailarines con máscaras", false ; "missing title")]
    #[test_case("Danza Qhapaq Negro", "", false ; "missing description")]
    #[test_case("  ", "Bailarines con máscaras", false ; "whitespace title")]
    fn test_is_example(title: &str, description: &str, expected: bool) {
        let record = Record::builder()
            .title(title)
            .description(description)
            .build()
            .unwrap();

        assert_eq!(record.is_example(), expected);
    }

    #[test]
    fn test_builder_defaults_optional_fields() {
        let record = Record::builder()
            .title("Procesión")
            .description("La Virgen sale del templo")
            .build()
            .unwrap();

        assert_eq!(record.image, "");
        assert_eq!(record.timestamp, "");
    }

    #[test]
    fn test_builder_requires_title() {
        assert!(Record::builder().description("Sin título").build().is_err());
    }
}

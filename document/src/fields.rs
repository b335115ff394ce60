//! Scalar metadata fields and the value formats shared by every section.

use std::str::FromStr;

use thiserror::Error;

use crate::MapDocument;

/// A field value could not be interpreted.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("field `{field}` has invalid value `{value}`")]
pub struct FieldValueError {
    /// Name of the offending field.
    pub field: &'static str,
    /// Text that failed to parse.
    pub value: String,
}

impl FieldValueError {
    pub(crate) fn new(field: &'static str, value: &str) -> Self {
        Self {
            field,
            value: value.to_owned(),
        }
    }
}

type ReadField = fn(&mut MapDocument, &str) -> Result<(), FieldValueError>;
type WriteField = fn(&MapDocument) -> Option<String>;

/// Named scalar persisted at the top level of the map text.
///
/// `write` returning `None` means the field is unset and is omitted.
pub(crate) struct ScalarField {
    pub(crate) name: &'static str,
    pub(crate) read: ReadField,
    pub(crate) write: WriteField,
}

/// Scalar fields in the order they are written.
pub(crate) const SCALAR_FIELDS: &[ScalarField] = &[
    ScalarField {
        name: "Selectable",
        read: |map, value| {
            map.metadata.selectable = parse_bool("Selectable", value)?;
            Ok(())
        },
        write: |map| Some(format_bool(map.metadata.selectable).to_owned()),
    },
    ScalarField {
        name: "MapFormat",
        read: |map, value| {
            map.metadata.map_format = parse_value("MapFormat", value)?;
            Ok(())
        },
        write: |map| Some(map.metadata.map_format.to_string()),
    },
    ScalarField {
        name: "RequiresMod",
        read: |map, value| {
            map.metadata.requires_mod = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.requires_mod.clone(),
    },
    ScalarField {
        name: "Title",
        read: |map, value| {
            map.metadata.title = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.title.clone(),
    },
    ScalarField {
        name: "Description",
        read: |map, value| {
            map.metadata.description = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.description.clone(),
    },
    ScalarField {
        name: "Author",
        read: |map, value| {
            map.metadata.author = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.author.clone(),
    },
    ScalarField {
        name: "Tileset",
        read: |map, value| {
            map.metadata.tileset = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.tileset.clone(),
    },
    ScalarField {
        name: "MapSize",
        read: |map, value| {
            map.map_size = parse_value("MapSize", value)?;
            Ok(())
        },
        write: |map| Some(map.map_size.to_string()),
    },
    ScalarField {
        name: "Bounds",
        read: |map, value| {
            map.bounds = parse_value("Bounds", value)?;
            Ok(())
        },
        write: |map| Some(map.bounds.to_string()),
    },
    ScalarField {
        name: "UseAsShellmap",
        read: |map, value| {
            map.metadata.use_as_shellmap = parse_bool("UseAsShellmap", value)?;
            Ok(())
        },
        write: |map| Some(format_bool(map.metadata.use_as_shellmap).to_owned()),
    },
    ScalarField {
        name: "Type",
        read: |map, value| {
            map.metadata.map_type = optional_string(value);
            Ok(())
        },
        write: |map| map.metadata.map_type.clone(),
    },
    ScalarField {
        name: "StartPoints",
        read: |map, value| {
            map.metadata.start_points = Some(parse_value("StartPoints", value)?);
            Ok(())
        },
        write: |map| map.metadata.start_points.map(|count| count.to_string()),
    },
];

fn optional_string(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_owned())
}

pub(crate) fn parse_value<T: FromStr>(
    field: &'static str,
    value: &str,
) -> Result<T, FieldValueError> {
    value
        .trim()
        .parse()
        .map_err(|_| FieldValueError::new(field, value))
}

pub(crate) fn parse_bool(field: &'static str, value: &str) -> Result<bool, FieldValueError> {
    match value.trim() {
        text if text.eq_ignore_ascii_case("true") => Ok(true),
        text if text.eq_ignore_ascii_case("false") => Ok(false),
        _ => Err(FieldValueError::new(field, value)),
    }
}

pub(crate) const fn format_bool(value: bool) -> &'static str {
    if value {
        "True"
    } else {
        "False"
    }
}

pub(crate) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

pub(crate) fn format_list(items: &[String]) -> String {
    items.join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_names_follow_write_order() {
        let names: Vec<&str> = SCALAR_FIELDS.iter().map(|field| field.name).collect();
        assert_eq!(
            names,
            [
                "Selectable",
                "MapFormat",
                "RequiresMod",
                "Title",
                "Description",
                "Author",
                "Tileset",
                "MapSize",
                "Bounds",
                "UseAsShellmap",
                "Type",
                "StartPoints",
            ]
        );
    }

    #[test]
    fn booleans_parse_case_insensitively() {
        assert_eq!(parse_bool("Selectable", "True"), Ok(true));
        assert_eq!(parse_bool("Selectable", "false"), Ok(false));
        assert_eq!(
            parse_bool("Selectable", "yes"),
            Err(FieldValueError::new("Selectable", "yes"))
        );
    }

    #[test]
    fn lists_skip_blank_items() {
        assert_eq!(
            parse_list("GoodGuy, ,BadGuy"),
            vec!["GoodGuy".to_owned(), "BadGuy".to_owned()]
        );
        assert!(parse_list("").is_empty());
        assert_eq!(
            format_list(&["GoodGuy".to_owned(), "Creeps".to_owned()]),
            "GoodGuy, Creeps"
        );
    }

    #[test]
    fn unset_optional_fields_are_omitted() {
        let map = MapDocument::blank();
        let written: Vec<&str> = SCALAR_FIELDS
            .iter()
            .filter(|field| (field.write)(&map).is_some())
            .map(|field| field.name)
            .collect();
        assert_eq!(
            written,
            ["Selectable", "MapFormat", "MapSize", "Bounds", "UseAsShellmap"]
        );
    }

    #[test]
    fn scalar_reads_update_the_document() {
        let mut map = MapDocument::blank();
        for (name, value) in [
            ("MapSize", "64,48"),
            ("Bounds", "2,2,60,44"),
            ("StartPoints", "4"),
            ("Title", "Twin Rivers"),
        ] {
            let field = SCALAR_FIELDS
                .iter()
                .find(|field| field.name == name)
                .expect("field exists");
            (field.read)(&mut map, value).expect("value parses");
        }

        assert_eq!(map.map_size().to_string(), "64,48");
        assert_eq!(map.bounds().to_string(), "2,2,60,44");
        assert_eq!(map.metadata().start_points, Some(4));
        assert_eq!(map.metadata().title.as_deref(), Some("Twin Rivers"));
    }

    #[test]
    fn malformed_scalars_are_rejected() {
        let mut map = MapDocument::blank();
        let field = SCALAR_FIELDS
            .iter()
            .find(|field| field.name == "MapSize")
            .expect("field exists");
        assert_eq!(
            (field.read)(&mut map, "64"),
            Err(FieldValueError::new("MapSize", "64"))
        );
    }
}

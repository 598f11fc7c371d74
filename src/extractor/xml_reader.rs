use super::coerce::{coerce_field, RecordRef};
use crate::errors::{AppError, AppResult};
use crate::models::{Row, Schema};
use quick_xml::escape::resolve_predefined_entity;
use quick_xml::events::Event;
use quick_xml::reader::Reader;
use std::fs;
use std::io::Cursor;
use std::path::Path;

// Element depths: the document root is 1, each record 2, each field 3.
const RECORD_DEPTH: usize = 2;
const FIELD_DEPTH: usize = 3;

/// Collects the field texts of one record element.
///
/// Only the first occurrence of a field element counts; later duplicates are ignored.
struct RecordBuilder {
    fields: Vec<Option<String>>,
    current_field: Option<usize>,
}

impl RecordBuilder {
    fn new(width: usize) -> Self {
        Self {
            fields: vec![None; width],
            current_field: None,
        }
    }

    fn reset(&mut self) {
        self.fields.iter_mut().for_each(|f| *f = None);
        self.current_field = None;
    }

    fn enter_field(&mut self, index: Option<usize>) {
        self.current_field = match index {
            Some(i) if self.fields[i].is_none() => {
                self.fields[i] = Some(String::new());
                Some(i)
            }
            _ => None,
        };
    }

    fn clear_current_field(&mut self) {
        self.current_field = None;
    }

    fn push_text(&mut self, text: &str) {
        if let Some(i) = self.current_field {
            if let Some(value) = self.fields[i].as_mut() {
                value.push_str(text);
            }
        }
    }

    fn is_capturing(&self) -> bool {
        self.current_field.is_some()
    }

    fn build(&mut self, schema: &Schema, at: RecordRef) -> AppResult<Row> {
        let values = schema
            .columns()
            .iter()
            .zip(self.fields.iter())
            .map(|(column, raw)| coerce_field(column, raw.as_deref().map(str::trim), at))
            .collect::<AppResult<Vec<_>>>()?;
        self.reset();
        Ok(Row::new(values))
    }
}

/// Reads a markup file: one row per child element of the document root.
pub fn read_xml(path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    let content = fs::read(path).map_err(|e| {
        AppError::IoError(format!("Failed to read XML file {}: {e}", path.display()))
    })?;
    parse_xml_bytes(&content, path, schema)
}

/// Parses XML content provided as bytes. `path` is only used in error messages.
///
/// For every child of the root element, each schema column is looked up as a direct
/// child element by name. Its character data (entities and CDATA resolved) is
/// trimmed and coerced like any other source; a missing element leaves text columns
/// empty and fails numeric ones with `MissingNumericField`.
pub(crate) fn parse_xml_bytes(content: &[u8], path: &Path, schema: &Schema) -> AppResult<Vec<Row>> {
    let mut reader = Reader::from_reader(Cursor::new(content));
    let mut buf = Vec::with_capacity(1024);
    let mut rows = Vec::new();

    let mut depth = 0usize;
    let mut record = 0usize;
    let mut builder = RecordBuilder::new(schema.len());

    loop {
        let event = match reader.read_event_into(&mut buf) {
            Ok(event) => event,
            Err(e) => {
                return Err(AppError::ParseError(format!(
                    "Malformed XML in {} at position {}: {e}",
                    path.display(),
                    reader.buffer_position()
                )))
            }
        };

        match event {
            Event::Start(e) => {
                depth += 1;
                match depth {
                    RECORD_DEPTH => {
                        record += 1;
                        builder.reset();
                    }
                    FIELD_DEPTH => {
                        let name = decode_name(e.name().as_ref(), path)?;
                        builder.enter_field(schema.index_of(&name));
                    }
                    _ => {}
                }
            }
            Event::Empty(e) => match depth + 1 {
                RECORD_DEPTH => {
                    record += 1;
                    builder.reset();
                    let at = RecordRef { file: path, record };
                    rows.push(builder.build(schema, at)?);
                }
                FIELD_DEPTH => {
                    let name = decode_name(e.name().as_ref(), path)?;
                    builder.enter_field(schema.index_of(&name));
                    builder.clear_current_field();
                }
                _ => {}
            },
            Event::Text(e) if depth == FIELD_DEPTH && builder.is_capturing() => {
                let text = e.decode().map_err(|e| {
                    AppError::ParseError(format!(
                        "Failed to decode XML text in {}: {e}",
                        path.display()
                    ))
                })?;
                builder.push_text(&text);
            }
            Event::CData(e) if depth == FIELD_DEPTH && builder.is_capturing() => {
                let text = e.decode().map_err(|e| {
                    AppError::ParseError(format!(
                        "Failed to decode XML CDATA in {}: {e}",
                        path.display()
                    ))
                })?;
                builder.push_text(&text);
            }
            Event::GeneralRef(e) if depth == FIELD_DEPTH && builder.is_capturing() => {
                let resolved = match e.resolve_char_ref() {
                    Ok(Some(ch)) => ch.to_string(),
                    Ok(None) => {
                        let name = e.decode().map_err(|err| {
                            AppError::ParseError(format!(
                                "Failed to decode XML entity in {}: {err}",
                                path.display()
                            ))
                        })?;
                        resolve_predefined_entity(&name)
                            .ok_or_else(|| {
                                AppError::ParseError(format!(
                                    "Unknown XML entity &{name}; in {}",
                                    path.display()
                                ))
                            })?
                            .to_string()
                    }
                    Err(err) => {
                        return Err(AppError::ParseError(format!(
                            "Invalid character reference in {}: {err}",
                            path.display()
                        )))
                    }
                };
                builder.push_text(&resolved);
            }
            Event::End(_) => {
                match depth {
                    RECORD_DEPTH => {
                        let at = RecordRef { file: path, record };
                        rows.push(builder.build(schema, at)?);
                    }
                    FIELD_DEPTH => builder.clear_current_field(),
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }

    if depth != 0 {
        return Err(AppError::ParseError(format!(
            "Malformed XML in {}: document ended inside an open element",
            path.display()
        )));
    }

    Ok(rows)
}

fn decode_name(name: &[u8], path: &Path) -> AppResult<String> {
    std::str::from_utf8(name)
        .map(str::to_string)
        .map_err(|e| {
            AppError::ParseError(format!(
                "Invalid element name in {}: {e}",
                path.display()
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Value;
    use std::fs;
    use std::io::Write;
    use tempfile::TempDir;

    // Helper function to create a test XML file
    fn create_test_xml_file(path: &std::path::Path, content: &str) {
        let parent = path.parent().unwrap();
        fs::create_dir_all(parent).unwrap();
        fs::File::create(path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
    }

    fn schema() -> Schema {
        Schema::new(&["name", "height", "weight"], &["height", "weight"]).unwrap()
    }

    fn parse_str(content: &str) -> AppResult<Vec<Row>> {
        parse_xml_bytes(content.as_bytes(), Path::new("people.xml"), &schema())
    }

    #[test]
    fn test_parse_xml_valid_document() {
        let temp_dir = TempDir::new().unwrap();
        let xml_path = temp_dir.path().join("people.xml");
        let xml_content = r#"<?xml version="1.0"?>
<data>
  <person>
    <name>Ann</name>
    <height>65.5</height>
    <weight>120</weight>
  </person>
  <person>
    <weight>150.25</weight>
    <height>70</height>
    <name>Lee</name>
  </person>
</data>"#;
        create_test_xml_file(&xml_path, xml_content);

        let rows = read_xml(&xml_path, &schema()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[0].values(),
            &[
                Value::Text("Ann".into()),
                Value::Number(65.5),
                Value::Number(120.0)
            ]
        );
        assert_eq!(
            rows[1].values(),
            &[
                Value::Text("Lee".into()),
                Value::Number(70.0),
                Value::Number(150.25)
            ]
        );
    }

    #[test]
    fn test_parse_xml_missing_text_field_is_empty() {
        let rows = parse_str(
            r#"<data><person><height>70</height><weight>150</weight></person></data>"#,
        )
        .unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].get(0), Some(&Value::Text(String::new())));
    }

    #[test]
    fn test_parse_xml_missing_numeric_field_is_rejected() {
        let err = parse_str(
            r#"<data>
  <person><name>Ann</name><height>65</height><weight>120</weight></person>
  <person><name>Bo</name><height>70</height></person>
</data>"#,
        )
        .unwrap_err();
        match err {
            AppError::MissingNumericField {
                file,
                record,
                field,
            } => {
                assert_eq!(file, "people.xml");
                assert_eq!(record, 2);
                assert_eq!(field, "weight");
            }
            other => panic!("Expected MissingNumericField, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_xml_empty_numeric_element_is_rejected() {
        let err = parse_str(
            r#"<data><person><name>Ann</name><height/><weight>120</weight></person></data>"#,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            AppError::MissingNumericField { ref field, .. } if field == "height"
        ));
    }

    #[test]
    fn test_parse_xml_non_numeric_value() {
        let err = parse_str(
            r#"<data><person><name>Ann</name><height>tall</height><weight>120</weight></person></data>"#,
        )
        .unwrap_err();
        assert!(matches!(err, AppError::TypeCoercion { .. }));
    }

    #[test]
    fn test_parse_xml_entities_and_cdata() {
        let rows = parse_str(
            r#"<data><person><name>Ann &amp; <![CDATA[<Bo>]]> &#65;</name><height>70</height><weight>150</weight></person></data>"#,
        )
        .unwrap();
        assert_eq!(rows[0].get(0), Some(&Value::Text("Ann & <Bo> A".into())));
    }

    #[test]
    fn test_parse_xml_invalid_utf8_in_cdata_is_rejected() {
        let mut content = b"<data><person><name><![CDATA[A".to_vec();
        content.push(0xff);
        content.extend_from_slice(b"]]></name><height>70</height><weight>150</weight></person></data>");

        let result = parse_xml_bytes(&content, Path::new("people.xml"), &schema());
        assert!(matches!(
            result,
            Err(AppError::ParseError(ref msg)) if msg.contains("people.xml")
        ));
    }

    #[test]
    fn test_parse_xml_ignores_unknown_and_nested_elements() {
        let rows = parse_str(
            r#"<data>
  <person>
    <id>7</id>
    <name>Ann<nick>A</nick></name>
    <height>70</height>
    <height>99</height>
    <weight>150</weight>
  </person>
</data>"#,
        )
        .unwrap();
        assert_eq!(
            rows[0].values(),
            &[
                Value::Text("Ann".into()),
                Value::Number(70.0),
                Value::Number(150.0)
            ]
        );
    }

    #[test]
    fn test_parse_xml_empty_root() {
        let rows = parse_str(r#"<?xml version="1.0"?><data></data>"#).unwrap();
        assert!(rows.is_empty());
        let rows = parse_str(r#"<data/>"#).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn test_parse_xml_malformed() {
        let result = parse_str(
            r#"<data>
  <person>
    <name>unclosed
  </person>
</data>"#,
        );
        assert!(matches!(result, Err(AppError::ParseError(_))));
    }

    #[test]
    fn test_parse_xml_truncated_document() {
        let result = parse_str(r#"<data><person><name>Ann</name>"#);
        assert!(result.is_err());
    }
}

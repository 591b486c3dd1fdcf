//! Moving the document in and out of the app as user-visible JSON files

use std::io::{Read, Write};

use chrono::Utc;
use serde::Serialize;

use crate::class_tag::ClassTag;
use crate::config;
use crate::document::Document;
use crate::error::{Error, Result};
use crate::task::Task;

/// The shape of an exported file
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ExportPayload<'a> {
    exported_at: i64,
    classes: &'a [ClassTag],
    tasks: &'a [Task],
}

/// Writes the document in the export shape (`exportedAt` + data), pretty-printed
/// since users get to see this file.
pub fn export<W: Write>(document: &Document, writer: W) -> Result<()> {
    let payload = ExportPayload {
        exported_at: Utc::now().timestamp_millis(),
        classes: document.classes(),
        tasks: document.tasks(),
    };
    serde_json::to_writer_pretty(writer, &payload)?;
    Ok(())
}

/// A file name to suggest for the exported data, safe on any platform
pub fn export_file_name() -> String {
    sanitize_filename::sanitize(format!("{}-data.json", config::app_name().to_lowercase()))
}

/// Reads an exported or raw document file into a normalized [`Document`].
///
/// Both the export shape (`exportedAt` + data) and the document shape (`updatedAt` +
/// data) are accepted. A file missing the `classes` or `tasks` keys is rejected with
/// [`Error::ImportFormat`] and the caller's state stays untouched; actually adopting
/// the result is done with
/// [`Provider::replace_document`](crate::provider::Provider::replace_document), which
/// counts it as a local edit.
pub fn import<R: Read>(reader: R) -> Result<Document> {
    let value: serde_json::Value = serde_json::from_reader(reader)
        .map_err(|err| Error::ImportFormat(format!("not a JSON file: {}", err)))?;

    if value.get("classes").is_none() || value.get("tasks").is_none() {
        return Err(Error::ImportFormat(
            "missing the \"classes\" and \"tasks\" entries".to_string(),
        ));
    }

    let mut document: Document =
        serde_json::from_value(value).map_err(|err| Error::ImportFormat(err.to_string()))?;
    document.normalize();
    Ok(document)
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::class_tag::ClassId;
    use crate::task::NewTask;

    fn sample_document() -> Document {
        let mut doc = Document::default();
        let maths = doc.add_class("Maths", "#ff0000").unwrap();
        doc.add_task(NewTask {
            title: "Worksheet".to_string(),
            date: "2024-03-18".to_string(),
            class_id: maths.id().clone(),
            ..NewTask::default()
        })
        .unwrap();
        doc
    }

    #[test]
    fn export_then_import_round_trips() {
        let doc = sample_document();

        let mut buffer = Vec::new();
        export(&doc, &mut buffer).unwrap();

        let imported = import(buffer.as_slice()).unwrap();
        assert_eq!(imported.classes(), doc.classes());
        assert_eq!(imported.tasks(), doc.tasks());
        // the export shape carries no updatedAt
        assert_eq!(imported.updated_at(), 0);
    }

    #[test]
    fn import_accepts_the_document_shape() {
        let imported = import(
            br##"{
                "classes": [{ "id": "general", "name": "General", "color": "#4f46e5" }],
                "tasks": [{ "id": "a", "title": "Read", "date": "2024-03-18", "classId": "gone" }],
                "updatedAt": 42
            }"##
            .as_slice(),
        )
        .unwrap();

        assert_eq!(imported.updated_at(), 42);
        // import is a deserialization boundary: invariants get repaired
        assert!(imported.tasks()[0].class_id().is_general());
    }

    #[test]
    fn import_rejects_files_without_the_expected_shape() {
        assert!(matches!(import(b"not json at all".as_slice()), Err(Error::ImportFormat(_))));
        assert!(matches!(import(b"{}".as_slice()), Err(Error::ImportFormat(_))));
        assert!(matches!(
            import(br#"{ "classes": [] }"#.as_slice()),
            Err(Error::ImportFormat(_))
        ));
        assert!(matches!(
            import(br#"{ "tasks": [] }"#.as_slice()),
            Err(Error::ImportFormat(_))
        ));
    }

    #[test]
    fn export_file_name_is_sane() {
        assert_eq!(export_file_name(), "chalkboard-data.json");
    }
}

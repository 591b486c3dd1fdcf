//! This module provides durable local storage for the document and the settings

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;

use crate::document::Document;
use crate::error::Result;
use crate::settings::Settings;

const DOCUMENT_FILE_NAME: &str = "document.json";
const SETTINGS_FILE_NAME: &str = "settings.json";

/// File-backed storage: one folder holding the document and the settings as JSON files.
///
/// Loading is infallible on purpose: a missing or unparseable file falls back to
/// defaults (logged, never fatal), so a damaged store can not keep the application
/// from starting.
#[derive(Clone, Debug, PartialEq)]
pub struct Store {
    folder: PathBuf,
}

impl Store {
    /// Create a store over this folder. Nothing is read or written yet.
    pub fn new(folder: &Path) -> Self {
        Self {
            folder: folder.to_path_buf(),
        }
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    fn document_path(&self) -> PathBuf {
        self.folder.join(DOCUMENT_FILE_NAME)
    }

    fn settings_path(&self) -> PathBuf {
        self.folder.join(SETTINGS_FILE_NAME)
    }

    /// Returns the last saved document, normalized, or the default document when
    /// nothing usable is stored.
    pub fn load(&self) -> Document {
        let path = self.document_path();
        let mut document = match fs::read(&path) {
            // Nothing stored yet: a fresh start, not an error
            Err(_) => Document::default(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(document) => document,
                Err(err) => {
                    log::warn!("Unable to parse {:?}: {}. Starting from the default document.", path, err);
                    Document::default()
                }
            },
        };
        document.normalize();
        document
    }

    /// Saves the document.
    ///
    /// As part of the save contract this stamps `updatedAt` with the current time;
    /// callers never set it themselves.
    pub fn save(&self, document: &mut Document) -> Result<()> {
        document.touch(Utc::now().timestamp_millis());
        self.write_document(document)
    }

    /// Saves the document exactly as given, keeping its `updatedAt`.
    ///
    /// This is the pull path of a sync: a document adopted from the cloud must keep
    /// the remote timestamp, or the next exchange would mistake it for a local edit
    /// and bounce it straight back.
    pub fn save_replica(&self, document: &Document) -> Result<()> {
        self.write_document(document)
    }

    fn write_document(&self, document: &Document) -> Result<()> {
        fs::create_dir_all(&self.folder)?;
        let file = fs::File::create(self.document_path())?;
        serde_json::to_writer(file, document)?;
        Ok(())
    }

    /// Returns the saved settings, or the defaults when nothing usable is stored.
    pub fn load_settings(&self) -> Settings {
        let path = self.settings_path();
        match fs::read(&path) {
            Err(_) => Settings::default(),
            Ok(bytes) => match serde_json::from_slice(&bytes) {
                Ok(settings) => settings,
                Err(err) => {
                    log::warn!("Unable to parse {:?}: {}. Using the default settings.", path, err);
                    Settings::default()
                }
            },
        }
    }

    pub fn save_settings(&self, settings: &Settings) -> Result<()> {
        fs::create_dir_all(&self.folder)?;
        let file = fs::File::create(self.settings_path())?;
        serde_json::to_writer(file, settings)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::class_tag::ClassId;
    use crate::task::NewTask;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path());
        (dir, store)
    }

    #[test]
    fn serde_store_round_trip() {
        let (_dir, store) = temp_store();

        let mut document = Document::default();
        document.add_class("Maths", "#ff0000").unwrap();
        document
            .add_task(NewTask {
                title: "Worksheet".to_string(),
                date: "2024-03-18".to_string(),
                class_id: ClassId::general(),
                ..NewTask::default()
            })
            .unwrap();

        assert_eq!(document.updated_at(), 0);
        store.save(&mut document).unwrap();
        assert!(document.updated_at() > 0);

        let retrieved = store.load();
        assert_eq!(retrieved, document);
    }

    #[test]
    fn save_replica_keeps_the_timestamp() {
        let (_dir, store) = temp_store();

        let document: Document = serde_json::from_value(serde_json::json!({
            "classes": [{ "id": "general", "name": "General", "color": "#4f46e5" }],
            "tasks": [],
            "updatedAt": 12345,
        }))
        .unwrap();

        store.save_replica(&document).unwrap();
        assert_eq!(store.load().updated_at(), 12345);
    }

    #[test]
    fn load_falls_back_to_defaults() {
        let (_dir, store) = temp_store();

        // nothing stored yet
        assert_eq!(store.load(), Document::default());

        // stored garbage
        fs::create_dir_all(store.folder()).unwrap();
        fs::write(store.folder().join(DOCUMENT_FILE_NAME), b"{ not json").unwrap();
        assert_eq!(store.load(), Document::default());

        // stored JSON with both data keys missing: defaults are substituted
        fs::write(store.folder().join(DOCUMENT_FILE_NAME), b"{}").unwrap();
        assert_eq!(store.load(), Document::default());
    }

    #[test]
    fn serde_settings_round_trip() {
        let (_dir, store) = temp_store();

        assert_eq!(store.load_settings(), Settings::default());

        let settings = Settings {
            endpoint: Some("https://example.com/bin/42".parse().unwrap()),
            theme: crate::settings::Theme::Dark,
        };
        store.save_settings(&settings).unwrap();
        assert_eq!(store.load_settings(), settings);

        fs::write(store.folder().join(SETTINGS_FILE_NAME), b"???").unwrap();
        assert_eq!(store.load_settings(), Settings::default());
    }
}

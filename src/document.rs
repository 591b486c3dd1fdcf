//! The document: every class, every task, and the last-modified timestamp
//!
//! This is the unit of persistence (see [`Store`](crate::store::Store)) and the unit of
//! synchronization (see [`Provider`](crate::provider::Provider)). Sync never merges
//! field-by-field: a newer copy replaces an older one wholesale.

use std::collections::HashSet;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::class_tag::{ClassId, ClassTag};
use crate::error::{Error, Result};
use crate::task::{NewTask, Task, TaskId, TaskPatch};

/// The complete data set of one user.
///
/// Mutation operations uphold three invariants:
/// * class ids are unique,
/// * every `task.class_id` resolves to an existing class (violations coming from
///   outside are repaired by rebinding to the general class, never by rejecting),
/// * the general class is never removed.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    #[serde(default)]
    classes: Vec<ClassTag>,

    #[serde(default)]
    tasks: Vec<Task>,

    /// Milliseconds since the epoch. Stamped by [`Store::save`](crate::store::Store::save)
    /// on every persisted mutation, never derived from the contents.
    #[serde(default)]
    updated_at: i64,
}

impl Default for Document {
    fn default() -> Self {
        Self {
            classes: vec![ClassTag::general()],
            tasks: Vec::new(),
            updated_at: 0,
        }
    }
}

impl Document {
    pub fn classes(&self) -> &[ClassTag] {
        &self.classes
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn updated_at(&self) -> i64 {
        self.updated_at
    }

    /// Returns the class with this id, if any
    pub fn class(&self, id: &ClassId) -> Option<&ClassTag> {
        self.classes.iter().find(|class| class.id() == id)
    }

    /// Returns the task with this id, if any
    pub fn task(&self, id: &TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id() == id)
    }

    /// Advance the last-modified timestamp. It never goes backwards, even if the
    /// wall clock does.
    pub(crate) fn touch(&mut self, now_ms: i64) {
        self.updated_at = self.updated_at.max(now_ms);
    }

    /// Create a new class and append it.
    ///
    /// The name must not be empty once trimmed, and the color must parse as a CSS
    /// color; it is stored in canonical hex notation.
    pub fn add_class(&mut self, name: &str, color: &str) -> Result<ClassTag> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::Validation("class name must not be empty".to_string()));
        }
        let color = csscolorparser::parse(color)
            .map_err(|err| Error::Validation(format!("invalid color {:?}: {}", color, err)))?
            .to_hex_string();

        let class = ClassTag::new(name.to_string(), color);
        self.classes.push(class.clone());
        Ok(class)
    }

    /// Remove a class, rebinding every task filed under it to the general class.
    ///
    /// Removing the general class itself is a no-op, not an error.
    pub fn remove_class(&mut self, id: &ClassId) {
        if id.is_general() {
            return;
        }

        self.classes.retain(|class| class.id() != id);

        let general = ClassId::general();
        for task in self.tasks.iter_mut() {
            if task.class_id() == id {
                task.set_class_id(general.clone());
            }
        }
    }

    /// Create a new task and append it.
    ///
    /// The title must not be empty once trimmed and the date must be a valid
    /// `YYYY-MM-DD` calendar date. An unknown class id is rebound to the general
    /// class rather than rejected.
    pub fn add_task(&mut self, new_task: NewTask) -> Result<Task> {
        let title = new_task.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("task title must not be empty".to_string()));
        }
        let date = NaiveDate::parse_from_str(&new_task.date, "%Y-%m-%d")
            .map_err(|_| Error::Validation(format!("not a calendar date: {:?}", new_task.date)))?;

        let class_id = match self.class(&new_task.class_id) {
            Some(_) => new_task.class_id,
            None => ClassId::general(),
        };

        let task = Task::new(
            title.to_string(),
            date,
            class_id,
            new_task.notes,
            new_task.time,
            new_task.done,
        );
        self.tasks.push(task.clone());
        Ok(task)
    }

    /// Merge the set fields of `patch` into the matching task.
    ///
    /// A missing id is a silent no-op: deletions and updates may race in a UI, so
    /// idempotent-delete semantics apply throughout.
    pub fn update_task(&mut self, id: &TaskId, patch: TaskPatch) {
        // Resolve the class before borrowing the task mutably
        let class_id = match patch.class_id {
            Some(class_id) if self.class(&class_id).is_some() => Some(class_id),
            Some(_) => Some(ClassId::general()),
            None => None,
        };

        let task = match self.tasks.iter_mut().find(|task| task.id() == id) {
            None => return,
            Some(task) => task,
        };

        if let Some(title) = patch.title {
            let title = title.trim();
            if title.is_empty() == false {
                task.set_title(title.to_string());
            }
        }
        if let Some(date) = patch.date {
            task.set_date(date);
        }
        if let Some(class_id) = class_id {
            task.set_class_id(class_id);
        }
        if let Some(notes) = patch.notes {
            task.set_notes(notes);
        }
        if let Some(time) = patch.time {
            task.set_time(Some(time));
        }
        if let Some(done) = patch.done {
            task.set_done(done);
        }
    }

    /// Flip the completion state of a task.
    ///
    /// Returns the new state, or `None` when the id is absent, so a UI can fire its
    /// celebratory effects only on a transition to `true`.
    pub fn toggle_task(&mut self, id: &TaskId) -> Option<bool> {
        self.tasks
            .iter_mut()
            .find(|task| task.id() == id)
            .map(|task| task.toggle())
    }

    /// Remove a task. A missing id is a silent no-op.
    pub fn remove_task(&mut self, id: &TaskId) {
        self.tasks.retain(|task| task.id() != id);
    }

    /// Repair the invariants of a document that came from outside (a stored file, an
    /// import, a remote copy):
    /// * the general class exists (re-inserted at the front when missing, which also
    ///   covers an empty class list),
    /// * duplicate class or task ids are dropped, first occurrence wins,
    /// * tasks referencing a nonexistent class are rebound to the general class.
    pub fn normalize(&mut self) {
        if self.classes.iter().any(|class| class.id().is_general()) == false {
            self.classes.insert(0, ClassTag::general());
        }

        let mut class_ids = HashSet::new();
        self.classes.retain(|class| class_ids.insert(class.id().clone()));

        let mut task_ids = HashSet::new();
        self.tasks.retain(|task| task_ids.insert(task.id().clone()));

        let general = ClassId::general();
        for task in self.tasks.iter_mut() {
            if class_ids.contains(task.class_id()) == false {
                log::debug!("Task {} references the unknown class {}, rebinding it to {}",
                            task.id(), task.class_id(), general);
                task.set_class_id(general.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_task(title: &str, date: &str, class_id: ClassId) -> NewTask {
        NewTask {
            title: title.to_string(),
            date: date.to_string(),
            class_id,
            ..NewTask::default()
        }
    }

    #[test]
    fn add_class_validates_input() {
        let mut doc = Document::default();

        assert!(matches!(doc.add_class("   ", "#ff0000"), Err(Error::Validation(_))));
        assert!(matches!(doc.add_class("Maths", "not-a-color"), Err(Error::Validation(_))));
        assert_eq!(doc.classes().len(), 1);

        let maths = doc.add_class("  Maths  ", "#ff0000").unwrap();
        assert_eq!(maths.name(), "Maths");
        assert_eq!(maths.color(), "#ff0000");
        assert_eq!(doc.classes().len(), 2);
        assert_ne!(maths.id(), doc.classes()[0].id());
    }

    #[test]
    fn add_task_validates_input() {
        let mut doc = Document::default();

        assert!(matches!(
            doc.add_task(new_task("", "2024-03-18", ClassId::general())),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            doc.add_task(new_task("Read", "2024-02-30", ClassId::general())),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            doc.add_task(new_task("Read", "someday", ClassId::general())),
            Err(Error::Validation(_))
        ));
        assert!(doc.tasks().is_empty());

        let task = doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();
        assert_eq!(doc.task(task.id()), Some(&task));
    }

    #[test]
    fn add_task_rebinds_unknown_class() {
        let mut doc = Document::default();
        let task = doc
            .add_task(new_task("Read", "2024-03-18", ClassId::from("vanished")))
            .unwrap();
        assert!(task.class_id().is_general());
    }

    #[test]
    fn fresh_ids_are_unique() {
        let mut doc = Document::default();
        let mut ids = HashSet::new();
        for _ in 0..50 {
            let task = doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();
            assert!(ids.insert(task.id().clone()));
        }
    }

    #[test]
    fn remove_general_class_is_a_noop() {
        let mut doc = Document::default();
        doc.add_class("Maths", "#ff0000").unwrap();
        let before = doc.clone();

        doc.remove_class(&ClassId::general());
        assert_eq!(doc, before);
    }

    #[test]
    fn remove_class_rebinds_its_tasks() {
        let mut doc = Document::default();
        let maths = doc.add_class("Maths", "#ff0000").unwrap();
        doc.add_task(new_task("Worksheet", "2024-03-18", maths.id().clone())).unwrap();
        doc.add_task(new_task("Essay", "2024-03-19", ClassId::general())).unwrap();

        doc.remove_class(maths.id());

        assert!(doc.class(maths.id()).is_none());
        for task in doc.tasks() {
            assert!(doc.class(task.class_id()).is_some());
        }
    }

    #[test]
    fn toggle_task_is_its_own_inverse() {
        let mut doc = Document::default();
        let task = doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();

        assert_eq!(doc.toggle_task(task.id()), Some(true));
        assert_eq!(doc.toggle_task(task.id()), Some(false));
        assert_eq!(doc.task(task.id()).unwrap().done(), task.done());

        assert_eq!(doc.toggle_task(&TaskId::from("missing")), None);
    }

    #[test]
    fn update_task_merges_fields() {
        let mut doc = Document::default();
        let task = doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();

        doc.update_task(task.id(), TaskPatch {
            notes: Some("chapters 3 and 4".to_string()),
            done: Some(true),
            ..TaskPatch::default()
        });

        let updated = doc.task(task.id()).unwrap();
        assert_eq!(updated.title(), "Read");
        assert_eq!(updated.notes(), "chapters 3 and 4");
        assert_eq!(updated.done(), true);
    }

    #[test]
    fn update_task_keeps_title_on_blank_patch() {
        let mut doc = Document::default();
        let task = doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();

        doc.update_task(task.id(), TaskPatch {
            title: Some("   ".to_string()),
            ..TaskPatch::default()
        });
        assert_eq!(doc.task(task.id()).unwrap().title(), "Read");
    }

    #[test]
    fn update_and_remove_missing_task_are_noops() {
        let mut doc = Document::default();
        doc.add_task(new_task("Read", "2024-03-18", ClassId::general())).unwrap();
        let before = doc.clone();

        doc.update_task(&TaskId::from("missing"), TaskPatch {
            done: Some(true),
            ..TaskPatch::default()
        });
        doc.remove_task(&TaskId::from("missing"));
        assert_eq!(doc, before);
    }

    #[test]
    fn normalize_repairs_foreign_documents() {
        let mut doc: Document = serde_json::from_value(serde_json::json!({
            "classes": [],
            "tasks": [
                { "id": "a", "title": "Read", "date": "2024-03-18", "classId": "vanished" },
            ],
        }))
        .unwrap();

        doc.normalize();

        assert!(doc.class(&ClassId::general()).is_some());
        assert!(doc.tasks()[0].class_id().is_general());
        assert_eq!(doc.updated_at(), 0);
    }

    #[test]
    fn normalize_drops_duplicate_ids() {
        let mut doc: Document = serde_json::from_value(serde_json::json!({
            "classes": [
                { "id": "general", "name": "General", "color": "#4f46e5" },
                { "id": "dup", "name": "First", "color": "#ff0000" },
                { "id": "dup", "name": "Second", "color": "#00ff00" },
            ],
            "tasks": [],
        }))
        .unwrap();

        doc.normalize();

        assert_eq!(doc.classes().len(), 2);
        assert_eq!(doc.class(&ClassId::from("dup")).unwrap().name(), "First");
    }
}

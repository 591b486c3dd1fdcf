//! Checklist tasks, pinned to calendar days

use std::fmt::{Display, Formatter};

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::class_tag::ClassId;

/// The identifier of a [`Task`], unique within a document
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    /// Generate a fresh random TaskId
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_hyphenated().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TaskId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for TaskId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for TaskId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// A checklist entry on a calendar day
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    id: TaskId,

    title: String,

    /// The calendar day this task belongs to (timezone-naive, `YYYY-MM-DD` on the wire)
    date: NaiveDate,

    /// The class this task is filed under. A well-formed document guarantees this
    /// resolves; documents coming from outside are repaired on load.
    class_id: ClassId,

    #[serde(default)]
    notes: String,

    /// An informational start time (`HH:MM` on the wire). Only used to order tasks
    /// within a day, never for scheduling.
    #[serde(default, skip_serializing_if = "Option::is_none", with = "hhmm")]
    time: Option<NaiveTime>,

    #[serde(default)]
    done: bool,
}

impl Task {
    /// Create a brand new task with a fresh random id.
    pub(crate) fn new(
        title: String,
        date: NaiveDate,
        class_id: ClassId,
        notes: String,
        time: Option<NaiveTime>,
        done: bool,
    ) -> Self {
        Self {
            id: TaskId::random(),
            title,
            date,
            class_id,
            notes,
            time,
            done,
        }
    }

    pub fn id(&self) -> &TaskId           { &self.id       }
    pub fn title(&self) -> &str           { &self.title    }
    pub fn date(&self) -> NaiveDate       { self.date      }
    pub fn class_id(&self) -> &ClassId    { &self.class_id }
    pub fn notes(&self) -> &str           { &self.notes    }
    pub fn time(&self) -> Option<NaiveTime> { self.time    }
    pub fn done(&self) -> bool            { self.done      }

    pub(crate) fn set_title(&mut self, title: String)      { self.title = title;       }
    pub(crate) fn set_date(&mut self, date: NaiveDate)     { self.date = date;         }
    pub(crate) fn set_class_id(&mut self, class: ClassId)  { self.class_id = class;    }
    pub(crate) fn set_notes(&mut self, notes: String)      { self.notes = notes;       }
    pub(crate) fn set_time(&mut self, time: Option<NaiveTime>) { self.time = time;     }
    pub(crate) fn set_done(&mut self, done: bool)          { self.done = done;         }

    /// Flip the completion state and return the new value
    pub(crate) fn toggle(&mut self) -> bool {
        self.done = !self.done;
        self.done
    }
}

/// Input for [`Document::add_task`](crate::Document::add_task).
///
/// `date` is taken as a string on purpose: it arrives from user input and is
/// validated (`YYYY-MM-DD`) by `add_task`, which rejects anything else.
#[derive(Clone, Debug, Default)]
pub struct NewTask {
    pub title: String,
    pub date: String,
    pub class_id: ClassId,
    pub notes: String,
    pub time: Option<NaiveTime>,
    pub done: bool,
}

/// A partial update for [`Document::update_task`](crate::Document::update_task).
/// `None` fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct TaskPatch {
    /// A title that trims to empty is ignored, keeping the current one
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub class_id: Option<ClassId>,
    pub notes: Option<String>,
    pub time: Option<NaiveTime>,
    pub done: Option<bool>,
}

/// Serde support for the `HH:MM` wire format of the optional time field
mod hhmm {
    use chrono::NaiveTime;
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(time: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match time {
            Some(t) => serializer.serialize_str(&t.format("%H:%M").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = Option::<String>::deserialize(deserializer)?;
        match text.as_deref() {
            None | Some("") => Ok(None),
            Some(s) => NaiveTime::parse_from_str(s, "%H:%M")
                // some producers write seconds too
                .or_else(|_| NaiveTime::parse_from_str(s, "%H:%M:%S"))
                .map(Some)
                .map_err(D::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serde_task_wire_format() {
        let json = r#"{
            "id": "a",
            "title": "Finish calculus worksheet",
            "date": "2024-03-18",
            "classId": "general",
            "notes": "",
            "time": "09:30",
            "done": false
        }"#;

        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.title(), "Finish calculus worksheet");
        assert_eq!(task.date(), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(task.time(), NaiveTime::from_hms_opt(9, 30, 0));
        assert!(task.class_id().is_general());

        let round_tripped: Task = serde_json::from_str(&serde_json::to_string(&task).unwrap()).unwrap();
        assert_eq!(round_tripped, task);
    }

    #[test]
    fn serde_task_without_optional_fields() {
        let json = r#"{"id": "b", "title": "Read 20 pages", "date": "2024-03-18", "classId": "general"}"#;
        let task: Task = serde_json::from_str(json).unwrap();
        assert_eq!(task.notes(), "");
        assert_eq!(task.time(), None);
        assert_eq!(task.done(), false);
        // an absent time must not serialize as `"time": null`
        assert!(serde_json::to_string(&task).unwrap().contains("time") == false);
    }
}

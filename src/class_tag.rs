//! Classes: the colored categories tasks are filed under

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The id of the reserved fallback class. See [`ClassTag::general`].
pub const GENERAL_CLASS_ID: &str = "general";

const GENERAL_CLASS_NAME: &str = "General";
const GENERAL_CLASS_COLOR: &str = "#4f46e5";

/// The identifier of a [`ClassTag`], unique within a document
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClassId(String);

impl ClassId {
    /// Generate a fresh random ClassId
    pub fn random() -> Self {
        Self(Uuid::new_v4().to_hyphenated().to_string())
    }

    /// The id of the reserved "general" class
    pub fn general() -> Self {
        Self(GENERAL_CLASS_ID.to_string())
    }

    pub fn is_general(&self) -> bool {
        self.0 == GENERAL_CLASS_ID
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for ClassId {
    fn default() -> Self {
        Self::general()
    }
}

impl From<String> for ClassId {
    fn from(id: String) -> Self {
        Self(id)
    }
}
impl From<&str> for ClassId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl Display for ClassId {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
        write!(f, "{}", self.0)
    }
}

/// A user-defined category (e.g. a school subject) used to group and color-code tasks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ClassTag {
    id: ClassId,

    /// The display name of the class
    name: String,

    /// A display hint for the UI, kept as a CSS color string.
    /// [`Document::add_class`](crate::Document::add_class) canonicalizes it to hex notation.
    color: String,
}

impl ClassTag {
    /// Create a brand new class with a fresh random id.
    ///
    /// Input validation (non-empty name, parseable color) is the caller's job;
    /// see [`Document::add_class`](crate::Document::add_class).
    pub(crate) fn new(name: String, color: String) -> Self {
        Self {
            id: ClassId::random(),
            name,
            color,
        }
    }

    /// The reserved fallback class. It always exists in a well-formed document and
    /// cannot be removed; tasks whose class disappears are rebound to it.
    pub fn general() -> Self {
        Self {
            id: ClassId::general(),
            name: GENERAL_CLASS_NAME.to_string(),
            color: GENERAL_CLASS_COLOR.to_string(),
        }
    }

    pub fn id(&self) -> &ClassId   { &self.id    }
    pub fn name(&self) -> &str     { &self.name  }
    pub fn color(&self) -> &str    { &self.color }
}

//! User-facing configuration: the cloud endpoint and the UI theme
//!
//! These are the only two externally configurable values. They are persisted by the
//! [`Store`](crate::store::Store), alongside the document.

use serde::{Deserialize, Serialize};
use url::Url;

/// The UI theme preference. This crate only stores it; acting on it is the
/// presentation layer's job.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// Where the cloud copy of the document lives. `None` disables sync entirely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Url>,

    #[serde(default)]
    pub theme: Theme,
}

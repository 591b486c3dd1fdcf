//! Support for library configuration options

use std::sync::{Arc, Mutex};
use once_cell::sync::Lazy;

/// The application name. It shows up in the HTTP user agent and in the suggested export file name.
/// Feel free to override it when initing this library.
pub static APP_NAME: Lazy<Arc<Mutex<String>>> = Lazy::new(|| Arc::new(Mutex::new("Chalkboard".to_string())));

pub(crate) fn app_name() -> String {
    APP_NAME.lock().unwrap().to_string()
}

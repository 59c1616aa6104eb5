#![forbid(unsafe_code)]

//! Browser binding for the page lifecycle tracker.
//!
//! On `wasm32` this crate exports [`PageLifecycle`] through `wasm-bindgen`:
//! it samples `document` for the initial state, registers capturing
//! listeners on `window` for every lifecycle signal, and forwards each
//! emitted step to JS callbacks as `callback(next, previous)`.

use pagelife_core::config::{ConfigError, TrackerConfig};

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::{PageLifecycle, WebProbe};

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct PageLifecycle;

#[cfg(not(target_arch = "wasm32"))]
impl PageLifecycle {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}

/// Resolve tracker options from the JSON form of a JS options object.
///
/// `None` and `"null"` select the defaults.
pub fn config_from_json(json: Option<&str>) -> Result<TrackerConfig, ConfigError> {
    match json.map(str::trim) {
        None | Some("null") => Ok(TrackerConfig::default()),
        Some(json) => TrackerConfig::from_json_str(json),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;

    #[test]
    fn missing_options_use_defaults() {
        assert_eq!(config_from_json(None).unwrap(), TrackerConfig::default());
        assert_eq!(
            config_from_json(Some(" null ")).unwrap(),
            TrackerConfig::default()
        );
    }

    #[test]
    fn options_object_is_parsed() {
        let config = config_from_json(Some(r#"{"listenUnload":true}"#)).unwrap();
        assert!(config.listen_unload);
        assert!(config.capture);
    }

    #[test]
    fn malformed_options_are_errors() {
        assert!(config_from_json(Some("[1,2]")).is_err());
        assert!(config_from_json(Some(r#"{"capture":1}"#)).is_err());
    }
}

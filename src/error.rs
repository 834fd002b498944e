use thiserror::Error;
use wasm_bindgen::JsValue;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("no global window object")]
    MissingWindow,
    #[error("window has no document")]
    MissingDocument,
    #[error("browser call failed: {0}")]
    Js(String),
    #[error("invalid site config: {0}")]
    Config(String),
}

impl From<JsValue> for SetupError {
    fn from(value: JsValue) -> Self {
        let message = value
            .as_string()
            .unwrap_or_else(|| format!("{:?}", value));
        SetupError::Js(message)
    }
}

impl From<serde_json::Error> for SetupError {
    fn from(err: serde_json::Error) -> Self {
        SetupError::Config(err.to_string())
    }
}

impl From<serde_wasm_bindgen::Error> for SetupError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        SetupError::Config(err.to_string())
    }
}

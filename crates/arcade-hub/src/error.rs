use arcade_core::HubError;
use thiserror::Error;
use wasm_bindgen::JsValue;

/// Failures while wiring the hub into the page. None of them are fatal to
/// the page; callers log and carry on.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("no window")]
    NoWindow,

    #[error("no document")]
    NoDocument,

    #[error("mount point #{0} not found")]
    MissingMount(String),

    #[error("DOM call failed: {0}")]
    Dom(String),

    #[error("graphics unavailable: {0}")]
    GraphicsUnavailable(String),

    #[error("shader error: {0}")]
    Shader(String),

    #[error(transparent)]
    Core(#[from] HubError),
}

impl From<JsValue> for ClientError {
    fn from(value: JsValue) -> Self {
        let msg = value
            .as_string()
            .unwrap_or_else(|| format!("{value:?}"));
        ClientError::Dom(msg)
    }
}

impl From<ClientError> for JsValue {
    fn from(err: ClientError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

pub type ClientResult<T> = Result<T, ClientError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        assert_eq!(
            ClientError::MissingMount("games-grid".into()).to_string(),
            "mount point #games-grid not found"
        );
        let core = ClientError::from(HubError::DuplicateId("pong".into()));
        assert_eq!(core.to_string(), "duplicate game id `pong` in registry");
    }
}

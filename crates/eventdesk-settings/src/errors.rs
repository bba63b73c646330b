use thiserror::Error;

/// Why `~/.eventdesk/settings.json` (or the file given with `--settings`)
/// could not be turned into [`DeskSettings`](crate::DeskSettings).
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("settings file unreadable: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON, or a field of the wrong type after merging.
    #[error("settings file is not valid eventdesk JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// Well-formed but unusable, e.g. an empty `api.baseUrl`.
    #[error("bad setting: {0}")]
    InvalidValue(String),
}

pub type Result<T> = std::result::Result<T, SettingsError>;

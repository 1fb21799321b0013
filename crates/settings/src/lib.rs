//! User preferences for the NoteDeck state layer.
//! NoteDeck 狀態層的使用者偏好設定。

pub mod preferences;

pub use preferences::{
    IdScheme, Preferences, PreferencesError, PreferencesStore, TabPreferences,
    WorkspacePreferences,
};

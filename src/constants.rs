//! Project-wide constants used across multiple modules.

/// Directory name used under the platform config directory
pub const APP_DIR: &str = "soundnest";

/// Volume a fresh session starts at
pub const DEFAULT_VOLUME: f32 = 0.5;

/// Slider step for keyboard volume changes
pub const VOLUME_STEP: f32 = 0.05;

/// Default log file name, placed in the system temp directory
pub const LOG_FILE_NAME: &str = "soundnest.log";

/// Shown in place of the title when the route parameter does not resolve
pub const PLACEHOLDER_TITLE: &str = "";

/// Application name
pub const APP_NAME: &str = "gantry";

/// Application version
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// System name used when a manifest does not set one
pub const DEFAULT_SYSTEM_NAME: &str = "system";

/// Pass-through component kind, and the default for manifest entries
pub const KIND_NOOP: &str = "noop";

/// Built-in kind that tracks its own started state
pub const KIND_SERVICE: &str = "service";

/// `service` setting: fail when started
pub const SETTING_FAIL_ON_START: &str = "fail_on_start";

/// `service` setting: fail when stopped
pub const SETTING_FAIL_ON_STOP: &str = "fail_on_stop";

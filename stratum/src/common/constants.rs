// path constants
pub const FIELD_SEPARATOR: &str = ".";

// host constants
pub const DEFAULT_SETTINGS_FIELD: &str = "settings";

// validation rule constants
pub const RULE_SEPARATOR: &str = "|";
pub const RULE_ARGUMENT_SEPARATOR: &str = ":";
pub const RULE_LIST_SEPARATOR: &str = ",";

pub const STRATUM_VERSION: &str = env!("CARGO_PKG_VERSION");

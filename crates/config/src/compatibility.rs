//! SQL Server database compatibility levels.

/// Level used when a configuration names none, or names one that does not exist.
pub const DEFAULT_COMPATIBILITY_LEVEL: u32 = 120;

/// SQL Server 2000 (80) through SQL Server 2022 (160).
pub const SUPPORTED_COMPATIBILITY_LEVELS: &[u32] = &[80, 90, 100, 110, 120, 130, 140, 150, 160];

/// Returns `level` if it is a known compatibility level, else the default.
#[must_use]
pub fn validate(level: u32) -> u32 {
    if SUPPORTED_COMPATIBILITY_LEVELS.contains(&level) {
        level
    } else {
        tracing::debug!(level, "Unsupported compatibility level, using default");
        DEFAULT_COMPATIBILITY_LEVEL
    }
}

//! Preference stores and system color scheme probes.

mod file;
mod memory;

pub use file::JsonFilePreferenceStore;
pub use memory::InMemoryPreferenceStore;

use pratik_core::ports::ColorSchemeProbe;

/// Probe reading `PREFERS_COLOR_SCHEME` (`dark` or `light`).
///
/// Falls back to `COLORFGBG`, where a background color index below 8 is a
/// dark terminal.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvColorScheme;

impl EnvColorScheme {
    fn resolve(explicit: Option<&str>, colorfgbg: Option<&str>) -> bool {
        if let Some(scheme) = explicit {
            return scheme.trim().eq_ignore_ascii_case("dark");
        }
        colorfgbg
            .and_then(|v| v.rsplit(';').next())
            .and_then(|bg| bg.trim().parse::<u8>().ok())
            .is_some_and(|bg| bg < 8)
    }
}

impl ColorSchemeProbe for EnvColorScheme {
    fn prefers_dark(&self) -> bool {
        let explicit = std::env::var("PREFERS_COLOR_SCHEME").ok();
        let colorfgbg = std::env::var("COLORFGBG").ok();
        Self::resolve(explicit.as_deref(), colorfgbg.as_deref())
    }
}

/// Probe with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct FixedColorScheme(pub bool);

impl ColorSchemeProbe for FixedColorScheme {
    fn prefers_dark(&self) -> bool {
        self.0
    }
}

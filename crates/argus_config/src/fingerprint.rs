//! Configuration fingerprinting for cache keys.
//!
//! Two runs with the same effective configuration must produce the same
//! fingerprint, and any change that can alter findings must change it.
//! The fingerprint is opaque: consumers only compare for equality.

use crate::types::{FailureMode, ProjectConfig};
use argus_common::ConfigFingerprint;

/// Computes the fingerprint of the analysis-relevant configuration.
///
/// Covers severity overrides, rule settings, the fix iteration ceiling,
/// and the engine version. Rule lists are sorted first so that reordering
/// entries in `argus.toml` does not invalidate cached results. Fields that
/// only select which units are analyzed (include paths, suffixes) are
/// excluded: they never change the findings for a unit that is analyzed.
pub fn effective_fingerprint(config: &ProjectConfig, engine_version: &str) -> ConfigFingerprint {
    let mut canonical = String::new();
    canonical.push_str("engine=");
    canonical.push_str(engine_version);
    canonical.push('\n');

    push_sorted_list(&mut canonical, "deny", &config.rules.deny);
    push_sorted_list(&mut canonical, "warn", &config.rules.warn);
    push_sorted_list(&mut canonical, "allow", &config.rules.allow);

    canonical.push_str("on_failure=");
    canonical.push_str(match config.rules.on_failure {
        FailureMode::Report => "report",
        FailureMode::Discard => "discard",
    });
    canonical.push('\n');

    let settings = &config.rules.settings;
    canonical.push_str(&format!("max_line_length={}\n", settings.max_line_length));
    canonical.push_str(&format!("tab_width={}\n", settings.tab_width));
    canonical.push_str(&format!("max_blank_lines={}\n", settings.max_blank_lines));
    canonical.push_str(&format!("max_passes={}\n", config.fix.max_passes));

    ConfigFingerprint::from_bytes(canonical.as_bytes())
}

fn push_sorted_list(out: &mut String, key: &str, values: &[String]) {
    let mut sorted: Vec<&str> = values.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    out.push_str(key);
    out.push('=');
    out.push_str(&sorted.join(","));
    out.push('\n');
}

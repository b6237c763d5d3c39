//! Configuration types deserialized from `argus.toml`.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer};

/// The top-level project configuration parsed from `argus.toml`.
///
/// Every section is optional; an empty file (or no file at all) yields the
/// defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata.
    #[serde(default)]
    pub project: ProjectMeta,
    /// What to analyze and what to skip.
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Rule selection, severity overrides, and rule settings.
    #[serde(default)]
    pub rules: RulesConfig,
    /// Fix-loop settings.
    #[serde(default)]
    pub fix: FixConfig,
    /// Result-cache settings.
    #[serde(default)]
    pub cache: CacheConfig,
    /// Dependency-scanning settings.
    #[serde(default)]
    pub deps: DepsConfig,
}

/// Core project metadata.
#[derive(Debug, Deserialize)]
pub struct ProjectMeta {
    /// The project name.
    #[serde(default = "default_project_name")]
    pub name: String,
    /// A brief description of the project.
    #[serde(default)]
    pub description: String,
}

impl Default for ProjectMeta {
    fn default() -> Self {
        Self {
            name: default_project_name(),
            description: String::new(),
        }
    }
}

fn default_project_name() -> String {
    "unnamed".to_string()
}

/// Selection of what gets analyzed.
#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Directories (relative to the project root) to discover units in.
    #[serde(default = "default_include")]
    pub include: Vec<String>,
    /// File suffixes treated as units.
    #[serde(default = "default_suffixes")]
    pub suffixes: Vec<String>,
    /// Path substrings to skip during discovery.
    #[serde(default)]
    pub exclude: Vec<String>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            include: default_include(),
            suffixes: default_suffixes(),
            exclude: Vec::new(),
        }
    }
}

fn default_include() -> Vec<String> {
    vec![".".to_string()]
}

fn default_suffixes() -> Vec<String> {
    vec![".txt".to_string(), ".md".to_string()]
}

/// Rule configuration controlling which rules run at which severity.
#[derive(Debug, Default, Deserialize)]
pub struct RulesConfig {
    /// Rule names or codes to promote to errors.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub deny: Vec<String>,
    /// Rule names or codes to suppress entirely.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub allow: Vec<String>,
    /// Rule names or codes to demote to warnings.
    #[serde(default, deserialize_with = "deserialize_string_or_vec")]
    pub warn: Vec<String>,
    /// What to do when a rule fails internally.
    #[serde(default)]
    pub on_failure: FailureMode,
    /// Thresholds consumed by individual rules.
    #[serde(default)]
    pub settings: RuleSettings,
}

/// What becomes of a rule that panics during execution.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureMode {
    /// Surface the failure as a synthetic engine finding (default).
    #[default]
    Report,
    /// Drop the failure after logging it.
    Discard,
}

/// Thresholds consumed by individual rules.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct RuleSettings {
    /// Maximum allowed line length in characters.
    #[serde(default = "default_max_line_length")]
    pub max_line_length: u32,
    /// Spaces per tab when replacing indentation tabs.
    #[serde(default = "default_tab_width")]
    pub tab_width: u32,
    /// Maximum allowed run of blank lines.
    #[serde(default = "default_max_blank_lines")]
    pub max_blank_lines: u32,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            max_line_length: default_max_line_length(),
            tab_width: default_tab_width(),
            max_blank_lines: default_max_blank_lines(),
        }
    }
}

fn default_max_line_length() -> u32 {
    120
}

fn default_tab_width() -> u32 {
    4
}

fn default_max_blank_lines() -> u32 {
    2
}

/// Fix-loop configuration.
#[derive(Debug, Deserialize)]
pub struct FixConfig {
    /// Hard ceiling on analyze/fix iterations per unit.
    #[serde(default = "default_max_passes")]
    pub max_passes: u32,
}

impl Default for FixConfig {
    fn default() -> Self {
        Self {
            max_passes: default_max_passes(),
        }
    }
}

fn default_max_passes() -> u32 {
    10
}

/// Result-cache configuration.
#[derive(Debug, Deserialize)]
pub struct CacheConfig {
    /// Whether the persistent result cache is used at all.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cache directory, relative to the project root.
    #[serde(default = "default_cache_dir")]
    pub dir: String,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: default_cache_dir(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_cache_dir() -> String {
    ".argus-cache".to_string()
}

/// Dependency-scanning configuration.
#[derive(Debug, Default, Deserialize)]
pub struct DepsConfig {
    /// Patterns naming global-scope contributor units.
    ///
    /// A pattern matches a unit's normalized path exactly, its basename, or
    /// (when it starts with a dot) its suffix.
    #[serde(default)]
    pub globals: Vec<String>,
}

/// Deserializes a field that can be either a single string or a list of strings.
///
/// Allows TOML config to accept both `deny = "long-line"` (string) and
/// `deny = ["long-line", "tab-indentation"]` (array of strings).
fn deserialize_string_or_vec<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct StringOrVec;

    impl<'de> Visitor<'de> for StringOrVec {
        type Value = Vec<String>;

        fn expecting(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            formatter.write_str("a string or a list of strings")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
            Ok(vec![v.to_string()])
        }

        fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            let mut vec = Vec::new();
            while let Some(val) = seq.next_element::<String>()? {
                vec.push(val);
            }
            Ok(vec)
        }
    }

    deserializer.deserialize_any(StringOrVec)
}

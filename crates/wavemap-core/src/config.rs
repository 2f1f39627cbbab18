use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::env;
use std::io::IsTerminal;
use std::path::Path;

/// Hard ceiling on reported depth. Traversals that would exceed it indicate a
/// graph defect and are truncated.
pub const DEFAULT_MAX_DEPTH: usize = 100;

/// Hours budgeted per component when no external estimate exists.
pub const DEFAULT_HOURS_PER_COMPONENT: f64 = 4.0;

/// Hours budgeted per component that sits in a circular group.
pub const DEFAULT_HOURS_PER_CIRCULAR_COMPONENT: f64 = 6.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub graph: GraphConfig,
    #[serde(default)]
    pub order: OrderConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Keep references to platform base components as nodes and edges.
    #[serde(default)]
    pub include_base_components: bool,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            include_base_components: false,
            max_depth: default_max_depth(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderConfig {
    #[serde(default = "default_hours_per_component")]
    pub hours_per_component: f64,
    #[serde(default = "default_hours_per_circular_component")]
    pub hours_per_circular_component: f64,
}

impl Default for OrderConfig {
    fn default() -> Self {
        Self {
            hours_per_component: default_hours_per_component(),
            hours_per_circular_component: default_hours_per_circular_component(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UserConfig {
    #[serde(default)]
    pub output: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    pub project: ProjectConfig,
    pub user: UserConfig,
    pub resolved_output: String,
}

/// Load `.wavemap/config.toml` under `project_root`, or defaults if absent.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_project_config(project_root: &Path) -> Result<ProjectConfig> {
    let path = project_root.join(".wavemap/config.toml");
    if !path.exists() {
        return Ok(ProjectConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<ProjectConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Load the per-user config from the platform config directory.
///
/// # Errors
///
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_user_config() -> Result<UserConfig> {
    let Some(config_dir) = dirs::config_dir() else {
        return Ok(UserConfig::default());
    };

    let path = config_dir.join("wavemap/config.toml");
    if !path.exists() {
        return Ok(UserConfig::default());
    }

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;

    toml::from_str::<UserConfig>(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))
}

/// Resolve project and user config plus the effective output mode.
///
/// # Errors
///
/// Propagates config read/parse failures.
pub fn resolve_config(project_root: &Path, cli_json: bool) -> Result<EffectiveConfig> {
    let project = load_project_config(project_root)?;
    let user = load_user_config()?;

    let env_format = env::var("FORMAT").ok();
    let resolved_output = resolve_output(
        cli_json,
        user.output.clone(),
        env_format,
        std::io::stdout().is_terminal(),
    );

    Ok(EffectiveConfig {
        project,
        user,
        resolved_output,
    })
}

fn normalize_output_mode(raw: &str) -> Option<&'static str> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "pretty" | "human" => Some("pretty"),
        "text" | "table" => Some("text"),
        "json" => Some("json"),
        _ => None,
    }
}

fn resolve_output(
    cli_json: bool,
    user_output: Option<String>,
    env_format: Option<String>,
    is_tty: bool,
) -> String {
    if cli_json {
        return "json".to_string();
    }

    if let Some(mode) = env_format.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    if let Some(mode) = user_output.as_deref().and_then(normalize_output_mode) {
        return mode.to_string();
    }

    let fallback = if is_tty { "pretty" } else { "text" };
    fallback.to_string()
}

const fn default_max_depth() -> usize {
    DEFAULT_MAX_DEPTH
}

const fn default_hours_per_component() -> f64 {
    DEFAULT_HOURS_PER_COMPONENT
}

const fn default_hours_per_circular_component() -> f64 {
    DEFAULT_HOURS_PER_CIRCULAR_COMPONENT
}

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

const DEFAULT_TELEMETRY_PROJECT: &str = "jira-ticket-fetcher";

/// Environment variables that must be set (and non-empty) before anything runs.
pub const REQUIRED_VARS: [&str; 5] = [
    "JIRA_URL",
    "JIRA_API_KEY",
    "JIRA_EMAIL",
    "SPRINT_NAME",
    "OPENAI_API_KEY",
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(
        "Missing required environment variables: {}\nSet every variable before running.",
        .0.join(", ")
    )]
    MissingVars(Vec<&'static str>),

    #[error("Failed to read settings from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse settings file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid setting in {}: {message}", path.display())]
    Invalid { path: PathBuf, message: String },
}

pub struct AppConfig {
    pub jira: JiraConfig,
    pub sprint_name: String,
    pub openai_api_key: String,
    pub telemetry: TelemetryConfig,
    pub settings: Settings,
}

pub struct JiraConfig {
    pub url: String,
    pub email: String,
    pub api_token: String,
}

/// Tracing-collaborator settings. Carried through untouched; the pipeline
/// never reads them.
pub struct TelemetryConfig {
    pub enabled: bool,
    pub api_key: Option<String>,
    pub project: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tracker: TrackerSettings,
    pub generation: GenerationSettings,
    pub pipeline: PipelineSettings,
}

impl Settings {
    fn validate(&self) -> Result<(), String> {
        if self.pipeline.request_timeout_secs == 0 {
            return Err("pipeline.request_timeout_secs must be at least 1".into());
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TrackerSettings {
    pub project_key: String,
    pub issue_type: String,
}

impl Default for TrackerSettings {
    fn default() -> Self {
        Self {
            project_key: "SPARK".into(),
            issue_type: "Story".into(),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct GenerationSettings {
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".into(),
            model: "gpt-4o".into(),
            temperature: 0.7,
            max_tokens: 16000,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub output_dir: PathBuf,
    pub request_timeout_secs: u64,
    pub identity_policy: IdentityPolicy,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("docs"),
            request_timeout_secs: 60,
            identity_policy: IdentityPolicy::default(),
        }
    }
}

impl PipelineSettings {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// What the pipeline does when the identity check fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityPolicy {
    /// Stop the run.
    #[default]
    Required,
    /// Log a warning and go on to the sprint lookup.
    BestEffort,
}

fn settings_path() -> PathBuf {
    if let Some(path) = std::env::var_os("SPRINT_CHANGELOG_CONFIG") {
        return PathBuf::from(path);
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".sprint-changelog")
        .join("config.toml")
}

pub fn load_config() -> Result<AppConfig, ConfigError> {
    let settings = load_settings(&settings_path())?;
    from_lookup(|key| std::env::var(key).ok(), settings)
}

/// Read the optional settings file. A missing file yields the defaults.
pub fn load_settings(path: &Path) -> Result<Settings, ConfigError> {
    if !path.exists() {
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: Settings = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    settings.validate().map_err(|message| ConfigError::Invalid {
        path: path.to_path_buf(),
        message,
    })?;
    Ok(settings)
}

/// Build the config from an environment lookup, reporting every missing
/// required variable at once.
pub fn from_lookup(
    lookup: impl Fn(&str) -> Option<String>,
    settings: Settings,
) -> Result<AppConfig, ConfigError> {
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    let missing: Vec<&'static str> = REQUIRED_VARS
        .iter()
        .copied()
        .filter(|key| get(*key).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(ConfigError::MissingVars(missing));
    }

    let required = |key: &str| get(key).unwrap_or_default();

    let telemetry = TelemetryConfig {
        enabled: get("LANGCHAIN_TRACING_V2")
            .map(|v| v.eq_ignore_ascii_case("true"))
            .unwrap_or(false),
        api_key: get("LANGCHAIN_API_KEY"),
        project: get("LANGCHAIN_PROJECT").unwrap_or_else(|| DEFAULT_TELEMETRY_PROJECT.into()),
    };

    Ok(AppConfig {
        jira: JiraConfig {
            url: required("JIRA_URL"),
            email: required("JIRA_EMAIL"),
            api_token: required("JIRA_API_KEY"),
        },
        sprint_name: required("SPRINT_NAME"),
        openai_api_key: required("OPENAI_API_KEY"),
        telemetry,
        settings,
    })
}

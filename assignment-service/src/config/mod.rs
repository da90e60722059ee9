use service_core::config as core_config;
use service_core::error::AppError;
use std::env;
use std::path::PathBuf;

const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_OPENAI_MODEL: &str = "gpt-4o-mini";
const DEFAULT_PRETTIER_COMMAND: &str = "npx -y prettier@3.4.2";

/// Text attachments larger than this are truncated before being sent to the model.
const DEFAULT_MAX_ATTACHMENT_BYTES: usize = 64 * 1024;

/// Upper bound on a multipart request body.
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AssignmentConfig {
    pub common: core_config::Config,
    pub mode: CollaboratorMode,
    pub openai: OpenAiConfig,
    pub uploads: UploadConfig,
    pub tools: ToolsConfig,
    pub otlp_endpoint: Option<String>,
}

/// Which implementations back the answer provider and analysis toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollaboratorMode {
    Live,
    Mock,
}

#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub model: String,
    pub max_attachment_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct UploadConfig {
    pub dir: PathBuf,
    pub max_bytes: usize,
}

#[derive(Debug, Clone)]
pub struct ToolsConfig {
    /// Formatter invocation; the uploaded file path is appended as the last argument.
    pub prettier_command: Vec<String>,
}

impl AssignmentConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let api_key = env::var("OPENAI_API_KEY").ok().filter(|k| !k.is_empty());
        let default_mode = if api_key.is_some() { "live" } else { "mock" };
        let mode: CollaboratorMode = get_env("COLLABORATOR_MODE", Some(default_mode), is_prod)?
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        if mode == CollaboratorMode::Live && api_key.is_none() {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "OPENAI_API_KEY is required when COLLABORATOR_MODE is live"
            )));
        }

        let default_upload_dir = env::temp_dir().join("assignment-uploads");

        Ok(AssignmentConfig {
            common: common_config,
            mode,
            openai: OpenAiConfig {
                api_key,
                base_url: get_env("OPENAI_BASE_URL", Some(DEFAULT_OPENAI_BASE_URL), is_prod)?,
                model: get_env("OPENAI_MODEL", Some(DEFAULT_OPENAI_MODEL), is_prod)?,
                max_attachment_bytes: parse_env(
                    "OPENAI_MAX_ATTACHMENT_BYTES",
                    DEFAULT_MAX_ATTACHMENT_BYTES,
                    is_prod,
                )?,
            },
            uploads: UploadConfig {
                dir: PathBuf::from(get_env(
                    "UPLOAD_DIR",
                    default_upload_dir.to_str(),
                    is_prod,
                )?),
                max_bytes: parse_env("MAX_UPLOAD_BYTES", DEFAULT_MAX_UPLOAD_BYTES, is_prod)?,
            },
            tools: ToolsConfig {
                prettier_command: split_command(&get_env(
                    "PRETTIER_COMMAND",
                    Some(DEFAULT_PRETTIER_COMMAND),
                    is_prod,
                )?)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|e| !e.is_empty()),
        })
    }

    /// Offline configuration using mock collaborators; used by tests and local runs.
    pub fn mock(upload_dir: impl Into<PathBuf>) -> Self {
        AssignmentConfig {
            common: core_config::Config {
                port: 0,
                ..core_config::Config::default()
            },
            mode: CollaboratorMode::Mock,
            openai: OpenAiConfig {
                api_key: None,
                base_url: DEFAULT_OPENAI_BASE_URL.to_string(),
                model: DEFAULT_OPENAI_MODEL.to_string(),
                max_attachment_bytes: DEFAULT_MAX_ATTACHMENT_BYTES,
            },
            uploads: UploadConfig {
                dir: upload_dir.into(),
                max_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            },
            tools: ToolsConfig {
                prettier_command: DEFAULT_PRETTIER_COMMAND
                    .split_whitespace()
                    .map(str::to_string)
                    .collect(),
            },
            otlp_endpoint: None,
        }
    }
}

impl std::str::FromStr for CollaboratorMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "live" => Ok(CollaboratorMode::Live),
            "mock" => Ok(CollaboratorMode::Mock),
            _ => Err(format!("Invalid collaborator mode: {}", s)),
        }
    }
}

fn split_command(raw: &str) -> Result<Vec<String>, AppError> {
    let parts: Vec<String> = raw.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(AppError::ConfigError(anyhow::anyhow!(
            "PRETTIER_COMMAND must not be empty"
        )));
    }
    Ok(parts)
}

fn parse_env(key: &str, default: usize, is_prod: bool) -> Result<usize, AppError> {
    get_env(key, Some(&default.to_string()), is_prod)?
        .parse()
        .map_err(|e| AppError::ConfigError(anyhow::anyhow!("{} is not a valid size: {}", key, e)))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

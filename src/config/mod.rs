pub mod types;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::common::ModError;

pub use types::{LogConfig, ModConfig, OverlayConfig};

/// 指定配置文件路径的环境变量
pub const CONFIG_ENV: &str = "UGARIS_DEMO_MOD_CONFIG";

/// 未指定时在宿主工作目录中查找的文件名
pub const DEFAULT_CONFIG_FILE: &str = "ugaris_demo_mod.yaml";

impl ModConfig {
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // an empty document is a valid "all defaults" config
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: ModConfig = serde_yml::from_str(content)
            .map_err(ModError::from)
            .context("parse mod config")?;
        config.validate()?;
        Ok(config)
    }
}

pub fn config_path() -> PathBuf {
    std::env::var_os(CONFIG_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
}

pub fn load_config(path: impl AsRef<Path>) -> Result<ModConfig> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .map_err(ModError::from)
        .with_context(|| format!("read config {}", path.display()))?;
    ModConfig::from_yaml_str(&content)
}

/// 读取配置；文件不存在时返回默认值，其他错误交给调用方记录后回退
pub fn load_or_default(path: impl AsRef<Path>) -> Result<ModConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        return Ok(ModConfig::default());
    }
    load_config(path)
}

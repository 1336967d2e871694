use anyhow::Result;
use serde::Deserialize;

use crate::common::ModError;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ModConfig {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub overlay: OverlayConfig,
}

impl ModConfig {
    pub fn validate(&self) -> Result<()> {
        // 过滤表达式必须能被 EnvFilter 接受
        if let Err(e) = tracing_subscriber::EnvFilter::try_new(&self.log.level) {
            return Err(ModError::Config(format!(
                "invalid log level '{}': {}",
                self.log.level, e
            ))
            .into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OverlayConfig {
    /// 加载后面板是否立即显示
    #[serde(default)]
    pub visible_on_start: bool,
}

use std::net::{AddrParseError, SocketAddr};
use std::path::{Path, PathBuf};
use std::time::Duration;

use gin_rummy_core::Rules;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 配置文件路径的环境变量
pub const CONFIG_ENV: &str = "GIN_SERVER_CONFIG";
/// 覆盖监听地址的环境变量
pub const BIND_ADDR_ENV: &str = "GIN_BIND_ADDR";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("无法读取配置文件 {}: {source}", path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("配置文件 {} 格式错误: {source}", path.display())]
    Parse { path: PathBuf, source: serde_json::Error },
    #[error("无效的监听地址 {value}: {source}")]
    BindAddr { value: String, source: AddrParseError },
}

/// 服务器配置，缺省字段使用默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_addr: SocketAddr,
    /// 牌局多久无人访问后被清理
    pub session_idle_secs: u64,
    /// 清理任务的执行间隔
    pub sweep_interval_secs: u64,
    pub rules: Rules,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            bind_addr: SocketAddr::from(([0, 0, 0, 0], 25917)),
            session_idle_secs: 60 * 60,
            sweep_interval_secs: 60,
            rules: Rules::default(),
        }
    }
}

impl ServerConfig {
    /// 从环境变量加载：先读 `GIN_SERVER_CONFIG` 指向的 JSON 文件，再用 `GIN_BIND_ADDR` 覆盖地址
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match std::env::var_os(CONFIG_ENV) {
            Some(path) => ServerConfig::from_file(Path::new(&path))?,
            None => ServerConfig::default(),
        };
        if let Ok(value) = std::env::var(BIND_ADDR_ENV) {
            config.bind_addr = value.parse().map_err(|source| ConfigError::BindAddr { value, source })?;
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })
    }

    pub fn session_idle(&self) -> Duration {
        Duration::from_secs(self.session_idle_secs)
    }

    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs.max(1))
    }
}

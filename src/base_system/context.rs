//! 全局配置结构（Config）与默认值。
//!
//! 该模块同时提供生成 `gallery-mirror.yml` 的字段元信息。

use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::config::{ConfigError, ConfigSpec, FieldMeta};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    // 站点配置
    #[serde(default = "default_entry_page")]
    pub entry_page: String,
    #[serde(default = "default_download_view")]
    pub download_view: String,
    #[serde(default)]
    pub root_owner: String,

    // 网络配置
    #[serde(default)]
    pub request_timeout: u64,
    #[serde(default)]
    pub connect_timeout: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    // 保存配置
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    #[serde(default = "default_true")]
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entry_page: default_entry_page(),
            download_view: default_download_view(),
            root_owner: String::new(),
            request_timeout: 0,
            connect_timeout: 0,
            user_agent: default_user_agent(),
            chunk_size: default_chunk_size(),
            show_progress: default_true(),
        }
    }
}

impl ConfigSpec for Config {
    const FILE_NAME: &'static str = "gallery-mirror.yml";

    fn fields() -> &'static [FieldMeta] {
        static FIELDS: [FieldMeta; 8] = [
            FieldMeta {
                name: "entry_page",
                description: "相册列表入口页面（相对于基础 URL）",
            },
            FieldMeta {
                name: "download_view",
                description: "下载原图时使用的 g2_view 参数",
            },
            FieldMeta {
                name: "root_owner",
                description: "根相册 gallery_meta.yml 中的 owner（如 DebConf）；默认留空，记录为 null",
            },
            FieldMeta {
                name: "request_timeout",
                description: "请求超时时间（秒），0 表示不设置",
            },
            FieldMeta {
                name: "connect_timeout",
                description: "连接超时时间（秒），0 表示不设置",
            },
            FieldMeta {
                name: "user_agent",
                description: "请求使用的 User-Agent",
            },
            FieldMeta {
                name: "chunk_size",
                description: "写入文件时的分块大小（字节）",
            },
            FieldMeta {
                name: "show_progress",
                description: "是否在终端显示相册进度",
            },
        ];
        &FIELDS
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.entry_page.trim().is_empty() {
            return Err(ConfigError::Validation("entry_page 不能为空".to_string()));
        }
        if self.download_view.trim().is_empty() {
            return Err(ConfigError::Validation(
                "download_view 不能为空".to_string(),
            ));
        }
        Ok(())
    }
}

impl Config {
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout > 0).then(|| Duration::from_secs(self.request_timeout))
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        (self.connect_timeout > 0).then(|| Duration::from_secs(self.connect_timeout))
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size.max(1)
    }

    pub fn root_owner(&self) -> Option<String> {
        let owner = self.root_owner.trim();
        (!owner.is_empty()).then(|| owner.to_string())
    }
}

fn default_true() -> bool {
    true
}

fn default_entry_page() -> String {
    "main.php".to_string()
}

fn default_download_view() -> String {
    "core.DownloadItem".to_string()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120 Safari/537.36".to_string()
}

fn default_chunk_size() -> usize {
    1024
}

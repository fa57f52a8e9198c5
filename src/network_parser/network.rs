use std::io::Read;
use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, CONNECTION, CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::base_system::context::Config;
use crate::error::{GalleryError, Result};

/// 下载请求的响应：状态码、声明的 Content-Type 以及尚未读取的正文。
pub struct DownloadResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Box<dyn Read>,
}

/// 抓取流程对网络的全部依赖：取列表页正文、打开下载流。
///
/// 实现方不做任何重试；失败即返回错误。
pub trait Transport {
    fn get_text(&self, url: &Url) -> Result<String>;
    fn open_download(&self, url: &Url) -> Result<DownloadResponse>;
}

#[derive(Debug, Clone)]
pub struct GalleryWebConfig {
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub user_agent: String,
}

impl From<&Config> for GalleryWebConfig {
    fn from(config: &Config) -> Self {
        Self {
            request_timeout: config.request_timeout(),
            connect_timeout: config.connect_timeout(),
            user_agent: config.user_agent.clone(),
        }
    }
}

pub struct GalleryWebNetwork {
    client: Client,
}

impl GalleryWebNetwork {
    pub fn new(config: GalleryWebConfig) -> anyhow::Result<Self> {
        let mut default_headers = HeaderMap::new();
        // 未启用 gzip 解码，要求原样传输，保证写盘字节与服务端一致
        default_headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        default_headers.insert(CONNECTION, HeaderValue::from_static("keep-alive"));
        default_headers.insert(ACCEPT, HeaderValue::from_static("*/*"));

        let mut builder = Client::builder()
            .default_headers(default_headers)
            .user_agent(config.user_agent.as_str());
        // blocking 客户端默认 30s 超时；未配置时显式关闭，沿用传输层默认行为
        builder = builder.timeout(config.request_timeout);
        if let Some(timeout) = config.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
        })
    }
}

impl Transport for GalleryWebNetwork {
    fn get_text(&self, url: &Url) -> Result<String> {
        let transport = |source| GalleryError::Transport {
            url: url.to_string(),
            source,
        };
        let resp = self.client.get(url.clone()).send().map_err(transport)?;
        debug!("列表页响应状态: {} {}", resp.status().as_u16(), url);
        resp.text().map_err(transport)
    }

    fn open_download(&self, url: &Url) -> Result<DownloadResponse> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .map_err(|source| GalleryError::Transport {
                url: url.to_string(),
                source,
            })?;
        let status = resp.status().as_u16();
        let content_type = resp
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        Ok(DownloadResponse {
            status,
            content_type,
            body: Box::new(resp),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn web_config_follows_user_config() {
        let config = Config {
            request_timeout: 20,
            user_agent: "gallery-mirror-test".to_string(),
            ..Config::default()
        };
        let web = GalleryWebConfig::from(&config);
        assert_eq!(web.request_timeout, Some(Duration::from_secs(20)));
        assert_eq!(web.connect_timeout, None);
        assert_eq!(web.user_agent, "gallery-mirror-test");
    }

    #[test]
    fn builds_client_without_timeouts() {
        let web = GalleryWebConfig::from(&Config::default());
        assert!(GalleryWebNetwork::new(web).is_ok());
    }
}

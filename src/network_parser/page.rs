//! 单个列表页：抓取正文并解析为可查询的文档树。

use scraper::Html;
use tracing::debug;
use url::Url;

use super::network::Transport;
use crate::error::{GalleryError, Result};

/// 已解析的列表页。所有相对链接都以本页 URL 为基准解析。
pub struct Page {
    url: Url,
    document: Html,
}

impl Page {
    pub fn parse(url: Url, html: &str) -> Self {
        Self {
            url,
            document: Html::parse_document(html),
        }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    pub fn document(&self) -> &Html {
        &self.document
    }

    pub fn resolve(&self, href: &str) -> Result<Url> {
        self.url
            .join(href.trim())
            .map_err(|source| GalleryError::InvalidUrl {
                url: href.to_string(),
                source,
            })
    }
}

impl std::fmt::Debug for Page {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Page").field("url", &self.url.as_str()).finish()
    }
}

pub fn fetch_page<T: Transport + ?Sized>(transport: &T, url: &Url) -> Result<Page> {
    debug!("抓取列表页: {}", url);
    let body = transport.get_text(url)?;
    Ok(Page::parse(url.clone(), &body))
}

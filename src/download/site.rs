//! 站点级别的 URL 规则：列表入口、条目 ID、原图下载地址。

use url::Url;

use super::models::AlbumEntry;
use crate::base_system::context::Config;
use crate::error::{GalleryError, Result};

const ITEM_ID_PARAM: &str = "g2_itemId";
const VIEW_PARAM: &str = "g2_view";

#[derive(Debug, Clone)]
pub struct GallerySite {
    /// `{base}/{entry_page}`，根相册的列表页，同时作为下载请求的入口。
    entry_url: Url,
    download_view: String,
}

impl GallerySite {
    pub fn new(base: &Url, config: &Config) -> Result<Self> {
        let entry_page = config.entry_page.trim();
        let entry_url = base
            .join(entry_page)
            .map_err(|source| GalleryError::InvalidUrl {
                url: entry_page.to_string(),
                source,
            })?;
        Ok(Self {
            entry_url,
            download_view: config.download_view.trim().to_string(),
        })
    }

    pub fn entry_url(&self) -> &Url {
        &self.entry_url
    }

    /// 根相册：标题为空（slug 为空，目录即输出根目录本身）。
    pub fn root_album(&self, owner: Option<String>) -> AlbumEntry {
        AlbumEntry {
            url: self.entry_url.clone(),
            title: String::new(),
            owner,
        }
    }

    pub fn download_url(&self, item_id: u64) -> Url {
        let mut url = self.entry_url.clone();
        url.query_pairs_mut()
            .clear()
            .append_pair(VIEW_PARAM, &self.download_view)
            .append_pair(ITEM_ID_PARAM, &item_id.to_string());
        url
    }
}

/// 从条目链接中取出 `g2_itemId`（必须是纯数字）。
pub fn item_id(item_url: &Url) -> Result<u64> {
    item_url
        .query_pairs()
        .filter(|(key, value)| {
            key == ITEM_ID_PARAM && !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit())
        })
        .last()
        .and_then(|(_, value)| value.parse::<u64>().ok())
        .ok_or_else(|| GalleryError::MalformedItemId {
            url: item_url.to_string(),
        })
}

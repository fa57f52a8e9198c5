//! 抓取相关的数据模型定义。
//!
//! `*Entry` 是从列表页抽取出的临时结构；`*Record` 是写入磁盘的 sidecar，
//! 同时充当 "已完成" 标记。

use serde::{Deserialize, Serialize};
use url::Url;

/// 列表页中的一个子相册。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlbumEntry {
    pub url: Url,
    pub title: String,
    pub owner: Option<String>,
}

/// 相册目录下的 `gallery_meta.yml`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub title: String,
    pub owner: Option<String>,
    pub url: String,
}

impl From<&AlbumEntry> for AlbumRecord {
    fn from(entry: &AlbumEntry) -> Self {
        Self {
            title: entry.title.clone(),
            owner: entry.owner.clone(),
            url: entry.url.to_string(),
        }
    }
}

/// 列表页中的一个条目（图片/视频/链接）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemEntry {
    pub url: Url,
    pub title: Option<String>,
    pub description: Option<String>,
}

/// 条目的 sidecar（`{basename}.yml`）。`url` 为列表页中的条目链接，而非下载地址。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRecord {
    pub title: Option<String>,
    pub description: Option<String>,
    pub url: String,
}

impl From<&ItemEntry> for ItemRecord {
    fn from(entry: &ItemEntry) -> Self {
        Self {
            title: entry.title.clone(),
            description: entry.description.clone(),
            url: entry.url.to_string(),
        }
    }
}

/// 单个条目的处理结果。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemOutcome {
    Downloaded { bytes: u64 },
    AlreadyArchived,
    LinkOnly,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ArchiveStats {
    pub albums_archived: u32,
    pub albums_skipped: u32,
    pub items_downloaded: u32,
    pub items_skipped: u32,
    pub link_items: u32,
    pub bytes_written: u64,
}

impl ArchiveStats {
    pub(crate) fn record_item(&mut self, outcome: ItemOutcome) {
        match outcome {
            ItemOutcome::Downloaded { bytes } => {
                self.items_downloaded += 1;
                self.bytes_written += bytes;
            }
            ItemOutcome::AlreadyArchived => self.items_skipped += 1,
            ItemOutcome::LinkOnly => self.link_items += 1,
        }
    }
}

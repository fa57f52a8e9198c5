//! 归档流程模块入口。
//!
//! 子模块：
//! - `models`          — 数据模型（AlbumEntry / AlbumRecord / ItemEntry / ItemRecord / ArchiveStats）
//! - `site`            — 列表入口、条目 ID 与下载地址
//! - `content_type`    — Content-Type → 扩展名
//! - `sidecar`         — sidecar 元数据读写（完成标记）
//! - `progress`        — 终端进度显示
//! - `item_downloader` — 单个条目的下载
//! - `archiver`        — 相册树递归归档

pub mod archiver;
pub mod content_type;
pub mod item_downloader;
pub mod models;
pub(crate) mod progress;
pub mod sidecar;
pub mod site;

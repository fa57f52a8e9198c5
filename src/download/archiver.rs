//! 相册树的递归归档。
//!
//! 每个相册的状态：`Unvisited -> InProgress -> Complete`。只有 `Complete` 会落盘
//! （`gallery_meta.yml`），并且只在全部子相册和条目处理完之后才写入；
//! 已完成的相册在之后的运行中整棵子树都不会再访问。
//!
//! 子相册与条目分两趟遍历同一个分页列表，每趟都从第一页重新抓取。

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};
use url::Url;

use super::item_downloader::ItemDownloader;
use super::models::{AlbumEntry, AlbumRecord, ArchiveStats};
use super::progress::{AlbumProgress, display_title};
use super::sidecar::{album_meta_path, write_record};
use super::site::{GallerySite, item_id};
use crate::base_system::context::Config;
use crate::error::{GalleryError, Result};
use crate::gallery_parser::extractor::{UntitledAlbums, extract_albums, extract_items};
use crate::gallery_parser::slug::slug;
use crate::network_parser::network::Transport;
use crate::network_parser::paginator::paginate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlbumState {
    Unvisited,
    InProgress,
    Complete,
}

impl AlbumState {
    /// 磁盘上能观察到的状态：有 sidecar 即完成，否则视为未访问（含上次中断的半成品）。
    pub fn probe(album_dir: &Path) -> Self {
        if album_meta_path(album_dir).exists() {
            Self::Complete
        } else {
            Self::Unvisited
        }
    }
}

/// 子相册目录：`parent / slug(title)`。
///
/// slug 为空（标题全是非 ASCII 字符等）时改用 `_album-{g2_itemId}`；
/// slug 只含 `[A-Za-z0-9-]`，下划线开头的目录名不会与有标题的兄弟相册重名。
pub fn album_dir(parent: &Path, album: &AlbumEntry) -> PathBuf {
    let segment = slug(&album.title);
    if !segment.is_empty() {
        return parent.join(segment);
    }
    match item_id(&album.url) {
        Ok(id) => parent.join(format!("_album-{id}")),
        Err(_) => parent.join(format!("_album-{}", slug(album.url.as_str()))),
    }
}

pub struct Archiver<'a, T: ?Sized> {
    transport: &'a T,
    downloader: ItemDownloader<'a, T>,
    show_progress: bool,
    stats: ArchiveStats,
}

impl<'a, T: Transport + ?Sized> Archiver<'a, T> {
    pub fn new(transport: &'a T, site: &'a GallerySite, config: &Config) -> Self {
        Self {
            transport,
            downloader: ItemDownloader::new(transport, site, config.chunk_size()),
            show_progress: config.show_progress,
            stats: ArchiveStats::default(),
        }
    }

    pub fn stats(&self) -> ArchiveStats {
        self.stats
    }

    pub fn archive_album(&mut self, parent: &Path, album: &AlbumEntry) -> Result<()> {
        self.archive_album_at(&album_dir(parent, album), album)
    }

    /// 把相册归档到指定目录；根相册直接使用输出目录。
    pub fn archive_album_at(&mut self, dir: &Path, album: &AlbumEntry) -> Result<()> {
        fs::create_dir_all(dir).map_err(|source| GalleryError::io(dir, source))?;

        if AlbumState::probe(dir) == AlbumState::Complete {
            debug!("相册已完成，跳过: {}", dir.display());
            self.stats.albums_skipped += 1;
            return Ok(());
        }

        info!(
            "下载相册 {} -> {} ({})",
            display_title(&album.title),
            dir.display(),
            album.url
        );
        debug!("相册状态: {:?} -> {:?}", AlbumState::Unvisited, AlbumState::InProgress);

        self.archive_sub_albums(&album.url, dir)?;
        self.archive_items(album, dir)?;

        // 提交点：子相册与条目全部处理完毕后才写入
        write_record(&album_meta_path(dir), &AlbumRecord::from(album))?;
        self.stats.albums_archived += 1;
        debug!("相册状态: {:?} -> {:?}", AlbumState::InProgress, AlbumState::Complete);
        Ok(())
    }

    fn archive_sub_albums(&mut self, album_url: &Url, dir: &Path) -> Result<()> {
        let transport = self.transport;
        let mut untitled = UntitledAlbums::new();
        for page in paginate(transport, album_url.clone()) {
            let page = page?;
            for sub_album in extract_albums(&page, &mut untitled)? {
                self.archive_album(dir, &sub_album)?;
            }
        }
        Ok(())
    }

    fn archive_items(&mut self, album: &AlbumEntry, dir: &Path) -> Result<()> {
        let transport = self.transport;
        let progress = AlbumProgress::start(self.show_progress, &album.title);
        // 序号跨页连续，不随翻页重置
        let mut index = 0usize;
        for page in paginate(transport, album.url.clone()) {
            let page = page?;
            for item in extract_items(&page)? {
                progress.item(index);
                let outcome = self.downloader.download_item(index, &item, dir)?;
                self.stats.record_item(outcome);
                index += 1;
            }
        }
        progress.finish();
        if index > 0 {
            debug!("相册共 {} 个条目: {}", index, dir.display());
        }
        Ok(())
    }
}

/// 从站点根相册开始归档整个图库。
pub fn mirror_gallery<T: Transport + ?Sized>(
    transport: &T,
    site: &GallerySite,
    output: &Path,
    config: &Config,
) -> Result<ArchiveStats> {
    fs::create_dir_all(output).map_err(|source| GalleryError::io(output, source))?;
    let root = site.root_album(config.root_owner());
    let mut archiver = Archiver::new(transport, site, config);
    archiver.archive_album_at(output, &root)?;
    Ok(archiver.stats())
}

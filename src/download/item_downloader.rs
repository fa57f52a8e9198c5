//! 单个条目的下载：解析下载地址、按 Content-Type 命名、分块写盘，最后写 sidecar。

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use tracing::debug;

use super::content_type::ContentKind;
use super::models::{ItemEntry, ItemOutcome, ItemRecord};
use super::sidecar::{item_meta_path, write_record};
use super::site::{GallerySite, item_id};
use crate::error::{GalleryError, Result};
use crate::gallery_parser::slug::slug;
use crate::network_parser::network::Transport;

const DOWNLOAD_OK: u16 = 200;

/// `{index:03}` 加上可选的 `-{slug(title)}`；空标题不追加后缀。
pub fn item_basename(index: usize, title: Option<&str>) -> String {
    let mut basename = format!("{index:03}");
    if let Some(title) = title
        && !title.is_empty()
    {
        basename.push('-');
        basename.push_str(&slug(title));
    }
    basename
}

pub struct ItemDownloader<'a, T: ?Sized> {
    transport: &'a T,
    site: &'a GallerySite,
    chunk_size: usize,
}

impl<'a, T: Transport + ?Sized> ItemDownloader<'a, T> {
    pub fn new(transport: &'a T, site: &'a GallerySite, chunk_size: usize) -> Self {
        Self {
            transport,
            site,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn download_item(
        &self,
        index: usize,
        item: &ItemEntry,
        album_dir: &Path,
    ) -> Result<ItemOutcome> {
        let id = item_id(&item.url)?;
        let download_url = self.site.download_url(id);

        let basename = item_basename(index, item.title.as_deref());
        let meta_path = item_meta_path(album_dir, &basename);
        if meta_path.exists() {
            debug!("条目已存在，跳过: {}", meta_path.display());
            return Ok(ItemOutcome::AlreadyArchived);
        }

        debug!("下载条目 {} -> {}", download_url, basename);
        let resp = self.transport.open_download(&download_url)?;
        if resp.status != DOWNLOAD_OK {
            return Err(GalleryError::UnexpectedStatus {
                status: resp.status,
                url: download_url.to_string(),
            });
        }

        let content_type =
            resp.content_type
                .as_deref()
                .ok_or_else(|| GalleryError::MissingContentType {
                    url: download_url.to_string(),
                })?;
        let kind =
            ContentKind::classify(content_type).ok_or_else(|| GalleryError::UnknownContentType {
                content_type: content_type.to_string(),
                url: download_url.to_string(),
            })?;
        let Some(extension) = kind.extension() else {
            debug!("链接条目，无内容可下载: {}", item.url);
            return Ok(ItemOutcome::LinkOnly);
        };

        let file_path = album_dir.join(format!("{basename}{extension}"));
        let bytes = self.stream_to_file(resp.body, &file_path, download_url.as_str())?;

        write_record(&meta_path, &ItemRecord::from(item))?;
        Ok(ItemOutcome::Downloaded { bytes })
    }

    fn stream_to_file(&self, mut body: Box<dyn Read>, path: &Path, url: &str) -> Result<u64> {
        let mut file = File::create(path).map_err(|source| GalleryError::io(path, source))?;
        let mut buf = vec![0u8; self.chunk_size];
        let mut written = 0u64;
        loop {
            let n = match body.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(GalleryError::BodyRead {
                        url: url.to_string(),
                        source,
                    });
                }
            };
            file.write_all(&buf[..n])
                .map_err(|source| GalleryError::io(path, source))?;
            written += n as u64;
        }
        file.flush().map_err(|source| GalleryError::io(path, source))?;
        Ok(written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base_system::context::Config;
    use crate::download::sidecar::read_record;
    use crate::network_parser::fake::FakeTransport;
    use std::fs;
    use url::Url;

    const DL: &str = "http://example.net/main.php?g2_view=core.DownloadItem&g2_itemId=63006";

    fn site() -> GallerySite {
        GallerySite::new(&Url::parse("http://example.net/").unwrap(), &Config::default()).unwrap()
    }

    fn item(title: Option<&str>) -> ItemEntry {
        ItemEntry {
            url: Url::parse("http://example.net/main.php?g2_itemId=63006").unwrap(),
            title: title.map(str::to_string),
            description: Some("by the fire".to_string()),
        }
    }

    #[test]
    fn basename_pads_index_and_appends_slug() {
        assert_eq!(item_basename(0, None), "000");
        assert_eq!(item_basename(7, Some("")), "007");
        assert_eq!(item_basename(12, Some("Evening, before debcamp.")), "012-Evening-before-debcamp");
        assert_eq!(item_basename(3, Some("!!!")), "003-");
        assert_eq!(item_basename(1234, Some("x")), "1234-x");
    }

    #[test]
    fn downloads_body_then_writes_sidecar() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let body = vec![0xffu8; 5000];
        let fake = FakeTransport::new().download(DL, 200, Some("image/jpeg"), &body);
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let outcome = downloader
            .download_item(5, &item(Some("Keeping warm")), dir.path())
            .unwrap();
        assert_eq!(outcome, ItemOutcome::Downloaded { bytes: 5000 });

        assert_eq!(fs::read(dir.path().join("005-Keeping-warm.jpg")).unwrap(), body);
        let record: ItemRecord = read_record(&dir.path().join("005-Keeping-warm.yml")).unwrap();
        assert_eq!(record.title.as_deref(), Some("Keeping warm"));
        assert_eq!(record.description.as_deref(), Some("by the fire"));
        assert_eq!(record.url, "http://example.net/main.php?g2_itemId=63006");
    }

    #[test]
    fn unknown_application_type_has_no_extension() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new().download(DL, 200, Some("application/unknown"), b"raw");
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        downloader.download_item(0, &item(None), dir.path()).unwrap();
        assert_eq!(fs::read(dir.path().join("000")).unwrap(), b"raw");
        assert!(dir.path().join("000.yml").exists());
    }

    #[test]
    fn existing_sidecar_skips_without_request() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("002.yml"), "title: null\n").unwrap();
        let site = site();
        let fake = FakeTransport::new();
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let outcome = downloader.download_item(2, &item(None), dir.path()).unwrap();
        assert_eq!(outcome, ItemOutcome::AlreadyArchived);
        assert!(fake.requests().is_empty());
    }

    #[test]
    fn link_item_leaves_no_trace() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new().download(DL, 200, Some("gallery/linkitem"), b"");
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let outcome = downloader.download_item(0, &item(Some("Link")), dir.path()).unwrap();
        assert_eq!(outcome, ItemOutcome::LinkOnly);
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn non_ok_status_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new().download(DL, 404, Some("text/html"), b"missing");
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let err = downloader.download_item(0, &item(None), dir.path()).unwrap_err();
        match err {
            GalleryError::UnexpectedStatus { status, url } => {
                assert_eq!(status, 404);
                assert_eq!(url, DL);
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn unmapped_content_type_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new().download(DL, 200, Some("image/gif"), b"GIF89a");
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let err = downloader.download_item(0, &item(None), dir.path()).unwrap_err();
        assert!(matches!(
            err,
            GalleryError::UnknownContentType { ref content_type, .. } if content_type == "image/gif"
        ));
        assert!(!dir.path().join("000.yml").exists());
    }

    #[test]
    fn missing_content_type_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new().download(DL, 200, None, b"??");
        let downloader = ItemDownloader::new(&fake, &site, 1024);

        let err = downloader.download_item(0, &item(None), dir.path()).unwrap_err();
        assert!(matches!(err, GalleryError::MissingContentType { .. }));
    }

    #[test]
    fn malformed_item_url_is_fatal_before_any_request() {
        let dir = tempfile::tempdir().unwrap();
        let site = site();
        let fake = FakeTransport::new();
        let downloader = ItemDownloader::new(&fake, &site, 1024);
        let entry = ItemEntry {
            url: Url::parse("http://example.net/photos/1234.jpg").unwrap(),
            title: None,
            description: None,
        };

        let err = downloader.download_item(0, &entry, dir.path()).unwrap_err();
        assert!(matches!(err, GalleryError::MalformedItemId { .. }));
        assert!(fake.requests().is_empty());
    }
}

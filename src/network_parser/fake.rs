//! 测试用的内存 Transport：返回预置页面/下载内容，并记录每一次请求。

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{self, Cursor};

use url::Url;

use super::network::{DownloadResponse, Transport};
use crate::error::{GalleryError, Result};

#[derive(Clone)]
struct FakeDownload {
    status: u16,
    content_type: Option<String>,
    body: Vec<u8>,
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    pages: HashMap<String, String>,
    downloads: HashMap<String, FakeDownload>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn page(mut self, url: &str, html: &str) -> Self {
        self.pages.insert(url.to_string(), html.to_string());
        self
    }

    pub(crate) fn download(
        mut self,
        url: &str,
        status: u16,
        content_type: Option<&str>,
        body: &[u8],
    ) -> Self {
        self.downloads.insert(
            url.to_string(),
            FakeDownload {
                status,
                content_type: content_type.map(str::to_string),
                body: body.to_vec(),
            },
        );
        self
    }

    pub(crate) fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }

    pub(crate) fn clear_requests(&self) {
        self.requests.borrow_mut().clear();
    }

    fn record(&self, url: &Url) {
        self.requests.borrow_mut().push(url.to_string());
    }
}

fn not_found(url: &Url) -> GalleryError {
    GalleryError::BodyRead {
        url: url.to_string(),
        source: io::Error::new(io::ErrorKind::NotFound, "no canned response"),
    }
}

impl Transport for FakeTransport {
    fn get_text(&self, url: &Url) -> Result<String> {
        self.record(url);
        self.pages.get(url.as_str()).cloned().ok_or_else(|| not_found(url))
    }

    fn open_download(&self, url: &Url) -> Result<DownloadResponse> {
        self.record(url);
        let canned = self
            .downloads
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| not_found(url))?;
        Ok(DownloadResponse {
            status: canned.status,
            content_type: canned.content_type,
            body: Box::new(Cursor::new(canned.body)),
        })
    }
}

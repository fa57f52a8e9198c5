//! 抓取核心的错误类型。
//!
//! 核心流程中任何错误都不会被捕获重试：一律向上传播并终止本次运行，
//! 断点续传完全依赖 sidecar 文件的存在性检查。

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GalleryError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("reading body of {url} failed: {source}")]
    BodyRead {
        url: String,
        #[source]
        source: io::Error,
    },
    #[error("got HTTP {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },
    #[error("unrecognized content type '{content_type}' from {url}")]
    UnknownContentType { content_type: String, url: String },
    #[error("response from {url} has no Content-Type header")]
    MissingContentType { url: String },
    #[error("item url {url} carries no numeric g2_itemId")]
    MalformedItemId { url: String },
    #[error("invalid url '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("io error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("sidecar error at {path}: {source}")]
    Sidecar {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

impl GalleryError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T, E = GalleryError> = std::result::Result<T, E>;

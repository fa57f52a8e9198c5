//! sidecar 元数据文件的读写。
//!
//! sidecar 是节点的提交点：只有在该节点的全部内容处理完毕后才写入，
//! 因此它的存在即表示 "已完成"。写入先落到临时文件再改名，中断时不会留下半截记录。

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{GalleryError, Result};

pub const ALBUM_META_FILE: &str = "gallery_meta.yml";
const SIDECAR_EXT: &str = "yml";

pub fn album_meta_path(album_dir: &Path) -> PathBuf {
    album_dir.join(ALBUM_META_FILE)
}

pub fn item_meta_path(album_dir: &Path, basename: &str) -> PathBuf {
    album_dir.join(format!("{basename}.{SIDECAR_EXT}"))
}

pub fn write_record<T: Serialize>(path: &Path, record: &T) -> Result<()> {
    let yaml = serde_yaml::to_string(record).map_err(|source| GalleryError::Sidecar {
        path: path.to_path_buf(),
        source,
    })?;
    write_atomic(path, yaml.as_bytes()).map_err(|source| GalleryError::io(path, source))
}

#[cfg(test)]
pub fn read_record<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).map_err(|source| GalleryError::io(path, source))?;
    serde_yaml::from_str(&raw).map_err(|source| GalleryError::Sidecar {
        path: path.to_path_buf(),
        source,
    })
}

fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".part");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, bytes)?;
    fs::rename(tmp, path)
}

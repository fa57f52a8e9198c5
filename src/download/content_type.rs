//! 下载响应的 Content-Type 分类。
//!
//! 映射是封闭的：未列出的类型一律视为错误，不会按默认扩展名保存。

/// 已知的下载内容类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Png,
    Jpeg,
    QuickTime,
    Unknown,
    /// Gallery2 的链接条目：没有可下载的内容。
    LinkItem,
}

impl ContentKind {
    /// 按媒体类型本体匹配（忽略 `; charset=...` 等参数，不区分大小写）。
    pub fn classify(content_type: &str) -> Option<Self> {
        let essence = content_type
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_lowercase();
        match essence.as_str() {
            "image/png" => Some(Self::Png),
            "image/jpeg" => Some(Self::Jpeg),
            "video/quicktime" => Some(Self::QuickTime),
            "application/unknown" => Some(Self::Unknown),
            "gallery/linkitem" => Some(Self::LinkItem),
            _ => None,
        }
    }

    /// 保存文件使用的扩展名；链接条目不落盘，返回 None。
    pub fn extension(self) -> Option<&'static str> {
        match self {
            Self::Png => Some(".png"),
            Self::Jpeg => Some(".jpg"),
            Self::QuickTime => Some(".mov"),
            Self::Unknown => Some(""),
            Self::LinkItem => None,
        }
    }
}

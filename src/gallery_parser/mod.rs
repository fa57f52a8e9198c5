//! 列表页解析：相册/条目抽取与标题 slug。

pub mod extractor;
pub(crate) mod selectors;
pub mod slug;

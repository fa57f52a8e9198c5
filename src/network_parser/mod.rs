//! 网络层：页面抓取、HTML 解析与翻页。
//!
//! 子模块：
//! - `network`   — `Transport` 抽象与基于 reqwest 的实现
//! - `page`      — 抓取并解析单个列表页
//! - `paginator` — 沿 "下一页" 链接惰性遍历列表页

pub mod network;
pub mod page;
pub mod paginator;

#[cfg(test)]
pub(crate) mod fake;

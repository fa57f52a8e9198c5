//! 列表页翻页：从起始 URL 出发，沿 `div.gbNavigator .next` 链接逐页前进。
//!
//! 迭代器是惰性的，只在被消费时才抓取下一页；重新调用 [`paginate`] 会从起始页重新抓取。
//! 站点若出现循环的 "下一页" 链接，迭代不会结束。

use tracing::warn;
use url::Url;

use super::network::Transport;
use super::page::{Page, fetch_page};
use crate::error::Result;
use crate::gallery_parser::selectors;

pub struct Pages<'a, T: ?Sized> {
    transport: &'a T,
    next: Option<Result<Url>>,
}

pub fn paginate<T: Transport + ?Sized>(transport: &T, start: Url) -> Pages<'_, T> {
    Pages {
        transport,
        next: Some(Ok(start)),
    }
}

impl<T: Transport + ?Sized> Iterator for Pages<'_, T> {
    type Item = Result<Page>;

    fn next(&mut self) -> Option<Self::Item> {
        let url = match self.next.take()? {
            Ok(url) => url,
            Err(err) => return Some(Err(err)),
        };
        // 出错后 next 保持为 None，迭代随之结束
        let page = match fetch_page(self.transport, &url) {
            Ok(page) => page,
            Err(err) => return Some(Err(err)),
        };
        self.next = next_page_url(&page);
        Some(Ok(page))
    }
}

/// 查找本页的 "下一页" 链接；没有翻页区或其中没有 next 链接时返回 None。
pub fn next_page_url(page: &Page) -> Option<Result<Url>> {
    let navigator = page.document().select(selectors::navigator()).next()?;
    let next = navigator.select(selectors::next_link()).next()?;
    let href = next.value().attr("href")?;
    if href.trim().is_empty() {
        warn!("翻页链接为空，视为最后一页: {}", page.url());
        return None;
    }
    Some(page.resolve(href))
}

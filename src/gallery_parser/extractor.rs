//! 从列表页抽取相册与条目。
//!
//! Gallery2 的缩略图单元格（`td.giAlbumCell` / `td.giItemCell`）与描述块在标记上是分开的：
//! 描述块通常是紧随其后的兄弟节点。见 [`resolve_description_block`]。
//! 抽取结果保持页面中的出现顺序，条目序号依赖这一顺序。

use scraper::ElementRef;
use tracing::warn;

use super::selectors;
use crate::download::models::{AlbumEntry, ItemEntry};
use crate::error::Result;
use crate::network_parser::page::Page;

const ALBUM_TITLE_PREFIX: &str = "Album: ";
const OWNER_PREFIX: &str = "Owner: ";

/// 为缺少标题的相册生成 `Untitled Album {n}`。
///
/// 计数器覆盖同一列表的所有分页，只在遇到无标题相册时递增；
/// 由调用方持有并在翻页间传递。
#[derive(Debug, Default)]
pub struct UntitledAlbums {
    next: usize,
}

impl UntitledAlbums {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_title(&mut self) -> String {
        let title = format!("Untitled Album {}", self.next);
        self.next += 1;
        title
    }
}

/// 找到单元格对应的描述块：
/// 1. 紧随其后的兄弟节点；
/// 2. 若该兄弟是文本（或注释）节点，跳过它取再下一个兄弟；
/// 3. 若不存在兄弟元素，退回单元格自身。
pub fn resolve_description_block(cell: ElementRef<'_>) -> ElementRef<'_> {
    let mut sibling = cell.next_sibling();
    if let Some(node) = sibling
        && !node.value().is_element()
    {
        sibling = node.next_sibling();
    }
    sibling.and_then(ElementRef::wrap).unwrap_or(cell)
}

pub fn extract_albums(page: &Page, untitled: &mut UntitledAlbums) -> Result<Vec<AlbumEntry>> {
    let mut albums = Vec::new();
    for cell in page.document().select(selectors::album_cell()) {
        let Some(href) = cell_href(cell) else {
            warn!("相册单元格缺少链接，已忽略: {}", page.url());
            continue;
        };
        let url = page.resolve(href)?;
        let block = resolve_description_block(cell);

        let title = match first_text(block, selectors::title()) {
            Some(title) => title
                .strip_prefix(ALBUM_TITLE_PREFIX)
                .map(str::to_string)
                .unwrap_or(title),
            None => untitled.next_title(),
        };

        let owner = block
            .select(selectors::info_block())
            .next()
            .and_then(|info| first_text(info, selectors::owner()))
            .map(|owner| {
                owner
                    .strip_prefix(OWNER_PREFIX)
                    .map(str::to_string)
                    .unwrap_or(owner)
            });

        albums.push(AlbumEntry { url, title, owner });
    }
    Ok(albums)
}

pub fn extract_items(page: &Page) -> Result<Vec<ItemEntry>> {
    let mut items = Vec::new();
    for cell in page.document().select(selectors::item_cell()) {
        let Some(href) = cell_href(cell) else {
            warn!("条目单元格缺少链接，已忽略: {}", page.url());
            continue;
        };
        let url = page.resolve(href)?;
        let block = resolve_description_block(cell);

        items.push(ItemEntry {
            url,
            title: first_text(block, selectors::title()),
            description: first_text(block, selectors::description()),
        });
    }
    Ok(items)
}

fn cell_href(cell: ElementRef<'_>) -> Option<&str> {
    cell.select(selectors::cell_link())
        .next()
        .and_then(|a| a.value().attr("href"))
}

/// 第一个匹配元素的文本（去除首尾空白）；元素不存在时为 None，元素为空时为 `Some("")`。
fn first_text(scope: ElementRef<'_>, selector: &scraper::Selector) -> Option<String> {
    scope
        .select(selector)
        .next()
        .map(|el| el.text().collect::<String>().trim().to_string())
}

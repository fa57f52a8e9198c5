//! Gallery2 列表页的 CSS 选择器，编译一次复用。

use scraper::Selector;
use std::sync::OnceLock;

macro_rules! selector {
    ($name:ident, $css:literal) => {
        pub(crate) fn $name() -> &'static Selector {
            static S: OnceLock<Selector> = OnceLock::new();
            S.get_or_init(|| Selector::parse($css).expect(concat!("compile selector ", $css)))
        }
    };
}

selector!(album_cell, "td.giAlbumCell");
selector!(item_cell, "td.giItemCell");
selector!(cell_link, "a[href]");
selector!(title, "p.giTitle");
selector!(description, "p.giDescription");
selector!(info_block, "div.giInfo");
selector!(owner, "div.owner");
selector!(navigator, "div.gbNavigator");
selector!(next_link, ".next[href]");

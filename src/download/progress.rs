//! 相册进度的终端显示。

use std::time::Duration;

use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};

/// 单个相册的进度 spinner；关闭显示时所有操作均为空操作。
pub(crate) struct AlbumProgress {
    bar: Option<ProgressBar>,
}

impl AlbumProgress {
    pub(crate) fn start(enabled: bool, title: &str) -> Self {
        if !enabled {
            return Self { bar: None };
        }
        let bar = ProgressBar::with_draw_target(None, ProgressDrawTarget::stderr());
        let style = ProgressStyle::with_template("{spinner} [{elapsed_precise}] {prefix} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(style);
        bar.set_prefix(display_title(title).to_string());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self { bar: Some(bar) }
    }

    pub(crate) fn item(&self, index: usize) {
        if let Some(bar) = self.bar.as_ref() {
            bar.set_message(format!("#{index:03}"));
        }
    }

    pub(crate) fn finish(&self) {
        if let Some(bar) = self.bar.as_ref() {
            bar.finish_and_clear();
        }
    }
}

impl Drop for AlbumProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

pub(crate) fn display_title(title: &str) -> &str {
    if title.is_empty() { "(root)" } else { title }
}

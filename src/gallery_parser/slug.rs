//! 标题 → 文件系统安全的路径片段。
//!
//! 只保留 `[A-Za-z0-9 ]`，空白串折叠为单个 `-`，截断到 100 个字符。
//! 结果可能为空，也可能与其他标题冲突；条目靠序号前缀区分。

use regex::Regex;
use std::sync::OnceLock;

pub const MAX_SLUG_LEN: usize = 100;

fn re_whitespace() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"\s+").expect("compile RE_WHITESPACE"))
}

fn re_disallowed() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r"[^A-Za-z0-9 ]+").expect("compile RE_DISALLOWED"))
}

fn re_spaces() -> &'static Regex {
    static R: OnceLock<Regex> = OnceLock::new();
    R.get_or_init(|| Regex::new(r" +").expect("compile RE_SPACES"))
}

pub fn slug(title: &str) -> String {
    // 制表符/换行等先统一成空格，避免被当作普通字符剔除后把两个单词粘在一起
    let spaced = re_whitespace().replace_all(title, " ");
    let kept = re_disallowed().replace_all(&spaced, "");
    let mut slug = re_spaces().replace_all(&kept, "-").into_owned();
    // 此时只剩 ASCII，按字节截断即按字符截断
    slug.truncate(MAX_SLUG_LEN);
    slug
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("DebConf17, Montreal, Canada", "DebConf17-Montreal-Canada")]
    #[case("Keeping warm by the fire. Evening before debcamp.", "Keeping-warm-by-the-fire-Evening-before-debcamp")]
    #[case("a ! b", "a-b")]
    #[case("a\t\n b", "a-b")]
    #[case("Café Crème", "Caf-Crme")]
    #[case("!!!", "")]
    #[case("", "")]
    #[case(" padded ", "-padded-")]
    #[case("Untitled Album 0", "Untitled-Album-0")]
    fn slugs(#[case] title: &str, #[case] expected: &str) {
        assert_eq!(slug(title), expected);
    }

    #[test]
    fn truncates_to_limit() {
        let title = "word ".repeat(60);
        let result = slug(&title);
        assert_eq!(result.len(), MAX_SLUG_LEN);
        assert!(result.starts_with("word-word-"));
    }

    #[test]
    fn output_stays_in_safe_alphabet() {
        let titles = [
            "Ünïcödé – “quotes” & ampersands",
            "../../etc/passwd",
            "tabs\tand\nnewlines\r\nmixed   spaces",
            "日本語のタイトル 2019",
            "C:\\Windows\\System32",
        ];
        for title in titles {
            let result = slug(title);
            assert!(result.len() <= MAX_SLUG_LEN);
            assert!(
                result.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
                "unsafe slug {result:?} for {title:?}"
            );
            assert!(!result.contains("--"), "uncollapsed run in {result:?}");
        }
    }

    #[test]
    fn is_deterministic() {
        let title = "DebConf 19 — Curitiba, Brazil";
        assert_eq!(slug(title), slug(title));
    }
}

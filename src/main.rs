//! Gallery2 相册镜像工具。
//!
//! 从图库根列表页开始，按相册层级把图片/视频及其元数据保存到本地目录树；
//! 可以随时中断，重新运行时跳过已完成的相册与条目。
//!
//! 代码结构（读代码入口）：
//! - `base_system`：配置/日志等基础设施
//! - `network_parser`：HTTP 抓取、页面解析与翻页
//! - `gallery_parser`：相册/条目抽取与标题 slug
//! - `download`：递归归档与条目下载

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::info;
use url::Url;

mod base_system;
mod download;
mod error;
mod gallery_parser;
mod network_parser;

use base_system::config::load_or_create;
use base_system::context::Config;
use base_system::logging::{LogOptions, LogSystem};
use download::archiver::mirror_gallery;
use download::site::GallerySite;
use network_parser::network::{GalleryWebConfig, GalleryWebNetwork};

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Parser)]
#[command(name = "gallery-mirror")]
#[command(about = "Mirror a Gallery2 photo gallery into a local directory tree")]
#[command(version = VERSION)]
struct Cli {
    /// Gallery2 基础 URL（例如 https://gallery.debconf.org/）
    url: String,

    /// 输出目录
    output: PathBuf,

    /// 启用调试日志输出
    #[arg(long, default_value_t = false)]
    debug: bool,

    /// 数据目录路径（用于存放 gallery-mirror.yml 和 logs）
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let data_dir = cli.data_dir.as_deref();
    let _log = init_logging(cli.debug, data_dir)?;

    let config = load_or_create::<Config>(None, data_dir).context("加载配置失败")?;

    let base = Url::parse(cli.url.trim()).with_context(|| format!("无效的 URL: {}", cli.url))?;
    run(&base, &cli.output, &config)
}

fn run(base: &Url, output: &Path, config: &Config) -> Result<()> {
    info!(target: "startup", "gallery-mirror v{}", VERSION);
    let site = GallerySite::new(base, config)?;
    let network = GalleryWebNetwork::new(GalleryWebConfig::from(config))
        .context("初始化 HTTP 客户端失败")?;

    let stats = mirror_gallery(&network, &site, output, config)
        .with_context(|| format!("镜像 {} 失败", site.entry_url()))?;

    info!(
        "完成：新归档相册 {}，跳过相册 {}，下载条目 {}，跳过条目 {}，链接条目 {}，写入 {} 字节",
        stats.albums_archived,
        stats.albums_skipped,
        stats.items_downloaded,
        stats.items_skipped,
        stats.link_items,
        stats.bytes_written
    );
    Ok(())
}

fn init_logging(debug: bool, base_dir: Option<&Path>) -> Result<LogSystem> {
    let opts = LogOptions {
        debug,
        ..LogOptions::default()
    };
    LogSystem::init_with_base(opts, base_dir).map_err(|e| anyhow!(e))
}

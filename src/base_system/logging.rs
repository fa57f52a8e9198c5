//! 日志：控制台（stderr）+ `logs/latest.log`。
//!
//! 正常退出时把 `latest.log` 打包成 `log_<时间>.zip`；Ctrl+C 只刷新日志后立即退出，
//! 不打包，下次启动时超过上限的日志会先被打包。

use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::{io, panic, process};

use time::OffsetDateTime;
use time::macros::format_description;
use tracing::{error, warn};
use tracing_appender::non_blocking::{NonBlockingBuilder, WorkerGuard};
use tracing_appender::rolling;
use tracing_subscriber::Layer;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use zip::CompressionMethod;
use zip::write::FileOptions;

/// 启动时超过该大小的 `latest.log` 先打包
const ROTATE_THRESHOLD: u64 = 10 * 1024 * 1024;
const LATEST_LOG: &str = "latest.log";
/// 128 + SIGINT
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[derive(Debug, thiserror::Error)]
pub enum LogError {
    #[error("logging already initialized")]
    AlreadyInitialized,
    #[error("failed to install subscriber: {0}")]
    SubscriberInit(#[from] tracing_subscriber::util::TryInitError),
    #[error("log file io: {0}")]
    Io(#[from] io::Error),
    #[error("log archive: {0}")]
    Zip(#[from] zip::result::ZipError),
    #[error("archive timestamp: {0}")]
    Time(#[from] time::error::Format),
}

#[derive(Clone, Copy, Debug)]
pub struct LogOptions {
    pub debug: bool,
    pub use_color: bool,
    pub archive_on_exit: bool,
    pub console: bool,
}

impl Default for LogOptions {
    fn default() -> Self {
        Self {
            debug: false,
            use_color: true,
            archive_on_exit: true,
            console: true,
        }
    }
}

/// `logs/` 目录及其中的 `latest.log`。
#[derive(Debug, Clone)]
struct LogFiles {
    dir: PathBuf,
}

impl LogFiles {
    fn new(base_dir: Option<&Path>) -> Self {
        let dir = base_dir.map_or_else(|| PathBuf::from("logs"), |base| base.join("logs"));
        Self { dir }
    }

    fn latest(&self) -> PathBuf {
        self.dir.join(LATEST_LOG)
    }

    fn rotate_if_large(&self) -> Result<(), LogError> {
        let size = fs::metadata(self.latest()).map(|m| m.len()).unwrap_or(0);
        if size >= ROTATE_THRESHOLD {
            self.archive()?;
        }
        Ok(())
    }

    /// 打包并删除 `latest.log`；文件不存在或为空时不产生压缩包。
    fn archive(&self) -> Result<Option<PathBuf>, LogError> {
        let latest = self.latest();
        let size = match fs::metadata(&latest) {
            Ok(meta) => meta.len(),
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        if size == 0 {
            let _ = fs::remove_file(&latest);
            return Ok(None);
        }

        let stamp = OffsetDateTime::now_utc().format(format_description!(
            "[year][month][day]_[hour][minute][second]"
        ))?;
        let zip_path = self.dir.join(format!("log_{stamp}.zip"));

        let mut writer = zip::ZipWriter::new(File::create(&zip_path)?);
        writer.start_file(
            format!("{stamp}.log"),
            FileOptions::default().compression_method(CompressionMethod::Deflated),
        )?;
        io::copy(&mut File::open(&latest)?, &mut writer)?;
        writer.finish()?;

        let _ = fs::remove_file(&latest);
        Ok(Some(zip_path))
    }
}

/// 持有日志写线程的 guard；drop 时刷新并（按配置）打包日志。
pub struct LogSystem {
    shutdown: Arc<Shutdown>,
}

impl LogSystem {
    pub fn init_with_base(options: LogOptions, base_dir: Option<&Path>) -> Result<Self, LogError> {
        let files = LogFiles::new(base_dir);
        fs::create_dir_all(&files.dir)?;
        files.rotate_if_large()?;

        let (file_writer, guard) = NonBlockingBuilder::default()
            .lossy(false)
            .finish(rolling::never(&files.dir, LATEST_LOG));

        let console_writer = if options.console {
            BoxMakeWriter::new(io::stderr)
        } else {
            BoxMakeWriter::new(io::sink)
        };
        let console_level = if options.debug {
            LevelFilter::DEBUG
        } else {
            LevelFilter::INFO
        };

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_ansi(options.use_color)
                    .with_writer(console_writer)
                    .with_filter(console_level),
            )
            .with(
                fmt::layer()
                    .with_ansi(false)
                    .with_writer(file_writer)
                    .with_filter(LevelFilter::DEBUG),
            )
            .try_init()
            .map_err(|e| {
                if e.to_string().contains("already") {
                    LogError::AlreadyInitialized
                } else {
                    LogError::SubscriberInit(e)
                }
            })?;

        let shutdown = Arc::new(Shutdown::new(files, guard, options.archive_on_exit));
        shutdown.install_ctrlc();
        shutdown.install_panic_hook();
        Ok(Self { shutdown })
    }
}

impl Drop for LogSystem {
    fn drop(&mut self) {
        self.shutdown.finish();
    }
}

struct Shutdown {
    files: LogFiles,
    guard: Mutex<Option<WorkerGuard>>,
    done: AtomicBool,
    archive_on_exit: bool,
}

impl Shutdown {
    fn new(files: LogFiles, guard: WorkerGuard, archive_on_exit: bool) -> Self {
        Self {
            files,
            guard: Mutex::new(Some(guard)),
            done: AtomicBool::new(false),
            archive_on_exit,
        }
    }

    fn install_ctrlc(self: &Arc<Self>) {
        let shutdown = Arc::clone(self);
        let installed = ctrlc::set_handler(move || {
            // 进行中的相册/条目没有 sidecar，下次运行从这里继续
            warn!(target: "shutdown", "收到中断信号");
            shutdown.flush();
            eprintln!("Interrupted");
            process::exit(INTERRUPTED_EXIT_CODE);
        });
        if let Err(err) = installed {
            warn!("无法注册 Ctrl+C 处理: {err}");
        }
    }

    fn install_panic_hook(self: &Arc<Self>) {
        let shutdown = Arc::clone(self);
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            match info.location() {
                Some(at) => error!("panic at {}:{}: {info}", at.file(), at.line()),
                None => error!("panic: {info}"),
            }
            shutdown.finish();
            previous(info);
        }));
    }

    /// 只刷新日志写线程，不等待、不打包。返回是否是第一次收尾。
    fn flush(&self) -> bool {
        if self.done.swap(true, Ordering::SeqCst) {
            return false;
        }
        if let Ok(mut guard) = self.guard.lock() {
            // drop guard 会阻塞到缓冲日志全部写入
            guard.take();
        }
        true
    }

    /// 正常退出：刷新后打包 `latest.log`。
    fn finish(&self) {
        if self.flush()
            && self.archive_on_exit
            && let Err(err) = self.files.archive()
        {
            eprintln!("failed to archive log: {err}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn files_in(dir: &Path) -> LogFiles {
        LogFiles {
            dir: dir.to_path_buf(),
        }
    }

    fn zips_in(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter(|e| {
                e.as_ref()
                    .unwrap()
                    .path()
                    .extension()
                    .is_some_and(|ext| ext == "zip")
            })
            .count()
    }

    fn shutdown_in(dir: &Path) -> Shutdown {
        let (_writer, guard) = NonBlockingBuilder::default().finish(io::sink());
        Shutdown::new(files_in(dir), guard, true)
    }

    #[test]
    fn archives_non_empty_log_into_zip() {
        let dir = tempfile::tempdir().unwrap();
        let files = files_in(dir.path());
        fs::write(files.latest(), "line one\nline two\n").unwrap();

        let archive = files.archive().unwrap().unwrap();
        assert!(!files.latest().exists());

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 1);
        let mut content = String::new();
        zip.by_index(0).unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "line one\nline two\n");
    }

    #[test]
    fn empty_or_missing_log_produces_no_archive() {
        let dir = tempfile::tempdir().unwrap();
        let files = files_in(dir.path());
        assert!(files.archive().unwrap().is_none());

        File::create(files.latest()).unwrap();
        assert!(files.archive().unwrap().is_none());
        assert!(!files.latest().exists());
    }

    #[test]
    fn small_log_is_not_rotated() {
        let dir = tempfile::tempdir().unwrap();
        let files = files_in(dir.path());
        fs::write(files.latest(), "short").unwrap();

        files.rotate_if_large().unwrap();
        assert!(files.latest().exists());
        assert_eq!(zips_in(dir.path()), 0);
    }

    #[test]
    fn interrupt_flush_leaves_log_unarchived() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = shutdown_in(dir.path());
        fs::write(shutdown.files.latest(), "before ctrl-c\n").unwrap();

        assert!(shutdown.flush());
        assert!(shutdown.guard.lock().unwrap().is_none());
        assert!(shutdown.files.latest().exists());
        assert_eq!(zips_in(dir.path()), 0);

        // 之后的正常收尾不再重复执行
        shutdown.finish();
        assert!(shutdown.files.latest().exists());
    }

    #[test]
    fn clean_finish_archives_log() {
        let dir = tempfile::tempdir().unwrap();
        let shutdown = shutdown_in(dir.path());
        fs::write(shutdown.files.latest(), "done\n").unwrap();

        shutdown.finish();
        assert!(!shutdown.files.latest().exists());
        assert_eq!(zips_in(dir.path()), 1);
    }
}

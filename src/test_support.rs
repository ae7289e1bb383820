use malboxes::context::AppContext;
use std::path::{Path, PathBuf};
use std::sync::{LazyLock, Mutex, MutexGuard};
use tempfile::TempDir;

static CWD_LOCK: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));

pub(crate) struct DirGuard {
    original: PathBuf,
    _lock: MutexGuard<'static, ()>,
}

impl DirGuard {
    pub(crate) fn new(new_dir: &Path) -> Self {
        // Changing the process current working directory is global and not thread-safe.
        // Lock it so tests don't race even if a #[serial] annotation is missed.
        let lock = CWD_LOCK.lock().unwrap_or_else(|poison| poison.into_inner());
        let original = std::env::current_dir().unwrap();
        std::env::set_current_dir(new_dir).unwrap();
        Self {
            original,
            _lock: lock,
        }
    }
}

impl Drop for DirGuard {
    fn drop(&mut self) {
        let _ = std::env::set_current_dir(&self.original);
    }
}

/// A scratch configuration directory with its layout created.
pub(crate) fn create_test_context() -> (TempDir, AppContext) {
    let temp_dir = TempDir::new().unwrap();
    let ctx = AppContext::from_root(temp_dir.path().join("config"));
    ctx.ensure_layout().unwrap();
    (temp_dir, ctx)
}

/// Write `content` as the context's `config.js`.
pub(crate) fn write_config(ctx: &AppContext, content: &str) {
    std::fs::write(ctx.config_path(), content).unwrap();
}

use std::path::{Path, PathBuf};

use tdo::storage::Storage;
use tempfile::TempDir;

/// A throwaway data directory for one test.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("failed to create tempdir");
        Self { dir }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn storage(&self) -> Storage {
        Storage::new(self.dir.path().to_path_buf())
    }

    pub fn state_file(&self) -> PathBuf {
        self.storage().state_file()
    }

    pub fn write_config(&self, contents: &str) -> PathBuf {
        let path = self.storage().config_file();
        std::fs::create_dir_all(path.parent().unwrap()).expect("data dir");
        std::fs::write(&path, contents).expect("write config");
        path
    }
}

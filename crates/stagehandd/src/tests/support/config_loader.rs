//! Test configuration loaders for success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use camino::Utf8PathBuf;
use ortho_config::{OrthoConfig, OrthoError};
use tempfile::TempDir;

use stagehand_config::{Config, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader serving on an ephemeral TCP port with a temporary asset store.
pub struct TestConfigLoader {
    store_dir: TempDir,
}

impl TestConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            store_dir: TempDir::new().expect("failed to create temporary store directory"),
        }
    }

    /// Root of the temporary asset store.
    pub fn store_root(&self) -> Utf8PathBuf {
        Utf8PathBuf::from_path_buf(self.store_dir.path().join("Assets"))
            .expect("temporary store path was not valid UTF-8")
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(Config {
            daemon_socket: SocketEndpoint::tcp("127.0.0.1", 0),
            store_root: self.store_root(),
            ..Config::default()
        })
    }
}

/// Loader that intentionally fails by passing invalid CLI arguments.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        let args = vec![
            OsString::from("stagehandd"),
            OsString::from("--daemon-socket"),
            OsString::from("invalid://socket"),
        ];
        Config::load_from_iter(args)
    }
}

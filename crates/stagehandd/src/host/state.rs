//! State owned by the host executor thread.

use std::env;

use camino::{Utf8Path, Utf8PathBuf};
use stagehand_config::CommitPolicy;
use stagehand_graph::{AssetEditor, AssetStore, ComponentCatalog, EnumType};

/// Platforms the daemon can report.
pub static PLATFORM: EnumType = EnumType::new("Platform", &["Linux", "MacOS", "Windows", "Other"]);

/// Static facts about the project being served.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectInfo {
    data_path: Utf8PathBuf,
    project_root: Utf8PathBuf,
    platform: &'static str,
    version: String,
}

impl ProjectInfo {
    /// Builds project information from explicit parts.
    pub fn new(
        data_path: impl Into<Utf8PathBuf>,
        project_root: impl Into<Utf8PathBuf>,
        platform: &'static str,
        version: impl Into<String>,
    ) -> Self {
        Self {
            data_path: data_path.into(),
            project_root: project_root.into(),
            platform,
            version: version.into(),
        }
    }

    /// Derives project information for an asset store rooted at `store_root`.
    ///
    /// Relative roots are anchored at the working directory when it is valid
    /// UTF-8; the project root is the parent of the data path.
    #[must_use]
    pub fn detect(store_root: &Utf8Path) -> Self {
        let data_path = if store_root.is_absolute() {
            store_root.to_path_buf()
        } else {
            env::current_dir()
                .ok()
                .and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok())
                .map_or_else(|| store_root.to_path_buf(), |dir| dir.join(store_root))
        };
        let project_root = data_path
            .parent()
            .map_or_else(|| data_path.clone(), Utf8Path::to_path_buf);
        Self {
            data_path,
            project_root,
            platform: current_platform(),
            version: String::from(env!("CARGO_PKG_VERSION")),
        }
    }

    /// Directory holding the asset store.
    #[must_use]
    pub fn data_path(&self) -> &Utf8Path {
        &self.data_path
    }

    /// Directory containing the data path.
    #[must_use]
    pub fn project_root(&self) -> &Utf8Path {
        &self.project_root
    }

    /// Member of [`PLATFORM`] describing the running system.
    #[must_use]
    pub fn platform(&self) -> &'static str {
        self.platform
    }

    /// Daemon version.
    #[must_use]
    pub fn version(&self) -> &str {
        &self.version
    }
}

fn current_platform() -> &'static str {
    match env::consts::OS {
        "linux" => "Linux",
        "macos" => "MacOS",
        "windows" => "Windows",
        _ => "Other",
    }
}

/// Everything host-bound commands may touch. Only the host thread holds it.
pub struct HostState {
    store: Box<dyn AssetStore>,
    catalog: ComponentCatalog,
    project: ProjectInfo,
    policy: CommitPolicy,
}

impl HostState {
    /// Assembles host state.
    pub fn new(
        store: Box<dyn AssetStore>,
        catalog: ComponentCatalog,
        project: ProjectInfo,
        policy: CommitPolicy,
    ) -> Self {
        Self {
            store,
            catalog,
            project,
            policy,
        }
    }

    /// The persisted asset store.
    #[must_use]
    pub fn store(&self) -> &dyn AssetStore {
        self.store.as_ref()
    }

    /// Component types known to the host.
    #[must_use]
    pub fn catalog(&self) -> &ComponentCatalog {
        &self.catalog
    }

    /// Project facts.
    #[must_use]
    pub fn project(&self) -> &ProjectInfo {
        &self.project
    }

    /// Editor applying scoped asset mutations under the configured policy.
    #[must_use]
    pub fn editor(&self) -> AssetEditor<'_> {
        AssetEditor::new(self.store.as_ref(), &self.catalog, self.policy)
    }
}

impl std::fmt::Debug for HostState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HostState")
            .field("project", &self.project)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

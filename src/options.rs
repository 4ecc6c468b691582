//! Packaging options.

use std::path::PathBuf;

/// How the generated page reacts when a test definition fails to load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TestLoadFailure {
    /// Leave the test section empty
    #[default]
    Silent,
    /// Render an error message into the test section
    Visible,
}

/// Where the working tree of a conversion lives.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ScratchMode {
    /// In-memory tree, no filesystem access
    #[default]
    Memory,
    /// Scratch directory on disk, under `base` or the system temp directory
    Disk {
        /// Parent directory for scratch directories
        base: Option<PathBuf>,
    },
}

/// Options for building a SCORM package.
#[derive(Debug, Clone)]
pub struct PackageOptions {
    /// `<title>` of the wrapper page
    pub page_title: String,

    /// Top-level heading of the wrapper page
    pub heading: String,

    /// Manifest `identifier` attribute
    pub manifest_identifier: String,

    /// Title of the manifest organization
    pub organization_title: String,

    /// Title of the single manifest item
    pub item_title: String,

    /// Behavior of the wrapper page when test JSON cannot be loaded
    pub test_load_failure: TestLoadFailure,

    /// Working tree backend
    pub scratch: ScratchMode,
}

impl Default for PackageOptions {
    fn default() -> Self {
        Self {
            page_title: "ICF Unified SCORM".to_string(),
            heading: "Interactive Course".to_string(),
            manifest_identifier: "ICFtoSCORM".to_string(),
            organization_title: "Unified ICF Course".to_string(),
            item_title: "ICF Full Course".to_string(),
            test_load_failure: TestLoadFailure::Silent,
            scratch: ScratchMode::Memory,
        }
    }
}

impl PackageOptions {
    /// Create new package options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the wrapper page title.
    pub fn with_page_title(mut self, title: impl Into<String>) -> Self {
        self.page_title = title.into();
        self
    }

    /// Set the wrapper page heading.
    pub fn with_heading(mut self, heading: impl Into<String>) -> Self {
        self.heading = heading.into();
        self
    }

    /// Set the manifest identifier.
    pub fn with_manifest_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.manifest_identifier = identifier.into();
        self
    }

    /// Set the organization title.
    pub fn with_organization_title(mut self, title: impl Into<String>) -> Self {
        self.organization_title = title.into();
        self
    }

    /// Set the item title.
    pub fn with_item_title(mut self, title: impl Into<String>) -> Self {
        self.item_title = title.into();
        self
    }

    /// Set test load failure behavior.
    pub fn with_test_load_failure(mut self, mode: TestLoadFailure) -> Self {
        self.test_load_failure = mode;
        self
    }

    /// Stage the conversion in a scratch directory on disk.
    pub fn with_disk_scratch(mut self, base: Option<PathBuf>) -> Self {
        self.scratch = ScratchMode::Disk { base };
        self
    }

    /// Stage the conversion in memory.
    pub fn with_memory_scratch(mut self) -> Self {
        self.scratch = ScratchMode::Memory;
        self
    }
}

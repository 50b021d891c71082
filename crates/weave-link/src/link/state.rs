//! Destination states and placeholder contents

use camino::Utf8Path;
use std::io;
use weave_core::error::WeaveError;

use crate::LinkOpResult;

/// Marker file identifying a staged placeholder directory
pub const PLACEHOLDER_MARKER: &str = "weave-stub";

/// What currently occupies a linked dependency's destination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestinationState {
    /// Nothing at the path
    Absent,
    /// A symbolic link, dangling or not
    Symlink,
    /// A directory carrying the placeholder marker
    Placeholder,
    /// Anything else: copied content or a module npm installed itself
    Real,
}

impl DestinationState {
    /// Inspect `dest` without following a symbolic link at that path
    pub fn inspect(dest: &Utf8Path) -> LinkOpResult<Self> {
        let metadata = match dest.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::Absent),
            Err(e) => return Err(WeaveError::io(format!("Failed to inspect {}", dest), e)),
        };

        if metadata.file_type().is_symlink() {
            Ok(Self::Symlink)
        } else if metadata.is_dir() && dest.join(PLACEHOLDER_MARKER).is_file() {
            Ok(Self::Placeholder)
        } else {
            Ok(Self::Real)
        }
    }
}

/// Manifest written into a placeholder so npm accepts it as installed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestStub {
    /// `{}`
    Empty,
    /// Byte copy of the linked module's real package.json
    Copy,
}

impl ManifestStub {
    /// npm 3 and later accept an empty manifest; older majors need the real one
    pub fn for_npm_major(major: u32) -> Self {
        if major >= 3 {
            Self::Empty
        } else {
            Self::Copy
        }
    }
}

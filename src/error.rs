//! Crate-level error types.

use std::fmt;
use std::path::PathBuf;

/// Errors produced by the glview crate.
#[derive(Debug)]
pub enum GlviewError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to read a shader or settings file.
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// TOML settings parsing/serialization failure.
    SettingsParse(String),
    /// A configured loader name has no known implementation.
    UnknownLoader {
        /// Loader name as written in the settings.
        name: String,
        /// Settings key the name was read from.
        setting: &'static str,
    },
    /// No configured loader handles the requested resource kind.
    NoLoader {
        /// Resource kind that failed to resolve.
        kind: String,
        /// Settings key holding the configured loaders.
        setting: &'static str,
    },
    /// A resource file was not found in any search directory.
    NotFound(PathBuf),
    /// Malformed shader source.
    ShaderSource {
        /// Name of the offending shader (usually its path).
        name: String,
        /// What is wrong with it.
        message: String,
    },
    /// `#include` nesting exceeded the allowed depth.
    IncludeDepth {
        /// Shader whose includes recursed too deeply.
        name: String,
        /// Depth at which expansion was aborted.
        depth: usize,
    },
    /// A program description cannot be loaded by its loader.
    ProgramLoad {
        /// Label of the program description.
        label: String,
        /// Reason the load failed.
        message: String,
    },
}

impl fmt::Display for GlviewError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Read { path, source } => {
                write!(f, "failed to read '{}': {source}", path.display())
            }
            Self::SettingsParse(msg) => {
                write!(f, "settings parse error: {msg}")
            }
            Self::UnknownLoader { name, setting } => {
                write!(f, "unknown loader '{name}' in {setting}")
            }
            Self::NoLoader { kind, setting } => {
                write!(f, "no loader in {setting} handles kind '{kind}'")
            }
            Self::NotFound(path) => write!(
                f,
                "cannot find '{}' in any search directory",
                path.display()
            ),
            Self::ShaderSource { name, message } => {
                write!(f, "shader '{name}': {message}")
            }
            Self::IncludeDepth { name, depth } => {
                write!(f, "shader '{name}': include depth exceeded ({depth})")
            }
            Self::ProgramLoad { label, message } => {
                write!(f, "program '{label}': {message}")
            }
        }
    }
}

impl std::error::Error for GlviewError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) | Self::Read { source: e, .. } => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GlviewError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

use std::path::PathBuf;

use thiserror::Error;

use crate::config::ConfigError;
use crate::diagnostic::Diagnostic;
use crate::tree::NodeId;

/// Failures of tree primitives, passes and the pass driver.
///
/// Each one is a violated precondition or a non-terminating rewrite; none
/// is transient, so callers never retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RewriteError {
    #[error("{node:?} is neither a compilation unit nor attached to a parent")]
    InvalidRoot { node: NodeId },

    #[error("{node:?} is not attached to a parent and cannot be replaced")]
    DetachedNode { node: NodeId },

    #[error("{node:?} is the tree root; use `set_root` to replace it")]
    RootReplacement { node: NodeId },

    #[error("{node:?} is already attached; only floating nodes can be adopted")]
    AttachedNode { node: NodeId },

    #[error("attaching {node:?} would make it its own ancestor")]
    WouldCycle { node: NodeId },

    #[error("{node:?} refers to a freed node")]
    StaleNode { node: NodeId },

    #[error("{node:?}: expected {expected}")]
    MalformedNode { node: NodeId, expected: &'static str },

    #[error("passes did not reach a fixed point within {max_sweeps} sweeps")]
    NoFixpoint { max_sweeps: usize },
}

/// Crate-level error returned by the library API.
#[derive(Debug, Error)]
pub enum Error {
    #[error("{path}: {} parse error(s)", diagnostics.len())]
    Parse {
        path: String,
        source_text: String,
        diagnostics: Vec<Diagnostic>,
    },

    #[error(transparent)]
    Rewrite(#[from] RewriteError),

    #[error("{}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }

    /// Print parse diagnostics with source snippets; other errors have
    /// nothing to render.
    pub fn render(&self) {
        if let Error::Parse {
            path,
            source_text,
            diagnostics,
        } = self
        {
            crate::diagnostic::render_diagnostics(diagnostics, path, source_text);
        }
    }
}

//! Tree rewriting passes.
//!
//! A pass folds the subtree under a node in place and reports whether it
//! changed anything; the driver reruns passes until none does.

mod block_folding;
mod constant_propagation;
pub mod eval;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::tree::{NodeId, NodeKind, Tree};

pub use block_folding::BlockFolding;
pub use constant_propagation::ConstantPropagation;

pub trait Pass {
    fn name(&self) -> &'static str;

    /// Rewrite the subtree at `node`. Returns true if anything changed.
    ///
    /// `node` must be a compilation unit or attached to a parent; anything
    /// else fails with `InvalidRoot` and leaves the tree untouched.
    fn fold(&mut self, tree: &mut Tree, node: NodeId) -> Result<bool, RewriteError>;
}

/// Reject fold roots that are stale, or floating without being a
/// compilation unit.
pub(crate) fn check_fold_root(tree: &Tree, node: NodeId) -> Result<(), RewriteError> {
    let Some(n) = tree.get(node) else {
        return Err(RewriteError::StaleNode { node });
    };
    if n.parent().is_none() && n.kind != NodeKind::CompilationUnit {
        return Err(RewriteError::InvalidRoot { node });
    }
    Ok(())
}

/// The passes that can be named in configuration and on the command line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum PassKind {
    BlockFolding,
    ConstantPropagation,
}

impl PassKind {
    pub const ALL: [PassKind; 2] = [PassKind::BlockFolding, PassKind::ConstantPropagation];

    pub fn name(self) -> &'static str {
        match self {
            PassKind::BlockFolding => "block-folding",
            PassKind::ConstantPropagation => "constant-propagation",
        }
    }

    pub fn build(self) -> Box<dyn Pass + Send> {
        match self {
            PassKind::BlockFolding => Box::new(BlockFolding),
            PassKind::ConstantPropagation => Box::new(ConstantPropagation),
        }
    }
}

impl fmt::Display for PassKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PassKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PassKind::ALL
            .into_iter()
            .find(|p| p.name() == s)
            .ok_or_else(|| format!("unknown pass '{}'", s))
    }
}

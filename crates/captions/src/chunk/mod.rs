//! Time-window chunking of caption fragments.
//!
//! Fragments are grouped into fixed-width windows `[0, w)`, `[w, 2w)`, ...
//! and each non-empty window becomes one chunk of text with the window's
//! start time. Chunk metadata is assembled separately in [`metadata`].

pub mod metadata;
mod partition;

pub use partition::{ChunkAccumulator, ChunkPartitioner};

use serde::{Deserialize, Serialize};

/// A merged run of consecutive caption fragments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimedChunk {
    /// Fragment texts, trimmed and joined by single spaces
    pub text: String,

    /// Start of the chunk's window, in whole seconds
    pub start_seconds: u64,
}

//! Fixed-width time partitioning.

use super::TimedChunk;
use std::borrow::Borrow;
use tubecap_core::{AppError, AppResult};
use tubecap_youtube::CaptionFragment;

/// Splits caption fragments into fixed-width time windows.
///
/// The partitioner holds only the width; every call starts from a fresh
/// [`ChunkAccumulator`], so repeated runs over the same input are identical.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkPartitioner {
    width_seconds: u64,
}

impl ChunkPartitioner {
    /// Create a partitioner for windows of `width_seconds`.
    ///
    /// # Errors
    /// `AppError::Config` when the width is zero.
    pub fn new(width_seconds: u32) -> AppResult<Self> {
        if width_seconds == 0 {
            return Err(AppError::Config(
                "chunkSeconds must be a positive number of seconds".to_string(),
            ));
        }

        Ok(Self {
            width_seconds: u64::from(width_seconds),
        })
    }

    pub fn width_seconds(&self) -> u64 {
        self.width_seconds
    }

    /// Start an incremental partition, for fragments that arrive one by one.
    pub fn accumulator(&self) -> ChunkAccumulator {
        ChunkAccumulator::new(self.width_seconds)
    }

    /// Partition an ordered sequence of fragments.
    ///
    /// Accepts anything iterable, materialized or lazy.
    pub fn partition<I>(&self, fragments: I) -> Vec<TimedChunk>
    where
        I: IntoIterator,
        I::Item: Borrow<CaptionFragment>,
    {
        let mut accumulator = self.accumulator();
        let mut chunks = Vec::new();

        for fragment in fragments {
            if let Some(chunk) = accumulator.push(fragment.borrow()) {
                chunks.push(chunk);
            }
        }

        // handle fragments left over from the last window
        chunks.extend(accumulator.finish());

        tracing::debug!(
            "Partitioned captions into {} chunks of {}s",
            chunks.len(),
            self.width_seconds
        );

        chunks
    }
}

/// Running state of one partition.
///
/// A fragment that ends past the current window boundary closes the window
/// (if it holds anything) and moves the boundary forward by exactly one width;
/// the fragment itself always joins the newly opened window.
#[derive(Debug, Clone)]
pub struct ChunkAccumulator {
    width: u64,
    limit: u64,
    chunk_start: u64,
    texts: Vec<String>,
}

impl ChunkAccumulator {
    fn new(width: u64) -> Self {
        Self {
            width,
            limit: width,
            chunk_start: 0,
            texts: Vec::new(),
        }
    }

    /// Add the next fragment, returning a chunk if a window was closed.
    pub fn push(&mut self, fragment: &CaptionFragment) -> Option<TimedChunk> {
        let mut closed = None;

        if fragment.end_seconds() > self.limit as f64 {
            closed = self.take_chunk();
            self.chunk_start = self.limit;
            self.limit += self.width;
        }

        self.texts.push(fragment.text.trim_matches(' ').to_string());

        closed
    }

    /// Close the last window.
    pub fn finish(mut self) -> Option<TimedChunk> {
        self.take_chunk()
    }

    fn take_chunk(&mut self) -> Option<TimedChunk> {
        if self.texts.is_empty() {
            return None;
        }

        let texts = std::mem::take(&mut self.texts);
        Some(TimedChunk {
            text: texts.join(" "),
            start_seconds: self.chunk_start,
        })
    }
}

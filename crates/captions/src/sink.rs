//! Caption documents and where they go.

use serde::{Deserialize, Serialize};
use std::io::Write;
use tubecap_core::AppResult;
use tubecap_youtube::{MetadataValue, VideoMetadata};

use crate::chunk::metadata::{KEY_SOURCE, KEY_START_SECONDS};

/// One chunk of captions, ready for indexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionDocument {
    /// Chunk text
    pub page_content: String,

    /// Source URL, timestamps, track and video metadata
    pub metadata: VideoMetadata,
}

impl CaptionDocument {
    pub fn new(page_content: String, metadata: VideoMetadata) -> Self {
        Self {
            page_content,
            metadata,
        }
    }

    /// Start of the chunk, in seconds.
    pub fn start_seconds(&self) -> Option<u64> {
        match self.metadata.get(KEY_START_SECONDS)? {
            MetadataValue::Integer(n) => u64::try_from(*n).ok(),
            MetadataValue::Text(_) => None,
        }
    }

    /// Link to the chunk's position in the video.
    pub fn source(&self) -> Option<&str> {
        match self.metadata.get(KEY_SOURCE)? {
            MetadataValue::Text(s) => Some(s),
            MetadataValue::Integer(_) => None,
        }
    }
}

/// Receiver of caption documents, in chunk order.
pub trait DocumentSink {
    fn accept(&mut self, document: CaptionDocument) -> AppResult<()>;
}

impl DocumentSink for Vec<CaptionDocument> {
    fn accept(&mut self, document: CaptionDocument) -> AppResult<()> {
        self.push(document);
        Ok(())
    }
}

/// Writes each document as one line of JSON.
pub struct JsonLinesSink<W: Write> {
    writer: W,
    written: usize,
}

impl<W: Write> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer, written: 0 }
    }

    /// Number of documents written so far.
    pub fn written(&self) -> usize {
        self.written
    }

    /// Flush and hand back the writer.
    pub fn into_inner(mut self) -> AppResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

impl<W: Write> DocumentSink for JsonLinesSink<W> {
    fn accept(&mut self, document: CaptionDocument) -> AppResult<()> {
        serde_json::to_writer(&mut self.writer, &document)?;
        self.writer.write_all(b"\n")?;
        self.written += 1;
        Ok(())
    }
}

//! Output sinks for the document stream.
//!
//! Documents are appended one at a time in the order they are finalized;
//! nothing buffers the whole corpus. The sink must tolerate emission from
//! concurrent response handlers, so writers sit behind a mutex.

use std::io::Write;
use std::sync::Mutex;

use websift_shared::{Document, Result, WebsiftError};

/// Append-only consumer of finalized documents.
pub trait DocumentSink: Send + Sync {
    /// Write one document in its wire form.
    fn emit(&self, document: &Document) -> Result<()>;
}

/// A sink over any `Write` target (stdout, a file, a buffer in tests).
pub struct WriterSink<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> WriterSink<W> {
    /// Wrap a writer.
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }
}

impl<W: Write + Send> DocumentSink for WriterSink<W> {
    fn emit(&self, document: &Document) -> Result<()> {
        let mut writer = self.writer.lock().expect("sink writer poisoned");
        writer
            .write_all(document.render().as_bytes())
            .map_err(|e| WebsiftError::Sink(e.to_string()))?;
        // Flush per document so the stream is observable while the crawl runs.
        writer.flush().map_err(|e| WebsiftError::Sink(e.to_string()))
    }
}

/// In-memory sink, used by tests and available for embedding.
pub type MemorySink = WriterSink<Vec<u8>>;

impl MemorySink {
    /// Everything emitted so far, as UTF-8 text.
    pub fn contents(&self) -> String {
        let buffer = self.writer.lock().expect("sink writer poisoned");
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

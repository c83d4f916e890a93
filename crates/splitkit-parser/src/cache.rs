//! Raw split file handle with its per-mode parse memo.
//!
//! The cache lives and dies with the [`SplitFile`] that owns it: there is no
//! expiry and nothing is shared between handles. Mutation goes through
//! `&mut SplitFile`, so callers sharing one handle across threads have to
//! serialize access themselves.

use std::io::Read;
use std::path::Path;
use std::sync::Arc;

use bytes::Bytes;
use splitkit_core::{ParseMode, ProgramId};

use crate::types::RunResult;

/// Memoized parse results, one slot per [`ParseMode`].
///
/// Only successful parses are stored; a miss is never cached.
#[derive(Debug, Clone, Default)]
pub struct ParseCache {
    fast: Option<Arc<RunResult>>,
    full: Option<Arc<RunResult>>,
    convert: Option<Arc<RunResult>>,
}

impl ParseCache {
    pub fn get(&self, mode: ParseMode) -> Option<Arc<RunResult>> {
        self.slot(mode).clone()
    }

    pub fn store(&mut self, mode: ParseMode, result: Arc<RunResult>) {
        *self.slot_mut(mode) = Some(result);
    }

    pub fn is_cached(&self, mode: ParseMode) -> bool {
        self.slot(mode).is_some()
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    fn slot(&self, mode: ParseMode) -> &Option<Arc<RunResult>> {
        match mode {
            ParseMode::Fast => &self.fast,
            ParseMode::Full => &self.full,
            ParseMode::Convert => &self.convert,
        }
    }

    fn slot_mut(&mut self, mode: ParseMode) -> &mut Option<Arc<RunResult>> {
        match mode {
            ParseMode::Fast => &mut self.fast,
            ParseMode::Full => &mut self.full,
            ParseMode::Convert => &mut self.convert,
        }
    }
}

/// An immutable raw split file plus its parse cache.
#[derive(Debug, Clone)]
pub struct SplitFile {
    bytes: Bytes,
    digest: Option<String>,
    cache: ParseCache,
}

impl SplitFile {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            digest: None,
            cache: ParseCache::default(),
        }
    }

    /// Read a whole byte source into a new handle.
    ///
    /// I/O failures are faults and propagate unchanged.
    pub fn from_reader<R: Read>(mut reader: R) -> splitkit_core::Result<Self> {
        let mut buffer = Vec::new();
        reader.read_to_end(&mut buffer)?;
        Ok(Self::new(buffer))
    }

    /// Read a file from disk, refusing anything larger than `max_size` bytes.
    pub fn open(path: &Path, max_size: u64) -> splitkit_core::Result<Self> {
        let file = std::fs::File::open(path)?;
        let size = file.metadata()?.len();
        if size > max_size {
            return Err(splitkit_core::Error::TooLarge {
                size,
                limit: max_size,
            });
        }
        Self::from_reader(file)
    }

    /// Attach the identity a storage collaborator assigned to these bytes.
    pub fn with_digest(mut self, digest: impl Into<String>) -> Self {
        self.digest = Some(digest.into());
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn digest(&self) -> Option<&str> {
        self.digest.as_deref()
    }

    pub fn cache(&self) -> &ParseCache {
        &self.cache
    }

    pub(crate) fn cache_mut(&mut self) -> &mut ParseCache {
        &mut self.cache
    }

    /// Filename for exporting this run as `program`, e.g. `abc.lss`.
    pub fn filename(stem: &str, program: ProgramId) -> String {
        format!("{stem}.{}", program.file_extension())
    }
}

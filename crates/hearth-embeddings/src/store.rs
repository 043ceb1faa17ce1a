//! Embedding store: batch rebuild and file-pair persistence.
//!
//! Artifacts are a matched pair that is only ever replaced wholesale:
//!
//! - `vectors.bin` — magic, row/dim header, row-major little-endian f32s
//! - `documents.json` — the aligned document list
//!
//! Both files are written to temp names and renamed into place, and load
//! refuses any pair whose cardinalities disagree, so a reader can never
//! observe a half-built or mismatched index.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use hearth_core::Document;
use tracing::{info, warn};

use crate::errors::{IndexError, Result};
use crate::index::IndexSnapshot;
use crate::provider::EmbeddingProvider;

/// File-format magic for the vectors artifact.
const MAGIC: &[u8; 8] = b"HEARTHV1";

/// Header size: magic + u32 rows + u32 dim.
const HEADER_LEN: usize = 16;

/// Convert an f32 slice to little-endian bytes for storage.
pub fn f32s_to_bytes(v: &[f32]) -> Vec<u8> {
    v.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Convert little-endian bytes back to an f32 vector.
pub fn bytes_to_f32s(bytes: &[u8]) -> Vec<f32> {
    bytes
        .chunks_exact(4)
        .map(|chunk| f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
        .collect()
}

/// Owns the persisted matrix/document pair for one index.
pub struct EmbeddingStore {
    dir: PathBuf,
}

impl EmbeddingStore {
    /// Create a store rooted at `dir` (created on first rebuild).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the matrix artifact.
    pub fn vectors_path(&self) -> PathBuf {
        self.dir.join("vectors.bin")
    }

    /// Path of the document list artifact.
    pub fn documents_path(&self) -> PathBuf {
        self.dir.join("documents.json")
    }

    /// Embed all documents and replace the persisted pair.
    ///
    /// Documents are embedded in `batch_size` chunks, concatenated in input
    /// order. Any batch failure fails the whole rebuild — nothing is
    /// persisted on error, so the previous pair (if any) stays intact.
    pub async fn rebuild(
        &self,
        documents: Vec<Document>,
        provider: &dyn EmbeddingProvider,
        batch_size: usize,
    ) -> Result<Arc<IndexSnapshot>> {
        if documents.is_empty() {
            return Err(IndexError::Empty);
        }
        let batch_size = batch_size.max(1);

        let mut matrix: Vec<f32> = Vec::new();
        let mut dim = 0usize;

        let texts: Vec<String> = documents.iter().map(|d| d.content.clone()).collect();
        for (batch_index, batch) in texts.chunks(batch_size).enumerate() {
            let vectors = provider.embed(batch).await?;
            if vectors.len() != batch.len() {
                return Err(IndexError::Embedding(format!(
                    "provider returned {} vectors for {} inputs",
                    vectors.len(),
                    batch.len()
                )));
            }
            for vector in vectors {
                if dim == 0 {
                    dim = vector.len();
                }
                if vector.len() != dim || dim == 0 {
                    return Err(IndexError::DimensionMismatch {
                        expected: dim,
                        got: vector.len(),
                    });
                }
                matrix.extend(vector);
            }
            info!(
                batch = batch_index + 1,
                embedded = (batch_index * batch_size + batch.len()),
                total = documents.len(),
                "embedded rebuild batch"
            );
        }

        self.persist(&matrix, dim, &documents)?;
        info!(rows = documents.len(), dim, "rebuilt embedding index");
        Ok(Arc::new(IndexSnapshot::new(matrix, dim, documents)?))
    }

    /// Load the persisted pair.
    ///
    /// Any problem — missing file, bad magic, truncated payload, document
    /// count disagreeing with the row count — is reported as
    /// [`IndexError::NotFound`]: the caller's recovery is the same in every
    /// case (rebuild), and the underlying cause is logged here.
    pub fn load(&self) -> Result<Arc<IndexSnapshot>> {
        self.try_load().map_err(|error| {
            warn!(%error, dir = %self.dir.display(), "could not load index artifacts");
            IndexError::NotFound
        })
    }

    fn try_load(&self) -> Result<Arc<IndexSnapshot>> {
        let bytes = std::fs::read(self.vectors_path())?;
        let (rows, dim, payload) = parse_vectors_artifact(&bytes)?;

        let raw = std::fs::read_to_string(self.documents_path())?;
        let documents: Vec<Document> = serde_json::from_str(&raw)?;

        if documents.len() != rows {
            return Err(IndexError::Misaligned {
                rows,
                documents: documents.len(),
            });
        }

        let matrix = bytes_to_f32s(payload);
        Ok(Arc::new(IndexSnapshot::new(matrix, dim, documents)?))
    }

    fn persist(&self, matrix: &[f32], dim: usize, documents: &[Document]) -> Result<()> {
        std::fs::create_dir_all(&self.dir)?;

        let mut vectors = Vec::with_capacity(HEADER_LEN + matrix.len() * 4);
        vectors.extend_from_slice(MAGIC);
        vectors.extend_from_slice(&u32::try_from(documents.len()).unwrap_or(u32::MAX).to_le_bytes());
        vectors.extend_from_slice(&u32::try_from(dim).unwrap_or(u32::MAX).to_le_bytes());
        vectors.extend_from_slice(&f32s_to_bytes(matrix));

        write_replacing(&self.vectors_path(), &vectors)?;
        write_replacing(
            &self.documents_path(),
            serde_json::to_vec_pretty(documents)?.as_slice(),
        )?;
        Ok(())
    }
}

/// Write via a temp file + rename so readers see old or new, never partial.
fn write_replacing(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(&tmp, path)
}

fn parse_vectors_artifact(bytes: &[u8]) -> Result<(usize, usize, &[u8])> {
    if bytes.len() < HEADER_LEN || &bytes[..8] != MAGIC {
        return Err(IndexError::Embedding("bad vectors artifact header".to_string()));
    }
    let rows = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]) as usize;
    let dim = u32::from_le_bytes([bytes[12], bytes[13], bytes[14], bytes[15]]) as usize;
    let payload = &bytes[HEADER_LEN..];
    if payload.len() != rows * dim * 4 {
        return Err(IndexError::Embedding(format!(
            "vectors payload is {} bytes, expected {}",
            payload.len(),
            rows * dim * 4
        )));
    }
    Ok((rows, dim, payload))
}

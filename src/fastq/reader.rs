//! FASTQ reading, with transparent gzip decompression and mate-file
//! synchronization checking.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use flate2::read::MultiGzDecoder;

use crate::error::{DedupError, Result};

use super::record::FastqRecord;

/// Reads FASTQ records from a single file, transparently decompressing
/// gzip input when the path ends in `.gz`.
pub struct Reader {
    lines: Box<dyn BufRead>,
    path: String,
}

impl Reader {
    /// Open a FASTQ file for reading.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let path_string = path_ref.display().to_string();
        let file = File::open(path_ref).map_err(|source| DedupError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let lines: Box<dyn BufRead> = if path_ref.extension().is_some_and(|ext| ext == "gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(file)))
        } else {
            Box::new(BufReader::new(file))
        };

        Ok(Self {
            lines,
            path: path_string,
        })
    }

    /// Wrap an already-open reader (used in tests to avoid touching the
    /// filesystem).
    pub fn from_reader(inner: impl Read + 'static, path: impl Into<String>) -> Self {
        Self {
            lines: Box::new(BufReader::new(inner)),
            path: path.into(),
        }
    }

    fn malformed(&self, message: impl Into<String>) -> DedupError {
        DedupError::MalformedInput(format!("{} ({})", message.into(), self.path))
    }

    /// Read the next record, or `None` at a clean end of file.
    ///
    /// Fails with [`DedupError::MalformedInput`] on a truncated record
    /// (a header with no matching sequence/plus/quality lines) or a
    /// quality string whose length does not match the sequence.
    pub fn read_record(&mut self) -> Result<Option<FastqRecord>> {
        let mut header_line = String::new();
        let bytes_read = self
            .lines
            .read_line(&mut header_line)
            .map_err(|source| DedupError::Io {
                path: self.path.clone().into(),
                source,
            })?;
        if bytes_read == 0 {
            return Ok(None);
        }
        let header_line = header_line.trim_end_matches(['\n', '\r']);
        let Some(header) = header_line.strip_prefix('@') else {
            return Err(self.malformed(format!("expected '@' header, got {:?}", header_line)));
        };

        let mut sequence_line = String::new();
        if self
            .lines
            .read_line(&mut sequence_line)
            .map_err(|source| DedupError::Io {
                path: self.path.clone().into(),
                source,
            })?
            == 0
        {
            return Err(self.malformed("truncated record: missing sequence line"));
        }
        let sequence = sequence_line.trim_end_matches(['\n', '\r']).as_bytes().to_vec();

        let mut separator_line = String::new();
        if self
            .lines
            .read_line(&mut separator_line)
            .map_err(|source| DedupError::Io {
                path: self.path.clone().into(),
                source,
            })?
            == 0
        {
            return Err(self.malformed("truncated record: missing '+' separator line"));
        }
        if !separator_line.starts_with('+') {
            return Err(self.malformed(format!(
                "expected '+' separator, got {:?}",
                separator_line.trim_end()
            )));
        }

        let mut quality_line = String::new();
        if self
            .lines
            .read_line(&mut quality_line)
            .map_err(|source| DedupError::Io {
                path: self.path.clone().into(),
                source,
            })?
            == 0
        {
            return Err(self.malformed("truncated record: missing quality line"));
        }
        let qualities = quality_line.trim_end_matches(['\n', '\r']).as_bytes().to_vec();

        if qualities.len() != sequence.len() {
            return Err(self.malformed(format!(
                "quality string length {} does not match sequence length {}",
                qualities.len(),
                sequence.len()
            )));
        }

        Ok(Some(FastqRecord {
            header: header.as_bytes().to_vec(),
            sequence,
            qualities,
        }))
    }
}

/// Reads a group of mate-synchronized FASTQ files in lockstep, validating
/// that every file produces a record for the same read and fails together.
pub struct MateReader {
    readers: Vec<Reader>,
}

impl MateReader {
    /// Open one [`Reader`] per path, in order.
    pub fn open(paths: &[impl AsRef<Path>]) -> Result<Self> {
        let readers = paths
            .iter()
            .map(Reader::open)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { readers })
    }

    /// Read the next record from every mate file.
    ///
    /// Returns `None` once every file has reached a clean end of file.
    /// Fails with [`DedupError::MalformedInput`] if the files desynchronize:
    /// some reach end of file before others, or their read identifiers
    /// disagree.
    pub fn read_group(&mut self) -> Result<Option<Vec<FastqRecord>>> {
        let mut group = Vec::with_capacity(self.readers.len());
        for reader in &mut self.readers {
            match reader.read_record()? {
                Some(record) => group.push(record),
                None => {
                    if group.is_empty() {
                        return Ok(None);
                    }
                    return Err(DedupError::MalformedInput(
                        "mate files desynchronized: one file ended before the others"
                            .to_string(),
                    ));
                }
            }
        }

        if let Some(first) = group.first() {
            let expected_id = first.read_id().to_vec();
            for record in &group[1..] {
                if record.read_id() != expected_id.as_slice() {
                    return Err(DedupError::MalformedInput(format!(
                        "mate files desynchronized: read ids {:?} and {:?} do not match",
                        String::from_utf8_lossy(&expected_id),
                        String::from_utf8_lossy(record.read_id()),
                    )));
                }
            }
        }

        Ok(Some(group))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn reader_over(contents: &str) -> Reader {
        Reader::from_reader(Cursor::new(contents.as_bytes().to_vec()), "<test>")
    }

    #[test]
    fn reads_a_single_record() {
        let mut reader = reader_over("@read1\nACGT\n+\nIIII\n");
        let record = reader.read_record().unwrap().unwrap();
        assert_eq!(record.header, b"read1");
        assert_eq!(record.sequence, b"ACGT");
        assert_eq!(record.qualities, b"IIII");
        assert!(reader.read_record().unwrap().is_none());
    }

    #[test]
    fn rejects_mismatched_quality_length() {
        let mut reader = reader_over("@read1\nACGT\n+\nIII\n");
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, DedupError::MalformedInput(_)));
    }

    #[test]
    fn rejects_truncated_record() {
        let mut reader = reader_over("@read1\nACGT\n+\n");
        let err = reader.read_record().unwrap_err();
        assert!(matches!(err, DedupError::MalformedInput(_)));
    }

    #[test]
    fn mate_reader_matches_read_ids_ignoring_trailing_mate_tag() {
        let r1 = Reader::from_reader(
            Cursor::new(b"@read1/1 extra\nACGT\n+\nIIII\n".to_vec()),
            "r1",
        );
        let r2 = Reader::from_reader(
            Cursor::new(b"@read1/1 other\nTTTT\n+\nIIII\n".to_vec()),
            "r2",
        );
        let mut mate = MateReader { readers: vec![r1, r2] };
        let group = mate.read_group().unwrap().unwrap();
        assert_eq!(group.len(), 2);
        assert!(mate.read_group().unwrap().is_none());
    }

    #[test]
    fn mate_reader_rejects_desynchronized_ids() {
        let r1 = Reader::from_reader(Cursor::new(b"@readA\nACGT\n+\nIIII\n".to_vec()), "r1");
        let r2 = Reader::from_reader(Cursor::new(b"@readB\nTTTT\n+\nIIII\n".to_vec()), "r2");
        let mut mate = MateReader { readers: vec![r1, r2] };
        let err = mate.read_group().unwrap_err();
        assert!(matches!(err, DedupError::MalformedInput(_)));
    }
}

//! FASTQ writing, with gzip output when the target path ends in `.gz`.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;

use crate::error::{DedupError, Result};

use super::record::FastqRecord;

/// Writes FASTQ records to a single file, gzip-compressing at level 1
/// when the path ends in `.gz`.
pub struct Writer {
    sink: Box<dyn Write>,
    path: std::path::PathBuf,
}

impl Writer {
    /// Create (or truncate) a FASTQ file for writing.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let file = File::create(path_ref).map_err(|source| DedupError::Io {
            path: path_ref.to_path_buf(),
            source,
        })?;

        let sink: Box<dyn Write> = if path_ref.extension().is_some_and(|ext| ext == "gz") {
            Box::new(GzEncoder::new(file, Compression::new(1)))
        } else {
            Box::new(BufWriter::new(file))
        };

        Ok(Self {
            sink,
            path: path_ref.to_path_buf(),
        })
    }

    /// Write a single record in four-line FASTQ format.
    pub fn write_record(&mut self, record: &FastqRecord) -> Result<()> {
        let io_err = |source| DedupError::Io {
            path: self.path.clone(),
            source,
        };
        self.sink.write_all(b"@").map_err(io_err)?;
        self.sink.write_all(&record.header).map_err(io_err)?;
        self.sink.write_all(b"\n").map_err(io_err)?;
        self.sink.write_all(&record.sequence).map_err(io_err)?;
        self.sink.write_all(b"\n+\n").map_err(io_err)?;
        self.sink.write_all(&record.qualities).map_err(io_err)?;
        self.sink.write_all(b"\n").map_err(io_err)?;
        Ok(())
    }

    /// Flush the underlying writer (and gzip trailer, if any).
    pub fn finish(mut self) -> Result<()> {
        self.sink.flush().map_err(|source| DedupError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Clone)]
    struct SharedBuf(Rc<RefCell<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.borrow_mut().write(buf)
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn sample_record() -> FastqRecord {
        FastqRecord {
            header: b"read1".to_vec(),
            sequence: b"ACGT".to_vec(),
            qualities: b"IIII".to_vec(),
        }
    }

    #[test]
    fn writes_plain_four_line_record() {
        let backing = Rc::new(RefCell::new(Vec::new()));
        let mut writer = Writer {
            sink: Box::new(SharedBuf(backing.clone())),
            path: "<test>".into(),
        };
        writer.write_record(&sample_record()).unwrap();
        writer.finish().unwrap();
        assert_eq!(backing.borrow().as_slice(), b"@read1\nACGT\n+\nIIII\n");
    }
}

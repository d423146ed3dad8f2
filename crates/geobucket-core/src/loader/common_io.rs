// crates/geobucket-core/src/loader/common_io.rs
use crate::error::{GeoBucketError, Result};
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

#[cfg(feature = "compact")]
use flate2::{read::GzDecoder, write::GzEncoder, Compression};

/// Opens a file for reading, transparently un-gzipping it when it starts
/// with the gzip magic bytes and `compact` is enabled.
pub fn open_stream(path: &Path) -> Result<Box<dyn Read>> {
    let file = File::open(path).map_err(|e| {
        GeoBucketError::Io(std::io::Error::new(
            e.kind(),
            format!("cannot open {}: {e}", path.display()),
        ))
    })?;
    let mut reader = BufReader::new(file);

    #[cfg(feature = "compact")]
    {
        use std::io::BufRead;
        let is_gzip = reader.fill_buf()?.starts_with(&[0x1f, 0x8b]);
        if is_gzip {
            return Ok(Box::new(GzDecoder::new(reader)));
        }
    }

    Ok(Box::new(reader))
}

/// Output file opened by [`create_stream`].
///
/// Call [`OutputStream::finish`] when done: it writes the gzip trailer (under
/// `compact`) and flushes, reporting errors that a plain drop would lose.
pub enum OutputStream {
    Plain(BufWriter<File>),
    #[cfg(feature = "compact")]
    Gzip(GzEncoder<BufWriter<File>>),
}

impl OutputStream {
    pub fn finish(self) -> Result<()> {
        let mut inner = match self {
            OutputStream::Plain(w) => w,
            #[cfg(feature = "compact")]
            OutputStream::Gzip(enc) => enc.finish()?,
        };
        inner.flush()?;
        Ok(())
    }
}

impl Write for OutputStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        match self {
            OutputStream::Plain(w) => w.write(buf),
            #[cfg(feature = "compact")]
            OutputStream::Gzip(w) => w.write(buf),
        }
    }

    fn flush(&mut self) -> std::io::Result<()> {
        match self {
            OutputStream::Plain(w) => w.flush(),
            #[cfg(feature = "compact")]
            OutputStream::Gzip(w) => w.flush(),
        }
    }
}

/// Creates (truncates) a file for writing; gzip-compressed under `compact`.
pub fn create_stream(path: &Path) -> Result<OutputStream> {
    let writer = BufWriter::new(File::create(path)?);

    #[cfg(feature = "compact")]
    {
        Ok(OutputStream::Gzip(GzEncoder::new(writer, Compression::default())))
    }

    #[cfg(not(feature = "compact"))]
    {
        Ok(OutputStream::Plain(writer))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finished_stream_reads_back_completely() {
        let path = std::env::temp_dir().join(format!("geobucket-io-{}.bin", std::process::id()));
        let mut out = create_stream(&path).unwrap();
        out.write_all(b"sangotedo ajah").unwrap();
        out.finish().unwrap();

        let raw = std::fs::read(&path).unwrap();
        let mut back = Vec::new();
        open_stream(&path).unwrap().read_to_end(&mut back).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back, b"sangotedo ajah");
        #[cfg(feature = "compact")]
        {
            assert!(raw.starts_with(&[0x1f, 0x8b]));
            // gzip trailer: CRC32 + input size (little-endian) in the last 8 bytes
            assert_eq!(raw[raw.len() - 4..], 14u32.to_le_bytes());
        }
        #[cfg(not(feature = "compact"))]
        assert_eq!(raw, b"sangotedo ajah");
    }
}

//! Length-prefixed string records.
//!
//! Each record is a big-endian `u16` byte count followed by that many bytes of
//! modified UTF-8: plain UTF-8 except that NUL is written as `C0 80` and
//! characters outside the BMP are written as two 3-byte surrogate sequences.

use std::io::{self, Read};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum RecordError {
    /// Input ended at a record boundary or part way through one.
    #[error("end of stream")]
    EndOfStream,
    #[error("malformed modified utf-8 at byte {offset}")]
    Malformed { offset: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

pub struct RecordReader<R> {
    inner: R,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R) -> Self {
        Self { inner }
    }

    pub fn next_record(&mut self) -> Result<String, RecordError> {
        let mut prefix = [0u8; 2];
        self.fill(&mut prefix)?;

        let mut body = vec![0u8; usize::from(u16::from_be_bytes(prefix))];
        self.fill(&mut body)?;
        decode_modified_utf8(&body)
    }

    fn fill(&mut self, buf: &mut [u8]) -> Result<(), RecordError> {
        self.inner.read_exact(buf).map_err(|error| {
            if error.kind() == io::ErrorKind::UnexpectedEof {
                RecordError::EndOfStream
            } else {
                RecordError::Io(error)
            }
        })
    }
}

pub fn decode_modified_utf8(bytes: &[u8]) -> Result<String, RecordError> {
    let mut units = Vec::with_capacity(bytes.len());
    let mut offset = 0;

    while offset < bytes.len() {
        let lead = bytes[offset];
        let (unit, width) = match lead >> 4 {
            0x0..=0x7 => (u16::from(lead), 1),
            0xC | 0xD => {
                let next = continuation(bytes, offset, 1)?;
                ((u16::from(lead & 0x1F) << 6) | next, 2)
            }
            0xE => {
                let second = continuation(bytes, offset, 1)?;
                let third = continuation(bytes, offset, 2)?;
                ((u16::from(lead & 0x0F) << 12) | (second << 6) | third, 3)
            }
            _ => return Err(RecordError::Malformed { offset }),
        };
        units.push(unit);
        offset += width;
    }

    // Lone surrogates are legal in the encoding but not in a Rust string.
    Ok(String::from_utf16_lossy(&units))
}

fn continuation(bytes: &[u8], lead: usize, step: usize) -> Result<u16, RecordError> {
    match bytes.get(lead + step) {
        Some(byte) if byte & 0xC0 == 0x80 => Ok(u16::from(byte & 0x3F)),
        _ => Err(RecordError::Malformed { offset: lead }),
    }
}

#[cfg(test)]
#[path = "tests/records_tests.rs"]
mod tests;

// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Low-level framing of the extension stream.
//!
//! A block is a little-endian `i32` record count followed by that many
//! records. Every record starts with the `u32` class id of its type, then the
//! record's fields in `bincode`'s standard encoding. The class id lets a
//! reader notice when it is reading the blocks out of order instead of
//! silently decoding one type's bytes as another's.

use bincode::{
    config,
    error::{DecodeError, EncodeError},
    Decode, Encode,
};
use std::io::{self, Read, Write};

/// Size in bytes of the count prefix of a block.
pub const COUNT_SIZE: usize = 4;

/// Most bytes a single record may decode from.
///
/// Records are a few dozen bytes plus short lists and names. A length prefix
/// claiming more than this is corrupt and fails the decode instead of
/// reserving the claimed size.
pub const RECORD_LIMIT: usize = 1 << 20;

/// Errors raised while reading or writing the extension stream.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// The underlying stream failed, or ended early.
    #[error("stream I/O failed: {0}")]
    Io(#[from] io::Error),
    /// A record could not be encoded.
    #[error("failed to encode {what}: {source}")]
    Encode {
        /// Name of the record type.
        what: &'static str,
        /// The encoder's error.
        #[source]
        source: EncodeError,
    },
    /// A record could not be decoded.
    #[error("failed to decode {what}: {source}")]
    Decode {
        /// Name of the record type.
        what: &'static str,
        /// The decoder's error.
        #[source]
        source: DecodeError,
    },
    /// The next record is not of the type the reader expected.
    #[error("expected a {what} record (class {expected:#010x}), found class {found:#010x}")]
    UnexpectedClass {
        /// Name of the expected record type.
        what: &'static str,
        /// Class id the reader expected.
        expected: u32,
        /// Class id found in the stream.
        found: u32,
    },
    /// A block announced a negative number of records.
    #[error("invalid record count {0}")]
    InvalidCount(i32),
    /// A block has more records than the count prefix can describe.
    #[error("{0} records do not fit in a block count")]
    TooManyRecords(usize),
}

/// Writes the count prefix of a block.
pub fn write_count(writer: &mut dyn Write, count: usize) -> Result<(), StreamError> {
    let count = i32::try_from(count).map_err(|_| StreamError::TooManyRecords(count))?;
    writer.write_all(&count.to_le_bytes())?;
    Ok(())
}

/// Reads the count prefix of a block.
pub fn read_count(reader: &mut dyn Read) -> Result<usize, StreamError> {
    let mut bytes = [0u8; COUNT_SIZE];
    reader.read_exact(&mut bytes)?;
    let count = i32::from_le_bytes(bytes);
    usize::try_from(count).map_err(|_| StreamError::InvalidCount(count))
}

/// Writes one record, preceded by its class id.
pub fn write_record<T: Encode>(
    mut writer: &mut dyn Write,
    class_id: u32,
    record: &T,
    what: &'static str,
) -> Result<(), StreamError> {
    writer.write_all(&class_id.to_le_bytes())?;
    bincode::encode_into_std_write(record, &mut writer, config::standard())
        .map_err(|source| StreamError::Encode { what, source })?;
    Ok(())
}

/// Reads one record, checking that its class id is `class_id`.
pub fn read_record<T: Decode<()>>(
    mut reader: &mut dyn Read,
    class_id: u32,
    what: &'static str,
) -> Result<T, StreamError> {
    let mut bytes = [0u8; 4];
    reader.read_exact(&mut bytes)?;
    let found = u32::from_le_bytes(bytes);
    if found != class_id {
        return Err(StreamError::UnexpectedClass {
            what,
            expected: class_id,
            found,
        });
    }
    bincode::decode_from_std_read(
        &mut reader,
        config::standard().with_limit::<RECORD_LIMIT>(),
    )
    .map_err(|source| StreamError::Decode { what, source })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::class_id;
    use std::io::Cursor;

    #[derive(Debug, PartialEq, Encode, Decode)]
    struct Sample {
        value: i32,
        name: String,
    }

    #[test]
    fn test_zero_count_is_four_zero_bytes() {
        let mut buffer = Vec::new();
        write_count(&mut buffer, 0).unwrap();
        assert_eq!(buffer, vec![0, 0, 0, 0]);
        assert_eq!(read_count(&mut Cursor::new(buffer)).unwrap(), 0);
    }

    #[test]
    fn test_negative_count_is_rejected() {
        let bytes = (-1i32).to_le_bytes().to_vec();
        let err = read_count(&mut Cursor::new(bytes)).unwrap_err();
        assert!(matches!(err, StreamError::InvalidCount(-1)));
    }

    #[test]
    fn test_record_with_wrong_class_is_rejected() {
        let mut buffer = Vec::new();
        let sample = Sample {
            value: 3,
            name: "GAPOWR".to_string(),
        };
        write_record(&mut buffer, class_id(b"AAAA"), &sample, "Sample").unwrap();

        let err = read_record::<Sample>(&mut Cursor::new(&buffer), class_id(b"BBBB"), "Sample")
            .unwrap_err();
        assert!(matches!(err, StreamError::UnexpectedClass { .. }));

        let decoded: Sample =
            read_record(&mut Cursor::new(&buffer), class_id(b"AAAA"), "Sample").unwrap();
        assert_eq!(decoded, sample);
    }

    #[test]
    fn test_oversized_length_prefix_fails_the_decode() {
        let mut buffer = Vec::new();
        let sample = Sample {
            value: 3,
            name: String::new(),
        };
        write_record(&mut buffer, class_id(b"AAAA"), &sample, "Sample").unwrap();
        // Tag (4 bytes), then `value` as one varint byte, then the name length.
        assert_eq!(buffer[5], 0);
        let mut huge = vec![253u8];
        huge.extend_from_slice(&(1u64 << 40).to_le_bytes());
        buffer.splice(5..6, huge);

        let err = read_record::<Sample>(&mut Cursor::new(&buffer), class_id(b"AAAA"), "Sample")
            .unwrap_err();

        assert!(matches!(
            err,
            StreamError::Decode {
                source: DecodeError::LimitExceeded,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_stream_is_an_io_error() {
        let err = read_count(&mut Cursor::new(vec![1, 0])).unwrap_err();
        assert!(matches!(err, StreamError::Io(_)));
    }
}

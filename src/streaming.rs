//! Streaming adapter: pumps bounded chunks between `std::io` sources and
//! the pure codec transforms.
//!
//! The chunk transforms ([`ChunkEncoder`] / [`ChunkDecoder`]) hold back the
//! unaligned tail of each chunk so block boundaries are never violated;
//! only the final chunk applies padding and partial-block rules. Big-integer
//! alphabets buffer the whole stream, since the math needs every byte
//! before the first output digit is known.

use std::io::{self, Read, Write};

use crate::alphabet::Alphabet;
use crate::config::EncodingMode;
use crate::error::Error;
use crate::{bigint, bits, block};

const CHUNK_SIZE: usize = 4080; // divisible by every block length in play

fn to_io_error(error: Error) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, error)
}

/// Chunk-at-a-time encoder state. `push` accepts any chunk size; the
/// transform carves off the largest block-aligned prefix, encodes it and
/// carries the remainder until the next call. The final call (`last ==
/// true`, typically with an empty chunk) flushes the tail and applies
/// padding.
pub struct ChunkEncoder<'a> {
    alphabet: &'a Alphabet,
    pending: Vec<u8>,
}

impl<'a> ChunkEncoder<'a> {
    pub fn new(alphabet: &'a Alphabet) -> Self {
        ChunkEncoder {
            alphabet,
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8], last: bool) -> String {
        self.pending.extend_from_slice(chunk);
        let aligned = if last {
            self.pending.len()
        } else {
            let len = self.pending.len();
            match self.alphabet.mode() {
                EncodingMode::BitPacking => {
                    len - len % bits::block_bytes(self.alphabet.bits_per_symbol())
                }
                EncodingMode::Block => len - len % block::BYTES_PER_BLOCK,
                EncodingMode::BigInteger => 0,
            }
        };
        if aligned == 0 {
            return String::new();
        }
        let encoded = match self.alphabet.mode() {
            EncodingMode::BitPacking => bits::encode(&self.pending[..aligned], self.alphabet, last),
            EncodingMode::Block => block::encode(&self.pending[..aligned], self.alphabet),
            EncodingMode::BigInteger => bigint::encode(&self.pending[..aligned], self.alphabet),
        };
        self.pending.drain(..aligned);
        encoded
    }
}

/// Chunk-at-a-time decoder state, the inverse of [`ChunkEncoder`].
/// Whitespace is dropped up front so chunk boundaries stay group-aligned;
/// an open base-85 group or unaligned symbol tail is carried between calls.
pub struct ChunkDecoder<'a> {
    alphabet: &'a Alphabet,
    pending: Vec<u8>,
}

impl<'a> ChunkDecoder<'a> {
    pub fn new(alphabet: &'a Alphabet) -> Self {
        ChunkDecoder {
            alphabet,
            pending: Vec::new(),
        }
    }

    pub fn push(&mut self, chunk: &[u8], last: bool) -> Result<Vec<u8>, Error> {
        self.pending
            .extend(chunk.iter().copied().filter(|b| !b.is_ascii_whitespace()));
        let aligned = if last {
            self.pending.len()
        } else {
            let len = self.pending.len();
            match self.alphabet.mode() {
                EncodingMode::BitPacking => {
                    len - len % bits::block_symbols(self.alphabet.bits_per_symbol())
                }
                EncodingMode::Block => block::aligned_prefix(&self.pending, self.alphabet),
                EncodingMode::BigInteger => 0,
            }
        };
        if aligned == 0 {
            return Ok(Vec::new());
        }

        let prefix = &self.pending[..aligned];
        if let Some(position) = prefix.iter().position(|b| !b.is_ascii()) {
            return Err(Error::InvalidCharacter {
                character: prefix[position] as char,
                index: position,
            });
        }
        let text = std::str::from_utf8(prefix).expect("ASCII verified above");

        let decoded = match self.alphabet.mode() {
            EncodingMode::BitPacking => bits::decode(text, self.alphabet)?,
            EncodingMode::Block => block::decode(text, self.alphabet)?,
            EncodingMode::BigInteger => bigint::decode(text, self.alphabet)?,
        };
        self.pending.drain(..aligned);
        Ok(decoded)
    }
}

/// Streaming encoder over a `std::io::Write` sink.
///
/// Reads the source in bounded chunks, so arbitrarily large inputs encode
/// without being held in memory (except in big-integer mode, which must
/// buffer the whole stream).
pub struct StreamingEncoder<'a, W: Write> {
    state: ChunkEncoder<'a>,
    writer: W,
}

impl<'a, W: Write> StreamingEncoder<'a, W> {
    pub fn new(alphabet: &'a Alphabet, writer: W) -> Self {
        StreamingEncoder {
            state: ChunkEncoder::new(alphabet),
            writer,
        }
    }

    /// Encodes everything `reader` yields until EOF.
    pub fn encode<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let last = read == 0;
            let encoded = self.state.push(&buffer[..read], last);
            if !encoded.is_empty() {
                self.writer.write_all(encoded.as_bytes())?;
            }
            if last {
                return self.writer.flush();
            }
        }
    }
}

/// Streaming decoder over a `std::io::Write` sink.
pub struct StreamingDecoder<'a, W: Write> {
    state: ChunkDecoder<'a>,
    writer: W,
}

impl<'a, W: Write> StreamingDecoder<'a, W> {
    pub fn new(alphabet: &'a Alphabet, writer: W) -> Self {
        StreamingDecoder {
            state: ChunkDecoder::new(alphabet),
            writer,
        }
    }

    /// Decodes everything `reader` yields until EOF. Malformed input
    /// surfaces as an [`io::ErrorKind::InvalidData`] error wrapping the
    /// codec [`Error`].
    pub fn decode<R: Read>(&mut self, reader: &mut R) -> io::Result<()> {
        let mut buffer = vec![0u8; CHUNK_SIZE];
        loop {
            let read = match reader.read(&mut buffer) {
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            let last = read == 0;
            let decoded = self.state.push(&buffer[..read], last).map_err(to_io_error)?;
            if !decoded.is_empty() {
                self.writer.write_all(&decoded)?;
            }
            if last {
                return self.writer.flush();
            }
        }
    }
}

/// Async counterpart of [`StreamingEncoder::encode`]: only the I/O awaits,
/// the chunk transform itself is synchronous CPU work.
#[cfg(feature = "async")]
pub async fn encode_async<R, W>(
    alphabet: &Alphabet,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut state = ChunkEncoder::new(alphabet);
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buffer).await?;
        let last = read == 0;
        let encoded = state.push(&buffer[..read], last);
        if !encoded.is_empty() {
            writer.write_all(encoded.as_bytes()).await?;
        }
        if last {
            return writer.flush().await;
        }
    }
}

/// Async counterpart of [`StreamingDecoder::decode`].
#[cfg(feature = "async")]
pub async fn decode_async<R, W>(
    alphabet: &Alphabet,
    reader: &mut R,
    writer: &mut W,
) -> io::Result<()>
where
    R: tokio::io::AsyncRead + Unpin,
    W: tokio::io::AsyncWrite + Unpin,
{
    use tokio::io::{AsyncReadExt, AsyncWriteExt};

    let mut state = ChunkDecoder::new(alphabet);
    let mut buffer = vec![0u8; CHUNK_SIZE];
    loop {
        let read = reader.read(&mut buffer).await?;
        let last = read == 0;
        let decoded = state.push(&buffer[..read], last).map_err(to_io_error)?;
        if !decoded.is_empty() {
            writer.write_all(&decoded).await?;
        }
        if last {
            return writer.flush().await;
        }
    }
}

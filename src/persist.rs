//! Fixed-width binary node tables.
//!
//! Each record is the board key in `num_base256_board_digits` big-endian bytes
//! followed by one packed score byte. Tables are written in ascending key
//! order, so a finished table supports binary search.

use std::io::{self, BufRead, Read, Seek, SeekFrom, Write};

use sha2::{Digest, Sha256};

use crate::board::Board;
use crate::engine::score::Score;
use crate::error::{Error, Result};
use crate::game::Game;
use crate::persist_stream::{NodeReader, NodeRecord};
use crate::rules::Constants;
use crate::types::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryFormat {
    pub board_bytes: usize,
}

impl BinaryFormat {
    pub fn from_constants(c: &Constants) -> Self {
        Self {
            board_bytes: c.num_base256_board_digits,
        }
    }

    #[inline]
    pub fn record_len(&self) -> usize {
        self.board_bytes + 1
    }

    fn pack_board(&self, board: u64, out: &mut Vec<u8>) -> Result<()> {
        let bits = u32::try_from(self.board_bytes).map_or(u32::MAX, |b| b.saturating_mul(8));
        if bits < 64 && board >> bits != 0 {
            return Err(Error::ValueTooLarge {
                value: board,
                digits: self.board_bytes,
            });
        }
        let bytes = board.to_be_bytes();
        let start = bytes.len().saturating_sub(self.board_bytes);
        out.extend(std::iter::repeat(0u8).take(self.board_bytes.saturating_sub(bytes.len())));
        out.extend_from_slice(&bytes[start..]);
        Ok(())
    }

    fn unpack_board(&self, bytes: &[u8]) -> Result<u64> {
        bytes.iter().try_fold(0u64, |acc, &b| {
            acc.checked_mul(256)
                .map(|v| v | u64::from(b))
                .ok_or(Error::ValueTooLarge {
                    value: acc,
                    digits: self.board_bytes,
                })
        })
    }

    /// Pack one resolved record.
    pub fn encode(&self, record: &NodeRecord, out: &mut Vec<u8>) -> Result<()> {
        if record.score.outcome() == Outcome::Indeterminate {
            return Err(Error::UnexpectedIndeterminate {
                board: record.board,
            });
        }
        self.pack_board(record.board, out)?;
        out.push(record.score.to_byte()?);
        Ok(())
    }

    pub fn decode(&self, bytes: &[u8]) -> Result<NodeRecord> {
        if bytes.len() != self.record_len() {
            return Err(Error::TruncatedRecord {
                expected: self.record_len(),
                got: bytes.len(),
            });
        }
        let board = self.unpack_board(&bytes[..self.board_bytes])?;
        Ok(NodeRecord {
            board,
            score: Score::from_byte(bytes[self.board_bytes]),
        })
    }
}

pub fn write_binary_node<W: Write>(out: &mut W, format: &BinaryFormat, record: &NodeRecord) -> Result<()> {
    let mut buf = Vec::with_capacity(format.record_len());
    format.encode(record, &mut buf)?;
    out.write_all(&buf)?;
    Ok(())
}

/// Next record, `Ok(None)` at a clean end of input.
pub fn read_binary_node<R: Read>(input: &mut R, format: &BinaryFormat) -> Result<Option<NodeRecord>> {
    let mut buf = vec![0u8; format.record_len()];
    match read_full(input, &mut buf)? {
        0 => Ok(None),
        n if n < buf.len() => Err(Error::TruncatedRecord {
            expected: buf.len(),
            got: n,
        }),
        _ => format.decode(&buf).map(Some),
    }
}

/// Written record count and SHA-256 of the bytes written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStats {
    pub records: u64,
    pub sha256_hex: String,
}

/// Streams records into a binary table, hashing as it goes.
pub struct BinaryWriter<W: Write> {
    out: W,
    format: BinaryFormat,
    hasher: Sha256,
    buf: Vec<u8>,
    records: u64,
}

impl<W: Write> BinaryWriter<W> {
    pub fn new(out: W, format: BinaryFormat) -> Self {
        Self {
            out,
            format,
            hasher: Sha256::new(),
            buf: Vec::with_capacity(format.record_len()),
            records: 0,
        }
    }

    pub fn push(&mut self, record: &NodeRecord) -> Result<()> {
        self.buf.clear();
        self.format.encode(record, &mut self.buf)?;
        self.out.write_all(&self.buf)?;
        self.hasher.update(&self.buf);
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    pub fn finish(mut self) -> Result<TableStats> {
        self.out.flush()?;
        Ok(TableStats {
            records: self.records,
            sha256_hex: hex::encode(self.hasher.finalize()),
        })
    }
}

/// Iterates the records of a binary table.
pub struct BinaryReader<R> {
    input: R,
    format: BinaryFormat,
}

impl<R: Read> BinaryReader<R> {
    pub fn new(input: R, format: BinaryFormat) -> Self {
        Self { input, format }
    }

    pub fn read_next(&mut self) -> Result<Option<NodeRecord>> {
        read_binary_node(&mut self.input, &self.format)
    }
}

impl<R: Read> Iterator for BinaryReader<R> {
    type Item = Result<NodeRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Score for a legacy score byte stored against `board`.
pub fn legacy_score(byte: u8, board: &Board) -> Score {
    // Cells are capped at 63, so the count always fits.
    let empty = u8::try_from(board.empty_cells()).unwrap_or(u8::MAX);
    Score::from_legacy_byte(byte, empty)
}

/// Rewrite a table whose score bytes use the legacy signed win-ply encoding.
pub fn upgrade<R: Read, W: Write>(game: &Game, mut input: R, output: W) -> Result<TableStats> {
    let format = BinaryFormat::from_constants(game.constants());
    let mut writer = BinaryWriter::new(output, format);
    let mut buf = vec![0u8; format.record_len()];
    loop {
        let got = read_full(&mut input, &mut buf)?;
        if got == 0 {
            break;
        }
        if got < buf.len() {
            return Err(Error::TruncatedRecord {
                expected: buf.len(),
                got,
            });
        }
        let board = format.unpack_board(&buf[..format.board_bytes])?;
        let score = legacy_score(buf[format.board_bytes], &game.decode(board)?);
        writer.push(&NodeRecord { board, score })?;
    }
    writer.finish()
}

fn read_full<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut got = 0;
    while got < buf.len() {
        match input.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(got)
}

/// Text node stream to binary table. The input must hold resolved scores only.
pub fn export<R: BufRead, W: Write>(
    game: &Game,
    input: NodeReader<R>,
    output: W,
) -> Result<TableStats> {
    let mut writer = BinaryWriter::new(output, BinaryFormat::from_constants(game.constants()));
    for record in input {
        writer.push(&record?)?;
    }
    writer.finish()
}

/// Random access into a sorted binary table.
#[inline]
fn as_u64(n: usize) -> u64 {
    u64::try_from(n).unwrap_or(u64::MAX)
}

pub struct LookupTable<R> {
    inner: R,
    format: BinaryFormat,
    len: u64,
}

impl<R: Read + Seek> LookupTable<R> {
    pub fn open(mut inner: R, format: BinaryFormat) -> Result<Self> {
        let size = inner.seek(SeekFrom::End(0))?;
        let record_len = as_u64(format.record_len());
        if size % record_len != 0 {
            return Err(Error::TruncatedRecord {
                expected: format.record_len(),
                got: usize::try_from(size % record_len).unwrap_or(usize::MAX),
            });
        }
        Ok(Self {
            inner,
            format,
            len: size / record_len,
        })
    }

    /// Number of records.
    #[inline]
    pub fn len(&self) -> u64 {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn record_at(&mut self, index: u64) -> Result<NodeRecord> {
        let record_len = self.format.record_len();
        self.inner.seek(SeekFrom::Start(index * as_u64(record_len)))?;
        let mut buf = vec![0u8; record_len];
        self.inner.read_exact(&mut buf)?;
        self.format.decode(&buf)
    }

    /// Score stored for the board key `board`.
    pub fn lookup(&mut self, board: u64) -> Result<Score> {
        let (mut lo, mut hi) = (0u64, self.len);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let record = self.record_at(mid)?;
            match record.board.cmp(&board) {
                std::cmp::Ordering::Equal => return Ok(record.score),
                std::cmp::Ordering::Less => lo = mid + 1,
                std::cmp::Ordering::Greater => hi = mid,
            }
        }
        Err(Error::NotFound { board })
    }
}

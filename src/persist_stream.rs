//! Line-oriented text records exchanged between passes.
//!
//! Node line: `<board base-62><outcome char><ply base-62>`
//! Edge line: `<destination board base-62><source board base-62>`
//!
//! All widths are fixed by the geometry (see [`crate::rules::Constants`]).
//! Because the base-62 alphabet is in ASCII order, a bytewise sort of the
//! lines (`LC_ALL=C sort`) orders them by board key, which is the sort key
//! every merge-join pass expects.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::marker::PhantomData;

use crate::base62;
use crate::engine::score::Score;
use crate::error::{Error, Result};
use crate::rules::Constants;

/// Stream name meaning "read from standard input".
pub const STDIN_NAME: &str = "STDIN";
/// Stream name meaning "write to standard output".
pub const STDOUT_NAME: &str = "STDOUT";

/// Buffer size for file-backed streams (8 MiB).
pub const BUF_CAP_BYTES: usize = 8 * 1024 * 1024;

pub fn open_input(name: &str) -> Result<Box<dyn BufRead>> {
    if name == STDIN_NAME {
        Ok(Box::new(BufReader::with_capacity(BUF_CAP_BYTES, io::stdin())))
    } else {
        let file = File::open(name)?;
        Ok(Box::new(BufReader::with_capacity(BUF_CAP_BYTES, file)))
    }
}

pub fn open_output(name: &str) -> Result<Box<dyn Write>> {
    if name == STDOUT_NAME {
        Ok(Box::new(BufWriter::with_capacity(BUF_CAP_BYTES, io::stdout())))
    } else {
        let file = File::create(name)?;
        Ok(Box::new(BufWriter::with_capacity(BUF_CAP_BYTES, file)))
    }
}

/// A board with its score. Also used for Pass C output, where `board` is the
/// edge source and `score` the destination's score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeRecord {
    pub board: u64,
    pub score: Score,
}

/// A one-ply move, stored destination first so a sort groups edges by destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeRecord {
    pub destination: u64,
    pub source: u64,
}

/// Field widths of the text encodings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextFormat {
    pub board_digits: usize,
    pub ply_digits: usize,
}

impl TextFormat {
    pub fn from_constants(c: &Constants) -> Self {
        Self {
            board_digits: c.num_base62_board_digits,
            ply_digits: c.num_base62_ply_digits,
        }
    }
}

/// A record with a fixed-width one-line text form.
pub trait TextRecord: Sized {
    fn line_len(format: &TextFormat) -> usize;
    fn write_text(&self, format: &TextFormat, out: &mut String) -> Result<()>;
    fn parse_text(format: &TextFormat, line: &str) -> Result<Self>;
}

impl TextRecord for NodeRecord {
    fn line_len(format: &TextFormat) -> usize {
        format.board_digits + 1 + format.ply_digits
    }

    fn write_text(&self, format: &TextFormat, out: &mut String) -> Result<()> {
        base62::encode_into(self.board, format.board_digits, out)?;
        self.score.write_text(format.ply_digits, out)
    }

    fn parse_text(format: &TextFormat, line: &str) -> Result<Self> {
        let (board, score) = line.split_at(format.board_digits);
        Ok(NodeRecord {
            board: base62::decode(board)?,
            score: Score::parse_text(score)?,
        })
    }
}

impl TextRecord for EdgeRecord {
    fn line_len(format: &TextFormat) -> usize {
        2 * format.board_digits
    }

    fn write_text(&self, format: &TextFormat, out: &mut String) -> Result<()> {
        base62::encode_into(self.destination, format.board_digits, out)?;
        base62::encode_into(self.source, format.board_digits, out)
    }

    fn parse_text(format: &TextFormat, line: &str) -> Result<Self> {
        let (destination, source) = line.split_at(format.board_digits);
        Ok(EdgeRecord {
            destination: base62::decode(destination)?,
            source: base62::decode(source)?,
        })
    }
}

/// Reads one record per line. Blank lines are skipped.
pub struct RecordReader<R, T> {
    input: R,
    format: TextFormat,
    line: String,
    line_no: u64,
    _record: PhantomData<T>,
}

pub type NodeReader<R> = RecordReader<R, NodeRecord>;
pub type EdgeReader<R> = RecordReader<R, EdgeRecord>;

impl<R: BufRead, T: TextRecord> RecordReader<R, T> {
    pub fn new(input: R, format: TextFormat) -> Self {
        Self {
            input,
            format,
            line: String::new(),
            line_no: 0,
            _record: PhantomData,
        }
    }

    /// Next record, `Ok(None)` at end of stream.
    pub fn read_next(&mut self) -> Result<Option<T>> {
        loop {
            self.line.clear();
            if self.input.read_line(&mut self.line)? == 0 {
                return Ok(None);
            }
            self.line_no += 1;
            let text = self.line.trim_end_matches(['\n', '\r']);
            if text.is_empty() {
                continue;
            }
            let expected = T::line_len(&self.format);
            if text.len() != expected || !text.is_ascii() {
                return Err(Error::MalformedRecord {
                    line: self.line_no,
                    reason: format!("expected {expected} ASCII characters, got {text:?}"),
                });
            }
            return T::parse_text(&self.format, text)
                .map(Some)
                .map_err(|e| Error::MalformedRecord {
                    line: self.line_no,
                    reason: e.to_string(),
                });
        }
    }
}

impl<R: BufRead, T: TextRecord> Iterator for RecordReader<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_next().transpose()
    }
}

/// Destination of a pass.
pub trait RecordSink<T> {
    fn push(&mut self, record: T) -> Result<()>;

    /// Flush buffered output. Called once after the last record.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl<T> RecordSink<T> for Vec<T> {
    fn push(&mut self, record: T) -> Result<()> {
        Vec::push(self, record);
        Ok(())
    }
}

impl<T, S: RecordSink<T> + ?Sized> RecordSink<T> for &mut S {
    fn push(&mut self, record: T) -> Result<()> {
        (**self).push(record)
    }

    fn finish(&mut self) -> Result<()> {
        (**self).finish()
    }
}

/// Writes one record per line.
pub struct RecordWriter<W, T> {
    out: W,
    format: TextFormat,
    buf: String,
    written: u64,
    _record: PhantomData<T>,
}

pub type NodeWriter<W> = RecordWriter<W, NodeRecord>;
pub type EdgeWriter<W> = RecordWriter<W, EdgeRecord>;

impl<W: Write, T: TextRecord> RecordWriter<W, T> {
    pub fn new(out: W, format: TextFormat) -> Self {
        Self {
            out,
            format,
            buf: String::with_capacity(64),
            written: 0,
            _record: PhantomData,
        }
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write, T: TextRecord> RecordSink<T> for RecordWriter<W, T> {
    fn push(&mut self, record: T) -> Result<()> {
        self.buf.clear();
        record.write_text(&self.format, &mut self.buf)?;
        self.buf.push('\n');
        self.out.write_all(self.buf.as_bytes())?;
        self.written = self.written.saturating_add(1);
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }
}

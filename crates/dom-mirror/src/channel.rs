//! Transports between the capture and replica sides.
//!
//! Every transport delivers messages in the order they were sent. There is no
//! retry: a failed send is reported to the caller and the message is lost.

use std::io::{BufRead, Write};
use std::sync::mpsc;

use thiserror::Error;

use crate::codec::{self, CodecError};
use crate::patch::Message;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("channel closed")]
    Closed,
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Ordered, one-way message sink.
pub trait PatchChannel {
    fn send(&mut self, message: &Message) -> Result<(), ChannelError>;
}

/// In-memory recorder.
impl PatchChannel for Vec<Message> {
    fn send(&mut self, message: &Message) -> Result<(), ChannelError> {
        self.push(message.clone());
        Ok(())
    }
}

impl PatchChannel for mpsc::Sender<Message> {
    fn send(&mut self, message: &Message) -> Result<(), ChannelError> {
        mpsc::Sender::send(self, message.clone()).map_err(|_| ChannelError::Closed)
    }
}

/// Writes one JSON message per line.
#[derive(Debug)]
pub struct NdjsonChannel<W: Write> {
    writer: W,
}

impl<W: Write> NdjsonChannel<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    pub fn get_ref(&self) -> &W {
        &self.writer
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PatchChannel for NdjsonChannel<W> {
    fn send(&mut self, message: &Message) -> Result<(), ChannelError> {
        let line = codec::to_line(message);
        self.writer.write_all(line.as_bytes())?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Decodes a line-delimited message stream. Blank lines are skipped.
pub fn read_ndjson<R: BufRead>(reader: R) -> impl Iterator<Item = Result<Message, CodecError>> {
    read_ndjson_numbered(reader).map(|(_, message)| message)
}

/// Like [`read_ndjson`], paired with the 1-based input line of each message.
pub fn read_ndjson_numbered<R: BufRead>(
    reader: R,
) -> impl Iterator<Item = (usize, Result<Message, CodecError>)> {
    reader
        .lines()
        .enumerate()
        .filter_map(|(index, line)| match line {
            Ok(line) if line.trim().is_empty() => None,
            Ok(line) => Some((index + 1, codec::from_line(&line))),
            Err(e) => Some((index + 1, Err(CodecError::Io(e)))),
        })
}

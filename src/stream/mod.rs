//! Length-prefixed stream protocol
//!
//! A minimal framed request/response protocol over a reliable stream
//! transport. Each message is a 4-byte header — version, operation
//! code, big-endian payload length — followed by exactly that many
//! payload bytes. Data frames are acknowledged with a fixed text reply;
//! a termination frame closes the connection without further reply.

use byteorder::{BigEndian, ByteOrder};
use std::error::Error;
use std::fmt;
use std::io::{self, Read, Write};

/// Protocol version stamped into every frame this library builds
pub const PROTOCOL_VERSION: u8 = 1;

/// Frame header length in bytes
pub const HEADER_LEN: usize = 4;

/// Fixed acknowledgment payload for Data frames
pub const DATA_ACK: &[u8] = b"Data received";

/// Frame operation codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpCode {
    /// Application payload; the receiving side acknowledges it.
    Data = 1,
    /// Termination request; the receiving side closes without reply.
    Terminate = 2,
}

impl OpCode {
    /// Map a wire code back to its operation, if defined.
    pub fn from_byte(code: u8) -> Option<Self> {
        match code {
            1 => Some(OpCode::Data),
            2 => Some(OpCode::Terminate),
            _ => None,
        }
    }
}

/// Stream protocol errors
#[derive(Debug)]
pub enum StreamError {
    /// Received a header carrying an opcode this protocol does not
    /// define.
    UnknownOpCode(u8),
    /// Payload does not fit the 2-byte length field.
    PayloadTooLarge(usize),
    Io(io::Error),
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::UnknownOpCode(code) => write!(f, "unknown opcode: {}", code),
            StreamError::PayloadTooLarge(len) => {
                write!(f, "payload of {} bytes exceeds the 2-byte length field", len)
            }
            StreamError::Io(e) => write!(f, "stream I/O failed: {}", e),
        }
    }
}

impl Error for StreamError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StreamError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StreamError {
    fn from(e: io::Error) -> Self {
        StreamError::Io(e)
    }
}

/// One protocol frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamFrame {
    pub version: u8,
    pub opcode: OpCode,
    pub payload: Vec<u8>,
}

impl StreamFrame {
    /// A version-1 Data frame.
    pub fn data(payload: Vec<u8>) -> Self {
        StreamFrame {
            version: PROTOCOL_VERSION,
            opcode: OpCode::Data,
            payload,
        }
    }

    /// A version-1 Terminate frame. Carries no payload.
    pub fn terminate() -> Self {
        StreamFrame {
            version: PROTOCOL_VERSION,
            opcode: OpCode::Terminate,
            payload: Vec::new(),
        }
    }

    /// Serialize header plus payload.
    ///
    /// The payload length is truncated into the 2-byte field; callers
    /// writing frames go through `write_to`, which rejects oversized
    /// payloads first.
    pub fn encode(&self) -> Vec<u8> {
        let mut bytes = vec![0u8; HEADER_LEN + self.payload.len()];
        bytes[0] = self.version;
        bytes[1] = self.opcode as u8;
        BigEndian::write_u16(&mut bytes[2..4], self.payload.len() as u16);
        bytes[HEADER_LEN..].copy_from_slice(&self.payload);
        bytes
    }

    /// Write one frame to the stream.
    pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), StreamError> {
        if self.payload.len() > u16::MAX as usize {
            return Err(StreamError::PayloadTooLarge(self.payload.len()));
        }
        writer.write_all(&self.encode())?;
        Ok(())
    }

    /// Read one frame: the 4-byte header, then exactly the advertised
    /// payload length.
    ///
    /// A clean end-of-stream before a complete header yields Ok(None);
    /// end-of-stream inside the payload is an error.
    pub fn read_from<R: Read>(reader: &mut R) -> Result<Option<Self>, StreamError> {
        let mut header = [0u8; HEADER_LEN];
        match reader.read_exact(&mut header) {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Ok(None),
            Err(e) => return Err(StreamError::Io(e)),
        }

        let version = header[0];
        let opcode = OpCode::from_byte(header[1]).ok_or(StreamError::UnknownOpCode(header[1]))?;
        let len = BigEndian::read_u16(&header[2..4]) as usize;

        let mut payload = vec![0u8; len];
        reader.read_exact(&mut payload)?;

        Ok(Some(StreamFrame {
            version,
            opcode,
            payload,
        }))
    }
}

/// Drive one connection: read frames until end-of-stream, a transport
/// error, or a termination request.
///
/// Data frames are acknowledged with the fixed `DATA_ACK` text;
/// Terminate returns without further reply. An undefined opcode stops
/// the handler with `UnknownOpCode`.
pub fn handle_connection<S: Read + Write>(stream: &mut S) -> Result<(), StreamError> {
    loop {
        let frame = match StreamFrame::read_from(stream)? {
            Some(frame) => frame,
            None => return Ok(()),
        };

        match frame.opcode {
            OpCode::Data => {
                StreamFrame::data(DATA_ACK.to_vec()).write_to(stream)?;
            }
            OpCode::Terminate => return Ok(()),
        }
    }
}

/// Client side: send one Data frame and read the acknowledgment.
pub fn send_request<S: Read + Write>(stream: &mut S, payload: &[u8]) -> Result<StreamFrame, StreamError> {
    StreamFrame::data(payload.to_vec()).write_to(stream)?;
    match StreamFrame::read_from(stream)? {
        Some(ack) => Ok(ack),
        None => Err(StreamError::Io(io::Error::new(
            io::ErrorKind::UnexpectedEof,
            "connection closed before acknowledgment",
        ))),
    }
}

/// Client side: request termination. No reply follows.
pub fn send_terminate<W: Write>(stream: &mut W) -> Result<(), StreamError> {
    StreamFrame::terminate().write_to(stream)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// In-memory stand-in for a connection: reads from a script, writes
    /// into a buffer.
    struct Duplex {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Duplex {
        fn new(input: Vec<u8>) -> Self {
            Duplex {
                input: Cursor::new(input),
                output: Vec::new(),
            }
        }
    }

    impl Read for Duplex {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Duplex {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn data_frame_wire_form() {
        let frame = StreamFrame::data(b"Hello".to_vec());
        assert_eq!(
            frame.encode(),
            vec![0x01, 0x01, 0x00, 0x05, 0x48, 0x65, 0x6C, 0x6C, 0x6F]
        );
    }

    #[test]
    fn parse_reproduces_fields() {
        let wire = vec![0x01, 0x01, 0x00, 0x05, 0x48, 0x65, 0x6C, 0x6C, 0x6F];
        let frame = StreamFrame::read_from(&mut Cursor::new(wire)).unwrap().unwrap();
        assert_eq!(frame.version, 1);
        assert_eq!(frame.opcode, OpCode::Data);
        assert_eq!(frame.payload, b"Hello");
    }

    #[test]
    fn terminate_frame_is_empty() {
        assert_eq!(StreamFrame::terminate().encode(), vec![0x01, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn read_reports_clean_eof_as_none() {
        assert!(StreamFrame::read_from(&mut Cursor::new(vec![])).unwrap().is_none());
    }

    #[test]
    fn read_rejects_unknown_opcode() {
        let err = StreamFrame::read_from(&mut Cursor::new(vec![1, 9, 0, 0])).unwrap_err();
        assert!(matches!(err, StreamError::UnknownOpCode(9)));
    }

    #[test]
    fn read_fails_on_truncated_payload() {
        // Header promises 5 bytes, stream carries 2.
        let err = StreamFrame::read_from(&mut Cursor::new(vec![1, 1, 0, 5, b'H', b'e']));
        assert!(err.is_err());
    }

    #[test]
    fn write_rejects_oversized_payload() {
        let frame = StreamFrame::data(vec![0u8; u16::MAX as usize + 1]);
        let mut sink = Vec::new();
        let err = frame.write_to(&mut sink).unwrap_err();
        assert!(matches!(err, StreamError::PayloadTooLarge(_)));
        assert!(sink.is_empty());
    }

    #[test]
    fn handler_acknowledges_data() {
        let mut script = StreamFrame::data(b"Hello".to_vec()).encode();
        script.extend(StreamFrame::terminate().encode());
        let mut conn = Duplex::new(script);

        handle_connection(&mut conn).unwrap();

        let ack = StreamFrame::read_from(&mut Cursor::new(conn.output))
            .unwrap()
            .unwrap();
        assert_eq!(ack.version, PROTOCOL_VERSION);
        assert_eq!(ack.opcode, OpCode::Data);
        assert_eq!(ack.payload, DATA_ACK);
    }

    #[test]
    fn handler_stops_at_terminate() {
        // A Data frame after Terminate must never be acknowledged.
        let mut script = StreamFrame::terminate().encode();
        script.extend(StreamFrame::data(b"late".to_vec()).encode());
        let mut conn = Duplex::new(script);

        handle_connection(&mut conn).unwrap();
        assert!(conn.output.is_empty());
    }

    #[test]
    fn handler_stops_at_eof() {
        let mut conn = Duplex::new(StreamFrame::data(b"only".to_vec()).encode());
        handle_connection(&mut conn).unwrap();
        // One ack written, then clean stop at end-of-stream.
        let mut cursor = Cursor::new(conn.output);
        assert!(StreamFrame::read_from(&mut cursor).unwrap().is_some());
        assert!(StreamFrame::read_from(&mut cursor).unwrap().is_none());
    }

    #[test]
    fn handler_propagates_unknown_opcode() {
        let mut conn = Duplex::new(vec![1, 7, 0, 0]);
        let err = handle_connection(&mut conn).unwrap_err();
        assert!(matches!(err, StreamError::UnknownOpCode(7)));
    }

    #[test]
    fn request_reads_acknowledgment() {
        // Pre-script the ack the peer would send.
        let mut conn = Duplex::new(StreamFrame::data(DATA_ACK.to_vec()).encode());
        let ack = send_request(&mut conn, b"Hello, Server!").unwrap();
        assert_eq!(ack.payload, DATA_ACK);

        // And the request frame went out first.
        let sent = StreamFrame::read_from(&mut Cursor::new(conn.output))
            .unwrap()
            .unwrap();
        assert_eq!(sent.opcode, OpCode::Data);
        assert_eq!(sent.payload, b"Hello, Server!");
    }
}

use std::fmt;
use std::fmt::Formatter;
use std::str::from_utf8;

use bytes::{Bytes, BytesMut};

use crate::header::HeaderList;

/// Line terminator, one LF octet.
pub const LINE_END: &[u8] = b"\n";
/// Frame terminator, one NUL octet followed by a line terminator.
pub const FRAME_END: &[u8] = b"\x00\n";
/// Protocol versions offered in the `accept-version` header.
pub const SUPPORTED_VERSIONS: &str = "1.0,1.1,1.2";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Send,
    Subscribe,
    Unsubscribe,
    Begin,
    Commit,
    Abort,
    Ack,
    Nack,
    Disconnect,
    Connect,
    Connected,
    Message,
    Receipt,
    Error,
}

impl Command {
    pub fn as_str(&self) -> &'static str {
        use self::Command::*;

        match *self {
            Send => "SEND",
            Subscribe => "SUBSCRIBE",
            Unsubscribe => "UNSUBSCRIBE",
            Begin => "BEGIN",
            Commit => "COMMIT",
            Abort => "ABORT",
            Ack => "ACK",
            Nack => "NACK",
            Disconnect => "DISCONNECT",
            Connect => "CONNECT",
            Connected => "CONNECTED",
            Message => "MESSAGE",
            Receipt => "RECEIPT",
            Error => "ERROR",
        }
    }

    /// Recognizes the commands a server may send. Client commands are not
    /// accepted here; the decoder only ever sees server frames.
    pub fn from_server_command(token: &str) -> Option<Command> {
        match token {
            "CONNECTED" => Some(Command::Connected),
            "MESSAGE" => Some(Command::Message),
            "RECEIPT" => Some(Command::Receipt),
            "ERROR" => Some(Command::Error),
            _ => None,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub trait ToFrameBody {
    fn to_frame_body<'a>(&'a self) -> &'a [u8];
}

impl<'b> ToFrameBody for &'b [u8] {
    fn to_frame_body<'a>(&'a self) -> &'a [u8] {
        self
    }
}

impl<'b> ToFrameBody for &'b str {
    fn to_frame_body<'a>(&'a self) -> &'a [u8] {
        self.as_bytes()
    }
}

impl ToFrameBody for String {
    fn to_frame_body<'a>(&'a self) -> &'a [u8] {
        self.as_bytes()
    }
}

impl ToFrameBody for Vec<u8> {
    fn to_frame_body<'a>(&'a self) -> &'a [u8] {
        self
    }
}

/// One complete protocol frame. `body: None` means no body segment at all,
/// which is not the same frame as `body: Some(vec![])`.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub command: Command,
    pub headers: HeaderList,
    pub body: Option<Vec<u8>>,
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl Frame {
    pub fn count_bytes(&self) -> usize {
        let mut space_required: usize = 0;
        // Add one to space calculations to make room for '\n'
        space_required += self.command.as_str().len() + 1;
        space_required += self
            .headers
            .iter()
            .fold(0, |length, header| length + header.get_raw().len() + 1);
        space_required += 1; // Newline at end of headers
        if let Some(ref body) = self.body {
            space_required += body.len();
        }
        space_required += FRAME_END.len();
        space_required
    }

    pub fn to_str(&self) -> String {
        let space_required = self.count_bytes();
        let mut frame_string = String::with_capacity(space_required);
        frame_string.push_str(self.command.as_str());
        frame_string.push_str("\n");
        for header in self.headers.iter() {
            frame_string.push_str(&header.get_raw());
            frame_string.push_str("\n");
        }
        frame_string.push_str("\n");
        if let Some(ref body) = self.body {
            match from_utf8(body) {
                Ok(s) => frame_string.push_str(s),
                Err(_) => frame_string.push_str("<binary content>"),
            }
        }
        frame_string
    }

    pub fn write(&self, out: &mut BytesMut) {
        debug!("Writing frame:\n{}", self.to_str());
        out.extend(self.command.as_str().as_bytes());
        out.extend(LINE_END);

        for header in self.headers.iter() {
            out.extend(header.get_raw().as_bytes());
            out.extend(LINE_END);
        }

        out.extend(LINE_END);
        if let Some(ref body) = self.body {
            out.extend(body.iter());
        }

        out.extend(FRAME_END);
    }

    pub fn encode(&self) -> Bytes {
        let mut out = BytesMut::with_capacity(self.count_bytes());
        self.write(&mut out);
        out.freeze()
    }
}

#[test]
fn count_bytes_matches_encoded_length() {
    let frame = Frame {
        command: Command::Send,
        headers: crate::header_list![
            "destination" => "/queue/a",
            "content-length" => "5"
        ],
        body: Some(b"hello".to_vec()),
    };
    assert_eq!(frame.count_bytes(), frame.encode().len());
}

#[test]
fn headerless_frame_keeps_separator_and_terminator() {
    let frame = Frame {
        command: Command::Begin,
        headers: crate::header_list![],
        body: None,
    };
    assert_eq!(&frame.encode()[..], &b"BEGIN\n\n\x00\n"[..]);
}

#[test]
fn empty_body_emits_empty_segment() {
    let frame = Frame {
        command: Command::Send,
        headers: crate::header_list!["destination" => "/queue/a"],
        body: Some(Vec::new()),
    };
    assert_eq!(&frame.encode()[..], &b"SEND\ndestination:/queue/a\n\n\x00\n"[..]);
}

#[test]
fn binary_body_renders_as_placeholder() {
    let frame = Frame {
        command: Command::Send,
        headers: crate::header_list![],
        body: Some(vec![0xff, 0xfe]),
    };
    assert!(frame.to_str().ends_with("<binary content>"));
}

#[test]
fn server_commands_are_recognized() {
    assert_eq!(Command::from_server_command("MESSAGE"), Some(Command::Message));
    assert_eq!(Command::from_server_command("SEND"), None);
    assert_eq!(Command::from_server_command(""), None);
}

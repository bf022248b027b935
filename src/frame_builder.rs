use bytes::Bytes;

use crate::frame::{Command, Frame, ToFrameBody, SUPPORTED_VERSIONS};
use crate::header::{Header, HeaderList};
use crate::header_list;
use crate::subscription::AckMode;

/// Whether `content-length` is injected for body-bearing frames. `Always`
/// sets it to the exact byte length of the body as serialized; `Never`
/// leaves the header entirely to the caller.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContentLengthPolicy {
    Always,
    Never,
}

impl Default for ContentLengthPolicy {
    fn default() -> ContentLengthPolicy {
        ContentLengthPolicy::Always
    }
}

/// Builds client frames and returns their wire bytes.
///
/// A builder accumulates headers and a body across its mutator calls; each
/// command method applies that command's header policy and returns the
/// fully serialized frame. Use one builder (or freshly replaced state) per
/// frame stream — the builder carries no synchronization and header state
/// bleeds between unrelated frames otherwise.
pub struct FrameBuilder {
    headers: HeaderList,
    body: Option<Vec<u8>>,
    content_length: ContentLengthPolicy,
}

impl Default for FrameBuilder {
    fn default() -> FrameBuilder {
        FrameBuilder::new()
    }
}

impl FrameBuilder {
    /// Starts from the default header set every connection opens with.
    pub fn new() -> FrameBuilder {
        FrameBuilder {
            headers: header_list![
                "accept-version" => SUPPORTED_VERSIONS,
                "heart-beat" => "0,0"
            ],
            body: None,
            content_length: ContentLengthPolicy::default(),
        }
    }

    pub fn content_length_policy(&mut self, policy: ContentLengthPolicy) -> &mut FrameBuilder {
        self.content_length = policy;
        self
    }

    /// Credentials travel as plain `login`/`passcode` headers; that is the
    /// protocol's own CONNECT semantics.
    pub fn set_login(&mut self, login: &str, passcode: &str) -> &mut FrameBuilder {
        self.headers.set(Header::new("login", login));
        self.headers.set(Header::new("passcode", passcode));
        self
    }

    pub fn set_heart_beat(&mut self, outgoing: u32, incoming: u32) -> &mut FrameBuilder {
        self.headers
            .set(Header::new("heart-beat", format!("{},{}", outgoing, incoming)));
        self
    }

    pub fn set_body<T: ToFrameBody>(&mut self, body: T) -> &mut FrameBuilder {
        self.body = Some(body.to_frame_body().to_vec());
        self
    }

    pub fn set_header(&mut self, key: &str, value: &str) -> &mut FrameBuilder {
        self.headers.set(Header::new(key, value));
        self
    }

    /// Key-wise overwrite-or-append into the current header set.
    pub fn merge_headers(&mut self, headers: HeaderList) -> &mut FrameBuilder {
        for header in headers.iter() {
            self.headers.set(header.clone());
        }
        self
    }

    /// Discards the current header set entirely. An empty list is honored:
    /// the resulting frame has no header lines, only the blank separator
    /// and the terminator.
    pub fn replace_headers(&mut self, headers: HeaderList) -> &mut FrameBuilder {
        self.headers = headers;
        self
    }

    pub fn connect(&mut self) -> Bytes {
        self.render(Command::Connect)
    }

    pub fn subscribe(&mut self, destination: &str, id: &str, ack: AckMode) -> Bytes {
        self.replace_headers(header_list![
            "id" => id,
            "ack" => ack.as_text(),
            "destination" => destination
        ]);
        self.render(Command::Subscribe)
    }

    pub fn unsubscribe(&mut self, id: &str) -> Bytes {
        self.replace_headers(header_list!["id" => id]);
        self.render(Command::Unsubscribe)
    }

    /// An empty `content_type` suppresses the `content-type` header.
    /// `Some(body)` overrides any body set earlier; `None` leaves it as-is,
    /// so "no override" and "override with an empty body" stay distinct.
    pub fn send(&mut self, destination: &str, content_type: &str, body: Option<&[u8]>) -> Bytes {
        self.replace_headers(header_list!["destination" => destination]);
        if !content_type.is_empty() {
            self.headers.set(Header::new("content-type", content_type));
        }
        if let Some(body) = body {
            self.body = Some(body.to_vec());
        }
        self.render(Command::Send)
    }

    pub fn send_text(&mut self, destination: &str, body: &str) -> Bytes {
        self.send(destination, "text/plain", Some(body.as_bytes()))
    }

    pub fn ack(&mut self, id: &str, transaction: Option<&str>) -> Bytes {
        self.replace_headers(header_list!["id" => id]);
        if let Some(transaction) = transaction {
            self.headers.set(Header::new("transaction", transaction));
        }
        self.render(Command::Ack)
    }

    pub fn nack(&mut self, id: &str, transaction: Option<&str>) -> Bytes {
        self.replace_headers(header_list!["id" => id]);
        if let Some(transaction) = transaction {
            self.headers.set(Header::new("transaction", transaction));
        }
        self.render(Command::Nack)
    }

    pub fn begin(&mut self, transaction: Option<&str>) -> Bytes {
        if let Some(transaction) = transaction {
            self.replace_headers(header_list!["transaction" => transaction]);
        }
        self.render(Command::Begin)
    }

    pub fn commit(&mut self, transaction: Option<&str>) -> Bytes {
        if let Some(transaction) = transaction {
            self.replace_headers(header_list!["transaction" => transaction]);
        }
        self.render(Command::Commit)
    }

    pub fn abort(&mut self, transaction: Option<&str>) -> Bytes {
        if let Some(transaction) = transaction {
            self.replace_headers(header_list!["transaction" => transaction]);
        }
        self.render(Command::Abort)
    }

    pub fn disconnect(&mut self, receipt: Option<&str>) -> Bytes {
        if let Some(receipt) = receipt {
            self.replace_headers(header_list!["receipt" => receipt]);
        }
        self.render(Command::Disconnect)
    }

    // content-length has to land in the header set before any header line is
    // emitted, so it is merged here rather than during serialization.
    fn render(&mut self, command: Command) -> Bytes {
        if let (ContentLengthPolicy::Always, Some(body)) = (self.content_length, self.body.as_ref())
        {
            self.headers
                .set(Header::new("content-length", body.len().to_string()));
        }
        let frame = Frame {
            command,
            headers: self.headers.clone(),
            body: self.body.clone(),
        };
        frame.encode()
    }
}

#[test]
fn connect_uses_default_headers() {
    let frame = FrameBuilder::new().connect();
    assert_eq!(
        &frame[..],
        &b"CONNECT\naccept-version:1.0,1.1,1.2\nheart-beat:0,0\n\n\x00\n"[..]
    );
}

#[test]
fn connect_merges_credentials_and_heart_beat() {
    let mut builder = FrameBuilder::new();
    builder.set_login("guest", "guest").set_heart_beat(5000, 10000);
    let frame = builder.connect();
    assert_eq!(
        &frame[..],
        &b"CONNECT\naccept-version:1.0,1.1,1.2\nheart-beat:5000,10000\nlogin:guest\npasscode:guest\n\n\x00\n"[..]
    );
}

#[test]
fn subscribe_replaces_headers() {
    let mut builder = FrameBuilder::new();
    builder.set_login("guest", "guest");
    let frame = builder.subscribe("/queue/a", "sub-0", AckMode::Auto);
    assert_eq!(
        &frame[..],
        &b"SUBSCRIBE\nid:sub-0\nack:auto\ndestination:/queue/a\n\n\x00\n"[..]
    );
}

#[test]
fn unsubscribe_keeps_only_id() {
    let frame = FrameBuilder::new().unsubscribe("sub-0");
    assert_eq!(&frame[..], &b"UNSUBSCRIBE\nid:sub-0\n\n\x00\n"[..]);
}

#[test]
fn send_injects_content_length_before_body() {
    let frame = FrameBuilder::new().send("/queue/a", "text/plain", Some(b"hello"));
    assert_eq!(
        &frame[..],
        &b"SEND\ndestination:/queue/a\ncontent-type:text/plain\ncontent-length:5\n\nhello\x00\n"[..]
    );
}

#[test]
fn send_empty_content_type_suppresses_header() {
    let frame = FrameBuilder::new().send("/queue/a", "", Some(b"hello"));
    assert_eq!(
        &frame[..],
        &b"SEND\ndestination:/queue/a\ncontent-length:5\n\nhello\x00\n"[..]
    );
}

#[test]
fn send_empty_body_override_is_a_present_body() {
    let frame = FrameBuilder::new().send("/queue/a", "", Some(b""));
    assert_eq!(
        &frame[..],
        &b"SEND\ndestination:/queue/a\ncontent-length:0\n\n\x00\n"[..]
    );
}

#[test]
fn send_without_override_has_no_body_segment() {
    let frame = FrameBuilder::new().send("/queue/a", "", None);
    assert_eq!(&frame[..], &b"SEND\ndestination:/queue/a\n\n\x00\n"[..]);
}

#[test]
fn send_none_keeps_previously_set_body() {
    let mut builder = FrameBuilder::new();
    builder.set_body("earlier");
    let frame = builder.send("/queue/a", "", None);
    assert_eq!(
        &frame[..],
        &b"SEND\ndestination:/queue/a\ncontent-length:7\n\nearlier\x00\n"[..]
    );
}

#[test]
fn content_length_policy_never() {
    let mut builder = FrameBuilder::new();
    builder.content_length_policy(ContentLengthPolicy::Never);
    let frame = builder.send("/queue/a", "", Some(b"hello"));
    assert_eq!(&frame[..], &b"SEND\ndestination:/queue/a\n\nhello\x00\n"[..]);
}

#[test]
fn ack_appends_transaction_only_when_provided() {
    let mut builder = FrameBuilder::new();
    let frame = builder.ack("msg-5", None);
    assert_eq!(&frame[..], &b"ACK\nid:msg-5\n\n\x00\n"[..]);

    let frame = builder.ack("msg-5", Some("tx-1"));
    assert_eq!(&frame[..], &b"ACK\nid:msg-5\ntransaction:tx-1\n\n\x00\n"[..]);
}

#[test]
fn nack_mirrors_ack() {
    let frame = FrameBuilder::new().nack("msg-5", Some("tx-1"));
    assert_eq!(&frame[..], &b"NACK\nid:msg-5\ntransaction:tx-1\n\n\x00\n"[..]);
}

#[test]
fn begin_without_transaction_leaves_headers_untouched() {
    let frame = FrameBuilder::new().begin(None);
    assert_eq!(
        &frame[..],
        &b"BEGIN\naccept-version:1.0,1.1,1.2\nheart-beat:0,0\n\n\x00\n"[..]
    );
}

#[test]
fn transaction_commands_replace_with_transaction_header() {
    let frame = FrameBuilder::new().begin(Some("tx-1"));
    assert_eq!(&frame[..], &b"BEGIN\ntransaction:tx-1\n\n\x00\n"[..]);

    let frame = FrameBuilder::new().commit(Some("tx-1"));
    assert_eq!(&frame[..], &b"COMMIT\ntransaction:tx-1\n\n\x00\n"[..]);

    let frame = FrameBuilder::new().abort(Some("tx-1"));
    assert_eq!(&frame[..], &b"ABORT\ntransaction:tx-1\n\n\x00\n"[..]);
}

#[test]
fn disconnect_with_receipt() {
    let frame = FrameBuilder::new().disconnect(Some("receipt-7"));
    assert_eq!(&frame[..], &b"DISCONNECT\nreceipt:receipt-7\n\n\x00\n"[..]);

    let frame = FrameBuilder::new().disconnect(None);
    assert_eq!(
        &frame[..],
        &b"DISCONNECT\naccept-version:1.0,1.1,1.2\nheart-beat:0,0\n\n\x00\n"[..]
    );
}

#[test]
fn replace_with_empty_list_yields_headerless_frame() {
    let mut builder = FrameBuilder::new();
    builder.replace_headers(header_list![]);
    let frame = builder.connect();
    assert_eq!(&frame[..], &b"CONNECT\n\n\x00\n"[..]);
}

#[test]
fn merge_headers_overwrites_and_appends() {
    let mut builder = FrameBuilder::new();
    builder.merge_headers(header_list![
        "heart-beat" => "100,200",
        "receipt" => "r-1"
    ]);
    let frame = builder.connect();
    assert_eq!(
        &frame[..],
        &b"CONNECT\naccept-version:1.0,1.1,1.2\nheart-beat:100,200\nreceipt:r-1\n\n\x00\n"[..]
    );
}

#[test]
fn set_body_accepts_bytes_and_strings() {
    let mut builder = FrameBuilder::new();
    builder.content_length_policy(ContentLengthPolicy::Never);

    builder.set_body(&b"raw"[..]);
    let frame = builder.send("/queue/a", "", None);
    assert_eq!(&frame[..], &b"SEND\ndestination:/queue/a\n\nraw\x00\n"[..]);

    builder.set_body(String::from("owned"));
    let frame = builder.send("/queue/a", "", None);
    assert_eq!(&frame[..], &b"SEND\ndestination:/queue/a\n\nowned\x00\n"[..]);

    builder.set_body(vec![104, 105]);
    let frame = builder.send("/queue/a", "", None);
    assert_eq!(&frame[..], &b"SEND\ndestination:/queue/a\n\nhi\x00\n"[..]);
}

#[test]
fn repeated_encoding_is_byte_identical() {
    let mut builder = FrameBuilder::new();
    builder.set_body("hello");
    let first = builder.connect();
    let second = builder.connect();
    assert_eq!(first, second);

    let mut builder = FrameBuilder::new();
    let first = builder.send("/queue/a", "text/plain", Some(b"hello"));
    let second = builder.send("/queue/a", "text/plain", Some(b"hello"));
    assert_eq!(first, second);
}

// Non-camel case types are used for Stomp Protocol version enum variants
#![allow(non_camel_case_types)]
use std::slice::Iter;
use unicode_segmentation::UnicodeSegmentation;

// Ordered list rather than a map: serialization order is insertion order,
// and decoded frames keep wire order for inspection.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HeaderList {
    pub headers: Vec<Header>,
}

impl HeaderList {
    pub fn new() -> HeaderList {
        HeaderList::with_capacity(0)
    }

    pub fn with_capacity(capacity: usize) -> HeaderList {
        HeaderList {
            headers: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, header: Header) {
        self.headers.push(header);
    }

    /// Overwrites the value of the first header with a matching key, keeping
    /// its position; appends otherwise.
    pub fn set(&mut self, header: Header) {
        match self.headers.iter_mut().find(|h| h.get_key() == header.get_key()) {
            Some(existing) => existing.1 = header.1,
            None => self.headers.push(header),
        }
    }

    pub fn iter<'a>(&'a self) -> Iter<'a, Header> {
        self.headers.iter()
    }

    pub fn len(&self) -> usize {
        self.headers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Header(pub String, pub String);

impl Header {
    /// Stores key and value verbatim. Header strings are opaque to the codec;
    /// values containing colons or newlines are the caller's responsibility
    /// unless `encoded` is used.
    pub fn new<K: Into<String>, V: Into<String>>(key: K, value: V) -> Header {
        Header(key.into(), value.into())
    }

    /// Applies STOMP 1.2 escaping to both key and value.
    pub fn encoded(key: &str, value: &str) -> Header {
        Header(Self::encode_value(key), Self::encode_value(value))
    }

    pub fn get_raw(&self) -> String {
        format!("{}:{}", self.0, self.1)
    }

    pub fn encode_value(value: &str) -> String {
        let mut encoded = String::new();
        for grapheme in UnicodeSegmentation::graphemes(value, true) {
            match grapheme {
                "\\" => encoded.push_str(r"\\"), // Order is significant
                "\r" => encoded.push_str(r"\r"),
                "\n" => encoded.push_str(r"\n"),
                ":" => encoded.push_str(r"\c"),
                g => encoded.push_str(g),
            }
        }
        encoded
    }

    pub fn decode_value(value: &str) -> String {
        let mut decoded = String::new();
        let mut chars = value.chars();
        while let Some(c) = chars.next() {
            if c != '\\' {
                decoded.push(c);
                continue;
            }
            match chars.next() {
                Some('\\') => decoded.push('\\'),
                Some('r') => decoded.push('\r'),
                Some('n') => decoded.push('\n'),
                Some('c') => decoded.push(':'),
                other => {
                    warn!("Unrecognized escape sequence: \\{:?}", other);
                    decoded.push('\\');
                    if let Some(other) = other {
                        decoded.push(other);
                    }
                }
            }
        }
        decoded
    }

    pub fn get_key<'a>(&'a self) -> &'a str {
        &self.0
    }

    pub fn get_value<'a>(&'a self) -> &'a str {
        &self.1
    }
}

// Headers that appear on server frames
pub struct Ack<'a>(pub &'a str);
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ContentLength(pub u32);
pub struct Destination<'a>(pub &'a str);
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeartBeat(pub u32, pub u32);
pub struct MessageId<'a>(pub &'a str);
pub struct ReceiptId<'a>(pub &'a str);
pub struct Server<'a>(pub &'a str);
pub struct Session<'a>(pub &'a str);
pub struct Subscription<'a>(pub &'a str);
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Version(pub StompVersion);

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum StompVersion {
    Stomp_v1_0,
    Stomp_v1_1,
    Stomp_v1_2,
}

impl HeaderList {
    pub fn get_header<'a>(&'a self, key: &str) -> Option<&'a Header> {
        self.headers.iter().find(|header| header.get_key() == key)
    }

    pub fn get_ack<'a>(&'a self) -> Option<Ack<'a>> {
        match self.get_header("ack") {
            Some(h) => Some(Ack(h.get_value())),
            None => None,
        }
    }

    pub fn get_destination<'a>(&'a self) -> Option<Destination<'a>> {
        match self.get_header("destination") {
            Some(h) => Some(Destination(h.get_value())),
            None => None,
        }
    }

    pub fn get_heart_beat(&self) -> Option<HeartBeat> {
        let spec = match self.get_header("heart-beat") {
            Some(h) => h.get_value(),
            None => return None,
        };
        let spec_list: Vec<u32> = spec
            .split(',')
            .filter_map(|str_val| str_val.trim().parse::<u32>().ok())
            .collect();

        if spec_list.len() != 2 {
            return None;
        }
        Some(HeartBeat(spec_list[0], spec_list[1]))
    }

    pub fn get_message_id<'a>(&'a self) -> Option<MessageId<'a>> {
        match self.get_header("message-id") {
            Some(h) => Some(MessageId(h.get_value())),
            None => None,
        }
    }

    pub fn get_receipt_id<'a>(&'a self) -> Option<ReceiptId<'a>> {
        match self.get_header("receipt-id") {
            Some(h) => Some(ReceiptId(h.get_value())),
            None => None,
        }
    }

    pub fn get_server<'a>(&'a self) -> Option<Server<'a>> {
        match self.get_header("server") {
            Some(h) => Some(Server(h.get_value())),
            None => None,
        }
    }

    pub fn get_session<'a>(&'a self) -> Option<Session<'a>> {
        match self.get_header("session") {
            Some(h) => Some(Session(h.get_value())),
            None => None,
        }
    }

    pub fn get_subscription<'a>(&'a self) -> Option<Subscription<'a>> {
        match self.get_header("subscription") {
            Some(h) => Some(Subscription(h.get_value())),
            None => None,
        }
    }

    pub fn get_version(&self) -> Option<Version> {
        let version = match self.get_header("version") {
            Some(h) => h.get_value(),
            None => return None,
        };
        match version {
            "1.0" => Some(Version(StompVersion::Stomp_v1_0)),
            "1.1" => Some(Version(StompVersion::Stomp_v1_1)),
            "1.2" => Some(Version(StompVersion::Stomp_v1_2)),
            _ => None,
        }
    }

    pub fn get_content_length(&self) -> Option<ContentLength> {
        let length = match self.get_header("content-length") {
            Some(h) => h.get_value(),
            None => return None,
        };
        match length.parse::<u32>().ok() {
            Some(l) => Some(ContentLength(l)),
            None => None,
        }
    }
}

#[macro_export]
macro_rules! header_list [
  () => ($crate::header::HeaderList::new());
  ($($key:expr => $value: expr), *) => ({
    let mut header_list = $crate::header::HeaderList::new();
    $(header_list.push($crate::header::Header::new($key, $value));)*
    header_list
  })
];

#[test]
fn encode_return_carriage() {
    let unencoded = "Hello\rWorld";
    let encoded = r"Hello\rWorld";
    assert!(encoded == Header::encode_value(unencoded));
}

#[test]
fn encode_newline() {
    let unencoded = "Hello\nWorld";
    let encoded = r"Hello\nWorld";
    assert!(encoded == Header::encode_value(unencoded));
}

#[test]
fn encode_colon() {
    let unencoded = "Hello:World";
    let encoded = r"Hello\cWorld";
    assert!(encoded == Header::encode_value(unencoded));
}

#[test]
fn encode_slash() {
    let unencoded = r"Hello\World";
    let encoded = r"Hello\\World";
    assert!(encoded == Header::encode_value(unencoded));
}

#[test]
fn decode_reverses_encode() {
    let original = "a\\b:c\rd\ne";
    let encoded = Header::encode_value(original);
    assert_eq!(original, Header::decode_value(&encoded));
}

#[test]
fn encoded_header_escapes_both_parts() {
    let header = Header::encoded("time:stamp", "10:30");
    assert_eq!(header.get_raw(), r"time\cstamp:10\c30");
}

#[test]
fn set_overwrites_in_place() {
    let mut headers = header_list![
        "foo" => "1",
        "bar" => "2"
    ];
    headers.set(Header::new("foo", "3"));
    assert_eq!(headers.len(), 2);
    assert_eq!(headers.headers[0], Header::new("foo", "3"));
    assert_eq!(headers.headers[1], Header::new("bar", "2"));
}

#[test]
fn set_appends_new_keys() {
    let mut headers = header_list![];
    headers.set(Header::new("foo", "1"));
    assert_eq!(headers.get_header("foo").map(|h| h.get_value()), Some("1"));
}

#[test]
fn heart_beat_requires_two_fields() {
    let headers = header_list!["heart-beat" => "1000,2000"];
    assert_eq!(headers.get_heart_beat(), Some(HeartBeat(1000, 2000)));

    let headers = header_list!["heart-beat" => "1000"];
    assert_eq!(headers.get_heart_beat(), None);
}

#[test]
fn version_header_parses_known_versions() {
    let headers = header_list!["version" => "1.2"];
    assert_eq!(headers.get_version(), Some(Version(StompVersion::Stomp_v1_2)));

    let headers = header_list!["version" => "0.9"];
    assert_eq!(headers.get_version(), None);
}

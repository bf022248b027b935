use crate::error::{DecodeError, DecodeResult};
use crate::frame::{Command, Frame, FRAME_END, LINE_END};
use crate::header::{Header, HeaderList};

/// Decodes one complete server frame.
///
/// The input must already be delimited to a single frame, up to and
/// including the terminator; accumulating bytes across partial reads is the
/// transport's job. Frames are interpreted as UTF-8 (lossily — malformed
/// sequences in a body become replacement characters rather than a failure).
pub fn decode(message: &[u8]) -> DecodeResult<Frame> {
    if message.is_empty() || message == LINE_END || message == FRAME_END {
        return Err(DecodeError::EmptyFrame);
    }

    let text = String::from_utf8_lossy(message);
    let trimmed = text.trim_matches(|c: char| c.is_whitespace() || c == '\0');
    let lines: Vec<&str> = trimmed.split('\n').collect();

    let token = lines[0].trim();
    let command = match Command::from_server_command(token) {
        Some(command) => command,
        None => {
            return Err(DecodeError::UnrecognizedCommand {
                command: token.to_string(),
                frame: text.to_string(),
            })
        }
    };

    let mut headers = HeaderList::with_capacity(lines.len().saturating_sub(2));
    let mut i = 1;
    while i < lines.len() && !lines[i].is_empty() {
        // Later duplicates overwrite the earlier value in place.
        headers.set(split_header_line(lines[i]));
        i += 1;
    }

    // The line after the blank separator. Stripping the terminator can leave
    // nothing, which decodes as "no body" rather than an empty one.
    let body = match lines.get(i + 1) {
        Some(line) => {
            let stripped = line.trim_end_matches(|c: char| c == '\0' || c == '\n');
            if stripped.is_empty() {
                None
            } else {
                Some(stripped.as_bytes().to_vec())
            }
        }
        None => None,
    };

    debug!("Decoded {} frame with {} headers", command, headers.len());
    Ok(Frame {
        command,
        headers,
        body,
    })
}

// The first colon separates key from value; colons embedded in the value
// survive. A line without a colon becomes a header with an empty value.
fn split_header_line(line: &str) -> Header {
    match line.find(':') {
        Some(idx) => Header::new(&line[..idx], &line[idx + 1..]),
        None => Header::new(line, ""),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::header_list;

    #[test]
    fn decodes_connected_frame() {
        let frame = decode(b"CONNECTED\nversion:1.2\n\n\x00\n").unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.headers, header_list!["version" => "1.2"]);
        assert_eq!(frame.body, None);
    }

    #[test]
    fn decodes_message_frame_with_body() {
        let frame = decode(b"MESSAGE\ndestination:/queue/a\nmessage-id:5\n\nhello\x00\n").unwrap();
        assert_eq!(frame.command, Command::Message);
        assert_eq!(
            frame.headers,
            header_list![
                "destination" => "/queue/a",
                "message-id" => "5"
            ]
        );
        assert_eq!(frame.body, Some(b"hello".to_vec()));
    }

    #[test]
    fn empty_input_is_rejected() {
        assert_eq!(decode(b""), Err(DecodeError::EmptyFrame));
    }

    #[test]
    fn bare_terminators_are_rejected() {
        assert_eq!(decode(b"\n"), Err(DecodeError::EmptyFrame));
        assert_eq!(decode(b"\x00\n"), Err(DecodeError::EmptyFrame));
    }

    #[test]
    fn unknown_command_is_rejected_with_diagnostics() {
        match decode(b"FOO\n\n\x00\n") {
            Err(DecodeError::UnrecognizedCommand { command, frame }) => {
                assert_eq!(command, "FOO");
                assert!(frame.starts_with("FOO\n"));
            }
            other => panic!("expected UnrecognizedCommand, got {:?}", other),
        }
    }

    #[test]
    fn client_commands_are_not_valid_server_frames() {
        assert!(matches!(
            decode(b"SEND\ndestination:/queue/a\n\nhello\x00\n"),
            Err(DecodeError::UnrecognizedCommand { .. })
        ));
    }

    #[test]
    fn header_values_keep_embedded_colons() {
        let frame = decode(b"MESSAGE\ntimestamp:2024-01-01T00:00:00\n\n\x00\n").unwrap();
        assert_eq!(
            frame.headers.get_header("timestamp").map(|h| h.get_value()),
            Some("2024-01-01T00:00:00")
        );
    }

    #[test]
    fn header_line_without_colon_gets_empty_value() {
        let frame = decode(b"MESSAGE\nflag\n\n\x00\n").unwrap();
        assert_eq!(
            frame.headers.get_header("flag").map(|h| h.get_value()),
            Some("")
        );
    }

    #[test]
    fn duplicate_headers_overwrite_in_place() {
        let frame = decode(b"MESSAGE\nfoo:1\nbar:2\nfoo:3\n\n\x00\n").unwrap();
        assert_eq!(
            frame.headers,
            header_list![
                "foo" => "3",
                "bar" => "2"
            ]
        );
    }

    #[test]
    fn empty_body_segment_decodes_as_no_body() {
        let frame = decode(b"RECEIPT\nreceipt-id:77\n\n\x00\n").unwrap();
        assert_eq!(frame.body, None);
    }

    #[test]
    fn surrounding_whitespace_is_tolerated() {
        let frame = decode(b"\n  CONNECTED\nversion:1.1\n\n\x00\n  ").unwrap();
        assert_eq!(frame.command, Command::Connected);
        assert_eq!(frame.headers, header_list!["version" => "1.1"]);
    }

    #[test]
    fn frame_without_headers_decodes() {
        let frame = decode(b"ERROR\n\nmalformed frame received\x00\n").unwrap();
        assert_eq!(frame.command, Command::Error);
        assert!(frame.headers.is_empty());
        assert_eq!(frame.body, Some(b"malformed frame received".to_vec()));
    }
}

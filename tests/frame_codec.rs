//! Integration tests exercising the encode and decode directions together.

use stomp_codec::codec;
use stomp_codec::frame::{Command, Frame};
use stomp_codec::frame_builder::{ContentLengthPolicy, FrameBuilder};
use stomp_codec::header::{
    Ack, ContentLength, Destination, HeartBeat, MessageId, ReceiptId, Server, Session,
    StompVersion, Subscription, Version,
};
use stomp_codec::header_list;
use stomp_codec::subscription::AckMode;

/// Every client command renders as one command line, a header block, one
/// blank separator, an optional body, and the terminator.
#[test]
fn client_frames_share_the_wire_shape() {
    let mut with_body = FrameBuilder::new();
    with_body.content_length_policy(ContentLengthPolicy::Never);

    let frames = vec![
        FrameBuilder::new().connect(),
        FrameBuilder::new().subscribe("/queue/a", "sub-0", AckMode::ClientIndividual),
        FrameBuilder::new().unsubscribe("sub-0"),
        with_body.send("/queue/a", "text/plain", Some(b"hello")),
        FrameBuilder::new().ack("msg-1", None),
        FrameBuilder::new().nack("msg-2", Some("tx-9")),
        FrameBuilder::new().begin(Some("tx-9")),
        FrameBuilder::new().commit(Some("tx-9")),
        FrameBuilder::new().abort(Some("tx-9")),
        FrameBuilder::new().disconnect(Some("bye-1")),
    ];

    for encoded in frames {
        let text = std::str::from_utf8(&encoded).unwrap();
        assert!(text.ends_with("\x00\n"), "missing terminator: {:?}", text);

        let sections: Vec<&str> = text.splitn(2, "\n\n").collect();
        assert_eq!(sections.len(), 2, "missing blank separator: {:?}", text);

        let mut lines = sections[0].lines();
        let command = lines.next().unwrap();
        assert!(
            command.chars().all(|c| c.is_ascii_uppercase()),
            "bad command line: {:?}",
            command
        );
        for header in lines {
            assert!(header.contains(':'), "bad header line: {:?}", header);
        }
    }
}

#[test]
fn connected_frame_typed_accessors() {
    let frame = codec::decode(
        b"CONNECTED\nversion:1.2\nheart-beat:0,0\nsession:session-1\nserver:ActiveMQ/6.1\n\n\x00\n",
    )
    .unwrap();

    assert_eq!(frame.command, Command::Connected);
    assert_eq!(
        frame.headers.get_version(),
        Some(Version(StompVersion::Stomp_v1_2))
    );
    assert_eq!(frame.headers.get_heart_beat(), Some(HeartBeat(0, 0)));
    let Session(session) = frame.headers.get_session().unwrap();
    assert_eq!(session, "session-1");
    let Server(server) = frame.headers.get_server().unwrap();
    assert_eq!(server, "ActiveMQ/6.1");
}

#[test]
fn message_frame_typed_accessors() {
    let frame = codec::decode(
        b"MESSAGE\nsubscription:sub-0\nmessage-id:5\ndestination:/queue/a\nack:ack-5\ncontent-length:5\n\nhello\x00\n",
    )
    .unwrap();

    let Destination(destination) = frame.headers.get_destination().unwrap();
    assert_eq!(destination, "/queue/a");
    let MessageId(message_id) = frame.headers.get_message_id().unwrap();
    assert_eq!(message_id, "5");
    let Subscription(subscription) = frame.headers.get_subscription().unwrap();
    assert_eq!(subscription, "sub-0");
    let Ack(ack) = frame.headers.get_ack().unwrap();
    assert_eq!(ack, "ack-5");
    assert_eq!(frame.headers.get_content_length(), Some(ContentLength(5)));
    assert_eq!(frame.body.as_deref(), Some(&b"hello"[..]));
}

#[test]
fn receipt_frame_answers_disconnect() {
    let disconnect = FrameBuilder::new().disconnect(Some("disconnect-1"));
    assert_eq!(
        &disconnect[..],
        &b"DISCONNECT\nreceipt:disconnect-1\n\n\x00\n"[..]
    );

    let frame = codec::decode(b"RECEIPT\nreceipt-id:disconnect-1\n\n\x00\n").unwrap();
    assert_eq!(frame.command, Command::Receipt);
    let ReceiptId(receipt_id) = frame.headers.get_receipt_id().unwrap();
    assert_eq!(receipt_id, "disconnect-1");
}

#[test]
fn subscribe_then_transaction_flow() {
    let subscribe = FrameBuilder::new().subscribe("/queue/a", "sub-0", AckMode::Client);
    assert_eq!(
        &subscribe[..],
        &b"SUBSCRIBE\nid:sub-0\nack:client\ndestination:/queue/a\n\n\x00\n"[..]
    );

    let begin = FrameBuilder::new().begin(Some("tx-1"));
    let ack = FrameBuilder::new().ack("msg-5", Some("tx-1"));
    let commit = FrameBuilder::new().commit(Some("tx-1"));
    assert_eq!(&begin[..], &b"BEGIN\ntransaction:tx-1\n\n\x00\n"[..]);
    assert_eq!(&ack[..], &b"ACK\nid:msg-5\ntransaction:tx-1\n\n\x00\n"[..]);
    assert_eq!(&commit[..], &b"COMMIT\ntransaction:tx-1\n\n\x00\n"[..]);
}

#[test]
fn decoded_server_frame_reencodes_identically() {
    let wire = b"MESSAGE\ndestination:/queue/a\nmessage-id:5\n\nhello\x00\n";
    let frame = codec::decode(wire).unwrap();
    assert_eq!(&frame.encode()[..], &wire[..]);
}

#[test]
fn frame_display_renders_without_terminator() {
    let frame = Frame {
        command: Command::Message,
        headers: header_list!["destination" => "/queue/a"],
        body: Some(b"hello".to_vec()),
    };
    assert_eq!(frame.to_str(), "MESSAGE\ndestination:/queue/a\n\nhello");
    assert_eq!(format!("{}", frame), frame.to_str());
}

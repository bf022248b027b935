// Subscription bookkeeping across frames belongs to the session layer; the
// codec only needs the ack modes a SUBSCRIBE frame can carry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum AckMode {
    Auto,
    Client,
    ClientIndividual,
}

impl AckMode {
    pub fn as_text(&self) -> &'static str {
        match *self {
            AckMode::Auto => "auto",
            AckMode::Client => "client",
            AckMode::ClientIndividual => "client-individual",
        }
    }
}

impl Default for AckMode {
    fn default() -> AckMode {
        AckMode::Auto
    }
}

#[test]
fn ack_mode_wire_text() {
    assert_eq!(AckMode::Auto.as_text(), "auto");
    assert_eq!(AckMode::Client.as_text(), "client");
    assert_eq!(AckMode::ClientIndividual.as_text(), "client-individual");
    assert_eq!(AckMode::default(), AckMode::Auto);
}

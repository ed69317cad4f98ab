//! Outgoing message type.

/// A plain-text message ready for delivery.
///
/// Header values are kept apart from the body so the transport encodes each
/// header itself; nothing here is joined into a raw header block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    /// Envelope sender and `From` header.
    pub from: String,
    pub to: String,
    pub reply_to: String,
    pub subject: String,
    pub body: String,
}

impl OutgoingMail {
    /// Create a message whose sender and reply address are the recipient.
    pub fn new(to: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        let to = to.into();
        Self {
            from: to.clone(),
            reply_to: to.clone(),
            to,
            subject: subject.into(),
            body: body.into(),
        }
    }

    /// Override the sender address.
    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }
}

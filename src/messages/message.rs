use std::fmt;

/// Identifier of one message type, used to resolve inbound packets to the
/// handlers registered for them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MessageKind(u16);

impl MessageKind {
    pub fn to_u16(self) -> u16 {
        self.0
    }
}

impl From<u16> for MessageKind {
    fn from(value: u16) -> Self {
        MessageKind(value)
    }
}

impl fmt::Display for MessageKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A typed payload buffer. Created zero-initialized by the transport;
/// ownership transfers to the caller until the buffer is handed to a send
/// operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageBuffer {
    kind: MessageKind,
    payload: Vec<u8>,
}

impl MessageBuffer {
    pub fn new(kind: MessageKind) -> Self {
        Self {
            kind,
            payload: Vec::new(),
        }
    }

    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }
}

/// Server-side fixed index representing one potential remote client
/// connection.
pub type ConnectionSlot = u16;

mod callbacks;
mod message;

pub use callbacks::{CallbackRegistry, ClientHandler, Dispatch, HandlerHandle, ServerHandler};
pub use message::{MessageBuffer, MessageKind};

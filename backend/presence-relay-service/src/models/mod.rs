pub mod message;

pub use message::{Document, Message, NewMessage};

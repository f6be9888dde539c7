//! Primitive types for the reward router redeemer.

pub use block::BlockRange;
mod block;

pub use event::RoutingEvent;
mod event;

pub use family::ProtocolFamily;
mod family;

pub use message::{ArbitrumMessage, MessagePayload, OpStackReceipt, OutboundMessage, Withdrawal};
mod message;

pub use state::MessageState;
mod state;

pub use watermark::Watermark;
mod watermark;

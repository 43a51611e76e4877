//! Network receive path: wire codec, session lifecycle, receive loop

pub mod identity;
pub mod packet;
pub mod receiver;
pub mod session;

pub use identity::{HostIdentity, LocalHostIdentity};
pub use packet::{InputPacket, MAGIC, PACKET_SIZE};
pub use receiver::{PacketReceiver, PollOutcome};
pub use session::{SessionManager, SessionTiming};

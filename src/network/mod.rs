//! Network Layer: UDP command channel
//!
//! Satu connectionless socket di well-known port, satu dedicated thread
//! untuk receive-and-dispatch. Tidak ada connection state, tidak ada
//! response ke sender.

mod listener;
mod socket;

pub use listener::{Listener, ShutdownHandle, THREAD_NAME};
pub use socket::{open_bind, set_recv_buffer};

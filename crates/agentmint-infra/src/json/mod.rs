//! Single-document JSON storage.
//!
//! The whole catalog (agents, their inlined NFT, and each agent's sale
//! history) lives in one JSON file that is rewritten atomically on every
//! change. Every mutation holds one `tokio::sync::Mutex` for its full
//! load-modify-save cycle, which is what makes a purchase atomic here.

pub mod store;

//! Session-scoped conversation storage.
//!
//! - `ConversationStore`: session id -> ordered transcript, with
//!   start / append / read

pub mod store;

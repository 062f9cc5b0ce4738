pub mod layout;
pub mod encoding;
pub mod sample;
pub mod classify;
pub mod store;
pub mod transcode;
pub mod pipeline;

#[cfg(test)]
pub(crate) mod testutil;

pub use encoding::EncodingName;
pub use layout::{parse_layout, DbfLayout, LayoutError};
pub use pipeline::{recode_bundle, FailurePolicy, Outcome, RecodeOptions, UnchangedReason};
pub use store::{EntryStore, MemoryStore};
pub use transcode::{transcode, TranscodeStats};

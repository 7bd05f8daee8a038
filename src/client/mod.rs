//! Client for the remote AI-authorship detection service.

mod chunker;
mod detection;
mod response;

pub use chunker::{split_by_word_limit, ChunkedDetector};
pub use detection::{DetectionClient, DetectorConfig};
pub use response::{classify_reply, normalize, PollReply, RemoteScores};

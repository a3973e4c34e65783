//! Playback assembly
//!
//! Turns the fragments of a finished session into a single blob with an
//! object URL for the playback element and download link.

mod artifact;
mod assembler;

pub use artifact::{Download, RecordedArtifact};
pub use assembler::{default_filename, extension_for, object_url, PlaybackAssembler, OBJECT_URL_PREFIX};

//! Output orchestration core for clipsplit.
//!
//! This crate owns everything between the HTTP boundary and the
//! external transcoder:
//! - Run workspace allocation under the output root
//! - Source acquisition (upload relocation, remote download)
//! - Transcoder invocation with captured diagnostics
//! - Artifact normalization into the stable `clip_<i>` scheme
//! - Zip archive streaming over the latest workspace
//! - Clip registry operations (delete, rename, merge, thumbnail)
//!
//! All state is derived from the filesystem layout at request time.

pub mod acquire;
pub mod archive;
pub mod config;
pub mod download;
pub mod error;
pub mod fs_utils;
pub mod merge;
pub mod normalize;
pub mod pipeline;
pub mod probe;
pub mod registry;
pub mod thumbnail;
pub mod transcode;
pub mod workspace;

pub use acquire::{acquire, Source};
pub use archive::{stream_latest_archive, ArchiveEvent};
pub use config::MediaConfig;
pub use error::{MediaError, MediaResult};
pub use merge::merge_clips;
pub use normalize::{normalize, settle_and_normalize};
pub use pipeline::run_process;
pub use probe::probe_duration;
pub use registry::{delete_clip, rename_clip, resolve_clip_path};
pub use thumbnail::generate_thumbnail;
pub use workspace::{allocate, latest_run};

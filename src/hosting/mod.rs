//! Package hosting channels (anaconda.org, formerly binstar).
//!
//! Uploads go through the `binstar` CLI shipped with miniconda; channel
//! listings and deletions use the HTTP API behind [`HostingApi`].

mod client;
mod uploader;

pub use client::{AnacondaClient, DEFAULT_API_URL};
pub use uploader::{
    UploadOutcome, Uploader, purge_old_files, resolve_channel, upload_file,
};

use crate::artifact::ArtifactRecord;
use crate::error::Result;
use std::future::Future;

/// Remote operations needed for retention
pub trait HostingApi {
    /// Hosted identifiers of every file on `user`'s `channel`
    fn channel_files(&self, user: &str, channel: &str) -> impl Future<Output = Result<Vec<String>>>;

    /// Delete one hosted file
    fn remove_file(&self, record: &ArtifactRecord) -> impl Future<Output = Result<()>>;
}

//! # condaci
//!
//! Release automation for conda packages built on Travis CI and AppVeyor.
//!
//! A single binary provisions miniconda, builds a recipe with the checkout's
//! version exported, and routes the resulting package to a hosting channel:
//! tagged releases go to `main`, everything else to a channel named after the
//! CI branch. Non-main channels keep only the newest dev build per platform
//! and configuration of the current release line.
//!
//! ## Usage
//!
//! ```bash
//! condaci setup 2.7                  # install miniconda with conda-build
//! condaci build conda                # build the recipe in ./conda
//! condaci auto conda                 # build, upload and purge
//! condaci version                    # print the resolved version
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod artifact;
pub mod ci;
pub mod cli;
pub mod conda;
pub mod config;
pub mod error;
pub mod hosting;
pub mod platform;
pub mod process;
pub mod publish;
pub mod retention;
pub mod version;

pub use artifact::{ArtifactRecord, LocalArtifact};
pub use ci::{CiContext, CiProvider};
pub use cli::Args;
pub use conda::Miniconda;
pub use config::{CondaciConfig, EnvConfig, HostingConfig, PypiConfig};
pub use error::{CondaciError, Result};
pub use hosting::{AnacondaClient, HostingApi, UploadOutcome, Uploader};
pub use platform::{Arch, Host, HostPlatform};
pub use publish::PypiPublisher;
pub use retention::{Channel, RetentionPolicy};
pub use version::{ReleaseKind, Version, VersionResolver};

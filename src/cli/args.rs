//! Command line argument parsing and validation.
//!
//! Every CI secret can also come from the environment, so `.travis.yml` and
//! `appveyor.yml` only need `condaci auto conda`.

use crate::config::{CondaciConfig, EnvConfig, HostingConfig, PypiConfig};
use crate::conda::PythonVersion;
use crate::error::CliError;
use crate::hosting::DEFAULT_API_URL;
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

/// Sets up miniconda, builds, and uploads to Binstar and PyPI
#[derive(Parser, Debug)]
#[command(
    name = "condaci",
    version,
    about = "Sets up miniconda, builds, and uploads to Binstar and PyPI",
    long_about = "CI release helper for conda packages.

Usage:
  condaci setup 2.7
  condaci build conda
  condaci auto conda --binstaruser acme --binstarkey $BINSTAR_KEY
  condaci version"
)]
pub struct Args {
    /// Command to run
    #[command(subcommand)]
    pub command: Command,

    /// Show verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress progress output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

/// Location of the miniconda installation
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct MinicondaArgs {
    /// Directory that miniconda is installed in (defaults to ~/miniconda or C:\Miniconda)
    #[arg(short, long, env = "CONDACI_MINICONDA")]
    pub miniconda: Option<PathBuf>,
}

/// Recipe directory
#[derive(ClapArgs, Debug, Clone)]
pub struct BuildPathArgs {
    /// Path to the conda build scripts
    #[arg(value_name = "BUILDPATH")]
    pub buildpath: PathBuf,
}

/// Hosting channel options
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct BinstarArgs {
    /// Binstar user (or organisation) to upload to
    #[arg(long, env = "BINSTAR_USER")]
    pub binstaruser: Option<String>,

    /// Binstar channel to upload to. If not provided will be calculated based on the environment
    #[arg(long, env = "BINSTAR_CHANNEL")]
    pub binstarchannel: Option<String>,

    /// Binstar API key to use for uploading
    #[arg(long, env = "BINSTAR_KEY", hide_env_values = true)]
    pub binstarkey: Option<String>,

    /// Hosting API base URL
    #[arg(long, env = "BINSTAR_API_URL", default_value = DEFAULT_API_URL, hide = true)]
    pub binstarapi: String,
}

/// Package index options
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct PypiArgs {
    /// PyPI user to upload to
    #[arg(long, env = "PYPI_USER")]
    pub pypiuser: Option<String>,

    /// Password of PyPI user
    #[arg(long, env = "PYPI_PASSWORD", hide_env_values = true)]
    pub pypipassword: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Setup a miniconda environment
    Setup {
        /// Python version of the miniconda install
        #[arg(value_enum)]
        python: PythonVersion,

        /// The path to install miniconda to (defaults to ~/miniconda or C:\Miniconda)
        #[arg(short, long)]
        path: Option<PathBuf>,

        /// Binstar channel to activate for dependencies
        #[arg(short, long)]
        channel: Option<String>,
    },

    /// Run a conda build
    Build {
        /// Recipe to build
        #[command(flatten)]
        build: BuildPathArgs,
        /// Miniconda location
        #[command(flatten)]
        miniconda: MinicondaArgs,
    },

    /// Upload a conda build to binstar
    Binstar {
        /// Recipe whose build output is uploaded
        #[command(flatten)]
        build: BuildPathArgs,
        /// Hosting credentials and channel
        #[command(flatten)]
        binstar: BinstarArgs,
        /// Miniconda location
        #[command(flatten)]
        miniconda: MinicondaArgs,
    },

    /// Upload a source distribution to PyPI
    Pypi {
        /// Package index credentials
        #[command(flatten)]
        pypi: PypiArgs,
        /// Miniconda location
        #[command(flatten)]
        miniconda: MinicondaArgs,
    },

    /// Build and upload to binstar
    Auto {
        /// Recipe to build and upload
        #[command(flatten)]
        build: BuildPathArgs,
        /// Hosting credentials and channel
        #[command(flatten)]
        binstar: BinstarArgs,
        /// Miniconda location
        #[command(flatten)]
        miniconda: MinicondaArgs,
        /// Package index credentials, accepted so one env setup serves every step
        #[command(flatten)]
        pypi: PypiArgs,
    },

    /// Print the version as reported by embedded metadata or git
    Version,
}

impl Command {
    /// Subcommand name for messages
    pub fn name(&self) -> &'static str {
        match self {
            Command::Setup { .. } => "setup",
            Command::Build { .. } => "build",
            Command::Binstar { .. } => "binstar",
            Command::Pypi { .. } => "pypi",
            Command::Auto { .. } => "auto",
            Command::Version => "version",
        }
    }

    /// Explicit configuration for the orchestrator
    pub fn config(&self, env: &EnvConfig) -> CondaciConfig {
        let (miniconda, binstar, pypi) = match self {
            Command::Setup { path, .. } => (path.clone(), None, None),
            Command::Build { miniconda, .. } => (miniconda.miniconda.clone(), None, None),
            Command::Binstar {
                binstar, miniconda, ..
            } => (miniconda.miniconda.clone(), Some(binstar), None),
            Command::Pypi { pypi, miniconda } => (miniconda.miniconda.clone(), None, Some(pypi)),
            Command::Auto {
                binstar,
                miniconda,
                pypi,
                ..
            } => (miniconda.miniconda.clone(), Some(binstar), Some(pypi)),
            Command::Version => (None, None, None),
        };

        CondaciConfig {
            miniconda,
            hosting: binstar
                .map(|b| HostingConfig {
                    user: b.binstaruser.clone(),
                    key: b.binstarkey.clone(),
                    channel: b.binstarchannel.clone(),
                    api_url: b.binstarapi.clone(),
                })
                .unwrap_or_else(|| HostingConfig {
                    api_url: DEFAULT_API_URL.to_string(),
                    ..Default::default()
                }),
            pypi: pypi
                .map(|p| PypiConfig {
                    user: p.pypiuser.clone(),
                    password: p.pypipassword.clone(),
                })
                .unwrap_or_default(),
            env: env.clone(),
        }
    }
}

impl Args {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate arguments for consistency
    pub fn validate(&self) -> Result<(), CliError> {
        let buildpath = match &self.command {
            Command::Build { build, .. }
            | Command::Binstar { build, .. }
            | Command::Auto { build, .. } => Some(&build.buildpath),
            _ => None,
        };

        if let Some(path) = buildpath
            && path.as_os_str().is_empty()
        {
            return Err(CliError::InvalidArguments {
                reason: "build path must not be empty".to_string(),
            });
        }

        if let Command::Binstar { binstar, .. } | Command::Auto { binstar, .. } = &self.command
            && binstar.binstarchannel.as_deref() == Some("")
        {
            return Err(CliError::InvalidArguments {
                reason: "--binstarchannel must not be empty".to_string(),
            });
        }

        Ok(())
    }
}

/// Configuration derived from command line arguments
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Output manager for colored terminal output
    output: super::OutputManager,
    /// Environment snapshot taken at start-up
    env: EnvConfig,
    /// Checkout root (the working directory)
    checkout: PathBuf,
}

impl RuntimeConfig {
    /// Create runtime configuration
    pub fn new(verbose: bool, quiet: bool, env: EnvConfig, checkout: PathBuf) -> Self {
        Self {
            output: super::OutputManager::new(verbose, quiet),
            env,
            checkout,
        }
    }

    /// Get a reference to the output manager
    pub fn output(&self) -> &super::OutputManager {
        &self.output
    }

    /// Environment snapshot
    pub fn env(&self) -> &EnvConfig {
        &self.env
    }

    /// Checkout root
    pub fn checkout(&self) -> &std::path::Path {
        &self.checkout
    }
}

impl From<&Args> for RuntimeConfig {
    fn from(args: &Args) -> Self {
        let checkout = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self::new(args.verbose, args.quiet, EnvConfig::capture(), checkout)
    }
}

impl RuntimeConfig {
    /// Print message
    pub fn println(&self, message: &str) {
        let _ = self.output.println(message);
    }

    /// Print verbose message
    pub fn verbose_println(&self, message: &str) {
        let _ = self.output.verbose(message);
    }

    /// Print error message (always shown)
    pub fn error_println(&self, message: &str) {
        self.output.error(message);
    }

    /// Print warning message
    pub fn warning_println(&self, message: &str) {
        let _ = self.output.warn(message);
    }

    /// Print success message
    pub fn success_println(&self, message: &str) {
        let _ = self.output.success(message);
    }

    /// Print section header
    pub fn section(&self, title: &str) {
        let _ = self.output.section(title);
    }

    /// Check if verbose output is enabled
    pub fn is_verbose(&self) -> bool {
        self.output.is_verbose()
    }

    /// Check if quiet mode is enabled
    pub fn is_quiet(&self) -> bool {
        self.output.is_quiet()
    }
}

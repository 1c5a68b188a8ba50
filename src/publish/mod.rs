//! Source distribution publishing to PyPI.
//!
//! Only release tags are published, and only from the single key node of the
//! build matrix (Linux, 64-bit, python 2).

mod pypi;

pub use pypi::{
    PypiPublisher, pypirc_contents, pypirc_path, upload_allowed, write_pypirc,
};

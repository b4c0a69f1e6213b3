//! JDK discovery, distributors and installation

pub mod common;
pub mod detect;
pub mod distributors;
pub mod installer;

pub use detect::{
    Detector, Installation, Origin, find_matching, get_version, is_valid_installation,
    is_valid_search_path,
};
pub use distributors::{DownloadArtifact, Distributor, Distributors, Release};
pub use installer::Installer;

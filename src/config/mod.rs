//! Persisted state: user settings and the registry of known JDKs

mod registry;
mod settings;

pub use registry::{InstalledRecord, Registry};
pub use settings::Settings;

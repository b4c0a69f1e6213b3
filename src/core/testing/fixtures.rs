//! JDK fixtures: fake installations on disk and archives of them

use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::Compression;
use flate2::write::GzEncoder;
use sha2::{Digest, Sha256};

use crate::runtimes::common::java_executable;

/// Builder for a fake JDK: `bin/java` plus an optional `release` manifest
#[derive(Debug, Clone)]
pub struct JdkFixture {
    version: Option<String>,
}

impl JdkFixture {
    /// JDK whose `release` file reports `version`
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: Some(version.into()),
        }
    }

    /// JDK without a `release` file; its launcher cannot be executed, so the
    /// version resolves to unknown
    pub fn without_version() -> Self {
        Self { version: None }
    }

    fn release_content(&self) -> Option<String> {
        self.version
            .as_ref()
            .map(|v| format!("IMPLEMENTOR=\"jv fixtures\"\nJAVA_VERSION=\"{v}\"\n"))
    }

    /// Create the installation rooted at `root`
    pub fn create(&self, root: &Path) {
        let bin = root.join("bin");
        fs::create_dir_all(&bin).unwrap();
        let java = bin.join(java_executable());
        fs::write(&java, b"").unwrap();

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&java, fs::Permissions::from_mode(0o644)).unwrap();
        }

        if let Some(release) = self.release_content() {
            fs::write(root.join("release"), release).unwrap();
        }
    }

    /// Write a `.tar.gz` holding the installation under `top_dir/`, the way
    /// distributor archives are laid out
    pub fn write_tar_gz(&self, archive: &Path, top_dir: &str) {
        let file = fs::File::create(archive).unwrap();
        let mut builder = tar::Builder::new(GzEncoder::new(file, Compression::fast()));

        let mut entries = vec![(format!("{top_dir}/bin/{}", java_executable()), Vec::new())];
        if let Some(release) = self.release_content() {
            entries.push((format!("{top_dir}/release"), release.into_bytes()));
        }

        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, data.as_slice()).unwrap();
        }

        builder.into_inner().unwrap().finish().unwrap();
    }
}

/// Lowercase hex SHA-256 of a file
pub fn sha256_file(path: &Path) -> String {
    let mut file = fs::File::open(path).unwrap();
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file.read(&mut buf).unwrap();
        if n == 0 {
            break;
        }
        hasher.update(&buf[..n]);
    }
    hasher
        .finalize()
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

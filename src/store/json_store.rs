use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Serialize;

use crate::session::certificate::Certificate;
use crate::store::schema::ProfileData;

const PROFILE_FILE: &str = "profile.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("parsons");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    /// Load and deserialize profile. Returns None if file exists but
    /// cannot be parsed (schema mismatch / corruption).
    pub fn load_profile(&self) -> Option<ProfileData> {
        let path = self.file_path(PROFILE_FILE);
        if path.exists() {
            let content = fs::read_to_string(&path).ok()?;
            serde_json::from_str(&content).ok()
        } else {
            Some(ProfileData::default())
        }
    }

    pub fn save_profile(&self, data: &ProfileData) -> Result<()> {
        self.save(PROFILE_FILE, data)
    }

    /// The stored display name, if one was ever chosen.
    pub fn load_user_name(&self) -> Option<String> {
        self.load_profile()
            .filter(|p| !p.needs_reset())
            .and_then(|p| p.user_name)
    }

    pub fn save_user_name(&self, name: &str) -> Result<()> {
        let mut profile = self
            .load_profile()
            .filter(|p| !p.needs_reset())
            .unwrap_or_default();
        profile.user_name = Some(name.to_string());
        self.save_profile(&profile)
    }

    pub fn clear_user_name(&self) -> Result<()> {
        self.save_profile(&ProfileData::default())
    }
}

/// Write a plain-text copy of the certificate into `dir`, returning its path.
pub fn save_certificate(dir: &Path, certificate: &Certificate) -> Result<PathBuf> {
    fs::create_dir_all(dir)?;
    let path = dir.join(certificate.file_name());
    fs::write(&path, certificate.to_text(60))?;
    Ok(path)
}

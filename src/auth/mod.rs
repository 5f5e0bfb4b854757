//! Encrypted key-value settings store
//!
//! Values are kept as a JSON string map, encrypted with AES-256-GCM in
//! `credentials.enc` under the hubwatch directory. The encryption key is
//! derived from machine-specific identifiers. The file layout is
//! `nonce (12 bytes) || ciphertext`.

use aes_gcm::{
    Aes256Gcm, Nonce,
    aead::{Aead, KeyInit},
};
use anyhow::{Context, Result};
use rand::Rng;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::paths;

const NONCE_SIZE: usize = 12;

/// Key under which the GitHub access token is stored
pub const ACCESS_TOKEN_KEY: &str = "access_token";

/// Get machine ID for key derivation (cross-platform)
fn get_machine_id() -> String {
    #[cfg(target_os = "linux")]
    {
        if let Ok(id) = fs::read_to_string("/etc/machine-id") {
            return id.trim().to_string();
        }
        if let Ok(id) = fs::read_to_string("/var/lib/dbus/machine-id") {
            return id.trim().to_string();
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Ok(output) = std::process::Command::new("ioreg")
            .args(["-rd1", "-c", "IOPlatformExpertDevice"])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            for line in stdout.lines() {
                if line.contains("IOPlatformUUID")
                    && let Some(uuid) = line.split('"').nth(3)
                {
                    return uuid.to_string();
                }
            }
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(output) = std::process::Command::new("reg")
            .args([
                "query",
                r"HKLM\SOFTWARE\Microsoft\Cryptography",
                "/v",
                "MachineGuid",
            ])
            .output()
        {
            let stdout = String::from_utf8_lossy(&output.stdout);
            for line in stdout.lines() {
                if line.contains("MachineGuid")
                    && let Some(guid) = line.split_whitespace().last()
                {
                    return guid.to_string();
                }
            }
        }
    }

    dirs::home_dir()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "hubwatch-fallback-key".to_string())
}

/// Derive encryption key from machine-specific data
fn derive_key() -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(get_machine_id().as_bytes());
    if let Some(home) = dirs::home_dir() {
        hasher.update(home.to_string_lossy().as_bytes());
    }
    hasher.update(b"hubwatch-settings-v1");
    hasher.finalize().into()
}

/// Encrypted key-value store backed by a single file
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
    key: [u8; 32],
}

impl SettingsStore {
    /// Open the store at the default location
    pub fn open() -> Result<Self> {
        Ok(Self::at(paths::credentials_path()?))
    }

    /// Open a store at a specific path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            key: derive_key(),
        }
    }

    /// Path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn cipher(&self) -> Result<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.key).map_err(|_| anyhow::anyhow!("Invalid key length"))
    }

    /// Load every entry; a missing or truncated file is an empty store
    fn load(&self) -> Result<HashMap<String, String>> {
        if !self.path.exists() {
            return Ok(HashMap::new());
        }

        let encrypted = fs::read(&self.path).context("Failed to read settings file")?;
        if encrypted.len() < NONCE_SIZE {
            return Ok(HashMap::new());
        }

        let (nonce_bytes, ciphertext) = encrypted.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        let plaintext = self
            .cipher()?
            .decrypt(nonce, ciphertext)
            .map_err(|_| anyhow::anyhow!("Failed to decrypt settings"))?;

        let json = String::from_utf8(plaintext).context("Invalid UTF-8 in settings")?;
        serde_json::from_str(&json).context("Corrupt settings store")
    }

    fn save(&self, entries: &HashMap<String, String>) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).context("Failed to create settings directory")?;
        }

        let json = serde_json::to_string(entries)?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rng().fill(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let ciphertext = self
            .cipher()?
            .encrypt(nonce, json.as_bytes())
            .map_err(|_| anyhow::anyhow!("Failed to encrypt settings"))?;

        let mut output = nonce_bytes.to_vec();
        output.extend(ciphertext);

        fs::write(&self.path, output).context("Failed to write settings file")?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let mut perms = fs::metadata(&self.path)?.permissions();
            perms.set_mode(0o600);
            fs::set_permissions(&self.path, perms)?;
        }

        Ok(())
    }

    /// Read a value
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.load()?.remove(key))
    }

    /// Write a value, replacing any previous one
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.load().unwrap_or_else(|e| {
            tracing::warn!("Discarding unreadable settings store: {e}");
            HashMap::new()
        });
        entries.insert(key.to_string(), value.to_string());
        self.save(&entries)
    }

    /// Remove a value; removing a missing key is not an error.
    /// A file that cannot be decrypted is deleted, since nothing in it is
    /// recoverable and it would otherwise keep the stale value around.
    pub fn remove(&self, key: &str) -> Result<()> {
        let mut entries = match self.load() {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Deleting unreadable settings store: {e}");
                return fs::remove_file(&self.path).context("Failed to delete settings file");
            }
        };
        if entries.remove(key).is_some() {
            self.save(&entries)?;
        }
        Ok(())
    }

    /// Persist the GitHub access token
    pub fn store_token(&self, token: &str) -> Result<()> {
        self.set(ACCESS_TOKEN_KEY, token)
    }

    /// Stored access token; an empty value counts as signed out
    pub fn get_token(&self) -> Result<Option<String>> {
        Ok(self.get(ACCESS_TOKEN_KEY)?.filter(|t| !t.trim().is_empty()))
    }

    /// Forget the access token
    pub fn clear_token(&self) -> Result<()> {
        self.remove(ACCESS_TOKEN_KEY)
    }

    /// Whether a usable token is stored
    pub fn has_token(&self) -> bool {
        self.get_token().map(|t| t.is_some()).unwrap_or(false)
    }
}

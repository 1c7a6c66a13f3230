use anyhow::Result;
use std::env;
use std::fs;
use std::io::Write;
use std::path::PathBuf;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

const ENV_TOKEN: &str = "GUST_TOKEN";

/// Debug information about credential storage backends
#[derive(Debug, Clone)]
pub struct CredentialDebugInfo {
    pub keyring_available: bool,
    pub env_var_set: bool,
    pub file_path: PathBuf,
    pub file_exists: bool,
}

impl std::fmt::Display for CredentialDebugInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Credential Storage Status:")?;
        writeln!(
            f,
            "  Keyring: {}",
            if self.keyring_available {
                "available"
            } else {
                "unavailable"
            }
        )?;
        writeln!(
            f,
            "  Environment var (GUST_TOKEN): {}",
            if self.env_var_set { "set" } else { "not set" }
        )?;
        writeln!(f, "  File fallback: {}", self.file_path.display())?;
        writeln!(f, "  File exists: {}", self.file_exists)?;
        Ok(())
    }
}

pub struct CredentialStore {
    email: String,
    token_file: PathBuf,
}

impl CredentialStore {
    pub fn new(email: &str) -> Self {
        let safe_email = email.replace(['@', '.', '/', '\\', ':'], "_");
        let token_file = crate::config::Config::config_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(format!(".token_{}", safe_email));

        Self {
            email: email.to_string(),
            token_file,
        }
    }

    /// Get diagnostic info about credential storage backend
    pub fn debug_info(&self) -> CredentialDebugInfo {
        // Check if keyring is available
        let test_key = format!("test:{}", self.email);
        let keyring_available = if let Ok(entry) = keyring::Entry::new("gust", &test_key) {
            // Try a dummy operation to see if keyring works
            entry.set_password("__test__").is_ok()
                && entry.get_password().is_ok()
                && entry.delete_credential().is_ok()
        } else {
            false
        };

        let env_var_set = Self::env_token().is_some();
        let file_path = self.token_file.clone();
        let file_exists = self.token_file.exists();

        CredentialDebugInfo {
            keyring_available,
            env_var_set,
            file_path,
            file_exists,
        }
    }

    /// Check for token in environment variable first
    fn env_token() -> Option<String> {
        env::var(ENV_TOKEN).ok()
    }

    /// Try to get token from keyring
    fn keyring_get(&self, key: &str) -> Option<String> {
        let entry = keyring::Entry::new("gust", key).ok()?;
        entry.get_password().ok()
    }

    /// Try to set token in keyring
    fn keyring_set(&self, key: &str, token: &str) -> bool {
        if let Ok(entry) = keyring::Entry::new("gust", key) {
            entry.set_password(token).is_ok()
        } else {
            false
        }
    }

    /// Read token from file fallback
    fn file_get(&self) -> Option<String> {
        fs::read_to_string(&self.token_file)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Write token to file fallback (with restricted permissions)
    fn file_set(&self, token: &str) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = self.token_file.parent() {
            fs::create_dir_all(parent)?;
        }

        // Create file with restricted permissions atomically to avoid TOCTOU
        #[cfg(unix)]
        {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(&self.token_file)?;
            file.write_all(token.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            fs::write(&self.token_file, token)?;
        }

        Ok(())
    }

    pub fn get_token(&self) -> Result<String> {
        // 1. Try environment variable
        if let Some(token) = Self::env_token() {
            return Ok(token);
        }

        // 2. Try keyring
        let key = format!("api:{}", self.email);
        if let Some(token) = self.keyring_get(&key) {
            return Ok(token);
        }

        // 3. Try file fallback
        if let Some(token) = self.file_get() {
            return Ok(token);
        }

        anyhow::bail!("API token not found. Set GUST_TOKEN env var or run 'gust auth'.")
    }

    pub fn set_token(&self, token: &str) -> Result<()> {
        let key = format!("api:{}", self.email);

        // Try keyring first
        if self.keyring_set(&key, token) {
            // Verify it actually worked
            if self.keyring_get(&key).is_some() {
                return Ok(());
            }
        }

        // Keyring failed, use file fallback
        eprintln!("Note: Keyring unavailable, using file-based storage.");
        self.file_set(token)?;

        Ok(())
    }

    pub fn has_credentials(&self) -> bool {
        // Environment variable
        if Self::env_token().is_some() {
            return true;
        }

        // Keyring
        let key = format!("api:{}", self.email);
        if self.keyring_get(&key).is_some() {
            return true;
        }

        // File fallback
        if self.file_get().is_some() {
            return true;
        }

        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    // Mutex to prevent parallel test interference with env vars
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    #[test]
    fn test_env_token() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::set_var(ENV_TOKEN, "ya29.test123") };
        let store = CredentialStore::new("test@example.com");
        assert!(store.has_credentials());
        assert_eq!(store.get_token().unwrap(), "ya29.test123");
        unsafe { env::remove_var(ENV_TOKEN) };
    }

    #[test]
    fn test_email_specific_token_files() {
        // Verify that different emails get different token file paths
        let store1 = CredentialStore::new("user1@example.com");
        let store2 = CredentialStore::new("user2@example.com");

        assert_ne!(store1.token_file, store2.token_file);
        assert!(store1
            .token_file
            .to_string_lossy()
            .contains("user1_example_com"));
        assert!(store2
            .token_file
            .to_string_lossy()
            .contains("user2_example_com"));
    }

    #[test]
    fn test_special_chars_in_email_sanitized() {
        // Ensure special characters are sanitized in token file names
        let store = CredentialStore::new("user.name+tag@sub.domain.com");
        let filename = store.token_file.file_name().unwrap().to_string_lossy();

        assert!(!filename.contains('@'), "filename contains @: {}", filename);
        assert!(!filename.contains('/'), "filename contains /: {}", filename);
        assert!(
            !filename.contains('\\'),
            "filename contains \\: {}",
            filename
        );
        assert!(!filename.contains(':'), "filename contains :: {}", filename);

        // Should be something like ".token_user_name+tag_sub_domain_com"
        assert!(
            filename.starts_with(".token_"),
            "unexpected filename: {}",
            filename
        );
    }

    #[test]
    fn test_file_fallback_isolation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        // Ensure env var doesn't interfere
        unsafe { env::remove_var(ENV_TOKEN) };

        // Create temp stores with unique emails for this test
        let email1 = format!("test_isolation_1_{}@example.com", std::process::id());
        let email2 = format!("test_isolation_2_{}@example.com", std::process::id());

        let store1 = CredentialStore::new(&email1);
        let store2 = CredentialStore::new(&email2);

        // Clean up any existing test files
        let _ = fs::remove_file(&store1.token_file);
        let _ = fs::remove_file(&store2.token_file);

        store1.file_set("token_for_account_1").unwrap();
        store2.file_set("token_for_account_2").unwrap();

        // Verify they don't interfere
        assert_eq!(store1.file_get(), Some("token_for_account_1".to_string()));
        assert_eq!(store2.file_get(), Some("token_for_account_2".to_string()));

        // Clean up
        let _ = fs::remove_file(&store1.token_file);
        let _ = fs::remove_file(&store2.token_file);
    }

    #[test]
    fn test_debug_info() {
        let store = CredentialStore::new("debug_test@example.com");
        let info = store.debug_info();

        // Should have a valid file path
        assert!(info
            .file_path
            .to_string_lossy()
            .contains("debug_test_example_com"));

        // Display should work
        let display = format!("{}", info);
        assert!(display.contains("Credential Storage Status:"));
        assert!(display.contains("Keyring:"));
        assert!(display.contains("File fallback:"));
    }

    #[test]
    fn test_env_takes_priority() {
        let _guard = ENV_MUTEX.lock().unwrap();

        let email = format!("priority_test_{}@example.com", std::process::id());
        let store = CredentialStore::new(&email);

        // Clean up
        let _ = fs::remove_file(&store.token_file);

        // Set file token
        store.file_set("file_token").unwrap();

        // Now set env var - it should take priority
        unsafe { env::set_var(ENV_TOKEN, "env_token") };

        assert_eq!(store.get_token().unwrap(), "env_token");

        // Clean up
        unsafe { env::remove_var(ENV_TOKEN) };
        let _ = fs::remove_file(&store.token_file);
    }

    #[test]
    fn test_has_credentials_file_fallback() {
        let _guard = ENV_MUTEX.lock().unwrap();
        unsafe { env::remove_var(ENV_TOKEN) };

        let email = format!("has_creds_test_{}@example.com", std::process::id());
        let store = CredentialStore::new(&email);

        // Clean up any existing file
        let _ = fs::remove_file(&store.token_file);

        // Set via file
        store.file_set("test_token").unwrap();

        // Now should have credentials
        assert!(store.has_credentials());
        assert_eq!(store.file_get(), Some("test_token".to_string()));

        // Clean up
        let _ = fs::remove_file(&store.token_file);
    }
}

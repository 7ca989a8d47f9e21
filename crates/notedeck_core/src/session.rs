//! Session token and its on-disk store.
//!
//! The token is created at login, attached to every authenticated request and
//! deleted at logout. The store is the only place it is persisted; everything
//! else receives the [`Session`] value explicitly.

use crate::error::SessionError;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Opaque credential issued by the backend at login.
#[derive(Clone, PartialEq, Eq)]
pub struct Session {
    token: String,
}

impl Session {
    /// Wrap a token, rejecting blank values.
    ///
    /// # Errors
    /// Returns [`SessionError::EmptyToken`] when `token` is blank.
    pub fn new(token: impl Into<String>) -> Result<Self, SessionError> {
        let token = token.into().trim().to_string();
        if token.is_empty() {
            return Err(SessionError::EmptyToken);
        }
        Ok(Self { token })
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    /// Value for the `Authorization` header.
    ///
    /// Without a scheme the raw token is sent, which is what the notes
    /// backend accepts by default.
    pub fn authorization_value(&self, scheme: Option<&str>) -> String {
        match scheme.map(str::trim).filter(|scheme| !scheme.is_empty()) {
            Some(scheme) => format!("{} {}", scheme, self.token),
            None => self.token.clone(),
        }
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token", &"<redacted>")
            .finish()
    }
}

/// File-backed persistence for the session token.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session.
    ///
    /// # Returns
    /// `None` when no token is stored or the file is blank.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read.
    pub fn load(&self) -> Result<Option<Session>, SessionError> {
        match fs::read_to_string(&self.path) {
            Ok(raw) => Ok(Session::new(raw).ok()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    /// Persist `session`, creating parent directories as needed.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub fn save(&self, session: &Session) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        write_private(&self.path, session.token().as_bytes())?;
        info!("session saved to {}", self.path.display());
        Ok(())
    }

    /// Delete the stored session. A missing file is not an error.
    ///
    /// # Errors
    /// Returns an error when an existing file cannot be removed.
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => {
                info!("session cleared");
                Ok(())
            }
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!("no stored session to clear");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }
}

/// Write the token so that no other user can read it at any point.
#[cfg(unix)]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    use std::io::Write;
    use std::os::unix::fs::{OpenOptionsExt, PermissionsExt};

    let mut file = fs::OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .mode(0o600)
        .open(path)?;
    // `mode` only applies on creation; tighten a file left by an older run.
    file.set_permissions(fs::Permissions::from_mode(0o600))?;
    file.write_all(contents)
}

#[cfg(not(unix))]
fn write_private(path: &Path, contents: &[u8]) -> io::Result<()> {
    fs::write(path, contents)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn temp_store() -> (TempDir, SessionStore) {
        let dir = TempDir::new().expect("temp dir");
        let store = SessionStore::new(dir.path().join("nested").join("token"));
        (dir, store)
    }

    #[test]
    fn session_rejects_blank_tokens() {
        assert!(matches!(Session::new("   "), Err(SessionError::EmptyToken)));
        assert_eq!(Session::new(" abc \n").expect("session").token(), "abc");
    }

    #[test]
    fn authorization_value_is_raw_unless_scheme_set() {
        let session = Session::new("tok").expect("session");
        assert_eq!(session.authorization_value(None), "tok");
        assert_eq!(session.authorization_value(Some(" ")), "tok");
        assert_eq!(session.authorization_value(Some("Bearer")), "Bearer tok");
    }

    #[test]
    fn debug_output_hides_token() {
        let session = Session::new("secret-token").expect("session");
        assert!(!format!("{:?}", session).contains("secret-token"));
    }

    #[test]
    fn load_without_file_is_none() {
        let (_dir, store) = temp_store();
        assert!(store.load().expect("load").is_none());
    }

    #[test]
    fn save_load_clear_lifecycle() {
        let (_dir, store) = temp_store();
        let session = Session::new("tok-1").expect("session");
        store.save(&session).expect("save");
        assert_eq!(store.load().expect("load"), Some(session));

        store.clear().expect("clear");
        assert!(store.load().expect("load after clear").is_none());
        store.clear().expect("clearing twice is fine");
    }

    #[test]
    fn blank_file_reads_as_no_session() {
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "\n").expect("write");
        assert!(store.load().expect("load").is_none());
    }

    #[cfg(unix)]
    #[test]
    fn saved_token_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        store
            .save(&Session::new("tok").expect("session"))
            .expect("save");
        let mode = std::fs::metadata(store.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[cfg(unix)]
    #[test]
    fn overwriting_a_readable_token_file_tightens_it() {
        use std::os::unix::fs::PermissionsExt;
        let (_dir, store) = temp_store();
        std::fs::create_dir_all(store.path().parent().expect("parent")).expect("mkdir");
        std::fs::write(store.path(), "old-token-with-a-longer-body").expect("write");
        std::fs::set_permissions(store.path(), std::fs::Permissions::from_mode(0o644))
            .expect("chmod");

        let session = Session::new("tok-2").expect("session");
        store.save(&session).expect("save");

        let mode = std::fs::metadata(store.path())
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o600);
        assert_eq!(store.load().expect("load"), Some(session));
    }
}

use crate::auth::{CredentialProvider, Session, SessionStore, Token};
use crate::types::{Result, Role};
use parking_lot::RwLock;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Session kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryCredentials {
    session: RwLock<Session>,
}

impl MemoryCredentials {
    pub fn new(session: Session) -> Self {
        Self {
            session: RwLock::new(session),
        }
    }

    /// Holder with an access token and role but no refresh token.
    pub fn logged_in(token: &str, role: Role) -> Self {
        Self::new(Session {
            access_token: Some(Token::new(token)),
            refresh_token: None,
            role: Some(role),
        })
    }

    pub fn set_token(&self, token: Option<Token>) {
        self.session.write().access_token = token;
    }
}

impl CredentialProvider for MemoryCredentials {
    fn token(&self) -> Option<Token> {
        self.session.read().access_token.clone()
    }

    fn role(&self) -> Option<Role> {
        self.session.read().role
    }

    fn session(&self) -> Session {
        self.session.read().clone()
    }
}

impl SessionStore for MemoryCredentials {
    fn save(&self, session: &Session) -> Result<()> {
        *self.session.write() = session.clone();
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.session.write() = Session::default();
        Ok(())
    }
}

/// Session persisted as a small JSON file.
///
/// The file is re-read on every access. A missing, unreadable or malformed
/// file reads as "not logged in".
#[derive(Debug, Clone)]
pub struct FileCredentials {
    path: PathBuf,
}

impl FileCredentials {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Session {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Session::default(),
        };

        serde_json::from_str(&content).unwrap_or_else(|e| {
            warn!("Ignoring unreadable session file {}: {}", self.path.display(), e);
            Session::default()
        })
    }
}

impl CredentialProvider for FileCredentials {
    fn token(&self) -> Option<Token> {
        self.load().access_token
    }

    fn role(&self) -> Option<Role> {
        self.load().role
    }

    fn session(&self) -> Session {
        self.load()
    }
}

impl SessionStore for FileCredentials {
    fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let content = serde_json::to_string_pretty(session)
            .map_err(|e| crate::types::AppError::Config(format!("Failed to encode session: {}", e)))?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on creation; tighten a file left by an older run.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }

        file.write_all(content.as_bytes())?;

        debug!("Session saved to {}", self.path.display());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

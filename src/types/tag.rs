// ABOUTME: The three tag slots: latest, previous, and write-once backups.
// ABOUTME: Backup ids are 10 random lowercase hex characters.

use std::fmt;
use thiserror::Error;

/// Number of hex characters in a backup id.
pub const BACKUP_ID_LEN: usize = 10;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackupIdError {
    #[error("backup id must be {BACKUP_ID_LEN} characters, got {0}")]
    Length(usize),

    #[error("backup id must be lowercase hex, found '{0}'")]
    NotHex(char),
}

/// Identifier for an archived `previous` image.
///
/// Drawn from 40 random bits; collisions with existing backup tags are not
/// checked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BackupId(String);

impl BackupId {
    /// Generate a fresh id from the thread-local RNG.
    pub fn generate() -> Self {
        let bytes: [u8; BACKUP_ID_LEN / 2] = rand::random();
        Self(bytes.iter().map(|b| format!("{b:02x}")).collect())
    }

    pub fn parse(value: &str) -> Result<Self, BackupIdError> {
        if value.len() != BACKUP_ID_LEN {
            return Err(BackupIdError::Length(value.len()));
        }
        if let Some(c) = value
            .chars()
            .find(|c| !c.is_ascii_digit() && !('a'..='f').contains(c))
        {
            return Err(BackupIdError::NotHex(c));
        }
        Ok(Self(value.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BackupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A tag slot within a service's repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Tag {
    /// The currently deployed image.
    Latest,
    /// The image deployed before `latest`; the rollback target.
    Previous,
    /// Archive of a displaced `previous`. Never read back.
    Backup(BackupId),
}

impl Tag {
    pub fn as_str(&self) -> &str {
        match self {
            Tag::Latest => "latest",
            Tag::Previous => "previous",
            Tag::Backup(id) => id.as_str(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{BotId, BotIdentity, CacheError};

/// The file the reference clients keep their registration in.
pub const DEFAULT_CACHE_FILE: &str = "botConfig.cfg";

/// A previous registration, persisted as `name:id`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CacheEntry {
    pub name: String,
    pub id: BotId,
}

impl CacheEntry {
    pub fn new(name: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            id: BotId::from(id.into()),
        }
    }

    pub fn into_identity(self) -> BotIdentity {
        BotIdentity {
            id: self.id,
            name: self.name,
        }
    }
}

impl From<&BotIdentity> for CacheEntry {
    fn from(identity: &BotIdentity) -> Self {
        Self {
            name: identity.name.clone(),
            id: identity.id.clone(),
        }
    }
}

impl std::fmt::Display for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.name, self.id)
    }
}

impl std::str::FromStr for CacheEntry {
    type Err = CacheError;

    /// The id is everything after the last colon, so names may contain colons.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, id) = s
            .trim_end()
            .rsplit_once(':')
            .ok_or_else(|| CacheError::Corrupt(String::from("expected 'name:id'")))?;
        if id.is_empty() {
            return Err(CacheError::Corrupt(format!(
                "no id stored for bot '{}'",
                name
            )));
        }
        Ok(CacheEntry::new(name, id))
    }
}

/// Storage for the single most recent registration.
pub trait RegistrationCache {
    /// `Ok(None)` if nothing was stored yet.
    fn load(&self) -> Result<Option<CacheEntry>, CacheError>;
    /// Replaces whatever was stored before.
    fn store(&mut self, entry: &CacheEntry) -> Result<(), CacheError>;
    fn clear(&mut self) -> Result<(), CacheError>;
}

impl<C: RegistrationCache + ?Sized> RegistrationCache for &mut C {
    fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        (**self).load()
    }

    fn store(&mut self, entry: &CacheEntry) -> Result<(), CacheError> {
        (**self).store(entry)
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        (**self).clear()
    }
}

/// Keeps the registration in a text file.
#[derive(Clone, Debug)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut file_name = self
            .path
            .file_name()
            .map(|name| name.to_os_string())
            .unwrap_or_default();
        file_name.push(".tmp");
        self.path.with_file_name(file_name)
    }
}

impl Default for FileCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_FILE)
    }
}

impl RegistrationCache for FileCache {
    fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let entry = content.parse::<CacheEntry>()?;
        debug!(path = %self.path.display(), bot = %entry.name, "Loaded cached registration");
        Ok(Some(entry))
    }

    fn store(&mut self, entry: &CacheEntry) -> Result<(), CacheError> {
        // Write next to the target and rename, so an interrupted write never
        // leaves a half-written record behind
        let temp_path = self.temp_path();
        let mut file = File::create(&temp_path)?;
        file.write_all(entry.to_string().as_bytes())?;
        file.sync_all()?;
        drop(file);
        fs::rename(&temp_path, &self.path)?;
        debug!(path = %self.path.display(), bot = %entry.name, "Stored registration");
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

/// Keeps the registration in memory only, e.g. for tests.
#[derive(Clone, Debug, Default)]
pub struct MemoryCache {
    entry: Option<CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(entry: CacheEntry) -> Self {
        Self { entry: Some(entry) }
    }

    pub fn entry(&self) -> Option<&CacheEntry> {
        self.entry.as_ref()
    }
}

impl RegistrationCache for MemoryCache {
    fn load(&self) -> Result<Option<CacheEntry>, CacheError> {
        Ok(self.entry.clone())
    }

    fn store(&mut self, entry: &CacheEntry) -> Result<(), CacheError> {
        self.entry = Some(entry.clone());
        Ok(())
    }

    fn clear(&mut self) -> Result<(), CacheError> {
        self.entry = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quickcheck::quickcheck;

    use super::*;

    quickcheck! {
        fn record_format_parses_back(entry: CacheEntry) -> bool {
            entry.to_string().parse::<CacheEntry>().ok() == Some(entry)
        }
    }

    #[test]
    fn file_cache_store_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path().join(DEFAULT_CACHE_FILE));
        assert_eq!(cache.load().unwrap(), None);

        let entry = CacheEntry::new("Mazer", "0b6c7f5e-2d1a-4c52-9b8e-1f3a6b1c2d3e");
        cache.store(&entry).unwrap();
        assert_eq!(cache.load().unwrap(), Some(entry.clone()));
        assert_eq!(
            fs::read_to_string(cache.path()).unwrap(),
            "Mazer:0b6c7f5e-2d1a-4c52-9b8e-1f3a6b1c2d3e"
        );
        assert!(!cache.temp_path().exists());

        // Last write wins
        let other = CacheEntry::new("Spiral", "42");
        cache.store(&other).unwrap();
        assert_eq!(cache.load().unwrap(), Some(other));
    }

    #[test]
    fn file_cache_clear_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = FileCache::new(dir.path().join("bot.cfg"));
        cache.store(&CacheEntry::new("Mazer", "1")).unwrap();
        cache.clear().unwrap();
        assert_eq!(cache.load().unwrap(), None);
        cache.clear().unwrap();
        assert!(!cache.path().exists());
    }

    #[test]
    fn file_cache_reads_reference_client_records() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("botConfig.cfg");
        fs::write(&path, "My:Bot:abc-123\n").unwrap();
        let cache = FileCache::new(&path);
        assert_eq!(
            cache.load().unwrap(),
            Some(CacheEntry::new("My:Bot", "abc-123"))
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("botConfig.cfg");
        fs::write(&path, "no separator here").unwrap();
        assert!(matches!(
            FileCache::new(&path).load(),
            Err(CacheError::Corrupt(_))
        ));
        fs::write(&path, "Mazer:").unwrap();
        assert!(matches!(
            FileCache::new(&path).load(),
            Err(CacheError::Corrupt(_))
        ));
    }

    #[test]
    fn unreadable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        // A directory cannot be read as a file
        assert!(matches!(
            FileCache::new(dir.path()).load(),
            Err(CacheError::Io(_))
        ));
    }

    #[test]
    fn memory_cache_round_trip() {
        let mut cache = MemoryCache::new();
        let entry = CacheEntry::new("Mazer", "1");
        cache.store(&entry).unwrap();
        assert_eq!(cache.load().unwrap(), Some(entry));
        cache.clear().unwrap();
        assert_eq!(cache.load().unwrap(), None);
    }
}

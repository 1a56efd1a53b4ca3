use crate::error::Result;
use crate::models::AgentProfile;
use std::fs;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

/// Anything that can hand us the agent's letterhead identity. Hosts
/// embedding the crate plug in their own backend here; the CLI uses a
/// file-backed source.
pub trait ProfileSource {
    fn fetch(&self) -> Result<AgentProfile>;
}

/// Reads a profile from a JSON file on disk.
pub struct FileProfileSource {
    path: PathBuf,
}

impl FileProfileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ProfileSource for FileProfileSource {
    fn fetch(&self) -> Result<AgentProfile> {
        let raw = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&raw)?)
    }
}

/// Placeholder source for invocations without a configured backend.
/// Always fails, which drops resolution through to the cache.
pub struct NoProfileSource;

impl ProfileSource for NoProfileSource {
    fn fetch(&self) -> Result<AgentProfile> {
        Err(crate::error::AlokasiError::Other(
            "no profile source configured".to_string(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Cache
// ---------------------------------------------------------------------------

fn config_dir() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("alokasi")
}

pub fn cache_path() -> PathBuf {
    config_dir().join("profile.json")
}

pub fn load_cached(path: &Path) -> Option<AgentProfile> {
    let raw = fs::read_to_string(path).ok()?;
    serde_json::from_str(&raw).ok()
}

pub fn save_cached(path: &Path, profile: &AgentProfile) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(profile)?;
    fs::write(path, json + "\n")?;
    Ok(())
}

pub fn clear_cached(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolve the profile for a report run. Never fails: the source wins
/// when reachable, an earlier cached copy covers outages, and the
/// built-in defaults cover first runs. Reports must still come out when
/// the backend is down.
pub fn resolve(source: &dyn ProfileSource) -> AgentProfile {
    resolve_with(source, &cache_path())
}

pub(crate) fn resolve_with(source: &dyn ProfileSource, cache: &Path) -> AgentProfile {
    match source.fetch() {
        Ok(profile) => {
            if let Err(e) = save_cached(cache, &profile) {
                log::warn!("Could not cache agent profile: {e}");
            }
            profile
        }
        Err(e) => {
            log::warn!("Profile source unavailable ({e}), trying cache");
            match load_cached(cache) {
                Some(profile) => profile,
                None => {
                    log::warn!("No cached agent profile, using built-in defaults");
                    AgentProfile::default()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AlokasiError;
    use tempfile::TempDir;

    struct StaticSource(AgentProfile);

    impl ProfileSource for StaticSource {
        fn fetch(&self) -> Result<AgentProfile> {
            Ok(self.0.clone())
        }
    }

    struct FailingSource;

    impl ProfileSource for FailingSource {
        fn fetch(&self) -> Result<AgentProfile> {
            Err(AlokasiError::Other("backend offline".to_string()))
        }
    }

    fn sample_profile() -> AgentProfile {
        AgentProfile {
            name: "PT Contoh Gas".to_string(),
            address: "Jl. Contoh No. 1, Bekasi".to_string(),
            email: "kontak@contohgas.co.id".to_string(),
            registration_no: "AGEN-32-00007".to_string(),
            region: "Bekasi".to_string(),
        }
    }

    #[test]
    fn test_source_wins_and_refreshes_cache() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("profile.json");
        let source = StaticSource(sample_profile());

        let resolved = resolve_with(&source, &cache);
        assert_eq!(resolved.name, "PT Contoh Gas");
        let cached = load_cached(&cache).unwrap();
        assert_eq!(cached.registration_no, "AGEN-32-00007");
    }

    #[test]
    fn test_cache_covers_source_outage() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("profile.json");
        save_cached(&cache, &sample_profile()).unwrap();

        let resolved = resolve_with(&FailingSource, &cache);
        assert_eq!(resolved.name, "PT Contoh Gas");
    }

    #[test]
    fn test_defaults_cover_first_run() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("profile.json");

        let resolved = resolve_with(&FailingSource, &cache);
        assert_eq!(resolved, AgentProfile::default());
        assert!(!resolved.name.is_empty());
    }

    #[test]
    fn test_file_source_reads_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("remote.json");
        save_cached(&path, &sample_profile()).unwrap();

        let source = FileProfileSource::new(&path);
        let fetched = source.fetch().unwrap();
        assert_eq!(fetched.email, "kontak@contohgas.co.id");
    }

    #[test]
    fn test_corrupt_cache_falls_back_to_defaults() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("profile.json");
        std::fs::write(&cache, "{ not json").unwrap();

        let resolved = resolve_with(&FailingSource, &cache);
        assert_eq!(resolved, AgentProfile::default());
    }

    #[test]
    fn test_clear_cached_removes_file() {
        let tmp = TempDir::new().unwrap();
        let cache = tmp.path().join("profile.json");
        save_cached(&cache, &sample_profile()).unwrap();
        assert!(cache.exists());

        clear_cached(&cache).unwrap();
        assert!(!cache.exists());
        // Clearing an absent cache is not an error.
        clear_cached(&cache).unwrap();
    }
}

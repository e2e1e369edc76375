use super::{DecodePolicy, EntryStore};
use crate::config::CONFIG_FILENAME;
use crate::error::{Result, TodoError};
use crate::model::Entry;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

pub const ARCHIVE_DIR: &str = "archive";
const DEFAULT_FILE_EXT: &str = ".yml";

pub struct FileStore {
    root: PathBuf,
    file_ext: String,
    decode_policy: DecodePolicy,
}

impl FileStore {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            file_ext: DEFAULT_FILE_EXT.to_string(),
            decode_policy: DecodePolicy::default(),
        }
    }

    pub fn with_file_ext(mut self, ext: &str) -> Self {
        if ext.starts_with('.') {
            self.file_ext = ext.to_string();
        } else {
            self.file_ext = format!(".{}", ext);
        }
        self
    }

    pub fn with_decode_policy(mut self, policy: DecodePolicy) -> Self {
        self.decode_policy = policy;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn archive_dir(&self) -> PathBuf {
        self.root.join(ARCHIVE_DIR)
    }

    pub fn file_ext(&self) -> &str {
        &self.file_ext
    }

    fn ensure_dir(&self, path: &Path) -> Result<()> {
        if !path.exists() {
            debug!(dir = %path.display(), "creating directory");
            fs::create_dir_all(path).map_err(TodoError::Io)?;
        }
        Ok(())
    }

    fn read_entry(&self, path: &Path) -> Result<Entry> {
        let content = fs::read_to_string(path).map_err(TodoError::Io)?;
        Entry::from_yaml(&content, path)
    }

    /// Decodes every regular file in `dir` except the config file.
    fn scan(&self, dir: &Path) -> Result<Vec<Entry>> {
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        for dir_entry in fs::read_dir(dir).map_err(TodoError::Io)? {
            let dir_entry = dir_entry.map_err(TodoError::Io)?;
            if dir_entry.file_type().map_err(TodoError::Io)?.is_dir() {
                continue;
            }
            let name = dir_entry.file_name();
            if name.to_string_lossy().eq_ignore_ascii_case(CONFIG_FILENAME) {
                continue;
            }

            let path = dir_entry.path();
            match self.read_entry(&path) {
                Ok(entry) => entries.push(entry),
                Err(err) if self.decode_policy == DecodePolicy::Skip => {
                    warn!(file = %path.display(), error = %err, "skipping unreadable entry");
                }
                Err(err) => return Err(err),
            }
        }

        debug!(dir = %dir.display(), count = entries.len(), "scanned entries");
        Ok(entries)
    }

    fn location_of<'a>(&self, entry: &'a Entry) -> Result<&'a Path> {
        entry.location.as_deref().ok_or_else(|| {
            TodoError::Store(format!("entry {} has no location", entry.id_string()))
        })
    }
}

impl EntryStore for FileStore {
    fn list_all(&self) -> Result<Vec<Entry>> {
        self.scan(&self.root)
    }

    fn list_archived(&self) -> Result<Vec<Entry>> {
        self.scan(&self.archive_dir())
    }

    fn find_by_id(&self, id: &Uuid) -> Result<Entry> {
        self.list_all()?
            .into_iter()
            .find(|entry| entry.id == *id)
            .ok_or_else(|| TodoError::NotFound(id.to_string()))
    }

    fn insert(&self, entry: &mut Entry) -> Result<()> {
        self.ensure_dir(&self.root)?;
        let path = self.root.join(entry.file_name(&self.file_ext));
        let content = entry.to_yaml()?;

        let file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::AlreadyExists => {
                return Err(TodoError::AlreadyExists(path));
            }
            Err(err) => return Err(TodoError::Io(err)),
        };
        write_new_file(file, &path, content.as_bytes())?;

        debug!(file = %path.display(), id = %entry.id, "inserted entry");
        entry.location = Some(path);
        Ok(())
    }

    fn update(&self, entry: &Entry) -> Result<()> {
        let path = self.location_of(entry)?;
        fs::write(path, entry.to_yaml()?).map_err(TodoError::Io)?;
        debug!(file = %path.display(), id = %entry.id, "updated entry");
        Ok(())
    }

    fn delete(&self, entry: &Entry) -> Result<()> {
        let path = self.location_of(entry)?;
        fs::remove_file(path).map_err(TodoError::Io)?;
        debug!(file = %path.display(), id = %entry.id, "deleted entry");
        Ok(())
    }

    fn archive(&self, entry: &mut Entry) -> Result<()> {
        let from = self.location_of(entry)?.to_path_buf();
        let name = from.file_name().ok_or_else(|| {
            TodoError::Store(format!("invalid entry location {}", from.display()))
        })?;

        let archive_dir = self.archive_dir();
        self.ensure_dir(&archive_dir)?;
        let to = free_archive_path(&archive_dir, Path::new(name));
        fs::rename(&from, &to).map_err(TodoError::Io)?;

        debug!(from = %from.display(), to = %to.display(), "archived entry");
        entry.location = Some(to);
        Ok(())
    }
}

/// Writes the content of a file that `insert` just created. A failed write
/// removes the file again: an empty or partial entry would fail every later
/// strict scan.
fn write_new_file<W: Write>(mut file: W, path: &Path, content: &[u8]) -> Result<()> {
    let written = file.write_all(content).and_then(|_| file.flush());
    drop(file);
    if let Err(err) = written {
        if let Err(cleanup) = fs::remove_file(path) {
            warn!(file = %path.display(), error = %cleanup, "could not remove partial entry");
        }
        return Err(TodoError::Io(err));
    }
    Ok(())
}

/// `archive/<name>`, or `archive/<stem> (n)<ext>` with the first free `n`
/// when an archived entry already uses that name.
fn free_archive_path(archive_dir: &Path, name: &Path) -> PathBuf {
    let candidate = archive_dir.join(name);
    if !candidate.exists() {
        return candidate;
    }

    let stem = name
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    let mut n = 2;
    loop {
        let candidate = archive_dir.join(format!("{} ({}){}", stem, n, ext));
        if !candidate.exists() {
            warn!(
                name = %name.display(),
                archived_as = %candidate.display(),
                "archive name taken, using a numbered one"
            );
            return candidate;
        }
        n += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (TempDir, FileStore) {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().join("todo"));
        (dir, store)
    }

    fn entry(title: &str) -> Entry {
        Entry::new(title.to_string(), String::new(), None)
    }

    #[test]
    fn missing_directory_lists_empty() {
        let (_dir, store) = setup();
        assert!(store.list_all().unwrap().is_empty());
        assert!(store.list_archived().unwrap().is_empty());
    }

    #[test]
    fn insert_writes_title_named_file() {
        let (_dir, store) = setup();
        let mut e = entry("Buy milk");
        store.insert(&mut e).unwrap();

        let expected = store.root().join("Buy milk.yml");
        assert_eq!(e.location.as_deref(), Some(expected.as_path()));
        assert!(expected.exists());

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, e.id);
    }

    #[test]
    fn insert_refuses_existing_filename() {
        let (_dir, store) = setup();
        let mut first = entry("Same");
        store.insert(&mut first).unwrap();

        let mut second = entry("Same");
        let err = store.insert(&mut second).unwrap_err();
        assert!(matches!(err, TodoError::AlreadyExists(_)));
        assert!(second.location.is_none());

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, first.id);
    }

    #[test]
    fn custom_extension_is_normalized() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).with_file_ext("yaml");
        assert_eq!(store.file_ext(), ".yaml");

        let mut e = entry("Note");
        store.insert(&mut e).unwrap();
        assert!(dir.path().join("Note.yaml").exists());
    }

    #[test]
    fn find_by_id_locates_renamed_files() {
        let (_dir, store) = setup();
        let mut e = entry("Original");
        store.insert(&mut e).unwrap();

        let renamed = store.root().join("something else.yml");
        fs::rename(e.location.as_ref().unwrap(), &renamed).unwrap();

        let found = store.find_by_id(&e.id).unwrap();
        assert_eq!(found.title, "Original");
        assert_eq!(found.location, Some(renamed));
    }

    #[test]
    fn find_by_id_not_found() {
        let (_dir, store) = setup();
        let err = store.find_by_id(&Uuid::new_v4()).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn update_overwrites_in_place() {
        let (_dir, store) = setup();
        let mut e = entry("Call mom");
        store.insert(&mut e).unwrap();

        e.details = "about sunday".to_string();
        store.update(&e).unwrap();

        let found = store.find_by_id(&e.id).unwrap();
        assert_eq!(found.details, "about sunday");
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn update_without_location_fails() {
        let (_dir, store) = setup();
        let err = store.update(&entry("Nowhere")).unwrap_err();
        assert!(matches!(err, TodoError::Store(_)));
    }

    #[test]
    fn delete_removes_file_and_fails_when_gone() {
        let (_dir, store) = setup();
        let mut e = entry("Temp");
        store.insert(&mut e).unwrap();

        store.delete(&e).unwrap();
        assert!(store.list_all().unwrap().is_empty());

        let err = store.delete(&e).unwrap_err();
        assert!(matches!(err, TodoError::Io(_)));
    }

    #[test]
    fn archive_moves_entry_out_of_listing() {
        let (_dir, store) = setup();
        let mut e = entry("Pay rent");
        store.insert(&mut e).unwrap();

        store.archive(&mut e).unwrap();

        let archived_path = store.archive_dir().join("Pay rent.yml");
        assert_eq!(e.location.as_deref(), Some(archived_path.as_path()));
        assert!(store.list_all().unwrap().is_empty());

        let archived = store.list_archived().unwrap();
        assert_eq!(archived.len(), 1);
        assert_eq!(archived[0].id, e.id);
    }

    #[test]
    fn archive_keeps_earlier_entry_with_same_name() {
        let (_dir, store) = setup();
        let mut first = entry("Pay rent");
        store.insert(&mut first).unwrap();
        store.archive(&mut first).unwrap();

        let mut second = entry("Pay rent");
        store.insert(&mut second).unwrap();
        store.archive(&mut second).unwrap();

        assert_eq!(
            second.location,
            Some(store.archive_dir().join("Pay rent (2).yml"))
        );
        let archived = store.list_archived().unwrap();
        assert_eq!(archived.len(), 2);
        assert!(archived.iter().any(|e| e.id == first.id));
        assert!(archived.iter().any(|e| e.id == second.id));
    }

    struct FailingWriter;

    impl Write for FailingWriter {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("disk full"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_write_leaves_no_file_behind() {
        let (_dir, store) = setup();
        let mut good = entry("Good");
        store.insert(&mut good).unwrap();

        let path = store.root().join("Broken.yml");
        fs::write(&path, "").unwrap();
        let err = write_new_file(FailingWriter, &path, b"title: Broken").unwrap_err();

        assert!(matches!(err, TodoError::Io(_)));
        assert!(!path.exists());
        assert_eq!(store.list_all().unwrap().len(), 1);
    }

    #[test]
    fn scan_skips_config_file_and_subdirectories() {
        let (_dir, store) = setup();
        let mut e = entry("Real");
        store.insert(&mut e).unwrap();

        fs::write(store.root().join("config.json"), "{ not yaml").unwrap();
        fs::write(store.root().join("CONFIG.JSON"), "{ not yaml").unwrap();
        fs::create_dir_all(store.root().join("nested")).unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Real");
    }

    #[test]
    fn strict_policy_fails_on_invalid_file() {
        let (_dir, store) = setup();
        let mut e = entry("Good");
        store.insert(&mut e).unwrap();
        fs::write(
            store.root().join("bad.yml"),
            "title: Bad\nid: abc651b1-69ea-4ce3-abac-0f1e829623d5\nnotification:\n  type: always\n",
        )
        .unwrap();

        let err = store.list_all().unwrap_err();
        assert!(matches!(err, TodoError::Validation { .. }));
    }

    #[test]
    fn skip_policy_leaves_out_invalid_files() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::new(dir.path().to_path_buf()).with_decode_policy(DecodePolicy::Skip);
        let mut e = entry("Good");
        store.insert(&mut e).unwrap();
        fs::write(dir.path().join("garbage.yml"), "::: nope [").unwrap();

        let listed = store.list_all().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].title, "Good");
    }
}

//! Per-project release records
//!
//! Each project has one `<name>.toml` file holding a `[defaults]` table:
//!
//! ```toml
//! [defaults]
//! Version = "1.2.0"
//! TarballName = "foo"
//! Disabled = false
//! Release = 4
//! Path = "/srv/checkouts/foo"
//! ```
//!
//! The file is edited in place with `toml_edit`, so keys and comments acb does
//! not manage survive every rewrite. A record has a single writer: editing it
//! by hand while a run is in progress is unsupported.

use crate::core::error::{AcbError, AcbResult, ConfigError, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use toml_edit::{DocumentMut, Item, Table, value};

const SECTION: &str = "defaults";
const KEY_VERSION: &str = "Version";
const KEY_TARBALL: &str = "TarballName";
const KEY_LEGACY_TARBALL: &str = "PackageName";
const KEY_DISABLED: &str = "Disabled";
const KEY_RELEASE: &str = "Release";
const KEY_PATH: &str = "Path";

/// Persisted configuration of one project
#[derive(Debug, Clone)]
pub struct ProjectRecord {
  pub name: String,
  /// Explicit version override
  pub version: Option<String>,
  /// Tarball base name override
  pub tarball_name: Option<String>,
  pub disabled: bool,
  /// Release counter, bumped once per successful package build
  pub release: u32,
  /// Source path override
  pub path: Option<PathBuf>,
  file: PathBuf,
  doc: DocumentMut,
}

impl ProjectRecord {
  /// File backing this record
  pub fn file(&self) -> &Path {
    &self.file
  }

  fn from_document(name: &str, file: PathBuf, doc: DocumentMut) -> AcbResult<Self> {
    let mut record = Self {
      name: name.to_string(),
      version: None,
      tarball_name: None,
      disabled: false,
      release: 0,
      path: None,
      file,
      doc,
    };

    let Some(item) = record.doc.get(SECTION) else {
      return Ok(record);
    };
    let table = item.as_table().ok_or_else(|| record.invalid(SECTION, "expected a table"))?;

    let version = record.read_string(table, KEY_VERSION)?;
    let tarball_name = match record.read_string(table, KEY_TARBALL)? {
      Some(name) => Some(name),
      None => record.read_string(table, KEY_LEGACY_TARBALL)?,
    };
    let path = record.read_string(table, KEY_PATH)?.map(PathBuf::from);

    let disabled = match table.get(KEY_DISABLED) {
      None => false,
      Some(item) => item
        .as_bool()
        .ok_or_else(|| record.invalid(KEY_DISABLED, "expected true or false"))?,
    };

    let release = match table.get(KEY_RELEASE) {
      None => 0,
      Some(item) => {
        let raw = item
          .as_integer()
          .ok_or_else(|| record.invalid(KEY_RELEASE, "expected an integer"))?;
        u32::try_from(raw).map_err(|_| record.invalid(KEY_RELEASE, &format!("{} is out of range", raw)))?
      }
    };

    record.version = version;
    record.tarball_name = tarball_name;
    record.path = path;
    record.disabled = disabled;
    record.release = release;
    Ok(record)
  }

  /// Read a string key as written; blank strings count as unset
  fn read_string(&self, table: &Table, key: &str) -> AcbResult<Option<String>> {
    match table.get(key) {
      None => Ok(None),
      Some(item) => {
        let text = item.as_str().ok_or_else(|| self.invalid(key, "expected a string"))?;
        Ok((!text.trim().is_empty()).then(|| text.to_string()))
      }
    }
  }

  fn invalid(&self, field: &str, reason: &str) -> AcbError {
    AcbError::Config(ConfigError::InvalidField {
      path: self.file.clone(),
      field: field.to_string(),
      reason: reason.to_string(),
    })
  }

  /// Write managed fields into the document, leaving everything else alone
  fn sync_document(&mut self) -> AcbResult<()> {
    if !self.doc.contains_key(SECTION) {
      self.doc.insert(SECTION, Item::Table(Table::new()));
    }
    let file = self.file.clone();
    let table = self.doc[SECTION].as_table_mut().ok_or_else(|| {
      AcbError::Config(ConfigError::InvalidField {
        path: file,
        field: SECTION.to_string(),
        reason: "expected a table".to_string(),
      })
    })?;

    match &self.version {
      Some(version) => table.insert(KEY_VERSION, value(version.as_str())),
      None => table.remove(KEY_VERSION),
    };
    match &self.tarball_name {
      Some(name) if table.contains_key(KEY_LEGACY_TARBALL) && !table.contains_key(KEY_TARBALL) => {
        table.insert(KEY_LEGACY_TARBALL, value(name.as_str()))
      }
      Some(name) => table.insert(KEY_TARBALL, value(name.as_str())),
      None => table.remove(KEY_TARBALL),
    };
    match &self.path {
      Some(path) => table.insert(KEY_PATH, value(path.to_string_lossy().into_owned())),
      None => table.remove(KEY_PATH),
    };
    if self.disabled || table.contains_key(KEY_DISABLED) {
      table.insert(KEY_DISABLED, value(self.disabled));
    }
    table.insert(KEY_RELEASE, value(i64::from(self.release)));
    Ok(())
  }
}

/// Directory of project records
#[derive(Debug, Clone)]
pub struct ReleaseStore {
  dir: PathBuf,
}

impl ReleaseStore {
  pub fn new(dir: impl Into<PathBuf>) -> Self {
    Self { dir: dir.into() }
  }

  /// Directory holding the records
  pub fn dir(&self) -> &Path {
    &self.dir
  }

  /// Path of the record file for a project
  pub fn record_path(&self, name: &str) -> PathBuf {
    self.dir.join(format!("{}.toml", name))
  }

  /// Load a project's record, creating an empty one if absent
  pub fn load(&self, name: &str) -> AcbResult<ProjectRecord> {
    validate_name(name)?;
    let file = self.record_path(name);

    if !file.exists() {
      fs::create_dir_all(&self.dir).with_context(|| format!("Failed to create {}", self.dir.display()))?;
      fs::write(&file, format!("[{}]\n", SECTION))
        .with_context(|| format!("Failed to create project record {}", file.display()))?;
      tracing::debug!(project = name, path = %file.display(), "created project record");
    }

    self.read(name)
  }

  /// Load a project's record without touching disk; an absent file reads as empty
  pub fn read(&self, name: &str) -> AcbResult<ProjectRecord> {
    validate_name(name)?;
    let file = self.record_path(name);
    if !file.exists() {
      return ProjectRecord::from_document(name, file, DocumentMut::new());
    }

    let content =
      fs::read_to_string(&file).with_context(|| format!("Failed to read project record {}", file.display()))?;
    let doc = content
      .parse::<DocumentMut>()
      .with_context(|| format!("Failed to parse project record {}", file.display()))?;
    ProjectRecord::from_document(name, file, doc)
  }

  /// Write the record back, overwriting only the managed keys
  pub fn persist(&self, record: &mut ProjectRecord) -> AcbResult<()> {
    record.sync_document()?;
    fs::write(&record.file, record.doc.to_string())
      .with_context(|| format!("Failed to write project record {}", record.file.display()))?;
    Ok(())
  }

  /// Increment the release counter and persist it
  ///
  /// The in-memory counter is left untouched if the write fails.
  pub fn bump(&self, record: &mut ProjectRecord) -> AcbResult<u32> {
    let previous = record.release;
    record.release = previous
      .checked_add(1)
      .ok_or_else(|| AcbError::message(format!("Release counter for '{}' overflowed", record.name)))?;

    if let Err(err) = self.persist(record) {
      record.release = previous;
      return Err(err);
    }
    Ok(record.release)
  }
}

/// Project names become file names; keep them to a single path component
fn validate_name(name: &str) -> AcbResult<()> {
  if name.is_empty() || name.starts_with('.') || name.contains('/') || name.contains('\\') {
    return Err(AcbError::with_help(
      format!("Invalid project name '{}'", name),
      "Project names are directory names under the code root.",
    ));
  }
  Ok(())
}

use std::{
    fs::{self, File},
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use mtrack_core::{storage_key, validate_storage_key, Clock, CoreError, LedgerStorage, SystemClock};
use mtrack_domain::Transaction;

const RECORD_SUFFIX: &str = "_transactions";
const RECORD_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Filesystem-backed JSON persistence: one record file per user.
#[derive(Clone)]
pub struct JsonLedgerStorage {
    data_dir: PathBuf,
    clock: Arc<dyn Clock>,
}

impl JsonLedgerStorage {
    pub fn new(data_dir: PathBuf) -> Result<Self, CoreError> {
        Self::with_clock(data_dir, Arc::new(SystemClock))
    }

    /// Uses `clock` to stamp `last_updated` on every save.
    pub fn with_clock(data_dir: PathBuf, clock: Arc<dyn Clock>) -> Result<Self, CoreError> {
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir, clock })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Location of the record for `user`: `<data_dir>/<key>_transactions.json`.
    pub fn record_path(&self, user: &str) -> PathBuf {
        self.data_dir.join(format!(
            "{}{}.{}",
            storage_key(user),
            RECORD_SUFFIX,
            RECORD_EXTENSION
        ))
    }

    /// Reads the full stored record for `user`, if one exists.
    pub fn read_record(&self, user: &str) -> Result<Option<LedgerRecord>, CoreError> {
        ensure_safe_key(user)?;
        let path = self.record_path(user);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(CoreError::persistence(format!(
                    "unable to read `{}`: {err}",
                    path.display()
                )))
            }
        };
        let record = serde_json::from_str(&data).map_err(|err| {
            CoreError::persistence(format!("malformed record `{}`: {err}", path.display()))
        })?;
        Ok(Some(record))
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn save(&self, user: &str, transactions: &[Transaction]) -> Result<(), CoreError> {
        ensure_safe_key(user)?;
        let path = self.record_path(user);
        let record = RecordRef {
            user,
            transactions,
            last_updated: self.clock.now().to_rfc3339_opts(SecondsFormat::Secs, true),
        };
        let json = serde_json::to_string_pretty(&record)
            .map_err(|err| CoreError::persistence(err.to_string()))?;
        save_json_to_path(&json, &path)?;
        info!(
            user,
            path = %path.display(),
            transactions = transactions.len(),
            "saved ledger record"
        );
        Ok(())
    }

    fn load(&self, user: &str) -> Result<Vec<Transaction>, CoreError> {
        let record = self.read_record(user)?;
        debug!(user, found = record.is_some(), "loaded ledger record");
        Ok(record.map(|record| record.transactions).unwrap_or_default())
    }
}

/// On-disk shape of a user's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerRecord {
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
    #[serde(default)]
    pub last_updated: Option<String>,
}

#[derive(Serialize)]
struct RecordRef<'a> {
    user: &'a str,
    transactions: &'a [Transaction],
    last_updated: String,
}

/// Writes `json` to `path` through a sibling temp file and a rename, so a
/// failed write leaves any previous file intact.
pub fn save_json_to_path(json: &str, path: &Path) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    if let Err(err) = write_atomic(&tmp, json) {
        let _ = fs::remove_file(&tmp);
        return Err(err);
    }
    fs::rename(&tmp, path)?;
    Ok(())
}

fn ensure_safe_key(user: &str) -> Result<(), CoreError> {
    validate_storage_key(user).map_err(|err| match err {
        CoreError::Validation(message) => CoreError::Persistence(message),
        other => other,
    })
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{}.{}", existing, TMP_SUFFIX),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_atomic(path: &Path, data: &str) -> Result<(), CoreError> {
    let mut file = File::create(path)?;
    file.write_all(data.as_bytes())?;
    file.flush()?;
    file.sync_all()?;
    Ok(())
}

//! JSON-file-based repository backend.
//!
//! Stores each kind of state in a separate JSON file under a configurable
//! directory (default: `$XDG_DATA_HOME/storefront-rs/`).

use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

#[cfg(feature = "async")]
use core::future::{self, Future};

use chrono::Utc;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{Result, StorefrontError};
use crate::models::{Cart, CatalogEntry, EntryId, Location, Order};
use crate::normalize;

/// Application name used for the XDG data directory.
const APP_NAME: &str = "storefront-rs";

/// File name for user-submitted catalog entries.
const RESTAURANTS_FILE: &str = "restaurants.json";
/// File name for the cached location.
const LOCATION_FILE: &str = "location.json";
/// File name for the cart.
const CART_FILE: &str = "cart.json";
/// File name for the order history.
const ORDERS_FILE: &str = "orders.json";
/// Sentinel file used for cross-process file locking.
const LOCK_FILE: &str = "storage.lock";

/// Every data file, for [`FileStorage::clear_all`].
const DATA_FILES: [&str; 4] = [RESTAURANTS_FILE, LOCATION_FILE, CART_FILE, ORDERS_FILE];

/// File-backed repository that persists storefront state as JSON files.
///
/// User-submitted entries are read leniently: records that fail
/// validation are dropped, and a document that is not a JSON array reads
/// as an empty catalog. Writes work on the raw records, so a record the
/// reader drops stays in the file untouched, and a document that is not
/// an array is moved aside to `restaurants.json.<millis>.bak` before the
/// first write replaces it. The cart, orders and location degrade with a
/// warning, since they are best-effort client state.
///
/// # Concurrency
///
/// Thread safety within a single process is provided by an in-process
/// [`Mutex`]. Cross-process safety is achieved via an advisory file lock
/// on `storage.lock` (using [`std::fs::File::lock`] /
/// [`std::fs::File::lock_shared`]).
///
/// # File layout
///
/// ```text
/// <dir>/
///   storage.lock          (cross-process lock sentinel)
///   restaurants.json
///   location.json
///   cart.json
///   orders.json
/// ```
#[derive(Debug)]
pub struct FileStorage {
    /// Root directory containing all JSON files.
    dir: PathBuf,
    /// Mutex serializing concurrent in-process access.
    lock: Mutex<()>,
    /// Sentinel file for cross-process advisory locking.
    lock_file: fs::File,
}

impl FileStorage {
    /// Creates a new file storage rooted at the given directory.
    ///
    /// Creates the directory (and parents) if it does not exist, and opens
    /// (or creates) the `storage.lock` sentinel.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the lock
    /// file cannot be opened.
    #[inline]
    pub fn new(dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&dir).map_err(storage_io_error)?;
        let lock_file = fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(dir.join(LOCK_FILE))
            .map_err(storage_io_error)?;
        tracing::debug!(dir = %dir.display(), "opened file storage");
        Ok(Self {
            dir,
            lock: Mutex::new(()),
            lock_file,
        })
    }

    /// Returns the default XDG-compliant data directory for this application.
    ///
    /// On Linux: `$XDG_DATA_HOME/storefront-rs/` (typically
    /// `~/.local/share/storefront-rs/`).
    ///
    /// # Errors
    ///
    /// Returns an error if the platform data directory cannot be determined.
    #[inline]
    pub fn default_dir() -> Result<PathBuf> {
        dirs::data_dir()
            .map(|data_path| data_path.join(APP_NAME))
            .ok_or_else(|| {
                StorefrontError::Storage("could not determine platform data directory".into())
            })
    }

    // ── Private helpers ─────────────────────────────────────────────

    /// Returns the full path for a given file name.
    fn path(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Acquires an in-process mutex guard and a shared (read) file lock,
    /// executes `op`, then releases the file lock.
    fn with_shared_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock_shared().map_err(storage_io_error)?;
        let result = op();
        // The operation's own error wins over an unlock failure.
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Acquires an in-process mutex guard and an exclusive (write) file
    /// lock, executes `op`, then releases the file lock.
    fn with_exclusive_lock<R, F: FnOnce() -> Result<R>>(&self, op: F) -> Result<R> {
        let _guard: MutexGuard<'_, ()> = self.lock.lock().map_err(|err| lock_poison_error(&err))?;
        self.lock_file.lock().map_err(storage_io_error)?;
        let result = op();
        if let Err(err) = self.lock_file.unlock()
            && result.is_ok()
        {
            return Err(storage_io_error(err));
        }
        result
    }

    /// Reads a file as a string, or `None` if it does not exist.
    fn read_raw(&self, name: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.path(name)) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(None),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Reads the user-submitted catalog through the normalizer.
    fn read_entries(&self) -> Result<Vec<CatalogEntry>> {
        Ok(self
            .read_raw(RESTAURANTS_FILE)?
            .map(|contents| normalize::parse_catalog(&contents))
            .unwrap_or_default())
    }

    /// Reads the raw records of the user-submitted catalog.
    ///
    /// Returns `None` when the document exists but is not a JSON array.
    fn read_entry_records(&self) -> Result<Option<Vec<Value>>> {
        let Some(contents) = self.read_raw(RESTAURANTS_FILE)? else {
            return Ok(Some(Vec::new()));
        };
        if let Ok(Value::Array(records)) = serde_json::from_str::<Value>(&contents) {
            return Ok(Some(records));
        }
        Ok(None)
    }

    /// Moves an unreadable catalog document aside.
    fn back_up_entries(&self) -> Result<()> {
        let backup = format!("{RESTAURANTS_FILE}.{}.bak", Utc::now().timestamp_millis());
        fs::rename(self.path(RESTAURANTS_FILE), self.path(&backup)).map_err(storage_io_error)?;
        tracing::warn!(%backup, "catalog document is not a JSON array, moved aside");
        Ok(())
    }

    /// Reads and deserializes a JSON file, falling back to the default
    /// value when the file is missing or cannot be parsed.
    fn read_or_default<T: DeserializeOwned + Default>(&self, name: &str) -> Result<T> {
        let Some(contents) = self.read_raw(name)? else {
            return Ok(T::default());
        };
        Ok(serde_json::from_str(&contents).unwrap_or_else(|err| {
            tracing::warn!(file = name, error = %err, "unparsable storage file, treating as empty");
            T::default()
        }))
    }

    /// Atomically writes a serialized JSON file (write-to-tmp then rename).
    fn write_json<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        let path = self.path(name);
        let tmp_path = self.path(&format!("{name}.tmp"));
        let json = serde_json::to_string_pretty(value).map_err(StorefrontError::from)?;
        fs::write(&tmp_path, json).map_err(storage_io_error)?;
        fs::rename(&tmp_path, &path).map_err(storage_io_error)?;
        Ok(())
    }

    /// Deletes a file, ignoring a missing one.
    fn remove_path(&self, name: &str) -> Result<()> {
        match fs::remove_file(self.path(name)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == ErrorKind::NotFound => Ok(()),
            Err(err) => Err(storage_io_error(err)),
        }
    }

    /// Loads user entries (with lock).
    fn load_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.with_shared_lock(|| self.read_entries())
    }

    /// Merges entries into the catalog file by id.
    fn upsert_entries_file(&self, items: Vec<CatalogEntry>) -> Result<()> {
        if items.is_empty() {
            return Ok(());
        }
        self.with_exclusive_lock(|| {
            let mut records = match self.read_entry_records()? {
                Some(records) => records,
                None => {
                    self.back_up_entries()?;
                    Vec::new()
                }
            };
            for item in items {
                let id = item.id;
                let record = serde_json::to_value(item).map_err(StorefrontError::from)?;
                match records
                    .iter_mut()
                    .find(|stored| normalize::record_id(stored) == Some(id))
                {
                    Some(stored) => *stored = record,
                    None => records.push(record),
                }
            }
            self.write_json(RESTAURANTS_FILE, &records)
        })
    }

    /// Removes entries from the catalog file by id.
    fn remove_entries_file(&self, ids: &[EntryId]) -> Result<usize> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.with_exclusive_lock(|| {
            let Some(mut records) = self.read_entry_records()? else {
                return Ok(0);
            };
            let before = records.len();
            records.retain(|record| {
                normalize::record_id(record).is_none_or(|id| !ids.contains(&id))
            });
            let removed = before.saturating_sub(records.len());
            if removed > 0 {
                self.write_json(RESTAURANTS_FILE, &records)?;
            }
            Ok(removed)
        })
    }

    /// Loads the cached location (with lock); an invalid value is absent.
    fn load_location(&self) -> Result<Option<Location>> {
        self.with_shared_lock(|| {
            let cached: Option<Location> = self.read_or_default(LOCATION_FILE)?;
            Ok(cached.filter(Location::is_valid))
        })
    }

    /// Writes the cached location (with lock).
    fn store_location(&self, location: Location) -> Result<()> {
        self.with_exclusive_lock(|| self.write_json(LOCATION_FILE, &location))
    }

    /// Deletes the cached location (with lock).
    fn forget_location(&self) -> Result<()> {
        self.with_exclusive_lock(|| self.remove_path(LOCATION_FILE))
    }

    /// Loads the cart (with lock).
    fn load_cart(&self) -> Result<Cart> {
        self.with_shared_lock(|| self.read_or_default(CART_FILE))
    }

    /// Replaces the cart (with lock).
    fn store_cart(&self, cart: &Cart) -> Result<()> {
        self.with_exclusive_lock(|| self.write_json(CART_FILE, cart))
    }

    /// Loads the order history (with lock).
    fn load_orders(&self) -> Result<Vec<Order>> {
        self.with_shared_lock(|| self.read_or_default(ORDERS_FILE))
    }

    /// Appends one order (with lock).
    fn append_order(&self, order: Order) -> Result<()> {
        self.with_exclusive_lock(|| {
            let mut orders: Vec<Order> = self.read_or_default(ORDERS_FILE)?;
            orders.push(order);
            self.write_json(ORDERS_FILE, &orders)
        })
    }

    /// Deletes all data files.
    ///
    /// The `storage.lock` sentinel is preserved; it is infrastructure,
    /// not data.
    fn clear_all(&self) -> Result<()> {
        self.with_exclusive_lock(|| {
            for name in DATA_FILES {
                self.remove_path(name)?;
            }
            Ok(())
        })
    }
}

// ── Free-standing helpers ───────────────────────────────────────────────

/// Wraps an I/O error into a [`StorefrontError::Storage`].
fn storage_io_error(err: std::io::Error) -> StorefrontError {
    StorefrontError::Storage(Box::new(err))
}

/// Wraps a mutex poison error into a [`StorefrontError::Storage`].
fn lock_poison_error<T>(err: &std::sync::PoisonError<T>) -> StorefrontError {
    StorefrontError::Storage(err.to_string().into())
}

// ── BlockingRepository implementation ───────────────────────────────────

#[cfg(feature = "blocking")]
impl super::BlockingRepository for FileStorage {
    #[inline]
    fn user_entries(&self) -> Result<Vec<CatalogEntry>> {
        self.load_entries()
    }

    #[inline]
    fn upsert_user_entries(&self, items: Vec<CatalogEntry>) -> Result<()> {
        self.upsert_entries_file(items)
    }

    #[inline]
    fn remove_user_entries(&self, ids: &[EntryId]) -> Result<usize> {
        self.remove_entries_file(ids)
    }

    #[inline]
    fn location(&self) -> Result<Option<Location>> {
        self.load_location()
    }

    #[inline]
    fn set_location(&self, location: Location) -> Result<()> {
        self.store_location(location)
    }

    #[inline]
    fn clear_location(&self) -> Result<()> {
        self.forget_location()
    }

    #[inline]
    fn cart(&self) -> Result<Cart> {
        self.load_cart()
    }

    #[inline]
    fn set_cart(&self, cart: Cart) -> Result<()> {
        self.store_cart(&cart)
    }

    #[inline]
    fn orders(&self) -> Result<Vec<Order>> {
        self.load_orders()
    }

    #[inline]
    fn push_order(&self, order: Order) -> Result<()> {
        self.append_order(order)
    }

    #[inline]
    fn clear(&self) -> Result<()> {
        self.clear_all()
    }
}

// ── Repository (async) implementation ───────────────────────────────────

#[cfg(feature = "async")]
impl super::Repository for FileStorage {
    #[inline]
    fn user_entries(&self) -> impl Future<Output = Result<Vec<CatalogEntry>>> + Send {
        future::ready(self.load_entries())
    }

    #[inline]
    fn upsert_user_entries(
        &self,
        items: Vec<CatalogEntry>,
    ) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.upsert_entries_file(items))
    }

    #[inline]
    fn remove_user_entries(&self, ids: &[EntryId]) -> impl Future<Output = Result<usize>> + Send {
        future::ready(self.remove_entries_file(ids))
    }

    #[inline]
    fn location(&self) -> impl Future<Output = Result<Option<Location>>> + Send {
        future::ready(self.load_location())
    }

    #[inline]
    fn set_location(&self, location: Location) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.store_location(location))
    }

    #[inline]
    fn clear_location(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.forget_location())
    }

    #[inline]
    fn cart(&self) -> impl Future<Output = Result<Cart>> + Send {
        future::ready(self.load_cart())
    }

    #[inline]
    fn set_cart(&self, cart: Cart) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.store_cart(&cart))
    }

    #[inline]
    fn orders(&self) -> impl Future<Output = Result<Vec<Order>>> + Send {
        future::ready(self.load_orders())
    }

    #[inline]
    fn push_order(&self, order: Order) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.append_order(order))
    }

    #[inline]
    fn clear(&self) -> impl Future<Output = Result<()>> + Send {
        future::ready(self.clear_all())
    }
}

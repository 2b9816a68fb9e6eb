//! File-backed resources

use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use bytes::Bytes;

use super::{Resource, ResourceFactory};
use crate::error::{self, Result};

/// Body stored in its own file, deleted on dispose
#[derive(Debug)]
pub struct FileResource {
    path: PathBuf,
    len: u64,
    disposed: AtomicBool,
}

impl FileResource {
    /// Wrap an existing file; the resource takes ownership of it
    ///
    /// # Errors
    ///
    /// Returns a resource error if the file metadata cannot be read.
    pub fn new(path: PathBuf) -> Result<Self> {
        let len = fs::metadata(&path).map_err(error::resource)?.len();
        Ok(Self {
            path,
            len,
            disposed: AtomicBool::new(false),
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Resource for FileResource {
    fn len(&self) -> u64 {
        self.len
    }

    fn open(&self) -> Result<Box<dyn Read + Send>> {
        if self.disposed.load(Ordering::Acquire) {
            return Err(error::resource("file resource already disposed"));
        }
        let file = File::open(&self.path).map_err(error::resource)?;
        Ok(Box::new(file))
    }

    fn dispose(&self) {
        if self.disposed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Err(e) = fs::remove_file(&self.path) {
            tracing::debug!(
                target: "varcache::resource",
                path = %self.path.display(),
                error = %e,
                "Failed to delete disposed file resource"
            );
        }
    }
}

impl Drop for FileResource {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Factory writing each captured body into a uniquely named file
#[derive(Debug)]
pub struct FileResourceFactory {
    directory: PathBuf,
    counter: AtomicU64,
}

impl FileResourceFactory {
    /// Use `directory` for body files, creating it if needed
    ///
    /// # Errors
    ///
    /// Returns a resource error if the directory cannot be created.
    pub fn new(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        fs::create_dir_all(&directory).map_err(error::resource)?;
        Ok(Self {
            directory,
            counter: AtomicU64::new(0),
        })
    }

    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    fn file_name(&self, request_id: &str) -> String {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis();
        let sequence = self.counter.fetch_add(1, Ordering::Relaxed);
        let suffix: String = request_id
            .chars()
            .filter(char::is_ascii_alphanumeric)
            .take(100)
            .collect();
        format!("{millis:x}.{sequence:x}.{:08x}.{suffix}", fastrand::u32(..))
    }
}

impl ResourceFactory for FileResourceFactory {
    fn generate(&self, request_id: &str, content: Bytes) -> Result<Arc<dyn Resource>> {
        let path = self.directory.join(self.file_name(request_id));
        fs::write(&path, &content).map_err(error::resource)?;
        Ok(Arc::new(FileResource::new(path)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::read_all;

    fn scratch_dir() -> PathBuf {
        std::env::temp_dir().join(format!("varcache-file-{:016x}", fastrand::u64(..)))
    }

    #[test]
    fn test_file_resource_lifecycle() {
        let dir = scratch_dir();
        let factory = FileResourceFactory::new(&dir).unwrap();
        let resource = factory
            .generate("http://example.com:80/a", Bytes::from_static(b"payload"))
            .unwrap();

        assert_eq!(resource.len(), 7);
        assert_eq!(read_all(resource.as_ref()).unwrap(), Bytes::from_static(b"payload"));
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 1);

        resource.dispose();
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        assert!(resource.open().is_err());

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_drop_deletes_file() {
        let dir = scratch_dir();
        let factory = FileResourceFactory::new(&dir).unwrap();
        let resource = factory.generate("k", Bytes::from_static(b"1")).unwrap();
        drop(resource);
        assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);
        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_file_names_are_unique() {
        let dir = scratch_dir();
        let factory = FileResourceFactory::new(&dir).unwrap();
        assert_ne!(factory.file_name("same"), factory.file_name("same"));
        fs::remove_dir_all(&dir).unwrap();
    }
}

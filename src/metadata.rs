use crate::types::StringHashMap;

use std::path::Path;
use std::cell::RefCell;
use std::time::SystemTime;

pub trait FileSystem {
    /// `None` when `path` does not exist.
    fn modified(&self, path: &str) -> Option::<SystemTime>;

    #[inline(always)]
    fn exists(&self, path: &str) -> bool {
        self.modified(path).is_some()
    }

    /// Called after commands ran and may have touched the filesystem.
    #[inline(always)]
    fn invalidate(&self) {}
}

#[derive(Debug, Default)]
pub struct MetadataCache {
    files: RefCell::<StringHashMap::<Option::<SystemTime>>>
}

impl FileSystem for MetadataCache {
    #[inline]
    fn modified(&self, path: &str) -> Option::<SystemTime> {
        if let Some(mtime) = self.files.borrow().get(path) {
            return *mtime
        }

        let p: &Path = path.as_ref();
        let mtime = p.metadata().and_then(|m| m.modified()).ok();
        self.files.borrow_mut().insert(path.to_owned(), mtime);
        mtime
    }

    #[inline(always)]
    fn invalidate(&self) {
        self.files.borrow_mut().clear()
    }
}

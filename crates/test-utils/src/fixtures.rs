use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration, SystemTime};

/// A timestamp `secs` seconds in the past.
pub fn secs_ago(secs: u64) -> SystemTime {
    SystemTime::now() - Duration::from_secs(secs)
}

/// Write `contents` to `path` (creating parents) and set its modification time.
pub fn write_file_at(path: &Path, contents: &str, modified: SystemTime) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
    set_mtime(path, modified);
}

pub fn set_mtime(path: &Path, modified: SystemTime) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(modified).unwrap();
}

pub fn mtime(path: &Path) -> SystemTime {
    fs::metadata(path).unwrap().modified().unwrap()
}

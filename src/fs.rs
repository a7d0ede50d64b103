//! Filesystem seam for the commands that read uploads and write exports.

use std::io::{self, Write};
use std::path::Path;

pub trait FileSystem: Send + Sync {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Write bytes, replacing any existing file.
    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    /// Write bytes only if the file does not exist yet (`AlreadyExists` otherwise).
    fn create_new(&self, path: &Path, content: &[u8]) -> io::Result<()>;

    fn exists(&self, path: &Path) -> bool;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct RealFs;

impl FileSystem for RealFs {
    fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
        std::fs::read(path)
    }

    fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        std::fs::write(path, content)
    }

    fn create_new(&self, path: &Path, content: &[u8]) -> io::Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)?;
        file.write_all(content)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}

pub fn default_fs() -> &'static RealFs {
    static INSTANCE: RealFs = RealFs;
    &INSTANCE
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashMap;
    use std::sync::RwLock;

    /// In-memory filesystem for testing.
    #[derive(Debug, Default)]
    pub struct MockFs {
        files: RwLock<HashMap<String, Vec<u8>>>,
    }

    fn key(path: &Path) -> String {
        path.to_string_lossy().to_string()
    }

    impl MockFs {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_files<I, P, C>(files: I) -> Self
        where
            I: IntoIterator<Item = (P, C)>,
            P: AsRef<Path>,
            C: Into<Vec<u8>>,
        {
            let map = files
                .into_iter()
                .map(|(p, c)| (key(p.as_ref()), c.into()))
                .collect();
            Self {
                files: RwLock::new(map),
            }
        }

        pub fn contents(&self, path: &Path) -> Option<String> {
            self.files
                .read()
                .unwrap()
                .get(&key(path))
                .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
        }
    }

    impl FileSystem for MockFs {
        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            let key = key(path);
            self.files
                .read()
                .unwrap()
                .get(&key)
                .cloned()
                .ok_or_else(|| {
                    io::Error::new(io::ErrorKind::NotFound, format!("file not found: {}", key))
                })
        }

        fn write(&self, path: &Path, content: &[u8]) -> io::Result<()> {
            self.files.write().unwrap().insert(key(path), content.to_vec());
            Ok(())
        }

        fn create_new(&self, path: &Path, content: &[u8]) -> io::Result<()> {
            let mut files = self.files.write().unwrap();
            let key = key(path);
            if files.contains_key(&key) {
                return Err(io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    format!("file exists: {}", key),
                ));
            }
            files.insert(key, content.to_vec());
            Ok(())
        }

        fn exists(&self, path: &Path) -> bool {
            self.files.read().unwrap().contains_key(&key(path))
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn test_mock_fs_read_write() {
            let fs = MockFs::new();
            let path = Path::new("/exports/analysis_export.json");

            assert!(!fs.exists(path));
            assert!(fs.read(path).is_err());

            fs.write(path, b"{}").unwrap();
            assert!(fs.exists(path));
            assert_eq!(fs.read(path).unwrap(), b"{}");
        }

        #[test]
        fn test_create_new_refuses_overwrite() {
            let fs = MockFs::with_files([(Path::new("/.ringlens.toml"), "old")]);
            let err = fs
                .create_new(Path::new("/.ringlens.toml"), b"new")
                .unwrap_err();
            assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
            assert_eq!(fs.contents(Path::new("/.ringlens.toml")).unwrap(), "old");
        }
    }
}

use path_slash::PathBufExt;
use std::{
    collections::HashMap,
    fs::File,
    io::{Error, Write},
    path::{Path, PathBuf},
};

/// A temporary directory that is deleted when dropped, including when the
/// owning test panics.
pub struct TmpDir {
    tmp_root: tempfile::TempDir,
    canonical_root: PathBuf,
}

#[macro_export]
macro_rules! test_tmpdir(
    { $($key:expr => $value:expr),+ } => {
        {
            use test_tmpdir::TmpDir;
            let mut m = ::std::collections::HashMap::new();
            $(
                m.insert(String::from($key), $value);
            )+

            TmpDir::new_with_content(&m)
        }
    };
);

impl Default for TmpDir {
    fn default() -> Self {
        Self::new()
    }
}

impl TmpDir {
    pub fn new() -> TmpDir {
        let root = tempfile::tempdir().unwrap();
        let canonical_root = std::fs::canonicalize(&root).unwrap();
        TmpDir {
            tmp_root: root,
            canonical_root,
        }
    }

    pub fn new_with_content(content: &HashMap<String, &str>) -> TmpDir {
        let out = Self::new();
        out.write_batch(content).unwrap();
        out
    }

    pub fn write_batch(&self, content: &HashMap<String, &str>) -> Result<(), Error> {
        for (path, content) in content {
            let target = self.root_join(path);
            // mkdir -p
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let mut file = File::create(target)?;
            file.write_all(content.as_bytes())?;
        }
        Ok(())
    }

    pub fn read(&self, path: &str) -> Result<String, Error> {
        std::fs::read_to_string(self.root_join(path))
    }

    pub fn root(&self) -> &Path {
        &self.canonical_root
    }

    pub fn root_join<S: AsRef<str>>(&self, other: S) -> PathBuf {
        self.canonical_root
            .to_owned()
            .join(PathBuf::from_slash(other))
    }
}

#[cfg(test)]
mod test {
    use super::TmpDir;
    use std::collections::HashMap;

    #[test]
    fn test_writes_nested_content_and_cleans_up() {
        let mut content = HashMap::new();
        content.insert("src/app.ts".to_string(), "Button();\n");
        let tmpdir = TmpDir::new_with_content(&content);
        let root = tmpdir.root().to_path_buf();

        assert_eq!(tmpdir.read("src/app.ts").unwrap(), "Button();\n");
        assert!(tmpdir.root_join("src/app.ts").is_file());

        drop(tmpdir);
        assert!(!root.exists());
    }
}

//! Writing generated files to disk.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use canvas_model::GeneratedFile;

use crate::error::{TerraformError, TerraformResult};

/// Write `files` into `dir`, creating it if needed. Returns the written
/// paths in input order.
///
/// File names must be plain names. Anything with a directory component is
/// rejected before any file is written.
pub fn write_files(dir: &Path, files: &[GeneratedFile]) -> TerraformResult<Vec<PathBuf>> {
    for file in files {
        let name = Path::new(&file.filename);
        let plain = name.file_name().map(|n| n == name.as_os_str()).unwrap_or(false);
        if !plain {
            return Err(TerraformError::InvalidFileName(file.filename.clone()));
        }
    }

    fs::create_dir_all(dir)?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = dir.join(&file.filename);
        fs::write(&path, &file.content)?;
        debug!("Wrote {:?} ({} bytes)", path, file.content.len());
        written.push(path);
    }

    info!("Wrote {} files to {:?}", written.len(), dir);
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_writes_into_new_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("terraform");
        let files = vec![
            GeneratedFile::new("provider.tf", "provider \"google\" {\n}\n"),
            GeneratedFile::new("variables.tf", ""),
        ];

        let written = write_files(&out, &files).unwrap();
        assert_eq!(written.len(), 2);
        assert_eq!(
            fs::read_to_string(out.join("provider.tf")).unwrap(),
            "provider \"google\" {\n}\n"
        );
    }

    #[test]
    fn test_rejects_path_traversal() {
        let dir = tempdir().unwrap();
        let files = vec![GeneratedFile::new("../escape.tf", "")];

        let err = write_files(dir.path(), &files).unwrap_err();
        assert!(matches!(err, TerraformError::InvalidFileName(_)));
        assert!(!dir.path().join("../escape.tf").exists());
    }
}

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use camino::Utf8Path;
use zip::ZipArchive;

use crate::error::TrackError;

/// Splits the final path component into its stem and every trailing
/// extension, so `archive.tar.gz` gives `("archive", ".tar.gz")`.
///
/// A leading dot marks a hidden file and stays with the stem.
pub fn split_name_suffix(path: &Utf8Path) -> (String, String) {
    let Some(file_name) = path.file_name() else {
        return (String::new(), String::new());
    };
    let (prefix, rest) = match file_name.strip_prefix('.') {
        Some(rest) => (".", rest),
        None => ("", file_name),
    };
    match rest.split_once('.') {
        Some((stem, suffix)) => (format!("{prefix}{stem}"), format!(".{suffix}")),
        None => (file_name.to_string(), String::new()),
    }
}

/// MD5 of the whole file, as lowercase hex.
pub fn checksum(path: &Path) -> Result<String, TrackError> {
    let content = fs::read(path)
        .map_err(|err| TrackError::Filesystem(format!("read {}: {err}", path.display())))?;
    Ok(format!("{:x}", md5::compute(&content)))
}

/// Unpacks every file of `zip_path` below `target_dir` and returns the
/// paths written. Entries escaping `target_dir` abort the extraction.
pub fn extract_zip(zip_path: &Path, target_dir: &Path) -> Result<Vec<PathBuf>, TrackError> {
    let archive_file = fs::File::open(zip_path).map_err(|err| fs_error(zip_path, err))?;
    let mut archive = ZipArchive::new(archive_file)
        .map_err(|err| TrackError::Filesystem(format!("{}: {err}", zip_path.display())))?;

    let mut written = Vec::with_capacity(archive.len());
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|err| TrackError::Filesystem(format!("{}: {err}", zip_path.display())))?;
        let Some(relative) = entry.enclosed_name() else {
            return Err(TrackError::Filesystem(format!(
                "{}: entry {} leaves the target directory",
                zip_path.display(),
                entry.name()
            )));
        };
        let target = target_dir.join(relative);

        if entry.is_dir() {
            fs::create_dir_all(&target).map_err(|err| fs_error(&target, err))?;
            continue;
        }
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).map_err(|err| fs_error(parent, err))?;
        }
        let mut out = fs::File::create(&target).map_err(|err| fs_error(&target, err))?;
        io::copy(&mut entry, &mut out).map_err(|err| fs_error(&target, err))?;
        written.push(target);
    }
    Ok(written)
}

fn fs_error(path: &Path, err: io::Error) -> TrackError {
    TrackError::Filesystem(format!("{}: {err}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_plain_and_nested() {
        assert_eq!(
            split_name_suffix(Utf8Path::new("a")),
            ("a".to_string(), String::new())
        );
        assert_eq!(
            split_name_suffix(Utf8Path::new("d.x.y.z/f.a.b.c")),
            ("f".to_string(), ".a.b.c".to_string())
        );
    }

    #[test]
    fn split_hidden_file() {
        assert_eq!(
            split_name_suffix(Utf8Path::new(".bashrc")),
            (".bashrc".to_string(), String::new())
        );
        assert_eq!(
            split_name_suffix(Utf8Path::new("conf/.settings.json")),
            (".settings".to_string(), ".json".to_string())
        );
    }

    #[test]
    fn extract_zip_reports_written_files() {
        use std::io::Write;

        let temp = tempfile::tempdir().unwrap();
        let zip_path = temp.path().join("run.zip");
        let mut writer = zip::ZipWriter::new(fs::File::create(&zip_path).unwrap());
        let options = zip::write::SimpleFileOptions::default();
        writer.add_directory("run/", options).unwrap();
        writer.start_file("run/outs/matrix.mtx", options).unwrap();
        writer.write_all(b"%%MatrixMarket\n").unwrap();
        writer.finish().unwrap();

        let written = extract_zip(&zip_path, temp.path()).unwrap();
        assert_eq!(written, vec![temp.path().join("run/outs/matrix.mtx")]);
        assert!(temp.path().join("run").is_dir());
    }

    #[test]
    fn extract_zip_rejects_non_archives() {
        let temp = tempfile::tempdir().unwrap();
        let zip_path = temp.path().join("broken.zip");
        fs::write(&zip_path, b"partial-bytes").unwrap();

        let err = extract_zip(&zip_path, temp.path()).unwrap_err();
        assert!(matches!(err, TrackError::Filesystem(message) if message.contains("broken.zip")));
    }
}

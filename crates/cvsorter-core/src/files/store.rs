//! PDF listing, collision-free destination names and file moves.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Returns true if the path has a `.pdf` extension, in any letter case.
#[must_use]
pub fn is_pdf(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
}

/// List PDF files directly inside `folder`, sorted by full path.
///
/// Subdirectories are not descended into.
///
/// # Errors
///
/// Returns [`Error::NotFound`] if `folder` is not an existing directory,
/// or an I/O error if it cannot be read.
pub fn list_pdfs(folder: &Path) -> Result<Vec<PathBuf>> {
    if !folder.is_dir() {
        return Err(Error::NotFound(folder.to_path_buf()));
    }

    let mut pdfs = Vec::new();
    for entry in fs::read_dir(folder)? {
        let Ok(entry) = entry else { continue };
        let path = entry.path();
        // Follows symlinks, so a linked PDF is listed like a regular one.
        if path.is_file() && is_pdf(&path) {
            pdfs.push(path);
        }
    }

    pdfs.sort();
    debug!("Found {} PDFs in {}", pdfs.len(), folder.display());
    Ok(pdfs)
}

/// Pick a filename that does not exist yet in `dir`.
///
/// Returns `filename` itself when free, otherwise `stem_1.ext`, `stem_2.ext`
/// and so on. Nothing is created, so calling it twice without touching the
/// directory yields the same name.
#[must_use]
pub fn unique_destination(dir: &Path, filename: &str) -> String {
    if !dir.join(filename).exists() {
        return filename.to_string();
    }

    let name = Path::new(filename);
    let stem = name
        .file_stem()
        .map_or_else(|| filename.to_string(), |s| s.to_string_lossy().into_owned());
    let ext = name
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    let mut counter: u64 = 1;
    loop {
        let candidate = format!("{stem}_{counter}{ext}");
        if !dir.join(&candidate).exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// Move `src` to `dest`, creating the destination directories first.
///
/// Falls back to copy and delete when the rename crosses filesystems.
/// Directories created before a failed move are left in place.
///
/// # Errors
///
/// Returns [`Error::Move`] if `src` is missing or the file cannot be
/// relocated.
pub fn move_file(src: &Path, dest: &Path) -> Result<()> {
    let move_err = |source: io::Error| Error::Move {
        from: src.to_path_buf(),
        to: dest.to_path_buf(),
        source,
    };

    if !src.is_file() {
        return Err(move_err(io::Error::new(
            io::ErrorKind::NotFound,
            "source file does not exist",
        )));
    }

    if let Some(parent) = dest.parent() {
        fs::create_dir_all(parent).map_err(move_err)?;
    }

    match fs::rename(src, dest) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
            warn!(
                "Rename across devices, copying {} to {}",
                src.display(),
                dest.display()
            );
            copy_then_remove(src, dest, |p| fs::remove_file(p)).map_err(move_err)?;
        }
        Err(e) => return Err(move_err(e)),
    }

    debug!("Moved {} to {}", src.display(), dest.display());
    Ok(())
}

/// Copy `src` to `dest`, then remove `src` with `remove_src`.
///
/// If the source cannot be removed the copy is deleted again, so the file
/// never ends up in both places.
fn copy_then_remove(
    src: &Path,
    dest: &Path,
    remove_src: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    fs::copy(src, dest)?;
    if let Err(e) = remove_src(src) {
        if let Err(cleanup) = fs::remove_file(dest) {
            warn!("Failed to remove copy {}: {cleanup}", dest.display());
        }
        return Err(e);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::write(path, b"%PDF-1.4").unwrap();
    }

    #[test]
    fn test_is_pdf_case_insensitive() {
        assert!(is_pdf(Path::new("cv.pdf")));
        assert!(is_pdf(Path::new("cv.PDF")));
        assert!(is_pdf(Path::new("/tmp/cv.Pdf")));
        assert!(!is_pdf(Path::new("cv.docx")));
        assert!(!is_pdf(Path::new("pdf")));
    }

    #[test]
    fn test_list_pdfs_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("b.pdf"));
        touch(&dir.path().join("a.PDF"));
        touch(&dir.path().join("notes.txt"));
        fs::create_dir(dir.path().join("sub.pdf")).unwrap();
        touch(&dir.path().join("c.pdf"));

        let names: Vec<String> = list_pdfs(dir.path())
            .unwrap()
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();

        assert_eq!(names, vec!["a.PDF", "b.pdf", "c.pdf"]);
    }

    #[test]
    fn test_list_pdfs_is_not_recursive() {
        let dir = TempDir::new().unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        touch(&dir.path().join("nested").join("deep.pdf"));

        assert!(list_pdfs(dir.path()).unwrap().is_empty());
    }

    #[cfg(unix)]
    #[test]
    fn test_list_pdfs_follows_symlinks() {
        let dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&elsewhere.path().join("x.pdf"));
        std::os::unix::fs::symlink(elsewhere.path().join("x.pdf"), dir.path().join("link.pdf"))
            .unwrap();
        std::os::unix::fs::symlink(elsewhere.path().join("gone.pdf"), dir.path().join("dangling.pdf"))
            .unwrap();

        let listed = list_pdfs(dir.path()).unwrap();

        assert_eq!(listed, vec![dir.path().join("a.pdf"), dir.path().join("link.pdf")]);
    }

    #[test]
    fn test_list_pdfs_missing_folder() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("nope");

        let err = list_pdfs(&missing).unwrap_err();
        assert!(matches!(err, Error::NotFound(p) if p == missing));
    }

    #[test]
    fn test_unique_destination_free_name() {
        let dir = TempDir::new().unwrap();
        assert_eq!(unique_destination(dir.path(), "a.pdf"), "a.pdf");
    }

    #[test]
    fn test_unique_destination_increments() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.pdf"));
        touch(&dir.path().join("a_1.pdf"));

        assert_eq!(unique_destination(dir.path(), "a.pdf"), "a_2.pdf");
    }

    #[test]
    fn test_unique_destination_without_extension() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("resume"));

        assert_eq!(unique_destination(dir.path(), "resume"), "resume_1");
    }

    #[test]
    fn test_unique_destination_is_idempotent() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.pdf"));

        let first = unique_destination(dir.path(), "a.pdf");
        let second = unique_destination(dir.path(), "a.pdf");
        assert_eq!(first, second);
    }

    #[test]
    fn test_move_file_creates_directories() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.pdf");
        touch(&src);
        let dest = dir.path().join("Rejected").join("Other").join("a.pdf");

        move_file(&src, &dest).unwrap();

        assert!(!src.exists());
        assert!(dest.is_file());
    }

    #[test]
    fn test_move_file_missing_source() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("ghost.pdf");
        let dest = dir.path().join("out").join("ghost.pdf");

        let err = move_file(&src, &dest).unwrap_err();
        assert!(matches!(err, Error::Move { .. }));
        assert!(!dest.exists());
    }

    #[test]
    fn test_copy_then_remove_moves_file() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.pdf");
        let dest = dir.path().join("b.pdf");
        touch(&src);

        copy_then_remove(&src, &dest, |p| fs::remove_file(p)).unwrap();

        assert!(!src.exists());
        assert!(dest.is_file());
    }

    #[test]
    fn test_copy_then_remove_undoes_copy_when_source_stays() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("a.pdf");
        let dest = dir.path().join("b.pdf");
        touch(&src);

        let err = copy_then_remove(&src, &dest, |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
        })
        .unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::PermissionDenied);
        assert!(src.is_file());
        assert!(!dest.exists());
    }

    proptest! {
        #[test]
        fn prop_unique_destination_never_collides(taken in 0usize..6) {
            let dir = TempDir::new().unwrap();
            touch(&dir.path().join("cv.pdf"));
            for i in 1..=taken {
                touch(&dir.path().join(format!("cv_{i}.pdf")));
            }

            let name = unique_destination(dir.path(), "cv.pdf");
            prop_assert!(!dir.path().join(&name).exists());
            prop_assert_eq!(name, format!("cv_{}.pdf", taken + 1));
        }
    }
}

//! Text-based file I/O shared by the file-backed store and the data loader.
//!
//! Both functions assume UTF-8 encoding for input and output.

use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// Strips a leading UTF-8 byte order mark, which some editors add to JSON
/// files and `serde_json` rejects.
pub fn strip_bom(content: &str) -> &str {
    content.strip_prefix('\u{FEFF}').unwrap_or(content)
}

/// Reads a text file (assumed to be in UTF-8) into a string.
///
/// Returns `Ok(None)` when the file does not exist, so callers can treat a
/// missing document as empty without matching on the error kind.
///
/// ```no_run
/// use nowruz_countdown::fileio::do_read;
///
/// # fn main() -> std::io::Result<()> {
/// if let Some(text) = do_read("nowruz-state.json")? {
///     println!("{}", text);
/// }
/// # Ok(())
/// # }
/// ```
pub fn do_read<P: AsRef<Path>>(filename: P) -> io::Result<Option<String>> {
    match fs::read_to_string(filename) {
        Ok(content) => Ok(Some(strip_bom(&content).to_string())),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e),
    }
}

/// Writes `contents` to `filename`, replacing it in one step.
///
/// The data goes to a sibling temporary file first and is then renamed over
/// the target, so a reader never sees a half-written document. Missing parent
/// directories are created.
pub fn do_write<P: AsRef<Path>>(filename: P, contents: &str) -> io::Result<()> {
    let target = filename.as_ref();
    if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut tmp_name = target.as_os_str().to_owned();
    tmp_name.push(".tmp");
    let tmp = Path::new(&tmp_name);

    {
        let mut file = fs::File::create(tmp)?;
        file.write_all(contents.as_bytes())?;
        file.sync_all()?;
    }
    fs::rename(tmp, target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use temp_dir::TempDir;

    #[test]
    fn test_missing_file_reads_as_none() {
        let dir = TempDir::new().unwrap();
        assert_eq!(do_read(dir.child("absent.json")).unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("nested/state.json");
        do_write(&path, "{\"a\":\"b\"}").unwrap();
        assert_eq!(do_read(&path).unwrap().as_deref(), Some("{\"a\":\"b\"}"));
        do_write(&path, "{}").unwrap();
        assert_eq!(do_read(&path).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn test_bom_is_removed() {
        let dir = TempDir::new().unwrap();
        let path = dir.child("bom.json");
        fs::write(&path, "\u{FEFF}{}").unwrap();
        assert_eq!(do_read(&path).unwrap().as_deref(), Some("{}"));
        assert_eq!(strip_bom("plain"), "plain");
    }
}

//! Filesystem locations inside the Zellij sandbox.

use std::path::PathBuf;

/// File name of the OTLP span export.
const OTLP_FILE_NAME: &str = "chordsource-otlp.json";

/// Returns the data directory holding the catalog cache and trace export.
///
/// In Zellij's plugin environment `/host` points to the cwd of the last focused
/// terminal, which is normally the user's home directory, so this resolves to
/// `~/.local/share/zellij/chordsource` on the host.
///
/// # Examples
///
/// ```
/// use chordsource::infrastructure::get_data_dir;
///
/// assert_eq!(
///     get_data_dir().to_str(),
///     Some("/host/.local/share/zellij/chordsource")
/// );
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    PathBuf::from("/host/.local/share/zellij").join("chordsource")
}

/// Returns the path spans are exported to.
#[must_use]
pub fn otlp_export_path() -> PathBuf {
    get_data_dir().join(OTLP_FILE_NAME)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_lives_in_data_dir() {
        let path = otlp_export_path();
        assert_eq!(path.parent(), Some(get_data_dir().as_path()));
        assert!(path.ends_with("chordsource-otlp.json"));
    }
}

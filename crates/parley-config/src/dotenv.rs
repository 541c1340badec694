//! `.env` file loading (KEY=VALUE lines).

use std::path::{Path, PathBuf};

use tracing::debug;

/// Parse `.env` content into key/value pairs.
///
/// Blank lines and `#` comments are skipped; surrounding quotes on
/// values are stripped.
pub fn parse_dotenv(contents: &str) -> Vec<(String, String)> {
    contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line.split_once('=')?;
            let key = key.trim();
            if key.is_empty() {
                return None;
            }
            let value = value.trim().trim_matches('"').trim_matches('\'');
            Some((key.to_string(), value.to_string()))
        })
        .collect()
}

/// Load the first readable `.env` among `candidates` into the process
/// environment. Variables that are already set win.
///
/// Returns the path that was loaded, if any.
pub fn load_dotenv_from(candidates: &[PathBuf]) -> Option<PathBuf> {
    for path in candidates {
        if let Some(vars) = read(path) {
            for (key, value) in vars {
                if std::env::var_os(&key).is_none() {
                    std::env::set_var(&key, value);
                }
            }
            debug!("loaded environment from {}", path.display());
            return Some(path.clone());
        }
    }
    None
}

/// Load `.env` from the current directory, falling back to the workspace root.
pub fn load_dotenv() -> Option<PathBuf> {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    load_dotenv_from(&[
        PathBuf::from(".env"),
        manifest_dir.join("..").join("..").join(".env"),
    ])
}

fn read(path: &Path) -> Option<Vec<(String, String)>> {
    std::fs::read_to_string(path).ok().map(|c| parse_dotenv(&c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_and_quoted_values() {
        let vars = parse_dotenv(
            "# credentials\nGEMINI_API_KEY=abc123\n\nQUOTED=\"hello world\"\nSINGLE='x'\n",
        );
        assert_eq!(
            vars,
            vec![
                ("GEMINI_API_KEY".to_string(), "abc123".to_string()),
                ("QUOTED".to_string(), "hello world".to_string()),
                ("SINGLE".to_string(), "x".to_string()),
            ]
        );
    }

    #[test]
    fn skips_malformed_lines() {
        let vars = parse_dotenv("no equals sign\n=novalue\nexport OK=1\n");
        assert_eq!(vars, vec![("OK".to_string(), "1".to_string())]);
    }

    #[test]
    fn value_may_contain_equals() {
        let vars = parse_dotenv("URL=https://x.test/?a=b");
        assert_eq!(vars[0].1, "https://x.test/?a=b");
    }

    #[test]
    fn loads_first_existing_file_without_overriding() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "PARLEY_DOTENV_TEST_NEW=from-file\nPARLEY_DOTENV_TEST_SET=from-file\n",
        )
        .unwrap();
        std::env::set_var("PARLEY_DOTENV_TEST_SET", "from-env");

        let loaded = load_dotenv_from(&[dir.path().join("missing.env"), path.clone()]);

        assert_eq!(loaded, Some(path));
        assert_eq!(std::env::var("PARLEY_DOTENV_TEST_NEW").unwrap(), "from-file");
        assert_eq!(std::env::var("PARLEY_DOTENV_TEST_SET").unwrap(), "from-env");
    }

    #[test]
    fn returns_none_when_nothing_found() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_dotenv_from(&[dir.path().join(".env")]), None);
    }
}

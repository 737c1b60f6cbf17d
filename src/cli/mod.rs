pub mod output;

use std::path::Path;

use clap::Subcommand;

use crate::application::DEFAULT_SEARCH_LIMIT;
use crate::domain::DomainError;

/// Album reviews ingested when no `--url` or `--urls-file` is given.
pub const DEFAULT_REVIEW_URLS: &[&str] = &[
    "https://pitchfork.com/reviews/albums/hiroshi-yoshimura-flora/",
    "https://pitchfork.com/reviews/albums/tyler-the-creator-call-me-if-you-get-lost-the-estate-sale/",
    "https://pitchfork.com/reviews/albums/charli-xcx-brat/",
];

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch review pages, extract them, and store them with their embeddings
    Ingest {
        /// Review page to ingest (repeatable); replaces the built-in list
        #[arg(long = "url")]
        urls: Vec<String>,

        /// File with one review URL per line
        #[arg(long)]
        urls_file: Option<String>,

        /// Seconds to wait before each page load
        #[arg(long, default_value = "2")]
        delay_secs: u64,
    },

    /// Find stored reviews similar to a free-text query
    Search {
        query: String,

        #[arg(short, long, default_value_t = DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },

    /// Create the collection if it does not exist
    Init,

    Stats,
}

impl Commands {
    /// Whether the command can run against a store that lives only in this
    /// process. Anything but `ingest` would see an empty collection.
    pub fn supports_memory_storage(&self) -> bool {
        matches!(self, Commands::Ingest { .. })
    }
}

/// Resolves the URL list for an ingest run.
///
/// Explicit `--url` values come first, then the file's entries; with neither,
/// the built-in list is used.
pub fn resolve_urls(urls: Vec<String>, urls_file: Option<&Path>) -> Result<Vec<String>, DomainError> {
    let mut resolved = urls;
    if let Some(path) = urls_file {
        resolved.extend(load_url_list(path)?);
    }
    if resolved.is_empty() {
        resolved = DEFAULT_REVIEW_URLS.iter().map(|u| u.to_string()).collect();
    }

    for url in &resolved {
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(DomainError::invalid_input(format!(
                "not an http(s) URL: {}",
                url
            )));
        }
    }
    Ok(resolved)
}

/// Reads one URL per line, skipping blank lines and `#` comments.
pub fn load_url_list(path: &Path) -> Result<Vec<String>, DomainError> {
    let content = std::fs::read_to_string(path)?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(String::from)
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_when_nothing_given() {
        let urls = resolve_urls(Vec::new(), None).unwrap();
        assert_eq!(urls.len(), 3);
        assert!(urls[0].contains("hiroshi-yoshimura-flora"));
    }

    #[test]
    fn test_file_entries_follow_explicit_urls() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# reviews to load").unwrap();
        writeln!(file, "https://a.test/one").unwrap();
        writeln!(file).unwrap();
        writeln!(file, "  https://a.test/two  ").unwrap();

        let urls = resolve_urls(vec!["https://a.test/zero".to_string()], Some(file.path())).unwrap();

        assert_eq!(
            urls,
            vec!["https://a.test/zero", "https://a.test/one", "https://a.test/two"]
        );
    }

    #[test]
    fn test_rejects_non_http_entries() {
        let err = resolve_urls(vec!["ftp://a.test/x".to_string()], None).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_only_ingest_supports_memory_storage() {
        let ingest = Commands::Ingest {
            urls: Vec::new(),
            urls_file: None,
            delay_secs: 2,
        };
        let search = Commands::Search {
            query: "ambient".to_string(),
            limit: DEFAULT_SEARCH_LIMIT,
        };

        assert!(ingest.supports_memory_storage());
        assert!(!search.supports_memory_storage());
        assert!(!Commands::Init.supports_memory_storage());
        assert!(!Commands::Stats.supports_memory_storage());
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = load_url_list(Path::new("/definitely/not/here.txt")).unwrap_err();
        assert!(matches!(err, DomainError::IoError(_)));
    }
}

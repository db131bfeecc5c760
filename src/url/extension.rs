use std::collections::HashSet;
use url::Url;

/// Returns the extension of the final path segment, including the leading dot
///
/// The extension is the suffix starting at the last `.` of the last
/// `/`-separated segment. Query strings and fragments never contribute.
///
/// # Examples
///
/// ```
/// use blub_crawler::url::path_extension;
///
/// assert_eq!(path_extension("/img/logo.png"), Some(".png"));
/// assert_eq!(path_extension("/archive.tar.xz"), Some(".xz"));
/// assert_eq!(path_extension("/v1.2/docs/"), None);
/// assert_eq!(path_extension("/guide"), None);
/// ```
pub fn path_extension(path: &str) -> Option<&str> {
    let segment = path.rsplit('/').next().unwrap_or(path);
    segment.rfind('.').map(|idx| &segment[idx..])
}

/// A set of blacklisted path extensions
///
/// Matching is case-sensitive: `.png` does not reject `logo.PNG`.
#[derive(Debug, Clone, Default)]
pub struct ExtensionFilter {
    extensions: HashSet<String>,
}

impl ExtensionFilter {
    /// Creates a filter rejecting every extension in `extensions`
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            extensions: extensions.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if the URL's path extension is blacklisted
    pub fn is_rejected(&self, url: &Url) -> bool {
        path_extension(url.path())
            .map(|ext| self.extensions.contains(ext))
            .unwrap_or(false)
    }

    /// Returns true if `extension` (with leading dot) is blacklisted
    pub fn contains(&self, extension: &str) -> bool {
        self.extensions.contains(extension)
    }

    pub fn len(&self) -> usize {
        self.extensions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
    }
}

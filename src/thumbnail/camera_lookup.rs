// Camera name -> feed uri table, loaded once at startup.
use super::thumbnail_error::ThumbnailError;
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct CameraLookup {
    feeds: HashMap<String, String>,
}

impl CameraLookup {
    pub fn load(path: &Path) -> Result<Self, ThumbnailError> {
        let data = std::fs::read_to_string(path).map_err(|source| ThumbnailError::LookupRead {
            path: path.to_path_buf(),
            source,
        })?;
        data.parse()
    }

    pub fn resolve(&self, name: &str) -> Result<&str, ThumbnailError> {
        self.feeds
            .get(name)
            .map(String::as_str)
            .ok_or_else(|| ThumbnailError::UnknownCamera(name.to_owned()))
    }

    /// Every known camera with its feed uri, the set the refresher keeps warm.
    pub fn cameras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.feeds.iter().map(|(name, uri)| (name.as_str(), uri.as_str()))
    }

    pub fn len(&self) -> usize {
        self.feeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.feeds.is_empty()
    }
}

/// Whitespace separated `name uri` pairs. A later name overrides an earlier one.
impl std::str::FromStr for CameraLookup {
    type Err = ThumbnailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut feeds = HashMap::new();
        let mut tokens = s.split_whitespace();
        while let Some(name) = tokens.next() {
            let uri = tokens
                .next()
                .ok_or_else(|| ThumbnailError::LookupParse(name.to_owned()))?;
            feeds.insert(name.to_owned(), uri.to_owned());
        }
        Ok(Self { feeds })
    }
}

impl FromIterator<(String, String)> for CameraLookup {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            feeds: iter.into_iter().collect(),
        }
    }
}

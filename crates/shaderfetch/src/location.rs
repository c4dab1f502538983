use std::fmt;
use std::path::{Path, PathBuf};

use reqwest::Url;

use crate::{LoadError, ShaderStage};

/// Where one shader text resource is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceLocation {
    File(PathBuf),
    Remote(Url),
}

impl SourceLocation {
    /// Interprets `http://` and `https://` strings as URLs and anything else as a path.
    pub fn parse(raw: &str) -> Result<Self, LoadError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(LoadError::Location(raw.to_string()));
        }
        if is_url(trimmed) {
            Url::parse(trimmed)
                .map(SourceLocation::Remote)
                .map_err(|_| LoadError::Location(raw.to_string()))
        } else {
            Ok(SourceLocation::File(PathBuf::from(trimmed)))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Remote(_))
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::File(path) => write!(f, "{}", path.display()),
            SourceLocation::Remote(url) => write!(f, "{url}"),
        }
    }
}

fn is_url(raw: &str) -> bool {
    raw.starts_with("http://") || raw.starts_with("https://")
}

/// Locations of the vertex and fragment sources.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceSet {
    vertex: SourceLocation,
    fragment: SourceLocation,
}

impl SourceSet {
    pub fn new(vertex: SourceLocation, fragment: SourceLocation) -> Self {
        Self { vertex, fragment }
    }

    /// Resolves `aurora.vert` and `aurora.frag` under a directory or base URL.
    pub fn from_root(root: &str) -> Result<Self, LoadError> {
        let trimmed = root.trim();
        if trimmed.is_empty() {
            return Err(LoadError::Location(root.to_string()));
        }
        if is_url(trimmed) {
            let mut base = trimmed.to_string();
            if !base.ends_with('/') {
                base.push('/');
            }
            let base = Url::parse(&base).map_err(|_| LoadError::Location(root.to_string()))?;
            let resolve = |stage: ShaderStage| {
                base.join(stage.file_name())
                    .map(SourceLocation::Remote)
                    .map_err(|_| LoadError::Location(root.to_string()))
            };
            Ok(Self::new(
                resolve(ShaderStage::Vertex)?,
                resolve(ShaderStage::Fragment)?,
            ))
        } else {
            let dir = Path::new(trimmed);
            Ok(Self::new(
                SourceLocation::File(dir.join(ShaderStage::Vertex.file_name())),
                SourceLocation::File(dir.join(ShaderStage::Fragment.file_name())),
            ))
        }
    }

    pub fn location(&self, stage: ShaderStage) -> &SourceLocation {
        match stage {
            ShaderStage::Vertex => &self.vertex,
            ShaderStage::Fragment => &self.fragment,
        }
    }

    /// Replaces the location of one stage.
    pub fn with_location(mut self, stage: ShaderStage, location: SourceLocation) -> Self {
        match stage {
            ShaderStage::Vertex => self.vertex = location,
            ShaderStage::Fragment => self.fragment = location,
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_roots_resolve_conventional_names() {
        let set = SourceSet::from_root("shaders").unwrap();
        assert_eq!(
            set.location(ShaderStage::Vertex),
            &SourceLocation::File(PathBuf::from("shaders/aurora.vert"))
        );
        assert_eq!(
            set.location(ShaderStage::Fragment),
            &SourceLocation::File(PathBuf::from("shaders/aurora.frag"))
        );
    }

    #[test]
    fn url_roots_keep_their_last_segment() {
        let set = SourceSet::from_root("https://example.com/effects/aurora").unwrap();
        assert_eq!(
            set.location(ShaderStage::Fragment).to_string(),
            "https://example.com/effects/aurora/aurora.frag"
        );
        assert!(set.location(ShaderStage::Vertex).is_remote());
    }

    #[test]
    fn stage_overrides_replace_one_location() {
        let set = SourceSet::from_root("shaders")
            .unwrap()
            .with_location(
                ShaderStage::Vertex,
                SourceLocation::parse("http://localhost:8000/custom.vert").unwrap(),
            );
        assert!(set.location(ShaderStage::Vertex).is_remote());
        assert!(!set.location(ShaderStage::Fragment).is_remote());
    }

    #[test]
    fn empty_locations_are_rejected() {
        assert!(matches!(
            SourceLocation::parse("  "),
            Err(LoadError::Location(_))
        ));
        assert!(SourceSet::from_root("").is_err());
    }
}

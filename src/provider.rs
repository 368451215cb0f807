//! Schema acquisition.
//!
//! The upstream schema library writes its draft-07 JSON export into the repo
//! checkout; compilation consumes that document through the `SchemaProvider`
//! capability and never touches the filesystem itself.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::schema::SchemaDocument;

/// Location of the schema export inside a repo checkout.
pub const SCHEMA_RELATIVE_PATH: &str = "config/schema.json";

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("schema export not found at {}", path.display())]
    NotFound { path: PathBuf },
    #[error("failed to read schema export {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed schema export {}: {detail}", path.display())]
    Malformed { path: PathBuf, detail: String },
}

/// Capability supplying the schema document to compile. Loaded exactly once
/// per run; a failure here aborts the whole run.
pub trait SchemaProvider {
    fn load(&self) -> Result<SchemaDocument, ProviderError>;
}

/// Reads the JSON export from a repo checkout.
pub struct SchemaFileProvider {
    path: PathBuf,
}

impl SchemaFileProvider {
    pub fn for_repo(repo: &Path) -> Self {
        Self {
            path: repo.join(SCHEMA_RELATIVE_PATH),
        }
    }

    pub fn from_path(path: PathBuf) -> Self {
        Self { path }
    }
}

impl SchemaProvider for SchemaFileProvider {
    fn load(&self) -> Result<SchemaDocument, ProviderError> {
        if !self.path.is_file() {
            return Err(ProviderError::NotFound {
                path: self.path.clone(),
            });
        }
        let source = std::fs::read_to_string(&self.path).map_err(|source| ProviderError::Io {
            path: self.path.clone(),
            source,
        })?;
        SchemaDocument::parse(&source).map_err(|detail| ProviderError::Malformed {
            path: self.path.clone(),
            detail,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_export_is_not_found() {
        let provider = SchemaFileProvider::for_repo(Path::new("/definitely/not/a/repo"));
        assert!(matches!(
            provider.load(),
            Err(ProviderError::NotFound { .. })
        ));
    }

    #[test]
    fn repo_path_is_joined_with_the_export_location() {
        let provider = SchemaFileProvider::for_repo(Path::new("/repo"));
        assert_eq!(provider.path, Path::new("/repo/config/schema.json"));
    }
}

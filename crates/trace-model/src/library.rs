//! Template library persistence.
//!
//! A library is stored as a JSON array of template records:
//! `{trace: [[x,y,t],...], vp: [...], ap: [...], vap: [...], lbos: int}`.
//! Libraries are loaded once and treated as immutable afterwards.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::template::Template;

/// An ordered, immutable collection of templates.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateLibrary {
    templates: Vec<Template>,
}

impl TemplateLibrary {
    pub fn new(templates: Vec<Template>) -> Self {
        Self { templates }
    }

    /// Parse a library from its JSON form.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load a library from disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LibraryError> {
        let path = path.as_ref().to_path_buf();

        let json = std::fs::read_to_string(&path).map_err(|e| LibraryError::IoError {
            path: path.clone(),
            source: e,
        })?;

        Self::from_json(&json).map_err(|e| LibraryError::ParseError { path, source: e })
    }

    /// Write the library to disk as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), LibraryError> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| LibraryError::IoError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| LibraryError::ParseError {
            path: path.clone(),
            source: e,
        })?;
        std::fs::write(&path, json).map_err(|e| LibraryError::IoError { path, source: e })
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Template> {
        self.templates.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Template> {
        self.templates.iter()
    }

    /// Check every record for internal consistency.
    ///
    /// Returns one message per problem found; an empty list means the library
    /// is usable as-is.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = vec![];

        for (i, template) in self.templates.iter().enumerate() {
            if !template.signature.is_consistent() {
                errors.push(format!(
                    "Template {i}: profile lengths differ (vp={}, ap={}, vap={})",
                    template.signature.vp.len(),
                    template.signature.ap.len(),
                    template.signature.vap.len()
                ));
            }
            if template.signature.is_empty() {
                errors.push(format!("Template {i}: empty signature"));
            }
            if let Some(lbos) = template.lbos {
                if lbos > template.trace.len() {
                    errors.push(format!(
                        "Template {i}: lbos {lbos} exceeds trace length {}",
                        template.trace.len()
                    ));
                }
            }
        }

        errors
    }

    /// Like [`validate`](Self::validate), but folds problems into an error.
    pub fn check(&self) -> Result<(), LibraryError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(LibraryError::ValidationError {
                message: errors.join("; "),
            })
        }
    }
}

impl FromIterator<Template> for TemplateLibrary {
    fn from_iter<I: IntoIterator<Item = Template>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Errors raised while loading or saving a library.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("I/O error at {path}: {source}")]
    IoError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error("Invalid template library: {message}")]
    ValidationError { message: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::point::Point;
    use crate::template::Signature;

    fn straight_template() -> Template {
        Template::new(
            (0..6).map(|i| Point::new(i as f64 * 10.0, 0.0, i * 10)).collect(),
            Signature {
                vp: vec![1.0; 4],
                ap: vec![0.0; 4],
                vap: vec![1.0; 4],
            },
            None,
        )
    }

    #[test]
    fn test_library_save_load() {
        let dir = std::env::temp_dir().join("cursorcast_test_library");
        let _ = std::fs::remove_dir_all(&dir);

        let path = dir.join("templates.json");
        let library = TemplateLibrary::new(vec![straight_template(), straight_template()]);
        library.save(&path).unwrap();

        let loaded = TemplateLibrary::load(&path).unwrap();
        assert_eq!(loaded, library);
        assert_eq!(loaded.len(), 2);

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("cursorcast_no_such_library.json");
        let err = TemplateLibrary::load(&path).unwrap_err();
        assert!(matches!(err, LibraryError::IoError { .. }));
        assert!(err.to_string().contains("cursorcast_no_such_library.json"));
    }

    #[test]
    fn test_validate_flags_inconsistent_records() {
        let mut broken = straight_template();
        broken.signature.ap.pop();
        broken.lbos = Some(40);

        let library = TemplateLibrary::new(vec![straight_template(), broken]);
        let errors = library.validate();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("Template 1"));
        assert!(matches!(
            library.check(),
            Err(LibraryError::ValidationError { .. })
        ));
    }

    #[test]
    fn test_from_json_array() {
        let library = TemplateLibrary::from_json(
            r#"[{"trace":[[0,0,0],[1,0,10]],"vp":[0.1],"ap":[0],"vap":[0.1],"lbos":-1}]"#,
        )
        .unwrap();
        assert_eq!(library.len(), 1);
        assert!(library.validate().is_empty());
        assert!(library.get(1).is_none());
    }
}

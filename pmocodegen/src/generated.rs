use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::info;

use crate::{
    errors::GeneratorError,
    syntax::{Scope, SyntaxProvider},
};

/// Texte source d'une classe générée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedClass {
    pub class_name: String,
    pub file_name: String,
    pub source: String,
}

impl GeneratedClass {
    pub(crate) fn new<P: SyntaxProvider + ?Sized>(
        provider: &P,
        class_name: &str,
        partial: bool,
        source: String,
    ) -> Self {
        let extension = if partial {
            provider.partial_file_extension()
        } else {
            provider.file_extension()
        };
        Self {
            class_name: class_name.to_string(),
            file_name: format!("{class_name}{extension}"),
            source,
        }
    }

    /// Écrit la classe dans `directory` (créé au besoin) et retourne le
    /// chemin du fichier.
    pub fn write_to(&self, directory: &Path) -> Result<PathBuf, GeneratorError> {
        fs::create_dir_all(directory)
            .map_err(|e| GeneratorError::Io(directory.display().to_string(), e))?;
        let path = directory.join(&self.file_name);
        fs::write(&path, &self.source)
            .map_err(|e| GeneratorError::Io(path.display().to_string(), e))?;
        info!(class = %self.class_name, path = %path.display(), "Class written");
        Ok(path)
    }
}

/// Options communes aux générateurs de classe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassOptions {
    /// Nom de la classe (assaini avant usage).
    pub class_name: String,
    /// Espace de noms, segments séparés par des points.
    pub namespace: String,
    pub scope: Scope,
    /// Génère une classe partielle (`partial class`, `.designer.cs`).
    pub partial: bool,
    /// Type UPnP d'origine, cité dans l'en-tête du fichier.
    pub source_type: String,
}

pub const DEFAULT_NAMESPACE: &str = "UPnP";

impl ClassOptions {
    pub fn new(class_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            namespace: DEFAULT_NAMESPACE.to_string(),
            scope: Scope::Public,
            partial: false,
            source_type: String::new(),
        }
    }

    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = namespace.into();
        self
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    pub fn with_partial(mut self, partial: bool) -> Self {
        self.partial = partial;
        self
    }

    pub fn with_source_type(mut self, source_type: impl Into<String>) -> Self {
        self.source_type = source_type.into();
        self
    }

    /// Espace de noms assaini segment par segment.
    pub(crate) fn namespace_for<P: SyntaxProvider + ?Sized>(&self, provider: &P) -> String {
        let segments: Vec<String> = self
            .namespace
            .split('.')
            .filter(|s| !s.trim().is_empty())
            .map(|s| provider.identifier(s, false))
            .collect();
        if segments.is_empty() {
            DEFAULT_NAMESPACE.to_string()
        } else {
            segments.join(".")
        }
    }

    pub(crate) fn header(&self) -> String {
        if self.source_type.is_empty() {
            format!("Generated by pmogen {}", env!("CARGO_PKG_VERSION"))
        } else {
            format!(
                "Generated by pmogen {} from {}",
                env!("CARGO_PKG_VERSION"),
                self.source_type
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{CSharpSyntax, VisualBasicSyntax};

    #[test]
    fn test_file_name_follows_partial_flag() {
        let full = GeneratedClass::new(&CSharpSyntax, "AVTransportService", false, String::new());
        let partial = GeneratedClass::new(&VisualBasicSyntax, "AVTransportService", true, String::new());
        assert_eq!(full.file_name, "AVTransportService.cs");
        assert_eq!(partial.file_name, "AVTransportService.designer.vb");
    }

    #[test]
    fn test_namespace_is_sanitized() {
        let options = ClassOptions::new("X").with_namespace("my-company.upnp..event");
        assert_eq!(options.namespace_for(&CSharpSyntax), "MyCompany.Upnp.Event");
        assert_eq!(ClassOptions::new("X").with_namespace("").namespace_for(&CSharpSyntax), "UPnP");
    }

    #[test]
    fn test_write_to_creates_directory() {
        let dir = tempfile::tempdir().unwrap();
        let class = GeneratedClass::new(&CSharpSyntax, "Foo", false, "class Foo {}".to_string());
        let path = class.write_to(&dir.path().join("out")).unwrap();
        assert_eq!(std::fs::read_to_string(path).unwrap(), "class Foo {}");
    }
}

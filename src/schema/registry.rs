//! Schema assets embedded at compile time

use rust_embed::Embed;

#[derive(Embed)]
#[folder = "schemas/"]
struct EmbeddedSchemas;

/// Asset name of the built-in registration form
pub const DEFAULT_FORM: &str = "registration.json";

/// Asset name of the JSON Schema every form document must satisfy
pub const DOCUMENT_STRUCTURE: &str = "form.schema.json";

/// Lookup of embedded schema assets by file name
#[derive(Debug, Default, Clone, Copy)]
pub struct SchemaRegistry;

impl SchemaRegistry {
    /// Get an embedded asset as UTF-8 text
    pub fn get(&self, name: &str) -> Option<String> {
        EmbeddedSchemas::get(name)
            .and_then(|file| String::from_utf8(file.data.into_owned()).ok())
    }

    /// The built-in registration form document
    pub fn default_form(&self) -> Option<String> {
        self.get(DEFAULT_FORM)
    }

    /// The structure schema used to check form documents before typing them
    pub fn document_structure(&self) -> Option<String> {
        self.get(DOCUMENT_STRUCTURE)
    }

    /// Names of all embedded assets, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = EmbeddedSchemas::iter().map(|n| n.into_owned()).collect();
        names.sort();
        names
    }

    pub fn has_schema(&self, name: &str) -> bool {
        EmbeddedSchemas::get(name).is_some()
    }
}

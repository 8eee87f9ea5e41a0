use url::Url;
use uuid::Uuid;

/// Convenience wrapper for URL generation functions.
#[derive(Clone)]
pub struct Urls {
    /// Top-level URL, including trailing slash.
    base: Url,

    /// Path for all recipe-related actions.
    pub(crate) recipes_path: String,

    /// Prefix for all recipe-related actions.
    recipes_prefix: String,
}

impl Urls {
    /// Create a new instance. `recipes_prefix` should *not* include a trailing slash.
    pub fn new(base: impl AsRef<str>, recipes_prefix: impl Into<String>) -> Self {
        let base =
            Url::parse(base.as_ref()).unwrap_or_else(|_| panic!("parse {} as URL", base.as_ref()));
        let recipes_path = recipes_prefix.into();
        let recipes_prefix = format!("{}/", recipes_path);

        Urls {
            base,
            recipes_path,
            recipes_prefix,
        }
    }

    pub fn recipes(&self) -> Url {
        self.base
            .join(&self.recipes_prefix)
            .expect("get recipes URL")
    }

    pub fn recipe(&self, id: &Uuid) -> Url {
        let id = format!("{}", id);
        self.recipes()
            .join(&id)
            .unwrap_or_else(|_| panic!("get URL for recipe {}", id))
    }
}

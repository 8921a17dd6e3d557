//! Kind-dispatched resource registry.
//!
//! A [`Registry`] holds a set of [`Loader`] backends, each declaring the
//! resource kind it handles, plus a pool of descriptions waiting to be
//! loaded. Resolution picks the first loader whose kind matches the
//! description's kind.

use crate::error::GlviewError;
use crate::resources::finder::FileFinder;

/// A description of a resource a [`Loader`] can turn into a runtime object.
pub trait ResourceDescription {
    /// Human-readable name used in logs and errors.
    fn label(&self) -> &str;

    /// Kind tag selecting the loader, if already known.
    fn kind(&self) -> Option<&str>;

    /// Fill in a missing kind before resolution. The default keeps the
    /// description as it is.
    fn infer_kind(&mut self) {}
}

/// Backend that loads one kind of resource.
pub trait Loader {
    /// Description type consumed by this loader.
    type Description: ResourceDescription;
    /// Runtime object produced by this loader.
    type Output;

    /// Kind tag this loader handles.
    fn kind(&self) -> &str;

    /// Load the resource, resolving files through `finder`.
    fn load(
        &self,
        description: &Self::Description,
        finder: &FileFinder,
    ) -> Result<Self::Output, GlviewError>;
}

/// Loader trait object for descriptions `D` producing `O`.
pub type DynLoader<D, O> = dyn Loader<Description = D, Output = O>;

/// Boxed loader for descriptions `D` producing `O`.
pub type BoxedLoader<D, O> = Box<DynLoader<D, O>>;

/// Collection of loaders and pending descriptions for one resource type.
pub struct Registry<D, O> {
    setting: &'static str,
    loaders: Vec<BoxedLoader<D, O>>,
    finder: FileFinder,
    pool: Vec<D>,
}

impl<D: ResourceDescription, O> Registry<D, O> {
    /// Create a registry whose loaders were configured under `setting`.
    pub fn new(
        setting: &'static str,
        loaders: Vec<BoxedLoader<D, O>>,
        finder: FileFinder,
    ) -> Self {
        Self {
            setting,
            loaders,
            finder,
            pool: Vec::new(),
        }
    }

    /// Settings key the loaders were configured under.
    pub fn setting(&self) -> &'static str {
        self.setting
    }

    /// Finder used to locate resource files.
    pub fn finder(&self) -> &FileFinder {
        &self.finder
    }

    /// Append a loader. Earlier loaders win on duplicate kinds.
    pub fn register(&mut self, loader: BoxedLoader<D, O>) {
        log::debug!("{}: registered loader '{}'", self.setting, loader.kind());
        self.loaders.push(loader);
    }

    /// Kinds handled by the registered loaders, in resolution order.
    pub fn kinds(&self) -> Vec<&str> {
        self.loaders.iter().map(|l| l.kind()).collect()
    }

    /// Find the loader for the description's kind, inferring the kind
    /// first when the description leaves it unset.
    pub fn resolve_loader(
        &self,
        description: &mut D,
    ) -> Result<&DynLoader<D, O>, GlviewError> {
        description.infer_kind();
        let kind = description.kind().unwrap_or_default();
        self.loaders
            .iter()
            .find(|loader| loader.kind() == kind)
            .map(|loader| &**loader)
            .ok_or_else(|| GlviewError::NoLoader {
                kind: kind.to_owned(),
                setting: self.setting,
            })
    }

    /// Resolve the loader for `description` and load it.
    pub fn load(&self, description: &mut D) -> Result<O, GlviewError> {
        let loader = self.resolve_loader(description)?;
        log::debug!(
            "Loading '{}' with '{}' loader",
            description.label(),
            loader.kind()
        );
        loader.load(description, &self.finder)
    }

    /// Queue a description for [`load_pool`](Self::load_pool).
    pub fn add(&mut self, description: D) {
        self.pool.push(description);
    }

    /// Number of queued descriptions.
    pub fn count(&self) -> usize {
        self.pool.len()
    }

    /// Load every queued description, in insertion order, emptying the pool.
    pub fn load_pool(&mut self) -> Vec<(D, Result<O, GlviewError>)> {
        std::mem::take(&mut self.pool)
            .into_iter()
            .map(|mut description| {
                let result = self.load(&mut description);
                if let Err(e) = &result {
                    log::warn!("Failed to load '{}': {e}", description.label());
                }
                (description, result)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Text {
        label: &'static str,
        kind: Option<&'static str>,
    }

    impl ResourceDescription for Text {
        fn label(&self) -> &str {
            self.label
        }

        fn kind(&self) -> Option<&str> {
            self.kind
        }
    }

    struct Tagged(&'static str);

    impl Loader for Tagged {
        type Description = Text;
        type Output = String;

        fn kind(&self) -> &str {
            self.0
        }

        fn load(
            &self,
            description: &Text,
            _finder: &FileFinder,
        ) -> Result<String, GlviewError> {
            Ok(format!("{}:{}", self.0, description.label))
        }
    }

    fn registry() -> Registry<Text, String> {
        let loaders: Vec<BoxedLoader<Text, String>> =
            vec![Box::new(Tagged("plain")), Box::new(Tagged("fancy"))];
        Registry::new("TEXT_LOADERS", loaders, FileFinder::default())
    }

    #[test]
    fn resolves_by_kind() {
        let reg = registry();
        let mut desc = Text { label: "a", kind: Some("fancy") };
        assert_eq!(reg.resolve_loader(&mut desc).unwrap().kind(), "fancy");
        assert_eq!(reg.load(&mut desc).unwrap(), "fancy:a");
    }

    #[test]
    fn unmatched_kind_is_no_loader() {
        let reg = registry();
        let mut desc = Text { label: "a", kind: Some("binary") };
        let err = reg.resolve_loader(&mut desc).err().unwrap();
        assert!(matches!(
            err,
            GlviewError::NoLoader { ref kind, setting: "TEXT_LOADERS" }
                if kind == "binary"
        ));
    }

    #[test]
    fn first_registered_loader_wins() {
        let mut reg = registry();
        reg.register(Box::new(Tagged("plain")));
        assert_eq!(reg.kinds(), ["plain", "fancy", "plain"]);
        let mut desc = Text { label: "b", kind: Some("plain") };
        assert_eq!(reg.load(&mut desc).unwrap(), "plain:b");
    }

    #[test]
    fn load_pool_drains_in_order() {
        let mut reg = registry();
        reg.add(Text { label: "one", kind: Some("plain") });
        reg.add(Text { label: "two", kind: None });
        reg.add(Text { label: "three", kind: Some("fancy") });
        assert_eq!(reg.count(), 3);

        let results = reg.load_pool();
        assert_eq!(reg.count(), 0);
        let labels: Vec<_> = results.iter().map(|(d, _)| d.label).collect();
        assert_eq!(labels, ["one", "two", "three"]);
        assert_eq!(results[0].1.as_ref().unwrap(), "plain:one");
        assert!(results[1].1.is_err());
        assert_eq!(results[2].1.as_ref().unwrap(), "fancy:three");
    }
}

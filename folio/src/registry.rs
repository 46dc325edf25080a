//! The resource manifest and URI dispatch.
//!
//! A [`Registry`] is assembled once, at startup, by a [`RegistryBuilder`]: static descriptors first,
//! then any discovered ones. After that the catalog is immutable; only the loader's cache and error
//! log change while serving.

use std::{collections::HashMap, fmt, sync::Arc};

use folio_protocol::resource::{Resource, ResourceError, DEFAULT_MIME_TYPE};

use crate::{
    discovery::{self, DiscoveryConfig},
    errors::RegistrationError,
    loader::{ErrorLogEntry, Loader, ERROR_LOG_CAPACITY},
    producer::ContentProducer,
};

/// Separates a URI's scheme from its `<category>/<name>` path.
pub const SCHEME_SEPARATOR: &str = "://";

/// An addressable entry in the catalog.
#[derive(Clone)]
pub struct ResourceDescriptor {
    identifier: String,
    name: String,
    description: String,
    mime_type: String,
    producer: Arc<dyn ContentProducer>,
}

impl ResourceDescriptor {
    pub fn new<I, N, D>(identifier: I, name: N, description: D, producer: impl ContentProducer) -> Self
    where
        I: Into<String>,
        N: Into<String>,
        D: Into<String>,
    {
        ResourceDescriptor {
            identifier: identifier.into(),
            name: name.into(),
            description: description.into(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
            producer: Arc::new(producer),
        }
    }

    pub fn with_mime_type<S: Into<String>>(mut self, mime_type: S) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    /// The full URI, eg `crm-base://ui-system/dialog-patterns`.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn producer(&self) -> &dyn ContentProducer {
        self.producer.as_ref()
    }

    /// Metadata for `resources/list`.
    pub fn to_resource(&self) -> Resource {
        Resource {
            uri: self.identifier.clone(),
            name: self.name.clone(),
            description: Some(self.description.clone()),
            mime_type: Some(self.mime_type.clone()),
            annotations: None,
            size: None,
        }
    }
}

impl fmt::Debug for ResourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceDescriptor")
            .field("identifier", &self.identifier)
            .field("name", &self.name)
            .field("mime_type", &self.mime_type)
            .finish_non_exhaustive()
    }
}

/// Content read through the registry, along with the descriptor that produced it.
#[derive(Debug)]
pub struct LoadedResource<'a> {
    pub descriptor: &'a ResourceDescriptor,
    pub text: String,
}

/// The merged catalog of static and discovered resources, and the loader that serves them.
pub struct Registry {
    scheme: String,
    descriptors: Vec<ResourceDescriptor>,
    /// Stripped path (`<category>/<name>`) to index in `descriptors`.
    index: HashMap<String, usize>,
    loader: Loader,
}

impl Registry {
    /// A registry with no resources.
    pub fn empty<S: Into<String>>(scheme: S) -> Self {
        Registry {
            scheme: scheme.into(),
            descriptors: Vec::new(),
            index: HashMap::new(),
            loader: Loader::new(),
        }
    }

    pub fn builder<S: Into<String>>(scheme: S) -> RegistryBuilder {
        RegistryBuilder::new(scheme)
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Every descriptor, in registration order: static entries, then discovered ones.
    pub fn list(&self) -> &[ResourceDescriptor] {
        &self.descriptors
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Reduce an identifier to its lookup key.
    ///
    /// The registry's own `<scheme>://` prefix is removed. Anything else is returned unchanged, so
    /// a bare `<category>/<name>` resolves while a foreign scheme never does.
    pub fn normalize<'a>(&self, identifier: &'a str) -> &'a str {
        identifier
            .strip_prefix(self.scheme.as_str())
            .and_then(|rest| rest.strip_prefix(SCHEME_SEPARATOR))
            .unwrap_or(identifier)
    }

    /// Find the descriptor for `identifier`.
    ///
    /// On failure the error carries `identifier` exactly as given.
    pub fn resolve(&self, identifier: &str) -> Result<&ResourceDescriptor, ResourceError> {
        self.index
            .get(self.normalize(identifier))
            .map(|&i| &self.descriptors[i])
            .ok_or_else(|| ResourceError::NotFound(identifier.to_string()))
    }

    /// Resolve `identifier` and load its content, from the cache when possible.
    pub async fn read(&self, identifier: &str) -> Result<LoadedResource<'_>, ResourceError> {
        let descriptor = self.resolve(identifier)?;
        let text = self
            .loader
            .load(self.normalize(identifier), descriptor.producer())
            .await
            .map_err(|_| ResourceError::LoadFailed(identifier.to_string()))?;
        Ok(LoadedResource { descriptor, text })
    }

    /// Recent load failures, oldest first.
    pub fn error_log(&self) -> Vec<ErrorLogEntry> {
        self.loader.error_log().snapshot()
    }

    /// Number of resources whose content is cached.
    pub fn cached_len(&self) -> usize {
        self.loader.cached_len()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("scheme", &self.scheme)
            .field("descriptors", &self.descriptors)
            .finish_non_exhaustive()
    }
}

/// Build a [`Registry`]. Registration conflicts and malformed identifiers are reported by
/// [`RegistryBuilder::build`], before anything is served.
pub struct RegistryBuilder {
    scheme: String,
    descriptors: Vec<ResourceDescriptor>,
    discovery: Option<DiscoveryConfig>,
    error_log_capacity: usize,
}

impl RegistryBuilder {
    pub fn new<S: Into<String>>(scheme: S) -> Self {
        RegistryBuilder {
            scheme: scheme.into(),
            descriptors: Vec::new(),
            discovery: None,
            error_log_capacity: ERROR_LOG_CAPACITY,
        }
    }

    pub fn with_resource(mut self, descriptor: ResourceDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    pub fn with_resources(mut self, descriptors: impl IntoIterator<Item = ResourceDescriptor>) -> Self {
        self.descriptors.extend(descriptors);
        self
    }

    /// Scan a directory for documents when the registry is built.
    pub fn with_discovery(mut self, config: DiscoveryConfig) -> Self {
        self.discovery = Some(config);
        self
    }

    pub fn with_error_log_capacity(mut self, capacity: usize) -> Self {
        self.error_log_capacity = capacity;
        self
    }

    /// Validate and index every descriptor. Discovery, if configured, runs here.
    pub fn build(self) -> Result<Registry, RegistrationError> {
        let mut registry = Registry {
            descriptors: Vec::with_capacity(self.descriptors.len()),
            index: HashMap::new(),
            loader: Loader::with_error_capacity(self.error_log_capacity),
            scheme: self.scheme,
        };

        let static_count = self.descriptors.len();
        for descriptor in self.descriptors {
            registry.register(descriptor)?;
        }

        let discovered = match &self.discovery {
            Some(config) => discovery::discover(config, &registry.scheme),
            None => Vec::new(),
        };
        let discovered_count = discovered.len();
        for descriptor in discovered {
            registry.register(descriptor)?;
        }

        tracing::info!(
            scheme = %registry.scheme,
            static_count,
            discovered_count,
            "Resource registry built"
        );
        Ok(registry)
    }
}

impl Registry {
    fn register(&mut self, descriptor: ResourceDescriptor) -> Result<(), RegistrationError> {
        let path = self.validate(&descriptor)?;
        if let Some(&existing) = self.index.get(&path) {
            return Err(RegistrationError::Conflict {
                path,
                existing: self.descriptors[existing].identifier.clone(),
                incoming: descriptor.identifier,
            });
        }
        tracing::debug!(identifier = %descriptor.identifier, "Registered resource");
        self.index.insert(path, self.descriptors.len());
        self.descriptors.push(descriptor);
        Ok(())
    }

    /// Check that an identifier is `<scheme>://<category>/<name>` for this registry's scheme, and
    /// return the stripped path.
    fn validate(&self, descriptor: &ResourceDescriptor) -> Result<String, RegistrationError> {
        let invalid = |reason: &str| RegistrationError::InvalidIdentifier {
            identifier: descriptor.identifier.clone(),
            reason: reason.to_string(),
        };

        Resource::new(descriptor.identifier.as_str(), None, None, None)
            .map_err(|e| invalid(&e.to_string()))?;

        let path = descriptor
            .identifier
            .strip_prefix(self.scheme.as_str())
            .and_then(|rest| rest.strip_prefix(SCHEME_SEPARATOR))
            .ok_or_else(|| invalid(&format!("expected the `{}` scheme", self.scheme)))?;

        match path.split_once('/') {
            Some((category, name))
                if !category.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(path.to_string())
            }
            _ => Err(invalid("expected a `<category>/<name>` path")),
        }
    }
}

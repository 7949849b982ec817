//! Module Route Loader
//!
//! Each module lives in `<modules_root>/<directory>/` and may ship a
//! `routes.toml` manifest there. A module without the file is skipped; a
//! module with one gets its router built and mounted under the manifest's
//! prefix.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use axum::Router;
use serde::Deserialize;
use thiserror::Error;

/// Route-definition file checked in every module directory
pub const ROUTES_FILE: &str = "routes.toml";

/// Migration directory inside every module directory
pub const MIGRATIONS_DIR: &str = "migrations";

/// Builds a module's router; only called when its routes file exists
pub type RouterBuilder = Box<dyn FnOnce() -> Router + Send>;

/// One backend module, declared explicitly in `modules::definitions`
pub struct ModuleDefinition {
    /// Display name ("User", "Auth")
    pub name: &'static str,
    /// Directory name under the modules root
    pub directory: &'static str,
    /// Named routes, relative to the mount prefix
    pub named_routes: &'static [(&'static str, &'static str)],
    pub build: RouterBuilder,
}

impl ModuleDefinition {
    pub fn new(
        name: &'static str,
        directory: &'static str,
        named_routes: &'static [(&'static str, &'static str)],
        build: impl FnOnce() -> Router + Send + 'static,
    ) -> Self {
        Self {
            name,
            directory,
            named_routes,
            build: Box::new(build),
        }
    }

    pub fn module_dir(&self, modules_root: &Path) -> PathBuf {
        modules_root.join(self.directory)
    }

    pub fn routes_file(&self, modules_root: &Path) -> PathBuf {
        self.module_dir(modules_root).join(ROUTES_FILE)
    }

    pub fn migrations_dir(&self, modules_root: &Path) -> PathBuf {
        self.module_dir(modules_root).join(MIGRATIONS_DIR)
    }
}

impl fmt::Debug for ModuleDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ModuleDefinition")
            .field("name", &self.name)
            .field("directory", &self.directory)
            .field("named_routes", &self.named_routes)
            .finish_non_exhaustive()
    }
}

/// Contents of a module's `routes.toml`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RouteManifest {
    /// Mount point for the module router
    #[serde(default = "RouteManifest::default_prefix")]
    pub prefix: String,
}

impl RouteManifest {
    fn default_prefix() -> String {
        "/".to_string()
    }
}

impl Default for RouteManifest {
    fn default() -> Self {
        Self {
            prefix: Self::default_prefix(),
        }
    }
}

#[derive(Debug, Error)]
pub enum RouteLoadError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed route file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid prefix {prefix:?} in {path}: {reason}")]
    InvalidPrefix {
        path: PathBuf,
        prefix: String,
        reason: &'static str,
    },

    #[error("route name {name:?} is registered by more than one module")]
    DuplicateRouteName { name: String },
}

/// Route name -> URL table, with module prefixes applied
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamedRoutes(BTreeMap<String, String>);

impl NamedRoutes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn url(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn insert(
        &mut self,
        name: impl Into<String>,
        url: impl Into<String>,
    ) -> Result<(), RouteLoadError> {
        let name = name.into();
        if self.0.contains_key(&name) {
            return Err(RouteLoadError::DuplicateRouteName { name });
        }
        self.0.insert(name, url.into());
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Result of loading every module's routes
#[derive(Debug)]
pub struct LoadedRoutes {
    /// All module routers, mounted under their prefixes
    pub router: Router,
    pub named: NamedRoutes,
    /// Names of modules whose routes file was found, in load order
    pub loaded: Vec<&'static str>,
}

/// Read a module manifest; `Ok(None)` when the module has no routes file
pub fn read_manifest(path: &Path) -> Result<Option<RouteManifest>, RouteLoadError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(RouteLoadError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };

    let mut manifest: RouteManifest =
        toml::from_str(&contents).map_err(|source| RouteLoadError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if let Err(reason) = check_prefix(&manifest.prefix) {
        return Err(RouteLoadError::InvalidPrefix {
            path: path.to_path_buf(),
            prefix: manifest.prefix,
            reason,
        });
    }
    manifest.prefix = normalize_prefix(&manifest.prefix);

    Ok(Some(manifest))
}

/// Check every module for its routes file and mount the ones that have one
pub fn load_module_routes(
    modules_root: &Path,
    definitions: Vec<ModuleDefinition>,
) -> Result<LoadedRoutes, RouteLoadError> {
    let mut router = Router::new();
    let mut named = NamedRoutes::new();
    let mut loaded = Vec::new();

    for module in definitions {
        let routes_file = module.routes_file(modules_root);

        let Some(manifest) = read_manifest(&routes_file)? else {
            tracing::debug!(
                module = module.name,
                path = %routes_file.display(),
                "No routes file, skipping module routes"
            );
            continue;
        };

        for (name, path) in module.named_routes {
            named.insert(*name, join_path(&manifest.prefix, path))?;
        }

        let module_router = (module.build)();
        router = if manifest.prefix == "/" {
            router.merge(module_router)
        } else {
            router.nest(&manifest.prefix, module_router)
        };

        tracing::info!(
            module = module.name,
            prefix = %manifest.prefix,
            "Loaded module routes"
        );
        loaded.push(module.name);
    }

    Ok(LoadedRoutes {
        router,
        named,
        loaded,
    })
}

/// Reject prefixes `Router::nest` cannot mount
///
/// Segments may be literals or a single `{param}` capture. Wildcards
/// (`*`, `{*rest}`) and stray braces are refused.
fn check_prefix(prefix: &str) -> Result<(), &'static str> {
    if !prefix.starts_with('/') {
        return Err("must start with '/'");
    }
    if prefix.contains('*') {
        return Err("wildcards cannot be used in a prefix");
    }

    for segment in prefix.split('/') {
        if !segment.contains(['{', '}']) {
            continue;
        }
        let capture = segment
            .strip_prefix('{')
            .and_then(|rest| rest.strip_suffix('}'))
            .filter(|name| {
                !name.is_empty() && name.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            });
        if capture.is_none() {
            return Err("braces must enclose a whole segment as `{name}`");
        }
    }

    Ok(())
}

/// "/" stays "/", otherwise trailing slashes are dropped
fn normalize_prefix(prefix: &str) -> String {
    let trimmed = prefix.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Apply a mount prefix to a route path
fn join_path(prefix: &str, path: &str) -> String {
    match (prefix, path) {
        ("/", path) => path.to_string(),
        (prefix, "/") => prefix.to_string(),
        (prefix, path) => format!("{prefix}{path}"),
    }
}

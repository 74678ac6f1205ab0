//! Bundle reader
//!
//! Reads a Juju bundle document into the application list and relation
//! list the layout works on. Only the parts the visualizer needs are
//! modelled: application names, their charm references, and relations.

use std::future::{self, Future};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use serde_yaml::{Mapping, Value};

use crate::error::{VizError, VizResult};

/// An application (graph node) declared by a bundle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Application {
    /// Application name, used as the node id
    pub name: String,
    /// Charm reference without the `cs:` store prefix
    pub charm: String,
}

impl Application {
    /// Charm name used to look up the icon: the last path segment of the
    /// reference with any revision suffix removed.
    ///
    /// ```
    /// use charmviz::bundle::Application;
    ///
    /// let app = Application {
    ///     name: "db".into(),
    ///     charm: "~openstack/postgresql-42".into(),
    /// };
    /// assert_eq!(app.icon_name(), "postgresql");
    /// ```
    pub fn icon_name(&self) -> &str {
        let last = self.charm.rsplit('/').next().unwrap_or(&self.charm);
        match last.rsplit_once('-') {
            Some((name, rev)) if !rev.is_empty() && rev.bytes().all(|b| b.is_ascii_digit()) => {
                name
            }
            _ => last,
        }
    }
}

/// A parsed bundle: applications and relations, both in document order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bundle {
    pub applications: Vec<Application>,
    /// Relations as pairs of application names
    pub relations: Vec<(String, String)>,
}

#[derive(Debug, Deserialize)]
struct RawBundle {
    #[serde(default)]
    applications: Option<Mapping>,
    /// Legacy key used by older bundles
    #[serde(default)]
    services: Option<Mapping>,
    #[serde(default)]
    relations: Vec<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawApplication {
    charm: String,
}

impl FromStr for Bundle {
    type Err = VizError;

    fn from_str(content: &str) -> VizResult<Self> {
        let raw: RawBundle =
            serde_yaml::from_str(content).map_err(|e| VizError::Parse(e.to_string()))?;

        let apps = raw
            .applications
            .or(raw.services)
            .ok_or_else(|| VizError::Parse("bundle declares no applications".into()))?;

        // Mapping keeps document order, which becomes node order
        let applications = apps
            .into_iter()
            .map(|(key, value)| {
                let name = match key {
                    Value::String(name) => name,
                    other => {
                        return Err(VizError::Parse(format!(
                            "application name must be a string, got {other:?}"
                        )));
                    }
                };
                let app: RawApplication = serde_yaml::from_value(value)
                    .map_err(|e| VizError::Parse(format!("application {name}: {e}")))?;
                Ok(Application {
                    charm: strip_store_prefix(&app.charm).to_string(),
                    name,
                })
            })
            .collect::<VizResult<Vec<_>>>()?;

        let relations = raw
            .relations
            .into_iter()
            .map(|endpoints| match endpoints.as_slice() {
                [a, b] => Ok((application_of(a).to_string(), application_of(b).to_string())),
                other => Err(VizError::Parse(format!(
                    "relation must name two endpoints, got {}",
                    other.len()
                ))),
            })
            .collect::<VizResult<Vec<_>>>()?;

        Ok(Self {
            applications,
            relations,
        })
    }
}

impl Bundle {
    pub fn application(&self, name: &str) -> Option<&Application> {
        self.applications.iter().find(|a| a.name == name)
    }
}

/// `"mysql:db"` -> `"mysql"`
fn application_of(endpoint: &str) -> &str {
    endpoint.split(':').next().unwrap_or(endpoint)
}

/// `"cs:trusty/mysql-38"` -> `"trusty/mysql-38"`
fn strip_store_prefix(charm: &str) -> &str {
    charm.strip_prefix("cs:").unwrap_or(charm)
}

/// Supplies the graph once, before the first frame
pub trait BundleSource {
    /// Human-readable origin, for logs
    fn describe(&self) -> String;

    /// Produce the bundle
    fn load(&self) -> impl Future<Output = VizResult<Bundle>> + Send;
}

/// A bundle stored in a YAML file
#[derive(Debug, Clone)]
pub struct BundleFile {
    path: PathBuf,
}

impl BundleFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl BundleSource for BundleFile {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn load(&self) -> impl Future<Output = VizResult<Bundle>> + Send {
        let path = self.path.clone();
        async move {
            let content = tokio::fs::read_to_string(&path).await?;
            content.parse()
        }
    }
}

impl BundleSource for Bundle {
    fn describe(&self) -> String {
        "in-memory bundle".to_string()
    }

    fn load(&self) -> impl Future<Output = VizResult<Bundle>> + Send {
        future::ready(Ok(self.clone()))
    }
}

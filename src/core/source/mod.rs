//! Sources and resources
//!
//! A [`Source`] is the ordered set of [`Resource`]s one pipeline run loads.
//! Each resource reads one JSON file and is loaded into the table named
//! after it.
//!
//! ```rust,no_run
//! use shoploader::config::load_config;
//! use shoploader::core::source::Source;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("shoploader.toml")?;
//! let source = Source::from_config(&config.source).select(&["raw_orders"])?;
//!
//! for resource in source.resources() {
//!     let count = resource.extract()?.count();
//!     println!("{}: {count} records", resource.name());
//! }
//! # Ok(())
//! # }
//! ```

pub mod reader;
pub mod resource;

pub use reader::read_json_array;
pub use resource::{
    create_resource, JsonFileResource, OrderItemsResource, RecordStream, Resource,
};

use crate::config::schema::SourceConfig;
use crate::domain::ids::ResourceName;
use crate::domain::{LoaderError, Result};

/// Ordered collection of resources
pub struct Source {
    name: String,
    resources: Vec<Box<dyn Resource>>,
}

impl Source {
    /// Create a source from already built resources
    pub fn new(name: impl Into<String>, resources: Vec<Box<dyn Resource>>) -> Self {
        Self {
            name: name.into(),
            resources,
        }
    }

    /// Build the configured resources, resolving their paths against `data_dir`
    pub fn from_config(config: &SourceConfig) -> Self {
        let resources = config
            .resources
            .iter()
            .map(|resource| {
                create_resource(
                    resource.kind,
                    resource.name.clone(),
                    config.resolve_path(resource),
                )
            })
            .collect();

        Self::new(config.name.clone(), resources)
    }

    /// Source name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resources in load order
    pub fn resources(&self) -> &[Box<dyn Resource>] {
        &self.resources
    }

    /// Resource names in load order
    pub fn resource_names(&self) -> Vec<&ResourceName> {
        self.resources.iter().map(|r| r.name()).collect()
    }

    /// Number of resources
    pub fn len(&self) -> usize {
        self.resources.len()
    }

    /// Whether the source has no resources
    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    /// Keep only the named resources
    ///
    /// Configured order is kept regardless of the order of `names`. An empty
    /// `names` keeps everything.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::Configuration`] if a name matches no resource.
    pub fn select<S: AsRef<str>>(self, names: &[S]) -> Result<Self> {
        if names.is_empty() {
            return Ok(self);
        }

        let unknown: Vec<&str> = names
            .iter()
            .map(|wanted| wanted.as_ref())
            .filter(|wanted| !self.resources.iter().any(|r| r.name().as_str() == *wanted))
            .collect();

        if !unknown.is_empty() {
            let available: Vec<&str> = self.resources.iter().map(|r| r.name().as_str()).collect();
            return Err(LoaderError::Configuration(format!(
                "Unknown resource(s): {}. Available: {}",
                unknown.join(", "),
                available.join(", ")
            )));
        }

        let resources = self
            .resources
            .into_iter()
            .filter(|r| names.iter().any(|wanted| wanted.as_ref() == r.name().as_str()))
            .collect();

        Ok(Self {
            name: self.name,
            resources,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::ResourceKind;
    use std::path::PathBuf;

    fn default_source() -> Source {
        let config = SourceConfig {
            data_dir: PathBuf::from("/srv/mock"),
            ..SourceConfig::default()
        };
        Source::from_config(&config)
    }

    #[test]
    fn test_from_config_defaults() {
        let source = default_source();

        assert_eq!(source.name(), "mock_shopify_data");
        assert_eq!(source.len(), 4);
        assert!(!source.is_empty());

        let names: Vec<&str> = source.resource_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "raw_shopify_mock_data",
                "raw_orders",
                "raw_products",
                "raw_customers"
            ]
        );
        assert_eq!(
            source.resources()[1].path(),
            PathBuf::from("/srv/mock/order_data.json").as_path()
        );
    }

    #[test]
    fn test_select_keeps_configured_order() {
        let source = default_source()
            .select(&["raw_customers", "raw_orders"])
            .unwrap();

        let names: Vec<&str> = source.resource_names().iter().map(|n| n.as_str()).collect();
        assert_eq!(names, vec!["raw_orders", "raw_customers"]);
    }

    #[test]
    fn test_select_empty_keeps_all() {
        let source = default_source().select::<&str>(&[]).unwrap();
        assert_eq!(source.len(), 4);
    }

    #[test]
    fn test_select_unknown_name() {
        let err = default_source()
            .select(&["raw_orders", "raw_refunds"])
            .err()
            .unwrap();

        assert!(matches!(err, LoaderError::Configuration(_)));
        assert!(err.to_string().contains("raw_refunds"));
        assert!(!err.to_string().contains("Unknown resource(s): raw_orders"));
    }

    #[test]
    fn test_new_with_custom_resources() {
        let source = Source::new(
            "adhoc",
            vec![create_resource(
                ResourceKind::Records,
                ResourceName::new("raw_extra").unwrap(),
                "/tmp/extra.json",
            )],
        );

        assert_eq!(source.name(), "adhoc");
        assert_eq!(source.resource_names()[0].as_str(), "raw_extra");
    }
}

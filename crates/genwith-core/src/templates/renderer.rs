//! Renders the client template for a validated [`Config`].

// Internal imports (std, crate)
use std::error::Error as StdError;

use super::{RegionId, RegionTree};
use crate::{config::Config, error::Result, Error};

// External imports (alphabetized)
use once_cell::sync::Lazy;
use regex::Regex;
use tera::{Context, Tera};

/// Name the built-in body is registered under
pub const TEMPLATE_NAME: &str = "with.go";

/// The built-in functional-options client template
pub const TEMPLATE_SOURCE: &str = include_str!("../../templates/with.go.tera");

static TAG: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{%.*?%\}|\{\{.*?\}\}").expect("template tag pattern is valid")
});

static REGION_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\bregion\.([A-Za-z_][A-Za-z0-9_]*)").expect("region reference pattern is valid")
});

/// Maps a configuration to generated source text
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    tera: Tera,
    name: String,
    source: String,
    regions: &'static RegionTree,
}

impl TemplateRenderer {
    /// Parse the built-in template
    pub fn new() -> Result<Self> {
        Self::from_source(TEMPLATE_NAME, TEMPLATE_SOURCE)
    }

    /// Parse an alternate template body gated on the standard region table
    pub fn from_source(name: impl Into<String>, source: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let source = source.into();

        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.add_raw_template(&name, &source).map_err(|e| {
            log::error!("parsing template {}: {}", name, describe(&e));
            Error::TemplateParse(describe(&e))
        })?;
        log::debug!("Parsed template {} ({} bytes)", name, source.len());

        Ok(Self {
            tera,
            name,
            source,
            regions: RegionTree::standard(),
        })
    }

    /// Name the template is registered under
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Region names the template body branches on, in order of first use.
    ///
    /// Only Tera tags are scanned; literal text is never a reference.
    pub fn referenced_regions(&self) -> Vec<String> {
        let mut names: Vec<String> = Vec::new();
        for tag in TAG.find_iter(&self.source) {
            for cap in REGION_REF.captures_iter(tag.as_str()) {
                let name = &cap[1];
                if !names.iter().any(|n| n == name) {
                    names.push(name.to_string());
                }
            }
        }
        names
    }

    /// Render the template for `config`.
    ///
    /// Rendering is pure: the same configuration always yields the same text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RenderExecution`] if the body branches on a region that
    /// is not in the region table, or refers to a value the context lacks.
    pub fn render(&self, config: &Config) -> Result<String> {
        let unknown: Vec<String> = self
            .referenced_regions()
            .into_iter()
            .filter(|name| RegionId::from_name(name).is_none())
            .collect();
        if !unknown.is_empty() {
            return Err(Error::RenderExecution(format!(
                "template '{}' refers to unknown regions: {}",
                self.name,
                unknown.join(", ")
            )));
        }

        let gates = self.regions.gates(config);
        let active: Vec<&str> = gates
            .iter()
            .filter(|(_, on)| **on)
            .map(|(name, _)| *name)
            .collect();
        log::debug!("Active regions: {}", active.join(", "));

        let mut context = Context::new();
        context.insert("package", config.package_name());
        context.insert("decoder", config.decoder_name());
        context.insert("invocation", config.invocation_summary());
        context.insert("region", &gates);

        self.tera.render(&self.name, &context).map_err(|e| {
            log::error!("executing template {}: {}", self.name, describe(&e));
            Error::RenderExecution(describe(&e))
        })
    }
}

/// Flatten a Tera error and its causes into one line
fn describe(err: &tera::Error) -> String {
    let mut message = err.to_string();
    let mut current: Option<&dyn StdError> = err.source();
    while let Some(cause) = current {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        current = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Flags;

    fn config() -> Config {
        Flags {
            package: "acme".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_builtin_template_parses() {
        let renderer = TemplateRenderer::new().unwrap();
        assert_eq!(renderer.name(), TEMPLATE_NAME);
    }

    #[test]
    fn test_builtin_template_references_every_region() {
        let renderer = TemplateRenderer::new().unwrap();
        let referenced = renderer.referenced_regions();
        for id in RegionId::all() {
            assert!(
                referenced.iter().any(|name| name == id.as_str()),
                "region {} is never used by the template",
                id
            );
        }
        assert_eq!(referenced.len(), RegionId::all().count());
    }

    #[test]
    fn test_malformed_template() {
        let result = TemplateRenderer::from_source("broken", "{% if region.constructor %}open");
        assert!(matches!(result, Err(Error::TemplateParse(_))));
    }

    #[test]
    fn test_undefined_variable() {
        let renderer = TemplateRenderer::from_source("missing", "package {{ module }}").unwrap();
        assert!(matches!(
            renderer.render(&config()),
            Err(Error::RenderExecution(_))
        ));
    }

    #[test]
    fn test_unknown_region() {
        let renderer = TemplateRenderer::from_source(
            "unknown",
            "{% if region.websocket %}ws{% endif %}",
        )
        .unwrap();
        let err = renderer.render(&config()).unwrap_err();
        assert!(matches!(err, Error::RenderExecution(_)));
        assert!(err.to_string().contains("websocket"));
    }

    #[test]
    fn test_region_text_outside_tags_is_literal() {
        let renderer = TemplateRenderer::from_source(
            "literal",
            "// see region.websocket in the docs\n{% if region.http_client %}client{% endif %}",
        )
        .unwrap();
        assert_eq!(renderer.referenced_regions(), vec!["http_client".to_string()]);
        assert_eq!(
            renderer.render(&config()).unwrap(),
            "// see region.websocket in the docs\nclient"
        );
    }

    #[test]
    fn test_strings_are_substituted_verbatim() {
        let renderer = TemplateRenderer::from_source(
            "strings",
            "{{ package }}|{{ decoder }}|{{ invocation }}",
        )
        .unwrap();
        let config = config().with_invocation_summary("--package acme --decoder \"x&y\"");
        assert_eq!(
            renderer.render(&config).unwrap(),
            "acme|json|--package acme --decoder \"x&y\""
        );
    }

    #[test]
    fn test_custom_body_uses_region_gates() {
        let renderer = TemplateRenderer::from_source(
            "gates",
            "{% if region.http_client %}client{% endif %}{% if region.do_request %}do{% endif %}",
        )
        .unwrap();
        assert_eq!(renderer.render(&config()).unwrap(), "client");
    }
}

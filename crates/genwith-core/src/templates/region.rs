//! Declarative table of the template's conditional regions.
//!
//! Each [`Region`] names a fragment of the generated file and the predicate
//! over the configuration that decides whether it is emitted. Regions nest:
//! a child is only considered when its parent is active, so the effective
//! gate of a nested region is the conjunction of every predicate on its path.
//!
//! The renderer hands the evaluated table to the template as a `region` map,
//! and the template body only ever branches on `region.<name>`.

// Internal imports (std, crate)
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::{Config, Flag};

// External imports (alphabetized)
use once_cell::sync::Lazy;

static STANDARD: Lazy<RegionTree> = Lazy::new(|| {
    RegionTree::new(vec![
        Region::new(RegionId::Constructor, Predicate::Flag(Flag::Client)).with_children(vec![
            Region::new(RegionId::ConstructorToken, Predicate::Flag(Flag::Token)),
            Region::new(RegionId::ConstructorConfig, Predicate::Flag(Flag::Config))
                .with_children(vec![
                    Region::new(
                        RegionId::ConstructorEndpointFunc,
                        Predicate::Flag(Flag::EndpointFunc),
                    ),
                    Region::new(
                        RegionId::ConstructorEndpointValue,
                        Predicate::Flag(Flag::EndpointValue),
                    ),
                ]),
        ]),
        Region::new(RegionId::ConfigOptions, Predicate::Flag(Flag::Config)).with_children(vec![
            Region::new(
                RegionId::AutoRefresh,
                Predicate::Any(&[Flag::EndpointValue, Flag::EndpointFunc]),
            ),
        ]),
        Region::new(RegionId::TokenOptions, Predicate::Flag(Flag::Token)),
        Region::new(RegionId::RateLimiter, Predicate::Flag(Flag::RateLimiter)),
        Region::new(RegionId::HttpTracing, Predicate::Always),
        Region::new(RegionId::Transport, Predicate::Always),
        Region::new(RegionId::HttpClient, Predicate::Always),
        Region::new(RegionId::DoRequest, Predicate::Flag(Flag::Do)),
    ])
});

/// Identifies one conditional fragment of the generated file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RegionId {
    /// `NewClient` constructor and the `Option` type
    Constructor,
    /// Token field initialization inside the constructor
    ConstructorToken,
    /// Config field initialization inside the constructor
    ConstructorConfig,
    /// Endpoint obtained by calling `Endpoint()`
    ConstructorEndpointFunc,
    /// Endpoint referenced as the `Endpoint` value
    ConstructorEndpointValue,
    /// `WithConfig` and `WithClientCredentials`
    ConfigOptions,
    /// `WithAutoRefresh`
    AutoRefresh,
    /// `WithToken` and `WithTokenCredentials`
    TokenOptions,
    /// `WithRateLimiter`
    RateLimiter,
    /// `WithHTTPTracing`
    HttpTracing,
    /// `WithTransport`
    Transport,
    /// `WithHTTPClient`
    HttpClient,
    /// The `do` request/decode method
    DoRequest,
}

impl RegionId {
    /// Returns the name the template uses for this region
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Constructor => "constructor",
            Self::ConstructorToken => "constructor_token",
            Self::ConstructorConfig => "constructor_config",
            Self::ConstructorEndpointFunc => "constructor_endpoint_func",
            Self::ConstructorEndpointValue => "constructor_endpoint_value",
            Self::ConfigOptions => "config_options",
            Self::AutoRefresh => "auto_refresh",
            Self::TokenOptions => "token_options",
            Self::RateLimiter => "rate_limiter",
            Self::HttpTracing => "http_tracing",
            Self::Transport => "transport",
            Self::HttpClient => "http_client",
            Self::DoRequest => "do_request",
        }
    }

    /// Look a region up by its template name
    pub fn from_name(name: &str) -> Option<Self> {
        Self::all().find(|id| id.as_str() == name)
    }

    /// Returns an iterator over all region ids
    pub fn all() -> impl Iterator<Item = Self> {
        use RegionId::*;
        [
            Constructor,
            ConstructorToken,
            ConstructorConfig,
            ConstructorEndpointFunc,
            ConstructorEndpointValue,
            ConfigOptions,
            AutoRefresh,
            TokenOptions,
            RateLimiter,
            HttpTracing,
            Transport,
            HttpClient,
            DoRequest,
        ]
        .iter()
        .copied()
    }
}

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Gating condition over the configuration's boolean switches
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Predicate {
    Always,
    Flag(Flag),
    /// True when at least one of the flags is set
    Any(&'static [Flag]),
}

impl Predicate {
    pub fn holds(&self, config: &Config) -> bool {
        match self {
            Self::Always => true,
            Self::Flag(flag) => config.is_set(*flag),
            Self::Any(flags) => flags.iter().any(|flag| config.is_set(*flag)),
        }
    }
}

/// A gated fragment and the fragments nested inside it
#[derive(Debug, Clone)]
pub struct Region {
    pub id: RegionId,
    pub predicate: Predicate,
    pub children: Vec<Region>,
}

impl Region {
    pub fn new(id: RegionId, predicate: Predicate) -> Self {
        Self {
            id,
            predicate,
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: Vec<Region>) -> Self {
        self.children = children;
        self
    }
}

/// Ordered forest of regions, in the order they appear in the template
#[derive(Debug, Clone)]
pub struct RegionTree {
    roots: Vec<Region>,
}

impl RegionTree {
    pub fn new(roots: Vec<Region>) -> Self {
        Self { roots }
    }

    /// The region table of the built-in client template
    pub fn standard() -> &'static RegionTree {
        &STANDARD
    }

    pub fn roots(&self) -> &[Region] {
        &self.roots
    }

    /// Regions that will be emitted for `config`.
    ///
    /// Evaluation is top-down; children of an inactive region are skipped.
    pub fn active(&self, config: &Config) -> BTreeSet<RegionId> {
        fn visit(regions: &[Region], config: &Config, out: &mut BTreeSet<RegionId>) {
            for region in regions {
                if region.predicate.holds(config) {
                    out.insert(region.id);
                    visit(&region.children, config, out);
                }
            }
        }

        let mut active = BTreeSet::new();
        visit(&self.roots, config, &mut active);
        active
    }

    /// Every region in the tree mapped to whether it is active for `config`
    pub fn gates(&self, config: &Config) -> BTreeMap<&'static str, bool> {
        let active = self.active(config);
        self.ids()
            .into_iter()
            .map(|id| (id.as_str(), active.contains(&id)))
            .collect()
    }

    /// All region ids in the tree, depth-first in template order
    pub fn ids(&self) -> Vec<RegionId> {
        fn visit(regions: &[Region], out: &mut Vec<RegionId>) {
            for region in regions {
                out.push(region.id);
                visit(&region.children, out);
            }
        }

        let mut ids = Vec::new();
        visit(&self.roots, &mut ids);
        ids
    }

    /// The ids of the regions enclosing `id`, outermost first
    pub fn ancestors(&self, id: RegionId) -> Option<Vec<RegionId>> {
        fn find(regions: &[Region], id: RegionId, path: &mut Vec<RegionId>) -> bool {
            for region in regions {
                if region.id == id {
                    return true;
                }
                path.push(region.id);
                if find(&region.children, id, path) {
                    return true;
                }
                path.pop();
            }
            false
        }

        let mut path = Vec::new();
        find(&self.roots, id, &mut path).then_some(path)
    }
}

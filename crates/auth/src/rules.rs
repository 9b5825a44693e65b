//! Whitelist rules shared by the authentication and authorization stages.
//!
//! Both stages read one ordered list; each rule says which stage(s) it
//! exempts, so the two whitelists cannot drift apart as separate literals.

use serde::{Deserialize, Serialize};

/// Pipeline stage asking whether a path is exempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Authentication,
    Authorization,
}

/// Which stage(s) a rule exempts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Authentication,
    Authorization,
    Both,
}

impl RuleScope {
    fn covers(self, stage: Stage) -> bool {
        matches!(
            (self, stage),
            (RuleScope::Both, _)
                | (RuleScope::Authentication, Stage::Authentication)
                | (RuleScope::Authorization, Stage::Authorization)
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    Exact,
    Prefix,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessRule {
    pub scope: RuleScope,
    #[serde(rename = "match")]
    pub kind: MatchKind,
    pub path: String,
}

impl AccessRule {
    pub fn exact(scope: RuleScope, path: impl Into<String>) -> Self {
        Self {
            scope,
            kind: MatchKind::Exact,
            path: path.into(),
        }
    }

    pub fn prefix(scope: RuleScope, path: impl Into<String>) -> Self {
        Self {
            scope,
            kind: MatchKind::Prefix,
            path: path.into(),
        }
    }

    fn matches(&self, path: &str) -> bool {
        match self.kind {
            MatchKind::Exact => path == self.path,
            MatchKind::Prefix => path.starts_with(&self.path),
        }
    }
}

/// Ordered whitelist rules, static for the process lifetime.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessRules {
    rules: Vec<AccessRule>,
}

impl AccessRules {
    pub fn new(rules: Vec<AccessRule>) -> Self {
        Self { rules }
    }

    /// Documentation, health, login/refresh and the public area are open to
    /// everyone; `/v1/me` needs a token but no registry permission.
    pub fn defaults() -> Self {
        Self::new(vec![
            AccessRule::exact(RuleScope::Both, "/health"),
            AccessRule::prefix(RuleScope::Both, "/docs"),
            AccessRule::exact(RuleScope::Both, "/v1/login"),
            AccessRule::exact(RuleScope::Both, "/v1/refresh"),
            AccessRule::prefix(RuleScope::Both, "/public/"),
            AccessRule::exact(RuleScope::Authorization, "/v1/me"),
        ])
    }

    /// Parse rules from a JSON array of `{scope, match, path}` objects.
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Whether `path` is exempt from `stage`'s checks.
    pub fn exempts(&self, stage: Stage, path: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.scope.covers(stage) && rule.matches(path))
    }

    pub fn rules(&self) -> &[AccessRule] {
        &self.rules
    }
}

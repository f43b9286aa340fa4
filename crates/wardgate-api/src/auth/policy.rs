// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! Declarative route authorization policy.
//!
//! The policy is an ordered table of `(method filter, path pattern,
//! requirement)` rules evaluated top to bottom; the first matching rule
//! decides. Rules must therefore be declared most-specific-first. A request
//! matching no rule requires authentication at minimum (default deny).
//!
//! The role hierarchy is flat: a rule allows exactly the roles it lists.

use axum::http::Method;

use wardgate_core::Role;

use super::AuthContext;

// =============================================================================
// PathPattern
// =============================================================================

/// A slash-separated path pattern.
///
/// Segments match literally, `*` matches exactly one segment, and a trailing
/// `**` matches any remainder including the empty one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    AnyOne,
    AnyRest,
}

impl PathPattern {
    /// Parses a pattern string such as `/api/users/*/role` or `/api/admin/**`.
    pub fn parse(pattern: &str) -> Self {
        let segments = pattern
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s {
                "*" => Segment::AnyOne,
                "**" => Segment::AnyRest,
                literal => Segment::Literal(literal.to_string()),
            })
            .collect();
        Self { segments }
    }

    /// Returns `true` if the path matches this pattern.
    pub fn matches(&self, path: &str) -> bool {
        let parts: Vec<&str> = path
            .trim_matches('/')
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        Self::match_segments(&self.segments, &parts)
    }

    fn match_segments(segments: &[Segment], parts: &[&str]) -> bool {
        match segments.split_first() {
            None => parts.is_empty(),
            Some((Segment::AnyRest, _)) => true,
            Some((segment, rest)) => match parts.split_first() {
                None => false,
                Some((part, remaining)) => {
                    let matched = match segment {
                        Segment::Literal(literal) => literal == part,
                        Segment::AnyOne => true,
                        Segment::AnyRest => unreachable!("handled above"),
                    };
                    matched && Self::match_segments(rest, remaining)
                }
            },
        }
    }
}

// =============================================================================
// Requirement & Decision
// =============================================================================

/// What a rule demands of the request's authentication state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requirement {
    /// Anyone may pass, authenticated or not.
    Public,
    /// Any resolved identity may pass.
    Authenticated,
    /// Only identities holding one of the listed roles may pass.
    Roles(Vec<Role>),
}

/// Outcome of evaluating the policy for one request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// The request may proceed.
    Allow,
    /// The target requires authentication and none was resolved (401).
    RequireAuthentication,
    /// The resolved identity lacks a required role (403).
    Forbidden,
}

impl Requirement {
    fn evaluate(&self, ctx: &AuthContext) -> Decision {
        match self {
            Requirement::Public => Decision::Allow,
            Requirement::Authenticated => {
                if ctx.is_anonymous() {
                    Decision::RequireAuthentication
                } else {
                    Decision::Allow
                }
            }
            Requirement::Roles(roles) => {
                if ctx.is_anonymous() {
                    Decision::RequireAuthentication
                } else if ctx.has_any_role(roles) {
                    Decision::Allow
                } else {
                    Decision::Forbidden
                }
            }
        }
    }
}

// =============================================================================
// AccessPolicy
// =============================================================================

/// A rule in the policy table.
#[derive(Debug, Clone)]
pub struct PolicyRule {
    /// Restricts the rule to one HTTP method; `None` matches all methods.
    pub method: Option<Method>,
    /// Path pattern the rule applies to.
    pub pattern: PathPattern,
    /// Requirement enforced when the rule matches.
    pub requirement: Requirement,
}

/// The ordered authorization table.
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    rules: Vec<PolicyRule>,
    fallback: Requirement,
}

impl AccessPolicy {
    /// Creates a policy builder.
    pub fn builder() -> AccessPolicyBuilder {
        AccessPolicyBuilder::new()
    }

    /// The default hospital-service table.
    ///
    /// OPTIONS requests match a permit-all rule ahead of the role rules so
    /// CORS preflights are never challenged; whether non-preflight OPTIONS
    /// should be exempt as well is an open question inherited from the
    /// original route configuration.
    pub fn hospital_defaults() -> Self {
        use Role::{Admin, Doctor, Patient, Staff};

        Self::builder()
            .public("/api/users/auth/**")
            .public("/api/public/**")
            .public("/health")
            .public("/ready")
            .method_public(Method::OPTIONS, "/**")
            .roles_for(Method::PUT, "/api/users/*/role", [Admin])
            .roles_for(Method::PUT, "/api/users/*/activate", [Admin, Staff])
            .roles_for(Method::PUT, "/api/users/*/deactivate", [Admin, Staff])
            .roles("/api/users/role/**", [Admin, Staff])
            .authenticated("/api/users/**")
            .roles("/api/admin/**", [Admin])
            .roles("/api/doctor/**", [Doctor, Admin])
            .roles("/api/staff/**", [Staff, Admin])
            .roles("/api/patient/**", [Patient, Doctor, Staff, Admin])
            .build()
    }

    /// Evaluates the table for a request.
    ///
    /// Evaluation is deterministic: rules are checked in declaration order
    /// and the first match wins.
    pub fn evaluate(&self, method: &Method, path: &str, ctx: &AuthContext) -> Decision {
        for rule in &self.rules {
            if let Some(ref rule_method) = rule.method {
                if rule_method != method {
                    continue;
                }
            }
            if rule.pattern.matches(path) {
                return rule.requirement.evaluate(ctx);
            }
        }
        self.fallback.evaluate(ctx)
    }

    /// Returns the number of rules in the table.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if the table has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::hospital_defaults()
    }
}

// =============================================================================
// AccessPolicyBuilder
// =============================================================================

/// Builder for constructing policy tables in declaration order.
#[derive(Debug, Default)]
pub struct AccessPolicyBuilder {
    rules: Vec<PolicyRule>,
    fallback: Option<Requirement>,
}

impl AccessPolicyBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    pub fn rule(
        mut self,
        method: Option<Method>,
        pattern: &str,
        requirement: Requirement,
    ) -> Self {
        self.rules.push(PolicyRule {
            method,
            pattern: PathPattern::parse(pattern),
            requirement,
        });
        self
    }

    /// Appends a public rule for all methods.
    pub fn public(self, pattern: &str) -> Self {
        self.rule(None, pattern, Requirement::Public)
    }

    /// Appends a public rule for one method.
    pub fn method_public(self, method: Method, pattern: &str) -> Self {
        self.rule(Some(method), pattern, Requirement::Public)
    }

    /// Appends an any-authenticated rule.
    pub fn authenticated(self, pattern: &str) -> Self {
        self.rule(None, pattern, Requirement::Authenticated)
    }

    /// Appends a role-restricted rule for all methods.
    pub fn roles(self, pattern: &str, roles: impl IntoIterator<Item = Role>) -> Self {
        self.rule(
            None,
            pattern,
            Requirement::Roles(roles.into_iter().collect()),
        )
    }

    /// Appends a role-restricted rule for one method.
    pub fn roles_for(
        self,
        method: Method,
        pattern: &str,
        roles: impl IntoIterator<Item = Role>,
    ) -> Self {
        self.rule(
            Some(method),
            pattern,
            Requirement::Roles(roles.into_iter().collect()),
        )
    }

    /// Overrides the no-match fallback, which defaults to `Authenticated`.
    pub fn fallback(mut self, requirement: Requirement) -> Self {
        self.fallback = Some(requirement);
        self
    }

    /// Builds the policy.
    pub fn build(self) -> AccessPolicy {
        AccessPolicy {
            rules: self.rules,
            fallback: self.fallback.unwrap_or(Requirement::Authenticated),
        }
    }
}

// =============================================================================
// Tests
// =============================================================================

//! Rewrite rules for retpatch.
//!
//! This module handles:
//! - Compiling named regex substitutions
//! - Running a substitution over a whole text in one forward scan
//! - The built-in success/failure return-block rules

pub mod builtin;
pub mod rewriter;

pub use builtin::{builtin_rules, failure_rule, success_rule};
pub use rewriter::{RewriteRule, escape_template};

//! Authorization gate consulted before any backbone interaction.
//!
//! A gate answers one question: may this credential touch this subject? The gateway
//! treats the answer as final and never inspects the credential itself.

use crate::config::Config;
use backbone::subject::covers;
use log::*;
use std::collections::HashMap;
use std::sync::Arc;

pub trait Authorize: Send + Sync {
    /// `credential` is the raw Authorization header value, empty when absent.
    fn authorize(&self, credential: &str, subject: &str) -> bool;
}

impl<F> Authorize for F
where
    F: Fn(&str, &str) -> bool + Send + Sync,
{
    fn authorize(&self, credential: &str, subject: &str) -> bool {
        self(credential, subject)
    }
}

/// Rejects everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct DenyAll;

impl Authorize for DenyAll {
    fn authorize(&self, _credential: &str, _subject: &str) -> bool {
        false
    }
}

/// Static grants from credential to subject patterns.
#[derive(Debug, Default, Clone)]
pub struct PermissionTable {
    grants: HashMap<String, Vec<String>>,
}

impl PermissionTable {
    /// Build from `credential=pattern` entries. Malformed entries are skipped.
    pub fn from_entries(entries: &[String]) -> Self {
        let mut table = Self::default();
        for entry in entries {
            match entry.split_once('=') {
                Some((credential, pattern))
                    if !credential.trim().is_empty() && !pattern.trim().is_empty() =>
                {
                    table.grant(credential.trim(), pattern.trim());
                }
                _ => warn!("Ignoring malformed permission entry: {entry:?}"),
            }
        }
        table
    }

    pub fn grant(&mut self, credential: &str, pattern: &str) {
        self.grants
            .entry(credential.to_string())
            .or_default()
            .push(pattern.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.grants.is_empty()
    }
}

impl Authorize for PermissionTable {
    fn authorize(&self, credential: &str, subject: &str) -> bool {
        self.grants.get(credential).is_some_and(|patterns| {
            patterns.iter().any(|pattern| covers(pattern, subject))
        })
    }
}

/// The gate the configuration asks for. Without any grants every request is denied.
pub fn authorizer_from_config(config: &Config) -> Arc<dyn Authorize> {
    let table = PermissionTable::from_entries(config.permissions());
    if table.is_empty() {
        warn!("No permissions configured, every request will be rejected");
        return Arc::new(DenyAll);
    }
    info!("Loaded subject grants for {} credential(s)", table.grants.len());
    Arc::new(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn entries(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|entry| entry.to_string()).collect()
    }

    #[test]
    fn closures_act_as_gates() {
        let gate = |credential: &str, subject: &str| {
            credential == "john" && subject.starts_with("users.john")
        };
        assert!(gate.authorize("john", "users.john.inbox"));
        assert!(!gate.authorize("pete", "users.john.inbox"));
    }

    #[test]
    fn deny_all_rejects_everything() {
        assert!(!DenyAll.authorize("", "anything"));
        assert!(!DenyAll.authorize("root", ">"));
    }

    #[test]
    fn table_matches_wildcard_grants() {
        let table = PermissionTable::from_entries(&entries(&[
            "john=users.john.>",
            "john=broadcast.*",
            "pete=users.pete",
        ]));

        assert!(table.authorize("john", "users.john.inbox.1"));
        assert!(table.authorize("john", "broadcast.news"));
        assert!(!table.authorize("john", "broadcast.news.sports"));
        assert!(!table.authorize("john", "users.pete"));
        assert!(table.authorize("pete", "users.pete"));
        assert!(!table.authorize("", "users.pete"));
    }

    #[test]
    fn wildcard_subjects_need_a_wider_grant() {
        let table = PermissionTable::from_entries(&entries(&["john=users.john.>"]));

        assert!(table.authorize("john", "users.john.*"));
        assert!(!table.authorize("john", "users.>"));
        assert!(!table.authorize("john", "*.john.inbox"));
    }

    #[test]
    fn malformed_entries_are_skipped() {
        let table =
            PermissionTable::from_entries(&entries(&["john", "=users.x", "pete=", " ann = a.b "]));

        assert!(table.authorize("ann", "a.b"));
        assert!(!table.authorize("john", "john"));
        assert!(!table.authorize("", "users.x"));
    }

    #[test]
    fn empty_configuration_denies_everything() {
        let config = Config::parse_from(["natssse_gateway"]).set_permissions(Vec::new());
        let gate = authorizer_from_config(&config);
        assert!(!gate.authorize("john", "users.john"));

        let config = config.set_permissions(entries(&["john=users.john"]));
        let gate = authorizer_from_config(&config);
        assert!(gate.authorize("john", "users.john"));
    }
}

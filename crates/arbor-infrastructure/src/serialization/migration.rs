//! Forward migrations for the tree document.
//!
//! Migrations form a linear chain over integer document versions
//! (1 → 2 → 3 …). Each step rewrites the raw JSON document before any node is
//! rebuilt, so kinds only ever see the current shape.

use anyhow::{Context, Result};
use arbor_core::ArborError;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// One step of the document migration chain.
pub trait DocumentMigration: Send + Sync + fmt::Debug {
    /// Returns the version this migration reads.
    fn from_version(&self) -> u32;

    /// Returns the version this migration produces.
    fn to_version(&self) -> u32;

    /// Returns a human-readable description of this migration.
    ///
    /// Used for logging.
    fn description(&self) -> &str;

    /// Rewrites the whole document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document cannot be brought to `to_version`.
    fn migrate(&self, document: Value) -> Result<Value>;
}

/// Registry for a linear chain of document migrations.
///
/// When adding migrations via `register()`, the chain validates that each
/// new migration's `from_version()` matches the previous migration's
/// `to_version()` and that no step goes past the latest version.
#[derive(Debug, Clone)]
pub struct MigrationChain {
    migrations: Vec<Arc<dyn DocumentMigration>>,
    latest_version: u32,
}

impl MigrationChain {
    /// Creates an empty chain targeting `latest_version`.
    pub fn new(latest_version: u32) -> Self {
        Self {
            migrations: Vec::new(),
            latest_version,
        }
    }

    /// Registers a single migration, validating chain continuity.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: the migration extends the chain
    /// - `Err(ArborError::Migration)`: the step does not connect to the
    ///   previous one, goes backwards, or overshoots the latest version
    pub fn register(&mut self, migration: Arc<dyn DocumentMigration>) -> arbor_core::Result<()> {
        if migration.to_version() <= migration.from_version() {
            return Err(ArborError::migration(format!(
                "Migration '{}' does not move forward ({} -> {})",
                migration.description(),
                migration.from_version(),
                migration.to_version()
            )));
        }

        if let Some(last) = self.migrations.last() {
            if last.to_version() != migration.from_version() {
                return Err(ArborError::migration(format!(
                    "Migration chain broken: expected migration from {} (previous to_version), \
                     but got migration from {}. Description: '{}' (previous) -> '{}' (current)",
                    last.to_version(),
                    migration.from_version(),
                    last.description(),
                    migration.description()
                )));
            }
        }

        if migration.to_version() > self.latest_version {
            return Err(ArborError::migration(format!(
                "Migration target version {} exceeds latest version {}",
                migration.to_version(),
                self.latest_version
            )));
        }

        self.migrations.push(migration);
        Ok(())
    }

    /// Registers multiple migrations in order.
    pub fn register_all(
        &mut self,
        migrations: Vec<Arc<dyn DocumentMigration>>,
    ) -> arbor_core::Result<()> {
        for migration in migrations {
            self.register(migration)?;
        }
        Ok(())
    }

    pub fn latest_version(&self) -> u32 {
        self.latest_version
    }

    pub fn is_empty(&self) -> bool {
        self.migrations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.migrations.len()
    }

    /// True if the last registered step lands on the latest version.
    /// An empty chain is complete.
    pub fn is_complete(&self) -> bool {
        self.migrations
            .last()
            .is_none_or(|last| last.to_version() == self.latest_version)
    }

    /// True if `version` is the latest or a complete chain starts from it.
    pub fn can_migrate(&self, version: u32) -> bool {
        version == self.latest_version
            || (self.is_complete() && self.find_start_index(version).is_some())
    }

    /// The versions a document passes through starting at `from`.
    pub fn path_from(&self, from: u32) -> Option<Vec<u32>> {
        if from == self.latest_version {
            return Some(vec![from]);
        }
        if !self.is_complete() {
            return None;
        }
        let start = self.find_start_index(from)?;
        let mut path = vec![from];
        path.extend(self.migrations[start..].iter().map(|m| m.to_version()));
        Some(path)
    }

    fn find_start_index(&self, from_version: u32) -> Option<usize> {
        self.migrations
            .iter()
            .position(|m| m.from_version() == from_version)
    }

    /// Applies every step from `current_version` to the latest version.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the document is newer than the latest version
    /// - no migration starts from `current_version`
    /// - the chain stops short of the latest version
    /// - any step fails
    pub fn migrate_to_latest(&self, mut document: Value, current_version: u32) -> Result<Value> {
        if current_version == self.latest_version {
            tracing::debug!(
                version = current_version,
                "Document is already at the latest version, no migration needed"
            );
            return Ok(document);
        }

        if current_version > self.latest_version {
            anyhow::bail!(
                "Document version ({}) is newer than the latest supported version ({})",
                current_version,
                self.latest_version
            );
        }

        if !self.is_complete() {
            let reached = self
                .migrations
                .last()
                .map(|m| m.to_version())
                .unwrap_or(current_version);
            anyhow::bail!(
                "Migration chain ends at version {} but the latest version is {}",
                reached,
                self.latest_version
            );
        }

        let start_idx = self.find_start_index(current_version).ok_or_else(|| {
            let available: Vec<String> = self
                .migrations
                .iter()
                .map(|m| format!("{} -> {}", m.from_version(), m.to_version()))
                .collect();
            anyhow::anyhow!(
                "No migration found starting from version {}. Available migrations: [{}]",
                current_version,
                available.join(", ")
            )
        })?;

        let steps = self.migrations.len() - start_idx;
        tracing::info!(
            from = current_version,
            to = self.latest_version,
            steps,
            "Starting document migration"
        );

        for (i, migration) in self.migrations[start_idx..].iter().enumerate() {
            tracing::info!(
                "Migration step {}/{}: {} -> {} ({})",
                i + 1,
                steps,
                migration.from_version(),
                migration.to_version(),
                migration.description()
            );

            document = migration.migrate(document).with_context(|| {
                format!(
                    "Migration failed at step {}: {} -> {}",
                    i + 1,
                    migration.from_version(),
                    migration.to_version()
                )
            })?;
        }

        tracing::info!(
            from = current_version,
            to = self.latest_version,
            "Document migration completed"
        );
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    /// Appends its target version to the document's `trail` array.
    #[derive(Debug)]
    struct TrailMigration {
        from: u32,
        to: u32,
        desc: &'static str,
    }

    impl DocumentMigration for TrailMigration {
        fn from_version(&self) -> u32 {
            self.from
        }

        fn to_version(&self) -> u32 {
            self.to
        }

        fn description(&self) -> &str {
            self.desc
        }

        fn migrate(&self, mut document: Value) -> Result<Value> {
            let trail = document
                .get_mut("trail")
                .and_then(Value::as_array_mut)
                .context("document has no trail")?;
            trail.push(json!(self.to));
            Ok(document)
        }
    }

    fn step(from: u32, to: u32) -> Arc<dyn DocumentMigration> {
        Arc::new(TrailMigration {
            from,
            to,
            desc: "trail",
        })
    }

    #[test]
    fn test_empty_chain() {
        let chain = MigrationChain::new(1);
        assert!(chain.is_empty());
        assert_eq!(chain.len(), 0);
        assert!(chain.can_migrate(1));
        assert!(!chain.can_migrate(0));
    }

    #[test]
    fn test_register_broken_chain() {
        let mut chain = MigrationChain::new(4);
        chain.register(step(1, 2)).unwrap();

        let err = chain.register(step(3, 4)).unwrap_err();
        assert!(err.to_string().contains("Migration chain broken"));
        assert_eq!(chain.len(), 1);
    }

    #[test]
    fn test_register_rejects_overshoot_and_backwards_steps() {
        let mut chain = MigrationChain::new(2);
        assert!(chain.register(step(1, 3)).is_err());
        assert!(chain.register(step(2, 1)).is_err());
        assert!(chain.is_empty());
    }

    #[test]
    fn test_migrate_through_all_steps() {
        let mut chain = MigrationChain::new(3);
        chain.register_all(vec![step(1, 2), step(2, 3)]).unwrap();

        let migrated = chain
            .migrate_to_latest(json!({ "trail": [] }), 1)
            .unwrap();
        assert_eq!(migrated["trail"], json!([2, 3]));
        assert_eq!(chain.path_from(1), Some(vec![1, 2, 3]));
    }

    #[test]
    fn test_already_at_latest_version() {
        let chain = MigrationChain::new(1);
        let document = json!({ "nodes": [] });
        assert_eq!(chain.migrate_to_latest(document.clone(), 1).unwrap(), document);
    }

    #[test]
    fn test_newer_or_unknown_versions_fail() {
        let mut chain = MigrationChain::new(3);
        chain.register(step(2, 3)).unwrap();

        assert!(chain.migrate_to_latest(json!({}), 999).is_err());
        assert!(chain.migrate_to_latest(json!({}), 1).is_err());
        assert_eq!(chain.path_from(1), None);
    }

    #[test]
    fn test_chain_short_of_latest_is_rejected() {
        let mut chain = MigrationChain::new(2);
        chain.register(step(0, 1)).unwrap();

        assert!(!chain.is_complete());
        assert!(!chain.can_migrate(0));
        assert_eq!(chain.path_from(0), None);
        let err = chain
            .migrate_to_latest(json!({ "trail": [] }), 0)
            .unwrap_err();
        assert!(err.to_string().contains("ends at version 1"));

        chain.register(step(1, 2)).unwrap();
        assert!(chain.is_complete());
        let migrated = chain
            .migrate_to_latest(json!({ "trail": [] }), 0)
            .unwrap();
        assert_eq!(migrated["trail"], json!([1, 2]));
    }

    #[test]
    fn test_failing_step_reports_context() {
        let mut chain = MigrationChain::new(2);
        chain.register(step(1, 2)).unwrap();

        let err = chain.migrate_to_latest(json!({}), 1).unwrap_err();
        assert!(format!("{:#}", err).contains("Migration failed at step 1"));
    }
}

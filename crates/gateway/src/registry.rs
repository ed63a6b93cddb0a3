// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Seam to the out-of-scope gateway registry collaborator.
//!
//! spec.md names a key/value registry from which a [`GatewayDescriptor`] is
//! fetched, but keeps its implementation out of scope. [`GatewayRegistry`]
//! is the trait the Session Manager's demonstration binary depends on;
//! production deployments supply their own implementation backed by
//! whatever document store the rest of the application already uses.

use std::collections::HashMap;
use std::path::Path;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::descriptor::GatewayDescriptor;

/// Source of gateway descriptors, keyed by gateway id.
#[async_trait]
pub trait GatewayRegistry: Send + Sync {
    async fn descriptor(&self, id: &str) -> Option<GatewayDescriptor>;
}

/// A registry backed by a JSON file of `GatewayDescriptor` records, used by
/// the demonstration binary and integration tests in place of the real
/// document-database-backed registry.
pub struct FileRegistry {
    descriptors: RwLock<HashMap<String, GatewayDescriptor>>,
}

impl FileRegistry {
    /// Load descriptors from a JSON file containing an array of
    /// [`GatewayDescriptor`] objects.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let list: Vec<GatewayDescriptor> = serde_json::from_str(&contents)?;
        let descriptors = list.into_iter().map(|d| (d.id.clone(), d)).collect();
        Ok(Self { descriptors: RwLock::new(descriptors) })
    }

    /// Build a registry directly from a list of descriptors (used in tests).
    pub fn from_descriptors(descriptors: Vec<GatewayDescriptor>) -> Self {
        let map = descriptors.into_iter().map(|d| (d.id.clone(), d)).collect();
        Self { descriptors: RwLock::new(map) }
    }

    pub fn insert(&self, descriptor: GatewayDescriptor) {
        if let Ok(mut guard) = self.descriptors.write() {
            guard.insert(descriptor.id.clone(), descriptor);
        }
    }

    /// Every currently-known descriptor, in no particular order. Used by
    /// the demonstration binary to connect every configured gateway at
    /// startup.
    pub fn all(&self) -> Vec<GatewayDescriptor> {
        self.descriptors.read().map(|guard| guard.values().cloned().collect()).unwrap_or_default()
    }
}

#[async_trait]
impl GatewayRegistry for FileRegistry {
    async fn descriptor(&self, id: &str) -> Option<GatewayDescriptor> {
        self.descriptors.read().ok()?.get(id).cloned()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;

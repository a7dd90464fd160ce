//! Lazy schema loading implementation.
//!
//! This module provides `LazySchema`, a thread-safe wrapper that defers schema
//! building until first access. This allows the server to start immediately
//! without waiting for the store to answer.

use std::sync::Arc;

use async_graphql::dynamic::Schema;
use tokio::sync::{Mutex, MutexGuard, RwLock};
use tracing::{info, warn};

use super::SchemaBuilder;
use crate::error::GraphQLError;

/// State of the lazy schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaState {
    /// Schema has not been built yet.
    Uninitialized,
    /// Schema is currently being built.
    Building,
    /// Schema is ready for use.
    Ready,
    /// Schema build failed. The failure is final.
    Failed,
}

/// Thread-safe lazy schema holder.
///
/// `LazySchema` owns a single-use [`SchemaBuilder`] and builds the schema on
/// first access. A failed build is remembered and reported to every later
/// caller; there is no rebuild.
///
/// # Example
///
/// ```ignore
/// let lazy_schema = LazySchema::new(schema_builder);
///
/// // First access triggers build
/// let schema = lazy_schema.get_or_build().await?;
///
/// // Subsequent accesses use cached schema
/// let schema = lazy_schema.get_or_build().await?;
/// ```
pub struct LazySchema {
    /// The cached schema.
    schema: RwLock<Option<Arc<Schema>>>,

    /// The schema builder. Holding this lock means building.
    builder: Mutex<SchemaBuilder>,

    /// Current state of the schema.
    state: RwLock<SchemaState>,

    /// Build error message, once a build has failed.
    last_error: RwLock<Option<String>>,
}

impl LazySchema {
    /// Creates a new lazy schema with the given builder.
    #[must_use]
    pub fn new(builder: SchemaBuilder) -> Self {
        Self {
            schema: RwLock::new(None),
            builder: Mutex::new(builder),
            state: RwLock::new(SchemaState::Uninitialized),
            last_error: RwLock::new(None),
        }
    }

    /// Returns the current state of the schema.
    pub async fn state(&self) -> SchemaState {
        *self.state.read().await
    }

    /// Gets the schema, building it if necessary.
    ///
    /// Concurrent callers receive an error while a build is in progress.
    /// For introspection queries or cases where waiting is acceptable,
    /// use `get_or_build_wait()` instead.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaInitializing` if another build is in progress.
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails or failed before.
    pub async fn get_or_build(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        if *self.state.read().await == SchemaState::Building {
            return Err(GraphQLError::SchemaInitializing);
        }

        let Ok(builder) = self.builder.try_lock() else {
            return Err(GraphQLError::SchemaInitializing);
        };

        self.build_locked(builder).await
    }

    /// Gets the schema, building it if necessary, and waits for an in-progress
    /// build to complete.
    ///
    /// # Errors
    ///
    /// Returns `GraphQLError::SchemaBuildFailed` if the build fails or failed before.
    pub async fn get_or_build_wait(&self) -> Result<Arc<Schema>, GraphQLError> {
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }

        let builder = self.builder.lock().await;
        self.build_locked(builder).await
    }

    async fn build_locked(
        &self,
        mut builder: MutexGuard<'_, SchemaBuilder>,
    ) -> Result<Arc<Schema>, GraphQLError> {
        // Another caller may have finished while we waited for the lock.
        if let Some(schema) = self.get().await {
            return Ok(schema);
        }
        if let Some(err) = self.last_error().await {
            return Err(GraphQLError::SchemaBuildFailed(err));
        }

        *self.state.write().await = SchemaState::Building;
        info!("Building GraphQL schema...");

        match builder.build().await {
            Ok(schema) => {
                let schema = Arc::new(schema);
                *self.schema.write().await = Some(Arc::clone(&schema));
                *self.state.write().await = SchemaState::Ready;
                info!("GraphQL schema built successfully");
                Ok(schema)
            }
            Err(e) => {
                let error_msg = e.to_string();
                warn!(error = %error_msg, "Failed to build GraphQL schema");
                *self.last_error.write().await = Some(error_msg.clone());
                *self.state.write().await = SchemaState::Failed;
                Err(GraphQLError::SchemaBuildFailed(error_msg))
            }
        }
    }

    /// Gets the schema if it's already built, without triggering a build.
    pub async fn get(&self) -> Option<Arc<Schema>> {
        self.schema.read().await.clone()
    }

    /// Returns the build error, if the build failed.
    pub async fn last_error(&self) -> Option<String> {
        self.last_error.read().await.clone()
    }

    /// Returns whether the schema is ready for use.
    pub async fn is_ready(&self) -> bool {
        *self.state.read().await == SchemaState::Ready
    }
}

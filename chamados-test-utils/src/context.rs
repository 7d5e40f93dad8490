//! Test context structure and utilities.
//!
//! This module provides the `TestContext` returned by `TestBuilder`. The context includes an
//! in-memory SQLite database, a mock HTTP server for outbound integrations (webhooks, OneSignal),
//! a temporary media directory and an in-memory session store.

use std::{path::Path, sync::Arc};

use mockito::{Mock, Server, ServerGuard};
use sea_orm::{sea_query::TableCreateStatement, ConnectionTrait, Database, DatabaseConnection};
use tempfile::TempDir;
use tower_sessions::{MemoryStore, Session};

use crate::error::TestError;

/// Test context structure returned by `TestBuilder`
///
/// # Usage
///
/// ```ignore
/// let mut test = TestBuilder::new().with_user_tables().build().await?;
///
/// let sector = test.user().insert_sector("TI").await?;
/// let user = test.user().insert_user("a@example.com", Hierarchy::Padrao, Some(sector.id)).await?;
///
/// test.assert_mocks();
/// ```
pub struct TestContext {
    /// Database connection to in-memory SQLite database
    pub db: DatabaseConnection,
    /// Session store for test authentication flows
    pub session: Session,
    /// Temporary directory standing in for the media root, removed on drop
    pub media: TempDir,

    /// Mock HTTP server for webhook and push provider endpoints
    pub(crate) server: ServerGuard,
    /// Collection of mock HTTP endpoints for assertion
    pub(crate) mocks: Vec<Mock>,
}

impl TestContext {
    /// Create a new test context.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully initialized test context
    /// - `Err(TestError::DbErr)` - Database connection failed
    /// - `Err(TestError::IoError)` - Temporary media directory could not be created
    pub(crate) async fn new() -> Result<Self, TestError> {
        let mock_server = Server::new_async().await;

        let store = Arc::new(MemoryStore::default());
        let session = Session::new(None, store, None);

        let db = Database::connect("sqlite::memory:").await?;
        let media = tempfile::tempdir()?;

        Ok(TestContext {
            server: mock_server,
            db,
            session,
            media,
            mocks: Vec::new(),
        })
    }

    /// Base URL of the mock HTTP server, e.g. `http://127.0.0.1:1234`.
    pub fn server_url(&self) -> String {
        self.server.url()
    }

    /// Path of the temporary media directory.
    pub fn media_root(&self) -> &Path {
        self.media.path()
    }

    /// Create database tables from schema statements.
    pub(crate) async fn with_tables(
        &self,
        stmts: Vec<TableCreateStatement>,
    ) -> Result<(), TestError> {
        for stmt in stmts {
            self.db.execute(&stmt).await?;
        }

        Ok(())
    }

    /// Assert all mock endpoints were called as expected.
    ///
    /// # Panics
    /// Panics if any mock endpoint was not called the expected number of times
    pub fn assert_mocks(&self) {
        for mock in &self.mocks {
            mock.assert();
        }
    }
}

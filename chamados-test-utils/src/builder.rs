//! Declarative test builder.
//!
//! The builder queues table groups, custom tables and mock endpoints, then creates them all
//! during the final `build()` call. Table groups are created in foreign key order and each
//! group pulls in the groups it depends on.

use mockito::Mock;
use sea_orm::{sea_query::TableCreateStatement, EntityTrait, Schema};

use crate::{error::TestError, TestContext};

/// Builder for declarative test initialization.
pub struct TestBuilder {
    // Table groups to create
    include_user_tables: bool,
    include_ticket_tables: bool,
    include_checklist_tables: bool,
    include_prize_tables: bool,
    include_notification_tables: bool,
    include_support_tables: bool,

    // Additional tables to create after the groups
    tables: Vec<TableCreateStatement>,

    // Mock endpoints to create
    mock_builders: Vec<Box<dyn FnOnce(&mut mockito::ServerGuard) -> Mock>>,
}

impl TestBuilder {
    /// Create a new TestBuilder with no tables or mock endpoints configured.
    pub fn new() -> Self {
        Self {
            include_user_tables: false,
            include_ticket_tables: false,
            include_checklist_tables: false,
            include_prize_tables: false,
            include_notification_tables: false,
            include_support_tables: false,
            tables: Vec::new(),
            mock_builders: Vec::new(),
        }
    }

    /// Add the sector, user and system log tables.
    pub fn with_user_tables(mut self) -> Self {
        self.include_user_tables = true;
        self
    }

    /// Add the ticket tables (categories, tickets, comments, logs, webhooks) and user tables.
    pub fn with_ticket_tables(mut self) -> Self {
        self.include_user_tables = true;
        self.include_ticket_tables = true;
        self
    }

    /// Add the checklist tables and user tables.
    pub fn with_checklist_tables(mut self) -> Self {
        self.include_user_tables = true;
        self.include_checklist_tables = true;
        self
    }

    /// Add the prize, redemption and credit ledger tables and user tables.
    pub fn with_prize_tables(mut self) -> Self {
        self.include_user_tables = true;
        self.include_prize_tables = true;
        self
    }

    /// Add the notification and device registry tables and user tables.
    pub fn with_notification_tables(mut self) -> Self {
        self.include_user_tables = true;
        self.include_notification_tables = true;
        self
    }

    /// Add the support chat tables and user tables.
    pub fn with_support_tables(mut self) -> Self {
        self.include_user_tables = true;
        self.include_support_tables = true;
        self
    }

    /// Add every table of the application.
    pub fn with_all_tables(self) -> Self {
        self.with_ticket_tables()
            .with_checklist_tables()
            .with_prize_tables()
            .with_notification_tables()
            .with_support_tables()
    }

    /// Add a custom entity table to the test database.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use chamados_test_utils::TestBuilder;
    /// use entity::prelude::*;
    ///
    /// # async fn example() -> Result<(), chamados_test_utils::TestError> {
    /// let test = TestBuilder::new()
    ///     .with_table(Sector)
    ///     .with_table(AppUser)
    ///     .build()
    ///     .await?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn with_table<E: EntityTrait>(mut self, entity: E) -> Self {
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);
        self.tables.push(schema.create_table_from_entity(entity));
        self
    }

    /// Add a custom mock endpoint with full control over the mockito server.
    pub fn with_mock_endpoint<F>(mut self, setup: F) -> Self
    where
        F: FnOnce(&mut mockito::ServerGuard) -> Mock + 'static,
    {
        self.mock_builders.push(Box::new(setup));
        self
    }

    /// Build the test context by creating all configured tables and mock endpoints.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Fully configured test environment ready for use
    /// - `Err(TestError::DbErr)` - Database table creation failed
    pub async fn build(self) -> Result<TestContext, TestError> {
        use entity::prelude::*;

        let mut context = TestContext::new().await?;
        let schema = Schema::new(sea_orm::DbBackend::Sqlite);

        // 1. Create tables, referenced tables first
        let mut all_tables = Vec::new();

        if self.include_user_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(Sector),
                schema.create_table_from_entity(AppUser),
                schema.create_table_from_entity(SystemLog),
            ]);
        }

        if self.include_ticket_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(TicketCategory),
                schema.create_table_from_entity(Ticket),
                schema.create_table_from_entity(TicketComment),
                schema.create_table_from_entity(TicketLog),
                schema.create_table_from_entity(Webhook),
            ]);
        }

        if self.include_checklist_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(ChecklistTemplate),
                schema.create_table_from_entity(ChecklistTask),
                schema.create_table_from_entity(ChecklistAssignment),
                schema.create_table_from_entity(ChecklistExecution),
                schema.create_table_from_entity(ChecklistTaskExecution),
            ]);
        }

        if self.include_prize_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(Prize),
                schema.create_table_from_entity(Redemption),
                schema.create_table_from_entity(CreditTransaction),
            ]);
        }

        if self.include_notification_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(Notification),
                schema.create_table_from_entity(UserNotification),
                schema.create_table_from_entity(DeviceToken),
                schema.create_table_from_entity(OnesignalPlayer),
                schema.create_table_from_entity(TruepushSubscriber),
            ]);
        }

        if self.include_support_tables {
            all_tables.extend(vec![
                schema.create_table_from_entity(SupportChat),
                schema.create_table_from_entity(SupportChatMessage),
                schema.create_table_from_entity(SupportAgent),
            ]);
        }

        all_tables.extend(self.tables);
        context.with_tables(all_tables).await?;

        // 2. Create mock endpoints in registration order so tests can stack responses per path
        let mut mocks = Vec::new();

        for builder in self.mock_builders {
            mocks.push(builder(&mut context.server));
        }

        context.mocks = mocks;

        Ok(context)
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_builder_creates_user_tables() {
        let result = TestBuilder::new().with_user_tables().build().await;
        assert!(result.is_ok());
    }

    #[tokio::test]
    async fn test_builder_creates_every_table_group() {
        let result = TestBuilder::new().with_all_tables().build().await;
        assert!(result.is_ok());
    }
}

// SPDX-FileCopyrightText: 2026 Vigil Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end waiter-flow testing.
//!
//! `TestBot` assembles the real dispatcher, lifecycle manager, and SQLite
//! store over a temp database, with the transport mocked out. Tests drive it
//! by seeding users and waiters, then feeding events through the dispatcher.

use std::sync::Arc;

use vigil_config::model::StorageConfig;
use vigil_core::{
    ConversationKind, DocumentRef, InboundEvent, User, VigilError, WaiterHandler,
};
use vigil_listeners::{HandlerRegistry, LifecycleManager, ListenerDispatcher, PromptValidator};
use vigil_storage::SqliteStore;

use crate::transport::MockTransport;

/// Builder for assembling a [`TestBot`] with registered flow handlers.
pub struct TestBotBuilder {
    handlers: Vec<Arc<dyn WaiterHandler>>,
    delete_prompt_replies: bool,
}

impl TestBotBuilder {
    fn new() -> Self {
        Self {
            handlers: Vec::new(),
            delete_prompt_replies: true,
        }
    }

    /// Register a flow handler.
    pub fn with_handler(mut self, handler: Arc<dyn WaiterHandler>) -> Self {
        self.handlers.push(handler);
        self
    }

    /// Toggle cosmetic deletion of the user's reply message.
    pub fn delete_prompt_replies(mut self, delete: bool) -> Self {
        self.delete_prompt_replies = delete;
        self
    }

    /// Build the harness: temp SQLite database, real store and dispatcher,
    /// mock transport.
    pub async fn build(self) -> Result<TestBot, VigilError> {
        let temp_dir = tempfile::TempDir::new().map_err(|e| {
            VigilError::Internal(format!("failed to create temp dir: {e}"))
        })?;
        let config = StorageConfig {
            database_path: temp_dir.path().join("test.db").display().to_string(),
            wal_mode: true,
        };

        let store = SqliteStore::open(&config).await?;
        let transport = Arc::new(MockTransport::new());
        let validator = Arc::new(PromptValidator::new(transport.clone()));

        let mut registry = HandlerRegistry::new();
        for handler in self.handlers {
            registry.register(handler)?;
        }

        let dispatcher = Arc::new(ListenerDispatcher::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            transport.clone(),
            validator,
            Arc::new(registry),
            self.delete_prompt_replies,
        ));
        let lifecycle = LifecycleManager::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            store.all_draft_families(),
        );

        Ok(TestBot {
            store,
            transport,
            dispatcher,
            lifecycle,
            _temp_dir: temp_dir,
        })
    }
}

/// A complete waiter-flow environment over a temp database.
pub struct TestBot {
    /// Real SQLite store (temp DB, cleaned up on drop).
    pub store: SqliteStore,
    /// The mock transport capturing outbound traffic.
    pub transport: Arc<MockTransport>,
    /// The real dispatcher under test.
    pub dispatcher: Arc<ListenerDispatcher>,
    /// The real lifecycle manager under test.
    pub lifecycle: LifecycleManager,
    _temp_dir: tempfile::TempDir,
}

impl TestBot {
    pub fn builder() -> TestBotBuilder {
        TestBotBuilder::new()
    }

    /// Create a user keyed by an external platform id.
    pub async fn seed_user(&self, tg_id: &str) -> Result<User, VigilError> {
        self.store.create_user(tg_id).await
    }

    /// A private-chat text event from `tg_id`.
    pub fn text_event(&self, tg_id: &str, chat_id: i64, message_id: i32, text: &str) -> InboundEvent {
        InboundEvent {
            conversation: ConversationKind::Private,
            sender_id: tg_id.to_string(),
            chat_id,
            message_id,
            text: Some(text.to_string()),
            document: None,
        }
    }

    /// A private-chat document event from `tg_id`. The document content is
    /// whatever the mock transport's fetch queue serves.
    pub fn document_event(&self, tg_id: &str, chat_id: i64, message_id: i32) -> InboundEvent {
        InboundEvent {
            conversation: ConversationKind::Private,
            sender_id: tg_id.to_string(),
            chat_id,
            message_id,
            text: None,
            document: Some(DocumentRef {
                file_id: "test-file-id".to_string(),
                file_name: Some("payload.txt".to_string()),
                mime_type: Some("text/plain".to_string()),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::RecordingHandler;
    use vigil_core::{NewWaiter, WaiterKind, WaiterStore};

    #[tokio::test]
    async fn builder_creates_working_environment() {
        let bot = TestBot::builder().build().await.unwrap();
        let user = bot.seed_user("tg-1").await.unwrap();
        assert_eq!(user.tg_id, "tg-1");
    }

    #[tokio::test]
    async fn dispatch_runs_against_real_store() {
        let handler = Arc::new(RecordingHandler::completing("test_flow"));
        let bot = TestBot::builder().with_handler(handler.clone()).build().await.unwrap();

        let user = bot.seed_user("tg-1").await.unwrap();
        bot.store
            .create(NewWaiter {
                flow: "test_flow".to_string(),
                kind: Some(WaiterKind::Text),
                user_id: Some(user.id),
                chat_id: Some(10),
                message_id: Some(20),
                extra_data: None,
            })
            .await
            .unwrap();

        bot.dispatcher
            .on_text_event(&bot.text_event("tg-1", 10, 99, "hello"))
            .await
            .unwrap();

        assert_eq!(handler.payloads(), ["hello"]);
        assert!(bot.store.find_active(user.id, WaiterKind::Text).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn temp_db_is_unique_per_bot() {
        let b1 = TestBot::builder().build().await.unwrap();
        let b2 = TestBot::builder().build().await.unwrap();

        b1.seed_user("tg-1").await.unwrap();
        use vigil_core::UserResolver;
        assert!(b1.store.find_by_external_id("tg-1").await.unwrap().is_some());
        assert!(b2.store.find_by_external_id("tg-1").await.unwrap().is_none());
    }
}

//! Async task management for non-blocking API operations.
//!
//! List views never await the backend. They return a [`Command`], the main
//! loop hands it to [`TaskSpawner`], and the outcome comes back through the
//! channel as an [`ApiMessage`] carrying the [`ListMsg`] to apply.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::debug;

use crate::api::types::{Category, Entity, Product};
use crate::api::EntityService;
use crate::views::{Command, ListMsg};

/// Messages sent from background tasks to the main event loop.
#[derive(Debug)]
pub enum ApiMessage {
    /// Outcome for the categories view.
    Categories(ListMsg<Category>),
    /// Outcome for the products view.
    Products(ListMsg<Product>),
}

impl From<ListMsg<Category>> for ApiMessage {
    fn from(msg: ListMsg<Category>) -> Self {
        ApiMessage::Categories(msg)
    }
}

impl From<ListMsg<Product>> for ApiMessage {
    fn from(msg: ListMsg<Product>) -> Self {
        ApiMessage::Products(msg)
    }
}

/// Run one command against a service and turn the outcome into a message.
pub async fn execute<E: Entity>(
    service: &dyn EntityService<E>,
    command: Command<E>,
) -> ListMsg<E> {
    match command {
        Command::FetchAll => {
            ListMsg::Loaded(service.fetch_all().await.map_err(|e| e.to_string()))
        }
        Command::Create(record) => {
            ListMsg::Created(service.add(&record).await.map_err(|e| e.to_string()))
        }
        Command::Update(id, record) => {
            let result = service.edit(&id, &record).await.map_err(|e| e.to_string());
            ListMsg::Updated { id, result }
        }
        Command::Delete(ids) => ListMsg::Deleted(service.delete_many(ids).await),
    }
}

/// Spawns background tasks for backend commands.
#[derive(Clone)]
pub struct TaskSpawner {
    tx: mpsc::UnboundedSender<ApiMessage>,
}

impl TaskSpawner {
    /// Create a new TaskSpawner with the given channel sender.
    pub fn new(tx: mpsc::UnboundedSender<ApiMessage>) -> Self {
        Self { tx }
    }

    /// Spawn a task that runs `command` and reports back on the channel.
    pub fn spawn_command<E>(&self, service: &Arc<dyn EntityService<E>>, command: Command<E>)
    where
        E: Entity,
        ListMsg<E>: Into<ApiMessage>,
    {
        let tx = self.tx.clone();
        let service = Arc::clone(service);
        debug!(resource = %E::RESOURCE, "Spawning backend command");
        tokio::spawn(async move {
            let msg = execute(service.as_ref(), command).await;
            let _ = tx.send(msg.into());
        });
    }
}

/// Create a new task channel and spawner.
///
/// Returns a tuple of (receiver, spawner). The receiver should be polled
/// in the main event loop, and the spawner should be used to spawn tasks.
pub fn create_task_channel() -> (mpsc::UnboundedReceiver<ApiMessage>, TaskSpawner) {
    let (tx, rx) = mpsc::unbounded_channel();
    (rx, TaskSpawner::new(tx))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EntityId;
    use crate::api::{ApiError, DeleteReport};
    use async_trait::async_trait;

    struct FixedService;

    #[async_trait]
    impl EntityService<Category> for FixedService {
        async fn fetch_all(&self) -> crate::api::error::Result<Vec<Category>> {
            Ok(vec![Category::new(1, "Bags", "")])
        }

        async fn add(&self, record: &Category) -> crate::api::error::Result<Category> {
            let mut created = record.clone();
            created.id = EntityId::Number(7);
            Ok(created)
        }

        async fn edit(
            &self,
            _id: &EntityId,
            _record: &Category,
        ) -> crate::api::error::Result<Category> {
            Err(ApiError::ServerError("boom".to_string()))
        }

        async fn delete(&self, id: &EntityId) -> crate::api::error::Result<bool> {
            match id {
                EntityId::Number(1) => Ok(true),
                _ => Err(ApiError::NotFound(id.to_string())),
            }
        }
    }

    #[tokio::test]
    async fn test_execute_fetch_all() {
        match execute::<Category>(&FixedService, Command::FetchAll).await {
            ListMsg::Loaded(Ok(items)) => assert_eq!(items.len(), 1),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_create() {
        let cmd = Command::Create(Category::new(EntityId::default(), "Hats", ""));
        match execute(&FixedService, cmd).await {
            ListMsg::Created(Ok(record)) => assert_eq!(record.id, EntityId::Number(7)),
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_update_error_is_stringified() {
        let cmd = Command::Update(EntityId::Number(1), Category::new(1, "Bags", ""));
        match execute(&FixedService, cmd).await {
            ListMsg::Updated { id, result } => {
                assert_eq!(id, EntityId::Number(1));
                assert!(result.unwrap_err().contains("boom"));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_execute_delete_settles_every_id() {
        let cmd = Command::Delete(vec![EntityId::Number(1), EntityId::Number(2)]);
        match execute::<Category>(&FixedService, cmd).await {
            ListMsg::Deleted(DeleteReport { deleted, failed }) => {
                assert_eq!(deleted, vec![EntityId::Number(1)]);
                assert_eq!(failed.len(), 1);
                assert_eq!(failed[0].0, EntityId::Number(2));
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_spawned_command_reports_on_channel() {
        let (mut rx, spawner) = create_task_channel();
        let service: Arc<dyn EntityService<Category>> = Arc::new(FixedService);
        spawner.spawn_command(&service, Command::FetchAll);

        match rx.recv().await {
            Some(ApiMessage::Categories(ListMsg::Loaded(Ok(items)))) => {
                assert_eq!(items[0].name, "Bags")
            }
            other => panic!("unexpected message: {:?}", other),
        }
    }
}

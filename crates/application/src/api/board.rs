//! Board and task endpoints.

use std::sync::Arc;

use serde_json::Value;
use taskboard_domain::{ApiRequest, Endpoints};

use crate::error::ApplicationResult;
use crate::gateway::{ApiGateway, Reply, RetryPolicy};

/// Board and task calls. Task bodies are opaque JSON.
#[derive(Clone)]
pub struct BoardApi {
    gateway: Arc<ApiGateway>,
    endpoints: Endpoints,
}

impl BoardApi {
    /// Creates the wrapper.
    #[must_use]
    pub const fn new(gateway: Arc<ApiGateway>, endpoints: Endpoints) -> Self {
        Self { gateway, endpoints }
    }

    /// Board owned by `creator_id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn board(&self, creator_id: i64) -> ApplicationResult<Reply> {
        self.send(ApiRequest::get(self.endpoints.board(creator_id)))
            .await
    }

    /// Creates the board of user `id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn create_board(&self, id: i64) -> ApplicationResult<Reply> {
        self.send(ApiRequest::post(self.endpoints.create_board(id)))
            .await
    }

    /// Adds `task` to the board of `creator_id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn add_task(&self, creator_id: i64, task: &Value) -> ApplicationResult<Reply> {
        self.send(ApiRequest::post(self.endpoints.add_task(creator_id)).with_json(task)?)
            .await
    }

    /// Replaces task `task_id` with `task`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn edit_task(&self, task_id: i64, task: &Value) -> ApplicationResult<Reply> {
        self.send(ApiRequest::put(self.endpoints.update_task(task_id)).with_json(task)?)
            .await
    }

    /// Deletes task `task_id`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete_task(&self, task_id: i64) -> ApplicationResult<Reply> {
        self.send(ApiRequest::delete(self.endpoints.delete_task(task_id)))
            .await
    }

    /// Deletes every task in `task_ids`.
    ///
    /// # Errors
    ///
    /// Propagates gateway failures.
    pub async fn delete_tasks(&self, task_ids: &[i64]) -> ApplicationResult<Reply> {
        self.send(ApiRequest::delete(self.endpoints.delete_tasks()).with_json(task_ids)?)
            .await
    }

    async fn send(&self, request: ApiRequest) -> ApplicationResult<Reply> {
        Ok(self
            .gateway
            .request(&request, RetryPolicy::RefreshOnce)
            .await?)
    }
}

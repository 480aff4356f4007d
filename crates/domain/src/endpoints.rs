//! Backend endpoint catalogue.

use url::Url;

use crate::error::{DomainError, DomainResult};

/// Builds absolute URLs for every backend endpoint from one base URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    /// Creates the catalogue for `base` (e.g. `http://localhost:8080`).
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidUrl`] unless `base` is an http(s) URL.
    pub fn new(base: &str) -> DomainResult<Self> {
        let base = Url::parse(base).map_err(|e| DomainError::InvalidUrl(format!("{e}: {base}")))?;
        if !matches!(base.scheme(), "http" | "https") || base.cannot_be_a_base() {
            return Err(DomainError::InvalidUrl(base.to_string()));
        }
        Ok(Self { base })
    }

    /// The base URL.
    #[must_use]
    pub const fn base(&self) -> &Url {
        &self.base
    }

    /// `POST` sign-in.
    #[must_use]
    pub fn authenticate(&self) -> String {
        self.join(&["api", "v1", "auth", "authenticate"])
    }

    /// `POST` sign-up.
    #[must_use]
    pub fn register(&self) -> String {
        self.join(&["api", "v1", "auth", "register"])
    }

    /// `POST` access token refresh.
    #[must_use]
    pub fn refresh(&self) -> String {
        self.join(&["api", "v1", "auth", "refresh"])
    }

    /// `GET` a user by email.
    #[must_use]
    pub fn user_by_email(&self, email: &str) -> String {
        self.join(&["user", "email", email])
    }

    /// `GET` a user by id.
    #[must_use]
    pub fn user_by_id(&self, id: i64) -> String {
        self.join(&["user", &id.to_string()])
    }

    /// `GET` users whose name matches `content`.
    #[must_use]
    pub fn users_by_name(&self, content: &str) -> String {
        self.join(&["user", "all", content])
    }

    /// `PUT` a user update.
    #[must_use]
    pub fn update_user(&self, id: i64) -> String {
        self.join(&["user", "update", &id.to_string()])
    }

    /// `GET` the board owned by `creator_id`.
    #[must_use]
    pub fn board(&self, creator_id: i64) -> String {
        self.join(&["board", &creator_id.to_string()])
    }

    /// `POST` board creation for user `id`.
    #[must_use]
    pub fn create_board(&self, id: i64) -> String {
        self.join(&["board", "create", &id.to_string()])
    }

    /// `POST` a task onto the board of `creator_id`.
    #[must_use]
    pub fn add_task(&self, creator_id: i64) -> String {
        self.join(&["board", "addTask", &creator_id.to_string()])
    }

    /// `PUT` a task update.
    #[must_use]
    pub fn update_task(&self, task_id: i64) -> String {
        self.join(&["task", "update", &task_id.to_string()])
    }

    /// `DELETE` one task.
    #[must_use]
    pub fn delete_task(&self, task_id: i64) -> String {
        self.join(&["task", "delete", &task_id.to_string()])
    }

    /// `DELETE` several tasks (ids in the body).
    #[must_use]
    pub fn delete_tasks(&self) -> String {
        self.join(&["task", "deleteTasks"])
    }

    /// Joins `path` (already split on `/`) onto the base URL.
    #[must_use]
    pub fn join_path(&self, path: &str) -> String {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        self.join(&segments)
    }

    fn join(&self, segments: &[&str]) -> String {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url.to_string()
    }
}

// Task endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, ListFilter, Task, TaskForm, TaskStatus, TaskStatusPatch};

impl ApiClient {
    /// List tasks. Honours `property_id`, `date`, `room_id`, and `assigned_to_id`.
    ///
    /// `GET /tasks`
    pub async fn list_tasks(&self, filter: &ListFilter) -> Result<Vec<Task>, Error> {
        debug!(?filter, "listing tasks");
        self.get_list("tasks", &filter.to_query(true), "tasks").await
    }

    /// `GET /tasks/{id}`
    pub async fn get_task(&self, id: Id) -> Result<Task, Error> {
        debug!(id, "fetching task");
        self.get_one(&format!("tasks/{id}"), &[], "task").await
    }

    /// `POST /tasks`
    pub async fn create_task(&self, form: &TaskForm) -> Result<Task, Error> {
        debug!(title = %form.title, "creating task");
        self.send_json(Method::POST, "tasks", form, "task").await
    }

    /// `PATCH /tasks/{id}`
    pub async fn update_task(&self, id: Id, form: &TaskForm) -> Result<Task, Error> {
        debug!(id, "updating task");
        self.send_json(Method::PATCH, &format!("tasks/{id}"), form, "task")
            .await
    }

    /// Move a task to another status column.
    ///
    /// `PATCH /tasks/{id}` with `{"status": "..."}`
    pub async fn update_task_status(&self, id: Id, status: &TaskStatus) -> Result<Task, Error> {
        debug!(id, %status, "updating task status");
        let patch = TaskStatusPatch {
            status: status.clone(),
        };
        self.send_json(Method::PATCH, &format!("tasks/{id}"), &patch, "task")
            .await
    }

    /// `DELETE /tasks/{id}`
    pub async fn delete_task(&self, id: Id) -> Result<(), Error> {
        debug!(id, "deleting task");
        self.delete(&format!("tasks/{id}")).await
    }
}

// User endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, User, UserForm};

impl ApiClient {
    /// `GET /users`
    pub async fn list_users(&self) -> Result<Vec<User>, Error> {
        debug!("listing users");
        self.get_list("users", &[], "users").await
    }

    /// Users holding the manager role, for assignment pickers.
    ///
    /// `GET /users?role=manager`
    pub async fn list_managers(&self) -> Result<Vec<User>, Error> {
        debug!("listing managers");
        self.get_list("users", &[("role", "manager".to_owned())], "users")
            .await
    }

    /// `GET /users/{id}`
    pub async fn get_user(&self, id: Id) -> Result<User, Error> {
        debug!(id, "fetching user");
        self.get_one(&format!("users/{id}"), &[], "user").await
    }

    /// `POST /users`
    pub async fn create_user(&self, form: &UserForm) -> Result<User, Error> {
        debug!(username = %form.username, "creating user");
        self.send_json(Method::POST, "users", form, "user").await
    }

    /// `PUT /users/{id}`
    pub async fn update_user(&self, id: Id, form: &UserForm) -> Result<User, Error> {
        debug!(id, "updating user");
        self.send_json(Method::PUT, &format!("users/{id}"), form, "user")
            .await
    }

    /// `DELETE /users/{id}`
    pub async fn delete_user(&self, id: Id) -> Result<(), Error> {
        debug!(id, "deleting user");
        self.delete(&format!("users/{id}")).await
    }
}

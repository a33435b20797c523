// Property endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, Property, PropertyForm};

impl ApiClient {
    /// List all properties visible to the current user.
    ///
    /// `GET /properties`
    pub async fn list_properties(&self) -> Result<Vec<Property>, Error> {
        debug!("listing properties");
        self.get_list("properties", &[], "properties").await
    }

    /// `GET /properties/{id}`
    pub async fn get_property(&self, id: Id) -> Result<Property, Error> {
        debug!(id, "fetching property");
        self.get_one(&format!("properties/{id}"), &[], "property")
            .await
    }

    /// `POST /properties`
    pub async fn create_property(&self, form: &PropertyForm) -> Result<Property, Error> {
        debug!(name = %form.name, "creating property");
        self.send_json(Method::POST, "properties", form, "property")
            .await
    }

    /// `PUT /properties/{id}`
    pub async fn update_property(&self, id: Id, form: &PropertyForm) -> Result<Property, Error> {
        debug!(id, "updating property");
        self.send_json(Method::PUT, &format!("properties/{id}"), form, "property")
            .await
    }

    /// `DELETE /properties/{id}`
    pub async fn delete_property(&self, id: Id) -> Result<(), Error> {
        debug!(id, "deleting property");
        self.delete(&format!("properties/{id}")).await
    }
}

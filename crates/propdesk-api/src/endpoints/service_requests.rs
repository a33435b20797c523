// Service request endpoints
//
// Requests are never deleted through the API; they are closed by status.

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, ListFilter, ServiceRequest, ServiceRequestForm};

impl ApiClient {
    /// List service requests. Honours `property_id`, `date`, and `room_id`.
    ///
    /// `GET /service-requests`
    pub async fn list_service_requests(&self, filter: &ListFilter) -> Result<Vec<ServiceRequest>, Error> {
        debug!(?filter, "listing service requests");
        self.get_list("service-requests", &filter.to_query(false), "requests")
            .await
    }

    /// `GET /service-requests/{id}`
    pub async fn get_service_request(&self, id: Id) -> Result<ServiceRequest, Error> {
        debug!(id, "fetching service request");
        self.get_one(&format!("service-requests/{id}"), &[], "request")
            .await
    }

    /// `POST /service-requests`
    pub async fn create_service_request(&self, form: &ServiceRequestForm) -> Result<ServiceRequest, Error> {
        debug!(request_type = %form.request_type, "creating service request");
        self.send_json(Method::POST, "service-requests", form, "request")
            .await
    }

    /// `PATCH /service-requests/{id}`
    pub async fn update_service_request(
        &self,
        id: Id,
        form: &ServiceRequestForm,
    ) -> Result<ServiceRequest, Error> {
        debug!(id, "updating service request");
        self.send_json(
            Method::PATCH,
            &format!("service-requests/{id}"),
            form,
            "request",
        )
        .await
    }
}

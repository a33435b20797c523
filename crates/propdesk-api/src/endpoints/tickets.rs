// Ticket endpoints

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, ListFilter, Ticket, TicketForm};

impl ApiClient {
    /// List tickets. Honours `property_id`, `date`, and `room_id`.
    ///
    /// `GET /tickets`
    pub async fn list_tickets(&self, filter: &ListFilter) -> Result<Vec<Ticket>, Error> {
        debug!(?filter, "listing tickets");
        self.get_list("tickets", &filter.to_query(false), "tickets")
            .await
    }

    /// `GET /tickets/{id}`
    pub async fn get_ticket(&self, id: Id) -> Result<Ticket, Error> {
        debug!(id, "fetching ticket");
        self.get_one(&format!("tickets/{id}"), &[], "ticket").await
    }

    /// `POST /tickets`
    pub async fn create_ticket(&self, form: &TicketForm) -> Result<Ticket, Error> {
        debug!(title = %form.title, "creating ticket");
        self.send_json(Method::POST, "tickets", form, "ticket").await
    }

    /// `PATCH /tickets/{id}`
    pub async fn update_ticket(&self, id: Id, form: &TicketForm) -> Result<Ticket, Error> {
        debug!(id, "updating ticket");
        self.send_json(Method::PATCH, &format!("tickets/{id}"), form, "ticket")
            .await
    }

    /// `DELETE /tickets/{id}`
    pub async fn delete_ticket(&self, id: Id) -> Result<(), Error> {
        debug!(id, "deleting ticket");
        self.delete(&format!("tickets/{id}")).await
    }
}

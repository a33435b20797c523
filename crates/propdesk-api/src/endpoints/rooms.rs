// Room endpoints
//
// Rooms are nested under their property: `/properties/{pid}/rooms`.

use reqwest::Method;
use tracing::debug;

use crate::client::ApiClient;
use crate::error::Error;
use crate::models::{Id, Room, RoomForm};

impl ApiClient {
    /// `GET /properties/{pid}/rooms`
    pub async fn list_rooms(&self, property_id: Id) -> Result<Vec<Room>, Error> {
        debug!(property_id, "listing rooms");
        self.get_list(&format!("properties/{property_id}/rooms"), &[], "rooms")
            .await
    }

    /// `POST /properties/{pid}/rooms`
    pub async fn create_room(&self, property_id: Id, form: &RoomForm) -> Result<Room, Error> {
        debug!(property_id, name = %form.name, "creating room");
        self.send_json(
            Method::POST,
            &format!("properties/{property_id}/rooms"),
            form,
            "room",
        )
        .await
    }

    /// `PUT /properties/{pid}/rooms/{id}`
    pub async fn update_room(&self, property_id: Id, id: Id, form: &RoomForm) -> Result<Room, Error> {
        debug!(property_id, id, "updating room");
        self.send_json(
            Method::PUT,
            &format!("properties/{property_id}/rooms/{id}"),
            form,
            "room",
        )
        .await
    }

    /// `DELETE /properties/{pid}/rooms/{id}`
    pub async fn delete_room(&self, property_id: Id, id: Id) -> Result<(), Error> {
        debug!(property_id, id, "deleting room");
        self.delete(&format!("properties/{property_id}/rooms/{id}"))
            .await
    }
}

//! Room command handlers. Rooms always belong to a property.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::lookup;
use propdesk_core::models::{Room, RoomForm, RoomStatus};

use crate::cli::{GlobalOpts, RoomFields, RoomsArgs, RoomsCommand};
use crate::config::Resolved;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    room_type: String,
    #[tabled(rename = "Floor")]
    floor: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Capacity")]
    capacity: String,
    #[tabled(rename = "Last cleaned")]
    last_cleaned: String,
}

impl RoomRow {
    fn new(room: &Room, chain: Option<&str>, color: bool) -> Self {
        Self {
            id: room.id,
            name: room.name.clone(),
            room_type: room
                .room_type
                .as_deref()
                .map_or_else(|| "-".to_owned(), |code| lookup::room_type_label(chain, code).to_owned()),
            floor: output::or_dash(room.floor),
            status: room
                .status
                .as_ref()
                .map_or_else(|| "-".to_owned(), |s| output::paint_status(s.as_str(), color)),
            capacity: output::or_dash(room.capacity),
            last_cleaned: output::or_dash(room.last_cleaned.as_ref()),
        }
    }
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(current: Option<&Room>, fields: RoomFields) -> Result<RoomForm, CliError> {
    if let Some(path) = fields.from_file {
        return util::read_json_file(&path);
    }
    let mut form = current.map_or_else(RoomForm::default, |r| RoomForm {
        name: r.name.clone(),
        room_type: r.room_type.clone(),
        floor: r.floor,
        status: r.status.clone(),
        capacity: r.capacity,
        amenities: r.amenities.clone(),
        description: r.description.clone(),
    });
    if let Some(name) = fields.name {
        form.name = name;
    }
    if fields.room_type.is_some() {
        form.room_type = fields.room_type;
    }
    if fields.floor.is_some() {
        form.floor = fields.floor;
    }
    if let Some(status) = fields.status {
        form.status = Some(RoomStatus::parse(&status));
    }
    if fields.capacity.is_some() {
        form.capacity = fields.capacity;
    }
    if !fields.amenities.is_empty() {
        form.amenities = fields.amenities;
    }
    if fields.description.is_some() {
        form.description = fields.description;
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    desk: &Desk,
    args: RoomsArgs,
    resolved: &Resolved,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let property_id = util::require_property(resolved)?;

    match args.command {
        RoomsCommand::List => {
            let (property, rooms) = util::with_spinner(global, "Loading rooms...", async {
                tokio::try_join!(desk.property(property_id), desk.rooms(property_id))
            })
            .await
            .map_err(|e| CliError::not_found(e, "properties list"))?;

            let chain = lookup::detect_chain(&property.name).map(|c| c.code);
            let color = output::should_color(global.color);
            let out = output::render_list(
                global.output,
                &rooms,
                |r| RoomRow::new(r, chain, color),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Create(fields) => {
            let form = form_from(None, fields)?;
            let created = desk.create_room(property_id, &form).await?;
            output::notice(&format!("✓ Room created (#{})", created.id), global.quiet);
            Ok(())
        }

        RoomsCommand::Update { id, fields } => {
            let rooms = desk.rooms(property_id).await?;
            let current = rooms.iter().find(|r| r.id == id).ok_or_else(|| CliError::NotFound {
                message: format!("room #{id} not found in property #{property_id}"),
                list_command: "rooms list".into(),
            })?;
            let form = form_from(Some(current), fields)?;
            desk.update_room(property_id, id, &form).await?;
            output::notice("✓ Room updated", global.quiet);
            Ok(())
        }

        RoomsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete room #{id}?"), global.yes)? {
                return Ok(());
            }
            desk.delete_room(property_id, id).await?;
            output::notice("✓ Room deleted", global.quiet);
            Ok(())
        }
    }
}

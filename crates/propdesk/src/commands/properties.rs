//! Property command handlers.

use tabled::Tabled;

use propdesk_core::Desk;
use propdesk_core::models::{Property, PropertyForm, PropertyStatus};

use crate::cli::{GlobalOpts, PropertiesArgs, PropertiesCommand, PropertyFields};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct PropertyRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Type")]
    property_type: String,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Address")]
    address: String,
}

impl From<&Property> for PropertyRow {
    fn from(p: &Property) -> Self {
        Self {
            id: p.id,
            name: p.name.clone(),
            property_type: output::or_dash(p.property_type.as_ref()),
            status: output::or_dash(p.status.as_ref()),
            address: output::or_dash(p.address.as_ref()),
        }
    }
}

fn detail(p: &Property) -> String {
    let chain = propdesk_core::lookup::detect_chain(&p.name);
    output::detail_lines(&[
        ("ID", p.id.to_string()),
        ("Name", p.name.clone()),
        ("Type", output::or_dash(p.property_type.as_ref())),
        ("Status", output::or_dash(p.status.as_ref())),
        ("Address", output::or_dash(p.address.as_ref())),
        ("Chain", output::or_dash(chain.map(|c| format!("{} ({})", c.name, c.code)))),
    ])
}

// ── Form building ───────────────────────────────────────────────────

fn form_from(current: Option<&Property>, fields: PropertyFields) -> Result<PropertyForm, CliError> {
    if let Some(path) = fields.from_file {
        return util::read_json_file(&path);
    }
    let mut form = current.map_or_else(PropertyForm::default, |p| PropertyForm {
        name: p.name.clone(),
        address: p.address.clone(),
        property_type: p.property_type.clone(),
        status: p.status.clone(),
    });
    if let Some(name) = fields.name {
        form.name = name;
    }
    if fields.address.is_some() {
        form.address = fields.address;
    }
    if fields.property_type.is_some() {
        form.property_type = fields.property_type;
    }
    if let Some(status) = fields.status {
        form.status = Some(PropertyStatus::parse(&status));
    }
    Ok(form)
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(desk: &Desk, args: PropertiesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        PropertiesCommand::List => {
            let properties = util::with_spinner(global, "Loading properties...", desk.properties()).await?;
            let out = output::render_list(
                global.output,
                &properties,
                |p| PropertyRow::from(p),
                |p| p.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PropertiesCommand::Get { id } => {
            let property = desk
                .property(id)
                .await
                .map_err(|e| CliError::not_found(e, "properties list"))?;
            let out = output::render_single(global.output, &property, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PropertiesCommand::Create(fields) => {
            let form = form_from(None, fields)?;
            let created = desk.create_property(&form).await?;
            output::notice(&format!("✓ Property created (#{})", created.id), global.quiet);
            Ok(())
        }

        PropertiesCommand::Update { id, fields } => {
            let current = desk
                .property(id)
                .await
                .map_err(|e| CliError::not_found(e, "properties list"))?;
            let form = form_from(Some(&current), fields)?;
            desk.update_property(id, &form).await?;
            output::notice("✓ Property updated", global.quiet);
            Ok(())
        }

        PropertiesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete property #{id}?"), global.yes)? {
                return Ok(());
            }
            desk.delete_property(id).await?;
            output::notice("✓ Property deleted", global.quiet);
            Ok(())
        }
    }
}

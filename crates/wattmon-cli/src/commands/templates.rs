//! Template commands.

use anyhow::Result;

use wattmon_store::EnergyStore;
use wattmon_types::{RoomId, TemplateId};

use crate::cli::TemplatesCommand;
use crate::format;

pub fn cmd_templates(store: &mut EnergyStore, command: TemplatesCommand) -> Result<()> {
    match command {
        TemplatesCommand::List => {
            println!("{}", format::templates_table(store.templates()));
        }
        TemplatesCommand::Apply { template, room } => {
            let template_id = TemplateId::from(template.as_str());
            let room_id = RoomId::from(room.as_str());
            let Some(template) = store.template(&template_id) else {
                println!("Unknown template {template_id}");
                return Ok(());
            };
            if store.room(&room_id).is_none() {
                println!("Unknown room {room_id}");
                return Ok(());
            }
            let name = template.name.clone();
            let count = template.devices.len();
            store.apply_template(&template_id, &room_id);
            println!("Applied '{name}' ({count} devices) to room {room_id}");
        }
    }
    Ok(())
}

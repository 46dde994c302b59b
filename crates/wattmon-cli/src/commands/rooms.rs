//! Room management commands.

use anyhow::Result;

use wattmon_store::EnergyStore;
use wattmon_store::models::NewRoom;
use wattmon_types::RoomId;

use crate::cli::RoomsCommand;
use crate::format::{self, FormatOptions};

pub fn cmd_rooms(store: &mut EnergyStore, command: RoomsCommand, opts: &FormatOptions) -> Result<()> {
    match command {
        RoomsCommand::List => {
            println!("{}", format::rooms_table(store.rooms(), opts));
        }
        RoomsCommand::Add {
            name,
            building,
            disabled,
        } => {
            let id = store.add_room(NewRoom {
                name,
                building,
                enabled: !disabled,
            });
            println!("Added room {id}");
        }
        RoomsCommand::Rm { id } => {
            let id = RoomId::from(id);
            if store.room(&id).is_none() {
                println!("Unknown room {id}");
                return Ok(());
            }
            store.delete_room(&id);
            println!("Deleted room {id} and its devices");
        }
        RoomsCommand::Toggle { id } => {
            let id = RoomId::from(id);
            if store.room(&id).is_none() {
                println!("Unknown room {id}");
                return Ok(());
            }
            store.toggle_room_master(&id);
            if let Some(room) = store.room(&id) {
                println!(
                    "Room {} master switch is now {}",
                    room.name,
                    if room.enabled { "on" } else { "off" }
                );
            }
        }
    }
    Ok(())
}

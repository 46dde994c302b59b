//! Device control and management commands.

use anyhow::Result;

use wattmon_store::EnergyStore;
use wattmon_store::models::NewDevice;
use wattmon_types::{Device, DeviceId, DeviceKind, DeviceStatus, RoomId, default_draw};

use crate::cli::DevicesCommand;
use crate::format::{self, FormatOptions};

pub fn cmd_devices(
    store: &mut EnergyStore,
    command: DevicesCommand,
    opts: &FormatOptions,
) -> Result<()> {
    match command {
        DevicesCommand::List { room } => {
            let devices: Vec<Device> = match room {
                Some(room) => {
                    let room_id = RoomId::from(room);
                    store
                        .devices()
                        .iter()
                        .filter(|d| d.room_id == room_id)
                        .cloned()
                        .collect()
                }
                None => store.devices().to_vec(),
            };
            println!("{}", format::devices_table(&devices, opts));
        }
        DevicesCommand::On { id } => {
            set_status(store, &id, DeviceStatus::On);
        }
        DevicesCommand::Off { id } => {
            set_status(store, &id, DeviceStatus::Off);
        }
        DevicesCommand::SetPower { id, watts } => {
            let id = DeviceId::from(id);
            match store.device(&id) {
                Some(device) if watts > device.max_power => {
                    println!(
                        "Refusing to set {} W: exceeds the {} W capacity of {}",
                        watts, device.max_power, device.name
                    );
                }
                Some(_) => {
                    store.set_device_power(&id, watts);
                    println!("Set {id} to {watts} W");
                }
                None => println!("Unknown device {id}"),
            }
        }
        DevicesCommand::Add {
            name,
            room,
            kind,
            max_power,
            on,
        } => {
            let status = if on { DeviceStatus::On } else { DeviceStatus::Off };
            let added = store.add_device(NewDevice {
                name,
                kind: DeviceKind::from_label(&kind),
                room_id: RoomId::from(room.as_str()),
                status,
                power: if on { default_draw(max_power) } else { 0 },
                max_power,
            });
            match added {
                Some(id) => println!("Added device {id}"),
                None => println!("Unknown room {room}"),
            }
        }
        DevicesCommand::Rm { id } => {
            let id = DeviceId::from(id);
            if store.device(&id).is_none() {
                println!("Unknown device {id}");
                return Ok(());
            }
            store.delete_device(&id);
            println!("Deleted device {id}");
        }
    }
    Ok(())
}

fn set_status(store: &mut EnergyStore, id: &str, status: DeviceStatus) {
    let id = DeviceId::from(id);
    if store.device(&id).is_none() {
        println!("Unknown device {id}");
        return;
    }
    store.set_device_status(&id, status);
    if let Some(device) = store.device(&id) {
        println!("{} is now {} ({} W)", device.name, device.status, device.power);
    }
}

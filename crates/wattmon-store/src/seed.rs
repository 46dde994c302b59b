//! Built-in seed data.
//!
//! The initial campus dataset used on first run and by reset operations:
//! six rooms across four buildings, their device inventory, the built-in
//! device templates, and the starting chart series.

use time::{Duration, OffsetDateTime};

use wattmon_types::{
    Alert, AlertKind, ConsumptionPoint, Device, DeviceBlueprint, DeviceId, DeviceKind,
    DeviceStatus, Room, RoomId, RoomStatus, Template, TemplateId,
};

fn room(id: &str, name: &str, building: &str) -> Room {
    Room {
        id: RoomId::from(id),
        name: name.to_string(),
        building: building.to_string(),
        enabled: true,
        devices_on: 0,
        total_devices: 0,
        consumption: 0.0,
        status: RoomStatus::Normal,
    }
}

fn device(id: &str, name: &str, kind: DeviceKind, room_id: &str, power: u32, max_power: u32) -> Device {
    Device {
        id: DeviceId::from(id),
        name: name.to_string(),
        kind,
        room_id: RoomId::from(room_id),
        status: DeviceStatus::On,
        power,
        max_power,
    }
}

fn blueprint(name: &str, kind: DeviceKind, power: u32, max_power: u32) -> DeviceBlueprint {
    DeviceBlueprint {
        name: name.to_string(),
        kind,
        status: DeviceStatus::On,
        power,
        max_power,
    }
}

fn ac(temperature: i32) -> DeviceKind {
    DeviceKind::Ac { temperature }
}

/// Initial room inventory; derived fields are zeroed and expected to be
/// recomputed against the seeded devices.
pub(crate) fn rooms() -> Vec<Room> {
    vec![
        room("1", "Computer Lab 1", "Building A - Fl. 2"),
        room("2", "Lecture Room 201", "Building A - Fl. 2"),
        room("3", "Electronics Lab", "Building B - Fl. 1"),
        room("4", "Auditorium", "Building C"),
        room("5", "Library", "Building D - Fl. 1"),
        room("6", "Faculty Office", "Building A - Fl. 3"),
    ]
}

/// Initial device inventory, all switched on.
pub(crate) fn devices() -> Vec<Device> {
    vec![
        // Computer Lab 1
        device("1", "AC Unit 1", ac(24), "1", 1200, 1500),
        device("2", "AC Unit 2", ac(24), "1", 1150, 1500),
        device("3", "Projector", DeviceKind::Projector, "1", 280, 500),
        device("4", "Light Panel 1", DeviceKind::Light, "1", 120, 300),
        device("5", "Computer 1-10", DeviceKind::Computer, "1", 800, 1000),
        device("6", "Computer 11-20", DeviceKind::Computer, "1", 850, 1000),
        // Lecture Room 201
        device("7", "AC Unit 1", ac(26), "2", 1100, 1500),
        device("8", "AC Unit 2", ac(26), "2", 1050, 1500),
        device("9", "Projector", DeviceKind::Projector, "2", 300, 500),
        device("10", "Light Panel", DeviceKind::Light, "2", 150, 300),
        device("11", "Sound System", DeviceKind::Other, "2", 200, 400),
        // Electronics Lab
        device("12", "AC Unit 1", ac(28), "3", 1400, 1500),
        device("13", "AC Unit 2", ac(28), "3", 1450, 1500),
        device("14", "AC Unit 3", ac(28), "3", 1420, 1500),
        device("15", "Oscilloscope 1-5", DeviceKind::Other, "3", 500, 800),
        device("16", "Workstation 1-10", DeviceKind::Computer, "3", 900, 1200),
        device("17", "Light Panel 1-3", DeviceKind::Light, "3", 250, 400),
        // Auditorium
        device("18", "AC Unit 1-4", ac(23), "4", 4800, 6000),
        device("19", "Stage Lighting", DeviceKind::Light, "4", 1200, 2000),
        device("20", "Sound System", DeviceKind::Other, "4", 800, 1500),
        device("21", "Projector Array", DeviceKind::Projector, "4", 1500, 2000),
        device("22", "Control Room", DeviceKind::Computer, "4", 600, 1000),
        // Library
        device("23", "AC Unit 1-2", ac(25), "5", 2400, 3000),
        device("24", "Reading Lights 1-20", DeviceKind::Light, "5", 600, 1000),
        device("25", "Computer Catalog", DeviceKind::Computer, "5", 400, 600),
        // Faculty Office
        device("26", "AC Unit 1", ac(26), "6", 950, 1500),
        device("27", "Light Panel", DeviceKind::Light, "6", 180, 300),
        device("28", "Computers 1-10", DeviceKind::Computer, "6", 750, 1000),
    ]
}

/// Built-in device templates.
pub(crate) fn templates() -> Vec<Template> {
    vec![
        Template {
            id: TemplateId::from("t1"),
            name: "Standard Lab".to_string(),
            description: "Complete setup for computer lab".to_string(),
            devices: vec![
                blueprint("AC Unit 1", ac(24), 1200, 1500),
                blueprint("AC Unit 2", ac(24), 1200, 1500),
                blueprint("Projector", DeviceKind::Projector, 300, 500),
                blueprint("Light Panel", DeviceKind::Light, 200, 300),
                blueprint("Computers 1-10", DeviceKind::Computer, 800, 1000),
            ],
        },
        Template {
            id: TemplateId::from("t2"),
            name: "Smart Classroom".to_string(),
            description: "Modern classroom setup".to_string(),
            devices: vec![
                blueprint("AC Unit", ac(26), 1100, 1500),
                blueprint("Projector", DeviceKind::Projector, 300, 500),
                blueprint("Sound System", DeviceKind::Other, 200, 400),
                blueprint("Light Panel 1", DeviceKind::Light, 150, 300),
                blueprint("Light Panel 2", DeviceKind::Light, 150, 300),
            ],
        },
        Template {
            id: TemplateId::from("t3"),
            name: "Office Space".to_string(),
            description: "Basic office equipment".to_string(),
            devices: vec![
                blueprint("AC Unit", ac(26), 950, 1500),
                blueprint("Computers 1-5", DeviceKind::Computer, 750, 1000),
                blueprint("Light Panel", DeviceKind::Light, 180, 300),
            ],
        },
        Template {
            id: TemplateId::from("t4"),
            name: "Auditorium".to_string(),
            description: "Large venue equipment".to_string(),
            devices: vec![
                blueprint("AC Units 1-4", ac(23), 4800, 6000),
                blueprint("Stage Lighting", DeviceKind::Light, 1200, 2000),
                blueprint("Sound System", DeviceKind::Other, 800, 1500),
                blueprint("Projector Array", DeviceKind::Projector, 1500, 2000),
            ],
        },
    ]
}

/// Starting alert records, timestamped relative to `now`.
pub(crate) fn alerts(now: OffsetDateTime) -> Vec<Alert> {
    vec![
        Alert {
            id: 1,
            message: "High consumption detected".to_string(),
            kind: AlertKind::Warning,
            raised_at: now - Duration::hours(2),
            location: "Building A - Lab 301".to_string(),
            device_id: None,
        },
        Alert {
            id: 2,
            message: "AC temperature threshold exceeded".to_string(),
            kind: AlertKind::Error,
            raised_at: now - Duration::hours(4),
            location: "Building B - Faculty Room".to_string(),
            device_id: Some(DeviceId::from("5")),
        },
        Alert {
            id: 3,
            message: "Device maintenance required".to_string(),
            kind: AlertKind::Resolved,
            raised_at: now - Duration::days(1),
            location: "Building C - AC Unit 5".to_string(),
            device_id: None,
        },
    ]
}

fn point(time: &str, consumption: f64, efficiency: u32) -> ConsumptionPoint {
    ConsumptionPoint {
        time: time.to_string(),
        consumption,
        efficiency,
    }
}

/// Starting realtime series, one point every four hours.
pub(crate) fn realtime_points() -> Vec<ConsumptionPoint> {
    vec![
        point("00:00", 245.0, 92),
        point("04:00", 189.0, 95),
        point("08:00", 312.0, 88),
        point("12:00", 398.0, 85),
        point("16:00", 425.0, 82),
        point("20:00", 367.0, 87),
    ]
}

/// Static weekly series.
pub(crate) fn weekly_points() -> Vec<ConsumptionPoint> {
    vec![
        point("Mon", 2840.0, 88),
        point("Tue", 2920.0, 87),
        point("Wed", 2650.0, 90),
        point("Thu", 2890.0, 86),
        point("Fri", 3120.0, 84),
        point("Sat", 1850.0, 92),
        point("Sun", 1640.0, 94),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seed_devices_reference_seed_rooms() {
        let room_ids: Vec<RoomId> = rooms().iter().map(|r| r.id.clone()).collect();
        for device in devices() {
            assert!(
                room_ids.contains(&device.room_id),
                "device {} references unknown room {}",
                device.id,
                device.room_id
            );
        }
    }

    #[test]
    fn test_seed_devices_within_capacity() {
        for device in devices() {
            assert!(device.power <= device.max_power, "device {}", device.id);
        }
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let devices = devices();
        let mut ids: Vec<&DeviceId> = devices.iter().map(|d| &d.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), devices.len());
    }

    #[test]
    fn test_templates_present() {
        let templates = templates();
        assert_eq!(templates.len(), 4);
        assert!(templates.iter().all(|t| !t.devices.is_empty()));
    }
}

//! Derived statistics over rooms and devices.

use wattmon_types::{Alert, Device, Room, Stats};

/// Cost rate per kWh; savings are reported in millions.
const COST_RATE_PER_KWH: f64 = 1.5;

/// Kilograms of CO2 avoided per kWh.
const CARBON_KG_PER_KWH: f64 = 0.85;

/// Round to one decimal place.
pub(crate) fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Compute the aggregate statistics snapshot.
///
/// Disabled rooms are excluded from the consumption total but still
/// compete for the peak-load figure.
pub(crate) fn compute(devices: &[Device], rooms: &[Room], alerts: &[Alert]) -> Stats {
    let active_devices = devices.iter().filter(|d| d.status.is_on()).count() as u32;
    let total_devices = devices.len() as u32;

    let total_consumption: f64 = rooms
        .iter()
        .filter(|r| r.enabled)
        .map(|r| r.consumption)
        .sum();
    let peak_load = rooms
        .iter()
        .map(|r| r.consumption)
        .fold(0.0_f64, f64::max);

    let efficiency = if total_devices > 0 {
        ((f64::from(active_devices) / f64::from(total_devices)) * 100.0).round() as u32
    } else {
        0
    };

    Stats {
        total_consumption,
        peak_load,
        active_devices,
        total_devices,
        efficiency,
        cost_savings: round1(total_consumption * COST_RATE_PER_KWH / 1000.0),
        carbon_reduction: (total_consumption * CARBON_KG_PER_KWH).round() as i64,
        alerts: alerts.to_vec(),
    }
}

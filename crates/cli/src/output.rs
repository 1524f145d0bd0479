// Table rendering for command output

use chrono::{DateTime, Local};
use colored::{ColoredString, Colorize};
use medslot_core::domain::{Booking, Priority, Resource, ResourceId};
use std::collections::HashMap;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct DoctorRow {
    #[tabled(rename = "ID")]
    id: ResourceId,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Specialty")]
    category: String,
    #[tabled(rename = "Hours")]
    hours: String,
}

#[derive(Tabled)]
struct BookingRow {
    #[tabled(rename = "ID")]
    id: i64,
    #[tabled(rename = "Doctor")]
    doctor: String,
    #[tabled(rename = "Patient")]
    patient: String,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Slot")]
    slot: String,
    #[tabled(rename = "Priority")]
    priority: String,
    #[tabled(rename = "Requested")]
    requested: String,
}

pub fn doctors_table(resources: &[Resource]) -> String {
    let rows: Vec<DoctorRow> = resources
        .iter()
        .map(|r| DoctorRow {
            id: r.id,
            name: r.name.clone(),
            category: r.category.clone(),
            hours: r.working_hours(),
        })
        .collect();
    Table::new(rows).to_string()
}

/// Bookings in the order given (callers pass queue order)
pub fn bookings_table(bookings: &[Booking], resources: &[Resource]) -> String {
    let names: HashMap<ResourceId, &str> =
        resources.iter().map(|r| (r.id, r.name.as_str())).collect();

    let rows: Vec<BookingRow> = bookings
        .iter()
        .map(|b| BookingRow {
            id: b.id,
            doctor: names
                .get(&b.resource_id)
                .map(|name| name.to_string())
                .unwrap_or_else(|| format!("#{}", b.resource_id)),
            patient: b.requester_name.clone(),
            date: b.date.to_string(),
            slot: b.slot.to_string(),
            priority: b.priority.to_string(),
            requested: format_millis(b.requested_at),
        })
        .collect();
    Table::new(rows).to_string()
}

pub fn priority_label(priority: Priority) -> ColoredString {
    match priority {
        Priority::Emergency => priority.to_string().red().bold(),
        Priority::Vip => priority.to_string().yellow().bold(),
        Priority::Regular => priority.to_string().normal(),
    }
}

fn format_millis(millis: i64) -> String {
    DateTime::from_timestamp_millis(millis)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S%.3f").to_string())
        .unwrap_or_else(|| millis.to_string())
}

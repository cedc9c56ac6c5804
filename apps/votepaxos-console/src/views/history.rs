use votepaxos_core::HistoryEntry;

use super::table::{Align, Table};

pub fn render_history(entries: Option<&[HistoryEntry]>) -> String {
    let Some(entries) = entries else {
        return "The backend did not return a proposal history.".to_string();
    };
    if entries.is_empty() {
        return "No proposals have concluded yet.".to_string();
    }
    let mut table = Table::new([
        ("Timestamp", Align::Left),
        ("Status", Align::Center),
        ("Policy", Align::Left),
        ("Coordinates", Align::Center),
    ]);
    for entry in entries {
        table.push_row(vec![
            entry.timestamp.clone(),
            entry.status.to_string(),
            entry.description.trim().to_string(),
            entry.coordinates_label(),
        ]);
    }
    table.render()
}

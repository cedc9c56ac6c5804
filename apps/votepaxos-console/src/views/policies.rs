use votepaxos_core::{describe_coordinates, Policy};

use super::table::{Align, Table};

/// Numbered catalog listing. Numbers always refer to the full catalog so
/// they stay valid as `propose` selectors when a filter is applied.
pub fn render_policies(policies: &[Policy], filter: Option<&str>) -> String {
    let query = filter.map(str::to_lowercase).unwrap_or_default();
    let mut table = Table::new([
        ("#", Align::Right),
        ("Policy", Align::Left),
        ("Coordinates", Align::Center),
        ("Description", Align::Left),
    ]);
    for (index, policy) in policies.iter().enumerate() {
        if !policy.description.to_lowercase().contains(&query) {
            continue;
        }
        table.push_row(vec![
            (index + 1).to_string(),
            policy.description.trim().to_string(),
            policy.coordinates.to_string(),
            describe_coordinates(policy.coordinates),
        ]);
    }
    if table.is_empty() {
        return "No results!".to_string();
    }
    table.render()
}

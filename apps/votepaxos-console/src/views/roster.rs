use votepaxos_core::{describe_coordinates, format_number, sort_for_display, Identity, Voter};

use super::table::{Align, Table};

const PLACEHOLDER: &str = "—";

pub fn voter_type(voter: &Voter, current: &Identity) -> &'static str {
    if voter.simulation.is_some() {
        "Simulated"
    } else if voter.id == current.as_str() {
        "Human (You)"
    } else {
        "Human"
    }
}

/// Cells for one roster row. Voters without simulation data show
/// placeholders for the simulation columns.
pub fn roster_row(voter: &Voter, current: &Identity) -> Vec<String> {
    let kind = voter_type(voter, current).to_string();
    match &voter.simulation {
        Some(simulation) => vec![
            voter.id.clone(),
            kind,
            simulation.coordinates.to_string(),
            describe_coordinates(simulation.coordinates),
            format_number(simulation.tolerance),
        ],
        None => vec![
            voter.id.clone(),
            kind,
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
            PLACEHOLDER.to_string(),
        ],
    }
}

pub fn render_roster(voters: &[Voter], current: &Identity) -> String {
    if voters.is_empty() {
        return "No voters are running.".to_string();
    }
    let mut table = Table::new([
        ("Process (Voter) ID", Align::Left),
        ("Type", Align::Center),
        ("Coordinates", Align::Center),
        ("Description", Align::Left),
        ("Tolerance", Align::Center),
    ]);
    for voter in sort_for_display(voters, current.as_str()) {
        table.push_row(roster_row(&voter, current));
    }
    table.render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use votepaxos_core::Coordinates;

    fn me() -> Identity {
        Identity::new("A").unwrap()
    }

    #[test_timeout::timeout]
    fn humans_get_placeholders() {
        assert_eq!(
            roster_row(&Voter::live("A"), &me()),
            ["A", "Human (You)", "—", "—", "—"]
        );
        assert_eq!(roster_row(&Voter::live("B"), &me())[1], "Human");
    }

    #[test_timeout::timeout]
    fn simulated_rows_show_description() {
        let voter = Voter::simulated("sim-1", Coordinates::new(-8.0, 0.0), 2.5);
        let row = roster_row(&voter, &me());
        assert_eq!(row[1], "Simulated");
        assert_eq!(row[2], "-8, 0");
        assert_eq!(row[3], describe_coordinates(Coordinates::new(-8.0, 0.0)));
        assert_eq!(row[4], "2.5");
    }

    #[test_timeout::timeout]
    fn current_identity_renders_last() {
        let voters = vec![
            Voter::live("A"),
            Voter::simulated("B", Coordinates::new(1.0, 1.0), 1.0),
        ];
        let rendered = render_roster(&voters, &me());
        let lines: Vec<&str> = rendered.lines().collect();
        assert!(lines[0].starts_with("Process (Voter) ID"));
        assert!(lines[2].starts_with('B'));
        assert!(lines[3].starts_with('A'));
        assert_eq!(render_roster(&[], &me()), "No voters are running.");
    }
}

use votepaxos_client::ConnectionState;
use votepaxos_core::MembershipHealth;

pub const INITIALIZING: &str = "Initializing, please wait...";
pub const CONNECTING: &str = "Connecting, please wait...";

/// Membership warning callout, or `None` when the network is healthy.
pub fn render_health(simulated_count: usize) -> Option<String> {
    let health = MembershipHealth::classify(simulated_count);
    let title = health.title()?;
    let mut advisory = health.advisory(simulated_count).into_iter();
    let mut lines = vec![format!("!! {title}")];
    if let Some(lead) = advisory.next() {
        lines.push(lead);
    }
    // the insufficient callout carries a second lead sentence before the bullets
    if health == MembershipHealth::Insufficient {
        if let Some(lead) = advisory.next() {
            lines.push(lead);
        }
    }
    lines.extend(advisory.map(|point| format!("  - {point}")));
    Some(lines.join("\n"))
}

pub fn render_status(
    identity: &str,
    state: ConnectionState,
    connected_to_network: bool,
    simulated_count: usize,
) -> String {
    let membership = if connected_to_network {
        "joined the network"
    } else {
        "not yet joined the network"
    };
    format!(
        "{}\nIdentity: {identity} ({state}, {membership})",
        MembershipHealth::status_line(simulated_count)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test_timeout::timeout]
    fn healthy_network_has_no_banner() {
        assert!(render_health(5).is_none());
        assert!(render_health(12).is_none());
    }

    #[test_timeout::timeout]
    fn insufficient_banner_lists_requirements() {
        let banner = render_health(2).unwrap();
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "!! Insufficient Processes");
        assert_eq!(lines.len(), 6);
        assert!(lines[3].starts_with("  - At least 5 processes"));
        assert_eq!(lines[5], "  - There's 2 process(es) on the network.");
    }

    #[test_timeout::timeout]
    fn low_banner_has_two_points() {
        let banner = render_health(4).unwrap();
        let lines: Vec<&str> = banner.lines().collect();
        assert_eq!(lines[0], "!! Low Process Count");
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "  - There's 4 process(es) on the network.");
    }

    #[test_timeout::timeout]
    fn status_mentions_identity_and_state() {
        let status = render_status("human-1", ConnectionState::Ready, true, 3);
        assert!(status.contains("a potentially degraded session with 3 simulated voter(s)"));
        assert!(status.ends_with("Identity: human-1 (ready, joined the network)"));
    }
}

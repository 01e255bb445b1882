use anyhow::Result;
use std::str::FromStr;

use crate::db::Desk;
use crate::models::TicketStatus;

pub fn run(desk: &Desk, search: Option<&str>, status: Option<&str>) -> Result<()> {
    let status = match status {
        Some("all") | None => None,
        Some(s) => Some(TicketStatus::from_str(s)?),
    };

    let tickets = desk.list_tickets(search, status)?;

    if tickets.is_empty() {
        println!("No tickets found.");
        return Ok(());
    }

    for ticket in tickets {
        let status_display = format!("[{}]", ticket.status);
        let unread = format!("S:{} C:{}", ticket.unread_support, ticket.unread_client);
        println!(
            "{:<11} {:13} {:<16} {:<32} {:8} {:8} {}",
            ticket.id,
            status_display,
            truncate(&ticket.client_name, 16),
            truncate(&ticket.subject, 32),
            ticket.priority.to_string(),
            unread,
            ticket.updated_at.format("%Y-%m-%d %H:%M")
        );
    }

    Ok(())
}

fn truncate(s: &str, max_chars: usize) -> String {
    let char_count = s.chars().count();
    if char_count <= max_chars {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_chars - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, Ticket};
    use tempfile::tempdir;

    fn setup_test_desk() -> (Desk, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let desk = Desk::open(&dir.path().join("local.db")).unwrap();
        (desk, dir)
    }

    #[test]
    fn test_list_empty() {
        let (desk, _dir) = setup_test_desk();
        assert!(run(&desk, None, None).is_ok());
    }

    #[test]
    fn test_list_with_filters() {
        let (desk, _dir) = setup_test_desk();
        desk.save_ticket(&Ticket::opened_by_support("ANA", "Billing", "", Priority::Medium))
            .unwrap();

        assert!(run(&desk, Some("ana"), None).is_ok());
        assert!(run(&desk, None, Some("open")).is_ok());
        assert!(run(&desk, None, Some("all")).is_ok());
    }

    #[test]
    fn test_list_rejects_unknown_status() {
        let (desk, _dir) = setup_test_desk();
        assert!(run(&desk, None, Some("archived")).is_err());
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a very long subject line", 10), "a very ...");
    }
}

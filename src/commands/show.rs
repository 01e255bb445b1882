use anyhow::{bail, Result};

use crate::db::Desk;
use crate::models::Role;

/// Prints a ticket with its transcript and marks the viewer's side as read,
/// the way opening the conversation view does in either UI.
pub fn run(desk: &Desk, id: &str, viewer: &str) -> Result<()> {
    let viewer: Role = viewer.parse()?;

    let mut ticket = match desk.get_ticket(id)? {
        Some(t) => t,
        None => bail!("Ticket {} not found", id),
    };

    println!("Ticket {}: {}", ticket.id, ticket.subject);
    println!("Client: {}", ticket.client_name);
    println!("Status: {}", ticket.status);
    println!("Priority: {}", ticket.priority);
    println!("Created: {}", ticket.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Updated: {}", ticket.updated_at.format("%Y-%m-%d %H:%M:%S"));

    if !ticket.description.is_empty() {
        println!("\nDescription:");
        for line in ticket.description.lines() {
            println!("  {}", line);
        }
    }

    println!("\nConversation:");
    for message in &ticket.messages {
        println!(
            "  [{}] {:>7}: {}",
            message.timestamp.format("%Y-%m-%d %H:%M"),
            message.sender.to_string(),
            message.text
        );
    }

    // Viewing resets the viewer's own unread counter, never the counterpart's.
    if ticket.unread_for(viewer) > 0 {
        ticket.mark_read(viewer);
        desk.save_ticket(&ticket)?;
    }

    Ok(())
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
    fn test_show_marks_viewer_read() {
        let (desk, _dir) = setup_test_desk();
        let mut ticket = Ticket::opened_by_support("ANA", "Billing", "", Priority::Medium);
        ticket.append_message(Role::Client, "Hi").unwrap();
        desk.save_ticket(&ticket).unwrap();

        run(&desk, &ticket.id, "support").unwrap();

        let back = desk.get_ticket(&ticket.id).unwrap().unwrap();
        assert_eq!(back.unread_support, 0);
        assert_eq!(back.unread_client, 1);
    }

    #[test]
    fn test_show_when_already_read_does_not_rewrite() {
        let (desk, _dir) = setup_test_desk();
        let ticket = Ticket::opened_by_support("ANA", "Billing", "notes", Priority::Medium);
        desk.save_ticket(&ticket).unwrap();

        run(&desk, &ticket.id, "support").unwrap();

        let back = desk.get_ticket(&ticket.id).unwrap().unwrap();
        assert_eq!(back.unread_support, 0);
        assert_eq!(back.unread_client, 1);
        assert_eq!(back.updated_at, ticket.updated_at);
    }

    #[test]
    fn test_show_unknown_ticket() {
        let (desk, _dir) = setup_test_desk();
        let result = run(&desk, "TKT-MISSING", "support");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_show_rejects_bad_viewer() {
        let (desk, _dir) = setup_test_desk();
        let ticket = Ticket::opened_by_support("ANA", "Billing", "", Priority::Medium);
        desk.save_ticket(&ticket).unwrap();
        assert!(run(&desk, &ticket.id, "manager").is_err());
    }
}

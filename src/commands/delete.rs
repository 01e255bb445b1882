use anyhow::{bail, Result};
use std::io::{self, Write};

use crate::db::Desk;

pub fn run(desk: &Desk, id: &str, force: bool) -> Result<()> {
    // Check the ticket exists first so the prompt can show its subject
    let ticket = match desk.get_ticket(id)? {
        Some(t) => t,
        None => bail!("Ticket {} not found", id),
    };

    if !force {
        print!("Delete ticket {} \"{}\"? [y/N] ", id, ticket.subject);
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;

        if !input.trim().eq_ignore_ascii_case("y") {
            println!("Cancelled.");
            return Ok(());
        }
    }

    if desk.delete_ticket(id)? {
        println!("Deleted ticket {}", id);
    } else {
        bail!("Failed to delete ticket {}", id);
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
    fn test_delete_existing_ticket_force() {
        let (desk, _dir) = setup_test_desk();
        let ticket = Ticket::opened_by_support("ANA", "To delete", "", Priority::Medium);
        desk.save_ticket(&ticket).unwrap();

        run(&desk, &ticket.id, true).unwrap();
        assert!(desk.get_ticket(&ticket.id).unwrap().is_none());
    }

    #[test]
    fn test_delete_nonexistent_ticket() {
        let (desk, _dir) = setup_test_desk();
        let result = run(&desk, "TKT-MISSING", true);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("not found"));
    }

    #[test]
    fn test_delete_removes_owned_messages() {
        let (desk, _dir) = setup_test_desk();
        let ticket = Ticket::opened_by_client("ANA", "Chat", "hello", Priority::Medium);
        desk.save_ticket(&ticket).unwrap();

        run(&desk, &ticket.id, true).unwrap();
        // Messages live inside the ticket record, so nothing survives
        assert!(desk.list_tickets(None, None).unwrap().is_empty());
    }
}

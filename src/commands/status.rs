use anyhow::{bail, Result};

use crate::db::Desk;
use crate::models::{Ticket, TicketStatus};

fn load(desk: &Desk, id: &str) -> Result<Ticket> {
    match desk.get_ticket(id)? {
        Some(t) => Ok(t),
        None => bail!("Ticket {} not found", id),
    }
}

pub fn start(desk: &Desk, id: &str) -> Result<()> {
    let mut ticket = load(desk, id)?;
    ticket.set_status(TicketStatus::InProgress)?;
    desk.save_ticket(&ticket)?;
    println!("Ticket {} is now in progress", id);
    Ok(())
}

pub fn done(desk: &Desk, id: &str) -> Result<()> {
    let mut ticket = load(desk, id)?;
    ticket.set_status(TicketStatus::Done)?;
    desk.save_ticket(&ticket)?;
    println!("Ticket {} is done", id);
    Ok(())
}

pub fn cancel(desk: &Desk, id: &str) -> Result<()> {
    let mut ticket = load(desk, id)?;
    ticket.set_status(TicketStatus::Cancelled)?;
    desk.save_ticket(&ticket)?;
    println!("Cancelled ticket {}", id);
    Ok(())
}

pub fn reopen(desk: &Desk, id: &str) -> Result<()> {
    let mut ticket = load(desk, id)?;
    ticket.reopen()?;
    desk.save_ticket(&ticket)?;
    println!("Reopened ticket {}", id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use tempfile::tempdir;

    fn setup_test_desk() -> (Desk, tempfile::TempDir) {
        let dir = tempdir().unwrap();
        let desk = Desk::open(&dir.path().join("local.db")).unwrap();
        (desk, dir)
    }

    fn seed_ticket(desk: &Desk) -> Ticket {
        let ticket = Ticket::opened_by_support("ANA", "Billing", "", Priority::Medium);
        desk.save_ticket(&ticket).unwrap();
        ticket
    }

    #[test]
    fn test_full_lifecycle() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);

        start(&desk, &ticket.id).unwrap();
        assert_eq!(
            desk.get_ticket(&ticket.id).unwrap().unwrap().status,
            TicketStatus::InProgress
        );

        done(&desk, &ticket.id).unwrap();
        assert_eq!(
            desk.get_ticket(&ticket.id).unwrap().unwrap().status,
            TicketStatus::Done
        );
    }

    #[test]
    fn test_done_requires_in_progress() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);

        let result = done(&desk, &ticket.id);
        assert!(result.is_err());
        assert_eq!(
            desk.get_ticket(&ticket.id).unwrap().unwrap().status,
            TicketStatus::Open
        );
    }

    #[test]
    fn test_cancel_from_open() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);

        cancel(&desk, &ticket.id).unwrap();
        assert_eq!(
            desk.get_ticket(&ticket.id).unwrap().unwrap().status,
            TicketStatus::Cancelled
        );
    }

    #[test]
    fn test_cancel_done_ticket_fails() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);
        start(&desk, &ticket.id).unwrap();
        done(&desk, &ticket.id).unwrap();

        assert!(cancel(&desk, &ticket.id).is_err());
    }

    #[test]
    fn test_reopen_done_ticket() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);
        start(&desk, &ticket.id).unwrap();
        done(&desk, &ticket.id).unwrap();

        reopen(&desk, &ticket.id).unwrap();
        assert_eq!(
            desk.get_ticket(&ticket.id).unwrap().unwrap().status,
            TicketStatus::Open
        );
    }

    #[test]
    fn test_reopen_open_ticket_fails() {
        let (desk, _dir) = setup_test_desk();
        let ticket = seed_ticket(&desk);
        assert!(reopen(&desk, &ticket.id).is_err());
    }

    #[test]
    fn test_unknown_ticket() {
        let (desk, _dir) = setup_test_desk();
        assert!(start(&desk, "TKT-MISSING").is_err());
        assert!(done(&desk, "TKT-MISSING").is_err());
        assert!(cancel(&desk, "TKT-MISSING").is_err());
        assert!(reopen(&desk, "TKT-MISSING").is_err());
    }
}

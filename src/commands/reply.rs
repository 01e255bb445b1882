use anyhow::{bail, Result};

use crate::db::Desk;
use crate::models::Role;

pub fn run(desk: &Desk, id: &str, sender: &str, text: &str) -> Result<()> {
    let sender: Role = sender.parse()?;

    let mut ticket = match desk.get_ticket(id)? {
        Some(t) => t,
        None => bail!("Ticket {} not found", id),
    };

    ticket.append_message(sender, text)?;
    desk.save_ticket(&ticket)?;

    println!(
        "Message added to {} as {} (unread for {}: {})",
        ticket.id,
        sender,
        sender.other(),
        ticket.unread_for(sender.other())
    );
    Ok(())
}

use anyhow::{bail, Result};

use crate::db::Desk;
use crate::models::{Priority, Role, Ticket};

pub fn run(
    desk: &Desk,
    actor: &str,
    client: &str,
    subject: &str,
    description: &str,
    priority: &str,
) -> Result<()> {
    let actor: Role = actor.parse()?;
    let priority: Priority = priority.parse()?;

    if client.trim().is_empty() {
        bail!("Client name is required");
    }
    if subject.trim().is_empty() {
        bail!("Subject is required");
    }

    let ticket = match actor {
        // Support opens on behalf of a client and seeds a greeting.
        Role::Support => Ticket::opened_by_support(client, subject, description, priority),
        // A client-initiated ticket starts with the client's own description.
        Role::Client => {
            if description.trim().is_empty() {
                bail!("Description is required when a client opens a ticket");
            }
            Ticket::opened_by_client(client, subject, description, priority)
        }
    };

    desk.save_ticket(&ticket)?;
    println!("Opened ticket {} for {} ({})", ticket.id, ticket.client_name, ticket.priority);
    Ok(())
}

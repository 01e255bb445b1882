use anyhow::Result;
use std::path::Path;

use crate::models::{Rating, Ticket, TicketStatus};
use crate::store::LocalStore;

pub const TICKETS_TABLE: &str = "tickets";
pub const RATINGS_TABLE: &str = "ratings";

/// Data access over the ticket and rating tables. Every mutation reads the
/// whole table, edits it in memory and writes it back, exactly like the
/// original storage model. Last write wins.
pub struct Desk {
    store: LocalStore,
}

impl Desk {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Desk {
            store: LocalStore::open(path)?,
        })
    }

    pub fn store(&self) -> &LocalStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut LocalStore {
        &mut self.store
    }

    // Tickets

    pub fn get_ticket(&self, id: &str) -> Result<Option<Ticket>> {
        let tickets: Vec<Ticket> = self.store.read_table(TICKETS_TABLE)?;
        Ok(tickets.into_iter().find(|t| t.id == id))
    }

    /// Replaces the ticket with the same id, or appends it if new.
    pub fn save_ticket(&self, ticket: &Ticket) -> Result<()> {
        let mut tickets: Vec<Ticket> = self.store.read_table(TICKETS_TABLE)?;
        match tickets.iter_mut().find(|t| t.id == ticket.id) {
            Some(slot) => *slot = ticket.clone(),
            None => tickets.push(ticket.clone()),
        }
        self.store.write_table(TICKETS_TABLE, &tickets)
    }

    pub fn delete_ticket(&self, id: &str) -> Result<bool> {
        let mut tickets: Vec<Ticket> = self.store.read_table(TICKETS_TABLE)?;
        let before = tickets.len();
        tickets.retain(|t| t.id != id);
        if tickets.len() == before {
            return Ok(false);
        }
        self.store.write_table(TICKETS_TABLE, &tickets)?;
        Ok(true)
    }

    /// Case-insensitive substring match on client name or subject, optional
    /// status filter, most recently updated first.
    pub fn list_tickets(
        &self,
        search: Option<&str>,
        status: Option<TicketStatus>,
    ) -> Result<Vec<Ticket>> {
        let mut tickets: Vec<Ticket> = self.store.read_table(TICKETS_TABLE)?;

        if let Some(term) = search {
            let term = term.to_lowercase();
            tickets.retain(|t| {
                t.client_name.to_lowercase().contains(&term)
                    || t.subject.to_lowercase().contains(&term)
            });
        }
        if let Some(status) = status {
            tickets.retain(|t| t.status == status);
        }

        tickets.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(tickets)
    }

    // Ratings

    pub fn add_rating(&self, rating: &Rating) -> Result<()> {
        let mut ratings: Vec<Rating> = self.store.read_table(RATINGS_TABLE)?;
        ratings.push(rating.clone());
        self.store.write_table(RATINGS_TABLE, &ratings)
    }

    /// Newest first by date.
    pub fn list_ratings(&self) -> Result<Vec<Rating>> {
        let mut ratings: Vec<Rating> = self.store.read_table(RATINGS_TABLE)?;
        ratings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(ratings)
    }

    pub fn average_score(&self) -> Result<Option<f64>> {
        let ratings: Vec<Rating> = self.store.read_table(RATINGS_TABLE)?;
        if ratings.is_empty() {
            return Ok(None);
        }
        let total: u32 = ratings.iter().map(|r| u32::from(r.score)).sum();
        Ok(Some(f64::from(total) / ratings.len() as f64))
    }
}

use anyhow::{bail, Result};

use crate::db::Desk;
use crate::models::Rating;

pub fn add(
    desk: &Desk,
    score: u8,
    client: &str,
    ticket_id: Option<&str>,
    comment: Option<&str>,
) -> Result<()> {
    if client.trim().is_empty() {
        bail!("Client name is required");
    }
    if let Some(id) = ticket_id {
        if desk.get_ticket(id)?.is_none() {
            bail!("Ticket {} not found", id);
        }
    }

    let rating = Rating::new(client, score, ticket_id, comment)?;
    desk.add_rating(&rating)?;
    println!("Recorded rating {} ({}/5, {})", rating.id, rating.score, rating.band());
    Ok(())
}

pub fn list(desk: &Desk) -> Result<()> {
    let ratings = desk.list_ratings()?;

    if ratings.is_empty() {
        println!("No ratings yet.");
        return Ok(());
    }

    if let Some(avg) = desk.average_score()? {
        println!("{} rating(s), average {:.1}/5\n", ratings.len(), avg);
    }

    for rating in ratings {
        let comment = rating.comment.as_deref().unwrap_or("-");
        println!(
            "{:<11} {}/5 {:>9} {:<16} {} {}",
            rating.id,
            rating.score,
            rating.band().to_string(),
            rating.client_name,
            rating.date.format("%Y-%m-%d"),
            comment
        );
    }

    Ok(())
}

use anyhow::{bail, Error, Result};
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Greeting seeded when support opens a ticket on behalf of a client.
pub const SUPPORT_GREETING: &str = "Hello! This conversation is now open. How can we help?";

/// Which side of a ticket conversation a participant is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Client,
    Support,
}

impl Role {
    pub fn other(self) -> Role {
        match self {
            Role::Client => Role::Support,
            Role::Support => Role::Client,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Client => write!(f, "client"),
            Role::Support => write!(f, "support"),
        }
    }
}

impl FromStr for Role {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "client" => Ok(Role::Client),
            "support" => Ok(Role::Support),
            other => bail!("Invalid role '{}'. Must be one of: client, support", other),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Open,
    InProgress,
    Done,
    Cancelled,
}

impl TicketStatus {
    /// Operator-driven transition graph: Open -> InProgress -> Done, with
    /// Cancelled reachable from Open or InProgress. Done and Cancelled only
    /// leave via an explicit reopen.
    pub fn can_transition_to(self, next: TicketStatus) -> bool {
        use TicketStatus::*;
        matches!(
            (self, next),
            (Open, InProgress) | (Open, Cancelled) | (InProgress, Done) | (InProgress, Cancelled)
        )
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TicketStatus::Open => write!(f, "open"),
            TicketStatus::InProgress => write!(f, "in_progress"),
            TicketStatus::Done => write!(f, "done"),
            TicketStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl FromStr for TicketStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "open" => Ok(TicketStatus::Open),
            "in_progress" | "in-progress" => Ok(TicketStatus::InProgress),
            "done" => Ok(TicketStatus::Done),
            "cancelled" => Ok(TicketStatus::Cancelled),
            other => bail!(
                "Invalid status '{}'. Must be one of: open, in_progress, done, cancelled",
                other
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Low => write!(f, "low"),
            Priority::Medium => write!(f, "medium"),
            Priority::High => write!(f, "high"),
            Priority::Critical => write!(f, "critical"),
        }
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            "critical" => Ok(Priority::Critical),
            other => bail!(
                "Invalid priority '{}'. Must be one of: low, medium, high, critical",
                other
            ),
        }
    }
}

/// A single chat message. Immutable once created; owned by its ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    pub id: String,
    pub sender: Role,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

/// A client-support conversation thread with status and per-role unread tracking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    pub id: String,
    pub client_name: String,
    pub subject: String,
    pub description: String,
    pub priority: Priority,
    pub status: TicketStatus,
    pub messages: Vec<Message>,
    pub unread_support: u32,
    pub unread_client: u32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Support opens a ticket on behalf of a client. Seeds a greeting authored
    /// by support, which the client has not read yet.
    pub fn opened_by_support(
        client_name: &str,
        subject: &str,
        description: &str,
        priority: Priority,
    ) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: new_ticket_id(),
            client_name: client_name.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            priority,
            status: TicketStatus::Open,
            messages: vec![Message {
                id: new_message_id(),
                sender: Role::Support,
                text: SUPPORT_GREETING.to_string(),
                timestamp: now,
            }],
            unread_support: 0,
            unread_client: 1,
            created_at: now,
            updated_at: now,
        }
    }

    /// A client opens a ticket themselves. The first message carries the
    /// ticket description, unread on the support side.
    pub fn opened_by_client(
        client_name: &str,
        subject: &str,
        description: &str,
        priority: Priority,
    ) -> Ticket {
        let now = Utc::now();
        Ticket {
            id: new_ticket_id(),
            client_name: client_name.to_string(),
            subject: subject.to_string(),
            description: description.to_string(),
            priority,
            status: TicketStatus::Open,
            messages: vec![Message {
                id: new_message_id(),
                sender: Role::Client,
                text: description.to_string(),
                timestamp: now,
            }],
            unread_support: 1,
            unread_client: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Appends a message and increments the unread counter of the opposite
    /// role. No editing or deletion exists; the log is append-only.
    pub fn append_message(&mut self, sender: Role, text: &str) -> Result<()> {
        if text.trim().is_empty() {
            bail!("Message text cannot be empty");
        }
        if sender == Role::Client && self.status == TicketStatus::Done {
            bail!(
                "Ticket {} is done; the client side is closed for replies",
                self.id
            );
        }

        let now = Utc::now();
        self.messages.push(Message {
            id: new_message_id(),
            sender,
            text: text.to_string(),
            timestamp: now,
        });
        match sender.other() {
            Role::Client => self.unread_client += 1,
            Role::Support => self.unread_support += 1,
        }
        self.updated_at = now;
        Ok(())
    }

    /// Zeroes the viewer's own unread counter. Idempotent; never touches the
    /// counterpart's counter or the updated timestamp.
    pub fn mark_read(&mut self, viewer: Role) {
        match viewer {
            Role::Client => self.unread_client = 0,
            Role::Support => self.unread_support = 0,
        }
    }

    pub fn unread_for(&self, viewer: Role) -> u32 {
        match viewer {
            Role::Client => self.unread_client,
            Role::Support => self.unread_support,
        }
    }

    /// Operator-driven status change, validated against the transition graph.
    pub fn set_status(&mut self, next: TicketStatus) -> Result<()> {
        if self.status == next {
            bail!("Ticket {} is already {}", self.id, next);
        }
        if !self.status.can_transition_to(next) {
            bail!(
                "Invalid transition for ticket {}: {} -> {}",
                self.id,
                self.status,
                next
            );
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Explicit operator action returning a finished or cancelled ticket to
    /// open. This is the only path out of done.
    pub fn reopen(&mut self) -> Result<()> {
        match self.status {
            TicketStatus::Done | TicketStatus::Cancelled => {
                self.status = TicketStatus::Open;
                self.updated_at = Utc::now();
                Ok(())
            }
            _ => bail!("Ticket {} is {}, nothing to reopen", self.id, self.status),
        }
    }
}

/// NPS-style classification band derived from a 1-5 satisfaction score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    Promoter,
    Neutral,
    Detractor,
}

impl fmt::Display for Band {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Band::Promoter => write!(f, "promoter"),
            Band::Neutral => write!(f, "neutral"),
            Band::Detractor => write!(f, "detractor"),
        }
    }
}

/// A satisfaction rating left once per closed interaction. Immutable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rating {
    pub id: String,
    pub ticket_id: Option<String>,
    pub client_name: String,
    pub score: u8,
    pub comment: Option<String>,
    pub date: DateTime<Utc>,
}

impl Rating {
    pub fn new(
        client_name: &str,
        score: u8,
        ticket_id: Option<&str>,
        comment: Option<&str>,
    ) -> Result<Rating> {
        if !(1..=5).contains(&score) {
            bail!("Invalid score {}. Must be between 1 and 5", score);
        }
        Ok(Rating {
            id: new_rating_id(),
            ticket_id: ticket_id.map(|s| s.to_string()),
            client_name: client_name.to_string(),
            score,
            comment: comment.map(|s| s.to_string()),
            date: Utc::now(),
        })
    }

    pub fn band(&self) -> Band {
        match self.score {
            s if s >= 4 => Band::Promoter,
            3 => Band::Neutral,
            _ => Band::Detractor,
        }
    }
}

fn random_suffix(len: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

pub fn new_ticket_id() -> String {
    format!("TKT-{}", random_suffix(6))
}

pub fn new_message_id() -> String {
    format!("MSG-{}", random_suffix(4))
}

pub fn new_rating_id() -> String {
    format!("RAT-{}", random_suffix(6))
}

use serde::Serialize;
use shared::Role;
use sqlx::FromRow;

fn present(name: &Option<String>) -> Option<&str> {
    name.as_deref().filter(|n| !n.is_empty())
}

/// An invite with the names it can be displayed under.
#[derive(Debug, Clone, FromRow)]
pub struct InviteProfile {
    pub id: i64,
    pub access_name: Option<String>,
    pub invite_group: String,
    pub max_guests: Option<i64>,
    pub rsvp_id: Option<i64>,
    pub guest_id: Option<i64>,
    pub rsvp_name: Option<String>,
    pub guest_name: Option<String>,
}

impl InviteProfile {
    pub fn role(&self) -> Role {
        Role::normalize(&self.invite_group)
    }

    /// Invite name, then the household's place card, then the +1's place card.
    pub fn display_name(&self) -> Option<&str> {
        present(&self.access_name)
            .or_else(|| present(&self.rsvp_name))
            .or_else(|| present(&self.guest_name))
    }

    /// Unset capacity means no +1s.
    pub fn capacity(&self) -> usize {
        self.max_guests.unwrap_or(0).max(0) as usize
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct InviteCode {
    pub id: i64,
    pub access_code_hash: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewInvite {
    pub access_name: String,
    pub access_code_hash: String,
    pub invite_group: Role,
    pub max_guests: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct InviteUpdate {
    pub access_name: Option<String>,
    pub invite_group: Role,
    pub max_guests: Option<i64>,
    /// `None` keeps the current code.
    pub access_code_hash: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Rsvp {
    pub id: i64,
    pub place_card_name: Option<String>,
    pub email: Option<String>,
    pub dietary: Option<String>,
    pub ceremony: Option<bool>,
    pub reception: Option<bool>,
    pub transport: Option<bool>,
    pub printed_invite: Option<bool>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, FromRow)]
pub struct Guest {
    pub id: i64,
    pub rsvp_id: i64,
    pub place_card_name: Option<String>,
    pub dietary: Option<String>,
    pub created_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct Household {
    pub rsvp: Rsvp,
    pub guests: Vec<Guest>,
}

/// Primary RSVP joined with the invite that owns it.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpResponse {
    pub id: i64,
    pub place_card_name: Option<String>,
    pub dietary: Option<String>,
    pub ceremony: Option<bool>,
    pub reception: Option<bool>,
    pub transport: Option<bool>,
    pub printed_invite: Option<bool>,
    pub notes: Option<String>,
    pub created_at: Option<String>,
    pub invite_id: Option<i64>,
    pub access_name: Option<String>,
    pub invite_group: Option<String>,
    pub max_guests: Option<i64>,
}

/// A +1 joined with its own invite (if any) and the household it belongs to.
#[derive(Debug, Clone, FromRow)]
pub struct GuestResponse {
    pub id: i64,
    pub rsvp_id: i64,
    pub place_card_name: Option<String>,
    pub dietary: Option<String>,
    pub created_at: Option<String>,
    pub invite_id: Option<i64>,
    pub access_name: Option<String>,
    pub invite_group: Option<String>,
    pub max_guests: Option<i64>,
    pub added_by: Option<String>,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InviteListing {
    pub id: i64,
    pub access_name: Option<String>,
    pub invite_group: String,
    pub max_guests: Option<i64>,
    pub rsvp_id: Option<i64>,
    pub rsvp_name: Option<String>,
    pub guest_id: Option<i64>,
    pub guest_name: Option<String>,
    pub guest_rsvp_id: Option<i64>,
    pub has_code: bool,
    pub created_at: Option<String>,
}

/// Outcome of giving a +1 their own invite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuestInviteOutcome {
    Created(i64),
    GuestMissing,
    AlreadyInvited,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AttendanceCounts {
    pub total: i64,
    pub ceremony_yes: i64,
    pub reception_yes: i64,
}

use anyhow::Result;
use shared::{HouseholdUpdate, LinkedGuestUpdate};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    SqlitePool,
};
use std::path::Path;

mod models;

pub use models::*;

const INVITE_PROFILE_SELECT: &str = r#"
    SELECT i.id, i.access_name, i.invite_group, i.max_guests, i.rsvp_id, i.guest_id,
           r.place_card_name AS rsvp_name, g.place_card_name AS guest_name
    FROM invites i
    LEFT JOIN rsvps r ON r.id = i.rsvp_id
    LEFT JOIN guests g ON g.id = i.guest_id
"#;

#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn new(path: &str) -> Result<Self> {
        // Ensure the directory exists
        if let Some(parent) = Path::new(path).parent() {
            std::fs::create_dir_all(parent)?;
        }

        // Cascading deletes depend on foreign keys being enforced on every connection.
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        Ok(Self { pool })
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS rsvps (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                place_card_name TEXT,
                email TEXT,
                dietary TEXT,
                ceremony BOOLEAN,
                reception BOOLEAN,
                transport BOOLEAN,
                printed_invite BOOLEAN,
                notes TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS guests (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                rsvp_id INTEGER NOT NULL REFERENCES rsvps(id) ON DELETE CASCADE,
                place_card_name TEXT,
                dietary TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS invites (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                access_name TEXT,
                invite_group TEXT NOT NULL DEFAULT 'guest',
                max_guests INTEGER,
                access_code_hash TEXT,
                rsvp_id INTEGER UNIQUE REFERENCES rsvps(id) ON DELETE CASCADE,
                guest_id INTEGER UNIQUE REFERENCES guests(id) ON DELETE CASCADE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query("CREATE INDEX IF NOT EXISTS idx_guests_rsvp_id ON guests(rsvp_id)")
            .execute(&self.pool)
            .await?;

        tracing::info!("Database migrations completed");
        Ok(())
    }

    // Invite operations
    pub async fn find_invite(&self, id: i64) -> Result<Option<InviteProfile>> {
        let invite = sqlx::query_as::<_, InviteProfile>(&format!("{} WHERE i.id = ?", INVITE_PROFILE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(invite)
    }

    pub async fn list_invite_codes(&self) -> Result<Vec<InviteCode>> {
        let codes = sqlx::query_as::<_, InviteCode>(
            "SELECT id, access_code_hash FROM invites WHERE access_code_hash IS NOT NULL ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(codes)
    }

    /// Creates an empty household RSVP and the primary invite that owns it.
    pub async fn create_primary_invite(&self, invite: &NewInvite) -> Result<i64> {
        let mut tx = self.pool.begin().await?;

        let rsvp_id = sqlx::query("INSERT INTO rsvps DEFAULT VALUES")
            .execute(&mut *tx)
            .await?
            .last_insert_rowid();

        let invite_id = sqlx::query(
            "INSERT INTO invites (access_name, invite_group, max_guests, access_code_hash, rsvp_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&invite.access_name)
        .bind(invite.invite_group.as_str())
        .bind(invite.max_guests)
        .bind(&invite.access_code_hash)
        .bind(rsvp_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        Ok(invite_id)
    }

    /// Gives an existing +1 their own invite. A guest holds at most one.
    pub async fn create_guest_invite(&self, guest_id: i64, invite: &NewInvite) -> Result<GuestInviteOutcome> {
        let mut tx = self.pool.begin().await?;

        let guest: Option<i64> = sqlx::query_scalar("SELECT id FROM guests WHERE id = ?")
            .bind(guest_id)
            .fetch_optional(&mut *tx)
            .await?;
        if guest.is_none() {
            return Ok(GuestInviteOutcome::GuestMissing);
        }

        let existing: Option<i64> = sqlx::query_scalar("SELECT id FROM invites WHERE guest_id = ?")
            .bind(guest_id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_some() {
            return Ok(GuestInviteOutcome::AlreadyInvited);
        }

        let invite_id = sqlx::query(
            "INSERT INTO invites (access_name, invite_group, max_guests, access_code_hash, guest_id) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&invite.access_name)
        .bind(invite.invite_group.as_str())
        .bind(invite.max_guests)
        .bind(&invite.access_code_hash)
        .bind(guest_id)
        .execute(&mut *tx)
        .await?
        .last_insert_rowid();

        tx.commit().await?;
        Ok(GuestInviteOutcome::Created(invite_id))
    }

    pub async fn update_invite(&self, id: i64, update: &InviteUpdate) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE invites SET
                access_name = ?,
                invite_group = ?,
                max_guests = ?,
                access_code_hash = COALESCE(?, access_code_hash)
            WHERE id = ?
            "#,
        )
        .bind(&update.access_name)
        .bind(update.invite_group.as_str())
        .bind(update.max_guests)
        .bind(&update.access_code_hash)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn list_invites(&self) -> Result<Vec<InviteListing>> {
        let invites = sqlx::query_as::<_, InviteListing>(
            r#"
            SELECT i.id, i.access_name, i.invite_group, i.max_guests,
                   i.rsvp_id, r.place_card_name AS rsvp_name,
                   i.guest_id, g.place_card_name AS guest_name, g.rsvp_id AS guest_rsvp_id,
                   (i.access_code_hash IS NOT NULL) AS has_code,
                   i.created_at
            FROM invites i
            LEFT JOIN rsvps r ON r.id = i.rsvp_id
            LEFT JOIN guests g ON g.id = i.guest_id
            ORDER BY i.created_at DESC, i.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(invites)
    }

    // RSVP operations
    pub async fn load_household(&self, rsvp_id: i64) -> Result<Option<Household>> {
        let rsvp = sqlx::query_as::<_, Rsvp>(
            r#"
            SELECT id, place_card_name, email, dietary, ceremony, reception, transport,
                   printed_invite, notes, created_at
            FROM rsvps WHERE id = ?
            "#,
        )
        .bind(rsvp_id)
        .fetch_optional(&self.pool)
        .await?;

        let Some(rsvp) = rsvp else {
            return Ok(None);
        };

        let guests = sqlx::query_as::<_, Guest>(
            "SELECT id, rsvp_id, place_card_name, dietary, created_at FROM guests WHERE rsvp_id = ? ORDER BY created_at ASC, id ASC",
        )
        .bind(rsvp_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(Household { rsvp, guests }))
    }

    pub async fn get_guest(&self, id: i64) -> Result<Option<Guest>> {
        let guest = sqlx::query_as::<_, Guest>(
            "SELECT id, rsvp_id, place_card_name, dietary, created_at FROM guests WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(guest)
    }

    /// Writes the household answers and replaces its whole guest list in one
    /// transaction. Returns `false` (and writes nothing) if the RSVP is gone.
    pub async fn save_household(&self, rsvp_id: i64, update: &HouseholdUpdate) -> Result<bool> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            UPDATE rsvps SET
                place_card_name = ?,
                email = ?,
                dietary = ?,
                ceremony = ?,
                reception = ?,
                transport = ?,
                printed_invite = ?,
                notes = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.place_card_name)
        .bind(&update.email)
        .bind(&update.dietary)
        .bind(update.ceremony)
        .bind(update.reception)
        .bind(update.transport)
        .bind(update.printed_invite)
        .bind(&update.notes)
        .bind(rsvp_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        sqlx::query("DELETE FROM guests WHERE rsvp_id = ?")
            .bind(rsvp_id)
            .execute(&mut *tx)
            .await?;

        for guest in &update.guests {
            sqlx::query("INSERT INTO guests (rsvp_id, place_card_name, dietary) VALUES (?, ?, ?)")
                .bind(rsvp_id)
                .bind(&guest.place_card_name)
                .bind(&guest.dietary)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(true)
    }

    pub async fn update_linked_guest(&self, guest_id: i64, update: &LinkedGuestUpdate) -> Result<bool> {
        let result = sqlx::query("UPDATE guests SET place_card_name = ?, dietary = ? WHERE id = ?")
            .bind(&update.place_card_name)
            .bind(&update.dietary)
            .bind(guest_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Removes a household; its invite, guests and their invites cascade.
    pub async fn delete_rsvp(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM rsvps WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn delete_guest(&self, id: i64) -> Result<bool> {
        let result = sqlx::query("DELETE FROM guests WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // Dashboard queries
    pub async fn attendance_counts(&self) -> Result<AttendanceCounts> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rsvps")
            .fetch_one(&self.pool)
            .await?;
        let ceremony_yes = self.count_attending("ceremony").await?;
        let reception_yes = self.count_attending("reception").await?;
        Ok(AttendanceCounts { total, ceremony_yes, reception_yes })
    }

    /// Households answering yes plus the +1s listed under them.
    async fn count_attending(&self, column: &'static str) -> Result<i64> {
        let households: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM rsvps WHERE {} = 1", column))
            .fetch_one(&self.pool)
            .await?;
        let guests: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM guests g JOIN rsvps r ON r.id = g.rsvp_id WHERE r.{} = 1",
            column
        ))
        .fetch_one(&self.pool)
        .await?;
        Ok(households + guests)
    }

    pub async fn list_rsvp_responses(&self) -> Result<Vec<RsvpResponse>> {
        let rows = sqlx::query_as::<_, RsvpResponse>(
            r#"
            SELECT r.id, r.place_card_name, r.dietary, r.ceremony, r.reception, r.transport,
                   r.printed_invite, r.notes, r.created_at,
                   i.id AS invite_id, i.access_name, i.invite_group, i.max_guests
            FROM rsvps r
            LEFT JOIN invites i ON i.rsvp_id = r.id
            ORDER BY r.created_at DESC, r.id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn list_guest_responses(&self) -> Result<Vec<GuestResponse>> {
        let rows = sqlx::query_as::<_, GuestResponse>(
            r#"
            SELECT g.id, g.rsvp_id, g.place_card_name, g.dietary, g.created_at,
                   gi.id AS invite_id, gi.access_name, gi.invite_group, gi.max_guests,
                   pi.access_name AS added_by
            FROM guests g
            LEFT JOIN invites gi ON gi.guest_id = g.id
            LEFT JOIN invites pi ON pi.rsvp_id = g.rsvp_id
            ORDER BY g.created_at ASC, g.id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}

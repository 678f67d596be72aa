//! Password-gated admin area: dashboard, invite management and deletes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use axum_extra::extract::{cookie::SignedCookieJar, Form};
use serde::{Deserialize, Serialize};
use serde_json::json;
use shared::{flag_duplicates, DupeFlag, NamedRow, Role};
use std::collections::HashMap;

use crate::{
    credentials, csrf,
    db::{AttendanceCounts, GuestInviteOutcome, GuestResponse, InviteListing, InviteUpdate, NewInvite},
    error::AppError,
    identity::AdminSession,
    routes::access::CsrfOnlyForm,
    session::{self, ADMIN_COOKIE},
    state::AppState,
};

fn parse_id(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

fn parse_max_guests(raw: &str) -> Option<i64> {
    raw.trim().parse::<i64>().ok().map(|n| n.max(0))
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

// ============================================================================
// Login
// ============================================================================

/// GET /admin/login
pub async fn login_page(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> (SignedCookieJar, Json<serde_json::Value>) {
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    (
        jar,
        Json(json!({ "csrf_token": csrf_token, "error": null, "is_admin": true })),
    )
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(rename = "_csrf", default)]
    pub csrf: String,
    #[serde(default)]
    pub password: String,
}

/// POST /admin/login
pub async fn login(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, AppError> {
    csrf::verify(&jar, &form.csrf)?;

    let expected = &state.config.auth.admin_password;
    if !expected.is_empty() && session::secrets_match(expected, &form.password) {
        tracing::info!("Admin signed in");
        let jar = jar.add(session::admin_cookie(&state.config.auth));
        return Ok((jar, Redirect::to("/admin")).into_response());
    }

    tracing::warn!("Admin sign-in failed");
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    Ok((
        StatusCode::UNAUTHORIZED,
        jar,
        Json(json!({ "csrf_token": csrf_token, "error": "Invalid password", "is_admin": true })),
    )
        .into_response())
}

/// POST /admin/logout
pub async fn logout(
    jar: SignedCookieJar,
    Form(form): Form<CsrfOnlyForm>,
) -> Result<(SignedCookieJar, Redirect), AppError> {
    csrf::verify(&jar, &form.csrf)?;
    Ok((jar.remove(session::removal(ADMIN_COOKIE)), Redirect::to("/admin/login")))
}

// ============================================================================
// Dashboard
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RowKind {
    Rsvp,
    Guest,
}

/// One line of the response table: a household RSVP or one of its +1s.
/// Guest lines inherit the household's attendance answers.
#[derive(Debug, Serialize)]
pub struct DashboardRow {
    pub kind: RowKind,
    pub id: i64,
    pub name: String,
    pub place_card_name: Option<String>,
    pub ceremony: Option<bool>,
    pub reception: Option<bool>,
    pub dietary: Option<String>,
    pub transport: Option<bool>,
    pub printed_invite: Option<bool>,
    pub notes: Option<String>,
    pub when: Option<String>,
    pub added_by: Option<String>,
    pub invite_id: Option<i64>,
    pub group: Role,
    pub max_guests: Option<i64>,
    pub dupes: Vec<DupeFlag>,
}

impl NamedRow for DashboardRow {
    fn access_name(&self) -> Option<&str> {
        Some(self.name.as_str())
    }

    fn place_card_name(&self) -> Option<&str> {
        self.place_card_name.as_deref()
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub rows: Vec<DashboardRow>,
    pub counts: AttendanceCounts,
    pub csrf_token: String,
    pub is_admin: bool,
}

async fn dashboard_rows(state: &AppState) -> anyhow::Result<Vec<DashboardRow>> {
    let households = state.db.list_rsvp_responses().await?;
    let mut guests_by_rsvp: HashMap<i64, Vec<GuestResponse>> = HashMap::new();
    for guest in state.db.list_guest_responses().await? {
        guests_by_rsvp.entry(guest.rsvp_id).or_default().push(guest);
    }

    let mut rows = Vec::new();
    for r in households {
        let household_group = Role::from(r.invite_group.as_deref());
        rows.push(DashboardRow {
            kind: RowKind::Rsvp,
            id: r.id,
            name: r.access_name.clone().unwrap_or_default(),
            place_card_name: r.place_card_name.clone(),
            ceremony: r.ceremony,
            reception: r.reception,
            dietary: r.dietary.clone(),
            transport: r.transport,
            printed_invite: r.printed_invite,
            notes: r.notes.clone(),
            when: r.created_at.clone(),
            added_by: None,
            invite_id: r.invite_id,
            group: household_group,
            max_guests: r.max_guests,
            dupes: Vec::new(),
        });

        for g in guests_by_rsvp.remove(&r.id).unwrap_or_default() {
            rows.push(DashboardRow {
                kind: RowKind::Guest,
                id: g.id,
                name: g.access_name.unwrap_or_default(),
                place_card_name: g.place_card_name,
                ceremony: r.ceremony,
                reception: r.reception,
                dietary: g.dietary,
                transport: r.transport,
                printed_invite: r.printed_invite,
                notes: r.notes.clone(),
                when: g.created_at.or_else(|| r.created_at.clone()),
                added_by: g.added_by,
                invite_id: g.invite_id,
                group: Role::from(g.invite_group.as_deref()),
                max_guests: g.max_guests,
                dupes: Vec::new(),
            });
        }
    }

    // Newest first; timestamps are ISO-like so they sort as text.
    rows.sort_by(|a, b| b.when.cmp(&a.when));

    let flags = flag_duplicates(&rows);
    for (row, dupes) in rows.iter_mut().zip(flags) {
        row.dupes = dupes;
    }
    Ok(rows)
}

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<DashboardView>), AppError> {
    let rows = dashboard_rows(&state).await?;
    let counts = state.db.attendance_counts().await?;
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);

    Ok((
        jar,
        Json(DashboardView {
            rows,
            counts,
            csrf_token,
            is_admin: true,
        }),
    ))
}

// ============================================================================
// Invites
// ============================================================================

#[derive(Debug, Serialize)]
pub struct InvitesView {
    pub invites: Vec<InviteListing>,
    pub csrf_token: String,
    pub is_admin: bool,
}

/// GET /admin/invites
pub async fn invites(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
) -> Result<(SignedCookieJar, Json<InvitesView>), AppError> {
    let invites = state.db.list_invites().await?;
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    Ok((
        jar,
        Json(InvitesView {
            invites,
            csrf_token,
            is_admin: true,
        }),
    ))
}

async fn ensure_code_unused(state: &AppState, code: &str, exclude: Option<i64>) -> Result<(), AppError> {
    if credentials::find_invite_by_code(&state.db, code, exclude).await?.is_some() {
        return Err(AppError::BadRequest("Access code already exists".to_string()));
    }
    Ok(())
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreatePrimaryForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
    pub guest_name: String,
    pub access_code: String,
    pub invite_group: String,
    pub max_guests: String,
}

/// POST /admin/invites/create-primary
///
/// Names may repeat; access codes may not. The code scan and the insert are
/// separate steps, so two concurrent creates with the same code can both
/// pass the scan. Acceptable with a single admin.
pub async fn create_primary(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Form(form): Form<CreatePrimaryForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    csrf::verify(&jar, &form.csrf)?;

    let access_name = non_blank(&form.guest_name)
        .ok_or_else(|| AppError::BadRequest("Guest name required".to_string()))?;
    let code = non_blank(&form.access_code)
        .ok_or_else(|| AppError::BadRequest("Access code required".to_string()))?;

    ensure_code_unused(&state, &code, None).await?;

    let invite = NewInvite {
        access_name,
        access_code_hash: credentials::hash_code_blocking(code).await?,
        invite_group: Role::normalize(&form.invite_group),
        max_guests: parse_max_guests(&form.max_guests),
    };
    let invite_id = state.db.create_primary_invite(&invite).await?;
    tracing::info!("Created primary invite {} ({})", invite_id, invite.invite_group);

    Ok(Json(json!({ "success": true, "id": invite_id })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UpdateInviteForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
    pub access_name: String,
    pub access_code: String,
    pub invite_group: String,
    pub max_guests: String,
}

/// POST /admin/invites/:id/update
pub async fn update_invite(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    Form(form): Form<UpdateInviteForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    csrf::verify(&jar, &form.csrf)?;
    let id = parse_id(&id).ok_or_else(|| AppError::BadRequest("Invalid invite ID".to_string()))?;

    let access_code_hash = match non_blank(&form.access_code) {
        Some(code) => {
            ensure_code_unused(&state, &code, Some(id)).await?;
            Some(credentials::hash_code_blocking(code).await?)
        }
        None => None,
    };

    let update = InviteUpdate {
        access_name: non_blank(&form.access_name),
        invite_group: Role::normalize(&form.invite_group),
        max_guests: parse_max_guests(&form.max_guests),
        access_code_hash,
    };
    if !state.db.update_invite(id, &update).await? {
        return Err(AppError::NotFound(format!("Invite {} not found", id)));
    }
    tracing::info!("Updated invite {}", id);

    Ok(Json(json!({ "success": true })))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GuestInviteForm {
    #[serde(rename = "_csrf")]
    pub csrf: String,
    pub access_name: String,
    pub access_code: String,
    pub invite_group: String,
}

/// POST /admin/guests/:id/invite
///
/// Gives a +1 their own access code. The invite lives exactly as long as
/// the guest row it points at.
pub async fn create_guest_invite(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    Form(form): Form<GuestInviteForm>,
) -> Result<Json<serde_json::Value>, AppError> {
    csrf::verify(&jar, &form.csrf)?;
    let guest_id = parse_id(&id).ok_or_else(|| AppError::BadRequest("Invalid Guest ID".to_string()))?;
    let code = non_blank(&form.access_code)
        .ok_or_else(|| AppError::BadRequest("Access code required".to_string()))?;

    ensure_code_unused(&state, &code, None).await?;

    let invite = NewInvite {
        access_name: form.access_name.trim().to_string(),
        access_code_hash: credentials::hash_code_blocking(code).await?,
        invite_group: Role::normalize(&form.invite_group),
        max_guests: None,
    };
    let invite_id = match state.db.create_guest_invite(guest_id, &invite).await? {
        GuestInviteOutcome::Created(invite_id) => invite_id,
        GuestInviteOutcome::GuestMissing => {
            return Err(AppError::NotFound(format!("Guest {} not found", guest_id)));
        }
        GuestInviteOutcome::AlreadyInvited => {
            return Err(AppError::BadRequest("Guest already has an invite".to_string()));
        }
    };
    tracing::info!("Created invite {} for guest {}", invite_id, guest_id);

    Ok(Json(json!({ "success": true, "id": invite_id })))
}

// ============================================================================
// Deletes (idempotent)
// ============================================================================

/// POST /admin/rsvps/:id/delete
///
/// Removes the whole party: the household, its invite and every +1.
pub async fn delete_rsvp(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    Form(form): Form<CsrfOnlyForm>,
) -> Result<Redirect, AppError> {
    csrf::verify(&jar, &form.csrf)?;
    let rsvp_id = parse_id(&id).ok_or_else(|| AppError::BadRequest("Invalid RSVP ID".to_string()))?;

    if state.db.delete_rsvp(rsvp_id).await? {
        tracing::info!("Deleted RSVP {}", rsvp_id);
    } else {
        tracing::warn!("Tried to delete an RSVP that was already gone. ID: {}", rsvp_id);
    }
    Ok(Redirect::to("/admin"))
}

/// POST /admin/guests/:id/delete
pub async fn delete_guest(
    State(state): State<AppState>,
    _admin: AdminSession,
    jar: SignedCookieJar,
    Path(id): Path<String>,
    Form(form): Form<CsrfOnlyForm>,
) -> Result<Redirect, AppError> {
    csrf::verify(&jar, &form.csrf)?;
    let guest_id = parse_id(&id).ok_or_else(|| AppError::BadRequest("Invalid Guest ID".to_string()))?;

    if state.db.delete_guest(guest_id).await? {
        tracing::info!("Deleted guest {}", guest_id);
    } else {
        tracing::warn!("Tried to delete a guest that was already gone. ID: {}", guest_id);
    }
    Ok(Redirect::to("/admin"))
}

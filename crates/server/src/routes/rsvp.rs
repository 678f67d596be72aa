use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::{cookie::SignedCookieJar, Form};
use serde::{Deserialize, Serialize};
use shared::{yes_no_label, Confirmation, GuestLine, RsvpError, RsvpForm};

use crate::{
    csrf,
    db::{Database, InviteProfile},
    error::AppError,
    identity::{access_redirect, Invitee, Viewer},
    state::AppState,
};

#[derive(Debug, Serialize)]
pub struct RsvpView {
    pub defaults: RsvpForm,
    pub max_guests: usize,
    /// A +1 with their own invite only edits their own name and dietary note.
    pub is_guest: bool,
    pub viewer: Viewer,
    pub csrf_token: String,
    pub error: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ConfirmationView {
    #[serde(flatten)]
    pub confirmation: Confirmation,
    pub viewer: Option<Viewer>,
    pub csrf_token: String,
}

/// Wire shape of the RSVP form. Guest rows arrive as repeated
/// `guestNames` / `guestDietaries` fields, matched up by position.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RsvpBody {
    #[serde(rename = "_csrf")]
    pub csrf: String,
    pub place_card_name: String,
    pub email: String,
    pub dietary: String,
    pub ceremony: String,
    pub reception: String,
    pub transport: String,
    pub printed_invite: String,
    pub notes: String,
    pub guest_names: Vec<String>,
    pub guest_dietaries: Vec<String>,
}

impl RsvpBody {
    fn into_form(self) -> RsvpForm {
        let dietaries = self.guest_dietaries;
        let guests = self
            .guest_names
            .into_iter()
            .enumerate()
            .map(|(i, name)| GuestLine {
                name,
                dietary: dietaries.get(i).cloned().unwrap_or_default(),
            })
            .collect();

        RsvpForm {
            place_card_name: self.place_card_name,
            email: self.email,
            dietary: self.dietary,
            ceremony: self.ceremony,
            reception: self.reception,
            transport: self.transport,
            printed_invite: self.printed_invite,
            notes: self.notes,
            guests,
        }
    }
}

fn text(value: &Option<String>) -> String {
    value.clone().unwrap_or_default()
}

/// What the form should show before anything is typed.
async fn saved_answers(db: &Database, invite: &InviteProfile) -> anyhow::Result<RsvpForm> {
    if let Some(guest_id) = invite.guest_id {
        let Some(guest) = db.get_guest(guest_id).await? else {
            return Ok(RsvpForm::default());
        };
        let household = db.load_household(guest.rsvp_id).await?;
        let mut form = RsvpForm {
            place_card_name: text(&guest.place_card_name),
            dietary: text(&guest.dietary),
            ..RsvpForm::default()
        };
        if let Some(household) = household {
            form.ceremony = yes_no_label(household.rsvp.ceremony).to_string();
            form.reception = yes_no_label(household.rsvp.reception).to_string();
        }
        return Ok(form);
    }

    let Some(rsvp_id) = invite.rsvp_id else {
        return Ok(RsvpForm::default());
    };
    let Some(household) = db.load_household(rsvp_id).await? else {
        return Ok(RsvpForm::default());
    };

    let rsvp = household.rsvp;
    Ok(RsvpForm {
        place_card_name: text(&rsvp.place_card_name),
        email: text(&rsvp.email),
        dietary: text(&rsvp.dietary),
        ceremony: yes_no_label(rsvp.ceremony).to_string(),
        reception: yes_no_label(rsvp.reception).to_string(),
        transport: yes_no_label(rsvp.transport).to_string(),
        printed_invite: yes_no_label(rsvp.printed_invite).to_string(),
        notes: text(&rsvp.notes),
        guests: household
            .guests
            .iter()
            .map(|guest| GuestLine {
                name: text(&guest.place_card_name),
                dietary: text(&guest.dietary),
            })
            .collect(),
    })
}

/// GET /rsvp
pub async fn rsvp_page(
    State(state): State<AppState>,
    invitee: Invitee,
    jar: SignedCookieJar,
    uri: Uri,
) -> Result<Response, AppError> {
    let Some(invite) = state.db.find_invite(invitee.invite_id).await? else {
        return Ok(access_redirect(&uri));
    };

    let defaults = saved_answers(&state.db, &invite).await?;
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);

    Ok((
        jar,
        Json(RsvpView {
            defaults,
            max_guests: invite.capacity(),
            is_guest: invite.guest_id.is_some(),
            viewer: Viewer::from_profile(&invite),
            csrf_token,
            error: None,
        }),
    )
        .into_response())
}

/// Re-render the submitted form with the problem spelled out.
fn rejected(
    state: &AppState,
    jar: SignedCookieJar,
    invite: &InviteProfile,
    form: RsvpForm,
    err: RsvpError,
) -> Response {
    tracing::info!("RSVP for invite {} rejected: {}", invite.id, err);
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);
    (
        StatusCode::BAD_REQUEST,
        jar,
        Json(RsvpView {
            defaults: form,
            max_guests: invite.capacity(),
            is_guest: invite.guest_id.is_some(),
            viewer: Viewer::from_profile(invite),
            csrf_token,
            error: Some(err.to_string()),
        }),
    )
        .into_response()
}

/// POST /rsvp
pub async fn rsvp_submit(
    State(state): State<AppState>,
    invitee: Invitee,
    jar: SignedCookieJar,
    Form(body): Form<RsvpBody>,
) -> Result<Response, AppError> {
    csrf::verify(&jar, &body.csrf)?;
    let form = body.into_form();

    let invite = state
        .db
        .find_invite(invitee.invite_id)
        .await?
        .ok_or_else(|| AppError::BadRequest("Invite not found".to_string()))?;
    let access_name = invite.access_name.as_deref();

    if let Some(guest_id) = invite.guest_id {
        let update = match form.plan_linked_guest(access_name) {
            Ok(update) => update,
            Err(err) => return Ok(rejected(&state, jar, &invite, form, err)),
        };
        if !state.db.update_linked_guest(guest_id, &update).await? {
            return Err(AppError::BadRequest("Guest not found".to_string()));
        }
        tracing::info!("Guest {} updated their RSVP details", guest_id);
    } else {
        let rsvp_id = invite
            .rsvp_id
            .ok_or_else(|| AppError::BadRequest("RSVP not found".to_string()))?;
        let update = match form.plan_household(access_name, invite.capacity()) {
            Ok(update) => update,
            Err(err) => return Ok(rejected(&state, jar, &invite, form, err)),
        };
        if !state.db.save_household(rsvp_id, &update).await? {
            return Err(AppError::BadRequest("RSVP not found".to_string()));
        }
        tracing::info!(
            "RSVP {} saved with {} guest(s) for invite {}",
            rsvp_id,
            update.guests.len(),
            invite.id
        );
    }

    // Names may have just changed.
    let viewer = state
        .db
        .find_invite(invite.id)
        .await?
        .as_ref()
        .map(Viewer::from_profile);
    let (jar, csrf_token) = csrf::issue(jar, &state.config.auth);

    Ok((
        jar,
        Json(ConfirmationView {
            confirmation: form.confirmation(access_name),
            viewer,
            csrf_token,
        }),
    )
        .into_response())
}

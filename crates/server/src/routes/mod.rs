use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{error, state::AppState};

mod access;
mod admin;
mod health;
mod pages;
mod rsvp;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health check
        .route("/healthz", get(health::health_check))
        // Public pages
        .route("/", get(pages::home))
        .route("/travel", get(pages::travel))
        .route("/story", get(pages::story))
        // Invitee pages
        .route("/gallery", get(pages::gallery))
        .route("/bridesmaids", get(pages::bridesmaids))
        .route("/groomsmen", get(pages::groomsmen))
        .route("/rsvp", get(rsvp::rsvp_page).post(rsvp::rsvp_submit))
        // Access codes
        .route("/access", get(access::access_page).post(access::access_submit))
        .route("/access/logout", post(access::access_logout))
        // Admin
        .route("/admin/login", get(admin::login_page).post(admin::login))
        .route("/admin/logout", post(admin::logout))
        .route("/admin", get(admin::dashboard))
        .route("/admin/invites", get(admin::invites))
        .route("/admin/invites/create-primary", post(admin::create_primary))
        .route("/admin/invites/:id/update", post(admin::update_invite))
        .route("/admin/guests/:id/invite", post(admin::create_guest_invite))
        .route("/admin/rsvps/:id/delete", post(admin::delete_rsvp))
        .route("/admin/guests/:id/delete", post(admin::delete_guest))
        .fallback(pages::not_found)
        // Middleware
        .layer(middleware::from_fn_with_state(state.clone(), error::render_errors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::Config,
        credentials,
        db::{Database, GuestInviteOutcome, NewInvite},
    };
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::Value;
    use shared::{HouseholdUpdate, NewGuest, Role};
    use std::collections::HashMap;
    use tempfile::TempDir;
    use tower::ServiceExt;

    const ADMIN_PASSWORD: &str = "letmein";

    async fn test_state() -> (AppState, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let mut config = Config::default();
        config.database.path = temp_dir.path().join("test.db").to_str().unwrap().to_string();
        config.auth.cookie_secret = "s".repeat(64);
        config.auth.admin_password = ADMIN_PASSWORD.to_string();

        let db = Database::new(&config.database.path).await.unwrap();
        db.run_migrations().await.unwrap();
        (AppState::new(db, config).unwrap(), temp_dir)
    }

    async fn seed_invite(db: &Database, name: &str, code: &str, group: &str, max_guests: i64) -> i64 {
        db.create_primary_invite(&NewInvite {
            access_name: name.to_string(),
            access_code_hash: credentials::hash_code(code).unwrap(),
            invite_group: Role::normalize(group),
            max_guests: Some(max_guests),
        })
        .await
        .unwrap()
    }

    /// Household answers yes to both and lists a single +1.
    async fn seed_attending_guest(db: &Database, invite_id: i64, guest: &str) -> i64 {
        let rsvp_id = db.find_invite(invite_id).await.unwrap().unwrap().rsvp_id.unwrap();
        db.save_household(
            rsvp_id,
            &HouseholdUpdate {
                place_card_name: Some("Smiths".to_string()),
                email: None,
                dietary: None,
                ceremony: Some(true),
                reception: Some(true),
                transport: None,
                printed_invite: None,
                notes: None,
                guests: vec![NewGuest { place_card_name: guest.to_string(), dietary: None }],
            },
        )
        .await
        .unwrap();
        db.load_household(rsvp_id).await.unwrap().unwrap().guests[0].id
    }

    async fn guest_names(db: &Database, invite_id: i64) -> Vec<String> {
        let rsvp_id = db.find_invite(invite_id).await.unwrap().unwrap().rsvp_id.unwrap();
        db.load_household(rsvp_id)
            .await
            .unwrap()
            .unwrap()
            .guests
            .into_iter()
            .filter_map(|g| g.place_card_name)
            .collect()
    }

    struct TestResponse {
        status: StatusCode,
        location: Option<String>,
        set_cookies: Vec<String>,
        json: Value,
    }

    /// Drives the router like a browser: keeps cookies between requests.
    struct Browser {
        app: Router,
        cookies: HashMap<String, String>,
    }

    impl Browser {
        fn new(state: AppState) -> Self {
            Self {
                app: create_router(state),
                cookies: HashMap::new(),
            }
        }

        async fn send(&mut self, mut builder: axum::http::request::Builder, body: Body) -> TestResponse {
            if !self.cookies.is_empty() {
                let cookie_header = self
                    .cookies
                    .iter()
                    .map(|(name, value)| format!("{}={}", name, value))
                    .collect::<Vec<_>>()
                    .join("; ");
                builder = builder.header(header::COOKIE, cookie_header);
            }

            let response = self.app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|v| v.to_str().unwrap().to_string());
            let set_cookies: Vec<String> = response
                .headers()
                .get_all(header::SET_COOKIE)
                .iter()
                .map(|v| v.to_str().unwrap().to_string())
                .collect();

            for raw in &set_cookies {
                let pair = raw.split(';').next().unwrap();
                let (name, value) = pair.split_once('=').unwrap();
                if value.is_empty() {
                    self.cookies.remove(name);
                } else {
                    self.cookies.insert(name.to_string(), value.to_string());
                }
            }

            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
            let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
            TestResponse { status, location, set_cookies, json }
        }

        async fn get(&mut self, uri: &str) -> TestResponse {
            self.send(Request::builder().method("GET").uri(uri), Body::empty()).await
        }

        async fn post(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
            let body = fields
                .iter()
                .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
                .collect::<Vec<_>>()
                .join("&");
            self.send(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded"),
                Body::from(body),
            )
            .await
        }

        async fn csrf_token(&mut self) -> String {
            let page = self.get("/access").await;
            page.json["csrf_token"].as_str().unwrap().to_string()
        }

        async fn admin_sign_in(&mut self) -> String {
            let token = self.csrf_token().await;
            let response = self
                .post("/admin/login", &[("_csrf", &token), ("password", ADMIN_PASSWORD)])
                .await;
            assert_eq!(response.status, StatusCode::SEE_OTHER);
            token
        }

        async fn sign_in(&mut self, code: &str) -> TestResponse {
            let token = self.csrf_token().await;
            self.post("/access", &[("_csrf", &token), ("code", code), ("next", "/rsvp")])
                .await
        }
    }

    #[tokio::test]
    async fn test_healthz() {
        let (state, _temp_dir) = test_state().await;
        let mut browser = Browser::new(state);

        let response = browser.get("/healthz").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json, serde_json::json!({ "ok": true }));
    }

    #[tokio::test]
    async fn test_unknown_path_renders_error_page() {
        let (state, _temp_dir) = test_state().await;
        let mut browser = Browser::new(state);

        let response = browser.get("/no-such-page").await;
        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(response.json["error"]["message"], "Page Not Found");
        assert_eq!(response.json["error"]["status"], 404);
        assert!(response.json["viewer"].is_null());
    }

    #[tokio::test]
    async fn test_public_page_shows_no_viewer() {
        let (state, _temp_dir) = test_state().await;
        let mut browser = Browser::new(state);

        let response = browser.get("/").await;
        assert_eq!(response.status, StatusCode::OK);
        assert_eq!(response.json["page"], "home");
        assert_eq!(response.json["show_admin_link"], true);
        assert!(response.json["viewer"].is_null());
        assert!(browser.cookies.contains_key("csrf"));
    }

    #[tokio::test]
    async fn test_gated_page_redirects_to_access_prompt() {
        let (state, _temp_dir) = test_state().await;
        let mut browser = Browser::new(state);

        let response = browser.get("/gallery").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert_eq!(
            response.location.as_deref(),
            Some("/?showAccessModal=true&next=%2Fgallery")
        );
    }

    #[tokio::test]
    async fn test_forged_access_cookie_is_cleared() {
        let (state, _temp_dir) = test_state().await;
        let invite_id = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let mut browser = Browser::new(state);
        browser.cookies.insert("acc".to_string(), format!("INV:{}", invite_id));

        let response = browser.get("/rsvp").await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
        assert!(response.set_cookies.iter().any(|c| c.starts_with("acc=;")));
        assert!(!browser.cookies.contains_key("acc"));

        let home = browser.get("/").await;
        assert!(home.json["viewer"].is_null());
    }

    #[tokio::test]
    async fn test_post_without_csrf_token_is_forbidden() {
        let (state, _temp_dir) = test_state().await;
        seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let mut browser = Browser::new(state);

        let response = browser.post("/access", &[("code", "ROSE")]).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
        assert!(response.json["error"]["message"]
            .as_str()
            .unwrap()
            .contains("reload"));
        assert!(!browser.cookies.contains_key("acc"));

        browser.csrf_token().await;
        let response = browser
            .post("/access", &[("_csrf", "not-the-token"), ("code", "ROSE")])
            .await;
        assert_eq!(response.status, StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_access_code_sign_in() {
        let (state, _temp_dir) = test_state().await;
        seed_invite(&state.db, "Joneses", "LILY", "guest", 0).await;
        let invite_id = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let mut browser = Browser::new(state);

        let token = browser.csrf_token().await;
        let blank = browser.post("/access", &[("_csrf", &token), ("code", "  ")]).await;
        assert_eq!(blank.status, StatusCode::BAD_REQUEST);

        let wrong = browser.sign_in("TULIP").await;
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(
            wrong.json["error"],
            "The access code you entered is incorrect. Please try again."
        );
        assert!(!browser.cookies.contains_key("acc"));

        let ok = browser.sign_in("ROSE").await;
        assert_eq!(ok.status, StatusCode::OK);
        assert_eq!(ok.json["success"], true);
        assert_eq!(ok.json["next"], "/rsvp");
        let acc = ok.set_cookies.iter().find(|c| c.starts_with("acc=")).unwrap();
        assert!(acc.contains("HttpOnly"));
        assert!(acc.contains("SameSite=Lax"));
        assert!(acc.contains("Max-Age=7776000"));

        let home = browser.get("/").await;
        assert_eq!(home.json["viewer"]["invite_id"], invite_id);
        assert_eq!(home.json["viewer"]["name"], "Smiths");
        assert_eq!(home.json["viewer"]["role"], "family");

        let token = browser.csrf_token().await;
        let logout = browser.post("/access/logout", &[("_csrf", &token)]).await;
        assert_eq!(logout.status, StatusCode::SEE_OTHER);
        assert_eq!(logout.location.as_deref(), Some("/"));
        assert!(!browser.cookies.contains_key("acc"));
    }

    #[tokio::test]
    async fn test_rsvp_guest_list_rules() {
        let (state, _temp_dir) = test_state().await;
        let invite_id = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let db = state.db.clone();
        let mut browser = Browser::new(state);
        browser.sign_in("ROSE").await;

        let page = browser.get("/rsvp").await;
        assert_eq!(page.status, StatusCode::OK);
        assert_eq!(page.json["max_guests"], 2);
        assert_eq!(page.json["is_guest"], false);
        assert_eq!(page.json["defaults"]["reception"], "");
        let token = page.json["csrf_token"].as_str().unwrap().to_string();

        // Blank entries are dropped before the capacity check.
        let saved = browser
            .post(
                "/rsvp",
                &[
                    ("_csrf", &token),
                    ("ceremony", "yes"),
                    ("reception", "yes"),
                    ("transport", "yes"),
                    ("guestNames", "Alice"),
                    ("guestDietaries", "vegan"),
                    ("guestNames", ""),
                    ("guestDietaries", ""),
                    ("guestNames", "Bob"),
                    ("guestDietaries", ""),
                ],
            )
            .await;
        assert_eq!(saved.status, StatusCode::OK);
        assert_eq!(saved.json["name"], "Smiths");
        assert_eq!(saved.json["transport"], true);
        assert_eq!(guest_names(&db, invite_id).await, vec!["Alice", "Bob"]);

        // Over capacity: rejected, nothing written, form values preserved.
        let rejected = browser
            .post(
                "/rsvp",
                &[
                    ("_csrf", &token),
                    ("placeCardName", "Mr & Mrs Smith"),
                    ("ceremony", "yes"),
                    ("reception", "yes"),
                    ("guestNames", "Cy"),
                    ("guestNames", "Dee"),
                    ("guestNames", "Eve"),
                ],
            )
            .await;
        assert_eq!(rejected.status, StatusCode::BAD_REQUEST);
        assert_eq!(rejected.json["error"], "You can only add a maximum of 2 guests.");
        assert_eq!(rejected.json["defaults"]["place_card_name"], "Mr & Mrs Smith");
        assert_eq!(rejected.json["defaults"]["guests"].as_array().unwrap().len(), 3);
        assert_eq!(guest_names(&db, invite_id).await, vec!["Alice", "Bob"]);

        // Too long: the field and its limit are named.
        let long_notes = "x".repeat(1025);
        let too_long = browser
            .post(
                "/rsvp",
                &[("_csrf", &token), ("reception", "yes"), ("notes", &long_notes)],
            )
            .await;
        assert_eq!(too_long.status, StatusCode::BAD_REQUEST);
        assert_eq!(too_long.json["error"], "Notes is too long (max 1024 characters).");
        assert_eq!(guest_names(&db, invite_id).await, vec!["Alice", "Bob"]);

        // Declining the reception clears the guest list.
        let declined = browser
            .post(
                "/rsvp",
                &[
                    ("_csrf", &token),
                    ("ceremony", "yes"),
                    ("reception", "no"),
                    ("guestNames", "Alice"),
                ],
            )
            .await;
        assert_eq!(declined.status, StatusCode::OK);
        assert_eq!(declined.json["reception"], false);
        assert!(declined.json["transport"].is_null());
        assert!(guest_names(&db, invite_id).await.is_empty());

        let page = browser.get("/rsvp").await;
        assert_eq!(page.json["defaults"]["ceremony"], "yes");
        assert_eq!(page.json["defaults"]["reception"], "no");
    }

    #[tokio::test]
    async fn test_linked_guest_only_edits_own_details() {
        let (state, _temp_dir) = test_state().await;
        let invite_id = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let guest_id = seed_attending_guest(&state.db, invite_id, "Alice").await;
        let outcome = state
            .db
            .create_guest_invite(
                guest_id,
                &NewInvite {
                    access_name: "Alice".to_string(),
                    access_code_hash: credentials::hash_code("DAISY").unwrap(),
                    invite_group: Role::Guest,
                    max_guests: None,
                },
            )
            .await
            .unwrap();
        assert!(matches!(outcome, GuestInviteOutcome::Created(_)));
        let db = state.db.clone();
        let mut browser = Browser::new(state);
        browser.sign_in("DAISY").await;

        let page = browser.get("/rsvp").await;
        assert_eq!(page.json["is_guest"], true);
        assert_eq!(page.json["defaults"]["place_card_name"], "Alice");
        assert_eq!(page.json["defaults"]["reception"], "yes");
        let token = page.json["csrf_token"].as_str().unwrap().to_string();

        let saved = browser
            .post(
                "/rsvp",
                &[
                    ("_csrf", &token),
                    ("placeCardName", "Alicia"),
                    ("dietary", "no shellfish"),
                    ("reception", "yes"),
                    ("guestNames", "Mallory"),
                ],
            )
            .await;
        assert_eq!(saved.status, StatusCode::OK);
        assert_eq!(saved.json["name"], "Alicia");

        let guest = db.get_guest(guest_id).await.unwrap().unwrap();
        assert_eq!(guest.place_card_name.as_deref(), Some("Alicia"));
        assert_eq!(guest.dietary.as_deref(), Some("no shellfish"));
        assert_eq!(guest_names(&db, invite_id).await, vec!["Alicia"]);
    }

    #[tokio::test]
    async fn test_role_gated_pages() {
        let (state, _temp_dir) = test_state().await;
        seed_invite(&state.db, "Maid of honour", "PEONY", "Bridesmaid", 0).await;
        let mut browser = Browser::new(state);
        browser.sign_in("PEONY").await;

        let allowed = browser.get("/bridesmaids").await;
        assert_eq!(allowed.status, StatusCode::OK);
        assert_eq!(allowed.json["viewer"]["role"], "bridesmaids");

        let denied = browser.get("/groomsmen").await;
        assert_eq!(denied.status, StatusCode::FORBIDDEN);
        assert_eq!(denied.json["error"]["message"], "Access Denied");
        assert_eq!(denied.json["viewer"]["name"], "Maid of honour");

        let gallery = browser.get("/gallery").await;
        assert_eq!(gallery.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_flow() {
        let (state, _temp_dir) = test_state().await;
        seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let mut browser = Browser::new(state);

        let locked = browser.get("/admin").await;
        assert_eq!(locked.status, StatusCode::SEE_OTHER);
        assert_eq!(locked.location.as_deref(), Some("/admin/login"));

        let token = browser.csrf_token().await;
        let wrong = browser
            .post("/admin/login", &[("_csrf", &token), ("password", "guess")])
            .await;
        assert_eq!(wrong.status, StatusCode::UNAUTHORIZED);
        assert_eq!(wrong.json["error"], "Invalid password");

        let ok = browser
            .post("/admin/login", &[("_csrf", &token), ("password", ADMIN_PASSWORD)])
            .await;
        assert_eq!(ok.status, StatusCode::SEE_OTHER);
        assert_eq!(ok.location.as_deref(), Some("/admin"));

        let created = browser
            .post(
                "/admin/invites/create-primary",
                &[
                    ("_csrf", &token),
                    ("guestName", "Smiths"),
                    ("accessCode", "TULIP"),
                    ("inviteGroup", "groom"),
                    ("maxGuests", "1"),
                ],
            )
            .await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(created.json["success"], true);

        let duplicate = browser
            .post(
                "/admin/invites/create-primary",
                &[("_csrf", &token), ("guestName", "Someone"), ("accessCode", "ROSE")],
            )
            .await;
        assert_eq!(duplicate.status, StatusCode::BAD_REQUEST);
        assert_eq!(duplicate.json["error"]["message"], "Access code already exists");

        let dashboard = browser.get("/admin").await;
        assert_eq!(dashboard.status, StatusCode::OK);
        assert_eq!(dashboard.json["counts"]["total"], 2);
        let rows = dashboard.json["rows"].as_array().unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows
            .iter()
            .all(|row| row["dupes"].as_array().unwrap().contains(&Value::from("dupe_name"))));

        let invites = browser.get("/admin/invites").await;
        let listed = invites.json["invites"].as_array().unwrap();
        assert!(listed.iter().any(|invite| invite["invite_group"] == "groomsmen"));

        for _ in 0..2 {
            let deleted = browser
                .post("/admin/rsvps/999/delete", &[("_csrf", &token)])
                .await;
            assert_eq!(deleted.status, StatusCode::SEE_OTHER);
            assert_eq!(deleted.location.as_deref(), Some("/admin"));
        }

        let invalid = browser.post("/admin/guests/abc/delete", &[("_csrf", &token)]).await;
        assert_eq!(invalid.status, StatusCode::BAD_REQUEST);

        let logout = browser.post("/admin/logout", &[("_csrf", &token)]).await;
        assert_eq!(logout.location.as_deref(), Some("/admin/login"));
        let locked = browser.get("/admin").await;
        assert_eq!(locked.status, StatusCode::SEE_OTHER);
    }

    #[tokio::test]
    async fn test_admin_updates_invite_codes() {
        let (state, _temp_dir) = test_state().await;
        let smiths = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        seed_invite(&state.db, "Joneses", "LILY", "guest", 0).await;
        let db = state.db.clone();
        let mut browser = Browser::new(state);
        let token = browser.admin_sign_in().await;
        let update_uri = format!("/admin/invites/{}/update", smiths);

        // Re-saving an invite's own code is not a collision.
        let own = browser
            .post(
                &update_uri,
                &[
                    ("_csrf", &token),
                    ("accessName", "Smiths"),
                    ("accessCode", "ROSE"),
                    ("inviteGroup", "family"),
                    ("maxGuests", "2"),
                ],
            )
            .await;
        assert_eq!(own.status, StatusCode::OK);
        assert_eq!(own.json["success"], true);

        let taken = browser
            .post(
                &update_uri,
                &[("_csrf", &token), ("accessName", "Smiths"), ("accessCode", "LILY")],
            )
            .await;
        assert_eq!(taken.status, StatusCode::BAD_REQUEST);
        assert_eq!(taken.json["error"]["message"], "Access code already exists");

        // A blank code keeps the stored hash.
        let renamed = browser
            .post(
                &update_uri,
                &[
                    ("_csrf", &token),
                    ("accessName", "  The Smiths "),
                    ("accessCode", "   "),
                    ("inviteGroup", "Bridesmaid"),
                    ("maxGuests", "3"),
                ],
            )
            .await;
        assert_eq!(renamed.status, StatusCode::OK);
        let invite = db.find_invite(smiths).await.unwrap().unwrap();
        assert_eq!(invite.access_name.as_deref(), Some("The Smiths"));
        assert_eq!(invite.role(), Role::Bridesmaids);
        assert_eq!(invite.capacity(), 3);
        assert_eq!(
            credentials::find_invite_by_code(&db, "ROSE", None).await.unwrap(),
            Some(smiths)
        );

        let missing = browser
            .post("/admin/invites/999/update", &[("_csrf", &token), ("accessName", "Nobody")])
            .await;
        assert_eq!(missing.status, StatusCode::NOT_FOUND);

        let signed_in = browser.sign_in("ROSE").await;
        assert_eq!(signed_in.status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_admin_gives_guest_one_invite() {
        let (state, _temp_dir) = test_state().await;
        let smiths = seed_invite(&state.db, "Smiths", "ROSE", "family", 2).await;
        let guest_id = seed_attending_guest(&state.db, smiths, "Alice").await;
        let db = state.db.clone();
        let mut browser = Browser::new(state);
        let token = browser.admin_sign_in().await;
        let invite_uri = format!("/admin/guests/{}/invite", guest_id);

        let created = browser
            .post(
                &invite_uri,
                &[("_csrf", &token), ("accessName", "Alice"), ("accessCode", "DAISY")],
            )
            .await;
        assert_eq!(created.status, StatusCode::OK);
        assert_eq!(created.json["success"], true);

        let again = browser
            .post(
                &invite_uri,
                &[("_csrf", &token), ("accessName", "Alice"), ("accessCode", "PANSY")],
            )
            .await;
        assert_eq!(again.status, StatusCode::BAD_REQUEST);
        assert_eq!(again.json["error"]["message"], "Guest already has an invite");

        let reused = browser
            .post(
                &invite_uri,
                &[("_csrf", &token), ("accessName", "Alice"), ("accessCode", "ROSE")],
            )
            .await;
        assert_eq!(reused.status, StatusCode::BAD_REQUEST);
        assert_eq!(reused.json["error"]["message"], "Access code already exists");

        let unknown = browser
            .post(
                "/admin/guests/999/invite",
                &[("_csrf", &token), ("accessName", "Ghost"), ("accessCode", "TULIP")],
            )
            .await;
        assert_eq!(unknown.status, StatusCode::NOT_FOUND);

        let invites = db.list_invites().await.unwrap();
        assert_eq!(invites.len(), 2);
        assert_eq!(invites.iter().filter(|invite| invite.guest_id == Some(guest_id)).count(), 1);

        let rejected = browser.sign_in("PANSY").await;
        assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
        let accepted = browser.sign_in("DAISY").await;
        assert_eq!(accepted.status, StatusCode::OK);
    }
}

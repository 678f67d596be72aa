//! Household RSVP rules: tri-state answers, field limits, and the plans the
//! store applies for a primary respondent or a linked +1.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const NAME_MAX: usize = 255;
pub const EMAIL_MAX: usize = 255;
pub const DIETARY_MAX: usize = 1024;
pub const NOTES_MAX: usize = 1024;

/// `"yes"` / `"no"` / anything else, as stored: `Some(true)`, `Some(false)`, `None`.
pub fn yes_no(raw: &str) -> Option<bool> {
    match raw {
        "yes" => Some(true),
        "no" => Some(false),
        _ => None,
    }
}

/// Inverse of [`yes_no`] for pre-filling a form.
pub fn yes_no_label(value: Option<bool>) -> &'static str {
    match value {
        Some(true) => "yes",
        Some(false) => "no",
        None => "",
    }
}

fn non_blank(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RsvpError {
    #[error("{field} is too long (max {max} characters).")]
    FieldTooLong { field: &'static str, max: usize },
    #[error("You can only add a maximum of {max} guests.")]
    TooManyGuests { max: usize },
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuestLine {
    pub name: String,
    pub dietary: String,
}

/// Submitted (or pre-filled) RSVP form values, exactly as the invitee typed them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RsvpForm {
    pub place_card_name: String,
    pub email: String,
    pub dietary: String,
    pub ceremony: String,
    pub reception: String,
    pub transport: String,
    pub printed_invite: String,
    pub notes: String,
    pub guests: Vec<GuestLine>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGuest {
    pub place_card_name: String,
    pub dietary: Option<String>,
}

/// Full replacement state for a primary RSVP and its guest list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HouseholdUpdate {
    pub place_card_name: Option<String>,
    pub email: Option<String>,
    pub dietary: Option<String>,
    pub ceremony: Option<bool>,
    pub reception: Option<bool>,
    pub transport: Option<bool>,
    pub printed_invite: Option<bool>,
    pub notes: Option<String>,
    pub guests: Vec<NewGuest>,
}

/// The only fields a +1 holding their own invite may change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedGuestUpdate {
    pub place_card_name: Option<String>,
    pub dietary: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub name: Option<String>,
    pub ceremony: Option<bool>,
    pub reception: Option<bool>,
    pub transport: Option<bool>,
    pub printed_invite: Option<bool>,
}

impl RsvpForm {
    pub fn ceremony(&self) -> Option<bool> {
        yes_no(&self.ceremony)
    }

    pub fn reception(&self) -> Option<bool> {
        yes_no(&self.reception)
    }

    pub fn attending_reception(&self) -> bool {
        self.reception() == Some(true)
    }

    pub fn attending_anything(&self) -> bool {
        self.ceremony() == Some(true) || self.attending_reception()
    }

    /// Transport is only asked of people coming to both parts of the day.
    pub fn transport(&self) -> Option<bool> {
        if self.ceremony() == Some(true) && self.attending_reception() {
            yes_no(&self.transport)
        } else {
            None
        }
    }

    pub fn printed_invite(&self) -> Option<bool> {
        if self.attending_anything() {
            yes_no(&self.printed_invite)
        } else {
            None
        }
    }

    /// Length limits, checked against the raw submitted values before anything is stored.
    pub fn validate(&self) -> Result<(), RsvpError> {
        let rules = [
            ("Place card name", &self.place_card_name, NAME_MAX),
            ("Email", &self.email, EMAIL_MAX),
            ("Dietary requirements", &self.dietary, DIETARY_MAX),
            ("Notes", &self.notes, NOTES_MAX),
        ];
        for (field, value, max) in rules {
            if value.chars().count() > max {
                return Err(RsvpError::FieldTooLong { field, max });
            }
        }
        for guest in &self.guests {
            if guest.name.chars().count() > NAME_MAX {
                return Err(RsvpError::FieldTooLong { field: "Guest name", max: NAME_MAX });
            }
            if guest.dietary.chars().count() > DIETARY_MAX {
                return Err(RsvpError::FieldTooLong {
                    field: "Guest dietary requirements",
                    max: DIETARY_MAX,
                });
            }
        }
        Ok(())
    }

    /// Non-blank guest names, each paired with the dietary note at the same position.
    pub fn cleaned_guests(&self) -> Vec<NewGuest> {
        self.guests
            .iter()
            .filter_map(|line| {
                non_blank(&line.name).map(|place_card_name| NewGuest {
                    place_card_name,
                    dietary: non_blank(&line.dietary),
                })
            })
            .collect()
    }

    pub fn plan_household(
        &self,
        access_name: Option<&str>,
        max_guests: usize,
    ) -> Result<HouseholdUpdate, RsvpError> {
        self.validate()?;

        let reception = self.reception();
        let attending_reception = self.attending_reception();
        let attending_anything = self.attending_anything();

        let guests = if attending_reception {
            let cleaned = self.cleaned_guests();
            if cleaned.len() > max_guests {
                return Err(RsvpError::TooManyGuests { max: max_guests });
            }
            cleaned
        } else {
            Vec::new()
        };

        Ok(HouseholdUpdate {
            place_card_name: if attending_reception {
                non_blank(&self.place_card_name).or_else(|| access_name.map(str::to_string))
            } else {
                None
            },
            email: non_blank(&self.email),
            dietary: if attending_reception { non_blank(&self.dietary) } else { None },
            ceremony: self.ceremony(),
            reception,
            transport: self.transport(),
            printed_invite: self.printed_invite(),
            notes: if attending_anything { non_blank(&self.notes) } else { None },
            guests,
        })
    }

    pub fn plan_linked_guest(&self, access_name: Option<&str>) -> Result<LinkedGuestUpdate, RsvpError> {
        self.validate()?;

        let fallback = access_name.map(str::to_string);
        if self.attending_reception() {
            Ok(LinkedGuestUpdate {
                place_card_name: non_blank(&self.place_card_name).or(fallback),
                dietary: non_blank(&self.dietary),
            })
        } else {
            Ok(LinkedGuestUpdate { place_card_name: fallback, dietary: None })
        }
    }

    pub fn confirmation(&self, access_name: Option<&str>) -> Confirmation {
        let name = if self.attending_reception() {
            non_blank(&self.place_card_name)
        } else {
            None
        };
        Confirmation {
            name: name.or_else(|| access_name.map(str::to_string)),
            ceremony: self.ceremony(),
            reception: self.reception(),
            transport: self.transport(),
            printed_invite: self.printed_invite(),
        }
    }
}

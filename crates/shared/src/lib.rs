//! Domain rules shared by the wedding site: roles, access tokens, RSVP
//! reconciliation and the admin duplicate heuristic. No I/O lives here.

pub mod dupes;
pub mod role;
pub mod rsvp;
pub mod token;

pub use dupes::{flag_duplicates, DupeFlag, NamedRow};
pub use role::Role;
pub use rsvp::{
    yes_no, yes_no_label, Confirmation, GuestLine, HouseholdUpdate, LinkedGuestUpdate, NewGuest,
    RsvpError, RsvpForm,
};
pub use token::AccessToken;

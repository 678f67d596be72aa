use std::fmt;

const TAG: &str = "INV";
const SEPARATOR: char = ':';

/// Invitee identity carried in the signed `acc` cookie.
///
/// The cookie value is `INV:<id>`; anything else is rejected here so the
/// raw string never travels past the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessToken {
    Invite(i64),
}

impl AccessToken {
    pub fn parse(raw: &str) -> Option<Self> {
        let (tag, id) = raw.split_once(SEPARATOR)?;
        if tag != TAG || id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        match id.parse::<i64>() {
            Ok(id) if id > 0 => Some(AccessToken::Invite(id)),
            _ => None,
        }
    }

    pub fn invite_id(&self) -> i64 {
        match self {
            AccessToken::Invite(id) => *id,
        }
    }
}

impl fmt::Display for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessToken::Invite(id) => write!(f, "{}{}{}", TAG, SEPARATOR, id),
        }
    }
}

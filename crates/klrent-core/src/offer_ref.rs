// ── Offer references ──
//
// A vehicle group is only meaningful together with the state it is
// offered in. Detail links carry both as base64 of `"{id}-{state_id}"`,
// the same token the web portal puts in its URLs.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct OfferRef {
    pub id: u64,
    pub state_id: u64,
}

impl OfferRef {
    pub fn new(id: u64, state_id: u64) -> Self {
        Self { id, state_id }
    }

    /// The base64 link token.
    pub fn encode(&self) -> String {
        STANDARD.encode(format!("{}-{}", self.id, self.state_id))
    }

    /// Parse a link token; `None` if it is not one.
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = STANDARD.decode(token.trim()).ok()?;
        let text = String::from_utf8(bytes).ok()?;
        let (id, state_id) = text.split_once('-')?;
        Some(Self {
            id: id.trim().parse().ok()?,
            state_id: state_id.trim().parse().ok()?,
        })
    }
}

impl fmt::Display for OfferRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

/// Accepts a link token or a plain `id-state` pair.
impl FromStr for OfferRef {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some((id, state_id)) = s.split_once('-') {
            if let (Ok(id), Ok(state_id)) = (id.parse(), state_id.parse()) {
                return Ok(Self { id, state_id });
            }
        }
        Self::decode(s).ok_or_else(|| {
            CoreError::validation(format!(
                "{s:?} is not a vehicle reference (expected ID-STATE or a link token)"
            ))
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn encodes_like_the_portal_links() {
        // btoa("4-13")
        assert_eq!(OfferRef::new(4, 13).encode(), "NC0xMw==");
        assert_eq!(OfferRef::decode("NC0xMw=="), Some(OfferRef::new(4, 13)));
    }

    #[test]
    fn malformed_tokens_decode_to_none() {
        assert_eq!(OfferRef::decode("not base64!"), None);
        // btoa("abc")
        assert_eq!(OfferRef::decode("YWJj"), None);
        // btoa("4-x")
        assert_eq!(OfferRef::decode("NC14"), None);
    }

    #[test]
    fn parses_plain_pairs_and_tokens() {
        assert_eq!("7-2".parse::<OfferRef>().unwrap(), OfferRef::new(7, 2));
        assert_eq!("NC0xMw==".parse::<OfferRef>().unwrap(), OfferRef::new(4, 13));
        assert!("garbage".parse::<OfferRef>().is_err());
    }
}

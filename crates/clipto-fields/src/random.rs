//! Random value generation

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{FieldError, Result};

/// Kind of random value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RandomKind {
    /// One decimal digit
    #[default]
    Digit,
    /// One lowercase latin letter
    Latin,
    /// A v4 UUID
    Uuid,
    /// One of the field's options
    Custom,
}

impl RandomKind {
    /// Parse a `type` attribute, falling back to [`RandomKind::Digit`]
    pub fn parse_or_default(id: &str) -> Self {
        match id {
            "latin" => RandomKind::Latin,
            "uuid" => RandomKind::Uuid,
            "custom" => RandomKind::Custom,
            _ => RandomKind::Digit,
        }
    }

    /// Attribute value for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            RandomKind::Digit => "digit",
            RandomKind::Latin => "latin",
            RandomKind::Uuid => "uuid",
            RandomKind::Custom => "custom",
        }
    }

    /// Draw a fresh value
    pub fn generate(&self, options: &[String]) -> Result<String> {
        let mut rng = rand::thread_rng();
        match self {
            RandomKind::Digit => Ok(rng.gen_range(0..10u8).to_string()),
            RandomKind::Latin => Ok(char::from(rng.gen_range(b'a'..=b'z')).to_string()),
            RandomKind::Uuid => Ok(uuid::Uuid::new_v4().to_string()),
            RandomKind::Custom => options.choose(&mut rng).cloned().ok_or_else(|| {
                FieldError::InvalidDefinition("custom random value has no options".to_string())
            }),
        }
    }
}

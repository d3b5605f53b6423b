use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// QR error-correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EcLevel {
    L,
    M,
    Q,
    #[default]
    H,
}

impl EcLevel {
    pub const ALL: [EcLevel; 4] = [EcLevel::L, EcLevel::M, EcLevel::Q, EcLevel::H];

    /// Published recovery capacity, shown verbatim
    pub fn recovery(&self) -> &'static str {
        match self {
            EcLevel::L => "7%",
            EcLevel::M => "15%",
            EcLevel::Q => "25%",
            EcLevel::H => "30%",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            EcLevel::L => "Low",
            EcLevel::M => "Medium",
            EcLevel::Q => "Quartile",
            EcLevel::H => "High",
        }
    }

    pub fn letter(&self) -> char {
        match self {
            EcLevel::L => 'L',
            EcLevel::M => 'M',
            EcLevel::Q => 'Q',
            EcLevel::H => 'H',
        }
    }
}

impl From<EcLevel> for qrcode::EcLevel {
    fn from(level: EcLevel) -> Self {
        match level {
            EcLevel::L => qrcode::EcLevel::L,
            EcLevel::M => qrcode::EcLevel::M,
            EcLevel::Q => qrcode::EcLevel::Q,
            EcLevel::H => qrcode::EcLevel::H,
        }
    }
}

impl FromStr for EcLevel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "l" | "low" => Ok(EcLevel::L),
            "m" | "medium" => Ok(EcLevel::M),
            "q" | "quartile" => Ok(EcLevel::Q),
            "h" | "high" => Ok(EcLevel::H),
            _ => Err(Error::InvalidLevel(s.to_string())),
        }
    }
}

impl fmt::Display for EcLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_table() {
        assert_eq!(EcLevel::L.recovery(), "7%");
        assert_eq!(EcLevel::M.recovery(), "15%");
        assert_eq!(EcLevel::Q.recovery(), "25%");
        assert_eq!(EcLevel::H.recovery(), "30%");
    }

    #[test]
    fn test_parse_letters_and_names() {
        assert_eq!("h".parse::<EcLevel>().unwrap(), EcLevel::H);
        assert_eq!("Quartile".parse::<EcLevel>().unwrap(), EcLevel::Q);
        assert!(matches!("X".parse::<EcLevel>(), Err(Error::InvalidLevel(_))));
    }

    #[test]
    fn test_default_is_high() {
        assert_eq!(EcLevel::default(), EcLevel::H);
    }
}

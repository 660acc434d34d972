//! Non-volatile status conditions

const SLEEP_MASK: u8 = 0b0000_0111;
const POISON_BIT: u8 = 1 << 3;
const BURN_BIT: u8 = 1 << 4;
const FREEZE_BIT: u8 = 1 << 5;
const PARALYSIS_BIT: u8 = 1 << 6;

/// Status condition encoded in the party struct status byte
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Remaining sleep turns (1-7)
    Sleep(u8),
    Poison,
    Burn,
    Freeze,
    Paralysis,
}

impl Status {
    /// Decode the status byte. `None` means healthy.
    pub fn from_byte(byte: u8) -> Option<Self> {
        let sleep = byte & SLEEP_MASK;
        if sleep != 0 {
            Some(Status::Sleep(sleep))
        } else if byte & POISON_BIT != 0 {
            Some(Status::Poison)
        } else if byte & BURN_BIT != 0 {
            Some(Status::Burn)
        } else if byte & FREEZE_BIT != 0 {
            Some(Status::Freeze)
        } else if byte & PARALYSIS_BIT != 0 {
            Some(Status::Paralysis)
        } else {
            None
        }
    }

    /// Short form shown in the party screen
    pub fn abbreviation(&self) -> &'static str {
        match self {
            Status::Sleep(_) => "SLP",
            Status::Poison => "PSN",
            Status::Burn => "BRN",
            Status::Freeze => "FRZ",
            Status::Paralysis => "PAR",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Sleep(_) => "Sleep",
            Status::Poison => "Poison",
            Status::Burn => "Burn",
            Status::Freeze => "Freeze",
            Status::Paralysis => "Paralysis",
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_from_byte() {
        assert_eq!(Status::from_byte(0x00), None);
        assert_eq!(Status::from_byte(0x03), Some(Status::Sleep(3)));
        assert_eq!(Status::from_byte(0x08), Some(Status::Poison));
        assert_eq!(Status::from_byte(0x10), Some(Status::Burn));
        assert_eq!(Status::from_byte(0x20), Some(Status::Freeze));
        assert_eq!(Status::from_byte(0x40), Some(Status::Paralysis));
    }

    #[test]
    fn test_status_sleep_takes_precedence() {
        assert_eq!(Status::from_byte(0x09), Some(Status::Sleep(1)));
    }

    #[test]
    fn test_status_abbreviation() {
        assert_eq!(Status::Paralysis.abbreviation(), "PAR");
        assert_eq!(Status::Sleep(7).abbreviation(), "SLP");
    }
}

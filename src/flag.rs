//! Compilation Flag Module
//!
//! Controls how a pattern is compiled and whether a malformed pattern is fatal.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::CacheError;

// == Flag ==
/// Compilation variant applied to a pattern on a cache miss.
///
/// The raw bit values mirror the layout `POSIX = 2`, `Must = 4`,
/// `MustPOSIX = POSIX | Must`; see [`Flag::from_bits`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Flag {
    /// Standard syntax, malformed patterns return an error.
    #[default]
    Default,
    /// Syntax restricted to POSIX ERE, malformed patterns return an error.
    Posix,
    /// Standard syntax, malformed patterns panic.
    Must,
    /// POSIX syntax, malformed patterns panic.
    MustPosix,
}

impl Flag {
    const POSIX_BIT: u8 = 1 << 1;
    const MUST_BIT: u8 = 1 << 2;

    /// Maps raw flag bits onto a variant. Unrecognised values map to `Default`.
    pub fn from_bits(bits: u8) -> Self {
        match bits {
            b if b == Self::POSIX_BIT => Flag::Posix,
            b if b == Self::MUST_BIT => Flag::Must,
            b if b == Self::POSIX_BIT | Self::MUST_BIT => Flag::MustPosix,
            _ => Flag::Default,
        }
    }

    /// Raw bit value of this flag.
    pub fn bits(self) -> u8 {
        match self {
            Flag::Default => 0,
            Flag::Posix => Self::POSIX_BIT,
            Flag::Must => Self::MUST_BIT,
            Flag::MustPosix => Self::POSIX_BIT | Self::MUST_BIT,
        }
    }

    /// Canonical name used in cache key derivation.
    pub fn name(self) -> &'static str {
        match self {
            Flag::Default => "Default",
            Flag::Posix => "POSIX",
            Flag::Must => "Must",
            Flag::MustPosix => "MustPOSIX",
        }
    }

    /// Whether the pattern must stay within POSIX ERE syntax.
    pub fn is_posix(self) -> bool {
        matches!(self, Flag::Posix | Flag::MustPosix)
    }

    /// Whether compilation failure panics instead of returning an error.
    pub fn is_must(self) -> bool {
        matches!(self, Flag::Must | Flag::MustPosix)
    }
}

impl fmt::Display for Flag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Flag {
    type Err = CacheError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "default" => Ok(Flag::Default),
            "posix" => Ok(Flag::Posix),
            "must" => Ok(Flag::Must),
            "mustposix" | "must_posix" | "must-posix" => Ok(Flag::MustPosix),
            _ => Err(CacheError::UnknownFlag(s.to_string())),
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_names() {
        assert_eq!(Flag::Default.name(), "Default");
        assert_eq!(Flag::Posix.name(), "POSIX");
        assert_eq!(Flag::Must.name(), "Must");
        assert_eq!(Flag::MustPosix.name(), "MustPOSIX");
        assert_eq!(Flag::MustPosix.to_string(), "MustPOSIX");
    }

    #[test]
    fn test_from_bits_is_total() {
        assert_eq!(Flag::from_bits(0), Flag::Default);
        assert_eq!(Flag::from_bits(2), Flag::Posix);
        assert_eq!(Flag::from_bits(4), Flag::Must);
        assert_eq!(Flag::from_bits(6), Flag::MustPosix);

        // Anything else collapses to Default
        for bits in [1u8, 3, 5, 7, 8, 255] {
            assert_eq!(Flag::from_bits(bits), Flag::Default);
        }
    }

    #[test]
    fn test_bits_match_from_bits() {
        for flag in [Flag::Default, Flag::Posix, Flag::Must, Flag::MustPosix] {
            assert_eq!(Flag::from_bits(flag.bits()), flag);
        }
    }

    #[test]
    fn test_flag_predicates() {
        assert!(!Flag::Default.is_posix() && !Flag::Default.is_must());
        assert!(Flag::Posix.is_posix() && !Flag::Posix.is_must());
        assert!(!Flag::Must.is_posix() && Flag::Must.is_must());
        assert!(Flag::MustPosix.is_posix() && Flag::MustPosix.is_must());
    }

    #[test]
    fn test_flag_from_str() {
        assert_eq!("POSIX".parse::<Flag>().unwrap(), Flag::Posix);
        assert_eq!(" must ".parse::<Flag>().unwrap(), Flag::Must);
        assert_eq!("must_posix".parse::<Flag>().unwrap(), Flag::MustPosix);
        assert_eq!("".parse::<Flag>().unwrap(), Flag::Default);
        assert!(matches!(
            "extended".parse::<Flag>(),
            Err(CacheError::UnknownFlag(_))
        ));
    }
}

use std::fmt;
use std::str::FromStr;

use super::{CodecError, TextCodec, serde_via_text};

/// A TLS protocol version as carried in route TLS settings.
///
/// The wire value is the 16-bit protocol number (`0x0301` for TLS 1.0).
/// Numbers outside the named set survive as [`TlsVersion::Unknown`] and
/// cannot be encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TlsVersion {
    /// `TLSv1.0`
    V1_0,
    /// `TLSv1.1`
    V1_1,
    /// `TLSv1.2`
    V1_2,
    /// `TLSv1.3`
    V1_3,
    /// `TLSv1.4`
    V1_4,
    /// Any other protocol number.
    Unknown(u16),
}

impl TlsVersion {
    const TABLE: [(Self, u16, &'static str); 5] = [
        (Self::V1_0, 0x0301, "TLSv1.0"),
        (Self::V1_1, 0x0302, "TLSv1.1"),
        (Self::V1_2, 0x0303, "TLSv1.2"),
        (Self::V1_3, 0x0304, "TLSv1.3"),
        (Self::V1_4, 0x0305, "TLSv1.4"),
    ];

    /// Converts a protocol number.
    #[must_use]
    pub const fn from_u16(value: u16) -> Self {
        match value {
            0x0301 => Self::V1_0,
            0x0302 => Self::V1_1,
            0x0303 => Self::V1_2,
            0x0304 => Self::V1_3,
            0x0305 => Self::V1_4,
            other => Self::Unknown(other),
        }
    }

    /// Returns the protocol number.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        match *self {
            Self::V1_0 => 0x0301,
            Self::V1_1 => 0x0302,
            Self::V1_2 => 0x0303,
            Self::V1_3 => 0x0304,
            Self::V1_4 => 0x0305,
            Self::Unknown(other) => other,
        }
    }

    /// Returns the name, or `None` for unknown protocol numbers.
    #[must_use]
    pub fn as_str(&self) -> Option<&'static str> {
        let number = self.as_u16();
        Self::TABLE
            .iter()
            .find(|(_, n, _)| *n == number)
            .map(|(_, _, name)| *name)
    }

    /// Looks a version up by name.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::UnknownName`] for anything but the five names.
    pub fn from_name(name: &str) -> Result<Self, CodecError> {
        tracing::trace!("TlsVersion::from_name");
        Self::TABLE
            .iter()
            .find(|(_, _, n)| *n == name)
            .map(|(version, _, _)| *version)
            .ok_or_else(|| CodecError::unknown_name("TLSVersion", name))
    }
}

impl From<u16> for TlsVersion {
    fn from(value: u16) -> Self {
        Self::from_u16(value)
    }
}

impl From<TlsVersion> for u16 {
    fn from(value: TlsVersion) -> Self {
        value.as_u16()
    }
}

impl fmt::Display for TlsVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.as_str() {
            Some(name) => f.write_str(name),
            None => write!(f, "unknown TLSVersion 0x{:04x}", self.as_u16()),
        }
    }
}

impl FromStr for TlsVersion {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}

impl TextCodec for TlsVersion {
    fn marshal_text(&self) -> Result<String, CodecError> {
        tracing::trace!("TlsVersion::marshal_text");
        self.as_str()
            .map(String::from)
            .ok_or_else(|| CodecError::unknown_value(self.to_string()))
    }

    fn unmarshal_text(text: &str) -> Result<Self, CodecError> {
        tracing::trace!("TlsVersion::unmarshal_text");
        Self::from_name(text)
    }
}

serde_via_text!(TlsVersion);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip() {
        for (version, number, name) in TlsVersion::TABLE {
            assert_eq!(version.to_string(), name);
            assert_eq!(TlsVersion::from_name(name).unwrap(), version);
            assert_eq!(TlsVersion::from(number), version);
        }
    }

    #[test]
    fn test_unknown_display_and_marshal() {
        let v = TlsVersion::from_u16(0x0300);
        assert_eq!(v, TlsVersion::Unknown(0x0300));
        assert_eq!(v.to_string(), "unknown TLSVersion 0x0300");

        let err = v.marshal_text().unwrap_err();
        assert_eq!(err.to_string(), v.to_string());
    }

    #[test]
    fn test_unknown_name() {
        let err = "SSLv3".parse::<TlsVersion>().unwrap_err();
        assert!(matches!(err, CodecError::UnknownName { type_name: "TLSVersion", .. }));
    }

    #[test]
    fn test_serde_string_form() {
        let json = serde_json::to_string(&TlsVersion::V1_2).unwrap();
        assert_eq!(json, "\"TLSv1.2\"");
        let back: TlsVersion = serde_json::from_str(&json).unwrap();
        assert_eq!(back, TlsVersion::V1_2);
        assert!(serde_json::to_string(&TlsVersion::Unknown(7)).is_err());
    }
}

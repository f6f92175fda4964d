//! Closed enumerations found inside decoded platform variables.
//!
//! All of them share the codec produced by [`EnvEnum`](crate::EnvEnum):
//! the wire name is the text form, and any index past the named set is
//! kept as `Unknown(n)`, renders as `unknown <Type> value nn` and refuses
//! to encode.

use crate::EnvEnum;

/// Permission level granted to a user on an environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum AccessLevel {
    /// `viewer`
    #[env_enum(rename = "viewer")]
    Viewer,
    /// `contributor`
    #[env_enum(rename = "contributor")]
    Contributor,
    /// `admin`
    #[env_enum(rename = "admin")]
    Admin,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

/// Kind of access an [`AccessLevel`] applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum AccessType {
    /// `ssh`
    #[env_enum(rename = "ssh")]
    Ssh,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

/// Backing store of a writable mount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum ApplicationMount {
    /// `local`
    #[env_enum(rename = "local")]
    Local,
    /// `tmp`
    #[env_enum(rename = "tmp")]
    Temp,
    /// `service`
    #[env_enum(rename = "service")]
    Service,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

/// Resource size class of a container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum ServiceSize {
    /// `AUTO`
    #[env_enum(rename = "AUTO")]
    Auto,
    /// `S`
    #[env_enum(rename = "S")]
    Small,
    /// `M`
    #[env_enum(rename = "M")]
    Medium,
    /// `L`
    #[env_enum(rename = "L")]
    Large,
    /// `XL`
    #[env_enum(rename = "XL")]
    ExtraLarge,
    /// `2XL`
    #[env_enum(rename = "2XL")]
    DoubleExtraLarge,
    /// `4XL`
    #[env_enum(rename = "4XL")]
    QuadrupleExtraLarge,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

/// Socket family an application listens on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum SocketFamily {
    /// `tcp`
    #[env_enum(rename = "tcp")]
    Tcp,
    /// `unix`
    #[env_enum(rename = "unix")]
    Unix,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

/// Protocol spoken between the front proxy and the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, EnvEnum)]
pub enum SocketProtocol {
    /// `http`
    #[env_enum(rename = "http")]
    Http,
    /// `fastcgi`
    #[env_enum(rename = "fastcgi")]
    FastCgi,
    /// `uwsgi`
    #[env_enum(rename = "uwsgi")]
    Uwsgi,
    /// An index outside the named set.
    #[env_enum(unknown)]
    Unknown(u8),
}

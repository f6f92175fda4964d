//! The container `name` replaces the ident in messages.

use pshenv::{CodecError, EnvEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnvEnum)]
#[env_enum(name = "DeployState")]
pub enum State {
    #[env_enum(rename = "active")]
    Active,
    #[env_enum(rename = "paused")]
    Paused,
    #[env_enum(unknown)]
    Other(u8),
}

fn main() {
    assert_eq!(State::Other(0x2a).to_string(), "unknown DeployState value 2a");

    let err: CodecError = State::from_name("gone").unwrap_err();
    assert!(err.to_string().contains("DeployState"));
    assert_eq!(State::Paused.as_str(), Some("paused"));
    assert_eq!(State::Other(7).as_str(), None);
}

//! A downstream enum gets the full codec from the derive.

use pshenv::{EnvEnum, TextCodec};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnvEnum)]
pub enum Region {
    #[env_enum(rename = "eu-3")]
    Eu3,
    #[env_enum(rename = "us-2")]
    Us2,
    #[env_enum(unknown)]
    Unknown(u8),
}

fn main() {
    assert_eq!(Region::COUNT, 2);
    assert_eq!(Region::NAMES, ["eu-3", "us-2"]);
    assert_eq!(Region::default(), Region::Eu3);
    assert_eq!(Region::from_index(1), Region::Us2);
    assert_eq!(Region::from_index(9), Region::Unknown(9));
    assert_eq!(Region::Us2.index(), 1);

    assert_eq!("us-2".parse::<Region>().unwrap(), Region::Us2);
    assert_eq!(Region::Eu3.marshal_text().unwrap(), "eu-3");
    assert!(Region::Unknown(9).marshal_text().is_err());
    assert_eq!(Region::Unknown(9).to_string(), "unknown Region value 09");

    let json = pshenv::serde_json::to_string(&Region::Us2).unwrap();
    assert_eq!(json, "\"us-2\"");
}

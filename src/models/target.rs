use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Base58 alphabet, 32 to 44 characters: the textual form of a Solana public key.
const MINT_ADDRESS_PATTERN: &str = r"^[1-9A-HJ-NP-Za-km-z]{32,44}$";

fn mint_address_regex() -> &'static Regex {
    static REGEX: OnceLock<Regex> = OnceLock::new();
    REGEX.get_or_init(|| Regex::new(MINT_ADDRESS_PATTERN).expect("mint address pattern is valid"))
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    #[error("Missing mint address")]
    Empty,

    #[error("Invalid mint address: {value}")]
    InvalidAddress { value: String },
}

/// The on-chain token mint being evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Target {
    mint: String,
}

impl Target {
    pub fn parse(raw: &str) -> Result<Self, TargetError> {
        let mint = raw.trim();
        if mint.is_empty() {
            return Err(TargetError::Empty);
        }
        if !mint_address_regex().is_match(mint) {
            return Err(TargetError::InvalidAddress {
                value: mint.to_string(),
            });
        }
        Ok(Self {
            mint: mint.to_string(),
        })
    }

    pub fn mint(&self) -> &str {
        &self.mint
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.mint)
    }
}

impl FromStr for Target {
    type Err = TargetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Target {
    type Error = TargetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Target> for String {
    fn from(target: Target) -> Self {
        target.mint
    }
}

//! Language and engine targets for syntax lowering.
//!
//! Engines are written in the compact form the bundler understands
//! (`chrome58`, `node12`, `safari11.1`).

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language level the output is written against.
pub const LANGUAGE_TARGET: &str = "esnext";

/// Runtime engines the output must run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EngineName {
    Chrome,
    Edge,
    Firefox,
    Node,
    Safari,
}

impl EngineName {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Chrome => "chrome",
            Self::Edge => "edge",
            Self::Firefox => "firefox",
            Self::Node => "node",
            Self::Safari => "safari",
        }
    }
}

impl FromStr for EngineName {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "chrome" => Ok(Self::Chrome),
            "edge" => Ok(Self::Edge),
            "firefox" => Ok(Self::Firefox),
            "node" => Ok(Self::Node),
            "safari" => Ok(Self::Safari),
            other => Err(Error::InvalidConfig(format!(
                "Unknown engine '{}'. Expected one of: chrome, edge, firefox, node, safari",
                other
            ))),
        }
    }
}

/// An engine plus the minimum version the output must support.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Engine {
    pub name: EngineName,
    pub version: String,
}

impl Engine {
    pub fn new(name: EngineName, version: impl Into<String>) -> Self {
        Self {
            name,
            version: version.into(),
        }
    }
}

impl fmt::Display for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name.as_str(), self.version)
    }
}

impl FromStr for Engine {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        let split = s.find(|c: char| c.is_ascii_digit()).ok_or_else(|| {
            Error::InvalidConfig(format!("Engine '{}' is missing a version (e.g. chrome58)", s))
        })?;
        let (name, version) = s.split_at(split);

        if !version.chars().all(|c| c.is_ascii_digit() || c == '.') || version.ends_with('.') {
            return Err(Error::InvalidConfig(format!(
                "Engine '{}' has an invalid version '{}'",
                s, version
            )));
        }

        Ok(Self::new(name.parse()?, version))
    }
}

impl TryFrom<String> for Engine {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Engine> for String {
    fn from(engine: Engine) -> Self {
        engine.to_string()
    }
}

/// Full target handed to the bundler: the language level plus every engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub engines: Vec<Engine>,
}

impl Target {
    pub fn new(engines: Vec<Engine>) -> Self {
        Self { engines }
    }

    /// Render as the list of target strings, language first.
    pub fn to_target_list(&self) -> Vec<String> {
        std::iter::once(LANGUAGE_TARGET.to_string())
            .chain(self.engines.iter().map(ToString::to_string))
            .collect()
    }
}

impl Default for Target {
    /// chrome58, edge18, firefox57, node12, safari11.
    fn default() -> Self {
        Self::new(vec![
            Engine::new(EngineName::Chrome, "58"),
            Engine::new(EngineName::Edge, "18"),
            Engine::new(EngineName::Firefox, "57"),
            Engine::new(EngineName::Node, "12"),
            Engine::new(EngineName::Safari, "11"),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_engine() {
        let engine: Engine = "chrome58".parse().unwrap();
        assert_eq!(engine.name, EngineName::Chrome);
        assert_eq!(engine.version, "58");

        let engine: Engine = "Safari11.1".parse().unwrap();
        assert_eq!(engine.to_string(), "safari11.1");
    }

    #[test]
    fn test_parse_engine_errors() {
        assert!("chrome".parse::<Engine>().is_err());
        assert!("opera60".parse::<Engine>().is_err());
        assert!("node12.".parse::<Engine>().is_err());
        assert!("node12x".parse::<Engine>().is_err());
    }

    #[test]
    fn test_default_target_list() {
        assert_eq!(
            Target::default().to_target_list(),
            vec!["esnext", "chrome58", "edge18", "firefox57", "node12", "safari11"]
        );
    }
}

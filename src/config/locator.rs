use serde::de::{self, MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use thirtyfour::By;

/// How to find a page element: a location strategy plus an identifier.
///
/// Deserializes from a single-key map, e.g. `{ css: "#timer .ok" }`,
/// `{ id: "id_username" }`, `{ link_text: "Home" }`,
/// `{ xpath: "//button[@type='submit']" }`. The first match is used;
/// uniqueness is not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// Element id attribute.
    Id(String),
    /// Exact visible text of a link.
    LinkText(String),
    /// XPath expression.
    XPath(String),
}

const STRATEGY_NAMES: &[&str] = &["css", "id", "link_text", "xpath"];

impl Locator {
    /// Driver-side representation of this locator.
    pub fn by(&self) -> By {
        match self {
            Self::Css(s) => By::Css(s.as_str()),
            Self::Id(s) => By::Id(s.as_str()),
            Self::LinkText(s) => By::LinkText(s.as_str()),
            Self::XPath(s) => By::XPath(s.as_str()),
        }
    }

    /// The identifier without its strategy.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Css(s) | Self::Id(s) | Self::LinkText(s) | Self::XPath(s) => s,
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css '{}'", s),
            Self::Id(s) => write!(f, "id '{}'", s),
            Self::LinkText(s) => write!(f, "link text '{}'", s),
            Self::XPath(s) => write!(f, "xpath '{}'", s),
        }
    }
}

impl<'de> Deserialize<'de> for Locator {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(LocatorVisitor)
    }
}

struct LocatorVisitor;

impl<'de> Visitor<'de> for LocatorVisitor {
    type Value = Locator;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a locator map with a single strategy key (css, id, link_text or xpath)")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Self::Value, M::Error>
    where
        M: MapAccess<'de>,
    {
        let key: String = map
            .next_key()?
            .ok_or_else(|| de::Error::custom("expected locator strategy key"))?;

        let locator = match key.as_str() {
            "css" => Locator::Css(map.next_value()?),
            "id" => Locator::Id(map.next_value()?),
            "link_text" => Locator::LinkText(map.next_value()?),
            "xpath" => Locator::XPath(map.next_value()?),
            other => return Err(de::Error::unknown_variant(other, STRATEGY_NAMES)),
        };

        if map.next_key::<String>()?.is_some() {
            return Err(de::Error::custom("locator must have exactly one strategy"));
        }

        Ok(locator)
    }
}

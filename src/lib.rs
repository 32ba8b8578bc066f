//! # Yatra
//!
//! Trip planning for Kathmandu and Pokhara: pick an origin, browse destination
//! highlights, assemble an itinerary of flights, hotels, activities and
//! inter-city travel, and price it as a receipt. Activity suggestions come from
//! an LLM chat-completion endpoint when one is configured, with a local
//! keyword matcher as the fallback.

pub mod catalog;
pub mod config;
pub mod logging;
pub mod origin;
pub mod planner;
pub mod receipt;
pub mod recommend;
pub mod travel_api;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul};
use std::str::FromStr;
use thiserror::Error;

// Re-export main types for convenience
pub use catalog::{
    ActivityOption, Catalog, Country, DestinationHighlight, FlightOption, HotelOption,
    TransportMode, TransportOption,
};
pub use config::{Config, ConfigError};
pub use origin::OriginSelection;
pub use planner::TripPlan;
pub use receipt::{LineItem, LineKind, Receipt, ServiceFee};
pub use recommend::{
    Provider, Recommendation, RecommendationResult, RecommendationService, RecommendError,
};
pub use travel_api::{ApiResponse, TravelApi};

/// Error types for the trip planner
#[derive(Error, Debug)]
pub enum TripError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("JSON processing failed: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown destination: {0}")]
    UnknownDestination(String),

    #[error("Unknown country: {0}")]
    UnknownCountry(String),

    #[error("{state} is not a state of {country}")]
    UnknownState { state: String, country: String },

    #[error("No {kind} with id {id}")]
    UnknownOption { kind: &'static str, id: u32 },

    #[error("You have activities in Pokhara. Remove them before removing travel.")]
    TravelRequired,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Recommendation provider error: {0}")]
    RecommendError(#[from] RecommendError),
}

/// The two cities a trip can cover
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Destination {
    Kathmandu,
    Pokhara,
}

impl Destination {
    pub const ALL: [Destination; 2] = [Destination::Kathmandu, Destination::Pokhara];

    /// Lowercase key used by the catalog and cache keys
    pub fn key(self) -> &'static str {
        match self {
            Destination::Kathmandu => "kathmandu",
            Destination::Pokhara => "pokhara",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Destination::Kathmandu => "Kathmandu",
            Destination::Pokhara => "Pokhara",
        }
    }

    /// Airport code shown on travel legs
    pub fn code(self) -> &'static str {
        match self {
            Destination::Kathmandu => "KTM",
            Destination::Pokhara => "PKR",
        }
    }

    /// The other city of the pair
    pub fn other(self) -> Destination {
        match self {
            Destination::Kathmandu => Destination::Pokhara,
            Destination::Pokhara => Destination::Kathmandu,
        }
    }
}

impl fmt::Display for Destination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Destination {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kathmandu" | "ktm" => Ok(Destination::Kathmandu),
            "pokhara" | "pkr" => Ok(Destination::Pokhara),
            _ => Err(TripError::UnknownDestination(s.to_string())),
        }
    }
}

/// An amount of US dollars held in cents
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money {
    cents: i64,
}

impl Money {
    pub const ZERO: Money = Money { cents: 0 };

    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    pub fn from_dollars(dollars: u32) -> Self {
        Self {
            cents: i64::from(dollars) * 100,
        }
    }

    pub fn cents(self) -> i64 {
        self.cents
    }

    pub fn as_dollars(self) -> f64 {
        self.cents as f64 / 100.0
    }

    /// Apply a rate given in basis points, rounding half away from zero to the cent.
    pub fn percent_bps(self, basis_points: u32) -> Money {
        let scaled = self.cents * i64::from(basis_points);
        let rounded = if scaled >= 0 {
            (scaled + 5_000) / 10_000
        } else {
            (scaled - 5_000) / 10_000
        };
        Money { cents: rounded }
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money {
            cents: self.cents + rhs.cents,
        }
    }
}

impl Mul<u32> for Money {
    type Output = Money;

    fn mul(self, rhs: u32) -> Money {
        Money {
            cents: self.cents * i64::from(rhs),
        }
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.cents < 0 { "-" } else { "" };
        let abs = self.cents.unsigned_abs();
        let dollars = (abs / 100).to_string();

        // Group the dollar digits in threes
        let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
        for (i, ch) in dollars.chars().enumerate() {
            if i > 0 && (dollars.len() - i) % 3 == 0 {
                grouped.push(',');
            }
            grouped.push(ch);
        }

        write!(f, "{}${}.{:02}", sign, grouped, abs % 100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_destination_parsing() {
        assert!(matches!("kathmandu".parse::<Destination>(), Ok(Destination::Kathmandu)));
        assert!(matches!("Pokhara".parse::<Destination>(), Ok(Destination::Pokhara)));
        assert!(matches!("KTM".parse::<Destination>(), Ok(Destination::Kathmandu)));
        assert!(matches!("pkr".parse::<Destination>(), Ok(Destination::Pokhara)));
        assert!("lalitpur".parse::<Destination>().is_err());
    }

    #[test]
    fn test_destination_other() {
        assert_eq!(Destination::Kathmandu.other(), Destination::Pokhara);
        assert_eq!(Destination::Pokhara.other(), Destination::Kathmandu);
    }

    #[test]
    fn test_money_display() {
        assert_eq!(Money::from_dollars(0).to_string(), "$0.00");
        assert_eq!(Money::from_dollars(843).to_string(), "$843.00");
        assert_eq!(Money::from_cents(138_764).to_string(), "$1,387.64");
        assert_eq!(Money::from_cents(123_456_789).to_string(), "$1,234,567.89");
        assert_eq!(Money::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn test_money_percent_rounding() {
        assert_eq!(Money::from_dollars(1228).percent_bps(1300), Money::from_cents(15_964));
        // 0.5 cent rounds up
        assert_eq!(Money::from_cents(50).percent_bps(100), Money::from_cents(1));
        assert_eq!(Money::from_cents(49).percent_bps(100), Money::from_cents(0));
        assert_eq!(Money::from_dollars(500).percent_bps(0), Money::ZERO);
    }

    #[test]
    fn test_money_arithmetic() {
        let total: Money = [Money::from_dollars(10), Money::from_dollars(15)].into_iter().sum();
        assert_eq!(total, Money::from_dollars(25));
        assert_eq!(Money::from_dollars(120) * 3, Money::from_dollars(360));
    }
}

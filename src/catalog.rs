//! Built-in travel catalog
//!
//! Every option the planner can offer: international flights into Kathmandu,
//! hotels and activities per city, transport between the two cities, the
//! landing-page highlights and the origin countries. Prices are whole dollars.

use crate::{Destination, Money, TripError};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// International flight into Kathmandu
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlightOption {
    pub id: u32,
    pub airline: String,
    pub price: u32,
    pub from: String,
    pub to: String,
    pub layovers: Vec<String>,
    pub duration: String,
}

impl FlightOption {
    pub fn price(&self) -> Money {
        Money::from_dollars(self.price)
    }

    /// "Layover: DOH" or "Non-stop"
    pub fn layover_summary(&self) -> String {
        if self.layovers.is_empty() {
            "Non-stop".to_string()
        } else {
            format!("Layover: {}", self.layovers.join(", "))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HotelOption {
    pub id: u32,
    pub name: String,
    /// Price per night
    pub price: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub recommended: bool,
}

impl HotelOption {
    pub fn price(&self) -> Money {
        Money::from_dollars(self.price)
    }
}

/// A bookable point of interest. Ids are only unique within a city.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityOption {
    pub id: u32,
    pub name: String,
    pub price: u32,
    pub description: String,
    pub city: Destination,
}

impl ActivityOption {
    pub fn price(&self) -> Money {
        Money::from_dollars(self.price)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransportMode {
    Flight,
    Bus,
}

impl FromStr for TransportMode {
    type Err = TripError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "flight" => Ok(TransportMode::Flight),
            "bus" => Ok(TransportMode::Bus),
            _ => Err(TripError::ParseError(format!("Invalid transport mode: {}", s))),
        }
    }
}

/// Travel between Kathmandu and Pokhara, priced per leg
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportOption {
    pub id: u32,
    #[serde(rename = "type")]
    pub mode: TransportMode,
    pub name: String,
    pub price: u32,
    #[serde(default)]
    pub recommended: bool,
}

impl TransportOption {
    pub fn price(&self) -> Money {
        Money::from_dollars(self.price)
    }
}

/// Landing-page card for a destination
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DestinationHighlight {
    pub name: String,
    pub description: String,
    /// `None` means free entry
    pub price: Option<u32>,
    pub rating: f32,
}

impl DestinationHighlight {
    /// "$10" or "Free"
    pub fn price_label(&self) -> String {
        match self.price {
            Some(price) => format!("${}", price),
            None => "Free".to_string(),
        }
    }
}

/// Origin country with its selectable states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub label: String,
    pub value: String,
    pub states: Vec<String>,
}

/// All options offered by the planner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub flights: Vec<FlightOption>,
    pub kathmandu_hotels: Vec<HotelOption>,
    pub pokhara_hotels: Vec<HotelOption>,
    pub kathmandu_activities: Vec<ActivityOption>,
    pub pokhara_activities: Vec<ActivityOption>,
    pub transport: Vec<TransportOption>,
    pub kathmandu_highlights: Vec<DestinationHighlight>,
    pub pokhara_highlights: Vec<DestinationHighlight>,
    pub countries: Vec<Country>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl Catalog {
    /// The canned data every page and simulated endpoint draws from
    pub fn builtin() -> Self {
        Self {
            flights: vec![
                flight(1, "Qatar Airways", 843, "DOH", "18h 30m"),
                flight(2, "Air India", 864, "DEL", "19h 15m"),
                flight(3, "Emirates", 910, "DXB", "20h 10m"),
            ],
            kathmandu_hotels: vec![
                hotel(1, "Hotel Yak & Yeti", 120, Some("Durbar Marg, Kathmandu"), true),
                hotel(2, "Hotel Shanker", 90, Some("Lazimpat, Kathmandu"), false),
                hotel(3, "Hotel Mulberry", 110, Some("Jyatha, Thamel, Kathmandu"), false),
                hotel(4, "Hotel Himalaya", 80, Some("Kumaripati, Lalitpur"), false),
                hotel(5, "Hotel Moonlight", 70, Some("Paknajol, Thamel, Kathmandu"), false),
            ],
            pokhara_hotels: vec![
                hotel(1, "Temple Tree Resort", 100, None, true),
                hotel(2, "Hotel Barahi", 80, None, false),
                hotel(3, "Fish Tail Lodge", 120, None, false),
            ],
            kathmandu_activities: vec![
                activity(1, "Swayambhu", 10, "Visit the iconic Monkey Temple, a hilltop Buddhist stupa with scenic valley views", Destination::Kathmandu),
                activity(2, "Pashupatinath", 15, "Explore the sacred Hindu temple and its spiritual riverside rituals", Destination::Kathmandu),
                activity(3, "Bhaktapur Durbar Square", 20, "Traditional Newari heritage city with temples, pottery and history", Destination::Kathmandu),
                activity(4, "Basantapur Durbar Square", 12, "Royal palace square with culture, temples and a busy market", Destination::Kathmandu),
            ],
            pokhara_activities: vec![
                activity(1, "Paragliding", 60, "Adventure flying over Fewa lake with mountain views, an adrenaline thrill", Destination::Pokhara),
                activity(2, "Sarangkot", 8, "Sunrise viewpoint and paragliding spot with scenic Himalayan mountain views", Destination::Pokhara),
                activity(3, "Fewa Taal", 5, "Boating and lakeside relaxation on a calm, peaceful lake", Destination::Pokhara),
                activity(4, "Bat Cave", 7, "Exciting walk through a dark limestone cave full of bats", Destination::Pokhara),
            ],
            transport: vec![
                transport(1, TransportMode::Flight, "Buddha Air", 45, true),
                transport(2, TransportMode::Flight, "Yeti Airlines", 40, false),
                transport(3, TransportMode::Bus, "Tourist Bus", 15, true),
                transport(4, TransportMode::Bus, "Local Bus", 8, false),
            ],
            kathmandu_highlights: vec![
                highlight("Swayambhunath Stupa", "Visit the iconic Monkey Temple", Some(10), 4.8),
                highlight("Pashupatinath Temple", "Explore the sacred Hindu temple", Some(5), 4.7),
                highlight("Thamel", "Experience the vibrant nightlife", None, 4.5),
            ],
            pokhara_highlights: vec![
                highlight("Phewa Lake", "Boating and lakeside relaxation", Some(15), 4.9),
                highlight("Sarangkot", "Sunrise and paragliding spot", Some(20), 4.8),
                highlight("Davis Falls", "Scenic waterfall visit", Some(3), 4.6),
            ],
            countries: vec![
                country("United States", "us", &["California", "New York", "Texas", "Florida", "Illinois"]),
                country("India", "india", &["Delhi", "Maharashtra", "Karnataka", "West Bengal", "Tamil Nadu"]),
                country("United Kingdom", "uk", &["England", "Scotland", "Wales", "Northern Ireland"]),
                country("Nepal", "nepal", &["Bagmati", "Gandaki", "Lumbini", "Province 1", "Province 2"]),
                country("Other", "other", &[]),
            ],
        }
    }

    pub fn hotels(&self, city: Destination) -> &[HotelOption] {
        match city {
            Destination::Kathmandu => &self.kathmandu_hotels,
            Destination::Pokhara => &self.pokhara_hotels,
        }
    }

    pub fn activities(&self, city: Destination) -> &[ActivityOption] {
        match city {
            Destination::Kathmandu => &self.kathmandu_activities,
            Destination::Pokhara => &self.pokhara_activities,
        }
    }

    /// Activities of both cities, Kathmandu first
    pub fn all_activities(&self) -> Vec<ActivityOption> {
        Destination::ALL
            .iter()
            .flat_map(|city| self.activities(*city).iter().cloned())
            .collect()
    }

    pub fn highlights(&self, city: Destination) -> &[DestinationHighlight] {
        match city {
            Destination::Kathmandu => &self.kathmandu_highlights,
            Destination::Pokhara => &self.pokhara_highlights,
        }
    }

    pub fn flight(&self, id: u32) -> Result<&FlightOption, TripError> {
        self.flights
            .iter()
            .find(|f| f.id == id)
            .ok_or(TripError::UnknownOption { kind: "flight", id })
    }

    pub fn hotel(&self, city: Destination, id: u32) -> Result<&HotelOption, TripError> {
        self.hotels(city)
            .iter()
            .find(|h| h.id == id)
            .ok_or(TripError::UnknownOption { kind: "hotel", id })
    }

    pub fn activity(&self, city: Destination, id: u32) -> Result<&ActivityOption, TripError> {
        self.activities(city)
            .iter()
            .find(|a| a.id == id)
            .ok_or(TripError::UnknownOption { kind: "activity", id })
    }

    pub fn transport_option(&self, id: u32) -> Result<&TransportOption, TripError> {
        self.transport
            .iter()
            .find(|t| t.id == id)
            .ok_or(TripError::UnknownOption { kind: "transport", id })
    }

    pub fn country(&self, value: &str) -> Option<&Country> {
        self.countries.iter().find(|c| c.value == value)
    }

    /// Cheapest flight, the first one listed on a tie
    pub fn cheapest_flight(&self) -> Option<&FlightOption> {
        self.flights
            .iter()
            .fold(None, |best: Option<&FlightOption>, f| match best {
                Some(b) if b.price <= f.price => Some(b),
                _ => Some(f),
            })
    }

    /// Recommended hotel of a city, else its first hotel
    pub fn default_hotel(&self, city: Destination) -> Option<&HotelOption> {
        let hotels = self.hotels(city);
        hotels.iter().find(|h| h.recommended).or_else(|| hotels.first())
    }

    /// Recommended inter-city transport, else the first option
    pub fn default_transport(&self) -> Option<&TransportOption> {
        self.transport
            .iter()
            .find(|t| t.recommended)
            .or_else(|| self.transport.first())
    }
}

fn flight(id: u32, airline: &str, price: u32, layover: &str, duration: &str) -> FlightOption {
    FlightOption {
        id,
        airline: airline.to_string(),
        price,
        from: "JFK".to_string(),
        to: "KTM".to_string(),
        layovers: vec![layover.to_string()],
        duration: duration.to_string(),
    }
}

fn hotel(id: u32, name: &str, price: u32, address: Option<&str>, recommended: bool) -> HotelOption {
    HotelOption {
        id,
        name: name.to_string(),
        price,
        address: address.map(str::to_string),
        recommended,
    }
}

fn activity(id: u32, name: &str, price: u32, description: &str, city: Destination) -> ActivityOption {
    ActivityOption {
        id,
        name: name.to_string(),
        price,
        description: description.to_string(),
        city,
    }
}

fn transport(id: u32, mode: TransportMode, name: &str, price: u32, recommended: bool) -> TransportOption {
    TransportOption {
        id,
        mode,
        name: name.to_string(),
        price,
        recommended,
    }
}

fn highlight(name: &str, description: &str, price: Option<u32>, rating: f32) -> DestinationHighlight {
    DestinationHighlight {
        name: name.to_string(),
        description: description.to_string(),
        price,
        rating,
    }
}

fn country(label: &str, value: &str, states: &[&str]) -> Country {
    Country {
        label: label.to_string(),
        value: value.to_string(),
        states: states.iter().map(|s| s.to_string()).collect(),
    }
}

//! Simulated travel provider endpoints
//!
//! Flight, hotel, activity and transport searches answer from the built-in
//! catalog after an artificial delay, shaped like the provider responses a
//! real integration would return. Responses are cached per endpoint for a
//! fixed time-to-live.

use crate::catalog::{ActivityOption, Catalog, FlightOption, HotelOption, TransportMode, TransportOption};
use crate::config::Config;
use crate::Destination;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info, instrument};

const FLIGHT_OFFERS_URL: &str = "https://api.amadeus.com/v2/shopping/flight-offers";

/// Envelope shared by every simulated endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub data: T,
    pub meta: Value,
    pub timestamp: DateTime<Utc>,
    pub api_source: String,
}

impl<T> ApiResponse<T> {
    fn new(data: T, meta: Value, api_source: &str) -> Self {
        Self {
            data,
            meta,
            timestamp: Utc::now(),
            api_source: api_source.to_string(),
        }
    }
}

struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
}

/// Time-limited response cache keyed by request parameters
pub struct ApiCache<T> {
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
    ttl: Duration,
}

impl<T: Clone> ApiCache<T> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
        }
    }

    /// Fresh entry for `key`, if any
    pub async fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        entries
            .get(key)
            .filter(|entry| entry.stored_at.elapsed() < self.ttl)
            .map(|entry| entry.data.clone())
    }

    pub async fn set(&self, key: String, data: T) {
        let mut entries = self.entries.write().await;
        entries.insert(
            key,
            CacheEntry {
                data,
                stored_at: Instant::now(),
            },
        );
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

pub struct TravelApi {
    catalog: Arc<Catalog>,
    latency: Duration,
    flights: ApiCache<ApiResponse<Vec<FlightOption>>>,
    hotels: ApiCache<ApiResponse<Vec<HotelOption>>>,
    activities: ApiCache<ApiResponse<Vec<ActivityOption>>>,
    transport: ApiCache<ApiResponse<Vec<TransportOption>>>,
}

impl TravelApi {
    pub fn new(catalog: Arc<Catalog>, latency: Duration, ttl: Duration) -> Self {
        Self {
            catalog,
            latency,
            flights: ApiCache::new(ttl),
            hotels: ApiCache::new(ttl),
            activities: ApiCache::new(ttl),
            transport: ApiCache::new(ttl),
        }
    }

    pub fn from_config(catalog: Arc<Catalog>, config: &Config) -> Self {
        Self::new(catalog, config.simulated_latency, config.cache_ttl)
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn search_flights(
        &self,
        origin: &str,
        destination: &str,
        departure_date: &str,
        return_date: Option<&str>,
    ) -> ApiResponse<Vec<FlightOption>> {
        let cache_key = format!("flights_{}_{}_{}", origin, destination, departure_date);
        if let Some(cached) = self.flights.get(&cache_key).await {
            info!("Flight data retrieved from API cache");
            return cached;
        }

        info!("Fetching flight offers");
        self.simulate_latency().await;

        let flights = self.catalog.flights.clone();
        let mut link = format!(
            "{}?origin={}&destination={}&departureDate={}",
            FLIGHT_OFFERS_URL, origin, destination, departure_date
        );
        if let Some(return_date) = return_date {
            link.push_str(&format!("&returnDate={}", return_date));
        }

        let response = ApiResponse::new(
            flights.clone(),
            json!({
                "count": flights.len(),
                "links": { "self": link },
            }),
            "amadeus_api_v2",
        );

        self.flights.set(cache_key, response.clone()).await;
        info!(flights = flights.len(), "Flight data retrieved");
        response
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn search_hotels(
        &self,
        location: &str,
        check_in: &str,
        check_out: &str,
        guests: u32,
    ) -> ApiResponse<Vec<HotelOption>> {
        let cache_key = format!("hotels_{}_{}_{}", location, check_in, guests);
        if let Some(cached) = self.hotels.get(&cache_key).await {
            info!("Hotel data retrieved from API cache");
            return cached;
        }

        info!("Fetching hotel data");
        self.simulate_latency().await;

        let hotels = location
            .parse::<Destination>()
            .map(|city| self.catalog.hotels(city).to_vec())
            .unwrap_or_default();

        let response = ApiResponse::new(
            hotels.clone(),
            json!({
                "total_count": hotels.len(),
                "location": location,
                "check_in": check_in,
                "check_out": check_out,
                "guests": guests,
            }),
            "booking_com_api",
        );

        self.hotels.set(cache_key, response.clone()).await;
        info!(hotels = hotels.len(), "Hotel data retrieved");
        response
    }

    #[instrument(level = "debug", skip(self))]
    pub async fn search_activities(&self, location: &str, category: &str) -> ApiResponse<Vec<ActivityOption>> {
        let cache_key = format!("activities_{}_{}", location, category);
        if let Some(cached) = self.activities.get(&cache_key).await {
            info!("Activities data retrieved from API cache");
            return cached;
        }

        info!("Fetching activities");
        self.simulate_latency().await;

        let activities = location
            .parse::<Destination>()
            .map(|city| self.catalog.activities(city).to_vec())
            .unwrap_or_default();

        let response = ApiResponse::new(
            activities.clone(),
            json!({
                "location": location,
                "category": category,
                "next_page_token": null,
            }),
            "google_places_api",
        );

        self.activities.set(cache_key, response.clone()).await;
        info!(activities = activities.len(), "Activities data retrieved");
        response
    }

    /// `mode` is `all` or a transport mode name, matched case-insensitively
    #[instrument(level = "debug", skip(self))]
    pub async fn search_transport(&self, from: &str, to: &str, mode: &str) -> ApiResponse<Vec<TransportOption>> {
        let cache_key = format!("transport_{}_{}_{}", from, to, mode);
        if let Some(cached) = self.transport.get(&cache_key).await {
            info!("Transport data retrieved from API cache");
            return cached;
        }

        info!("Fetching transport options");
        self.simulate_latency().await;

        let transport: Vec<TransportOption> = if mode.eq_ignore_ascii_case("all") {
            self.catalog.transport.clone()
        } else {
            match mode.parse::<TransportMode>() {
                Ok(wanted) => self
                    .catalog
                    .transport
                    .iter()
                    .filter(|t| t.mode == wanted)
                    .cloned()
                    .collect(),
                Err(_) => Vec::new(),
            }
        };

        let response = ApiResponse::new(
            transport.clone(),
            json!({
                "from": from,
                "to": to,
                "mode": mode,
                "count": transport.len(),
            }),
            "local_transport_api",
        );

        self.transport.set(cache_key, response.clone()).await;
        info!(options = transport.len(), "Transport data retrieved");
        response
    }

    /// Prime the caches with the most common searches
    pub async fn warm_up(&self) {
        info!("Warming up travel API cache");
        let started = Instant::now();

        tokio::join!(
            self.search_flights("JFK", "KTM", "2025-02-15", Some("2025-02-25")),
            self.search_hotels("kathmandu", "2025-02-15", "2025-02-18", 2),
            self.search_activities("kathmandu", "tourist_attraction"),
            self.search_transport("kathmandu", "pokhara", "all"),
        );

        debug!(duration_ms = started.elapsed().as_millis(), "Cache warm-up finished");
        info!("Travel API cache warmed up with popular destinations");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn api(latency: Duration) -> TravelApi {
        TravelApi::new(Arc::new(Catalog::builtin()), latency, Duration::from_secs(30 * 60))
    }

    #[tokio::test]
    async fn test_search_flights_meta() {
        let api = api(Duration::ZERO);
        let response = api.search_flights("JFK", "KTM", "2025-02-15", None).await;

        assert_eq!(response.data.len(), 3);
        assert_eq!(response.api_source, "amadeus_api_v2");
        assert_eq!(response.meta["count"], 3);
        assert_eq!(
            response.meta["links"]["self"],
            "https://api.amadeus.com/v2/shopping/flight-offers?origin=JFK&destination=KTM&departureDate=2025-02-15"
        );
    }

    #[tokio::test]
    async fn test_search_hotels_unknown_location_is_empty() {
        let api = api(Duration::ZERO);
        let response = api.search_hotels("Lalitpur", "2025-02-15", "2025-02-18", 2).await;
        assert!(response.data.is_empty());
        assert_eq!(response.meta["total_count"], 0);

        let response = api.search_hotels("Pokhara", "2025-02-15", "2025-02-18", 2).await;
        assert_eq!(response.data.len(), 3);
        assert_eq!(response.meta["location"], "Pokhara");
    }

    #[tokio::test]
    async fn test_search_transport_mode_filter() {
        let api = api(Duration::ZERO);

        let all = api.search_transport("kathmandu", "pokhara", "all").await;
        assert_eq!(all.data.len(), 4);

        let buses = api.search_transport("kathmandu", "pokhara", "BUS").await;
        assert_eq!(buses.data.len(), 2);
        assert!(buses.data.iter().all(|t| t.mode == TransportMode::Bus));
        assert_eq!(buses.meta["count"], 2);

        let boats = api.search_transport("kathmandu", "pokhara", "boat").await;
        assert!(boats.data.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_hit_skips_latency() {
        let api = api(Duration::from_secs(1));

        let started = Instant::now();
        let first = api.search_activities("pokhara", "tourist_attraction").await;
        assert!(started.elapsed() >= Duration::from_secs(1));

        let started = Instant::now();
        let second = api.search_activities("pokhara", "tourist_attraction").await;
        assert_eq!(started.elapsed(), Duration::ZERO);
        assert_eq!(first, second);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cache_entries_expire() {
        let cache: ApiCache<u32> = ApiCache::new(Duration::from_secs(60));
        cache.set("k".to_string(), 7).await;
        assert_eq!(cache.get("k").await, Some(7));

        tokio::time::advance(Duration::from_secs(61)).await;
        assert_eq!(cache.get("k").await, None);
        assert_eq!(cache.get("missing").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_warm_up_runs_searches_concurrently() {
        let api = api(Duration::from_secs(1));

        let started = Instant::now();
        api.warm_up().await;
        assert!(started.elapsed() < Duration::from_secs(2));

        assert_eq!(api.flights.len().await, 1);
        assert_eq!(api.hotels.len().await, 1);
        assert_eq!(api.activities.len().await, 1);
        assert_eq!(api.transport.len().await, 1);
    }
}

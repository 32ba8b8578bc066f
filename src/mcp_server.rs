// src/mcp_server.rs

use anyhow::Result;
use rmcp::{
    ServerHandler, ServiceExt,
    model::{ServerCapabilities, ServerInfo},
    schemars, tool,
    transport::stdio,
};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use yatra::logging::init_file_logging;
use yatra::{
    Catalog, Config, Destination, OriginSelection, Provider, RecommendationService, ServiceFee,
    TravelApi, TripError, TripPlan,
};

/// Trip planning MCP server
#[derive(Clone)]
pub struct TripServer {
    config: Config,
    catalog: Arc<Catalog>,
    travel_api: Arc<TravelApi>,
    recommendations: Arc<RecommendationService>,
}

impl TripServer {
    pub fn new(config: Config) -> Result<Self> {
        let catalog = Arc::new(Catalog::builtin());
        let travel_api = Arc::new(TravelApi::from_config(catalog.clone(), &config));
        let recommendations = Arc::new(RecommendationService::new(&config)?);

        Ok(Self {
            config,
            catalog,
            travel_api,
            recommendations,
        })
    }
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct DestinationsParams {
    #[schemars(description = "Origin country: us, india, uk, nepal or other (default: us)")]
    pub country: Option<String>,
    #[schemars(description = "Origin state; defaults to the country's first state")]
    pub state: Option<String>,
    #[schemars(description = "City to show first: kathmandu or pokhara (default: kathmandu)")]
    pub city: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct FlightSearchParams {
    #[schemars(description = "Origin airport code (default: JFK)")]
    pub origin: Option<String>,
    #[schemars(description = "Destination airport code (default: KTM)")]
    pub destination: Option<String>,
    #[schemars(description = "Departure date in YYYY-MM-DD format")]
    pub departure_date: String,
    #[schemars(description = "Return date in YYYY-MM-DD format")]
    pub return_date: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct HotelSearchParams {
    #[schemars(description = "City: kathmandu or pokhara")]
    pub location: String,
    #[schemars(description = "Check-in date in YYYY-MM-DD format")]
    pub check_in: String,
    #[schemars(description = "Check-out date in YYYY-MM-DD format")]
    pub check_out: String,
    #[schemars(description = "Number of guests (default: 2)")]
    pub guests: Option<u32>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct ActivitySearchParams {
    #[schemars(description = "City: kathmandu or pokhara")]
    pub location: String,
    #[schemars(description = "Place category (default: tourist_attraction)")]
    pub category: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct TransportSearchParams {
    #[schemars(description = "Departure city (default: kathmandu)")]
    pub from: Option<String>,
    #[schemars(description = "Arrival city (default: pokhara)")]
    pub to: Option<String>,
    #[schemars(description = "Transport mode: all, flight or bus (default: all)")]
    pub mode: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct RecommendParams {
    #[schemars(description = "Free-text description of what the traveller enjoys")]
    pub preferences: String,
    #[schemars(description = "Only consider activities in this city: kathmandu or pokhara")]
    pub city: Option<String>,
    #[schemars(description = "Preferred provider: deepseek or chatgpt")]
    pub provider: Option<String>,
}

#[derive(Debug, Deserialize, Clone, schemars::JsonSchema)]
pub struct PriceTripParams {
    #[schemars(description = "Flight id (default: cheapest flight)")]
    pub flight_id: Option<u32>,
    #[schemars(description = "Kathmandu hotel id (default: recommended hotel)")]
    pub hotel_id: Option<u32>,
    #[schemars(description = "Nights in Kathmandu (default: 1)")]
    pub nights: Option<u32>,
    #[schemars(description = "Selected Kathmandu activity ids")]
    pub kathmandu_activities: Option<Vec<u32>>,
    #[schemars(description = "Selected Pokhara activity ids; any selection adds the Pokhara leg")]
    pub pokhara_activities: Option<Vec<u32>>,
    #[schemars(description = "Pokhara hotel id (default: recommended hotel)")]
    pub pokhara_hotel_id: Option<u32>,
    #[schemars(description = "Nights in Pokhara (default: 1)")]
    pub pokhara_nights: Option<u32>,
    #[schemars(description = "Kathmandu-Pokhara transport id (default: recommended option)")]
    pub travel_id: Option<u32>,
    #[schemars(description = "Add the service fee (default: true)")]
    pub include_fee: Option<bool>,
}

fn error_json(message: impl std::fmt::Display) -> String {
    serde_json::json!({ "error": message.to_string() }).to_string()
}

fn to_json<T: serde::Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|e| error_json(format!("Failed to serialize results: {}", e)))
}

#[tool(tool_box)]
impl TripServer {
    #[tool(description = "Show the route from an origin country/state and the highlighted sights of Kathmandu and Pokhara, selected city first.")]
    async fn get_destinations(&self, #[tool(aggr)] params: DestinationsParams) -> String {
        info!(
            country = params.country.as_deref().unwrap_or("us"),
            state = params.state.as_deref(),
            city = params.city.as_deref().unwrap_or("kathmandu"),
            "Destinations request received"
        );

        let origin = match build_origin(&self.catalog, &params) {
            Ok(origin) => origin,
            Err(e) => {
                warn!(error = %e, "Invalid destinations request");
                return error_json(e);
            }
        };

        let recommendations: Vec<serde_json::Value> = origin
            .recommendations(&self.catalog)
            .into_iter()
            .map(|(city, highlights)| {
                serde_json::json!({
                    "city": city,
                    "title": format!("Recommended in {}", city.label()),
                    "highlights": highlights,
                })
            })
            .collect();

        to_json(&serde_json::json!({
            "from": origin.origin_display(&self.catalog),
            "to": origin.destination.label(),
            "recommendations": recommendations,
        }))
    }

    #[tool(description = "Search flight offers into Kathmandu. Results are cached for repeated searches.")]
    async fn search_flights(&self, #[tool(aggr)] params: FlightSearchParams) -> String {
        let origin = params.origin.as_deref().unwrap_or("JFK");
        let destination = params.destination.as_deref().unwrap_or("KTM");
        info!(origin, destination, departure_date = %params.departure_date, "Flight search request received");

        let response = self
            .travel_api
            .search_flights(origin, destination, &params.departure_date, params.return_date.as_deref())
            .await;
        to_json(&response)
    }

    #[tool(description = "Search hotels in Kathmandu or Pokhara. Prices are per night.")]
    async fn search_hotels(&self, #[tool(aggr)] params: HotelSearchParams) -> String {
        info!(location = %params.location, "Hotel search request received");
        let response = self
            .travel_api
            .search_hotels(&params.location, &params.check_in, &params.check_out, params.guests.unwrap_or(2))
            .await;
        to_json(&response)
    }

    #[tool(description = "List bookable activities in Kathmandu or Pokhara with prices and descriptions.")]
    async fn search_activities(&self, #[tool(aggr)] params: ActivitySearchParams) -> String {
        info!(location = %params.location, "Activity search request received");
        let category = params.category.as_deref().unwrap_or("tourist_attraction");
        to_json(&self.travel_api.search_activities(&params.location, category).await)
    }

    #[tool(description = "List transport options between Kathmandu and Pokhara, optionally filtered by mode (flight or bus).")]
    async fn search_transport(&self, #[tool(aggr)] params: TransportSearchParams) -> String {
        let from = params.from.as_deref().unwrap_or("kathmandu");
        let to = params.to.as_deref().unwrap_or("pokhara");
        let mode = params.mode.as_deref().unwrap_or("all");
        info!(from, to, mode, "Transport search request received");
        to_json(&self.travel_api.search_transport(from, to, mode).await)
    }

    #[tool(description = "Recommend activities that match free-text traveller preferences. Uses an LLM when configured, otherwise keyword matching.")]
    async fn recommend_activities(&self, #[tool(aggr)] params: RecommendParams) -> String {
        info!(
            preferences = %params.preferences,
            city = params.city.as_deref(),
            "Recommendation request received"
        );

        let preferred = match params.provider.as_deref() {
            Some(p) => match p.parse::<Provider>() {
                Ok(provider) => provider,
                Err(e) => return error_json(e),
            },
            None => self.config.preferred_provider,
        };

        let activities = match params.city.as_deref() {
            Some(city) => match city.parse::<Destination>() {
                Ok(city) => self.catalog.activities(city).to_vec(),
                Err(e) => return error_json(e),
            },
            None => self.catalog.all_activities(),
        };

        match self
            .recommendations
            .get_recommendations(&params.preferences, &activities, preferred)
            .await
        {
            Ok(result) => {
                debug!(source = ?result.source, count = result.recommendations.len(), "Recommendations ready");
                to_json(&result)
            }
            Err(e) => {
                error!("Recommendation failed: {}", e);
                error_json(e)
            }
        }
    }

    #[tool(description = "Price a trip. Unset choices use the defaults: cheapest flight, recommended hotels and transport, one night per city. Returns line items, subtotal, fee and total.")]
    async fn price_trip(&self, #[tool(aggr)] params: PriceTripParams) -> String {
        info!(
            flight_id = params.flight_id,
            hotel_id = params.hotel_id,
            nights = params.nights.unwrap_or(1),
            pokhara_activities = params.pokhara_activities.as_ref().map_or(0, Vec::len),
            "Price trip request received"
        );

        match build_plan(self.catalog.clone(), &params) {
            Ok(plan) => {
                let fee = if params.include_fee.unwrap_or(true) {
                    self.config.service_fee
                } else {
                    ServiceFee::none()
                };
                let receipt = plan.receipt(fee);
                info!(total = %receipt.total(), items = receipt.items.len(), "Trip priced");
                to_json(&receipt.to_json())
            }
            Err(e) => {
                warn!(error = %e, "Could not build trip plan");
                error_json(e)
            }
        }
    }
}

fn build_origin(catalog: &Catalog, params: &DestinationsParams) -> Result<OriginSelection, TripError> {
    let mut origin = OriginSelection::default();
    if let Some(country) = &params.country {
        origin.select_country(catalog, country)?;
    }
    if let Some(state) = &params.state {
        origin.select_state(catalog, state)?;
    }
    if let Some(city) = &params.city {
        origin.select_destination(city.parse::<Destination>()?);
    }
    Ok(origin)
}

fn build_plan(catalog: Arc<Catalog>, params: &PriceTripParams) -> Result<TripPlan, TripError> {
    let mut plan = TripPlan::new(catalog)?;

    if let Some(id) = params.flight_id {
        plan.select_flight(id)?;
    }
    if let Some(id) = params.hotel_id {
        plan.select_hotel(Destination::Kathmandu, id)?;
    }
    if let Some(id) = params.pokhara_hotel_id {
        plan.select_hotel(Destination::Pokhara, id)?;
    }
    if let Some(id) = params.travel_id {
        plan.set_pokhara_travel(Some(id))?;
    }
    plan.set_nights(Destination::Kathmandu, params.nights.unwrap_or(1));
    plan.set_nights(Destination::Pokhara, params.pokhara_nights.unwrap_or(1));

    for id in params.kathmandu_activities.iter().flatten() {
        plan.select_activity(Destination::Kathmandu, *id)?;
    }
    for id in params.pokhara_activities.iter().flatten() {
        plan.select_activity(Destination::Pokhara, *id)?;
    }

    Ok(plan)
}

#[tool(tool_box)]
impl ServerHandler for TripServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some("A trip planning server for Kathmandu and Pokhara. Search flights, hotels, activities and transport, get activity recommendations for traveller preferences, and price a complete itinerary.".into()),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging before anything else
    if let Err(e) = init_file_logging(Path::new("logs"), "yatra-mcp.log") {
        eprintln!("Failed to initialize logging: {}", e);
    }

    info!("Starting MCP trip server");

    let config = Config::from_env()?;
    let server = TripServer::new(config)?;

    let travel_api = server.travel_api.clone();
    tokio::spawn(async move {
        travel_api.warm_up().await;
    });

    let transport = stdio();
    let service = server.serve(transport).await?;

    info!("MCP service started, waiting for requests");

    service.waiting().await?;

    info!("MCP service shutting down");
    Ok(())
}

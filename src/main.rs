//! CLI interface for yatra

use clap::{Parser, Subcommand};
use std::fs;
use std::sync::Arc;
use tracing::debug;
use yatra::logging::init_cli_logging;
use yatra::{
    Catalog, Config, Destination, OriginSelection, Provider, RecommendationService, ServiceFee,
    TravelApi, TripPlan,
};

#[derive(Parser)]
#[command(name = "yatra")]
#[command(about = "Plan and price a trip to Kathmandu and Pokhara")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the route and destination highlights for an origin
    Destinations {
        /// Origin country (us, india, uk, nepal, other)
        #[arg(long, default_value = "us")]
        country: String,
        /// Origin state; defaults to the country's first state
        #[arg(long)]
        state: Option<String>,
        /// City to show first (kathmandu, pokhara)
        #[arg(long, default_value = "kathmandu")]
        city: String,
    },
    /// Query the travel provider endpoints
    Search {
        #[command(subcommand)]
        kind: SearchKind,
    },
    /// Assemble an itinerary and print its receipt
    Plan {
        /// Flight id; defaults to the cheapest flight
        #[arg(long)]
        flight: Option<u32>,
        /// Kathmandu hotel id; defaults to the recommended hotel
        #[arg(long)]
        hotel: Option<u32>,
        /// Nights in Kathmandu
        #[arg(long, default_value = "1")]
        nights: u32,
        /// Kathmandu activity ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        activities: Vec<u32>,
        /// Pokhara activity ids (comma-separated)
        #[arg(long, value_delimiter = ',')]
        pokhara_activities: Vec<u32>,
        /// Pokhara hotel id; defaults to the recommended hotel
        #[arg(long)]
        pokhara_hotel: Option<u32>,
        /// Nights in Pokhara
        #[arg(long, default_value = "1")]
        pokhara_nights: u32,
        /// Kathmandu–Pokhara transport id; defaults to the recommended option
        #[arg(long)]
        travel: Option<u32>,
        /// Select every activity of both cities
        #[arg(long)]
        all_activities: bool,
        /// Leave out the service fee
        #[arg(long)]
        no_fee: bool,
        /// Print the receipt as JSON
        #[arg(long)]
        json: bool,
        /// Output file for JSON results
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Recommend activities for free-text preferences
    Recommend {
        /// What the traveller is looking for
        preferences: String,
        /// Preferred provider (deepseek, chatgpt)
        #[arg(long)]
        provider: Option<String>,
        /// Only consider activities in this city
        #[arg(long)]
        city: Option<String>,
    },
    /// Check which LLM providers are reachable
    CheckApis,
}

#[derive(Subcommand)]
pub enum SearchKind {
    /// Flights into Kathmandu
    Flights {
        #[arg(long, default_value = "JFK")]
        from: String,
        #[arg(long, default_value = "KTM")]
        to: String,
        /// Departure date (YYYY-MM-DD)
        #[arg(short, long)]
        date: String,
        /// Return date (YYYY-MM-DD)
        #[arg(short, long)]
        return_date: Option<String>,
    },
    /// Hotels in a city
    Hotels {
        #[arg(long)]
        location: String,
        #[arg(long)]
        check_in: String,
        #[arg(long)]
        check_out: String,
        #[arg(long, default_value = "2")]
        guests: u32,
    },
    /// Activities in a city
    Activities {
        #[arg(long)]
        location: String,
        #[arg(long, default_value = "tourist_attraction")]
        category: String,
    },
    /// Transport between Kathmandu and Pokhara
    Transport {
        #[arg(long, default_value = "kathmandu")]
        from: String,
        #[arg(long, default_value = "pokhara")]
        to: String,
        /// all, flight or bus
        #[arg(long, default_value = "all")]
        mode: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_cli_logging(cli.verbose);

    let config = Config::from_env()?;
    let catalog = Arc::new(Catalog::builtin());
    debug!(preferred_provider = %config.preferred_provider, "Configuration loaded");

    match cli.command {
        Commands::Destinations { country, state, city } => {
            let mut origin = OriginSelection::default();
            origin.select_country(&catalog, &country)?;
            if let Some(state) = state {
                origin.select_state(&catalog, &state)?;
            }
            origin.select_destination(city.parse::<Destination>()?);

            println!(
                "From {} to {} ✈️",
                origin.origin_display(&catalog),
                origin.destination.label()
            );
            for (city, highlights) in origin.recommendations(&catalog) {
                println!("\nRecommended in {}", city.label());
                for highlight in highlights {
                    println!(
                        "  {:<24} {:<36} {:>6}  {:.1}★",
                        highlight.name,
                        highlight.description,
                        highlight.price_label(),
                        highlight.rating
                    );
                }
            }
        }
        Commands::Search { kind } => {
            let api = TravelApi::from_config(catalog.clone(), &config);
            let json = match kind {
                SearchKind::Flights { from, to, date, return_date } => {
                    serde_json::to_string_pretty(&api.search_flights(&from, &to, &date, return_date.as_deref()).await)?
                }
                SearchKind::Hotels { location, check_in, check_out, guests } => {
                    serde_json::to_string_pretty(&api.search_hotels(&location, &check_in, &check_out, guests).await)?
                }
                SearchKind::Activities { location, category } => {
                    serde_json::to_string_pretty(&api.search_activities(&location, &category).await)?
                }
                SearchKind::Transport { from, to, mode } => {
                    serde_json::to_string_pretty(&api.search_transport(&from, &to, &mode).await)?
                }
            };
            println!("{}", json);
        }
        Commands::Plan {
            flight,
            hotel,
            nights,
            activities,
            pokhara_activities,
            pokhara_hotel,
            pokhara_nights,
            travel,
            all_activities,
            no_fee,
            json,
            output,
        } => {
            let mut plan = TripPlan::new(catalog.clone())?;
            if let Some(id) = flight {
                plan.select_flight(id)?;
            }
            if let Some(id) = hotel {
                plan.select_hotel(Destination::Kathmandu, id)?;
            }
            if let Some(id) = pokhara_hotel {
                plan.select_hotel(Destination::Pokhara, id)?;
            }
            if let Some(id) = travel {
                plan.set_pokhara_travel(Some(id))?;
            }
            plan.set_nights(Destination::Kathmandu, nights);
            plan.set_nights(Destination::Pokhara, pokhara_nights);

            if all_activities {
                plan.select_all_activities(Destination::Kathmandu);
                plan.select_all_activities(Destination::Pokhara);
            }
            for id in activities {
                plan.select_activity(Destination::Kathmandu, id)?;
            }
            for id in pokhara_activities {
                plan.select_activity(Destination::Pokhara, id)?;
            }

            let fee = if no_fee { ServiceFee::none() } else { config.service_fee };
            let receipt = plan.receipt(fee);

            if json || output.is_some() {
                let rendered = serde_json::to_string_pretty(&receipt.to_json())?;
                if let Some(output_file) = output {
                    fs::write(&output_file, &rendered)?;
                    println!("Receipt saved to {}", output_file);
                } else {
                    println!("{}", rendered);
                }
            } else {
                println!("{}", receipt);
            }

            println!("\nTotal Trip Price: {}", receipt.total());
        }
        Commands::Recommend { preferences, provider, city } => {
            let preferred = match provider {
                Some(p) => p.parse::<Provider>()?,
                None => config.preferred_provider,
            };
            let activities = match city {
                Some(city) => catalog.activities(city.parse::<Destination>()?).to_vec(),
                None => catalog.all_activities(),
            };

            let service = RecommendationService::new(&config)?;
            match service.get_recommendations(&preferences, &activities, preferred).await {
                Ok(result) => println!("{}", serde_json::to_string_pretty(&result)?),
                Err(e) => {
                    eprintln!("Error getting recommendations: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Commands::CheckApis => {
            if !config.has_llm_keys() {
                println!("No LLM API keys configured; recommendations use keyword matching");
            }
            let service = RecommendationService::new(&config)?;
            let status = service.test_providers().await;
            println!("DeepSeek: {}", if status.deepseek { "connected" } else { "unavailable" });
            println!("ChatGPT:  {}", if status.chatgpt { "connected" } else { "unavailable" });
        }
    }

    Ok(())
}

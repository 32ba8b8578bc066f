//! Landing-page state: where the traveller comes from and which city they
//! want to see first.

use crate::catalog::{Catalog, Country, DestinationHighlight};
use crate::{Destination, TripError};
use serde::Serialize;
use tracing::debug;

/// Origin country/state plus the chosen arrival city
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OriginSelection {
    pub country: String,
    pub state: Option<String>,
    pub destination: Destination,
}

impl Default for OriginSelection {
    fn default() -> Self {
        Self {
            country: "us".to_string(),
            state: Some("California".to_string()),
            destination: Destination::Kathmandu,
        }
    }
}

impl OriginSelection {
    /// Switch country. The state becomes the country's first state, or none
    /// when the country has no states.
    pub fn select_country(&mut self, catalog: &Catalog, value: &str) -> Result<(), TripError> {
        let country = catalog
            .country(value)
            .ok_or_else(|| TripError::UnknownCountry(value.to_string()))?;

        self.country = country.value.clone();
        self.state = country.states.first().cloned();
        debug!(country = %self.country, state = ?self.state, "Origin country selected");
        Ok(())
    }

    pub fn select_state(&mut self, catalog: &Catalog, state: &str) -> Result<(), TripError> {
        let country = self.country_in(catalog)?;
        if !country.states.iter().any(|s| s == state) {
            return Err(TripError::UnknownState {
                state: state.to_string(),
                country: country.label.clone(),
            });
        }

        self.state = Some(state.to_string());
        Ok(())
    }

    pub fn select_destination(&mut self, destination: Destination) {
        self.destination = destination;
    }

    /// "Texas, United States", or just the country label without a state
    pub fn origin_display(&self, catalog: &Catalog) -> String {
        let Some(country) = catalog.country(&self.country) else {
            return String::new();
        };

        match &self.state {
            Some(state) if !country.states.is_empty() => format!("{}, {}", state, country.label),
            _ => country.label.clone(),
        }
    }

    /// Selected city first, then the other one
    pub fn ordered_destinations(&self) -> [Destination; 2] {
        [self.destination, self.destination.other()]
    }

    /// Highlights grouped by city in display order
    pub fn recommendations<'a>(
        &self,
        catalog: &'a Catalog,
    ) -> Vec<(Destination, &'a [DestinationHighlight])> {
        self.ordered_destinations()
            .into_iter()
            .map(|city| (city, catalog.highlights(city)))
            .collect()
    }

    fn country_in<'a>(&self, catalog: &'a Catalog) -> Result<&'a Country, TripError> {
        catalog
            .country(&self.country)
            .ok_or_else(|| TripError::UnknownCountry(self.country.clone()))
    }
}

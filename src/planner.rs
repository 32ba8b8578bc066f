//! Itinerary selection state
//!
//! A [`TripPlan`] holds the flight, hotels, activities and inter-city travel
//! currently picked for a trip. The Pokhara add-on (travel there and back,
//! a hotel, activities) only counts while at least one Pokhara activity is
//! selected.

use crate::catalog::{ActivityOption, Catalog, FlightOption, HotelOption, TransportOption};
use crate::receipt::{Receipt, ServiceFee};
use crate::{Destination, TripError};
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct TripPlan {
    catalog: Arc<Catalog>,
    flight: FlightOption,
    kathmandu_hotel: HotelOption,
    pokhara_hotel: HotelOption,
    pokhara_travel: Option<TransportOption>,
    kathmandu_nights: u32,
    pokhara_nights: u32,
    kathmandu_activities: BTreeSet<u32>,
    pokhara_activities: BTreeSet<u32>,
}

impl TripPlan {
    /// Start a plan with the cheapest flight, recommended hotels and travel,
    /// one night per city and no activities.
    pub fn new(catalog: Arc<Catalog>) -> Result<Self, TripError> {
        let flight = catalog
            .cheapest_flight()
            .cloned()
            .ok_or_else(|| TripError::InvalidInput("catalog has no flights".to_string()))?;
        let kathmandu_hotel = catalog
            .default_hotel(Destination::Kathmandu)
            .cloned()
            .ok_or_else(|| TripError::InvalidInput("catalog has no Kathmandu hotels".to_string()))?;
        let pokhara_hotel = catalog
            .default_hotel(Destination::Pokhara)
            .cloned()
            .ok_or_else(|| TripError::InvalidInput("catalog has no Pokhara hotels".to_string()))?;
        let pokhara_travel = catalog.default_transport().cloned();

        debug!(
            flight = %flight.airline,
            hotel = %kathmandu_hotel.name,
            "Trip plan created with default selections"
        );

        Ok(Self {
            catalog,
            flight,
            kathmandu_hotel,
            pokhara_hotel,
            pokhara_travel,
            kathmandu_nights: 1,
            pokhara_nights: 1,
            kathmandu_activities: BTreeSet::new(),
            pokhara_activities: BTreeSet::new(),
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn flight(&self) -> &FlightOption {
        &self.flight
    }

    pub fn hotel(&self, city: Destination) -> &HotelOption {
        match city {
            Destination::Kathmandu => &self.kathmandu_hotel,
            Destination::Pokhara => &self.pokhara_hotel,
        }
    }

    pub fn pokhara_travel(&self) -> Option<&TransportOption> {
        self.pokhara_travel.as_ref()
    }

    pub fn nights(&self, city: Destination) -> u32 {
        match city {
            Destination::Kathmandu => self.kathmandu_nights,
            Destination::Pokhara => self.pokhara_nights,
        }
    }

    pub fn select_flight(&mut self, id: u32) -> Result<(), TripError> {
        self.flight = self.catalog.flight(id)?.clone();
        info!(airline = %self.flight.airline, price = self.flight.price, "Flight selected");
        Ok(())
    }

    pub fn select_hotel(&mut self, city: Destination, id: u32) -> Result<(), TripError> {
        let hotel = self.catalog.hotel(city, id)?.clone();
        info!(city = %city, hotel = %hotel.name, price = hotel.price, "Hotel selected");
        match city {
            Destination::Kathmandu => self.kathmandu_hotel = hotel,
            Destination::Pokhara => self.pokhara_hotel = hotel,
        }
        Ok(())
    }

    pub fn set_nights(&mut self, city: Destination, nights: u32) {
        match city {
            Destination::Kathmandu => self.kathmandu_nights = nights,
            Destination::Pokhara => self.pokhara_nights = nights,
        }
    }

    /// Pick the Kathmandu–Pokhara transport, or clear it with `None`.
    /// Clearing is refused while Pokhara activities depend on it.
    pub fn set_pokhara_travel(&mut self, id: Option<u32>) -> Result<(), TripError> {
        match id {
            Some(id) => {
                let option = self.catalog.transport_option(id)?.clone();
                info!(transport = %option.name, price = option.price, "Pokhara travel selected");
                self.pokhara_travel = Some(option);
            }
            None if !self.pokhara_activities.is_empty() => {
                warn!(
                    activities = self.pokhara_activities.len(),
                    "Refusing to remove Pokhara travel while activities are selected"
                );
                return Err(TripError::TravelRequired);
            }
            None => self.pokhara_travel = None,
        }
        Ok(())
    }

    /// Flip an activity in or out of the selection; returns whether it is now selected
    pub fn toggle_activity(&mut self, city: Destination, id: u32) -> Result<bool, TripError> {
        self.catalog.activity(city, id)?;
        let selected = self.selection_mut(city);
        let now_selected = if selected.remove(&id) {
            false
        } else {
            selected.insert(id);
            true
        };
        debug!(city = %city, id, now_selected, "Activity toggled");
        if now_selected {
            self.ensure_travel_for(city);
        }
        Ok(now_selected)
    }

    pub fn select_activity(&mut self, city: Destination, id: u32) -> Result<(), TripError> {
        self.catalog.activity(city, id)?;
        self.selection_mut(city).insert(id);
        self.ensure_travel_for(city);
        Ok(())
    }

    /// Drop an activity if selected; removing an absent one is a no-op
    pub fn remove_activity(&mut self, city: Destination, id: u32) {
        if self.selection_mut(city).remove(&id) {
            debug!(city = %city, id, "Activity removed");
            if city == Destination::Pokhara && self.pokhara_activities.is_empty() {
                debug!("Last Pokhara activity removed, add-on hidden");
            }
        }
    }

    pub fn select_all_activities(&mut self, city: Destination) {
        let ids: Vec<u32> = self.catalog.activities(city).iter().map(|a| a.id).collect();
        self.selection_mut(city).extend(ids);
        self.ensure_travel_for(city);
    }

    pub fn is_activity_selected(&self, city: Destination, id: u32) -> bool {
        self.selection(city).contains(&id)
    }

    /// Selected activities of a city in catalog id order
    pub fn selected_activities(&self, city: Destination) -> Vec<&ActivityOption> {
        self.catalog
            .activities(city)
            .iter()
            .filter(|a| self.selection(city).contains(&a.id))
            .collect()
    }

    /// Whether the Pokhara leg is part of the trip
    pub fn has_pokhara_addon(&self) -> bool {
        !self.pokhara_activities.is_empty()
    }

    pub fn receipt(&self, fee: ServiceFee) -> Receipt {
        Receipt::for_plan(self, fee)
    }

    /// A Pokhara activity brings the default travel back if it was cleared
    fn ensure_travel_for(&mut self, city: Destination) {
        if city == Destination::Pokhara && self.has_pokhara_addon() && self.pokhara_travel.is_none() {
            self.pokhara_travel = self.catalog.default_transport().cloned();
        }
    }

    fn selection(&self, city: Destination) -> &BTreeSet<u32> {
        match city {
            Destination::Kathmandu => &self.kathmandu_activities,
            Destination::Pokhara => &self.pokhara_activities,
        }
    }

    fn selection_mut(&mut self, city: Destination) -> &mut BTreeSet<u32> {
        match city {
            Destination::Kathmandu => &mut self.kathmandu_activities,
            Destination::Pokhara => &mut self.pokhara_activities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> TripPlan {
        TripPlan::new(Arc::new(Catalog::builtin())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let plan = plan();
        assert_eq!(plan.flight().airline, "Qatar Airways");
        assert_eq!(plan.hotel(Destination::Kathmandu).name, "Hotel Yak & Yeti");
        assert_eq!(plan.hotel(Destination::Pokhara).name, "Temple Tree Resort");
        assert_eq!(plan.pokhara_travel().unwrap().name, "Buddha Air");
        assert_eq!(plan.nights(Destination::Kathmandu), 1);
        assert!(plan.selected_activities(Destination::Kathmandu).is_empty());
        assert!(!plan.has_pokhara_addon());
    }

    #[test]
    fn test_empty_catalog_is_rejected() {
        let mut catalog = Catalog::builtin();
        catalog.flights.clear();
        assert!(matches!(
            TripPlan::new(Arc::new(catalog)),
            Err(TripError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_double_toggle_restores_selection() {
        let mut plan = plan();
        plan.select_activity(Destination::Kathmandu, 1).unwrap();
        plan.select_activity(Destination::Kathmandu, 3).unwrap();
        let before: Vec<u32> = plan
            .selected_activities(Destination::Kathmandu)
            .iter()
            .map(|a| a.id)
            .collect();

        for id in 1..=4 {
            let first = plan.toggle_activity(Destination::Kathmandu, id).unwrap();
            let second = plan.toggle_activity(Destination::Kathmandu, id).unwrap();
            assert_ne!(first, second);

            let after: Vec<u32> = plan
                .selected_activities(Destination::Kathmandu)
                .iter()
                .map(|a| a.id)
                .collect();
            assert_eq!(before, after);
        }
    }

    #[test]
    fn test_toggle_unknown_activity() {
        let mut plan = plan();
        assert!(plan.toggle_activity(Destination::Pokhara, 42).is_err());
        assert!(!plan.has_pokhara_addon());
    }

    #[test]
    fn test_remove_last_pokhara_activity_hides_addon() {
        let mut plan = plan();
        plan.select_activity(Destination::Pokhara, 2).unwrap();
        assert!(plan.has_pokhara_addon());

        plan.remove_activity(Destination::Pokhara, 2);
        assert!(!plan.has_pokhara_addon());

        // Removing again is harmless
        plan.remove_activity(Destination::Pokhara, 2);
        assert!(!plan.has_pokhara_addon());
    }

    #[test]
    fn test_travel_required_while_pokhara_activities_selected() {
        let mut plan = plan();
        plan.select_activity(Destination::Pokhara, 1).unwrap();

        let err = plan.set_pokhara_travel(None).unwrap_err();
        assert!(matches!(err, TripError::TravelRequired));
        assert_eq!(
            err.to_string(),
            "You have activities in Pokhara. Remove them before removing travel."
        );
        assert!(plan.pokhara_travel().is_some());

        plan.remove_activity(Destination::Pokhara, 1);
        plan.set_pokhara_travel(None).unwrap();
        assert!(plan.pokhara_travel().is_none());
    }

    #[test]
    fn test_pokhara_activity_restores_cleared_travel() {
        let mut plan = plan();
        plan.set_pokhara_travel(None).unwrap();
        plan.toggle_activity(Destination::Pokhara, 3).unwrap();
        assert_eq!(plan.pokhara_travel().unwrap().name, "Buddha Air");
    }

    #[test]
    fn test_switch_pokhara_travel() {
        let mut plan = plan();
        plan.set_pokhara_travel(Some(3)).unwrap();
        assert_eq!(plan.pokhara_travel().unwrap().name, "Tourist Bus");
        assert!(plan.set_pokhara_travel(Some(10)).is_err());
        assert_eq!(plan.pokhara_travel().unwrap().name, "Tourist Bus");
    }

    #[test]
    fn test_select_all_activities() {
        let mut plan = plan();
        plan.select_all_activities(Destination::Pokhara);
        let names: Vec<&str> = plan
            .selected_activities(Destination::Pokhara)
            .iter()
            .map(|a| a.name.as_str())
            .collect();
        assert_eq!(names, vec!["Paragliding", "Sarangkot", "Fewa Taal", "Bat Cave"]);
    }

    #[test]
    fn test_select_unknown_flight_keeps_current() {
        let mut plan = plan();
        assert!(plan.select_flight(7).is_err());
        assert_eq!(plan.flight().id, 1);

        plan.select_flight(3).unwrap();
        assert_eq!(plan.flight().airline, "Emirates");
    }
}

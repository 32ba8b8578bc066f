//! Trip receipt: the priced line items of a plan and their totals

use crate::planner::TripPlan;
use crate::{Destination, Money};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed service fee applied on top of the subtotal, in basis points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceFee {
    pub basis_points: u32,
}

impl ServiceFee {
    /// 13%
    pub const STANDARD: ServiceFee = ServiceFee { basis_points: 1300 };

    pub fn none() -> Self {
        Self { basis_points: 0 }
    }

    pub fn from_basis_points(basis_points: u32) -> Self {
        Self { basis_points }
    }
}

impl Default for ServiceFee {
    fn default() -> Self {
        Self::STANDARD
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LineKind {
    Flight,
    Hotel,
    Activity,
    Travel,
}

impl fmt::Display for LineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineKind::Flight => "Flight",
            LineKind::Hotel => "Hotel",
            LineKind::Activity => "Activity",
            LineKind::Travel => "Travel",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineItem {
    pub kind: LineKind,
    pub description: String,
    pub unit_price: Money,
    pub quantity: u32,
}

impl LineItem {
    pub fn new(kind: LineKind, description: impl Into<String>, unit_price: Money, quantity: u32) -> Self {
        Self {
            kind,
            description: description.into(),
            unit_price,
            quantity,
        }
    }

    pub fn amount(&self) -> Money {
        self.unit_price * self.quantity
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub items: Vec<LineItem>,
    pub fee: ServiceFee,
}

impl Receipt {
    pub fn new(items: Vec<LineItem>, fee: ServiceFee) -> Self {
        Self { items, fee }
    }

    /// Line items for everything the plan currently selects
    pub fn for_plan(plan: &TripPlan, fee: ServiceFee) -> Self {
        let mut items = Vec::new();

        let flight = plan.flight();
        items.push(LineItem::new(
            LineKind::Flight,
            format!("{} → {} ({})", flight.from, flight.to, flight.airline),
            flight.price(),
            1,
        ));

        let hotel = plan.hotel(Destination::Kathmandu);
        items.push(LineItem::new(
            LineKind::Hotel,
            format!("Kathmandu: {}", hotel.name),
            hotel.price(),
            plan.nights(Destination::Kathmandu),
        ));

        for activity in plan.selected_activities(Destination::Kathmandu) {
            items.push(LineItem::new(LineKind::Activity, activity.name.clone(), activity.price(), 1));
        }

        if plan.has_pokhara_addon() {
            let travel = plan.pokhara_travel();
            if let Some(travel) = travel {
                items.push(LineItem::new(
                    LineKind::Travel,
                    format!("KTM → PKR ({})", travel.name),
                    travel.price(),
                    1,
                ));
            }

            let hotel = plan.hotel(Destination::Pokhara);
            items.push(LineItem::new(
                LineKind::Hotel,
                format!("Pokhara: {}", hotel.name),
                hotel.price(),
                plan.nights(Destination::Pokhara),
            ));

            for activity in plan.selected_activities(Destination::Pokhara) {
                items.push(LineItem::new(LineKind::Activity, activity.name.clone(), activity.price(), 1));
            }

            if let Some(travel) = travel {
                items.push(LineItem::new(
                    LineKind::Travel,
                    format!("PKR → KTM ({})", travel.name),
                    travel.price(),
                    1,
                ));
            }
        }

        Self { items, fee }
    }

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(LineItem::amount).sum()
    }

    pub fn fee_amount(&self) -> Money {
        self.subtotal().percent_bps(self.fee.basis_points)
    }

    pub fn total(&self) -> Money {
        self.subtotal() + self.fee_amount()
    }

    /// JSON view with the computed totals alongside the items
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "items": self.items.iter().map(|item| serde_json::json!({
                "type": item.kind.to_string(),
                "description": item.description,
                "unit_price": item.unit_price.as_dollars(),
                "quantity": item.quantity,
                "amount": item.amount().as_dollars(),
            })).collect::<Vec<_>>(),
            "subtotal": self.subtotal().as_dollars(),
            "fee_percent": f64::from(self.fee.basis_points) / 100.0,
            "fee": self.fee_amount().as_dollars(),
            "total": self.total().as_dollars(),
        })
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Trip Receipt")?;
        for item in &self.items {
            let description = if item.quantity > 1 {
                format!("{} × {}", item.description, item.quantity)
            } else {
                item.description.clone()
            };
            writeln!(f, "  {:<9} {:<44} {:>12}", item.kind, description, item.amount().to_string())?;
        }
        writeln!(f, "  {:<54} {:>12}", "Subtotal", self.subtotal().to_string())?;
        if self.fee.basis_points > 0 {
            let label = format!("Service fee ({}%)", f64::from(self.fee.basis_points) / 100.0);
            writeln!(f, "  {:<54} {:>12}", label, self.fee_amount().to_string())?;
        }
        write!(f, "  {:<54} {:>12}", "Total", self.total().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use std::sync::Arc;

    fn plan() -> TripPlan {
        TripPlan::new(Arc::new(Catalog::builtin())).unwrap()
    }

    #[test]
    fn test_reference_trip_total() {
        let mut plan = plan();
        plan.set_nights(Destination::Kathmandu, 3);
        plan.select_activity(Destination::Kathmandu, 1).unwrap();
        plan.select_activity(Destination::Kathmandu, 2).unwrap();

        let receipt = plan.receipt(ServiceFee::STANDARD);
        assert_eq!(receipt.subtotal(), Money::from_dollars(1228));
        assert_eq!(receipt.fee_amount(), Money::from_cents(15_964));
        assert_eq!(receipt.total(), Money::from_cents(138_764));

        let untaxed = plan.receipt(ServiceFee::none());
        assert_eq!(untaxed.total(), Money::from_dollars(1228));
    }

    #[test]
    fn test_line_order_without_pokhara() {
        let mut plan = plan();
        plan.select_activity(Destination::Kathmandu, 3).unwrap();
        let receipt = plan.receipt(ServiceFee::none());

        let descriptions: Vec<&str> = receipt.items.iter().map(|i| i.description.as_str()).collect();
        assert_eq!(
            descriptions,
            vec!["JFK → KTM (Qatar Airways)", "Kathmandu: Hotel Yak & Yeti", "Bhaktapur Durbar Square"]
        );
    }

    #[test]
    fn test_pokhara_addon_lines() {
        let mut plan = plan();
        plan.select_activity(Destination::Pokhara, 1).unwrap();
        let receipt = plan.receipt(ServiceFee::none());

        let kinds: Vec<LineKind> = receipt.items.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![
                LineKind::Flight,
                LineKind::Hotel,
                LineKind::Travel,
                LineKind::Hotel,
                LineKind::Activity,
                LineKind::Travel,
            ]
        );
        assert_eq!(receipt.items[2].description, "KTM → PKR (Buddha Air)");
        assert_eq!(receipt.items[5].description, "PKR → KTM (Buddha Air)");
        // 843 + 120 + 45 + 100 + 60 + 45
        assert_eq!(receipt.total(), Money::from_dollars(1213));
    }

    #[test]
    fn test_pokhara_hotel_and_travel_ignored_without_activities() {
        let mut plan = plan();
        plan.select_hotel(Destination::Pokhara, 3).unwrap();
        plan.set_pokhara_travel(Some(1)).unwrap();
        let receipt = plan.receipt(ServiceFee::none());
        assert_eq!(receipt.items.len(), 2);
        assert_eq!(receipt.total(), Money::from_dollars(963));
    }

    #[test]
    fn test_total_is_sum_of_items_for_every_selection() {
        let catalog = Arc::new(Catalog::builtin());
        for flight in 1..=3 {
            for hotel in 1..=5 {
                for mask in 0u32..16 {
                    let mut plan = TripPlan::new(catalog.clone()).unwrap();
                    plan.select_flight(flight).unwrap();
                    plan.select_hotel(Destination::Kathmandu, hotel).unwrap();
                    let mut expected = catalog.flight(flight).unwrap().price
                        + catalog.hotel(Destination::Kathmandu, hotel).unwrap().price;
                    for id in 1..=4 {
                        if mask & (1 << (id - 1)) != 0 {
                            plan.select_activity(Destination::Kathmandu, id).unwrap();
                            expected += catalog.activity(Destination::Kathmandu, id).unwrap().price;
                        }
                    }
                    let receipt = plan.receipt(ServiceFee::none());
                    assert_eq!(receipt.total(), Money::from_dollars(expected));
                }
            }
        }
    }

    #[test]
    fn test_receipt_json_totals() {
        let mut plan = plan();
        plan.set_nights(Destination::Kathmandu, 3);
        plan.select_activity(Destination::Kathmandu, 1).unwrap();
        plan.select_activity(Destination::Kathmandu, 2).unwrap();
        let json = plan.receipt(ServiceFee::STANDARD).to_json();

        assert_eq!(json["subtotal"], 1228.0);
        assert_eq!(json["total"], 1387.64);
        assert_eq!(json["items"][1]["quantity"], 3);
        assert_eq!(json["items"][1]["amount"], 360.0);
    }

    #[test]
    fn test_receipt_display() {
        let plan = plan();
        let text = plan.receipt(ServiceFee::STANDARD).to_string();
        assert!(text.starts_with("Trip Receipt"));
        assert!(text.contains("Service fee (13%)"));
        assert!(text.contains("$1,088.19"));
    }
}

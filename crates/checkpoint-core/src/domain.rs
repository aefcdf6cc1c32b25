//! # Crossing Classification
//!
//! How a crossing travels ([`Transport`]) and what it carries
//! ([`PassengerType`]).

use serde::{Deserialize, Serialize};

/// Mode of transport used for a crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transport {
    /// Small vessel.
    Boat,
    /// Large vessel.
    Ship,
    /// Aircraft.
    Airplane,
    /// Passenger road vehicle.
    #[default]
    Car,
    /// Rail.
    Train,
    /// Goods road vehicle.
    Truck,
}

impl Transport {
    /// Return the canonical lower-case name.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Boat => "boat",
            Self::Ship => "ship",
            Self::Airplane => "airplane",
            Self::Car => "car",
            Self::Train => "train",
            Self::Truck => "truck",
        }
    }

    /// Whether this transport travels by road. Traffic reports between
    /// countries only count road crossings.
    pub fn is_road(&self) -> bool {
        matches!(self, Self::Car | Self::Truck)
    }
}

impl std::fmt::Display for Transport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Purpose of travel for people crossing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HumanCategory {
    /// Leisure travel.
    #[default]
    Tourist,
    /// Business travel.
    Professional,
}

/// Cargo description for goods crossing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MerchandiseDetails {
    /// Vehicle carrying the goods (e.g. "semi-trailer").
    pub vehicle_type: String,
    /// Nature of the goods (e.g. "chemicals").
    pub merchandise_type: String,
    /// Declared quantity, free text with unit (e.g. "5465 kg").
    pub quantity: String,
}

/// What a crossing carries: people or goods.
///
/// Serialized with an explicit `kind` discriminant:
///
/// ```json
/// {"kind": "human", "category": "tourist"}
/// {"kind": "merchandise", "vehicle_type": "...", "merchandise_type": "...", "quantity": "..."}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PassengerType {
    /// People travelling.
    Human {
        /// Purpose of travel.
        category: HumanCategory,
    },
    /// Goods in transit.
    Merchandise(MerchandiseDetails),
}

impl PassengerType {
    /// The discriminant of this passenger type.
    pub fn kind(&self) -> PassengerKind {
        match self {
            Self::Human { .. } => PassengerKind::Human,
            Self::Merchandise(_) => PassengerKind::Merchandise,
        }
    }
}

impl Default for PassengerType {
    fn default() -> Self {
        Self::Human {
            category: HumanCategory::default(),
        }
    }
}

/// Discriminant of [`PassengerType`], used by list filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PassengerKind {
    /// Matches [`PassengerType::Human`].
    Human,
    /// Matches [`PassengerType::Merchandise`].
    Merchandise,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_cars_and_trucks_are_road() {
        assert!(Transport::Car.is_road());
        assert!(Transport::Truck.is_road());
        for t in [Transport::Boat, Transport::Ship, Transport::Airplane, Transport::Train] {
            assert!(!t.is_road(), "{t} is not a road transport");
        }
    }

    #[test]
    fn passenger_type_uses_kind_tag() {
        let human = PassengerType::Human {
            category: HumanCategory::Professional,
        };
        let json = serde_json::to_value(&human).unwrap();
        assert_eq!(json["kind"], "human");
        assert_eq!(json["category"], "professional");

        let cargo: PassengerType = serde_json::from_str(
            r#"{"kind":"merchandise","vehicle_type":"semi-trailer","merchandise_type":"chemicals","quantity":"5465 kg"}"#,
        )
        .unwrap();
        assert_eq!(cargo.kind(), PassengerKind::Merchandise);
    }

    #[test]
    fn default_passenger_type_is_tourist() {
        assert_eq!(
            PassengerType::default(),
            PassengerType::Human {
                category: HumanCategory::Tourist
            }
        );
    }
}

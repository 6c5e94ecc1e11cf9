use serde::{Deserialize, Deserializer, Serialize};
use snafu::{OptionExt, ResultExt};
use vessel_core::Mmsi;

use crate::error::{
    AisMessageError,
    ais_message_error::{InvalidMmsiSnafu, MissingMmsiSnafu, ParseMessageSnafu},
};

/// Bounding box covering the whole globe, as `[[min_lat, min_lon], [max_lat, max_lon]]`.
pub const GLOBAL_BOUNDING_BOX: [[f64; 2]; 2] = [[-90.0, -180.0], [90.0, 180.0]];

/// The AIS message types we subscribe to.
#[derive(Deserialize, Serialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum AisMessageType {
    /// Position data emitted by class A transponders.
    PositionReport,
    /// Vessel and voyage related data.
    ShipStaticData,
    /// Reduced precision position data emitted by class B transponders.
    StandardClassBPositionReport,
}

pub const SUBSCRIBED_MESSAGE_TYPES: [AisMessageType; 3] = [
    AisMessageType::PositionReport,
    AisMessageType::ShipStaticData,
    AisMessageType::StandardClassBPositionReport,
];

/// Credential of the aisstream.io api.
#[derive(Clone, PartialEq, Eq, Serialize)]
pub struct ApiKey(String);

/// Sent once on every successful connection.
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionRequest {
    #[serde(rename = "APIKey")]
    pub api_key: ApiKey,
    #[serde(rename = "BoundingBoxes")]
    pub bounding_boxes: Vec<[[f64; 2]; 2]>,
    #[serde(rename = "FilterMessageTypes")]
    pub filter_message_types: Vec<AisMessageType>,
}

/// Envelope of every message received from the stream.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AisStreamMessage {
    #[serde(rename = "MessageType", skip_serializing_if = "Option::is_none")]
    pub message_type: Option<String>,
    #[serde(rename = "MetaData", skip_serializing_if = "Option::is_none")]
    pub meta_data: Option<MetaData>,
    #[serde(rename = "Message", default)]
    pub message: MessageBody,
}

/// Coarse information attached to every message regardless of its type.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MetaData {
    #[serde(rename = "MMSI")]
    pub mmsi: Option<i64>,
    #[serde(rename = "ShipName")]
    pub ship_name: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub time_utc: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageBody {
    #[serde(rename = "PositionReport", skip_serializing_if = "Option::is_none")]
    pub position_report: Option<PositionReport>,
    #[serde(
        rename = "StandardClassBPositionReport",
        skip_serializing_if = "Option::is_none"
    )]
    pub class_b_position_report: Option<PositionReport>,
    #[serde(rename = "ShipStaticData", skip_serializing_if = "Option::is_none")]
    pub ship_static_data: Option<ShipStaticData>,
}

/// Position data that is emitted every few seconds by vessels.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PositionReport {
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(rename = "Latitude")]
    pub latitude: Option<f64>,
    #[serde(rename = "Longitude")]
    pub longitude: Option<f64>,
    #[serde(rename = "Sog")]
    pub speed_over_ground: Option<f64>,
    #[serde(rename = "Cog")]
    pub course_over_ground: Option<f64>,
    #[serde(rename = "TrueHeading")]
    pub true_heading: Option<i32>,
    #[serde(rename = "NavigationalStatus", skip_serializing_if = "Option::is_none")]
    pub navigational_status: Option<i32>,
    #[serde(rename = "NavigationStatus", skip_serializing_if = "Option::is_none")]
    pub navigation_status: Option<i32>,
    #[serde(rename = "RateOfTurn", skip_serializing_if = "Option::is_none")]
    pub rate_of_turn: Option<f64>,
}

/// Vessel related data that is emitted every 6th minute from vessels.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ShipStaticData {
    #[serde(rename = "UserID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(rename = "ImoNumber")]
    pub imo_number: Option<i32>,
    #[serde(rename = "CallSign")]
    pub call_sign: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "Type")]
    pub ship_type: Option<i32>,
    #[serde(rename = "Dimension")]
    pub dimension: Option<StaticDimension>,
    #[serde(rename = "Eta")]
    pub eta: Option<StaticEta>,
    #[serde(rename = "MaximumStaticDraught")]
    pub draught: Option<f64>,
    #[serde(rename = "Destination")]
    pub destination: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct StaticDimension {
    #[serde(rename = "A", default)]
    pub a: i32,
    #[serde(rename = "B", default)]
    pub b: i32,
    #[serde(rename = "C", default)]
    pub c: i32,
    #[serde(rename = "D", default)]
    pub d: i32,
}

#[derive(Debug, Clone, Copy, Default, Deserialize, Serialize)]
pub struct StaticEta {
    #[serde(rename = "Month", default)]
    pub month: u32,
    #[serde(rename = "Day", default)]
    pub day: u32,
    #[serde(rename = "Hour", default)]
    pub hour: u32,
    #[serde(rename = "Minute", default)]
    pub minute: u32,
}

/// The payload of a message, position and static data never arrive in the same message.
#[derive(Debug, Clone)]
pub enum AisMessage {
    Position(PositionReport),
    Static(ShipStaticData),
    Unsupported,
}

/// A message that passed identity checks and is ready for reconciliation.
#[derive(Debug, Clone)]
pub struct ParsedMessage {
    pub mmsi: Mmsi,
    pub meta_data: MetaData,
    pub message: AisMessage,
}

impl ApiKey {
    /// Returns `None` for blank credentials.
    pub fn new(value: impl Into<String>) -> Option<ApiKey> {
        let value = value.into().trim().to_string();
        (!value.is_empty()).then_some(ApiKey(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

impl<'de> Deserialize<'de> for ApiKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        ApiKey::new(value).ok_or_else(|| serde::de::Error::custom("api key is blank"))
    }
}

impl SubscriptionRequest {
    pub fn global(api_key: ApiKey) -> SubscriptionRequest {
        SubscriptionRequest {
            api_key,
            bounding_boxes: vec![GLOBAL_BOUNDING_BOX],
            filter_message_types: SUBSCRIBED_MESSAGE_TYPES.to_vec(),
        }
    }
}

impl PositionReport {
    /// Feeds use both spellings of the navigation status field.
    pub fn navigation_status_code(&self) -> Option<i32> {
        self.navigational_status.or(self.navigation_status)
    }
}

impl TryFrom<AisStreamMessage> for ParsedMessage {
    type Error = AisMessageError;

    fn try_from(value: AisStreamMessage) -> Result<Self, Self::Error> {
        let AisStreamMessage {
            message_type: _,
            meta_data,
            message,
        } = value;

        let meta_data = meta_data.unwrap_or_default();
        let mmsi = meta_data.mmsi.context(MissingMmsiSnafu)?;
        let mmsi = Mmsi::try_from(mmsi).context(InvalidMmsiSnafu)?;

        let MessageBody {
            position_report,
            class_b_position_report,
            ship_static_data,
        } = message;

        let message = match (
            position_report.or(class_b_position_report),
            ship_static_data,
        ) {
            (Some(p), _) => AisMessage::Position(p),
            (None, Some(s)) => AisMessage::Static(s),
            (None, None) => AisMessage::Unsupported,
        };

        Ok(ParsedMessage {
            mmsi,
            meta_data,
            message,
        })
    }
}

pub fn parse_message(message: &str) -> Result<ParsedMessage, AisMessageError> {
    let message: AisStreamMessage = serde_json::from_str(message).context(ParseMessageSnafu)?;
    ParsedMessage::try_from(message)
}

#[cfg(any(test, feature = "test"))]
mod test {
    use super::*;

    impl AisStreamMessage {
        pub fn test_position(mmsi: i64, position: PositionReport) -> AisStreamMessage {
            AisStreamMessage {
                message_type: Some("PositionReport".to_string()),
                meta_data: Some(MetaData::test_default(mmsi)),
                message: MessageBody {
                    position_report: Some(position),
                    ..Default::default()
                },
            }
        }

        pub fn test_class_b_position(mmsi: i64, position: PositionReport) -> AisStreamMessage {
            AisStreamMessage {
                message_type: Some("StandardClassBPositionReport".to_string()),
                meta_data: Some(MetaData::test_default(mmsi)),
                message: MessageBody {
                    class_b_position_report: Some(position),
                    ..Default::default()
                },
            }
        }

        pub fn test_static(mmsi: i64, data: ShipStaticData) -> AisStreamMessage {
            AisStreamMessage {
                message_type: Some("ShipStaticData".to_string()),
                meta_data: Some(MetaData::test_default(mmsi)),
                message: MessageBody {
                    ship_static_data: Some(data),
                    ..Default::default()
                },
            }
        }

        pub fn to_json(&self) -> String {
            serde_json::to_string(self).unwrap()
        }
    }

    impl MetaData {
        pub fn test_default(mmsi: i64) -> MetaData {
            MetaData {
                mmsi: Some(mmsi),
                ship_name: Some("META NAME   ".to_string()),
                latitude: Some(59.9),
                longitude: Some(10.7),
                time_utc: Some("2024-03-07 14:05:00.000000000 +0000 UTC".to_string()),
            }
        }
    }

    impl PositionReport {
        pub fn test_default() -> PositionReport {
            PositionReport {
                user_id: None,
                latitude: Some(60.3913),
                longitude: Some(5.3221),
                speed_over_ground: Some(8.4),
                course_over_ground: Some(123.3),
                true_heading: Some(120),
                navigational_status: None,
                navigation_status: Some(0),
                rate_of_turn: Some(0.0),
            }
        }
    }

    impl ShipStaticData {
        pub fn test_default() -> ShipStaticData {
            ShipStaticData {
                user_id: None,
                imo_number: Some(9_412_345),
                call_sign: Some("LK45  ".to_string()),
                name: Some("SJARKEN   ".to_string()),
                ship_type: Some(30),
                dimension: Some(StaticDimension {
                    a: 10,
                    b: 5,
                    c: 2,
                    d: 3,
                }),
                eta: Some(StaticEta {
                    month: 3,
                    day: 7,
                    hour: 14,
                    minute: 5,
                }),
                draught: Some(4.2),
                destination: Some("BERGEN ".to_string()),
            }
        }
    }
}

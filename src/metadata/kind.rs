use std::fmt;
use super::Value;

/// Record kinds known to the console.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Kind {
    BaseModel,
    User,
    State,
    City,
    Amenity,
    Place,
    Review,
}

impl Kind {
    pub const ALL: [Kind; 7] = [
        Kind::BaseModel,
        Kind::User,
        Kind::State,
        Kind::City,
        Kind::Amenity,
        Kind::Place,
        Kind::Review,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::BaseModel => "BaseModel",
            Kind::User => "User",
            Kind::State => "State",
            Kind::City => "City",
            Kind::Amenity => "Amenity",
            Kind::Place => "Place",
            Kind::Review => "Review",
        }
    }

    /// Looks a kind up by its registry name. Matching is case-sensitive.
    pub fn from_name(name: &str) -> Option<Kind> {
        if name == "BaseRecord" {
            return Some(Kind::BaseModel);
        }
        Kind::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    /// Class-level defaults. Visible through attribute lookup until an
    /// instance assigns its own value, never serialized on their own.
    pub fn default_attributes(&self) -> &'static [(&'static str, DefaultValue)] {
        use DefaultValue::*;
        match self {
            Kind::BaseModel => &[],
            Kind::User => &[
                ("email", Text),
                ("password", Text),
                ("first_name", Text),
                ("last_name", Text),
            ],
            Kind::State => &[("name", Text)],
            Kind::City => &[("state_id", Text), ("name", Text)],
            Kind::Amenity => &[("name", Text)],
            Kind::Place => &[
                ("city_id", Text),
                ("user_id", Text),
                ("name", Text),
                ("description", Text),
                ("number_rooms", Zero),
                ("number_bathrooms", Zero),
                ("max_guest", Zero),
                ("price_by_night", Zero),
                ("latitude", ZeroFloat),
                ("longitude", ZeroFloat),
            ],
            Kind::Review => &[("place_id", Text), ("user_id", Text), ("text", Text)],
        }
    }

    pub fn default_attribute(&self, name: &str) -> Option<Value> {
        self.default_attributes()
            .iter()
            .find(|(attr, _)| *attr == name)
            .map(|(_, default)| default.to_value())
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Default values a kind can declare.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DefaultValue {
    Text,
    Zero,
    ZeroFloat,
}

impl DefaultValue {
    pub fn to_value(self) -> Value {
        match self {
            DefaultValue::Text => Value::String(String::new()),
            DefaultValue::Zero => Value::Integer(0),
            DefaultValue::ZeroFloat => Value::Float(0.0),
        }
    }
}

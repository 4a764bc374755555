//! Cake Configuration
//!
//! Draft payloads are schema-free blobs. They are narrowed into a typed
//! [`CakeConfiguration`] only at the pricing boundary, where every offending
//! field is collected into a single [`ValidationError`].

use std::{fmt, str::FromStr};

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// Kind of product being priced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ProductType {
    /// Full-size celebration cake.
    Cake,

    /// Plated or boxed dessert.
    Dessert,

    /// Cupcakes and other small cakes.
    SmallCake,
}

impl ProductType {
    /// All product types, in catalog order.
    pub const ALL: [ProductType; 3] = [Self::Cake, Self::Dessert, Self::SmallCake];

    /// Wire name of the product type.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Cake => "cake",
            Self::Dessert => "dessert",
            Self::SmallCake => "smallCake",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "cake" | "tort" => Ok(Self::Cake),
            "dessert" => Ok(Self::Dessert),
            "smallCake" | "small_cake" | "keks" => Ok(Self::SmallCake),
            other => Err(other.to_string()),
        }
    }
}

/// Cake covering.
///
/// Values outside the known set are kept as [`Topping::Custom`] so a catalog
/// can still price them; otherwise they resolve to a neutral multiplier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Topping {
    /// Rolled fondant.
    Fondant,

    /// Whipped cream.
    Cream,

    /// Chocolate ganache or glaze.
    Chocolate,

    /// Buttercream.
    Buttercream,

    /// Any other topping name.
    Custom(String),
}

impl Topping {
    /// Parse a topping name, keeping unknown names as [`Topping::Custom`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        match value.to_ascii_lowercase().as_str() {
            "fondant" => Self::Fondant,
            "cream" => Self::Cream,
            "chocolate" => Self::Chocolate,
            "buttercream" => Self::Buttercream,
            _ => Self::Custom(value.to_string()),
        }
    }

    /// Wire name of the topping.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Fondant => "fondant",
            Self::Cream => "cream",
            Self::Chocolate => "chocolate",
            Self::Buttercream => "buttercream",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for Topping {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Topping> for String {
    fn from(value: Topping) -> Self {
        value.as_str().to_string()
    }
}

/// Occasion the cake is ordered for.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum EventType {
    /// Wedding.
    Wedding,

    /// Birthday.
    Birthday,

    /// Corporate event.
    Corporate,

    /// Anniversary.
    Anniversary,

    /// Children's party.
    Kids,

    /// Explicitly "other".
    Other,

    /// Any event name outside the known set.
    Custom(String),
}

impl EventType {
    /// Parse an event name, keeping unknown names as [`EventType::Custom`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        match value.to_ascii_lowercase().as_str() {
            "wedding" => Self::Wedding,
            "birthday" => Self::Birthday,
            "corporate" => Self::Corporate,
            "anniversary" => Self::Anniversary,
            "kids" => Self::Kids,
            "other" => Self::Other,
            _ => Self::Custom(value.to_string()),
        }
    }

    /// Wire name of the event type.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Wedding => "wedding",
            Self::Birthday => "birthday",
            Self::Corporate => "corporate",
            Self::Anniversary => "anniversary",
            Self::Kids => "kids",
            Self::Other => "other",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for EventType {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<EventType> for String {
    fn from(value: EventType) -> Self {
        value.as_str().to_string()
    }
}

/// Decoration complexity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Complexity {
    /// Plain finish.
    Simple,

    /// Standard decoration.
    #[default]
    Medium,

    /// Sculpted or highly detailed decoration.
    Complex,

    /// Any complexity name outside the known set.
    Custom(String),
}

impl Complexity {
    /// Parse a complexity name, keeping unknown names as [`Complexity::Custom`].
    pub fn parse(value: &str) -> Self {
        let value = value.trim();

        match value.to_ascii_lowercase().as_str() {
            "simple" => Self::Simple,
            "medium" => Self::Medium,
            "complex" => Self::Complex,
            _ => Self::Custom(value.to_string()),
        }
    }

    /// Wire name of the complexity.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Simple => "simple",
            Self::Medium => "medium",
            Self::Complex => "complex",
            Self::Custom(name) => name,
        }
    }
}

impl From<String> for Complexity {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<Complexity> for String {
    fn from(value: Complexity) -> Self {
        value.as_str().to_string()
    }
}

/// A single invalid field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending field, as sent by the client.
    pub field: String,

    /// Human-readable explanation.
    pub message: String,
}

impl FieldError {
    /// Create a field error.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Malformed or out-of-range configuration input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidationError {
    fields: SmallVec<[FieldError; 4]>,
}

impl ValidationError {
    /// Create an error for a single field.
    pub fn single(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = Self::default();

        error.push(FieldError::new(field, message));

        error
    }

    /// Record another invalid field.
    pub fn push(&mut self, error: FieldError) {
        self.fields.push(error);
    }

    /// Invalid fields, in the order they were found.
    pub fn fields(&self) -> &[FieldError] {
        &self.fields
    }

    /// Check whether any field was recorded.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Return `Err(self)` when any field was recorded.
    ///
    /// # Errors
    ///
    /// Returns the collected errors when at least one field is invalid.
    pub fn into_result(self) -> Result<(), Self> {
        if self.is_empty() { Ok(()) } else { Err(self) }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("invalid cake configuration")?;

        for (index, field) in self.fields.iter().enumerate() {
            let separator = if index == 0 { ": " } else { "; " };

            write!(f, "{separator}{field}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ValidationError {}

/// Typed cake configuration accepted by the price engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CakeConfiguration {
    /// Product being priced.
    pub product_type: ProductType,

    /// Finished weight in kilograms.
    pub weight_kg: Decimal,

    /// Number of tiers; the first tier carries no surcharge.
    pub layer_count: u32,

    /// Number of fillings; the first filling carries no surcharge.
    pub filling_count: u32,

    /// Covering; `None` prices as neutral.
    pub topping: Option<Topping>,

    /// Occasion; `None` prices as neutral.
    pub event_type: Option<EventType>,

    /// Decoration complexity.
    #[serde(default)]
    pub complexity: Complexity,
}

impl CakeConfiguration {
    /// Create a single-tier, single-filling configuration with defaults.
    pub fn new(product_type: ProductType, weight_kg: Decimal) -> Self {
        Self {
            product_type,
            weight_kg,
            layer_count: 1,
            filling_count: 1,
            topping: None,
            event_type: None,
            complexity: Complexity::default(),
        }
    }

    /// Check the numeric invariants the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] when `weight_kg <= 0` or `layer_count < 1`.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = ValidationError::default();

        if self.weight_kg <= Decimal::ZERO {
            errors.push(FieldError::new("weightKg", "must be greater than zero"));
        }

        if self.layer_count < 1 {
            errors.push(FieldError::new("layerCount", "must be at least 1"));
        }

        errors.into_result()
    }

    /// Narrow an opaque configuration blob into a typed configuration.
    ///
    /// Recognised keys are camelCase (`productType`, `weightKg`, `layerCount`,
    /// `fillingCount`, `topping`, `eventType`, `complexity`); the short names
    /// used by older clients (`type`, `weight`, `layers`, `fillings`, `event`)
    /// are accepted as well. Any other keys are UI state and are ignored.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] listing every missing, ill-typed or
    /// out-of-range field.
    pub fn from_value(value: &Value) -> Result<Self, ValidationError> {
        let Some(object) = value.as_object() else {
            return Err(ValidationError::single("config", "must be an object"));
        };

        let mut errors = ValidationError::default();

        let product_type = read_product_type(object, &mut errors);
        let weight_kg = read_weight(object, &mut errors);
        let layer_count = read_count(object, &["layerCount", "layers"], 1, &mut errors);
        let filling_count = read_count(object, &["fillingCount", "fillings"], 0, &mut errors);

        let topping = read_label(object, &["topping"], &mut errors).map(|s| Topping::parse(&s));
        let event_type =
            read_label(object, &["eventType", "event"], &mut errors).map(|s| EventType::parse(&s));
        let complexity = read_label(object, &["complexity"], &mut errors)
            .map(|s| Complexity::parse(&s))
            .unwrap_or_default();

        match (product_type, weight_kg, layer_count, filling_count) {
            (Some(product_type), Some(weight_kg), Some(layer_count), Some(filling_count))
                if errors.is_empty() =>
            {
                Ok(Self {
                    product_type,
                    weight_kg,
                    layer_count: layer_count.unwrap_or(1),
                    filling_count: filling_count.unwrap_or(1),
                    topping,
                    event_type,
                    complexity,
                })
            }
            _ => Err(errors),
        }
    }
}

/// Find the first present key among `names`, returning the key used.
fn lookup<'a>(object: &'a Map<String, Value>, names: &[&'static str]) -> Option<(&'static str, &'a Value)> {
    names
        .iter()
        .find_map(|name| object.get(*name).filter(|value| !value.is_null()).map(|value| (*name, value)))
}

fn read_product_type(
    object: &Map<String, Value>,
    errors: &mut ValidationError,
) -> Option<ProductType> {
    let Some((field, value)) = lookup(object, &["productType", "type"]) else {
        errors.push(FieldError::new("productType", "is required"));

        return None;
    };

    let Some(raw) = value.as_str() else {
        errors.push(FieldError::new(field, "must be a string"));

        return None;
    };

    match raw.parse::<ProductType>() {
        Ok(product_type) => Some(product_type),
        Err(unknown) => {
            errors.push(FieldError::new(
                field,
                format!("unknown product type \"{unknown}\" (expected cake, dessert or smallCake)"),
            ));

            None
        }
    }
}

fn read_weight(object: &Map<String, Value>, errors: &mut ValidationError) -> Option<Decimal> {
    let Some((field, value)) = lookup(object, &["weightKg", "weight"]) else {
        errors.push(FieldError::new("weightKg", "is required"));

        return None;
    };

    let parsed = match value {
        Value::Number(number) => parse_decimal(&number.to_string()),
        Value::String(text) => parse_decimal(text),
        _ => None,
    };

    match parsed {
        Some(weight) if weight > Decimal::ZERO => Some(weight),
        Some(_) => {
            errors.push(FieldError::new(field, "must be greater than zero"));

            None
        }
        None => {
            errors.push(FieldError::new(field, "must be a decimal number"));

            None
        }
    }
}

/// Read an optional whole-number field. The outer `Option` is `None` when the
/// field is invalid; the inner one is `None` when it is absent.
fn read_count(
    object: &Map<String, Value>,
    names: &[&'static str],
    minimum: u32,
    errors: &mut ValidationError,
) -> Option<Option<u32>> {
    let Some((field, value)) = lookup(object, names) else {
        return Some(None);
    };

    let Some(count) = value.as_i64() else {
        errors.push(FieldError::new(field, "must be a whole number"));

        return None;
    };

    match u32::try_from(count) {
        Ok(count) if count >= minimum => Some(Some(count)),
        _ => {
            errors.push(FieldError::new(field, format!("must be at least {minimum}")));

            None
        }
    }
}

fn read_label(
    object: &Map<String, Value>,
    names: &[&'static str],
    errors: &mut ValidationError,
) -> Option<String> {
    let (field, value) = lookup(object, names)?;

    if let Some(label) = value.as_str() {
        Some(label.to_string())
    } else {
        errors.push(FieldError::new(field, "must be a string"));

        None
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    let text = text.trim();

    Decimal::from_str(text)
        .or_else(|_parse_error| Decimal::from_scientific(text))
        .ok()
}

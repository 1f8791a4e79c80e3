//! Event and source type descriptors.
//!
//! [`EventType`] identifies the shape of an event structurally (base name
//! plus type parameters); [`SourceType`] identifies the publisher nominally
//! by its declared name. Together they form the key for filtered listener
//! selection.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Structural descriptor of an event type.
///
/// Two descriptors are equal when their base names and parameter lists are
/// structurally equal. The textual form (`Display`) feeds deterministic
/// cache-key ordering and logging.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EventType {
    name: String,
    params: Vec<EventType>,
}

impl EventType {
    /// Create an unparameterized event type.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
        }
    }

    /// Create a parameterized event type, e.g. `EntityChanged<Order>`.
    pub fn parameterized(name: impl Into<String>, params: Vec<EventType>) -> Self {
        Self {
            name: name.into(),
            params,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[EventType] {
        &self.params
    }

    /// Whether a listener declaring interest in `self` accepts an event of
    /// type `other`.
    ///
    /// The base names must match. An unparameterized declared type accepts
    /// any parameterization of that base; a parameterized one requires the
    /// parameter lists to be structurally equal. Listeners needing a richer
    /// relation report their support explicitly instead.
    pub fn accepts(&self, other: &EventType) -> bool {
        self.name == other.name && (self.params.is_empty() || self.params == other.params)
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        if !self.params.is_empty() {
            write!(f, "<")?;
            for (i, param) in self.params.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{param}")?;
            }
            write!(f, ">")?;
        }
        Ok(())
    }
}

/// Nominal descriptor of an event source type. Its declared name is its
/// identity.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourceType {
    name: String,
}

impl SourceType {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_declared_type_accepts_any_parameterization() {
        let declared = EventType::new("EntityChanged");
        let concrete = EventType::parameterized("EntityChanged", vec![EventType::new("Order")]);

        assert!(declared.accepts(&concrete));
        assert!(declared.accepts(&EventType::new("EntityChanged")));
    }

    #[test]
    fn parameterized_declared_type_requires_equal_params() {
        let declared = EventType::parameterized("EntityChanged", vec![EventType::new("Order")]);

        assert!(declared.accepts(&declared.clone()));
        assert!(!declared.accepts(&EventType::parameterized(
            "EntityChanged",
            vec![EventType::new("Invoice")]
        )));
        assert!(!declared.accepts(&EventType::new("EntityChanged")));
    }

    #[test]
    fn different_base_names_never_match() {
        assert!(!EventType::new("OrderCreated").accepts(&EventType::new("OrderShipped")));
    }

    #[test]
    fn textual_form_includes_parameters() {
        let nested = EventType::parameterized(
            "EntityChanged",
            vec![EventType::new("Order"), EventType::new("Invoice")],
        );
        assert_eq!(nested.to_string(), "EntityChanged<Order, Invoice>");
        assert_eq!(EventType::new("Tick").to_string(), "Tick");
    }
}

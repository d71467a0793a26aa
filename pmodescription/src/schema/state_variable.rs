use crate::{
    collections::{Described, DescriptionList},
    node::{ElementInfo, NodeKind},
    variable_types::StateVarType,
};

/// Liste `<allowedValueList>` d'une variable d'état
#[derive(Debug, Clone, Default)]
pub struct AllowedValueList {
    element: ElementInfo,
    pub(crate) values: DescriptionList<String>,
}

impl AllowedValueList {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            values: DescriptionList::new(),
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    /// Valeurs autorisées dans l'ordre de déclaration.
    pub fn values(&self) -> &[String] {
        self.values.as_slice()
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Plage `<allowedValueRange>` d'une variable d'état.
///
/// Les bornes sont conservées sous forme textuelle ; les accesseurs numériques
/// retournent `None` quand la valeur est absente ou illisible.
#[derive(Debug, Clone, Default)]
pub struct AllowedValueRange {
    element: ElementInfo,
    pub(crate) minimum: String,
    pub(crate) maximum: String,
    pub(crate) step: String,
}

impl AllowedValueRange {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn minimum(&self) -> Option<&str> {
        non_empty(&self.minimum)
    }

    pub fn maximum(&self) -> Option<&str> {
        non_empty(&self.maximum)
    }

    pub fn step(&self) -> Option<&str> {
        non_empty(&self.step)
    }

    pub fn minimum_as_f64(&self) -> Option<f64> {
        self.minimum().and_then(|v| v.parse().ok())
    }

    pub fn maximum_as_f64(&self) -> Option<f64> {
        self.maximum().and_then(|v| v.parse().ok())
    }

    pub fn step_as_f64(&self) -> Option<f64> {
        self.step().and_then(|v| v.parse().ok())
    }

    /// Vérifie qu'une valeur numérique respecte la plage (bornes incluses).
    ///
    /// Une borne absente n'impose aucune contrainte.
    pub fn is_in_range(&self, value: f64) -> bool {
        self.minimum_as_f64().is_none_or(|min| value >= min)
            && self.maximum_as_f64().is_none_or(|max| value <= max)
    }
}

fn non_empty(value: &str) -> Option<&str> {
    if value.is_empty() { None } else { Some(value) }
}

/// Variable d'état déclarée dans le `<serviceStateTable>`
#[derive(Debug, Clone, Default)]
pub struct StateVariable {
    element: ElementInfo,
    pub(crate) name: String,
    pub(crate) data_type_name: String,
    pub(crate) default_value: Option<String>,
    pub(crate) allowed_values: Option<AllowedValueList>,
    pub(crate) allowed_range: Option<AllowedValueRange>,
}

impl Described for StateVariable {
    const KIND: NodeKind = NodeKind::StateVariable;

    fn identity(&self) -> &str {
        &self.name
    }
}

impl StateVariable {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Nom du type tel que déclaré (éventuellement inconnu).
    pub fn data_type_name(&self) -> &str {
        &self.data_type_name
    }

    /// Type sémantique, `None` si le `<dataType>` est absent ou non standard.
    pub fn data_type(&self) -> Option<StateVarType> {
        StateVarType::from_data_type(&self.data_type_name)
    }

    /// Attribut `sendEvents` (vrai par défaut, comme en UPnP 1.0).
    pub fn send_events(&self) -> bool {
        self.element.bool_attribute("sendEvents", true)
    }

    pub fn multicast(&self) -> bool {
        self.element.bool_attribute("multicast", false)
    }

    pub fn default_value(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    pub fn allowed_values(&self) -> Option<&AllowedValueList> {
        self.allowed_values.as_ref()
    }

    pub fn allowed_range(&self) -> Option<&AllowedValueRange> {
        self.allowed_range.as_ref()
    }

    /// Une variable est énumérée si son type est textuel et qu'elle déclare
    /// au moins une valeur autorisée.
    pub fn is_enumerated(&self) -> bool {
        self.data_type().is_some_and(StateVarType::is_enumerable)
            && self.allowed_values.as_ref().is_some_and(|list| !list.is_empty())
    }
}

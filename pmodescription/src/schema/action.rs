use std::fmt;

use crate::{
    collections::{Described, DescriptionList},
    node::{ElementInfo, NodeKind},
};

/// Sens d'un argument d'action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    In,
    Out,
    #[default]
    Unknown,
}

impl Direction {
    pub fn from_text(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "in" => Direction::In,
            "out" => Direction::Out,
            _ => Direction::Unknown,
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::In => "in",
            Direction::Out => "out",
            Direction::Unknown => "unknown",
        })
    }
}

/// Référence résolue vers une variable de la table d'état du service
/// (indice dans [`ServiceDescription::state_variables`](crate::ServiceDescription::state_variables)).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateVarRef(pub(crate) usize);

impl StateVarRef {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone, Default)]
pub struct Argument {
    element: ElementInfo,
    pub(crate) name: String,
    pub(crate) direction: Direction,
    pub(crate) related_state_variable: String,
    pub(crate) retval: bool,
    pub(crate) related: Option<StateVarRef>,
}

impl Argument {
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

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn is_in(&self) -> bool {
        self.direction == Direction::In
    }

    pub fn is_out(&self) -> bool {
        self.direction == Direction::Out
    }

    /// Nom de la variable d'état liée, tel que déclaré.
    pub fn related_state_variable(&self) -> &str {
        &self.related_state_variable
    }

    /// Référence résolue après construction complète de l'arbre, `None` si la
    /// variable n'existe pas dans la table d'état.
    pub fn related(&self) -> Option<StateVarRef> {
        self.related
    }

    /// Présence d'un élément `<retval/>`.
    pub fn is_retval(&self) -> bool {
        self.retval
    }
}

#[derive(Debug, Clone, Default)]
pub struct Action {
    element: ElementInfo,
    pub(crate) name: String,
    pub(crate) arguments: DescriptionList<Argument>,
}

impl Described for Action {
    const KIND: NodeKind = NodeKind::Action;

    fn identity(&self) -> &str {
        &self.name
    }
}

impl Action {
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

    /// Arguments dans l'ordre de déclaration.
    pub fn arguments(&self) -> &DescriptionList<Argument> {
        &self.arguments
    }

    /// Arguments d'entrée avec leur position parmi les seuls arguments `in`.
    pub fn in_arguments(&self) -> impl Iterator<Item = (usize, &Argument)> {
        self.arguments.iter().filter(|a| a.is_in()).enumerate()
    }

    /// Arguments de sortie avec leur position parmi les seuls arguments `out`.
    pub fn out_arguments(&self) -> impl Iterator<Item = (usize, &Argument)> {
        self.arguments.iter().filter(|a| a.is_out()).enumerate()
    }

    pub fn in_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_in()).count()
    }

    pub fn out_count(&self) -> usize {
        self.arguments.iter().filter(|a| a.is_out()).count()
    }
}

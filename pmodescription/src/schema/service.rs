use tracing::debug;

use crate::{
    builder,
    collections::DescriptionMap,
    errors::DescriptionError,
    node::ElementInfo,
    schema::{Action, Argument, StateVarRef, StateVariable},
};

/// Version de l'architecture UPnP déclarée par `<specVersion>`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpecVersion {
    pub major: u32,
    pub minor: u32,
}

/// Description d'un service (document SCPD).
///
/// Les actions et les variables d'état sont indexées par leur nom. Une fois
/// l'arbre construit, chaque argument porte une référence résolue vers sa
/// variable liée (voir [`Argument::related`]).
#[derive(Debug, Clone, Default)]
pub struct ServiceDescription {
    element: ElementInfo,
    pub(crate) spec_version: SpecVersion,
    pub(crate) actions: DescriptionMap<Action>,
    pub(crate) state_variables: DescriptionMap<StateVariable>,
}

impl ServiceDescription {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    /// Construit la description d'un service à partir d'un document SCPD.
    pub fn parse(xml: &str) -> Result<Self, DescriptionError> {
        builder::parse_service_description(xml)
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn actions(&self) -> &DescriptionMap<Action> {
        &self.actions
    }

    pub fn action(&self, name: &str) -> Option<&Action> {
        self.actions.get(name)
    }

    pub fn state_variables(&self) -> &DescriptionMap<StateVariable> {
        &self.state_variables
    }

    pub fn state_variable(&self, name: &str) -> Option<&StateVariable> {
        self.state_variables.get(name)
    }

    pub fn state_variable_at(&self, reference: StateVarRef) -> Option<&StateVariable> {
        self.state_variables.get_index(reference.index())
    }

    /// Variable d'état liée à un argument, `None` si la référence n'a pas pu
    /// être résolue.
    pub fn related_state_variable(&self, argument: &Argument) -> Option<&StateVariable> {
        argument.related().and_then(|r| self.state_variable_at(r))
    }

    /// Résout les références `relatedStateVariable` de tous les arguments.
    ///
    /// Appelée une fois l'arbre entièrement construit, la table d'état pouvant
    /// être déclarée après la liste des actions.
    pub(crate) fn resolve_references(&mut self) {
        let state_variables = &self.state_variables;
        for action in self.actions.values_mut() {
            let action_name = action.name.clone();
            for argument in action.arguments.iter_mut() {
                argument.related = state_variables
                    .index_of(argument.related_state_variable.trim())
                    .map(StateVarRef);
                if argument.related.is_none() {
                    debug!(
                        action = %action_name,
                        argument = %argument.name,
                        related = %argument.related_state_variable,
                        "Unresolved relatedStateVariable"
                    );
                }
            }
        }
    }
}

//! Nœuds de description.
//!
//! Un nœud est (optionnellement) adossé à un élément XML : [`ElementInfo`]
//! conserve le nom local et les attributs de cet élément et offre des
//! accesseurs qui n'échouent jamais (chaîne vide ou valeur par défaut quand
//! l'attribut est absent). [`NodeKind`] énumère le vocabulaire fermé des
//! éléments reconnus et [`NodePath`] maintient la chaîne des ancêtres pendant
//! la construction de l'arbre.

use std::fmt;

use crate::scanner::Token;

/// Élément XML sous-jacent à un nœud
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ElementInfo {
    name: String,
    attributes: Vec<(String, String)>,
}

impl ElementInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Ajoute ou remplace un attribut.
    pub fn set_attribute(&mut self, key: String, value: String) {
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.attributes.push((key, value)),
        }
    }

    /// Valeur d'un attribut, chaîne vide s'il est absent.
    ///
    /// La recherche est d'abord exacte puis insensible à la casse, les
    /// descriptions des différents constructeurs n'étant pas homogènes.
    pub fn attribute(&self, key: &str) -> &str {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .or_else(|| self.attributes.iter().find(|(k, _)| k.eq_ignore_ascii_case(key)))
            .map(|(_, v)| v.as_str())
            .unwrap_or("")
    }

    pub fn attribute_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        match self.attribute(key) {
            "" => default,
            value => value,
        }
    }

    /// Interprète un attribut booléen UPnP (`yes`/`no`, `true`/`false`, `1`/`0`).
    pub fn bool_attribute(&self, key: &str, default: bool) -> bool {
        parse_upnp_bool(self.attribute(key)).unwrap_or(default)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

/// Convertit une valeur booléenne UPnP, `None` si la valeur n'est pas reconnue.
pub fn parse_upnp_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "yes" | "true" | "1" => Some(true),
        "no" | "false" | "0" => Some(false),
        _ => None,
    }
}

/// Vocabulaire des éléments structurants d'une description UPnP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Scpd,
    SpecVersion,
    ActionList,
    Action,
    ArgumentList,
    Argument,
    ServiceStateTable,
    StateVariable,
    AllowedValueList,
    AllowedValueRange,
    Root,
    Device,
    DeviceList,
    ServiceList,
    Service,
    IconList,
    Icon,
}

impl NodeKind {
    pub fn element_name(self) -> &'static str {
        match self {
            NodeKind::Scpd => "scpd",
            NodeKind::SpecVersion => "specVersion",
            NodeKind::ActionList => "actionList",
            NodeKind::Action => "action",
            NodeKind::ArgumentList => "argumentList",
            NodeKind::Argument => "argument",
            NodeKind::ServiceStateTable => "serviceStateTable",
            NodeKind::StateVariable => "stateVariable",
            NodeKind::AllowedValueList => "allowedValueList",
            NodeKind::AllowedValueRange => "allowedValueRange",
            NodeKind::Root => "root",
            NodeKind::Device => "device",
            NodeKind::DeviceList => "deviceList",
            NodeKind::ServiceList => "serviceList",
            NodeKind::Service => "service",
            NodeKind::IconList => "iconList",
            NodeKind::Icon => "icon",
        }
    }

    fn matches(self, name: &str) -> bool {
        name.eq_ignore_ascii_case(self.element_name())
    }

    /// Le token ouvre-t-il un élément de ce type ?
    pub fn is_start_node(self, token: &Token) -> bool {
        match token {
            Token::Start(element) | Token::Empty(element) => self.matches(element.name()),
            _ => false,
        }
    }

    /// Le token ferme-t-il un élément de ce type ?
    pub fn is_end_node(self, token: &Token) -> bool {
        match token {
            Token::End(name) => self.matches(name),
            _ => false,
        }
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_name())
    }
}

/// Chaîne des ancêtres du nœud en cours de construction
#[derive(Debug, Default, Clone)]
pub struct NodePath {
    stack: Vec<(NodeKind, ElementInfo)>,
}

impl NodePath {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, kind: NodeKind, element: ElementInfo) {
        self.stack.push((kind, element));
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Retourne le nœud situé `generations` niveaux au-dessus du nœud courant.
    ///
    /// `parent_from(0)` est le nœud courant lui-même. `None` quand l'arbre est
    /// moins profond que demandé.
    pub fn parent_from(&self, generations: usize) -> Option<(NodeKind, &ElementInfo)> {
        let index = self.stack.len().checked_sub(generations + 1)?;
        self.stack.get(index).map(|(kind, element)| (*kind, element))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (_, element)) in self.stack.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(element.name())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_attribute_is_empty() {
        let element = ElementInfo::new("stateVariable");
        assert_eq!(element.attribute("sendEvents"), "");
        assert_eq!(element.attribute_or("sendEvents", "yes"), "yes");
        assert!(element.bool_attribute("sendEvents", true));
    }

    #[test]
    fn test_attribute_lookup_ignores_case_as_fallback() {
        let mut element = ElementInfo::new("stateVariable");
        element.set_attribute("SendEvents".to_string(), "No".to_string());
        assert_eq!(element.attribute("sendEvents"), "No");
        assert!(!element.bool_attribute("sendEvents", true));
    }

    #[test]
    fn test_start_and_end_recognition() {
        let start = Token::Start(ElementInfo::new("ActionList"));
        let end = Token::End("actionList".to_string());
        assert!(NodeKind::ActionList.is_start_node(&start));
        assert!(!NodeKind::ActionList.is_end_node(&start));
        assert!(NodeKind::ActionList.is_end_node(&end));
        assert!(!NodeKind::Action.is_start_node(&start));
    }

    #[test]
    fn test_parent_from_walks_up_and_stops() {
        let mut path = NodePath::new();
        path.push(NodeKind::Scpd, ElementInfo::new("scpd"));
        path.push(NodeKind::ActionList, ElementInfo::new("actionList"));
        path.push(NodeKind::Action, ElementInfo::new("action"));

        assert_eq!(path.parent_from(0).map(|(k, _)| k), Some(NodeKind::Action));
        assert_eq!(path.parent_from(2).map(|(k, _)| k), Some(NodeKind::Scpd));
        assert!(path.parent_from(3).is_none());
        assert_eq!(path.to_string(), "scpd/actionList/action");
    }
}

//! Allocation des noms générés.
//!
//! Chaque classe générée possède un [`NameScope`] dans lequel les propriétés,
//! méthodes, événements et types imbriqués sont alloués. Un nom déjà pris
//! reçoit un suffixe numérique (`Mode`, `Mode2`, `Mode3`...) dans l'ordre des
//! demandes, ce qui rend le résultat reproductible.

use std::collections::HashSet;

use pmodescription::urn::short_name;

use crate::syntax::identifiers::sanitize;

#[derive(Debug, Clone)]
pub struct NameScope {
    used: HashSet<String>,
    case_sensitive: bool,
}

impl NameScope {
    /// `case_sensitive` vaut `false` pour les langages dont les
    /// identificateurs ignorent la casse (Visual Basic).
    pub fn new(case_sensitive: bool) -> Self {
        Self {
            used: HashSet::new(),
            case_sensitive,
        }
    }

    fn key(&self, name: &str) -> String {
        if self.case_sensitive {
            name.to_string()
        } else {
            name.to_ascii_lowercase()
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.used.contains(&self.key(name))
    }

    /// Réserve un nom imposé par le gabarit (champ, constructeur...).
    pub fn reserve(&mut self, name: &str) {
        let key = self.key(name);
        self.used.insert(key);
    }

    /// Alloue `base` ou, s'il est pris, la première variante suffixée libre.
    pub fn allocate(&mut self, base: &str) -> String {
        let mut candidate = base.to_string();
        let mut counter = 1;
        while self.contains(&candidate) {
            counter += 1;
            candidate = format!("{base}{counter}");
        }
        self.reserve(&candidate);
        candidate
    }
}

/// `RenderingControlService` pour `urn:schemas-upnp-org:service:RenderingControl:1`.
pub fn default_service_class_name(service_type: &str) -> String {
    format!("{}Service", sanitize(short_name(service_type), false))
}

/// `MediaRendererDevice` pour `urn:schemas-upnp-org:device:MediaRenderer:1`.
pub fn default_device_class_name(device_type: &str) -> String {
    format!("{}Device", sanitize(short_name(device_type), false))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collisions_get_numeric_suffix() {
        let mut scope = NameScope::new(true);
        assert_eq!(scope.allocate("Mode"), "Mode");
        assert_eq!(scope.allocate("Mode"), "Mode2");
        assert_eq!(scope.allocate("Mode"), "Mode3");
        assert_eq!(scope.allocate("mode"), "mode");
    }

    #[test]
    fn test_case_insensitive_scope() {
        let mut scope = NameScope::new(false);
        scope.reserve("Service");
        assert_eq!(scope.allocate("service"), "service2");
        assert!(scope.contains("SERVICE2"));
    }

    #[test]
    fn test_default_class_names() {
        assert_eq!(
            default_service_class_name("urn:schemas-upnp-org:service:AVTransport:1"),
            "AVTransportService"
        );
        assert_eq!(
            default_device_class_name("urn:schemas-upnp-org:device:MediaRenderer:1"),
            "MediaRendererDevice"
        );
        assert_eq!(
            default_device_class_name("urn:schemas-wifialliance-org:device:WFADevice:1"),
            "WFADeviceDevice"
        );
    }
}

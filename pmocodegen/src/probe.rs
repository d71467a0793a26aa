//! Accès à une instance vivante du service.
//!
//! Le générateur de service peut interroger chaque variable d'état avant
//! d'émettre sa propriété. Seule une variable dont la valeur est
//! momentanément inconnue ([`ProbeError::ValueUnknown`]) est considérée comme
//! accessible malgré l'échec de la requête.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProbeError {
    #[error("State variable value is currently unknown")]
    ValueUnknown,

    #[error("{0}")]
    Failed(String),
}

/// Opérations du point de contrôle sur un service distant
pub trait ServiceControl {
    fn query_state_variable(&self, name: &str) -> Result<String, ProbeError>;

    /// Invoque une action ; les valeurs de sortie sont retournées dans
    /// l'ordre des arguments `out`.
    fn invoke_action(&self, name: &str, in_args: &[(String, String)]) -> Result<Vec<String>, ProbeError>;
}

//! Types de nœuds du schéma UPnP.
//!
//! - [`ServiceDescription`] : document SCPD (actions et table d'état)
//! - [`Action`] / [`Argument`] : opérations distantes et leurs paramètres ordonnés
//! - [`StateVariable`], [`AllowedValueList`], [`AllowedValueRange`] : variables
//!   d'état et leurs contraintes
//! - [`DeviceDescription`], [`Device`], [`ServiceReference`], [`Icon`] :
//!   document de description d'un device

mod action;
mod device;
mod service;
mod state_variable;

pub use action::{Action, Argument, Direction, StateVarRef};
pub use device::{Device, DeviceDescription, Icon, ServiceReference};
pub use service::{ServiceDescription, SpecVersion};
pub use state_variable::{AllowedValueList, AllowedValueRange, StateVariable};

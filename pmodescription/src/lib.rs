//! # pmodescription - Arbre de description UPnP
//!
//! Cette crate lit les documents de description UPnP (SCPD d'un service et
//! description d'un device) et en construit un arbre typé, immuable une fois
//! construit.
//!
//! ## Architecture
//!
//! - [`scanner`] : lecture séquentielle du XML en [`Token`]
//! - [`node`] : élément sous-jacent, vocabulaire des nœuds et chaîne des ancêtres
//! - [`collections`] : listes ordonnées et dictionnaires indexés par identité
//! - [`schema`] : actions, arguments, variables d'état, devices et services
//! - [`variable_types`] : types de données UPnP
//!
//! La lecture est tolérante : les éléments inconnus sont ignorés et les
//! attributs absents prennent une valeur par défaut. Seul un XML mal formé ou
//! l'absence de l'élément racine attendu produit une erreur.
//!
//! ## Exemple
//!
//! ```
//! use pmodescription::ServiceDescription;
//!
//! let xml = r#"<scpd xmlns="urn:schemas-upnp-org:service-1-0">
//!   <serviceStateTable>
//!     <stateVariable sendEvents="no">
//!       <name>Volume</name>
//!       <dataType>ui2</dataType>
//!     </stateVariable>
//!   </serviceStateTable>
//! </scpd>"#;
//!
//! let service = ServiceDescription::parse(xml).unwrap();
//! assert!(service.state_variable("Volume").is_some());
//! ```

mod builder;
pub mod collections;
pub mod errors;
pub mod node;
pub mod scanner;
pub mod schema;
pub mod urn;
pub mod variable_types;

pub use builder::{parse_device_description, parse_service_description};
pub use collections::{Described, DescriptionList, DescriptionMap};
pub use errors::DescriptionError;
pub use node::{ElementInfo, NodeKind, NodePath};
pub use scanner::{DescriptionScanner, Token};
pub use schema::{
    Action, AllowedValueList, AllowedValueRange, Argument, Device, DeviceDescription, Direction,
    Icon, ServiceDescription, ServiceReference, SpecVersion, StateVarRef, StateVariable,
};
pub use variable_types::StateVarType;

//! # pmocodegen - Génération de classes de contrôle UPnP
//!
//! Cette crate transforme un arbre de description ([`pmodescription`]) en
//! code source fortement typé pour un langage orienté objet.
//!
//! ## Architecture
//!
//! - [`syntax`] : le trait [`SyntaxProvider`] et ses deux implémentations
//!   ([`CSharpSyntax`], [`VisualBasicSyntax`])
//! - [`templates`] : le moteur Handlebars qui rend les gabarits du fournisseur
//! - [`constants`] : le pool de constantes nommées
//! - [`naming`] : l'allocation de noms sans collision
//! - [`service`] / [`device`] : les générateurs
//! - [`probe`] : le contrat d'accès à une instance vivante du service
//!
//! Les générateurs sont génériques sur le fournisseur et ne dépendent jamais
//! d'un langage particulier. Une génération est une fonction pure de l'arbre
//! et des options, à l'exception de la sonde optionnelle des variables
//! d'état.
//!
//! ## Exemple
//!
//! ```
//! use pmocodegen::{CSharpSyntax, ClassOptions, ServiceGenerator, ServiceOptions};
//! use pmodescription::ServiceDescription;
//!
//! let xml = r#"<scpd><serviceStateTable>
//!   <stateVariable sendEvents="no"><name>Volume</name><dataType>ui2</dataType></stateVariable>
//! </serviceStateTable></scpd>"#;
//!
//! let service = ServiceDescription::parse(xml).unwrap();
//! let generator = ServiceGenerator::new(CSharpSyntax).unwrap();
//! let options = ServiceOptions::new(ClassOptions::new("VolumeService"));
//! let class = generator.generate(&service, &options).unwrap();
//!
//! assert_eq!(class.file_name, "VolumeService.cs");
//! assert!(class.source.contains("public ushort Volume"));
//! ```

pub mod constants;
pub mod device;
pub mod errors;
pub mod generated;
pub mod naming;
pub mod probe;
pub mod service;
pub mod syntax;
pub mod templates;

pub use constants::{Constant, ConstantPool};
pub use device::{ChildClassNames, DeviceGenerator};
pub use errors::GeneratorError;
pub use generated::{ClassOptions, GeneratedClass};
pub use naming::{NameScope, default_device_class_name, default_service_class_name};
pub use probe::{ProbeError, ServiceControl};
pub use service::{ServiceGenerator, ServiceOptions, UNKNOWN_MEMBER};
pub use syntax::{CSharpSyntax, Scope, SyntaxProvider, TemplateKind, VisualBasicSyntax};
pub use templates::TemplateEngine;

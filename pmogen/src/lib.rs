//! # pmogen - Générateur de classes de contrôle UPnP
//!
//! Lit les descriptions UPnP (fichier local ou URL), produit les classes
//! avec [`pmocodegen`] et les écrit dans le répertoire de sortie. Un client
//! SOAP ([`soap::SoapClient`]) sert de sonde optionnelle des variables d'état
//! et permet d'invoquer une action à la main.

pub mod fetch;
pub mod generate;
pub mod logging;
pub mod soap;

pub use generate::{
    DeviceRequest, GenerationSettings, Language, ServiceRequest, generate_device,
    generate_service,
};
pub use soap::{SoapClient, SoapError};

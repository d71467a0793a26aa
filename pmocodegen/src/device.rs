//! Générateur de classe de device.
//!
//! La classe expose les informations du device, une propriété par device
//! embarqué immédiat et une propriété par service immédiat. Quand l'appelant
//! fournit le nom de la classe spécifique déjà générée pour un enfant
//! (indexé par UDN ou serviceId), la propriété est typée par cette classe et
//! construit l'instance autour de l'objet générique ; sinon elle retourne
//! l'objet générique.

use std::collections::HashMap;

use pmodescription::Device;
use serde_json::json;
use tracing::{debug, info};

use crate::{
    constants::{ConstantPool, GROUP_DEVICE_UDN, GROUP_SERVICE_ID},
    errors::GeneratorError,
    generated::{ClassOptions, GeneratedClass},
    naming::NameScope,
    syntax::{SyntaxProvider, TemplateKind},
    templates::TemplateEngine,
};

/// Noms utilisés par les gabarits de classe de device
const RESERVED_MEMBERS: &[&str] = &["moDevice", "Device"];

/// Propriétés d'information : (propriété, membre du modèle objet, résumé)
const INFO_PROPERTIES: &[(&str, &str, &str)] = &[
    ("FriendlyName", "FriendlyName", "Friendly name of the device."),
    ("ModelName", "ModelName", "Model name of the device."),
    ("ModelNumber", "ModelNumber", "Model number of the device."),
    ("DeviceType", "Type", "UPnP device type."),
    ("UniqueDeviceName", "UniqueDeviceName", "Unique device name (UDN)."),
];

const GENERIC_SERVICE_TYPE: &str = "UPnPService";
const GENERIC_DEVICE_TYPE: &str = "UPnPDevice";

/// Classes spécifiques des enfants, indexées par UDN ou serviceId
pub type ChildClassNames = HashMap<String, String>;

pub struct DeviceGenerator<P: SyntaxProvider> {
    provider: P,
    engine: TemplateEngine,
}

impl<P: SyntaxProvider> DeviceGenerator<P> {
    pub fn new(provider: P) -> Result<Self, GeneratorError> {
        let engine = TemplateEngine::new(&provider)?;
        Ok(Self { provider, engine })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn generate(
        &self,
        device: &Device,
        options: &ClassOptions,
        child_classes: Option<&ChildClassNames>,
    ) -> Result<GeneratedClass, GeneratorError> {
        let p = &self.provider;
        let scope = p.scope(options.scope);
        let mut pool = ConstantPool::new(p).with_scope(options.scope);
        let mut members = NameScope::new(p.case_sensitive());
        let class_base = members.allocate(&p.sanitize(&options.class_name, false));
        for reserved in RESERVED_MEMBERS {
            members.reserve(reserved);
        }

        let doc = |summary: &str| {
            self.engine.render(
                TemplateKind::DocComment,
                &json!({ "summary": summary, "remarks": "" }),
            )
        };

        let mut info_properties = Vec::new();
        for &(name, member, summary) in INFO_PROPERTIES {
            let name = members.allocate(name);
            info_properties.push(self.engine.render(
                TemplateKind::DeviceInfoProperty,
                &json!({
                    "doc": doc(summary)?,
                    "scope": scope,
                    "name": p.escape_keyword(&name),
                    "member": member,
                }),
            )?);
        }

        let mut device_properties = Vec::new();
        for child in device.devices().values() {
            // Sans UDN, l'enfant ne peut pas être retrouvé dans `Children`
            if child.udn().trim().is_empty() {
                debug!(device_type = %child.device_type(), "Embedded device without UDN skipped");
                continue;
            }
            let name = members.allocate(&p.sanitize(child.short_type_name(), false));
            let constant = pool.get(
                GROUP_DEVICE_UDN,
                child.short_type_name(),
                child.udn(),
                child.friendly_name(),
            );
            let specific = child_classes.and_then(|classes| classes.get(child.udn()));
            debug!(udn = %child.udn(), specific = ?specific, "Child device property");

            device_properties.push(self.engine.render(
                TemplateKind::DeviceProperty,
                &json!({
                    "doc": doc(&format!("Embedded device {} ({}).", child.friendly_name(), child.device_type()))?,
                    "scope": scope,
                    "name": p.escape_keyword(&name),
                    "type": specific.map_or_else(|| GENERIC_DEVICE_TYPE.to_string(), |c| p.identifier(c, false)),
                    "constant": constant,
                    "specific": specific.is_some(),
                }),
            )?);
        }

        let mut service_properties = Vec::new();
        for service in device.services().values() {
            if service.service_id().trim().is_empty() {
                debug!(service_type = %service.service_type(), "Service without serviceId skipped");
                continue;
            }
            let name = members.allocate(&p.sanitize(service.short_id(), false));
            let constant = pool.get(
                GROUP_SERVICE_ID,
                service.short_id(),
                service.service_id(),
                service.service_type(),
            );
            let specific = child_classes.and_then(|classes| classes.get(service.service_id()));
            debug!(service_id = %service.service_id(), specific = ?specific, "Service property");

            service_properties.push(self.engine.render(
                TemplateKind::ServiceProperty,
                &json!({
                    "doc": doc(&format!("The {} service.", service.service_type()))?,
                    "scope": scope,
                    "name": p.escape_keyword(&name),
                    "type": specific.map_or_else(|| GENERIC_SERVICE_TYPE.to_string(), |c| p.identifier(c, false)),
                    "constant": constant,
                    "specific": specific.is_some(),
                }),
            )?);
        }

        let sections = [
            ("Constants", pool.definitions(&self.engine)?),
            ("Device information", info_properties.join("\n\n")),
            ("Devices", device_properties.join("\n\n")),
            ("Services", service_properties.join("\n\n")),
        ];
        let body = sections
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(name, text)| {
                self.engine
                    .render(TemplateKind::Region, &json!({ "name": name, "body": text }))
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n\n");

        let summary = match device.device_type() {
            "" => "Control point wrapper for a UPnP device.".to_string(),
            device_type => format!("Control point wrapper for the {device_type} device."),
        };
        let source = self.engine.render(
            TemplateKind::DeviceClass,
            &json!({
                "header": options.header(),
                "namespace": options.namespace_for(p),
                "doc": doc(&summary)?,
                "scope": scope,
                "partial": options.partial,
                "class_name": p.escape_keyword(&class_base),
                "body": body,
            }),
        )?;

        let class = GeneratedClass::new(p, &class_base, options.partial, source);
        info!(
            class = %class.class_name,
            language = p.name(),
            devices = device.devices().len(),
            services = device.services().len(),
            "Device class generated"
        );
        Ok(class)
    }
}

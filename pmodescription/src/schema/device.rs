use url::Url;

use crate::{
    builder,
    collections::{Described, DescriptionList, DescriptionMap},
    errors::DescriptionError,
    node::{ElementInfo, NodeKind},
    schema::SpecVersion,
    urn::short_name,
};

/// Icône `<icon>` d'un device
#[derive(Debug, Clone, Default)]
pub struct Icon {
    element: ElementInfo,
    pub(crate) mime_type: String,
    pub(crate) width: Option<u32>,
    pub(crate) height: Option<u32>,
    pub(crate) depth: Option<u32>,
    pub(crate) url: String,
}

impl Icon {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn width(&self) -> Option<u32> {
        self.width
    }

    pub fn height(&self) -> Option<u32> {
        self.height
    }

    pub fn depth(&self) -> Option<u32> {
        self.depth
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Entrée `<service>` de la `<serviceList>` d'un device
#[derive(Debug, Clone, Default)]
pub struct ServiceReference {
    element: ElementInfo,
    pub(crate) service_type: String,
    pub(crate) service_id: String,
    pub(crate) scpd_url: String,
    pub(crate) control_url: String,
    pub(crate) event_sub_url: String,
}

impl Described for ServiceReference {
    const KIND: NodeKind = NodeKind::Service;

    fn identity(&self) -> &str {
        &self.service_id
    }
}

impl ServiceReference {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    pub fn service_id(&self) -> &str {
        &self.service_id
    }

    pub fn scpd_url(&self) -> &str {
        &self.scpd_url
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    pub fn event_sub_url(&self) -> &str {
        &self.event_sub_url
    }

    /// `AVTransport` pour `urn:schemas-upnp-org:service:AVTransport:1`.
    pub fn short_type_name(&self) -> &str {
        short_name(&self.service_type)
    }

    /// `AVTransport` pour `urn:upnp-org:serviceId:AVTransport`, à défaut le
    /// nom court du type.
    pub fn short_id(&self) -> &str {
        match short_name(&self.service_id) {
            "" => self.short_type_name(),
            id => id,
        }
    }
}

/// Device décrit dans un document de description (racine ou embarqué)
#[derive(Debug, Clone, Default)]
pub struct Device {
    element: ElementInfo,
    pub(crate) device_type: String,
    pub(crate) friendly_name: String,
    pub(crate) manufacturer: String,
    pub(crate) manufacturer_url: String,
    pub(crate) model_description: String,
    pub(crate) model_name: String,
    pub(crate) model_number: String,
    pub(crate) model_url: String,
    pub(crate) serial_number: String,
    pub(crate) udn: String,
    pub(crate) upc: String,
    pub(crate) presentation_url: String,
    pub(crate) icons: DescriptionList<Icon>,
    pub(crate) services: DescriptionMap<ServiceReference>,
    pub(crate) devices: DescriptionMap<Device>,
}

impl Described for Device {
    const KIND: NodeKind = NodeKind::Device;

    fn identity(&self) -> &str {
        &self.udn
    }
}

impl Device {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn device_type(&self) -> &str {
        &self.device_type
    }

    pub fn friendly_name(&self) -> &str {
        &self.friendly_name
    }

    pub fn manufacturer(&self) -> &str {
        &self.manufacturer
    }

    pub fn manufacturer_url(&self) -> &str {
        &self.manufacturer_url
    }

    pub fn model_description(&self) -> &str {
        &self.model_description
    }

    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    pub fn model_number(&self) -> &str {
        &self.model_number
    }

    pub fn model_url(&self) -> &str {
        &self.model_url
    }

    pub fn serial_number(&self) -> &str {
        &self.serial_number
    }

    pub fn udn(&self) -> &str {
        &self.udn
    }

    pub fn upc(&self) -> &str {
        &self.upc
    }

    pub fn presentation_url(&self) -> &str {
        &self.presentation_url
    }

    pub fn icons(&self) -> &DescriptionList<Icon> {
        &self.icons
    }

    /// Services immédiats du device.
    pub fn services(&self) -> &DescriptionMap<ServiceReference> {
        &self.services
    }

    /// Devices embarqués immédiats.
    pub fn devices(&self) -> &DescriptionMap<Device> {
        &self.devices
    }

    /// `MediaRenderer` pour `urn:schemas-upnp-org:device:MediaRenderer:1`.
    pub fn short_type_name(&self) -> &str {
        short_name(&self.device_type)
    }

    /// Recherche en profondeur d'un device par son UDN (lui-même compris).
    pub fn find_device(&self, udn: &str) -> Option<&Device> {
        if self.udn == udn {
            return Some(self);
        }
        self.devices.values().find_map(|d| d.find_device(udn))
    }

    /// Ce device suivi de tous ses descendants, en profondeur d'abord.
    pub fn all_devices(&self) -> Vec<&Device> {
        let mut result = vec![self];
        for child in self.devices.values() {
            result.extend(child.all_devices());
        }
        result
    }

    /// Tous les services de l'arborescence avec le device qui les porte.
    pub fn all_services(&self) -> Vec<(&Device, &ServiceReference)> {
        self.all_devices()
            .into_iter()
            .flat_map(|d| d.services.values().map(move |s| (d, s)))
            .collect()
    }
}

/// Document de description d'un device (`<root>`)
#[derive(Debug, Clone, Default)]
pub struct DeviceDescription {
    element: ElementInfo,
    pub(crate) spec_version: SpecVersion,
    pub(crate) url_base: String,
    pub(crate) device: Device,
}

impl DeviceDescription {
    pub(crate) fn new(element: ElementInfo) -> Self {
        Self {
            element,
            ..Default::default()
        }
    }

    /// Construit la description à partir du document XML.
    pub fn parse(xml: &str) -> Result<Self, DescriptionError> {
        builder::parse_device_description(xml)
    }

    pub fn element(&self) -> &ElementInfo {
        &self.element
    }

    pub fn spec_version(&self) -> SpecVersion {
        self.spec_version
    }

    pub fn url_base(&self) -> Option<&str> {
        if self.url_base.is_empty() {
            None
        } else {
            Some(&self.url_base)
        }
    }

    /// Device racine.
    pub fn device(&self) -> &Device {
        &self.device
    }

    /// Résout une URL du document (`SCPDURL`, `controlURL`...).
    ///
    /// La base est `URLBase` si présent, sinon l'emplacement d'où le document
    /// a été lu.
    pub fn resolve_url(&self, location: Option<&str>, relative: &str) -> Result<Url, DescriptionError> {
        if let Ok(absolute) = Url::parse(relative) {
            return Ok(absolute);
        }

        let base = self
            .url_base()
            .or(location)
            .ok_or_else(|| DescriptionError::InvalidUrl(relative.to_string(), url::ParseError::RelativeUrlWithoutBase))?;

        let base = Url::parse(base).map_err(|e| DescriptionError::InvalidUrl(base.to_string(), e))?;
        base.join(relative)
            .map_err(|e| DescriptionError::InvalidUrl(relative.to_string(), e))
    }
}

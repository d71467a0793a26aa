//! Enchaînement lecture, génération et écriture des classes.

use std::{
    collections::HashMap,
    fmt,
    path::PathBuf,
    str::FromStr,
};

use anyhow::{Context, Result, anyhow};
use clap::ValueEnum;
use pmocodegen::{
    CSharpSyntax, ChildClassNames, ClassOptions, DeviceGenerator, GeneratedClass, NameScope,
    ServiceControl, ServiceGenerator, ServiceOptions, SyntaxProvider, VisualBasicSyntax,
    default_device_class_name, default_service_class_name,
};
use pmodescription::{Device, DeviceDescription, ServiceDescription, ServiceReference};
use indexmap::IndexMap;
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    fetch::{read_document, read_url},
    soap::SoapClient,
};

/// Langage des classes générées
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Language {
    #[value(name = "csharp", alias = "cs")]
    CSharp,
    #[value(name = "vb", alias = "visualbasic")]
    VisualBasic,
}

impl FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csharp" | "cs" | "c#" => Ok(Language::CSharp),
            "vb" | "visualbasic" | "vb.net" => Ok(Language::VisualBasic),
            other => Err(anyhow!("Unknown language {other}, expected csharp or vb")),
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Language::CSharp => write!(f, "csharp"),
            Language::VisualBasic => write!(f, "vb"),
        }
    }
}

/// Réglages communs à toutes les générations d'une exécution
#[derive(Debug, Clone)]
pub struct GenerationSettings {
    pub language: Language,
    pub namespace: String,
    pub partial: bool,
    pub output_dir: PathBuf,
    pub test_state_vars: bool,
    pub timeout_secs: u64,
}

impl GenerationSettings {
    fn class_options(&self, class_name: &str, source_type: &str) -> ClassOptions {
        ClassOptions::new(class_name)
            .with_namespace(self.namespace.as_str())
            .with_partial(self.partial)
            .with_source_type(source_type)
    }
}

/// Génération d'une classe de service
#[derive(Debug, Clone, Default)]
pub struct ServiceRequest {
    /// Chemin ou URL du SCPD
    pub source: String,
    pub class_name: Option<String>,
    pub service_type: Option<String>,
    /// URL de contrôle du service vivant, pour la sonde
    pub control_url: Option<String>,
}

/// Génération des classes d'un device
#[derive(Debug, Clone, Default)]
pub struct DeviceRequest {
    /// Chemin ou URL de la description du device
    pub source: String,
    /// Génère aussi une classe par type de service rencontré
    pub with_services: bool,
}

fn render_service<P: SyntaxProvider>(
    provider: P,
    service: &ServiceDescription,
    options: &ServiceOptions,
    probe: Option<&dyn ServiceControl>,
) -> Result<GeneratedClass> {
    let generator = ServiceGenerator::new(provider)?;
    Ok(generator.generate_with_probe(service, options, probe)?)
}

fn render_device<P: SyntaxProvider>(
    provider: P,
    device: &Device,
    options: &ClassOptions,
    classes: &ChildClassNames,
) -> Result<GeneratedClass> {
    let generator = DeviceGenerator::new(provider)?;
    Ok(generator.generate(device, options, Some(classes))?)
}

/// Dernier segment du chemin de l'URL, sans extension
fn document_stem(location: &Url) -> String {
    let file_name = location
        .path_segments()
        .and_then(|mut segments| segments.next_back())
        .unwrap_or("");
    match file_name.rsplit_once('.') {
        Some((stem, _)) if !stem.is_empty() => stem.to_string(),
        _ => file_name.to_string(),
    }
}

fn generate_service_class(
    settings: &GenerationSettings,
    service: &ServiceDescription,
    class_name: &str,
    service_type: &str,
    control_url: Option<&str>,
) -> Result<GeneratedClass> {
    let client = match (settings.test_state_vars, control_url) {
        (true, Some(url)) => Some(SoapClient::new(url, service_type, settings.timeout_secs)),
        _ => None,
    };
    let probe = client.as_ref().map(|c| c as &dyn ServiceControl);
    let options = ServiceOptions::new(settings.class_options(class_name, service_type))
        .with_test_state_vars(settings.test_state_vars);

    match settings.language {
        Language::CSharp => render_service(CSharpSyntax, service, &options, probe),
        Language::VisualBasic => render_service(VisualBasicSyntax, service, &options, probe),
    }
}

/// Génère la classe d'un service et retourne le fichier écrit.
pub fn generate_service(settings: &GenerationSettings, request: &ServiceRequest) -> Result<PathBuf> {
    let document = read_document(&request.source, settings.timeout_secs)?;
    let service = ServiceDescription::parse(&document.text)
        .with_context(|| format!("Invalid service description {}", document.location))?;

    let service_type = request.service_type.clone().unwrap_or_default();
    let class_name = match &request.class_name {
        Some(name) => name.clone(),
        None if !service_type.is_empty() => default_service_class_name(&service_type),
        None => default_service_class_name(&document_stem(&document.location)),
    };

    let class = generate_service_class(
        settings,
        &service,
        &class_name,
        &service_type,
        request.control_url.as_deref(),
    )?;
    Ok(class.write_to(&settings.output_dir)?)
}

fn generate_embedded_service(
    settings: &GenerationSettings,
    description: &DeviceDescription,
    location: &Url,
    reference: &ServiceReference,
    class_name: &str,
) -> Result<(GeneratedClass, PathBuf)> {
    let scpd_url = description.resolve_url(Some(location.as_str()), reference.scpd_url())?;
    let text = read_url(&scpd_url, settings.timeout_secs)?;
    let service = ServiceDescription::parse(&text)
        .with_context(|| format!("Invalid service description {scpd_url}"))?;

    let control_url = if settings.test_state_vars {
        Some(description.resolve_url(Some(location.as_str()), reference.control_url())?)
    } else {
        None
    };

    let class = generate_service_class(
        settings,
        &service,
        class_name,
        reference.service_type(),
        control_url.as_ref().map(Url::as_str),
    )?;
    let path = class.write_to(&settings.output_dir)?;
    Ok((class, path))
}

/// Génère une classe par type de device de l'arbre (racine comprise) et,
/// sur demande, une classe par type de service. Les propriétés des devices
/// sont typées par les classes générées.
///
/// Les noms de classe sont alloués dans une seule portée, insensible à la
/// casse comme les noms de fichiers : deux types distincts de même nom court
/// (versions ou domaines différents) reçoivent des noms suffixés.
pub fn generate_device(settings: &GenerationSettings, request: &DeviceRequest) -> Result<Vec<PathBuf>> {
    let document = read_document(&request.source, settings.timeout_secs)?;
    let description = DeviceDescription::parse(&document.text)
        .with_context(|| format!("Invalid device description {}", document.location))?;
    let root = description.device();

    let mut written = Vec::new();
    let mut classes = ChildClassNames::new();
    let mut class_names = NameScope::new(false);

    // Classes des devices allouées d'abord : la racine garde le nom de base
    let mut device_classes: IndexMap<&str, String> = IndexMap::new();
    let devices = root.all_devices();
    for device in &devices {
        if !device_classes.contains_key(device.device_type()) {
            let class_name = class_names.allocate(&default_device_class_name(device.device_type()));
            device_classes.insert(device.device_type(), class_name);
        }
    }

    if request.with_services {
        // `None` : type déjà tenté sans succès
        let mut service_classes: HashMap<&str, Option<String>> = HashMap::new();
        for (device, reference) in root.all_services() {
            let class_name = match service_classes.get(reference.service_type()) {
                Some(known) => known.clone(),
                None => {
                    let class_name =
                        class_names.allocate(&default_service_class_name(reference.service_type()));
                    let generated = match generate_embedded_service(
                        settings,
                        &description,
                        &document.location,
                        reference,
                        &class_name,
                    ) {
                        Ok((class, path)) => {
                            written.push(path);
                            Some(class.class_name)
                        }
                        Err(err) => {
                            warn!(
                                device = %device.udn(),
                                service = %reference.service_id(),
                                error = %err,
                                "Service class skipped"
                            );
                            None
                        }
                    };
                    service_classes.insert(reference.service_type(), generated.clone());
                    generated
                }
            };

            match class_name {
                Some(class_name) if !reference.service_id().trim().is_empty() => {
                    classes
                        .entry(reference.service_id().to_string())
                        .or_insert(class_name);
                }
                Some(_) => debug!(service_type = %reference.service_type(), "Service without serviceId"),
                None => {}
            }
        }
    }

    for device in &devices {
        if device.udn().trim().is_empty() {
            debug!(device_type = %device.device_type(), "Device without UDN");
            continue;
        }
        if let Some(class_name) = device_classes.get(device.device_type()) {
            classes
                .entry(device.udn().to_string())
                .or_insert_with(|| class_name.clone());
        }
    }

    for device in devices {
        let Some(class_name) = device_classes.shift_remove(device.device_type()) else {
            continue;
        };
        let options = settings.class_options(&class_name, device.device_type());
        let class = match settings.language {
            Language::CSharp => render_device(CSharpSyntax, device, &options, &classes)?,
            Language::VisualBasic => render_device(VisualBasicSyntax, device, &options, &classes)?,
        };
        written.push(class.write_to(&settings.output_dir)?);
    }

    info!(files = written.len(), source = %document.location, "Device generation complete");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_from_str() {
        assert_eq!("csharp".parse::<Language>().unwrap(), Language::CSharp);
        assert_eq!("C#".parse::<Language>().unwrap(), Language::CSharp);
        assert_eq!("VB".parse::<Language>().unwrap(), Language::VisualBasic);
        assert!("pascal".parse::<Language>().is_err());
        assert_eq!(Language::VisualBasic.to_string(), "vb");
    }

    #[test]
    fn test_document_stem() {
        let url = Url::parse("http://host:1400/xml/RenderingControl1.xml").unwrap();
        assert_eq!(document_stem(&url), "RenderingControl1");
        let url = Url::parse("file:///tmp/scpd").unwrap();
        assert_eq!(document_stem(&url), "scpd");
    }
}

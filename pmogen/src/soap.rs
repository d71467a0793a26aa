//! Client SOAP minimal pour le contrôle d'un service UPnP vivant.
//!
//! Sert de sonde au générateur de service (`QueryStateVariable`) et à la
//! commande `invoke`.

use std::time::Duration;

use pmocodegen::{ProbeError, ServiceControl};
use thiserror::Error;
use tracing::debug;
use ureq::Agent;
use xmltree::{Element, EmitterConfig, XMLNode};

/// Espace de noms des actions de contrôle génériques
pub const CONTROL_NAMESPACE: &str = "urn:schemas-upnp-org:control-1-0";

const ENVELOPE_NAMESPACE: &str = "http://schemas.xmlsoap.org/soap/envelope/";
const ENCODING_STYLE: &str = "http://schemas.xmlsoap.org/soap/encoding/";
const QUERY_STATE_VARIABLE: &str = "QueryStateVariable";

#[derive(Debug, Error)]
pub enum SoapError {
    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    #[error("XML parse error: {0}")]
    Xml(#[from] xmltree::ParseError),

    #[error("XML write error: {0}")]
    XmlWrite(#[from] xmltree::Error),

    #[error("Malformed SOAP response: {0}")]
    Malformed(String),

    #[error("SOAP fault {code}: {description}")]
    Fault { code: String, description: String },
}

fn text_element(name: &str, value: &str) -> Element {
    let mut element = Element::new(name);
    element.children.push(XMLNode::Text(value.to_string()));
    element
}

/// Construit l'enveloppe d'une requête d'action
pub fn build_request(namespace: &str, action: &str, args: &[(String, String)]) -> Result<String, SoapError> {
    let mut request = Element::new(&format!("u:{action}"));
    request
        .attributes
        .insert("xmlns:u".to_string(), namespace.to_string());
    for (name, value) in args {
        request.children.push(XMLNode::Element(text_element(name, value)));
    }

    let mut body = Element::new("s:Body");
    body.children.push(XMLNode::Element(request));

    let mut envelope = Element::new("s:Envelope");
    envelope
        .attributes
        .insert("xmlns:s".to_string(), ENVELOPE_NAMESPACE.to_string());
    envelope
        .attributes
        .insert("s:encodingStyle".to_string(), ENCODING_STYLE.to_string());
    envelope.children.push(XMLNode::Element(body));

    let mut buf = Vec::new();
    let config = EmitterConfig::new()
        .write_document_declaration(true)
        .perform_indent(true)
        .indent_string("  ");
    envelope.write_with_config(&mut buf, config)?;

    String::from_utf8(buf).map_err(|e| SoapError::Malformed(e.to_string()))
}

fn element_text(element: &Element) -> String {
    element
        .get_text()
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

fn find_descendant<'a>(element: &'a Element, name: &str) -> Option<&'a Element> {
    element
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                find_descendant(child, name)
            }
        })
}

fn fault_error(fault: &Element) -> SoapError {
    let text = |name: &str| find_descendant(fault, name).map(element_text);
    match find_descendant(fault, "UPnPError") {
        Some(upnp) => SoapError::Fault {
            code: find_descendant(upnp, "errorCode").map(element_text).unwrap_or_default(),
            description: find_descendant(upnp, "errorDescription")
                .map(element_text)
                .or_else(|| text("faultstring"))
                .unwrap_or_default(),
        },
        None => SoapError::Fault {
            code: text("faultcode").unwrap_or_default(),
            description: text("faultstring").unwrap_or_default(),
        },
    }
}

/// Lit une réponse SOAP et retourne ses valeurs `(nom, valeur)` dans
/// l'ordre du document ; un `Fault` devient [`SoapError::Fault`].
pub fn parse_response(xml: &str) -> Result<Vec<(String, String)>, SoapError> {
    let root = Element::parse(xml.as_bytes())?;
    if root.name != "Envelope" {
        return Err(SoapError::Malformed(format!("unexpected root <{}>", root.name)));
    }
    let body = root
        .get_child("Body")
        .ok_or_else(|| SoapError::Malformed("missing Body".to_string()))?;
    let content = body
        .children
        .iter()
        .find_map(XMLNode::as_element)
        .ok_or_else(|| SoapError::Malformed("empty Body".to_string()))?;

    if content.name == "Fault" {
        return Err(fault_error(content));
    }

    Ok(content
        .children
        .iter()
        .filter_map(XMLNode::as_element)
        .map(|e| (e.name.clone(), element_text(e)))
        .collect())
}

/// Client d'un service, identifié par son URL de contrôle et son type
pub struct SoapClient {
    agent: Agent,
    control_url: String,
    service_type: String,
}

impl SoapClient {
    pub fn new(control_url: &str, service_type: &str, timeout_secs: u64) -> Self {
        // Les fautes SOAP arrivent en HTTP 500 : le corps doit rester lisible
        let config = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(timeout_secs)))
            .http_status_as_error(false)
            .build();

        Self {
            agent: config.into(),
            control_url: control_url.to_string(),
            service_type: service_type.to_string(),
        }
    }

    pub fn control_url(&self) -> &str {
        &self.control_url
    }

    pub fn service_type(&self) -> &str {
        &self.service_type
    }

    fn call(&self, namespace: &str, action: &str, args: &[(String, String)]) -> Result<Vec<(String, String)>, SoapError> {
        let body = build_request(namespace, action, args)?;
        let soap_action = format!(r#""{namespace}#{action}""#);
        debug!(url = %self.control_url, action, "Sending SOAP request");

        let mut response = self
            .agent
            .post(self.control_url.as_str())
            .header("Content-Type", r#"text/xml; charset="utf-8""#)
            .header("SOAPAction", &soap_action)
            .send(body)?;
        let status = response.status();
        let raw = response.body_mut().read_to_string()?;

        match parse_response(&raw) {
            Err(SoapError::Xml(_) | SoapError::Malformed(_)) if !status.is_success() => {
                Err(SoapError::Malformed(format!("HTTP status {status}")))
            }
            result => result,
        }
    }

    /// Invoque une action du service ; les valeurs de sortie sont retournées
    /// avec leur nom, dans l'ordre de la réponse.
    pub fn invoke(&self, action: &str, args: &[(String, String)]) -> Result<Vec<(String, String)>, SoapError> {
        self.call(&self.service_type, action, args)
    }

    /// Valeur d'une variable d'état, `None` quand la réponse ne porte pas
    /// d'élément `return`.
    pub fn query(&self, variable: &str) -> Result<Option<String>, SoapError> {
        let values = self.call(
            CONTROL_NAMESPACE,
            QUERY_STATE_VARIABLE,
            &[("varName".to_string(), variable.to_string())],
        )?;
        Ok(values
            .into_iter()
            .find(|(name, _)| name == "return")
            .map(|(_, value)| value))
    }
}

impl ServiceControl for SoapClient {
    fn query_state_variable(&self, name: &str) -> Result<String, ProbeError> {
        match self.query(name) {
            Ok(Some(value)) => Ok(value),
            Ok(None) => Err(ProbeError::ValueUnknown),
            Err(err) => Err(ProbeError::Failed(err.to_string())),
        }
    }

    fn invoke_action(&self, name: &str, in_args: &[(String, String)]) -> Result<Vec<String>, ProbeError> {
        self.invoke(name, in_args)
            .map(|values| values.into_iter().map(|(_, value)| value).collect())
            .map_err(|err| ProbeError::Failed(err.to_string()))
    }
}

//! Lecture des URN UPnP (`urn:schemas-upnp-org:service:AVTransport:1`,
//! `urn:upnp-org:serviceId:AVTransport`, ...).

/// URN décomposée
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Urn<'a> {
    pub domain: &'a str,
    pub kind: &'a str,
    pub name: &'a str,
    pub version: Option<u32>,
}

impl<'a> Urn<'a> {
    /// Décompose une URN, `None` si le texte ne commence pas par `urn:` ou
    /// ne comporte pas au moins domaine, catégorie et nom.
    pub fn parse(text: &'a str) -> Option<Self> {
        let rest = text.trim().strip_prefix("urn:")?;
        let mut parts = rest.split(':');
        let domain = parts.next()?;
        let kind = parts.next()?;
        let name = parts.next().filter(|n| !n.is_empty())?;
        let version = parts.next().and_then(|v| v.parse().ok());
        Some(Self {
            domain,
            kind,
            name,
            version,
        })
    }
}

/// Nom court d'un type ou d'un identifiant UPnP.
///
/// Sans URN reconnue, on retient le dernier segment non vide du texte.
pub fn short_name(text: &str) -> &str {
    if let Some(urn) = Urn::parse(text) {
        return urn.name;
    }
    text.trim()
        .rsplit([':', '/'])
        .find(|segment| !segment.is_empty())
        .unwrap_or("")
}

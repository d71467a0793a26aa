//! Construction d'identificateurs valides à partir de textes quelconques
//! (noms UPnP, valeurs autorisées, types de service...).

/// Réduit `raw` aux caractères ASCII alphanumériques et `_`.
///
/// Chaque caractère supprimé met en capitale la lettre suivante
/// (`x-dlna-org` devient `XDlnaOrg`). Un nom de type commence par une
/// majuscule, un nom de paramètre par une minuscule (`InstanceID` devient
/// `instanceID`, `URIMetaData` devient `uriMetaData`). Un identificateur qui
/// commencerait par un chiffre est préfixé par `_`.
pub fn sanitize(raw: &str, is_parameter: bool) -> String {
    let mut result = String::with_capacity(raw.len());
    let mut capitalize = false;

    for c in raw.trim().chars() {
        if c.is_ascii_alphanumeric() || c == '_' {
            if capitalize && !result.is_empty() {
                result.push(c.to_ascii_uppercase());
            } else {
                result.push(c);
            }
            capitalize = false;
        } else {
            capitalize = true;
        }
    }

    if result.is_empty() {
        return if is_parameter { "arg" } else { "Empty" }.to_string();
    }

    let mut result = if is_parameter {
        lower_head(&result)
    } else {
        upper_head(&result)
    };

    if result.starts_with(|c: char| c.is_ascii_digit()) {
        result.insert(0, '_');
    }
    result
}

fn upper_head(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
        None => String::new(),
    }
}

/// Passe en minuscules la première « lettre majuscule » du nom, ou tout
/// l'acronyme de tête.
fn lower_head(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let run = chars.iter().take_while(|c| c.is_ascii_uppercase()).count();
    let lowered = match run {
        0 | 1 => run,
        n if n == chars.len() => n,
        n if chars[n].is_ascii_lowercase() => n - 1,
        n => n,
    };

    chars
        .iter()
        .enumerate()
        .map(|(i, c)| if i < lowered { c.to_ascii_lowercase() } else { *c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_names() {
        assert_eq!(sanitize("Volume", false), "Volume");
        assert_eq!(sanitize("A_ARG_TYPE_Channel", false), "A_ARG_TYPE_Channel");
        assert_eq!(sanitize("x-dlna-org", false), "XDlnaOrg");
        assert_eq!(sanitize("auto", false), "Auto");
        assert_eq!(sanitize("10 dB", false), "_10DB");
        assert_eq!(sanitize("  ", false), "Empty");
    }

    #[test]
    fn test_parameter_names() {
        assert_eq!(sanitize("InstanceID", true), "instanceID");
        assert_eq!(sanitize("DesiredVolume", true), "desiredVolume");
        assert_eq!(sanitize("URIMetaData", true), "uriMetaData");
        assert_eq!(sanitize("ID", true), "id");
        assert_eq!(sanitize("CurrentURI", true), "currentURI");
        assert_eq!(sanitize("", true), "arg");
    }

    #[test]
    fn test_non_ascii_is_dropped() {
        assert_eq!(sanitize("Volumé", false), "Volum");
        assert_eq!(sanitize("Zone été", false), "ZoneT");
    }
}

//! Pool de constantes.
//!
//! Chaque chaîne littérale référencée par le code généré (nom d'action, nom
//! de variable, valeur autorisée, UDN, identifiant de service) devient une
//! constante nommée. Le pool indexe les constantes par groupe puis par
//! valeur : une même valeur demandée deux fois dans un groupe retourne le
//! même identificateur et n'est déclarée qu'une fois.

use indexmap::IndexMap;
use serde_json::json;
use tracing::trace;

use crate::{
    errors::GeneratorError,
    naming::NameScope,
    syntax::{Scope, SyntaxProvider, TemplateKind},
    templates::TemplateEngine,
};

pub const GROUP_ACTION_NAME: &str = "ActionName";
pub const GROUP_STATE_VAR_NAME: &str = "StateVarName";
pub const GROUP_DEVICE_UDN: &str = "DeviceUDN";
pub const GROUP_SERVICE_ID: &str = "ServiceID";

/// Groupe des valeurs autorisées d'une variable d'état.
pub fn allowed_value_group(variable: &str) -> String {
    format!("AllowedValue_{variable}")
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constant {
    pub identifier: String,
    pub value: String,
    pub comment: String,
}

pub struct ConstantPool<'a, P: SyntaxProvider + ?Sized> {
    provider: &'a P,
    scope: Scope,
    groups: IndexMap<String, IndexMap<String, Constant>>,
    names: NameScope,
}

impl<'a, P: SyntaxProvider + ?Sized> ConstantPool<'a, P> {
    pub fn new(provider: &'a P) -> Self {
        Self {
            provider,
            scope: Scope::Public,
            groups: IndexMap::new(),
            names: NameScope::new(provider.case_sensitive()),
        }
    }

    pub fn with_scope(mut self, scope: Scope) -> Self {
        self.scope = scope;
        self
    }

    /// Retourne l'identificateur de la constante `(group, value)`, en la
    /// déclarant à la première demande.
    ///
    /// `name` sert à construire l'identificateur (la valeur est utilisée
    /// quand il est vide) ; `comment` accompagne la déclaration.
    pub fn get(&mut self, group: &str, name: &str, value: &str, comment: &str) -> String {
        if let Some(constant) = self.lookup(group, value) {
            return constant.identifier.clone();
        }

        let base_name = if name.trim().is_empty() { value } else { name };
        let base = self.provider.constant_identifier(
            &self.provider.sanitize(group, false),
            &self.provider.sanitize(base_name, false),
        );
        let identifier = self.names.allocate(&base);
        trace!(group, value, identifier = %identifier, "New constant");

        self.groups.entry(group.to_string()).or_default().insert(
            value.to_string(),
            Constant {
                identifier: identifier.clone(),
                value: value.to_string(),
                comment: comment.to_string(),
            },
        );
        identifier
    }

    pub fn lookup(&self, group: &str, value: &str) -> Option<&Constant> {
        self.groups.get(group).and_then(|g| g.get(value))
    }

    pub fn len(&self) -> usize {
        self.groups.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Déclarations de toutes les constantes, une région par groupe.
    pub fn definitions(&self, engine: &TemplateEngine) -> Result<String, GeneratorError> {
        let scope = self.provider.scope(self.scope);
        let mut regions = Vec::with_capacity(self.groups.len());

        for (group, constants) in &self.groups {
            let declarations = constants
                .values()
                .map(|c| {
                    engine.render(
                        TemplateKind::Constant,
                        &json!({
                            "scope": scope,
                            "name": c.identifier,
                            "literal": self.provider.string_literal(&c.value),
                            "comment": c.comment,
                        }),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;

            regions.push(engine.render(
                TemplateKind::Region,
                &json!({ "name": group, "body": declarations.join("\n") }),
            )?);
        }

        Ok(regions.join("\n\n"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{CSharpSyntax, VisualBasicSyntax};

    #[test]
    fn test_same_value_returns_same_identifier() {
        let syntax = CSharpSyntax;
        let mut pool = ConstantPool::new(&syntax);
        let first = pool.get(GROUP_ACTION_NAME, "Play", "Play", "");
        let second = pool.get(GROUP_ACTION_NAME, "Play", "Play", "ignored");

        assert_eq!(first, "csActionName_Play");
        assert_eq!(first, second);
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.lookup(GROUP_ACTION_NAME, "Play").unwrap().comment, "");
    }

    #[test]
    fn test_groups_are_part_of_identity() {
        let syntax = CSharpSyntax;
        let mut pool = ConstantPool::new(&syntax);
        let a = pool.get(&allowed_value_group("PlayMode"), "Unknown", "Unknown", "");
        let b = pool.get(&allowed_value_group("Status"), "Unknown", "Unknown", "");

        assert_ne!(a, b);
        assert_eq!(a, "csAllowedValue_PlayMode_Unknown");
        assert_eq!(b, "csAllowedValue_Status_Unknown");
    }

    #[test]
    fn test_sanitized_collisions_get_suffix() {
        let syntax = CSharpSyntax;
        let mut pool = ConstantPool::new(&syntax);
        let a = pool.get("AllowedValue_Mode", "", "x-a", "");
        let b = pool.get("AllowedValue_Mode", "", "xA", "");

        assert_eq!(a, "csAllowedValue_Mode_XA");
        assert_eq!(b, "csAllowedValue_Mode_XA2");
    }

    #[test]
    fn test_case_insensitive_collisions() {
        let syntax = VisualBasicSyntax;
        let mut pool = ConstantPool::new(&syntax);
        let a = pool.get("AllowedValue_Mode", "", "AUTO", "");
        let b = pool.get("AllowedValue_Mode", "", "Auto", "");
        assert_ne!(a.to_ascii_lowercase(), b.to_ascii_lowercase());
    }

    #[test]
    fn test_scope_applies_to_declarations() {
        let syntax = CSharpSyntax;
        let engine = TemplateEngine::new(&syntax).unwrap();
        let mut pool = ConstantPool::new(&syntax).with_scope(Scope::Private);
        pool.get(GROUP_ACTION_NAME, "Play", "Play", "");

        let text = pool.definitions(&engine).unwrap();
        assert!(text.contains("private const string csActionName_Play = \"Play\";"));
    }

    #[test]
    fn test_definitions_grouped_by_region() {
        let syntax = CSharpSyntax;
        let engine = TemplateEngine::new(&syntax).unwrap();
        let mut pool = ConstantPool::new(&syntax);
        pool.get(GROUP_STATE_VAR_NAME, "Volume", "Volume", "");
        pool.get(GROUP_ACTION_NAME, "SetVolume", "SetVolume", "");
        pool.get(GROUP_STATE_VAR_NAME, "Mute", "Mute", "boolean");

        let text = pool.definitions(&engine).unwrap();
        assert!(text.starts_with("#region StateVarName"));
        assert!(text.contains("public const string csStateVarName_Volume = \"Volume\";\n"));
        assert!(text.contains("public const string csStateVarName_Mute = \"Mute\"; // boolean"));
        assert!(text.contains("#region ActionName"));
        assert_eq!(text.matches("csStateVarName_Volume").count(), 1);
    }
}

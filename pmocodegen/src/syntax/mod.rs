//! Fournisseurs de syntaxe.
//!
//! Un [`SyntaxProvider`] regroupe tout ce qui dépend du langage cible :
//! gabarits Handlebars, correspondance des types UPnP, mots réservés, mots
//! clés de portée et conventions de nommage des fichiers. Les générateurs
//! sont écrits uniquement contre ce trait.
//!
//! Les gabarits s'appuient sur le modèle objet COM du point de contrôle UPnP
//! (`UPnPService`, `UPnPDevice`, `IUPnPServiceCallback`). Les noms suivants
//! sont utilisés par les gabarits de classe et réservés par les générateurs :
//! `moService`, `Service`, `moDevice`, `Device`, `StateVariableChanged`,
//! `ServiceInstanceDied`. Dans les méthodes d'action, `loIn`, `loOut` et
//! `loOutValues` sont des variables locales.

pub mod csharp;
pub mod identifiers;
pub mod visual_basic;

use std::fmt;

use pmodescription::StateVarType;

pub use csharp::CSharpSyntax;
pub use visual_basic::VisualBasicSyntax;

/// Portée d'une déclaration générée
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scope {
    #[default]
    Public,
    Private,
    Internal,
}

/// Gabarits fournis par un [`SyntaxProvider`].
///
/// Les listes (membres, cas, affectations) sont rendues une à une puis
/// assemblées par le générateur ; les gabarits n'itèrent jamais.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateKind {
    /// `scope`, `name`, `literal`, `comment`
    Constant,
    /// `name`, `body`
    Region,
    /// `summary`, `remarks`
    DocComment,
    /// `doc`, `scope`, `name`, `members`
    Enumeration,
    /// `name`
    EnumMember,
    /// `scope`, `function_name`, `enum_name`, `unknown_member`, `cases`
    EnumParse,
    /// `enum_name`, `member`, `constant`
    EnumParseCase,
    /// `scope`, `function_name`, `enum_name`, `cases`
    EnumToString,
    /// `enum_name`, `member`, `constant`
    EnumToStringCase,
    /// `doc`, `scope`, `name`, `type`, `constant`
    Property,
    /// `doc`, `string_doc`, `scope`, `name`, `string_name`, `enum_name`,
    /// `unknown_member`, `parse_function`, `constant`
    EnumProperty,
    /// `doc`, `scope`, `name`, `type`
    Event,
    /// `name`, `event_name`, `type`
    EventRaiser,
    /// `constant`, `raiser`, `type`, `enumerated`, `parse_function`
    DispatchBranch,
    /// `branches`
    Dispatcher,
    /// `out`, `name`, `type`
    Parameter,
    /// `index`, `name`, `enumerated`, `to_string_function`
    InAssignment,
    /// `index`, `type`, `enumerated`, `parse_function`
    OutValue,
    /// `name`, `value`
    OutAssignment,
    /// `doc`, `scope`, `name`, `parameters`, `return_type`, `constant`,
    /// `in_count`, `in_upper`, `in_assignments`, `return_value`
    SingleReturnAction,
    /// `doc`, `scope`, `name`, `parameters`, `constant`, `in_count`,
    /// `in_upper`, `in_assignments`, `out_assignments`
    MultiOutAction,
    /// `doc`, `scope`, `name`, `member`
    DeviceInfoProperty,
    /// `doc`, `scope`, `name`, `type`, `constant`, `specific`
    ServiceProperty,
    /// `doc`, `scope`, `name`, `type`, `constant`, `specific`
    DeviceProperty,
    /// `header`, `namespace`, `doc`, `scope`, `partial`, `class_name`, `body`
    ServiceClass,
    /// `header`, `namespace`, `doc`, `scope`, `partial`, `class_name`, `body`
    DeviceClass,
}

impl TemplateKind {
    pub const ALL: [TemplateKind; 26] = [
        TemplateKind::Constant,
        TemplateKind::Region,
        TemplateKind::DocComment,
        TemplateKind::Enumeration,
        TemplateKind::EnumMember,
        TemplateKind::EnumParse,
        TemplateKind::EnumParseCase,
        TemplateKind::EnumToString,
        TemplateKind::EnumToStringCase,
        TemplateKind::Property,
        TemplateKind::EnumProperty,
        TemplateKind::Event,
        TemplateKind::EventRaiser,
        TemplateKind::DispatchBranch,
        TemplateKind::Dispatcher,
        TemplateKind::Parameter,
        TemplateKind::InAssignment,
        TemplateKind::OutValue,
        TemplateKind::OutAssignment,
        TemplateKind::SingleReturnAction,
        TemplateKind::MultiOutAction,
        TemplateKind::DeviceInfoProperty,
        TemplateKind::ServiceProperty,
        TemplateKind::DeviceProperty,
        TemplateKind::ServiceClass,
        TemplateKind::DeviceClass,
    ];

    /// Nom d'enregistrement du gabarit.
    pub fn name(self) -> &'static str {
        match self {
            TemplateKind::Constant => "constant",
            TemplateKind::Region => "region",
            TemplateKind::DocComment => "doc_comment",
            TemplateKind::Enumeration => "enumeration",
            TemplateKind::EnumMember => "enum_member",
            TemplateKind::EnumParse => "enum_parse",
            TemplateKind::EnumParseCase => "enum_parse_case",
            TemplateKind::EnumToString => "enum_to_string",
            TemplateKind::EnumToStringCase => "enum_to_string_case",
            TemplateKind::Property => "property",
            TemplateKind::EnumProperty => "enum_property",
            TemplateKind::Event => "event",
            TemplateKind::EventRaiser => "event_raiser",
            TemplateKind::DispatchBranch => "dispatch_branch",
            TemplateKind::Dispatcher => "dispatcher",
            TemplateKind::Parameter => "parameter",
            TemplateKind::InAssignment => "in_assignment",
            TemplateKind::OutValue => "out_value",
            TemplateKind::OutAssignment => "out_assignment",
            TemplateKind::SingleReturnAction => "single_return_action",
            TemplateKind::MultiOutAction => "multi_out_action",
            TemplateKind::DeviceInfoProperty => "device_info_property",
            TemplateKind::ServiceProperty => "service_property",
            TemplateKind::DeviceProperty => "device_property",
            TemplateKind::ServiceClass => "service_class",
            TemplateKind::DeviceClass => "device_class",
        }
    }
}

impl fmt::Display for TemplateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contrat d'un langage cible.
///
/// Un fournisseur est sans état : deux instances du même type sont
/// interchangeables.
pub trait SyntaxProvider {
    /// Nom du langage (`csharp`, `vb`).
    fn name(&self) -> &'static str;

    /// Extension d'un fichier de classe complète (`.cs`).
    fn file_extension(&self) -> &'static str;

    /// Extension d'un fichier de classe partielle (`.designer.cs`).
    fn partial_file_extension(&self) -> &'static str;

    /// Les identificateurs du langage distinguent-ils la casse ?
    fn case_sensitive(&self) -> bool;

    /// Mots réservés du langage.
    fn keywords(&self) -> &'static [&'static str];

    /// Forme échappée d'un identificateur réservé (`@event`, `[End]`).
    fn escape_reserved(&self, identifier: &str) -> String;

    fn scope(&self, scope: Scope) -> &'static str;

    fn type_name(&self, data_type: StateVarType) -> &'static str;

    /// Type de repli quand le type d'une variable est inconnu ou qu'une
    /// référence n'a pas pu être résolue.
    fn unknown_type(&self) -> &'static str;

    fn string_literal(&self, value: &str) -> String;

    /// Identificateur d'une constante du groupe `group`.
    fn constant_identifier(&self, group: &str, name: &str) -> String;

    fn template(&self, kind: TemplateKind) -> &'static str;

    fn is_keyword(&self, identifier: &str) -> bool {
        if self.case_sensitive() {
            self.keywords().contains(&identifier)
        } else {
            self.keywords()
                .iter()
                .any(|k| k.eq_ignore_ascii_case(identifier))
        }
    }

    /// Échappe `identifier` s'il s'agit d'un mot réservé.
    fn escape_keyword(&self, identifier: &str) -> String {
        if self.is_keyword(identifier) {
            self.escape_reserved(identifier)
        } else {
            identifier.to_string()
        }
    }

    /// Forme assainie non échappée, base des noms composés.
    fn sanitize(&self, raw: &str, is_parameter: bool) -> String {
        identifiers::sanitize(raw, is_parameter)
    }

    /// Identificateur final utilisable tel quel dans le code généré.
    fn identifier(&self, raw: &str, is_parameter: bool) -> String {
        self.escape_keyword(&self.sanitize(raw, is_parameter))
    }

    fn resolve_type(&self, data_type: Option<StateVarType>) -> &'static str {
        data_type.map_or_else(|| self.unknown_type(), |t| self.type_name(t))
    }
}

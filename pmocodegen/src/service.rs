//! Générateur de classe de service.
//!
//! Pour chaque variable d'état :
//! - variable énumérée (type textuel et liste de valeurs autorisées non
//!   vide) : un type énuméré `{Var}Enum` avec un membre par valeur plus la
//!   sentinelle `_Unknown`, une fonction de lecture, une fonction de
//!   conversion en texte, une propriété typée par l'énumération et une
//!   propriété `{Var}AsString` ;
//! - autre variable : une propriété typée.
//!
//! Une variable évènementielle produit en plus un événement `{Var}Changed`,
//! sa méthode de déclenchement et une branche du répartiteur des
//! notifications.
//!
//! Une action avec exactement un argument de sortie devient une fonction qui
//! retourne cette valeur ; sinon une méthode sans retour avec un paramètre de
//! sortie par argument `out`. Les arguments d'entrée sont rangés dans le
//! tableau d'appel selon leur position parmi les seuls arguments `in`.

use std::collections::HashSet;

use pmodescription::{Action, Argument, Direction, ServiceDescription, StateVariable};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::{
    constants::{ConstantPool, GROUP_ACTION_NAME, GROUP_STATE_VAR_NAME, allowed_value_group},
    errors::GeneratorError,
    generated::{ClassOptions, GeneratedClass},
    naming::NameScope,
    probe::{ProbeError, ServiceControl},
    syntax::{SyntaxProvider, TemplateKind},
    templates::TemplateEngine,
};

/// Membre sentinelle des énumérations générées
pub const UNKNOWN_MEMBER: &str = "_Unknown";

/// Noms utilisés par les gabarits de classe de service
const RESERVED_MEMBERS: &[&str] = &[
    "moService",
    "Service",
    "StateVariableChanged",
    "ServiceInstanceDied",
];

/// Variables locales des méthodes d'action
const RESERVED_LOCALS: &[&str] = &["loIn", "loOut", "loOutValues"];

/// Options du générateur de service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceOptions {
    pub class: ClassOptions,
    /// Interroge chaque variable avant d'émettre sa propriété (nécessite une
    /// sonde, voir [`ServiceGenerator::generate_with_probe`]).
    pub test_state_vars: bool,
}

impl ServiceOptions {
    pub fn new(class: ClassOptions) -> Self {
        Self {
            class,
            test_state_vars: false,
        }
    }

    pub fn with_test_state_vars(mut self, test_state_vars: bool) -> Self {
        self.test_state_vars = test_state_vars;
        self
    }
}

pub struct ServiceGenerator<P: SyntaxProvider> {
    provider: P,
    engine: TemplateEngine,
}

impl<P: SyntaxProvider> ServiceGenerator<P> {
    pub fn new(provider: P) -> Result<Self, GeneratorError> {
        let engine = TemplateEngine::new(&provider)?;
        Ok(Self { provider, engine })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn generate(
        &self,
        service: &ServiceDescription,
        options: &ServiceOptions,
    ) -> Result<GeneratedClass, GeneratorError> {
        self.generate_with_probe(service, options, None)
    }

    /// Génère la classe ; quand `options.test_state_vars` est vrai, `probe`
    /// est interrogée pour chaque variable d'état.
    pub fn generate_with_probe(
        &self,
        service: &ServiceDescription,
        options: &ServiceOptions,
        probe: Option<&dyn ServiceControl>,
    ) -> Result<GeneratedClass, GeneratorError> {
        let probe = match (options.test_state_vars, probe) {
            (true, None) => {
                warn!("State variable testing requested without a live service, skipping probes");
                None
            }
            (true, probe) => probe,
            (false, _) => None,
        };

        let mut build = ServiceBuild::new(&self.provider, &self.engine, service, options);
        build.collect_variables(probe);
        let actions = build.collect_actions();

        let mut sections = vec![("Constants", String::new())];
        sections.push(("Enumerations", build.render_enumerations()?));
        sections.push(("Properties", build.render_properties()?));
        sections.push(("Events", build.render_events()?));
        sections.push(("Actions", build.render_actions(&actions)?));
        // Les constantes ne sont complètes qu'une fois tout le reste rendu
        sections[0].1 = build.pool.definitions(&self.engine)?;

        let source = build.render_class(&sections)?;
        let class = GeneratedClass::new(
            &self.provider,
            &build.class_base,
            options.class.partial,
            source,
        );

        info!(
            class = %class.class_name,
            language = self.provider.name(),
            actions = actions.len(),
            state_variables = build.variables.len(),
            constants = build.pool.len(),
            "Service class generated"
        );
        Ok(class)
    }
}

struct EnumModel {
    name: String,
    parse_function: String,
    to_string_function: String,
    /// (membre, constante de la valeur)
    members: Vec<(String, String)>,
}

struct VariableModel<'d> {
    variable: &'d StateVariable,
    constant: String,
    type_name: &'static str,
    enumeration: Option<EnumModel>,
    /// `None` quand la sonde a jugé la variable inaccessible
    property: Option<String>,
    string_property: Option<String>,
    event: Option<(String, String)>,
}

impl VariableModel<'_> {
    /// Type exposé : l'énumération pour une variable énumérée.
    fn exposed_type(&self) -> &str {
        match &self.enumeration {
            Some(enumeration) => &enumeration.name,
            None => self.type_name,
        }
    }
}

struct ArgumentModel<'v> {
    name: String,
    direction: Direction,
    /// Position parmi les arguments de même sens
    index: usize,
    type_name: String,
    enumeration: Option<&'v EnumModel>,
}

struct ActionModel<'d> {
    action: &'d Action,
    constant: String,
    method: String,
    arguments: Vec<(&'d Argument, String)>,
}

#[derive(Serialize)]
struct DocData<'a> {
    summary: &'a str,
    remarks: &'a str,
}

struct ServiceBuild<'g, 'd, P: SyntaxProvider> {
    provider: &'g P,
    engine: &'g TemplateEngine,
    service: &'d ServiceDescription,
    options: &'g ServiceOptions,
    pool: ConstantPool<'g, P>,
    members: NameScope,
    class_base: String,
    variables: Vec<VariableModel<'d>>,
}

impl<'g, 'd, P: SyntaxProvider> ServiceBuild<'g, 'd, P> {
    fn new(
        provider: &'g P,
        engine: &'g TemplateEngine,
        service: &'d ServiceDescription,
        options: &'g ServiceOptions,
    ) -> Self {
        let mut members = NameScope::new(provider.case_sensitive());
        let class_base = members.allocate(&provider.sanitize(&options.class.class_name, false));
        for reserved in RESERVED_MEMBERS {
            members.reserve(reserved);
        }

        Self {
            provider,
            engine,
            service,
            options,
            pool: ConstantPool::new(provider).with_scope(options.class.scope),
            members,
            class_base,
            variables: Vec::new(),
        }
    }

    fn escape(&self, name: &str) -> String {
        self.provider.escape_keyword(name)
    }

    fn doc(&self, summary: &str, remarks: &str) -> Result<String, GeneratorError> {
        self.engine
            .render(TemplateKind::DocComment, &DocData { summary, remarks })
    }

    fn is_accessible(&self, variable: &StateVariable, probe: Option<&dyn ServiceControl>) -> bool {
        let Some(probe) = probe else {
            return true;
        };
        match probe.query_state_variable(variable.name()) {
            Ok(value) => {
                debug!(variable = %variable.name(), value = %value, "State variable answered");
                true
            }
            Err(ProbeError::ValueUnknown) => {
                debug!(variable = %variable.name(), "State variable value unknown, keeping property");
                true
            }
            Err(ProbeError::Failed(reason)) => {
                warn!(variable = %variable.name(), reason = %reason, "State variable not accessible, property omitted");
                false
            }
        }
    }

    /// Déclare les constantes et alloue les noms de chaque variable d'état,
    /// dans l'ordre de déclaration.
    fn collect_variables(&mut self, probe: Option<&dyn ServiceControl>) {
        let service = self.service;
        for variable in service.state_variables().values() {
            let base = self.provider.sanitize(variable.name(), false);
            let constant = self.pool.get(
                GROUP_STATE_VAR_NAME,
                variable.name(),
                variable.name(),
                variable.data_type_name(),
            );
            let enumeration = if variable.is_enumerated() {
                Some(self.collect_enumeration(variable, &base))
            } else {
                None
            };

            let (property, string_property) = if self.is_accessible(variable, probe) {
                let property = self.members.allocate(&base);
                let string_property = enumeration
                    .as_ref()
                    .map(|_| self.members.allocate(&format!("{base}AsString")));
                (Some(property), string_property)
            } else {
                (None, None)
            };

            let event = if variable.send_events() {
                let event = self.members.allocate(&format!("{base}Changed"));
                let raiser = self.members.allocate(&format!("On{event}"));
                Some((event, raiser))
            } else {
                None
            };

            let model = VariableModel {
                variable,
                constant,
                type_name: self.provider.resolve_type(variable.data_type()),
                enumeration,
                property: property.map(|p| self.escape(&p)),
                string_property: string_property.map(|p| self.escape(&p)),
                event: event.map(|(e, r)| (self.escape(&e), self.escape(&r))),
            };
            self.variables.push(model);
        }
    }

    fn collect_enumeration(&mut self, variable: &StateVariable, base: &str) -> EnumModel {
        let name = self.members.allocate(&format!("{base}Enum"));
        let parse_function = self.members.allocate(&format!("Parse{name}"));
        let to_string_function = self.members.allocate(&format!("{name}ToString"));

        let mut member_names = NameScope::new(self.provider.case_sensitive());
        member_names.reserve(UNKNOWN_MEMBER);
        let group = allowed_value_group(variable.name());
        let mut seen = HashSet::new();
        let mut members = Vec::new();

        for value in variable.allowed_values().map(|l| l.values()).unwrap_or_default() {
            if !seen.insert(value.as_str()) {
                debug!(variable = %variable.name(), value = %value, "Duplicate allowed value");
                continue;
            }
            let member = member_names.allocate(&self.provider.sanitize(value, false));
            let constant = self.pool.get(&group, value, value, "");
            members.push((self.escape(&member), constant));
        }

        EnumModel {
            name: self.escape(&name),
            parse_function: self.escape(&parse_function),
            to_string_function: self.escape(&to_string_function),
            members,
        }
    }

    fn collect_actions(&mut self) -> Vec<ActionModel<'d>> {
        let service = self.service;
        let mut actions = Vec::new();
        for action in service.actions().values() {
            let constant = self
                .pool
                .get(GROUP_ACTION_NAME, action.name(), action.name(), "");
            let method = self.members.allocate(&self.provider.sanitize(action.name(), false));

            let mut parameters = NameScope::new(self.provider.case_sensitive());
            for local in RESERVED_LOCALS {
                parameters.reserve(local);
            }
            let arguments = action
                .arguments()
                .iter()
                .filter(|argument| {
                    let known = argument.direction() != Direction::Unknown;
                    if !known {
                        debug!(action = %action.name(), argument = %argument.name(), "Argument without direction skipped");
                    }
                    known
                })
                .map(|argument| {
                    let name = parameters.allocate(&self.provider.sanitize(argument.name(), true));
                    (argument, self.escape(&name))
                })
                .collect();

            actions.push(ActionModel {
                action,
                constant,
                method: self.escape(&method),
                arguments,
            });
        }
        actions
    }

    /// Type d'un argument d'après sa variable liée ; repli sur le type
    /// inconnu du fournisseur quand la référence n'est pas résolue.
    fn argument_model<'v>(
        &'v self,
        action: &Action,
        argument: &Argument,
        name: &str,
        index: usize,
    ) -> ArgumentModel<'v> {
        let related = argument
            .related()
            .and_then(|r| self.variables.get(r.index()));
        let (type_name, enumeration) = match related {
            Some(model) => (model.exposed_type().to_string(), model.enumeration.as_ref()),
            None => {
                debug!(
                    action = %action.name(),
                    argument = %argument.name(),
                    related = %argument.related_state_variable(),
                    "Unresolved related state variable, using the unknown type"
                );
                (self.provider.unknown_type().to_string(), None)
            }
        };

        ArgumentModel {
            name: name.to_string(),
            direction: argument.direction(),
            index,
            type_name,
            enumeration,
        }
    }

    fn render_enumerations(&self) -> Result<String, GeneratorError> {
        let scope = self.provider.scope(self.options.class.scope);
        let mut blocks = Vec::new();

        for model in &self.variables {
            let Some(enumeration) = &model.enumeration else {
                continue;
            };
            let name = model.variable.name();

            let mut members = enumeration
                .members
                .iter()
                .map(|(member, _)| self.engine.render(TemplateKind::EnumMember, &json!({ "name": member })))
                .collect::<Result<Vec<_>, _>>()?;
            members.push(
                self.engine
                    .render(TemplateKind::EnumMember, &json!({ "name": UNKNOWN_MEMBER }))?,
            );

            blocks.push(self.engine.render(
                TemplateKind::Enumeration,
                &json!({
                    "doc": self.doc(&format!("Allowed values of the {name} state variable."), "")?,
                    "scope": scope,
                    "name": enumeration.name,
                    "members": members.join("\n"),
                }),
            )?);

            let parse_cases = enumeration
                .members
                .iter()
                .map(|(member, constant)| {
                    self.engine.render(
                        TemplateKind::EnumParseCase,
                        &json!({ "enum_name": enumeration.name, "member": member, "constant": constant }),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            blocks.push(self.engine.render(
                TemplateKind::EnumParse,
                &json!({
                    "scope": scope,
                    "function_name": enumeration.parse_function,
                    "enum_name": enumeration.name,
                    "unknown_member": UNKNOWN_MEMBER,
                    "cases": parse_cases.join("\n"),
                }),
            )?);

            let to_string_cases = enumeration
                .members
                .iter()
                .map(|(member, constant)| {
                    self.engine.render(
                        TemplateKind::EnumToStringCase,
                        &json!({ "enum_name": enumeration.name, "member": member, "constant": constant }),
                    )
                })
                .collect::<Result<Vec<_>, _>>()?;
            blocks.push(self.engine.render(
                TemplateKind::EnumToString,
                &json!({
                    "scope": scope,
                    "function_name": enumeration.to_string_function,
                    "enum_name": enumeration.name,
                    "cases": to_string_cases.join("\n"),
                }),
            )?);
        }

        Ok(blocks.join("\n\n"))
    }

    fn variable_remarks(variable: &StateVariable) -> String {
        let mut remarks = Vec::new();
        if let Some(range) = variable.allowed_range() {
            let mut text = format!(
                "Allowed range: {} to {}",
                range.minimum().unwrap_or("?"),
                range.maximum().unwrap_or("?")
            );
            if let Some(step) = range.step() {
                text.push_str(&format!(", step {step}"));
            }
            text.push('.');
            remarks.push(text);
        }
        if let Some(default) = variable.default_value() {
            remarks.push(format!("Default value: {default}."));
        }
        remarks.join("\n")
    }

    fn render_properties(&self) -> Result<String, GeneratorError> {
        let scope = self.provider.scope(self.options.class.scope);
        let mut blocks = Vec::new();

        for model in &self.variables {
            let Some(property) = &model.property else {
                continue;
            };
            let name = model.variable.name();
            let remarks = Self::variable_remarks(model.variable);
            let summary = format!(
                "Current value of the {name} state variable ({}).",
                model.variable.data_type_name()
            );

            let block = match (&model.enumeration, &model.string_property) {
                (Some(enumeration), Some(string_property)) => self.engine.render(
                    TemplateKind::EnumProperty,
                    &json!({
                        "doc": self.doc(&summary, &remarks)?,
                        "string_doc": self.doc(&format!("Raw text value of the {name} state variable."), "")?,
                        "scope": scope,
                        "name": property,
                        "string_name": string_property,
                        "enum_name": enumeration.name,
                        "unknown_member": UNKNOWN_MEMBER,
                        "parse_function": enumeration.parse_function,
                        "constant": model.constant,
                    }),
                )?,
                _ => self.engine.render(
                    TemplateKind::Property,
                    &json!({
                        "doc": self.doc(&summary, &remarks)?,
                        "scope": scope,
                        "name": property,
                        "type": model.type_name,
                        "constant": model.constant,
                    }),
                )?,
            };
            blocks.push(block);
        }

        Ok(blocks.join("\n\n"))
    }

    fn render_events(&self) -> Result<String, GeneratorError> {
        let scope = self.provider.scope(self.options.class.scope);
        let mut blocks = Vec::new();
        let mut branches = Vec::new();

        for model in &self.variables {
            let Some((event, raiser)) = &model.event else {
                continue;
            };
            let name = model.variable.name();
            let exposed = model.exposed_type();
            let parse_function = model
                .enumeration
                .as_ref()
                .map(|e| e.parse_function.as_str())
                .unwrap_or("");

            blocks.push(self.engine.render(
                TemplateKind::Event,
                &json!({
                    "doc": self.doc(&format!("Raised when the {name} state variable changes."), "")?,
                    "scope": scope,
                    "name": event,
                    "type": exposed,
                }),
            )?);
            blocks.push(self.engine.render(
                TemplateKind::EventRaiser,
                &json!({ "name": raiser, "event_name": event, "type": exposed }),
            )?);
            branches.push(self.engine.render(
                TemplateKind::DispatchBranch,
                &json!({
                    "constant": model.constant,
                    "raiser": raiser,
                    "type": exposed,
                    "enumerated": model.enumeration.is_some(),
                    "parse_function": parse_function,
                }),
            )?);
        }

        blocks.push(self.engine.render(
            TemplateKind::Dispatcher,
            &json!({ "branches": branches.join("\n") }),
        )?);
        Ok(blocks.join("\n\n"))
    }

    fn render_parameter(&self, argument: &ArgumentModel<'_>, out: bool) -> Result<String, GeneratorError> {
        self.engine.render(
            TemplateKind::Parameter,
            &json!({ "out": out, "name": argument.name, "type": argument.type_name }),
        )
    }

    fn render_out_value(&self, argument: &ArgumentModel<'_>) -> Result<String, GeneratorError> {
        self.engine.render(
            TemplateKind::OutValue,
            &json!({
                "index": argument.index,
                "type": argument.type_name,
                "enumerated": argument.enumeration.is_some(),
                "parse_function": argument.enumeration.map(|e| e.parse_function.as_str()).unwrap_or(""),
            }),
        )
    }

    fn render_action(&self, model: &ActionModel<'_>) -> Result<String, GeneratorError> {
        let scope = self.provider.scope(self.options.class.scope);
        let action = model.action;

        let mut in_index = 0;
        let mut out_index = 0;
        let mut arguments = Vec::with_capacity(model.arguments.len());
        for (argument, name) in &model.arguments {
            let index = if argument.is_in() {
                in_index += 1;
                in_index - 1
            } else {
                out_index += 1;
                out_index - 1
            };
            arguments.push(self.argument_model(action, argument, name, index));
        }
        let ins: Vec<&ArgumentModel<'_>> = arguments.iter().filter(|a| a.direction == Direction::In).collect();
        let outs: Vec<&ArgumentModel<'_>> = arguments.iter().filter(|a| a.direction == Direction::Out).collect();

        let in_assignments = ins
            .iter()
            .map(|argument| {
                self.engine.render(
                    TemplateKind::InAssignment,
                    &json!({
                        "index": argument.index,
                        "name": argument.name,
                        "enumerated": argument.enumeration.is_some(),
                        "to_string_function": argument.enumeration.map(|e| e.to_string_function.as_str()).unwrap_or(""),
                    }),
                )
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        let remarks = arguments
            .iter()
            .zip(&model.arguments)
            .map(|(argument, (source, _))| {
                format!(
                    "{} ({}): {}",
                    source.name(),
                    argument.direction,
                    match source.related_state_variable() {
                        "" => "no related state variable",
                        related => related,
                    }
                )
            })
            .collect::<Vec<_>>()
            .join("\n");
        let doc = self.doc(&format!("Invokes the {} action.", action.name()), &remarks)?;
        let in_count = ins.len();
        let in_upper = in_count as i64 - 1;

        if let [single] = outs.as_slice() {
            let parameters = ins
                .iter()
                .map(|argument| self.render_parameter(argument, false))
                .collect::<Result<Vec<_>, _>>()?
                .join(", ");
            return self.engine.render(
                TemplateKind::SingleReturnAction,
                &json!({
                    "doc": doc,
                    "scope": scope,
                    "name": model.method,
                    "parameters": parameters,
                    "return_type": single.type_name,
                    "constant": model.constant,
                    "in_count": in_count,
                    "in_upper": in_upper,
                    "in_assignments": in_assignments,
                    "return_value": self.render_out_value(single)?,
                }),
            );
        }

        let parameters = arguments
            .iter()
            .map(|argument| self.render_parameter(argument, argument.direction == Direction::Out))
            .collect::<Result<Vec<_>, _>>()?
            .join(", ");
        let out_assignments = outs
            .iter()
            .map(|argument| {
                self.engine.render(
                    TemplateKind::OutAssignment,
                    &json!({ "name": argument.name, "value": self.render_out_value(argument)? }),
                )
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n");

        self.engine.render(
            TemplateKind::MultiOutAction,
            &json!({
                "doc": doc,
                "scope": scope,
                "name": model.method,
                "parameters": parameters,
                "constant": model.constant,
                "in_count": in_count,
                "in_upper": in_upper,
                "in_assignments": in_assignments,
                "out_assignments": out_assignments,
            }),
        )
    }

    fn render_actions(&self, actions: &[ActionModel<'_>]) -> Result<String, GeneratorError> {
        Ok(actions
            .iter()
            .map(|model| self.render_action(model))
            .collect::<Result<Vec<_>, _>>()?
            .join("\n\n"))
    }

    fn render_class(&self, sections: &[(&str, String)]) -> Result<String, GeneratorError> {
        let body = sections
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .map(|(name, text)| {
                self.engine
                    .render(TemplateKind::Region, &json!({ "name": name, "body": text }))
            })
            .collect::<Result<Vec<_>, _>>()?
            .join("\n\n");

        let summary = match self.options.class.source_type.as_str() {
            "" => "Control point wrapper for a UPnP service.".to_string(),
            source => format!("Control point wrapper for the {source} service."),
        };

        self.engine.render(
            TemplateKind::ServiceClass,
            &json!({
                "header": self.options.class.header(),
                "namespace": self.options.class.namespace_for(self.provider),
                "doc": self.doc(&summary, "")?,
                "scope": self.provider.scope(self.options.class.scope),
                "partial": self.options.class.partial,
                "class_name": self.escape(&self.class_base),
                "body": body,
            }),
        )
    }
}

//! Syntaxe C#.

use pmodescription::StateVarType;

use super::{Scope, SyntaxProvider, TemplateKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct CSharpSyntax;

const KEYWORDS: &[&str] = &[
    "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
    "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
    "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
    "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
    "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
    "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed", "short",
    "sizeof", "stackalloc", "static", "string", "struct", "switch", "this", "throw", "true",
    "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort", "using", "virtual",
    "void", "volatile", "while",
];

const CONSTANT: &str = r#"{{scope}} const string {{name}} = {{literal}};{{#if comment}} // {{comment}}{{/if}}"#;

const REGION: &str = r#"#region {{name}}

{{body}}

#endregion"#;

const DOC_COMMENT: &str = r#"/// <summary>
{{prefix summary "/// "}}
/// </summary>{{#if remarks}}
/// <remarks>
{{prefix remarks "/// "}}
/// </remarks>{{/if}}"#;

const ENUMERATION: &str = r#"{{doc}}
{{scope}} enum {{name}}
{
{{indent members 1}}
}"#;

const ENUM_MEMBER: &str = r#"{{name}},"#;

const ENUM_PARSE: &str = r#"{{scope}} static {{enum_name}} {{function_name}}(string value)
{
    switch (value)
    {
{{indent cases 2}}
        default:
            return {{enum_name}}.{{unknown_member}};
    }
}"#;

const ENUM_PARSE_CASE: &str = r#"case {{constant}}:
    return {{enum_name}}.{{member}};"#;

const ENUM_TO_STRING: &str = r#"{{scope}} static string {{function_name}}({{enum_name}} value)
{
    switch (value)
    {
{{indent cases 2}}
        default:
            return "";
    }
}"#;

const ENUM_TO_STRING_CASE: &str = r#"case {{enum_name}}.{{member}}:
    return {{constant}};"#;

const PROPERTY: &str = r#"{{doc}}
{{scope}} {{type}} {{name}}
{
    get
    {
        return ({{type}})moService.QueryStateVariable({{constant}});
    }
}"#;

const ENUM_PROPERTY: &str = r#"{{doc}}
{{scope}} {{enum_name}} {{name}}
{
    get
    {
        try
        {
            return {{parse_function}}((string)moService.QueryStateVariable({{constant}}));
        }
        catch (Exception)
        {
            return {{enum_name}}.{{unknown_member}};
        }
    }
}

{{string_doc}}
{{scope}} string {{string_name}}
{
    get
    {
        return (string)moService.QueryStateVariable({{constant}});
    }
}"#;

const EVENT: &str = r#"{{doc}}
{{scope}} event Action<{{type}}> {{name}};"#;

const EVENT_RAISER: &str = r#"protected virtual void {{name}}({{type}} value)
{
    Action<{{type}}> handler = {{event_name}};
    if (handler != null)
    {
        handler(value);
    }
}"#;

const DISPATCH_BRANCH: &str = r#"case {{constant}}:
    {{raiser}}({{#if enumerated}}{{parse_function}}((string)vaValue){{else}}({{type}})vaValue{{/if}});
    break;"#;

const DISPATCHER: &str = r#"void IUPnPServiceCallback.StateVariableChanged(UPnPService pus, string pcwszStateVarName, object vaValue)
{
    switch (pcwszStateVarName)
    {
{{indent branches 2}}
    }
}

void IUPnPServiceCallback.ServiceInstanceDied(UPnPService pus)
{
}"#;

const PARAMETER: &str = r#"{{#if out}}out {{/if}}{{type}} {{name}}"#;

const IN_ASSIGNMENT: &str = r#"loIn[{{index}}] = {{#if enumerated}}{{to_string_function}}({{name}}){{else}}{{name}}{{/if}};"#;

const OUT_VALUE: &str = r#"{{#if enumerated}}{{parse_function}}((string)loOutValues[{{index}}]){{else}}({{type}})loOutValues[{{index}}]{{/if}}"#;

const OUT_ASSIGNMENT: &str = r#"{{name}} = {{value}};"#;

const SINGLE_RETURN_ACTION: &str = r#"{{doc}}
{{scope}} {{return_type}} {{name}}({{parameters}})
{
    object[] loIn = new object[{{in_count}}];
    object loOut = null;
{{indent in_assignments 1}}
    moService.InvokeAction({{constant}}, loIn, ref loOut);
    object[] loOutValues = (object[])loOut;
    return {{return_value}};
}"#;

const MULTI_OUT_ACTION: &str = r#"{{doc}}
{{scope}} void {{name}}({{parameters}})
{
    object[] loIn = new object[{{in_count}}];
    object loOut = null;
{{indent in_assignments 1}}
    moService.InvokeAction({{constant}}, loIn, ref loOut);
{{#if out_assignments}}
    object[] loOutValues = (object[])loOut;
{{indent out_assignments 1}}
{{/if}}
}"#;

const DEVICE_INFO_PROPERTY: &str = r#"{{doc}}
{{scope}} string {{name}}
{
    get
    {
        return moDevice.{{member}};
    }
}"#;

const SERVICE_PROPERTY: &str = r#"{{doc}}
{{scope}} {{type}} {{name}}
{
    get
    {
        return {{#if specific}}new {{type}}(moDevice.Services[{{constant}}]){{else}}moDevice.Services[{{constant}}]{{/if}};
    }
}"#;

const DEVICE_PROPERTY: &str = r#"{{doc}}
{{scope}} {{type}} {{name}}
{
    get
    {
        return {{#if specific}}new {{type}}(moDevice.Children[{{constant}}]){{else}}moDevice.Children[{{constant}}]{{/if}};
    }
}"#;

const SERVICE_CLASS: &str = r#"// <auto-generated>
//     {{header}}
// </auto-generated>

using System;
using UPNPLib;

namespace {{namespace}}
{
{{indent doc 1}}
    {{scope}} {{#if partial}}partial {{/if}}class {{class_name}} : IUPnPServiceCallback
    {
        private UPnPService moService;

        public {{class_name}}(UPnPService service)
        {
            moService = service;
            moService.AddCallback(this);
        }

        public UPnPService Service
        {
            get
            {
                return moService;
            }
        }

{{indent body 2}}
    }
}
"#;

const DEVICE_CLASS: &str = r#"// <auto-generated>
//     {{header}}
// </auto-generated>

using System;
using UPNPLib;

namespace {{namespace}}
{
{{indent doc 1}}
    {{scope}} {{#if partial}}partial {{/if}}class {{class_name}}
    {
        private UPnPDevice moDevice;

        public {{class_name}}(UPnPDevice device)
        {
            moDevice = device;
        }

        public UPnPDevice Device
        {
            get
            {
                return moDevice;
            }
        }

{{indent body 2}}
    }
}
"#;

impl SyntaxProvider for CSharpSyntax {
    fn name(&self) -> &'static str {
        "csharp"
    }

    fn file_extension(&self) -> &'static str {
        ".cs"
    }

    fn partial_file_extension(&self) -> &'static str {
        ".designer.cs"
    }

    fn case_sensitive(&self) -> bool {
        true
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn escape_reserved(&self, identifier: &str) -> String {
        format!("@{identifier}")
    }

    fn scope(&self, scope: Scope) -> &'static str {
        match scope {
            Scope::Public => "public",
            Scope::Private => "private",
            Scope::Internal => "internal",
        }
    }

    fn type_name(&self, data_type: StateVarType) -> &'static str {
        match data_type {
            StateVarType::UI1 => "byte",
            StateVarType::UI2 => "ushort",
            StateVarType::UI4 => "uint",
            StateVarType::UI8 => "ulong",
            StateVarType::I1 => "sbyte",
            StateVarType::I2 => "short",
            StateVarType::I4 | StateVarType::Int => "int",
            StateVarType::I8 => "long",
            StateVarType::R4 | StateVarType::Float => "float",
            StateVarType::R8 | StateVarType::Number | StateVarType::Fixed14_4 => "double",
            StateVarType::Char => "char",
            StateVarType::Boolean => "bool",
            StateVarType::BinBase64 | StateVarType::BinHex => "byte[]",
            StateVarType::Date
            | StateVarType::DateTime
            | StateVarType::DateTimeTZ
            | StateVarType::Time
            | StateVarType::TimeTZ => "DateTime",
            StateVarType::String | StateVarType::UUID | StateVarType::URI => "string",
        }
    }

    fn unknown_type(&self) -> &'static str {
        "object"
    }

    fn string_literal(&self, value: &str) -> String {
        let mut literal = String::with_capacity(value.len() + 2);
        literal.push('"');
        for c in value.chars() {
            match c {
                '"' => literal.push_str("\\\""),
                '\\' => literal.push_str("\\\\"),
                '\n' => literal.push_str("\\n"),
                '\r' => literal.push_str("\\r"),
                '\t' => literal.push_str("\\t"),
                '\0' => literal.push_str("\\0"),
                c if c.is_control() => literal.push_str(&format!("\\u{:04x}", c as u32)),
                c => literal.push(c),
            }
        }
        literal.push('"');
        literal
    }

    fn constant_identifier(&self, group: &str, name: &str) -> String {
        format!("cs{group}_{name}")
    }

    fn template(&self, kind: TemplateKind) -> &'static str {
        match kind {
            TemplateKind::Constant => CONSTANT,
            TemplateKind::Region => REGION,
            TemplateKind::DocComment => DOC_COMMENT,
            TemplateKind::Enumeration => ENUMERATION,
            TemplateKind::EnumMember => ENUM_MEMBER,
            TemplateKind::EnumParse => ENUM_PARSE,
            TemplateKind::EnumParseCase => ENUM_PARSE_CASE,
            TemplateKind::EnumToString => ENUM_TO_STRING,
            TemplateKind::EnumToStringCase => ENUM_TO_STRING_CASE,
            TemplateKind::Property => PROPERTY,
            TemplateKind::EnumProperty => ENUM_PROPERTY,
            TemplateKind::Event => EVENT,
            TemplateKind::EventRaiser => EVENT_RAISER,
            TemplateKind::DispatchBranch => DISPATCH_BRANCH,
            TemplateKind::Dispatcher => DISPATCHER,
            TemplateKind::Parameter => PARAMETER,
            TemplateKind::InAssignment => IN_ASSIGNMENT,
            TemplateKind::OutValue => OUT_VALUE,
            TemplateKind::OutAssignment => OUT_ASSIGNMENT,
            TemplateKind::SingleReturnAction => SINGLE_RETURN_ACTION,
            TemplateKind::MultiOutAction => MULTI_OUT_ACTION,
            TemplateKind::DeviceInfoProperty => DEVICE_INFO_PROPERTY,
            TemplateKind::ServiceProperty => SERVICE_PROPERTY,
            TemplateKind::DeviceProperty => DEVICE_PROPERTY,
            TemplateKind::ServiceClass => SERVICE_CLASS,
            TemplateKind::DeviceClass => DEVICE_CLASS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keywords_are_escaped() {
        let syntax = CSharpSyntax;
        assert_eq!(syntax.identifier("event", true), "@event");
        assert_eq!(syntax.identifier("Event", false), "Event");
        assert_eq!(syntax.identifier("InstanceID", true), "instanceID");
    }

    #[test]
    fn test_string_literal() {
        let syntax = CSharpSyntax;
        assert_eq!(syntax.string_literal("Master"), "\"Master\"");
        assert_eq!(syntax.string_literal("a\"b\\c"), "\"a\\\"b\\\\c\"");
    }

    #[test]
    fn test_types() {
        let syntax = CSharpSyntax;
        assert_eq!(syntax.resolve_type(Some(StateVarType::UI1)), "byte");
        assert_eq!(syntax.resolve_type(Some(StateVarType::DateTimeTZ)), "DateTime");
        assert_eq!(syntax.resolve_type(None), "object");
    }
}

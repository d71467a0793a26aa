//! Syntaxe Visual Basic .NET.
//!
//! Les identificateurs VB ignorent la casse : les mots réservés sont comparés
//! sans tenir compte de la casse et les noms générés sont alloués dans des
//! portées insensibles à la casse.

use pmodescription::StateVarType;

use super::{Scope, SyntaxProvider, TemplateKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct VisualBasicSyntax;

const KEYWORDS: &[&str] = &[
    "AddHandler", "AddressOf", "Alias", "And", "AndAlso", "As", "Boolean", "ByRef", "Byte",
    "ByVal", "Call", "Case", "Catch", "CBool", "CByte", "CChar", "CDate", "CDbl", "CDec",
    "Char", "CInt", "Class", "CLng", "CObj", "Const", "Continue", "CSByte", "CShort", "CSng",
    "CStr", "CType", "CUInt", "CULng", "CUShort", "Date", "Decimal", "Declare", "Default",
    "Delegate", "Dim", "DirectCast", "Do", "Double", "Each", "Else", "ElseIf", "End",
    "EndIf", "Enum", "Erase", "Error", "Event", "Exit", "False", "Finally", "For", "Friend",
    "Function", "Get", "GetType", "GetXMLNamespace", "Global", "GoSub", "GoTo", "Handles",
    "If", "Implements", "Imports", "In", "Inherits", "Integer", "Interface", "Is", "IsNot",
    "Let", "Lib", "Like", "Long", "Loop", "Me", "Mod", "Module", "MustInherit",
    "MustOverride", "MyBase", "MyClass", "Namespace", "Narrowing", "New", "Next", "Not",
    "Nothing", "NotInheritable", "NotOverridable", "Object", "Of", "On", "Operator",
    "Option", "Optional", "Or", "OrElse", "Overloads", "Overridable", "Overrides",
    "ParamArray", "Partial", "Private", "Property", "Protected", "Public", "RaiseEvent",
    "ReadOnly", "ReDim", "REM", "RemoveHandler", "Resume", "Return", "SByte", "Select",
    "Set", "Shadows", "Shared", "Short", "Single", "Static", "Step", "Stop", "String",
    "Structure", "Sub", "SyncLock", "Then", "Throw", "To", "True", "Try", "TryCast",
    "TypeOf", "UInteger", "ULong", "UShort", "Using", "Variant", "Wend", "When", "While",
    "Widening", "With", "WithEvents", "WriteOnly", "Xor",
];

const CONSTANT: &str = r#"{{scope}} Const {{name}} As String = {{literal}}{{#if comment}} ' {{comment}}{{/if}}"#;

const REGION: &str = r#"#Region "{{name}}"

{{body}}

#End Region"#;

const DOC_COMMENT: &str = r#"''' <summary>
{{prefix summary "''' "}}
''' </summary>{{#if remarks}}
''' <remarks>
{{prefix remarks "''' "}}
''' </remarks>{{/if}}"#;

const ENUMERATION: &str = r#"{{doc}}
{{scope}} Enum {{name}}
{{indent members 1}}
End Enum"#;

const ENUM_MEMBER: &str = r#"{{name}}"#;

const ENUM_PARSE: &str = r#"{{scope}} Shared Function {{function_name}}(ByVal value As String) As {{enum_name}}
    Select Case value
{{indent cases 2}}
        Case Else
            Return {{enum_name}}.{{unknown_member}}
    End Select
End Function"#;

const ENUM_PARSE_CASE: &str = r#"Case {{constant}}
    Return {{enum_name}}.{{member}}"#;

const ENUM_TO_STRING: &str = r#"{{scope}} Shared Function {{function_name}}(ByVal value As {{enum_name}}) As String
    Select Case value
{{indent cases 2}}
        Case Else
            Return ""
    End Select
End Function"#;

const ENUM_TO_STRING_CASE: &str = r#"Case {{enum_name}}.{{member}}
    Return {{constant}}"#;

const PROPERTY: &str = r#"{{doc}}
{{scope}} ReadOnly Property {{name}}() As {{type}}
    Get
        Return CType(moService.QueryStateVariable({{constant}}), {{type}})
    End Get
End Property"#;

const ENUM_PROPERTY: &str = r#"{{doc}}
{{scope}} ReadOnly Property {{name}}() As {{enum_name}}
    Get
        Try
            Return {{parse_function}}(CStr(moService.QueryStateVariable({{constant}})))
        Catch ex As Exception
            Return {{enum_name}}.{{unknown_member}}
        End Try
    End Get
End Property

{{string_doc}}
{{scope}} ReadOnly Property {{string_name}}() As String
    Get
        Return CStr(moService.QueryStateVariable({{constant}}))
    End Get
End Property"#;

const EVENT: &str = r#"{{doc}}
{{scope}} Event {{name}}(ByVal value As {{type}})"#;

const EVENT_RAISER: &str = r#"Protected Overridable Sub {{name}}(ByVal value As {{type}})
    RaiseEvent {{event_name}}(value)
End Sub"#;

const DISPATCH_BRANCH: &str = r#"Case {{constant}}
    {{raiser}}({{#if enumerated}}{{parse_function}}(CStr(vaValue)){{else}}CType(vaValue, {{type}}){{/if}})"#;

const DISPATCHER: &str = r#"Private Sub StateVariableChanged(ByVal pus As UPnPService, ByVal pcwszStateVarName As String, ByVal vaValue As Object) Implements IUPnPServiceCallback.StateVariableChanged
    Select Case pcwszStateVarName
{{indent branches 2}}
    End Select
End Sub

Private Sub ServiceInstanceDied(ByVal pus As UPnPService) Implements IUPnPServiceCallback.ServiceInstanceDied
End Sub"#;

const PARAMETER: &str = r#"{{#if out}}ByRef{{else}}ByVal{{/if}} {{name}} As {{type}}"#;

const IN_ASSIGNMENT: &str = r#"loIn({{index}}) = {{#if enumerated}}{{to_string_function}}({{name}}){{else}}{{name}}{{/if}}"#;

const OUT_VALUE: &str = r#"{{#if enumerated}}{{parse_function}}(CStr(loOutValues({{index}}))){{else}}CType(loOutValues({{index}}), {{type}}){{/if}}"#;

const OUT_ASSIGNMENT: &str = r#"{{name}} = {{value}}"#;

const SINGLE_RETURN_ACTION: &str = r#"{{doc}}
{{scope}} Function {{name}}({{parameters}}) As {{return_type}}
    Dim loIn({{in_upper}}) As Object
    Dim loOut As Object = Nothing
{{indent in_assignments 1}}
    moService.InvokeAction({{constant}}, loIn, loOut)
    Dim loOutValues As Object() = CType(loOut, Object())
    Return {{return_value}}
End Function"#;

const MULTI_OUT_ACTION: &str = r#"{{doc}}
{{scope}} Sub {{name}}({{parameters}})
    Dim loIn({{in_upper}}) As Object
    Dim loOut As Object = Nothing
{{indent in_assignments 1}}
    moService.InvokeAction({{constant}}, loIn, loOut)
{{#if out_assignments}}
    Dim loOutValues As Object() = CType(loOut, Object())
{{indent out_assignments 1}}
{{/if}}
End Sub"#;

const DEVICE_INFO_PROPERTY: &str = r#"{{doc}}
{{scope}} ReadOnly Property {{name}}() As String
    Get
        Return moDevice.{{member}}
    End Get
End Property"#;

const SERVICE_PROPERTY: &str = r#"{{doc}}
{{scope}} ReadOnly Property {{name}}() As {{type}}
    Get
        Return {{#if specific}}New {{type}}(moDevice.Services({{constant}})){{else}}moDevice.Services({{constant}}){{/if}}
    End Get
End Property"#;

const DEVICE_PROPERTY: &str = r#"{{doc}}
{{scope}} ReadOnly Property {{name}}() As {{type}}
    Get
        Return {{#if specific}}New {{type}}(moDevice.Children({{constant}})){{else}}moDevice.Children({{constant}}){{/if}}
    End Get
End Property"#;

const SERVICE_CLASS: &str = r#"' <auto-generated>
'     {{header}}
' </auto-generated>

Imports System
Imports UPNPLib

Namespace {{namespace}}

{{indent doc 1}}
    {{#if partial}}Partial {{/if}}{{scope}} Class {{class_name}}
        Implements IUPnPServiceCallback

        Private moService As UPnPService

        Public Sub New(ByVal service As UPnPService)
            moService = service
            moService.AddCallback(Me)
        End Sub

        Public ReadOnly Property Service() As UPnPService
            Get
                Return moService
            End Get
        End Property

{{indent body 2}}

    End Class

End Namespace
"#;

const DEVICE_CLASS: &str = r#"' <auto-generated>
'     {{header}}
' </auto-generated>

Imports System
Imports UPNPLib

Namespace {{namespace}}

{{indent doc 1}}
    {{#if partial}}Partial {{/if}}{{scope}} Class {{class_name}}

        Private moDevice As UPnPDevice

        Public Sub New(ByVal device As UPnPDevice)
            moDevice = device
        End Sub

        Public ReadOnly Property Device() As UPnPDevice
            Get
                Return moDevice
            End Get
        End Property

{{indent body 2}}

    End Class

End Namespace
"#;

impl SyntaxProvider for VisualBasicSyntax {
    fn name(&self) -> &'static str {
        "vb"
    }

    fn file_extension(&self) -> &'static str {
        ".vb"
    }

    fn partial_file_extension(&self) -> &'static str {
        ".designer.vb"
    }

    fn case_sensitive(&self) -> bool {
        false
    }

    fn keywords(&self) -> &'static [&'static str] {
        KEYWORDS
    }

    fn escape_reserved(&self, identifier: &str) -> String {
        format!("[{identifier}]")
    }

    fn scope(&self, scope: Scope) -> &'static str {
        match scope {
            Scope::Public => "Public",
            Scope::Private => "Private",
            Scope::Internal => "Friend",
        }
    }

    fn type_name(&self, data_type: StateVarType) -> &'static str {
        match data_type {
            StateVarType::UI1 => "Byte",
            StateVarType::UI2 => "UShort",
            StateVarType::UI4 => "UInteger",
            StateVarType::UI8 => "ULong",
            StateVarType::I1 => "SByte",
            StateVarType::I2 => "Short",
            StateVarType::I4 | StateVarType::Int => "Integer",
            StateVarType::I8 => "Long",
            StateVarType::R4 | StateVarType::Float => "Single",
            StateVarType::R8 | StateVarType::Number | StateVarType::Fixed14_4 => "Double",
            StateVarType::Char => "Char",
            StateVarType::Boolean => "Boolean",
            StateVarType::BinBase64 | StateVarType::BinHex => "Byte()",
            StateVarType::Date
            | StateVarType::DateTime
            | StateVarType::DateTimeTZ
            | StateVarType::Time
            | StateVarType::TimeTZ => "Date",
            StateVarType::String | StateVarType::UUID | StateVarType::URI => "String",
        }
    }

    fn unknown_type(&self) -> &'static str {
        "Object"
    }

    /// Les guillemets sont doublés ; VB n'a pas de séquence d'échappement.
    fn string_literal(&self, value: &str) -> String {
        format!("\"{}\"", value.replace('"', "\"\""))
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
    fn test_keywords_ignore_case() {
        let syntax = VisualBasicSyntax;
        assert_eq!(syntax.identifier("end", true), "[end]");
        assert_eq!(syntax.identifier("Step", false), "[Step]");
        assert_eq!(syntax.identifier("Volume", false), "Volume");
    }

    #[test]
    fn test_string_literal_doubles_quotes() {
        assert_eq!(VisualBasicSyntax.string_literal("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn test_internal_scope() {
        assert_eq!(VisualBasicSyntax.scope(Scope::Internal), "Friend");
    }
}

use pmodescription::{
    DescriptionError, DeviceDescription, Direction, ServiceDescription, StateVarType,
};

const RENDERING_CONTROL: &str = include_str!("../../testdata/rendering_control.xml");
const MEDIA_RENDERER: &str = include_str!("../../testdata/media_renderer.xml");

fn rendering_control() -> ServiceDescription {
    ServiceDescription::parse(RENDERING_CONTROL).unwrap()
}

fn media_renderer() -> DeviceDescription {
    DeviceDescription::parse(MEDIA_RENDERER).unwrap()
}

#[test]
fn test_service_spec_version() {
    let service = rendering_control();
    assert_eq!(service.spec_version().major, 1);
    assert_eq!(service.spec_version().minor, 0);
}

#[test]
fn test_actions_keep_declaration_order() {
    let service = rendering_control();
    let names: Vec<&str> = service.actions().keys().collect();
    assert_eq!(names, vec!["GetMute", "SetVolume", "GetVolumeDBRange", "ListPresets"]);
}

#[test]
fn test_state_variables_keep_declaration_order() {
    let service = rendering_control();
    let names: Vec<&str> = service.state_variables().keys().collect();
    assert_eq!(
        names,
        vec![
            "PresetNameList",
            "LastChange",
            "Mute",
            "Volume",
            "VolumeDB",
            "A_ARG_TYPE_Channel",
            "A_ARG_TYPE_InstanceID",
            "A_ARG_TYPE_PresetName",
        ]
    );
}

#[test]
fn test_arguments_are_ordered_and_typed() {
    let service = rendering_control();
    let action = service.action("GetVolumeDBRange").unwrap();

    let arguments: Vec<(&str, Direction)> = action
        .arguments()
        .iter()
        .map(|a| (a.name(), a.direction()))
        .collect();
    assert_eq!(
        arguments,
        vec![
            ("InstanceID", Direction::In),
            ("Channel", Direction::In),
            ("MinValue", Direction::Out),
            ("MaxValue", Direction::Out),
        ]
    );
    assert_eq!(action.in_count(), 2);
    assert_eq!(action.out_count(), 2);
}

#[test]
fn test_related_state_variables_are_resolved() {
    let service = rendering_control();
    let action = service.action("SetVolume").unwrap();
    let desired = action.arguments().get(2).unwrap();

    let related = service.related_state_variable(desired).unwrap();
    assert_eq!(related.name(), "Volume");
    assert_eq!(related.data_type(), Some(StateVarType::UI2));
    assert_eq!(desired.related().map(|r| r.index()), Some(3));
}

#[test]
fn test_allowed_values_and_enumeration() {
    let service = rendering_control();
    let channel = service.state_variable("A_ARG_TYPE_Channel").unwrap();

    assert!(channel.is_enumerated());
    let values = channel.allowed_values().unwrap();
    assert_eq!(values.values(), &["Master", "LF", "RF"]);
    assert!(values.contains("LF"));

    // Un booléen sans liste n'est pas énuméré
    assert!(!service.state_variable("Mute").unwrap().is_enumerated());
}

#[test]
fn test_allowed_value_range() {
    let service = rendering_control();
    let volume = service.state_variable("Volume").unwrap();
    let range = volume.allowed_range().unwrap();

    assert_eq!(range.minimum(), Some("0"));
    assert_eq!(range.maximum_as_f64(), Some(100.0));
    assert_eq!(range.step_as_f64(), Some(1.0));
    assert!(range.is_in_range(42.0));
    assert!(!range.is_in_range(101.0));
    assert!(volume.allowed_values().is_none());
}

#[test]
fn test_send_events_attribute() {
    let service = rendering_control();
    assert!(service.state_variable("LastChange").unwrap().send_events());
    assert!(!service.state_variable("Volume").unwrap().send_events());
}

#[test]
fn test_send_events_defaults_to_yes() {
    let xml = r#"<scpd><serviceStateTable>
        <stateVariable><name>Status</name><dataType>string</dataType></stateVariable>
    </serviceStateTable></scpd>"#;
    let service = ServiceDescription::parse(xml).unwrap();
    assert!(service.state_variable("Status").unwrap().send_events());
}

#[test]
fn test_state_table_declared_before_actions() {
    let xml = r#"<scpd>
        <serviceStateTable>
            <stateVariable sendEvents="no"><name>Target</name><dataType>boolean</dataType></stateVariable>
        </serviceStateTable>
        <actionList><action><name>SetTarget</name><argumentList>
            <argument><name>NewTarget</name><direction>in</direction>
            <relatedStateVariable>Target</relatedStateVariable></argument>
        </argumentList></action></actionList>
    </scpd>"#;
    let service = ServiceDescription::parse(xml).unwrap();
    let argument = service.action("SetTarget").unwrap().arguments().get(0).unwrap();
    assert_eq!(
        service.related_state_variable(argument).map(|v| v.name()),
        Some("Target")
    );
}

#[test]
fn test_unresolved_related_state_variable() {
    let xml = r#"<scpd>
        <actionList><action><name>GetThing</name><argumentList>
            <argument><name>Thing</name><direction>out</direction>
            <relatedStateVariable>DoesNotExist</relatedStateVariable></argument>
        </argumentList></action></actionList>
        <serviceStateTable/>
    </scpd>"#;
    let service = ServiceDescription::parse(xml).unwrap();
    let argument = service.action("GetThing").unwrap().arguments().get(0).unwrap();

    assert_eq!(argument.related_state_variable(), "DoesNotExist");
    assert!(argument.related().is_none());
    assert!(service.related_state_variable(argument).is_none());
}

#[test]
fn test_unknown_elements_and_types_are_tolerated() {
    let xml = r#"<?xml version="1.0"?>
    <!-- vendor extension -->
    <s:scpd xmlns:s="urn:schemas-upnp-org:service-1-0">
        <vendorInfo><name>Ignored</name></vendorInfo>
        <serviceStateTable>
            <stateVariable sendEvents="NO" x-custom="1">
                <name>Custom</name>
                <dataType>x-vendor-type</dataType>
                <defaultValue>a &amp; b</defaultValue>
            </stateVariable>
        </serviceStateTable>
    </s:scpd>"#;
    let service = ServiceDescription::parse(xml).unwrap();
    let variable = service.state_variable("Custom").unwrap();

    assert_eq!(variable.data_type(), None);
    assert_eq!(variable.data_type_name(), "x-vendor-type");
    assert_eq!(variable.default_value(), Some("a & b"));
    assert!(!variable.send_events());
    assert_eq!(variable.element().attribute("x-custom"), "1");
    assert_eq!(variable.element().attribute("missing"), "");
    assert!(service.actions().is_empty());
}

#[test]
fn test_duplicate_and_anonymous_actions() {
    let xml = r#"<scpd><actionList>
        <action><name>Play</name></action>
        <action><name>Stop</name></action>
        <action><name>Play</name><argumentList>
            <argument><name>Speed</name><direction>in</direction></argument>
        </argumentList></action>
        <action></action>
    </actionList></scpd>"#;
    let service = ServiceDescription::parse(xml).unwrap();

    assert_eq!(service.actions().len(), 3);
    assert_eq!(service.action("Play").unwrap().arguments().len(), 1);
    let keys: Vec<&str> = service.actions().keys().collect();
    assert_eq!(keys, vec!["Play", "Stop", "action#1"]);
}

#[test]
fn test_malformed_xml_is_an_error() {
    let err = ServiceDescription::parse("<scpd><actionList></scpd>").unwrap_err();
    assert!(matches!(err, DescriptionError::Xml { .. }));
}

#[test]
fn test_device_tree() {
    let description = media_renderer();
    let root = description.device();

    assert_eq!(description.spec_version().minor, 1);
    assert_eq!(root.friendly_name(), "Living Room");
    assert_eq!(root.short_type_name(), "ZonePlayer");
    assert_eq!(root.model_number(), "S5");
    assert_eq!(root.udn(), "uuid:RINCON_000E58000001400");

    let children: Vec<&str> = root.devices().keys().collect();
    assert_eq!(
        children,
        vec!["uuid:RINCON_000E58000001400_MR", "uuid:RINCON_000E58000001400_MS"]
    );
    assert_eq!(root.all_devices().len(), 3);
}

#[test]
fn test_device_icons() {
    let description = media_renderer();
    let icon = description.device().icons().get(0).unwrap();

    assert_eq!(icon.mime_type(), "image/png");
    assert_eq!(icon.width(), Some(48));
    assert_eq!(icon.depth(), Some(24));
    assert_eq!(icon.url(), "/img/icon-48.png");
}

#[test]
fn test_all_services_depth_first() {
    let description = media_renderer();
    let services: Vec<(&str, &str)> = description
        .device()
        .all_services()
        .into_iter()
        .map(|(device, service)| (device.short_type_name(), service.short_id()))
        .collect();

    assert_eq!(
        services,
        vec![
            ("ZonePlayer", "DeviceProperties"),
            ("MediaRenderer", "RenderingControl"),
            ("MediaRenderer", "AVTransport"),
            ("MediaServer", "ContentDirectory"),
        ]
    );
}

#[test]
fn test_find_embedded_device() {
    let description = media_renderer();
    let renderer = description
        .device()
        .find_device("uuid:RINCON_000E58000001400_MR")
        .unwrap();

    assert_eq!(renderer.short_type_name(), "MediaRenderer");
    let rendering = renderer
        .services()
        .get("urn:upnp-org:serviceId:RenderingControl")
        .unwrap();
    assert_eq!(rendering.short_type_name(), "RenderingControl");
    assert!(description.device().find_device("uuid:unknown").is_none());
}

#[test]
fn test_resolve_url_against_url_base() {
    let description = media_renderer();
    let url = description
        .resolve_url(Some("http://10.0.0.1/desc.xml"), "/xml/RenderingControl1.xml")
        .unwrap();
    assert_eq!(url.as_str(), "http://192.168.1.20:1400/xml/RenderingControl1.xml");
}

#[test]
fn test_resolve_url_against_location() {
    let xml = r#"<root><device><UDN>uuid:x</UDN></device></root>"#;
    let description = DeviceDescription::parse(xml).unwrap();
    assert!(description.url_base().is_none());

    let url = description
        .resolve_url(Some("http://10.0.0.1:49152/desc/root.xml"), "scpd.xml")
        .unwrap();
    assert_eq!(url.as_str(), "http://10.0.0.1:49152/desc/scpd.xml");

    let err = description.resolve_url(None, "scpd.xml").unwrap_err();
    assert!(matches!(err, DescriptionError::InvalidUrl(..)));
}

mod common;

use common::{assert_line, assert_no_line, assert_sequence, media_renderer};
use pmocodegen::{
    CSharpSyntax, ChildClassNames, ClassOptions, DeviceGenerator, VisualBasicSyntax,
    default_device_class_name,
};
use pmodescription::DeviceDescription;

fn root_options() -> ClassOptions {
    ClassOptions::new("ZonePlayerDevice")
}

#[test]
fn test_device_information_properties() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let source = generator
        .generate(description.device(), &root_options(), None)
        .unwrap()
        .source;

    assert_line(&source, "public class ZonePlayerDevice");
    assert_sequence(
        &source,
        &["public string FriendlyName", "{", "get", "{", "return moDevice.FriendlyName;"],
    );
    assert_sequence(
        &source,
        &["public string DeviceType", "{", "get", "{", "return moDevice.Type;"],
    );
    assert_line(&source, "return moDevice.UniqueDeviceName;");
    assert_line(&source, "return moDevice.ModelNumber;");
}

#[test]
fn test_generic_child_properties() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let source = generator
        .generate(description.device(), &root_options(), None)
        .unwrap()
        .source;

    assert_sequence(
        &source,
        &[
            "public UPnPDevice MediaRenderer",
            "{",
            "get",
            "{",
            "return moDevice.Children[csDeviceUDN_MediaRenderer];",
        ],
    );
    assert_line(&source, "public UPnPDevice MediaServer");
    assert_sequence(
        &source,
        &[
            "public UPnPService DeviceProperties",
            "{",
            "get",
            "{",
            "return moDevice.Services[csServiceID_DeviceProperties];",
        ],
    );

    // Seuls les enfants immédiats sont exposés
    assert_no_line(&source, "public UPnPService RenderingControl");
    assert_no_line(&source, "public UPnPService ContentDirectory");
}

#[test]
fn test_child_constants_carry_comments() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let source = generator
        .generate(description.device(), &root_options(), None)
        .unwrap()
        .source;

    assert_line(
        &source,
        "public const string csDeviceUDN_MediaRenderer = \"uuid:RINCON_000E58000001400_MR\"; // Living Room - Renderer",
    );
    assert_line(
        &source,
        "public const string csDeviceUDN_MediaServer = \"uuid:RINCON_000E58000001400_MS\"; // Living Room - Media Server",
    );
    assert_line(
        &source,
        "public const string csServiceID_DeviceProperties = \"urn:upnp-org:serviceId:DeviceProperties\"; // urn:schemas-upnp-org:service:DeviceProperties:1",
    );
}

#[test]
fn test_specific_child_classes() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();

    let mut classes = ChildClassNames::new();
    classes.insert(
        "uuid:RINCON_000E58000001400_MR".to_string(),
        "MediaRendererDevice".to_string(),
    );
    classes.insert(
        "urn:upnp-org:serviceId:DeviceProperties".to_string(),
        "DevicePropertiesService".to_string(),
    );

    let source = generator
        .generate(description.device(), &root_options(), Some(&classes))
        .unwrap()
        .source;

    assert_line(&source, "public MediaRendererDevice MediaRenderer");
    assert_line(
        &source,
        "return new MediaRendererDevice(moDevice.Children[csDeviceUDN_MediaRenderer]);",
    );
    assert_line(&source, "public DevicePropertiesService DeviceProperties");
    assert_line(
        &source,
        "return new DevicePropertiesService(moDevice.Services[csServiceID_DeviceProperties]);",
    );
    // Pas de classe connue pour le serveur : objet générique
    assert_line(&source, "public UPnPDevice MediaServer");
}

#[test]
fn test_embedded_device_class() {
    let description = media_renderer();
    let renderer = description
        .device()
        .find_device("uuid:RINCON_000E58000001400_MR")
        .unwrap();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let options = ClassOptions::new(default_device_class_name(renderer.device_type()))
        .with_source_type(renderer.device_type());

    let class = generator.generate(renderer, &options, None).unwrap();

    assert_eq!(class.class_name, "MediaRendererDevice");
    assert_eq!(class.file_name, "MediaRendererDevice.cs");
    assert_line(&class.source, "public UPnPService RenderingControl");
    assert_line(&class.source, "public UPnPService AVTransport");
    assert_no_line(&class.source, "#region Devices");
}

#[test]
fn test_duplicate_child_types_get_distinct_names() {
    let xml = r#"<root><device>
      <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
      <UDN>uuid:root</UDN>
      <deviceList>
        <device>
          <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
          <friendlyName>Kitchen</friendlyName>
          <UDN>uuid:kitchen</UDN>
        </device>
        <device>
          <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
          <friendlyName>Patio</friendlyName>
          <UDN>uuid:patio</UDN>
        </device>
      </deviceList>
    </device></root>"#;
    let description = DeviceDescription::parse(xml).unwrap();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let source = generator
        .generate(description.device(), &root_options(), None)
        .unwrap()
        .source;

    assert_line(&source, "public UPnPDevice MediaRenderer");
    assert_line(&source, "public UPnPDevice MediaRenderer2");
    assert_line(
        &source,
        "public const string csDeviceUDN_MediaRenderer = \"uuid:kitchen\"; // Kitchen",
    );
    assert_line(
        &source,
        "public const string csDeviceUDN_MediaRenderer2 = \"uuid:patio\"; // Patio",
    );
}

#[test]
fn test_children_without_identity_are_skipped() {
    let xml = r#"<root><device>
      <deviceType>urn:schemas-upnp-org:device:ZonePlayer:1</deviceType>
      <UDN>uuid:root</UDN>
      <serviceList>
        <service>
          <serviceType>urn:schemas-upnp-org:service:AlarmClock:1</serviceType>
        </service>
      </serviceList>
      <deviceList>
        <device>
          <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
          <friendlyName>Kitchen</friendlyName>
        </device>
        <device>
          <deviceType>urn:schemas-upnp-org:device:MediaServer:1</deviceType>
          <friendlyName>Patio</friendlyName>
        </device>
        <device>
          <deviceType>urn:schemas-upnp-org:device:MediaRenderer:1</deviceType>
          <friendlyName>Office</friendlyName>
          <UDN>uuid:office</UDN>
        </device>
      </deviceList>
    </device></root>"#;
    let description = DeviceDescription::parse(xml).unwrap();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let mut classes = ChildClassNames::new();
    classes.insert(String::new(), "MediaServerDevice".to_string());
    let source = generator
        .generate(description.device(), &root_options(), Some(&classes))
        .unwrap()
        .source;

    assert_line(&source, "public UPnPDevice MediaRenderer");
    assert_no_line(&source, "public UPnPDevice MediaRenderer2");
    assert_no_line(&source, "public MediaServerDevice MediaServer");
    assert!(!source.contains("= \"\";"));
    assert!(!source.contains("AlarmClock"));
    assert_line(
        &source,
        "public const string csDeviceUDN_MediaRenderer = \"uuid:office\"; // Office",
    );
}

#[test]
fn test_visual_basic_device_class() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(VisualBasicSyntax).unwrap();
    let class = generator
        .generate(description.device(), &root_options().with_partial(true), None)
        .unwrap();

    assert_eq!(class.file_name, "ZonePlayerDevice.designer.vb");
    assert_line(&class.source, "Partial Public Class ZonePlayerDevice");
    assert_sequence(
        &class.source,
        &[
            "Public ReadOnly Property MediaRenderer() As UPnPDevice",
            "Get",
            "Return moDevice.Children(csDeviceUDN_MediaRenderer)",
            "End Get",
            "End Property",
        ],
    );
    assert_line(
        &class.source,
        "Public Const csServiceID_DeviceProperties As String = \"urn:upnp-org:serviceId:DeviceProperties\" ' urn:schemas-upnp-org:service:DeviceProperties:1",
    );
}

#[test]
fn test_device_generation_is_deterministic() {
    let description = media_renderer();
    let generator = DeviceGenerator::new(CSharpSyntax).unwrap();
    let first = generator.generate(description.device(), &root_options(), None).unwrap();
    let second = generator.generate(description.device(), &root_options(), None).unwrap();
    assert_eq!(first, second);
}

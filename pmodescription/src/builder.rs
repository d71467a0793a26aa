//! Construction de l'arbre de description.
//!
//! Le document est lu une seule fois, en profondeur d'abord. Chaque nœud est
//! représenté par une variante de [`SchemaNode`] ; la reconnaissance des
//! enfants, la consommation du texte et le rattachement au parent sont
//! décidés par `match` sur ce type fermé.
//!
//! Un nœud ne consomme que le texte de ses éléments enfants directs ; tout
//! élément inconnu est ignoré avec son contenu.

use tracing::{debug, trace};

use crate::{
    collections::{DescriptionList, DescriptionMap},
    errors::DescriptionError,
    node::{ElementInfo, NodeKind, NodePath},
    scanner::{DescriptionScanner, Token},
    schema::{
        Action, AllowedValueList, AllowedValueRange, Argument, Device, DeviceDescription,
        Direction, Icon, ServiceDescription, ServiceReference, SpecVersion, StateVariable,
    },
};

pub(crate) enum SchemaNode {
    Scpd(ServiceDescription),
    SpecVersion(SpecVersion),
    ActionList(DescriptionMap<Action>),
    Action(Action),
    ArgumentList(DescriptionList<Argument>),
    Argument(Argument),
    StateTable(DescriptionMap<StateVariable>),
    StateVariable(StateVariable),
    AllowedValueList(AllowedValueList),
    AllowedValueRange(AllowedValueRange),
    Root(DeviceDescription),
    Device(Device),
    DeviceList(DescriptionMap<Device>),
    ServiceList(DescriptionMap<ServiceReference>),
    Service(ServiceReference),
    IconList(DescriptionList<Icon>),
    Icon(Icon),
}

impl SchemaNode {
    fn new(kind: NodeKind, element: ElementInfo) -> Self {
        match kind {
            NodeKind::Scpd => SchemaNode::Scpd(ServiceDescription::new(element)),
            NodeKind::SpecVersion => SchemaNode::SpecVersion(SpecVersion::default()),
            NodeKind::ActionList => SchemaNode::ActionList(DescriptionMap::new()),
            NodeKind::Action => SchemaNode::Action(Action::new(element)),
            NodeKind::ArgumentList => SchemaNode::ArgumentList(DescriptionList::new()),
            NodeKind::Argument => SchemaNode::Argument(Argument::new(element)),
            NodeKind::ServiceStateTable => SchemaNode::StateTable(DescriptionMap::new()),
            NodeKind::StateVariable => SchemaNode::StateVariable(StateVariable::new(element)),
            NodeKind::AllowedValueList => {
                SchemaNode::AllowedValueList(AllowedValueList::new(element))
            }
            NodeKind::AllowedValueRange => {
                SchemaNode::AllowedValueRange(AllowedValueRange::new(element))
            }
            NodeKind::Root => SchemaNode::Root(DeviceDescription::new(element)),
            NodeKind::Device => SchemaNode::Device(Device::new(element)),
            NodeKind::DeviceList => SchemaNode::DeviceList(DescriptionMap::new()),
            NodeKind::ServiceList => SchemaNode::ServiceList(DescriptionMap::new()),
            NodeKind::Service => SchemaNode::Service(ServiceReference::new(element)),
            NodeKind::IconList => SchemaNode::IconList(DescriptionList::new()),
            NodeKind::Icon => SchemaNode::Icon(Icon::new(element)),
        }
    }

    /// Types de nœuds pouvant apparaître comme enfants directs.
    fn child_kinds(&self) -> &'static [NodeKind] {
        match self {
            SchemaNode::Scpd(_) => &[
                NodeKind::SpecVersion,
                NodeKind::ActionList,
                NodeKind::ServiceStateTable,
            ],
            SchemaNode::ActionList(_) => &[NodeKind::Action],
            SchemaNode::Action(_) => &[NodeKind::ArgumentList],
            SchemaNode::ArgumentList(_) => &[NodeKind::Argument],
            SchemaNode::StateTable(_) => &[NodeKind::StateVariable],
            SchemaNode::StateVariable(_) => {
                &[NodeKind::AllowedValueList, NodeKind::AllowedValueRange]
            }
            SchemaNode::Root(_) => &[NodeKind::SpecVersion, NodeKind::Device],
            SchemaNode::Device(_) => &[
                NodeKind::DeviceList,
                NodeKind::ServiceList,
                NodeKind::IconList,
            ],
            SchemaNode::DeviceList(_) => &[NodeKind::Device],
            SchemaNode::ServiceList(_) => &[NodeKind::Service],
            SchemaNode::IconList(_) => &[NodeKind::Icon],
            SchemaNode::SpecVersion(_)
            | SchemaNode::Argument(_)
            | SchemaNode::AllowedValueList(_)
            | SchemaNode::AllowedValueRange(_)
            | SchemaNode::Service(_)
            | SchemaNode::Icon(_) => &[],
        }
    }

    /// Type du nœud enfant ouvert par `token`, s'il y en a un.
    fn child_kind(&self, token: &Token, path: &NodePath) -> Option<NodeKind> {
        let kind = self
            .child_kinds()
            .iter()
            .copied()
            .find(|k| k.is_start_node(token))?;

        // Un <device> de <deviceList> n'est un device embarqué que si la
        // liste appartient elle-même à un device.
        if kind == NodeKind::Device
            && matches!(self, SchemaNode::DeviceList(_))
            && path.parent_from(1).map(|(k, _)| k) != Some(NodeKind::Device)
        {
            return None;
        }
        Some(kind)
    }

    /// Propose un token au nœud ; retourne `true` s'il a été consommé.
    ///
    /// Pour un texte, `last_element` est l'élément enfant direct qui le
    /// contient. Pour une balise d'enfant direct, `last_element` est vide.
    fn use_node(&mut self, token: &Token, last_element: &str) -> bool {
        let text = match token {
            Token::Text(text) => text.as_str(),
            Token::Start(element) | Token::Empty(element) => {
                return match self {
                    SchemaNode::Argument(argument)
                        if element.name().eq_ignore_ascii_case("retval") =>
                    {
                        argument.retval = true;
                        true
                    }
                    _ => false,
                };
            }
            Token::End(_) => return false,
        };

        let field = last_element.to_ascii_lowercase();
        match self {
            SchemaNode::SpecVersion(version) => match field.as_str() {
                "major" => version.major = parse_u32(text).unwrap_or_default(),
                "minor" => version.minor = parse_u32(text).unwrap_or_default(),
                _ => return false,
            },
            SchemaNode::Action(action) => match field.as_str() {
                "name" => action.name = text.to_string(),
                _ => return false,
            },
            SchemaNode::Argument(argument) => match field.as_str() {
                "name" => argument.name = text.to_string(),
                "direction" => argument.direction = Direction::from_text(text),
                "relatedstatevariable" => argument.related_state_variable = text.to_string(),
                _ => return false,
            },
            SchemaNode::StateVariable(variable) => match field.as_str() {
                "name" => variable.name = text.to_string(),
                "datatype" => variable.data_type_name = text.to_string(),
                "defaultvalue" => variable.default_value = Some(text.to_string()),
                _ => return false,
            },
            SchemaNode::AllowedValueList(list) => match field.as_str() {
                "allowedvalue" => {
                    if !list.contains(text) {
                        list.values.push(text.to_string());
                    }
                }
                _ => return false,
            },
            SchemaNode::AllowedValueRange(range) => match field.as_str() {
                "minimum" => range.minimum = text.to_string(),
                "maximum" => range.maximum = text.to_string(),
                "step" => range.step = text.to_string(),
                _ => return false,
            },
            SchemaNode::Root(root) => match field.as_str() {
                "urlbase" => root.url_base = text.to_string(),
                _ => return false,
            },
            SchemaNode::Device(device) => {
                let slot = match field.as_str() {
                    "devicetype" => &mut device.device_type,
                    "friendlyname" => &mut device.friendly_name,
                    "manufacturer" => &mut device.manufacturer,
                    "manufacturerurl" => &mut device.manufacturer_url,
                    "modeldescription" => &mut device.model_description,
                    "modelname" => &mut device.model_name,
                    "modelnumber" => &mut device.model_number,
                    "modelurl" => &mut device.model_url,
                    "serialnumber" => &mut device.serial_number,
                    "udn" => &mut device.udn,
                    "upc" => &mut device.upc,
                    "presentationurl" => &mut device.presentation_url,
                    _ => return false,
                };
                *slot = text.to_string();
            }
            SchemaNode::Service(service) => {
                let slot = match field.as_str() {
                    "servicetype" => &mut service.service_type,
                    "serviceid" => &mut service.service_id,
                    "scpdurl" => &mut service.scpd_url,
                    "controlurl" => &mut service.control_url,
                    "eventsuburl" => &mut service.event_sub_url,
                    _ => return false,
                };
                *slot = text.to_string();
            }
            SchemaNode::Icon(icon) => match field.as_str() {
                "mimetype" => icon.mime_type = text.to_string(),
                "width" => icon.width = parse_u32(text),
                "height" => icon.height = parse_u32(text),
                "depth" => icon.depth = parse_u32(text),
                "url" => icon.url = text.to_string(),
                _ => return false,
            },
            SchemaNode::Scpd(_)
            | SchemaNode::ActionList(_)
            | SchemaNode::ArgumentList(_)
            | SchemaNode::StateTable(_)
            | SchemaNode::DeviceList(_)
            | SchemaNode::ServiceList(_)
            | SchemaNode::IconList(_) => return false,
        }
        true
    }

    /// Rattache un nœud enfant complètement construit.
    fn adopt(&mut self, child: SchemaNode) {
        match (self, child) {
            (SchemaNode::Scpd(service), SchemaNode::SpecVersion(version)) => {
                service.spec_version = version
            }
            (SchemaNode::Scpd(service), SchemaNode::ActionList(actions)) => {
                for action in actions.into_values() {
                    service.actions.insert(action);
                }
            }
            (SchemaNode::Scpd(service), SchemaNode::StateTable(variables)) => {
                for variable in variables.into_values() {
                    service.state_variables.insert(variable);
                }
            }
            (SchemaNode::ActionList(actions), SchemaNode::Action(action)) => {
                actions.insert(action);
            }
            (SchemaNode::Action(action), SchemaNode::ArgumentList(arguments)) => {
                for argument in arguments.into_vec() {
                    action.arguments.push(argument);
                }
            }
            (SchemaNode::ArgumentList(arguments), SchemaNode::Argument(argument)) => {
                arguments.push(argument)
            }
            (SchemaNode::StateTable(variables), SchemaNode::StateVariable(variable)) => {
                variables.insert(variable);
            }
            (SchemaNode::StateVariable(variable), SchemaNode::AllowedValueList(list)) => {
                variable.allowed_values = Some(list)
            }
            (SchemaNode::StateVariable(variable), SchemaNode::AllowedValueRange(range)) => {
                variable.allowed_range = Some(range)
            }
            (SchemaNode::Root(root), SchemaNode::SpecVersion(version)) => {
                root.spec_version = version
            }
            (SchemaNode::Root(root), SchemaNode::Device(device)) => root.device = device,
            (SchemaNode::Device(device), SchemaNode::DeviceList(devices)) => {
                for child in devices.into_values() {
                    device.devices.insert(child);
                }
            }
            (SchemaNode::Device(device), SchemaNode::ServiceList(services)) => {
                for service in services.into_values() {
                    device.services.insert(service);
                }
            }
            (SchemaNode::Device(device), SchemaNode::IconList(icons)) => {
                for icon in icons.into_vec() {
                    device.icons.push(icon);
                }
            }
            (SchemaNode::DeviceList(devices), SchemaNode::Device(device)) => {
                devices.insert(device);
            }
            (SchemaNode::ServiceList(services), SchemaNode::Service(service)) => {
                services.insert(service);
            }
            (SchemaNode::IconList(icons), SchemaNode::Icon(icon)) => icons.push(icon),
            (parent, child) => {
                debug!(parent = %parent.kind(), child = %child.kind(), "Dropping misplaced node");
            }
        }
    }

    fn kind(&self) -> NodeKind {
        match self {
            SchemaNode::Scpd(_) => NodeKind::Scpd,
            SchemaNode::SpecVersion(_) => NodeKind::SpecVersion,
            SchemaNode::ActionList(_) => NodeKind::ActionList,
            SchemaNode::Action(_) => NodeKind::Action,
            SchemaNode::ArgumentList(_) => NodeKind::ArgumentList,
            SchemaNode::Argument(_) => NodeKind::Argument,
            SchemaNode::StateTable(_) => NodeKind::ServiceStateTable,
            SchemaNode::StateVariable(_) => NodeKind::StateVariable,
            SchemaNode::AllowedValueList(_) => NodeKind::AllowedValueList,
            SchemaNode::AllowedValueRange(_) => NodeKind::AllowedValueRange,
            SchemaNode::Root(_) => NodeKind::Root,
            SchemaNode::Device(_) => NodeKind::Device,
            SchemaNode::DeviceList(_) => NodeKind::DeviceList,
            SchemaNode::ServiceList(_) => NodeKind::ServiceList,
            SchemaNode::Service(_) => NodeKind::Service,
            SchemaNode::IconList(_) => NodeKind::IconList,
            SchemaNode::Icon(_) => NodeKind::Icon,
        }
    }
}

fn parse_u32(text: &str) -> Option<u32> {
    text.trim().parse().ok()
}

struct TreeBuilder<'a> {
    scanner: DescriptionScanner<'a>,
    path: NodePath,
}

impl<'a> TreeBuilder<'a> {
    fn new(xml: &'a str) -> Self {
        Self {
            scanner: DescriptionScanner::new(xml),
            path: NodePath::new(),
        }
    }

    /// Avance jusqu'au premier élément `root_kind` puis construit son arbre.
    fn read_root(&mut self, root_kind: NodeKind) -> Result<SchemaNode, DescriptionError> {
        while let Some(token) = self.scanner.next_token()? {
            if root_kind.is_start_node(&token) {
                let (element, empty) = split_start(token);
                return self.read_node(root_kind, element, empty);
            }
            trace!(token = ?token, "Skipping token before root element");
        }
        Err(DescriptionError::MissingRoot(root_kind.element_name()))
    }

    fn read_node(
        &mut self,
        kind: NodeKind,
        element: ElementInfo,
        empty: bool,
    ) -> Result<SchemaNode, DescriptionError> {
        let mut node = SchemaNode::new(kind, element.clone());
        if empty {
            return Ok(node);
        }

        self.path.push(kind, element);
        // Éléments ouverts sous ce nœud et non encore refermés
        let mut open: Vec<String> = Vec::new();

        while let Some(token) = self.scanner.next_token()? {
            if open.is_empty() {
                if kind.is_end_node(&token) {
                    break;
                }
                if let Some(child_kind) = node.child_kind(&token, &self.path) {
                    let (child_element, child_empty) = split_start(token);
                    let child = self.read_node(child_kind, child_element, child_empty)?;
                    node.adopt(child);
                    continue;
                }
            }

            match &token {
                Token::Start(child) => {
                    if open.is_empty() {
                        node.use_node(&token, "");
                    }
                    open.push(child.name().to_string());
                }
                Token::Empty(child) => {
                    if open.is_empty() && !node.use_node(&token, "") {
                        debug!(path = %self.path, element = %child.name(), "Skipping unknown element");
                    }
                }
                Token::End(_) => {
                    open.pop();
                }
                Token::Text(_) => {
                    let consumed = match open.as_slice() {
                        [direct] => node.use_node(&token, direct),
                        _ => false,
                    };
                    if !consumed {
                        debug!(
                            path = %self.path,
                            element = open.last().map(String::as_str).unwrap_or(""),
                            "Skipping unused text"
                        );
                    }
                }
            }
        }

        self.path.pop();
        Ok(node)
    }
}

fn split_start(token: Token) -> (ElementInfo, bool) {
    match token {
        Token::Start(element) => (element, false),
        Token::Empty(element) => (element, true),
        Token::End(name) => (ElementInfo::new(name), true),
        Token::Text(_) => (ElementInfo::default(), true),
    }
}

/// Construit un [`ServiceDescription`] et résout les références entre
/// arguments et variables d'état.
pub fn parse_service_description(xml: &str) -> Result<ServiceDescription, DescriptionError> {
    let mut builder = TreeBuilder::new(xml);
    match builder.read_root(NodeKind::Scpd)? {
        SchemaNode::Scpd(mut service) => {
            service.resolve_references();
            debug!(
                actions = service.actions().len(),
                state_variables = service.state_variables().len(),
                "Service description parsed"
            );
            Ok(service)
        }
        _ => Err(DescriptionError::MissingRoot(NodeKind::Scpd.element_name())),
    }
}

/// Construit un [`DeviceDescription`] à partir d'un document `<root>`.
pub fn parse_device_description(xml: &str) -> Result<DeviceDescription, DescriptionError> {
    let mut builder = TreeBuilder::new(xml);
    match builder.read_root(NodeKind::Root)? {
        SchemaNode::Root(root) => {
            debug!(
                udn = %root.device().udn(),
                devices = root.device().all_devices().len(),
                "Device description parsed"
            );
            Ok(root)
        }
        _ => Err(DescriptionError::MissingRoot(NodeKind::Root.element_name())),
    }
}

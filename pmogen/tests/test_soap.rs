use std::{
    io::{BufRead, BufReader, Read, Write},
    net::TcpListener,
    thread::{self, JoinHandle},
};

use pmocodegen::{ProbeError, ServiceControl};
use pmogen::SoapClient;

const RENDERING_CONTROL: &str = "urn:schemas-upnp-org:service:RenderingControl:1";

fn envelope(body: &str) -> String {
    format!(
        r#"<?xml version="1.0"?>
<s:Envelope xmlns:s="http://schemas.xmlsoap.org/soap/envelope/" s:encodingStyle="http://schemas.xmlsoap.org/soap/encoding/">
  <s:Body>{body}</s:Body>
</s:Envelope>"#
    )
}

/// Serveur HTTP à une seule requête ; retourne l'URL et la requête reçue
fn serve_once(status: &'static str, body: String) -> (String, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();

    let handle = thread::spawn(move || {
        let (mut stream, _) = listener.accept().unwrap();
        let mut reader = BufReader::new(stream.try_clone().unwrap());

        let mut head = String::new();
        let mut content_length = 0usize;
        let mut chunked = false;
        loop {
            let mut line = String::new();
            if reader.read_line(&mut line).unwrap() == 0 || line == "\r\n" {
                break;
            }
            let lower = line.to_ascii_lowercase();
            if let Some(value) = lower.strip_prefix("content-length:") {
                content_length = value.trim().parse().unwrap();
            }
            if lower.starts_with("transfer-encoding:") && lower.contains("chunked") {
                chunked = true;
            }
            head.push_str(&lower);
        }

        let mut request_body = String::new();
        if chunked {
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap() == 0 {
                    break;
                }
                if line == "0\r\n" {
                    let mut trailer = String::new();
                    reader.read_line(&mut trailer).unwrap();
                    break;
                }
                request_body.push_str(&line);
            }
        } else {
            let mut buf = vec![0; content_length];
            reader.read_exact(&mut buf).unwrap();
            request_body = String::from_utf8(buf).unwrap();
        }

        write!(
            stream,
            "HTTP/1.1 {status}\r\nContent-Type: text/xml; charset=\"utf-8\"\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        )
        .unwrap();
        stream.flush().unwrap();

        format!("{head}\r\n{request_body}")
    });

    (format!("http://{addr}/RenderingControl/Control"), handle)
}

#[test]
fn test_query_state_variable_returns_value() {
    let (url, server) = serve_once(
        "200 OK",
        envelope(
            r#"<u:QueryStateVariableResponse xmlns:u="urn:schemas-upnp-org:control-1-0"><return>42</return></u:QueryStateVariableResponse>"#,
        ),
    );
    let client = SoapClient::new(&url, RENDERING_CONTROL, 5);

    assert_eq!(client.query_state_variable("Volume"), Ok("42".to_string()));

    let request = server.join().unwrap();
    assert!(request.contains("soapaction: \"urn:schemas-upnp-org:control-1-0#querystatevariable\""));
    assert!(request.contains("<varName>Volume</varName>"));
}

#[test]
fn test_missing_return_is_value_unknown() {
    let (url, server) = serve_once(
        "200 OK",
        envelope(r#"<u:QueryStateVariableResponse xmlns:u="urn:schemas-upnp-org:control-1-0"/>"#),
    );
    let client = SoapClient::new(&url, RENDERING_CONTROL, 5);

    assert_eq!(client.query_state_variable("Mute"), Err(ProbeError::ValueUnknown));
    server.join().unwrap();
}

#[test]
fn test_soap_fault_is_failure() {
    let (url, server) = serve_once(
        "500 Internal Server Error",
        envelope(
            r#"<s:Fault><faultcode>s:Client</faultcode><faultstring>UPnPError</faultstring>
<detail><UPnPError xmlns="urn:schemas-upnp-org:control-1-0"><errorCode>404</errorCode><errorDescription>Invalid Var</errorDescription></UPnPError></detail></s:Fault>"#,
        ),
    );
    let client = SoapClient::new(&url, RENDERING_CONTROL, 5);

    match client.query_state_variable("VolumeDB") {
        Err(ProbeError::Failed(reason)) => {
            assert!(reason.contains("404"), "{reason}");
            assert!(reason.contains("Invalid Var"), "{reason}");
        }
        other => panic!("unexpected result: {other:?}"),
    }
    server.join().unwrap();
}

#[test]
fn test_invoke_action_returns_positional_outputs() {
    let (url, server) = serve_once(
        "200 OK",
        envelope(
            r#"<u:GetVolumeDBRangeResponse xmlns:u="urn:schemas-upnp-org:service:RenderingControl:1"><MinValue>-5120</MinValue><MaxValue>0</MaxValue></u:GetVolumeDBRangeResponse>"#,
        ),
    );
    let client = SoapClient::new(&url, RENDERING_CONTROL, 5);

    let outputs = client
        .invoke_action(
            "GetVolumeDBRange",
            &[
                ("InstanceID".to_string(), "0".to_string()),
                ("Channel".to_string(), "Master".to_string()),
            ],
        )
        .unwrap();
    assert_eq!(outputs, vec!["-5120".to_string(), "0".to_string()]);

    let request = server.join().unwrap();
    assert!(request.contains("soapaction: \"urn:schemas-upnp-org:service:renderingcontrol:1#getvolumedbrange\""));
    assert!(request.contains("<InstanceID>0</InstanceID>"));
    assert!(request.contains("<Channel>Master</Channel>"));
}

#[test]
fn test_unreachable_service_is_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = SoapClient::new(&format!("http://{addr}/control"), RENDERING_CONTROL, 2);
    assert!(matches!(
        client.query_state_variable("Volume"),
        Err(ProbeError::Failed(_))
    ));
}

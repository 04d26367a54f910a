//! Connection tests against a scripted transport

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use cobbler_api::{Distro, Image, NetworkInterface, Record, System};
use cobbler_client::{ClientError, Connection, Credentials, Endpoint, Result, Transport};
use cobbler_xmlrpc::{Fault, MethodCall, Value};

const TOKEN: &str = "OICU812B4";

/// Transport scripted with canned responses per method name. Records every
/// call so tests can assert the exact sequence the connection produced.
struct MockTransport {
    responses: HashMap<String, Value>,
    calls: Mutex<Vec<(Endpoint, String, Vec<Value>)>>,
}

impl MockTransport {
    fn new(responses: Vec<(&str, Value)>) -> Arc<Self> {
        Arc::new(Self {
            responses: responses
                .into_iter()
                .map(|(name, value)| (name.to_string(), value))
                .collect(),
            calls: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> Vec<(Endpoint, String, Vec<Value>)> {
        self.calls.lock().unwrap().clone()
    }

    fn methods_called(&self) -> Vec<String> {
        self.calls().into_iter().map(|(_, name, _)| name).collect()
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn call(&self, endpoint: Endpoint, call: MethodCall) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((endpoint, call.name.clone(), call.params.clone()));
        match self.responses.get(&call.name) {
            Some(value) => Ok(value.clone()),
            None => Err(ClientError::Fault(Fault {
                code: 1,
                message: format!("unknown remote method: {}", call.name),
            })),
        }
    }
}

fn connection(transport: &Arc<MockTransport>) -> Connection {
    Connection::with_transport(
        transport.clone(),
        Some(Credentials {
            username: "dpierce".to_string(),
            password: "farkle".to_string(),
        }),
    )
}

fn record(entries: Vec<(&str, Value)>) -> Value {
    Value::Struct(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

fn system_record(name: &str, owners: Value, interfaces: Vec<(&str, &str)>) -> Value {
    let nics = interfaces
        .into_iter()
        .map(|(intf, mac)| {
            (
                intf.to_string(),
                record(vec![("mac_address", Value::from(mac))]),
            )
        })
        .collect::<BTreeMap<_, _>>();

    record(vec![
        ("name", Value::from(name)),
        ("owners", owners),
        ("profile", Value::from("Fedora-9-i386")),
        ("depth", Value::from("2")),
        ("virt_file_size", Value::from("<<inherit>>")),
        ("server", Value::from("<<inherit>>")),
        ("interfaces", Value::Struct(nics)),
        ("ks_meta", Value::Nil),
        ("netboot_enabled", Value::from("True")),
        ("kernel_options", Value::Nil),
        ("kickstart", Value::from("<<inherit>>")),
        ("parent", Value::Nil),
    ])
}

#[tokio::test]
async fn test_find_all_systems() {
    let transport = MockTransport::new(vec![(
        "get_systems",
        Value::Array(vec![
            system_record(
                "Web-Server",
                Value::Array(vec![
                    Value::from("admin"),
                    Value::from("dpierce"),
                    Value::from("mpdehaan"),
                ]),
                vec![
                    ("intf0", "00:11:22:33:44:55"),
                    ("intf1", "00:11:22:33:44:55"),
                ],
            ),
            system_record(
                "DNS-Server",
                Value::from("admin"),
                vec![("intf0", "AA:BB:CC:DD:EE:FF")],
            ),
        ]),
    )]);

    let systems = connection(&transport).systems().await.unwrap();

    assert_eq!(systems.len(), 2);
    assert_eq!(systems[0].name, "Web-Server");
    assert_eq!(systems[0].interfaces.len(), 2);
    for nic in systems[0].interfaces.values() {
        assert_eq!(nic.mac_address.as_deref(), Some("00:11:22:33:44:55"));
    }
    assert_eq!(systems[0].owners.len(), 3);
    // owners arrives as a bare string for the second record
    assert_eq!(systems[1].owners, vec!["admin"]);

    // Finds are unauthenticated reads
    let calls = transport.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, Endpoint::ReadOnly);
    assert_eq!(calls[0].1, "get_systems");
}

#[tokio::test]
async fn test_find_one_passes_flatten_flag() {
    let transport = MockTransport::new(vec![(
        "get_distro",
        record(vec![
            ("name", Value::from("Fedora-9-i386")),
            ("arch", Value::from("i386")),
        ]),
    )]);

    let distro = connection(&transport)
        .distro("Fedora-9-i386")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(distro.name, "Fedora-9-i386");

    let calls = transport.calls();
    assert_eq!(
        calls[0].2,
        vec![Value::from("Fedora-9-i386"), Value::Bool(false)]
    );
}

#[tokio::test]
async fn test_find_one_unknown_is_none() {
    // Old servers answer with an empty record, newer ones with "~".
    let transport = MockTransport::new(vec![("get_system", record(Vec::new()))]);
    assert!(
        connection(&transport)
            .system("missing")
            .await
            .unwrap()
            .is_none()
    );

    let transport = MockTransport::new(vec![("get_system", Value::from("~"))]);
    assert!(
        connection(&transport)
            .system("missing")
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn test_remove_system_logs_in_first() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("remove_system", Value::Bool(true)),
    ]);

    let removed = connection(&transport).remove_system("system1").await.unwrap();
    assert!(removed);

    let calls = transport.calls();
    assert_eq!(calls.len(), 2);

    assert_eq!(calls[0].0, Endpoint::ReadWrite);
    assert_eq!(calls[0].1, "login");
    assert_eq!(
        calls[0].2,
        vec![Value::from("dpierce"), Value::from("farkle")]
    );

    assert_eq!(calls[1].0, Endpoint::ReadWrite);
    assert_eq!(calls[1].1, "remove_system");
    assert_eq!(calls[1].2, vec![Value::from("system1"), Value::from(TOKEN)]);
}

#[tokio::test]
async fn test_session_token_is_cached() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("remove_system", Value::Bool(true)),
        ("remove_distro", Value::Bool(true)),
    ]);

    let conn = connection(&transport);
    conn.remove_system("system1").await.unwrap();
    conn.remove_distro("Fedora-9-i386").await.unwrap();

    let logins = transport
        .methods_called()
        .iter()
        .filter(|name| *name == "login")
        .count();
    assert_eq!(logins, 1);

    // Dropping the session forces a fresh login
    conn.end_session().await;
    conn.remove_system("system2").await.unwrap();
    let logins = transport
        .methods_called()
        .iter()
        .filter(|name| *name == "login")
        .count();
    assert_eq!(logins, 2);
}

#[tokio::test]
async fn test_remove_without_credentials() {
    let transport = MockTransport::new(Vec::new());
    let conn = Connection::with_transport(transport.clone(), None);

    match conn.remove_system("system1").await {
        Err(ClientError::MissingCredentials) => {}
        other => panic!("expected MissingCredentials, got {other:?}"),
    }
    assert!(transport.calls().is_empty());
}

#[tokio::test]
async fn test_save_system_with_profile() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("update", Value::Bool(true)),
        ("new_system", Value::Int(717)),
        ("modify_system", Value::Bool(true)),
        ("save_system", Value::Bool(true)),
    ]);

    let system = System::new("system1").with_profile("profile1");
    connection(&transport).save_system(&system).await.unwrap();

    let calls = transport.calls();
    let sequence: Vec<&str> = calls.iter().map(|(_, name, _)| name.as_str()).collect();
    assert_eq!(
        sequence,
        vec![
            "login",
            "update",
            "new_system",
            "modify_system",
            "modify_system",
            "save_system",
        ]
    );

    assert_eq!(calls[2].2, vec![Value::from(TOKEN)]);
    assert_eq!(
        calls[3].2,
        vec![
            Value::Int(717),
            Value::from("name"),
            Value::from("system1"),
            Value::from(TOKEN),
        ]
    );
    assert_eq!(
        calls[4].2,
        vec![
            Value::Int(717),
            Value::from("profile"),
            Value::from("profile1"),
            Value::from(TOKEN),
        ]
    );
    assert_eq!(calls[5].2, vec![Value::Int(717), Value::from(TOKEN)]);
}

#[tokio::test]
async fn test_save_system_with_image() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("update", Value::Bool(true)),
        ("new_system", Value::Int(717)),
        ("modify_system", Value::Bool(true)),
        ("save_system", Value::Bool(true)),
    ]);

    let system = System::new("system1").with_image("image1");
    connection(&transport).save_system(&system).await.unwrap();

    let calls = transport.calls();
    assert_eq!(
        calls[4].2,
        vec![
            Value::Int(717),
            Value::from("image"),
            Value::from("image1"),
            Value::from(TOKEN),
        ]
    );
}

#[tokio::test]
async fn test_save_stops_when_update_fails() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("update", Value::Bool(false)),
    ]);

    let system = System::new("system1").with_profile("profile1");
    match connection(&transport).save_system(&system).await {
        Err(ClientError::UpdateFailed) => {}
        other => panic!("expected UpdateFailed, got {other:?}"),
    }

    // Nothing was created or modified
    let methods = transport.methods_called();
    assert_eq!(methods, vec!["login", "update"]);
}

#[tokio::test]
async fn test_save_system_with_interfaces() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("update", Value::Bool(true)),
        ("new_system", Value::Int(717)),
        ("modify_system", Value::Bool(true)),
        ("save_system", Value::Bool(true)),
    ]);

    let mut system = System::new("system1").with_profile("profile1");
    system.interfaces.insert(
        "intf0".to_string(),
        NetworkInterface {
            mac_address: Some("00:11:22:33:44:55:66:77".to_string()),
            ..Default::default()
        },
    );
    // An empty interface is skipped and does not consume an index
    system
        .interfaces
        .insert("unset".to_string(), NetworkInterface::default());

    connection(&transport).save_system(&system).await.unwrap();

    let calls = transport.calls();
    let interface_calls: Vec<_> = calls
        .iter()
        .filter(|(_, name, params)| {
            name == "modify_system" && params[1] == Value::from("modify-interface")
        })
        .collect();
    assert_eq!(interface_calls.len(), 1);

    let mut bundle = BTreeMap::new();
    bundle.insert(
        "macaddress-intf0".to_string(),
        Value::from("00:11:22:33:44:55:66:77"),
    );
    assert_eq!(interface_calls[0].2[2], Value::Struct(bundle));
}

#[tokio::test]
async fn test_save_image() {
    let transport = MockTransport::new(vec![
        ("login", Value::from(TOKEN)),
        ("new_image", Value::from("___NEW___image::abc123")),
        ("modify_image", Value::Bool(true)),
        ("save_image", Value::Bool(true)),
    ]);

    let image = Image::new("Fedora-9-LiveCD-KDE").with_file("/var/ftp/pub/live.iso");
    connection(&transport).save_image(&image).await.unwrap();

    let calls = transport.calls();
    let sequence: Vec<&str> = calls.iter().map(|(_, name, _)| name.as_str()).collect();
    assert_eq!(
        sequence,
        vec!["login", "new_image", "modify_image", "modify_image", "save_image"]
    );

    // The opaque string handle is passed back verbatim
    let handle = Value::from("___NEW___image::abc123");
    assert_eq!(
        calls[2].2,
        vec![
            handle.clone(),
            Value::from("name"),
            Value::from("Fedora-9-LiveCD-KDE"),
            Value::from(TOKEN),
        ]
    );
    assert_eq!(
        calls[3].2,
        vec![
            handle.clone(),
            Value::from("file"),
            Value::from("/var/ftp/pub/live.iso"),
            Value::from(TOKEN),
        ]
    );
    assert_eq!(calls[4].2, vec![handle, Value::from(TOKEN)]);
}

#[tokio::test]
async fn test_fault_surfaces_to_caller() {
    let transport = MockTransport::new(Vec::new());

    match connection(&transport).distros().await {
        Err(ClientError::Fault(fault)) => {
            assert_eq!(fault.code, 1);
            assert!(fault.message.contains("get_distros"));
        }
        other => panic!("expected fault, got {other:?}"),
    }
    // Generic plumbing binds the distro lifecycle name
    assert_eq!(transport.methods_called(), vec![Distro::FIND_ALL.to_string()]);
}

#[tokio::test]
async fn test_version() {
    let transport = MockTransport::new(vec![("version", Value::from("1.5"))]);
    assert_eq!(connection(&transport).version().await.unwrap(), "1.5");

    let transport = MockTransport::new(vec![("version", Value::Double(3.4))]);
    assert_eq!(connection(&transport).version().await.unwrap(), "3.4");
}

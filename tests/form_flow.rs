//! End-to-end flows: fetch, render, interact, validate, submit, reset.

use std::{cell::RefCell, rc::Rc};

use serde_json::{Map, Value, json};

use jsonform::{
    FormApp, FormTransport, SaveOutcome,
    data::FieldValue,
    error::TransportError,
    host::{
        NodeId, UiEvent,
        memory::{MemoryHost, dispatch},
    },
    run::FileTransport,
};

/// Transport double: serves a fixed schema and records submissions.
struct MockTransport {
    schema: Value,
    fail_fetch: bool,
    fail_submit: bool,
    submissions: Rc<RefCell<Vec<Map<String, Value>>>>,
}

impl MockTransport {
    fn new(schema: Value) -> (Self, Rc<RefCell<Vec<Map<String, Value>>>>) {
        let submissions = Rc::new(RefCell::new(Vec::new()));
        (
            Self {
                schema,
                fail_fetch: false,
                fail_submit: false,
                submissions: submissions.clone(),
            },
            submissions,
        )
    }
}

impl FormTransport for MockTransport {
    fn fetch_schema(&mut self) -> Result<Value, TransportError> {
        if self.fail_fetch {
            return Err(TransportError::Network("connection refused".to_string()));
        }
        Ok(self.schema.clone())
    }

    fn submit(&mut self, snapshot: &Map<String, Value>) -> Result<(), TransportError> {
        if self.fail_submit {
            return Err(TransportError::Status(500));
        }
        self.submissions.borrow_mut().push(snapshot.clone());
        Ok(())
    }
}

fn loaded_app(host: &mut MemoryHost, schema: Value) -> (FormApp, Rc<RefCell<Vec<Map<String, Value>>>>) {
    let (transport, submissions) = MockTransport::new(schema);
    let mut app = FormApp::new(Box::new(transport), host.mount());
    app.load(host).unwrap();
    (app, submissions)
}

fn fire(host: &mut MemoryHost, app: &mut FormApp, path: &str, event: UiEvent) {
    let node = host.find_by_attr("data-path", path).unwrap();
    let session = app.session_mut().unwrap();
    dispatch(host, session, node, event);
}

fn wrapper_of(host: &MemoryHost, app: &FormApp, path: &str) -> NodeId {
    app.session().unwrap().registry().get(path).unwrap().wrapper
}

#[test]
fn test_dependent_field_flow_from_render_to_submission() {
    let mut host = MemoryHost::new();
    let (mut app, submissions) = loaded_app(
        &mut host,
        json!({
            "a": {"type": "boolean", "value": false},
            "b": {"type": "text", "required": true, "visibleIf": "a == true"}
        }),
    );

    // initial render hides the dependent field
    assert!(!host.effectively_visible(wrapper_of(&host, &app, "b")));

    fire(&mut host, &mut app, "a", UiEvent::Click);
    assert!(host.effectively_visible(wrapper_of(&host, &app, "b")));

    // required and empty while visible: aggregate failure, no submission
    assert_eq!(app.save(&mut host), SaveOutcome::ValidationFailed);
    assert!(submissions.borrow().is_empty());
    let error = app.session().unwrap().registry().get("b").unwrap().error;
    assert_eq!(host.node(error).text, "This field is required.");

    fire(&mut host, &mut app, "b", UiEvent::Change("x".to_string()));
    assert_eq!(app.save(&mut host), SaveOutcome::Saved);

    let sent = submissions.borrow();
    assert_eq!(sent.len(), 1);
    assert_eq!(
        Value::Object(sent[0].clone()),
        json!({"isConfigured": true, "a": true, "b": "x"})
    );
    assert_eq!(host.take_notices(), ["Configuration saved."]);
}

#[test]
fn test_save_reports_transport_failure_once() {
    let mut host = MemoryHost::new();
    let (transport, submissions) = MockTransport::new(json!({
        "name": {"type": "text", "value": "dev"}
    }));
    let mut app = FormApp::new(
        Box::new(MockTransport {
            fail_submit: true,
            ..transport
        }),
        host.mount(),
    );
    app.load(&mut host).unwrap();

    assert_eq!(app.save(&mut host), SaveOutcome::TransportFailed);
    assert!(submissions.borrow().is_empty());
    assert_eq!(host.take_notices(), ["Failed to save configuration."]);
}

#[test]
fn test_failed_fetch_leaves_form_unrendered() {
    let mut host = MemoryHost::new();
    let (transport, _) = MockTransport::new(json!({}));
    let mut app = FormApp::new(
        Box::new(MockTransport {
            fail_fetch: true,
            ..transport
        }),
        host.mount(),
    );

    assert!(app.load(&mut host).is_err());
    assert!(app.session().is_none());
    assert!(host.node(host.mount()).children.is_empty());
    assert_eq!(host.take_notices(), ["Failed to load configuration."]);

    // save before any successful load submits nothing
    assert_eq!(app.save(&mut host), SaveOutcome::NotLoaded);
    assert_eq!(host.take_notices(), ["Nothing to save."]);
}

#[test]
fn test_non_object_schema_is_rejected() {
    let mut host = MemoryHost::new();
    let (transport, _) = MockTransport::new(json!(["not", "a", "form"]));
    let mut app = FormApp::new(Box::new(transport), host.mount());
    assert!(app.load(&mut host).is_err());
    assert!(app.session().is_none());
    assert_eq!(host.take_notices(), ["Failed to load configuration."]);
}

/// Structural signature of the rendered tree, for state comparisons.
fn signature(host: &MemoryHost, node: NodeId) -> Vec<String> {
    host.walk(node)
        .into_iter()
        .map(|id| {
            let data = host.node(id);
            format!(
                "{}|{:?}|{:?}|{}|{}",
                data.tag, data.attrs, data.classes, data.text, data.visible
            )
        })
        .collect()
}

#[test]
fn test_reset_discards_edits_and_is_idempotent() {
    let mut host = MemoryHost::new();
    let (mut app, _) = loaded_app(
        &mut host,
        json!({
            "a": {"type": "boolean", "value": false},
            "b": {"type": "text", "value": "initial"}
        }),
    );

    fire(&mut host, &mut app, "a", UiEvent::Click);
    fire(&mut host, &mut app, "b", UiEvent::Change("edited".to_string()));
    assert_eq!(
        app.session().unwrap().registry().get("a").unwrap().value,
        FieldValue::Bool(true)
    );

    app.reset(&mut host).unwrap();
    let registry = app.session().unwrap().registry();
    assert_eq!(registry.get("a").unwrap().value, FieldValue::Bool(false));
    assert_eq!(
        registry.get("b").unwrap().value,
        FieldValue::Text("initial".to_string())
    );

    let after_first = signature(&host, host.mount());
    app.reset(&mut host).unwrap();
    let after_second = signature(&host, host.mount());
    assert_eq!(after_first, after_second);
}

#[test]
fn test_snapshot_mirrors_registry() {
    let mut host = MemoryHost::new();
    let (mut app, _) = loaded_app(
        &mut host,
        json!({
            "grp": {"_group": true, "flag": {"type": "boolean", "value": true}},
            "name": {"type": "text", "value": "dev"}
        }),
    );
    fire(&mut host, &mut app, "name", UiEvent::Change("edited".to_string()));
    let snapshot = app.session().unwrap().snapshot();
    assert_eq!(snapshot["grp_flag"], json!(true));
    assert_eq!(snapshot["name"], json!("edited"));
    // the snapshot is flat: no isConfigured marker, no nesting
    assert_eq!(snapshot.len(), 2);
}

#[test]
fn test_file_transport_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let schema_path = dir.path().join("user.json");
    let output_path = dir.path().join("saved.json");
    std::fs::write(
        &schema_path,
        serde_json::to_string_pretty(&json!({
            "device": {"_group": true, "_title": "Device",
                "name": {"type": "text", "value": "sentinel", "required": true}}
        }))
        .unwrap(),
    )
    .unwrap();

    let mut host = MemoryHost::new();
    let transport = FileTransport::new(&schema_path, &output_path);
    let mut app = FormApp::new(Box::new(transport), host.mount());
    app.load(&mut host).unwrap();

    assert_eq!(app.save(&mut host), SaveOutcome::Saved);
    let written: Value =
        serde_json::from_str(&std::fs::read_to_string(&output_path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!({"isConfigured": true, "device_name": "sentinel"})
    );
}

#[test]
fn test_malformed_subtree_never_blocks_siblings() {
    let mut host = MemoryHost::new();
    let (mut app, submissions) = loaded_app(
        &mut host,
        json!({
            "broken": {"type": "select", "options": null},
            "orphan_ref": {"type": "select", "options": "$nowhere"},
            "working": {"type": "text", "value": "fine"}
        }),
    );
    let registry = app.session().unwrap().registry();
    assert_eq!(registry.len(), 1);
    assert!(registry.get("working").is_some());

    assert_eq!(app.save(&mut host), SaveOutcome::Saved);
    assert_eq!(
        Value::Object(submissions.borrow()[0].clone()),
        json!({"isConfigured": true, "working": "fine"})
    );
}

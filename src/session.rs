//! Live form session.
//!
//! A [`FormSession`] owns everything one rendered form needs: the classified
//! schema root, the field registry, the rendered group views and the event
//! binding table. It is created when the schema document arrives, passed by
//! reference to every component, and dropped on reset. There is no global
//! state.

use log::warn;
use serde_json::{Map, Value};

use crate::{
    data::{
        path::FieldPath,
        registry::{FieldRegistry, FieldValue},
        schema::SchemaRoot,
    },
    error::SchemaError,
    host::{BindingId, NodeId, RenderHost, UiEvent},
    render::{self, GroupView, RenderCtx},
    visibility,
};

/// Message written into a field's error slot by the save pass.
pub const REQUIRED_MESSAGE: &str = "This field is required.";

/// Engine-side description of what a subscribed event does.
#[derive(Debug, Clone)]
pub(crate) enum Binding {
    /// Flip a boolean field; pointer and keyboard activation both land here.
    ToggleSwitch { path: FieldPath, control: NodeId },
    /// Overwrite a select value from a change notification.
    SelectInput { path: FieldPath },
    /// Overwrite a text value from a change notification.
    TextInput { path: FieldPath },
    /// Toggle a collapsible section's collapsed state.
    CollapseToggle { section: NodeId },
    /// Flip a secret input between masked and plain rendering. Leaves the
    /// stored value untouched.
    RevealSecret {
        input: NodeId,
        icon: NodeId,
        masked: bool,
        masked_type: String,
    },
}

/// Bindings handed out to the host, addressed by [`BindingId`].
#[derive(Debug, Default)]
pub(crate) struct BindingTable {
    bindings: Vec<Binding>,
}

impl BindingTable {
    pub(crate) fn push(&mut self, binding: Binding) -> BindingId {
        let id = BindingId(self.bindings.len() as u32);
        self.bindings.push(binding);
        id
    }

    fn get(&self, id: BindingId) -> Option<&Binding> {
        self.bindings.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: BindingId) -> Option<&mut Binding> {
        self.bindings.get_mut(id.0 as usize)
    }
}

/// One rendered form: schema root, registry, groups and bindings.
pub struct FormSession {
    root: SchemaRoot,
    registry: FieldRegistry,
    groups: Vec<GroupView>,
    bindings: BindingTable,
}

impl FormSession {
    /// Classify `document` and render the full form into `mount`.
    ///
    /// # Errors
    ///
    /// Fails only when the document is not an object tree; malformed
    /// subtrees degrade to inline placeholders instead.
    pub fn new(
        host: &mut dyn RenderHost,
        mount: NodeId,
        document: &Value,
    ) -> Result<Self, SchemaError> {
        let root = SchemaRoot::try_from(document)?;
        let mut registry = FieldRegistry::new();
        let mut groups = Vec::new();
        let mut bindings = BindingTable::default();

        let mut ctx = RenderCtx {
            host,
            root: &root,
            registry: &mut registry,
            groups: &mut groups,
            bindings: &mut bindings,
        };
        render::render_tree(&mut ctx, mount);

        Ok(FormSession {
            root,
            registry,
            groups,
            bindings,
        })
    }

    pub fn registry(&self) -> &FieldRegistry {
        &self.registry
    }

    /// Rendered groups in document order.
    pub fn groups(&self) -> &[GroupView] {
        &self.groups
    }

    /// Flat mapping of path identifier to current value.
    pub fn snapshot(&self) -> Map<String, Value> {
        self.registry.snapshot()
    }

    /// Re-run the visibility pass. Idempotent.
    pub fn refresh_visibility(&self, host: &mut dyn RenderHost) {
        visibility::refresh_visibility(host, &self.root, &self.groups, &self.registry);
    }

    /// Handle a user event delivered by the host for `binding`.
    ///
    /// Value mutations commit to the registry first, then trigger the
    /// visibility pass; the pass therefore only ever observes values
    /// committed strictly before it.
    pub fn handle_event(&mut self, host: &mut dyn RenderHost, binding: BindingId, event: &UiEvent) {
        let Some(bound) = self.bindings.get(binding) else {
            warn!("event for unknown binding {binding:?} dropped");
            return;
        };
        match bound.clone() {
            Binding::ToggleSwitch { path, control } => {
                if let UiEvent::Key(key) = event
                    && !is_activation_key(key)
                {
                    return;
                }
                if matches!(event, UiEvent::Change(_)) {
                    return;
                }
                self.toggle_boolean(host, &path, control);
            }
            Binding::SelectInput { path } | Binding::TextInput { path } => {
                let UiEvent::Change(value) = event else {
                    return;
                };
                self.registry.update(&path, FieldValue::Text(value.clone()));
                self.refresh_visibility(host);
            }
            Binding::CollapseToggle { section } => {
                // independent of visibility: a hidden section keeps its
                // collapsed/expanded memory
                host.toggle_class(section, "collapsed");
            }
            Binding::RevealSecret { .. } => self.reveal_secret(host, binding),
        }
    }

    fn toggle_boolean(&mut self, host: &mut dyn RenderHost, path: &FieldPath, control: NodeId) {
        let flat = path.flat();
        let Some(entry) = self.registry.get_mut(&flat) else {
            warn!("toggle for unregistered field {flat:?} dropped");
            return;
        };
        let FieldValue::Bool(current) = entry.value else {
            warn!("toggle for non-boolean field {flat:?} dropped");
            return;
        };
        let next = !current;
        entry.value = FieldValue::Bool(next);
        host.set_attr(control, "aria-checked", bool_attr(next));
        host.set_attr(control, "data-checked", bool_attr(next));
        self.refresh_visibility(host);
    }

    fn reveal_secret(&mut self, host: &mut dyn RenderHost, binding: BindingId) {
        if let Some(Binding::RevealSecret {
            input,
            icon,
            masked,
            masked_type,
        }) = self.bindings.get_mut(binding)
        {
            *masked = !*masked;
            if *masked {
                host.set_attr(*input, "type", masked_type);
                host.set_text(*icon, "👁️");
            } else {
                host.set_attr(*input, "type", "text");
                host.set_text(*icon, "🙈");
            }
        }
    }

    /// Run the save-time validation pass and build the submission payload.
    ///
    /// Every entry is normalized (text and choice values trim whitespace),
    /// its previous error display cleared, and required-but-empty failures
    /// recorded without short-circuiting, so one pass reports every invalid
    /// field. Returns the payload only when all fields pass.
    pub fn validate(&self, host: &mut dyn RenderHost) -> Option<Map<String, Value>> {
        let mut valid = true;
        let mut payload = Map::new();
        payload.insert("isConfigured".to_string(), Value::Bool(true));
        for (flat, entry) in self.registry.iter() {
            let normalized = match &entry.value {
                FieldValue::Bool(value) => FieldValue::Bool(*value),
                FieldValue::Text(text) => FieldValue::Text(text.trim().to_string()),
            };
            host.set_text(entry.error, "");
            if entry.config.required && normalized.is_empty() {
                host.set_text(entry.error, REQUIRED_MESSAGE);
                valid = false;
            }
            payload.insert(flat.clone(), normalized.to_json());
        }
        valid.then_some(payload)
    }
}

fn is_activation_key(key: &str) -> bool {
    key == " " || key == "Enter"
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

//! Widget factory.
//!
//! Given a field's validated configuration, constructs exactly one
//! interactive control, wires its event bindings, and registers it in the
//! field registry with its initial value. Shape problems that survive
//! classification (an option reference that does not resolve to a list)
//! render a field-level error instead of a control: the field stays inert,
//! with no widget and no registry entry.

use serde_json::Value;

use crate::{
    data::{
        path::FieldPath,
        registry::{FieldEntry, FieldValue},
        schema::{self, FieldConfig, FieldKind, OptionSource},
    },
    host::{EventKind, NodeId},
    session::Binding,
};

use super::RenderCtx;

pub(crate) fn build_field(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    config: &FieldConfig,
) -> NodeId {
    match &config.kind {
        FieldKind::Boolean => boolean_field(ctx, path, config),
        FieldKind::Select => select_field(ctx, path, config),
        FieldKind::Text(subtype) => text_field(ctx, path, config, subtype),
    }
}

fn boolean_field(ctx: &mut RenderCtx<'_>, path: &FieldPath, config: &FieldConfig) -> NodeId {
    let flat = path.flat();
    let wrapper = ctx.host.create_element("div");
    ctx.host.add_class(wrapper, "field");
    ctx.host.add_class(wrapper, "boolean-field");

    let label = label_for(ctx, config, &flat);

    let checked = schema::truthy(Some(&config.value));
    let toggle = ctx.host.create_element("div");
    ctx.host.add_class(toggle, "toggle-switch");
    ctx.host.set_attr(toggle, "role", "switch");
    ctx.host.set_attr(toggle, "tabindex", "0");
    ctx.host.set_attr(toggle, "aria-checked", bool_attr(checked));
    ctx.host.set_attr(toggle, "data-checked", bool_attr(checked));
    ctx.host.set_attr(toggle, "data-path", &flat);

    let error = error_slot(ctx);

    // pointer and keyboard activation share one binding, so both produce
    // the identical state transition
    let binding = ctx.bindings.push(Binding::ToggleSwitch {
        path: path.clone(),
        control: toggle,
    });
    ctx.host.listen(toggle, EventKind::Click, binding);
    ctx.host.listen(toggle, EventKind::Keydown, binding);

    ctx.host.append(wrapper, label);
    ctx.host.append(wrapper, toggle);
    ctx.host.append(wrapper, error);

    ctx.registry.register(FieldEntry {
        path: path.clone(),
        value: FieldValue::Bool(checked),
        config: config.clone(),
        wrapper,
        error,
    });
    wrapper
}

fn select_field(ctx: &mut RenderCtx<'_>, path: &FieldPath, config: &FieldConfig) -> NodeId {
    let flat = path.flat();
    let wrapper = ctx.host.create_element("div");
    ctx.host.add_class(wrapper, "field");
    let label = label_for(ctx, config, &flat);

    // the option source resolves exactly once, at construction time
    let Some(options) = resolve_options(ctx, config) else {
        let message = ctx.host.create_element("div");
        ctx.host.add_class(message, "error");
        ctx.host.set_text(message, &format!("Invalid options for {flat}"));
        ctx.host.append(wrapper, label);
        ctx.host.append(wrapper, message);
        return wrapper;
    };

    let select = ctx.host.create_element("select");
    ctx.host.set_attr(select, "data-path", &flat);
    for option in &options {
        let element = ctx.host.create_element("option");
        ctx.host.set_attr(element, "value", option);
        ctx.host.set_text(element, option);
        ctx.host.append(select, element);
    }

    // preselect the declared value; anything not among the options
    // collapses to the empty selection
    let declared = schema::text_or_empty(&config.value);
    let initial = if options.contains(&declared) {
        declared
    } else {
        String::new()
    };
    ctx.host.set_attr(select, "value", &initial);

    let error = error_slot(ctx);
    let binding = ctx.bindings.push(Binding::SelectInput { path: path.clone() });
    ctx.host.listen(select, EventKind::Change, binding);

    ctx.host.append(wrapper, label);
    ctx.host.append(wrapper, select);
    ctx.host.append(wrapper, error);

    ctx.registry.register(FieldEntry {
        path: path.clone(),
        value: FieldValue::Text(initial),
        config: config.clone(),
        wrapper,
        error,
    });
    wrapper
}

fn resolve_options(ctx: &RenderCtx<'_>, config: &FieldConfig) -> Option<Vec<String>> {
    match config.options.as_ref()? {
        OptionSource::List(items) => Some(items.clone()),
        OptionSource::Reference(reference) => match ctx.root.resolve_reference(reference) {
            Some(Value::Array(items)) => schema::scalar_strings(items),
            _ => None,
        },
    }
}

fn text_field(
    ctx: &mut RenderCtx<'_>,
    path: &FieldPath,
    config: &FieldConfig,
    subtype: &str,
) -> NodeId {
    let flat = path.flat();
    let wrapper = ctx.host.create_element("div");
    ctx.host.add_class(wrapper, "field");
    let label = label_for(ctx, config, &flat);

    let input_wrapper = ctx.host.create_element("div");
    ctx.host.add_class(input_wrapper, "input-wrapper");

    let input_type = if subtype.is_empty() { "text" } else { subtype };
    let initial = schema::text_or_empty(&config.value);
    let input = ctx.host.create_element("input");
    ctx.host.set_attr(input, "type", input_type);
    ctx.host.set_attr(input, "value", &initial);
    ctx.host.set_attr(input, "data-path", &flat);

    let binding = ctx.bindings.push(Binding::TextInput { path: path.clone() });
    ctx.host.listen(input, EventKind::Change, binding);
    ctx.host.append(input_wrapper, input);

    if input_type == "password" {
        let eye = ctx.host.create_element("span");
        ctx.host.add_class(eye, "eye-icon");
        ctx.host.set_text(eye, "👁️");
        ctx.host.set_attr(eye, "title", "Show/Hide Password");
        let reveal = ctx.bindings.push(Binding::RevealSecret {
            input,
            icon: eye,
            masked: true,
            masked_type: input_type.to_string(),
        });
        ctx.host.listen(eye, EventKind::Click, reveal);
        ctx.host.append(input_wrapper, eye);
    }

    let error = error_slot(ctx);
    ctx.host.append(wrapper, label);
    ctx.host.append(wrapper, input_wrapper);
    ctx.host.append(wrapper, error);

    ctx.registry.register(FieldEntry {
        path: path.clone(),
        value: FieldValue::Text(initial),
        config: config.clone(),
        wrapper,
        error,
    });
    wrapper
}

fn label_for(ctx: &mut RenderCtx<'_>, config: &FieldConfig, flat: &str) -> NodeId {
    let label = ctx.host.create_element("label");
    ctx.host
        .set_text(label, config.label.as_deref().unwrap_or(flat));
    label
}

fn error_slot(ctx: &mut RenderCtx<'_>) -> NodeId {
    let error = ctx.host.create_element("div");
    ctx.host.add_class(error, "error");
    error
}

fn bool_attr(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

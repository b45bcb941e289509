//! Recursive schema-tree renderer.
//!
//! Walks the classified tree in declaration order, builds sections for
//! groups and delegates leaf fields to the widget factory. Hidden subtrees
//! are skipped entirely: no elements, no registry entries, no recursion.

mod widgets;

use log::warn;

use indexmap::IndexMap;

use crate::{
    data::{
        path::FieldPath,
        registry::FieldRegistry,
        schema::{SchemaNode, SchemaRoot},
    },
    host::{EventKind, NodeId, RenderHost},
    session::{Binding, BindingTable},
    visibility,
};

/// Heading level of top-level sections; nesting increases it.
const BASE_HEADING_LEVEL: usize = 2;

/// A rendered section tracked for the visibility pass.
#[derive(Debug, Clone)]
pub struct GroupView {
    /// Structured path of the group's schema node.
    pub path: FieldPath,
    /// The section element whose display the pass controls.
    pub section: NodeId,
}

/// Mutable rendering state threaded through the recursion.
pub(crate) struct RenderCtx<'a> {
    pub host: &'a mut dyn RenderHost,
    pub root: &'a SchemaRoot,
    pub registry: &'a mut FieldRegistry,
    pub groups: &'a mut Vec<GroupView>,
    pub bindings: &'a mut BindingTable,
}

/// Render the whole classified tree into `container`.
pub(crate) fn render_tree(ctx: &mut RenderCtx<'_>, container: NodeId) {
    let nodes = ctx.root.children();
    render_level(ctx, nodes, container, BASE_HEADING_LEVEL, &FieldPath::root());
}

fn render_level(
    ctx: &mut RenderCtx<'_>,
    nodes: &IndexMap<String, SchemaNode>,
    container: NodeId,
    depth: usize,
    path: &FieldPath,
) {
    for (key, node) in nodes {
        let full_path = path.child(key);
        match node {
            SchemaNode::Group(group) => {
                if group.hidden {
                    continue;
                }
                let section = ctx.host.create_element("section");
                ctx.host.set_attr(section, "data-group", &full_path.flat());

                let heading = ctx.host.create_element(&heading_tag(depth));
                ctx.host.set_text(heading, group.title.as_deref().unwrap_or(key));
                ctx.host.append(section, heading);

                if group.collapsible {
                    ctx.host.add_class(section, "collapsible");
                    if group.collapsed {
                        ctx.host.add_class(section, "collapsed");
                    }
                    let binding = ctx.bindings.push(Binding::CollapseToggle { section });
                    ctx.host.listen(heading, EventKind::Click, binding);
                }

                ctx.groups.push(GroupView {
                    path: full_path.clone(),
                    section,
                });
                render_level(ctx, &group.children, section, depth + 1, &full_path);
                ctx.host.append(container, section);
            }
            SchemaNode::Field(config) => {
                if config.hidden {
                    continue;
                }
                let element = widgets::build_field(ctx, &full_path, config);
                ctx.host.append(container, element);
            }
            SchemaNode::Invalid(invalid) => {
                if invalid.hidden {
                    continue;
                }
                warn!(
                    "invalid field configuration at {}: {}",
                    full_path.flat(),
                    invalid.reason
                );
                let placeholder = ctx.host.create_text(&format!("Invalid config for {key}"));
                ctx.host.append(container, placeholder);
            }
            SchemaNode::Data(_) => {}
        }
    }

    // redundant at inner levels; the final top-level call settles it
    visibility::refresh_visibility(&mut *ctx.host, ctx.root, ctx.groups, ctx.registry);
}

fn heading_tag(depth: usize) -> String {
    format!("h{}", depth.min(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_heading_tag_clamps_at_h6() {
        assert_eq!(heading_tag(2), "h2");
        assert_eq!(heading_tag(6), "h6");
        assert_eq!(heading_tag(9), "h6");
    }
}

// Copyright 2026 the Folio Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Writing layouts into a [`ContentHandler`].
//!
//! The full layout is a `layout` element wrapping the root folder. Folders
//! become `folder` elements and channels become `channel` elements with one
//! nested `parameter` element per parameter. Node ids appear in their text
//! form (see [`NodeId`]).
//!
//! When [`Markings`] are active, every position inside a folder where the
//! pending add or move is permitted gets an empty `addTarget` or `moveTarget`
//! element, emitted right where the node would land. Its `parentID` attribute
//! names the folder and `nextID` (omitted when appending) the sibling it
//! would precede.

use crate::config::LayoutConfig;
use crate::error::{LayoutError, Result};
use crate::layout::UserLayout;
use crate::node::{NodeDescription, NodeId, NodeKind};
use crate::sink::{Attributes, ContentHandler, SinkError};

/// Element names used in layout output.
pub mod element {
    /// Wraps the whole layout.
    pub const LAYOUT: &str = "layout";
    /// A folder node.
    pub const FOLDER: &str = "folder";
    /// A channel node.
    pub const CHANNEL: &str = "channel";
    /// A channel parameter.
    pub const PARAMETER: &str = "parameter";
    /// A position where the pending add is permitted.
    pub const ADD_TARGET: &str = "addTarget";
    /// A position where the pending move is permitted.
    pub const MOVE_TARGET: &str = "moveTarget";
}

/// Pending add/move gestures whose valid targets are marked in the output.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Markings {
    /// Node about to be added, if any.
    pub add: Option<NodeDescription>,
    /// Node about to be moved, if any.
    pub move_node: Option<NodeId>,
}

impl Markings {
    /// Returns whether no gesture is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_none() && self.move_node.is_none()
    }
}

/// A layout snapshot paired with the markings active when it was taken.
#[derive(Clone, Debug)]
pub struct MarkedLayout {
    /// The tree.
    pub layout: UserLayout,
    /// Gestures whose targets are marked when the tree is written.
    pub markings: Markings,
}

impl MarkedLayout {
    /// Writes the whole layout with its markings.
    pub fn write(&self, config: &LayoutConfig, handler: &mut dyn ContentHandler) -> Result<()> {
        self.layout.write(config, &self.markings, handler)
    }

    /// Writes the subtree rooted at `id` with its markings.
    pub fn write_subtree(
        &self,
        id: NodeId,
        config: &LayoutConfig,
        handler: &mut dyn ContentHandler,
    ) -> Result<()> {
        self.layout.write_subtree(id, config, &self.markings, handler)
    }
}

impl UserLayout {
    /// Writes the whole layout, wrapped in a `layout` element.
    pub fn write(
        &self,
        config: &LayoutConfig,
        markings: &Markings,
        handler: &mut dyn ContentHandler,
    ) -> Result<()> {
        let mut writer = Writer {
            layout: self,
            config,
            markings,
            handler,
        };
        writer.sink(|h| h.start_document())?;
        let attributes = Attributes::new().with("ID", self.layout_id().to_string());
        writer.sink(|h| h.start_element(element::LAYOUT, &attributes))?;
        writer.node(NodeId::ROOT)?;
        writer.sink(|h| h.end_element(element::LAYOUT))?;
        writer.sink(|h| h.end_document())
    }

    /// Writes the subtree rooted at `id`.
    pub fn write_subtree(
        &self,
        id: NodeId,
        config: &LayoutConfig,
        markings: &Markings,
        handler: &mut dyn ContentHandler,
    ) -> Result<()> {
        self.resolve(id)?;
        let mut writer = Writer {
            layout: self,
            config,
            markings,
            handler,
        };
        writer.sink(|h| h.start_document())?;
        writer.node(id)?;
        writer.sink(|h| h.end_document())
    }
}

struct Writer<'a> {
    layout: &'a UserLayout,
    config: &'a LayoutConfig,
    markings: &'a Markings,
    handler: &'a mut dyn ContentHandler,
}

impl Writer<'_> {
    fn sink(
        &mut self,
        f: impl FnOnce(&mut dyn ContentHandler) -> core::result::Result<(), SinkError>,
    ) -> Result<()> {
        f(&mut *self.handler).map_err(LayoutError::Sink)
    }

    fn node(&mut self, id: NodeId) -> Result<()> {
        let layout = self.layout;
        let description = layout.node(id)?;
        let mut attributes = Attributes::new().with("ID", id.to_string());
        attributes.push("name", description.name.as_str());
        match &description.kind {
            NodeKind::Folder(folder) => {
                attributes.push("type", folder.folder_type.as_str());
                push_flags(&mut attributes, description);
                self.sink(|h| h.start_element(element::FOLDER, &attributes))?;
                for child in layout.child_ids(id)? {
                    self.targets(id, Some(child))?;
                    self.node(child)?;
                }
                self.targets(id, None)?;
                self.sink(|h| h.end_element(element::FOLDER))
            }
            NodeKind::Channel(channel) => {
                attributes.push("fname", channel.fname.as_str());
                attributes.push("title", channel.title.as_str());
                attributes.push("description", channel.description.as_str());
                attributes.push("timeout", channel.timeout_ms.to_string());
                attributes.push("editable", bool_str(channel.editable));
                attributes.push("hasHelp", bool_str(channel.has_help));
                attributes.push("hasAbout", bool_str(channel.has_about));
                attributes.push("secure", bool_str(channel.secure));
                push_flags(&mut attributes, description);
                self.sink(|h| h.start_element(element::CHANNEL, &attributes))?;
                for (name, value) in &channel.parameters {
                    let parameter = Attributes::new()
                        .with("name", name.as_str())
                        .with("value", value.as_str());
                    self.sink(|h| h.start_element(element::PARAMETER, &parameter))?;
                    self.sink(|h| h.end_element(element::PARAMETER))?;
                }
                self.sink(|h| h.end_element(element::CHANNEL))
            }
        }
    }

    /// Emits target markers for the position before `next` (or the end) in
    /// `parent`.
    fn targets(&mut self, parent: NodeId, next: Option<NodeId>) -> Result<()> {
        let (layout, config, markings) = (self.layout, self.config, self.markings);
        if let Some(add) = &markings.add
            && layout.can_add_node(config, add, parent, next)?
        {
            self.marker(element::ADD_TARGET, parent, next)?;
        }
        if let Some(moving) = markings.move_node
            && layout.contains(moving)
            && layout.can_move_node(config, moving, parent, next)?
        {
            self.marker(element::MOVE_TARGET, parent, next)?;
        }
        Ok(())
    }

    fn marker(&mut self, name: &str, parent: NodeId, next: Option<NodeId>) -> Result<()> {
        let mut attributes = Attributes::new().with("parentID", parent.to_string());
        if let Some(next) = next {
            attributes.push("nextID", next.to_string());
        }
        self.sink(|h| h.start_element(name, &attributes))?;
        self.sink(|h| h.end_element(name))
    }
}

fn push_flags(attributes: &mut Attributes, description: &NodeDescription) {
    attributes.push("hidden", bool_str(description.hidden));
    attributes.push("immutable", bool_str(description.immutable));
    attributes.push("unremovable", bool_str(description.unremovable));
}

const fn bool_str(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sink::{ContentEvent, NoopHandler};

    fn names(events: &[ContentEvent]) -> Vec<String> {
        events
            .iter()
            .filter_map(|e| match e {
                ContentEvent::StartElement { name, .. } => Some(name.clone()),
                _ => None,
            })
            .collect()
    }

    fn sample() -> Result<(UserLayout, NodeId, NodeId)> {
        let mut layout = UserLayout::new(5);
        let home = layout.insert(NodeId::ROOT, None, NodeDescription::folder("home"))?;
        let mut news = NodeDescription::channel("News", "news");
        if let NodeKind::Channel(c) = &mut news.kind {
            c.parameters.insert("region".into(), "eu".into());
        }
        let news = layout.insert(home, None, news)?;
        Ok((layout, home, news))
    }

    #[test]
    fn writes_nested_elements() -> Result<()> {
        let (layout, _, _) = sample()?;
        let mut events = Vec::new();
        layout.write(&LayoutConfig::standard(), &Markings::default(), &mut events)?;

        assert_eq!(events.first(), Some(&ContentEvent::StartDocument));
        assert_eq!(events.last(), Some(&ContentEvent::EndDocument));
        assert_eq!(
            names(&events),
            ["layout", "folder", "folder", "channel", "parameter"]
        );
        let layout_attrs = events[1].attributes();
        assert_eq!(layout_attrs.and_then(|a| a.get("ID")), Some("5"));
        let root_attrs = events[2].attributes();
        assert_eq!(root_attrs.and_then(|a| a.get("ID")), Some("root"));
        Ok(())
    }

    #[test]
    fn subtree_starts_at_the_node() -> Result<()> {
        let (layout, home, news) = sample()?;
        let mut events = Vec::new();
        layout.write_subtree(home, &LayoutConfig::standard(), &Markings::default(), &mut events)?;
        assert_eq!(names(&events), ["folder", "channel", "parameter"]);
        let channel = events
            .iter()
            .find(|e| e.element_name() == Some("channel"))
            .and_then(ContentEvent::attributes);
        assert_eq!(
            channel.and_then(|a| a.get("ID")),
            Some(news.to_string().as_str())
        );
        assert_eq!(channel.and_then(|a| a.get("fname")), Some("news"));
        Ok(())
    }

    #[test]
    fn subtree_of_unknown_node_fails() -> Result<()> {
        let (mut layout, _, news) = sample()?;
        layout.remove(news)?;
        let mut events = Vec::new();
        let result = layout.write_subtree(
            news,
            &LayoutConfig::standard(),
            &Markings::default(),
            &mut events,
        );
        assert!(matches!(result, Err(LayoutError::UnknownNode { .. })));
        assert!(events.is_empty());
        Ok(())
    }

    #[test]
    fn add_markings_appear_at_every_permitted_position() -> Result<()> {
        let (layout, home, news) = sample()?;
        let markings = Markings {
            add: Some(NodeDescription::channel("Mail", "mail")),
            move_node: None,
        };
        let mut events = Vec::new();
        layout.write(&LayoutConfig::standard(), &markings, &mut events)?;

        let targets: Vec<(Option<&str>, Option<&str>)> = events
            .iter()
            .filter(|e| e.element_name() == Some(element::ADD_TARGET))
            .filter_map(ContentEvent::attributes)
            .map(|a| (a.get("parentID"), a.get("nextID")))
            .collect();
        let home = home.to_string();
        let news = news.to_string();
        assert_eq!(
            targets,
            [
                (Some("root"), Some(home.as_str())),
                (Some(home.as_str()), Some(news.as_str())),
                (Some(home.as_str()), None),
                (Some("root"), None),
            ]
        );
        Ok(())
    }

    #[test]
    fn move_markings_skip_the_moving_subtree() -> Result<()> {
        let (mut layout, home, _) = sample()?;
        let other = layout.insert(NodeId::ROOT, None, NodeDescription::folder("other"))?;
        let markings = Markings {
            add: None,
            move_node: Some(home),
        };
        let mut events = Vec::new();
        layout.write(&LayoutConfig::standard(), &markings, &mut events)?;

        let parents: Vec<Option<&str>> = events
            .iter()
            .filter(|e| e.element_name() == Some(element::MOVE_TARGET))
            .filter_map(ContentEvent::attributes)
            .map(|a| a.get("parentID"))
            .collect();
        let other = other.to_string();
        // Root before other and at the end, plus the end of other. Nothing
        // before home itself or anywhere inside it.
        assert_eq!(
            parents,
            [Some("root"), Some(other.as_str()), Some("root")]
        );
        Ok(())
    }

    #[test]
    fn noop_handler_takes_marked_output() -> Result<()> {
        let (layout, home, news) = sample()?;
        let marked = MarkedLayout {
            layout,
            markings: Markings {
                add: Some(NodeDescription::channel("Mail", "mail")),
                move_node: Some(news),
            },
        };
        marked.write(&LayoutConfig::standard(), &mut NoopHandler)?;
        marked.write_subtree(home, &LayoutConfig::standard(), &mut NoopHandler)?;
        Ok(())
    }

    #[test]
    fn marked_subtree_carries_its_markings() -> Result<()> {
        let (layout, home, _) = sample()?;
        let marked = MarkedLayout {
            layout,
            markings: Markings {
                add: Some(NodeDescription::channel("Mail", "mail")),
                move_node: None,
            },
        };
        let mut events = Vec::new();
        marked.write_subtree(home, &LayoutConfig::standard(), &mut events)?;
        let targets = names(&events)
            .iter()
            .filter(|n| *n == element::ADD_TARGET)
            .count();
        // Before news and at the end of home.
        assert_eq!(targets, 2);
        Ok(())
    }

    #[derive(Debug)]
    struct Refuse;

    impl ContentHandler for Refuse {
        fn start_element(
            &mut self,
            name: &str,
            _: &Attributes,
        ) -> core::result::Result<(), SinkError> {
            Err(format!("refused {name}").into())
        }

        fn end_element(&mut self, _: &str) -> core::result::Result<(), SinkError> {
            Ok(())
        }
    }

    #[test]
    fn handler_failure_is_reported() -> Result<()> {
        let (layout, _, _) = sample()?;
        let result = layout.write(&LayoutConfig::standard(), &Markings::default(), &mut Refuse);
        assert!(matches!(result, Err(LayoutError::Sink(_))));
        Ok(())
    }
}

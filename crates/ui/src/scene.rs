//! Scene graph for the overlay
//!
//! Nodes hold paint primitives in container pixel space. A graph is built per
//! frame; painting is left to the host, which walks it through
//! [`SceneGraph::collect_render_commands`].

use serde::Serialize;

/// RGBA color value
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    /// Create a new color from RGBA values (0.0 to 1.0)
    pub fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create a new opaque color from RGB values
    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

/// Axis-aligned rectangle in container pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    /// Top-left x coordinate
    pub x: f32,
    /// Top-left y coordinate
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Inclusive point containment
    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && x <= self.x + self.width && y >= self.y && y <= self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }
}

/// Visual primitive types that can be painted
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Primitive {
    /// Filled rectangle with solid color
    Rectangle { rect: Rect, color: Color },
    /// Filled circle
    Circle { center: [f32; 2], radius: f32, color: Color },
    /// Single line of text with its top-left at `origin`
    Text { origin: [f32; 2], content: String, size: f32, color: Color },
}

/// Group of primitives plus the nodes painted over them
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneNode {
    primitives: Vec<Primitive>,
    children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_primitive(&mut self, primitive: Primitive) {
        self.primitives.push(primitive);
    }

    pub fn primitives(&self) -> &[Primitive] {
        &self.primitives
    }

    pub fn add_child(&mut self, child: SceneNode) {
        self.children.push(child);
    }

    pub fn children(&self) -> &[SceneNode] {
        &self.children
    }
}

/// Scene graph root containing all overlay nodes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneGraph {
    root: SceneNode,
}

impl SceneGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> &SceneNode {
        &self.root
    }

    pub fn root_mut(&mut self) -> &mut SceneNode {
        &mut self.root
    }

    /// Flatten the graph into paint order (parents before children)
    pub fn collect_render_commands(&self) -> Vec<&Primitive> {
        let mut commands = Vec::new();
        Self::traverse_node(&self.root, &mut commands);
        commands
    }

    fn traverse_node<'a>(node: &'a SceneNode, commands: &mut Vec<&'a Primitive>) {
        commands.extend(node.primitives());
        for child in node.children() {
            Self::traverse_node(child, commands);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dot(x: f32) -> Primitive {
        Primitive::Circle { center: [x, 5.0], radius: 4.0, color: Color::rgb(0.0, 0.0, 0.0) }
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert!(rect.contains(10.0, 10.0));
        assert!(rect.contains(30.0, 30.0));
        assert!(!rect.contains(30.1, 15.0));
        assert_eq!(rect.right(), 30.0);
        assert_eq!(rect.bottom(), 30.0);
    }

    #[test]
    fn test_paint_order_is_parent_then_children() {
        let mut graph = SceneGraph::new();
        graph.root_mut().add_primitive(dot(0.0));

        let mut first = SceneNode::new();
        first.add_primitive(dot(1.0));
        let mut nested = SceneNode::new();
        nested.add_primitive(dot(2.0));
        first.add_child(nested);
        let mut second = SceneNode::new();
        second.add_primitive(dot(3.0));

        graph.root_mut().add_child(first);
        graph.root_mut().add_child(second);

        let commands = graph.collect_render_commands();
        assert_eq!(commands, vec![&dot(0.0), &dot(1.0), &dot(2.0), &dot(3.0)]);
    }

    #[test]
    fn test_primitives_serialize_with_kind_tag() {
        let json = serde_json::to_value(dot(7.0)).unwrap();
        assert_eq!(json["kind"], "circle");
        assert_eq!(json["center"][0], 7.0);
    }
}

//! Building widget trees from declarative skin definitions.
//!
//! A skin arrives as a tree of [`SkinNode`]s (kind, attributes, children),
//! produced by whatever parser the application uses. The loader maps kinds to
//! behaviors through a [`WidgetFactory`], applies the attributes every node
//! shares (geometry, pins, flags, command binding) and then lets each
//! behavior read its own attributes through a [`ParseContext`].
//!
//! Attribute problems never abort loading. A malformed value falls back to
//! its default, a missing or mismatched image is replaced by a placeholder,
//! and every such recovery is recorded as a warning.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

use cursor_icon::CursorIcon;
use horizon_skin_core::logging::targets;
use horizon_skin_core::{Rect, Size};
use horizon_skin_render::{Color, ImageBuffer};
use parking_lot::Mutex;

use super::app::Diagnostics;
use super::config::SkinConfig;
use crate::platform::NativeKind;
use crate::widget::widgets::{
    Button, ImageView, Knob, Label, NativeControl, Panel, Slider, TabPages, Toggle,
};
use crate::widget::{ControlState, Pins, Widget, WidgetId, WidgetNode, WidgetTree};

// =========================================================================
// Skin definition
// =========================================================================

/// Attributes of one skin node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeSet {
    values: BTreeMap<String, String>,
}

impl AttributeSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an attribute (builder form).
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Set an attribute.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw attribute value.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Check whether an attribute is present.
    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    /// Iterate over attributes, sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of attributes.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AttributeSet {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }
}

/// One node of a declarative skin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SkinNode {
    pub kind: String,
    pub attributes: AttributeSet,
    pub children: Vec<SkinNode>,
}

impl SkinNode {
    /// Create a node without attributes or children.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            attributes: AttributeSet::new(),
            children: Vec::new(),
        }
    }

    /// Add an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.attributes.set(name, value.to_string());
        self
    }

    /// Set position and size.
    pub fn rect(self, x: i32, y: i32, width: i32, height: i32) -> Self {
        self.attr("XPos", x)
            .attr("YPos", y)
            .attr("Width", width)
            .attr("Height", height)
    }

    /// Add a child.
    pub fn child(mut self, child: SkinNode) -> Self {
        self.children.push(child);
        self
    }
}

// =========================================================================
// Images
// =========================================================================

/// Source of decoded skin images.
pub trait ImageProvider {
    /// Look up an image by name.
    fn image(&self, name: &str) -> Option<Arc<ImageBuffer>>;
}

/// Images registered in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryImageProvider {
    images: HashMap<String, Arc<ImageBuffer>>,
}

impl MemoryImageProvider {
    /// Create an empty provider.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an image.
    pub fn insert(&mut self, name: impl Into<String>, image: ImageBuffer) {
        self.images.insert(name.into(), Arc::new(image));
    }

    /// Register an image (builder form).
    pub fn with(mut self, name: impl Into<String>, image: ImageBuffer) -> Self {
        self.insert(name, image);
        self
    }
}

impl ImageProvider for MemoryImageProvider {
    fn image(&self, name: &str) -> Option<Arc<ImageBuffer>> {
        self.images.get(name).cloned()
    }
}

/// Images decoded from files under a directory, cached after first use.
#[derive(Debug)]
pub struct FileImageProvider {
    root: PathBuf,
    cache: Mutex<HashMap<String, Option<Arc<ImageBuffer>>>>,
}

impl FileImageProvider {
    /// Serve images from `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            cache: Mutex::new(HashMap::new()),
        }
    }

    fn decode(&self, name: &str) -> Option<Arc<ImageBuffer>> {
        let path = self.root.join(name);
        let bytes = match std::fs::read(&path) {
            Ok(bytes) => bytes,
            Err(err) => {
                tracing::warn!(target: targets::SKIN, path = %path.display(), %err, "cannot read image");
                return None;
            }
        };
        match ImageBuffer::from_bytes(&bytes) {
            Ok(image) => Some(Arc::new(image)),
            Err(err) => {
                tracing::warn!(target: targets::SKIN, path = %path.display(), %err, "cannot decode image");
                None
            }
        }
    }
}

impl ImageProvider for FileImageProvider {
    fn image(&self, name: &str) -> Option<Arc<ImageBuffer>> {
        if let Some(cached) = self.cache.lock().get(name) {
            return cached.clone();
        }
        let image = self.decode(name);
        self.cache.lock().insert(name.to_string(), image.clone());
        image
    }
}

/// Images of a control for its normal, hover, pressed and disabled states.
#[derive(Debug, Clone, Default)]
pub struct StateImages {
    pub normal: Option<Arc<ImageBuffer>>,
    pub hover: Option<Arc<ImageBuffer>>,
    pub pressed: Option<Arc<ImageBuffer>>,
    pub disabled: Option<Arc<ImageBuffer>>,
}

impl StateImages {
    /// The image for the node's current state, falling back to normal.
    pub fn select(&self, node: &WidgetNode) -> Option<&ImageBuffer> {
        let state = if !node.is_enabled() {
            self.disabled.as_ref()
        } else if node.is_pressed() {
            self.pressed.as_ref().or(self.hover.as_ref())
        } else if node.is_hovered() {
            self.hover.as_ref()
        } else {
            None
        };
        state.or(self.normal.as_ref()).map(|image| &**image)
    }
}

// =========================================================================
// ParseContext
// =========================================================================

/// What a behavior's `parse_attributes` may use: typed attribute access with
/// recovery, images and diagnostics.
pub struct ParseContext<'a> {
    diagnostics: &'a mut Diagnostics,
    images: &'a dyn ImageProvider,
    config: &'a SkinConfig,
    widget: String,
}

impl<'a> ParseContext<'a> {
    /// Create a context.
    pub fn new(
        diagnostics: &'a mut Diagnostics,
        images: &'a dyn ImageProvider,
        config: &'a SkinConfig,
    ) -> Self {
        Self {
            diagnostics,
            images,
            config,
            widget: String::new(),
        }
    }

    /// Toolkit settings.
    pub fn config(&self) -> &SkinConfig {
        self.config
    }

    /// Record a configuration warning about the widget being parsed.
    pub fn warn(&mut self, message: impl AsRef<str>) {
        let message = message.as_ref();
        if self.widget.is_empty() {
            self.diagnostics.warn(message);
        } else {
            self.diagnostics.warn(format!("{}: {message}", self.widget));
        }
    }

    fn set_widget(&mut self, label: String) {
        self.widget = label;
    }

    /// A string attribute.
    pub fn string(&self, attrs: &AttributeSet, name: &str) -> Option<String> {
        attrs.get(name).map(str::to_string)
    }

    /// A parsed attribute. Malformed values yield `default` and a warning.
    pub fn value<T: FromStr>(&mut self, attrs: &AttributeSet, name: &str, default: T) -> T {
        let Some(raw) = attrs.get(name) else {
            return default;
        };
        match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                self.warn(format!("malformed {name} '{raw}', using default"));
                default
            }
        }
    }

    /// An integer attribute.
    pub fn int(&mut self, attrs: &AttributeSet, name: &str, default: i32) -> i32 {
        self.value(attrs, name, default)
    }

    /// A float attribute. Non-finite values are malformed.
    pub fn float(&mut self, attrs: &AttributeSet, name: &str, default: f32) -> f32 {
        let value: f32 = self.value(attrs, name, default);
        if value.is_finite() {
            value
        } else {
            self.warn(format!("non-finite {name}, using default"));
            default
        }
    }

    /// A boolean attribute (`1`/`0`, `true`/`false`, `yes`/`no`).
    pub fn bool(&mut self, attrs: &AttributeSet, name: &str, default: bool) -> bool {
        let Some(raw) = attrs.get(name) else {
            return default;
        };
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => true,
            "0" | "false" | "no" | "off" => false,
            _ => {
                self.warn(format!("malformed {name} '{raw}', using default"));
                default
            }
        }
    }

    /// A color attribute (`#RRGGBB`, `RRGGBB` or `#RRGGBBAA`).
    pub fn color(&mut self, attrs: &AttributeSet, name: &str) -> Option<Color> {
        let raw = attrs.get(name)?;
        let color = Color::from_hex(raw);
        if color.is_none() {
            self.warn(format!("malformed color {name} '{raw}'"));
        }
        color
    }

    /// An image attribute. A name the provider does not know is a warning.
    pub fn image(&mut self, attrs: &AttributeSet, name: &str) -> Option<Arc<ImageBuffer>> {
        let file = attrs.get(name)?;
        let image = self.images.image(file);
        if image.is_none() {
            self.warn(format!("missing image '{file}' for {name}"));
        }
        image
    }

    /// A red placeholder of the given size.
    pub fn placeholder(&self, size: Size) -> Arc<ImageBuffer> {
        Arc::new(ImageBuffer::placeholder(size, self.config.placeholder_color))
    }

    /// Load `Image`, `HoverImage`, `PressedImage` and `DisabledImage`.
    ///
    /// Every state image must have the size of the normal image. Missing and
    /// mismatched images are replaced by a placeholder of `size`.
    pub fn state_images(&mut self, attrs: &AttributeSet, size: Size) -> StateImages {
        let mut images = StateImages::default();
        let mut expected: Option<Size> = None;
        for (name, slot) in [
            ("Image", &mut images.normal),
            ("HoverImage", &mut images.hover),
            ("PressedImage", &mut images.pressed),
            ("DisabledImage", &mut images.disabled),
        ] {
            if !attrs.contains(name) {
                continue;
            }
            let image = match self.image(attrs, name) {
                Some(image) if expected.is_some_and(|e| e != image.size()) => {
                    self.warn(format!(
                        "{name} is {}x{}, other state images differ; using placeholder",
                        image.width(),
                        image.height()
                    ));
                    self.placeholder(size)
                }
                Some(image) => image,
                None => self.placeholder(size),
            };
            expected.get_or_insert(image.size());
            *slot = Some(image);
        }
        images
    }
}

// =========================================================================
// Factory
// =========================================================================

/// Constructor of a behavior.
pub type WidgetConstructor = Box<dyn Fn() -> Box<dyn Widget>>;

/// Maps skin kinds to behaviors.
pub struct WidgetFactory {
    constructors: HashMap<String, WidgetConstructor>,
}

impl Debug for WidgetFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut kinds: Vec<_> = self.constructors.keys().collect();
        kinds.sort();
        f.debug_struct("WidgetFactory").field("kinds", &kinds).finish()
    }
}

impl Default for WidgetFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl WidgetFactory {
    /// A factory knowing the built-in kinds.
    pub fn new() -> Self {
        let mut factory = Self::empty();
        factory.register("Panel", || Box::new(Panel::new()));
        factory.register("Image", || Box::new(ImageView::new()));
        factory.register("Label", || Box::new(Label::new()));
        factory.register("Button", || Box::new(Button::new()));
        factory.register("Toggle", || Box::new(Toggle::new()));
        factory.register("Knob", || Box::new(Knob::new()));
        factory.register("Slider", || Box::new(Slider::new()));
        factory.register("Native", || Box::new(NativeControl::new(NativeKind::Edit)));
        factory.register("Edit", || Box::new(NativeControl::new(NativeKind::Edit)));
        factory.register("List", || Box::new(NativeControl::new(NativeKind::List)));
        factory.register("Tree", || Box::new(NativeControl::new(NativeKind::Tree)));
        factory.register("TabPages", || Box::new(TabPages::new()));
        factory
    }

    /// A factory without any kind.
    pub fn empty() -> Self {
        Self {
            constructors: HashMap::new(),
        }
    }

    /// Register (or replace) a kind.
    pub fn register<F>(&mut self, kind: impl Into<String>, constructor: F)
    where
        F: Fn() -> Box<dyn Widget> + 'static,
    {
        self.constructors.insert(kind.into(), Box::new(constructor));
    }

    /// Create a behavior for a kind.
    pub fn create(&self, kind: &str) -> Option<Box<dyn Widget>> {
        self.constructors.get(kind).map(|constructor| constructor())
    }

    /// Check whether a kind is known.
    pub fn contains(&self, kind: &str) -> bool {
        self.constructors.contains_key(kind)
    }
}

// =========================================================================
// Loading
// =========================================================================

/// Load the children of `def` below `parent`, recursively.
pub(crate) fn load_children(
    tree: &mut WidgetTree,
    parent: WidgetId,
    def: &SkinNode,
    factory: &WidgetFactory,
    cx: &mut ParseContext<'_>,
) {
    for child in &def.children {
        let mut behavior = match factory.create(&child.kind) {
            Some(behavior) => behavior,
            None => {
                cx.set_widget(child.kind.clone());
                cx.warn(format!("unknown widget kind '{}', loading as Panel", child.kind));
                Box::new(Panel::new())
            }
        };
        let label = match child.attributes.get("Name") {
            Some(name) => format!("{} '{name}'", child.kind),
            None => child.kind.clone(),
        };
        cx.set_widget(label);

        let mut node = parse_common(&child.attributes, behavior.interactive(), cx);
        behavior.parse_attributes(&mut node, &child.attributes, cx);
        match tree.insert(parent, node, behavior) {
            Ok(id) => load_children(tree, id, child, factory, cx),
            Err(err) => cx.warn(format!("cannot insert widget: {err}")),
        }
    }
    cx.set_widget(String::new());
}

/// Apply the attributes every node shares.
fn parse_common(attrs: &AttributeSet, interactive: bool, cx: &mut ParseContext<'_>) -> WidgetNode {
    let mut width = cx.int(attrs, "Width", 0);
    let mut height = cx.int(attrs, "Height", 0);
    if width < 0 || height < 0 {
        cx.warn(format!("negative size {width}x{height} clamped to zero"));
        width = width.max(0);
        height = height.max(0);
    }
    let rect = Rect::new(cx.int(attrs, "XPos", 0), cx.int(attrs, "YPos", 0), width, height);

    let pins = Pins {
        left: cx.bool(attrs, "PinLeft", false),
        top: cx.bool(attrs, "PinTop", false),
        right: cx.bool(attrs, "PinRight", false),
        bottom: cx.bool(attrs, "PinBottom", false),
    };
    let mut node = WidgetNode::new(rect)
        .with_pins(pins)
        .with_visible(cx.bool(attrs, "Visible", true))
        .with_enabled(cx.bool(attrs, "Enabled", true))
        .with_no_navigate(cx.bool(attrs, "NoNavigate", false));

    if let Some(name) = attrs.get("Name") {
        node = node.with_name(name);
    }
    if let Some(hint) = attrs.get("Hint") {
        node = node.with_hint(hint);
    }
    if let Some(raw) = attrs.get("Cursor") {
        match CursorIcon::from_str(raw.trim()) {
            Ok(cursor) => node = node.with_cursor(cursor),
            Err(_) => cx.warn(format!("unknown cursor '{raw}'")),
        }
    }

    if interactive || attrs.contains("Command") {
        node = node.with_control(parse_control(attrs, cx));
    }
    let focusable = node.is_control();
    node.with_focusable(cx.bool(attrs, "Focusable", focusable))
}

fn parse_control(attrs: &AttributeSet, cx: &mut ParseContext<'_>) -> ControlState {
    let min = cx.float(attrs, "Min", 0.0);
    let max = cx.float(attrs, "Max", 1.0);
    if min > max {
        cx.warn(format!("Min {min} exceeds Max {max}, swapping"));
    }
    let smoothing = cx.config().smoothing;
    let mut control = ControlState::new(attrs.get("Command").unwrap_or_default())
        .with_range(min, max)
        .with_reflect_param(cx.bool(attrs, "ReflectParam", false))
        .with_persist(cx.bool(attrs, "Persist", false))
        .with_smoothing(cx.float(attrs, "Smoothing", smoothing));
    let default = cx.float(attrs, "Default", control.min());
    control = control.with_default(default);
    if let Some(param) = attrs.get("Param") {
        control = control.with_param(param);
    }
    if let Some(target) = attrs.get("Target") {
        control = control.with_target(target);
    }
    if let Some(type_tag) = attrs.get("Type") {
        control = control.with_type_tag(type_tag);
    }
    control
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(def: &SkinNode, images: &MemoryImageProvider) -> (WidgetTree, Diagnostics) {
        let mut tree = WidgetTree::new(Size::new(200, 200));
        let mut diagnostics = Diagnostics::new();
        let config = SkinConfig::default();
        let mut cx = ParseContext::new(&mut diagnostics, images, &config);
        let root = tree.root();
        load_children(&mut tree, root, def, &WidgetFactory::new(), &mut cx);
        (tree, diagnostics)
    }

    #[test]
    fn test_common_attributes() {
        let def = SkinNode::new("Window").child(
            SkinNode::new("Knob")
                .rect(10, 20, 30, 40)
                .attr("Name", "gain")
                .attr("Command", "Gain")
                .attr("Min", -1)
                .attr("Max", 1)
                .attr("Default", 0.5)
                .attr("PinRight", "yes")
                .attr("Cursor", "pointer"),
        );
        let (tree, diagnostics) = load(&def, &MemoryImageProvider::new());
        assert!(diagnostics.is_empty(), "{:?}", diagnostics.entries());

        let id = tree.find_by_name("gain").unwrap();
        let node = tree.get(id).unwrap();
        assert_eq!(node.rect(), Rect::new(10, 20, 30, 40));
        assert!(node.pins().right);
        assert_eq!(node.cursor(), Some(CursorIcon::Pointer));
        assert!(node.is_focusable());
        let control = node.control().unwrap();
        assert_eq!((control.min(), control.max(), control.value()), (-1.0, 1.0, 0.5));
        assert_eq!(control.command(), "Gain");
    }

    #[test]
    fn test_malformed_values_fall_back_with_warnings() {
        let def = SkinNode::new("Window").child(
            SkinNode::new("Panel")
                .attr("Width", "wide")
                .attr("Height", -5)
                .attr("Visible", "maybe")
                .attr("Color", "#12"),
        );
        let (tree, diagnostics) = load(&def, &MemoryImageProvider::new());
        assert_eq!(diagnostics.warnings().count(), 4);

        let id = tree.get(tree.root()).unwrap().children()[0];
        let node = tree.get(id).unwrap();
        assert_eq!(node.size(), Size::new(0, 0));
        assert!(node.is_visible());
    }

    #[test]
    fn test_unknown_kind_loads_as_panel() {
        let def = SkinNode::new("Window").child(SkinNode::new("Spinner").attr("Name", "s"));
        let (tree, diagnostics) = load(&def, &MemoryImageProvider::new());
        let id = tree.find_by_name("s").unwrap();
        assert_eq!(tree.behavior(id).unwrap().kind(), "Panel");
        assert_eq!(diagnostics.len(), 1);
    }

    #[test]
    fn test_state_images_recover_with_placeholders() {
        let images = MemoryImageProvider::new()
            .with("up.png", ImageBuffer::filled(Size::new(20, 10), Color::GREEN))
            .with("big.png", ImageBuffer::filled(Size::new(40, 40), Color::BLUE));
        let attrs = AttributeSet::new()
            .with("Image", "up.png")
            .with("HoverImage", "big.png")
            .with("PressedImage", "gone.png");

        let mut diagnostics = Diagnostics::new();
        let config = SkinConfig::default();
        let mut cx = ParseContext::new(&mut diagnostics, &images, &config);
        let states = cx.state_images(&attrs, Size::new(20, 10));

        assert_eq!(states.normal.as_ref().unwrap().pixel((0, 0).into()), Some(Color::GREEN));
        let hover = states.hover.as_ref().unwrap();
        assert_eq!(hover.size(), Size::new(20, 10));
        assert_eq!(hover.pixel((5, 5).into()), Some(Color::RED));
        assert_eq!(states.pressed.as_ref().unwrap().pixel((5, 5).into()), Some(Color::RED));
        assert!(states.disabled.is_none());
        assert_eq!(diagnostics.warnings().count(), 2);
    }

    #[test]
    fn test_interactive_kinds_get_control_state() {
        let def = SkinNode::new("Window")
            .child(SkinNode::new("Button").attr("Name", "b"))
            .child(SkinNode::new("Label").attr("Name", "l"))
            .child(SkinNode::new("Label").attr("Name", "bound").attr("Command", "Title"));
        let (tree, _) = load(&def, &MemoryImageProvider::new());

        assert!(tree.get(tree.find_by_name("b").unwrap()).unwrap().is_control());
        assert!(!tree.get(tree.find_by_name("l").unwrap()).unwrap().is_control());
        let bound = tree.get(tree.find_by_name("bound").unwrap()).unwrap();
        assert!(bound.is_control());
    }
}

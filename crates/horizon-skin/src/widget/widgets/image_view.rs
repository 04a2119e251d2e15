//! Static image widget.

use std::sync::Arc;

use horizon_skin_core::Rect;
use horizon_skin_render::ImageBuffer;

use super::draw_at_node;
use crate::skin::{AttributeSet, ParseContext};
use crate::widget::{Drawable, Widget, WidgetNode};

/// Shows one skin image. A missing image is replaced by a placeholder of the
/// widget's size.
#[derive(Debug, Clone, Default)]
pub struct ImageView {
    image: Option<Arc<ImageBuffer>>,
}

impl ImageView {
    /// An image view without an image.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image.
    pub fn with_image(mut self, image: Arc<ImageBuffer>) -> Self {
        self.image = Some(image);
        self
    }

    /// The image shown.
    pub fn image(&self) -> Option<&Arc<ImageBuffer>> {
        self.image.as_ref()
    }
}

impl Widget for ImageView {
    fn kind(&self) -> &'static str {
        "Image"
    }

    fn parse_attributes(&mut self, node: &mut WidgetNode, attrs: &AttributeSet, cx: &mut ParseContext<'_>) {
        if !attrs.contains("Image") {
            return;
        }
        self.image = Some(
            cx.image(attrs, "Image")
                .unwrap_or_else(|| cx.placeholder(node.size())),
        );
    }

    fn as_drawable(&self) -> Option<&dyn Drawable> {
        Some(self)
    }
}

impl Drawable for ImageView {
    fn draw(&self, node: &WidgetNode, target: &mut ImageBuffer, clip: &Rect) {
        if let Some(image) = &self.image {
            draw_at_node(node, image, target, clip);
        }
    }
}

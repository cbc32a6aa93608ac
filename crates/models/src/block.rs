//! Visual page-editor blocks.
//!
//! A block is serialized as
//! `{"id", "type", "content": {...}, "styles": {...}, "order", ...}`.
//! `type` selects the shape of `content`. A typed field only claims its key
//! when the value has the JSON type the field expects. Every other key stays
//! in the owning `extra` map and is written back unchanged, nulls included.
//! Keys next to `id` and `order` that the block does not name are kept in
//! `Block::extra`.

use sea_orm::FromJsonQueryResult;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Arbitrary additional keys carried alongside the typed fields.
pub type Extra = Map<String, Value>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBlock", into = "RawBlock")]
pub struct Block {
    pub id: String,
    pub content: BlockContent,
    pub styles: BlockStyles,
    pub order: i32,
    pub extra: Extra,
}

/// Wire shape of a block. A missing `content` or `styles` reads as `{}`.
#[derive(Serialize, Deserialize)]
struct RawBlock {
    id: String,
    #[serde(rename = "type")]
    kind: BlockType,
    #[serde(default)]
    content: Extra,
    #[serde(default)]
    styles: Extra,
    order: i32,
    #[serde(flatten)]
    extra: Extra,
}

impl From<RawBlock> for Block {
    fn from(raw: RawBlock) -> Self {
        Self {
            id: raw.id,
            content: BlockContent::from_parts(raw.kind, raw.content),
            styles: BlockStyles::from_map(raw.styles),
            order: raw.order,
            extra: raw.extra,
        }
    }
}

impl From<Block> for RawBlock {
    fn from(block: Block) -> Self {
        let (kind, content) = block.content.into_parts();
        Self {
            id: block.id,
            kind,
            content,
            styles: block.styles.into_map(),
            order: block.order,
            extra: block.extra,
        }
    }
}

/// The fixed block type enumeration, used as the `type` tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum BlockType {
    Hero,
    Text,
    Image,
    Button,
    Card,
    Carousel,
    Grid,
    Testimonial,
    Feature,
    Cta,
    Spacer,
}

#[derive(Clone, Debug, PartialEq)]
pub enum BlockContent {
    Hero(HeroContent),
    Text(TextContent),
    Image(ImageContent),
    Button(ButtonContent),
    Card(CardContent),
    Carousel(CollectionContent),
    Grid(CollectionContent),
    Testimonial(TestimonialContent),
    Feature(FeatureContent),
    Cta(HeroContent),
    Spacer(SpacerContent),
}

impl BlockContent {
    fn from_parts(kind: BlockType, map: Extra) -> Self {
        match kind {
            BlockType::Hero => BlockContent::Hero(HeroContent::from_map(map)),
            BlockType::Text => BlockContent::Text(TextContent::from_map(map)),
            BlockType::Image => BlockContent::Image(ImageContent::from_map(map)),
            BlockType::Button => BlockContent::Button(ButtonContent::from_map(map)),
            BlockType::Card => BlockContent::Card(CardContent::from_map(map)),
            BlockType::Carousel => BlockContent::Carousel(CollectionContent::from_map(map)),
            BlockType::Grid => BlockContent::Grid(CollectionContent::from_map(map)),
            BlockType::Testimonial => BlockContent::Testimonial(TestimonialContent::from_map(map)),
            BlockType::Feature => BlockContent::Feature(FeatureContent::from_map(map)),
            BlockType::Cta => BlockContent::Cta(HeroContent::from_map(map)),
            BlockType::Spacer => BlockContent::Spacer(SpacerContent::from_map(map)),
        }
    }

    fn into_parts(self) -> (BlockType, Extra) {
        match self {
            BlockContent::Hero(c) => (BlockType::Hero, c.into_map()),
            BlockContent::Text(c) => (BlockType::Text, c.into_map()),
            BlockContent::Image(c) => (BlockType::Image, c.into_map()),
            BlockContent::Button(c) => (BlockType::Button, c.into_map()),
            BlockContent::Card(c) => (BlockType::Card, c.into_map()),
            BlockContent::Carousel(c) => (BlockType::Carousel, c.into_map()),
            BlockContent::Grid(c) => (BlockType::Grid, c.into_map()),
            BlockContent::Testimonial(c) => (BlockType::Testimonial, c.into_map()),
            BlockContent::Feature(c) => (BlockType::Feature, c.into_map()),
            BlockContent::Cta(c) => (BlockType::Cta, c.into_map()),
            BlockContent::Spacer(c) => (BlockType::Spacer, c.into_map()),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
    Justify,
}

impl TextAlign {
    pub fn as_str(&self) -> &'static str {
        match self {
            TextAlign::Left => "left",
            TextAlign::Center => "center",
            TextAlign::Right => "right",
            TextAlign::Justify => "justify",
        }
    }
}

/// A typed view over one JSON value. `from_value` returns `None` when the
/// value has another shape, which leaves the key in `extra`.
trait Slot: Sized {
    fn from_value(value: &Value) -> Option<Self>;
    fn into_value(self) -> Value;
}

impl Slot for String {
    fn from_value(value: &Value) -> Option<Self> { value.as_str().map(str::to_owned) }
    fn into_value(self) -> Value { Value::String(self) }
}

impl Slot for Vec<Value> {
    fn from_value(value: &Value) -> Option<Self> { value.as_array().cloned() }
    fn into_value(self) -> Value { Value::Array(self) }
}

impl Slot for TextAlign {
    fn from_value(value: &Value) -> Option<Self> {
        match value.as_str()? {
            "left" => Some(TextAlign::Left),
            "center" => Some(TextAlign::Center),
            "right" => Some(TextAlign::Right),
            "justify" => Some(TextAlign::Justify),
            _ => None,
        }
    }
    fn into_value(self) -> Value { Value::String(self.as_str().to_owned()) }
}

fn take<T: Slot>(map: &mut Extra, key: &str) -> Option<T> {
    let typed = map.get(key).and_then(T::from_value)?;
    map.remove(key);
    Some(typed)
}

fn put<T: Slot>(map: &mut Extra, key: &str, value: Option<T>) {
    if let Some(value) = value {
        map.insert(key.to_owned(), value.into_value());
    }
}

macro_rules! payload {
    ($(#[$meta:meta])* $name:ident { $($field:ident: $ty:ty => $key:literal),* $(,)? }) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Default, PartialEq)]
        pub struct $name {
            $(pub $field: Option<$ty>,)*
            pub extra: Extra,
        }

        impl $name {
            fn from_map(mut extra: Extra) -> Self {
                $(let $field = take::<$ty>(&mut extra, $key);)*
                Self { $($field,)* extra }
            }

            fn into_map(self) -> Extra {
                let mut map = self.extra;
                $(put(&mut map, $key, self.$field);)*
                map
            }
        }
    };
}

payload! {
    /// Used by both `hero` and `cta`.
    HeroContent {
        heading: String => "heading",
        subheading: String => "subheading",
        image: String => "image",
        button_text: String => "buttonText",
        button_link: String => "buttonLink",
        button_style: String => "buttonStyle",
    }
}

payload! {
    TextContent {
        heading: String => "heading",
        text: String => "text",
    }
}

payload! {
    ImageContent {
        image: String => "image",
        alt: String => "alt",
        caption: String => "caption",
    }
}

payload! {
    ButtonContent {
        button_text: String => "buttonText",
        button_link: String => "buttonLink",
        button_style: String => "buttonStyle",
    }
}

payload! {
    CardContent {
        heading: String => "heading",
        text: String => "text",
        image: String => "image",
        button_text: String => "buttonText",
        button_link: String => "buttonLink",
        button_style: String => "buttonStyle",
    }
}

payload! {
    /// `carousel` and `grid`: a heading over a list of free-form items.
    CollectionContent {
        heading: String => "heading",
        items: Vec<Value> => "items",
    }
}

payload! {
    TestimonialContent {
        quote: String => "quote",
        author: String => "author",
        role: String => "role",
        image: String => "image",
    }
}

payload! {
    FeatureContent {
        heading: String => "heading",
        text: String => "text",
        icon: String => "icon",
    }
}

payload! {
    SpacerContent {
        height: String => "height",
    }
}

payload! {
    BlockStyles {
        background_color: String => "backgroundColor",
        text_color: String => "textColor",
        padding: String => "padding",
        margin: String => "margin",
        text_align: TextAlign => "textAlign",
        font_size: String => "fontSize",
        font_weight: String => "fontWeight",
        border_radius: String => "borderRadius",
    }
}

/// The ordered block sequence of one page, stored as a single JSONB value.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, FromJsonQueryResult)]
#[serde(transparent)]
pub struct PageBlocks(pub Vec<Block>);

impl From<Vec<Block>> for PageBlocks {
    fn from(blocks: Vec<Block>) -> Self {
        Self(blocks)
    }
}

impl PageBlocks {
    pub fn into_inner(self) -> Vec<Block> {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn round_trip(raw: &Value) -> Value {
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        serde_json::to_value(&block).unwrap()
    }

    #[test]
    fn hero_block_parses_typed_fields() {
        let raw = json!({
            "id": "b1",
            "type": "hero",
            "content": {"heading": "Welcome", "buttonText": "Order now", "buttonLink": "/menu"},
            "styles": {"textAlign": "center", "backgroundColor": "#fff"},
            "order": 0
        });
        let block: Block = serde_json::from_value(raw).unwrap();
        match &block.content {
            BlockContent::Hero(hero) => {
                assert_eq!(hero.heading.as_deref(), Some("Welcome"));
                assert_eq!(hero.button_link.as_deref(), Some("/menu"));
                assert!(hero.extra.is_empty());
            }
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(block.styles.text_align, Some(TextAlign::Center));
        assert!(block.extra.is_empty());
    }

    #[test]
    fn unknown_keys_survive_in_extra() {
        let raw = json!({
            "id": "t1",
            "type": "text",
            "content": {"text": "Fresh daily", "badge": {"label": "new"}},
            "styles": {"fontSize": "18px", "letterSpacing": "0.1em"},
            "order": 3
        });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        match &block.content {
            BlockContent::Text(text) => assert_eq!(text.extra["badge"], json!({"label": "new"})),
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(block.styles.extra["letterSpacing"], json!("0.1em"));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn top_level_keys_are_kept() {
        let raw = json!({
            "id": "b1", "type": "text", "content": {}, "styles": {}, "order": 0,
            "locked": true, "meta": {"author": "sam"}
        });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(block.extra["locked"], json!(true));
        assert_eq!(round_trip(&raw), raw);
    }

    #[test]
    fn explicit_nulls_are_kept() {
        let raw = json!({
            "id": "h", "type": "hero",
            "content": {"heading": null, "subheading": "x"},
            "styles": {"padding": null},
            "order": 0
        });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        match &block.content {
            BlockContent::Hero(hero) => {
                assert_eq!(hero.heading, None);
                assert_eq!(hero.extra["heading"], Value::Null);
            }
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(round_trip(&raw), raw);
    }

    #[test]
    fn off_type_values_are_kept_untyped() {
        let raw = json!({
            "id": "s", "type": "spacer",
            "content": {"height": 40},
            "styles": {"padding": 16, "fontSize": 18, "textAlign": "start", "margin": "0 auto"},
            "order": 2
        });
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(block.styles.padding, None);
        assert_eq!(block.styles.text_align, None);
        assert_eq!(block.styles.margin.as_deref(), Some("0 auto"));
        assert_eq!(block.styles.extra["fontSize"], json!(18));
        match &block.content {
            BlockContent::Spacer(spacer) => assert_eq!(spacer.extra["height"], json!(40)),
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(round_trip(&raw), raw);
    }

    #[test]
    fn missing_content_and_styles_read_as_empty() {
        let raw = json!({"id": "s1", "type": "spacer", "order": 1});
        let block: Block = serde_json::from_value(raw).unwrap();
        assert_eq!(block.content, BlockContent::Spacer(SpacerContent::default()));
        assert_eq!(block.styles, BlockStyles::default());
        let out = serde_json::to_value(&block).unwrap();
        assert_eq!(out["content"], json!({}));
        assert_eq!(out["styles"], json!({}));
    }

    #[test]
    fn unknown_type_is_rejected() {
        let raw = json!({"id": "x", "type": "video", "content": {}, "styles": {}, "order": 0});
        assert!(serde_json::from_value::<Block>(raw).is_err());
    }

    #[test]
    fn cta_and_hero_share_shape_but_keep_their_tag() {
        let raw = json!({"id": "c", "type": "cta", "content": {"heading": "Hungry?"}, "styles": {}, "order": 9});
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        assert!(matches!(block.content, BlockContent::Cta(_)));
        assert_eq!(serde_json::to_value(&block).unwrap(), raw);
    }

    #[test]
    fn grid_items_stay_typed() {
        let raw = json!({"id": "g", "type": "grid", "content": {"items": [{"title": "Poke"}, 3]}, "styles": {}, "order": 4});
        let block: Block = serde_json::from_value(raw.clone()).unwrap();
        match &block.content {
            BlockContent::Grid(grid) => assert_eq!(grid.items.as_ref().map(Vec::len), Some(2)),
            other => panic!("unexpected content {other:?}"),
        }
        assert_eq!(round_trip(&raw), raw);
    }
}

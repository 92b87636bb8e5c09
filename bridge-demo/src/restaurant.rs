//! The restaurant page the demo runs against.

use access_bridge::{ImageBlock, ImageContext, PageBlock};

pub fn text_blocks() -> Vec<PageBlock> {
    vec![
        PageBlock::new("brand", "David Chu's China Bistro"),
        PageBlock::new(
            "about",
            "David Chu's China Bistro offers authentic Chinese cuisine in a kosher certified restaurant \
             environment. Our establishment has been serving the Baltimore community with traditional recipes \
             passed down through generations.",
        ),
        PageBlock::new(
            "team",
            "Our culinary team specializes in traditional Chinese cooking techniques combined with contemporary \
             presentation styles to create an exceptional dining experience for our valued customers.",
        ),
        PageBlock::new(
            "delivery",
            "We provide comprehensive delivery services within a 3-4 mile radius of our establishment, with a \
             minimum order requirement of $20 plus a $3 delivery charge for all orders.",
        ),
        PageBlock::new(
            "events",
            "Private dining rooms are available for celebrations of every size. Call ahead to book a room.",
        ),
        PageBlock::new("hours", "Hours: Sun-Thurs 11:15am-10pm, Fri 11:15am-2:30pm, Saturday closed"),
        PageBlock::new("address", "Address: 7001 Reisterstown Rd, Baltimore, MD"),
        PageBlock::new("review-1", "The best Chinese restaurant I've been to!"),
        PageBlock::new("review-2", "Amazing food! Great service!"),
    ]
}

pub fn images() -> Vec<ImageBlock> {
    let image = |id: &str, src: &str, caption: Option<&str>| ImageBlock {
        id: id.to_string(),
        context: ImageContext {
            src: Some(src.to_string()),
            caption: caption.map(str::to_string),
            ..ImageContext::default()
        },
    };

    vec![
        image("img-certification", "/images/star-k-logo.png", None),
        image("img-brand", "/images/bistro-logo.png", None),
        image("img-special", "/images/IMG_2041.jpg", Some("General Tso's food special")),
        image("img-dining", "/images/interior-01.jpg", None),
    ]
}

/// Paragraph texts, in page order
pub fn paragraphs() -> Vec<String> {
    text_blocks().into_iter().map(|block| block.text).collect()
}

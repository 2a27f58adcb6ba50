//! Slide-deck model (the PPTX-style consumer).

use railvision_types::Token;
use serde::Serialize;

use crate::document::{DocBlock, build_document};

/// A heading of this level or shallower opens a new slide.
const SLIDE_SPLIT_LEVEL: u8 = 2;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Slide {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub body: Vec<DocBlock>,
}

/// Sections tokens into slides: level 1/2 headings become slide titles,
/// everything else accumulates on the current slide. Content before the
/// first heading lands on an untitled slide.
pub fn build_deck(tokens: &[Token]) -> Vec<Slide> {
    let mut slides: Vec<Slide> = Vec::new();

    for token in tokens {
        match token {
            Token::Heading { level, text } if *level <= SLIDE_SPLIT_LEVEL => {
                slides.push(Slide {
                    title: Some(text.clone()),
                    body: Vec::new(),
                });
            }
            other => {
                if slides.is_empty() {
                    slides.push(Slide::default());
                }
                let body = build_document(std::slice::from_ref(other));
                slides
                    .last_mut()
                    .expect("slide pushed above")
                    .body
                    .extend(body);
            }
        }
    }

    slides
}

// src/utils/html.rs

use std::collections::HashSet;

use crate::models::flashcard::Flashcard;

/// Reduces text that may contain markup to plain text.
///
/// Every tag is removed (ammonia with an empty whitelist), `<script>` and
/// `<style>` lose their contents too, and the entities ammonia writes back
/// are decoded. The result is meant to be inserted as text, never as HTML.
pub fn strip_markup(input: &str) -> String {
    let mut builder = ammonia::Builder::default();
    builder.tags(HashSet::new());
    let cleaned = builder.clean(input).to_string();
    html_escape::decode_html_entities(&cleaned).into_owned()
}

/// Strips markup from both sides of every card. Cards that end up blank are dropped.
pub fn sanitize_cards(cards: Vec<Flashcard>) -> Vec<Flashcard> {
    cards
        .into_iter()
        .filter_map(|card| {
            Flashcard::from_parts(&strip_markup(&card.question), &strip_markup(&card.answer))
        })
        .collect()
}

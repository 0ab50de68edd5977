use std::fmt;

use serde::Serialize;

/// Class tag carried by every element the auto-scaler should resize
pub const SCALABLE_CLASS: &str = "dateentry";

/// Default font size of a freshly laid out element, in px
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

// Average glyph advance of a proportional font, in ems
const AVERAGE_ADVANCE_EM: f64 = 0.55;

/// The three display slots written by the clock
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotId {
    Day,
    Date,
    Time,
}

impl SlotId {
    pub const ALL: [SlotId; 3] = [SlotId::Day, SlotId::Date, SlotId::Time];

    /// Identifier of the page element backing this slot
    pub fn element_id(&self) -> &'static str {
        match self {
            SlotId::Day => "day",
            SlotId::Date => "date",
            SlotId::Time => "time",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageError {
    MissingSlot(String),
    UnknownElement(String),
}

impl fmt::Display for PageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageError::MissingSlot(id) => write!(f, "display slot '{}' is not on the page", id),
            PageError::UnknownElement(id) => write!(f, "no element with id '{}'", id),
        }
    }
}

impl std::error::Error for PageError {}

/// Anything that can receive the formatted clock strings
pub trait DisplaySlots {
    fn write_slot(&mut self, slot: SlotId, text: &str) -> Result<(), PageError>;
}

/// An element whose font size can be rewritten from its rendered width
pub trait ScalableElement {
    /// Current rendered width in px
    fn rendered_width(&self) -> f64;
    /// Current font size in px
    fn font_size(&self) -> f64;
    fn set_font_size(&mut self, px: f64);
}

/// A single text element of the page.
///
/// Width is modelled as `em_width * font_size`, so it follows the font size
/// linearly the way rendered text does.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub id: String,
    pub classes: Vec<String>,
    text: String,
    font_size: f64,
    em_width: f64,
}

impl TextElement {
    pub fn new(id: impl Into<String>, text: impl Into<String>, font_size: f64) -> Self {
        let text = text.into();
        let em_width = estimate_em_width(&text);
        Self {
            id: id.into(),
            classes: Vec::new(),
            text,
            font_size,
            em_width,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Override the estimated 1px advance, e.g. with a value measured by a browser
    #[cfg(test)]
    pub fn with_em_width(mut self, em_width: f64) -> Self {
        self.em_width = em_width;
        self
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    #[cfg(test)]
    pub fn em_width(&self) -> f64 {
        self.em_width
    }

    pub fn set_text(&mut self, text: &str) {
        if self.text != text {
            self.text = text.to_string();
            self.em_width = estimate_em_width(text);
        }
    }
}

impl ScalableElement for TextElement {
    fn rendered_width(&self) -> f64 {
        self.em_width * self.font_size
    }

    fn font_size(&self) -> f64 {
        self.font_size
    }

    fn set_font_size(&mut self, px: f64) {
        self.font_size = px;
    }
}

fn estimate_em_width(text: &str) -> f64 {
    text.chars().count() as f64 * AVERAGE_ADVANCE_EM
}

/// In-memory model of the home page element tree
#[derive(Debug, Clone, Default)]
pub struct Page {
    elements: Vec<TextElement>,
}

impl Page {
    pub fn new() -> Self {
        Self::default()
    }

    /// The home page layout: day, date and time slots, all auto-scaled
    pub fn home() -> Self {
        let mut page = Self::new();
        for slot in SlotId::ALL {
            page.push(
                TextElement::new(slot.element_id(), "", DEFAULT_FONT_SIZE).with_class(SCALABLE_CLASS),
            );
        }
        page
    }

    pub fn push(&mut self, element: TextElement) {
        self.elements.push(element);
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn element(&self, id: &str) -> Option<&TextElement> {
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn element_mut(&mut self, id: &str) -> Option<&mut TextElement> {
        self.elements.iter_mut().find(|e| e.id == id)
    }

    pub fn remove(&mut self, id: &str) -> Result<TextElement, PageError> {
        let index = self
            .elements
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| PageError::UnknownElement(id.to_string()))?;
        Ok(self.elements.remove(index))
    }

    pub fn elements_with_class<'a>(&'a self, class: &'a str) -> impl Iterator<Item = &'a TextElement> + 'a {
        self.elements.iter().filter(move |e| e.has_class(class))
    }

    /// Every element tagged with `class`, collected up front in page order
    pub fn elements_with_class_mut(&mut self, class: &str) -> Vec<&mut TextElement> {
        self.elements.iter_mut().filter(|e| e.has_class(class)).collect()
    }

    pub fn slot_text(&self, slot: SlotId) -> Option<&str> {
        self.element(slot.element_id()).map(|e| e.text())
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            day: self.slot_text(SlotId::Day).map(str::to_string),
            date: self.slot_text(SlotId::Date).map(str::to_string),
            time: self.slot_text(SlotId::Time).map(str::to_string),
            elements: self
                .elements
                .iter()
                .map(|e| ElementSnapshot {
                    id: e.id.clone(),
                    text: e.text.clone(),
                    font_size: e.font_size,
                    rendered_width: e.rendered_width(),
                })
                .collect(),
        }
    }
}

impl DisplaySlots for Page {
    fn write_slot(&mut self, slot: SlotId, text: &str) -> Result<(), PageError> {
        let id = slot.element_id();
        let element = self
            .element_mut(id)
            .ok_or_else(|| PageError::MissingSlot(id.to_string()))?;
        element.set_text(text);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementSnapshot {
    pub id: String,
    pub text: String,
    pub font_size: f64,
    pub rendered_width: f64,
}

/// Serializable view of the page, as served to the browser
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageSnapshot {
    pub day: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub elements: Vec<ElementSnapshot>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_home_layout() {
        let page = Page::home();
        assert_eq!(page.len(), 3);
        for slot in SlotId::ALL {
            let element = page.element(slot.element_id()).unwrap();
            assert!(element.has_class(SCALABLE_CLASS));
            assert_abs_diff_eq!(element.font_size(), DEFAULT_FONT_SIZE);
        }
    }

    #[test]
    fn test_write_slot_updates_text_and_width() {
        let mut page = Page::home();
        page.write_slot(SlotId::Day, "Tuesday").unwrap();

        let day = page.element("day").unwrap();
        assert_eq!(day.text(), "Tuesday");
        assert_abs_diff_eq!(day.rendered_width(), 7.0 * AVERAGE_ADVANCE_EM * DEFAULT_FONT_SIZE);
        assert_eq!(page.slot_text(SlotId::Day), Some("Tuesday"));
    }

    #[test]
    fn test_write_missing_slot() {
        let mut page = Page::home();
        page.remove("time").unwrap();

        let err = page.write_slot(SlotId::Time, "12:00").unwrap_err();
        assert_eq!(err, PageError::MissingSlot("time".to_string()));
        assert_eq!(err.to_string(), "display slot 'time' is not on the page");
    }

    #[test]
    fn test_remove_unknown_element() {
        let mut page = Page::new();
        assert_eq!(
            page.remove("nope").unwrap_err(),
            PageError::UnknownElement("nope".to_string())
        );
    }

    #[test]
    fn test_rendered_width_follows_font_size() {
        let mut element = TextElement::new("x", "abcd", 10.0).with_em_width(2.0);
        assert_abs_diff_eq!(element.rendered_width(), 20.0);
        element.set_font_size(25.0);
        assert_abs_diff_eq!(element.rendered_width(), 50.0);
    }

    #[test]
    fn test_set_same_text_keeps_measured_width() {
        let mut element = TextElement::new("x", "abcd", 10.0).with_em_width(2.0);
        element.set_text("abcd");
        assert_abs_diff_eq!(element.em_width(), 2.0);
        element.set_text("abcde");
        assert_abs_diff_eq!(element.em_width(), 5.0 * AVERAGE_ADVANCE_EM);
    }

    #[test]
    fn test_elements_with_class_is_bounded_and_ordered() {
        let mut page = Page::home();
        page.push(TextElement::new("footer", "hello", 12.0));
        page.push(TextElement::new("extra", "more", 12.0).with_class(SCALABLE_CLASS));

        let ids: Vec<&str> = page
            .elements_with_class(SCALABLE_CLASS)
            .map(|e| e.id.as_str())
            .collect();
        assert_eq!(ids, vec!["day", "date", "time", "extra"]);
        assert_eq!(page.elements_with_class_mut(SCALABLE_CLASS).len(), 4);
        assert!(page.elements_with_class_mut("missing").is_empty());
    }

    #[test]
    fn test_snapshot() {
        let mut page = Page::home();
        page.write_slot(SlotId::Date, "2nd April").unwrap();
        page.remove("time").unwrap();

        let snapshot = page.snapshot();
        assert_eq!(snapshot.day.as_deref(), Some(""));
        assert_eq!(snapshot.date.as_deref(), Some("2nd April"));
        assert_eq!(snapshot.time, None);
        assert_eq!(snapshot.elements.len(), 2);
        assert_eq!(snapshot.elements[1].id, "date");
    }
}

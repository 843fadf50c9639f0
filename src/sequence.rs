use crate::error::DataError;
use crate::render::{build_symbols, update_symbols, SymbolScaling};
use crate::types::{Place, RenderFrame, SymbolLayer};
use serde::Deserialize;

/// Everything the UI layer is allowed to say to the sequencer: a direction
/// or an absolute slider index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceEvent {
    StepForward,
    StepBackward,
    SetIndex(usize),
}

/// Receiver for the observable side effects of a cursor transition. Called
/// exactly once each per transition: indicator first, then one full render.
pub trait SymbolSink {
    /// Mirror of the slider position.
    fn set_indicator(&mut self, index: usize);
    /// One full symbol pass for the new cursor.
    fn render(&mut self, frame: &RenderFrame);
}

/// Sink for call sites that only need the state change.
pub struct NullSink;

impl SymbolSink for NullSink {
    fn set_indicator(&mut self, _index: usize) {}
    fn render(&mut self, _frame: &RenderFrame) {}
}

/// Owns the current-year cursor and every rendered symbol.
///
/// The sequencer is the single writer of the cursor. The UI layer never
/// moves it directly; it emits `SequenceEvent`s and mirrors whatever comes
/// back through its sink.
pub struct Sequencer {
    attributes: Vec<String>,
    cursor: usize,
    places: Vec<Place>,
    scaling: SymbolScaling,
    value_label: String,
    symbols: Vec<SymbolLayer>,
}

impl Sequencer {
    /// Builds the symbol set for the earliest attribute (cursor index 0).
    /// Refuses an empty attribute list so no symbols or controls ever exist
    /// for a dataset without years.
    pub fn new(
        places: Vec<Place>,
        attributes: Vec<String>,
        scaling: SymbolScaling,
        value_label: impl Into<String>,
    ) -> Result<Self, DataError> {
        if attributes.is_empty() {
            return Err(DataError::NoYearAttributes);
        }
        let value_label = value_label.into();
        let symbols = build_symbols(&places, &attributes[0], &scaling, &value_label);
        Ok(Self {
            attributes,
            cursor: 0,
            places,
            scaling,
            value_label,
            symbols,
        })
    }

    pub fn attributes(&self) -> &[String] {
        &self.attributes
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn current_attribute(&self) -> &str {
        &self.attributes[self.cursor]
    }

    pub fn symbols(&self) -> &[SymbolLayer] {
        &self.symbols
    }

    pub fn scaling(&self) -> &SymbolScaling {
        &self.scaling
    }

    /// Applies one UI event: move the cursor (wrapping on steps, clamping on
    /// slider input), then exactly one indicator update and one render pass.
    pub fn apply(&mut self, event: SequenceEvent, sink: &mut dyn SymbolSink) {
        let len = self.attributes.len();
        self.cursor = match event {
            SequenceEvent::StepForward => (self.cursor + 1) % len,
            SequenceEvent::StepBackward => (self.cursor + len - 1) % len,
            SequenceEvent::SetIndex(index) => index.min(len - 1),
        };

        let attribute = self.attributes[self.cursor].clone();
        update_symbols(
            &mut self.symbols,
            &self.places,
            &attribute,
            &self.scaling,
            &self.value_label,
        );

        sink.set_indicator(self.cursor);
        sink.render(&self.frame());
    }

    /// Popup open/close notification from the map layer, so content updates
    /// while a popup is open stay observable.
    pub fn set_popup_open(&mut self, name: &str, open: bool) -> bool {
        match self.symbols.iter_mut().find(|s| s.name == name) {
            Some(symbol) => {
                symbol.popup_open = open;
                true
            }
            None => false,
        }
    }

    pub fn frame(&self) -> RenderFrame {
        RenderFrame {
            index: self.cursor,
            attribute: self.attributes[self.cursor].clone(),
            symbols: self.symbols.clone(),
        }
    }
}

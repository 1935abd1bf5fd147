//! Shared test fixtures: a small integrated grid with an event collector
//! wired in.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use ledgergrid_config::{CheckboxPolicy, Settings};
use ledgergrid_core::GridPos;

use crate::events::EventCollector;
use crate::exchange::ExchangeEngine;
use crate::grid::{Grid, RowRecord, SequenceRowNumbers};
use crate::schema::FieldSchema;
use crate::select::SelectionEngine;
use crate::separate::SeparationEngine;

/// A grid plus one of each engine and a captured event stream.
pub struct GridHarness {
    pub grid: Grid,
    pub select: SelectionEngine,
    pub exchange: ExchangeEngine,
    pub separate: SeparationEngine,
    pub events: Rc<RefCell<EventCollector>>,
}

impl GridHarness {
    /// Three rows over the integrated schema:
    /// 1. fully joined (SEAT + PC + EXT + USER)
    /// 2. PC + SEAT only
    /// 3. SEAT + USER only (no PC, no EXT)
    pub fn standard() -> Self {
        let mut h = Self::empty();
        h.grid.render(&standard_records()).expect("fixture rows render");
        h.events.borrow_mut().clear();
        h
    }

    /// An empty grid over the integrated schema.
    pub fn empty() -> Self {
        Self::with_settings(Settings::default())
    }

    /// The standard fixture rendered under a specific checkbox policy.
    pub fn with_policy(policy: CheckboxPolicy) -> Self {
        let mut settings = Settings::default();
        settings.checkbox_policy = policy;
        let mut h = Self::with_settings(settings);
        h.grid.render(&standard_records()).expect("fixture rows render");
        h.events.borrow_mut().clear();
        h
    }

    fn with_settings(settings: Settings) -> Self {
        let schema = Arc::new(FieldSchema::integrated());
        let mut grid = Grid::new(schema, settings, Box::new(SequenceRowNumbers::new()));
        let events = Rc::new(RefCell::new(EventCollector::new()));
        let sink = Rc::clone(&events);
        grid.set_event_callback(Box::new(move |e| sink.borrow_mut().push(e)));
        Self {
            grid,
            select: SelectionEngine::new(),
            exchange: ExchangeEngine::new(),
            separate: SeparationEngine::new(),
            events,
        }
    }

    /// Column index of a field code.
    pub fn col(&self, field_code: &str) -> usize {
        self.grid
            .schema()
            .col_of(field_code)
            .unwrap_or_else(|| panic!("unknown field {field_code}"))
    }

    pub fn pos(&self, row: usize, field_code: &str) -> GridPos {
        GridPos::new(row, self.col(field_code))
    }
}

fn standard_records() -> Vec<RowRecord> {
    vec![
        record(
            "SEAT:A-101|PC:PC-001|EXT:2001|USER:u042",
            &[
                ("seat_record_id", "11"),
                ("seat_number", "A-101"),
                ("seat_floor", "1F"),
                ("pc_record_id", "101"),
                ("pc_number", "PC-001"),
                ("pc_usage", "business"),
                ("pc_model", "ThinkPad X1"),
                ("ext_record_id", "21"),
                ("ext_number", "2001"),
                ("ext_type", "direct"),
                ("user_record_id", "31"),
                ("user_id", "u042"),
                ("user_name", "Sato"),
                ("department", "Sales"),
            ],
        ),
        record(
            "PC:PC-002|SEAT:B-201",
            &[
                ("seat_record_id", "12"),
                ("seat_number", "B-201"),
                ("seat_floor", "2F"),
                ("pc_record_id", "102"),
                ("pc_number", "PC-002"),
                ("pc_usage", "dev"),
            ],
        ),
        record(
            "SEAT:C-301|USER:u100",
            &[
                ("seat_record_id", "13"),
                ("seat_number", "C-301"),
                ("seat_floor", "3F"),
                ("user_record_id", "33"),
                ("user_id", "u100"),
                ("user_name", "Tanaka"),
                ("department", "IT"),
            ],
        ),
    ]
}

fn record(integration_key: &str, values: &[(&str, &str)]) -> RowRecord {
    RowRecord {
        integration_key: integration_key.to_string(),
        values: values
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect(),
    }
}

/// A minimal PC + SEAT record.
pub fn pc_seat_record(pc: &str, seat: &str) -> RowRecord {
    let mut values = HashMap::new();
    values.insert("pc_number".to_string(), pc.to_string());
    values.insert("seat_number".to_string(), seat.to_string());
    RowRecord {
        integration_key: format!("PC:{pc}|SEAT:{seat}"),
        values,
    }
}

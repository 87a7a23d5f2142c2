//! Sortable server table state

use vpngate_core::{
    traffic_to_string, uptime_to_string, Direction, EndpointRecord, SortKey, SortOrder,
};

/// Number of columns shown for every row
pub const COLUMN_COUNT: usize = 8;

/// One column of the server table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Column {
    Sortable(SortKey),
    /// Shown but not sortable
    Ip,
}

impl Column {
    /// Columns in display order
    pub const ALL: [Column; COLUMN_COUNT] = [
        Column::Sortable(SortKey::Country),
        Column::Ip,
        Column::Sortable(SortKey::Ping),
        Column::Sortable(SortKey::Speed),
        Column::Sortable(SortKey::Score),
        Column::Sortable(SortKey::Uptime),
        Column::Sortable(SortKey::TotalUsers),
        Column::Sortable(SortKey::TotalTraffic),
    ];

    pub fn label(self) -> &'static str {
        match self {
            Column::Sortable(key) => key.label(),
            Column::Ip => "IP",
        }
    }
}

/// Display-ready cells of one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerRow {
    pub country: String,
    pub ip: String,
    pub ping: String,
    pub speed: String,
    pub score: String,
    pub uptime: String,
    pub total_users: String,
    pub total_traffic: String,
}

impl ServerRow {
    pub fn from_record(record: &EndpointRecord) -> Self {
        Self {
            country: record.country_short.to_uppercase(),
            ip: record.ip.clone(),
            ping: record.ping.clone(),
            speed: record.speed.to_string(),
            score: record.score.to_string(),
            uptime: uptime_to_string(record.uptime),
            total_users: record.total_users.to_string(),
            total_traffic: traffic_to_string(record.total_traffic),
        }
    }

    /// Cells in [`Column::ALL`] order
    pub fn cells(&self) -> [&str; COLUMN_COUNT] {
        [
            &self.country,
            &self.ip,
            &self.ping,
            &self.speed,
            &self.score,
            &self.uptime,
            &self.total_users,
            &self.total_traffic,
        ]
    }
}

/// Endpoint collection plus the active ordering and cursor
#[derive(Debug, Clone, Default)]
pub struct SortableTable {
    records: Vec<EndpointRecord>,
    order: SortOrder,
    selected: Option<usize>,
}

impl SortableTable {
    /// Take ownership of the collection and sort it by the default order
    pub fn new(records: Vec<EndpointRecord>) -> Self {
        let selected = if records.is_empty() { None } else { Some(0) };
        let mut table = Self {
            records,
            order: SortOrder::default(),
            selected,
        };
        table.sort();
        table
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in display order
    pub fn records(&self) -> &[EndpointRecord] {
        &self.records
    }

    /// Flip the direction if `key` is already active, otherwise switch to
    /// `key` descending. Re-sorts immediately.
    pub fn toggle_sort(&mut self, key: SortKey) {
        self.order = if self.order.key == key {
            SortOrder {
                key,
                direction: self.order.direction.flipped(),
            }
        } else {
            SortOrder {
                key,
                direction: Direction::Descending,
            }
        };
        self.sort();
    }

    fn sort(&mut self) {
        let order = self.order;
        // sort_by is stable
        self.records.sort_by(|a, b| order.compare(a, b));
    }

    /// Pre-formatted rows in display order
    pub fn rows(&self) -> Vec<ServerRow> {
        self.records.iter().map(ServerRow::from_record).collect()
    }

    /// Column labels, with the direction glyph on the active column
    pub fn headers(&self) -> Vec<String> {
        Column::ALL
            .iter()
            .map(|column| match column {
                Column::Sortable(key) if *key == self.order.key => {
                    format!("{}{}", key.label(), self.order.direction.glyph())
                }
                _ => column.label().to_string(),
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────
    // Cursor
    // ─────────────────────────────────────────────────────────

    pub fn selected_index(&self) -> Option<usize> {
        self.selected
    }

    /// Record under the cursor
    pub fn selected(&self) -> Option<&EndpointRecord> {
        self.selected.and_then(|i| self.records.get(i))
    }

    fn move_to(&mut self, index: isize) {
        if self.records.is_empty() {
            self.selected = None;
            return;
        }
        let last = self.records.len() as isize - 1;
        self.selected = Some(index.clamp(0, last) as usize);
    }

    fn offset(&mut self, delta: isize) {
        let current = self.selected.unwrap_or(0) as isize;
        self.move_to(current.saturating_add(delta));
    }

    pub fn select_next(&mut self) {
        self.offset(1);
    }

    pub fn select_previous(&mut self) {
        self.offset(-1);
    }

    pub fn select_first(&mut self) {
        self.move_to(0);
    }

    pub fn select_last(&mut self) {
        self.move_to(isize::MAX);
    }

    pub fn page_down(&mut self, rows: usize) {
        self.offset(rows.max(1) as isize);
    }

    pub fn page_up(&mut self, rows: usize) {
        self.offset(-(rows.max(1) as isize));
    }
}

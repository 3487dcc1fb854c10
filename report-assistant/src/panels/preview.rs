// Step 3: data preview and row selection
//
// The underlying rows are only mutated by inclusion toggles. Sorting reorders a permutation of
// row indices; search and pagination are re-derived from it on every read, so clearing a search
// never loses data and a new sort breaks ties by the previous one.

use crate::models::draft::PreviewValue;
use crate::models::records::DataRow;
use crate::utils::validation::FieldErrors;
use std::cmp::Ordering;

pub const PAGE_SIZE: usize = 10;
pub const FIELD_ROWS: &str = "rows";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Timestamp,
    Machine,
    Parameter,
    Value,
    Unit,
}

impl SortKey {
    pub const ALL: [SortKey; 5] = [
        SortKey::Timestamp,
        SortKey::Machine,
        SortKey::Parameter,
        SortKey::Value,
        SortKey::Unit,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::Timestamp => "Timestamp",
            SortKey::Machine => "Machine",
            SortKey::Parameter => "Parameter",
            SortKey::Value => "Value",
            SortKey::Unit => "Unit",
        }
    }

    fn compare(&self, a: &DataRow, b: &DataRow) -> Ordering {
        match self {
            SortKey::Timestamp => a.timestamp.cmp(&b.timestamp),
            SortKey::Machine => a.machine.cmp(&b.machine),
            SortKey::Parameter => a.parameter.cmp(&b.parameter),
            SortKey::Value => a.value.total_cmp(&b.value),
            SortKey::Unit => a.unit.cmp(&b.unit),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PreviewTable {
    rows: Vec<DataRow>,
    /// Indices into `rows` in current sort order.
    order: Vec<usize>,
    search: String,
    sort: Option<SortSpec>,
    /// 1-based.
    page: usize,
}

impl PreviewTable {
    pub fn new(rows: Vec<DataRow>) -> Self {
        Self {
            order: (0..rows.len()).collect(),
            rows,
            search: String::new(),
            sort: None,
            page: 1,
        }
    }

    /// The full, unfiltered dataset in its original order.
    pub fn rows(&self) -> &[DataRow] {
        &self.rows
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    /// New search term; pagination restarts at page 1.
    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.search {
            self.search = term;
            self.page = 1;
        }
    }

    pub fn sort(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Header click semantics: first request on a column sorts ascending, a second request on
    /// an ascending column flips it to descending, anything else starts ascending again.
    pub fn request_sort(&mut self, key: SortKey) {
        let direction = match self.sort {
            Some(SortSpec {
                key: current,
                direction: SortDirection::Ascending,
            }) if current == key => SortDirection::Descending,
            _ => SortDirection::Ascending,
        };
        self.set_sort(SortSpec { key, direction });
    }

    /// Stable sort of the current order, so equal keys keep their prior relative order.
    pub fn set_sort(&mut self, spec: SortSpec) {
        let rows = &self.rows;
        self.order.sort_by(|&a, &b| match spec.direction {
            SortDirection::Ascending => spec.key.compare(&rows[a], &rows[b]),
            SortDirection::Descending => spec.key.compare(&rows[b], &rows[a]),
        });
        self.sort = Some(spec);
        self.clamp_page();
    }

    fn matches(&self, row: &DataRow, needle: &str) -> bool {
        [
            row.timestamp_display(),
            row.machine.clone(),
            row.parameter.clone(),
            row.value_display(),
            row.unit.clone(),
        ]
        .iter()
        .any(|cell| cell.to_lowercase().contains(needle))
    }

    /// Rows matching the search, in current sort order.
    pub fn visible_rows(&self) -> Vec<&DataRow> {
        let needle = self.search.trim().to_lowercase();
        self.order
            .iter()
            .map(|&i| &self.rows[i])
            .filter(|row| needle.is_empty() || self.matches(row, &needle))
            .collect()
    }

    pub fn total_pages(&self) -> usize {
        self.visible_rows().len().div_ceil(PAGE_SIZE)
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_rows(&self) -> Vec<&DataRow> {
        self.visible_rows()
            .into_iter()
            .skip((self.page - 1) * PAGE_SIZE)
            .take(PAGE_SIZE)
            .collect()
    }

    pub fn next_page(&mut self) {
        if self.page < self.total_pages() {
            self.page += 1;
        }
    }

    pub fn prev_page(&mut self) {
        if self.page > 1 {
            self.page -= 1;
        }
    }

    fn clamp_page(&mut self) {
        self.page = self.page.clamp(1, self.total_pages().max(1));
    }

    /// Flip one row's inclusion. Returns the new state, or `None` for an unknown id.
    pub fn toggle_row(&mut self, id: &str) -> Option<bool> {
        let row = self.rows.iter_mut().find(|r| r.id == id)?;
        row.included = !row.included;
        Some(row.included)
    }

    /// Include or exclude every row of the dataset (not just the visible ones).
    pub fn select_all(&mut self, included: bool) {
        for row in &mut self.rows {
            row.included = included;
        }
    }

    /// Checked state of the "select all" box: every row of the unfiltered dataset included.
    pub fn all_selected(&self) -> bool {
        self.rows.iter().all(|r| r.included)
    }

    /// Aggregate checked state of the current page only.
    pub fn page_all_selected(&self) -> bool {
        self.page_rows().iter().all(|r| r.included)
    }

    pub fn included_ids(&self) -> Vec<String> {
        self.rows
            .iter()
            .filter(|r| r.included)
            .map(|r| r.id.clone())
            .collect()
    }

    pub fn validate(&self) -> Result<PreviewValue, FieldErrors> {
        let selected_row_ids = self.included_ids();
        if selected_row_ids.is_empty() {
            return Err(FieldErrors::single(
                FIELD_ROWS,
                "Select at least one row to include in the report.",
            ));
        }
        Ok(PreviewValue { selected_row_ids })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn row(i: usize, machine: &str, value: f64, unit: &str) -> DataRow {
        DataRow {
            id: format!("data-{}", i),
            timestamp: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + Duration::minutes(i as i64),
            machine: machine.to_string(),
            parameter: format!("Param {}", (b'A' + (i % 5) as u8) as char),
            value,
            unit: unit.to_string(),
            included: true,
        }
    }

    fn fixture(n: usize) -> Vec<DataRow> {
        (0..n)
            .map(|i| {
                let machine = format!("MACHINE-{:03}", i % 3 + 1);
                let unit = if i % 2 == 0 { "°C" } else { "PSI" };
                row(i, &machine, (i * 7 % 11) as f64, unit)
            })
            .collect()
    }

    fn ids(rows: &[&DataRow]) -> Vec<String> {
        rows.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn pagination_is_ten_rows_per_page() {
        let mut table = PreviewTable::new(fixture(25));
        assert_eq!(table.total_pages(), 3);
        assert_eq!(table.page_rows().len(), 10);

        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 3);
        assert_eq!(table.page_rows().len(), 5);
        table.next_page();
        assert_eq!(table.page(), 3);

        table.prev_page();
        table.prev_page();
        table.prev_page();
        assert_eq!(table.page(), 1);
    }

    #[test]
    fn new_search_term_resets_to_first_page() {
        let mut table = PreviewTable::new(fixture(50));
        table.next_page();
        table.next_page();
        assert_eq!(table.page(), 3);

        table.set_search("machine-002");
        assert_eq!(table.page(), 1);
        assert!(table
            .visible_rows()
            .iter()
            .all(|r| r.machine == "MACHINE-002"));

        table.next_page();
        table.set_search("machine-002");
        assert_eq!(table.page(), 2, "same term is not a new search");
    }

    #[test]
    fn search_covers_visible_columns_case_insensitively() {
        let table_rows = fixture(10);
        let mut table = PreviewTable::new(table_rows);

        table.set_search("psi");
        assert_eq!(table.visible_rows().len(), 5);

        table.set_search("param c");
        assert_eq!(ids(&table.visible_rows()), vec!["data-2", "data-7"]);

        table.set_search("2024-01-01 00:03");
        assert_eq!(ids(&table.visible_rows()), vec!["data-3"]);

        table.set_search("10.00");
        assert!(!table.visible_rows().is_empty());

        // id and inclusion flag are not display columns
        table.set_search("data-");
        assert!(table.visible_rows().is_empty());
        table.set_search("true");
        assert!(table.visible_rows().is_empty());
    }

    #[test]
    fn sort_toggles_direction_and_is_stable() {
        let mut table = PreviewTable::new(fixture(9));

        table.request_sort(SortKey::Machine);
        let asc = ids(&table.visible_rows());
        assert_eq!(
            asc,
            vec!["data-0", "data-3", "data-6", "data-1", "data-4", "data-7", "data-2", "data-5", "data-8"]
        );

        table.request_sort(SortKey::Machine);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Descending));
        let desc = ids(&table.visible_rows());
        assert_eq!(
            desc,
            vec!["data-2", "data-5", "data-8", "data-1", "data-4", "data-7", "data-0", "data-3", "data-6"]
        );

        table.request_sort(SortKey::Machine);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Ascending));

        table.request_sort(SortKey::Unit);
        assert_eq!(table.sort().map(|s| s.direction), Some(SortDirection::Ascending));
    }

    #[test]
    fn sorting_is_idempotent() {
        for key in SortKey::ALL {
            for direction in [SortDirection::Ascending, SortDirection::Descending] {
                let mut table = PreviewTable::new(fixture(30));
                table.set_sort(SortSpec { key, direction });
                let once = ids(&table.visible_rows());
                table.set_sort(SortSpec { key, direction });
                let twice = ids(&table.visible_rows());
                assert_eq!(once, twice, "{:?} {:?}", key, direction);
            }
        }
    }

    #[test]
    fn ties_keep_the_previous_sort_order() {
        let mut table = PreviewTable::new(vec![
            row(0, "M", 3.0, "PSI"),
            row(1, "M", 1.0, "PSI"),
            row(2, "M", 2.0, "PSI"),
        ]);
        table.request_sort(SortKey::Value);
        assert_eq!(ids(&table.visible_rows()), vec!["data-1", "data-2", "data-0"]);

        table.request_sort(SortKey::Unit);
        assert_eq!(ids(&table.visible_rows()), vec!["data-1", "data-2", "data-0"]);

        // search filters the sorted order without disturbing it
        table.set_search("3.00");
        assert_eq!(ids(&table.visible_rows()), vec!["data-0"]);
        table.set_search("");
        assert_eq!(ids(&table.visible_rows()), vec!["data-1", "data-2", "data-0"]);
        assert_eq!(ids(&table.rows().iter().collect::<Vec<_>>()), vec!["data-0", "data-1", "data-2"]);
    }

    #[test]
    fn value_sort_is_numeric() {
        let mut table = PreviewTable::new(vec![
            row(0, "M", 9.5, "PSI"),
            row(1, "M", 10.25, "PSI"),
            row(2, "M", 100.0, "PSI"),
        ]);
        table.request_sort(SortKey::Value);
        assert_eq!(ids(&table.visible_rows()), vec!["data-0", "data-1", "data-2"]);
    }

    #[test]
    fn sort_change_clamps_page_into_range() {
        let mut table = PreviewTable::new(fixture(30));
        table.next_page();
        table.next_page();
        table.request_sort(SortKey::Value);
        assert_eq!(table.page(), 3);
        assert_eq!(table.page_rows().len(), 10);
    }

    #[test]
    fn select_all_tracks_entire_unfiltered_dataset() {
        let mut table = PreviewTable::new(fixture(20));
        assert!(table.all_selected());

        table.set_search("MACHINE-001");
        assert_eq!(table.toggle_row("data-1"), Some(false));
        assert!(!table.all_selected(), "hidden excluded row still counts");
        assert!(table.page_all_selected());

        table.set_search("");
        table.select_all(true);
        assert!(table.all_selected());

        table.select_all(false);
        assert!(!table.all_selected());
        assert!(table.included_ids().is_empty());

        for r in fixture(20) {
            table.toggle_row(&r.id);
        }
        assert!(table.all_selected());
        assert_eq!(table.toggle_row("missing"), None);
    }

    #[test]
    fn validation_needs_an_included_row() {
        let mut table = PreviewTable::new(fixture(3));
        assert_eq!(
            table.validate().unwrap().selected_row_ids,
            vec!["data-0", "data-1", "data-2"]
        );

        table.select_all(false);
        assert!(table.validate().unwrap_err().contains(FIELD_ROWS));

        table.toggle_row("data-2");
        assert_eq!(table.validate().unwrap().selected_row_ids, vec!["data-2"]);
    }

    #[test]
    fn empty_dataset_has_no_pages() {
        let mut table = PreviewTable::new(Vec::new());
        assert_eq!(table.total_pages(), 0);
        assert!(table.page_rows().is_empty());
        table.next_page();
        assert_eq!(table.page(), 1);
    }
}
